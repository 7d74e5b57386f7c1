// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

// STD LIB
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

// LOCAL CRATE
use crate::spectrum::SpectrumContext;

/// Pause between bandwidth passes when scanning all of them.
const BANDWIDTH_PAUSE: Duration = Duration::from_millis(500);

/// Everything a scan needs besides the receiver and the catalog.
pub struct ScanContext {
    pub spectrum: SpectrumContext,
    pub verbose: bool,
    pub bandwidth_pause: Duration,
}

impl ScanContext {
    pub fn new(spectrum: SpectrumContext, verbose: bool) -> Self {
        Self {
            spectrum,
            verbose,
            bandwidth_pause: BANDWIDTH_PAUSE,
        }
    }
}

/// User stop request, checked between channels.
#[derive(Clone, Debug, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
