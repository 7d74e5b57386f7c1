// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

mod api;
mod file;
#[cfg(feature = "rtlsdr")]
mod rtl;
mod sample;
mod synthetic;
mod traits;

pub use api::open;
pub use file::RawFileSource;
#[cfg(feature = "rtlsdr")]
pub use rtl::RtlSdrSource;
pub use sample::iq_from_u8;
pub use synthetic::SyntheticSource;
pub use traits::SampleSource;
