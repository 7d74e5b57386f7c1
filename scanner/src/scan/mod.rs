// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

mod api;
mod context;
mod structs;

pub use api::*;
pub use context::{Interrupt, ScanContext};
pub use structs::{ChannelFailure, ScanReport};
