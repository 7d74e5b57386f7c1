// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

mod api;
mod stats;

pub use api::*;
pub use stats::{mean, percentile};
