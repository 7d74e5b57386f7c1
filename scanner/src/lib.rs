// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

//! Finds the cleanest 802.11ah (HaLow) channel in a region by tuning an SDR to
//! each channel, estimating the power spectrum and ranking channels by their
//! in-band noise floor.

pub mod catalog;
pub mod cli;
pub mod device;
pub mod error;
pub mod logging;
pub mod measure;
pub mod rank;
pub mod report;
pub mod scan;
pub mod spectrum;

pub use cli::Cli;
