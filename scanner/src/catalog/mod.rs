// Metrea LLC Intellectual Property
// Originally developed by Raw Socket Labs LLC

mod api;
mod structs;

pub use api::*;
pub use structs::Catalog;
pub(crate) use structs::ChannelRow;
