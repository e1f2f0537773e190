//! Domain module - catalog entities
//!
//! Plain data produced by the parsers and consumed by the exporters.

pub mod catalog;
pub mod table;

pub use catalog::{CategoryRecord, ProductRecord, Thumbnail};
pub use table::{NOT_FOUND_TITLE, TableModel};
