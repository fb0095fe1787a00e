//! Flat-file inventory store.

/// Line parsing and formatting for the inventory file.
pub mod codec;
/// Diagnostics collected while loading.
pub mod report;
/// In-memory store backed by the inventory file.
pub mod store;

pub use report::{LoadIssue, LoadReport};
pub use store::{Inventory, LoadMode};
