#![warn(clippy::all, missing_docs)]

//! Core domain logic for the medicine store manager.
//!
//! This crate hosts the stock and cart models, the flat-file inventory
//! store, input validation rules, and configuration handling used by the
//! interactive terminal front-end.

pub mod config;
pub mod error;
pub mod inventory;
pub mod models;
pub mod session;

pub use config::AppConfig;
pub use error::{InputError, InventoryError, InventoryResult};
pub use inventory::{Inventory, LoadIssue, LoadReport};
pub use models::{CartLine, StockRecord};
pub use session::{Bill, Cart};
