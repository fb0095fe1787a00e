//! Error types for inventory and input handling.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Result type used by the inventory store.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Failures raised by [`crate::Inventory`] operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Reading the inventory file failed for a reason other than it being absent.
    #[error("failed to read inventory {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Writing the inventory back to disk failed.
    #[error("failed to persist inventory {path}: {source}")]
    Persist {
        /// Destination file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// No record carries the given item code.
    #[error("item {0} not found in inventory")]
    UnknownItem(String),

    /// A decrement asked for more than is on hand.
    #[error("insufficient stock for {code}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Item code of the record.
        code: String,
        /// Quantity asked for.
        requested: u32,
        /// Quantity currently on hand.
        available: u32,
    },

    /// Adding stock would overflow the quantity counter.
    #[error("adding {added} to {code} would overflow its quantity")]
    QuantityOverflow {
        /// Item code of the record.
        code: String,
        /// Quantity that was to be added.
        added: u32,
    },

    /// A line carried no parsable quantity and strict loading is enabled.
    #[error("line {line}: no valid quantity for {code}")]
    MalformedQuantity {
        /// One-based line number in the inventory file.
        line: usize,
        /// Item code parsed from the line.
        code: String,
    },
}

/// Rejections produced while validating operator input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Contact number was not exactly ten digits.
    #[error("contact number must be exactly 10 digits")]
    InvalidContact,

    /// Quantity was not a whole number.
    #[error("quantity must be a whole number")]
    NotANumber,

    /// Quantity was zero where a positive amount is required.
    #[error("quantity must be greater than zero")]
    NotPositive,

    /// Quantity exceeded what is available.
    #[error("only {available} available")]
    ExceedsAvailable {
        /// Quantity currently on hand.
        available: u32,
    },
}
