//! Purchase session state and input rules.

mod cart;
pub mod validate;

pub use cart::{Bill, Cart, DEFAULT_UNIT_PRICE};
