//! Validation rules applied to operator input.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::InputError;

static CONTACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("invalid contact regex"));

/// Accept exactly ten ASCII digits. Only the line ending is ignored.
pub fn contact_number(input: &str) -> Result<&str, InputError> {
    let line = input.trim_end_matches(['\r', '\n']);
    if CONTACT_RE.is_match(line) {
        Ok(line)
    } else {
        Err(InputError::InvalidContact)
    }
}

/// Parse a whole number of units, allowing zero.
pub fn stock_quantity(input: &str) -> Result<u32, InputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::NotANumber);
    }
    trimmed.parse().map_err(|_| InputError::NotANumber)
}

/// Parse a purchase quantity: positive and no more than `available`.
pub fn purchase_quantity(input: &str, available: u32) -> Result<u32, InputError> {
    match stock_quantity(input) {
        Ok(0) => Err(InputError::NotPositive),
        Ok(quantity) if quantity > available => Err(InputError::ExceedsAvailable { available }),
        // Too many digits for u32 is still more than anything on hand.
        Err(InputError::NotANumber) if is_digits(input) => {
            Err(InputError::ExceedsAvailable { available })
        }
        other => other,
    }
}

fn is_digits(input: &str) -> bool {
    let trimmed = input.trim();
    !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit())
}
