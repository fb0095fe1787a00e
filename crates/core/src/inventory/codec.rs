use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::StockRecord;

static SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,:]").expect("invalid separator regex"));

static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)quantity\s*[:\-]?\s*(\d+)").expect("invalid quantity regex")
});

/// Result of decoding one line of the inventory file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// The line had fewer than four fields.
    Skipped,
    /// A record was decoded; `quantity_ok` is false when the quantity defaulted to zero.
    Record {
        /// Decoded record.
        record: StockRecord,
        /// Whether the quantity field was present and parsable.
        quantity_ok: bool,
    },
}

/// Decode a single line of the form `code,medicine,disease,quantity:<n>`.
///
/// Fields may be separated by commas or colons. Everything after the third
/// separator is searched for the `quantity` marker.
pub fn parse_line(line: &str) -> ParsedLine {
    let trimmed = line.trim();
    let fields: Vec<&str> = SEPARATOR_RE.splitn(trimmed, 4).collect();
    let [code, medicine, disease, tail] = fields.as_slice() else {
        return ParsedLine::Skipped;
    };

    let quantity = parse_quantity(tail);
    ParsedLine::Record {
        record: StockRecord::new(
            code.trim(),
            medicine.trim(),
            disease.trim(),
            quantity.unwrap_or(0),
        ),
        quantity_ok: quantity.is_some(),
    }
}

fn parse_quantity(field: &str) -> Option<u32> {
    QUANTITY_RE
        .captures(field)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Encode a record as one line, without the trailing newline.
pub fn format_line(record: &StockRecord) -> String {
    format!(
        "{},{},{},quantity:{}",
        record.item_code, record.medicine, record.disease, record.quantity
    )
}
