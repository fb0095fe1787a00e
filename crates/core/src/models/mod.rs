//! Shared domain models.

/// A single medicine held in stock, keyed by its item code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRecord {
    /// Unique identifier of the record.
    pub item_code: String,
    /// Display name of the medicine.
    pub medicine: String,
    /// Disease the medicine treats.
    pub disease: String,
    /// Units on hand.
    pub quantity: u32,
}

impl StockRecord {
    /// Build a record from its parts.
    pub fn new(
        item_code: impl Into<String>,
        medicine: impl Into<String>,
        disease: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            item_code: item_code.into(),
            medicine: medicine.into(),
            disease: disease.into(),
            quantity,
        }
    }

    /// Case-insensitive comparison against a medicine name typed by the operator.
    pub fn matches_name(&self, name: &str) -> bool {
        self.medicine.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

/// One purchased medicine accumulated in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Item code of the stock record the line was sold from.
    pub item_code: String,
    /// Medicine name as stored in the inventory.
    pub medicine: String,
    /// Units purchased.
    pub quantity: u32,
    /// Flat price applied to every unit.
    pub unit_price: u64,
}

impl CartLine {
    /// Price of the whole line.
    pub fn line_total(&self) -> u64 {
        u64::from(self.quantity) * self.unit_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_match_ignores_case_and_padding() {
        let record = StockRecord::new("C1", "Paracetamol", "Fever", 50);
        assert!(record.matches_name("paracetamol"));
        assert!(record.matches_name("  PARACETAMOL "));
        assert!(!record.matches_name("paracet"));
    }

    #[test]
    fn line_total_multiplies_quantity_by_price() {
        let line = CartLine {
            item_code: "C1".to_string(),
            medicine: "Aspirin".to_string(),
            quantity: 3,
            unit_price: 10,
        };
        assert_eq!(line.line_total(), 30);
    }
}
