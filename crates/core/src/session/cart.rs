use std::fmt;

use chrono::{DateTime, Local};

use crate::models::{CartLine, StockRecord};

/// Price charged per unit when none is configured.
pub const DEFAULT_UNIT_PRICE: u64 = 10;

/// Lines purchased during the running session and their accumulated total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    unit_price: u64,
    lines: Vec<CartLine>,
    total_amount: u64,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(DEFAULT_UNIT_PRICE)
    }
}

impl Cart {
    /// Empty cart charging `unit_price` for every unit.
    pub fn new(unit_price: u64) -> Self {
        Self {
            unit_price,
            lines: Vec::new(),
            total_amount: 0,
        }
    }

    /// Record a purchase of `quantity` units of `record`.
    pub fn add(&mut self, record: &StockRecord, quantity: u32) {
        let line = CartLine {
            item_code: record.item_code.clone(),
            medicine: record.medicine.clone(),
            quantity,
            unit_price: self.unit_price,
        };
        self.total_amount += line.line_total();
        self.lines.push(line);
    }

    /// Lines in purchase order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of every line total.
    pub fn total_amount(&self) -> u64 {
        self.total_amount
    }

    /// True when nothing has been purchased yet.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Bill for the current contents, stamped with the local time.
    pub fn bill(&self, currency: &str) -> Bill<'_> {
        Bill {
            cart: self,
            currency: currency.to_string(),
            issued_at: Local::now(),
        }
    }
}

/// Printable bill for a cart.
#[derive(Debug, Clone)]
pub struct Bill<'a> {
    cart: &'a Cart,
    currency: String,
    issued_at: DateTime<Local>,
}

impl Bill<'_> {
    /// Override the issue timestamp.
    pub fn issued_at(mut self, issued_at: DateTime<Local>) -> Self {
        self.issued_at = issued_at;
        self
    }

    /// Grand total owed.
    pub fn grand_total(&self) -> u64 {
        self.cart.total_amount()
    }
}

impl fmt::Display for Bill<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bill issued {}", self.issued_at.format("%Y-%m-%d %H:%M"))?;
        writeln!(
            f,
            "{:<5}{:<12}{:<15}{:<10}{:<10}{}",
            "SrNo", "Item Code", "Medicine", "Quantity", "Price", "Total"
        )?;
        for (index, line) in self.cart.lines().iter().enumerate() {
            writeln!(
                f,
                "{:<5}{:<12}{:<15}{:<10}{:<10}{}",
                index + 1,
                line.item_code,
                line.medicine,
                line.quantity,
                line.unit_price,
                line.line_total()
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Total Amount: {}", self.grand_total())?;
        write!(
            f,
            "Please pay {} {}. Thank you for your purchase!",
            self.grand_total(),
            self.currency
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn accumulates_lines_and_total() {
        let aspirin = StockRecord::new("C1", "Aspirin", "Headache", 10);
        let zinc = StockRecord::new("C2", "Zinc", "Cold", 4);
        let mut cart = Cart::default();

        cart.add(&aspirin, 3);
        cart.add(&zinc, 2);

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].medicine, "Aspirin");
        assert_eq!(cart.lines()[0].unit_price, 10);
        assert_eq!(cart.total_amount(), 50);
    }

    #[test]
    fn bill_lists_lines_and_grand_total() {
        let mut cart = Cart::new(12);
        cart.add(&StockRecord::new("C1", "Aspirin", "Headache", 10), 3);
        let issued = Local
            .with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp");

        let rendered = cart.bill("INR").issued_at(issued).to_string();
        let lines: Vec<_> = rendered.lines().collect();

        assert_eq!(lines[0], "Bill issued 2024-05-01 09:30");
        assert!(lines[1].starts_with("SrNo Item Code"));
        assert_eq!(
            lines[2].split_whitespace().collect::<Vec<_>>(),
            ["1", "C1", "Aspirin", "3", "12", "36"]
        );
        assert!(rendered.contains("Total Amount: 36"));
        assert!(rendered.ends_with("Please pay 36 INR. Thank you for your purchase!"));
    }
}
