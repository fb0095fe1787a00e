use std::io::{BufRead, Write};

use anyhow::Result;
use medstore_core::{
    session::validate, AppConfig, Cart, Inventory, InventoryError, LoadIssue, LoadReport,
    StockRecord,
};
use tracing::{info, warn};

use crate::console::Console;

const MENU: [&str; 5] = [
    "1. Check available medicines",
    "2. Purchase medicines",
    "3. Display updated inventory",
    "4. Add stock",
    "5. Exit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Interactive medicine store session: menu loop, purchase dialogue and billing.
pub struct StoreApp<R, W> {
    inventory: Inventory,
    cart: Cart,
    currency: String,
    console: Console<R, W>,
}

impl<R: BufRead, W: Write> StoreApp<R, W> {
    pub fn new(inventory: Inventory, config: &AppConfig, console: Console<R, W>) -> Self {
        Self {
            inventory,
            cart: Cart::new(config.unit_price),
            currency: config.currency.clone(),
            console,
        }
    }

    /// Run the menu until the operator exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.console.say("")?;
            for entry in MENU {
                self.console.say(entry)?;
            }
            let Some(choice) = self.console.prompt_inline("Enter your choice: ")? else {
                info!("input closed, leaving menu");
                return Ok(());
            };

            let flow = match choice.trim() {
                "1" => self.display_inventory()?,
                "2" => self.purchase()?,
                "3" => self.refresh()?,
                "4" => self.add_stock()?,
                "5" => {
                    self.console.say("Exiting... Goodbye!")?;
                    Flow::Quit
                }
                _ => {
                    self.console.error("Invalid choice. Please try again.")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// Print the diagnostics gathered while loading the inventory.
    pub fn report_load(&mut self, report: &LoadReport) -> Result<()> {
        for issue in &report.issues {
            let message = match issue {
                LoadIssue::MissingFile(_) => format!("Error: {issue}."),
                _ => format!("Warning: {issue}."),
            };
            self.console.warn(&message)?;
        }
        Ok(())
    }

    fn display_inventory(&mut self) -> Result<Flow> {
        self.console.heading("Available Medicines:\n")?;
        if self.inventory.is_empty() {
            self.console.say("No medicines in stock.")?;
        }
        for record in self.inventory.records() {
            self.console.say(format!(
                "{}. {} - {} - Quantity: {}",
                record.item_code, record.medicine, record.disease, record.quantity
            ))?;
        }
        Ok(Flow::Continue)
    }

    fn refresh(&mut self) -> Result<Flow> {
        match self.inventory.reload() {
            Ok(report) => self.report_load(&report)?,
            Err(err) => {
                warn!("reload failed: {err}");
                self.console
                    .error(&format!("Could not reload inventory: {err}"))?;
            }
        }
        self.console.heading("\nUpdated Inventory:")?;
        self.display_inventory()
    }

    fn purchase(&mut self) -> Result<Flow> {
        let billed = self.cart.lines().len();
        loop {
            let Some(customer) = self.console.prompt("\nEnter your name:")? else {
                return self.input_closed(billed);
            };
            let Some(contact) = self.console.ask("Enter your contact number (10 digits):", |line| {
                validate::contact_number(line).map(str::to_string).map_err(|_| {
                    "Invalid contact number. Please enter a valid 10-digit number.".to_string()
                })
            })?
            else {
                return self.input_closed(billed);
            };

            let inventory = &self.inventory;
            let Some(record) = self.console.ask(
                "Enter the name of the medicine you want to purchase:",
                |line| {
                    inventory
                        .find_by_name(line)
                        .cloned()
                        .ok_or_else(|| "Invalid medicine name. Please try again.".to_string())
                },
            )?
            else {
                return self.input_closed(billed);
            };

            let available = record.quantity;
            let Some(quantity) = self.console.ask(
                &format!("Enter the quantity (Available: {available}):"),
                |line| {
                    validate::purchase_quantity(line, available).map_err(|_| {
                        format!(
                            "Invalid quantity. Please enter a valid quantity (Available: {available}):"
                        )
                    })
                },
            )?
            else {
                return self.input_closed(billed);
            };

            self.sell(&record, quantity)?;
            info!(
                customer = customer.as_str(),
                contact = contact.as_str(),
                "sold {quantity} x {}",
                record.medicine
            );

            let Some(again) = self
                .console
                .prompt("Do you want to purchase another item? (yes/no):")?
            else {
                return self.input_closed(billed);
            };
            if !again.trim().eq_ignore_ascii_case("yes") {
                break;
            }
        }

        self.print_bill()?;
        Ok(Flow::Continue)
    }

    fn sell(&mut self, record: &StockRecord, quantity: u32) -> Result<()> {
        match self.inventory.decrement(&record.item_code, quantity) {
            Ok(_) => {
                self.cart.add(record, quantity);
            }
            Err(err) => {
                warn!("sale of {} failed: {err}", record.item_code);
                self.console
                    .error(&format!("Could not complete purchase: {err}"))?;
            }
        }
        Ok(())
    }

    /// Input ended mid-dialogue: bill anything already sold on this visit, then quit.
    fn input_closed(&mut self, billed: usize) -> Result<Flow> {
        info!("input closed during purchase");
        if self.cart.lines().len() > billed {
            self.print_bill()?;
        }
        Ok(Flow::Quit)
    }

    fn print_bill(&mut self) -> Result<()> {
        self.console.heading("\nGenerating Bill...")?;
        let bill = self.cart.bill(&self.currency);
        self.console.say(bill)
    }

    fn add_stock(&mut self) -> Result<Flow> {
        let Some(item_code) = self.console.prompt("Enter item code to add stock:")? else {
            return Ok(Flow::Quit);
        };
        let Some(quantity) = self.console.ask("Enter quantity to add:", |line| {
            validate::stock_quantity(line)
                .map_err(|_| "Invalid quantity. Please enter a whole number:".to_string())
        })?
        else {
            return Ok(Flow::Quit);
        };

        match self.inventory.add_stock(item_code.trim(), quantity) {
            Ok(total) => self
                .console
                .success(&format!("Stock updated. {} now has {total}.", item_code.trim()))?,
            Err(InventoryError::UnknownItem(_)) => {
                self.console.error("Item not found in inventory.")?
            }
            Err(err) => {
                warn!("restock of {} failed: {err}", item_code.trim());
                self.console.error(&format!("Could not add stock: {err}"))?
            }
        }
        Ok(Flow::Continue)
    }

    #[cfg(test)]
    fn into_parts(self) -> (Inventory, Cart, W) {
        (self.inventory, self.cart, self.console.into_output())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, io::Cursor, path::Path};

    use medstore_core::inventory::LoadMode;
    use tempfile::tempdir;

    type ScriptedApp = StoreApp<Cursor<Vec<u8>>, Vec<u8>>;

    fn app(path: &Path, script: &str) -> Result<ScriptedApp> {
        let (inventory, _) = Inventory::open(path, LoadMode::Lenient)?;
        let console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new(), false);
        Ok(StoreApp::new(inventory, &AppConfig::default(), console))
    }

    fn run(path: &Path, script: &str) -> Result<(Inventory, Cart, String)> {
        let mut app = app(path, script)?;
        app.run()?;
        let (inventory, cart, output) = app.into_parts();
        Ok((inventory, cart, String::from_utf8(output)?))
    }

    fn stock_file(dir: &Path, contents: &str) -> Result<std::path::PathBuf> {
        let path = dir.join("inventory.txt");
        fs::write(&path, contents)?;
        Ok(path)
    }

    #[test]
    fn purchase_deducts_stock_and_bills() -> Result<()> {
        let dir = tempdir()?;
        let path = stock_file(dir.path(), "C1,Aspirin,Headache,quantity:10\n")?;

        let (inventory, cart, output) =
            run(&path, "2\nAsha\n9876543210\nAspirin\n3\nno\n5\n")?;

        assert_eq!(inventory.get("C1").map(|r| r.quantity), Some(7));
        assert_eq!(fs::read_to_string(&path)?, "C1,Aspirin,Headache,quantity:7\n");
        assert_eq!(cart.lines().len(), 1);
        let line = &cart.lines()[0];
        assert_eq!(
            (line.medicine.as_str(), line.quantity, line.unit_price),
            ("Aspirin", 3, 10)
        );
        assert_eq!(cart.total_amount(), 30);
        assert!(output.contains("Total Amount: 30"));
        assert!(output.contains("Please pay 30 INR."));
        assert!(output.ends_with("Exiting... Goodbye!\n"));
        Ok(())
    }

    #[test]
    fn invalid_purchase_input_is_reprompted() -> Result<()> {
        let dir = tempdir()?;
        let path = stock_file(
            dir.path(),
            "C1,Aspirin,Headache,quantity:10\nC2,Zinc,Cold,quantity:4\n",
        )?;
        let script = "2\nRavi\n12345\nphone\n9876543210\nibuprofen\naspirin\n0\n11\nmany\n4\n\
                      YES\nRavi\n9876543210\nZINC\n4\nno\n5\n";

        let (inventory, cart, output) = run(&path, script)?;

        assert_eq!(output.matches("Invalid contact number.").count(), 2);
        assert_eq!(output.matches("Invalid medicine name.").count(), 1);
        assert_eq!(output.matches("Invalid quantity.").count(), 3);
        assert_eq!(inventory.get("C1").map(|r| r.quantity), Some(6));
        assert_eq!(inventory.get("C2").map(|r| r.quantity), Some(0));
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[1].medicine, "Zinc");
        assert_eq!(cart.total_amount(), 80);
        assert!(output.contains("Total Amount: 80"));
        Ok(())
    }

    #[test]
    fn cart_persists_across_purchases() -> Result<()> {
        let dir = tempdir()?;
        let path = stock_file(dir.path(), "C1,Aspirin,Headache,quantity:10\n")?;
        let script = "2\nA\n9876543210\nAspirin\n1\nno\n2\nB\n9876543210\nAspirin\n2\nno\n5\n";

        let (_, cart, output) = run(&path, script)?;

        assert_eq!(cart.total_amount(), 30);
        assert!(output.contains("Total Amount: 10"));
        assert!(output.contains("Total Amount: 30"));
        Ok(())
    }

    #[test]
    fn add_stock_known_and_unknown_codes() -> Result<()> {
        let dir = tempdir()?;
        let path = stock_file(dir.path(), "C1,Aspirin,Headache,quantity:10\n")?;

        let (inventory, _, output) = run(&path, "4\nC1\nabc\n5\n4\nZZ\n1\n5\n")?;

        assert_eq!(inventory.get("C1").map(|r| r.quantity), Some(15));
        assert_eq!(inventory.len(), 1);
        assert!(output.contains("Stock updated. C1 now has 15."));
        assert!(output.contains("Item not found in inventory."));
        assert_eq!(fs::read_to_string(&path)?, "C1,Aspirin,Headache,quantity:15\n");
        Ok(())
    }

    #[test]
    fn refresh_shows_external_changes() -> Result<()> {
        let dir = tempdir()?;
        let path = stock_file(dir.path(), "C1,Aspirin,Headache,quantity:10\n")?;
        let mut app = app(&path, "1\n3\n5\n")?;
        fs::write(&path, "C1,Aspirin,Headache,quantity:2\nC2,Zinc,Cold,oops\n")?;

        app.run()?;
        let (inventory, _, output) = app.into_parts();
        let output = String::from_utf8(output)?;

        assert!(output.contains("C1. Aspirin - Headache - Quantity: 10"));
        assert!(output.contains("Updated Inventory:"));
        assert!(output.contains("C1. Aspirin - Headache - Quantity: 2"));
        assert!(output.contains("Warning: line 2: no valid quantity for C2, using 0."));
        assert_eq!(inventory.len(), 2);
        Ok(())
    }

    #[test]
    fn end_of_input_after_sale_still_bills() -> Result<()> {
        let dir = tempdir()?;
        let path = stock_file(dir.path(), "C1,Aspirin,Headache,quantity:10\n")?;

        let (inventory, cart, output) = run(&path, "2\nA\n9876543210\nAspirin\n3\n")?;

        assert_eq!(inventory.get("C1").map(|r| r.quantity), Some(7));
        assert_eq!(cart.total_amount(), 30);
        assert!(output.contains("Total Amount: 30"));
        Ok(())
    }

    #[test]
    fn end_of_input_on_next_round_bills_earlier_sales_once() -> Result<()> {
        let dir = tempdir()?;
        let path = stock_file(dir.path(), "C1,Aspirin,Headache,quantity:10\n")?;
        let script = "2\nA\n9876543210\nAspirin\n1\nno\n2\nB\n9876543210\nAspirin\n2\nyes\nB\n";

        let (_, cart, output) = run(&path, script)?;

        assert_eq!(cart.total_amount(), 30);
        assert_eq!(output.matches("Generating Bill...").count(), 2);
        assert!(output.contains("Total Amount: 30"));
        Ok(())
    }

    #[test]
    fn end_of_input_ends_session() -> Result<()> {
        let dir = tempdir()?;
        let path = stock_file(dir.path(), "C1,Aspirin,Headache,quantity:10\n")?;

        let (inventory, cart, output) = run(&path, "9\n2\nAsha\n98765\n")?;

        assert!(output.contains("Invalid choice. Please try again."));
        assert!(!output.contains("Generating Bill..."));
        assert!(cart.is_empty());
        assert_eq!(inventory.get("C1").map(|r| r.quantity), Some(10));
        Ok(())
    }

    #[test]
    fn missing_inventory_is_reported() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("absent.txt");
        let (inventory, report) = Inventory::open(&path, LoadMode::Lenient)?;
        let console = Console::new(Cursor::new(b"1\n5\n".to_vec()), Vec::new(), false);
        let mut app = StoreApp::new(inventory, &AppConfig::default(), console);

        app.report_load(&report)?;
        app.run()?;
        let (_, _, output) = app.into_parts();
        let output = String::from_utf8(output)?;

        assert!(output.contains("was not found"));
        assert!(output.contains("No medicines in stock."));
        Ok(())
    }
}
