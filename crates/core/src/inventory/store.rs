use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::{
    codec::{self, ParsedLine},
    report::{LoadIssue, LoadReport},
};
use crate::{
    error::{InventoryError, InventoryResult},
    models::StockRecord,
};

/// How to treat records whose quantity cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Store the record with a zero quantity and note the issue.
    #[default]
    Lenient,
    /// Abort the load with [`InventoryError::MalformedQuantity`].
    Strict,
}

/// Stock records held in memory and mirrored to a flat text file.
#[derive(Debug, Clone)]
pub struct Inventory {
    path: PathBuf,
    mode: LoadMode,
    records: Vec<StockRecord>,
}

impl Inventory {
    /// Create an empty inventory that will persist to `path` without reading it.
    pub fn new(path: impl Into<PathBuf>, mode: LoadMode) -> Self {
        Self {
            path: path.into(),
            mode,
            records: Vec::new(),
        }
    }

    /// Load the inventory stored at `path`.
    ///
    /// A missing file yields an empty inventory and a [`LoadIssue::MissingFile`].
    pub fn open(path: impl Into<PathBuf>, mode: LoadMode) -> InventoryResult<(Self, LoadReport)> {
        let mut inventory = Self::new(path, mode);
        let report = inventory.reload()?;
        Ok((inventory, report))
    }

    /// Re-read the backing file, replacing everything held in memory.
    ///
    /// On error the current records are left untouched.
    pub fn reload(&mut self) -> InventoryResult<LoadReport> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("inventory file {} not found", self.path.display());
                self.records.clear();
                return Ok(LoadReport {
                    records: 0,
                    issues: vec![LoadIssue::MissingFile(self.path.clone())],
                });
            }
            Err(source) => {
                return Err(InventoryError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let (records, report) = parse_records(&contents, self.mode)?;
        info!(
            "loaded {} records from {}",
            records.len(),
            self.path.display()
        );
        self.records = records;
        Ok(report)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in file order.
    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records are held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by item code.
    pub fn get(&self, item_code: &str) -> Option<&StockRecord> {
        self.records
            .iter()
            .find(|record| record.item_code == item_code)
    }

    /// First record whose medicine name matches `name`, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<&StockRecord> {
        self.records.iter().find(|record| record.matches_name(name))
    }

    /// Add or replace a record in memory. A replaced record keeps its position.
    pub fn insert(&mut self, record: StockRecord) {
        upsert(&mut self.records, record);
    }

    /// Remove `quantity` units of `item_code` and persist, returning what remains.
    ///
    /// Fails without touching anything when the code is unknown or stock is short.
    pub fn decrement(&mut self, item_code: &str, quantity: u32) -> InventoryResult<u32> {
        let index = self.require(item_code)?;
        let available = self.records[index].quantity;
        let Some(remaining) = available.checked_sub(quantity) else {
            return Err(InventoryError::InsufficientStock {
                code: item_code.to_string(),
                requested: quantity,
                available,
            });
        };

        self.apply(index, remaining)?;
        info!("sold {quantity} of {item_code}, {remaining} left");
        Ok(remaining)
    }

    /// Add `quantity` units to an existing item and persist, returning the new total.
    pub fn add_stock(&mut self, item_code: &str, quantity: u32) -> InventoryResult<u32> {
        let index = self.require(item_code)?;
        let Some(total) = self.records[index].quantity.checked_add(quantity) else {
            return Err(InventoryError::QuantityOverflow {
                code: item_code.to_string(),
                added: quantity,
            });
        };

        self.apply(index, total)?;
        info!("restocked {item_code} by {quantity}, now {total}");
        Ok(total)
    }

    /// Write every record back to the backing file.
    ///
    /// The file is replaced atomically: records go to a temporary file in the
    /// same directory which is then renamed over the original.
    pub fn save(&self) -> InventoryResult<()> {
        let persist_err = |source: io::Error| InventoryError::Persist {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(persist_err)?;
                parent
            }
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir).map_err(persist_err)?;
        for record in &self.records {
            writeln!(file, "{}", codec::format_line(record)).map_err(persist_err)?;
        }
        file.as_file().sync_all().map_err(persist_err)?;
        match fs::metadata(&self.path) {
            Ok(existing) => file
                .as_file()
                .set_permissions(existing.permissions())
                .map_err(persist_err)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(persist_err(err)),
        }
        file.persist(&self.path)
            .map_err(|err| persist_err(err.error))?;

        debug!(
            "saved {} records to {}",
            self.records.len(),
            self.path.display()
        );
        Ok(())
    }

    fn position(&self, item_code: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.item_code == item_code)
    }

    fn require(&self, item_code: &str) -> InventoryResult<usize> {
        self.position(item_code).ok_or_else(|| {
            warn!("item {item_code} not found in inventory");
            InventoryError::UnknownItem(item_code.to_string())
        })
    }

    /// Set a quantity and persist, restoring the previous value if the write fails.
    fn apply(&mut self, index: usize, quantity: u32) -> InventoryResult<()> {
        let previous = std::mem::replace(&mut self.records[index].quantity, quantity);
        if let Err(err) = self.save() {
            self.records[index].quantity = previous;
            return Err(err);
        }
        Ok(())
    }
}

fn parse_records(contents: &str, mode: LoadMode) -> InventoryResult<(Vec<StockRecord>, LoadReport)> {
    let mut records = Vec::new();
    let mut issues = Vec::new();

    for (index, line) in contents.lines().enumerate() {
        let line_no = index + 1;
        debug!("processing line {line_no}: {}", line.trim());
        match codec::parse_line(line) {
            ParsedLine::Skipped => {
                if line.trim().is_empty() {
                    continue;
                }
                warn!("skipping malformed line {line_no}");
                issues.push(LoadIssue::SkippedLine {
                    line: line_no,
                    content: line.trim().to_string(),
                });
            }
            ParsedLine::Record {
                record,
                quantity_ok,
            } => {
                if !quantity_ok {
                    if mode == LoadMode::Strict {
                        return Err(InventoryError::MalformedQuantity {
                            line: line_no,
                            code: record.item_code,
                        });
                    }
                    warn!(
                        "no valid quantity for {} on line {line_no}, using 0",
                        record.item_code
                    );
                    issues.push(LoadIssue::DefaultedQuantity {
                        line: line_no,
                        code: record.item_code.clone(),
                    });
                }
                upsert(&mut records, record);
            }
        }
    }

    let report = LoadReport {
        records: records.len(),
        issues,
    };
    Ok((records, report))
}

fn upsert(records: &mut Vec<StockRecord>, record: StockRecord) {
    match records
        .iter_mut()
        .find(|existing| existing.item_code == record.item_code)
    {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}
