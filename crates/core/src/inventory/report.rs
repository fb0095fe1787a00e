use std::{fmt, path::PathBuf};

/// Something odd found while loading the inventory that did not abort the load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadIssue {
    /// The inventory file does not exist; the inventory starts empty.
    MissingFile(PathBuf),
    /// A line had fewer than four fields and was ignored.
    SkippedLine {
        /// One-based line number.
        line: usize,
        /// Raw line content.
        content: String,
    },
    /// A record had no parsable quantity and was stored with zero.
    DefaultedQuantity {
        /// One-based line number.
        line: usize,
        /// Item code of the record.
        code: String,
    },
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFile(path) => write!(f, "the file {} was not found", path.display()),
            Self::SkippedLine { line, content } => {
                write!(f, "line {line}: skipped malformed entry {content:?}")
            }
            Self::DefaultedQuantity { line, code } => {
                write!(f, "line {line}: no valid quantity for {code}, using 0")
            }
        }
    }
}

/// Outcome of a load: number of records kept plus any issues encountered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records stored after the load.
    pub records: usize,
    /// Non-fatal problems, in file order.
    pub issues: Vec<LoadIssue>,
}

impl LoadReport {
    /// True when nothing needed to be skipped or defaulted.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}
