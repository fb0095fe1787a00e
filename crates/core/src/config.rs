//! Application configuration.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{inventory::LoadMode, session::DEFAULT_UNIT_PRICE};

/// Directory under `~/.config` holding the configuration file.
pub const CONFIG_DIR: &str = "medstore";
/// File name of the configuration file.
pub const CONFIG_FILE: &str = "config.toml";
/// Prefix for environment overrides, e.g. `MEDSTORE_UNIT_PRICE=12`.
pub const ENV_PREFIX: &str = "MEDSTORE";

const DEFAULT_CONFIG: &str = r#"# Medicine store configuration.
# Every key may also be set through the environment, e.g. MEDSTORE_INVENTORY_PATH.

# Flat-text inventory file, relative to the working directory.
inventory_path = "inventory.txt"

# Price charged per unit on every bill.
unit_price = 10

# Currency label printed on bills.
currency = "INR"

# Refuse to start when a record has no parsable quantity instead of using 0.
strict_quantities = false

# Directory receiving medstore.log.
log_dir = "logs"

# Colored terminal output.
color = true
"#;

/// Runtime settings for the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Inventory file read at startup and rewritten after every change.
    pub inventory_path: PathBuf,
    /// Price charged per unit.
    pub unit_price: u64,
    /// Currency label printed on bills.
    pub currency: String,
    /// Fail the load on unparsable quantities instead of defaulting to zero.
    pub strict_quantities: bool,
    /// Directory for the log file.
    pub log_dir: PathBuf,
    /// Whether to style terminal output.
    pub color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            inventory_path: PathBuf::from("inventory.txt"),
            unit_price: DEFAULT_UNIT_PRICE,
            currency: "INR".to_string(),
            strict_quantities: false,
            log_dir: PathBuf::from("logs"),
            color: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load configuration from `path` (if it exists) layered under the environment.
    pub fn load_from(path: &Path) -> Result<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// Load mode matching `strict_quantities`.
    pub fn load_mode(&self) -> LoadMode {
        if self.strict_quantities {
            LoadMode::Strict
        } else {
            LoadMode::Lenient
        }
    }
}

/// Location of the configuration file under the user's config directory.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write the commented default configuration if no file exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))
}
