mod app;
mod console;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io,
    path::Path,
    sync::Mutex,
};

use crossterm::tty::IsTty;
use medstore_core::{
    config::{self, AppConfig},
    Inventory,
};
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::{app::StoreApp, console::Console};

fn main() -> Result<()> {
    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    init_logging(&config.log_dir)?;

    let (inventory, report) = Inventory::open(&config.inventory_path, config.load_mode())
        .with_context(|| {
            format!(
                "failed to load inventory {}",
                config.inventory_path.display()
            )
        })?;

    let stdout = io::stdout();
    let color = config.color && stdout.is_tty();
    let console = Console::new(io::stdin().lock(), stdout.lock(), color);

    let mut app = StoreApp::new(inventory, &config, console);
    app.report_load(&report)?;
    app.run()
}

fn init_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;
    let log_path = log_dir.join("medstore.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let env_filter = EnvFilter::from_default_env();

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
