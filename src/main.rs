//! Trade Export Tool
//!
//! Exports the `trades` table of a trading bot's SQLite database into a
//! Google Sheets workbook, after a chain of preflight checks.

// tradesheet/src/main.rs
mod config;
mod db;
mod errors;
mod sheets;
mod transfer;

use anyhow::{Context, Result};
use config::TransferConfig;
use sheets::GoogleSheetsService;
use std::path::PathBuf;
use std::process::ExitCode;

/// Main entry point for the export tool
#[tokio::main]
async fn main() -> ExitCode {
    match run_app().await {
        Ok(_) => {
            println!("✅ Operation completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_app() -> Result<()> {
    // Expects config.json next to the executable, or in the project root
    // when running with `cargo run`.
    let config_path = PathBuf::from("config.json");
    let config = TransferConfig::load_from_json(&config_path).context(format!(
        "Failed to load application configuration from {}",
        config_path.display()
    ))?;

    let service = GoogleSheetsService::new(config.credential_file.clone());
    transfer::run_transfer_flow(&config, &service)
        .await
        .context("Trade export failed")?;
    Ok(())
}
