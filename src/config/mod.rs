// tradesheet/src/config/mod.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CREDENTIAL_FILE: &str = "client_secret.json";
const DEFAULT_DATABASE_FILE: &str = "tradesv3.sqlite";

// Struct for deserializing config.json
#[derive(Debug, Clone, Deserialize)]
pub struct RawJsonConfig {
    pub credential_file: Option<PathBuf>,
    pub database_file: Option<PathBuf>,
    pub workbook_name: Option<String>,
    pub worksheet_name: Option<String>,
}

/// Application's validated transfer configuration.
///
/// `workbook_name`/`worksheet_name` may still be empty here; the precondition
/// chain rejects empty names with its own diagnostic so a misconfigured run
/// aborts with a user-correctable message instead of a parse error.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    pub credential_file: PathBuf,
    pub database_file: PathBuf,
    pub workbook_name: String,
    pub worksheet_name: String,
}

impl TransferConfig {
    pub fn load_from_json(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;
        let raw: RawJsonConfig = serde_json::from_str(&config_content).with_context(|| {
            format!(
                "Failed to parse JSON from config file at {}",
                config_path.display()
            )
        })?;

        Ok(Self::from_raw(raw))
    }

    pub fn from_raw(raw: RawJsonConfig) -> Self {
        TransferConfig {
            credential_file: raw
                .credential_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIAL_FILE)),
            database_file: raw
                .database_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE)),
            workbook_name: raw.workbook_name.unwrap_or_default(),
            worksheet_name: raw.worksheet_name.unwrap_or_default(),
        }
    }

    /// True when both target names are explicitly configured.
    pub fn target_is_configured(&self) -> bool {
        !self.workbook_name.trim().is_empty() && !self.worksheet_name.trim().is_empty()
    }
}
