// tradesheet/src/sheets/mod.rs
pub(crate) mod client;
pub(crate) mod provision;

#[cfg(test)]
pub(crate) mod fake;

pub use client::GoogleSheetsService;
pub use provision::ensure_workbook_and_sheet;

use crate::errors::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Sheet title the default first tab is renamed to when a workbook is
/// provisioned from scratch.
pub const SUMMARY_SHEET: &str = "Summary";
/// Scratch sheet used by spreadsheet-side formulas, part of the fixed layout.
pub const PROCESSING_SHEET: &str = "data processing";
/// Title Google gives the placeholder tab of a newly created spreadsheet.
pub const DEFAULT_SHEET: &str = "Sheet1";

pub const NEW_SHEET_ROWS: i32 = 1000;
pub const NEW_SHEET_COLS: i32 = 26;

/// Handle to a remote workbook resolved by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookRef {
    pub id: String,
    pub name: String,
}

/// The remote spreadsheet operations the transfer consumes. Kept behind a
/// trait so the precondition chain, provisioner, and orchestrator run against
/// an in-memory implementation in tests.
#[async_trait]
pub trait SheetsService: Send + Sync {
    /// Attempts to obtain an access token for the configured credential.
    async fn authorize(&self) -> Result<()>;

    /// Looks a workbook up by its human-readable name. `Ok(None)` means the
    /// workbook does not exist; `Err` is reserved for API faults.
    async fn find_workbook(&self, name: &str) -> Result<Option<WorkbookRef>>;

    async fn create_workbook(&self, name: &str) -> Result<WorkbookRef>;

    /// Worksheet titles in tab order.
    async fn worksheet_titles(&self, workbook: &WorkbookRef) -> Result<Vec<String>>;

    async fn add_worksheet(&self, workbook: &WorkbookRef, title: &str) -> Result<()>;

    async fn delete_worksheet(&self, workbook: &WorkbookRef, title: &str) -> Result<()>;

    async fn rename_worksheet(&self, workbook: &WorkbookRef, from: &str, to: &str) -> Result<()>;

    /// Removes every value from the worksheet, leaving an empty grid.
    async fn clear_worksheet(&self, workbook: &WorkbookRef, title: &str) -> Result<()>;

    /// Writes a header row followed by data rows, anchored at the top-left
    /// cell, letting the service auto-parse numbers and dates.
    async fn write_rows(
        &self,
        workbook: &WorkbookRef,
        title: &str,
        header: &[String],
        rows: &[Vec<Value>],
    ) -> Result<()>;
}
