// tradesheet/src/transfer/logic.rs
use anyhow::{Context, Result};

use crate::config::TransferConfig;
use crate::db;
use crate::sheets::SheetsService;
use crate::transfer::preconditions::run_preconditions;
use crate::transfer::sanitize::sanitize_rows;

/// Drives one full export: precondition chain, trade snapshot, sanitize,
/// clear-then-write to the target worksheet.
///
/// A failed precondition is a logged abort, not an error: the chain has
/// already reported its diagnostic and nothing was transferred. Faults after
/// the preconditions passed (data read or remote write) propagate as errors
/// so the caller reports them; a run always ends with a logged outcome.
pub async fn perform_transfer_orchestration(
    config: &TransferConfig,
    svc: &dyn SheetsService,
) -> Result<()> {
    println!(
        "🚀 Starting trade export to workbook '{}', worksheet '{}'...",
        config.workbook_name, config.worksheet_name
    );

    if !run_preconditions(svc, config).await {
        println!("Export aborted, nothing was transferred.");
        return Ok(());
    }

    let snapshot = db::fetch_trades_snapshot(&config.database_file)
        .await
        .context("Failed to read the trades table after preconditions passed")?;
    println!(
        "✓ Read {} trade(s) from {}",
        snapshot.rows.len(),
        config.database_file.display()
    );

    // Guaranteed present by the precondition chain; re-resolved here because
    // the chain hands back no workbook handle.
    let workbook = svc
        .find_workbook(&config.workbook_name)
        .await
        .with_context(|| format!("Failed to look up workbook '{}'", config.workbook_name))?
        .with_context(|| format!("Workbook '{}' disappeared mid-run", config.workbook_name))?;

    svc.clear_worksheet(&workbook, &config.worksheet_name)
        .await
        .with_context(|| format!("Failed to clear worksheet '{}'", config.worksheet_name))?;

    let rows = sanitize_rows(snapshot.rows);
    svc.write_rows(&workbook, &config.worksheet_name, &snapshot.columns, &rows)
        .await
        .with_context(|| format!("Failed to write to worksheet '{}'", config.worksheet_name))?;

    println!(
        "✅ Exported {} trade(s) to '{}' / '{}'",
        rows.len(),
        config.workbook_name,
        config.worksheet_name
    );
    Ok(())
}
