// tradesheet/src/transfer/mod.rs
pub(crate) mod logic;
pub(crate) mod preconditions;
pub(crate) mod sanitize;

use anyhow::Result;

use crate::config::TransferConfig;
use crate::sheets::SheetsService;

/// Public entry point for the transfer process.
pub async fn run_transfer_flow(config: &TransferConfig, svc: &dyn SheetsService) -> Result<()> {
    logic::perform_transfer_orchestration(config, svc).await
}
