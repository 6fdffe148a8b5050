// tradesheet/src/errors.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Credential could not be authorized: {0}")]
    Authorization(String),

    #[error("Workbook not found: {0}")]
    WorkbookNotFound(String),

    #[error("Worksheet not found: {0}")]
    WorksheetNotFound(String),

    #[error("Remote spreadsheet API error: {0}")]
    RemoteApi(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
