// tradesheet/src/db/mod.rs
use anyhow::{Context, Result};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, ConnectOptions, Executor, Row, TypeInfo, ValueRef};
use std::path::Path;

const TRADES_QUERY: &str = "SELECT * FROM trades";

/// Full snapshot of the `trades` table: ordered column names plus rows of
/// cells aligned to them. Cells are `serde_json::Value` because that is what
/// the spreadsheet write call consumes; SQL NULL surfaces as `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct TradesSnapshot {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Opens the trade database strictly read-only. The trading bot may hold its
/// own write lock on this file; the export must never mutate it.
pub async fn open_read_only(path: &Path) -> Result<SqliteConnection> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .read_only(true);
    let conn = options
        .connect()
        .await
        .with_context(|| format!("Failed to open database at {} read-only", path.display()))?;
    Ok(conn)
}

/// Verifies the database file can be opened read-only and is a real SQLite
/// store, by probing the schema catalog.
pub async fn check_database_open(path: &Path) -> Result<()> {
    let mut conn = open_read_only(path).await?;
    let _: i64 = sqlx::query_scalar("SELECT count(*) FROM sqlite_master")
        .fetch_one(&mut conn)
        .await
        .with_context(|| format!("{} is not a readable SQLite database", path.display()))?;
    Ok(())
}

/// Reads the full `trades` table into memory.
///
/// Column names come from a query describe so an empty table still produces
/// a complete header row.
pub async fn fetch_trades_snapshot(path: &Path) -> Result<TradesSnapshot> {
    let mut conn = open_read_only(path).await?;

    let describe = conn
        .describe(TRADES_QUERY)
        .await
        .context("Failed to describe the trades table")?;
    let columns: Vec<String> = describe
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();

    let db_rows = sqlx::query(TRADES_QUERY)
        .fetch_all(&mut conn)
        .await
        .context("Failed to read rows from the trades table")?;

    let mut rows = Vec::with_capacity(db_rows.len());
    for db_row in &db_rows {
        let mut cells = Vec::with_capacity(columns.len());
        for index in 0..columns.len() {
            cells.push(decode_cell(db_row, index)?);
        }
        rows.push(cells);
    }

    Ok(TradesSnapshot { columns, rows })
}

/// Decodes one cell by its SQLite storage class. Non-finite REAL values have
/// no JSON representation and collapse to `Value::Null`, the same missing
/// marker the sanitizer replaces.
fn decode_cell(row: &SqliteRow, index: usize) -> Result<Value> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage_class = raw.type_info().name().to_string();

    let value = match storage_class.as_str() {
        "INTEGER" => Value::from(row.try_get::<i64, _>(index)?),
        "BOOLEAN" => Value::from(row.try_get::<bool, _>(index)?),
        "REAL" => serde_json::Number::from_f64(row.try_get::<f64, _>(index)?)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "BLOB" => {
            let bytes: Vec<u8> = row.try_get(index)?;
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => Value::String(row.try_get::<String, _>(index)?),
    };
    Ok(value)
}
