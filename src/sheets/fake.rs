// tradesheet/src/sheets/fake.rs
//! In-memory [`SheetsService`] used by the precondition, provisioner, and
//! orchestrator tests. Records every call so tests can assert which remote
//! operations ran and in what order.
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{DEFAULT_SHEET, SheetsService, WorkbookRef};
use crate::errors::{AppError, Result};

#[derive(Default)]
struct FakeState {
    // Workbook name -> worksheet titles, in tab order.
    workbooks: Vec<(String, Vec<String>)>,
    // (workbook, worksheet) -> grid of values.
    cells: HashMap<(String, String), Vec<Vec<Value>>>,
    calls: Vec<String>,
    fail_authorize: bool,
    drop_created_worksheets: bool,
}

pub struct FakeSheets {
    state: Mutex<FakeState>,
}

impl FakeSheets {
    pub fn new() -> Self {
        FakeSheets {
            state: Mutex::new(FakeState::default()),
        }
    }

    pub fn set_fail_authorize(&self, fail: bool) {
        self.state.lock().unwrap().fail_authorize = fail;
    }

    /// When set, `add_worksheet` records the call but adds nothing, so
    /// provisioning re-verification keeps missing its target.
    pub fn set_drop_created_worksheets(&self, drop: bool) {
        self.state.lock().unwrap().drop_created_worksheets = drop;
    }

    pub fn seed_workbook(&self, name: &str, sheets: &[&str]) {
        let mut state = self.state.lock().unwrap();
        state
            .workbooks
            .push((name.to_string(), sheets.iter().map(|s| s.to_string()).collect()));
    }

    pub fn seed_cells(&self, workbook: &str, sheet: &str, grid: Vec<Vec<Value>>) {
        let mut state = self.state.lock().unwrap();
        state
            .cells
            .insert((workbook.to_string(), sheet.to_string()), grid);
    }

    pub fn sheet_titles(&self, workbook: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .workbooks
            .iter()
            .find(|(name, _)| name == workbook)
            .map(|(_, sheets)| sheets.clone())
            .unwrap_or_default()
    }

    pub fn cells(&self, workbook: &str, sheet: &str) -> Vec<Vec<Value>> {
        let state = self.state.lock().unwrap();
        state
            .cells
            .get(&(workbook.to_string(), sheet.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    pub fn call_log(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_call_log(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl SheetsService for FakeSheets {
    async fn authorize(&self) -> Result<()> {
        self.record("authorize".to_string());
        if self.state.lock().unwrap().fail_authorize {
            return Err(AppError::Authorization("fake credential rejected".to_string()));
        }
        Ok(())
    }

    async fn find_workbook(&self, name: &str) -> Result<Option<WorkbookRef>> {
        self.record(format!("find_workbook:{}", name));
        let state = self.state.lock().unwrap();
        Ok(state
            .workbooks
            .iter()
            .find(|(wb, _)| wb == name)
            .map(|(wb, _)| WorkbookRef {
                id: wb.clone(),
                name: wb.clone(),
            }))
    }

    async fn create_workbook(&self, name: &str) -> Result<WorkbookRef> {
        self.record(format!("create_workbook:{}", name));
        let mut state = self.state.lock().unwrap();
        state
            .workbooks
            .push((name.to_string(), vec![DEFAULT_SHEET.to_string()]));
        Ok(WorkbookRef {
            id: name.to_string(),
            name: name.to_string(),
        })
    }

    async fn worksheet_titles(&self, workbook: &WorkbookRef) -> Result<Vec<String>> {
        self.record(format!("worksheet_titles:{}", workbook.name));
        let state = self.state.lock().unwrap();
        state
            .workbooks
            .iter()
            .find(|(wb, _)| *wb == workbook.name)
            .map(|(_, sheets)| sheets.clone())
            .ok_or_else(|| AppError::WorkbookNotFound(workbook.name.clone()))
    }

    async fn add_worksheet(&self, workbook: &WorkbookRef, title: &str) -> Result<()> {
        self.record(format!("add_worksheet:{}/{}", workbook.name, title));
        let mut state = self.state.lock().unwrap();
        if state.drop_created_worksheets {
            return Ok(());
        }
        let sheets = state
            .workbooks
            .iter_mut()
            .find(|(wb, _)| *wb == workbook.name)
            .map(|(_, sheets)| sheets)
            .ok_or_else(|| AppError::WorkbookNotFound(workbook.name.clone()))?;
        sheets.push(title.to_string());
        Ok(())
    }

    async fn delete_worksheet(&self, workbook: &WorkbookRef, title: &str) -> Result<()> {
        self.record(format!("delete_worksheet:{}/{}", workbook.name, title));
        let mut state = self.state.lock().unwrap();
        let sheets = state
            .workbooks
            .iter_mut()
            .find(|(wb, _)| *wb == workbook.name)
            .map(|(_, sheets)| sheets)
            .ok_or_else(|| AppError::WorkbookNotFound(workbook.name.clone()))?;
        sheets.retain(|t| t != title);
        Ok(())
    }

    async fn rename_worksheet(&self, workbook: &WorkbookRef, from: &str, to: &str) -> Result<()> {
        self.record(format!("rename_worksheet:{}/{}->{}", workbook.name, from, to));
        let mut state = self.state.lock().unwrap();
        let sheets = state
            .workbooks
            .iter_mut()
            .find(|(wb, _)| *wb == workbook.name)
            .map(|(_, sheets)| sheets)
            .ok_or_else(|| AppError::WorkbookNotFound(workbook.name.clone()))?;
        let slot = sheets
            .iter_mut()
            .find(|t| *t == from)
            .ok_or_else(|| AppError::WorksheetNotFound(from.to_string()))?;
        *slot = to.to_string();
        Ok(())
    }

    async fn clear_worksheet(&self, workbook: &WorkbookRef, title: &str) -> Result<()> {
        self.record(format!("clear_worksheet:{}/{}", workbook.name, title));
        let mut state = self.state.lock().unwrap();
        state
            .cells
            .insert((workbook.name.clone(), title.to_string()), Vec::new());
        Ok(())
    }

    async fn write_rows(
        &self,
        workbook: &WorkbookRef,
        title: &str,
        header: &[String],
        rows: &[Vec<Value>],
    ) -> Result<()> {
        self.record(format!("write_rows:{}/{}", workbook.name, title));
        let mut grid: Vec<Vec<Value>> = Vec::with_capacity(rows.len() + 1);
        grid.push(header.iter().map(|h| Value::String(h.clone())).collect());
        grid.extend(rows.iter().cloned());

        let mut state = self.state.lock().unwrap();
        state
            .cells
            .insert((workbook.name.clone(), title.to_string()), grid);
        Ok(())
    }
}
