// tradesheet/src/sheets/client.rs
use async_trait::async_trait;
use google_drive3::DriveHub;
use google_sheets4::api::{
    AddSheetRequest, BatchUpdateSpreadsheetRequest, ClearValuesRequest, DeleteSheetRequest,
    GridProperties, Request, SheetProperties, Spreadsheet, SpreadsheetProperties,
    UpdateSheetPropertiesRequest, ValueRange,
};
use google_sheets4::{FieldMask, Sheets, hyper, hyper_rustls};
use serde_json::Value;
use std::path::PathBuf;
use tokio::sync::OnceCell;
use yup_oauth2::authenticator::Authenticator;
use yup_oauth2::{ServiceAccountAuthenticator, read_service_account_key};

use super::{NEW_SHEET_COLS, NEW_SHEET_ROWS, SheetsService, WorkbookRef};
use crate::errors::{AppError, Result};

const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

type Connector = hyper_rustls::HttpsConnector<hyper::client::HttpConnector>;

struct Remote {
    sheets: Sheets<Connector>,
    drive: DriveHub<Connector>,
    auth: Authenticator<Connector>,
}

/// Google Sheets/Drive implementation of [`SheetsService`], authenticating
/// with a service account key file. The Drive hub exists because the Sheets
/// API has no open-by-name; workbook names are resolved with a Drive file
/// search.
pub struct GoogleSheetsService {
    credential_path: PathBuf,
    remote: OnceCell<Remote>,
}

impl GoogleSheetsService {
    pub fn new(credential_path: PathBuf) -> Self {
        GoogleSheetsService {
            credential_path,
            remote: OnceCell::new(),
        }
    }

    /// Builds the authenticator and hubs on first use. An unreadable or
    /// unparseable key file is classified as an authorization failure, the
    /// expected recoverable outcome for a bad credential.
    async fn remote(&self) -> Result<&Remote> {
        self.remote
            .get_or_try_init(|| async {
                let key = read_service_account_key(&self.credential_path)
                    .await
                    .map_err(|e| AppError::Authorization(e.to_string()))?;
                let auth = ServiceAccountAuthenticator::builder(key)
                    .build()
                    .await
                    .map_err(|e| AppError::Authorization(e.to_string()))?;

                let connector = hyper_rustls::HttpsConnectorBuilder::new()
                    .with_native_roots()?
                    .https_or_http()
                    .enable_http1()
                    .build();
                let client = hyper::Client::builder().build(connector);

                let sheets = Sheets::new(client.clone(), auth.clone());
                let drive = DriveHub::new(client, auth.clone());
                Ok(Remote {
                    sheets,
                    drive,
                    auth,
                })
            })
            .await
    }

    async fn sheet_id(&self, workbook: &WorkbookRef, title: &str) -> Result<i32> {
        let remote = self.remote().await?;
        let (_, spreadsheet) = remote
            .sheets
            .spreadsheets()
            .get(&workbook.id)
            .doit()
            .await
            .map_err(sheets_err)?;

        spreadsheet
            .sheets
            .unwrap_or_default()
            .into_iter()
            .filter_map(|sheet| sheet.properties)
            .find(|props| props.title.as_deref() == Some(title))
            .and_then(|props| props.sheet_id)
            .ok_or_else(|| AppError::WorksheetNotFound(title.to_string()))
    }

    async fn batch_update(&self, workbook: &WorkbookRef, request: Request) -> Result<()> {
        let remote = self.remote().await?;
        let body = BatchUpdateSpreadsheetRequest {
            requests: Some(vec![request]),
            ..Default::default()
        };
        remote
            .sheets
            .spreadsheets()
            .batch_update(body, &workbook.id)
            .doit()
            .await
            .map_err(sheets_err)?;
        Ok(())
    }
}

#[async_trait]
impl SheetsService for GoogleSheetsService {
    async fn authorize(&self) -> Result<()> {
        let remote = self.remote().await?;
        remote
            .auth
            .token(SCOPES)
            .await
            .map_err(|e| AppError::Authorization(e.to_string()))?;
        Ok(())
    }

    async fn find_workbook(&self, name: &str) -> Result<Option<WorkbookRef>> {
        let remote = self.remote().await?;
        let query = format!(
            "name = '{}' and mimeType = 'application/vnd.google-apps.spreadsheet' and trashed = false",
            name.replace('\'', "\\'")
        );
        let (_, file_list) = remote
            .drive
            .files()
            .list()
            .q(&query)
            .param("fields", "files(id, name)")
            .doit()
            .await
            .map_err(drive_err)?;

        let workbook = file_list
            .files
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|file| WorkbookRef {
                id: file.id.unwrap_or_default(),
                name: file.name.unwrap_or_else(|| name.to_string()),
            });
        Ok(workbook)
    }

    async fn create_workbook(&self, name: &str) -> Result<WorkbookRef> {
        let remote = self.remote().await?;
        let body = Spreadsheet {
            properties: Some(SpreadsheetProperties {
                title: Some(name.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let (_, created) = remote
            .sheets
            .spreadsheets()
            .create(body)
            .doit()
            .await
            .map_err(sheets_err)?;

        let id = created
            .spreadsheet_id
            .ok_or_else(|| AppError::RemoteApi("created spreadsheet has no id".to_string()))?;
        Ok(WorkbookRef {
            id,
            name: name.to_string(),
        })
    }

    async fn worksheet_titles(&self, workbook: &WorkbookRef) -> Result<Vec<String>> {
        let remote = self.remote().await?;
        let (_, spreadsheet) = remote
            .sheets
            .spreadsheets()
            .get(&workbook.id)
            .doit()
            .await
            .map_err(sheets_err)?;

        Ok(spreadsheet
            .sheets
            .unwrap_or_default()
            .into_iter()
            .filter_map(|sheet| sheet.properties.and_then(|props| props.title))
            .collect())
    }

    async fn add_worksheet(&self, workbook: &WorkbookRef, title: &str) -> Result<()> {
        let request = Request {
            add_sheet: Some(AddSheetRequest {
                properties: Some(SheetProperties {
                    title: Some(title.to_string()),
                    grid_properties: Some(GridProperties {
                        row_count: Some(NEW_SHEET_ROWS),
                        column_count: Some(NEW_SHEET_COLS),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
            }),
            ..Default::default()
        };
        self.batch_update(workbook, request).await
    }

    async fn delete_worksheet(&self, workbook: &WorkbookRef, title: &str) -> Result<()> {
        let sheet_id = self.sheet_id(workbook, title).await?;
        let request = Request {
            delete_sheet: Some(DeleteSheetRequest {
                sheet_id: Some(sheet_id),
            }),
            ..Default::default()
        };
        self.batch_update(workbook, request).await
    }

    async fn rename_worksheet(&self, workbook: &WorkbookRef, from: &str, to: &str) -> Result<()> {
        let sheet_id = self.sheet_id(workbook, from).await?;
        let request = Request {
            update_sheet_properties: Some(UpdateSheetPropertiesRequest {
                properties: Some(SheetProperties {
                    sheet_id: Some(sheet_id),
                    title: Some(to.to_string()),
                    ..Default::default()
                }),
                fields: Some(FieldMask::new(&["title"])),
            }),
            ..Default::default()
        };
        self.batch_update(workbook, request).await
    }

    async fn clear_worksheet(&self, workbook: &WorkbookRef, title: &str) -> Result<()> {
        let remote = self.remote().await?;
        remote
            .sheets
            .spreadsheets()
            .values_clear(ClearValuesRequest::default(), &workbook.id, &quoted(title))
            .doit()
            .await
            .map_err(sheets_err)?;
        Ok(())
    }

    async fn write_rows(
        &self,
        workbook: &WorkbookRef,
        title: &str,
        header: &[String],
        rows: &[Vec<Value>],
    ) -> Result<()> {
        let remote = self.remote().await?;

        let mut values: Vec<Vec<Value>> = Vec::with_capacity(rows.len() + 1);
        values.push(header.iter().map(|h| Value::String(h.clone())).collect());
        values.extend(rows.iter().cloned());

        let range = format!("{}!A1", quoted(title));
        let body = ValueRange {
            major_dimension: Some("ROWS".to_string()),
            range: Some(range.clone()),
            values: Some(values),
        };
        remote
            .sheets
            .spreadsheets()
            .values_update(body, &workbook.id, &range)
            .value_input_option("USER_ENTERED")
            .doit()
            .await
            .map_err(sheets_err)?;
        Ok(())
    }
}

/// Quotes a sheet title for use in an A1 range.
fn quoted(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn sheets_err(err: google_sheets4::Error) -> AppError {
    AppError::RemoteApi(err.to_string())
}

fn drive_err(err: google_drive3::Error) -> AppError {
    AppError::RemoteApi(err.to_string())
}
