// tradesheet/src/sheets/provision.rs
use super::{DEFAULT_SHEET, PROCESSING_SHEET, SUMMARY_SHEET, SheetsService, WorkbookRef};
use crate::errors::Result;

/// Ensures the named workbook exists and contains the target worksheet,
/// provisioning whatever is missing. Returns `Ok(false)` when the target is
/// still absent after one provisioning round — the lookup is re-verified
/// exactly once, so a persistently failing remote cannot loop forever.
///
/// A freshly shaped workbook carries exactly the fixed layout: a "Summary"
/// sheet, the target worksheet, and a "data processing" sheet.
pub async fn ensure_workbook_and_sheet(
    svc: &dyn SheetsService,
    workbook_name: &str,
    worksheet_name: &str,
) -> Result<bool> {
    let mut provisioned = false;
    loop {
        match svc.find_workbook(workbook_name).await? {
            Some(workbook) => {
                let titles = svc.worksheet_titles(&workbook).await?;
                if titles.iter().any(|t| t == worksheet_name) {
                    return Ok(true);
                }
                if provisioned {
                    return Ok(false);
                }
                println!(
                    "⚙️ Workbook '{}' is missing worksheet '{}', provisioning...",
                    workbook_name, worksheet_name
                );
                provision_worksheets(svc, &workbook, worksheet_name, &titles).await?;
            }
            None => {
                if provisioned {
                    return Ok(false);
                }
                println!("⚙️ Workbook '{}' not found, creating it...", workbook_name);
                let workbook = svc.create_workbook(workbook_name).await?;
                shape_new_workbook(svc, &workbook, worksheet_name).await?;
                println!("✓ Created workbook '{}'", workbook_name);
            }
        }
        provisioned = true;
    }
}

/// Shapes a just-created workbook into the fixed starting layout. The
/// service hands us a single default placeholder tab; it becomes the
/// "Summary" sheet and the rest are added after it.
async fn shape_new_workbook(
    svc: &dyn SheetsService,
    workbook: &WorkbookRef,
    worksheet_name: &str,
) -> Result<()> {
    svc.rename_worksheet(workbook, DEFAULT_SHEET, SUMMARY_SHEET)
        .await?;
    svc.add_worksheet(workbook, worksheet_name).await?;
    svc.add_worksheet(workbook, PROCESSING_SHEET).await?;
    Ok(())
}

/// Adds the members of the required sheet set that are absent from an
/// existing workbook, then drops the default placeholder tab if it lingers.
/// Unrelated worksheets are left untouched.
async fn provision_worksheets(
    svc: &dyn SheetsService,
    workbook: &WorkbookRef,
    worksheet_name: &str,
    existing: &[String],
) -> Result<()> {
    let required = [SUMMARY_SHEET, worksheet_name, PROCESSING_SHEET];
    for title in required {
        if !existing.iter().any(|t| t == title) {
            svc.add_worksheet(workbook, title).await?;
            println!("✓ Added worksheet '{}'", title);
        }
    }
    // The placeholder is only removed when it is not itself the target.
    if worksheet_name != DEFAULT_SHEET && existing.iter().any(|t| t == DEFAULT_SHEET) {
        svc.delete_worksheet(workbook, DEFAULT_SHEET).await?;
        println!("✓ Removed default worksheet '{}'", DEFAULT_SHEET);
    }
    Ok(())
}
