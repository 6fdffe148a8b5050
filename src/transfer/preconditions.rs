// tradesheet/src/transfer/preconditions.rs
use crate::config::TransferConfig;
use crate::db;
use crate::sheets::{SheetsService, ensure_workbook_and_sheet};

const CREDENTIAL_HELP_URL: &str =
    "https://developers.google.com/workspace/guides/create-credentials";

/// The ordered checks gating a transfer. Evaluation is fail-fast: the first
/// failing check aborts the run and nothing after it is executed, so no
/// remote or database call happens past a failed precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    CredentialFile,
    Authorization,
    TargetConfigured,
    RemoteTarget,
    DatabaseFile,
    DatabaseOpens,
}

impl Precondition {
    pub const ALL: [Precondition; 6] = [
        Precondition::CredentialFile,
        Precondition::Authorization,
        Precondition::TargetConfigured,
        Precondition::RemoteTarget,
        Precondition::DatabaseFile,
        Precondition::DatabaseOpens,
    ];

    fn label(self) -> &'static str {
        match self {
            Precondition::CredentialFile => "credential file present",
            Precondition::Authorization => "credential authorized",
            Precondition::TargetConfigured => "target sheet configured",
            Precondition::RemoteTarget => "remote worksheet available",
            Precondition::DatabaseFile => "database file present",
            Precondition::DatabaseOpens => "database opens read-only",
        }
    }
}

/// Success, or the diagnostic line to report for the failing check.
type CheckOutcome = Result<(), String>;

/// Runs all six checks in order, short-circuiting on the first failure.
/// Exactly one ❌ diagnostic line is emitted for a failing run.
pub async fn run_preconditions(svc: &dyn SheetsService, config: &TransferConfig) -> bool {
    for check in Precondition::ALL {
        match evaluate(check, svc, config).await {
            Ok(()) => println!("✓ {}", check.label()),
            Err(diagnostic) => {
                eprintln!("❌ {}", diagnostic);
                return false;
            }
        }
    }
    true
}

pub(crate) async fn evaluate(
    check: Precondition,
    svc: &dyn SheetsService,
    config: &TransferConfig,
) -> CheckOutcome {
    match check {
        Precondition::CredentialFile => {
            if config.credential_file.is_file() {
                Ok(())
            } else {
                Err(format!(
                    "Please create the credential file {} - see {}",
                    config.credential_file.display(),
                    CREDENTIAL_HELP_URL
                ))
            }
        }
        Precondition::Authorization => svc.authorize().await.map_err(|e| {
            format!(
                "The credential file {} could not be authorized, fix or regenerate it ({})",
                config.credential_file.display(),
                e
            )
        }),
        Precondition::TargetConfigured => {
            if config.target_is_configured() {
                Ok(())
            } else {
                Err(
                    "The sheet export is not configured: set workbook_name and worksheet_name \
                     in config.json"
                        .to_string(),
                )
            }
        }
        Precondition::RemoteTarget => {
            match ensure_workbook_and_sheet(svc, &config.workbook_name, &config.worksheet_name)
                .await
            {
                Ok(true) => Ok(()),
                Ok(false) => Err(format!(
                    "Error finding or provisioning worksheet '{}' in workbook '{}'",
                    config.worksheet_name, config.workbook_name
                )),
                Err(e) => Err(format!(
                    "Error finding or provisioning workbook '{}': {}",
                    config.workbook_name, e
                )),
            }
        }
        Precondition::DatabaseFile => {
            if config.database_file.is_file() {
                Ok(())
            } else {
                Err(format!(
                    "Database file {} not found, check the database_file path",
                    config.database_file.display()
                ))
            }
        }
        Precondition::DatabaseOpens => db::check_database_open(&config.database_file)
            .await
            .map_err(|e| {
                format!(
                    "{} is not a compatible SQLite database ({:#})",
                    config.database_file.display(),
                    e
                )
            }),
    }
}
