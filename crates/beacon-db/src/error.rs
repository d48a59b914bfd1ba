use beacon_types::models::ReportStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("{0}")]
    Validation(String),

    #[error("record not found")]
    NotFound,

    #[error("report is {from}, cannot {action} it")]
    InvalidTransition {
        from: ReportStatus,
        action: &'static str,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
