use thiserror::Error;

use crate::domain::InvalidDateError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing API token: provide --token or set {0}")]
    MissingToken(&'static str),

    #[error("Invalid date range: {0}")]
    InvalidDate(#[from] InvalidDateError),

    #[error("Invalid page size: {0} (must be at least 1)")]
    InvalidPageSize(u32),

    #[error("Invalid timeout: {0} seconds (must be at least 1)")]
    InvalidTimeout(u64),

    #[error("Unknown output format: {0} (expected table, json or csv)")]
    UnknownFormat(String),

    /// The whole context chain goes into the message, so no `source` is set.
    #[error("Ledger service error: {0:#}")]
    Remote(anyhow::Error),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Remote(err)
    }
}
