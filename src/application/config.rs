use chrono::NaiveDate;
use std::time::Duration;

use super::{AppError, ReportRequest};
use crate::domain::DateWindow;
use crate::remote::ClientConfig;

/// Environment variable consulted for the API token.
pub const TOKEN_ENV: &str = "SPLITWISE_TOKEN";

pub const DEFAULT_CURRENCY: &str = "USD";

/// Everything a report run needs, resolved up front.
///
/// Building one performs all validation, so a run that gets this far only
/// fails on the ledger service side.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub client: ClientConfig,
    pub request: ReportRequest,
}

/// Raw, unvalidated settings as collected from flags and environment.
#[derive(Debug, Clone, Default)]
pub struct ReportSettings {
    pub token: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub page_size: u32,
    pub group_id: Option<i64>,
    pub dated_after: Option<String>,
    pub dated_before: Option<String>,
    pub currency: String,
}

impl ReportConfig {
    /// Validate `settings`, resolving the date window against `today`.
    pub fn resolve(settings: ReportSettings, today: NaiveDate) -> Result<Self, AppError> {
        let token = settings
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or(AppError::MissingToken(TOKEN_ENV))?;

        if settings.page_size == 0 {
            return Err(AppError::InvalidPageSize(settings.page_size));
        }
        if settings.timeout_secs == 0 {
            return Err(AppError::InvalidTimeout(settings.timeout_secs));
        }

        let window = DateWindow::resolve(settings.dated_after, settings.dated_before, today)?;

        Ok(Self {
            client: ClientConfig {
                token,
                base_url: settings.base_url,
                timeout: Duration::from_secs(settings.timeout_secs),
            },
            request: ReportRequest {
                window,
                group_id: settings.group_id,
                page_size: settings.page_size,
                default_currency: settings.currency,
            },
        })
    }
}
