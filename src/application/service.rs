use tracing::{info, warn};

use super::{AppError, ExpenseReport};
use crate::domain::{CurrentUser, DateWindow, ExpenseRecord};
use crate::remote::{ClientConfig, ExpenseQuery, LedgerApi, SplitwiseClient, fetch_all_expenses};

/// What to report on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub window: DateWindow,
    pub group_id: Option<i64>,
    pub page_size: u32,
    /// Currency label for expenses that carry none.
    pub default_currency: String,
}

impl ReportRequest {
    pub fn query(&self) -> ExpenseQuery {
        ExpenseQuery {
            group_id: self.group_id,
            dated_after: self.window.dated_after.clone(),
            dated_before: self.window.dated_before.clone(),
            page_size: self.page_size,
        }
    }
}

/// Application service producing expense reports.
/// This is the primary interface for any client (CLI, tests, other front ends).
pub struct ReportService<A> {
    api: A,
}

impl ReportService<SplitwiseClient> {
    /// Create a service talking to the Splitwise API.
    pub fn connect(config: ClientConfig) -> Result<Self, AppError> {
        Ok(Self::new(SplitwiseClient::new(config)?))
    }
}

impl<A: LedgerApi> ReportService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn current_user(&self) -> Result<CurrentUser, AppError> {
        Ok(self.api.current_user().await?)
    }

    pub async fn fetch_expenses(&self, query: &ExpenseQuery) -> Result<Vec<ExpenseRecord>, AppError> {
        Ok(fetch_all_expenses(&self.api, query).await?)
    }

    /// Look up the user, fetch every matching expense, and aggregate.
    ///
    /// Requests run one after another; the first failure aborts the report.
    pub async fn generate_report(&self, request: &ReportRequest) -> Result<ExpenseReport, AppError> {
        let user = self.current_user().await?;
        info!(user_id = user.id, name = %user.display_name(), "authenticated");

        let expenses = self.fetch_expenses(&request.query()).await?;

        for expense in &expenses {
            if !expense.is_settlement() && !expense.involves(user.id) {
                warn!(
                    id = ?expense.id,
                    description = expense.description.as_deref().unwrap_or(""),
                    "expense has no share entry for the current user"
                );
            }
        }

        Ok(ExpenseReport::build(
            request.window.clone(),
            user.id,
            &expenses,
            &request.default_currency,
        ))
    }
}
