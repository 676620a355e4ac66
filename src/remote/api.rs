use anyhow::Result;

use crate::domain::{CurrentUser, ExpenseRecord};

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// Filters for one expense listing. Date bounds are inclusive `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseQuery {
    pub group_id: Option<i64>,
    pub dated_after: Option<String>,
    pub dated_before: Option<String>,
    pub page_size: u32,
}

impl Default for ExpenseQuery {
    fn default() -> Self {
        Self {
            group_id: None,
            dated_after: None,
            dated_before: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ExpenseQuery {
    /// Query string for the page starting at `offset`.
    pub fn params(&self, offset: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("limit", self.page_size.to_string()),
            ("offset", offset.to_string()),
        ];
        if let Some(group_id) = self.group_id {
            params.push(("group_id", group_id.to_string()));
        }
        if let Some(after) = self.dated_after.as_deref().filter(|d| !d.is_empty()) {
            params.push(("dated_after", after.to_string()));
        }
        if let Some(before) = self.dated_before.as_deref().filter(|d| !d.is_empty()) {
            params.push(("dated_before", before.to_string()));
        }
        params
    }
}

/// Read access to the remote ledger.
///
/// Each call is a single request; pagination lives in
/// [`fetch_all_expenses`](super::fetch_all_expenses).
#[allow(async_fn_in_trait)]
pub trait LedgerApi {
    /// The user the credential belongs to.
    async fn current_user(&self) -> Result<CurrentUser>;

    /// At most `query.page_size` expenses starting at `offset`.
    async fn expense_page(&self, query: &ExpenseQuery, offset: u32) -> Result<Vec<ExpenseRecord>>;
}
