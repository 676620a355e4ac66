use anyhow::{Context, Result, ensure};
use tracing::{debug, info};

use super::{ExpenseQuery, LedgerApi};
use crate::domain::ExpenseRecord;

/// Fetch every expense matching `query`, one page at a time.
///
/// Pages are requested sequentially; a page shorter than `page_size` ends
/// the listing. Any failed page aborts the whole fetch with no partial result.
pub async fn fetch_all_expenses<A: LedgerApi>(
    api: &A,
    query: &ExpenseQuery,
) -> Result<Vec<ExpenseRecord>> {
    ensure!(query.page_size > 0, "Page size must be at least 1");

    let mut expenses = Vec::new();
    let mut offset: u32 = 0;

    loop {
        let page = api
            .expense_page(query, offset)
            .await
            .with_context(|| format!("Failed to fetch expenses at offset {}", offset))?;

        let page_len = page.len();
        debug!(offset, page_len, "fetched expense page");
        expenses.extend(page);

        if page_len < query.page_size as usize {
            break;
        }
        offset += query.page_size;
    }

    info!(count = expenses.len(), "fetched expenses");
    Ok(expenses)
}
