use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::domain::{Amount, DateWindow, ExpenseRecord, UserId};

/// What the user owes versus what they paid, in one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub currency: String,
    pub owed: Amount,
    pub paid: Amount,
}

/// What the user owes in one category, in one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    pub currency: String,
    pub category: String,
    pub owed: Amount,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseReport {
    pub window: DateWindow,
    pub user_id: UserId,
    pub expense_count: usize,
    pub summary: Vec<SummaryRow>,
    pub categories: Vec<CategoryRow>,
}

impl ExpenseReport {
    pub fn build(
        window: DateWindow,
        user_id: UserId,
        expenses: &[ExpenseRecord],
        default_currency: &str,
    ) -> Self {
        Self {
            window,
            user_id,
            expense_count: expenses.len(),
            summary: aggregate_summary(expenses, user_id, default_currency),
            categories: aggregate_categories(expenses, user_id, default_currency),
        }
    }
}

/// Total owed and total paid per currency, settlements excluded.
///
/// Every non-settlement expense contributes its paid share (zero when the
/// user has no entry), so each currency seen appears in the result.
/// Rows are ordered by currency code.
pub fn aggregate_summary<'a, I>(
    expenses: I,
    user_id: UserId,
    default_currency: &str,
) -> Vec<SummaryRow>
where
    I: IntoIterator<Item = &'a ExpenseRecord>,
{
    let mut owed: BTreeMap<String, Amount> = BTreeMap::new();
    let mut paid: BTreeMap<String, Amount> = BTreeMap::new();

    for expense in expenses {
        if expense.is_settlement() {
            debug!(id = ?expense.id, "skipping settlement");
            continue;
        }
        let currency = expense.currency(default_currency);

        for share in expense.owed_shares(user_id) {
            *owed.entry(currency.to_string()).or_default() += share;
        }
        *paid.entry(currency.to_string()).or_default() += expense.paid_share(user_id);
    }

    let mut currencies: Vec<String> = owed.keys().chain(paid.keys()).cloned().collect();
    currencies.sort();
    currencies.dedup();

    currencies
        .into_iter()
        .map(|currency| SummaryRow {
            owed: owed.get(&currency).copied().unwrap_or_default(),
            paid: paid.get(&currency).copied().unwrap_or_default(),
            currency,
        })
        .collect()
}

/// Total owed per (currency, category), settlements excluded.
///
/// Ordered by currency, then largest total first, then category name.
pub fn aggregate_categories<'a, I>(
    expenses: I,
    user_id: UserId,
    default_currency: &str,
) -> Vec<CategoryRow>
where
    I: IntoIterator<Item = &'a ExpenseRecord>,
{
    let mut totals: BTreeMap<(String, String), Amount> = BTreeMap::new();

    for expense in expenses {
        if expense.is_settlement() {
            continue;
        }
        let currency = expense.currency(default_currency);
        let category = expense.category_name();

        for share in expense.owed_shares(user_id) {
            *totals
                .entry((currency.to_string(), category.to_string()))
                .or_default() += share;
        }
    }

    let mut rows: Vec<CategoryRow> = totals
        .into_iter()
        .map(|((currency, category), owed)| CategoryRow {
            currency,
            category,
            owed,
        })
        .collect();

    rows.sort_by(|a, b| {
        a.currency
            .cmp(&b.currency)
            .then_with(|| b.owed.cmp(&a.owed))
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}
