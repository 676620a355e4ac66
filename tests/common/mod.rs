// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::{Result, anyhow, bail};
use serde_json::{Value, json};
use splitwise_report::domain::{CurrentUser, ExpenseRecord};
use splitwise_report::remote::{ExpenseQuery, LedgerApi};
use std::cell::RefCell;

pub const ME: i64 = 1;
pub const FRIEND: i64 = 2;

/// Build an expense from its JSON wire form.
pub fn expense(value: Value) -> ExpenseRecord {
    serde_json::from_value(value).unwrap()
}

/// A plain shared purchase split between me and a friend.
pub fn purchase(currency: &str, category: &str, my_owed: &str, my_paid: &str) -> ExpenseRecord {
    expense(json!({
        "currency_code": currency,
        "category": {"name": category},
        "payment": false,
        "users": [
            {"user": {"id": ME}, "owed_share": my_owed, "paid_share": my_paid},
            {"user": {"id": FRIEND}, "owed_share": "1.00", "paid_share": "0.00"}
        ]
    }))
}

/// A settlement between me and a friend.
pub fn settlement(currency: &str, amount: &str) -> ExpenseRecord {
    expense(json!({
        "currency_code": currency,
        "category": {"name": "Payment"},
        "payment": true,
        "users": [
            {"user": {"id": ME}, "owed_share": "0.00", "paid_share": amount},
            {"user": {"id": FRIEND}, "owed_share": amount, "paid_share": "0.00"}
        ]
    }))
}

/// In-memory ledger serving a fixed list of expenses page by page.
pub struct FakeLedger {
    pub user: Option<CurrentUser>,
    pub expenses: Vec<ExpenseRecord>,
    pub fail_at_offset: Option<u32>,
    pub requests: RefCell<Vec<(ExpenseQuery, u32)>>,
}

impl FakeLedger {
    pub fn new(expenses: Vec<ExpenseRecord>) -> Self {
        Self {
            user: Some(CurrentUser {
                id: ME,
                first_name: Some("Test".into()),
                last_name: None,
            }),
            expenses,
            fail_at_offset: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn offsets(&self) -> Vec<u32> {
        self.requests.borrow().iter().map(|(_, offset)| *offset).collect()
    }
}

impl LedgerApi for FakeLedger {
    async fn current_user(&self) -> Result<CurrentUser> {
        self.user
            .clone()
            .ok_or_else(|| anyhow!("HTTP status client error (401 Unauthorized)"))
    }

    async fn expense_page(&self, query: &ExpenseQuery, offset: u32) -> Result<Vec<ExpenseRecord>> {
        self.requests.borrow_mut().push((query.clone(), offset));
        if self.fail_at_offset == Some(offset) {
            bail!("HTTP status server error (500 Internal Server Error)");
        }
        Ok(self
            .expenses
            .iter()
            .skip(offset as usize)
            .take(query.page_size as usize)
            .cloned()
            .collect())
    }
}
