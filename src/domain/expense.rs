use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use super::{Amount, UserId, parse_amount};

/// Category label used when an expense carries no usable category name.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// An expense as returned by the ledger service.
///
/// Field shapes are checked once here, at deserialization. Anything optional
/// or malformed resolves to a documented default so the aggregation code
/// never has to guard against bad data:
/// - `currency_code` absent or empty: caller-supplied fallback
/// - `category` absent, not an object, or without a name: [`UNCATEGORIZED`]
/// - `payment` absent or null: not a settlement
/// - `users` absent or null: no share entries
/// - share amounts absent, null or empty: zero
/// - share amounts that are not decimal numbers: zero, with a warning
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawExpense")]
pub struct ExpenseRecord {
    pub id: Option<i64>,
    pub description: Option<String>,
    pub currency_code: Option<String>,
    pub category: Option<Category>,
    pub payment: bool,
    pub users: Vec<UserShare>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

/// One user's slice of an expense.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserShare {
    /// Taken from the nested `user.id`; `None` never matches any user.
    pub user_id: Option<UserId>,
    pub owed_share: Amount,
    pub paid_share: Amount,
}

/// Wire shape of an expense, before defaults are applied.
#[derive(Deserialize)]
struct RawExpense {
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<i64>,

    #[serde(default, deserialize_with = "lenient")]
    description: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    currency_code: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    category: Option<Category>,

    #[serde(default, deserialize_with = "truthy")]
    payment: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    users: Vec<RawUserShare>,
}

#[derive(Deserialize)]
struct RawUserShare {
    #[serde(rename = "user", default, deserialize_with = "nested_user_id")]
    user_id: Option<UserId>,

    #[serde(default)]
    owed_share: Value,

    #[serde(default)]
    paid_share: Value,
}

impl From<RawExpense> for ExpenseRecord {
    fn from(raw: RawExpense) -> Self {
        let id = raw.id;
        let users = raw
            .users
            .into_iter()
            .map(|entry| UserShare {
                user_id: entry.user_id,
                owed_share: share_amount(&entry.owed_share, id, entry.user_id, "owed_share"),
                paid_share: share_amount(&entry.paid_share, id, entry.user_id, "paid_share"),
            })
            .collect();

        Self {
            id,
            description: raw.description,
            currency_code: raw.currency_code,
            category: raw.category,
            payment: raw.payment,
            users,
        }
    }
}

impl ExpenseRecord {
    /// Settlements are direct reimbursements, not shared purchases.
    pub fn is_settlement(&self) -> bool {
        self.payment
    }

    pub fn currency<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.currency_code.as_deref() {
            Some(code) if !code.is_empty() => code,
            _ => fallback,
        }
    }

    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .unwrap_or(UNCATEGORIZED)
    }

    /// Owed share of every entry belonging to `user_id`, in entry order.
    pub fn owed_shares(&self, user_id: UserId) -> impl Iterator<Item = Amount> + '_ {
        self.entries_for(user_id).map(|entry| entry.owed_share)
    }

    /// Paid share of the first entry belonging to `user_id`, zero if none.
    ///
    /// Unlike [`owed_shares`](Self::owed_shares) only the first match counts:
    /// the service records at most one payer entry per user.
    pub fn paid_share(&self, user_id: UserId) -> Amount {
        self.entries_for(user_id)
            .next()
            .map(|entry| entry.paid_share)
            .unwrap_or_default()
    }

    pub fn involves(&self, user_id: UserId) -> bool {
        self.entries_for(user_id).next().is_some()
    }

    fn entries_for(&self, user_id: UserId) -> impl Iterator<Item = &UserShare> + '_ {
        self.users
            .iter()
            .filter(move |entry| entry.user_id == Some(user_id))
    }
}

/// Accept an integer or an integer-valued string.
pub(crate) fn id_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(id_from_value(&value))
}

fn nested_user_id<'de, D>(deserializer: D) -> Result<Option<UserId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.get("id").and_then(id_from_value))
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn share_amount(
    value: &Value,
    expense_id: Option<i64>,
    user_id: Option<UserId>,
    field: &str,
) -> Amount {
    let parsed = match value {
        Value::Null => Ok(Amount::ZERO),
        Value::String(s) => parse_amount(s),
        Value::Number(n) => parse_amount(&n.to_string()),
        other => parse_amount(&other.to_string()),
    };

    parsed.unwrap_or_else(|err| {
        warn!(?expense_id, ?user_id, field, %err, "malformed share amount, counting it as zero");
        Amount::ZERO
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn record(value: Value) -> ExpenseRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_deserialize_full_record() {
        let expense = record(json!({
            "id": 42,
            "description": "Groceries",
            "currency_code": "EUR",
            "category": {"id": 12, "name": "Food"},
            "payment": false,
            "users": [
                {"user": {"id": 1}, "owed_share": "12.50", "paid_share": "25.00"},
                {"user": {"id": 2}, "owed_share": "12.50", "paid_share": "0.00"}
            ]
        }));

        assert_eq!(expense.id, Some(42));
        assert_eq!(expense.currency("USD"), "EUR");
        assert_eq!(expense.category_name(), "Food");
        assert!(!expense.is_settlement());
        assert_eq!(expense.users.len(), 2);
        assert_eq!(expense.users[1].user_id, Some(2));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let expense = record(json!({"id": 1}));

        assert_eq!(expense.currency("USD"), "USD");
        assert_eq!(expense.category_name(), UNCATEGORIZED);
        assert!(!expense.is_settlement());
        assert!(expense.users.is_empty());
    }

    #[test]
    fn test_null_and_empty_fields_use_defaults() {
        let expense = record(json!({
            "currency_code": "",
            "category": null,
            "payment": null,
            "users": null
        }));

        assert_eq!(expense.currency("GBP"), "GBP");
        assert_eq!(expense.category_name(), UNCATEGORIZED);
        assert!(!expense.is_settlement());
        assert!(expense.users.is_empty());
    }

    #[test]
    fn test_category_without_name_or_not_an_object() {
        assert_eq!(record(json!({"category": {}})).category_name(), UNCATEGORIZED);
        assert_eq!(record(json!({"category": "Food"})).category_name(), UNCATEGORIZED);
        assert_eq!(
            record(json!({"category": {"name": null}})).category_name(),
            UNCATEGORIZED
        );
    }

    #[test]
    fn test_owed_shares_collects_every_match() {
        let expense = record(json!({
            "users": [
                {"user": {"id": 1}, "owed_share": "3.00"},
                {"user": {"id": 2}, "owed_share": "4.00"},
                {"user": {"id": 1}, "owed_share": "5.25"}
            ]
        }));

        let shares: Vec<_> = expense.owed_shares(1).collect();
        assert_eq!(shares, vec![dec!(3.00), dec!(5.25)]);
        assert_eq!(expense.owed_shares(3).count(), 0);
    }

    #[test]
    fn test_paid_share_uses_first_match_only() {
        let expense = record(json!({
            "users": [
                {"user": {"id": 1}, "paid_share": "10.00"},
                {"user": {"id": 1}, "paid_share": "99.00"}
            ]
        }));

        assert_eq!(expense.paid_share(1), dec!(10.00));
        assert_eq!(expense.paid_share(2), Amount::ZERO);
    }

    #[test]
    fn test_missing_or_malformed_user_id_never_matches() {
        let expense = record(json!({
            "users": [
                {"owed_share": "1.00"},
                {"user": {}, "owed_share": "2.00"},
                {"user": {"id": "abc"}, "owed_share": "3.00"},
                {"user": {"id": "7"}, "owed_share": "4.00"}
            ]
        }));

        assert_eq!(expense.users[0].user_id, None);
        assert_eq!(expense.users[1].user_id, None);
        assert_eq!(expense.users[2].user_id, None);
        assert!(!expense.involves(-1));
        let shares: Vec<_> = expense.owed_shares(7).collect();
        assert_eq!(shares, vec![dec!(4.00)]);
    }

    #[test]
    fn test_missing_and_empty_amounts_are_zero() {
        let expense = record(json!({
            "users": [{"user": {"id": 1}, "owed_share": "", "paid_share": null}]
        }));

        assert_eq!(expense.owed_shares(1).collect::<Vec<_>>(), vec![Amount::ZERO]);
        assert_eq!(expense.paid_share(1), Amount::ZERO);
    }

    #[test]
    fn test_malformed_amount_counts_as_zero() {
        let expense = record(json!({
            "id": 9,
            "users": [
                {"user": {"id": 1}, "owed_share": "ten", "paid_share": "4.00"},
                {"user": {"id": 2}, "owed_share": "n/a", "paid_share": {"x": 1}}
            ]
        }));

        assert_eq!(expense.owed_shares(1).collect::<Vec<_>>(), vec![Amount::ZERO]);
        assert_eq!(expense.paid_share(1), dec!(4.00));
        assert_eq!(expense.users[1].owed_share, Amount::ZERO);
        assert_eq!(expense.users[1].paid_share, Amount::ZERO);
    }

    #[test]
    fn test_page_with_malformed_settlement_still_parses() {
        let page: Vec<ExpenseRecord> = serde_json::from_value(json!([
            {
                "payment": true,
                "users": [{"user": {"id": 2}, "owed_share": "n/a", "paid_share": "0"}]
            },
            {
                "currency_code": "USD",
                "users": [{"user": {"id": 1}, "owed_share": "10.00", "paid_share": "10.00"}]
            }
        ]))
        .unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page[1].paid_share(1), dec!(10.00));
    }

    #[test]
    fn test_payment_flag() {
        assert!(record(json!({"payment": true})).is_settlement());
        assert!(!record(json!({"payment": false})).is_settlement());
    }
}
