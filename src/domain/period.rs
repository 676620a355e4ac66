use chrono::{Datelike, NaiveDate};
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// First and last calendar day of the month containing `reference`.
pub fn month_bounds(reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(reference.year(), reference.month(), 1)
        .unwrap_or(reference);
    let next_month = if reference.month() == 12 {
        NaiveDate::from_ymd_opt(reference.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(reference.year(), reference.month() + 1, 1)
    };
    let end = next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(reference);
    (start, end)
}

/// Month bounds of `reference` as inclusive `YYYY-MM-DD` strings.
/// Example: 2024-02-10 -> ("2024-02-01", "2024-02-29")
pub fn current_month_range(reference: NaiveDate) -> (String, String) {
    let (start, end) = month_bounds(reference);
    (
        start.format(DATE_FORMAT).to_string(),
        end.format(DATE_FORMAT).to_string(),
    )
}

/// Inclusive date filter sent to the ledger service.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DateWindow {
    pub dated_after: Option<String>,
    pub dated_before: Option<String>,
}

impl DateWindow {
    /// Resolve the filter the report runs with.
    ///
    /// Empty bounds count as absent. When neither bound is given the window
    /// is the month containing `today`. Given bounds are kept as-is (one side
    /// may stay open) after checking they are `YYYY-MM-DD` dates.
    pub fn resolve(
        dated_after: Option<String>,
        dated_before: Option<String>,
        today: NaiveDate,
    ) -> Result<Self, InvalidDateError> {
        let dated_after = dated_after.filter(|d| !d.trim().is_empty());
        let dated_before = dated_before.filter(|d| !d.trim().is_empty());

        if dated_after.is_none() && dated_before.is_none() {
            let (start, end) = current_month_range(today);
            return Ok(Self {
                dated_after: Some(start),
                dated_before: Some(end),
            });
        }

        for date in dated_after.iter().chain(dated_before.iter()) {
            NaiveDate::parse_from_str(date, DATE_FORMAT)
                .map_err(|_| InvalidDateError(date.clone()))?;
        }

        Ok(Self {
            dated_after,
            dated_before,
        })
    }

    pub fn describe(&self) -> String {
        format!(
            "{}  →  {}",
            self.dated_after.as_deref().unwrap_or("(open)"),
            self.dated_before.as_deref().unwrap_or("(open)")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDateError(pub String);

impl fmt::Display for InvalidDateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid date format '{}', use YYYY-MM-DD", self.0)
    }
}

impl std::error::Error for InvalidDateError {}
