use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;

/// Money is carried as an exact decimal so repeated sums never drift.
/// The scale of the input is preserved: "10.50" + "0.5" = "11.00".
pub type Amount = Decimal;

/// Parse a decimal amount string as sent by the ledger service.
/// Empty input is zero. Example: "12.34" -> 12.34, "" -> 0
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Decimal::ZERO);
    }

    Decimal::from_str(input).map_err(|_| ParseAmountError::InvalidFormat(input.to_string()))
}

/// Format an amount with exactly two fraction digits, rounding half away from zero.
/// Example: 10 -> "10.00", 2.345 -> "2.35", -1.005 -> "-1.01"
pub fn format_amount(amount: Amount) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(2);
    rounded.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat(String),
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat(s) => write!(f, "invalid money format: '{}'", s),
        }
    }
}

impl std::error::Error for ParseAmountError {}
