//! Account entry value type

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

/// One signed amount posted to one account on one date
///
/// Entries are plain values: once built they are never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountEntry {
    /// Signed amount; negative for the debited side of a transaction
    pub amount: Decimal,

    /// Posting date
    pub date: NaiveDate,
}

impl AccountEntry {
    pub fn new(amount: Decimal, date: NaiveDate) -> Self {
        AccountEntry { amount, date }
    }
}

impl fmt::Display for AccountEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.amount)
    }
}
