//! Account-related types for the ledger engine
//!
//! This module defines the Account structure: its optional entry history and
//! the balance aggregated per posting date.

use super::entry::AccountEntry;
use super::error::LedgerError;
use super::transaction::{AccountId, AMOUNT_SCALE};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// A single account
///
/// Every posting is folded into a per-date balance bucket at write time, so a
/// dated balance is a single map lookup and the total is a sum over dates
/// rather than over entries. Entries themselves are only retained on request.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Identifier as it appears in the source
    id: AccountId,

    /// Retained entries in posting order
    ///
    /// Only postings made with `store = true` end up here.
    entries: Vec<AccountEntry>,

    /// Sum of every amount ever posted, keyed by posting date
    ///
    /// Always reflects all postings, retained or not.
    balances: BTreeMap<NaiveDate, Decimal>,
}

impl Account {
    /// Create an empty account with no entries and no balance buckets
    pub fn new(id: impl Into<AccountId>) -> Self {
        Account {
            id: id.into(),
            entries: Vec::new(),
            balances: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Retained entries in posting order
    pub fn entries(&self) -> &[AccountEntry] {
        &self.entries
    }

    /// Post an amount to this account
    ///
    /// Builds the entry, folds its amount into the balance bucket for `date`
    /// (starting from zero for a new date) and, when `store` is set, appends
    /// it to the retained entries. The entry is returned either way.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if the bucket cannot hold the new sum. The
    /// account is left unchanged in that case.
    pub fn add_entry(
        &mut self,
        amount: Decimal,
        date: NaiveDate,
        store: bool,
    ) -> Result<AccountEntry, LedgerError> {
        let entry = AccountEntry::new(amount, date);

        let bucket = self.balances.get(&date).copied().unwrap_or(Decimal::ZERO);
        let new_bucket = bucket
            .checked_add(entry.amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow(&self.id, date))?;
        self.balances.insert(date, new_bucket);

        if store {
            self.entries.push(entry);
        }

        Ok(entry)
    }

    /// Check that `add_entry(amount, date, _)` would succeed, without posting
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if the bucket for `date` cannot hold the
    /// new sum.
    pub fn can_post(&self, amount: Decimal, date: NaiveDate) -> Result<(), LedgerError> {
        self.balances
            .get(&date)
            .copied()
            .unwrap_or(Decimal::ZERO)
            .checked_add(amount)
            .map(|_| ())
            .ok_or_else(|| LedgerError::arithmetic_overflow(&self.id, date))
    }

    /// Balance on one date, or the lifetime total
    ///
    /// With a date, returns exactly what was posted on that date. A date that
    /// never received a posting is an error rather than zero. Without a date,
    /// returns the sum of all date buckets.
    pub fn get_balance(&self, date: Option<NaiveDate>) -> Result<Decimal, LedgerError> {
        match date {
            Some(date) => self
                .balances
                .get(&date)
                .copied()
                .ok_or_else(|| LedgerError::no_balance_for_date(&self.id, date)),
            None => self.balances.iter().try_fold(
                Decimal::new(0, AMOUNT_SCALE),
                |total, (date, amount)| {
                    total
                        .checked_add(*amount)
                        .ok_or_else(|| LedgerError::arithmetic_overflow(&self.id, *date))
                },
            ),
        }
    }

    /// Per-date balances in ascending date order
    pub fn balance_history(&self) -> impl Iterator<Item = (NaiveDate, Decimal)> + '_ {
        self.balances.iter().map(|(date, amount)| (*date, *amount))
    }
}
