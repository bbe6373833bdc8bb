//! Query execution
//!
//! Every query imports the source through the selected strategy, then writes
//! its result to the given output.

use crate::core::AccountRegistry;
use crate::io::{
    write_account_balances_csv, write_account_ids, write_balance, write_balance_history_csv,
    write_entries_csv,
};
use crate::strategy::ProcessingStrategy;
use crate::types::{Account, AccountId, LedgerError};
use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;

/// A question asked of the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Every account with its total balance
    Summary,
    /// Account identifiers in creation order
    PrintAccounts,
    /// Total balance, or the balance on one date
    AccountBalance {
        account: AccountId,
        date: Option<NaiveDate>,
    },
    /// Retained entries of one account
    AccountEntries(AccountId),
    /// Per-date balances of one account
    BalanceHistory(AccountId),
}

/// Answer a query over the source file
///
/// Listing accounts only runs the discovery pass. Every other query runs
/// both passes, so any bad line in the source fails the query.
///
/// # Errors
///
/// Any ingestion error, `UnknownAccount` for a query naming an account that
/// the source never mentions, or `NoBalanceForDate` for a dated balance on a
/// date without postings.
pub fn execute(
    query: &Query,
    source: &Path,
    strategy: &dyn ProcessingStrategy,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    match query {
        Query::PrintAccounts => write_account_ids(&strategy.discover(source)?, output),
        Query::Summary => write_account_balances_csv(&strategy.import(source, false)?, output),
        Query::AccountBalance { account, date } => {
            let registry = strategy.import(source, false)?;
            let balance = lookup(&registry, account)?.get_balance(*date)?;
            write_balance(balance, output)
        }
        Query::AccountEntries(account) => {
            let registry = strategy.import(source, true)?;
            write_entries_csv(lookup(&registry, account)?, output)
        }
        Query::BalanceHistory(account) => {
            let registry = strategy.import(source, false)?;
            write_balance_history_csv(lookup(&registry, account)?, output)
        }
    }
}

fn lookup<'a>(registry: &'a AccountRegistry, id: &str) -> Result<&'a Account, LedgerError> {
    registry
        .get(id)
        .ok_or_else(|| LedgerError::unknown_account(id))
}
