//! Account registry module
//!
//! This module provides the `AccountRegistry` struct which owns every account
//! of a run and hands them out by identifier.
//!
//! The AccountRegistry is responsible for:
//! - Creating accounts, in the order they are first seen
//! - Looking accounts up without failing on absence
//! - Discovering the accounts referenced by a batch of raw lines

use crate::types::{split_fields, Account, AccountId, Batch, LedgerError};
use log::{debug, warn};
use std::collections::{HashMap, HashSet};

/// Owns all accounts of a run, keyed by identifier
///
/// Accounts are kept in creation order so that listings are deterministic.
#[derive(Debug, Clone, Default)]
pub struct AccountRegistry {
    /// Map of identifiers to positions in `accounts`
    index: HashMap<AccountId, usize>,

    /// Accounts in creation order
    accounts: Vec<Account>,
}

impl AccountRegistry {
    /// Create a new AccountRegistry with no accounts
    pub fn new() -> Self {
        AccountRegistry {
            index: HashMap::new(),
            accounts: Vec::new(),
        }
    }

    /// Create an account and return it
    ///
    /// An existing account with the same identifier is replaced by a fresh
    /// one, discarding its entries and balances. The replacement keeps the
    /// original position in the creation order.
    pub fn create(&mut self, id: &str) -> &mut Account {
        self.insert(Account::new(id))
    }

    /// Register an account, replacing any account with the same identifier
    ///
    /// Replacement keeps the original position in the creation order.
    pub fn insert(&mut self, account: Account) -> &mut Account {
        let position = match self.index.get(account.id()).copied() {
            Some(position) => {
                warn!("Account '{}' already exists, replacing it", account.id());
                self.accounts[position] = account;
                position
            }
            None => {
                debug!("Creating account '{}'", account.id());
                self.index
                    .insert(account.id().to_string(), self.accounts.len());
                self.accounts.push(account);
                self.accounts.len() - 1
            }
        };

        &mut self.accounts[position]
    }

    /// Look up an account, returning `None` if it was never created
    pub fn get(&self, id: &str) -> Option<&Account> {
        self.index.get(id).map(|&position| &self.accounts[position])
    }

    /// Look up an account for posting, returning `None` if it was never created
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Account> {
        self.index
            .get(id)
            .map(|&position| &mut self.accounts[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// All accounts in creation order
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    /// All identifiers in creation order
    pub fn account_ids(&self) -> impl Iterator<Item = &str> {
        self.accounts.iter().map(Account::id)
    }

    /// Create every account referenced by a batch that is not yet registered
    ///
    /// Only the field count and the source/destination fields of each line are
    /// looked at; dates and amounts are not parsed. Running this twice over
    /// the same lines creates nothing the second time.
    pub fn discover_accounts(&mut self, batch: &Batch) -> Result<(), LedgerError> {
        for id in discover_account_ids(batch)? {
            if !self.contains(&id) {
                self.create(&id);
            }
        }
        Ok(())
    }
}

/// Distinct account identifiers referenced by a batch
///
/// Identifiers are returned in order of first appearance, source before
/// destination within a line.
///
/// # Errors
///
/// Returns a `Format` error, tagged with the line number, for a line that
/// does not have exactly four fields.
pub fn discover_account_ids(batch: &Batch) -> Result<Vec<AccountId>, LedgerError> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for (number, line) in batch.numbered() {
        let [_, source_id, dest_id, _] = split_fields(line).map_err(|e| e.at_line(number))?;
        for id in [source_id, dest_id] {
            if seen.insert(id) {
                ids.push(id.to_string());
            }
        }
    }

    Ok(ids)
}
