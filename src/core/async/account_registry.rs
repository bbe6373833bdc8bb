//! Thread-safe account registry for sharded batch processing
//!
//! This module provides the `AsyncAccountRegistry` struct, which holds accounts
//! in a concurrent map so that postings to different accounts can proceed in
//! parallel.
//!
//! # Design
//!
//! The `AsyncAccountRegistry` uses `DashMap` (a concurrent HashMap) with
//! per-shard locking. A posting holds the write lock of the shard that holds
//! its account for the duration of `add_entry`. This serializes postings to
//! that account. Accounts in other shards are not blocked; accounts that
//! share the shard wait for the lock.
//!
//! Creation order is tracked with a sequence number per account, because the
//! map itself does not preserve insertion order.

use crate::core::account_registry::{discover_account_ids, AccountRegistry};
use crate::types::{Account, AccountEntry, AccountId, Batch, LedgerError};
use chrono::NaiveDate;
use dashmap::DashMap;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};

/// An account together with its creation sequence number
#[derive(Debug)]
struct Slot {
    sequence: u64,
    account: Account,
}

/// Thread-safe account registry for sharded batch processing
///
/// # Thread Safety
///
/// All methods take `&self` and are safe to call from multiple threads:
/// - Postings to accounts in different shards don't block each other
/// - Postings to the same account are serialized by its shard lock
///
/// Account creation is expected to finish (the discovery pass) before any
/// posting begins.
#[derive(Debug, Default)]
pub struct AsyncAccountRegistry {
    /// Concurrent map of identifiers to accounts
    accounts: DashMap<AccountId, Slot>,

    /// Next creation sequence number
    next_sequence: AtomicU64,
}

impl AsyncAccountRegistry {
    /// Create a new empty AsyncAccountRegistry
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            next_sequence: AtomicU64::new(0),
        }
    }

    /// Create an account, replacing any account with the same identifier
    ///
    /// A replaced account keeps its original creation position.
    pub fn create(&self, id: &str) {
        let mut replaced = false;

        self.accounts
            .entry(id.to_string())
            .and_modify(|slot| {
                slot.account = Account::new(id);
                replaced = true;
            })
            .or_insert_with(|| Slot {
                sequence: self.next_sequence.fetch_add(1, Ordering::Relaxed),
                account: Account::new(id),
            });

        if replaced {
            warn!("Account '{}' already exists, replacing it", id);
        } else {
            debug!("Creating account '{}'", id);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.accounts.contains_key(id)
    }

    /// Snapshot of an account, or `None` if it was never created
    pub fn get(&self, id: &str) -> Option<Account> {
        self.accounts.get(id).map(|slot| slot.account.clone())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Identifiers in creation order
    pub fn account_ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<(u64, AccountId)> = self
            .accounts
            .iter()
            .map(|entry| (entry.value().sequence, entry.key().clone()))
            .collect();
        ids.sort_by_key(|(sequence, _)| *sequence);
        ids.into_iter().map(|(_, id)| id).collect()
    }

    /// Post an amount to one account
    ///
    /// Holds the write lock of the account's shard while the amount is folded in.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAccount` if the account was never created, or
    /// `ArithmeticOverflow` from the account itself.
    pub fn post(
        &self,
        id: &str,
        amount: Decimal,
        date: NaiveDate,
        store: bool,
    ) -> Result<AccountEntry, LedgerError> {
        let mut slot = self
            .accounts
            .get_mut(id)
            .ok_or_else(|| LedgerError::unknown_account(id))?;
        slot.account.add_entry(amount, date, store)
    }

    /// Create every account referenced by a batch that is not yet registered
    pub fn discover_accounts(&self, batch: &Batch) -> Result<(), LedgerError> {
        for id in discover_account_ids(batch)? {
            if !self.contains(&id) {
                self.create(&id);
            }
        }
        Ok(())
    }

    /// Convert into a sequential registry, keeping creation order
    pub fn into_registry(self) -> AccountRegistry {
        let mut slots: Vec<Slot> = self.accounts.into_iter().map(|(_, slot)| slot).collect();
        slots.sort_by_key(|slot| slot.sequence);

        let mut registry = AccountRegistry::new();
        for slot in slots {
            registry.insert(slot.account);
        }
        registry
    }
}
