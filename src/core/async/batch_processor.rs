//! Batch processing with account-based partitioning for sharded ingestion
//!
//! This module provides the `BatchProcessor` struct, which posts a batch of
//! transactions by splitting every transaction into its two legs and handing
//! each account's legs to its own task.
//!
//! # Design
//!
//! Postings to different accounts touch disjoint state, so they run
//! concurrently. Postings to one account stay in source order inside a single
//! task. Once all tasks have joined, the two legs of every transaction are
//! matched up again and checked for the zero-sum invariant.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── Arc<AsyncAccountRegistry>  (shared account state)
//!     └── store_entries              (whether entries are retained)
//! ```
//!
//! # Failure behavior
//!
//! Every line of a batch is parsed and its accounts are checked before any
//! task is spawned, so a malformed line or an unknown account leaves the
//! whole batch unposted. A failure inside a task (arithmetic overflow) is
//! reported after the join; postings made by other tasks stay in place.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use log::debug;
use rust_decimal::Decimal;

use super::AsyncAccountRegistry;
use crate::core::processor::check_zero_sum;
use crate::types::{AccountEntry, AccountId, Batch, LedgerError, Transaction};

/// Side of a transaction a posting belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    /// Negative amount on the source account
    Debit,
    /// Positive amount on the destination account
    Credit,
}

/// One leg of one transaction, addressed to a single account
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    /// Position of the transaction within its batch
    pub index: usize,
    pub leg: Leg,
    /// Signed amount to post
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// Batch processor with account-based partitioning
///
/// Cloning is cheap: clones share the same registry.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Shared account state
    registry: Arc<AsyncAccountRegistry>,

    /// Whether postings are retained as entries on their accounts
    store_entries: bool,
}

impl BatchProcessor {
    /// Create a new BatchProcessor
    ///
    /// # Arguments
    ///
    /// * `registry` - Registry whose accounts have already been discovered
    /// * `store_entries` - Whether posted entries are retained
    pub fn new(registry: Arc<AsyncAccountRegistry>, store_entries: bool) -> Self {
        Self {
            registry,
            store_entries,
        }
    }

    pub fn registry(&self) -> &Arc<AsyncAccountRegistry> {
        &self.registry
    }

    /// Split transactions into per-account posting lists
    ///
    /// # Guarantees
    ///
    /// - Every transaction yields exactly one debit and one credit
    /// - Postings for each account keep their source order
    /// - A self-transfer puts both legs on the same account, debit first
    pub fn partition_by_account(
        &self,
        transactions: &[Transaction],
    ) -> HashMap<AccountId, Vec<Posting>> {
        let mut partitions: HashMap<AccountId, Vec<Posting>> = HashMap::new();

        for (index, trx) in transactions.iter().enumerate() {
            partitions
                .entry(trx.source_id.clone())
                .or_default()
                .push(Posting {
                    index,
                    leg: Leg::Debit,
                    amount: -trx.amount,
                    date: trx.date,
                });
            partitions
                .entry(trx.dest_id.clone())
                .or_default()
                .push(Posting {
                    index,
                    leg: Leg::Credit,
                    amount: trx.amount,
                    date: trx.date,
                });
        }

        partitions
    }

    /// Post all legs for a single account in order
    ///
    /// Stops at the first failing posting.
    pub async fn post_account(
        &self,
        account: &str,
        postings: Vec<Posting>,
    ) -> Result<Vec<(Posting, AccountEntry)>, LedgerError> {
        let mut posted = Vec::with_capacity(postings.len());

        for posting in postings {
            let entry =
                self.registry
                    .post(account, posting.amount, posting.date, self.store_entries)?;
            posted.push((posting, entry));
        }

        Ok(posted)
    }

    /// Post a batch of raw lines with account-based partitioning
    ///
    /// This method processes a batch by:
    /// 1. Parsing every line and checking that both accounts exist
    /// 2. Partitioning the legs by account
    /// 3. Spawning one tokio task per account
    /// 4. Waiting for all tasks, then checking each transaction sums to zero
    ///
    /// # Returns
    ///
    /// The number of transactions posted.
    ///
    /// # Errors
    ///
    /// - `Format` or `UnknownAccount` tagged with the line number; nothing
    ///   from the batch is posted
    /// - `ArithmeticOverflow` from a posting task
    /// - `TaskFailed` if a task panicked or a leg went missing
    /// - `InvariantViolation` if a transaction's legs do not cancel out
    pub async fn process_batch(&self, batch: Batch) -> Result<usize, LedgerError> {
        let mut transactions = Vec::with_capacity(batch.len());
        let mut line_numbers = Vec::with_capacity(batch.len());

        for (number, line) in batch.numbered() {
            let trx = Transaction::parse_line(line, number)?;
            for id in [&trx.source_id, &trx.dest_id] {
                if !self.registry.contains(id) {
                    return Err(LedgerError::unknown_account(id).at_line(number));
                }
            }
            transactions.push(trx);
            line_numbers.push(number);
        }

        if transactions.is_empty() {
            return Ok(0);
        }

        let partitions = self.partition_by_account(&transactions);
        let tasks = partitions.into_iter().map(|(account, postings)| {
            let processor = self.clone();
            tokio::spawn(async move { processor.post_account(&account, postings).await })
        });

        let mut legs: Vec<(Option<AccountEntry>, Option<AccountEntry>)> =
            vec![(None, None); transactions.len()];

        for joined in join_all(tasks).await {
            let posted = joined.map_err(|e| LedgerError::TaskFailed {
                message: e.to_string(),
            })??;

            for (posting, entry) in posted {
                let slot = &mut legs[posting.index];
                match posting.leg {
                    Leg::Debit => slot.0 = Some(entry),
                    Leg::Credit => slot.1 = Some(entry),
                }
            }
        }

        for (pair, number) in legs.iter().zip(&line_numbers) {
            match pair {
                (Some(debit), Some(credit)) => check_zero_sum(debit, credit)?,
                _ => {
                    return Err(LedgerError::TaskFailed {
                        message: format!("transaction at line {} was not fully posted", number),
                    })
                }
            }
        }

        debug!(
            "Posted {} transactions starting at line {}",
            transactions.len(),
            batch.start_line
        );
        Ok(transactions.len())
    }
}
