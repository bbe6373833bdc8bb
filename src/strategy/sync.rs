//! Sequential ingestion strategy
//!
//! This module provides a single-threaded implementation of the
//! ProcessingStrategy trait. It orchestrates ingestion by coordinating the
//! SyncBatchReader (for input) with the AccountRegistry and the
//! TransactionProcessor (for bookkeeping).
//!
//! # Memory Efficiency
//!
//! The source is streamed one batch at a time. Memory usage is
//! O(accounts + dates per account), plus retained entries when requested.

use crate::core::{AccountRegistry, TransactionProcessor};
use crate::io::SyncBatchReader;
use crate::strategy::{ProcessingStrategy, DEFAULT_BATCH_SIZE};
use crate::types::LedgerError;
use log::info;
use std::path::Path;

/// Sequential ingestion strategy
///
/// # Examples
///
/// ```no_run
/// use ledger_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
///
/// let strategy = SyncProcessingStrategy::new(100);
/// let registry = strategy.import(Path::new("transactions.csv"), true).unwrap();
/// println!("{} accounts", registry.len());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy {
    batch_size: usize,
}

impl Default for SyncProcessingStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl SyncProcessingStrategy {
    pub fn new(batch_size: usize) -> Self {
        Self { batch_size }
    }

    fn discover_into(&self, path: &Path, registry: &mut AccountRegistry) -> Result<(), LedgerError> {
        let lines = SyncBatchReader::open(path)?
            .for_each_batch(self.batch_size, |batch| registry.discover_accounts(batch))?;

        info!(
            "Discovery pass over {} lines found {} accounts",
            lines,
            registry.len()
        );
        Ok(())
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn discover(&self, path: &Path) -> Result<AccountRegistry, LedgerError> {
        let mut registry = AccountRegistry::new();
        self.discover_into(path, &mut registry)?;
        Ok(registry)
    }

    /// Discover accounts, then post every line in file order
    ///
    /// Nothing is rolled back on failure; the error carries the failing line.
    fn import(&self, path: &Path, store_entries: bool) -> Result<AccountRegistry, LedgerError> {
        let registry = self.discover(path)?;
        let mut processor = TransactionProcessor::new(registry, store_entries);

        let mut posted = 0;
        let lines = SyncBatchReader::open(path)?.for_each_batch(self.batch_size, |batch| {
            posted += processor.process_batch(batch)?;
            Ok(())
        })?;

        info!(
            "Posting pass over {} lines completed with {} transactions",
            lines, posted
        );
        Ok(processor.into_registry())
    }
}
