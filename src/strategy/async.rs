//! Sharded ingestion strategy
//!
//! This module provides a multi-threaded implementation of the
//! ProcessingStrategy trait built on a tokio runtime.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent)
//!     ├── AsyncReader (batch line reading)
//!     ├── AsyncAccountRegistry (DashMap account state)
//!     └── BatchProcessor (account partitioning + one task per account)
//! ```
//!
//! # Ordering
//!
//! - Discovery finishes before any posting starts
//! - Batches are processed one after another in file order
//! - Within a batch, each account's postings run in file order on one task
//! - Postings to different accounts run in parallel

use crate::core::r#async::{AsyncAccountRegistry, BatchProcessor};
use crate::core::AccountRegistry;
use crate::io::AsyncReader;
use crate::strategy::{BatchConfig, ProcessingStrategy};
use crate::types::LedgerError;
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Sharded ingestion strategy
///
/// # Configuration
///
/// - `batch_size`: Number of lines per batch (default: 100)
/// - `max_concurrent`: Number of runtime worker threads (default: CPU cores)
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    /// Batch processing configuration
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    fn runtime(&self) -> Result<Runtime, LedgerError> {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent)
            .build()
            .map_err(|e| LedgerError::Io {
                message: format!("Failed to create tokio runtime: {}", e),
            })
    }

    /// Discovery pass into a concurrent registry
    async fn discover_async(&self, path: &Path) -> Result<AsyncAccountRegistry, LedgerError> {
        let registry = AsyncAccountRegistry::new();
        let mut reader = AsyncReader::open(path).await?;
        let batch_size = self.config.batch_size.max(1);
        let mut lines = 0;

        loop {
            let batch = reader.read_batch(batch_size).await?;
            lines += batch.len();
            registry.discover_accounts(&batch)?;

            if batch.len() < batch_size {
                break;
            }
        }

        info!(
            "Discovery pass over {} lines found {} accounts",
            lines,
            registry.len()
        );
        Ok(registry)
    }

    /// Posting pass over an already discovered registry
    async fn post_async(
        &self,
        path: &Path,
        registry: Arc<AsyncAccountRegistry>,
        store_entries: bool,
    ) -> Result<(), LedgerError> {
        let processor = BatchProcessor::new(registry, store_entries);
        let mut reader = AsyncReader::open(path).await?;
        let batch_size = self.config.batch_size.max(1);
        let mut posted = 0;

        loop {
            let batch = reader.read_batch(batch_size).await?;
            let last = batch.len() < batch_size;

            // Wait for the whole batch before reading the next one so that
            // postings to one account stay in file order across batches
            let count = processor.process_batch(batch).await?;
            debug!("Batch posted {} transactions", count);
            posted += count;

            if last {
                break;
            }
        }

        info!("Posting pass completed with {} transactions", posted);
        Ok(())
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn discover(&self, path: &Path) -> Result<AccountRegistry, LedgerError> {
        let registry = self.runtime()?.block_on(self.discover_async(path))?;
        Ok(registry.into_registry())
    }

    /// Discover accounts, then post every batch with account-level parallelism
    ///
    /// A batch with a malformed line or an unknown account posts nothing.
    /// Earlier batches stay posted.
    fn import(&self, path: &Path, store_entries: bool) -> Result<AccountRegistry, LedgerError> {
        let runtime = self.runtime()?;

        let registry = runtime.block_on(async {
            let registry = Arc::new(self.discover_async(path).await?);
            self.post_async(path, Arc::clone(&registry), store_entries)
                .await?;
            Ok::<_, LedgerError>(registry)
        })?;

        let registry = Arc::try_unwrap(registry).map_err(|_| LedgerError::TaskFailed {
            message: "account registry is still shared after posting".to_string(),
        })?;
        Ok(registry.into_registry())
    }
}
