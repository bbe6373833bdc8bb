//! Ingestion strategy module
//!
//! This module defines the Strategy pattern for the two-pass ingestion
//! pipeline: account discovery followed by posting. Implementations
//! (sequential, sharded) are selected at runtime and produce identical
//! registries for valid input.

use crate::cli::StrategyType;
use crate::core::AccountRegistry;
use crate::types::LedgerError;
use log::warn;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::AsyncProcessingStrategy;
pub use sync::SyncProcessingStrategy;

/// Default number of lines per batch
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Configuration for batch processing
///
/// Controls how many lines each batch holds and how many worker threads the
/// sharded strategy runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of lines per batch
    pub batch_size: usize,
    /// Number of worker threads for the sharded strategy
    pub max_concurrent: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_concurrent: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size, default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent = if max_concurrent == 0 {
            warn!(
                "Invalid max_concurrent ({}), using default ({})",
                max_concurrent, default.max_concurrent
            );
            default.max_concurrent
        } else {
            max_concurrent
        };

        Self {
            batch_size,
            max_concurrent,
        }
    }
}

/// Ingestion strategy trait
///
/// Both operations read the whole source. A source is read once by
/// `discover` and twice by `import`.
pub trait ProcessingStrategy: Send + Sync {
    /// Run the discovery pass only
    ///
    /// # Returns
    ///
    /// A registry holding every account referenced by the source, in order of
    /// first appearance, with no postings.
    ///
    /// # Errors
    ///
    /// - `FileNotFound` or `Io` if the source cannot be read
    /// - `Format` for a line without exactly four fields
    fn discover(&self, path: &Path) -> Result<AccountRegistry, LedgerError>;

    /// Run the discovery pass, then the posting pass
    ///
    /// # Arguments
    ///
    /// * `path` - Source file of transaction lines
    /// * `store_entries` - Whether postings are retained as entries
    ///
    /// # Errors
    ///
    /// Any error from discovery, plus every posting error. Processing stops
    /// at the first failing line.
    fn import(&self, path: &Path, store_entries: bool) -> Result<AccountRegistry, LedgerError>;
}

/// Create an ingestion strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of strategy to create (Sync or Async)
/// * `config` - Optional batch configuration, defaults when `None`
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    let config = config.unwrap_or_default();
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(config.batch_size)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(config)),
    }
}
