//! I/O module
//!
//! Handles reading source lines in batches and writing query results.
//!
//! # Components
//!
//! - `batch_reader` - Synchronous batch driver over any `BufRead`
//! - `async_reader` - Asynchronous batch reader over a tokio `AsyncBufRead`
//! - `output` - Query result formatting

pub mod async_reader;
pub mod batch_reader;
pub mod output;

pub use async_reader::AsyncReader;
pub use batch_reader::SyncBatchReader;
pub use output::{
    write_account_balances_csv, write_account_ids, write_balance, write_balance_history_csv,
    write_entries_csv,
};

use crate::types::LedgerError;
use std::io;
use std::path::Path;

/// Map a failure to open a source file
pub(crate) fn open_error(path: &Path, error: io::Error) -> LedgerError {
    match error.kind() {
        io::ErrorKind::NotFound => LedgerError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => LedgerError::Io {
            message: format!("Failed to open file '{}': {}", path.display(), error),
        },
    }
}
