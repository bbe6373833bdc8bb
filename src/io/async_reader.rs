//! Asynchronous line reader with a batch reading interface
//!
//! Provides batches of trimmed source lines from any tokio `AsyncBufRead`.
//!
//! # Architecture
//!
//! ```text
//! tokio File → BufReader → AsyncReader → Batches of raw lines
//!                                            ↓
//!                                  AsyncAccountRegistry / BatchProcessor
//! ```

use crate::io::open_error;
use crate::types::{Batch, LedgerError};
use log::warn;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

/// Asynchronous batch reader
///
/// Keeps track of the source line number so every batch knows where it
/// starts. Blank lines are kept in place, as with the synchronous reader.
pub struct AsyncReader<R: AsyncBufRead + Unpin> {
    lines: Lines<R>,
    line_num: usize,
}

impl AsyncReader<BufReader<File>> {
    /// Open a file for batch reading
    ///
    /// # Errors
    ///
    /// `FileNotFound` if the path does not exist, `Io` for any other failure.
    pub async fn open(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).await.map_err(|e| open_error(path, e))?;
        Ok(Self::new(BufReader::with_capacity(8 * 1024, file)))
    }
}

impl<R: AsyncBufRead + Unpin> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_num: 0,
        }
    }

    /// Read a batch of up to `batch_size` lines
    ///
    /// A `batch_size` of zero is treated as one.
    ///
    /// # Returns
    ///
    /// A batch shorter than `batch_size` (possibly empty) once the source is
    /// exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Result<Batch, LedgerError> {
        let batch_size = batch_size.max(1);
        let mut batch = Batch::new(self.line_num + 1, Vec::with_capacity(batch_size));

        while batch.len() < batch_size {
            let Some(line) = self.lines.next_line().await? else {
                break;
            };
            self.line_num += 1;

            let line = line.trim();
            if line.is_empty() {
                warn!("Skipping blank line {}", self.line_num);
            }
            batch.lines.push(line.to_string());
        }

        Ok(batch)
    }
}
