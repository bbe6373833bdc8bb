//! Synchronous line reader with a batch driver interface
//!
//! Streams a source line by line and hands the lines to a callback in groups
//! of up to `batch_size`. After the source is exhausted the callback is called
//! exactly once more with the remainder, which may be empty.
//!
//! Lines are trimmed. Blank lines are kept in their batch so that every batch
//! knows the source line number of each of its lines. The consumers skip them
//! (see `Batch::numbered`) instead of reporting them as malformed.

use crate::io::open_error;
use crate::types::{Batch, LedgerError};
use log::warn;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Synchronous batch reader over any buffered source
#[derive(Debug)]
pub struct SyncBatchReader<R: BufRead> {
    reader: R,
}

impl SyncBatchReader<BufReader<File>> {
    /// Open a file for batch reading
    ///
    /// # Errors
    ///
    /// `FileNotFound` if the path does not exist, `Io` for any other failure.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        Ok(Self::new(BufReader::with_capacity(8 * 1024, file)))
    }
}

impl<R: BufRead> SyncBatchReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Drive `f` over the whole source, one batch at a time
    ///
    /// A `batch_size` of zero is treated as one. Stops at the first error,
    /// whether from reading or from `f`.
    ///
    /// # Returns
    ///
    /// The number of source lines read, blank lines included.
    pub fn for_each_batch<F>(self, batch_size: usize, mut f: F) -> Result<usize, LedgerError>
    where
        F: FnMut(&Batch) -> Result<(), LedgerError>,
    {
        let batch_size = batch_size.max(1);
        let mut batch = Batch::new(1, Vec::with_capacity(batch_size));
        let mut line_num = 0;

        for line in self.reader.lines() {
            let line = line?;
            line_num += 1;

            let line = line.trim();
            if line.is_empty() {
                warn!("Skipping blank line {}", line_num);
            }
            batch.lines.push(line.to_string());

            if batch.len() == batch_size {
                f(&batch)?;
                batch = Batch::new(line_num + 1, Vec::with_capacity(batch_size));
            }
        }

        f(&batch)?;
        Ok(line_num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    fn collect_batches(input: &str, batch_size: usize) -> Vec<Batch> {
        let mut batches = Vec::new();
        SyncBatchReader::new(Cursor::new(input))
            .for_each_batch(batch_size, |batch| {
                batches.push(batch.clone());
                Ok(())
            })
            .unwrap();
        batches
    }

    #[test]
    fn test_batches_with_remainder() {
        let batches = collect_batches("a\nb\nc\nd\ne\n", 2);

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0], Batch::new(1, vec!["a".into(), "b".into()]));
        assert_eq!(batches[1], Batch::new(3, vec!["c".into(), "d".into()]));
        assert_eq!(batches[2], Batch::new(5, vec!["e".into()]));
    }

    #[test]
    fn test_exact_multiple_ends_with_empty_batch() {
        let batches = collect_batches("a\nb\nc\nd\n", 2);

        assert_eq!(batches.len(), 3);
        assert!(batches[2].is_empty());
        assert_eq!(batches[2].start_line, 5);
    }

    #[test]
    fn test_empty_source_calls_once() {
        let batches = collect_batches("", 10);

        assert_eq!(batches, vec![Batch::new(1, vec![])]);
    }

    #[test]
    fn test_lines_are_trimmed_and_blank_lines_kept_in_place() {
        let batches = collect_batches("  a , b \n\n\tc\n", 10);

        assert_eq!(batches[0].lines, vec!["a , b", "", "c"]);
        assert_eq!(batches[0].numbered().collect::<Vec<_>>(), vec![(1, "a , b"), (3, "c")]);
    }

    #[test]
    fn test_zero_batch_size_reads_one_line_at_a_time() {
        let batches = collect_batches("a\nb\n", 0);

        assert_eq!(batches.len(), 3);
        assert_eq!(batches[1], Batch::new(2, vec!["b".into()]));
    }

    #[test]
    fn test_callback_error_stops_reading() {
        let mut calls = 0;

        let result = SyncBatchReader::new(Cursor::new("a\nb\nc\n")).for_each_batch(1, |_| {
            calls += 1;
            Err(LedgerError::format("boom"))
        });

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_open_counts_lines() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "2015-01-16,john,mary,125.00\n2015-01-17,mary,bank,1.00\n").unwrap();
        file.flush().unwrap();

        let lines = SyncBatchReader::open(file.path())
            .unwrap()
            .for_each_batch(100, |_| Ok(()))
            .unwrap();

        assert_eq!(lines, 2);
    }

    #[test]
    fn test_open_missing_file() {
        let result = SyncBatchReader::open(Path::new("/nonexistent/ledger.csv"));

        assert!(matches!(
            result.unwrap_err(),
            LedgerError::FileNotFound { .. }
        ));
    }
}
