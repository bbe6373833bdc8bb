//! Random transaction generator
//!
//! Produces well-formed transaction lines for fixtures and benchmarks. The
//! random source is injected, so a seeded generator is fully reproducible.

use crate::types::LedgerError;
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;

/// Account names the generator draws from
pub const NAMES: [&str; 8] = [
    "mark",
    "john",
    "mary",
    "alice",
    "supermarket",
    "postoffice",
    "insurance",
    "bank",
];

/// Generates random transactions within one calendar month
///
/// Every line moves a whole amount in `[0, 100)` between two distinct names
/// on a day of the anchor's month.
#[derive(Debug)]
pub struct TransactionGenerator<R: Rng> {
    rng: R,
    year: i32,
    month: u32,
    days: u32,
}

impl TransactionGenerator<StdRng> {
    /// Generator with a fixed seed
    pub fn seeded(seed: u64, anchor: NaiveDate) -> Self {
        Self::new(StdRng::seed_from_u64(seed), anchor)
    }

    /// Generator seeded from the operating system
    pub fn from_entropy(anchor: NaiveDate) -> Self {
        Self::new(StdRng::from_entropy(), anchor)
    }
}

impl<R: Rng> TransactionGenerator<R> {
    /// Create a generator for the year and month of `anchor`
    pub fn new(rng: R, anchor: NaiveDate) -> Self {
        Self {
            rng,
            year: anchor.year(),
            month: anchor.month(),
            days: days_in_month(anchor),
        }
    }

    /// Lazily generate `count` lines
    pub fn generate(&mut self, count: usize) -> impl Iterator<Item = String> + '_ {
        (0..count).map(move |_| self.next_line())
    }

    /// Write `count` generated lines, one per line
    pub fn write_lines(&mut self, count: usize, output: &mut dyn Write) -> Result<(), LedgerError> {
        for line in self.generate(count) {
            writeln!(output, "{}", line)?;
        }
        output.flush()?;
        Ok(())
    }

    fn next_line(&mut self) -> String {
        let day = self.rng.gen_range(1..=self.days);
        let source = self.rng.gen_range(0..NAMES.len());
        let dest = (source + self.rng.gen_range(1..NAMES.len())) % NAMES.len();
        let amount = self.rng.gen_range(0..100);

        format!(
            "{:04}-{:02}-{:02},{},{},{}.00",
            self.year, self.month, day, NAMES[source], NAMES[dest], amount
        )
    }
}

fn days_in_month(anchor: NaiveDate) -> u32 {
    let (year, month) = match anchor.month() {
        12 => (anchor.year() + 1, 1),
        month => (anchor.year(), month + 1),
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}
