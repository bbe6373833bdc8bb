//! Ledger Engine CLI
//!
//! Command-line interface for importing dated transfers and querying balances.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- transactions.csv
//! cargo run -- --print-accounts transactions.csv
//! cargo run -- --account-balance john --date 2015-01-16 transactions.csv
//! cargo run -- --account-entries mary transactions.csv
//! cargo run -- --balance-history bank --strategy async --batch-size 500 transactions.csv
//! cargo run -- --generate 1000 --seed 42 transactions.csv
//! ```
//!
//! Query results go to stdout. Set `RUST_LOG` (e.g. `RUST_LOG=info`) for
//! diagnostics on stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, malformed line, unknown account, etc.)

use ledger_engine::cli;
use std::process;

fn main() {
    env_logger::init();

    let args = cli::parse_args();

    let mut output = std::io::stdout().lock();
    if let Err(e) = cli::run(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
