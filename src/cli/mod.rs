// CLI module
// Command-line interface, argument parsing and query execution

mod args;
pub mod query;

pub use args::{Action, CliArgs, StrategyType};
pub use query::{execute, Query};

use crate::generator::TransactionGenerator;
use crate::strategy;
use crate::types::LedgerError;
use chrono::Local;
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing required arguments, or
/// --help), clap displays an error message or help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Carry out the action described by the arguments
///
/// Query results go to `output`. Generated transactions go to the source path.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<(), LedgerError> {
    match args.action() {
        Action::Generate { count, seed } => {
            let anchor = Local::now().date_naive();
            let mut file = BufWriter::new(File::create(&args.source)?);

            match seed {
                Some(seed) => TransactionGenerator::seeded(seed, anchor).write_lines(count, &mut file)?,
                None => TransactionGenerator::from_entropy(anchor).write_lines(count, &mut file)?,
            }

            info!("Wrote {} transactions to {}", count, args.source.display());
            Ok(())
        }
        Action::Query(query) => {
            let strategy = strategy::create_strategy(args.strategy, Some(args.to_batch_config()));
            execute(&query, &args.source, strategy.as_ref(), output)
        }
    }
}
