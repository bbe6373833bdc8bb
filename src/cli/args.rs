use crate::cli::query::Query;
use crate::strategy::BatchConfig;
use crate::types::{parse_date, AccountId};
use chrono::NaiveDate;
use clap::{ArgGroup, Parser, ValueEnum};
use std::path::PathBuf;

/// Double-entry ledger over a file of dated transfers
#[derive(Parser, Debug)]
#[command(name = "ledger-engine")]
#[command(about = "Import dated transfers into a double-entry ledger and query balances", long_about = None)]
#[command(group(
    ArgGroup::new("query")
        .args(["print_accounts", "account_balance", "account_entries", "balance_history"])
))]
pub struct CliArgs {
    /// Transaction file: read for queries, written by --generate
    #[arg(value_name = "SOURCE", help = "Path to the transaction file")]
    pub source: PathBuf,

    /// List account identifiers in creation order
    #[arg(long = "print-accounts")]
    pub print_accounts: bool,

    /// Show the balance of one account
    #[arg(long = "account-balance", value_name = "ID")]
    pub account_balance: Option<AccountId>,

    /// Restrict --account-balance to postings on one date
    #[arg(
        long = "date",
        value_name = "YYYY-MM-DD",
        requires = "account_balance",
        value_parser = parse_date_arg
    )]
    pub date: Option<NaiveDate>,

    /// List the entries of one account
    #[arg(long = "account-entries", value_name = "ID")]
    pub account_entries: Option<AccountId>,

    /// Show the per-date balances of one account
    #[arg(long = "balance-history", value_name = "ID")]
    pub balance_history: Option<AccountId>,

    /// Write COUNT random transactions to SOURCE instead of reading it
    #[arg(long = "generate", value_name = "COUNT", conflicts_with = "query")]
    pub generate: Option<usize>,

    /// Seed for --generate
    #[arg(long = "seed", value_name = "N", requires = "generate")]
    pub seed: Option<u64>,

    /// Ingestion strategy to use
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Ingestion strategy: 'sync' for sequential or 'async' for sharded"
    )]
    pub strategy: StrategyType,

    /// Number of lines per batch
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of lines per batch (default: 100)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async strategy only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads for the async strategy (default: CPU cores)"
    )]
    pub max_concurrent: Option<usize>,
}

/// Available ingestion strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// What a single invocation does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Generate { count: usize, seed: Option<u64> },
    Query(Query),
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

impl CliArgs {
    /// Resolve the flags into a single action
    ///
    /// Without any query flag, the action is the summary of every account.
    pub fn action(&self) -> Action {
        if let Some(count) = self.generate {
            return Action::Generate {
                count,
                seed: self.seed,
            };
        }

        let query = if self.print_accounts {
            Query::PrintAccounts
        } else if let Some(account) = &self.account_balance {
            Query::AccountBalance {
                account: account.clone(),
                date: self.date,
            }
        } else if let Some(account) = &self.account_entries {
            Query::AccountEntries(account.clone())
        } else if let Some(account) = &self.balance_history {
            Query::BalanceHistory(account.clone())
        } else {
            Query::Summary
        };

        Action::Query(query)
    }

    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values take the defaults. Zero values fall back to the defaults
    /// with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent.unwrap_or(default.max_concurrent),
            )
        } else {
            BatchConfig::default()
        }
    }
}
