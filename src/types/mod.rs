//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `entry`: The immutable posting value
//! - `account`: Accounts with date-aggregated balances
//! - `transaction`: Parsed transaction lines and field parsers
//! - `batch`: Groups of raw source lines
//! - `error`: Error types for the ledger engine

pub mod account;
pub mod batch;
pub mod entry;
pub mod error;
pub mod transaction;

pub use account::Account;
pub use batch::Batch;
pub use entry::AccountEntry;
pub use error::LedgerError;
pub use transaction::{parse_amount, parse_date, split_fields, AccountId, Transaction};
