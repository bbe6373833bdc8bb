//! Ledger Engine Library
//! # Overview
//!
//! This library implements a double-entry ledger fed from a plain text file
//! of dated transfers, with a sequential and a sharded ingestion strategy.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, AccountEntry, Transaction, etc.)
//! - [`cli`] - CLI argument parsing and query execution
//! - [`core`] - Bookkeeping components:
//!   - [`core::account_registry`] - Account ownership and discovery
//!   - [`core::processor`] - Balanced posting of transactions
//!   - `core::async` - Concurrent registry and account-sharded batch processing
//! - [`io`] - Batch readers and query output
//! - [`strategy`] - Pluggable two-pass ingestion pipelines
//! - [`generator`] - Random transaction lines for fixtures and benchmarks
//!
//! # Input Format
//!
//! One transaction per line, no header:
//!
//! ```text
//! 2015-01-16,john,mary,125.00
//! ```
//!
//! Each line moves an unsigned amount from the source account to the
//! destination account. It is posted as a debit of `-amount` on the source
//! and a credit of `+amount` on the destination, which always sum to zero.
//!
//! # Two Passes
//!
//! - **Discovery**: creates every account named in the source, in order of
//!   first appearance
//! - **Posting**: parses each line and posts its two legs
//!
//! # Account State
//!
//! Each account maintains:
//! - per-date balances, folded in as postings arrive
//! - optionally, every posted entry in posting order

// Module declarations
pub mod cli;
pub mod core;
pub mod generator;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{AccountRegistry, TransactionProcessor};
pub use generator::TransactionGenerator;
pub use types::{Account, AccountEntry, AccountId, Batch, LedgerError, Transaction};
