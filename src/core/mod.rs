//! Core business logic module
//!
//! This module contains the ledger's bookkeeping components:
//! - `account_registry` - Account ownership, creation and discovery
//! - `processor` - Posting transactions as balanced debit/credit pairs
//! - `async` - Concurrent implementations for sharded ingestion

pub mod account_registry;
pub mod r#async;
pub mod processor;

pub use account_registry::{discover_account_ids, AccountRegistry};
pub use processor::{check_zero_sum, TransactionProcessor};
pub use r#async::{AsyncAccountRegistry, BatchProcessor};
