//! Error types for the ledger engine
//!
//! This module defines all error types that can occur while ingesting
//! transactions and answering balance queries.
//!
//! # Error Categories
//!
//! - **Input Errors**: Malformed transaction lines (bad field count, date or amount)
//! - **Registry Errors**: References to accounts that were never created
//! - **Query Errors**: Balance lookups for dates without any postings
//! - **Integrity Errors**: Postings that fail the zero-sum check, arithmetic overflow
//! - **I/O Errors**: Missing or unreadable source files, worker task failures

use crate::types::transaction::AccountId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger engine
///
/// None of these errors is recovered inside the engine. They propagate to the
/// caller, which for the CLI means reporting the failure and aborting the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// A transaction line could not be parsed
    ///
    /// Raised when a line does not split into exactly four fields, or when the
    /// date or amount field does not parse.
    #[error("Format error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Format {
        /// 1-based line number in the source (if known)
        line: Option<usize>,
        /// Description of the problem, including the offending text
        message: String,
    },

    /// A transaction or query references an account that is not registered
    ///
    /// Indicates the discovery pass was skipped or incomplete.
    #[error("Unknown account '{account}'{}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    UnknownAccount {
        /// The identifier that was looked up
        account: AccountId,
        /// 1-based line number in the source (if known)
        line: Option<usize>,
    },

    /// A balance was requested for a date that never received a posting
    #[error("Account '{account}' has no postings on {date}")]
    NoBalanceForDate {
        /// Account that was queried
        account: AccountId,
        /// Date that has no balance bucket
        date: NaiveDate,
    },

    /// Two offsetting postings did not sum to zero
    ///
    /// This indicates a defect in the engine itself and is never recoverable.
    #[error("Invariant violation on {date}: debit {debit} and credit {credit} do not sum to zero")]
    InvariantViolation {
        /// Date of the offending transaction
        date: NaiveDate,
        /// Amount posted to the source account
        debit: Decimal,
        /// Amount posted to the destination account
        credit: Decimal,
    },

    /// Folding an amount into a balance bucket would overflow
    #[error("Arithmetic overflow on account '{account}' for {date}")]
    ArithmeticOverflow {
        /// Account being posted to
        account: AccountId,
        /// Date of the bucket being updated
        date: NaiveDate,
    },

    /// A worker task of the sharded ingestion path failed
    #[error("Worker task failed: {message}")]
    TaskFailed {
        /// Description of the failure
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        LedgerError::Io {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a Format error without line information
    pub fn format(message: impl Into<String>) -> Self {
        LedgerError::Format {
            line: None,
            message: message.into(),
        }
    }

    /// Create an UnknownAccount error without line information
    pub fn unknown_account(account: &str) -> Self {
        LedgerError::UnknownAccount {
            account: account.to_string(),
            line: None,
        }
    }

    /// Create a NoBalanceForDate error
    pub fn no_balance_for_date(account: &str, date: NaiveDate) -> Self {
        LedgerError::NoBalanceForDate {
            account: account.to_string(),
            date,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(account: &str, date: NaiveDate) -> Self {
        LedgerError::ArithmeticOverflow {
            account: account.to_string(),
            date,
        }
    }

    /// Attach a source line number to errors that carry one
    ///
    /// A line number that is already present is kept.
    pub fn at_line(self, number: usize) -> Self {
        match self {
            LedgerError::Format { line: None, message } => LedgerError::Format {
                line: Some(number),
                message,
            },
            LedgerError::UnknownAccount {
                account,
                line: None,
            } => LedgerError::UnknownAccount {
                account,
                line: Some(number),
            },
            other => other,
        }
    }
}
