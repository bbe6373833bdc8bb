//! Concurrent implementations of core components
//!
//! This module provides the thread-safe counterparts of the sequential core
//! used by the sharded ingestion strategy.
//!
//! # Architecture
//!
//! - **AsyncAccountRegistry**: Thread-safe account storage using DashMap
//! - **BatchProcessor**: Splits a batch into per-account postings and runs
//!   one task per account
//!
//! # Thread Safety
//!
//! - Postings to accounts in different shards proceed in parallel
//! - Postings to the same account are serialized in source order
//! - No global locks, only per-shard locking inside the map

pub mod account_registry;
pub mod batch_processor;

pub use account_registry::AsyncAccountRegistry;
pub use batch_processor::{BatchProcessor, Leg, Posting};
