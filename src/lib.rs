//! Inventory Ledger Library
//! # Overview
//!
//! This library tracks per-item stock counts together with the append-only log
//! of purchases that produced them, persisting each item as an independent record.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (ItemStock, PurchaseLogEntry, errors)
//! - [`store`] - Record stores and the stored document format
//! - [`core`] - Business logic components:
//!   - [`core::ledger`] - Stock operations and invariant enforcement
//!   - [`core::lock_table`] - Per-item mutual exclusion
//!   - [`core::async`] - Tokio facade with operation timeouts
//! - [`cli`] - CLI arguments parsing
//! - [`config`] - Runtime configuration
//! - [`logging`] - Tracing subscriber setup
//!
//! # Operations
//!
//! - **Purchase**: Add stock and append a purchase log entry
//! - **Sell**: Remove stock by quantity; the history is untouched
//! - **Sell specific record**: Remove one log entry and recompute stock from the rest
//! - **Get stock / get all stocks**: Read records
//!
//! # Invariants
//!
//! - Every retained log entry has a positive count and a non-empty user id
//! - Stock never goes below zero
//! - After a targeted removal, stock equals the sum of retained purchase counts

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod logging;
pub mod store;
pub mod types;

pub use config::LedgerConfig;
pub use crate::core::{AsyncLedger, Ledger, RecordStore};
pub use store::{FileRecordStore, MemoryRecordStore};
pub use types::{ErrorKind, ItemStock, LedgerError, LogId, PurchaseLogEntry};
