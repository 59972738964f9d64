//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - The record store seam
//! - `lock_table` - Per-item mutual exclusion
//! - `ledger` - Stock operations and invariant enforcement
//! - `async` - Tokio facade with operation timeouts

pub mod r#async;
pub mod ledger;
pub mod lock_table;
pub mod traits;

pub use ledger::Ledger;
pub use lock_table::KeyLocks;
pub use r#async::AsyncLedger;
pub use traits::RecordStore;
