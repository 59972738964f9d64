//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `stock`: Item records, purchase log entries and key validation
//! - `error`: Error types for the inventory ledger

pub mod error;
pub mod stock;

pub use error::{ErrorKind, IntegrityError, LedgerError};
pub use stock::{validate_item_name, ItemStock, LogId, PurchaseLogEntry};
