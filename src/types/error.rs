//! Error types for the inventory ledger
//!
//! This module defines the errors that ledger operations report to callers and
//! the internal integrity errors that the record store recovers from locally.
//!
//! # Error Categories
//!
//! - **Validation Errors**: Bad input (non-positive counts, missing fields, unusable item names),
//!   insufficient stock and stock overflow
//! - **Not Found Errors**: Unknown item or unknown purchase log entry
//! - **Persistence Errors**: Storage I/O, serialization or timeout failures
//! - **Integrity Errors**: Malformed stored data, never surfaced past the record store

use thiserror::Error;

/// Main error type for ledger operations
///
/// Each variant carries enough context to build a human-readable message for
/// the caller. Persistence failures deliberately carry only the operation name:
/// the underlying cause is logged when the error is created.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Count was zero or negative
    #[error("{operation} count must be greater than 0, got {count}")]
    InvalidCount {
        /// Operation that rejected the count
        operation: String,
        /// The rejected count
        count: i64,
    },

    /// A required input field was absent or empty
    #[error("Missing required field '{field}'")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// Item name cannot be used as a record key
    #[error("Invalid item name '{item_name}'")]
    InvalidItemName {
        /// The rejected item name
        item_name: String,
    },

    /// No record exists for the item
    #[error("Item '{item_name}' not found")]
    ItemNotFound {
        /// The item that was looked up
        item_name: String,
    },

    /// The item has no purchase log entry with the given id
    #[error("Purchase record '{log_id}' not found for item '{item_name}'")]
    LogEntryNotFound {
        /// Item whose history was searched
        item_name: String,
        /// The log id that was not found
        log_id: String,
    },

    /// Sell would take stock below zero
    ///
    /// The record is left unchanged.
    #[error(
        "Insufficient stock for '{item_name}': available {available}, requested {requested}"
    )]
    InsufficientStock {
        /// Item being sold
        item_name: String,
        /// Stock on hand before the sell
        available: u64,
        /// Requested sell quantity
        requested: u64,
    },

    /// Stock total would exceed the representable range
    #[error("Stock overflow for '{item_name}'")]
    StockOverflow {
        /// Item whose total overflowed
        item_name: String,
    },

    /// Storage failure (I/O, serialization or timeout)
    #[error("Storage failure during {operation}")]
    Persistence {
        /// Operation that failed
        operation: String,
    },
}

/// Coarse classification of a [`LedgerError`] for transport layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was rejected before anything was stored
    Validation,
    /// The item or purchase log entry does not exist
    NotFound,
    /// The record store failed or the operation timed out
    Persistence,
}

impl ErrorKind {
    /// HTTP-style status code for this kind
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Persistence => 500,
        }
    }
}

impl LedgerError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidCount { .. }
            | LedgerError::MissingField { .. }
            | LedgerError::InvalidItemName { .. }
            | LedgerError::InsufficientStock { .. }
            | LedgerError::StockOverflow { .. } => ErrorKind::Validation,
            LedgerError::ItemNotFound { .. } | LedgerError::LogEntryNotFound { .. } => {
                ErrorKind::NotFound
            }
            LedgerError::Persistence { .. } => ErrorKind::Persistence,
        }
    }

    /// Create an InvalidCount error
    pub fn invalid_count(operation: &str, count: i64) -> Self {
        LedgerError::InvalidCount {
            operation: operation.to_string(),
            count,
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: &str) -> Self {
        LedgerError::MissingField {
            field: field.to_string(),
        }
    }

    /// Create an InvalidItemName error
    pub fn invalid_item_name(item_name: &str) -> Self {
        LedgerError::InvalidItemName {
            item_name: item_name.to_string(),
        }
    }

    /// Create an ItemNotFound error
    pub fn item_not_found(item_name: &str) -> Self {
        LedgerError::ItemNotFound {
            item_name: item_name.to_string(),
        }
    }

    /// Create a LogEntryNotFound error
    pub fn log_entry_not_found(item_name: &str, log_id: &str) -> Self {
        LedgerError::LogEntryNotFound {
            item_name: item_name.to_string(),
            log_id: log_id.to_string(),
        }
    }

    /// Create an InsufficientStock error
    pub fn insufficient_stock(item_name: &str, available: u64, requested: u64) -> Self {
        LedgerError::InsufficientStock {
            item_name: item_name.to_string(),
            available,
            requested,
        }
    }

    /// Create a StockOverflow error
    pub fn stock_overflow(item_name: &str) -> Self {
        LedgerError::StockOverflow {
            item_name: item_name.to_string(),
        }
    }

    /// Create a Persistence error, logging the underlying cause
    ///
    /// The cause stays in the log; the returned error only names the operation.
    pub fn persistence(operation: &str, cause: impl std::fmt::Display) -> Self {
        tracing::error!(operation, error = %cause, "storage failure");
        LedgerError::Persistence {
            operation: operation.to_string(),
        }
    }
}

/// Malformed stored data
///
/// Produced while decoding records and validating purchase log entries. The
/// record store recovers from these by dropping the offending entry or record
/// and logging a warning; ledger operations never return them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrityError {
    /// The stored document could not be parsed at all
    #[error("malformed record: {reason}")]
    MalformedRecord {
        /// Parser message
        reason: String,
    },

    /// A history entry has the wrong shape
    #[error("malformed purchase record: {reason}")]
    MalformedEntry {
        /// Parser message
        reason: String,
    },

    /// A history entry has a zero purchased count
    #[error("purchase record {log_id} has non-positive count")]
    NonPositiveCount {
        /// Offending entry
        log_id: String,
    },

    /// A history entry has no actor
    #[error("purchase record {log_id} has empty user id")]
    EmptyUserId {
        /// Offending entry
        log_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::invalid_count(
        LedgerError::invalid_count("purchase", 0),
        "purchase count must be greater than 0, got 0"
    )]
    #[case::missing_field(
        LedgerError::missing_field("user_id"),
        "Missing required field 'user_id'"
    )]
    #[case::invalid_item_name(
        LedgerError::invalid_item_name("../etc"),
        "Invalid item name '../etc'"
    )]
    #[case::item_not_found(
        LedgerError::item_not_found("widget"),
        "Item 'widget' not found"
    )]
    #[case::log_entry_not_found(
        LedgerError::log_entry_not_found("widget", "abc"),
        "Purchase record 'abc' not found for item 'widget'"
    )]
    #[case::insufficient_stock(
        LedgerError::insufficient_stock("widget", 3, 5),
        "Insufficient stock for 'widget': available 3, requested 5"
    )]
    #[case::stock_overflow(
        LedgerError::stock_overflow("widget"),
        "Stock overflow for 'widget'"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::invalid_count(LedgerError::invalid_count("sell", -1), 400)]
    #[case::missing_field(LedgerError::missing_field("user_id"), 400)]
    #[case::insufficient_stock(LedgerError::insufficient_stock("widget", 0, 1), 400)]
    #[case::item_not_found(LedgerError::item_not_found("widget"), 404)]
    #[case::log_entry_not_found(LedgerError::log_entry_not_found("widget", "x"), 404)]
    #[case::persistence(LedgerError::Persistence { operation: "save".to_string() }, 500)]
    fn test_status_codes(#[case] error: LedgerError, #[case] expected: u16) {
        assert_eq!(error.kind().status_code(), expected);
    }

    #[test]
    fn test_persistence_error_hides_cause() {
        let error = LedgerError::persistence("save", "/var/lib/db/widget.json: disk full");

        assert_eq!(error.to_string(), "Storage failure during save");
        assert!(!error.to_string().contains("/var/lib"));
    }
}
