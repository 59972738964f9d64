//! Core traits for record storage
//!
//! This module defines the seam between the ledger engine and the physical
//! storage medium, so file-backed and in-memory stores can be used
//! interchangeably.

use crate::types::{ItemStock, LedgerError};

/// Durable mapping from item name to [`ItemStock`]
///
/// Implementations hold one independent record per item and must tolerate
/// absent or corrupt data: malformed content is logged and healed, never
/// returned as an error.
pub trait RecordStore: Send + Sync {
    /// Whether a record has ever been written for the item
    fn contains(&self, item_name: &str) -> Result<bool, LedgerError>;

    /// Load a record, returning the zero-value record if it is absent or unreadable
    ///
    /// Invalid history entries are dropped. The lookup key always wins over a
    /// stored `item_name` that differs.
    fn load(&self, item_name: &str) -> Result<ItemStock, LedgerError>;

    /// Durably replace the record, keyed by `record.item_name`
    ///
    /// Readers observe either the previous or the new content, never a mix.
    fn save(&self, record: &ItemStock) -> Result<(), LedgerError>;

    /// Enumerate every record, skipping any that cannot be decoded
    fn list_all(&self) -> Result<Vec<ItemStock>, LedgerError>;
}
