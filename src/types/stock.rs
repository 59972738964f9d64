//! Stock record types for the inventory ledger
//!
//! This module defines the per-item record and the purchase log entries that
//! make up its ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{IntegrityError, LedgerError};

/// Purchase log entry identifier
///
/// Opaque string (a UUID v4 for entries created by this crate).
pub type LogId = String;

fn new_log_id() -> LogId {
    uuid::Uuid::new_v4().to_string()
}

/// A single purchase recorded in an item's ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseLogEntry {
    /// Handle used for targeted removal; never changes after creation
    pub log_id: LogId,

    /// Actor who performed the purchase
    pub user_id: String,

    /// Purchased quantity, always positive for retained entries
    pub purchased_count: u64,

    /// Creation time (UTC), used only to order the history
    pub timestamp: DateTime<Utc>,
}

impl PurchaseLogEntry {
    /// Create a new entry stamped with the current time and a fresh log id
    pub fn new(user_id: &str, purchased_count: u64) -> Self {
        PurchaseLogEntry {
            log_id: new_log_id(),
            user_id: user_id.to_string(),
            purchased_count,
            timestamp: Utc::now(),
        }
    }

    /// Check the invariants a retained entry must satisfy
    pub fn validate(&self) -> Result<(), IntegrityError> {
        if self.purchased_count == 0 {
            return Err(IntegrityError::NonPositiveCount {
                log_id: self.log_id.clone(),
            });
        }
        if self.user_id.is_empty() {
            return Err(IntegrityError::EmptyUserId {
                log_id: self.log_id.clone(),
            });
        }
        Ok(())
    }
}

/// Full persisted state for one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStock {
    /// Record key
    pub item_name: String,

    /// Units on hand
    pub current_stock: u64,

    /// Purchases that produced the stock, ascending by timestamp after a purchase
    pub purchase_history: Vec<PurchaseLogEntry>,
}

impl ItemStock {
    /// Create a zero-value record: no stock, empty history
    pub fn empty(item_name: &str) -> Self {
        ItemStock {
            item_name: item_name.to_string(),
            current_stock: 0,
            purchase_history: Vec::new(),
        }
    }

    /// Drop entries that fail validation and set `current_stock` to the sum of the rest
    ///
    /// Whatever `current_stock` held before is ignored.
    ///
    /// # Errors
    ///
    /// * `LedgerError::StockOverflow` - If the retained counts do not fit in a `u64`
    pub fn recompute_from_history(&mut self) -> Result<(), LedgerError> {
        let item_name = self.item_name.clone();
        self.purchase_history.retain(|entry| match entry.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(item_name = %item_name, error = %e, "dropping invalid purchase record during recompute");
                false
            }
        });

        let mut total: u64 = 0;
        for entry in &self.purchase_history {
            total = total
                .checked_add(entry.purchased_count)
                .ok_or_else(|| LedgerError::stock_overflow(&self.item_name))?;
        }
        self.current_stock = total;
        Ok(())
    }
}

/// Check that an item name can serve as a record key
///
/// The name is also used as a file name by the file store, so path separators,
/// NUL and the `.`/`..` entries are rejected.
pub fn validate_item_name(item_name: &str) -> Result<(), LedgerError> {
    if item_name.is_empty() {
        return Err(LedgerError::missing_field("item_name"));
    }
    let unusable = item_name == "."
        || item_name == ".."
        || item_name.contains(['/', '\\', '\0']);
    if unusable {
        return Err(LedgerError::invalid_item_name(item_name));
    }
    Ok(())
}
