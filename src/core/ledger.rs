//! Inventory ledger engine
//!
//! This module provides the `Ledger`, which implements the stock operations on
//! top of a [`RecordStore`].
//!
//! Every mutation is a load → validate/transform → recompute → save cycle
//! scoped to one item's record and run under that item's lock. All in-memory
//! changes happen before the single save, so an operation either commits the
//! whole record or leaves the stored record untouched.
//!
//! The engine enforces:
//! - Positive counts for purchase and sell
//! - Stock never going below zero on sell
//! - Existence of the item for sell and targeted removal
//! - Stock equal to the sum of retained purchases after targeted removal

use tracing::{debug, info};

use crate::core::lock_table::KeyLocks;
use crate::core::traits::RecordStore;
use crate::types::{validate_item_name, ItemStock, LedgerError, PurchaseLogEntry};

/// Stock ledger over an injected record store
///
/// `Ledger` is `Sync` when its store is, and can be shared across threads
/// behind an `Arc`.
#[derive(Debug)]
pub struct Ledger<S> {
    store: S,
    locks: KeyLocks,
}

impl<S: RecordStore> Ledger<S> {
    /// Create a ledger over `store`
    pub fn new(store: S) -> Self {
        Ledger {
            store,
            locks: KeyLocks::new(),
        }
    }

    /// The underlying record store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a purchase: add `count` to stock and append a log entry
    ///
    /// Creates the record if the item has never been seen. The history is
    /// re-sorted by timestamp after the new entry is appended.
    ///
    /// # Arguments
    ///
    /// * `item_name` - Item being purchased
    /// * `user_id` - Actor performing the purchase (recorded in the entry)
    /// * `count` - Quantity purchased
    ///
    /// # Returns
    ///
    /// * `Ok(ItemStock)` - The committed record
    /// * `Err(LedgerError::InvalidCount)` - If `count <= 0`
    /// * `Err(LedgerError::MissingField)` - If `item_name` or `user_id` is empty
    /// * `Err(LedgerError::StockOverflow)` - If the new total does not fit
    /// * `Err(LedgerError::Persistence)` - If the record cannot be loaded or saved
    pub fn purchase(
        &self,
        item_name: &str,
        user_id: &str,
        count: i64,
    ) -> Result<ItemStock, LedgerError> {
        validate_item_name(item_name)?;
        if user_id.is_empty() {
            return Err(LedgerError::missing_field("user_id"));
        }
        let quantity = positive_count("purchase", count)?;

        self.locks.with_lock(item_name, || -> Result<ItemStock, LedgerError> {
            let mut record = self.store.load(item_name)?;

            record.current_stock = record
                .current_stock
                .checked_add(quantity)
                .ok_or_else(|| LedgerError::stock_overflow(item_name))?;
            let entry = PurchaseLogEntry::new(user_id, quantity);
            let log_id = entry.log_id.clone();
            record.purchase_history.push(entry);
            record.purchase_history.sort_by_key(|e| e.timestamp);

            self.store.save(&record)?;
            info!(item_name, user_id, count = quantity, log_id = %log_id, stock = record.current_stock, "purchase committed");
            Ok(record)
        })
    }

    /// Sell `count` units without touching the purchase history
    ///
    /// `user_id` is accepted but not recorded by this operation.
    ///
    /// # Returns
    ///
    /// * `Ok(ItemStock)` - The committed record
    /// * `Err(LedgerError::InvalidCount)` - If `count <= 0`
    /// * `Err(LedgerError::ItemNotFound)` - If the item has no record
    /// * `Err(LedgerError::InsufficientStock)` - If `count` exceeds the stock on hand
    /// * `Err(LedgerError::Persistence)` - If the record cannot be loaded or saved
    pub fn sell(
        &self,
        item_name: &str,
        user_id: &str,
        count: i64,
    ) -> Result<ItemStock, LedgerError> {
        validate_item_name(item_name)?;
        let quantity = positive_count("sell", count)?;

        self.locks.with_lock(item_name, || -> Result<ItemStock, LedgerError> {
            if !self.store.contains(item_name)? {
                return Err(LedgerError::item_not_found(item_name));
            }
            let mut record = self.store.load(item_name)?;

            if record.current_stock < quantity {
                return Err(LedgerError::insufficient_stock(
                    item_name,
                    record.current_stock,
                    quantity,
                ));
            }
            record.current_stock -= quantity;

            self.store.save(&record)?;
            info!(item_name, user_id, count = quantity, stock = record.current_stock, "sell committed");
            Ok(record)
        })
    }

    /// Remove a purchase log entry and recompute stock from the remaining history
    ///
    /// Every entry carrying `log_id` is removed, so a history with duplicated
    /// ids never keeps a copy of the removed purchase. The remaining entries
    /// keep their order. Entries that fail revalidation are
    /// dropped as well and excluded from the new total; the previously stored
    /// stock value is ignored.
    ///
    /// # Returns
    ///
    /// * `Ok(ItemStock)` - The committed record
    /// * `Err(LedgerError::ItemNotFound)` - If the item has no record
    /// * `Err(LedgerError::LogEntryNotFound)` - If no entry has `log_id`
    /// * `Err(LedgerError::Persistence)` - If the record cannot be loaded or saved
    pub fn sell_specific_record(
        &self,
        item_name: &str,
        log_id: &str,
    ) -> Result<ItemStock, LedgerError> {
        validate_item_name(item_name)?;

        self.locks.with_lock(item_name, || -> Result<ItemStock, LedgerError> {
            if !self.store.contains(item_name)? {
                return Err(LedgerError::item_not_found(item_name));
            }
            let mut record = self.store.load(item_name)?;

            let before = record.purchase_history.len();
            let mut removed_count: u64 = 0;
            record.purchase_history.retain(|entry| {
                if entry.log_id == log_id {
                    removed_count = removed_count.saturating_add(entry.purchased_count);
                    false
                } else {
                    true
                }
            });
            let removed_entries = before - record.purchase_history.len();
            if removed_entries == 0 {
                return Err(LedgerError::log_entry_not_found(item_name, log_id));
            }
            record.recompute_from_history()?;

            self.store.save(&record)?;
            info!(item_name, log_id, removed_entries, removed_count, stock = record.current_stock, "purchase record removed");
            Ok(record)
        })
    }

    /// Current record for an item, or the zero-value record if it has none
    pub fn get_stock(&self, item_name: &str) -> Result<ItemStock, LedgerError> {
        validate_item_name(item_name)?;
        debug!(item_name, "get_stock");
        self.store.load(item_name)
    }

    /// Every readable record, sorted by item name
    pub fn get_all_stocks(&self) -> Result<Vec<ItemStock>, LedgerError> {
        debug!("get_all_stocks");
        self.store.list_all()
    }
}

fn positive_count(operation: &str, count: i64) -> Result<u64, LedgerError> {
    u64::try_from(count)
        .ok()
        .filter(|&quantity| quantity > 0)
        .ok_or_else(|| LedgerError::invalid_count(operation, count))
}
