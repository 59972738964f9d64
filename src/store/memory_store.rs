//! In-memory record store
//!
//! Keeps encoded documents in a `DashMap` keyed by item name. Records go
//! through the same codec as the file store, so corrupt-data handling behaves
//! identically; tests use [`MemoryRecordStore::put_raw`] to plant bad documents.

use dashmap::DashMap;
use tracing::warn;

use crate::core::traits::RecordStore;
use crate::store::codec;
use crate::types::{ItemStock, LedgerError};

/// Thread-safe record store holding documents in process memory
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    blobs: DashMap<String, Vec<u8>>,
}

impl MemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            blobs: DashMap::new(),
        }
    }

    /// Store raw document bytes for an item, bypassing the encoder
    pub fn put_raw(&self, item_name: &str, bytes: impl Into<Vec<u8>>) {
        self.blobs.insert(item_name.to_string(), bytes.into());
    }
}

impl RecordStore for MemoryRecordStore {
    fn contains(&self, item_name: &str) -> Result<bool, LedgerError> {
        Ok(self.blobs.contains_key(item_name))
    }

    fn load(&self, item_name: &str) -> Result<ItemStock, LedgerError> {
        let Some(bytes) = self.blobs.get(item_name).map(|blob| blob.value().clone()) else {
            return Ok(ItemStock::empty(item_name));
        };

        Ok(codec::decode(item_name, &bytes).unwrap_or_else(|e| {
            warn!(item_name, error = %e, "corrupt record, starting from empty");
            ItemStock::empty(item_name)
        }))
    }

    fn save(&self, record: &ItemStock) -> Result<(), LedgerError> {
        let bytes = codec::encode(record)?;
        self.blobs.insert(record.item_name.clone(), bytes);
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<ItemStock>, LedgerError> {
        let snapshot: Vec<(String, Vec<u8>)> = self
            .blobs
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut records: Vec<ItemStock> = snapshot
            .into_iter()
            .filter_map(|(item_name, bytes)| match codec::decode(&item_name, &bytes) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(item_name = %item_name, error = %e, "corrupt record, excluded from listing");
                    None
                }
            })
            .collect();
        records.sort_by(|a, b| a.item_name.cmp(&b.item_name));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PurchaseLogEntry;

    #[test]
    fn test_load_missing_returns_zero_record() {
        let store = MemoryRecordStore::new();

        assert_eq!(store.load("widget").unwrap(), ItemStock::empty("widget"));
        assert!(!store.contains("widget").unwrap());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let store = MemoryRecordStore::new();
        let mut record = ItemStock::empty("widget");
        record.current_stock = 2;
        record.purchase_history.push(PurchaseLogEntry::new("u1", 2));

        store.save(&record).unwrap();

        assert_eq!(store.load("widget").unwrap(), record);
    }

    #[test]
    fn test_corrupt_blob_loads_empty_and_is_skipped_in_listing() {
        let store = MemoryRecordStore::new();
        store.put_raw("broken", "not json");
        store.save(&ItemStock::empty("fine")).unwrap();

        assert_eq!(store.load("broken").unwrap(), ItemStock::empty("broken"));
        assert!(store.contains("broken").unwrap());

        let names: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|r| r.item_name)
            .collect();
        assert_eq!(names, vec!["fine".to_string()]);
    }
}
