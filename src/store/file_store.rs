//! File-backed record store
//!
//! Each item is stored as `<dir>/<item_name>.json`. Writes go to a temporary
//! file in the same directory which is synced and then renamed over the
//! target, so a reader sees either the old document or the new one.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::core::traits::RecordStore;
use crate::store::codec;
use crate::types::{ItemStock, LedgerError};

const RECORD_EXTENSION: &str = "json";

/// Record store keeping one JSON document per item in a directory
#[derive(Debug)]
pub struct FileRecordStore {
    dir: PathBuf,
}

impl FileRecordStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// * `LedgerError::Persistence` - If the directory cannot be created
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| LedgerError::persistence("open", e))?;
        debug!(dir = %dir.display(), "opened record store");
        Ok(FileRecordStore { dir })
    }

    /// Directory holding the records
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, item_name: &str) -> PathBuf {
        self.dir.join(format!("{item_name}.{RECORD_EXTENSION}"))
    }

    /// Read raw document bytes, `None` if the file does not exist
    fn read_raw(&self, path: &Path) -> Result<Option<Vec<u8>>, LedgerError> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LedgerError::persistence("load", e)),
        }
    }
}

impl RecordStore for FileRecordStore {
    fn contains(&self, item_name: &str) -> Result<bool, LedgerError> {
        self.path_for(item_name)
            .try_exists()
            .map_err(|e| LedgerError::persistence("lookup", e))
    }

    fn load(&self, item_name: &str) -> Result<ItemStock, LedgerError> {
        let Some(bytes) = self.read_raw(&self.path_for(item_name))? else {
            return Ok(ItemStock::empty(item_name));
        };

        match codec::decode(item_name, &bytes) {
            Ok(record) => Ok(record),
            Err(e) => {
                warn!(item_name, error = %e, "corrupt record, starting from empty");
                Ok(ItemStock::empty(item_name))
            }
        }
    }

    fn save(&self, record: &ItemStock) -> Result<(), LedgerError> {
        let bytes = codec::encode(record)?;
        let target = self.path_for(&record.item_name);

        let mut temp =
            NamedTempFile::new_in(&self.dir).map_err(|e| LedgerError::persistence("save", e))?;
        temp.write_all(&bytes)
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| LedgerError::persistence("save", e))?;
        temp.persist(&target)
            .map_err(|e| LedgerError::persistence("save", e.error))?;
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<ItemStock>, LedgerError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| LedgerError::persistence("list", e))?;

        let mut records = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!(error = %e, "unreadable directory entry, skipping");
                    continue;
                }
            };
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let Some(item_name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                warn!(path = %path.display(), "record file name is not UTF-8, skipping");
                continue;
            };

            let bytes = match self.read_raw(&path) {
                Ok(Some(bytes)) => bytes,
                // Removed between read_dir and read
                Ok(None) => continue,
                Err(_) => {
                    warn!(item_name, "unreadable record, excluded from listing");
                    continue;
                }
            };
            match codec::decode(item_name, &bytes) {
                Ok(record) => records.push(record),
                Err(e) => warn!(item_name, error = %e, "corrupt record, excluded from listing"),
            }
        }

        records.sort_by(|a, b| a.item_name.cmp(&b.item_name));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PurchaseLogEntry;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, FileRecordStore) {
        let dir = TempDir::new().unwrap();
        let store = FileRecordStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn sample(item_name: &str, counts: &[u64]) -> ItemStock {
        let mut record = ItemStock::empty(item_name);
        for &count in counts {
            record
                .purchase_history
                .push(PurchaseLogEntry::new("u1", count));
        }
        record.current_stock = counts.iter().sum();
        record
    }

    #[test]
    fn test_open_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested").join("db");

        let store = FileRecordStore::open(&nested).unwrap();

        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }

    #[test]
    fn test_load_missing_returns_zero_record() {
        let (_dir, store) = open_store();

        assert_eq!(store.load("widget").unwrap(), ItemStock::empty("widget"));
        assert!(!store.contains("widget").unwrap());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (_dir, store) = open_store();
        let record = sample("widget", &[3, 4]);

        store.save(&record).unwrap();

        assert!(store.contains("widget").unwrap());
        assert_eq!(store.load("widget").unwrap(), record);
    }

    #[test]
    fn test_save_overwrites_previous_content() {
        let (_dir, store) = open_store();
        store.save(&sample("widget", &[3, 4, 5])).unwrap();
        let replacement = sample("widget", &[1]);

        store.save(&replacement).unwrap();

        assert_eq!(store.load("widget").unwrap(), replacement);
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let (dir, store) = open_store();

        store.save(&sample("widget", &[1])).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["widget.json".to_string()]);
    }

    #[test]
    fn test_save_into_removed_directory_fails() {
        let (dir, store) = open_store();
        fs::remove_dir_all(dir.path()).unwrap();

        let result = store.save(&sample("widget", &[1]));

        assert_eq!(
            result,
            Err(LedgerError::Persistence {
                operation: "save".to_string()
            })
        );
    }

    #[test]
    fn test_load_corrupt_file_returns_zero_record() {
        let (dir, store) = open_store();
        fs::write(dir.path().join("widget.json"), "{ broken").unwrap();

        assert_eq!(store.load("widget").unwrap(), ItemStock::empty("widget"));
        // The file still exists, so the item is known
        assert!(store.contains("widget").unwrap());
    }

    #[test]
    fn test_load_empty_file_returns_zero_record() {
        let (dir, store) = open_store();
        fs::write(dir.path().join("widget.json"), "").unwrap();

        assert_eq!(store.load("widget").unwrap(), ItemStock::empty("widget"));
    }

    #[test]
    fn test_list_all_skips_corrupt_and_foreign_files() {
        let (dir, store) = open_store();
        store.save(&sample("bolt", &[2])).unwrap();
        store.save(&sample("anvil", &[1, 1])).unwrap();
        fs::write(dir.path().join("broken.json"), "[1, 2").unwrap();
        fs::write(dir.path().join("empty.json"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a record").unwrap();

        let records = store.list_all().unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.item_name.as_str()).collect();
        assert_eq!(names, vec!["anvil", "bolt", "empty"]);
        assert_eq!(records[0].current_stock, 2);
        assert_eq!(records[2], ItemStock::empty("empty"));
    }

    #[test]
    fn test_list_all_uses_file_stem_as_name() {
        let (dir, store) = open_store();
        fs::write(
            dir.path().join("widget.json"),
            r#"{"item_name": "gadget", "current_stock": 6, "purchase_history": []}"#,
        )
        .unwrap();

        let records = store.list_all().unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item_name, "widget");
        assert_eq!(records[0].current_stock, 6);
    }
}
