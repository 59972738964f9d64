//! Record document format
//!
//! Handles conversion between stored JSON documents and [`ItemStock`] values.
//! Decoding is tolerant: every history entry is parsed and validated on its
//! own, and entries that fail are logged and skipped rather than failing the
//! whole record.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::warn;

use crate::types::{IntegrityError, ItemStock, LedgerError, PurchaseLogEntry};

/// Stored document shape, with every field optional
#[derive(Debug, Deserialize)]
struct StoredRecord {
    #[serde(default)]
    item_name: Option<String>,
    #[serde(default)]
    current_stock: u64,
    #[serde(default)]
    purchase_history: Vec<Value>,
}

/// Stored history entry shape; `log_id` and `timestamp` may be absent
#[derive(Debug, Deserialize)]
struct StoredEntry {
    #[serde(default)]
    log_id: Option<String>,
    user_id: String,
    purchased_count: u64,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

/// Namespace for log ids derived from id-less stored entries
const DERIVED_LOG_ID_NAMESPACE: uuid::Uuid = uuid::Uuid::NAMESPACE_OID;

/// Decode a stored document for `item_name`
///
/// Empty (or whitespace-only) content decodes to the zero-value record.
///
/// # Errors
///
/// * `IntegrityError::MalformedRecord` - If the document is not valid JSON or has the wrong shape
pub fn decode(item_name: &str, bytes: &[u8]) -> Result<ItemStock, IntegrityError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ItemStock::empty(item_name));
    }

    let stored: StoredRecord =
        serde_json::from_slice(bytes).map_err(|e| IntegrityError::MalformedRecord {
            reason: e.to_string(),
        })?;

    if let Some(stored_name) = stored.item_name.as_deref() {
        if stored_name != item_name {
            warn!(item_name, stored_name, "stored item name differs from key, using key");
        }
    }

    let purchase_history = stored
        .purchase_history
        .into_iter()
        .enumerate()
        .filter_map(|(index, raw)| parse_entry(item_name, index, raw))
        .collect();

    Ok(ItemStock {
        item_name: item_name.to_string(),
        current_stock: stored.current_stock,
        purchase_history,
    })
}

/// Parse and validate one history entry, logging and discarding it on failure
///
/// An entry stored without a `log_id` gets one derived from the item name, its
/// position in the stored history and its contents, so the same document
/// always yields the same id until a save persists it. A missing timestamp
/// becomes the Unix epoch.
fn parse_entry(item_name: &str, index: usize, raw: Value) -> Option<PurchaseLogEntry> {
    let checked = serde_json::from_value::<StoredEntry>(raw)
        .map_err(|e| IntegrityError::MalformedEntry {
            reason: e.to_string(),
        })
        .map(|stored| {
            let log_id = stored.log_id.unwrap_or_else(|| {
                derive_log_id(item_name, index, &stored.user_id, stored.purchased_count)
            });
            PurchaseLogEntry {
                log_id,
                user_id: stored.user_id,
                purchased_count: stored.purchased_count,
                timestamp: stored.timestamp.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            }
        })
        .and_then(|entry| entry.validate().map(|()| entry));

    match checked {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!(item_name, error = %e, "skipping invalid purchase record");
            None
        }
    }
}

fn derive_log_id(item_name: &str, index: usize, user_id: &str, purchased_count: u64) -> String {
    let name = format!("{item_name}\0{index}\0{user_id}\0{purchased_count}");
    uuid::Uuid::new_v5(&DERIVED_LOG_ID_NAMESPACE, name.as_bytes()).to_string()
}

/// Encode a record as a pretty-printed document with 4-space indentation
pub fn encode(record: &ItemStock) -> Result<Vec<u8>, LedgerError> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    serde::Serialize::serialize(record, &mut serializer)
        .map_err(|e| LedgerError::persistence("encode", e))?;
    Ok(buf)
}
