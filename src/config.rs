//! Runtime configuration

use std::path::PathBuf;
use std::time::Duration;

/// Configuration for opening and driving the ledger
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerConfig {
    /// Directory holding one record file per item
    pub db_dir: PathBuf,
    /// Upper bound on a single ledger operation
    pub op_timeout: Duration,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            db_dir: PathBuf::from("db"),
            op_timeout: Duration::from_secs(5),
        }
    }
}

impl LedgerConfig {
    /// Create a new LedgerConfig with custom values
    ///
    /// A zero timeout would fail every operation, so it falls back to the default.
    pub fn new(db_dir: impl Into<PathBuf>, op_timeout: Duration) -> Self {
        let default = Self::default();

        let op_timeout = if op_timeout.is_zero() {
            tracing::warn!(
                default_ms = default.op_timeout.as_millis() as u64,
                "invalid operation timeout (0), using default"
            );
            default.op_timeout
        } else {
            op_timeout
        };

        Self {
            db_dir: db_dir.into(),
            op_timeout,
        }
    }
}
