use crate::config::LedgerConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Track item stock and the purchase ledger behind it
#[derive(Parser, Debug)]
#[command(name = "inventory-ledger")]
#[command(about = "Track item stock and the purchase ledger behind it", long_about = None)]
pub struct CliArgs {
    /// Directory holding one JSON record per item
    #[arg(
        long = "db-dir",
        value_name = "DIR",
        global = true,
        help = "Directory holding item records (default: db)"
    )]
    pub db_dir: Option<PathBuf>,

    /// Upper bound on a single operation, in milliseconds
    #[arg(
        long = "timeout-ms",
        value_name = "MS",
        global = true,
        help = "Maximum time per operation in milliseconds (default: 5000)"
    )]
    pub timeout_ms: Option<u64>,

    /// Log filter used when RUST_LOG is not set
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        global = true,
        default_value = "info",
        help = "Log level when RUST_LOG is unset (error, warn, info, debug, trace)"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Ledger operations
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Add stock and record the purchase
    Purchase {
        /// Purchasing user id
        #[arg(long = "id", value_name = "USER")]
        user_id: String,
        /// Item name
        #[arg(long = "item", value_name = "ITEM")]
        item_name: String,
        /// Quantity purchased
        #[arg(long, allow_negative_numbers = true)]
        count: i64,
    },
    /// Remove stock by quantity, leaving the purchase history untouched
    Sell {
        /// Selling user id (not recorded)
        #[arg(long = "id", value_name = "USER")]
        user_id: String,
        /// Item name
        #[arg(long = "item", value_name = "ITEM")]
        item_name: String,
        /// Quantity sold
        #[arg(long, allow_negative_numbers = true)]
        count: i64,
    },
    /// Remove one purchase record and recompute stock from the rest
    SellRecord {
        /// Item name
        #[arg(long = "item", value_name = "ITEM")]
        item_name: String,
        /// Purchase record id to remove
        #[arg(long = "log-id", value_name = "LOG_ID")]
        log_id: String,
    },
    /// Show one item's record
    Stock {
        /// Item name
        #[arg(value_name = "ITEM")]
        item_name: String,
    },
    /// Show every item's record
    Stocks,
}

impl CliArgs {
    /// Create a LedgerConfig from CLI arguments
    ///
    /// Unset options fall back to the defaults.
    pub fn to_ledger_config(&self) -> LedgerConfig {
        let default = LedgerConfig::default();
        LedgerConfig::new(
            self.db_dir.clone().unwrap_or(default.db_dir),
            self.timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(default.op_timeout),
        )
    }
}
