//! Inventory Ledger CLI
//!
//! Command-line front end for the inventory ledger. Each subcommand maps to one
//! ledger operation and prints the resulting record(s) as JSON on stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- purchase --id u1 --item widget --count 5
//! cargo run -- sell --id u1 --item widget --count 2
//! cargo run -- sell-record --item widget --log-id <LOG_ID>
//! cargo run -- stock widget
//! cargo run -- --db-dir ./data stocks
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (invalid input, unknown item or record, storage failure)

use std::process;
use std::sync::Arc;

use inventory_ledger::cli::{self, Command};
use inventory_ledger::{logging, AsyncLedger, FileRecordStore, Ledger, LedgerError};

#[tokio::main]
async fn main() {
    let args = cli::parse_args();
    logging::init(&args.log_level);

    if let Err(e) = run(args).await {
        eprintln!("Error ({}): {}", e.kind().status_code(), e);
        process::exit(1);
    }
}

async fn run(args: cli::CliArgs) -> Result<(), LedgerError> {
    let config = args.to_ledger_config();
    let store = FileRecordStore::open(&config.db_dir)?;
    let ledger = AsyncLedger::new(Arc::new(Ledger::new(store)), config.op_timeout);

    let output = match args.command {
        Command::Purchase {
            user_id,
            item_name,
            count,
        } => to_json(&ledger.purchase(&item_name, &user_id, count).await?)?,
        Command::Sell {
            user_id,
            item_name,
            count,
        } => to_json(&ledger.sell(&item_name, &user_id, count).await?)?,
        Command::SellRecord { item_name, log_id } => {
            to_json(&ledger.sell_specific_record(&item_name, &log_id).await?)?
        }
        Command::Stock { item_name } => to_json(&ledger.get_stock(&item_name).await?)?,
        Command::Stocks => to_json(&ledger.get_all_stocks().await?)?,
    };

    println!("{output}");
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, LedgerError> {
    serde_json::to_string_pretty(value).map_err(|e| LedgerError::persistence("render", e))
}
