//! Tokio facade for the ledger engine
//!
//! This module provides the `AsyncLedger` struct, which runs each [`Ledger`]
//! operation on tokio's blocking pool under a per-operation timeout.
//!
//! # Timeouts
//!
//! A timed-out operation is reported as `LedgerError::Persistence`. The blocking
//! task is not interrupted: it still finishes its cycle under the item lock, so
//! a purchase that timed out from the caller's point of view may have committed.
//! Callers that retry should read the record first.

use std::sync::Arc;
use std::time::Duration;

use crate::core::ledger::Ledger;
use crate::core::traits::RecordStore;
use crate::types::{ItemStock, LedgerError};

/// Cloneable async handle to a shared [`Ledger`]
#[derive(Debug)]
pub struct AsyncLedger<S> {
    /// Shared engine; per-item locking lives inside it
    ledger: Arc<Ledger<S>>,

    /// Upper bound on any single operation
    op_timeout: Duration,
}

impl<S> Clone for AsyncLedger<S> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            op_timeout: self.op_timeout,
        }
    }
}

impl<S: RecordStore + 'static> AsyncLedger<S> {
    /// Create a new AsyncLedger
    ///
    /// # Arguments
    ///
    /// * `ledger` - Arc-wrapped engine shared with other handles
    /// * `op_timeout` - Maximum time any single operation may take
    pub fn new(ledger: Arc<Ledger<S>>, op_timeout: Duration) -> Self {
        Self { ledger, op_timeout }
    }

    /// The shared engine
    pub fn ledger(&self) -> &Arc<Ledger<S>> {
        &self.ledger
    }

    /// See [`Ledger::purchase`]
    pub async fn purchase(
        &self,
        item_name: &str,
        user_id: &str,
        count: i64,
    ) -> Result<ItemStock, LedgerError> {
        let (item_name, user_id) = (item_name.to_string(), user_id.to_string());
        self.run("purchase", move |ledger| {
            ledger.purchase(&item_name, &user_id, count)
        })
        .await
    }

    /// See [`Ledger::sell`]
    pub async fn sell(
        &self,
        item_name: &str,
        user_id: &str,
        count: i64,
    ) -> Result<ItemStock, LedgerError> {
        let (item_name, user_id) = (item_name.to_string(), user_id.to_string());
        self.run("sell", move |ledger| ledger.sell(&item_name, &user_id, count))
            .await
    }

    /// See [`Ledger::sell_specific_record`]
    pub async fn sell_specific_record(
        &self,
        item_name: &str,
        log_id: &str,
    ) -> Result<ItemStock, LedgerError> {
        let (item_name, log_id) = (item_name.to_string(), log_id.to_string());
        self.run("sell_specific_record", move |ledger| {
            ledger.sell_specific_record(&item_name, &log_id)
        })
        .await
    }

    /// See [`Ledger::get_stock`]
    pub async fn get_stock(&self, item_name: &str) -> Result<ItemStock, LedgerError> {
        let item_name = item_name.to_string();
        self.run("get_stock", move |ledger| ledger.get_stock(&item_name))
            .await
    }

    /// See [`Ledger::get_all_stocks`]
    pub async fn get_all_stocks(&self) -> Result<Vec<ItemStock>, LedgerError> {
        self.run("get_all_stocks", |ledger| ledger.get_all_stocks())
            .await
    }

    async fn run<T, F>(&self, operation: &str, f: F) -> Result<T, LedgerError>
    where
        T: Send + 'static,
        F: FnOnce(&Ledger<S>) -> Result<T, LedgerError> + Send + 'static,
    {
        let ledger = Arc::clone(&self.ledger);
        let task = tokio::task::spawn_blocking(move || f(&ledger));

        match tokio::time::timeout(self.op_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(LedgerError::persistence(operation, join_error)),
            Err(elapsed) => Err(LedgerError::persistence(operation, elapsed)),
        }
    }
}
