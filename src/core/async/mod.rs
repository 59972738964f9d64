//! Asynchronous facade over the ledger
//!
//! The ledger and its stores do blocking I/O. `AsyncLedger` moves each
//! operation onto tokio's blocking pool and bounds it with a timeout, so an
//! async caller never waits indefinitely on a stalled storage medium.

pub mod ledger;

pub use ledger::AsyncLedger;
