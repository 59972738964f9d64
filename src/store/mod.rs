//! Record store module
//!
//! Durable item name -> [`ItemStock`](crate::types::ItemStock) mapping.
//!
//! # Components
//!
//! - `codec` - Stored document format with per-entry validation
//! - `file_store` - One JSON file per item, atomic replace on save
//! - `memory_store` - In-process store sharing the same codec

pub mod codec;
pub mod file_store;
pub mod memory_store;

pub use file_store::FileRecordStore;
pub use memory_store::MemoryRecordStore;
