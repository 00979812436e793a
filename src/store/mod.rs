// src/store/mod.rs

//! Keyed record persistence.
//!
//! The pipeline only talks to [`RecordStore`]; [`JsonFileStore`] keeps the whole
//! mapping in one pretty-printed JSON file and [`MemoryStore`] keeps it in memory.
//! Neither coordinates between writers: two callers doing load → upsert → save
//! on the same file race, and the later save wins.

pub mod json;
pub mod memory;

pub use json::{load_records, write_records, JsonFileStore};
pub use memory::MemoryStore;

use anyhow::Result;
use std::collections::BTreeMap;

/// Narrow key-value interface over records keyed by USN.
pub trait RecordStore<V> {
    fn get(&self, key: &str) -> Option<&V>;

    /// Replace whatever is stored under `key`, returning the previous value.
    fn upsert(&mut self, key: String, value: V) -> Option<V>;

    fn all(&self) -> &BTreeMap<String, V>;

    /// Make every upsert so far durable.
    fn save(&self) -> Result<()>;
}
