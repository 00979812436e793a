use anyhow::Result;
use std::collections::BTreeMap;

use super::RecordStore;

/// In-memory store; `save` is a no-op.
#[derive(Debug, Clone)]
pub struct MemoryStore<V> {
    records: BTreeMap<String, V>,
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<V> MemoryStore<V> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<V> RecordStore<V> for MemoryStore<V> {
    fn get(&self, key: &str) -> Option<&V> {
        self.records.get(key)
    }

    fn upsert(&mut self, key: String, value: V) -> Option<V> {
        self.records.insert(key, value)
    }

    fn all(&self) -> &BTreeMap<String, V> {
        &self.records
    }

    fn save(&self) -> Result<()> {
        Ok(())
    }
}
