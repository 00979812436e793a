// src/store/json.rs

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::RecordStore;

/// Read the mapping stored at `path`.
///
/// A missing, unreadable or unparsable file yields an empty mapping so that a
/// first write can always proceed.
pub fn load_records<V: DeserializeOwned>(path: &Path) -> BTreeMap<String, V> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no store file yet");
            return BTreeMap::new();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable store file, starting empty");
            return BTreeMap::new();
        }
    };

    match serde_json::from_str(&text) {
        Ok(records) => records,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt store file, starting empty");
            BTreeMap::new()
        }
    }
}

/// Write `records` to `path` as pretty JSON.
///
/// The bytes go to a temporary file next to `path` which is then renamed over
/// it, so readers see either the old mapping or the new one.
pub fn write_records<V: Serialize>(path: &Path, records: &BTreeMap<String, V>) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("creating {:?}", dir))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {:?}", dir))?;
    serde_json::to_writer_pretty(&mut tmp, records)
        .with_context(|| format!("serializing records for {:?}", path))?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;

    tmp.persist(path)
        .with_context(|| format!("renaming temporary file over {:?}", path))?;
    Ok(())
}

/// Whole-file JSON store: the full mapping lives in memory and `save` rewrites it.
#[derive(Debug)]
pub struct JsonFileStore<V> {
    path: PathBuf,
    records: BTreeMap<String, V>,
}

impl<V: Serialize + DeserializeOwned> JsonFileStore<V> {
    /// Open the store at `path`. Never fails; see [`load_records`].
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = load_records(&path);
        Self { path, records }
    }

    /// A store at `path` that ignores any existing content; the next `save`
    /// replaces it.
    pub fn replace(path: impl Into<PathBuf>, records: BTreeMap<String, V>) -> Self {
        Self {
            path: path.into(),
            records,
        }
    }

    pub fn into_records(self) -> BTreeMap<String, V> {
        self.records
    }
}

impl<V: Serialize + DeserializeOwned> RecordStore<V> for JsonFileStore<V> {
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
        write_records(&self.path, &self.records)?;
        info!(path = %self.path.display(), records = self.records.len(), "saved store");
        Ok(())
    }
}
