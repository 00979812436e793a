// src/normalize/mod.rs

//! Conversion from the stored `current_semester`/`cie` record shape to the
//! `subjects`/`marks` shape consumed by remark generation.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};
use tracing::{info, instrument};

use crate::record::types::timestamp;
use crate::record::{StudentAcademicRecord, SubjectEntry};
use crate::store::{load_records, JsonFileStore, RecordStore};

/// The record shape remark generation expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnifiedRecord {
    pub usn: String,
    pub name: String,
    pub class_details: String,
    pub cgpa: String,
    #[serde(with = "timestamp")]
    pub last_updated: NaiveDateTime,
    pub subjects: Vec<SubjectItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubjectItem {
    pub code: String,
    pub name: String,
    pub marks: u32,
    pub attendance: u32,
}

/// A stored record of either vintage. Objects with a `subjects` key are
/// unified; everything else is read as the legacy extraction shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RecordVintage {
    Unified(UnifiedRecord),
    Legacy(StudentAcademicRecord),
}

impl From<StudentAcademicRecord> for RecordVintage {
    fn from(r: StudentAcademicRecord) -> Self {
        RecordVintage::Legacy(r)
    }
}

impl From<&SubjectEntry> for SubjectItem {
    fn from(e: &SubjectEntry) -> Self {
        SubjectItem {
            code: e.code.clone(),
            name: e.name.clone(),
            marks: e.cie,
            attendance: e.attendance,
        }
    }
}

/// Legacy → unified. Order of subjects is preserved.
pub fn normalize(record: &StudentAcademicRecord) -> UnifiedRecord {
    UnifiedRecord {
        usn: record.usn.clone(),
        name: record.name.clone(),
        class_details: record.class_details.clone(),
        cgpa: record.cgpa.clone(),
        last_updated: record.last_updated,
        subjects: record.current_semester.iter().map(SubjectItem::from).collect(),
    }
}

pub fn normalize_vintage(record: &RecordVintage) -> UnifiedRecord {
    match record {
        RecordVintage::Unified(u) => u.clone(),
        RecordVintage::Legacy(l) => normalize(l),
    }
}

/// Normalize every entry, keeping the keys.
pub fn normalize_all(records: &BTreeMap<String, RecordVintage>) -> BTreeMap<String, UnifiedRecord> {
    records
        .iter()
        .map(|(usn, r)| (usn.clone(), normalize_vintage(r)))
        .collect()
}

/// Rebuild the normalized file at `output` from the primary store at `input`.
#[instrument(level = "info", skip_all, fields(input = %input.display(), output = %output.display()))]
pub fn refresh_normalized(input: &Path, output: &Path) -> Result<BTreeMap<String, UnifiedRecord>> {
    let primary: BTreeMap<String, RecordVintage> = load_records(input);
    let store = JsonFileStore::replace(output, normalize_all(&primary));
    store
        .save()
        .with_context(|| format!("writing normalized records to {:?}", output))?;
    info!(records = store.all().len(), "normalized store refreshed");
    Ok(store.into_records())
}
