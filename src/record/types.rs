// src/record/types.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "Unknown";
pub const UNKNOWN_SUBJECT: &str = "Unknown Subject";
pub const NOT_AVAILABLE: &str = "N/A";

/// One student's extracted profile, keyed by `usn` in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentAcademicRecord {
    #[serde(default = "unknown")]
    pub name: String,
    pub usn: String,
    #[serde(default)]
    pub class_details: String,
    #[serde(default = "not_available")]
    pub cgpa: String,
    #[serde(with = "timestamp")]
    pub last_updated: NaiveDateTime,
    #[serde(default)]
    pub current_semester: Vec<SubjectEntry>,
    #[serde(default)]
    pub exam_history: Vec<SemesterRecord>,
}

/// A current-semester subject with its CIE score and attendance percentage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubjectEntry {
    #[serde(default = "not_available")]
    pub code: String,
    #[serde(default = "unknown_subject")]
    pub name: String,
    #[serde(default)]
    pub cie: u32,
    #[serde(default)]
    pub attendance: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SemesterRecord {
    pub semester: String,
    pub sgpa: String,
    pub credits_earned: String,
    #[serde(default)]
    pub courses: Vec<CourseGrade>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseGrade {
    pub code: String,
    pub name: String,
    pub gpa: String,
    pub grade: String,
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

fn unknown_subject() -> String {
    UNKNOWN_SUBJECT.to_string()
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

/// `last_updated` as `"YYYY-MM-DD HH:MM:SS"`.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
