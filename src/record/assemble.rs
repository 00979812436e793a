// src/record/assemble.rs

use chrono::NaiveDateTime;
use tracing::debug;

use super::types::{StudentAcademicRecord, SubjectEntry};
use crate::parse::{DashboardData, ExamHistory};

/// Combine both page extractions into one record for `usn`.
///
/// Subjects follow the dashboard's code table order; chart values default to 0
/// when a code has no chart entry. `now` always becomes `last_updated`.
pub fn assemble(
    usn: &str,
    dashboard: &DashboardData,
    exam: &ExamHistory,
    now: NaiveDateTime,
) -> StudentAcademicRecord {
    let current_semester: Vec<SubjectEntry> = dashboard
        .subject_map
        .iter()
        .map(|(code, name)| SubjectEntry {
            code: code.clone(),
            name: name.clone(),
            cie: dashboard.cie_map.get(code).copied().unwrap_or(0),
            attendance: dashboard.attendance_map.get(code).copied().unwrap_or(0),
        })
        .collect();

    debug!(
        usn,
        subjects = current_semester.len(),
        semesters = exam.semesters.len(),
        "assembled record"
    );

    StudentAcademicRecord {
        name: dashboard.name.clone(),
        usn: usn.to_string(),
        class_details: dashboard.class_details.clone(),
        cgpa: exam.cgpa.clone(),
        last_updated: now,
        current_semester,
        exam_history: exam.semesters.clone(),
    }
}
