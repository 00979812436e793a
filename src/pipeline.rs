// src/pipeline.rs

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use tracing::{info, instrument};

use crate::parse::{parse_dashboard, parse_exam_history, DashboardData, ExamHistory};
use crate::record::types::UNKNOWN;
use crate::record::{assemble, StudentAcademicRecord};
use crate::store::RecordStore;

/// Run both page parsers.
pub fn extract(dashboard_html: &str, exam_html: &str) -> (DashboardData, ExamHistory) {
    (parse_dashboard(dashboard_html), parse_exam_history(exam_html))
}

/// Extract, assemble, upsert and save one student.
///
/// The store key is `usn` when given, otherwise the USN printed on the
/// dashboard. A failed save is returned to the caller; the upsert is then only
/// in memory.
#[instrument(level = "info", skip_all, fields(usn = ?usn))]
pub fn ingest<S>(
    store: &mut S,
    usn: Option<&str>,
    dashboard_html: &str,
    exam_html: &str,
    now: NaiveDateTime,
) -> Result<StudentAcademicRecord>
where
    S: RecordStore<StudentAcademicRecord>,
{
    let (dashboard, exam) = extract(dashboard_html, exam_html);

    let key = match usn.map(str::trim) {
        Some(u) if !u.is_empty() => u.to_string(),
        _ if dashboard.usn != UNKNOWN && !dashboard.usn.is_empty() => dashboard.usn.clone(),
        _ => bail!("no USN supplied and none found on the dashboard page"),
    };

    let record = assemble(&key, &dashboard, &exam, now);
    let replaced = store.upsert(key.clone(), record.clone()).is_some();
    store
        .save()
        .with_context(|| format!("saving record for {}", key))?;

    info!(
        usn = %key,
        name = %record.name,
        subjects = record.current_semester.len(),
        semesters = record.exam_history.len(),
        replaced,
        "stored student record"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{normalize, SubjectItem};
    use crate::record::SubjectEntry;
    use crate::store::{JsonFileStore, MemoryStore};
    use chrono::NaiveDate;
    use std::sync::Once;
    use tempfile::tempdir;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    static LOGGING: Once = Once::new();

    fn init_test_logging() {
        LOGGING.call_once(|| {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("info,portalscraper=debug")),
                )
                .with_test_writer()
                .finish();
            let _ = tracing::subscriber::set_global_default(subscriber);
        });
    }

    const DASHBOARD: &str = r##"
        <h2>1MS24IS400</h2><h3>Asha Rao</h3><p>ISE 6A</p>
        <table><tr><td>23IS62</td><td>Machine Learning</td></tr></table>
        <script>new Chart("#barPadding", { data: [["23IS62", 45]] });</script>
        <script>new Gauge("#gaugeTypeMulti", { data: [["23IS62", 80]] });</script>
    "##;

    const EXAMS: &str = r#"
        <p>8.72</p>
        <table class="res-table">
          <caption>Semester 1 Credits Earned : 20 SGPA: 8.40</caption>
          <tbody><tr><td>22MA11</td><td>Calculus</td><td>4</td><td>4</td><td>9</td><td>A</td></tr></tbody>
        </table>
    "#;

    fn at(min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(9, min, 0)
            .unwrap()
    }

    #[test]
    fn dashboard_example_end_to_end() -> Result<()> {
        init_test_logging();
        let mut store = MemoryStore::<StudentAcademicRecord>::new();
        let record = ingest(&mut store, None, DASHBOARD, EXAMS, at(0))?;

        assert_eq!(record.usn, "1MS24IS400");
        assert_eq!(
            record.current_semester,
            vec![SubjectEntry {
                code: "23IS62".into(),
                name: "Machine Learning".into(),
                cie: 45,
                attendance: 80,
            }]
        );
        assert_eq!(record.cgpa, "8.72");
        assert_eq!(record.exam_history[0].sgpa, "8.40");
        assert_eq!(store.get("1MS24IS400"), Some(&record));

        assert_eq!(
            normalize(&record).subjects,
            vec![SubjectItem {
                code: "23IS62".into(),
                name: "Machine Learning".into(),
                marks: 45,
                attendance: 80,
            }]
        );
        Ok(())
    }

    #[test]
    fn repeated_ingest_only_moves_timestamp() -> Result<()> {
        init_test_logging();
        let tmp = tempdir()?;
        let path = tmp.path().join("all_students_report.json");

        let mut store = JsonFileStore::<StudentAcademicRecord>::load(&path);
        let first = ingest(&mut store, Some("1MS24IS400"), DASHBOARD, EXAMS, at(0))?;

        let mut store = JsonFileStore::<StudentAcademicRecord>::load(&path);
        let second = ingest(&mut store, Some("1MS24IS400"), DASHBOARD, EXAMS, at(5))?;

        assert_eq!(second.last_updated, at(5));
        let mut aligned = second.clone();
        aligned.last_updated = first.last_updated;
        assert_eq!(aligned, first);

        let reloaded = JsonFileStore::<StudentAcademicRecord>::load(&path);
        assert_eq!(reloaded.all().len(), 1);
        assert_eq!(reloaded.get("1MS24IS400"), Some(&second));
        Ok(())
    }

    #[test]
    fn caller_usn_overrides_dashboard_usn() -> Result<()> {
        let mut store = MemoryStore::<StudentAcademicRecord>::new();
        let record = ingest(&mut store, Some(" 1MS24IS999 "), DASHBOARD, EXAMS, at(0))?;
        assert_eq!(record.usn, "1MS24IS999");
        assert!(store.get("1MS24IS400").is_none());
        Ok(())
    }

    #[test]
    fn missing_usn_everywhere_is_rejected() {
        let mut store: MemoryStore<StudentAcademicRecord> = MemoryStore::new();
        let err = ingest(&mut store, None, "<p>login</p>", "", at(0)).unwrap_err();
        assert!(err.to_string().contains("no USN"));
        assert!(store.all().is_empty());
    }

    #[test]
    fn save_failure_surfaces() -> Result<()> {
        let tmp = tempdir()?;
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "x")?;
        let mut store = JsonFileStore::<StudentAcademicRecord>::load(blocker.join("db.json"));
        let res = ingest(&mut store, None, DASHBOARD, EXAMS, at(0));
        assert!(res.is_err());
        Ok(())
    }
}
