// src/parse/dashboard.rs

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashMap;
use tracing::{debug, instrument, trace};

use super::patterns::{chart_points, is_subject_code};
use super::{cell_texts, first_text};
use crate::record::types::UNKNOWN;

/// Script marker of the bar chart that plots CIE marks.
pub const CIE_CHART_MARKER: &str = "#barPadding";
/// Script marker of the multi-gauge widget that plots attendance.
pub const ATTENDANCE_CHART_MARKER: &str = "#gaugeTypeMulti";

static H2: Lazy<Selector> = Lazy::new(|| Selector::parse("h2").expect("selector should parse"));
static H3: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").expect("selector should parse"));
static P: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("selector should parse"));
static TR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("selector should parse"));
static TD: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("selector should parse"));
static SCRIPT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script").expect("selector should parse"));

/// Everything the dashboard page yields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardData {
    pub name: String,
    pub usn: String,
    pub class_details: String,
    /// Code → subject name, in order of first appearance.
    pub subject_map: Vec<(String, String)>,
    pub cie_map: HashMap<String, u32>,
    pub attendance_map: HashMap<String, u32>,
}

impl DashboardData {
    pub fn subject_name(&self, code: &str) -> Option<&str> {
        self.subject_map
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, n)| n.as_str())
    }

    fn put_subject(&mut self, code: String, name: String) {
        match self.subject_map.iter_mut().find(|(c, _)| *c == code) {
            Some(slot) => slot.1 = name,
            None => self.subject_map.push((code, name)),
        }
    }
}

/// Parse the dashboard document. Missing pieces degrade to sentinels.
#[instrument(level = "debug", skip(html), fields(html_len = html.len()))]
pub fn parse_dashboard(html: &str) -> DashboardData {
    let doc = Html::parse_document(html);

    let mut data = DashboardData {
        name: first_text(&doc, &H3).unwrap_or_else(|| UNKNOWN.to_string()),
        usn: first_text(&doc, &H2).unwrap_or_else(|| UNKNOWN.to_string()),
        class_details: first_text(&doc, &P).unwrap_or_default(),
        ..Default::default()
    };

    for row in doc.select(&TR) {
        let mut cells = cell_texts(row, &TD).into_iter();
        let (Some(code), Some(name)) = (cells.next(), cells.next()) else {
            continue;
        };
        if is_subject_code(&code) {
            trace!(code = %code, name = %name, "subject row");
            data.put_subject(code, name);
        }
    }

    // Each attributed block rebuilds its series; the last block wins outright.
    for script in doc.select(&SCRIPT) {
        let text: String = script.text().collect();
        if text.contains(CIE_CHART_MARKER) {
            data.cie_map = chart_map(&text);
        }
        if text.contains(ATTENDANCE_CHART_MARKER) {
            data.attendance_map = chart_map(&text);
        }
    }

    debug!(
        subjects = data.subject_map.len(),
        cie = data.cie_map.len(),
        attendance = data.attendance_map.len(),
        "parsed dashboard"
    );
    data
}

fn chart_map(script: &str) -> HashMap<String, u32> {
    chart_points(script).map(|p| (p.code, p.value)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DASHBOARD: &str = r##"
        <html><head>
          <script src="/js/jquery.js"></script>
        </head><body>
          <h2>1MS24IS400</h2>
          <h3> Asha Rao </h3>
          <p>B.E. ISE, Semester 6, Section A</p>
          <table>
            <tr><th>Code</th><th>Course</th></tr>
            <tr><td>23IS62</td><td>Machine Learning</td></tr>
            <tr><td>23IS63</td><td>Compiler Design</td><td>extra</td></tr>
            <tr><td>total</td><td>2 courses</td></tr>
            <tr><td>23IS64</td></tr>
          </table>
          <script>
            $("#barPadding").chart({ data: [["23IS62", 45], ["23IS63", 38]] });
          </script>
          <script>
            $("#gaugeTypeMulti").gauge({ data: [["23IS62", 80], ["23IS63", 91]] });
          </script>
          <script>var ignored = [["23IS62", 1]];</script>
        </body></html>
    "##;

    #[test]
    fn parses_identity_subjects_and_charts() {
        let data = parse_dashboard(DASHBOARD);
        assert_eq!(data.usn, "1MS24IS400");
        assert_eq!(data.name, "Asha Rao");
        assert_eq!(data.class_details, "B.E. ISE, Semester 6, Section A");
        assert_eq!(
            data.subject_map,
            vec![
                ("23IS62".to_string(), "Machine Learning".to_string()),
                ("23IS63".to_string(), "Compiler Design".to_string()),
            ]
        );
        assert_eq!(data.cie_map.get("23IS62"), Some(&45));
        assert_eq!(data.cie_map.get("23IS63"), Some(&38));
        assert_eq!(data.attendance_map.get("23IS62"), Some(&80));
        assert_eq!(data.attendance_map.get("23IS63"), Some(&91));
    }

    #[test]
    fn empty_document_yields_sentinels() {
        let data = parse_dashboard("");
        assert_eq!(data.name, UNKNOWN);
        assert_eq!(data.usn, UNKNOWN);
        assert_eq!(data.class_details, "");
        assert!(data.subject_map.is_empty());
        assert!(data.cie_map.is_empty());
        assert!(data.attendance_map.is_empty());
    }

    #[test]
    fn repeated_code_keeps_position_and_last_name() {
        let html = r##"<table>
            <tr><td>21CS51</td><td>Old Name</td></tr>
            <tr><td>21CS52</td><td>Networks</td></tr>
            <tr><td>21CS51</td><td>New Name</td></tr>
        </table>"##;
        let data = parse_dashboard(html);
        assert_eq!(
            data.subject_map,
            vec![
                ("21CS51".to_string(), "New Name".to_string()),
                ("21CS52".to_string(), "Networks".to_string()),
            ]
        );
        assert_eq!(data.subject_name("21CS51"), Some("New Name"));
    }

    #[test]
    fn chart_codes_never_add_subjects() {
        let html = r##"<table><tr><td>21CS51</td><td>DBMS</td></tr></table>
            <script>draw("#barPadding", [["21CS51", 20], ["99ZZ99", 50]]);</script>"##;
        let data = parse_dashboard(html);
        assert_eq!(data.subject_map.len(), 1);
        assert_eq!(data.cie_map.get("99ZZ99"), Some(&50));
    }

    #[test]
    fn duplicate_chart_code_last_occurrence_wins() {
        let html = r##"<script>draw("#gaugeTypeMulti", [["21CS51", 60], ["21CS51", 75]]);</script>"##;
        let data = parse_dashboard(html);
        assert_eq!(data.attendance_map.get("21CS51"), Some(&75));
        assert!(data.cie_map.is_empty());
    }

    #[test]
    fn block_with_both_markers_feeds_both_series() {
        let html = r##"<script>init("#barPadding"); init("#gaugeTypeMulti"); [["21CS51", 33]]</script>"##;
        let data = parse_dashboard(html);
        assert_eq!(data.cie_map.get("21CS51"), Some(&33));
        assert_eq!(data.attendance_map.get("21CS51"), Some(&33));
    }

    #[test]
    fn later_chart_block_replaces_earlier_one() {
        let html = r##"<table>
            <tr><td>21CS51</td><td>DBMS</td></tr>
            <tr><td>21CS52</td><td>Networks</td></tr>
        </table>
        <script>draw("#barPadding", [["21CS51", 20], ["21CS52", 30]]);</script>
        <script>draw("#barPadding", [["21CS51", 25]]);</script>
        <script>draw("#gaugeTypeMulti", [["21CS52", 70]]);</script>
        <script>draw("#gaugeTypeMulti", [["21CS51", 90]]);</script>"##;
        let data = parse_dashboard(html);
        assert_eq!(
            data.cie_map,
            HashMap::from([("21CS51".to_string(), 25)])
        );
        assert_eq!(
            data.attendance_map,
            HashMap::from([("21CS51".to_string(), 90)])
        );
    }
}
