// src/parse/exam.rs

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, instrument, warn};

use super::{cell_texts, stripped_text};
use crate::record::types::NOT_AVAILABLE;
use crate::record::{CourseGrade, SemesterRecord};

static P: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("selector should parse"));
static RESULT_TABLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.res-table").expect("selector should parse"));
static CAPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("caption").expect("selector should parse"));
static BODY_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tbody tr").expect("selector should parse"));
static TD: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("selector should parse"));

static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.\d+").expect("regex should compile"));
static SGPA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"SGPA:\s*(\d+\.\d+)").expect("regex should compile"));
static CREDITS_EARNED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Credits Earned\s*:\s*(\d+)").expect("regex should compile"));

/// Course rows carry code, name, two unused columns, then GPA and grade.
const MIN_COURSE_CELLS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamHistory {
    pub cgpa: String,
    pub semesters: Vec<SemesterRecord>,
}

/// Parse the exam-history document. Never fails; absent data becomes `"N/A"`.
#[instrument(level = "debug", skip(html), fields(html_len = html.len()))]
pub fn parse_exam_history(html: &str) -> ExamHistory {
    let doc = Html::parse_document(html);

    let cgpa = doc
        .select(&P)
        .find(|p| sole_string(*p).is_some_and(|text| DECIMAL.is_match(text)))
        .map(|p| stripped_text(p, ""))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let mut semesters = Vec::new();
    for table in doc.select(&RESULT_TABLE) {
        let caption = match table.select(&CAPTION).next() {
            Some(c) => stripped_text(c, " "),
            None => {
                warn!("result table without caption");
                String::new()
            }
        };
        let mut semester = semester_from_caption(&caption);

        for row in table.select(&BODY_ROW) {
            let cells = cell_texts(row, &TD);
            if cells.len() < MIN_COURSE_CELLS {
                continue;
            }
            semester.courses.push(CourseGrade {
                code: cells[0].clone(),
                name: cells[1].clone(),
                gpa: cells[4].clone(),
                grade: cells[5].clone(),
            });
        }
        semesters.push(semester);
    }

    debug!(cgpa = %cgpa, semesters = semesters.len(), "parsed exam history");
    ExamHistory { cgpa, semesters }
}

/// The text of `el` when it reduces to exactly one string: the element has a
/// single child, which is either text or an element that itself reduces to one
/// string. Mixed content such as `CGPA: <b>8.72</b>` yields `None`.
fn sole_string(el: ElementRef<'_>) -> Option<&str> {
    let mut node = *el;
    loop {
        let mut children = node.children();
        let only = children.next()?;
        if children.next().is_some() {
            return None;
        }
        match only.value() {
            Node::Text(text) => return Some(&**text),
            Node::Element(_) => node = only,
            _ => return None,
        }
    }
}

/// Build an empty semester from a caption such as
/// `"Semester 3 Credits Registered : 22 Credits Earned : 22 SGPA: 8.45"`.
pub fn semester_from_caption(caption: &str) -> SemesterRecord {
    let capture = |re: &Regex| {
        re.captures(caption)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    SemesterRecord {
        semester: caption
            .split("Credits")
            .next()
            .unwrap_or_default()
            .trim()
            .to_string(),
        sgpa: capture(&*SGPA),
        credits_earned: capture(&*CREDITS_EARNED),
        courses: Vec::new(),
    }
}
