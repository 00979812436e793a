// src/parse/mod.rs

pub mod dashboard;
pub mod exam;
pub mod patterns;

pub use dashboard::{parse_dashboard, DashboardData};
pub use exam::{parse_exam_history, ExamHistory};
pub use patterns::{chart_points, is_subject_code, ChartPoint};

use scraper::{ElementRef, Html, Selector};

/// Trimmed, non-empty text fragments of `el` joined with `sep`.
pub(crate) fn stripped_text(el: ElementRef<'_>, sep: &str) -> String {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Stripped text of the first element matching `sel`, if any.
pub(crate) fn first_text(doc: &Html, sel: &Selector) -> Option<String> {
    doc.select(sel).next().map(|el| stripped_text(el, ""))
}

/// Stripped text of every `<td>` inside `row`.
pub(crate) fn cell_texts(row: ElementRef<'_>, td: &Selector) -> Vec<String> {
    row.select(td).map(|cell| stripped_text(cell, "")).collect()
}
