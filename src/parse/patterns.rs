// src/parse/patterns.rs

//! Small recognizers shared by the page parsers.
//!
//! Chart data grammar, as emitted inline by the portal's chart widgets:
//!
//! ```text
//! pair = '["' CODE '",' ws* INT "]"
//! CODE = [A-Z0-9]+
//! INT  = [0-9]+
//! ```
//!
//! Whitespace is only allowed after the comma. Text between pairs is ignored.
//! A pair whose `INT` does not fit in a `u32` is dropped; nothing else can fail.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

static SUBJECT_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Z]{5,10}$").expect("subject code regex should compile"));

static CHART_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\["([A-Z0-9]+)",\s*(\d+)\]"#).expect("chart pair regex should compile")
});

/// True when `token` looks like a course code: 5–10 characters of digits and
/// uppercase ASCII letters, nothing else.
pub fn is_subject_code(token: &str) -> bool {
    SUBJECT_CODE.is_match(token)
}

/// One `["CODE", value]` pair lifted out of chart script text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPoint {
    pub code: String,
    pub value: u32,
}

/// Every well-formed chart pair in `script`, in source order.
pub fn chart_points(script: &str) -> impl Iterator<Item = ChartPoint> + '_ {
    CHART_PAIR.captures_iter(script).filter_map(|caps| {
        let code = caps[1].to_string();
        match caps[2].parse::<u32>() {
            Ok(value) => Some(ChartPoint { code, value }),
            Err(e) => {
                trace!(code = %code, raw = &caps[2], error = %e, "dropping chart pair");
                None
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_code_accepts_portal_codes() {
        for code in ["23IS62", "CS101", "1234567890", "ABCDE"] {
            assert!(is_subject_code(code), "{code} should match");
        }
    }

    #[test]
    fn subject_code_rejects_everything_else() {
        for code in [
            "",
            "AB12",        // too short
            "12345678901", // too long
            "23is62",      // lowercase
            "23 IS62",     // whitespace
            "23-IS62",     // punctuation
            "Sl.No",
            "Course Code",
        ] {
            assert!(!is_subject_code(code), "{code:?} should not match");
        }
    }

    #[test]
    fn chart_points_reads_pairs_in_order() {
        let script = r#"
            $('#barPadding').chart({ data: [["23IS62", 45], ["23IS63",38],["23HS61",  12]] });
        "#;
        let points: Vec<_> = chart_points(script).collect();
        assert_eq!(
            points,
            vec![
                ChartPoint { code: "23IS62".into(), value: 45 },
                ChartPoint { code: "23IS63".into(), value: 38 },
                ChartPoint { code: "23HS61".into(), value: 12 },
            ]
        );
    }

    #[test]
    fn chart_points_skips_non_pairs() {
        let script = r#"["lower", 4] ["X1", -3] ["A1", 2.5] ["B2", "7"] {"C3": 9}"#;
        assert_eq!(chart_points(script).count(), 0);
    }

    #[test]
    fn chart_points_only_allows_whitespace_after_comma() {
        let script = r#"[ "A1", 1] ["B2" , 2] ["C3", 3 ] ["D4",
            4]"#;
        let points: Vec<_> = chart_points(script).collect();
        assert_eq!(points, vec![ChartPoint { code: "D4".into(), value: 4 }]);
    }

    #[test]
    fn chart_points_drops_values_beyond_u32() {
        let script = r#"["BIG01", 99999999999] ["OK001", 7]"#;
        let points: Vec<_> = chart_points(script).collect();
        assert_eq!(points, vec![ChartPoint { code: "OK001".into(), value: 7 }]);
    }
}
