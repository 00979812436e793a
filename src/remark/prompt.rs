use std::fmt::Write;

use crate::normalize::UnifiedRecord;

/// Attendance at or above this is described as regular.
pub const ATTENDANCE_THRESHOLD: u32 = 85;

pub fn build_remark_prompt(record: &UnifiedRecord) -> String {
    let mut marks = String::new();
    let mut attendance = String::new();
    for s in &record.subjects {
        let _ = writeln!(marks, "- {}: {}", s.name, s.marks);
        let _ = writeln!(attendance, "- {}: {}%", s.name, s.attendance);
    }

    format!(
        "Generate structured semester performance remarks.

Student Data:
Marks:
{marks}
Attendance:
{attendance}
Instructions:

1. Write exactly one sentence per subject, each on a single line.
2. Format: <Subject>: <score-based phrase> and <attendance phrase>.
3. Score phrases describe marks only, e.g. \"scored well\", \"achieved good marks\",
   \"secured satisfactory marks\", \"scored below expectations\".
4. Attendance of {t}% or above is \"maintained regular attendance\"; below {t}% is
   \"attendance below expected level\".
5. Do not show numeric values or the student's name, and use no motivational language.
6. After the subject lines add:
   Overall performance: <scoring trend> and <attendance trend>.
7. Finish with one line:
   Improvement needed in <low-scoring subjects> and attendance improvement required in <low-attendance subjects>.
   Name the subjects explicitly, state facts only, and avoid words like \"should\", \"encouraged\" or \"recommended\".
8. Output only these lines separated by newlines, with no blank lines.",
        t = ATTENDANCE_THRESHOLD
    )
}
