pub mod assemble;
pub mod types;

pub use assemble::assemble;
pub use types::{CourseGrade, SemesterRecord, StudentAcademicRecord, SubjectEntry};
