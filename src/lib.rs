pub mod config;
pub mod normalize;
pub mod parse;
pub mod pipeline;
pub mod record;
pub mod remark;
pub mod service;
pub mod store;

pub use config::Config;
pub use normalize::{normalize, normalize_all, RecordVintage, SubjectItem, UnifiedRecord};
pub use record::{CourseGrade, SemesterRecord, StudentAcademicRecord, SubjectEntry};
pub use store::{JsonFileStore, MemoryStore, RecordStore};
