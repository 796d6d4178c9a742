pub mod types;
pub mod directory;
pub mod gradebook;
pub mod aggregate;
pub mod ids;
pub mod validation;

// Re-export main types and functions for easier access
pub use types::{GradeRecord, StudentId, StudentRecord, Subject, FIXED_CLASSES, is_fixed_class};
pub use directory::StudentDirectory;
pub use gradebook::GradeBook;
pub use aggregate::{class_average, student_average, Standing};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
