pub mod config;
pub mod error;
pub mod records;
pub mod store;
pub mod utils;

// Re-export main types and functions for easier access
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult, ValidationError};
pub use records::{GradeRecord, Standing, StudentId, StudentRecord, Subject};
pub use store::{ReportCard, SchoolOperations, SchoolStore, StoreLayout, StoreLoader, StoreWriter, WriteStats};

// Re-export utility functions
pub use utils::file_utils;
