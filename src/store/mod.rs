pub mod types;
pub mod layout;
pub mod grammar;
pub mod loader;
pub mod writer;
pub mod report;
pub mod operations;

// Re-export main types and functions for easier access
pub use types::{LoadStats, SchoolStore, WriteStats};
pub use layout::StoreLayout;
pub use grammar::LoadMode;
pub use loader::StoreLoader;
pub use writer::StoreWriter;
pub use report::{ClassListing, ListedStudent, ReportCard};
pub use operations::SchoolOperations;
