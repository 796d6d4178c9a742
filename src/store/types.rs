use serde::{Serialize, Deserialize};

use crate::records::{GradeBook, GradeRecord, StudentDirectory, StudentId, StudentRecord};

/// All in-memory state of the school: directory, roster and grade book
#[derive(Debug, Clone, Default)]
pub struct SchoolStore {
    /// Registered students and their registration order
    pub directory: StudentDirectory,

    /// Grades of every registered student
    pub grades: GradeBook,
}

impl SchoolStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a student together with an empty grade record.
    ///
    /// Returns `false` if the identifier is already registered.
    pub fn add_student(&mut self, id: StudentId, record: StudentRecord) -> bool {
        if !self.directory.insert(id.clone(), record) {
            return false;
        }
        self.grades.ensure(&id);
        true
    }

    /// Remove a student from the directory, roster and grade book at once
    pub fn remove_student(&mut self, id: &StudentId) -> Option<StudentRecord> {
        let record = self.directory.remove(id)?;
        self.grades.remove(id);
        Some(record)
    }

    /// Grade record of a student, empty if nothing was recorded
    pub fn grade_record(&self, id: &StudentId) -> GradeRecord {
        self.grades.record(id)
    }

    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    pub fn clear(&mut self) {
        self.directory.clear();
        self.grades.clear();
    }
}

/// Statistics about a load of the canonical store
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Number of students read
    pub students: usize,

    /// Number of grade lines applied to a student
    pub grade_lines: usize,

    /// Number of lines or segments skipped as malformed
    pub skipped: usize,

    /// Number of scores that could not be parsed and were stored as not available
    pub unparsable_scores: usize,
}

/// Statistics about a writer pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteStats {
    /// Files whose content changed and were rewritten
    pub written: usize,

    /// Files already up to date
    pub unchanged: usize,

    /// Stale class files removed
    pub removed: usize,
}

impl WriteStats {
    /// Merge another stats instance into this one
    pub fn merge(&mut self, other: &Self) {
        self.written += other.written;
        self.unchanged += other.unchanged;
        self.removed += other.removed;
    }

    pub(crate) fn record_write(&mut self, written: bool) {
        if written {
            self.written += 1;
        } else {
            self.unchanged += 1;
        }
    }
}
