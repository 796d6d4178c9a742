use std::collections::HashMap;

use super::types::{GradeRecord, StudentId, Subject};

/// In-memory grade book keyed by student identifier
#[derive(Debug, Clone, Default)]
pub struct GradeBook {
    records: HashMap<StudentId, GradeRecord>,
}

impl GradeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grade record of a student; students without one get an empty record
    pub fn record(&self, id: &StudentId) -> GradeRecord {
        self.records.get(id).cloned().unwrap_or_default()
    }

    pub fn get(&self, id: &StudentId) -> Option<&GradeRecord> {
        self.records.get(id)
    }

    /// Make sure a student has a record, creating an empty one if needed
    pub fn ensure(&mut self, id: &StudentId) -> &mut GradeRecord {
        self.records.entry(id.clone()).or_default()
    }

    /// Set or overwrite one subject for a student
    pub fn set_score(&mut self, id: &StudentId, subject: Subject, score: Option<f64>) {
        self.ensure(id).set(subject, score);
    }

    pub fn remove(&mut self, id: &StudentId) -> Option<GradeRecord> {
        self.records.remove(id)
    }

    pub fn contains(&self, id: &StudentId) -> bool {
        self.records.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &StudentId> {
        self.records.keys()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
