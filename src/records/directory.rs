use std::collections::{BTreeSet, HashMap, HashSet};
use log::trace;

use super::types::{StudentId, StudentRecord};

/// In-memory directory of registered students
#[derive(Debug, Clone, Default)]
pub struct StudentDirectory {
    /// Map of identifier to student data
    students: HashMap<StudentId, StudentRecord>,

    /// Identifiers in registration order
    roster: Vec<StudentId>,

    /// Every identifier handed out since the last reset, removed ones included
    issued: HashSet<StudentId>,
}

impl StudentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a student unless the identifier is already present.
    ///
    /// Returns `false` and leaves the directory untouched on a duplicate.
    pub fn insert(&mut self, id: StudentId, record: StudentRecord) -> bool {
        if self.students.contains_key(&id) {
            return false;
        }
        trace!("Adding student {} ({}) to class {}", id, record.name, record.class_name);
        self.roster.push(id.clone());
        self.issued.insert(id.clone());
        self.students.insert(id, record);
        true
    }

    /// Remove a student from the map and the roster
    pub fn remove(&mut self, id: &StudentId) -> Option<StudentRecord> {
        let record = self.students.remove(id)?;
        self.roster.retain(|existing| existing != id);
        Some(record)
    }

    pub fn get(&self, id: &StudentId) -> Option<&StudentRecord> {
        self.students.get(id)
    }

    pub fn contains(&self, id: &StudentId) -> bool {
        self.students.contains_key(id)
    }

    /// Whether the identifier was ever used in this session
    pub fn was_issued(&self, id: &StudentId) -> bool {
        self.issued.contains(id)
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Identifiers in registration order
    pub fn roster(&self) -> &[StudentId] {
        &self.roster
    }

    /// Students in registration order
    pub fn iter_roster(&self) -> impl Iterator<Item = (&StudentId, &StudentRecord)> {
        self.roster
            .iter()
            .filter_map(|id| self.students.get(id).map(|record| (id, record)))
    }

    /// Distinct class names, sorted ascending
    pub fn class_names(&self) -> BTreeSet<&str> {
        self.students.values().map(|record| record.class_name.as_str()).collect()
    }

    /// Students of a class sorted by name, ties broken by identifier
    pub fn students_in_class(&self, class_name: &str) -> Vec<(&StudentId, &StudentRecord)> {
        let mut students: Vec<_> = self.students
            .iter()
            .filter(|(_, record)| record.class_name == class_name)
            .collect();
        students.sort_by(|(a_id, a), (b_id, b)| a.name.cmp(&b.name).then_with(|| a_id.cmp(b_id)));
        students
    }

    /// Drop every student and forget issued identifiers
    pub fn clear(&mut self) {
        self.students.clear();
        self.roster.clear();
        self.issued.clear();
    }
}
