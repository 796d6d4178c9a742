use std::fmt;
use serde::{Serialize, Deserialize};

use crate::records::{student_average, Standing, StudentId, Subject};
use super::grammar::format_score;
use super::types::SchoolStore;

/// Score of one subject on a report card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectScore {
    pub subject: Subject,
    pub score: Option<f64>,
}

/// Full grade report of a single student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportCard {
    pub id: StudentId,
    pub name: String,
    pub class_name: String,
    pub scores: Vec<SubjectScore>,
    pub average: Option<f64>,
    pub standing: Standing,
}

impl ReportCard {
    /// Build the report card of a registered student
    pub fn build(store: &SchoolStore, id: &StudentId) -> Option<Self> {
        let record = store.directory.get(id)?;
        let grades = store.grade_record(id);

        Some(Self {
            id: id.clone(),
            name: record.name.clone(),
            class_name: record.class_name.clone(),
            scores: grades
                .iter()
                .map(|(subject, score)| SubjectScore { subject, score })
                .collect(),
            average: student_average(&grades),
            standing: Standing::of(&grades),
        })
    }
}

impl fmt::Display for ReportCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nome : {}", self.name)?;
        writeln!(f, "RA   : {}", self.id)?;
        writeln!(f, "Turma: {}", self.class_name)?;
        writeln!(f)?;
        for entry in &self.scores {
            writeln!(f, "   {:<12} : {}", entry.subject.label(), format_score(entry.score))?;
        }
        writeln!(f)?;
        if let Some(average) = self.average {
            writeln!(f, "MÉDIA GERAL : {}", format_score(Some(average)))?;
        }
        write!(f, "STATUS      : {}", self.standing)
    }
}

/// A student as shown in the class listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListedStudent {
    pub id: StudentId,
    pub name: String,

    /// Whether every subject has a score
    pub average_complete: bool,
}

/// Students of one class, sorted by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassListing {
    pub class_name: String,
    pub students: Vec<ListedStudent>,
}

/// List every class in order with its students sorted by name
pub fn class_listing(store: &SchoolStore) -> Vec<ClassListing> {
    store
        .directory
        .class_names()
        .into_iter()
        .map(|class_name| ClassListing {
            class_name: class_name.to_string(),
            students: store
                .directory
                .students_in_class(class_name)
                .into_iter()
                .map(|(id, record)| ListedStudent {
                    id: id.clone(),
                    name: record.name.clone(),
                    average_complete: store.grade_record(id).is_complete(),
                })
                .collect(),
        })
        .collect()
}
