use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

/// Classes that always exist, even with no students enrolled
pub const FIXED_CLASSES: [&str; 3] = ["9A", "9B", "9C"];

/// Lowest score accepted from the operator
pub const MIN_SCORE: f64 = 0.0;

/// Highest score accepted from the operator
pub const MAX_SCORE: f64 = 10.0;

/// Check whether a class identifier is one of the fixed classes
pub fn is_fixed_class(class_name: &str) -> bool {
    FIXED_CLASSES.iter().any(|fixed| fixed.eq_ignore_ascii_case(class_name))
}

/// Academic subject tracked for every student
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Subject {
    Matematica,
    Portugues,
    Historia,
    Geografia,
}

impl Subject {
    /// Every subject, in the order they appear in generated files
    pub const ALL: [Subject; 4] = [
        Subject::Matematica,
        Subject::Portugues,
        Subject::Historia,
        Subject::Geografia,
    ];

    /// Label used in the text store
    pub fn label(self) -> &'static str {
        match self {
            Subject::Matematica => "Matematica",
            Subject::Portugues => "Portugues",
            Subject::Historia => "Historia",
            Subject::Geografia => "Geografia",
        }
    }

    /// Name of the per-subject output file
    pub fn file_name(self) -> String {
        format!("{}.txt", self.label().to_lowercase())
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Subject::ALL
            .into_iter()
            .find(|subject| subject.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| s.to_string())
    }
}

/// Unique student identifier (RA), always stored uppercase
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    /// Create an identifier, normalising it to uppercase
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity data held for a student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Display name of the student
    pub name: String,

    /// Class the student belongs to
    pub class_name: String,
}

/// Scores recorded for one student.
///
/// A subject can be missing from the map or present with `None`; both mean
/// "not available" and are treated the same by every consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    scores: BTreeMap<Subject, Option<f64>>,
}

impl GradeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded score for a subject, if any
    pub fn score(&self, subject: Subject) -> Option<f64> {
        self.scores.get(&subject).copied().flatten()
    }

    /// Set or overwrite the entry for a subject
    pub fn set(&mut self, subject: Subject, score: Option<f64>) {
        self.scores.insert(subject, score);
    }

    /// Whether at least one subject has a numeric score
    pub fn has_any_score(&self) -> bool {
        Subject::ALL.iter().any(|subject| self.score(*subject).is_some())
    }

    /// Whether every subject has a numeric score
    pub fn is_complete(&self) -> bool {
        Subject::ALL.iter().all(|subject| self.score(*subject).is_some())
    }

    /// Iterate over all subjects with their score in file order
    pub fn iter(&self) -> impl Iterator<Item = (Subject, Option<f64>)> + '_ {
        Subject::ALL.into_iter().map(|subject| (subject, self.score(subject)))
    }
}
