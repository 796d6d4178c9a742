use std::fmt;
use serde::{Serialize, Deserialize};

use super::types::{GradeRecord, Subject};

/// Minimum overall average needed to pass
pub const PASSING_AVERAGE: f64 = 6.0;

/// Average of all subjects, defined only when every subject has a score
pub fn student_average(record: &GradeRecord) -> Option<f64> {
    let mut sum = 0.0;
    for subject in Subject::ALL {
        sum += record.score(subject)?;
    }
    Some(sum / Subject::ALL.len() as f64)
}

/// Mean of the defined student averages.
///
/// Students with an incomplete record are left out entirely. Returns `None`
/// when no student has a defined average.
pub fn class_average<'a>(records: impl IntoIterator<Item = &'a GradeRecord>) -> Option<f64> {
    let (sum, count) = records
        .into_iter()
        .filter_map(student_average)
        .fold((0.0, 0usize), |(sum, count), average| (sum + average, count + 1));

    if count == 0 {
        return None;
    }
    Some(sum / count as f64)
}

/// Overall standing of a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    /// Complete record with an average at or above the pass mark
    Approved,

    /// Complete record below the pass mark
    Failed,

    /// Some subjects still missing
    Pending,

    /// Nothing recorded yet
    NoGrades,
}

impl Standing {
    pub fn of(record: &GradeRecord) -> Self {
        if !record.has_any_score() {
            return Standing::NoGrades;
        }
        match student_average(record) {
            Some(average) if average >= PASSING_AVERAGE => Standing::Approved,
            Some(_) => Standing::Failed,
            None => Standing::Pending,
        }
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Standing::Approved => "APROVADO",
            Standing::Failed => "REPROVADO",
            Standing::Pending => "MATÉRIAS A SEREM LANÇADAS",
            Standing::NoGrades => "NENHUMA NOTA CADASTRADA",
        };
        f.write_str(label)
    }
}
