use thiserror::Error;

use crate::records::{StudentId, FIXED_CLASSES};
use crate::store::grammar::LineIssue;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Student not found: {0}")]
    StudentNotFound(StudentId),

    #[error("Malformed store line {line}: {issue}")]
    Malformed { line: usize, issue: LineIssue },

    #[error(transparent)]
    Persistence(#[from] anyhow::Error),
}

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Invalid name {0:?}: only letters and spaces are allowed")]
    InvalidName(String),

    #[error("Unknown class {0:?}: expected one of {expected}", expected = FIXED_CLASSES.join(", "))]
    UnknownClass(String),

    #[error("Unknown subject {0:?}")]
    UnknownSubject(String),

    #[error("Invalid score {0}: must be between 0 and 10")]
    ScoreOutOfRange(f64),
}

pub type StoreResult<T> = Result<T, StoreError>;
