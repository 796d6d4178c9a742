//! Line grammar of the canonical store.
//!
//! ```text
//! student-line  = "Aluno:" name "|" "RA:" id "|" "Turma:" class *( "|" any )
//! grade-line    = segment *( "|" segment )
//! segment       = subject ":" ( decimal | "N/A" ) | "Média geral:" any | any
//! ```
//!
//! Every other line (headings, separators, markers, blanks) carries no data.
//! What happens with a line that does not fit is decided by [`LoadMode::disposition`].

use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::records::{StudentId, Subject};

pub const STUDENT_LABEL: &str = "Aluno";
pub const ID_LABEL: &str = "RA";
pub const CLASS_LABEL: &str = "Turma";
pub const SCORE_LABEL: &str = "Nota";
pub const AVERAGE_LABEL: &str = "Média geral";
pub const NOT_AVAILABLE: &str = "N/A";
pub const FIELD_DELIMITER: char = '|';
pub const KEY_VALUE_SEPARATOR: char = ':';

static STUDENT_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Aluno:\s*([^|]*?)\s*\|\s*(?i:RA):\s*([^|]*?)\s*\|\s*(?i:Turma):\s*([^|]*?)\s*(?:\|.*)?$")
        .expect("student line pattern is valid")
});

/// Render a score with two decimals, or the not-available sentinel
pub fn format_score(score: Option<f64>) -> String {
    match score {
        // Adding zero folds -0.0 into 0.0
        Some(value) => format!("{:.2}", value + 0.0),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Problems the loader can run into
#[derive(Debug, Clone, PartialEq)]
pub enum LineIssue {
    /// Starts like a student line but the fields cannot be read
    MalformedStudentLine,

    /// Student line with an empty name, identifier or class
    MissingStudentField,

    /// Identifier already seen earlier in the store
    DuplicateStudent(StudentId),

    /// Grade data before any student line
    OrphanGradeLine,

    /// Segment names a subject that does not exist
    UnknownSubject(String),

    /// Score that is neither a number nor the sentinel
    UnparsableScore { subject: Subject, value: String },
}

impl fmt::Display for LineIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineIssue::MalformedStudentLine => write!(f, "malformed student line"),
            LineIssue::MissingStudentField => write!(f, "student line with an empty field"),
            LineIssue::DuplicateStudent(id) => write!(f, "duplicate student {}", id),
            LineIssue::OrphanGradeLine => write!(f, "grades without a preceding student"),
            LineIssue::UnknownSubject(name) => write!(f, "unknown subject {:?}", name),
            LineIssue::UnparsableScore { subject, value } => {
                write!(f, "unparsable score {:?} for {}", value, subject)
            }
        }
    }
}

/// What the loader does about an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Ignore the line or segment
    Skip,

    /// Store the subject as not available
    RecordAbsent,

    /// Keep the first occurrence, continue with the following lines
    KeepFirst,

    /// Abort the load
    Fail,
}

/// How strictly the canonical store is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    #[default]
    Lenient,
    Strict,
}

impl LoadMode {
    /// Policy table mapping each issue to what the loader does
    pub fn disposition(self, issue: &LineIssue) -> Disposition {
        use Disposition::*;
        use LineIssue::*;

        match (self, issue) {
            (_, DuplicateStudent(_)) => KeepFirst,
            (_, OrphanGradeLine) => Skip,
            (LoadMode::Lenient, UnparsableScore { .. }) => RecordAbsent,
            (LoadMode::Lenient, MalformedStudentLine | MissingStudentField | UnknownSubject(_)) => Skip,
            (LoadMode::Strict, MalformedStudentLine | MissingStudentField | UnknownSubject(_) | UnparsableScore { .. }) => Fail,
        }
    }
}

/// Fields of a student line
#[derive(Debug, Clone, PartialEq)]
pub struct StudentLine<'a> {
    pub name: &'a str,
    pub id: StudentId,
    pub class_name: &'a str,
}

/// One `key: value` piece of a grade line
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Score(Subject, Option<f64>),

    /// Aggregate average, recomputed on write
    Average,

    Issue(LineIssue),
}

/// A classified store line
#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    Student(StudentLine<'a>),
    Grades(Vec<Segment>),
    Malformed(LineIssue),
    /// Headings, separators, markers, blank lines
    Other,
}

/// Classify a single line of the canonical store
pub fn classify(line: &str) -> Line<'_> {
    let line = line.trim();

    if line
        .strip_prefix(STUDENT_LABEL)
        .is_some_and(|rest| rest.starts_with(KEY_VALUE_SEPARATOR))
    {
        return classify_student(line);
    }

    if line.contains(KEY_VALUE_SEPARATOR) && !is_average_key(line) {
        return Line::Grades(line.split(FIELD_DELIMITER).filter_map(parse_segment).collect());
    }

    Line::Other
}

fn classify_student(line: &str) -> Line<'_> {
    let Some(caps) = STUDENT_LINE_RE.captures(line) else {
        return Line::Malformed(LineIssue::MalformedStudentLine);
    };

    let field = |index: usize| caps.get(index).map_or("", |m| m.as_str());
    let (name, id, class_name) = (field(1), field(2), field(3));
    if name.is_empty() || id.is_empty() || class_name.is_empty() {
        return Line::Malformed(LineIssue::MissingStudentField);
    }
    // Class names become file names under the classes directory
    if class_name.contains(['/', '\\']) || class_name.contains("..") {
        return Line::Malformed(LineIssue::MalformedStudentLine);
    }

    Line::Student(StudentLine {
        name,
        id: StudentId::new(id),
        class_name,
    })
}

fn is_average_key(text: &str) -> bool {
    text.to_lowercase().starts_with(&AVERAGE_LABEL.to_lowercase())
}

fn parse_segment(segment: &str) -> Option<Segment> {
    let (key, value) = segment.split_once(KEY_VALUE_SEPARATOR)?;
    let (key, value) = (key.trim(), value.trim());

    if is_average_key(key) {
        return Some(Segment::Average);
    }

    let subject = match key.parse::<Subject>() {
        Ok(subject) => subject,
        Err(name) => return Some(Segment::Issue(LineIssue::UnknownSubject(name))),
    };

    if value.eq_ignore_ascii_case(NOT_AVAILABLE) {
        return Some(Segment::Score(subject, None));
    }

    match value.parse::<f64>() {
        Ok(score) if score.is_finite() => Some(Segment::Score(subject, Some(score))),
        _ => Some(Segment::Issue(LineIssue::UnparsableScore {
            subject,
            value: value.to_string(),
        })),
    }
}
