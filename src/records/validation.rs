use crate::error::ValidationError;
use super::types::{is_fixed_class, Subject, MAX_SCORE, MIN_SCORE};

/// Validate and normalise a student name.
///
/// Only letters and spaces are accepted. Surrounding whitespace is trimmed,
/// inner runs of spaces collapse to one and every word is capitalised.
pub fn normalize_name(raw: &str) -> Result<String, ValidationError> {
    let words: Vec<&str> = raw.split_whitespace().collect();
    let valid = !words.is_empty()
        && raw.chars().all(|c| c.is_alphabetic() || c == ' ');
    if !valid {
        return Err(ValidationError::InvalidName(raw.to_string()));
    }

    Ok(words.into_iter().map(capitalize).collect::<Vec<_>>().join(" "))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Validate a class identifier against the fixed classes, returning it uppercased
pub fn normalize_class(raw: &str) -> Result<String, ValidationError> {
    let class_name = raw.trim().to_uppercase();
    if !is_fixed_class(&class_name) {
        return Err(ValidationError::UnknownClass(raw.trim().to_string()));
    }
    Ok(class_name)
}

pub fn parse_subject(raw: &str) -> Result<Subject, ValidationError> {
    raw.parse::<Subject>().map_err(ValidationError::UnknownSubject)
}

/// Check that an operator-entered score lies in the accepted range
pub fn validate_score(score: f64) -> Result<f64, ValidationError> {
    if !score.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(ValidationError::ScoreOutOfRange(score));
    }
    Ok(score)
}
