use log::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::records::{StudentId, StudentRecord};
use crate::utils::file_utils;
use super::grammar::{self, Disposition, Line, LineIssue, LoadMode, Segment};
use super::layout::StoreLayout;
use super::types::{LoadStats, SchoolStore};

/// Reads the canonical store back into memory
#[derive(Debug)]
pub struct StoreLoader<'a> {
    layout: &'a StoreLayout,
    mode: LoadMode,
}

impl<'a> StoreLoader<'a> {
    pub fn new(layout: &'a StoreLayout, mode: LoadMode) -> Self {
        Self { layout, mode }
    }

    /// Load the store from disk. A missing file yields an empty store.
    pub fn load(&self) -> StoreResult<(SchoolStore, LoadStats)> {
        let path = self.layout.store_file();
        debug!("Loading store from {}", path.display());

        let Some(content) = file_utils::read_optional_file(&path)? else {
            info!("Store file {} does not exist, starting empty", path.display());
            return Ok((SchoolStore::new(), LoadStats::default()));
        };

        let (store, stats) = parse_store(&content, self.mode)?;
        info!(
            "Loaded {} students from {} ({} skipped, {} unparsable scores)",
            stats.students,
            path.display(),
            stats.skipped,
            stats.unparsable_scores
        );
        Ok((store, stats))
    }
}

/// Parse the content of a canonical store
pub fn parse_store(content: &str, mode: LoadMode) -> StoreResult<(SchoolStore, LoadStats)> {
    let mut store = SchoolStore::new();
    let mut stats = LoadStats::default();
    let mut cursor: Option<StudentId> = None;

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;

        match grammar::classify(raw) {
            Line::Student(student) => {
                let record = StudentRecord {
                    name: student.name.to_string(),
                    class_name: student.class_name.to_string(),
                };
                if store.add_student(student.id.clone(), record) {
                    stats.students += 1;
                } else {
                    resolve(mode, line_no, LineIssue::DuplicateStudent(student.id.clone()))?;
                }
                cursor = Some(student.id);
            }
            Line::Grades(segments) => {
                let Some(id) = cursor.as_ref() else {
                    resolve(mode, line_no, LineIssue::OrphanGradeLine)?;
                    stats.skipped += 1;
                    continue;
                };
                stats.grade_lines += 1;
                store.grades.ensure(id);

                for segment in segments {
                    match segment {
                        Segment::Score(subject, score) => store.grades.set_score(id, subject, score),
                        Segment::Average => {}
                        Segment::Issue(issue) => {
                            let absent_subject = match &issue {
                                LineIssue::UnparsableScore { subject, .. } => Some(*subject),
                                _ => None,
                            };
                            match (resolve(mode, line_no, issue)?, absent_subject) {
                                (Disposition::RecordAbsent, Some(subject)) => {
                                    store.grades.set_score(id, subject, None);
                                    stats.unparsable_scores += 1;
                                }
                                _ => stats.skipped += 1,
                            }
                        }
                    }
                }
            }
            Line::Malformed(issue) => {
                resolve(mode, line_no, issue)?;
                stats.skipped += 1;
                // Grades after a broken student line must not land on the previous student
                cursor = None;
            }
            Line::Other => {}
        }
    }

    Ok((store, stats))
}

fn resolve(mode: LoadMode, line_no: usize, issue: LineIssue) -> StoreResult<Disposition> {
    let disposition = mode.disposition(&issue);
    match disposition {
        Disposition::Fail => return Err(StoreError::Malformed { line: line_no, issue }),
        Disposition::KeepFirst => warn!("Line {}: {}, keeping the first entry", line_no, issue),
        Disposition::RecordAbsent => warn!("Line {}: {}, stored as not available", line_no, issue),
        Disposition::Skip => warn!("Line {}: {}, skipped", line_no, issue),
    }
    Ok(disposition)
}
