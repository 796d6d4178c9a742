use std::collections::{BTreeMap, BTreeSet};
use anyhow::Result;
use log::{debug, info};

use crate::records::{class_average, student_average, StudentId, StudentRecord, Subject, FIXED_CLASSES};
use crate::utils::file_utils;
use super::grammar::{
    format_score, AVERAGE_LABEL, CLASS_LABEL, ID_LABEL, SCORE_LABEL, STUDENT_LABEL,
};
use super::layout::{StoreLayout, OUTPUT_EXTENSION};
use super::types::{SchoolStore, WriteStats};

const BANNER_RULE: usize = 60;
const CLASS_RULE: usize = 50;

const NO_STUDENTS: &str = "Nenhum aluno cadastrado no sistema.";
const NO_CLASS_GRADES: &str = "Nenhuma nota cadastrada nessa turma.";
const NO_SUBJECT_GRADES: &str = "Nenhuma nota cadastrada para esta matéria.";
const EMPTY_CLASS: &str = "Nenhum aluno cadastrado nesta turma.";
const NO_CLASS_AVERAGE: &str = "Nenhum aluno possui todas as notas para calcular a média da turma.";

/// Regenerates every derived file from the in-memory store
#[derive(Debug)]
pub struct StoreWriter<'a> {
    layout: &'a StoreLayout,

    /// Optional first line of every file
    header: Option<&'a str>,
}

impl<'a> StoreWriter<'a> {
    pub fn new(layout: &'a StoreLayout, header: Option<&'a str>) -> Self {
        Self { layout, header }
    }

    /// Rewrite the consolidated file, the subject files and the class files
    pub fn write_all(&self, store: &SchoolStore) -> Result<WriteStats> {
        let mut stats = WriteStats::default();

        let written = file_utils::write_if_changed(self.layout.store_file(), &self.render_consolidated(store))?;
        stats.record_write(written);

        for subject in Subject::ALL {
            let written = file_utils::write_if_changed(
                self.layout.subject_file(subject),
                &self.render_subject(store, subject),
            )?;
            stats.record_write(written);
        }

        stats.merge(&self.write_class_files(store)?);

        info!(
            "Store written: {} files updated, {} unchanged, {} removed",
            stats.written, stats.unchanged, stats.removed
        );
        Ok(stats)
    }

    /// Rewrite one file per class and drop files of classes that no longer exist.
    ///
    /// Fixed classes always get a file, even when empty. Only files shaped like
    /// class files are swept; the store and subject files are never removed.
    pub fn write_class_files(&self, store: &SchoolStore) -> Result<WriteStats> {
        let mut stats = WriteStats::default();
        let mut expected = BTreeSet::new();

        for (class_key, students) in group_by_class(store) {
            let path = self.layout.class_file(&class_key);
            let written = file_utils::write_if_changed(&path, &self.render_class(store, &class_key, &students))?;
            stats.record_write(written);
            expected.insert(path);
        }

        for path in file_utils::get_files_with_extension(self.layout.classes_dir(), OUTPUT_EXTENSION)? {
            if expected.contains(&path) || !self.layout.is_class_file(&path) {
                continue;
            }
            if file_utils::remove_file_if_exists(&path)? {
                debug!("Removed stale class file {}", path.display());
                stats.removed += 1;
            }
        }

        Ok(stats)
    }

    /// Delete every generated file from both directories
    pub fn remove_generated_files(&self) -> Result<usize> {
        let mut removed = 0;
        for dir in [self.layout.data_dir(), self.layout.classes_dir()] {
            for path in file_utils::get_files_with_extension(dir, OUTPUT_EXTENSION)? {
                if file_utils::remove_file_if_exists(&path)? {
                    removed += 1;
                }
            }
        }
        info!("Removed {} generated files", removed);
        Ok(removed)
    }

    /// Consolidated file: classes in order, students by name
    pub fn render_consolidated(&self, store: &SchoolStore) -> String {
        let mut out = self.preamble();

        if store.is_empty() {
            out.push_str(NO_STUDENTS);
            out.push('\n');
            push_rule(&mut out, BANNER_RULE);
            return out;
        }

        for class_name in store.directory.class_names() {
            out.push_str(&format!("===== TURMA {} =====\n\n", class_name));

            let mut class_has_grades = false;
            for (id, record) in store.directory.students_in_class(class_name) {
                let grades = store.grade_record(id);
                class_has_grades |= grades.has_any_score();

                out.push_str(&student_line(id, record, &record.class_name));
                out.push('\n');

                let mut segments: Vec<String> = grades
                    .iter()
                    .map(|(subject, score)| format!("{}: {}", subject, format_score(score)))
                    .collect();
                segments.push(format!("{}: {}", AVERAGE_LABEL, format_score(student_average(&grades))));
                out.push_str(&segments.join(" | "));
                out.push('\n');
                push_rule(&mut out, BANNER_RULE);
            }

            if !class_has_grades {
                out.push_str(NO_CLASS_GRADES);
                out.push('\n');
                push_rule(&mut out, BANNER_RULE);
            }
        }

        out
    }

    /// Subject file: every student in registration order
    pub fn render_subject(&self, store: &SchoolStore, subject: Subject) -> String {
        let mut out = self.preamble();
        out.push_str(&format!("===== Notas de {} =====\n\n", subject));

        let mut subject_has_grades = false;
        for (id, record) in store.directory.iter_roster() {
            let score = store.grade_record(id).score(subject);
            subject_has_grades |= score.is_some();

            out.push_str(&format!(
                "{} | {}: {}\n",
                student_line(id, record, &record.class_name),
                SCORE_LABEL,
                format_score(score)
            ));
            push_rule(&mut out, BANNER_RULE);
        }

        if !subject_has_grades {
            out.push_str(NO_SUBJECT_GRADES);
            out.push('\n');
            push_rule(&mut out, BANNER_RULE);
        }

        out
    }

    /// Class file: individual averages followed by the class average
    pub fn render_class(&self, store: &SchoolStore, class_key: &str, students: &[(&StudentId, &StudentRecord)]) -> String {
        let mut out = self.preamble();
        out.push_str(&format!("===== TURMA {} =====\n\n", class_key));

        if students.is_empty() {
            out.push_str(EMPTY_CLASS);
            out.push('\n');
            return out;
        }

        let records: Vec<_> = students.iter().map(|(id, _)| store.grade_record(id)).collect();
        for ((id, record), grades) in students.iter().zip(&records) {
            out.push_str(&student_line(id, record, class_key));
            out.push('\n');
            out.push_str(&format!("   Média do aluno: {}\n", format_score(student_average(grades))));
            push_rule(&mut out, CLASS_RULE);
        }

        match class_average(&records) {
            Some(average) => out.push_str(&format!("\nMÉDIA DA TURMA {}: {}\n", class_key, format_score(Some(average)))),
            None => out.push_str(&format!("\n{}\n", NO_CLASS_AVERAGE)),
        }

        out
    }

    fn preamble(&self) -> String {
        let mut out = String::new();
        if let Some(header) = self.header {
            out.push_str(header);
            out.push('\n');
        }
        out.push_str(&"=".repeat(BANNER_RULE));
        out.push_str("\n\n");
        out
    }
}

/// Students per uppercased class name sorted by name, fixed classes always present
fn group_by_class(store: &SchoolStore) -> BTreeMap<String, Vec<(&StudentId, &StudentRecord)>> {
    let mut classes: BTreeMap<String, Vec<_>> = FIXED_CLASSES
        .iter()
        .map(|class_name| (class_name.to_string(), Vec::new()))
        .collect();

    for (id, record) in store.directory.iter_roster() {
        classes.entry(record.class_name.to_uppercase()).or_default().push((id, record));
    }
    for students in classes.values_mut() {
        students.sort_by(|(a_id, a), (b_id, b)| a.name.cmp(&b.name).then_with(|| a_id.cmp(b_id)));
    }
    classes
}

fn student_line(id: &StudentId, record: &StudentRecord, class_name: &str) -> String {
    format!(
        "{}: {} | {}: {} | {}: {}",
        STUDENT_LABEL, record.name, ID_LABEL, id, CLASS_LABEL, class_name
    )
}

fn push_rule(out: &mut String, width: usize) {
    out.push_str(&"-".repeat(width));
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_store() -> SchoolStore {
        let mut store = SchoolStore::new();
        let ana = StudentId::new("F00002");
        let bruno = StudentId::new("F00001");
        store.add_student(bruno.clone(), StudentRecord {
            name: "Bruno".to_string(),
            class_name: "9A".to_string(),
        });
        store.add_student(ana.clone(), StudentRecord {
            name: "Ana".to_string(),
            class_name: "9A".to_string(),
        });
        for (subject, score) in [
            (Subject::Matematica, 8.0),
            (Subject::Portugues, 7.0),
            (Subject::Historia, 9.0),
            (Subject::Geografia, 6.0),
        ] {
            store.grades.set_score(&ana, subject, Some(score));
        }
        store.grades.set_score(&bruno, Subject::Matematica, Some(5.0));
        store
    }

    #[test]
    fn test_render_consolidated() {
        let layout = StoreLayout::new("data", "classes");
        let writer = StoreWriter::new(&layout, Some("Escola Modelo"));

        let expected = format!(
            "Escola Modelo\n{eq}\n\n===== TURMA 9A =====\n\n\
             Aluno: Ana | RA: F00002 | Turma: 9A\n\
             Matematica: 8.00 | Portugues: 7.00 | Historia: 9.00 | Geografia: 6.00 | Média geral: 7.50\n{dash}\n\
             Aluno: Bruno | RA: F00001 | Turma: 9A\n\
             Matematica: 5.00 | Portugues: N/A | Historia: N/A | Geografia: N/A | Média geral: N/A\n{dash}\n",
            eq = "=".repeat(60),
            dash = "-".repeat(60),
        );
        assert_eq!(writer.render_consolidated(&sample_store()), expected);
    }

    #[test]
    fn test_render_subject_uses_registration_order() {
        let layout = StoreLayout::new("data", "classes");
        let writer = StoreWriter::new(&layout, None);

        let rendered = writer.render_subject(&sample_store(), Subject::Historia);
        let lines: Vec<&str> = rendered.lines().filter(|l| l.starts_with("Aluno:")).collect();
        assert_eq!(lines, vec![
            "Aluno: Bruno | RA: F00001 | Turma: 9A | Nota: N/A",
            "Aluno: Ana | RA: F00002 | Turma: 9A | Nota: 9.00",
        ]);
        assert!(!rendered.contains(NO_SUBJECT_GRADES));
    }

    #[test]
    fn test_render_class_average() {
        let layout = StoreLayout::new("data", "classes");
        let writer = StoreWriter::new(&layout, None);
        let store = sample_store();

        let groups = group_by_class(&store);
        let rendered = writer.render_class(&store, "9A", &groups["9A"]);
        assert!(rendered.contains("   Média do aluno: 7.50\n"));
        assert!(rendered.contains("   Média do aluno: N/A\n"));
        assert!(rendered.ends_with("\nMÉDIA DA TURMA 9A: 7.50\n"));

        let empty = writer.render_class(&store, "9B", &groups["9B"]);
        assert!(empty.ends_with(&format!("{}\n", EMPTY_CLASS)));
    }

    fn store_with_ungraded_class() -> SchoolStore {
        let mut store = sample_store();
        store.add_student(StudentId::new("F00003"), StudentRecord {
            name: "Caio".to_string(),
            class_name: "9B".to_string(),
        });
        store
    }

    #[test]
    fn test_consolidated_marks_class_without_grades() {
        let layout = StoreLayout::new("data", "classes");
        let writer = StoreWriter::new(&layout, None);

        let rendered = writer.render_consolidated(&store_with_ungraded_class());
        let expected_tail = format!(
            "===== TURMA 9B =====\n\n\
             Aluno: Caio | RA: F00003 | Turma: 9B\n\
             Matematica: N/A | Portugues: N/A | Historia: N/A | Geografia: N/A | Média geral: N/A\n{dash}\n\
             {marker}\n{dash}\n",
            dash = "-".repeat(60),
            marker = NO_CLASS_GRADES,
        );
        assert!(rendered.ends_with(&expected_tail), "{}", rendered);
        assert_eq!(rendered.matches(NO_CLASS_GRADES).count(), 1);
    }

    #[test]
    fn test_class_without_complete_average() {
        let layout = StoreLayout::new("data", "classes");
        let writer = StoreWriter::new(&layout, None);
        let store = store_with_ungraded_class();

        let groups = group_by_class(&store);
        let rendered = writer.render_class(&store, "9B", &groups["9B"]);
        assert!(rendered.contains("Aluno: Caio | RA: F00003 | Turma: 9B\n   Média do aluno: N/A\n"));
        assert!(rendered.ends_with(&format!("\n{}\n", NO_CLASS_AVERAGE)));
        assert!(!rendered.contains(EMPTY_CLASS));
        assert!(!rendered.contains("MÉDIA DA TURMA"));
    }

    #[test]
    fn test_sweep_never_touches_data_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let shared = dir.path().join("shared");
        let layout = StoreLayout::new(&shared, &shared);
        let writer = StoreWriter::new(&layout, None);

        std::fs::create_dir_all(&shared)?;
        std::fs::write(shared.join("notas.txt"), "kept\n")?;
        std::fs::write(shared.join("7B.txt"), "stale\n")?;

        let stats = writer.write_all(&sample_store())?;
        assert_eq!(stats.removed, 1);
        for path in layout.data_files() {
            assert!(path.exists(), "{} was removed", path.display());
        }
        assert!(shared.join("notas.txt").exists());
        assert!(!shared.join("7B.txt").exists());
        assert!(shared.join("9A.txt").exists());

        assert_eq!(writer.write_all(&sample_store())?.removed, 0);
        Ok(())
    }

    #[test]
    fn test_empty_store_markers() {
        let layout = StoreLayout::new("data", "classes");
        let writer = StoreWriter::new(&layout, None);
        let store = SchoolStore::new();

        assert!(writer.render_consolidated(&store).contains(NO_STUDENTS));
        assert!(writer.render_subject(&store, Subject::Matematica).contains(NO_SUBJECT_GRADES));
        assert_eq!(group_by_class(&store).keys().cloned().collect::<Vec<_>>(), vec!["9A", "9B", "9C"]);
    }
}
