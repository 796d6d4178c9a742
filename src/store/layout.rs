use std::path::{Path, PathBuf};

use crate::records::Subject;

/// Name of the canonical store file inside the data directory
pub const STORE_FILE: &str = "alunos.txt";

/// Extension shared by every generated file
pub const OUTPUT_EXTENSION: &str = "txt";

/// Locations of the canonical store and every derived file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    /// Directory with the canonical store and the subject files
    data_dir: PathBuf,

    /// Directory with one file per class
    classes_dir: PathBuf,
}

impl StoreLayout {
    pub fn new(data_dir: impl AsRef<Path>, classes_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            classes_dir: classes_dir.as_ref().to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn classes_dir(&self) -> &Path {
        &self.classes_dir
    }

    /// Path of the consolidated file, which is also what the loader reads
    pub fn store_file(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE)
    }

    pub fn subject_file(&self, subject: Subject) -> PathBuf {
        self.data_dir.join(subject.file_name())
    }

    /// Path of a class file; class names are uppercased
    pub fn class_file(&self, class_name: &str) -> PathBuf {
        self.classes_dir.join(format!("{}.{}", class_name.to_uppercase(), OUTPUT_EXTENSION))
    }

    /// The store file followed by every subject file
    pub fn data_files(&self) -> Vec<PathBuf> {
        std::iter::once(self.store_file())
            .chain(Subject::ALL.into_iter().map(|subject| self.subject_file(subject)))
            .collect()
    }

    /// Whether a path has the shape of a class file: inside the classes
    /// directory, no lowercase letters in the stem, not a data file
    pub fn is_class_file(&self, path: &Path) -> bool {
        let shaped = path.parent() == Some(self.classes_dir.as_path())
            && path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .is_some_and(|stem| !stem.is_empty() && !stem.chars().any(char::is_lowercase));

        shaped && !self.data_files().iter().any(|data_file| data_file == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let layout = StoreLayout::new("data", "classes");
        assert_eq!(layout.store_file(), Path::new("data").join("alunos.txt"));
        assert_eq!(layout.subject_file(Subject::Portugues), Path::new("data").join("portugues.txt"));
        assert_eq!(layout.class_file("9a"), Path::new("classes").join("9A.txt"));
    }

    #[test]
    fn test_is_class_file() {
        let layout = StoreLayout::new("data", "classes");
        assert!(layout.is_class_file(&layout.class_file("9b")));
        assert!(!layout.is_class_file(Path::new("classes/notas.txt")));
        assert!(!layout.is_class_file(Path::new("elsewhere/9A.txt")));

        let shared = StoreLayout::new("shared", "shared");
        assert_eq!(shared.data_files().len(), 1 + Subject::ALL.len());
        for data_file in shared.data_files() {
            assert!(!shared.is_class_file(&data_file));
        }
    }
}
