use std::path::{Path, PathBuf};
use std::fs;
use std::io::ErrorKind;
use anyhow::{Result, Context};
use log::{debug, trace};

/// Create a directory if it doesn't exist
pub fn ensure_dir_exists(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    if !dir.exists() {
        debug!("Creating directory: {}", dir.display());
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    Ok(())
}

/// Check if a file has a specific extension
pub fn has_extension(path: impl AsRef<Path>, extension: &str) -> bool {
    let path = path.as_ref();
    if let Some(ext) = path.extension() {
        if let Some(ext_str) = ext.to_str() {
            return ext_str.eq_ignore_ascii_case(extension);
        }
    }
    false
}

/// Files directly inside a directory with the given extension, sorted by path.
///
/// A missing directory yields an empty list.
pub fn get_files_with_extension(dir: impl AsRef<Path>, extension: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(Vec::new());
    }
    debug!("Collecting *.{} files from directory: {}", extension, dir.display());

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to list directory {}", dir.display()))?;
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            trace!("Found file: {}", entry.path().display());
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Read a file to string with better error handling
pub fn read_file_to_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read file {}", path.display()))
}

/// Read a file that may not exist yet
pub fn read_optional_file(path: impl AsRef<Path>) -> Result<Option<String>> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read file {}", path.display())),
    }
}

/// Write a string to a file with better error handling.
///
/// The content goes to a sibling temporary file first and is renamed into
/// place, so readers never observe a half-written file.
pub fn write_string_to_file(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = path.as_ref();

    // Create parent directory if it doesn't exist
    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    fs::write(&tmp_path, content)
        .with_context(|| format!("Failed to write file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to replace file {}", path.display()))
}

/// Write a file only when its content differs from what is on disk.
///
/// Returns `true` when the file was written.
pub fn write_if_changed(path: impl AsRef<Path>, content: &str) -> Result<bool> {
    let path = path.as_ref();
    if let Some(existing) = read_optional_file(path)? {
        if existing == content {
            trace!("Unchanged: {}", path.display());
            return Ok(false);
        }
    }

    write_string_to_file(path, content)?;
    trace!("Written: {}", path.display());
    Ok(true)
}

/// Remove a file if it exists. Returns `true` when something was removed.
pub fn remove_file_if_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed file: {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to remove file {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_if_changed_skips_identical_content() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("file.txt");

        assert!(write_if_changed(&path, "one\n")?);
        assert!(!write_if_changed(&path, "one\n")?);
        assert!(write_if_changed(&path, "two\n")?);
        assert_eq!(read_file_to_string(&path)?, "two\n");
        assert!(!path.with_file_name("file.txt.tmp").exists());
        Ok(())
    }

    #[test]
    fn test_missing_paths_are_not_errors() -> Result<()> {
        let dir = tempdir()?;
        let missing = dir.path().join("missing.txt");

        assert_eq!(read_optional_file(&missing)?, None);
        assert!(!remove_file_if_exists(&missing)?);
        assert!(get_files_with_extension(dir.path().join("nope"), "txt")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_get_files_with_extension_is_sorted_and_shallow() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("b.txt"), "")?;
        fs::write(dir.path().join("a.TXT"), "")?;
        fs::write(dir.path().join("c.md"), "")?;
        fs::create_dir(dir.path().join("sub"))?;
        fs::write(dir.path().join("sub").join("d.txt"), "")?;

        let names: Vec<String> = get_files_with_extension(dir.path(), "txt")?
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
            .collect();
        assert_eq!(names, vec!["a.TXT", "b.txt"]);
        Ok(())
    }
}
