use crate::category::CATEGORY_EXTENSION;
use crate::error::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

/// Every regular file under `root`, sorted by path.
pub fn list_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Error walking {}: {}", root.display(), err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

pub fn list_summaries(summaries_dir: &Path) -> Vec<PathBuf> {
    list_files(summaries_dir)
}

pub fn read_file(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

/// Deletes a file. A file that is already gone counts as deleted.
pub fn delete_file(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => {
            info!("Deleted {}", path.display());
            true
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => true,
        Err(err) => {
            error!("Failed to delete {}: {}", path.display(), err);
            false
        }
    }
}

/// Removes every category file in `dir`. Returns how many were removed.
pub fn delete_all_categories(dir: &Path) -> usize {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            if err.kind() != io::ErrorKind::NotFound {
                error!("Error reading directory {}: {}", dir.display(), err);
            }
            return 0;
        }
    };

    entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(CATEGORY_EXTENSION)
        })
        .filter(|path| delete_file(path))
        .count()
}

/// Path relative to `root` for display, or the full path when outside it.
pub fn display_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_list_files_recursive_and_sorted() {
        let tmp = tempdir().unwrap();
        let nested = tmp.path().join("Categories");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("b.txt"), "b").unwrap();
        fs::write(nested.join("a.txt"), "a").unwrap();
        fs::write(tmp.path().join("Unfinished.txt"), "x").unwrap();

        let names: Vec<String> = list_files(tmp.path())
            .iter()
            .map(|p| display_name(tmp.path(), p))
            .collect();
        assert_eq!(
            names,
            vec![
                format!("Categories{}a.txt", std::path::MAIN_SEPARATOR),
                format!("Categories{}b.txt", std::path::MAIN_SEPARATOR),
                "Unfinished.txt".to_string(),
            ]
        );
    }

    #[test]
    fn test_list_files_missing_root() {
        let tmp = tempdir().unwrap();
        assert!(list_files(&tmp.path().join("nope")).is_empty());
    }

    #[test]
    fn test_delete_all_categories_only_touches_category_files() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("A.txt"), "A\nd").unwrap();
        fs::write(tmp.path().join("B.txt"), "B\nd").unwrap();
        fs::write(tmp.path().join("notes.md"), "keep").unwrap();

        assert_eq!(delete_all_categories(tmp.path()), 2);
        assert!(tmp.path().join("notes.md").exists());
        assert_eq!(delete_all_categories(&tmp.path().join("missing")), 0);
    }

    #[test]
    fn test_read_and_delete_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("x.txt");
        fs::write(&path, "hello").unwrap();
        assert_eq!(read_file(&path).unwrap(), "hello");
        assert!(delete_file(&path));
        assert!(delete_file(&path));
        assert!(read_file(&path).is_err());
    }
}
