use crate::category::Category;
use crate::error::{Error, Result};
use crate::text::is_acceptable;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Scratch file holding a category whose creation was not finished.
///
/// Same layout as a category file, but the description and choices may be
/// missing.
#[derive(Debug, Clone)]
pub struct Draft {
    path: PathBuf,
}

impl Draft {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn try_save(&self, category: &Category) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, category.to_file_contents())?;
        Ok(())
    }

    pub fn save(&self, category: &Category) -> bool {
        match self.try_save(category) {
            Ok(()) => true,
            Err(err) => {
                error!("Failed to save draft {}: {}", self.path.display(), err);
                false
            }
        }
    }

    /// Reads the draft back as a category living in `categories_dir`.
    pub fn try_load(&self, categories_dir: &Path) -> Result<Category> {
        let contents = fs::read_to_string(&self.path)?;
        let mut lines = contents.lines().map(|line| line.trim_end_matches('\r'));

        let name = lines.next().unwrap_or_default().trim();
        if !is_acceptable(name) {
            return Err(Error::Parse {
                path: self.path.clone(),
                reason: "draft has no usable name".into(),
            });
        }
        let description = lines.next().unwrap_or_default().trim();

        let mut category = Category::new(categories_dir, name, description);
        for line in lines.filter(|line| is_acceptable(line)) {
            if let Err(err) = category.try_add_choice(line) {
                debug!("Skipping draft choice: {}", err);
            }
        }
        Ok(category)
    }

    /// `None` when there is no draft or it cannot be read.
    pub fn load(&self, categories_dir: &Path) -> Option<Category> {
        if !self.exists() {
            return None;
        }
        match self.try_load(categories_dir) {
            Ok(category) => Some(category),
            Err(err) => {
                error!("Ignoring unreadable draft: {}", err);
                None
            }
        }
    }

    pub fn clear(&self) -> bool {
        match fs::remove_file(&self.path) {
            Ok(()) => true,
            Err(err) if err.kind() == io::ErrorKind::NotFound => true,
            Err(err) => {
                error!("Failed to clear draft {}: {}", self.path.display(), err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_draft_with_name_only() {
        let tmp = tempdir().unwrap();
        let draft = Draft::new(tmp.path().join("Unfinished.txt"));
        let partial = Category::new(tmp.path().join("Categories"), "Movies", "");
        assert!(draft.save(&partial));

        let restored = draft.load(&tmp.path().join("Categories")).unwrap();
        assert_eq!(restored.name(), "Movies");
        assert_eq!(restored.description(), "");
        assert!(!restored.is_valid());
        assert_eq!(restored.path(), tmp.path().join("Categories").join("Movies.txt"));
    }

    #[test]
    fn test_draft_keeps_choices() {
        let tmp = tempdir().unwrap();
        let draft = Draft::new(tmp.path().join("Unfinished.txt"));
        let partial = Category::with_choices(
            tmp.path(),
            "Movies",
            "Friday",
            vec!["Alien".into(), "Heat".into()],
        );
        draft.save(&partial);
        let restored = draft.load(tmp.path()).unwrap();
        assert_eq!(restored, partial);
    }

    #[test]
    fn test_missing_or_blank_draft() {
        let tmp = tempdir().unwrap();
        let draft = Draft::new(tmp.path().join("Unfinished.txt"));
        assert!(draft.load(tmp.path()).is_none());
        assert!(draft.clear());

        fs::write(draft.path(), "\n\n").unwrap();
        assert!(draft.load(tmp.path()).is_none());
        assert!(draft.clear());
        assert!(!draft.exists());
    }
}
