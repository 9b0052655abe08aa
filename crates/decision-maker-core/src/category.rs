use crate::error::{Error, Result};
use crate::text::is_acceptable;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Extension of category files inside the categories directory.
pub const CATEGORY_EXTENSION: &str = "txt";

/// Choices per line in the paged rendering.
pub const PAGE_SIZE: usize = 10;

/// Choice count at which rendering switches to the paged form.
pub const PAGED_CHOICE_COUNT: usize = 80;

/// Width at which the comma-joined rendering switches to the paged form.
pub const INLINE_WIDTH: usize = 120;

pub fn category_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.{}", name, CATEGORY_EXTENSION))
}

/// A named, described list of choices, backed by `<dir>/<name>.txt`.
///
/// File layout: line 1 is the name, line 2 the description and every
/// following line one choice, always `\n` separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    description: String,
    choices: Vec<String>,
    dir: PathBuf,
    path: PathBuf,
}

impl Category {
    /// The "no category" sentinel. Never valid.
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            choices: Vec::new(),
            dir: PathBuf::new(),
            path: PathBuf::new(),
        }
    }

    /// In-memory category without choices. Nothing is written.
    pub fn new(dir: impl Into<PathBuf>, name: &str, description: &str) -> Self {
        Self::with_choices(dir, name, description, Vec::new())
    }

    /// In-memory category with the given choices. Nothing is written.
    ///
    /// Choices are trimmed; blank ones and case-insensitive repeats are dropped.
    pub fn with_choices(
        dir: impl Into<PathBuf>,
        name: &str,
        description: &str,
        choices: Vec<String>,
    ) -> Self {
        let dir = dir.into();
        let path = category_path(&dir, name);
        let mut category = Self {
            name: name.to_string(),
            description: description.trim().to_string(),
            choices: Vec::with_capacity(choices.len()),
            dir,
            path,
        };
        for choice in &choices {
            if let Err(err) = category.try_add_choice(choice) {
                debug!("Dropping choice for '{}': {}", category.name, err);
            }
        }
        category
    }

    /// Like [`Category::with_choices`], but writes the file when none exists yet.
    pub fn create(
        dir: impl Into<PathBuf>,
        name: &str,
        description: &str,
        choices: Vec<String>,
    ) -> Self {
        let category = Self::with_choices(dir, name, description, choices);
        if !category.file_exists() {
            category.save();
        }
        category
    }

    /// Parses a category file. The file stem is the category name.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut lines = contents.lines().map(|line| line.trim_end_matches('\r'));

        let parse_error = |reason: &str| Error::Parse {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let stored_name = lines.next().ok_or_else(|| parse_error("missing name line"))?;
        let description = lines
            .next()
            .ok_or_else(|| parse_error("missing description line"))?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| stored_name.to_string());
        if stored_name != name {
            warn!(
                "Category file {} names '{}', using file name '{}'",
                path.display(),
                stored_name,
                name
            );
        }

        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let mut category = Self::new(dir, &name, description.trim());
        for line in lines {
            if !is_acceptable(line) {
                continue;
            }
            if let Err(err) = category.try_add_choice(line) {
                debug!("Skipping choice in {}: {}", path.display(), err);
            }
        }

        if !category.is_valid() {
            return Err(parse_error("name or description is not acceptable"));
        }
        Ok(category)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_valid(&self) -> bool {
        is_acceptable(&self.name) && is_acceptable(&self.description)
    }

    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }

    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }

    /// Case-insensitive membership test.
    pub fn has_choice(&self, choice: &str) -> bool {
        let wanted = choice.trim().to_lowercase();
        self.choices.iter().any(|c| c.to_lowercase() == wanted)
    }

    pub fn choice(&self, index: usize) -> Option<&str> {
        self.choices.get(index).map(String::as_str)
    }

    pub fn try_add_choice(&mut self, choice: &str) -> Result<()> {
        let choice = choice.trim();
        if !is_acceptable(choice) {
            return Err(Error::Validation(format!(
                "'{}' is blank or too long",
                choice
            )));
        }
        if self.has_choice(choice) {
            return Err(Error::Duplicate(choice.to_string()));
        }
        self.choices.push(choice.to_string());
        Ok(())
    }

    /// Removes the choice at a 1-based position.
    pub fn remove_choice(&mut self, position: usize) -> Option<String> {
        if position == 0 || position > self.choices.len() {
            return None;
        }
        Some(self.choices.remove(position - 1))
    }

    pub fn clear_choices(&mut self) {
        self.choices.clear();
    }

    /// Renames in memory only; the path follows the name.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.path = category_path(&self.dir, name);
    }

    /// Moves the backing file location in memory only.
    pub fn set_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dir = dir.into();
        self.path = category_path(&self.dir, &self.name);
    }

    /// Re-saves when the category is already on disk.
    pub fn set_description(&mut self, description: &str) -> Result<()> {
        if !is_acceptable(description) {
            return Err(Error::Validation("description is blank or too long".into()));
        }
        self.description = description.trim().to_string();
        if self.file_exists() {
            self.try_save()?;
        }
        Ok(())
    }

    pub fn file_exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn to_file_contents(&self) -> String {
        let mut lines: Vec<&str> = Vec::with_capacity(self.choices.len() + 2);
        lines.push(&self.name);
        lines.push(&self.description);
        lines.extend(self.choices.iter().map(String::as_str));
        lines.join("\n")
    }

    pub fn try_save(&self) -> Result<()> {
        if !self.is_valid() {
            return Err(Error::Validation(format!(
                "category '{}' has no acceptable name or description",
                self.name
            )));
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, self.to_file_contents())?;
        Ok(())
    }

    pub fn save(&self) -> bool {
        match self.try_save() {
            Ok(()) => {
                debug!("Saved category '{}' to {}", self.name, self.path.display());
                true
            }
            Err(err) => {
                error!("Failed to save category '{}': {}", self.name, err);
                false
            }
        }
    }

    /// Removes the backing file. An already missing file counts as deleted.
    pub fn delete(&self) -> bool {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                error!(
                    "Failed to delete category file {}: {}",
                    self.path.display(),
                    err
                );
            }
        }
        !self.path.exists()
    }

    pub fn render_inline(&self) -> String {
        self.choices.join(", ")
    }

    pub fn render_lines(&self) -> String {
        self.choices.join("\n")
    }

    pub fn render_numbered(&self) -> String {
        self.choices
            .iter()
            .enumerate()
            .map(|(i, choice)| format!("{}. {}", i + 1, choice))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render_paged(&self) -> String {
        self.choices
            .chunks(PAGE_SIZE)
            .map(|batch| batch.join(", "))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Comma-joined, or paged when that would be too long to read.
    pub fn render_summary(&self) -> String {
        let inline = self.render_inline();
        if self.choices.len() >= PAGED_CHOICE_COUNT || inline.chars().count() > INLINE_WIDTH {
            self.render_paged()
        } else {
            inline
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_validity() {
        assert!(Category::new("dir", "Pets", "What pet to get").is_valid());
        assert!(!Category::new("dir", "", "desc").is_valid());
        assert!(!Category::new("dir", "Pets", "  ").is_valid());
        assert!(!Category::empty().is_valid());
    }

    #[test]
    fn test_path_follows_name() {
        let mut category = Category::new("/data/Categories", "Food", "Dinner");
        assert_eq!(category.path(), Path::new("/data/Categories/Food.txt"));
        category.set_name("Lunch");
        assert_eq!(category.path(), Path::new("/data/Categories/Lunch.txt"));
    }

    #[test]
    fn test_new_does_not_write() {
        let tmp = tempdir().unwrap();
        let category = Category::new(tmp.path(), "Pets", "desc");
        assert!(!category.file_exists());
    }

    #[test]
    fn test_create_writes_when_absent() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("Categories");
        let category = Category::create(&dir, "Pets", "desc", strings(&["Dog", "Cat"]));
        assert!(category.file_exists());
        assert_eq!(
            fs::read_to_string(category.path()).unwrap(),
            "Pets\ndesc\nDog\nCat"
        );
    }

    #[test]
    fn test_create_keeps_existing_file() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("Pets.txt"), "Pets\nold\nFish").unwrap();
        Category::create(tmp.path(), "Pets", "new", strings(&["Dog"]));
        assert_eq!(
            fs::read_to_string(tmp.path().join("Pets.txt")).unwrap(),
            "Pets\nold\nFish"
        );
    }

    #[test]
    fn test_duplicate_choice_rejected_case_insensitively() {
        let mut category = Category::new("dir", "Pets", "desc");
        category.try_add_choice("Dog").unwrap();
        let err = category.try_add_choice("dog").unwrap_err();
        assert!(matches!(err, Error::Duplicate(_)));
        assert_eq!(category.choice_count(), 1);
    }

    #[test]
    fn test_blank_choice_rejected() {
        let mut category = Category::new("dir", "Pets", "desc");
        assert!(matches!(
            category.try_add_choice("   "),
            Err(Error::Validation(_))
        ));
        assert!(!category.has_choices());
    }

    #[test]
    fn test_remove_choice_shifts_later_elements() {
        let mut category =
            Category::with_choices("dir", "Pets", "desc", strings(&["Dog", "Cat", "Fish"]));
        assert_eq!(category.remove_choice(2), Some("Cat".to_string()));
        assert_eq!(category.choices(), &strings(&["Dog", "Fish"])[..]);
        assert_eq!(category.remove_choice(0), None);
        assert_eq!(category.remove_choice(3), None);
        assert_eq!(category.choice_count(), 2);
    }

    #[test]
    fn test_load_filters_unacceptable_choices() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("Food.txt");
        fs::write(&path, "Food\r\nDinner ideas\r\nPizza\r\n\r\n   \r\nTacos\r\npizza\r\n").unwrap();
        let category = Category::load(&path).unwrap();
        assert_eq!(category.name(), "Food");
        assert_eq!(category.description(), "Dinner ideas");
        assert_eq!(category.choices(), &strings(&["Pizza", "Tacos"])[..]);
    }

    #[test]
    fn test_load_rejects_truncated_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("Broken.txt");
        fs::write(&path, "Broken").unwrap();
        assert!(matches!(Category::load(&path), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_load_prefers_file_stem() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("Renamed.txt");
        fs::write(&path, "Original\ndesc\nA").unwrap();
        let category = Category::load(&path).unwrap();
        assert_eq!(category.name(), "Renamed");
        assert_eq!(category.path(), path.as_path());
    }

    #[test]
    fn test_save_refuses_invalid_category() {
        let tmp = tempdir().unwrap();
        let category = Category::new(tmp.path(), "Nameless", "");
        assert!(!category.save());
        assert!(!category.file_exists());
    }

    #[test]
    fn test_delete_missing_file_is_success() {
        let tmp = tempdir().unwrap();
        let category = Category::new(tmp.path(), "Ghost", "desc");
        assert!(category.delete());
    }

    #[test]
    fn test_set_description_resaves_existing_file() {
        let tmp = tempdir().unwrap();
        let mut category = Category::create(tmp.path(), "Pets", "old", strings(&["Dog"]));
        category.set_description("new").unwrap();
        assert_eq!(
            fs::read_to_string(category.path()).unwrap(),
            "Pets\nnew\nDog"
        );
    }

    #[test]
    fn test_render_summary_switches_to_pages() {
        let short = Category::with_choices("dir", "A", "d", strings(&["x", "y"]));
        assert_eq!(short.render_summary(), "x, y");

        let many: Vec<String> = (1..=85).map(|i| i.to_string()).collect();
        let long = Category::with_choices("dir", "B", "d", many);
        let rendered = long.render_summary();
        assert_eq!(rendered.lines().count(), 9);
        assert_eq!(rendered.lines().next().unwrap(), "1, 2, 3, 4, 5, 6, 7, 8, 9, 10");
        assert_eq!(rendered.lines().last().unwrap(), "81, 82, 83, 84, 85");
    }

    #[test]
    fn test_with_choices_trims_and_drops_repeats() {
        let tmp = tempdir().unwrap();
        let category = Category::with_choices(
            tmp.path(),
            "Pets",
            " padded ",
            strings(&["Dog", "dog", "  ", " Cat"]),
        );
        assert_eq!(category.description(), "padded");
        assert_eq!(category.choices(), &strings(&["Dog", "Cat"])[..]);

        assert!(category.save());
        let reloaded = Category::load(category.path()).unwrap();
        assert_eq!(reloaded, category);
    }

    #[test]
    fn test_set_dir_moves_path() {
        let mut category = Category::new("/a", "Food", "Dinner");
        category.set_dir("/b");
        assert_eq!(category.path(), Path::new("/b/Food.txt"));
        assert_eq!(category.dir(), Path::new("/b"));
    }

    #[test]
    fn test_render_numbered() {
        let category = Category::with_choices("dir", "A", "d", strings(&["x", "y"]));
        assert_eq!(category.render_numbered(), "1. x\n2. y");
        assert_eq!(category.render_lines(), "x\ny");
    }
}
