use crate::actions::ActionTable;
use crate::category::{category_path, Category, CATEGORY_EXTENSION};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::files;
use crate::prompt::Prompter;
use crate::text::{is_acceptable, is_exit, is_stop_command, sanitize_file_name};
use chrono::Local;
use glob::Pattern;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

pub const SAVED_TAG: &str = "saved category";
pub const ONE_OFF_TAG: &str = "one-off decision";

/// Owns every saved category and keeps them in step with the categories
/// directory, one `<name>.txt` file per category.
///
/// Filesystem failures never escape this type: they are logged and reported
/// as `false`, `None` or an empty list.
pub struct CategoryStore {
    categories_dir: PathBuf,
    summaries_dir: PathBuf,
    categories: Vec<Category>,
    decision_log: Vec<String>,
    actions: ActionTable,
    rng: StdRng,
}

impl CategoryStore {
    /// Store without any categories loaded yet.
    pub fn new(categories_dir: impl Into<PathBuf>, summaries_dir: impl Into<PathBuf>) -> Self {
        Self {
            categories_dir: categories_dir.into(),
            summaries_dir: summaries_dir.into(),
            categories: Vec::new(),
            decision_log: Vec::new(),
            actions: ActionTable::default(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates the categories directory if needed and loads what is in it.
    pub fn open(config: &AppConfig) -> Self {
        let mut store = Self::new(config.categories_path(), config.summaries_path());
        if let Some(seed) = config.random_seed {
            store = store.with_seed(seed);
        }
        if let Err(err) = fs::create_dir_all(&store.categories_dir) {
            error!(
                "Could not create categories directory {}: {}",
                store.categories_dir.display(),
                err
            );
        }
        store.sync();
        info!(
            "Loaded {} categories from {}",
            store.len(),
            store.categories_dir.display()
        );
        store
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_actions(mut self, actions: ActionTable) -> Self {
        self.actions = actions;
        self
    }

    pub fn categories_dir(&self) -> &Path {
        &self.categories_dir
    }

    pub fn summaries_dir(&self) -> &Path {
        &self.summaries_dir
    }

    pub fn actions(&self) -> &ActionTable {
        &self.actions
    }

    pub fn decision_log(&self) -> &[String] {
        &self.decision_log
    }

    pub fn has_categories(&self) -> bool {
        !self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name() == name)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(Category::name).collect()
    }

    /// `(name, description)` pairs in display order.
    pub fn list(&self) -> Vec<(&str, &str)> {
        self.categories
            .iter()
            .map(|c| (c.name(), c.description()))
            .collect()
    }

    /// Category at a 1-based menu position.
    pub fn resolve(&self, position: usize) -> Option<&Category> {
        position
            .checked_sub(1)
            .and_then(|index| self.categories.get(index))
    }

    pub fn render_listing(&self) -> String {
        self.categories
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{}. {}", i + 1, c))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// In-memory category that would live in this store's directory, under
    /// its sanitized name.
    pub fn new_category(&self, name: &str, description: &str) -> Category {
        Category::new(&self.categories_dir, &sanitize_file_name(name), description)
    }

    /// Sanitizes a proposed name and checks it is usable and not taken.
    pub fn validate_new_name(&self, raw: &str) -> Result<String> {
        self.validate_name_excluding(raw, None)
    }

    /// Like [`CategoryStore::validate_new_name`], but the category being
    /// renamed does not count as taken, so a case-only change is allowed.
    pub fn validate_rename(&self, current: &str, raw: &str) -> Result<String> {
        self.validate_name_excluding(raw, Some(current))
    }

    fn validate_name_excluding(&self, raw: &str, current: Option<&str>) -> Result<String> {
        let name = sanitize_file_name(raw);
        if !is_acceptable(&name) {
            return Err(Error::Validation("name is blank or too long".into()));
        }
        let lowered = name.to_lowercase();
        if self
            .categories
            .iter()
            .filter(|c| Some(c.name()) != current)
            .any(|c| c.name().to_lowercase() == lowered)
        {
            return Err(Error::Duplicate(name));
        }
        Ok(name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name() == name)
    }

    /// Names of the category files currently on disk. Best effort: any error
    /// gives an empty list.
    pub fn scan_directory(&self) -> Vec<String> {
        let dir = Pattern::escape(&self.categories_dir.to_string_lossy());
        let pattern = format!("{}/*.{}", dir, CATEGORY_EXTENSION);

        let paths = match glob::glob(&pattern) {
            Ok(paths) => paths,
            Err(err) => {
                error!("Invalid category pattern '{}': {}", pattern, err);
                return Vec::new();
            }
        };

        let mut names = Vec::new();
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => {
                    if let Some(stem) = path.file_stem() {
                        names.push(stem.to_string_lossy().into_owned());
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    error!(
                        "Error scanning {}: {}",
                        self.categories_dir.display(),
                        err
                    );
                    return Vec::new();
                }
            }
        }
        names
    }

    /// Loads every category file not yet in the store. Returns how many were added.
    pub fn sync_new_from_directory(&mut self) -> usize {
        let mut added = 0;
        for name in self.scan_directory() {
            if self.contains(&name) {
                continue;
            }
            let path = category_path(&self.categories_dir, &name);
            match Category::load(&path) {
                Ok(category) => {
                    debug!("Loaded category '{}'", category.name());
                    self.categories.push(category);
                    added += 1;
                }
                Err(err) => warn!("Skipping category file {}: {}", path.display(), err),
            }
        }
        added
    }

    /// Drops every category whose file is gone. Returns how many were dropped.
    pub fn prune_stale_from_directory(&mut self) -> usize {
        let on_disk: HashSet<String> = self.scan_directory().into_iter().collect();
        let before = self.categories.len();
        self.categories.retain(|c| on_disk.contains(c.name()));
        let removed = before - self.categories.len();
        if removed > 0 {
            debug!("Pruned {} stale categories", removed);
        }
        removed
    }

    pub fn sync(&mut self) {
        self.prune_stale_from_directory();
        self.sync_new_from_directory();
    }

    /// Writes the file, then registers the category.
    ///
    /// The name is sanitized and the file always lands directly in the
    /// categories directory. The write happens even when the name is already
    /// registered; in that case the registration is refused and `false` is
    /// returned.
    pub fn create_and_register(&mut self, mut category: Category) -> bool {
        let name = sanitize_file_name(category.name());
        if !is_acceptable(&name) {
            warn!("Refusing category with unusable name '{}'", category.name());
            return false;
        }
        if name != category.name() {
            debug!("Category name '{}' stored as '{}'", category.name(), name);
            category.set_name(&name);
        }
        if category.dir() != self.categories_dir.as_path() {
            category.set_dir(&self.categories_dir);
        }
        if !category.save() {
            return false;
        }
        if self.contains(category.name()) {
            warn!("Category '{}' is already registered", category.name());
            return false;
        }
        info!("Registered category '{}'", category.name());
        self.categories.push(category);
        true
    }

    /// Unregisters the category and deletes its file. Unknown names are refused
    /// without touching the filesystem.
    pub fn delete_and_unregister(&mut self, name: &str) -> bool {
        let Some(index) = self.position(name) else {
            warn!("Cannot delete unknown category '{}'", name);
            return false;
        };
        let category = self.categories.remove(index);
        let deleted = category.delete();
        if deleted {
            info!("Deleted category '{}'", name);
        } else {
            error!("Category '{}' was unregistered but its file remains", name);
        }
        deleted
    }

    /// Unregisters the old name and registers the new one, keeping the display
    /// position. If the second half fails the old name is restored.
    pub fn rename(&mut self, name: &str, new_name: &str) -> bool {
        let Some(index) = self.position(name) else {
            warn!("Cannot rename unknown category '{}'", name);
            return false;
        };
        let new_name = match self.validate_rename(name, new_name) {
            Ok(new_name) => new_name,
            Err(err) => {
                warn!("Cannot rename '{}': {}", name, err);
                return false;
            }
        };

        let mut category = self.categories[index].clone();
        if !self.delete_and_unregister(name) {
            self.categories.insert(index, category);
            return false;
        }

        category.set_name(&new_name);
        if self.create_and_register(category.clone()) {
            if let Some(renamed) = self.categories.pop() {
                self.categories.insert(index, renamed);
            }
            return true;
        }

        error!(
            "Could not register '{}', restoring '{}'",
            new_name, name
        );
        category.set_name(name);
        if category.save() {
            self.categories.insert(index, category);
        } else {
            error!("Category '{}' could not be restored", name);
        }
        false
    }

    pub fn set_description(&mut self, name: &str, description: &str) -> bool {
        let Some(category) = self.categories.iter_mut().find(|c| c.name() == name) else {
            return false;
        };
        match category.set_description(description) {
            Ok(()) => true,
            Err(err) => {
                warn!("Cannot change description of '{}': {}", name, err);
                false
            }
        }
    }

    /// Picks one choice uniformly and records it in the decision log.
    /// `None` when the category has no choices.
    pub fn decide(&mut self, category: &Category) -> Option<String> {
        if !category.has_choices() {
            info!("Category '{}' has no choices to decide from", category.name());
            return None;
        }
        let index = self.rng.gen_range(0..category.choice_count());
        let chosen = category.choice(index)?.to_string();
        let tag = if self.contains(category.name()) {
            SAVED_TAG
        } else {
            ONE_OFF_TAG
        };
        self.decision_log
            .push(format!("{} ({}): {}", category.name(), tag, chosen));
        Some(chosen)
    }

    pub fn decide_saved(&mut self, name: &str) -> Option<String> {
        let category = self.get(name)?.clone();
        self.decide(&category)
    }

    /// Uniform integer in `[min(a, b), max(a, b)]`.
    pub fn pick_random_range(&mut self, a: i64, b: i64) -> i64 {
        let (low, high) = (a.min(b), a.max(b));
        if low == high {
            info!("Both bounds are {}, so that is the pick", low);
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    /// Reads new choices for a saved category and saves it when any were added.
    pub fn add_choices(&mut self, name: &str, prompter: &mut dyn Prompter) -> bool {
        let Some(index) = self.position(name) else {
            return false;
        };
        let mut category = self.categories[index].clone();
        let added = match collect_choices(&mut category, prompter) {
            Ok(added) => added,
            Err(err) => {
                error!("Reading choices for '{}' failed: {}", name, err);
                return false;
            }
        };
        if added == 0 {
            return false;
        }
        let saved = category.save();
        self.categories[index] = category;
        saved
    }

    /// Interactive removal from a saved category; saves when anything was removed.
    pub fn remove_choices(&mut self, name: &str, prompter: &mut dyn Prompter) -> bool {
        let Some(index) = self.position(name) else {
            return false;
        };
        let mut category = self.categories[index].clone();
        let removed = match remove_choices_from(&mut category, prompter) {
            Ok(removed) => removed,
            Err(err) => {
                error!("Removing choices from '{}' failed: {}", name, err);
                return false;
            }
        };
        if removed == 0 {
            return false;
        }
        let saved = category.save();
        self.categories[index] = category;
        saved
    }

    /// Saves every category. One failure fails the call, but all are attempted.
    pub fn save_all(&self) -> bool {
        self.categories
            .iter()
            .fold(true, |all_saved, category| category.save() && all_saved)
    }

    /// Deletes every category file, then drops the now stale entries.
    pub fn delete_all_categories(&mut self) -> usize {
        let deleted = files::delete_all_categories(&self.categories_dir);
        self.prune_stale_from_directory();
        deleted
    }

    /// First free `Session <stamp>.txt`, then `Session <stamp> (2).txt` and so on.
    fn summary_path(&self, stamp: &str) -> PathBuf {
        let mut path = self.summaries_dir.join(format!("Session {}.txt", stamp));
        let mut copy = 1;
        while path.exists() {
            copy += 1;
            path = self
                .summaries_dir
                .join(format!("Session {} ({}).txt", stamp, copy));
        }
        path
    }

    pub fn render_decision_log(&self) -> String {
        let mut out = String::from("Decisions made this session:");
        for (i, entry) in self.decision_log.iter().enumerate() {
            out.push_str(&format!("\n{}. {}", i + 1, entry));
        }
        out
    }

    /// Writes the decision log to a timestamped file. `false` when there is
    /// nothing to write or the write fails. An existing summary is never
    /// overwritten.
    pub fn summarize_and_persist_session(&self) -> bool {
        if self.decision_log.is_empty() {
            return false;
        }
        let stamp = Local::now().format("%Y-%m-%d %H-%M-%S%.3f").to_string();
        let path = self.summary_path(&stamp);
        let result = fs::create_dir_all(&self.summaries_dir).and_then(|_| {
            fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .and_then(|mut file| file.write_all(self.render_decision_log().as_bytes()))
        });
        match result {
            Ok(()) => {
                info!("Session summary written to {}", path.display());
                true
            }
            Err(err) => {
                error!("Failed to write session summary {}: {}", path.display(), err);
                false
            }
        }
    }
}

/// Prompts for choices until a stop command. A stop command is ignored while
/// the category has no choices at all; end of input always stops.
pub fn collect_choices(category: &mut Category, prompter: &mut dyn Prompter) -> io::Result<usize> {
    let mut added = 0;
    loop {
        let Some(input) = prompter.ask("Choice (type 'done' to finish): ")? else {
            break;
        };
        let input = input.trim();
        if is_stop_command(input) {
            if category.has_choices() {
                break;
            }
            prompter.say("Add at least one choice first.")?;
            continue;
        }
        match category.try_add_choice(input) {
            Ok(()) => added += 1,
            Err(Error::Duplicate(choice)) => {
                prompter.say(&format!("'{}' is already a choice.", choice))?
            }
            Err(err) => prompter.say(&format!("Not added: {}", err))?,
        }
    }
    Ok(added)
}

/// Numbered removal loop. The position after the last choice removes all of them.
pub fn remove_choices_from(
    category: &mut Category,
    prompter: &mut dyn Prompter,
) -> io::Result<usize> {
    let mut removed = 0;
    loop {
        if !category.has_choices() {
            prompter.say("No choices left.")?;
            break;
        }
        let remove_all = category.choice_count() + 1;
        prompter.say(&category.render_numbered())?;
        prompter.say(&format!("{}. Remove all choices", remove_all))?;

        let Some(input) = prompter.ask("Choice to remove (or 'exit'): ")? else {
            break;
        };
        if is_exit(&input) {
            break;
        }
        match input.trim().parse::<usize>() {
            Ok(n) if n == remove_all => {
                removed += category.choice_count();
                category.clear_choices();
            }
            Ok(n) => match category.remove_choice(n) {
                Some(choice) => {
                    prompter.say(&format!("Removed '{}'.", choice))?;
                    removed += 1;
                }
                None => prompter.say("Invalid option.")?,
            },
            Err(_) => prompter.say("Invalid option.")?,
        }
    }
    Ok(removed)
}
