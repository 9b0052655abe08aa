use crate::error::{Error, Result};
use crate::text::is_acceptable;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

pub const DEFAULT_GREETING: &str = "Welcome to Decision Maker!";
pub const DEFAULT_EXIT_MESSAGE: &str = "Goodbye!";
pub const DEFAULT_DISPLAY_NAME: &str = "friend";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Greeting,
    ExitMessage,
    DisplayName,
}

impl ProfileField {
    pub const ALL: [ProfileField; 3] = [
        ProfileField::Greeting,
        ProfileField::ExitMessage,
        ProfileField::DisplayName,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ProfileField::Greeting => "Greeting.txt",
            ProfileField::ExitMessage => "Exit.txt",
            ProfileField::DisplayName => "Name.txt",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProfileField::Greeting => "greeting",
            ProfileField::ExitMessage => "exit message",
            ProfileField::DisplayName => "display name",
        }
    }

    fn default_value(self) -> &'static str {
        match self {
            ProfileField::Greeting => DEFAULT_GREETING,
            ProfileField::ExitMessage => DEFAULT_EXIT_MESSAGE,
            ProfileField::DisplayName => DEFAULT_DISPLAY_NAME,
        }
    }
}

/// The user's personality texts, one plain file per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    dir: PathBuf,
    pub greeting: String,
    pub exit_message: String,
    pub display_name: String,
}

impl Profile {
    /// Missing or blank files fall back to the defaults.
    pub fn load(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let read = |field: ProfileField| read_field(&dir, field);
        Self {
            greeting: read(ProfileField::Greeting),
            exit_message: read(ProfileField::ExitMessage),
            display_name: read(ProfileField::DisplayName),
            dir,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Greeting => &self.greeting,
            ProfileField::ExitMessage => &self.exit_message,
            ProfileField::DisplayName => &self.display_name,
        }
    }

    pub fn set(&mut self, field: ProfileField, value: &str) -> Result<()> {
        let value = value.trim();
        if !is_acceptable(value) {
            return Err(Error::Validation(format!(
                "{} is blank or too long",
                field.label()
            )));
        }
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(field.file_name()), value)?;
        let slot = match field {
            ProfileField::Greeting => &mut self.greeting,
            ProfileField::ExitMessage => &mut self.exit_message,
            ProfileField::DisplayName => &mut self.display_name,
        };
        *slot = value.to_string();
        Ok(())
    }

    pub fn set_greeting(&mut self, value: &str) -> Result<()> {
        self.set(ProfileField::Greeting, value)
    }

    pub fn set_exit_message(&mut self, value: &str) -> Result<()> {
        self.set(ProfileField::ExitMessage, value)
    }

    pub fn set_display_name(&mut self, value: &str) -> Result<()> {
        self.set(ProfileField::DisplayName, value)
    }

    /// Deletes the profile files and goes back to the defaults.
    pub fn reset(&mut self) -> bool {
        let mut all_removed = true;
        for field in ProfileField::ALL {
            let path = self.dir.join(field.file_name());
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    error!("Failed to remove {}: {}", path.display(), err);
                    all_removed = false;
                }
            }
        }
        *self = Self::load(self.dir.clone());
        all_removed
    }
}

fn read_field(dir: &Path, field: ProfileField) -> String {
    let path = dir.join(field.file_name());
    match fs::read_to_string(&path) {
        Ok(text) if is_acceptable(&text) => text.trim().to_string(),
        Ok(_) => field.default_value().to_string(),
        Err(err) => {
            if err.kind() != io::ErrorKind::NotFound {
                error!("Failed to read {}: {}", path.display(), err);
            } else {
                debug!("No {} set, using default", field.label());
            }
            field.default_value().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_missing() {
        let tmp = tempdir().unwrap();
        let profile = Profile::load(tmp.path().join("Profile"));
        assert_eq!(profile.greeting, DEFAULT_GREETING);
        assert_eq!(profile.exit_message, DEFAULT_EXIT_MESSAGE);
        assert_eq!(profile.display_name, DEFAULT_DISPLAY_NAME);
    }

    #[test]
    fn test_set_persists_and_reloads() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("Profile");
        let mut profile = Profile::load(&dir);
        profile.set_greeting("  Hi there  ").unwrap();
        profile.set_display_name("Sam").unwrap();

        let reloaded = Profile::load(&dir);
        assert_eq!(reloaded.greeting, "Hi there");
        assert_eq!(reloaded.display_name, "Sam");
        assert_eq!(reloaded.exit_message, DEFAULT_EXIT_MESSAGE);
        assert_eq!(fs::read_to_string(dir.join("Name.txt")).unwrap(), "Sam");
    }

    #[test]
    fn test_set_rejects_blank() {
        let tmp = tempdir().unwrap();
        let mut profile = Profile::load(tmp.path());
        assert!(matches!(
            profile.set_exit_message("   "),
            Err(Error::Validation(_))
        ));
        assert_eq!(profile.get(ProfileField::ExitMessage), DEFAULT_EXIT_MESSAGE);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let tmp = tempdir().unwrap();
        let mut profile = Profile::load(tmp.path());
        profile.set_exit_message("Later").unwrap();
        assert!(profile.reset());
        assert_eq!(profile.exit_message, DEFAULT_EXIT_MESSAGE);
        assert!(!tmp.path().join("Exit.txt").exists());
    }
}
