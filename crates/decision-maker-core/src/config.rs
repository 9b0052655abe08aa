use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub decisions_root: String,
    pub categories_dir: String,
    pub profile_dir: String,
    pub summaries_dir: String,
    pub draft_file: String,
    pub random_seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            decisions_root: "DecisionMaker".to_string(),
            categories_dir: "Categories".to_string(),
            profile_dir: "Profile".to_string(),
            summaries_dir: "Summaries".to_string(),
            draft_file: "Unfinished.txt".to_string(),
            random_seed: None,
        }
    }
}

impl AppConfig {
    /// Config rooted at `root` with default sub-directory names.
    pub fn rooted_at(root: impl Into<String>) -> Self {
        Self {
            decisions_root: root.into(),
            ..Self::default()
        }
    }

    pub fn root(&self) -> PathBuf {
        PathBuf::from(&self.decisions_root)
    }

    pub fn categories_path(&self) -> PathBuf {
        self.root().join(&self.categories_dir)
    }

    pub fn profile_path(&self) -> PathBuf {
        self.root().join(&self.profile_dir)
    }

    pub fn summaries_path(&self) -> PathBuf {
        self.root().join(&self.summaries_dir)
    }

    pub fn draft_path(&self) -> PathBuf {
        self.root().join(&self.draft_file)
    }
}

/// Defaults, then an optional `Config.*` file, then `DM_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig::default();
    let builder = Config::builder()
        .set_default("decisions_root", defaults.decisions_root)?
        .set_default("categories_dir", defaults.categories_dir)?
        .set_default("profile_dir", defaults.profile_dir)?
        .set_default("summaries_dir", defaults.summaries_dir)?
        .set_default("draft_file", defaults.draft_file)?
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("DM"))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
