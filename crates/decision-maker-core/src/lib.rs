pub mod actions;
pub mod category;
pub mod config;
pub mod draft;
pub mod error;
pub mod files;
pub mod profile;
pub mod prompt;
pub mod store;
pub mod text;

pub use actions::{ActionSpec, ActionTable, CategoryAction};
pub use category::Category;
pub use config::AppConfig;
pub use draft::Draft;
pub use error::{Error, Result};
pub use profile::{Profile, ProfileField};
pub use prompt::{ConsolePrompter, Prompter, ScriptedPrompter};
pub use store::CategoryStore;
