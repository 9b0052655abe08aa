use crate::help::HELP_TEXT;
use colored::*;
use decision_maker_core::files;
use decision_maker_core::store::collect_choices;
use decision_maker_core::text::{is_acceptable, is_exit};
use decision_maker_core::{
    AppConfig, Category, CategoryAction, CategoryStore, Draft, Error, Profile, ProfileField,
    Prompter,
};
use std::io;
use std::path::PathBuf;
use tracing::{debug, error, info};

const ONE_OFF_NAME: &str = "One-off";

/// Answer to a numbered menu prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Exit,
    Position(usize),
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainItem {
    DecideSaved,
    CreateCategory,
    OneOff,
    RandomNumber,
    ManageCategory,
    DeleteAll,
    Personality,
    FileManagement,
    Help,
}

impl MainItem {
    const ALL: [MainItem; 9] = [
        MainItem::DecideSaved,
        MainItem::CreateCategory,
        MainItem::OneOff,
        MainItem::RandomNumber,
        MainItem::ManageCategory,
        MainItem::DeleteAll,
        MainItem::Personality,
        MainItem::FileManagement,
        MainItem::Help,
    ];

    fn label(self) -> &'static str {
        match self {
            MainItem::DecideSaved => "Decide with a saved category",
            MainItem::CreateCategory => "Create a new category",
            MainItem::OneOff => "One-off decision",
            MainItem::RandomNumber => "Random number",
            MainItem::ManageCategory => "Manage a category",
            MainItem::DeleteAll => "Delete all categories",
            MainItem::Personality => "Personality",
            MainItem::FileManagement => "File management",
            MainItem::Help => "Help",
        }
    }
}

/// Numbered console menus on top of the category store.
pub struct MenuDriver<P: Prompter> {
    store: CategoryStore,
    profile: Profile,
    draft: Draft,
    root: PathBuf,
    prompter: P,
}

impl<P: Prompter> MenuDriver<P> {
    pub fn new(config: &AppConfig, store: CategoryStore, prompter: P) -> Self {
        Self {
            store,
            profile: Profile::load(config.profile_path()),
            draft: Draft::new(config.draft_path()),
            root: config.root(),
            prompter,
        }
    }

    pub fn store(&self) -> &CategoryStore {
        &self.store
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Main loop. Returns when the user exits or input runs out.
    ///
    /// The session is always finished, even when the console fails; the
    /// first error is returned afterwards.
    pub fn run(&mut self) -> io::Result<()> {
        let outcome = self.main_loop();
        if let Err(err) = &outcome {
            error!("Menu stopped on console error: {}", err);
        }
        let finished = self.finish();
        outcome.and(finished)
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let greeting = format!(
            "{} Hello, {}!",
            self.profile.greeting, self.profile.display_name
        );
        self.say(&greeting.cyan().to_string())?;

        loop {
            let menu = MainItem::ALL
                .iter()
                .enumerate()
                .map(|(i, item)| format!("{}. {}", i + 1, item.label()))
                .collect::<Vec<_>>()
                .join("\n");
            self.say(&menu)?;

            let item = match self.ask_position("Choose an option (or 'exit'): ")? {
                Selection::Exit => break,
                Selection::Position(n) => {
                    match n.checked_sub(1).and_then(|i| MainItem::ALL.get(i).copied()) {
                        Some(item) => item,
                        None => {
                            self.say_invalid()?;
                            continue;
                        }
                    }
                }
                Selection::Invalid => {
                    self.say_invalid()?;
                    continue;
                }
            };
            debug!("Main menu: {:?}", item);

            match item {
                MainItem::DecideSaved => self.decide_saved()?,
                MainItem::CreateCategory => self.create_category()?,
                MainItem::OneOff => self.one_off()?,
                MainItem::RandomNumber => self.random_number()?,
                MainItem::ManageCategory => self.manage_category()?,
                MainItem::DeleteAll => self.delete_all()?,
                MainItem::Personality => self.personality()?,
                MainItem::FileManagement => self.file_management()?,
                MainItem::Help => self.say(HELP_TEXT)?,
            }
        }
        Ok(())
    }

    /// Saves everything and writes the session summary.
    pub fn finish(&mut self) -> io::Result<()> {
        if !self.store.save_all() {
            self.say(&"Some categories could not be saved.".red().to_string())?;
        }
        if self.store.summarize_and_persist_session() {
            self.say(&self.store.render_decision_log())?;
        }
        let farewell = self.profile.exit_message.clone();
        self.say(&farewell)
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        self.prompter.say(message)
    }

    fn say_invalid(&mut self) -> io::Result<()> {
        self.say(&"Invalid option.".red().to_string())
    }

    fn ask_position(&mut self, prompt: &str) -> io::Result<Selection> {
        let Some(input) = self.prompter.ask(prompt)? else {
            return Ok(Selection::Exit);
        };
        if is_exit(&input) {
            return Ok(Selection::Exit);
        }
        Ok(match input.trim().parse::<usize>() {
            Ok(n) => Selection::Position(n),
            Err(_) => Selection::Invalid,
        })
    }

    /// Asks until an acceptable line is given. `None` on exit.
    fn ask_text(&mut self, prompt: &str) -> io::Result<Option<String>> {
        loop {
            let Some(input) = self.prompter.ask(prompt)? else {
                return Ok(None);
            };
            if is_exit(&input) {
                return Ok(None);
            }
            if is_acceptable(&input) {
                return Ok(Some(input.trim().to_string()));
            }
            self.say("Please enter some text (at most 360 characters).")?;
        }
    }

    fn ask_number(&mut self, prompt: &str) -> io::Result<Option<i64>> {
        loop {
            let Some(input) = self.prompter.ask(prompt)? else {
                return Ok(None);
            };
            if is_exit(&input) {
                return Ok(None);
            }
            match input.trim().parse::<i64>() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => self.say("That is not a whole number.")?,
            }
        }
    }

    /// Lists categories and asks for one. `None` on exit or when there are none.
    fn pick_category(&mut self) -> io::Result<Option<String>> {
        if !self.store.has_categories() {
            self.say("There are no saved categories yet.")?;
            return Ok(None);
        }
        loop {
            let listing = self.store.render_listing();
            self.say(&listing)?;
            match self.ask_position("Category number (or 'exit'): ")? {
                Selection::Exit => return Ok(None),
                Selection::Position(n) => {
                    if let Some(category) = self.store.resolve(n) {
                        return Ok(Some(category.name().to_string()));
                    }
                    self.say_invalid()?;
                }
                Selection::Invalid => self.say_invalid()?,
            }
        }
    }

    fn announce(&mut self, chosen: &str) -> io::Result<()> {
        let message = format!(
            "{}, you should go with: {}",
            self.profile.display_name,
            chosen.green().bold()
        );
        self.say(&message)
    }

    fn decide_saved(&mut self) -> io::Result<()> {
        let Some(name) = self.pick_category()? else {
            return Ok(());
        };
        self.decide_on(&name)
    }

    fn decide_on(&mut self, name: &str) -> io::Result<()> {
        match self.store.decide_saved(name) {
            Some(chosen) => self.announce(&chosen),
            None => self.say(&format!("'{}' has no choices yet.", name)),
        }
    }

    fn create_category(&mut self) -> io::Result<()> {
        let mut category = match self.resume_draft()? {
            Some(category) => category,
            None => match self.ask_new_name()? {
                Some(name) => self.store.new_category(&name, ""),
                None => return Ok(()),
            },
        };
        self.draft.save(&category);

        if !is_acceptable(category.description()) {
            let Some(description) = self.ask_text("Description: ")? else {
                self.say("Left unfinished; it will be offered again next time.")?;
                return Ok(());
            };
            if let Err(err) = category.set_description(&description) {
                self.say(&err.to_string())?;
                return Ok(());
            }
            self.draft.save(&category);
        }

        self.say("Enter the choices, one per line.")?;
        collect_choices(&mut category, &mut self.prompter)?;
        if !category.has_choices() {
            self.draft.save(&category);
            self.say("Left unfinished; it will be offered again next time.")?;
            return Ok(());
        }

        let name = category.name().to_string();
        if self.store.create_and_register(category) {
            self.draft.clear();
            self.say(&format!("Saved category '{}'.", name).green().to_string())
        } else {
            self.say(&format!("Could not save category '{}'.", name).red().to_string())
        }
    }

    fn resume_draft(&mut self) -> io::Result<Option<Category>> {
        let Some(draft) = self.draft.load(self.store.categories_dir()) else {
            return Ok(None);
        };
        let question = format!("Resume unfinished category '{}'?", draft.name());
        if !self.prompter.confirm(&question, Some(true))? {
            self.draft.clear();
            return Ok(None);
        }
        if let Err(err) = self.store.validate_new_name(draft.name()) {
            self.say(&format!("The draft can't be resumed: {}", err))?;
            self.draft.clear();
            return Ok(None);
        }
        info!("Resuming draft '{}'", draft.name());
        Ok(Some(draft))
    }

    fn ask_new_name(&mut self) -> io::Result<Option<String>> {
        loop {
            let Some(raw) = self.ask_text("Category name: ")? else {
                return Ok(None);
            };
            match self.store.validate_new_name(&raw) {
                Ok(name) => {
                    if name != raw {
                        self.say(&format!(
                            "Some characters can't be used in file names; it will be called '{}'.",
                            name
                        ))?;
                    }
                    return Ok(Some(name));
                }
                Err(Error::Duplicate(name)) => {
                    self.say(&format!("A category called '{}' already exists.", name))?
                }
                Err(err) => self.say(&err.to_string())?,
            }
        }
    }

    fn one_off(&mut self) -> io::Result<()> {
        let mut category = Category::new(
            self.store.categories_dir(),
            ONE_OFF_NAME,
            "Unsaved decision",
        );
        self.say("Enter the choices, one per line.")?;
        collect_choices(&mut category, &mut self.prompter)?;
        match self.store.decide(&category) {
            Some(chosen) => self.announce(&chosen),
            None => Ok(()),
        }
    }

    fn random_number(&mut self) -> io::Result<()> {
        let Some(first) = self.ask_number("First number: ")? else {
            return Ok(());
        };
        let Some(second) = self.ask_number("Second number: ")? else {
            return Ok(());
        };
        let value = self.store.pick_random_range(first, second);
        if first == second {
            self.say(&format!(
                "Both numbers are the same, so the answer is {}.",
                value
            ))
        } else {
            let message = format!("Your random number is {}", value.to_string().green().bold());
            self.say(&message)
        }
    }

    fn manage_category(&mut self) -> io::Result<()> {
        let Some(mut name) = self.pick_category()? else {
            return Ok(());
        };

        loop {
            let (header, menu) = match self.store.get(&name) {
                Some(category) => (category.to_string(), self.store.actions().render_menu()),
                None => return Ok(()),
            };
            self.say(&header.cyan().to_string())?;
            self.say(&menu)?;

            let spec = match self.ask_position("Action number (or 'exit'): ")? {
                Selection::Exit => return Ok(()),
                Selection::Position(n) => match self.store.actions().resolve(n) {
                    Some(spec) => spec.clone(),
                    None => {
                        self.say_invalid()?;
                        continue;
                    }
                },
                Selection::Invalid => {
                    self.say_invalid()?;
                    continue;
                }
            };

            match spec.action {
                CategoryAction::Decide => self.decide_on(&name)?,
                CategoryAction::ReadChoices => self.read_choices(&name)?,
                CategoryAction::Rename => {
                    if let Some(renamed) = self.rename(&name)? {
                        name = renamed;
                    }
                }
                CategoryAction::EditDescription => self.edit_description(&name)?,
                CategoryAction::AddChoices => {
                    if self.store.add_choices(&name, &mut self.prompter) {
                        self.say("Choices saved.")?;
                    } else {
                        self.say("No choices were added.")?;
                    }
                }
                CategoryAction::RemoveChoices => {
                    if self.store.remove_choices(&name, &mut self.prompter) {
                        self.say("Choices removed.")?;
                    }
                }
                CategoryAction::DeleteCategory => self.delete_category(&name)?,
            }

            if spec.terminal {
                return Ok(());
            }
        }
    }

    fn read_choices(&mut self, name: &str) -> io::Result<()> {
        let text = match self.store.get(name) {
            Some(category) if category.has_choices() => category.render_summary(),
            Some(_) => "(no choices yet)".to_string(),
            None => return Ok(()),
        };
        self.say(&text)
    }

    fn rename(&mut self, name: &str) -> io::Result<Option<String>> {
        loop {
            let Some(raw) = self.ask_text("New name: ")? else {
                return Ok(None);
            };
            let new_name = match self.store.validate_rename(name, &raw) {
                Ok(new_name) => new_name,
                Err(err) => {
                    self.say(&err.to_string())?;
                    continue;
                }
            };
            if self.store.rename(name, &new_name) {
                self.say(&format!("Renamed to '{}'.", new_name))?;
                return Ok(Some(new_name));
            }
            self.say(&"Rename failed.".red().to_string())?;
            return Ok(None);
        }
    }

    fn edit_description(&mut self, name: &str) -> io::Result<()> {
        let Some(description) = self.ask_text("New description: ")? else {
            return Ok(());
        };
        if self.store.set_description(name, &description) {
            self.say("Description updated.")
        } else {
            self.say(&"Description could not be saved.".red().to_string())
        }
    }

    fn delete_category(&mut self, name: &str) -> io::Result<()> {
        let question = format!("Delete '{}' and all of its choices?", name);
        if !self.prompter.confirm(&question, Some(false))? {
            return Ok(());
        }
        if self.store.delete_and_unregister(name) {
            self.say(&format!("Deleted '{}'.", name))
        } else {
            self.say(&format!("'{}' could not be deleted.", name).red().to_string())
        }
    }

    fn delete_all(&mut self) -> io::Result<()> {
        if !self.store.has_categories() {
            return self.say("There are no saved categories.");
        }
        if !self
            .prompter
            .confirm("Are you SURE you want to delete EVERY category?", Some(false))?
        {
            return Ok(());
        }
        let deleted = self.store.delete_all_categories();
        self.say(&format!("Deleted {} categories.", deleted))
    }

    fn personality(&mut self) -> io::Result<()> {
        loop {
            let mut lines: Vec<String> = ProfileField::ALL
                .iter()
                .enumerate()
                .map(|(i, field)| {
                    format!("{}. Change {} ({})", i + 1, field.label(), self.profile.get(*field))
                })
                .collect();
            lines.push(format!("{}. Reset everything", ProfileField::ALL.len() + 1));
            self.say(&lines.join("\n"))?;

            let field = match self.ask_position("Option (or 'exit'): ")? {
                Selection::Exit => return Ok(()),
                Selection::Position(n) if n == ProfileField::ALL.len() + 1 => {
                    if self.profile.reset() {
                        self.say("Personality reset.")?;
                    }
                    continue;
                }
                Selection::Position(n) => {
                    match n.checked_sub(1).and_then(|i| ProfileField::ALL.get(i).copied()) {
                        Some(field) => field,
                        None => {
                            self.say_invalid()?;
                            continue;
                        }
                    }
                }
                Selection::Invalid => {
                    self.say_invalid()?;
                    continue;
                }
            };

            let Some(value) = self.ask_text(&format!("New {}: ", field.label()))? else {
                continue;
            };
            match self.profile.set(field, &value) {
                Ok(()) => self.say(&format!("Your {} is now '{}'.", field.label(), value))?,
                Err(err) => self.say(&err.to_string())?,
            }
        }
    }

    fn file_management(&mut self) -> io::Result<()> {
        const OPTIONS: [&str; 4] = [
            "List files",
            "View a file",
            "Delete a file",
            "List session summaries",
        ];
        loop {
            let menu = OPTIONS
                .iter()
                .enumerate()
                .map(|(i, label)| format!("{}. {}", i + 1, label))
                .collect::<Vec<_>>()
                .join("\n");
            self.say(&menu)?;

            match self.ask_position("Option (or 'exit'): ")? {
                Selection::Exit => return Ok(()),
                Selection::Position(1) => {
                    let listing = self.render_files(&files::list_files(&self.root));
                    self.say(&listing)?;
                }
                Selection::Position(2) => {
                    if let Some(path) = self.pick_file()? {
                        match files::read_file(&path) {
                            Ok(text) => self.say(&text)?,
                            Err(err) => self.say(&err.to_string())?,
                        }
                    }
                }
                Selection::Position(3) => {
                    if let Some(path) = self.pick_file()? {
                        let shown = files::display_name(&self.root, &path);
                        let question = format!("Delete {}?", shown);
                        if self.prompter.confirm(&question, Some(false))? {
                            if files::delete_file(&path) {
                                self.store.sync();
                                self.say(&format!("Deleted {}.", shown))?;
                            } else {
                                self.say(&format!("{} could not be deleted.", shown))?;
                            }
                        }
                    }
                }
                Selection::Position(4) => {
                    let summaries = files::list_summaries(self.store.summaries_dir());
                    let listing = self.render_files(&summaries);
                    self.say(&listing)?;
                }
                _ => self.say_invalid()?,
            }
        }
    }

    fn render_files(&self, paths: &[PathBuf]) -> String {
        if paths.is_empty() {
            return "(no files)".to_string();
        }
        paths
            .iter()
            .enumerate()
            .map(|(i, path)| format!("{}. {}", i + 1, files::display_name(&self.root, path)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn pick_file(&mut self) -> io::Result<Option<PathBuf>> {
        let paths = files::list_files(&self.root);
        if paths.is_empty() {
            self.say("(no files)")?;
            return Ok(None);
        }
        let listing = self.render_files(&paths);
        self.say(&listing)?;
        loop {
            match self.ask_position("File number (or 'exit'): ")? {
                Selection::Exit => return Ok(None),
                Selection::Position(n) => {
                    if let Some(path) = n.checked_sub(1).and_then(|i| paths.get(i)) {
                        return Ok(Some(path.clone()));
                    }
                    self.say_invalid()?;
                }
                Selection::Invalid => self.say_invalid()?,
            }
        }
    }
}
