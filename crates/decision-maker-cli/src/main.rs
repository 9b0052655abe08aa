mod commands;
mod help;
mod logging;
mod menu;

use std::process;

use clap::Parser;
use colored::*;
use commands::{Cli, Commands};
use decision_maker_core::{AppConfig, Category, CategoryStore, ConsolePrompter};
use dotenv::dotenv;
use menu::MenuDriver;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match decision_maker_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    match args.command {
        None => {
            let store = CategoryStore::open(&config);
            let mut driver = MenuDriver::new(&config, store, ConsolePrompter::stdio());
            driver.run()?;
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
        }
        Some(command) => run_command(&config, command),
    }

    Ok(())
}

fn run_command(config: &AppConfig, command: Commands) {
    let mut store = CategoryStore::open(config);

    match command {
        Commands::List => {
            if store.has_categories() {
                println!("{}", store.render_listing());
            } else {
                println!("No saved categories in {}", store.categories_dir().display());
            }
        }
        Commands::Decide { name } => {
            if !store.contains(&name) {
                error!("No category named '{}'", name);
            } else {
                match store.decide_saved(&name) {
                    Some(chosen) => println!("{}", chosen.green().bold()),
                    None => println!("'{}' has no choices yet.", name),
                }
            }
        }
        Commands::Random { first, second } => {
            let value = store.pick_random_range(first, second);
            println!("{}", value.to_string().green().bold());
        }
        Commands::OneOff { choices } => {
            let mut category = Category::new(store.categories_dir(), "One-off", "Unsaved decision");
            for choice in &choices {
                if let Err(err) = category.try_add_choice(choice) {
                    info!("Ignoring '{}': {}", choice, err);
                }
            }
            match store.decide(&category) {
                Some(chosen) => println!("{}", chosen.green().bold()),
                None => error!("No usable choices given"),
            }
        }
        Commands::PrintConfig => println!("Configuration: {:?}", config),
    }

    store.summarize_and_persist_session();
}
