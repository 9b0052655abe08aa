use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "decision-maker")]
#[command(about = "Let a saved list of choices make the call", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List saved categories
    List,
    /// Pick a choice from a saved category
    Decide {
        /// Category name
        name: String,
    },
    /// Pick a random whole number between two bounds (inclusive)
    #[command(allow_negative_numbers = true)]
    Random { first: i64, second: i64 },
    /// Pick one of the given choices without saving anything
    OneOff {
        #[arg(required = true)]
        choices: Vec<String>,
    },
    /// Print configuration values
    PrintConfig,
}
