use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "car-price-estimator", version, about = "Used car price estimator")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP server (default)
    Start,

    /// Check configuration and artifact loading without serving
    Test,

    /// Estimate a single price from the command line
    Predict(PredictArgs),

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct PredictArgs {
    /// Model year
    #[arg(long)]
    pub year: i64,

    /// Manufacturer, as seen during training
    #[arg(long)]
    pub make: String,

    /// Model name, as seen during training
    #[arg(long)]
    pub model: String,

    /// Odometer reading
    #[arg(long)]
    pub mileage: f64,

    /// Condition score, typically 1-10 (defaults to 5)
    #[arg(long)]
    pub condition: Option<i64>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the effective configuration
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }
}
