use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "app-calorie")]
#[command(about = "Food calorie table backed by a relational store and a photo analysis service")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "app-calorie.toml")]
    pub config: PathBuf,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the food table as stored in the database
    List {
        #[arg(long)]
        json: bool,
    },
    /// Analyze a photo and append its calorie breakdown to the table
    Analyze {
        /// JPEG photo to upload
        photo: PathBuf,

        #[arg(long)]
        json: bool,
    },
}
