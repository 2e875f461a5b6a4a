use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "weatherwatch",
    version,
    about = "Telegram weather bot with situational safety advisories"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot: scheduled alerts plus chat replies (default)
    Run,
    /// Re-run interactive setup
    Init,
    /// Fetch current weather once and print the advisories
    Check,
    /// Evaluate the rule table against a hand-entered sample
    Eval {
        /// Temperature in °C
        #[arg(short, long, allow_negative_numbers = true)]
        temp: f64,
        /// Wind speed in km/h
        #[arg(short, long)]
        wind: f64,
        /// Precipitation in mm
        #[arg(short, long, default_value_t = 0.0)]
        precip: f64,
        /// Only evaluate the rule with this id
        #[arg(long)]
        rule: Option<u32>,
    },
    /// List the advisory rules in evaluation order
    Rules,
    /// Show recently sent alerts
    History {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Write every recorded alert event to a JSON file
    Export {
        #[arg(default_value = "weather_events.json")]
        path: PathBuf,
    },
}
