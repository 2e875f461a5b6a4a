mod cli;
mod composer;
mod config;
mod datasources;
mod db;
mod error;
mod logic;
mod models;
mod transport;

use chrono::Utc;
use clap::Parser;
use cli::{Cli, Commands};
use composer::GeminiClient;
use config::Config;
use datasources::{OpenMeteoClient, WeatherSource};
use db::Database;
use error::Result;
use logic::bot::plain_answer;
use logic::formatter::format_alerts;
use logic::{AdvisoryBot, RuleTable};
use models::WeatherSample;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use transport::TelegramClient;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let rules = RuleTable::standard()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Init => {
            Config::setup_interactive()?;
            Ok(())
        }
        Commands::Rules => {
            print_rules(&rules);
            Ok(())
        }
        Commands::Eval {
            temp,
            wind,
            precip,
            rule,
        } => {
            let sample = WeatherSample::new(temp, wind, precip);
            let timestamp = Utc::now().format("%Y-%m-%d %H:%M").to_string();
            let events: Vec<_> = match rule {
                Some(id) => {
                    if rules.get(id).is_none() {
                        return Err(error::WeatherWatchError::InvalidData(format!(
                            "no advisory rule with id {}",
                            id
                        )));
                    }
                    rules.evaluate_rule(id, &timestamp, &sample).into_iter().collect()
                }
                None => rules.evaluate(&timestamp, &sample),
            };
            match format_alerts(&sample, &events) {
                Some(msg) => print!("{}", msg),
                None => println!("No advisories for {}", sample),
            }
            Ok(())
        }
        Commands::History { limit } => {
            let db = open_database(cli.data_dir.as_ref())?;
            print_history(&db, limit)
        }
        Commands::Export { path } => {
            let db = open_database(cli.data_dir.as_ref())?;
            export_events(&db, &path)
        }
        Commands::Check => {
            let config = load_config(cli.config)?;
            check_once(&config, rules).await
        }
        Commands::Run => {
            let config = load_config(cli.config)?;
            let db = open_database(cli.data_dir.as_ref())?;
            run_bot(config, db, rules).await
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    match Config::load(path) {
        Ok(c) => Ok(c),
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Run `weatherwatch init` or copy config/config.yaml.example to config/config.yaml");
            std::process::exit(1);
        }
    }
}

fn open_database(data_dir: Option<&PathBuf>) -> Result<Database> {
    let path = Config::db_path(data_dir)?;
    tracing::debug!(path = %path.display(), "Opening alert history");
    Database::open(&path)
}

async fn run_bot(config: Config, db: Database, rules: RuleTable) -> Result<()> {
    let weather = Arc::new(OpenMeteoClient::new(
        &config.open_meteo,
        config.location.clone(),
    ));
    let transport = Arc::new(TelegramClient::new(config.telegram.clone()));

    let mut bot = AdvisoryBot::new(
        rules,
        weather,
        transport,
        db,
        config.telegram.chat_id,
        config.location.name.clone(),
    )?;

    match config.active_gemini() {
        Some(gemini) => {
            tracing::info!(model = %gemini.model, "Gemini composer configured");
            bot = bot.with_composer(Arc::new(GeminiClient::new(gemini.clone())));
        }
        None => {
            tracing::info!("Gemini not configured - replies will use the built-in summary");
        }
    }

    println!("The system is running. Press Ctrl-C to stop.");
    bot.run(
        config.schedule.alert_interval(),
        config.schedule.poll_interval(),
    )
    .await?;
    println!("The system stopped.");
    Ok(())
}

async fn check_once(config: &Config, rules: RuleTable) -> Result<()> {
    let client = OpenMeteoClient::new(&config.open_meteo, config.location.clone());
    let report = client.fetch().await?;
    let now = Utc::now();

    let index = report.current_slot(now)?;

    tracing::debug!(fetched_at = %report.fetched_at, index, "Forecast fetched");
    let current = report.sample_at(index)?;
    let timestamp = report.local_time(now).format("%Y-%m-%d %H:%M").to_string();
    let ctx = composer::PromptContext {
        location: config.location.name.clone(),
        current: Some(current),
        outlook: report.outlook(index),
        events: rules.evaluate(&timestamp, &current),
    };

    println!("{} @ {}", ctx.location, timestamp);
    println!("{}", plain_answer(&ctx));
    if !ctx.events.is_empty() && ctx.outlook.is_available() {
        println!("{}", logic::formatter::format_forecast(&ctx.outlook));
    }
    Ok(())
}

fn print_rules(rules: &RuleTable) {
    if rules.is_empty() {
        println!("No advisory rules loaded.");
        return;
    }
    println!("{} advisory rules, evaluated top to bottom:", rules.len());
    println!("{:>3}  {:<22} SITUATION", "ID", "CONTEXT");
    for (id, context, situation) in rules.list_rules() {
        println!("{:>3}  {:<22} {}", id, context.as_str(), situation);
    }
}

fn print_history(db: &Database, limit: usize) -> Result<()> {
    let batches = db.recent_alert_batches(limit)?;
    if batches.is_empty() {
        println!("No alerts sent yet.");
        return Ok(());
    }

    for batch in batches {
        println!(
            "{}  ({})",
            batch.sent_at.format("%Y-%m-%d %H:%M UTC"),
            batch.sample
        );
        for event in &batch.events {
            println!("    【{}】 {}", event.context, event.situation);
        }
    }
    Ok(())
}

/// Pretty JSON array of every recorded event
fn export_events(db: &Database, path: &PathBuf) -> Result<()> {
    let events = db.all_alert_events()?;
    let json = serde_json::to_string_pretty(&events)?;
    std::fs::write(path, json)?;
    println!("{} events saved to {}", events.len(), path.display());
    Ok(())
}
