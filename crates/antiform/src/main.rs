//! `antiform` - CLI for the anti-UX obstacle course
//!
//! This binary plays the game in a terminal and inspects the error log it
//! leaves behind.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use antiform::cli::{Cli, Command, ConfigCommand, LogCommand, OutputFormat, PlayCommand};
use antiform::render::{export_snapshot, print_layout};
use antiform::{init_logging, run_interactive, Config, ErrorLog, PageId, SessionStore, SqliteStore};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    // Execute the command
    match cli.command {
        Command::Play(play_cmd) => handle_play(&config, &play_cmd).await,
        Command::Log(log_cmd) => handle_log(&config, log_cmd),
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json),
        Command::Pages => {
            handle_pages();
            Ok(())
        }
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn open_store(config: &Config) -> Result<SqliteStore> {
    let path = config.database_path();
    SqliteStore::open(&path).with_context(|| format!("failed to open storage at {}", path.display()))
}

fn open_log(config: &Config) -> Result<ErrorLog> {
    Ok(ErrorLog::with_key(
        Box::new(open_store(config)?),
        Box::new(SessionStore::new()),
        config.storage.log_key.clone(),
    ))
}

async fn handle_play(config: &Config, cmd: &PlayCommand) -> Result<()> {
    let log = open_log(config)?;
    let seed = cmd
        .seed
        .or(config.game.seed)
        .unwrap_or_else(rand::random::<u64>);
    tracing::debug!(seed, "Starting tour");

    run_interactive(config, log, PageId::from(cmd.from), seed)
        .await
        .context("interactive session failed")
}

fn handle_log(config: &Config, cmd: LogCommand) -> Result<()> {
    let mut log = open_log(config)?;
    match cmd {
        LogCommand::Show { format } => {
            let entries = log.read_all();
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
                OutputFormat::Plain => {
                    if entries.is_empty() {
                        println!("{}", antiform::render::NO_ERRORS);
                    }
                    for entry in &entries {
                        println!("{}  [{}] {}", entry.timestamp_string(), entry.page, entry.error);
                    }
                }
            }
        }
        LogCommand::Print => {
            for line in print_layout(&log.read_all()) {
                println!("{line}");
            }
        }
        LogCommand::Export { dir } => {
            let dir = dir.unwrap_or_else(|| config.screenshot_dir());
            let path = export_snapshot(&log.read_all(), &dir)
                .with_context(|| format!("failed to export into {}", dir.display()))?;
            println!("{} {}", antiform::render::SCREENSHOT_SAVED, path.display());
        }
        LogCommand::Clear { yes } => {
            if yes {
                let count = log.len();
                log.clear_all().context("failed to clear the error log")?;
                println!("Cleared {count} error(s).");
            } else {
                println!("This will remove all {} logged error(s).", log.len());
                println!("Use --yes to confirm.");
            }
        }
    }
    Ok(())
}

fn per_page(log: &ErrorLog) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for entry in log.read_all() {
        *counts.entry(entry.page).or_insert(0) += 1;
    }
    counts
}

fn handle_status(config: &Config, json: bool) -> Result<()> {
    let store = open_store(config)?;
    let stats = store.stats().context("failed to read storage statistics")?;
    let log = ErrorLog::with_key(
        Box::new(store),
        Box::new(SessionStore::new()),
        config.storage.log_key.clone(),
    );
    let counts = per_page(&log);
    let total: usize = counts.values().sum();

    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "database_size_bytes": stats.db_size_bytes,
            "stored_keys": stats.keys,
            "log_key": log.key(),
            "errors": total,
            "errors_by_page": counts,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("antiform status");
        println!("---------------");
        println!("Database:      {}", config.database_path().display());
        println!("Size:          {} bytes", stats.db_size_bytes);
        println!("Log key:       {}", log.key());
        println!("Errors:        {total}");
        for (page, count) in &counts {
            println!("  {page:<16} {count}");
        }
    }
    Ok(())
}

fn handle_pages() {
    for (i, page) in PageId::ALL.iter().enumerate() {
        let exit = page.exit_name().unwrap_or("-");
        println!("{:>2}. {:<10} {:<14} exit: {exit}", i + 1, page.slug(), page.title());
    }
}

fn show_path(label: &str, path: &Path) {
    println!("  {label:<20}{}", path.display());
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                show_path("Database path:", &config.database_path());
                println!("  Log key:            {}", config.storage.log_key);
                println!();
                println!("[Game]");
                println!("  Unlock threshold:   {}", config.game.unlock_threshold);
                println!("  Color tolerance:    {}", config.game.color_tolerance);
                match config.game.seed {
                    Some(seed) => println!("  Seed:               {seed}"),
                    None => println!("  Seed:               random"),
                }
                println!("  Password delay:     {:?}", config.password_delay());
                println!("  CAPTCHA delay:      {:?}", config.captcha_delay());
                println!("  Redirect delay:     {:?}", config.redirect_delay());
                println!();
                println!("[Feedback]");
                println!("  Sound:              {}", config.feedback.sound);
                println!("  Animations:         {}", config.feedback.animations);
                println!("  Chaos:              {}", config.feedback.chaos);
                println!("  Color:              {}", config.feedback.color);
                println!();
                println!("[Screenshot]");
                show_path("Output dir:", &config.screenshot_dir());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
