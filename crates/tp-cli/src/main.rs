use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tp_core::LocalCatalog;
use tracing_subscriber::EnvFilter;

use tp_cli::commands::{
    add, ask, dates, edit, export, import, init, list, rm, search, stats, status, travel,
};
use tp_cli::{Cli, Commands, Config};

/// Open the database, ensuring its parent directory exists.
fn open_database(config: &Config) -> Result<tp_db::Database> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    tp_db::Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = load_config(cli.config.as_deref())?;
    let now = Utc::now();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Search(args) => {
            // Search only reads the built-in catalog
            search::run(&mut out, &LocalCatalog::edinburgh(), args, config.currency)?;
        }
        Commands::Init(args) => {
            let mut db = open_database(&config)?;
            init::run(&mut out, &mut db, args, config.currency, now)?;
        }
        Commands::Dates(args) => {
            let mut db = open_database(&config)?;
            dates::run(&mut out, &mut db, args, now)?;
        }
        Commands::Add(args) => {
            let mut db = open_database(&config)?;
            add::run(&mut out, &mut db, args, now)?;
        }
        Commands::Travel(args) => {
            let mut db = open_database(&config)?;
            travel::run(&mut out, &mut db, args, now)?;
        }
        Commands::Edit(args) => {
            let mut db = open_database(&config)?;
            edit::run(&mut out, &mut db, args, now)?;
        }
        Commands::Rm(args) => {
            let mut db = open_database(&config)?;
            rm::run(&mut out, &mut db, args, now)?;
        }
        Commands::List(args) => {
            let db = open_database(&config)?;
            list::run(&mut out, &db, args)?;
        }
        Commands::Stats(args) => {
            let db = open_database(&config)?;
            stats::run(&mut out, &db, args)?;
        }
        Commands::Ask(args) => {
            let db = open_database(&config)?;
            ask::run(&mut out, &db, &ask::assistant(&config.assistant), args)?;
        }
        Commands::Export(args) => {
            let db = open_database(&config)?;
            export::run(&mut out, &db, args, now)?;
        }
        Commands::Import(args) => {
            let mut db = open_database(&config)?;
            import::run(&mut out, &mut db, args, now)?;
        }
        Commands::Status => {
            let db = open_database(&config)?;
            status::run(&mut out, &db, &config.database_path)?;
        }
    }

    out.flush()?;
    Ok(())
}
