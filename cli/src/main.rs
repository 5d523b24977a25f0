mod cli;
mod commands;
mod logging;
mod output;

use clap::Parser;
use owo_colors::OwoColorize;
use std::process::ExitCode;
use webmarks::config::Config;
use webmarks::error::Result;
use webmarks::models::settings::debug_logs_enabled;
use webmarks::{utils, BookmarkStore};

fn run(args: cli::Cli) -> Result<()> {
    let (mut config, config_error) = match &args.config {
        Some(path) => (Config::load_from_path(path)?, None),
        None => match Config::load() {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        },
    };
    if let Some(dir) = &args.data_dir {
        // relative to the working directory, unlike `data_dir` in the config file
        config.data_dir = Some(std::path::absolute(dir)?);
    }

    let log_opts = logging::LogOptions::new(args.debug, config.log_file.clone());
    logging::init(&log_opts)?;
    if let Some(e) = config_error {
        log::warn!(
            "Failed to load config from {:?}: {}; using default configuration",
            Config::default_path(),
            e
        );
    }

    let store_path = config.store_path();
    match utils::migrate_legacy_store(&store_path, &utils::legacy_data_dirs()) {
        Ok(Some(from)) => eprintln!("Migrated bookmarks from {}", from.display()),
        Ok(None) => {}
        Err(e) => log::warn!("Legacy store migration failed: {}", e),
    }

    let mut store = BookmarkStore::open(&store_path)?.with_write_retries(config.write_retries);
    logging::settle(&log_opts, debug_logs_enabled(store.settings()));
    log::debug!("Store at {:?}", store_path);

    let command = args.command.into_command();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut ctx = commands::AppContext {
        store: &mut store,
        config: &config,
        out: &mut out,
        mode: output::OutputMode {
            json: args.json,
            no_color: args.nc,
        },
    };
    command.execute(&mut ctx)
}

fn main() -> ExitCode {
    let args = cli::Cli::parse();
    let no_color = args.nc;

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            if no_color {
                eprintln!("Error: {}", e);
            } else {
                eprintln!("{} {}", "Error:".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}
