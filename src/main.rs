mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use simplelog::{ColorChoice, Config as LogConfig, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;

use cli::{Cli, Command, RunArgs};
use trafficgen::app::{self, RunOptions};
use trafficgen::config::{get_config_path, get_log_path, load_config, AppConfig};

/// Log to the terminal unless the dashboard owns it, in which case log to a file.
fn init_logging(verbose: bool, to_file: bool) -> Result<()> {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    if to_file {
        let log_path = get_log_path()?;
        let file = File::create(&log_path)
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;
        WriteLogger::init(level, LogConfig::default(), file).context("Failed to initialise logger")
    } else {
        TermLogger::init(level, LogConfig::default(), TerminalMode::Stderr, ColorChoice::Auto)
            .context("Failed to initialise logger")
    }
}

fn apply_run_overrides(config: &mut AppConfig, args: &RunArgs) {
    if let Some(dir) = &args.destination {
        config.destination_dir = dir.clone();
    }
    if let Some(secs) = args.interval {
        config.generate_interval_secs = secs;
    }
    if let Some(files) = args.files_per_interval {
        config.files_per_interval = files;
    }
    if let Some(p) = args.infected_probability {
        config.infected_probability = p;
    }
    config.sanitize();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dashboard = matches!(&cli.command, Command::Run(args) if !args.headless);
    init_logging(cli.verbose, dashboard)?;

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => get_config_path().context("Failed to determine config path")?,
    };
    let mut config = load_config(&config_path).context("Failed to load configuration")?;

    match cli.command {
        Command::Run(args) => {
            apply_run_overrides(&mut config, &args);
            let opts = RunOptions {
                headless: args.headless,
                max_ticks: args.ticks,
            };
            app::run(&config_path, config, opts).await
        }
        Command::Add { pool, paths } => {
            let added = app::add_to_pool(&config_path, &mut config, pool, &paths)?;
            println!("Added {} file(s) to the {} pool", added, pool);
            Ok(())
        }
        Command::Clear { pool } => {
            app::clear_pool(&config_path, &mut config, pool)?;
            println!("Cleared the {} pool", pool);
            Ok(())
        }
        Command::Show => {
            println!("Config file: {}", config_path.display());
            print!("{}", app::describe(&config));
            Ok(())
        }
    }
}
