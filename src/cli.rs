// src/cli.rs
// Command line definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trafficgen::engine::PoolKind;

#[derive(Debug, Parser)]
#[command(name = "trafficgen", version, about = "Generate file traffic from sample files")]
pub struct Cli {
    /// Use this config file instead of the per-user one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start generating traffic
    Run(RunArgs),

    /// Add sample files (or directories of them) to a pool
    Add {
        /// clean or infected
        pool: PoolKind,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Remove every file from a pool
    Clear {
        /// clean or infected
        pool: PoolKind,
    },

    /// Print the current configuration and pools
    Show,
}

#[derive(Debug, clap::Args)]
pub struct RunArgs {
    /// Log statistics instead of drawing the dashboard
    #[arg(long)]
    pub headless: bool,

    /// Stop after this many ticks (headless only)
    #[arg(long, requires = "headless")]
    pub ticks: Option<u64>,

    #[arg(long)]
    pub destination: Option<PathBuf>,

    /// Seconds between batches
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub files_per_interval: Option<u32>,

    /// Chance (0..1) that a file comes from the infected pool
    #[arg(long)]
    pub infected_probability: Option<f64>,
}
