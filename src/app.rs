// src/app.rs

//! Wires configuration, the engine manager and a front end together.

use anyhow::{Context, Result};
use log::info;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use crate::config::{save_config, AppConfig};
use crate::engine::utils::expand_source_paths;
use crate::engine::{run_engine_manager, EngineCommand, EngineEvent, PoolKind, SourcePool};
use crate::ui::{self, UiState};

/// How `run` presents the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub headless: bool,
    pub max_ticks: Option<u64>,
}

/// Start the engine manager with `config`, drive it from the chosen front
/// end, then persist the engine's settings and pools back to `config_path`.
pub async fn run(config_path: &Path, mut config: AppConfig, opts: RunOptions) -> Result<()> {
    let mut engine = config.build_engine();
    let (events_tx, events_rx) = mpsc::unbounded_channel::<EngineEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<EngineCommand>();
    engine.set_event_sender(events_tx);

    let manager = tokio::spawn(run_engine_manager(engine, cmd_rx));

    let front_end = if opts.headless {
        ui::run_headless(cmd_tx.clone(), events_rx, opts.max_ticks).await
    } else {
        let ui_state = UiState::new(
            config.current_speed_unit,
            config.average_speed_unit,
            config.total_volume_unit,
        );
        ui::run_dashboard(ui_state, cmd_tx.clone(), events_rx)
            .await
            .map(|state| {
                let (current, average, total) = state.unit_indices();
                config.current_speed_unit = current;
                config.average_speed_unit = average;
                config.total_volume_unit = total;
            })
    };

    // Make sure the manager exits even if the front end bailed early.
    drop(cmd_tx);
    let engine = manager.await.context("Engine manager task failed")?;

    info!(
        "Run finished: {} file(s), {} bytes, {}s",
        engine.copied_files(),
        engine.total_volume_bytes(),
        engine.elapsed_secs()
    );
    config.absorb_engine(&engine);
    save_config(&config, config_path)?;
    front_end
}

/// Add files (or every file under the given directories) to a persisted
/// pool. Returns how many entries were added.
pub fn add_to_pool(
    config_path: &Path,
    config: &mut AppConfig,
    pool: PoolKind,
    paths: &[PathBuf],
) -> Result<usize> {
    let mut scratch = SourcePool::new(pool);
    let added = scratch.add_files(expand_source_paths(paths));
    config
        .pool_files_mut(pool)
        .extend(scratch.files().iter().map(|f| f.path.clone()));
    if added > 0 {
        let dir = scratch.last_dir().to_path_buf();
        match pool {
            PoolKind::Clean => config.clean_files_dir = dir,
            PoolKind::Infected => config.infected_files_dir = dir,
        }
    }
    save_config(config, config_path)?;
    Ok(added)
}

/// Remove every entry from a persisted pool.
pub fn clear_pool(config_path: &Path, config: &mut AppConfig, pool: PoolKind) -> Result<()> {
    config.pool_files_mut(pool).clear();
    save_config(config, config_path)
}

/// Human readable summary used by the `show` command.
pub fn describe(config: &AppConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Destination:          {}", config.destination_dir.display());
    let _ = writeln!(out, "Interval:             {}s", config.generate_interval_secs);
    let _ = writeln!(out, "Files per interval:   {}", config.files_per_interval);
    let _ = writeln!(out, "Infected probability: {:.2}", config.infected_probability);
    for pool in [PoolKind::Clean, PoolKind::Infected] {
        let files = config.pool_files(pool);
        let _ = writeln!(out, "{} pool ({} file(s)):", pool, files.len());
        for file in files {
            let _ = writeln!(out, "  {}", file.display());
        }
    }
    if !config.known_infected_names.is_empty() {
        let _ = writeln!(out, "Known infected names: {}", config.known_infected_names.join(", "));
    }
    out
}
