// src/engine/manager.rs

//! Main loop owning the replication engine.
//!
//! The manager is the only code touching the engine: commands arrive on one
//! channel, ticks come from a `tokio` interval, and observers only ever see
//! the snapshots the engine publishes. Ticks run inline, so they never
//! overlap and a started tick always finishes its batch.

use log::{debug, info};
use rand::Rng;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Interval, MissedTickBehavior};

use super::messages::EngineCommand;
use super::replicator::ReplicationEngine;
use super::utils::expand_source_paths;

/// Interval whose first tick fires one full period from now, since `start`
/// already ran the first batch.
fn new_ticker(secs: u64) -> Interval {
    let period = Duration::from_secs(secs.max(1));
    let mut ticker = time::interval_at(time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Run until `Shutdown` arrives or every command sender is dropped, then
/// return the (stopped) engine so the caller can persist its settings.
pub async fn run_engine_manager<R: Rng>(
    mut engine: ReplicationEngine<R>,
    mut cmd_rx: mpsc::UnboundedReceiver<EngineCommand>,
) -> ReplicationEngine<R> {
    let mut ticker = new_ticker(engine.generate_interval());
    info!("Engine: manager started");
    engine.notify_state_changed();

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                let Some(cmd) = cmd else {
                    debug!("Engine: command channel closed");
                    break;
                };
                match cmd {
                    EngineCommand::Start => {
                        if !engine.is_running() && engine.start().await.is_ok() {
                            ticker = new_ticker(engine.generate_interval());
                        }
                    }
                    EngineCommand::Stop => engine.stop(),
                    EngineCommand::AddSources { pool, paths } => {
                        let candidates = expand_source_paths(&paths);
                        engine.add_sources(pool, candidates);
                        engine.notify_state_changed();
                    }
                    EngineCommand::ClearPool(pool) => {
                        engine.clear_pool(pool);
                        engine.notify_state_changed();
                    }
                    EngineCommand::SetDestinationDir(dir) => {
                        info!("Engine: destination set to {}", dir.display());
                        engine.set_destination_dir(dir);
                        engine.notify_state_changed();
                    }
                    EngineCommand::SetGenerateInterval(secs) => {
                        engine.set_generate_interval(secs);
                        ticker = new_ticker(engine.generate_interval());
                        engine.notify_state_changed();
                    }
                    EngineCommand::SetFilesPerInterval(files) => {
                        engine.set_files_per_interval(files);
                        engine.notify_state_changed();
                    }
                    EngineCommand::SetInfectedProbability(p) => {
                        engine.set_infected_probability(p);
                        engine.notify_state_changed();
                    }
                    EngineCommand::RequestSnapshot => engine.notify_state_changed(),
                    EngineCommand::Shutdown => {
                        debug!("Engine: shutdown requested");
                        break;
                    }
                }
            }
            _ = ticker.tick(), if engine.is_running() => {
                // Errors were already published and the engine stopped itself.
                let _ = engine.tick().await;
            }
        }
    }

    if engine.is_running() {
        engine.stop();
    }
    info!("Engine: manager finished");
    engine
}
