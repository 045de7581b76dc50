// src/engine/replicator.rs

//! The replication engine: picks random sample files from the source pools
//! and copies them into the destination directory, one batch per tick.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::mpsc;

use super::messages::EngineEvent;
use super::pool::{FileRef, SourcePool};
use super::stats::{RunStats, StatsSnapshot};
use super::types::{sanitize_probability, EngineSettings, PoolKind, WorkState};
use super::utils::{batch_percent, numbered_file_name, send_engine_event};
use crate::error::EngineError;

/// What a single tick accomplished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub copied: u32,
    pub volume_bytes: u64,
    pub infected: u32,
}

/// Not synchronised: the owner drives every call from one task.
pub struct ReplicationEngine<R: Rng = StdRng> {
    state: WorkState,
    clean: SourcePool,
    infected: SourcePool,
    settings: EngineSettings,
    stats: RunStats,
    rng: R,
    events: Option<mpsc::UnboundedSender<EngineEvent>>,
}

impl ReplicationEngine<StdRng> {
    pub fn new(settings: EngineSettings) -> Self {
        Self::with_rng(settings, StdRng::from_os_rng())
    }
}

impl<R: Rng> ReplicationEngine<R> {
    pub fn with_rng(settings: EngineSettings, rng: R) -> Self {
        let mut engine = Self {
            state: WorkState::Idle,
            clean: SourcePool::new(PoolKind::Clean),
            infected: SourcePool::new(PoolKind::Infected),
            settings: EngineSettings::default(),
            stats: RunStats::default(),
            rng,
            events: None,
        };
        engine.set_destination_dir(settings.destination_dir);
        engine.set_generate_interval(settings.generate_interval_secs);
        engine.set_files_per_interval(settings.files_per_interval);
        engine.set_infected_probability(settings.infected_probability);
        engine.set_known_infected_names(settings.known_infected_names);
        engine
    }

    /// Route progress, state and error events to `tx`.
    pub fn set_event_sender(&mut self, tx: mpsc::UnboundedSender<EngineEvent>) {
        self.events = Some(tx);
    }

    // --- pools ---

    pub fn add_sources<I, P>(&mut self, pool: PoolKind, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let added = self.pool_mut(pool).add_files(paths);
        info!("Engine: added {} file(s) to the {} pool", added, pool);
        added
    }

    pub fn clear_pool(&mut self, pool: PoolKind) {
        info!("Engine: clearing the {} pool", pool);
        self.pool_mut(pool).clear();
    }

    pub fn pool(&self, pool: PoolKind) -> &SourcePool {
        match pool {
            PoolKind::Clean => &self.clean,
            PoolKind::Infected => &self.infected,
        }
    }

    pub fn pool_mut(&mut self, pool: PoolKind) -> &mut SourcePool {
        match pool {
            PoolKind::Clean => &mut self.clean,
            PoolKind::Infected => &mut self.infected,
        }
    }

    fn pools_empty(&self) -> bool {
        self.clean.is_empty() && self.infected.is_empty()
    }

    // --- settings ---

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn destination_dir(&self) -> &Path {
        &self.settings.destination_dir
    }

    pub fn set_destination_dir(&mut self, dir: PathBuf) {
        self.settings.destination_dir = dir;
    }

    pub fn generate_interval(&self) -> u64 {
        self.settings.generate_interval_secs
    }

    pub fn set_generate_interval(&mut self, secs: u64) {
        self.settings.generate_interval_secs = secs.max(1);
    }

    pub fn files_per_interval(&self) -> u32 {
        self.settings.files_per_interval
    }

    pub fn set_files_per_interval(&mut self, files: u32) {
        self.settings.files_per_interval = files.max(1);
    }

    pub fn infected_probability(&self) -> f64 {
        self.settings.infected_probability
    }

    pub fn set_infected_probability(&mut self, probability: f64) {
        self.settings.infected_probability = sanitize_probability(probability);
    }

    pub fn set_known_infected_names(&mut self, names: HashSet<String>) {
        self.settings.known_infected_names = names;
    }

    // --- statistics ---

    pub fn state(&self) -> WorkState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == WorkState::Running
    }

    pub fn current_speed_bytes(&self) -> f64 {
        self.stats.current_speed_bytes
    }

    pub fn average_speed_bytes(&self) -> f64 {
        self.stats.average_speed_bytes
    }

    pub fn total_volume_bytes(&self) -> u64 {
        self.stats.total_volume_bytes
    }

    pub fn copied_files(&self) -> u64 {
        self.stats.copied_files
    }

    pub fn infected_files(&self) -> u64 {
        self.stats.infected_files
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.stats.elapsed_secs(self.state, Instant::now())
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            state: self.state,
            copied_files: self.stats.copied_files,
            infected_files: self.stats.infected_files,
            total_volume_bytes: self.stats.total_volume_bytes,
            current_speed_bytes: self.stats.current_speed_bytes,
            average_speed_bytes: self.stats.average_speed_bytes,
            elapsed_secs: self.elapsed_secs(),
            clean_pool_len: self.clean.len(),
            infected_pool_len: self.infected.len(),
            destination_dir: self.settings.destination_dir.clone(),
            generate_interval_secs: self.settings.generate_interval_secs,
            files_per_interval: self.settings.files_per_interval,
            infected_probability: self.settings.infected_probability,
        }
    }

    fn publish(&self, event: EngineEvent) {
        if let Some(tx) = &self.events {
            send_engine_event(tx, event);
        }
    }

    /// Publish a `StateChanged` snapshot without touching any state.
    pub fn notify_state_changed(&self) {
        self.publish(EngineEvent::StateChanged(self.snapshot()));
    }

    // --- run control ---

    /// Begin a run. Refuses (and stays idle) when every pool is empty.
    /// A call while already running does nothing.
    pub async fn start(&mut self) -> Result<(), EngineError> {
        if self.is_running() {
            debug!("Engine: start requested while already running");
            return Ok(());
        }
        if self.pools_empty() {
            warn!("Engine: refusing to start, no source files configured");
            self.publish(EngineEvent::Error(EngineError::NoSourceFiles));
            return Err(EngineError::NoSourceFiles);
        }

        self.stats.reset(Instant::now());
        self.state = WorkState::Running;
        info!(
            "Engine: started, {} file(s) every {}s into {}",
            self.settings.files_per_interval,
            self.settings.generate_interval_secs,
            self.settings.destination_dir.display()
        );
        self.notify_state_changed();

        self.tick().await.map(|_| ())
    }

    /// End the run. Safe to call while idle; the end stamp moves either way.
    pub fn stop(&mut self) {
        self.stats.freeze(Instant::now());
        if self.is_running() {
            info!(
                "Engine: stopped after {} file(s), {} bytes",
                self.stats.copied_files, self.stats.total_volume_bytes
            );
        }
        self.state = WorkState::Idle;
        self.notify_state_changed();
    }

    /// Copy one batch. Does nothing while idle. With every pool empty the
    /// engine reports the error and stops instead.
    pub async fn tick(&mut self) -> Result<TickReport, EngineError> {
        if !self.is_running() {
            return Ok(TickReport::default());
        }
        if self.pools_empty() {
            warn!("Engine: no source files left, stopping");
            self.publish(EngineEvent::Error(EngineError::NoSourceFiles));
            self.stop();
            return Err(EngineError::NoSourceFiles);
        }

        let batch = self.settings.files_per_interval;
        let mut report = TickReport::default();

        for slot in 0..batch {
            let kind = if self.rng.random::<f64>() < self.settings.infected_probability {
                PoolKind::Infected
            } else {
                PoolKind::Clean
            };
            let len = self.pool(kind).len();
            if len == 0 {
                debug!("Engine: {} pool empty, skipping slot {}", kind, slot);
                continue;
            }
            let index = self.rng.random_range(0..len);
            let file = self.pool(kind).files()[index].clone();

            if self.copy_one(&file).await {
                self.stats.copied_files += 1;
                report.copied += 1;
                report.volume_bytes += file.size;
                if self.is_infected(kind, &file) {
                    self.stats.infected_files += 1;
                    report.infected += 1;
                }
                self.publish(EngineEvent::Progress(batch_percent(slot + 1, batch)));
            }
        }

        let elapsed = self.elapsed_secs();
        self.stats.record_tick(report.volume_bytes, batch, elapsed);
        debug!(
            "Engine: tick copied {}/{} file(s), {} bytes",
            report.copied, batch, report.volume_bytes
        );
        self.publish(EngineEvent::TickCompleted(self.snapshot()));
        Ok(report)
    }

    /// Copy `file` under the next numbered name, replacing whatever an
    /// earlier run left there. Failures only get a debug line; the slot is
    /// simply not counted.
    async fn copy_one(&self, file: &FileRef) -> bool {
        let target = self
            .settings
            .destination_dir
            .join(numbered_file_name(self.stats.copied_files, &file.name));
        match tokio::fs::copy(&file.path, &target).await {
            Ok(_) => true,
            Err(e) => {
                debug!(
                    "Engine: copy {} -> {} failed: {}",
                    file.path.display(),
                    target.display(),
                    e
                );
                false
            }
        }
    }

    fn is_infected(&self, kind: PoolKind, file: &FileRef) -> bool {
        kind == PoolKind::Infected
            || self.infected.contains_path(&file.path)
            || self.settings.known_infected_names.contains(&file.name)
    }
}
