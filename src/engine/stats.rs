// src/engine/stats.rs

//! Run statistics and the immutable snapshots handed to observers.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use super::types::WorkState;

/// Counters for the current (or last) run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub total_volume_bytes: u64,
    /// Bytes copied in the last tick divided by the batch size.
    pub current_speed_bytes: f64,
    pub average_speed_bytes: f64,
    pub copied_files: u64,
    pub infected_files: u64,
    pub started_at: Option<Instant>,
    pub ended_at: Option<Instant>,
}

impl RunStats {
    /// Zero every counter and stamp a fresh start.
    pub fn reset(&mut self, now: Instant) {
        *self = RunStats {
            started_at: Some(now),
            ended_at: Some(now),
            ..Default::default()
        };
    }

    pub fn freeze(&mut self, now: Instant) {
        self.ended_at = Some(now);
    }

    /// Whole seconds of the run: start to `now` while running, start to the
    /// frozen end otherwise. Zero before the first start.
    pub fn elapsed_secs(&self, state: WorkState, now: Instant) -> u64 {
        let Some(start) = self.started_at else {
            return 0;
        };
        let end = match state {
            WorkState::Running => now,
            WorkState::Idle => self.ended_at.unwrap_or(start),
        };
        end.saturating_duration_since(start).as_secs()
    }

    /// Fold one finished tick into the counters.
    pub fn record_tick(&mut self, tick_volume: u64, files_per_interval: u32, elapsed_secs: u64) {
        self.current_speed_bytes = if files_per_interval == 0 {
            0.0
        } else {
            tick_volume as f64 / files_per_interval as f64
        };
        self.total_volume_bytes += tick_volume;
        // Sub-second runs divide by one rather than zero.
        self.average_speed_bytes = self.total_volume_bytes as f64 / elapsed_secs.max(1) as f64;
    }
}

/// Point-in-time copy of everything a display needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub state: WorkState,
    pub copied_files: u64,
    pub infected_files: u64,
    pub total_volume_bytes: u64,
    pub current_speed_bytes: f64,
    pub average_speed_bytes: f64,
    pub elapsed_secs: u64,
    pub clean_pool_len: usize,
    pub infected_pool_len: usize,
    pub destination_dir: PathBuf,
    pub generate_interval_secs: u64,
    pub files_per_interval: u32,
    pub infected_probability: f64,
}

impl Default for StatsSnapshot {
    fn default() -> Self {
        Self {
            state: WorkState::Idle,
            copied_files: 0,
            infected_files: 0,
            total_volume_bytes: 0,
            current_speed_bytes: 0.0,
            average_speed_bytes: 0.0,
            elapsed_secs: 0,
            clean_pool_len: 0,
            infected_pool_len: 0,
            destination_dir: PathBuf::new(),
            generate_interval_secs: 0,
            files_per_interval: 0,
            infected_probability: 0.0,
        }
    }
}
