// src/engine/messages.rs

//! Defines the message types exchanged between the engine manager and its
//! observers (dashboard or headless runner).

use std::path::PathBuf;

use super::stats::StatsSnapshot;
use super::types::PoolKind;
use crate::error::EngineError;

/// Commands sent to the engine manager.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    /// Begin a run and perform the first tick immediately
    Start,

    /// End the current run
    Stop,

    /// Add files to a pool; missing paths are dropped
    AddSources { pool: PoolKind, paths: Vec<PathBuf> },

    /// Empty a pool
    ClearPool(PoolKind),

    SetDestinationDir(PathBuf),
    SetGenerateInterval(u64),
    SetFilesPerInterval(u32),
    SetInfectedProbability(f64),

    /// Ask for a fresh `StateChanged` snapshot
    RequestSnapshot,

    /// Stop the engine and hand it back to the caller
    Shutdown,
}

/// Events published by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Percentage of the current tick's batch completed, once per copied file
    Progress(u8),

    /// A tick finished; carries the statistics after it
    TickCompleted(StatsSnapshot),

    /// Start, stop, configuration change or explicit refresh request
    StateChanged(StatsSnapshot),

    /// The engine refused to run; see `EngineError::code`
    Error(EngineError),
}

impl EngineEvent {
    /// Snapshot carried by the event, if any.
    pub fn snapshot(&self) -> Option<&StatsSnapshot> {
        match self {
            EngineEvent::TickCompleted(s) | EngineEvent::StateChanged(s) => Some(s),
            EngineEvent::Progress(_) | EngineEvent::Error(_) => None,
        }
    }
}
