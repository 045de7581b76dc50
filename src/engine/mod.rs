// src/engine/mod.rs

// Sample file replication: pools, statistics and the manager loop.
pub mod manager;
pub mod messages;
pub mod pool;
pub mod replicator;
pub mod stats;
pub mod types;
pub mod utils;

pub use manager::run_engine_manager;
pub use messages::{EngineCommand, EngineEvent};
pub use pool::{FileRef, SourcePool};
pub use replicator::{ReplicationEngine, TickReport};
pub use stats::StatsSnapshot;
pub use types::{EngineSettings, PoolKind, WorkState};
