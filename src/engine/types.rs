// src/engine/types.rs

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_GENERATE_INTERVAL_SECS: u64 = 3;
pub const DEFAULT_FILES_PER_INTERVAL: u32 = 1;
pub const DEFAULT_INFECTED_PROBABILITY: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkState {
    #[default]
    Idle,
    Running,
}

/// Which source pool a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolKind {
    Clean,
    Infected,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolKind::Clean => write!(f, "clean"),
            PoolKind::Infected => write!(f, "infected"),
        }
    }
}

impl FromStr for PoolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clean" => Ok(PoolKind::Clean),
            "infected" => Ok(PoolKind::Infected),
            other => Err(format!("unknown pool '{}', expected 'clean' or 'infected'", other)),
        }
    }
}

/// Settings the engine reads on every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub destination_dir: PathBuf,
    pub generate_interval_secs: u64,
    pub files_per_interval: u32,
    /// Chance in `[0, 1]` that a slot draws from the infected pool.
    pub infected_probability: f64,
    /// File names counted as infected no matter which pool they came from.
    pub known_infected_names: HashSet<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            destination_dir: std::env::temp_dir(),
            generate_interval_secs: DEFAULT_GENERATE_INTERVAL_SECS,
            files_per_interval: DEFAULT_FILES_PER_INTERVAL,
            infected_probability: DEFAULT_INFECTED_PROBABILITY,
            known_infected_names: HashSet::new(),
        }
    }
}

/// Clamp a probability into `[0, 1]`; NaN becomes `0`.
pub fn sanitize_probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}
