// src/config/mod.rs

use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::engine::types::{
    sanitize_probability, DEFAULT_FILES_PER_INTERVAL, DEFAULT_GENERATE_INTERVAL_SECS,
    DEFAULT_INFECTED_PROBABILITY,
};
use crate::engine::{EngineSettings, PoolKind, ReplicationEngine};
use crate::units::{Unit, DEFAULT_UNIT};

/// Everything persisted between runs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub generate_interval_secs: u64,
    pub destination_dir: PathBuf,
    pub files_per_interval: u32,
    pub infected_probability: f64,
    pub clean_files_dir: PathBuf,
    pub infected_files_dir: PathBuf,
    pub clean_files: Vec<PathBuf>,
    pub infected_files: Vec<PathBuf>,
    pub known_infected_names: Vec<String>,
    pub current_speed_unit: usize,
    pub average_speed_unit: usize,
    pub total_volume_unit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let tmp = std::env::temp_dir();
        Self {
            generate_interval_secs: DEFAULT_GENERATE_INTERVAL_SECS,
            destination_dir: tmp.clone(),
            files_per_interval: DEFAULT_FILES_PER_INTERVAL,
            infected_probability: DEFAULT_INFECTED_PROBABILITY,
            clean_files_dir: tmp.clone(),
            infected_files_dir: tmp,
            clean_files: Vec::new(),
            infected_files: Vec::new(),
            known_infected_names: Vec::new(),
            current_speed_unit: DEFAULT_UNIT,
            average_speed_unit: DEFAULT_UNIT,
            total_volume_unit: DEFAULT_UNIT,
        }
    }
}

impl AppConfig {
    /// Pull out-of-range values back into range.
    pub fn sanitize(&mut self) {
        self.generate_interval_secs = self.generate_interval_secs.max(1);
        self.files_per_interval = self.files_per_interval.max(1);
        self.infected_probability = sanitize_probability(self.infected_probability);
        for unit in [
            &mut self.current_speed_unit,
            &mut self.average_speed_unit,
            &mut self.total_volume_unit,
        ] {
            if Unit::from_index(*unit).is_none() {
                warn!("Config: unknown unit index {}, using default", unit);
                *unit = DEFAULT_UNIT;
            }
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            destination_dir: self.destination_dir.clone(),
            generate_interval_secs: self.generate_interval_secs,
            files_per_interval: self.files_per_interval,
            infected_probability: self.infected_probability,
            known_infected_names: self.known_infected_names.iter().cloned().collect(),
        }
    }

    pub fn pool_files(&self, pool: PoolKind) -> &[PathBuf] {
        match pool {
            PoolKind::Clean => &self.clean_files,
            PoolKind::Infected => &self.infected_files,
        }
    }

    pub fn pool_files_mut(&mut self, pool: PoolKind) -> &mut Vec<PathBuf> {
        match pool {
            PoolKind::Clean => &mut self.clean_files,
            PoolKind::Infected => &mut self.infected_files,
        }
    }

    /// Engine configured from this config, with both pools loaded.
    /// Pool entries that vanished since the last run are dropped.
    pub fn build_engine(&self) -> ReplicationEngine {
        let mut engine = ReplicationEngine::new(self.engine_settings());
        engine.pool_mut(PoolKind::Clean).set_last_dir(self.clean_files_dir.clone());
        engine.pool_mut(PoolKind::Infected).set_last_dir(self.infected_files_dir.clone());
        engine.add_sources(PoolKind::Clean, &self.clean_files);
        engine.add_sources(PoolKind::Infected, &self.infected_files);
        engine
    }

    /// Copy the engine's settings and pools back for saving.
    pub fn absorb_engine<R: rand::Rng>(&mut self, engine: &ReplicationEngine<R>) {
        let settings = engine.settings();
        self.destination_dir = settings.destination_dir.clone();
        self.generate_interval_secs = settings.generate_interval_secs;
        self.files_per_interval = settings.files_per_interval;
        self.infected_probability = settings.infected_probability;

        let clean = engine.pool(PoolKind::Clean);
        let infected = engine.pool(PoolKind::Infected);
        self.clean_files = clean.files().iter().map(|f| f.path.clone()).collect();
        self.infected_files = infected.files().iter().map(|f| f.path.clone()).collect();
        self.clean_files_dir = clean.last_dir().to_path_buf();
        self.infected_files_dir = infected.last_dir().to_path_buf();
    }
}

pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "TrafficGen", "TrafficGen").context("Failed to get project directories")
}

pub fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = project_dirs()?;
    let config_dir = proj_dirs.config_dir();
    fs::create_dir_all(config_dir)?;
    Ok(config_dir.join("config.toml"))
}

/// Log file used while the dashboard owns the terminal.
pub fn get_log_path() -> Result<PathBuf> {
    let proj_dirs = project_dirs()?;
    let data_dir = proj_dirs.data_dir();
    fs::create_dir_all(data_dir)?;
    Ok(data_dir.join("trafficgen.log"))
}

pub fn load_config(config_path: &Path) -> Result<AppConfig> {
    if config_path.exists() {
        let mut file = File::open(config_path)
            .with_context(|| format!("Failed to open config file: {}", config_path.display()))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        config.sanitize();
        Ok(config)
    } else {
        // Return default config if file doesn't exist
        Ok(AppConfig::default())
    }
}

pub fn save_config(config: &AppConfig, config_path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }
    let mut file = File::create(config_path)
        .with_context(|| format!("Failed to create config file: {}", config_path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_config() -> Result<()> {
        let dir = tempdir()?;
        let config_path = dir.path().join("test_config.toml");

        let initial_config = AppConfig {
            generate_interval_secs: 10,
            destination_dir: PathBuf::from("/tmp/traffic_out"),
            files_per_interval: 5,
            infected_probability: 0.5,
            clean_files: vec![PathBuf::from("/data/clean/a.doc")],
            known_infected_names: vec!["eicar.com".to_string()],
            total_volume_unit: 7,
            ..Default::default()
        };

        save_config(&initial_config, &config_path)?;
        assert!(config_path.exists());

        let loaded_config = load_config(&config_path)?;
        assert_eq!(initial_config, loaded_config);

        dir.close()?;
        Ok(())
    }

    #[test]
    fn test_load_default_config_if_not_exists() -> Result<()> {
        let dir = tempdir()?;
        let config_path = dir.path().join("non_existent_config.toml");

        let loaded_config = load_config(&config_path)?;
        assert_eq!(loaded_config.generate_interval_secs, 3);
        assert_eq!(loaded_config.files_per_interval, 1);
        assert_eq!(loaded_config.infected_probability, 0.2);
        assert_eq!(loaded_config.destination_dir, std::env::temp_dir());
        assert_eq!(loaded_config.current_speed_unit, 5);

        dir.close()?;
        Ok(())
    }

    #[test]
    fn test_partial_file_is_sanitized() -> Result<()> {
        let dir = tempdir()?;
        let config_path = dir.path().join("partial.toml");
        fs::write(
            &config_path,
            "files_per_interval = 0\ninfected_probability = 4.0\naverage_speed_unit = 12\n",
        )?;

        let loaded = load_config(&config_path)?;
        assert_eq!(loaded.files_per_interval, 1);
        assert_eq!(loaded.infected_probability, 1.0);
        assert_eq!(loaded.average_speed_unit, 5);
        assert_eq!(loaded.generate_interval_secs, 3);
        Ok(())
    }

    #[test]
    fn test_engine_round_trip_drops_missing_files() -> Result<()> {
        let dir = tempdir()?;
        let kept = dir.path().join("kept.bin");
        fs::write(&kept, b"1234")?;

        let mut config = AppConfig {
            clean_files: vec![kept.clone(), dir.path().join("gone.bin")],
            files_per_interval: 4,
            ..Default::default()
        };
        let engine = config.build_engine();
        assert_eq!(engine.pool(PoolKind::Clean).len(), 1);
        assert_eq!(engine.files_per_interval(), 4);

        config.absorb_engine(&engine);
        assert_eq!(config.clean_files.len(), 1);
        assert!(config.clean_files[0].ends_with("kept.bin"));
        assert_eq!(config.clean_files_dir, config.clean_files[0].parent().unwrap());
        Ok(())
    }
}
