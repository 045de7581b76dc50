// src/engine/utils.rs

//! Utility functions shared by the engine and its callers

use log::{debug, warn};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use walkdir::WalkDir;

use super::messages::EngineEvent;

/// Helper function to send any event to observers
pub fn send_engine_event(tx: &mpsc::UnboundedSender<EngineEvent>, event: EngineEvent) {
    if let Err(e) = tx.send(event) {
        debug!("Engine: no observer for event: {:?}", e.0);
    }
}

/// Progress of a batch after `done` slots, as a 0-100 percentage.
pub fn batch_percent(done: u32, total: u32) -> u8 {
    if total == 0 {
        return 100;
    }
    (u64::from(done.min(total)) * 100 / u64::from(total)) as u8
}

/// Destination file name for a copy: `<counter>_<original name>`.
pub fn numbered_file_name(counter: u64, original: &str) -> String {
    format!("{}_{}", counter, original)
}

/// Expand the given paths into candidate sample files. Directories are
/// walked recursively (regular files only, sorted by name); anything else
/// is passed through so the pool can decide whether it exists.
pub fn expand_source_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            collect_dir(path, &mut out);
        } else {
            out.push(path.clone());
        }
    }
    out
}

fn collect_dir(dir: &Path, out: &mut Vec<PathBuf>) {
    for entry in WalkDir::new(dir).sort_by_file_name() {
        match entry {
            Ok(entry) if entry.file_type().is_file() => out.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => warn!("Engine: skipping unreadable entry under {}: {}", dir.display(), e),
        }
    }
}
