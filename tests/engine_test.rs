// tests/engine_test.rs

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use tokio::sync::mpsc;
use trafficgen::engine::{EngineEvent, EngineSettings, PoolKind, ReplicationEngine, WorkState};
use trafficgen::error::EngineError;

fn make_engine(
    dest: &Path,
    files_per_interval: u32,
    infected_probability: f64,
) -> ReplicationEngine<StdRng> {
    let settings = EngineSettings {
        destination_dir: dest.to_path_buf(),
        files_per_interval,
        infected_probability,
        ..Default::default()
    };
    ReplicationEngine::with_rng(settings, StdRng::seed_from_u64(42))
}

fn write_sample(dir: &TempDir, name: &str, size: usize) -> Result<PathBuf> {
    let path = dir.path().join(name);
    std::fs::write(&path, vec![b'x'; size])?;
    Ok(path)
}

/// (prefix, original name, size) for every file in `dir`, sorted by prefix.
fn copied_files(dir: &Path) -> Result<Vec<(u64, String, u64)>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let (prefix, rest) = name.split_once('_').expect("numbered file name");
        out.push((prefix.parse()?, rest.to_string(), entry.metadata()?.len()));
    }
    out.sort();
    Ok(out)
}

#[tokio::test]
async fn single_tick_copies_batch_with_replacement() -> Result<()> {
    let src = tempdir()?;
    let dest = tempdir()?;
    let sizes = [("a.bin", 100), ("b.bin", 200), ("c.bin", 300)];
    let mut engine = make_engine(dest.path(), 2, 0.0);
    for (name, size) in sizes {
        engine.add_sources(PoolKind::Clean, [write_sample(&src, name, size)?]);
    }

    // start() performs the single tick
    engine.start().await?;

    let files = copied_files(dest.path())?;
    assert_eq!(files.len(), 2);
    assert_eq!(engine.copied_files(), 2);
    let expected_volume: u64 = files.iter().map(|(_, _, size)| size).sum();
    assert_eq!(engine.total_volume_bytes(), expected_volume);
    assert_eq!(engine.current_speed_bytes(), expected_volume as f64 / 2.0);
    for (_, name, size) in &files {
        let (_, original) = sizes
            .iter()
            .find(|(n, _)| *n == name.as_str())
            .expect("copied from pool");
        assert_eq!(*size, *original as u64);
    }
    Ok(())
}

#[tokio::test]
async fn prefixes_strictly_increase_from_zero() -> Result<()> {
    let src = tempdir()?;
    let dest = tempdir()?;
    let mut engine = make_engine(dest.path(), 3, 0.5);
    engine.add_sources(PoolKind::Clean, [write_sample(&src, "clean.doc", 10)?]);
    engine.add_sources(PoolKind::Infected, [write_sample(&src, "eicar.com", 68)?]);

    engine.start().await?;
    for _ in 0..4 {
        engine.tick().await?;
    }

    let files = copied_files(dest.path())?;
    assert_eq!(files.len(), 15);
    let prefixes: Vec<u64> = files.iter().map(|(p, _, _)| *p).collect();
    assert_eq!(prefixes, (0..15).collect::<Vec<u64>>());
    for (_, name, _) in &files {
        assert!(name == "clean.doc" || name == "eicar.com");
    }

    let infected = files.iter().filter(|(_, n, _)| n == "eicar.com").count() as u64;
    assert_eq!(engine.infected_files(), infected);
    Ok(())
}

#[tokio::test]
async fn start_with_empty_pools_reports_error() -> Result<()> {
    let dest = tempdir()?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut engine = make_engine(dest.path(), 1, 0.2);
    engine.set_event_sender(tx);

    let result = engine.start().await;

    assert_eq!(result, Err(EngineError::NoSourceFiles));
    assert_eq!(engine.state(), WorkState::Idle);
    assert_eq!(engine.copied_files(), 0);
    match rx.try_recv()? {
        EngineEvent::Error(err) => assert_eq!(err.code(), -1),
        other => panic!("unexpected event {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn tick_with_pools_emptied_while_running_stops() -> Result<()> {
    let src = tempdir()?;
    let dest = tempdir()?;
    let mut engine = make_engine(dest.path(), 1, 0.0);
    engine.add_sources(PoolKind::Clean, [write_sample(&src, "a.bin", 1)?]);
    engine.start().await?;
    engine.clear_pool(PoolKind::Clean);

    assert_eq!(engine.tick().await, Err(EngineError::NoSourceFiles));
    assert_eq!(engine.state(), WorkState::Idle);
    assert_eq!(engine.copied_files(), 1);
    Ok(())
}

#[tokio::test]
async fn stop_twice_keeps_counters() -> Result<()> {
    let src = tempdir()?;
    let dest = tempdir()?;
    let mut engine = make_engine(dest.path(), 2, 0.0);
    engine.add_sources(PoolKind::Clean, [write_sample(&src, "a.bin", 50)?]);
    engine.start().await?;

    engine.stop();
    let (count, volume) = (engine.copied_files(), engine.total_volume_bytes());
    engine.stop();

    assert_eq!(engine.copied_files(), count);
    assert_eq!(engine.total_volume_bytes(), volume);
    assert_eq!(engine.state(), WorkState::Idle);
    Ok(())
}

#[tokio::test]
async fn restart_resets_statistics_and_numbering() -> Result<()> {
    let src = tempdir()?;
    let first = tempdir()?;
    let second = tempdir()?;
    let mut engine = make_engine(first.path(), 2, 0.0);
    engine.add_sources(PoolKind::Clean, [write_sample(&src, "a.bin", 8)?]);

    engine.start().await?;
    engine.tick().await?;
    engine.stop();
    assert_eq!(engine.copied_files(), 4);

    engine.set_destination_dir(second.path().to_path_buf());
    engine.start().await?;
    assert_eq!(engine.copied_files(), 2);
    assert_eq!(engine.total_volume_bytes(), 16);
    let prefixes: Vec<u64> = copied_files(second.path())?.iter().map(|(p, _, _)| *p).collect();
    assert_eq!(prefixes, vec![0, 1]);
    Ok(())
}

#[tokio::test]
async fn average_speed_is_volume_over_elapsed() -> Result<()> {
    let src = tempdir()?;
    let dest = tempdir()?;
    let mut engine = make_engine(dest.path(), 1, 0.0);
    engine.add_sources(PoolKind::Clean, [write_sample(&src, "a.bin", 1000)?]);

    engine.start().await?;
    engine.tick().await?;

    assert_eq!(engine.total_volume_bytes(), 2000);
    // A run shorter than a second counts as one.
    let elapsed = engine.elapsed_secs().max(1);
    assert_eq!(engine.average_speed_bytes(), 2000.0 / elapsed as f64);
    assert_eq!(engine.current_speed_bytes(), 1000.0);
    Ok(())
}

#[tokio::test]
async fn add_sources_drops_missing_paths() -> Result<()> {
    let src = tempdir()?;
    let dest = tempdir()?;
    let mut engine = make_engine(dest.path(), 1, 0.0);
    let present = write_sample(&src, "here.bin", 3)?;

    let added = engine.add_sources(
        PoolKind::Infected,
        [present.clone(), src.path().join("gone.bin")],
    );

    assert_eq!(added, 1);
    let pool = engine.pool(PoolKind::Infected);
    assert_eq!(pool.len(), 1);
    assert_eq!(pool.files()[0].size, 3);
    assert_eq!(pool.last_dir(), present.parent().unwrap());
    Ok(())
}

#[tokio::test]
async fn start_while_running_is_ignored() -> Result<()> {
    let src = tempdir()?;
    let dest = tempdir()?;
    let mut engine = make_engine(dest.path(), 2, 0.0);
    engine.add_sources(PoolKind::Clean, [write_sample(&src, "a.bin", 10)?]);

    engine.start().await?;
    engine.start().await?;

    assert_eq!(engine.state(), WorkState::Running);
    assert_eq!(engine.copied_files(), 2);
    assert_eq!(engine.total_volume_bytes(), 20);
    assert_eq!(copied_files(dest.path())?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn restart_into_same_destination_overwrites_numbered_files() -> Result<()> {
    let src = tempdir()?;
    let dest = tempdir()?;
    let mut engine = make_engine(dest.path(), 2, 0.0);
    engine.add_sources(PoolKind::Clean, [write_sample(&src, "a.bin", 4)?]);

    engine.start().await?;
    engine.stop();
    engine.clear_pool(PoolKind::Clean);
    engine.add_sources(PoolKind::Clean, [write_sample(&src, "a.bin", 9)?]);
    engine.start().await?;

    assert_eq!(engine.copied_files(), 2);
    let files = copied_files(dest.path())?;
    assert_eq!(files, vec![(0, "a.bin".to_string(), 9), (1, "a.bin".to_string(), 9)]);
    Ok(())
}
