// src/engine/pool.rs

//! Source pools: ordered lists of sample files eligible for copying.

use log::debug;
use std::path::{Path, PathBuf};

use super::types::PoolKind;

/// A sample file, captured when it was added to a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl FileRef {
    /// Build a reference to `path` if it currently names a regular file.
    pub fn probe(path: &Path) -> Option<FileRef> {
        let metadata = std::fs::metadata(path).ok()?;
        if !metadata.is_file() {
            return None;
        }
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let name = path.file_name()?.to_string_lossy().into_owned();
        Some(FileRef {
            path,
            name,
            size: metadata.len(),
        })
    }
}

/// Files are kept in insertion order and never deduplicated.
#[derive(Debug, Clone)]
pub struct SourcePool {
    kind: PoolKind,
    files: Vec<FileRef>,
    last_dir: PathBuf,
}

impl SourcePool {
    pub fn new(kind: PoolKind) -> Self {
        Self {
            kind,
            files: Vec::new(),
            last_dir: std::env::temp_dir(),
        }
    }

    /// Append every path that exists right now; the rest are dropped.
    /// Returns how many entries were added.
    pub fn add_files<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut added = 0;
        for path in paths {
            let path = path.as_ref();
            match FileRef::probe(path) {
                Some(file) => {
                    self.files.push(file);
                    added += 1;
                }
                None => debug!("{} pool: skipping missing file {}", self.kind, path.display()),
            }
        }

        if let Some(dir) = self.files.last().and_then(|f| f.path.parent()) {
            self.last_dir = dir.to_path_buf();
        }
        added
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &[FileRef] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains_path(&self, path: &Path) -> bool {
        self.files.iter().any(|f| f.path == path)
    }

    /// Directory of the most recently added file. Only a hint for pickers.
    pub fn last_dir(&self) -> &Path {
        &self.last_dir
    }

    pub fn set_last_dir(&mut self, dir: PathBuf) {
        self.last_dir = dir;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_add_files_filters_missing() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let a = dir.path().join("a.bin");
        std::fs::write(&a, [0u8; 10])?;
        let missing = dir.path().join("missing.bin");

        let mut pool = SourcePool::new(PoolKind::Clean);
        let added = pool.add_files([&a, &missing]);

        assert_eq!(added, 1);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.files()[0].name, "a.bin");
        assert_eq!(pool.files()[0].size, 10);
        assert_eq!(pool.last_dir(), pool.files()[0].path.parent().unwrap());
        Ok(())
    }

    #[test]
    fn test_add_files_keeps_duplicates() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let a = dir.path().join("a.bin");
        std::fs::write(&a, b"abc")?;

        let mut pool = SourcePool::new(PoolKind::Infected);
        pool.add_files([&a]);
        pool.add_files([&a]);

        assert_eq!(pool.len(), 2);
        assert!(pool.files().iter().all(|f| f.size == 3));
        assert!(pool.contains_path(&pool.files()[0].path.clone()));
        Ok(())
    }

    #[test]
    fn test_directories_are_not_files() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let mut pool = SourcePool::new(PoolKind::Clean);
        assert_eq!(pool.add_files([dir.path()]), 0);
        assert!(pool.is_empty());
        Ok(())
    }

    #[test]
    fn test_clear_keeps_last_dir() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let a = dir.path().join("a.bin");
        std::fs::write(&a, b"x")?;

        let mut pool = SourcePool::new(PoolKind::Clean);
        pool.add_files([&a]);
        let last = pool.last_dir().to_path_buf();
        pool.clear();

        assert!(pool.is_empty());
        assert_eq!(pool.last_dir(), last.as_path());
        Ok(())
    }
}
