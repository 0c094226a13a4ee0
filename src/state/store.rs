//! Snapshot persistence
//!
//! Put/get-latest contract over a durable store. The file-backed
//! implementation writes new-then-renames so a reader (or a restart)
//! can never observe a half-written snapshot.

use super::PortfolioSnapshot;
use async_trait::async_trait;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Persistence failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable key-value boundary for snapshots
///
/// The engine assumes only atomicity of `put` and consistency of
/// `latest`, not any particular storage technology.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist a snapshot atomically
    async fn put(&self, snapshot: &PortfolioSnapshot) -> Result<(), StoreError>;
    /// Most recent complete snapshot, if any
    async fn latest(&self) -> Result<Option<PortfolioSnapshot>, StoreError>;
    /// Full retained history, oldest first
    async fn history(&self) -> Result<Vec<PortfolioSnapshot>, StoreError>;
}

/// One JSON file per snapshot under a directory, atomic via
/// write-tmp-fsync-rename
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn snapshot_path(&self, cycle: u64) -> PathBuf {
        self.dir.join(format!("snapshot-{cycle:010}.json"))
    }

    /// Committed snapshot files, ascending by cycle
    fn committed_paths(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| is_committed_snapshot(p))
            .collect();
        paths.sort();
        Ok(paths)
    }

    fn read_snapshot(path: &Path) -> Option<PortfolioSnapshot> {
        let bytes = fs::read(path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                // A torn or corrupt file is skipped, never trusted
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable snapshot");
                None
            }
        }
    }
}

fn is_committed_snapshot(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.starts_with("snapshot-") && name.ends_with(".json")
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn put(&self, snapshot: &PortfolioSnapshot) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let final_path = self.snapshot_path(snapshot.cycle);
        let tmp_path = final_path.with_extension("json.tmp");

        // Write the new file completely and durably, then swap it in;
        // readers only ever see .json files that are fully written
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp_path, &final_path)?;

        tracing::debug!(cycle = snapshot.cycle, path = %final_path.display(), "Snapshot committed");
        Ok(())
    }

    async fn latest(&self) -> Result<Option<PortfolioSnapshot>, StoreError> {
        let paths = self.committed_paths()?;
        for path in paths.iter().rev() {
            if let Some(snapshot) = Self::read_snapshot(path) {
                return Ok(Some(snapshot));
            }
        }
        Ok(None)
    }

    async fn history(&self) -> Result<Vec<PortfolioSnapshot>, StoreError> {
        Ok(self
            .committed_paths()?
            .iter()
            .filter_map(|p| Self::read_snapshot(p))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn snapshot(cycle: u64, cash: rust_decimal::Decimal) -> PortfolioSnapshot {
        PortfolioSnapshot {
            cycle,
            timestamp: Utc::now(),
            cash,
            equity: cash,
            positions: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn test_put_then_latest_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path()).unwrap();

        let written = snapshot(1, dec!(1000));
        store.put(&written).await.unwrap();

        let read = store.latest().await.unwrap().unwrap();
        assert_eq!(read, written);
    }

    #[tokio::test]
    async fn test_latest_prefers_highest_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path()).unwrap();

        for cycle in 1..=5 {
            store
                .put(&snapshot(cycle, dec!(1000) + rust_decimal::Decimal::from(cycle)))
                .await
                .unwrap();
        }

        let latest = store.latest().await.unwrap().unwrap();
        assert_eq!(latest.cycle, 5);
    }

    #[tokio::test]
    async fn test_empty_store_has_no_latest() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path()).unwrap();
        assert!(store.latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_history_is_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path()).unwrap();

        for cycle in [3u64, 1, 2] {
            store.put(&snapshot(cycle, dec!(1000))).await.unwrap();
        }

        let history = store.history().await.unwrap();
        let cycles: Vec<u64> = history.iter().map(|s| s.cycle).collect();
        assert_eq!(cycles, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_abandoned_tmp_file_is_invisible() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path()).unwrap();
        store.put(&snapshot(1, dec!(1000))).await.unwrap();

        // Simulate a crash mid-write: a tmp file that never got renamed
        fs::write(dir.path().join("snapshot-0000000002.json.tmp"), b"{\"cyc").unwrap();

        let latest = store.latest().await.unwrap().unwrap();
        assert_eq!(latest.cycle, 1);
    }

    #[tokio::test]
    async fn test_torn_committed_file_falls_back_to_prior() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path()).unwrap();
        store.put(&snapshot(1, dec!(1000))).await.unwrap();

        // A committed-looking file with truncated contents must be
        // skipped in favor of the prior snapshot
        fs::write(dir.path().join("snapshot-0000000002.json"), b"{\"cycle\": 2,").unwrap();

        let latest = store.latest().await.unwrap().unwrap();
        assert_eq!(latest.cycle, 1);
    }
}
