// Timestamped score snapshots
use atomicwrites::{AtomicFile, OverwriteBehavior};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};
use walsim_core::{Error, Result, ScoreTable};

pub const SNAPSHOT_EXTENSION: &str = "snapshot";

/// Snapshot description for listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDescription {
    pub name: String,
    pub creation_time: Option<String>,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Every pairwise score of one scoring pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub method: String,
    /// Unix time in microseconds
    pub created_at: i64,
    pub scores: Vec<(String, String, f64)>,
}

impl ScoreSnapshot {
    /// Merge into a live table; returns the number of pairs written
    pub fn apply_to(self, table: &mut ScoreTable) -> usize {
        table.merge_triples(self.scores)
    }

    pub fn into_table(self) -> ScoreTable {
        let mut table = ScoreTable::new();
        self.apply_to(&mut table);
        table
    }
}

/// Immutable snapshot files in one cache directory.
///
/// Files are named `{method}-{UTC timestamp}.snapshot` and written through an
/// atomic rename, so a reader never observes a partially written snapshot.
pub struct ScoreCache {
    cache_dir: PathBuf,
}

impl ScoreCache {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    #[inline]
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    fn validate_method(method: &str) -> Result<()> {
        if method.is_empty()
            || !method
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(Error::InvalidConfig(format!(
                "invalid snapshot method name '{method}'"
            )));
        }
        Ok(())
    }

    /// Generate snapshot filename with timestamp
    fn snapshot_name(method: &str, stamp: DateTime<Utc>) -> String {
        format!(
            "{}-{}.{}",
            method,
            stamp.format("%Y-%m-%d-%H-%M-%S-%6f"),
            SNAPSHOT_EXTENSION
        )
    }

    fn is_snapshot_of(path: &Path, method: Option<&str>) -> bool {
        if path.extension().and_then(|s| s.to_str()) != Some(SNAPSHOT_EXTENSION) || !path.is_file() {
            return false;
        }
        match (method, path.file_name().and_then(|n| n.to_str())) {
            (Some(method), Some(name)) => name
                .strip_prefix(method)
                .is_some_and(|rest| rest.starts_with('-')),
            (None, Some(_)) => true,
            _ => false,
        }
    }

    fn snapshot_path(&self, name: &str) -> Result<PathBuf> {
        if name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(Error::SnapshotNotFound(name.to_string()));
        }
        Ok(self.cache_dir.join(name))
    }

    /// Write a new snapshot; existing snapshots are never overwritten
    pub fn save(&self, method: &str, table: &ScoreTable) -> Result<SnapshotDescription> {
        Self::validate_method(method)?;

        let mut stamp = Utc::now();
        let mut name = Self::snapshot_name(method, stamp);
        while self.cache_dir.join(&name).exists() {
            stamp += Duration::microseconds(1);
            name = Self::snapshot_name(method, stamp);
        }
        let path = self.cache_dir.join(&name);

        let snapshot = ScoreSnapshot {
            method: method.to_string(),
            created_at: stamp.timestamp_micros(),
            scores: table.to_triples(),
        };
        let data = bincode::serialize(&snapshot)
            .map_err(|e| Error::Serialization(e.to_string()))?;

        AtomicFile::new(&path, OverwriteBehavior::DisallowOverwrite)
            .write(|f| f.write_all(&data))
            .map_err(|e| match e {
                atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => Error::Io(e),
            })?;

        info!("Saved {} scores to snapshot {}", snapshot.scores.len(), name);
        self.describe(&path)
    }

    /// Load a snapshot by file name
    pub fn load(&self, name: &str) -> Result<ScoreSnapshot> {
        let path = self.snapshot_path(name)?;
        if !path.is_file() {
            return Err(Error::SnapshotNotFound(name.to_string()));
        }

        let file = File::open(&path)?;
        let snapshot: ScoreSnapshot = bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| Error::Serialization(format!("{name}: {e}")))?;
        debug!("Loaded snapshot {} ({} scores)", name, snapshot.scores.len());
        Ok(snapshot)
    }

    /// Load the most recently modified snapshot of a method
    pub fn load_latest(&self, method: &str) -> Result<ScoreSnapshot> {
        let name = self
            .latest_name(method)?
            .ok_or_else(|| Error::EmptyCache(self.cache_dir.display().to_string()))?;
        info!("Loading latest {} snapshot: {}", method, name);
        self.load(&name)
    }

    /// Named snapshot if given, otherwise the latest one
    pub fn load_named_or_latest(&self, method: &str, name: Option<&str>) -> Result<ScoreSnapshot> {
        match name {
            Some(name) => self.load(name),
            None => self.load_latest(method),
        }
    }

    /// Latest snapshot by modification time; ties go to the later name
    pub fn latest_name(&self, method: &str) -> Result<Option<String>> {
        Self::validate_method(method)?;

        let mut latest: Option<(SystemTime, String)> = None;
        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if !Self::is_snapshot_of(&path, Some(method)) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let modified = fs::metadata(&path)?.modified()?;
            let candidate = (modified, name.to_string());
            if latest.as_ref().map_or(true, |current| candidate > *current) {
                latest = Some(candidate);
            }
        }
        Ok(latest.map(|(_, name)| name))
    }

    fn describe(&self, path: &Path) -> Result<SnapshotDescription> {
        let metadata = fs::metadata(path)?;
        let file_data = fs::read(path)?;
        let checksum = format!("{:x}", Sha256::digest(&file_data));
        let creation_time = metadata
            .modified()
            .ok()
            .map(|t| DateTime::<Utc>::from(t).format("%Y-%m-%dT%H:%M:%SZ").to_string());

        Ok(SnapshotDescription {
            name: path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string(),
            creation_time,
            size: metadata.len(),
            checksum: Some(checksum),
        })
    }

    /// List snapshots, newest name first; all methods when `method` is None
    pub fn list_snapshots(&self, method: Option<&str>) -> Result<Vec<SnapshotDescription>> {
        if let Some(method) = method {
            Self::validate_method(method)?;
        }

        let mut snapshots = Vec::new();
        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            if Self::is_snapshot_of(&path, method) {
                snapshots.push(self.describe(&path)?);
            }
        }

        snapshots.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(snapshots)
    }

    /// Delete a snapshot
    pub fn delete_snapshot(&self, name: &str) -> Result<bool> {
        let path = self.snapshot_path(name)?;
        if path.is_file() {
            fs::remove_file(&path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ScoreTable {
        let mut table = ScoreTable::new();
        table.set("ger", "dut", 0.75);
        table.set("ger", "fin", 0.1 + 0.2);
        table.set("dut", "fin", 0.0);
        table
    }

    #[test]
    fn test_round_trip_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ScoreCache::new(dir.path()).unwrap();
        let table = sample_table();

        let description = cache.save("wals", &table).unwrap();
        assert!(description.name.starts_with("wals-"));
        assert!(description.name.ends_with(".snapshot"));
        assert!(description.size > 0);

        let loaded = cache.load(&description.name).unwrap();
        assert_eq!(loaded.method, "wals");
        assert_eq!(loaded.into_table(), table);
    }

    #[test]
    fn test_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ScoreCache::new(dir.path()).unwrap();
        assert!(matches!(cache.load_latest("wals"), Err(Error::EmptyCache(_))));
    }

    #[test]
    fn test_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ScoreCache::new(dir.path()).unwrap();
        let table = sample_table();

        let names: Vec<String> = (0..5)
            .map(|_| cache.save("wals", &table).unwrap().name)
            .collect();
        let unique: std::collections::HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), 5);
        assert_eq!(cache.list_snapshots(Some("wals")).unwrap().len(), 5);
    }

    #[test]
    fn test_latest_snapshot_wins() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ScoreCache::new(dir.path()).unwrap();

        let mut first = ScoreTable::new();
        first.set("ger", "dut", 0.1);
        cache.save("wals", &first).unwrap();

        let mut second = ScoreTable::new();
        second.set("ger", "dut", 0.9);
        let latest = cache.save("wals", &second).unwrap();

        assert_eq!(cache.latest_name("wals").unwrap(), Some(latest.name));
        let loaded = cache.load_latest("wals").unwrap().into_table();
        assert_eq!(loaded.get("dut", "ger"), Some(0.9));
    }

    #[test]
    fn test_methods_are_separate() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ScoreCache::new(dir.path()).unwrap();
        cache.save("wals", &sample_table()).unwrap();

        assert!(matches!(cache.load_latest("scores"), Err(Error::EmptyCache(_))));
        assert_eq!(cache.list_snapshots(None).unwrap().len(), 1);
        assert!(cache.save("Bad-Name", &sample_table()).is_err());
    }

    #[test]
    fn test_missing_and_deleted_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ScoreCache::new(dir.path()).unwrap();
        assert!(matches!(cache.load("nope.snapshot"), Err(Error::SnapshotNotFound(_))));
        assert!(matches!(cache.load("../x.snapshot"), Err(Error::SnapshotNotFound(_))));

        let saved = cache.save("wals", &sample_table()).unwrap();
        assert!(cache.delete_snapshot(&saved.name).unwrap());
        assert!(!cache.delete_snapshot(&saved.name).unwrap());
        assert!(cache.list_snapshots(Some("wals")).unwrap().is_empty());
    }

    #[test]
    fn test_apply_merges_symmetrically() {
        let snapshot = ScoreSnapshot {
            method: "wals".to_string(),
            created_at: 0,
            scores: vec![("ger".to_string(), "dut".to_string(), 0.4)],
        };
        let mut table = ScoreTable::new();
        table.set("fin", "ger", 0.2);
        assert_eq!(snapshot.apply_to(&mut table), 1);
        assert_eq!(table.get("dut", "ger"), Some(0.4));
        assert_eq!(table.get("ger", "fin"), Some(0.2));
    }

    #[test]
    fn test_corrupt_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ScoreCache::new(dir.path()).unwrap();
        fs::write(dir.path().join("wals-broken.snapshot"), b"abc").unwrap();
        assert!(matches!(
            cache.load("wals-broken.snapshot"),
            Err(Error::Serialization(_))
        ));
    }
}
