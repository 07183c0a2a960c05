//! Scoring configuration
//!
//! Every field has a default, so a JSON file only needs the values that
//! differ:
//!
//! ```json
//! { "normalise_threshold": 0.001, "cache": { "load_from_cache": true } }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walsim_core::{Error, Result};

/// Below this number of mutual characteristics a raw score is 0
pub const MINIMUM_MUTUAL_CHARACTERISTICS: usize = 30;

/// Fraction of most similar pairs kept distinguishable by normalisation;
/// 0.01 rescales the top 1% to 0-1 and sends the other 99% to zero
pub const NORMALISE_THRESHOLD: f64 = 0.0005;

pub const DEFAULT_CACHE_DIR: &str = "cache";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub dir: PathBuf,
    /// Load scores from a snapshot instead of recomputing them
    pub load_from_cache: bool,
    /// Write a new snapshot after every recomputation
    pub save_to_cache: bool,
    /// Snapshot to load; the latest one when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_CACHE_DIR),
            load_from_cache: false,
            save_to_cache: true,
            snapshot: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub min_mutual_characteristics: usize,
    pub normalise: bool,
    pub normalise_threshold: f64,
    /// Silence the notice logged when scoring a partially populated store
    pub suppress_partial_warning: bool,
    /// Registry codes preferred when an external id is ambiguous
    pub preferences: Vec<String>,
    pub cache: CacheConfig,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            min_mutual_characteristics: MINIMUM_MUTUAL_CHARACTERISTICS,
            normalise: true,
            normalise_threshold: NORMALISE_THRESHOLD,
            suppress_partial_warning: false,
            preferences: Vec::new(),
            cache: CacheConfig::default(),
        }
    }
}

impl SimilarityConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let config: Self = serde_json::from_slice(&data)
            .map_err(|e| Error::InvalidConfig(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.normalise_threshold > 0.0 && self.normalise_threshold <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "normalise_threshold must be in (0, 1], got {}",
                self.normalise_threshold
            )));
        }
        Ok(())
    }

    /// Preference list, or `None` when empty
    pub fn preferences(&self) -> Option<&[String]> {
        if self.preferences.is_empty() {
            None
        } else {
            Some(&self.preferences)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimilarityConfig::default();
        assert_eq!(config.min_mutual_characteristics, 30);
        assert!(config.normalise);
        assert_eq!(config.normalise_threshold, 0.0005);
        assert!(config.cache.save_to_cache);
        assert!(!config.cache.load_from_cache);
        assert!(config.preferences().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config: SimilarityConfig = serde_json::from_str(
            r#"{ "normalise": false, "cache": { "dir": "/tmp/walsim" }, "preferences": ["gti"] }"#,
        )
        .unwrap();
        assert!(!config.normalise);
        assert_eq!(config.cache.dir, PathBuf::from("/tmp/walsim"));
        assert!(config.cache.save_to_cache);
        assert_eq!(config.min_mutual_characteristics, 30);
        assert_eq!(config.preferences(), Some(&["gti".to_string()][..]));
    }

    #[test]
    fn test_invalid_threshold() {
        for threshold in [0.0, -0.1, 1.5, f64::NAN] {
            let config = SimilarityConfig {
                normalise_threshold: threshold,
                ..SimilarityConfig::default()
            };
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "min_mutual_characteristics": 10 }"#).unwrap();
        assert_eq!(
            SimilarityConfig::from_json_file(&path).unwrap().min_mutual_characteristics,
            10
        );

        std::fs::write(&path, r#"{ "normalise_threshold": 2.0 }"#).unwrap();
        assert!(SimilarityConfig::from_json_file(&path).is_err());
    }
}
