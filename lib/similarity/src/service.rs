//! The WALS similarity service
//!
//! Owns a [`FeatureStore`] and the score table computed from it. A service
//! is built either by recomputing every pair in scope or by loading a
//! snapshot from the score cache.

use crate::config::SimilarityConfig;
use crate::normalize::{Normalization, ScoreNormalizer};
use crate::scorer::PairScorer;
use std::time::Instant;
use tracing::{info, warn};
use walsim_core::{Error, FeatureStore, Result, ScoreTable};
use walsim_storage::{ScoreCache, SnapshotDescription};

/// Snapshot method name for full-table scores
pub const METHOD_NAME: &str = "wals";

/// Languages a service scores
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Scope {
    /// Every language in the store
    #[default]
    All,
    /// Registry codes
    Codes(Vec<String>),
    /// External ids, resolved with the configured preferences
    External(Vec<String>),
}

pub struct SimilarityService {
    store: FeatureStore,
    config: SimilarityConfig,
    scorer: PairScorer,
    codes: Vec<String>,
    /// Cached scores are limited to `codes` unless every language is in scope
    scoped: bool,
    scores: ScoreTable,
    normalization: Option<Normalization>,
    snapshot: Option<SnapshotDescription>,
}

impl SimilarityService {
    pub fn new(store: FeatureStore, config: SimilarityConfig, scope: Scope) -> Result<Self> {
        config.validate()?;
        let scoped = scope != Scope::All;
        let codes = Self::resolve_scope(&store, &config, scope)?;

        let mut service = Self {
            scorer: PairScorer::new(config.min_mutual_characteristics),
            store,
            config,
            codes,
            scoped,
            scores: ScoreTable::new(),
            normalization: None,
            snapshot: None,
        };

        if service.config.cache.load_from_cache {
            service.load_cached()?;
        } else {
            service.recompute()?;
        }
        Ok(service)
    }

    fn resolve_scope(store: &FeatureStore, config: &SimilarityConfig, scope: Scope) -> Result<Vec<String>> {
        let mut codes: Vec<String> = match scope {
            Scope::All => store.registry_codes().to_vec(),
            Scope::Codes(codes) => {
                for code in &codes {
                    store.require(code)?;
                }
                codes
            }
            Scope::External(ids) => ids
                .iter()
                .map(|id| store.resolve_external_id(id, config.preferences()).map(str::to_string))
                .collect::<Result<_>>()?,
        };

        let mut seen = ahash::AHashSet::with_capacity(codes.len());
        codes.retain(|code| seen.insert(code.clone()));
        Ok(codes)
    }

    /// Score every pair in scope, normalise and optionally snapshot
    pub fn recompute(&mut self) -> Result<()> {
        let started = Instant::now();
        if self.store.is_partial() && !self.config.suppress_partial_warning {
            warn!(
                "Feature store is partially populated; pairs involving the other {} languages will not be scored",
                self.store.len() - self.store.partial_population().map_or(0, |p| p.len())
            );
        }

        let targets: Vec<&str> = self
            .codes
            .iter()
            .filter(|code| self.store.is_available(code))
            .map(String::as_str)
            .collect();
        self.store.ensure_populated(&targets)?;

        let raw = self
            .scorer
            .populate_all_scores(&self.store, &self.codes, self.store.partial_population())?;
        info!(
            "Scored {} pairs over {} languages in {:?}",
            raw.table.len(),
            self.codes.len(),
            started.elapsed()
        );

        if self.config.normalise {
            let normalizer = ScoreNormalizer::new(self.config.normalise_threshold)?;
            let (table, fitted) = normalizer.normalise(&raw.table, &raw.scores)?;
            self.scores = table;
            self.normalization = Some(fitted);
        } else {
            self.scores = raw.table;
            self.normalization = None;
        }

        if self.config.cache.save_to_cache {
            let cache = ScoreCache::new(&self.config.cache.dir)?;
            self.snapshot = Some(cache.save(METHOD_NAME, &self.scores)?);
        }
        Ok(())
    }

    fn load_cached(&mut self) -> Result<()> {
        let cache = ScoreCache::new(&self.config.cache.dir)?;
        let mut snapshot =
            cache.load_named_or_latest(METHOD_NAME, self.config.cache.snapshot.as_deref())?;
        if self.scoped {
            let codes: ahash::AHashSet<&str> = self.codes.iter().map(String::as_str).collect();
            snapshot
                .scores
                .retain(|(a, b, _)| codes.contains(a.as_str()) && codes.contains(b.as_str()));
        }
        let merged = snapshot.apply_to(&mut self.scores);
        info!("Loaded {} scores from {}", merged, cache.dir().display());
        Ok(())
    }

    /// Score of two languages given by external id
    pub fn evaluate_score(&self, first: &str, second: &str) -> Result<f64> {
        let unknown = || Error::UnknownLanguagePair(first.to_string(), second.to_string());
        let preferences = self.config.preferences();
        let a = self
            .store
            .resolve_external_id(first, preferences)
            .map_err(|_| unknown())?;
        let b = self
            .store
            .resolve_external_id(second, preferences)
            .map_err(|_| unknown())?;
        self.score(a, b)
    }

    /// Score of two languages given by registry code
    pub fn score(&self, a: &str, b: &str) -> Result<f64> {
        self.scores
            .get(a, b)
            .ok_or_else(|| Error::PairNotScored(a.to_string(), b.to_string()))
    }

    /// Mutual characteristic keys of two registry codes
    pub fn mutual_characteristics(&mut self, a: &str, b: &str) -> Result<Vec<String>> {
        self.scorer.mutual_characteristics(&mut self.store, a, b)
    }

    #[inline]
    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    #[inline]
    pub fn store(&self) -> &FeatureStore {
        &self.store
    }

    #[inline]
    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    /// Registry codes in scope
    #[inline]
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Bounds of the last normalisation, if one ran
    pub fn normalization(&self) -> Option<&Normalization> {
        self.normalization.as_ref()
    }

    /// Snapshot written by the last recomputation
    pub fn snapshot(&self) -> Option<&SnapshotDescription> {
        self.snapshot.as_ref()
    }

    pub fn into_store(self) -> FeatureStore {
        self.store
    }
}
