//! Method registry and the languages-of-interest evaluator
//!
//! Similarity methods are registered once at startup and looked up by
//! [`Method`]. An [`Evaluator`] scores every combination of a list of
//! external ids with one method, or loads such a table from the cache.

use crate::config::SimilarityConfig;
use crate::service::{Scope, SimilarityService, METHOD_NAME};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;
use walsim_core::{Error, FeatureStore, Result, ScoreTable};
use walsim_storage::{ScoreCache, SnapshotDescription};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Wals,
}

impl Method {
    pub const ALL: [Method; 1] = [Method::Wals];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Wals => METHOD_NAME,
        }
    }

    /// Snapshot name prefix for languages-of-interest tables
    pub fn interest_snapshot(&self) -> String {
        format!("{}_interest", self.as_str())
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidConfig(format!("unsupported method '{s}'")))
    }
}

/// A pairwise similarity approach queried by external id
pub trait SimilarityMethod {
    fn method(&self) -> Method;

    fn evaluate_score(&self, first: &str, second: &str) -> Result<f64>;
}

impl SimilarityMethod for SimilarityService {
    fn method(&self) -> Method {
        Method::Wals
    }

    fn evaluate_score(&self, first: &str, second: &str) -> Result<f64> {
        SimilarityService::evaluate_score(self, first, second)
    }
}

/// Inputs shared by every method constructor
#[derive(Debug, Clone)]
pub struct MethodContext {
    pub data_dir: PathBuf,
    pub config: SimilarityConfig,
}

impl MethodContext {
    pub fn new(data_dir: impl Into<PathBuf>, config: SimilarityConfig) -> Self {
        Self {
            data_dir: data_dir.into(),
            config,
        }
    }
}

pub type MethodBuilder = fn(&MethodContext) -> Result<Box<dyn SimilarityMethod>>;

pub struct MethodRegistry {
    context: MethodContext,
    builders: AHashMap<Method, MethodBuilder>,
}

impl MethodRegistry {
    /// Registry without any methods
    pub fn new(context: MethodContext) -> Self {
        Self {
            context,
            builders: AHashMap::new(),
        }
    }

    /// Registry with every built-in method
    pub fn with_defaults(context: MethodContext) -> Self {
        let mut registry = Self::new(context);
        registry.register(Method::Wals, build_wals);
        registry
    }

    /// Returns the builder previously registered for `method`
    pub fn register(&mut self, method: Method, builder: MethodBuilder) -> Option<MethodBuilder> {
        self.builders.insert(method, builder)
    }

    pub fn build(&self, method: Method) -> Result<Box<dyn SimilarityMethod>> {
        let builder = self
            .builders
            .get(&method)
            .ok_or_else(|| Error::InvalidConfig(format!("method '{method}' is not registered")))?;
        info!("Building similarity method {}", method);
        builder(&self.context)
    }

    pub fn methods(&self) -> Vec<Method> {
        let mut methods: Vec<Method> = self.builders.keys().copied().collect();
        methods.sort();
        methods
    }

    #[inline]
    pub fn context(&self) -> &MethodContext {
        &self.context
    }
}

fn build_wals(context: &MethodContext) -> Result<Box<dyn SimilarityMethod>> {
    let store = FeatureStore::load(&context.data_dir)?;
    let service = SimilarityService::new(store, context.config.clone(), Scope::All)?;
    Ok(Box::new(service))
}

/// One external id per line; blank lines are skipped
pub fn load_languages_of_interest<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::data_load(path, "no languages of interest specified"));
    }
    let data = std::fs::read_to_string(path)?;
    Ok(data
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EvaluationMode {
    /// Score every combination and snapshot the result
    #[default]
    Evaluate,
    /// Load a snapshot; the latest one when `snapshot` is unset
    LoadFromCache { snapshot: Option<String> },
}

/// Scores of every combination of the languages of interest, keyed by
/// external id
pub struct Evaluator {
    method: Method,
    languages: Vec<String>,
    scores: ScoreTable,
    snapshot: Option<SnapshotDescription>,
}

impl Evaluator {
    pub fn new(
        registry: &MethodRegistry,
        method: Method,
        languages: Vec<String>,
        mode: EvaluationMode,
    ) -> Result<Self> {
        let cache_config = &registry.context().config.cache;
        let mut evaluator = Self {
            method,
            languages,
            scores: ScoreTable::new(),
            snapshot: None,
        };

        match mode {
            EvaluationMode::Evaluate => {
                let service = registry.build(method)?;
                evaluator.evaluate(service.as_ref())?;
                if cache_config.save_to_cache {
                    let cache = ScoreCache::new(&cache_config.dir)?;
                    evaluator.snapshot = Some(cache.save(&method.interest_snapshot(), &evaluator.scores)?);
                }
            }
            EvaluationMode::LoadFromCache { snapshot } => {
                let cache = ScoreCache::new(&cache_config.dir)?;
                evaluator.scores = cache
                    .load_named_or_latest(&method.interest_snapshot(), snapshot.as_deref())?
                    .into_table();
            }
        }
        Ok(evaluator)
    }

    fn evaluate(&mut self, service: &dyn SimilarityMethod) -> Result<()> {
        let mut scores = ScoreTable::new();
        for (i, first) in self.languages.iter().enumerate() {
            for second in &self.languages[i + 1..] {
                if first == second {
                    continue;
                }
                scores.set(first, second, service.evaluate_score(first, second)?);
            }
        }
        info!(
            "Evaluated {} pairs of {} languages with {}",
            scores.len(),
            self.languages.len(),
            self.method
        );
        self.scores = scores;
        Ok(())
    }

    /// Score of two external ids, in either order
    pub fn score(&self, first: &str, second: &str) -> Option<f64> {
        self.scores.get(first, second)
    }

    #[inline]
    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    #[inline]
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    #[inline]
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn snapshot(&self) -> Option<&SnapshotDescription> {
        self.snapshot.as_ref()
    }
}
