//! # walsim Similarity
//!
//! Pairwise language similarity from WALS feature overlap.
//!
//! This crate turns a populated [`FeatureStore`](walsim_core::FeatureStore)
//! into a table of pairwise scores:
//!
//! - **Overlap scoring**: fraction of mutual characteristics with identical
//!   values, 0 below a minimum of mutual characteristics
//! - **Top-fraction normalisation**: the most similar pairs are rescaled to
//!   0-1 and everything else collapses to 0
//! - **Score cache**: every recomputation can be snapshotted and reloaded
//! - **Methods**: similarity approaches registered by name and evaluated over
//!   a list of languages of interest
//!
//! ## Example
//!
//! ```rust,no_run
//! use walsim_core::FeatureStore;
//! use walsim_similarity::{Scope, SimilarityConfig, SimilarityService};
//!
//! let store = FeatureStore::load("data/wals").unwrap();
//! let service = SimilarityService::new(store, SimilarityConfig::default(), Scope::All).unwrap();
//!
//! // German and Dutch by ISO 639-3 code
//! let score = service.evaluate_score("deu", "nld").unwrap();
//! println!("deu-nld: {score:.4}");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌──────────────┐
//! │ FeatureStore │────>│ PairScorer  │────>│  Normalizer  │
//! │  (CSV data)  │     │ (raw pairs) │     │ (top slice)  │
//! └──────────────┘     └─────────────┘     └──────────────┘
//!                                                 │
//!                      ┌─────────────┐     ┌──────────────┐
//!                      │  Evaluator  │<────│   Service    │<──> ScoreCache
//!                      │ (ext. ids)  │     │  (queries)   │
//!                      └─────────────┘     └──────────────┘
//! ```

pub mod config;
pub mod evaluator;
pub mod normalize;
pub mod scorer;
pub mod service;

// Re-export main types for convenience
pub use config::{
    CacheConfig,
    SimilarityConfig,
    DEFAULT_CACHE_DIR,
    MINIMUM_MUTUAL_CHARACTERISTICS,
    NORMALISE_THRESHOLD,
};
pub use evaluator::{
    load_languages_of_interest,
    EvaluationMode,
    Evaluator,
    Method,
    MethodBuilder,
    MethodContext,
    MethodRegistry,
    SimilarityMethod,
};
pub use normalize::{Normalization, ScoreNormalizer};
pub use scorer::{Overlap, PairScorer, RawScores};
pub use service::{Scope, SimilarityService, METHOD_NAME};
