//! # walsim
//!
//! Pairwise language similarity from the World Atlas of Language Structures.
//!
//! walsim loads the WALS CLDF tables, scores every language pair by the
//! fraction of shared typological features with identical values, rescales
//! the most similar pairs to 0-1 and caches the result as timestamped
//! snapshots.
//!
//! ## Quick Start
//!
//! ### From the Command Line
//!
//! ```bash
//! cargo install walsim
//! walsim --data-dir ./data/wals score languages.txt
//! walsim --data-dir ./data/wals query deu nld
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use walsim::prelude::*;
//!
//! let store = FeatureStore::load("data/wals").unwrap();
//! let service = SimilarityService::new(store, SimilarityConfig::default(), Scope::All).unwrap();
//!
//! let score = service.evaluate_score("deu", "nld").unwrap();
//! assert!((0.0..=1.0).contains(&score));
//! ```
//!
//! ## Crate Structure
//!
//! walsim is composed of several crates:
//!
//! - [`walsim-core`](https://docs.rs/walsim-core) - Feature store, characteristic registry, pair tables
//! - [`walsim-storage`](https://docs.rs/walsim-storage) - Score snapshots
//! - [`walsim-similarity`](https://docs.rs/walsim-similarity) - Scoring, normalisation, service, evaluator
//!
//! ## Features
//!
//! - **Lazy population**: characteristics are read only for the languages a query needs
//! - **Ambiguous ISO codes**: resolved by explicit preferences
//! - **Parallel pair pass**: all pairs scored with rayon
//! - **Snapshots**: atomic, never-overwritten score caches

// Re-export core types
pub use walsim_core::{
    Chapter, Characteristic, CharacteristicRegistry,
    FeatureStore, KeyMode, LanguageRecord, Observation, PopulateOptions,
    PairKey, ScoreTable,
    Error, Result,
};

// Re-export storage
pub use walsim_storage::{ScoreCache, ScoreSnapshot, SnapshotDescription};

// Re-export similarity
pub use walsim_similarity::{
    CacheConfig, SimilarityConfig,
    PairScorer, ScoreNormalizer, Normalization,
    Scope, SimilarityService,
    EvaluationMode, Evaluator, Method, MethodContext, MethodRegistry, SimilarityMethod,
    load_languages_of_interest,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        FeatureStore, PopulateOptions, LanguageRecord,
        ScoreTable, ScoreCache,
        SimilarityConfig, SimilarityService, Scope,
        Evaluator, EvaluationMode, Method, MethodContext, MethodRegistry, SimilarityMethod,
        Error, Result,
    };
}
