//! # walsim Core
//!
//! Core library for walsim.
//!
//! This crate provides the data side of WALS-based language similarity:
//!
//! - [`FeatureStore`] - Loads the WALS CLDF tables, owns language records and
//!   resolves ISO 639-3 codes to WALS codes
//! - [`CharacteristicRegistry`] - Parameter names, chapters, value descriptions
//! - [`LanguageRecord`] - One language and its (lazily populated) characteristics
//! - [`PairKey`] / [`ScoreTable`] - Unordered pairs and their scores
//!
//! ## Example
//!
//! ```rust,no_run
//! use walsim_core::{FeatureStore, PopulateOptions};
//!
//! let mut store = FeatureStore::load("data/wals").unwrap();
//! store.populate_characteristics(&PopulateOptions::all()).unwrap();
//!
//! let german = store.resolve_external_id("deu", None).unwrap();
//! let record = store.language(german).unwrap();
//! println!("{} has {} characteristics", german, record.characteristics().unwrap().len());
//! ```

pub mod error;
pub mod language;
pub mod pair;
pub mod registry;
pub mod store;
mod table;

pub use error::{Error, Result};
pub use language::LanguageRecord;
pub use pair::{PairKey, ScoreTable};
pub use registry::{Chapter, Characteristic, CharacteristicRegistry};
pub use store::{FeatureStore, KeyMode, Observation, PopulateOptions};
