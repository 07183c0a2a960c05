//! # walsim Storage
//!
//! Persistence for pairwise score tables: every scoring pass can be written
//! as an immutable, timestamped snapshot and loaded back on later runs
//! instead of recomputing millions of pairs.

pub mod snapshot;

pub use snapshot::{ScoreCache, ScoreSnapshot, SnapshotDescription, SNAPSHOT_EXTENSION};
