//! Pairwise overlap scoring
//!
//! The raw score of a pair is the fraction of mutual characteristics whose
//! values are identical. Pairs sharing fewer than the minimum number of
//! characteristics score 0: too little evidence to measure, which is not the
//! same as dissimilar.

use crate::config::MINIMUM_MUTUAL_CHARACTERISTICS;
use ahash::AHashSet;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;
use walsim_core::{Error, FeatureStore, LanguageRecord, PairKey, Result, ScoreTable};

/// Mutual and equal characteristic counts of one pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    pub mutual: usize,
    pub equal: usize,
}

impl Overlap {
    pub fn between(a: &BTreeMap<String, String>, b: &BTreeMap<String, String>) -> Self {
        let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
        let mut overlap = Overlap { mutual: 0, equal: 0 };
        for (key, value) in small {
            if let Some(other) = large.get(key) {
                overlap.mutual += 1;
                if value == other {
                    overlap.equal += 1;
                }
            }
        }
        overlap
    }
}

/// Result of a bulk scoring pass
#[derive(Debug, Clone, Default)]
pub struct RawScores {
    pub table: ScoreTable,
    /// Every computed score in pair order, duplicates included
    pub scores: Vec<f64>,
    /// Pairs left out because a member is outside the partial population
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct PairScorer {
    min_mutual: usize,
}

impl Default for PairScorer {
    fn default() -> Self {
        Self::new(MINIMUM_MUTUAL_CHARACTERISTICS)
    }
}

impl PairScorer {
    pub fn new(min_mutual: usize) -> Self {
        Self { min_mutual }
    }

    #[inline]
    pub fn min_mutual_characteristics(&self) -> usize {
        self.min_mutual
    }

    /// Keys recorded for both languages, sorted. Populates exactly these two
    /// languages first if needed.
    pub fn mutual_characteristics(
        &self,
        store: &mut FeatureStore,
        a: &str,
        b: &str,
    ) -> Result<Vec<String>> {
        store.ensure_populated(&[a, b])?;
        let (ca, cb) = (populated(store.require(a)?)?, populated(store.require(b)?)?);
        Ok(ca.keys().filter(|k| cb.contains_key(*k)).cloned().collect())
    }

    /// Raw score from two characteristic maps
    pub fn score_maps(&self, a: &BTreeMap<String, String>, b: &BTreeMap<String, String>) -> f64 {
        let overlap = Overlap::between(a, b);
        if overlap.mutual < self.min_mutual || overlap.mutual == 0 {
            0.0
        } else {
            overlap.equal as f64 / overlap.mutual as f64
        }
    }

    /// Raw score of two populated records
    pub fn score(&self, a: &LanguageRecord, b: &LanguageRecord) -> Result<f64> {
        Ok(self.score_maps(populated(a)?, populated(b)?))
    }

    /// Raw score by registry code, populating lazily
    pub fn score_codes(&self, store: &mut FeatureStore, a: &str, b: &str) -> Result<f64> {
        store.ensure_populated(&[a, b])?;
        self.score(store.require(a)?, store.require(b)?)
    }

    /// Score every unordered pair of `codes`.
    ///
    /// Pairs with a member outside `partial` are absent from the result,
    /// not scored as 0. Every other language must already be populated.
    pub fn populate_all_scores(
        &self,
        store: &FeatureStore,
        codes: &[String],
        partial: Option<&AHashSet<String>>,
    ) -> Result<RawScores> {
        let mut seen = AHashSet::with_capacity(codes.len());
        let mut maps: Vec<Option<&BTreeMap<String, String>>> = Vec::with_capacity(codes.len());
        let mut unique: Vec<&str> = Vec::with_capacity(codes.len());

        for code in codes {
            if !seen.insert(code.as_str()) {
                continue;
            }
            let record = store.require(code)?;
            let in_scope = partial.map_or(true, |p| p.contains(code));
            maps.push(if in_scope { Some(populated(record)?) } else { None });
            unique.push(code.as_str());
        }

        let n = unique.len();
        let mut pairs = Vec::with_capacity(n.saturating_sub(1) * n / 2);
        let mut skipped = 0usize;
        for i in 0..n {
            for j in (i + 1)..n {
                if maps[i].is_some() && maps[j].is_some() {
                    pairs.push((i, j));
                } else {
                    skipped += 1;
                }
            }
        }

        debug!("Scoring {} pairs ({} skipped)", pairs.len(), skipped);

        let scores: Vec<f64> = pairs
            .par_iter()
            .map(|&(i, j)| match (maps[i], maps[j]) {
                (Some(a), Some(b)) => self.score_maps(a, b),
                _ => 0.0,
            })
            .collect();

        let table = pairs
            .iter()
            .zip(&scores)
            .filter_map(|(&(i, j), &score)| PairKey::new(unique[i], unique[j]).map(|k| (k, score)))
            .collect();

        Ok(RawScores {
            table,
            scores,
            skipped,
        })
    }
}

fn populated(record: &LanguageRecord) -> Result<&BTreeMap<String, String>> {
    record
        .characteristics()
        .ok_or_else(|| Error::NotPopulated(record.code.clone()))
}
