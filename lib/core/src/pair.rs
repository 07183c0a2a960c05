// Unordered language pairs and the pairwise score table
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An unordered pair of distinct codes, stored in canonical (sorted) order
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    low: String,
    high: String,
}

impl PairKey {
    /// Returns `None` for a self pair
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Option<Self> {
        let (a, b) = (a.into(), b.into());
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    #[inline]
    pub fn first(&self) -> &str {
        &self.low
    }

    #[inline]
    pub fn second(&self) -> &str {
        &self.high
    }

    pub fn contains(&self, code: &str) -> bool {
        self.low == code || self.high == code
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// Pairwise scores keyed by unordered pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTable {
    scores: BTreeMap<PairKey, f64>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: PairKey, score: f64) -> Option<f64> {
        self.scores.insert(key, score)
    }

    /// Store a score for `(a, b)`; self pairs are ignored and return false
    pub fn set(&mut self, a: &str, b: &str, score: f64) -> bool {
        match PairKey::new(a, b) {
            Some(key) => {
                self.scores.insert(key, score);
                true
            }
            None => false,
        }
    }

    /// Identical for `(a, b)` and `(b, a)`
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        PairKey::new(a, b).and_then(|key| self.scores.get(&key).copied())
    }

    pub fn contains(&self, a: &str, b: &str) -> bool {
        self.get(a, b).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, f64)> {
        self.scores.iter().map(|(k, v)| (k, *v))
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.scores.values().copied()
    }

    /// `(code_a, code_b, score)` triples in canonical order
    pub fn to_triples(&self) -> Vec<(String, String, f64)> {
        self.scores
            .iter()
            .map(|(k, v)| (k.low.clone(), k.high.clone(), *v))
            .collect()
    }

    /// Merge triples into the table; both orderings of each pair end up with
    /// the same value. Returns the number of pairs merged.
    pub fn merge_triples<I>(&mut self, triples: I) -> usize
    where
        I: IntoIterator<Item = (String, String, f64)>,
    {
        let mut merged = 0;
        for (a, b, score) in triples {
            if let Some(key) = PairKey::new(a, b) {
                self.scores.insert(key, score);
                merged += 1;
            }
        }
        merged
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl FromIterator<(PairKey, f64)> for ScoreTable {
    fn from_iter<I: IntoIterator<Item = (PairKey, f64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}
