//! Top-fraction normalisation
//!
//! Only the most similar fraction of pairs is kept distinguishable. The
//! score at the cut becomes 0 and the maximum becomes 1; everything below
//! the cut collapses to 0.

use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use tracing::debug;
use walsim_core::{Error, Result, ScoreTable};

/// Bounds fitted on one batch of raw scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub low: f64,
    pub high: f64,
    /// Number of scores at or above the cut
    pub top_k: usize,
}

impl Normalization {
    #[inline]
    pub fn factor(&self) -> f64 {
        self.high - self.low
    }

    pub fn apply(&self, raw: f64) -> f64 {
        if raw < self.low {
            0.0
        } else {
            ((raw - self.low) / self.factor()).clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoreNormalizer {
    threshold: f64,
}

impl ScoreNormalizer {
    pub fn new(threshold: f64) -> Result<Self> {
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "normalisation threshold must be in (0, 1], got {threshold}"
            )));
        }
        Ok(Self { threshold })
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Fit bounds on every raw score of the batch, duplicates included
    pub fn fit(&self, raw: &[f64]) -> Result<Normalization> {
        let top_k = (raw.len() as f64 * self.threshold).floor() as usize;
        if top_k == 0 {
            return Err(Error::InsufficientData {
                pairs: raw.len(),
                threshold: self.threshold,
            });
        }

        let mut sorted: Vec<OrderedFloat<f64>> = raw.iter().copied().map(OrderedFloat).collect();
        sorted.sort_unstable_by_key(|s| Reverse(*s));

        let high = sorted[0].into_inner();
        let low = sorted[top_k - 1].into_inner();
        if high - low == 0.0 {
            return Err(Error::DegenerateNormalization { low, high });
        }

        debug!(
            "Normalisation fitted on {} scores: top {} in [{}, {}]",
            raw.len(),
            top_k,
            low,
            high
        );
        Ok(Normalization { low, high, top_k })
    }

    /// Fit on `raw` and rescale every score of `table`
    pub fn normalise(&self, table: &ScoreTable, raw: &[f64]) -> Result<(ScoreTable, Normalization)> {
        let fitted = self.fit(raw)?;
        let normalised = table
            .iter()
            .map(|(key, score)| (key.clone(), fitted.apply(score)))
            .collect();
        Ok((normalised, fitted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_fraction() {
        let normalizer = ScoreNormalizer::new(0.5).unwrap();
        let raw = [0.9, 0.8, 0.7, 0.1, 0.05];
        let fitted = normalizer.fit(&raw).unwrap();
        assert_eq!(fitted.top_k, 2);
        assert_eq!(fitted.low, 0.8);
        assert_eq!(fitted.high, 0.9);

        let out: Vec<f64> = raw.iter().map(|s| fitted.apply(*s)).collect();
        assert!((out[0] - 1.0).abs() < 1e-12);
        assert_eq!(&out[1..], &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_order_independent() {
        let normalizer = ScoreNormalizer::new(0.5).unwrap();
        let a = normalizer.fit(&[0.1, 0.9, 0.05, 0.7, 0.8]).unwrap();
        let b = normalizer.fit(&[0.9, 0.8, 0.7, 0.1, 0.05]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_insufficient_data() {
        let normalizer = ScoreNormalizer::new(0.0005).unwrap();
        let raw = vec![0.5; 1999];
        assert!(matches!(
            normalizer.fit(&raw),
            Err(Error::InsufficientData { pairs: 1999, .. })
        ));
        assert!(matches!(normalizer.fit(&[]), Err(Error::InsufficientData { .. })));
    }

    #[test]
    fn test_degenerate() {
        let normalizer = ScoreNormalizer::new(0.5).unwrap();
        assert!(matches!(
            normalizer.fit(&[1.0, 1.0, 1.0, 0.2]),
            Err(Error::DegenerateNormalization { .. })
        ));
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(ScoreNormalizer::new(0.0).is_err());
        assert!(ScoreNormalizer::new(1.01).is_err());
        assert!(ScoreNormalizer::new(1.0).is_ok());
    }

    #[test]
    fn test_normalise_table() {
        let mut table = ScoreTable::new();
        table.set("aaa", "bbb", 0.9);
        table.set("aaa", "ccc", 0.5);
        table.set("bbb", "ccc", 0.7);
        table.set("aaa", "ddd", 0.1);
        let raw: Vec<f64> = table.values().collect();

        let (normalised, fitted) = ScoreNormalizer::new(0.5).unwrap().normalise(&table, &raw).unwrap();
        assert_eq!(fitted.low, 0.7);
        assert_eq!(normalised.len(), 4);
        assert_eq!(normalised.get("bbb", "aaa"), Some(1.0));
        assert_eq!(normalised.get("ccc", "bbb"), Some(0.0));
        assert_eq!(normalised.get("aaa", "ddd"), Some(0.0));
        for score in normalised.values() {
            assert!((0.0..=1.0).contains(&score));
        }
    }
}
