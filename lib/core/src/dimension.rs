//! Fixed comparison dimensions and per-candidate dimension scores
//!
//! Every candidate in a run is scored on the same eight dimensions, so
//! overall scores are always comparable. Scores are stored densely in
//! [`Dimension::ALL`] order.

use crate::error::{Error, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Lower bound of every dimension score.
pub const MIN_SCORE: f64 = 0.0;
/// Upper bound of every dimension score.
pub const MAX_SCORE: f64 = 100.0;

/// Clamp a score into `[0, 100]`. NaN collapses to 0.
#[inline]
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        MIN_SCORE
    } else {
        value.clamp(MIN_SCORE, MAX_SCORE)
    }
}

/// One named axis of comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Phoneme-frequency divergence
    VowelSystem,
    /// Boolean typological feature overlap
    StructuralFeatures,
    /// Case/suffix similarity
    CaseSystem,
    /// Vocabulary match
    Vocabulary,
    Geographic,
    Timeline,
    ScholarlySupport,
    ReligiousParallel,
}

/// Grouping used by weighting experiments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Measured from the language data itself
    Linguistic,
    /// Geography, chronology, scholarship and religion
    Contextual,
}

impl Dimension {
    pub const COUNT: usize = 8;

    /// All dimensions in canonical order
    pub const ALL: [Dimension; Dimension::COUNT] = [
        Dimension::VowelSystem,
        Dimension::StructuralFeatures,
        Dimension::CaseSystem,
        Dimension::Vocabulary,
        Dimension::Geographic,
        Dimension::Timeline,
        Dimension::ScholarlySupport,
        Dimension::ReligiousParallel,
    ];

    /// Position in [`Dimension::ALL`]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Dimension::VowelSystem => "Vowel system",
            Dimension::StructuralFeatures => "Structural features",
            Dimension::CaseSystem => "Case system",
            Dimension::Vocabulary => "Vocabulary",
            Dimension::Geographic => "Geographic",
            Dimension::Timeline => "Timeline",
            Dimension::ScholarlySupport => "Scholarly support",
            Dimension::ReligiousParallel => "Religious parallel",
        }
    }

    /// Machine key, identical to the serde representation
    pub fn key(self) -> &'static str {
        match self {
            Dimension::VowelSystem => "vowel_system",
            Dimension::StructuralFeatures => "structural_features",
            Dimension::CaseSystem => "case_system",
            Dimension::Vocabulary => "vocabulary",
            Dimension::Geographic => "geographic",
            Dimension::Timeline => "timeline",
            Dimension::ScholarlySupport => "scholarly_support",
            Dimension::ReligiousParallel => "religious_parallel",
        }
    }

    pub fn category(self) -> Category {
        match self {
            Dimension::VowelSystem
            | Dimension::StructuralFeatures
            | Dimension::CaseSystem
            | Dimension::Vocabulary => Category::Linguistic,
            _ => Category::Contextual,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Dimension {
    type Err = Error;

    /// Accepts either the machine key or the label (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        Dimension::ALL
            .iter()
            .copied()
            .find(|d| d.key() == s || d.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::DimensionMismatch {
                expected: "one of the eight fixed dimension labels".to_string(),
                actual: s.to_string(),
            })
    }
}

/// Scores for one candidate, one value per [`Dimension`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimensionScores {
    values: [f64; Dimension::COUNT],
}

impl DimensionScores {
    /// Create from raw values in [`Dimension::ALL`] order, clamping each into `[0, 100]`
    pub fn new(values: [f64; Dimension::COUNT]) -> Self {
        Self {
            values: values.map(clamp_score),
        }
    }

    /// Build from a label-keyed map.
    ///
    /// The label set must be exactly the eight fixed dimensions; anything
    /// else makes overall scores incomparable and is rejected.
    ///
    /// For library callers that bring precomputed dimension scores. The
    /// analysis run always scores through a [`Panel`](crate::Panel) and
    /// never goes through this path.
    pub fn from_labeled(map: &BTreeMap<String, f64>) -> Result<Self> {
        let mut values = [f64::NAN; Dimension::COUNT];
        for (label, value) in map {
            let dim: Dimension = label.parse()?;
            if !values[dim.index()].is_nan() {
                return Err(Error::DimensionMismatch {
                    expected: "each dimension exactly once".to_string(),
                    actual: format!("duplicate label '{}'", label),
                });
            }
            values[dim.index()] = *value;
        }

        let missing: Vec<&str> = Dimension::ALL
            .iter()
            .filter(|d| values[d.index()].is_nan())
            .map(|d| d.key())
            .collect();
        if !missing.is_empty() {
            return Err(Error::DimensionMismatch {
                expected: format!("{} dimensions", Dimension::COUNT),
                actual: format!("missing {}", missing.join(", ")),
            });
        }

        Ok(Self::new(values))
    }

    #[inline]
    pub fn get(&self, dim: Dimension) -> f64 {
        self.values[dim.index()]
    }

    /// Raw values in [`Dimension::ALL`] order
    #[inline]
    pub fn values(&self) -> &[f64; Dimension::COUNT] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL.iter().map(move |d| (*d, self.values[d.index()]))
    }

    /// Unweighted arithmetic mean (the overall score)
    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / Dimension::COUNT as f64
    }

    /// Mean over every dimension except `excluded`
    pub fn mean_excluding(&self, excluded: Dimension) -> f64 {
        let sum: f64 = self
            .iter()
            .filter(|(d, _)| *d != excluded)
            .map(|(_, v)| v)
            .sum();
        sum / (Dimension::COUNT - 1) as f64
    }

    /// Weighted mean; returns 0 when the weights sum to zero
    pub fn weighted_mean(&self, weights: &[f64; Dimension::COUNT]) -> f64 {
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.values
            .iter()
            .zip(weights.iter())
            .map(|(v, w)| v * w)
            .sum::<f64>()
            / total
    }

    /// Dimension with the highest score (first wins on ties)
    pub fn strongest(&self) -> Dimension {
        let mut best = Dimension::ALL[0];
        for (dim, value) in self.iter() {
            if value > self.get(best) {
                best = dim;
            }
        }
        best
    }
}

impl Serialize for DimensionScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Dimension::COUNT))?;
        for (dim, value) in self.iter() {
            map.serialize_entry(dim.key(), &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, dim) in Dimension::ALL.iter().enumerate() {
            assert_eq!(dim.index(), i);
        }
    }

    #[test]
    fn test_parse_key_and_label() {
        assert_eq!("vowel_system".parse::<Dimension>().unwrap(), Dimension::VowelSystem);
        assert_eq!("Scholarly support".parse::<Dimension>().unwrap(), Dimension::ScholarlySupport);
        assert_eq!("case system".parse::<Dimension>().unwrap(), Dimension::CaseSystem);
        assert!("phonotactics".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_categories() {
        let linguistic = Dimension::ALL
            .iter()
            .filter(|d| d.category() == Category::Linguistic)
            .count();
        assert_eq!(linguistic, 4);
        assert_eq!(Dimension::Timeline.category(), Category::Contextual);
    }

    #[test]
    fn test_scores_are_clamped() {
        let scores = DimensionScores::new([120.0, -5.0, f64::NAN, 50.0, 50.0, 50.0, 50.0, 50.0]);
        assert_eq!(scores.get(Dimension::VowelSystem), 100.0);
        assert_eq!(scores.get(Dimension::StructuralFeatures), 0.0);
        assert_eq!(scores.get(Dimension::CaseSystem), 0.0);
    }

    #[test]
    fn test_mean_and_exclusion() {
        let scores = DimensionScores::new([80.0, 80.0, 80.0, 80.0, 80.0, 80.0, 80.0, 0.0]);
        assert!((scores.mean() - 70.0).abs() < 1e-12);
        assert!((scores.mean_excluding(Dimension::ReligiousParallel) - 80.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_mean() {
        let scores = DimensionScores::new([100.0, 100.0, 100.0, 100.0, 0.0, 0.0, 0.0, 0.0]);
        let linguistic_only = [1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0];
        assert!((scores.weighted_mean(&linguistic_only) - 100.0).abs() < 1e-12);
        assert_eq!(scores.weighted_mean(&[0.0; Dimension::COUNT]), 0.0);
    }

    #[test]
    fn test_from_labeled_requires_full_label_set() {
        let mut map: BTreeMap<String, f64> = Dimension::ALL
            .iter()
            .map(|d| (d.label().to_string(), 50.0))
            .collect();
        let scores = DimensionScores::from_labeled(&map).unwrap();
        assert_eq!(scores.mean(), 50.0);

        map.remove("Timeline");
        assert!(matches!(
            DimensionScores::from_labeled(&map),
            Err(Error::DimensionMismatch { .. })
        ));

        map.insert("timeline".to_string(), 10.0);
        map.insert("Timeline".to_string(), 10.0);
        assert!(DimensionScores::from_labeled(&map).is_err());
    }

    #[test]
    fn test_strongest_dimension() {
        let scores = DimensionScores::new([10.0, 90.0, 90.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(scores.strongest(), Dimension::StructuralFeatures);
    }

    #[test]
    fn test_serialize_as_keyed_map() {
        let scores = DimensionScores::new([1.0; Dimension::COUNT]);
        let json = serde_json::to_value(scores).unwrap();
        assert_eq!(json["vowel_system"], 1.0);
        assert_eq!(json.as_object().unwrap().len(), Dimension::COUNT);
    }
}
