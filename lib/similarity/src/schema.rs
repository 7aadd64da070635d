//! Dimension weight schema
//!
//! The default overall score is an unweighted mean. Weighting is left to
//! explicit experiments (e.g. down-weighting contextual dimensions), which
//! describe their weights with a [`WeightSchema`].

use glossa_core::{Category, Dimension};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight schema version 1
///
/// Dimensions missing from `weights` carry zero weight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightSchema {
    /// Schema version for future compatibility
    #[serde(default = "default_version")]
    pub version: u32,

    /// Weight per dimension
    pub weights: BTreeMap<Dimension, f64>,
}

fn default_version() -> u32 {
    1
}

impl WeightSchema {
    /// Create a new weight schema with the given weights
    pub fn new(weights: BTreeMap<Dimension, f64>) -> Self {
        Self { version: 1, weights }
    }

    /// Every dimension at weight 1.0
    pub fn uniform() -> Self {
        Self::new(Dimension::ALL.iter().map(|d| (*d, 1.0)).collect())
    }

    /// One weight for linguistic dimensions, another for contextual ones
    pub fn by_category(linguistic: f64, contextual: f64) -> Self {
        Self::new(
            Dimension::ALL
                .iter()
                .map(|d| {
                    let w = match d.category() {
                        Category::Linguistic => linguistic,
                        Category::Contextual => contextual,
                    };
                    (*d, w)
                })
                .collect(),
        )
    }

    /// Validate the schema
    /// - Checks that weights are finite and non-negative
    /// - Normalizes weights to sum to 1.0 if they don't
    pub fn validate_and_normalize(&mut self) -> Result<(), SchemaError> {
        if self.weights.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        for (dim, weight) in &self.weights {
            if !weight.is_finite() {
                return Err(SchemaError::NonFiniteWeight(*dim));
            }
            if *weight < 0.0 {
                return Err(SchemaError::NegativeWeight(*dim));
            }
        }

        let weight_sum: f64 = self.weights.values().sum();
        if weight_sum <= 0.0 {
            return Err(SchemaError::ZeroTotalWeight);
        }

        if (weight_sum - 1.0).abs() > 1e-9 {
            for weight in self.weights.values_mut() {
                *weight /= weight_sum;
            }
        }

        Ok(())
    }

    /// Weight of a dimension (0.0 if absent)
    pub fn weight(&self, dim: Dimension) -> f64 {
        self.weights.get(&dim).copied().unwrap_or(0.0)
    }

    /// Weights in [`Dimension::ALL`] order
    pub fn as_array(&self) -> [f64; Dimension::COUNT] {
        Dimension::ALL.map(|d| self.weight(d))
    }
}

/// Errors that can occur during schema validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema cannot be empty")]
    EmptySchema,

    #[error("Dimension '{0}' has negative weight")]
    NegativeWeight(Dimension),

    #[error("Dimension '{0}' has a non-finite weight")]
    NonFiniteWeight(Dimension),

    #[error("Total weight cannot be zero")]
    ZeroTotalWeight,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_schema() {
        let schema = WeightSchema::uniform();
        assert_eq!(schema.version, 1);
        assert_eq!(schema.weights.len(), Dimension::COUNT);
        assert_eq!(schema.as_array(), [1.0; Dimension::COUNT]);
    }

    #[test]
    fn test_schema_normalization() {
        let mut schema = WeightSchema::by_category(2.0, 2.0);
        schema.validate_and_normalize().unwrap();

        let weight_sum: f64 = schema.weights.values().sum();
        assert!((weight_sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_by_category() {
        let schema = WeightSchema::by_category(1.0, 0.25);
        assert_eq!(schema.weight(Dimension::Vocabulary), 1.0);
        assert_eq!(schema.weight(Dimension::Geographic), 0.25);
    }

    #[test]
    fn test_empty_schema_error() {
        let mut schema = WeightSchema::new(BTreeMap::new());
        assert!(matches!(
            schema.validate_and_normalize(),
            Err(SchemaError::EmptySchema)
        ));
    }

    #[test]
    fn test_negative_weight_error() {
        let mut schema = WeightSchema::new(BTreeMap::from([(Dimension::Timeline, -0.5)]));
        assert_eq!(
            schema.validate_and_normalize(),
            Err(SchemaError::NegativeWeight(Dimension::Timeline))
        );
    }

    #[test]
    fn test_zero_total_weight_error() {
        let mut schema = WeightSchema::by_category(0.0, 0.0);
        assert_eq!(schema.validate_and_normalize(), Err(SchemaError::ZeroTotalWeight));
    }

    #[test]
    fn test_missing_dimension_has_zero_weight() {
        let schema = WeightSchema::new(BTreeMap::from([(Dimension::VowelSystem, 1.0)]));
        assert_eq!(schema.weight(Dimension::Timeline), 0.0);
    }

    #[test]
    fn test_serde_roundtrip() {
        let schema = WeightSchema::by_category(1.0, 0.5);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("\"geographic\":0.5"));
        let parsed: WeightSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, parsed);
    }
}
