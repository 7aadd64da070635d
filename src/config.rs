//! Run configuration
//!
//! An [`AnalysisConfig`] holds everything one analysis run consumes: the
//! target, the ordered candidates, the optional inputs of the supplementary
//! checks, and the numeric [`RunParams`]. Every numeric parameter has a
//! serde default, so a config file only needs the profiles.

use anyhow::Context;
use glossa_core::{CandidateProfile, TargetProfile};
use glossa_validation::{
    DomainEvidence, EvidenceDomain, WeightScenario, DEFAULT_BOOTSTRAP_TRIALS, DEFAULT_MAX_RATIO,
    DEFAULT_MIN_RATIO, DEFAULT_PERTURBATION_TRIALS, DEFAULT_PRIOR, DEFAULT_PSEUDO_LEXICONS,
    DEFAULT_RATES,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub target: TargetProfile,

    /// Candidates in input order; ties in the ranking keep this order
    pub candidates: Vec<CandidateProfile>,

    /// Vocabulary list applied to every candidate instead of the target's default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<Vec<String>>,

    /// Longer item list scored for every candidate and compared with the curated run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded_vocabulary: Option<Vec<VocabularyItem>>,

    /// Lexical chance control; skipped when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chance: Option<ChanceConfig>,

    #[serde(default)]
    pub evidence: EvidenceConfig,

    /// Known unrelated language ranked alongside the candidates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_control: Option<CandidateProfile>,

    #[serde(default = "WeightScenario::defaults")]
    pub weight_scenarios: Vec<WeightScenario>,

    #[serde(default)]
    pub params: RunParams,
}

impl AnalysisConfig {
    /// Minimal config with default parameters
    pub fn new(target: TargetProfile, candidates: Vec<CandidateProfile>) -> Self {
        Self {
            target,
            candidates,
            vocabulary: None,
            expanded_vocabulary: None,
            chance: None,
            evidence: EvidenceConfig::default(),
            negative_control: None,
            weight_scenarios: WeightScenario::defaults(),
            params: RunParams::default(),
        }
    }

    /// Load a JSON config file
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }
}

/// One expanded-vocabulary item with its match score per candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,
    /// Candidate name to 0-100 match score; absent candidates score 0
    pub scores: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChanceConfig {
    /// Reference lexicon of the leading family
    pub reference_words: Vec<String>,

    /// Onset inventory; include "" for vowel-only syllables
    pub consonants: Vec<String>,

    /// Words to test; defaults to the target's word list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_words: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvidenceConfig {
    /// Domains with precomputed scores and likelihood ratios
    #[serde(default)]
    pub domains: Vec<EvidenceDomain>,

    /// Domains summarized from individual evidence items
    #[serde(default)]
    pub itemized: Vec<DomainEvidence>,
}

impl EvidenceConfig {
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty() && self.itemized.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunParams {
    /// Master seed; each randomized engine derives its own stream from it
    pub seed: u64,
    pub bootstrap_trials: usize,
    pub perturbation_trials: usize,
    pub corruption_rates: Vec<f64>,
    pub pseudo_lexicons: usize,
    pub prior: f64,
    pub min_ratio: f64,
    pub max_ratio: f64,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            seed: 42,
            bootstrap_trials: DEFAULT_BOOTSTRAP_TRIALS,
            perturbation_trials: DEFAULT_PERTURBATION_TRIALS,
            corruption_rates: DEFAULT_RATES.to_vec(),
            pseudo_lexicons: DEFAULT_PSEUDO_LEXICONS,
            prior: DEFAULT_PRIOR,
            min_ratio: DEFAULT_MIN_RATIO,
            max_ratio: DEFAULT_MAX_RATIO,
        }
    }
}
