//! # Glossa
//!
//! Multi-dimensional similarity scoring between an undeciphered target
//! profile and candidate language families, with checks on how far the
//! resulting ranking can be trusted.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! glossa analysis.json --seed 7 --pretty --output report.json
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use glossa::prelude::*;
//!
//! let mut config = AnalysisConfig::from_path("analysis.json").unwrap();
//! config.params.bootstrap_trials = 2_000;
//!
//! let report = run_analysis(&config).unwrap();
//! println!("leader: {:?}", report.summary.leader);
//! println!("ablation: {:?}", report.ablation.verdict);
//! ```
//!
//! ## Crate Structure
//!
//! - [`glossa-core`](https://docs.rs/glossa-core) - Profiles, dimensions, input validation and normalization
//! - [`glossa-similarity`](https://docs.rs/glossa-similarity) - Dimension scorers, ranking, explanations
//! - [`glossa-validation`](https://docs.rs/glossa-validation) - Ablation, bootstrap, perturbation, chance control, Bayesian convergence
//!
//! ## Checks
//!
//! - **Ablation**: does the leader survive dropping any one dimension?
//! - **Bootstrap**: how often does it win when dimensions are resampled?
//! - **Perturbation**: does it survive corrupted readings at 10-30%?
//! - **Chance control**: is word resemblance above what random syllables reach?
//! - **Weight sensitivity**: does it depend on the contextual dimensions?
//! - **Negative control**: does a known unrelated language stay low?
//! - **Convergence**: what do independent evidence domains add up to?

pub mod config;
pub mod pipeline;

pub use config::{AnalysisConfig, ChanceConfig, EvidenceConfig, RunParams, VocabularyItem};
pub use pipeline::{build_panel, run_analysis, AnalysisReport};

// Re-export core types
pub use glossa_core::{
    CandidateProfile, ContextScores, DataGap, Dimension, DimensionScores, Error, Panel,
    PhonemeTable, Result, TargetProfile,
};

// Re-export scoring
pub use glossa_similarity::{CandidateResult, RankedList, Ranker, RankingSummary, WeightSchema};

// Re-export validation engines
pub use glossa_validation::{
    AblationEngine, BayesianConvergenceEngine, BootstrapEngine, ChanceControlEngine,
    EvidenceDomain, PerturbationEngine, PseudoWordGenerator, WeightSensitivity,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        build_panel, run_analysis, AblationEngine, AnalysisConfig, AnalysisReport,
        BayesianConvergenceEngine, BootstrapEngine, CandidateProfile, CandidateResult,
        ChanceControlEngine, ContextScores, Dimension, DimensionScores, Error, EvidenceDomain,
        Panel, PerturbationEngine, PhonemeTable, PseudoWordGenerator, RankedList, Ranker, Result,
        RunParams, TargetProfile, WeightSensitivity,
    };
}
