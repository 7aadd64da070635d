//! # Glossa Validation
//!
//! Trustworthiness checks for a baseline ranking. Each engine re-uses the
//! scorer independently and never mutates the input tables.
//!
//! - [`AblationEngine`] - leave-one-dimension-out re-ranking
//! - [`BootstrapEngine`] - dimension resampling with shared draws
//! - [`PerturbationEngine`] - feature flips and score noise at increasing rates
//! - [`ChanceControlEngine`] - pseudo-lexicon null distribution for word resemblance
//! - [`BayesianConvergenceEngine`] - sequential odds update across evidence domains
//! - [`WeightSensitivity`] - re-ranking with contextual dimensions down-weighted
//! - [`check_control`] - negative-control bias check
//! - [`compare_vocabulary`] - curated vs expanded vocabulary re-ranking
//!
//! Randomized engines take an explicit `&mut impl Rng`, so a seeded
//! generator reproduces a run exactly:
//!
//! ```rust
//! use glossa_core::{Dimension, DimensionScores};
//! use glossa_similarity::CandidateResult;
//! use glossa_validation::BootstrapEngine;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let results = vec![
//!     CandidateResult { name: "A".into(), scores: DimensionScores::new([80.0; Dimension::COUNT]) },
//!     CandidateResult { name: "B".into(), scores: DimensionScores::new([40.0; Dimension::COUNT]) },
//! ];
//! let engine = BootstrapEngine::new(100);
//! let first = engine.run(&results, &mut StdRng::seed_from_u64(7)).unwrap();
//! let second = engine.run(&results, &mut StdRng::seed_from_u64(7)).unwrap();
//! assert_eq!(first.leader_win_probability, second.leader_win_probability);
//! ```

pub mod ablation;
pub mod bayes;
pub mod bootstrap;
pub mod chance;
pub mod control;
pub mod perturbation;
pub mod sensitivity;
pub mod stats;
pub mod vocabulary;

pub use ablation::{AblationEngine, AblationReport, AblationRow, AblationVerdict, Impact};
pub use bayes::{
    BayesianConvergenceEngine, BayesianReport, Direction, DomainEvidence, EvidenceDomain,
    EvidenceItem, OverlapWarning, PosteriorStep, PosteriorVerdict, DEFAULT_MAX_RATIO,
    DEFAULT_MIN_RATIO, DEFAULT_PRIOR, INDEPENDENCE_CAVEAT,
};
pub use bootstrap::{
    BootstrapEngine, BootstrapReport, BootstrapSample, BootstrapSignificance, CandidateBootstrap,
    DEFAULT_BOOTSTRAP_TRIALS,
};
pub use chance::{
    lexical_similarity, ChanceControlEngine, ChanceControlReport, ChanceVerdict,
    PseudoWordGenerator, CHANCE_CAVEAT, DEFAULT_PSEUDO_LEXICONS,
};
pub use control::{
    bootstrap_control, check_control, ControlBootstrap, ControlOutcome, NegativeControlReport,
};
pub use perturbation::{
    Confidence, PerturbationEngine, PerturbationReport, RateOutcome, RobustnessVerdict,
    DEFAULT_PERTURBATION_TRIALS, DEFAULT_RATES,
};
pub use sensitivity::{ScenarioOutcome, SensitivityReport, WeightScenario, WeightSensitivity};
pub use stats::Spread;
pub use vocabulary::{compare_vocabulary, VocabularyComparison, VocabularyShift};
