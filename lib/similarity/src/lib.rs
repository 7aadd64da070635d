//! # Glossa Similarity
//!
//! Dimension scoring and candidate ranking.
//!
//! This crate turns a validated [`glossa_core::Panel`] into per-dimension
//! scores and a ranked list with explainable results.
//!
//! ## Features
//!
//! - **Dimension scorers**: phoneme divergence, feature overlap, case and vocabulary means
//! - **Ranking**: stable descending sort on the unweighted overall score
//! - **Weight schema**: explicit weights for weighting experiments
//! - **Explainability**: gap significance and per-dimension contrasts
//!
//! ## Example
//!
//! ```rust
//! use glossa_core::{CandidateProfile, ContextScores, Panel, PhonemeTable, TargetProfile};
//! use glossa_similarity::{Ranker, RankingSummary};
//! use std::collections::BTreeMap;
//!
//! let target = TargetProfile {
//!     name: "Target".to_string(),
//!     phonemes: PhonemeTable::from([("a".to_string(), 60.0), ("i".to_string(), 40.0)]),
//!     features: BTreeMap::from([("agglutinative".to_string(), true)]),
//!     case_suffixes: vec![],
//!     vocabulary: vec![],
//!     words: vec![],
//! };
//! let family = |name: &str, context: f64| {
//!     CandidateProfile::new(name)
//!         .with_phonemes(PhonemeTable::from([("a".to_string(), 55.0), ("i".to_string(), 45.0)]))
//!         .with_features(BTreeMap::from([("agglutinative".to_string(), true)]))
//!         .with_cases(BTreeMap::new())
//!         .with_vocabulary(BTreeMap::new())
//!         .with_context(ContextScores::new(context, context, context, context))
//! };
//!
//! let panel = Panel::build(target, &[family("Near", 80.0), family("Far", 20.0)]).unwrap();
//! let ranked = Ranker::new().rank(&panel);
//! assert_eq!(ranked.leader().unwrap().name, "Near");
//!
//! let summary = RankingSummary::compute(&ranked);
//! assert_eq!(summary.candidates_count, 2);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Panel     │────>│  Distance   │────>│  Candidate  │
//! │ (aligned)   │     │ (per dim)   │     │   Result    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!       ┌─────────────┐     ┌─────────────┐      │
//!       │   Schema    │────>│   Ranker    │<─────┘
//!       │  (weights)  │     │ (stable)    │
//!       └─────────────┘     └─────────────┘
//!                                  │
//!                           ┌─────────────┐
//!                           │  Explain    │
//!                           │  (summary)  │
//!                           └─────────────┘
//! ```

pub mod distance;
pub mod explain;
pub mod rank;
pub mod schema;

// Re-export main types for convenience
pub use distance::{
    bigram_similarity, bigrams, divergence_to_score, feature_overlap, jaccard, mean_score,
    phoneme_divergence, vowel_score, VOWEL_DIVERGENCE_SCALE,
};
pub use explain::{
    contrast, DimensionContrast, DimensionDelta, GapSignificance, RankingSummary,
    DISCRIMINATING_GAP,
};
pub use rank::{score_candidate, CandidateResult, RankedEntry, RankedList, Ranker};
pub use schema::{SchemaError, WeightSchema};
