//! # Glossa Core
//!
//! Core library for the Glossa language-similarity engine.
//!
//! This crate provides the fundamental data structures:
//!
//! - [`TargetProfile`] / [`CandidateProfile`] - typed measurement bundles
//! - [`Panel`] - validated target plus candidates aligned to its key order
//! - [`Dimension`] / [`DimensionScores`] - the eight fixed comparison axes
//! - [`Error`] - configuration and statistical-degeneracy errors
//!
//! ## Example
//!
//! ```rust
//! use glossa_core::{CandidateProfile, ContextScores, Panel, PhonemeTable, TargetProfile};
//! use std::collections::BTreeMap;
//!
//! let target = TargetProfile {
//!     name: "Target".to_string(),
//!     phonemes: PhonemeTable::from([("a".to_string(), 100.0)]),
//!     features: BTreeMap::from([("agglutinative".to_string(), true)]),
//!     case_suffixes: vec!["-E".to_string()],
//!     vocabulary: vec!["KU-RO".to_string()],
//!     words: Vec::new(),
//! };
//!
//! let candidate = CandidateProfile::new("Family")
//!     .with_phonemes(PhonemeTable::from([("a".to_string(), 100.0)]))
//!     .with_features(BTreeMap::from([("agglutinative".to_string(), true)]))
//!     .with_cases(BTreeMap::from([("-E".to_string(), 80.0)]))
//!     .with_vocabulary(BTreeMap::new())
//!     .with_context(ContextScores::new(50.0, 50.0, 50.0, 50.0));
//!
//! let panel = Panel::build(target, &[candidate]).unwrap();
//! assert_eq!(panel.gaps().len(), 1); // KU-RO missing, scored as 0
//! ```

pub mod dimension;
pub mod error;
pub mod panel;
pub mod profile;

pub use dimension::{clamp_score, Category, Dimension, DimensionScores, MAX_SCORE, MIN_SCORE};
pub use error::{Error, Result};
pub use panel::{AlignedCandidate, DataGap, GapSide, Panel};
pub use profile::{CandidateProfile, ContextScores, PhonemeTable, Section, TargetProfile};
