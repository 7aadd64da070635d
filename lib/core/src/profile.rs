//! Language profiles
//!
//! A [`TargetProfile`] fixes the key sets (features, case suffixes,
//! vocabulary items) that every [`CandidateProfile`] is compared against.
//! Candidate sections are optional at the serde layer so that a missing
//! section can be reported as a configuration error instead of silently
//! scoring zero.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Phoneme symbol -> frequency percentage (values sum to roughly 100)
pub type PhonemeTable = BTreeMap<String, f64>;

/// The undeciphered system all candidates are compared against
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetProfile {
    pub name: String,

    /// Phoneme frequencies; the keys form the alphabet used for divergence
    pub phonemes: PhonemeTable,

    /// Fixed boolean feature vocabulary
    pub features: BTreeMap<String, bool>,

    /// Case/suffix labels in reporting order
    #[serde(default)]
    pub case_suffixes: Vec<String>,

    /// Default vocabulary comparison list
    #[serde(default)]
    pub vocabulary: Vec<String>,

    /// Transliterated attested words, used by the lexical chance control
    #[serde(default)]
    pub words: Vec<String>,
}

/// The four scalar contextual scores, each 0-100
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ContextScores {
    pub geographic: f64,
    pub timeline: f64,
    pub scholarly: f64,
    pub religious: f64,
}

impl ContextScores {
    pub fn new(geographic: f64, timeline: f64, scholarly: f64, religious: f64) -> Self {
        Self {
            geographic,
            timeline,
            scholarly,
            religious,
        }
    }

    pub(crate) fn fields(&self) -> [(&'static str, f64); 4] {
        [
            ("geographic", self.geographic),
            ("timeline", self.timeline),
            ("scholarly", self.scholarly),
            ("religious", self.religious),
        ]
    }
}

/// A known language family measured against the target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CandidateProfile {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonemes: Option<PhonemeTable>,

    /// Alternate or regional distributions; the best-matching one is used
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phoneme_variants: Vec<PhonemeTable>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<BTreeMap<String, bool>>,

    /// Suffix label -> similarity 0-100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_similarity: Option<BTreeMap<String, f64>>,

    /// Vocabulary item -> match score 0-100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary_matches: Option<BTreeMap<String, f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextScores>,
}

impl CandidateProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_phonemes(mut self, phonemes: PhonemeTable) -> Self {
        self.phonemes = Some(phonemes);
        self
    }

    pub fn with_variant(mut self, variant: PhonemeTable) -> Self {
        self.phoneme_variants.push(variant);
        self
    }

    pub fn with_features(mut self, features: BTreeMap<String, bool>) -> Self {
        self.features = Some(features);
        self
    }

    pub fn with_cases(mut self, cases: BTreeMap<String, f64>) -> Self {
        self.case_similarity = Some(cases);
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: BTreeMap<String, f64>) -> Self {
        self.vocabulary_matches = Some(vocabulary);
        self
    }

    pub fn with_context(mut self, context: ContextScores) -> Self {
        self.context = Some(context);
        self
    }
}

/// Top-level sections of a candidate profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Phonemes,
    Features,
    CaseSimilarity,
    VocabularyMatches,
    Context,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Phonemes => "phonemes",
            Section::Features => "features",
            Section::CaseSimilarity => "case_similarity",
            Section::VocabularyMatches => "vocabulary_matches",
            Section::Context => "context",
        };
        f.write_str(name)
    }
}
