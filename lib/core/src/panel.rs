//! Validation and normalization of profiles into a scoring panel
//!
//! This is the only place where missing keys are zero-filled. Scorers work
//! on the dense, target-aligned vectors of [`AlignedCandidate`] and never do
//! lookups with default fallbacks. Every zero-filled key is recorded as a
//! [`DataGap`] so systematic holes in the tables stay visible.

use crate::dimension::clamp_score;
use crate::error::{Error, Result};
use crate::profile::{CandidateProfile, ContextScores, PhonemeTable, Section, TargetProfile};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Which side of the comparison lacks the key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapSide {
    /// The target defines the key, the candidate does not (scored as 0/false)
    Candidate,
    /// The candidate defines a key the target does not use (ignored)
    Target,
}

/// A non-fatal data gap: one key present on one side only
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataGap {
    pub candidate: String,
    pub section: Section,
    pub key: String,
    pub missing_on: GapSide,
}

/// A candidate normalized against the target's key order
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedCandidate {
    pub name: String,
    pub phonemes: PhonemeTable,
    pub phoneme_variants: Vec<PhonemeTable>,
    /// Aligned with [`Panel::feature_names`]; `None` when the candidate lacks the feature
    pub features: Vec<Option<bool>>,
    /// Aligned with [`Panel::case_suffixes`]
    pub cases: Vec<f64>,
    /// Aligned with [`Panel::vocabulary`]
    pub vocabulary: Vec<f64>,
    pub context: ContextScores,
}

/// Validated target plus aligned candidates, in input order
#[derive(Debug, Clone)]
pub struct Panel {
    target: TargetProfile,
    feature_names: Vec<String>,
    target_features: Vec<bool>,
    vocabulary: Vec<String>,
    candidates: Vec<AlignedCandidate>,
    gaps: Vec<DataGap>,
}

impl Panel {
    /// Build a panel using the target's default vocabulary list
    pub fn build(target: TargetProfile, candidates: &[CandidateProfile]) -> Result<Self> {
        let vocabulary = target.vocabulary.clone();
        Self::build_with_vocabulary(target, candidates, vocabulary)
    }

    /// Build a panel scoring vocabulary over an explicit item list.
    ///
    /// The same list applies to every candidate, which is what keeps the
    /// vocabulary dimension fair between a curated and an expanded run.
    pub fn build_with_vocabulary(
        target: TargetProfile,
        candidates: &[CandidateProfile],
        vocabulary: Vec<String>,
    ) -> Result<Self> {
        if candidates.is_empty() {
            return Err(Error::NoCandidates);
        }
        check_table(&target.name, "phonemes", &target.phonemes)?;

        let feature_names: Vec<String> = target.features.keys().cloned().collect();
        let target_features: Vec<bool> = target.features.values().copied().collect();

        let mut seen = HashSet::new();
        let mut gaps = Vec::new();
        let mut aligned = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            if !seen.insert(candidate.name.as_str()) {
                return Err(Error::DuplicateCandidate(candidate.name.clone()));
            }
            aligned.push(align(
                candidate,
                &feature_names,
                &target.case_suffixes,
                &vocabulary,
                &mut gaps,
            )?);
        }

        if !gaps.is_empty() {
            let zero_filled = gaps
                .iter()
                .filter(|g| g.missing_on == GapSide::Candidate)
                .count();
            warn!(
                gaps = gaps.len(),
                zero_filled,
                "profile keys missing on one side of the comparison"
            );
        }

        debug!(
            target = %target.name,
            candidates = aligned.len(),
            features = feature_names.len(),
            suffixes = target.case_suffixes.len(),
            vocabulary = vocabulary.len(),
            "panel built"
        );

        Ok(Self {
            target,
            feature_names,
            target_features,
            vocabulary,
            candidates: aligned,
            gaps,
        })
    }

    pub fn target(&self) -> &TargetProfile {
        &self.target
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Target feature values aligned with [`Panel::feature_names`]
    pub fn target_features(&self) -> &[bool] {
        &self.target_features
    }

    pub fn case_suffixes(&self) -> &[String] {
        &self.target.case_suffixes
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn candidates(&self) -> &[AlignedCandidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Index of a candidate in input order
    pub fn position(&self, name: &str) -> Result<usize> {
        self.candidates
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| Error::CandidateNotFound(name.to_string()))
    }

    pub fn candidate(&self, name: &str) -> Result<&AlignedCandidate> {
        self.position(name).map(|i| &self.candidates[i])
    }

    /// Every zero-filled or ignored key, in discovery order
    pub fn gaps(&self) -> &[DataGap] {
        &self.gaps
    }
}

fn align(
    candidate: &CandidateProfile,
    feature_names: &[String],
    case_suffixes: &[String],
    vocabulary: &[String],
    gaps: &mut Vec<DataGap>,
) -> Result<AlignedCandidate> {
    let name = candidate.name.as_str();
    let missing = |section| Error::MissingSection {
        candidate: name.to_string(),
        section,
    };

    let phonemes = candidate.phonemes.as_ref().ok_or_else(|| missing(Section::Phonemes))?;
    let features = candidate.features.as_ref().ok_or_else(|| missing(Section::Features))?;
    let cases = candidate
        .case_similarity
        .as_ref()
        .ok_or_else(|| missing(Section::CaseSimilarity))?;
    let vocab = candidate
        .vocabulary_matches
        .as_ref()
        .ok_or_else(|| missing(Section::VocabularyMatches))?;
    let context = candidate.context.ok_or_else(|| missing(Section::Context))?;

    check_table(name, "phonemes", phonemes)?;
    for variant in &candidate.phoneme_variants {
        check_table(name, "phoneme_variants", variant)?;
    }
    for (field, value) in context.fields() {
        check_finite(name, field, value)?;
    }

    let mut record = |section: Section, key: &str, missing_on: GapSide| {
        debug!(candidate = name, %section, key, ?missing_on, "data gap");
        gaps.push(DataGap {
            candidate: name.to_string(),
            section,
            key: key.to_string(),
            missing_on,
        });
    };

    let aligned_features: Vec<Option<bool>> = feature_names
        .iter()
        .map(|feature| {
            let value = features.get(feature).copied();
            if value.is_none() {
                record(Section::Features, feature.as_str(), GapSide::Candidate);
            }
            value
        })
        .collect();
    for key in features.keys().filter(|k| !feature_names.contains(k)) {
        record(Section::Features, key.as_str(), GapSide::Target);
    }

    let aligned_cases = align_scores(name, Section::CaseSimilarity, case_suffixes, cases, &mut record)?;
    let aligned_vocab = align_scores(name, Section::VocabularyMatches, vocabulary, vocab, &mut record)?;

    let context = ContextScores::new(
        clamp_score(context.geographic),
        clamp_score(context.timeline),
        clamp_score(context.scholarly),
        clamp_score(context.religious),
    );

    Ok(AlignedCandidate {
        name: name.to_string(),
        phonemes: phonemes.clone(),
        phoneme_variants: candidate.phoneme_variants.clone(),
        features: aligned_features,
        cases: aligned_cases,
        vocabulary: aligned_vocab,
        context,
    })
}

fn align_scores(
    owner: &str,
    section: Section,
    keys: &[String],
    values: &BTreeMap<String, f64>,
    record: &mut impl FnMut(Section, &str, GapSide),
) -> Result<Vec<f64>> {
    let mut aligned = Vec::with_capacity(keys.len());
    for key in keys {
        match values.get(key) {
            Some(value) => {
                check_finite(owner, key, *value)?;
                aligned.push(clamp_score(*value));
            }
            None => {
                record(section, key.as_str(), GapSide::Candidate);
                aligned.push(0.0);
            }
        }
    }
    for key in values.keys().filter(|k| !keys.contains(k)) {
        record(section, key.as_str(), GapSide::Target);
    }
    Ok(aligned)
}

fn check_table(owner: &str, field: &str, table: &PhonemeTable) -> Result<()> {
    for (symbol, value) in table {
        if !value.is_finite() || *value < 0.0 {
            return Err(Error::InvalidValue {
                owner: owner.to_string(),
                field: format!("{}.{}", field, symbol),
                value: *value,
            });
        }
    }
    Ok(())
}

fn check_finite(owner: &str, field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidValue {
            owner: owner.to_string(),
            field: field.to_string(),
            value,
        })
    }
}
