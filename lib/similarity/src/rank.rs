//! Candidate scoring and ranking
//!
//! Scores every candidate of a [`Panel`] on all eight dimensions and orders
//! them by overall score, with per-dimension breakdowns kept for
//! explanation.

use crate::distance::{feature_overlap, mean_score, vowel_score};
use crate::schema::{SchemaError, WeightSchema};
use glossa_core::{
    clamp_score, AlignedCandidate, CandidateProfile, Dimension, DimensionScores, Panel, Result,
    TargetProfile,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Dimension scores for one candidate
///
/// The overall score is derived on demand and never stored, so any engine
/// that edits the scores sees a consistent overall.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateResult {
    pub name: String,
    pub scores: DimensionScores,
}

impl CandidateResult {
    /// Unweighted mean of all dimension scores
    pub fn overall(&self) -> f64 {
        self.scores.mean()
    }
}

/// Score one aligned candidate against the panel's target
pub fn score_candidate(panel: &Panel, candidate: &AlignedCandidate) -> CandidateResult {
    let context = candidate.context;
    let scores = DimensionScores::new([
        vowel_score(
            &panel.target().phonemes,
            &candidate.phonemes,
            &candidate.phoneme_variants,
        ),
        feature_overlap(panel.target_features(), &candidate.features),
        mean_score(&candidate.cases),
        mean_score(&candidate.vocabulary),
        clamp_score(context.geographic),
        clamp_score(context.timeline),
        clamp_score(context.scholarly),
        clamp_score(context.religious),
    ]);

    CandidateResult {
        name: candidate.name.clone(),
        scores,
    }
}

/// One row of a ranking
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry {
    /// 1-based rank
    pub rank: usize,
    pub name: String,
    /// Overall score under the ranker that produced this list
    pub overall: f64,
    pub scores: DimensionScores,
}

/// Candidates ordered by overall score, descending; ties keep input order
#[derive(Debug, Clone, Serialize)]
pub struct RankedList {
    entries: Vec<RankedEntry>,
}

impl RankedList {
    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-ranked entry
    pub fn leader(&self) -> Option<&RankedEntry> {
        self.entries.first()
    }

    pub fn get(&self, name: &str) -> Option<&RankedEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Margin between the leader and the entry at 0-based position `k`
    pub fn gap(&self, k: usize) -> Option<f64> {
        let first = self.entries.first()?;
        let other = self.entries.get(k)?;
        Some(first.overall - other.overall)
    }
}

/// Ranker that computes overall scores and orders candidates
///
/// Unweighted by default; weighting experiments build a ranker from a
/// [`WeightSchema`].
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    schema: Option<WeightSchema>,
}

impl Ranker {
    /// Create an unweighted ranker
    pub fn new() -> Self {
        Self { schema: None }
    }

    /// Create a ranker with explicit dimension weights
    pub fn weighted(mut schema: WeightSchema) -> std::result::Result<Self, SchemaError> {
        schema.validate_and_normalize()?;
        Ok(Self {
            schema: Some(schema),
        })
    }

    /// Get a reference to the weight schema, if any
    pub fn schema(&self) -> Option<&WeightSchema> {
        self.schema.as_ref()
    }

    /// Overall score for a set of dimension scores
    pub fn overall(&self, scores: &DimensionScores) -> f64 {
        match &self.schema {
            Some(schema) => scores.weighted_mean(&schema.as_array()),
            None => scores.mean(),
        }
    }

    /// Score every candidate, in input order
    pub fn score_all(&self, panel: &Panel) -> Vec<CandidateResult> {
        panel
            .candidates()
            .iter()
            .map(|candidate| score_candidate(panel, candidate))
            .collect()
    }

    /// Score and rank every candidate of the panel
    pub fn rank(&self, panel: &Panel) -> RankedList {
        self.rank_results(&self.score_all(panel))
    }

    /// Validate raw profiles, then score and rank them
    pub fn rank_profiles(
        &self,
        target: TargetProfile,
        candidates: &[CandidateProfile],
    ) -> Result<RankedList> {
        let panel = Panel::build(target, candidates)?;
        Ok(self.rank(&panel))
    }

    /// Rank already-computed results
    pub fn rank_results(&self, results: &[CandidateResult]) -> RankedList {
        let mut entries: Vec<RankedEntry> = results
            .iter()
            .map(|result| RankedEntry {
                rank: 0,
                name: result.name.clone(),
                overall: self.overall(&result.scores),
                scores: result.scores,
            })
            .collect();

        // Sort by score descending; stable, so ties keep input order
        entries.sort_by(|a, b| {
            b.overall
                .partial_cmp(&a.overall)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rank = i + 1;
        }

        if let Some(leader) = entries.first() {
            debug!(
                leader = %leader.name,
                score = leader.overall,
                candidates = entries.len(),
                weighted = self.schema.is_some(),
                "ranking complete"
            );
        }

        RankedList { entries }
    }

    /// Create a new ranker with custom weight overrides
    ///
    /// Overrides replace the current weights for specific dimensions; the
    /// rest keep their current weight (1.0 for an unweighted ranker).
    /// Weights are re-normalized afterwards.
    ///
    /// # Example
    /// ```
    /// use glossa_core::Dimension;
    /// use glossa_similarity::Ranker;
    /// use std::collections::BTreeMap;
    ///
    /// let ranker = Ranker::new();
    /// let linguistic_heavy = ranker
    ///     .with_weights(&BTreeMap::from([(Dimension::Geographic, 0.0)]))
    ///     .unwrap();
    /// assert_eq!(linguistic_heavy.schema().unwrap().weight(Dimension::Geographic), 0.0);
    /// ```
    pub fn with_weights(
        &self,
        overrides: &BTreeMap<Dimension, f64>,
    ) -> std::result::Result<Ranker, SchemaError> {
        let mut schema = self.schema.clone().unwrap_or_else(WeightSchema::uniform);
        for (dim, weight) in overrides {
            schema.weights.insert(*dim, *weight);
        }
        Ranker::weighted(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glossa_core::{ContextScores, PhonemeTable};

    fn target() -> TargetProfile {
        TargetProfile {
            name: "Target".to_string(),
            phonemes: PhonemeTable::from([("a".to_string(), 60.0), ("i".to_string(), 40.0)]),
            features: BTreeMap::from([
                ("agglutinative".to_string(), true),
                ("ergative".to_string(), true),
            ]),
            case_suffixes: vec!["-E".to_string(), "-NA".to_string()],
            vocabulary: vec!["KU-RO".to_string(), "A-TA-I".to_string()],
            words: Vec::new(),
        }
    }

    fn candidate(name: &str, feature: bool, case: f64, vocab: f64, context: f64) -> CandidateProfile {
        CandidateProfile::new(name)
            .with_phonemes(PhonemeTable::from([("a".to_string(), 60.0), ("i".to_string(), 40.0)]))
            .with_features(BTreeMap::from([
                ("agglutinative".to_string(), true),
                ("ergative".to_string(), feature),
            ]))
            .with_cases(BTreeMap::from([("-E".to_string(), case), ("-NA".to_string(), case)]))
            .with_vocabulary(BTreeMap::from([
                ("KU-RO".to_string(), vocab),
                ("A-TA-I".to_string(), vocab),
            ]))
            .with_context(ContextScores::new(context, context, context, context))
    }

    fn panel(candidates: &[CandidateProfile]) -> Panel {
        Panel::build(target(), candidates).unwrap()
    }

    #[test]
    fn test_perfect_candidate_scores_100() {
        let panel = panel(&[candidate("Perfect", true, 100.0, 100.0, 100.0)]);
        let result = score_candidate(&panel, &panel.candidates()[0]);

        assert_eq!(result.overall(), 100.0);
        for (_, value) in result.scores.iter() {
            assert_eq!(value, 100.0);
        }
    }

    #[test]
    fn test_dimension_breakdown() {
        let panel = panel(&[candidate("Half", false, 50.0, 20.0, 40.0)]);
        let result = score_candidate(&panel, &panel.candidates()[0]);

        assert_eq!(result.scores.get(Dimension::VowelSystem), 100.0);
        assert_eq!(result.scores.get(Dimension::StructuralFeatures), 50.0);
        assert_eq!(result.scores.get(Dimension::CaseSystem), 50.0);
        assert_eq!(result.scores.get(Dimension::Vocabulary), 20.0);
        assert_eq!(result.scores.get(Dimension::Timeline), 40.0);
    }

    #[test]
    fn test_rank_sorting() {
        let panel = panel(&[
            candidate("Low", false, 10.0, 10.0, 10.0),
            candidate("High", true, 90.0, 90.0, 90.0),
            candidate("Mid", true, 50.0, 50.0, 50.0),
        ]);
        let ranked = Ranker::new().rank(&panel);

        let names: Vec<&str> = ranked.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["High", "Mid", "Low"]);
        assert_eq!(ranked.leader().unwrap().rank, 1);
        assert_eq!(ranked.get("Low").unwrap().rank, 3);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let panel = panel(&[
            candidate("First", true, 50.0, 50.0, 50.0),
            candidate("Second", true, 50.0, 50.0, 50.0),
        ]);
        let ranked = Ranker::new().rank(&panel);
        assert_eq!(ranked.entries()[0].name, "First");
        assert_eq!(ranked.gap(1), Some(0.0));
    }

    #[test]
    fn test_gap() {
        let panel = panel(&[
            candidate("A", true, 100.0, 100.0, 100.0),
            candidate("B", true, 60.0, 60.0, 60.0),
        ]);
        let ranked = Ranker::new().rank(&panel);
        let b = ranked.get("B").unwrap().overall;

        assert_eq!(ranked.gap(0), Some(0.0));
        assert!((ranked.gap(1).unwrap() - (100.0 - b)).abs() < 1e-12);
        assert_eq!(ranked.gap(5), None);
    }

    #[test]
    fn test_rank_profiles_propagates_configuration_errors() {
        let mut broken = candidate("Broken", true, 50.0, 50.0, 50.0);
        broken.context = None;
        assert!(Ranker::new().rank_profiles(target(), &[broken]).is_err());
    }

    #[test]
    fn test_with_weights_override() {
        let ranker = Ranker::new();
        let modified = ranker
            .with_weights(&BTreeMap::from([(Dimension::Timeline, 9.0)]))
            .unwrap();

        let schema = modified.schema().unwrap();
        assert!(schema.weight(Dimension::Timeline) > schema.weight(Dimension::Geographic));
        let total: f64 = schema.weights.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_with_weights_rejects_negative() {
        let result = Ranker::new().with_weights(&BTreeMap::from([(Dimension::Timeline, -1.0)]));
        assert_eq!(result.unwrap_err(), SchemaError::NegativeWeight(Dimension::Timeline));
    }

    #[test]
    fn test_with_weights_affects_ranking() {
        // "Context" wins on contextual dimensions only, "Lexicon" on linguistic ones
        let panel = panel(&[
            candidate("Context", false, 20.0, 20.0, 100.0),
            candidate("Lexicon", true, 80.0, 80.0, 30.0),
        ]);

        let unweighted = Ranker::new().rank(&panel);
        assert_eq!(unweighted.leader().unwrap().name, "Context");

        let linguistic_only = Ranker::weighted(WeightSchema::by_category(1.0, 0.0)).unwrap();
        let ranked = linguistic_only.rank(&panel);
        assert_eq!(ranked.leader().unwrap().name, "Lexicon");
    }
}
