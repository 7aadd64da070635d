//! Explainability for rankings
//!
//! Output structures that explain a baseline ranking: how decisive the
//! leader's margin is, which dimension carries it, and where two candidates
//! actually differ.

use crate::rank::{RankedEntry, RankedList};
use glossa_core::Dimension;
use serde::Serialize;

/// Margin above which a per-dimension difference is called discriminating
pub const DISCRIMINATING_GAP: f64 = 30.0;

/// Qualitative strength of the leader's margin over the runner-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GapSignificance {
    /// 15 points or more
    Strong,
    /// 8 points or more
    Moderate,
    Weak,
}

impl GapSignificance {
    pub fn from_gap(gap: f64) -> Self {
        if gap >= 15.0 {
            GapSignificance::Strong
        } else if gap >= 8.0 {
            GapSignificance::Moderate
        } else {
            GapSignificance::Weak
        }
    }
}

/// Summary statistics for a ranking
#[derive(Debug, Clone, Serialize)]
pub struct RankingSummary {
    pub candidates_count: usize,
    pub leader: Option<String>,
    /// Average overall score across candidates
    pub avg_score: f64,
    /// Overall score of the leader
    pub best_score: f64,
    /// Leader minus runner-up; 0 with a single candidate
    pub gap: f64,
    pub significance: GapSignificance,
    /// Dimension that contributed most to the leader's score
    pub top_contributing_dimension: Option<Dimension>,
}

impl RankingSummary {
    /// Compute the summary of a ranked list
    pub fn compute(ranked: &RankedList) -> Self {
        let entries = ranked.entries();
        let Some(leader) = entries.first() else {
            return Self {
                candidates_count: 0,
                leader: None,
                avg_score: 0.0,
                best_score: 0.0,
                gap: 0.0,
                significance: GapSignificance::Weak,
                top_contributing_dimension: None,
            };
        };

        let avg_score = entries.iter().map(|e| e.overall).sum::<f64>() / entries.len() as f64;
        let gap = ranked.gap(1).unwrap_or(0.0);

        Self {
            candidates_count: entries.len(),
            leader: Some(leader.name.clone()),
            avg_score,
            best_score: leader.overall,
            gap,
            significance: GapSignificance::from_gap(gap),
            top_contributing_dimension: Some(leader.scores.strongest()),
        }
    }
}

/// Difference between two candidates on one dimension
#[derive(Debug, Clone, Serialize)]
pub struct DimensionDelta {
    pub dimension: Dimension,
    pub first: f64,
    pub second: f64,
    /// `first - second`
    pub gap: f64,
    /// |gap| exceeds [`DISCRIMINATING_GAP`]
    pub discriminating: bool,
}

/// Per-dimension comparison of two ranked candidates
#[derive(Debug, Clone, Serialize)]
pub struct DimensionContrast {
    pub first: String,
    pub second: String,
    pub deltas: Vec<DimensionDelta>,
}

impl DimensionContrast {
    pub fn between(first: &RankedEntry, second: &RankedEntry) -> Self {
        let deltas = Dimension::ALL
            .iter()
            .map(|dim| {
                let a = first.scores.get(*dim);
                let b = second.scores.get(*dim);
                let gap = a - b;
                DimensionDelta {
                    dimension: *dim,
                    first: a,
                    second: b,
                    gap,
                    discriminating: gap.abs() > DISCRIMINATING_GAP,
                }
            })
            .collect();

        Self {
            first: first.name.clone(),
            second: second.name.clone(),
            deltas,
        }
    }

    /// Dimensions on which the two candidates differ decisively
    pub fn discriminating(&self) -> impl Iterator<Item = &DimensionDelta> {
        self.deltas.iter().filter(|d| d.discriminating)
    }
}

/// Contrast the leader with every other candidate, in rank order
pub fn contrast(ranked: &RankedList) -> Vec<DimensionContrast> {
    let entries = ranked.entries();
    match entries.split_first() {
        Some((leader, rest)) => rest
            .iter()
            .map(|other| DimensionContrast::between(leader, other))
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::{CandidateResult, Ranker};
    use glossa_core::DimensionScores;

    fn result(name: &str, values: [f64; Dimension::COUNT]) -> CandidateResult {
        CandidateResult {
            name: name.to_string(),
            scores: DimensionScores::new(values),
        }
    }

    fn ranked() -> RankedList {
        Ranker::new().rank_results(&[
            result("Lead", [85.0, 93.0, 80.0, 70.0, 75.0, 70.0, 75.0, 70.0]),
            result("Rival", [40.0, 43.0, 30.0, 20.0, 70.0, 60.0, 35.0, 30.0]),
            result("Far", [0.0; Dimension::COUNT]),
        ])
    }

    #[test]
    fn test_gap_significance_bands() {
        assert_eq!(GapSignificance::from_gap(37.0), GapSignificance::Strong);
        assert_eq!(GapSignificance::from_gap(15.0), GapSignificance::Strong);
        assert_eq!(GapSignificance::from_gap(8.0), GapSignificance::Moderate);
        assert_eq!(GapSignificance::from_gap(7.99), GapSignificance::Weak);
    }

    #[test]
    fn test_ranking_summary() {
        let summary = RankingSummary::compute(&ranked());

        assert_eq!(summary.candidates_count, 3);
        assert_eq!(summary.leader.as_deref(), Some("Lead"));
        assert!((summary.best_score - 77.25).abs() < 1e-9);
        assert!((summary.gap - 36.25).abs() < 1e-9);
        assert_eq!(summary.significance, GapSignificance::Strong);
        assert_eq!(
            summary.top_contributing_dimension,
            Some(Dimension::StructuralFeatures)
        );
    }

    #[test]
    fn test_single_candidate_summary_has_zero_gap() {
        let ranked = Ranker::new().rank_results(&[result("Only", [50.0; Dimension::COUNT])]);
        let summary = RankingSummary::compute(&ranked);
        assert_eq!(summary.gap, 0.0);
        assert_eq!(summary.significance, GapSignificance::Weak);
    }

    #[test]
    fn test_contrast_flags_discriminating_dimensions() {
        let contrasts = contrast(&ranked());
        assert_eq!(contrasts.len(), 2);

        let rival = &contrasts[0];
        assert_eq!(rival.second, "Rival");
        let flagged: Vec<Dimension> = rival.discriminating().map(|d| d.dimension).collect();
        assert_eq!(
            flagged,
            vec![
                Dimension::VowelSystem,
                Dimension::StructuralFeatures,
                Dimension::CaseSystem,
                Dimension::Vocabulary,
                Dimension::ScholarlySupport,
                Dimension::ReligiousParallel,
            ]
        );
        let geographic = &rival.deltas[Dimension::Geographic.index()];
        assert!(!geographic.discriminating);
        assert_eq!(geographic.gap, 5.0);
    }

    #[test]
    fn test_summary_serialization() {
        let json = serde_json::to_value(RankingSummary::compute(&ranked())).unwrap();
        assert_eq!(json["significance"], "STRONG");
        assert_eq!(json["top_contributing_dimension"], "structural_features");
    }
}
