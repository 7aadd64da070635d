//! Leave-one-dimension-out ablation
//!
//! Each dimension is dropped in turn for every candidate, the panel is
//! re-ranked on the remaining seven, and the focus candidate's new score and
//! position are recorded. A result carried by a single dimension shows up as
//! a lost lead.

use crate::stats::leader_index;
use glossa_core::{Dimension, Error, Result};
use glossa_similarity::CandidateResult;
use serde::Serialize;
use tracing::{debug, info};

/// How much dropping a dimension moves the focus candidate's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Impact {
    /// |delta| > 5 points
    Critical,
    /// |delta| > 2 points
    Moderate,
    Minor,
}

impl Impact {
    pub fn from_delta(delta: f64) -> Self {
        let magnitude = delta.abs();
        if magnitude > 5.0 {
            Impact::Critical
        } else if magnitude > 2.0 {
            Impact::Moderate
        } else {
            Impact::Minor
        }
    }
}

/// Outcome of dropping one dimension
#[derive(Debug, Clone, Serialize)]
pub struct AblationRow {
    pub dimension: Dimension,
    /// Focus candidate's mean over the remaining dimensions
    pub score: f64,
    /// `score - full_score`
    pub delta: f64,
    pub impact: Impact,
    pub still_leading: bool,
    /// Leader after the drop
    pub leader: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AblationVerdict {
    /// The lead survives every exclusion
    Robust,
    /// Exactly one exclusion flips the lead
    LargelyRobust { dimension: Dimension },
    /// Several exclusions flip the lead
    Fragile { dimensions: Vec<Dimension> },
}

#[derive(Debug, Clone, Serialize)]
pub struct AblationReport {
    pub candidate: String,
    pub full_score: f64,
    pub rows: Vec<AblationRow>,
    /// Number of exclusions the lead survived
    pub survived: usize,
    pub verdict: AblationVerdict,
}

impl AblationReport {
    pub fn row(&self, dimension: Dimension) -> Option<&AblationRow> {
        self.rows.iter().find(|r| r.dimension == dimension)
    }

    /// Dimensions whose removal changes the leader
    pub fn flipping_dimensions(&self) -> Vec<Dimension> {
        self.rows
            .iter()
            .filter(|r| !r.still_leading)
            .map(|r| r.dimension)
            .collect()
    }
}

/// Ablation over already-scored candidates
#[derive(Debug, Clone, Default)]
pub struct AblationEngine;

impl AblationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Ablate around the baseline leader
    pub fn run(&self, results: &[CandidateResult]) -> Result<AblationReport> {
        let overall: Vec<f64> = results.iter().map(CandidateResult::overall).collect();
        let leader = leader_index(&overall).ok_or(Error::NoCandidates)?;
        self.run_for(results, &results[leader].name)
    }

    /// Ablate around a named candidate
    pub fn run_for(&self, results: &[CandidateResult], focus: &str) -> Result<AblationReport> {
        if results.is_empty() {
            return Err(Error::NoCandidates);
        }
        let focus_index = results
            .iter()
            .position(|r| r.name == focus)
            .ok_or_else(|| Error::CandidateNotFound(focus.to_string()))?;
        let full_score = results[focus_index].overall();

        debug!(candidate = focus, full_score, candidates = results.len(), "starting ablation");

        let mut rows = Vec::with_capacity(Dimension::COUNT);
        for dimension in Dimension::ALL {
            let reduced: Vec<f64> = results
                .iter()
                .map(|r| r.scores.mean_excluding(dimension))
                .collect();
            let leader = leader_index(&reduced).ok_or(Error::NoCandidates)?;
            let score = reduced[focus_index];
            let delta = score - full_score;

            rows.push(AblationRow {
                dimension,
                score,
                delta,
                impact: Impact::from_delta(delta),
                still_leading: leader == focus_index,
                leader: results[leader].name.clone(),
            });
        }

        let flipping: Vec<Dimension> = rows
            .iter()
            .filter(|r| !r.still_leading)
            .map(|r| r.dimension)
            .collect();
        let survived = rows.len() - flipping.len();
        let verdict = match flipping.as_slice() {
            [] => AblationVerdict::Robust,
            [dimension] => AblationVerdict::LargelyRobust {
                dimension: *dimension,
            },
            _ => AblationVerdict::Fragile {
                dimensions: flipping,
            },
        };

        info!(
            candidate = focus,
            survived,
            total = rows.len(),
            ?verdict,
            "ablation complete"
        );

        Ok(AblationReport {
            candidate: focus.to_string(),
            full_score,
            rows,
            survived,
            verdict,
        })
    }
}
