//! Dimension-resampling bootstrap
//!
//! Each trial draws `D` dimension indices with replacement and applies the
//! same draw to every candidate, so trials compare like with like. The
//! resulting spread measures how much the ranking depends on which
//! dimensions happen to be included. It is a dimension-sensitivity
//! analysis: the eight dimensions are not a random sample from a population,
//! so the interval is not a population confidence interval.

use crate::stats::{leader_index, ranks, Spread};
use glossa_core::{Dimension, Error, Result};
use glossa_similarity::CandidateResult;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

/// Default number of resampling trials
pub const DEFAULT_BOOTSTRAP_TRIALS: usize = 10_000;

/// Significance band on the leader's win probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BootstrapSignificance {
    /// Leader wins in at least 95% of trials
    #[serde(rename = "p < 0.05")]
    P05,
    /// Leader wins in at least 90% of trials
    #[serde(rename = "p < 0.10")]
    P10,
    #[serde(rename = "not significant")]
    NotSignificant,
}

impl BootstrapSignificance {
    pub fn from_win_probability(p: f64) -> Self {
        if p >= 0.95 {
            BootstrapSignificance::P05
        } else if p >= 0.90 {
            BootstrapSignificance::P10
        } else {
            BootstrapSignificance::NotSignificant
        }
    }
}

/// Raw per-trial overall scores, accumulated per candidate
#[derive(Debug, Clone)]
pub struct BootstrapSample {
    pub names: Vec<String>,
    /// `scores[candidate][trial]`
    pub scores: Vec<Vec<f64>>,
    /// `rank_counts[candidate][rank - 1]`
    pub rank_counts: Vec<Vec<usize>>,
    pub trials: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateBootstrap {
    pub name: String,
    #[serde(flatten)]
    pub spread: Spread,
    /// Fraction of trials ranked first
    pub win_probability: f64,
    /// Trial count per rank, index 0 is rank 1
    pub rank_distribution: Vec<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    pub trials: usize,
    /// Baseline leader
    pub leader: String,
    pub leader_win_probability: f64,
    pub significance: BootstrapSignificance,
    /// In input order
    pub candidates: Vec<CandidateBootstrap>,
}

impl BootstrapReport {
    pub fn candidate(&self, name: &str) -> Option<&CandidateBootstrap> {
        self.candidates.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct BootstrapEngine {
    trials: usize,
}

impl Default for BootstrapEngine {
    fn default() -> Self {
        Self::new(DEFAULT_BOOTSTRAP_TRIALS)
    }
}

impl BootstrapEngine {
    pub fn new(trials: usize) -> Self {
        Self { trials }
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    /// Draw the resampled scores without summarizing them
    pub fn sample<R: Rng + ?Sized>(
        &self,
        results: &[CandidateResult],
        rng: &mut R,
    ) -> Result<BootstrapSample> {
        if self.trials == 0 {
            return Err(Error::Degenerate("bootstrap needs at least one trial".to_string()));
        }
        if results.is_empty() {
            return Err(Error::NoCandidates);
        }

        let n = results.len();
        let mut scores = vec![Vec::with_capacity(self.trials); n];
        let mut rank_counts = vec![vec![0usize; n]; n];
        let mut indices = [0usize; Dimension::COUNT];
        let mut trial_scores = vec![0.0; n];

        for _ in 0..self.trials {
            for index in indices.iter_mut() {
                *index = rng.random_range(0..Dimension::COUNT);
            }
            for (slot, result) in trial_scores.iter_mut().zip(results) {
                let values = result.scores.values();
                *slot = indices.iter().map(|i| values[*i]).sum::<f64>() / Dimension::COUNT as f64;
            }
            for (candidate, rank) in ranks(&trial_scores).into_iter().enumerate() {
                rank_counts[candidate][rank - 1] += 1;
                scores[candidate].push(trial_scores[candidate]);
            }
        }

        Ok(BootstrapSample {
            names: results.iter().map(|r| r.name.clone()).collect(),
            scores,
            rank_counts,
            trials: self.trials,
        })
    }

    /// Resample and summarize around the baseline leader
    pub fn run<R: Rng + ?Sized>(
        &self,
        results: &[CandidateResult],
        rng: &mut R,
    ) -> Result<BootstrapReport> {
        debug!(trials = self.trials, candidates = results.len(), "starting bootstrap");

        let sample = self.sample(results, rng)?;
        let baseline: Vec<f64> = results.iter().map(CandidateResult::overall).collect();
        let leader = leader_index(&baseline).ok_or(Error::NoCandidates)?;

        let trials = sample.trials;
        let candidates = sample
            .names
            .into_iter()
            .zip(sample.scores)
            .zip(sample.rank_counts)
            .map(|((name, scores), rank_distribution)| {
                let spread = Spread::from_samples(scores)
                    .ok_or_else(|| Error::Degenerate(format!("no bootstrap samples for {}", name)))?;
                Ok(CandidateBootstrap {
                    win_probability: rank_distribution[0] as f64 / trials as f64,
                    name,
                    spread,
                    rank_distribution,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let leader_win_probability = candidates[leader].win_probability;
        let significance = BootstrapSignificance::from_win_probability(leader_win_probability);

        info!(
            leader = %candidates[leader].name,
            win_probability = leader_win_probability,
            ?significance,
            "bootstrap complete"
        );

        Ok(BootstrapReport {
            trials,
            leader: candidates[leader].name.clone(),
            leader_win_probability,
            significance,
            candidates,
        })
    }
}
