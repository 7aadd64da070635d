//! Controlled perturbation of the measured inputs
//!
//! Simulates reading uncertainty: at corruption rate `r` every candidate has
//! `round(r * F)` distinct features flipped and Gaussian noise added to its
//! vocabulary (sd `10r`) and case (sd `15r`) scores. The panel is re-scored
//! and re-ranked each trial; the baseline tables are never touched.

use crate::stats::{leader_index, mean};
use glossa_core::{clamp_score, AlignedCandidate, Error, Panel, Result};
use glossa_similarity::score_candidate;
use rand::seq::index;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use tracing::{debug, info};

/// Default corruption-rate sweep
pub const DEFAULT_RATES: [f64; 5] = [0.10, 0.15, 0.20, 0.25, 0.30];
/// Default trials per rate
pub const DEFAULT_PERTURBATION_TRIALS: usize = 1_000;
/// Vocabulary noise sd per unit of corruption rate
pub const VOCABULARY_NOISE: f64 = 10.0;
/// Case noise sd per unit of corruption rate
pub const CASE_NOISE: f64 = 15.0;

/// Confidence band on the win rate at one corruption level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    /// Win rate of at least 90%
    High,
    /// Win rate of at least 70%
    Moderate,
    Low,
}

impl Confidence {
    pub fn from_win_rate(win_rate: f64) -> Self {
        if win_rate >= 0.90 {
            Confidence::High
        } else if win_rate >= 0.70 {
            Confidence::Moderate
        } else {
            Confidence::Low
        }
    }
}

/// Overall verdict, taken at the highest corruption rate tested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RobustnessVerdict {
    /// Win rate of at least 80%
    Robust,
    /// Win rate of at least 60%
    ModeratelyRobust,
    Fragile,
}

impl RobustnessVerdict {
    pub fn from_win_rate(win_rate: f64) -> Self {
        if win_rate >= 0.80 {
            RobustnessVerdict::Robust
        } else if win_rate >= 0.60 {
            RobustnessVerdict::ModeratelyRobust
        } else {
            RobustnessVerdict::Fragile
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RateOutcome {
    pub rate: f64,
    /// Features flipped per candidate per trial
    pub flipped_features: usize,
    /// Baseline leader's mean overall score under perturbation
    pub leader_mean: f64,
    /// Fraction of trials the baseline leader stayed first
    pub win_rate: f64,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerturbationReport {
    pub candidate: String,
    pub trials: usize,
    pub outcomes: Vec<RateOutcome>,
    pub verdict: RobustnessVerdict,
}

impl PerturbationReport {
    /// Outcome at the highest rate tested
    pub fn worst_case(&self) -> Option<&RateOutcome> {
        highest_rate(&self.outcomes)
    }
}

fn highest_rate(outcomes: &[RateOutcome]) -> Option<&RateOutcome> {
    outcomes
        .iter()
        .max_by(|a, b| a.rate.partial_cmp(&b.rate).unwrap_or(std::cmp::Ordering::Equal))
}

#[derive(Debug, Clone)]
pub struct PerturbationEngine {
    rates: Vec<f64>,
    trials: usize,
}

impl Default for PerturbationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_RATES.to_vec(), DEFAULT_PERTURBATION_TRIALS)
    }
}

impl PerturbationEngine {
    pub fn new(rates: Vec<f64>, trials: usize) -> Self {
        Self { rates, trials }
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn trials(&self) -> usize {
        self.trials
    }

    fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(Error::Degenerate("perturbation needs at least one trial".to_string()));
        }
        if self.rates.is_empty() {
            return Err(Error::Degenerate("no corruption rates to test".to_string()));
        }
        if let Some(rate) = self.rates.iter().find(|r| !(**r > 0.0 && **r < 1.0)) {
            return Err(Error::InvalidParameter(format!(
                "corruption rate {} is outside (0, 1)",
                rate
            )));
        }
        Ok(())
    }

    pub fn run<R: Rng + ?Sized>(&self, panel: &Panel, rng: &mut R) -> Result<PerturbationReport> {
        self.validate()?;

        let baseline: Vec<f64> = panel
            .candidates()
            .iter()
            .map(|c| score_candidate(panel, c).overall())
            .collect();
        let focus = leader_index(&baseline).ok_or(Error::NoCandidates)?;
        let focus_name = panel.candidates()[focus].name.clone();

        debug!(
            candidate = %focus_name,
            rates = ?self.rates,
            trials = self.trials,
            "starting perturbation"
        );

        let feature_count = panel.feature_names().len();
        let mut outcomes = Vec::with_capacity(self.rates.len());

        for &rate in &self.rates {
            let flips = ((rate * feature_count as f64).round() as usize).min(feature_count);
            let vocabulary_noise = normal(VOCABULARY_NOISE * rate)?;
            let case_noise = normal(CASE_NOISE * rate)?;

            let mut wins = 0usize;
            let mut focus_scores = Vec::with_capacity(self.trials);
            let mut overall = vec![0.0; panel.len()];

            for _ in 0..self.trials {
                for (slot, candidate) in overall.iter_mut().zip(panel.candidates()) {
                    let perturbed =
                        perturb(candidate, flips, &vocabulary_noise, &case_noise, rng);
                    *slot = score_candidate(panel, &perturbed).overall();
                }
                focus_scores.push(overall[focus]);
                if leader_index(&overall) == Some(focus) {
                    wins += 1;
                }
            }

            let win_rate = wins as f64 / self.trials as f64;
            debug!(rate, win_rate, "perturbation level complete");
            outcomes.push(RateOutcome {
                rate,
                flipped_features: flips,
                leader_mean: mean(&focus_scores),
                win_rate,
                confidence: Confidence::from_win_rate(win_rate),
            });
        }

        let verdict = highest_rate(&outcomes)
            .map(|worst| RobustnessVerdict::from_win_rate(worst.win_rate))
            .unwrap_or(RobustnessVerdict::Fragile);
        let report = PerturbationReport {
            candidate: focus_name,
            trials: self.trials,
            outcomes,
            verdict,
        };

        info!(
            candidate = %report.candidate,
            verdict = ?report.verdict,
            "perturbation complete"
        );
        Ok(report)
    }
}

fn normal(sd: f64) -> Result<Normal<f64>> {
    Normal::new(0.0, sd)
        .map_err(|e| Error::InvalidParameter(format!("noise sd {}: {}", sd, e)))
}

/// Perturbed working copy of one candidate
fn perturb<R: Rng + ?Sized>(
    candidate: &AlignedCandidate,
    flips: usize,
    vocabulary_noise: &Normal<f64>,
    case_noise: &Normal<f64>,
    rng: &mut R,
) -> AlignedCandidate {
    let mut copy = candidate.clone();

    let feature_count = copy.features.len();
    for i in index::sample(rng, feature_count, flips.min(feature_count)) {
        // A missing feature stays missing
        if let Some(value) = copy.features[i].as_mut() {
            *value = !*value;
        }
    }
    for score in copy.vocabulary.iter_mut() {
        *score = clamp_score(*score + vocabulary_noise.sample(rng));
    }
    for score in copy.cases.iter_mut() {
        *score = clamp_score(*score + case_noise.sample(rng));
    }
    copy
}
