//! Cross-domain Bayesian convergence
//!
//! Starts from a prior and updates the odds sequentially, one evidence
//! domain at a time, with each likelihood ratio clamped to a finite band.
//! The update runs in log-odds space so long chains of strong evidence
//! cannot saturate to exactly 0 or 1.
//!
//! Multiplying likelihood ratios assumes the domains are conditionally
//! independent. That assumption is reported as a caveat on every run, and
//! domains declared as sharing evidence produce explicit overlap warnings.

use crate::stats::mean;
use glossa_core::{clamp_score, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

pub const DEFAULT_PRIOR: f64 = 0.10;
pub const DEFAULT_MIN_RATIO: f64 = 0.5;
pub const DEFAULT_MAX_RATIO: f64 = 5.0;
/// Weight of contradicting evidence relative to supporting evidence
pub const CONTRADICTION_WEIGHT: f64 = 0.5;

/// Posterior is kept within `[EPSILON, 1 - EPSILON]`
const EPSILON: f64 = 1e-12;

pub const INDEPENDENCE_CAVEAT: &str = "Posterior assumes the evidence domains are conditionally \
    independent given the hypothesis. Domains that share underlying evidence inflate it.";

/// One summarized line of evidence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvidenceDomain {
    pub name: String,
    /// Diagnostic score, 0-100
    pub score: f64,
    /// Clamped to the engine's band before use
    pub likelihood_ratio: f64,
    /// Domains this one shares evidence with
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overlaps: Vec<String>,
}

impl EvidenceDomain {
    pub fn new(name: impl Into<String>, score: f64, likelihood_ratio: f64) -> Self {
        Self {
            name: name.into(),
            score,
            likelihood_ratio,
            overlaps: Vec::new(),
        }
    }

    pub fn overlapping(mut self, other: impl Into<String>) -> Self {
        self.overlaps.push(other.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Support,
    Contradict,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvidenceItem {
    pub name: String,
    pub score: f64,
    pub direction: Direction,
}

/// A domain described by individual evidence items instead of a summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainEvidence {
    pub name: String,
    pub items: Vec<EvidenceItem>,
    /// Net score expected for an unrelated hypothesis; the ratio denominator
    pub baseline: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overlaps: Vec<String>,
}

impl DomainEvidence {
    /// Mean support minus half the mean contradiction magnitude
    pub fn net_score(&self) -> f64 {
        let support: Vec<f64> = self
            .items
            .iter()
            .filter(|i| i.direction == Direction::Support)
            .map(|i| i.score)
            .collect();
        let contradict: Vec<f64> = self
            .items
            .iter()
            .filter(|i| i.direction == Direction::Contradict)
            .map(|i| i.score.abs())
            .collect();
        mean(&support) - CONTRADICTION_WEIGHT * mean(&contradict)
    }

    /// Summarize into a domain; the score is floored at 0
    pub fn summarize(&self) -> Result<EvidenceDomain> {
        if !(self.baseline.is_finite() && self.baseline > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "domain '{}' needs a positive baseline, got {}",
                self.name, self.baseline
            )));
        }
        if self.items.is_empty() {
            return Err(Error::Degenerate(format!("domain '{}' has no evidence items", self.name)));
        }
        let net = self.net_score();
        Ok(EvidenceDomain {
            name: self.name.clone(),
            score: net.max(0.0),
            likelihood_ratio: net / self.baseline,
            overlaps: self.overlaps.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PosteriorVerdict {
    /// At least 0.95
    NearCertain,
    /// At least 0.85
    HighlyProbable,
    /// At least 0.70
    Probable,
    /// At least 0.50
    Likely,
    Uncertain,
}

impl PosteriorVerdict {
    pub fn from_posterior(p: f64) -> Self {
        if p >= 0.95 {
            PosteriorVerdict::NearCertain
        } else if p >= 0.85 {
            PosteriorVerdict::HighlyProbable
        } else if p >= 0.70 {
            PosteriorVerdict::Probable
        } else if p >= 0.50 {
            PosteriorVerdict::Likely
        } else {
            PosteriorVerdict::Uncertain
        }
    }
}

/// State after one domain's update
#[derive(Debug, Clone, Serialize)]
pub struct PosteriorStep {
    pub domain: String,
    pub score: f64,
    pub likelihood_ratio: f64,
    /// Ratio actually applied
    pub clamped_ratio: f64,
    pub posterior: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapWarning {
    pub first: String,
    pub second: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BayesianReport {
    pub prior: f64,
    pub ratio_band: (f64, f64),
    pub steps: Vec<PosteriorStep>,
    pub posterior: f64,
    pub verdict: PosteriorVerdict,
    /// Plain mean of the domain scores, for comparison
    pub simple_average: f64,
    pub overlap_warnings: Vec<OverlapWarning>,
    pub caveat: &'static str,
}

#[derive(Debug, Clone)]
pub struct BayesianConvergenceEngine {
    prior: f64,
    min_ratio: f64,
    max_ratio: f64,
}

impl Default for BayesianConvergenceEngine {
    fn default() -> Self {
        Self {
            prior: DEFAULT_PRIOR,
            min_ratio: DEFAULT_MIN_RATIO,
            max_ratio: DEFAULT_MAX_RATIO,
        }
    }
}

impl BayesianConvergenceEngine {
    pub fn new(prior: f64, min_ratio: f64, max_ratio: f64) -> Result<Self> {
        if !(prior > 0.0 && prior < 1.0) {
            return Err(Error::InvalidParameter(format!("prior {} is outside (0, 1)", prior)));
        }
        if !(min_ratio > 0.0 && min_ratio <= max_ratio && max_ratio.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "likelihood-ratio band [{}, {}] must be positive, finite and ordered",
                min_ratio, max_ratio
            )));
        }
        Ok(Self {
            prior,
            min_ratio,
            max_ratio,
        })
    }

    pub fn prior(&self) -> f64 {
        self.prior
    }

    /// Update the prior with every domain, in order
    pub fn run(&self, domains: &[EvidenceDomain]) -> Result<BayesianReport> {
        if domains.is_empty() {
            return Err(Error::Degenerate("no evidence domains".to_string()));
        }
        for domain in domains {
            if !domain.score.is_finite() {
                return Err(invalid(domain, "score", domain.score));
            }
            if domain.likelihood_ratio.is_nan() {
                return Err(invalid(domain, "likelihood_ratio", domain.likelihood_ratio));
            }
        }

        debug!(
            prior = self.prior,
            min_ratio = self.min_ratio,
            max_ratio = self.max_ratio,
            domains = domains.len(),
            "starting bayesian convergence"
        );

        let mut log_odds = logit(self.prior);
        let mut steps = Vec::with_capacity(domains.len());
        for domain in domains {
            let clamped_ratio = domain.likelihood_ratio.clamp(self.min_ratio, self.max_ratio);
            log_odds += clamped_ratio.ln();
            steps.push(PosteriorStep {
                domain: domain.name.clone(),
                score: domain.score,
                likelihood_ratio: domain.likelihood_ratio,
                clamped_ratio,
                posterior: logistic(log_odds),
            });
        }

        let posterior = logistic(log_odds);
        let verdict = PosteriorVerdict::from_posterior(posterior);
        let scores: Vec<f64> = domains.iter().map(|d| clamp_score(d.score)).collect();
        let simple_average = mean(&scores);
        let overlap_warnings = overlaps(domains);

        for overlap in &overlap_warnings {
            warn!(
                first = %overlap.first,
                second = %overlap.second,
                "evidence domains share evidence; independence assumption violated"
            );
        }
        info!(posterior, ?verdict, simple_average, "bayesian convergence complete");

        Ok(BayesianReport {
            prior: self.prior,
            ratio_band: (self.min_ratio, self.max_ratio),
            steps,
            posterior,
            verdict,
            simple_average,
            overlap_warnings,
            caveat: INDEPENDENCE_CAVEAT,
        })
    }
}

fn invalid(domain: &EvidenceDomain, field: &str, value: f64) -> Error {
    Error::InvalidValue {
        owner: domain.name.clone(),
        field: field.to_string(),
        value,
    }
}

fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

fn logistic(log_odds: f64) -> f64 {
    (1.0 / (1.0 + (-log_odds).exp())).clamp(EPSILON, 1.0 - EPSILON)
}

/// Declared overlaps between domains present in this run, each pair once
fn overlaps(domains: &[EvidenceDomain]) -> Vec<OverlapWarning> {
    let present: BTreeSet<&str> = domains.iter().map(|d| d.name.as_str()).collect();
    let mut pairs = BTreeSet::new();
    for domain in domains {
        for other in &domain.overlaps {
            if !present.contains(other.as_str()) {
                debug!(domain = %domain.name, other = %other, "overlap names a domain not in this run");
                continue;
            }
            if other == &domain.name {
                continue;
            }
            let pair = if domain.name < *other {
                (domain.name.clone(), other.clone())
            } else {
                (other.clone(), domain.name.clone())
            };
            pairs.insert(pair);
        }
    }
    pairs
        .into_iter()
        .map(|(first, second)| OverlapWarning { first, second })
        .collect()
}
