//! Weight sensitivity of the baseline ranking
//!
//! Contextual dimensions (geography, chronology, scholarship, religion) can
//! inflate a ranking. Each scenario re-ranks the candidates with the
//! contextual category down-weighted and checks whether the baseline leader
//! keeps its place.

use crate::stats::leader_index;
use glossa_core::{Error, Result};
use glossa_similarity::{CandidateResult, Ranker, WeightSchema};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Category weights for one re-ranking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightScenario {
    pub name: String,
    pub linguistic: f64,
    pub contextual: f64,
}

impl WeightScenario {
    pub fn new(name: impl Into<String>, linguistic: f64, contextual: f64) -> Self {
        Self {
            name: name.into(),
            linguistic,
            contextual,
        }
    }

    /// All dimensions equal, contextual at 50%, at 25%, and linguistic only
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("all dimensions", 1.0, 1.0),
            Self::new("contextual at 50%", 1.0, 0.5),
            Self::new("contextual at 25%", 1.0, 0.25),
            Self::new("linguistic only", 1.0, 0.0),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub scenario: String,
    /// Baseline leader's weighted score
    pub score: f64,
    pub still_leading: bool,
    /// Best candidate other than the baseline leader
    pub rival: String,
    pub rival_score: f64,
    /// `score - rival_score`
    pub gap: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SensitivityReport {
    pub candidate: String,
    pub outcomes: Vec<ScenarioOutcome>,
    /// Leader survives every scenario
    pub stable: bool,
}

#[derive(Debug, Clone)]
pub struct WeightSensitivity {
    scenarios: Vec<WeightScenario>,
}

impl Default for WeightSensitivity {
    fn default() -> Self {
        Self::new(WeightScenario::defaults())
    }
}

impl WeightSensitivity {
    pub fn new(scenarios: Vec<WeightScenario>) -> Self {
        Self { scenarios }
    }

    pub fn scenarios(&self) -> &[WeightScenario] {
        &self.scenarios
    }

    pub fn run(&self, results: &[CandidateResult]) -> Result<SensitivityReport> {
        if self.scenarios.is_empty() {
            return Err(Error::Degenerate("no weight scenarios".to_string()));
        }
        if results.len() < 2 {
            return Err(Error::Degenerate(
                "weight sensitivity needs at least two candidates".to_string(),
            ));
        }

        let baseline: Vec<f64> = results.iter().map(CandidateResult::overall).collect();
        let focus = leader_index(&baseline).ok_or(Error::NoCandidates)?;
        let focus_name = &results[focus].name;
        debug!(candidate = %focus_name, scenarios = self.scenarios.len(), "starting weight sensitivity");

        let mut outcomes = Vec::with_capacity(self.scenarios.len());
        for scenario in &self.scenarios {
            let ranker = Ranker::weighted(WeightSchema::by_category(
                scenario.linguistic,
                scenario.contextual,
            ))
            .map_err(|e| Error::InvalidParameter(format!("scenario '{}': {}", scenario.name, e)))?;

            let ranked = ranker.rank_results(results);
            let (Some(leader), Some(own)) = (ranked.leader(), ranked.get(focus_name)) else {
                return Err(Error::NoCandidates);
            };
            let still_leading = leader.name == *focus_name;
            let rival = ranked
                .entries()
                .iter()
                .find(|e| e.name != *focus_name)
                .ok_or(Error::NoCandidates)?;

            outcomes.push(ScenarioOutcome {
                scenario: scenario.name.clone(),
                score: own.overall,
                still_leading,
                rival: rival.name.clone(),
                rival_score: rival.overall,
                gap: own.overall - rival.overall,
            });
        }

        let stable = outcomes.iter().all(|o| o.still_leading);
        info!(candidate = %focus_name, stable, "weight sensitivity complete");

        Ok(SensitivityReport {
            candidate: focus_name.clone(),
            outcomes,
            stable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glossa_core::{Dimension, DimensionScores};

    fn result(name: &str, values: [f64; Dimension::COUNT]) -> CandidateResult {
        CandidateResult {
            name: name.to_string(),
            scores: DimensionScores::new(values),
        }
    }

    #[test]
    fn test_default_scenarios() {
        let scenarios = WeightScenario::defaults();
        assert_eq!(scenarios.len(), 4);
        assert_eq!(scenarios[3].contextual, 0.0);
    }

    #[test]
    fn test_linguistic_leader_is_stable() {
        let results = [
            result("Lead", [85.0, 93.0, 80.0, 70.0, 75.0, 70.0, 75.0, 70.0]),
            result("Rival", [40.0, 43.0, 30.0, 20.0, 70.0, 60.0, 35.0, 30.0]),
        ];
        let report = WeightSensitivity::default().run(&results).unwrap();

        assert_eq!(report.candidate, "Lead");
        assert!(report.stable);
        let all = &report.outcomes[0];
        assert!((all.gap - 36.25).abs() < 1e-9);
        let linguistic = &report.outcomes[3];
        assert!((linguistic.score - 82.0).abs() < 1e-9);
        assert!((linguistic.rival_score - 33.25).abs() < 1e-9);
    }

    #[test]
    fn test_context_inflated_leader_is_not_stable() {
        let results = [
            result("Context", [20.0, 20.0, 20.0, 20.0, 100.0, 100.0, 100.0, 100.0]),
            result("Lexicon", [60.0, 60.0, 60.0, 60.0, 30.0, 30.0, 30.0, 30.0]),
        ];
        let report = WeightSensitivity::default().run(&results).unwrap();

        assert_eq!(report.candidate, "Context");
        assert!(!report.stable);
        let linguistic = &report.outcomes[3];
        assert!(!linguistic.still_leading);
        assert_eq!(linguistic.rival, "Lexicon");
        assert!((linguistic.gap + 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_scenarios() {
        let results = [
            result("A", [50.0; Dimension::COUNT]),
            result("B", [40.0; Dimension::COUNT]),
        ];
        let zero = WeightSensitivity::new(vec![WeightScenario::new("nothing", 0.0, 0.0)]);
        assert!(matches!(zero.run(&results), Err(Error::InvalidParameter(_))));
        assert!(matches!(
            WeightSensitivity::new(Vec::new()).run(&results),
            Err(Error::Degenerate(_))
        ));
        assert!(matches!(
            WeightSensitivity::default().run(&results[..1]),
            Err(Error::Degenerate(_))
        ));
    }
}
