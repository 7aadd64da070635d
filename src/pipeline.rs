//! End-to-end analysis run
//!
//! tables -> [`Panel`] -> baseline ranking -> validation engines -> report.
//! Each randomized engine gets its own `StdRng` derived from the master
//! seed, so adding or skipping one check never shifts another check's
//! random stream.

use crate::config::{AnalysisConfig, VocabularyItem};
use glossa_core::{CandidateProfile, DataGap, Error, Panel, Result};
use glossa_similarity::{contrast, DimensionContrast, RankedList, Ranker, RankingSummary};
use glossa_validation::{
    bootstrap_control, check_control, compare_vocabulary, AblationEngine, AblationReport,
    BayesianConvergenceEngine, BayesianReport, BootstrapEngine, BootstrapReport,
    ChanceControlEngine, ChanceControlReport, ControlBootstrap, NegativeControlReport,
    PerturbationEngine, PerturbationReport, PseudoWordGenerator, SensitivityReport,
    VocabularyComparison, WeightSensitivity,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

const BOOTSTRAP_STREAM: u64 = 0xB007;
const PERTURBATION_STREAM: u64 = 0x9E27;
const CHANCE_STREAM: u64 = 0xC4A5;
const CONTROL_STREAM: u64 = 0xC047;

fn engine_rng(seed: u64, stream: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ stream)
}

/// Everything one run produces
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub target: String,
    pub seed: u64,
    /// Zero-filled or ignored keys found while building the panel
    pub data_gaps: Vec<DataGap>,
    pub ranking: RankedList,
    pub summary: RankingSummary,
    pub contrasts: Vec<DimensionContrast>,
    pub ablation: AblationReport,
    pub bootstrap: BootstrapReport,
    pub perturbation: PerturbationReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary_comparison: Option<VocabularyComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chance: Option<ChanceControlReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_sensitivity: Option<SensitivityReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_control: Option<NegativeControlReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_bootstrap: Option<ControlBootstrap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub convergence: Option<BayesianReport>,
}

/// Build the panel for a config, honoring a vocabulary override
pub fn build_panel(config: &AnalysisConfig) -> Result<Panel> {
    panel_for(config, &config.candidates)
}

fn panel_for(config: &AnalysisConfig, candidates: &[CandidateProfile]) -> Result<Panel> {
    match &config.vocabulary {
        Some(vocabulary) => {
            Panel::build_with_vocabulary(config.target.clone(), candidates, vocabulary.clone())
        }
        None => Panel::build(config.target.clone(), candidates),
    }
}

/// Rescore every candidate's vocabulary over the expanded item table
fn expanded_panel_for(
    config: &AnalysisConfig,
    items: &[VocabularyItem],
    candidates: &[CandidateProfile],
) -> Result<Panel> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.item.as_str()) {
            return Err(Error::InvalidParameter(format!(
                "expanded vocabulary lists '{}' twice",
                item.item
            )));
        }
    }

    let rescored: Vec<CandidateProfile> = candidates
        .iter()
        .map(|candidate| {
            let mut profile = candidate.clone();
            profile.vocabulary_matches = Some(
                items
                    .iter()
                    .filter_map(|i| i.scores.get(&candidate.name).map(|s| (i.item.clone(), *s)))
                    .collect(),
            );
            profile
        })
        .collect();
    let list = items.iter().map(|i| i.item.clone()).collect();
    Panel::build_with_vocabulary(config.target.clone(), &rescored, list)
}

/// Run the baseline ranking and every configured check
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisReport> {
    let params = &config.params;
    info!(
        target = %config.target.name,
        candidates = config.candidates.len(),
        seed = params.seed,
        "starting analysis"
    );

    let panel = build_panel(config)?;
    let ranker = Ranker::new();
    let results = ranker.score_all(&panel);
    let ranking = ranker.rank_results(&results);
    let summary = RankingSummary::compute(&ranking);
    info!(
        leader = summary.leader.as_deref().unwrap_or_default(),
        score = summary.best_score,
        gap = summary.gap,
        significance = ?summary.significance,
        "baseline ranking"
    );

    let ablation = AblationEngine::new().run(&results)?;

    let bootstrap = BootstrapEngine::new(params.bootstrap_trials)
        .run(&results, &mut engine_rng(params.seed, BOOTSTRAP_STREAM))?;

    let perturbation =
        PerturbationEngine::new(params.corruption_rates.clone(), params.perturbation_trials)
            .run(&panel, &mut engine_rng(params.seed, PERTURBATION_STREAM))?;

    let chance = match &config.chance {
        Some(chance) => {
            let observed = chance
                .observed_words
                .as_ref()
                .unwrap_or(&config.target.words);
            let generator =
                PseudoWordGenerator::new(chance.consonants.clone(), &config.target.phonemes)?;
            Some(ChanceControlEngine::new(params.pseudo_lexicons).run(
                observed,
                &chance.reference_words,
                &generator,
                &mut engine_rng(params.seed, CHANCE_STREAM),
            )?)
        }
        None => {
            debug!("no chance-control inputs configured");
            None
        }
    };

    let vocabulary_comparison = match &config.expanded_vocabulary {
        Some(items) => {
            let expanded = expanded_panel_for(config, items, &config.candidates)?;
            Some(compare_vocabulary(&panel, &expanded)?)
        }
        None => None,
    };

    let weight_sensitivity = if config.weight_scenarios.is_empty() {
        None
    } else if results.len() < 2 {
        debug!(candidates = results.len(), "weight sensitivity needs two candidates; skipped");
        None
    } else {
        Some(WeightSensitivity::new(config.weight_scenarios.clone()).run(&results)?)
    };

    let (negative_control, control_bootstrap) = match &config.negative_control {
        Some(control) => {
            let (check, bootstrap) = run_negative_control(config, control)?;
            (Some(check), Some(bootstrap))
        }
        None => (None, None),
    };

    let convergence = if config.evidence.is_empty() {
        None
    } else {
        let mut domains = config.evidence.domains.clone();
        for itemized in &config.evidence.itemized {
            domains.push(itemized.summarize()?);
        }
        let engine = BayesianConvergenceEngine::new(params.prior, params.min_ratio, params.max_ratio)?;
        Some(engine.run(&domains)?)
    };

    info!(
        gaps = panel.gaps().len(),
        ablation = ?ablation.verdict,
        bootstrap = bootstrap.leader_win_probability,
        perturbation = ?perturbation.verdict,
        "analysis complete"
    );

    Ok(AnalysisReport {
        target: config.target.name.clone(),
        seed: params.seed,
        data_gaps: panel.gaps().to_vec(),
        contrasts: contrast(&ranking),
        ranking,
        summary,
        ablation,
        bootstrap,
        perturbation,
        vocabulary_comparison,
        chance,
        weight_sensitivity,
        negative_control,
        control_bootstrap,
        convergence,
    })
}

/// Rank the control alongside the candidates and check where it lands,
/// then bootstrap the panel that includes it
///
/// The bootstrap scores vocabulary over the expanded items when they are
/// configured.
fn run_negative_control(
    config: &AnalysisConfig,
    control: &CandidateProfile,
) -> Result<(NegativeControlReport, ControlBootstrap)> {
    if config.candidates.iter().any(|c| c.name == control.name) {
        return Err(Error::DuplicateCandidate(control.name.clone()));
    }
    let mut candidates = config.candidates.clone();
    candidates.push(control.clone());

    let ranker = Ranker::new();
    let panel = panel_for(config, &candidates)?;
    let check = check_control(&ranker.rank(&panel), &control.name)?;

    let results = match &config.expanded_vocabulary {
        Some(items) => ranker.score_all(&expanded_panel_for(config, items, &candidates)?),
        None => ranker.score_all(&panel),
    };
    let bootstrap = BootstrapEngine::new(config.params.bootstrap_trials)
        .run(&results, &mut engine_rng(config.params.seed, CONTROL_STREAM))?;
    Ok((check, bootstrap_control(&bootstrap, &control.name)?))
}
