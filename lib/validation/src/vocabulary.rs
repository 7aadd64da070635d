//! Curated vs expanded vocabulary comparison
//!
//! A short curated word list can flatter whichever family it was compiled
//! for. Re-scoring every candidate over a longer list shows how much of
//! each overall score rides on that selection.

use glossa_core::{Error, Panel, Result};
use glossa_similarity::Ranker;
use serde::Serialize;
use tracing::{info, warn};

/// One candidate under both vocabulary lists
#[derive(Debug, Clone, Serialize)]
pub struct VocabularyShift {
    pub name: String,
    pub curated: f64,
    pub expanded: f64,
    /// `expanded - curated`
    pub delta: f64,
    pub curated_rank: usize,
    pub expanded_rank: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct VocabularyComparison {
    pub curated_items: usize,
    pub expanded_items: usize,
    pub curated_leader: String,
    pub expanded_leader: String,
    pub leader_changed: bool,
    /// Keys zero-filled or ignored while building the expanded panel
    pub expanded_gaps: usize,
    /// In expanded-ranking order
    pub shifts: Vec<VocabularyShift>,
}

impl VocabularyComparison {
    pub fn shift(&self, name: &str) -> Option<&VocabularyShift> {
        self.shifts.iter().find(|s| s.name == name)
    }
}

/// Rank both panels and pair up every candidate
///
/// The panels must hold the same candidates; only their vocabulary lists
/// (and the scores behind them) may differ.
pub fn compare_vocabulary(curated: &Panel, expanded: &Panel) -> Result<VocabularyComparison> {
    if curated.len() != expanded.len() {
        return Err(Error::InvalidParameter(format!(
            "vocabulary panels hold {} and {} candidates",
            curated.len(),
            expanded.len()
        )));
    }

    let ranker = Ranker::new();
    let before = ranker.rank(curated);
    let after = ranker.rank(expanded);
    let curated_leader = before.leader().ok_or(Error::NoCandidates)?;
    let expanded_leader = after.leader().ok_or(Error::NoCandidates)?;

    let shifts = after
        .entries()
        .iter()
        .map(|entry| {
            let baseline = before
                .get(&entry.name)
                .ok_or_else(|| Error::CandidateNotFound(entry.name.clone()))?;
            Ok(VocabularyShift {
                name: entry.name.clone(),
                curated: baseline.overall,
                expanded: entry.overall,
                delta: entry.overall - baseline.overall,
                curated_rank: baseline.rank,
                expanded_rank: entry.rank,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let leader_changed = curated_leader.name != expanded_leader.name;
    if leader_changed {
        warn!(
            curated = %curated_leader.name,
            expanded = %expanded_leader.name,
            "leader changes with the expanded vocabulary"
        );
    } else {
        info!(
            leader = %expanded_leader.name,
            items = expanded.vocabulary().len(),
            "leader holds under the expanded vocabulary"
        );
    }

    Ok(VocabularyComparison {
        curated_items: curated.vocabulary().len(),
        expanded_items: expanded.vocabulary().len(),
        curated_leader: curated_leader.name.clone(),
        expanded_leader: expanded_leader.name.clone(),
        leader_changed,
        expanded_gaps: expanded.gaps().len(),
        shifts,
    })
}
