//! Negative control
//!
//! A known unrelated language is scored through the same pipeline. If it
//! scores high or ranks near the top, the scoring favors the target's
//! profile regardless of the candidate and the ranking cannot be trusted.

use crate::bootstrap::BootstrapReport;
use crate::stats::Spread;
use glossa_core::{Error, Result};
use glossa_similarity::{DimensionContrast, RankedList};
use serde::Serialize;
use tracing::{info, warn};

/// Highest overall score a control may reach
pub const MAX_CONTROL_SCORE: f64 = 55.0;
/// Best rank a control may reach (1-based)
pub const MIN_CONTROL_RANK: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlOutcome {
    Pass,
    /// Score above [`MAX_CONTROL_SCORE`]
    ScoreTooHigh,
    /// Ranked above [`MIN_CONTROL_RANK`]
    RankTooHigh,
}

#[derive(Debug, Clone, Serialize)]
pub struct NegativeControlReport {
    pub control: String,
    pub score: f64,
    pub rank: usize,
    pub candidates: usize,
    /// Leader's score minus the control's
    pub gap_to_leader: f64,
    pub outcome: ControlOutcome,
    /// Where the control diverges from the leader
    pub contrast: DimensionContrast,
}

impl NegativeControlReport {
    pub fn passed(&self) -> bool {
        self.outcome == ControlOutcome::Pass
    }
}

/// Check a control candidate within a ranking that includes it
pub fn check_control(ranked: &RankedList, control: &str) -> Result<NegativeControlReport> {
    let leader = ranked.leader().ok_or(Error::NoCandidates)?;
    let entry = ranked
        .get(control)
        .ok_or_else(|| Error::CandidateNotFound(control.to_string()))?;

    let outcome = if entry.overall > MAX_CONTROL_SCORE {
        ControlOutcome::ScoreTooHigh
    } else if entry.rank < MIN_CONTROL_RANK {
        ControlOutcome::RankTooHigh
    } else {
        ControlOutcome::Pass
    };

    if outcome == ControlOutcome::Pass {
        info!(control, score = entry.overall, rank = entry.rank, "negative control passed");
    } else {
        warn!(
            control,
            score = entry.overall,
            rank = entry.rank,
            ?outcome,
            "negative control failed; scoring may be biased"
        );
    }

    Ok(NegativeControlReport {
        control: control.to_string(),
        score: entry.overall,
        rank: entry.rank,
        candidates: ranked.len(),
        gap_to_leader: leader.overall - entry.overall,
        outcome,
        contrast: DimensionContrast::between(leader, entry),
    })
}

/// Bootstrap spread of the control next to the leader
#[derive(Debug, Clone, Serialize)]
pub struct ControlBootstrap {
    pub control: String,
    pub trials: usize,
    pub leader: String,
    pub leader_win_probability: f64,
    pub leader_spread: Spread,
    pub control_win_probability: f64,
    pub control_spread: Spread,
    /// Control's upper bound lies below the leader's lower bound
    pub separated: bool,
}

/// Pull the control's standing out of a bootstrap run that included it
pub fn bootstrap_control(report: &BootstrapReport, control: &str) -> Result<ControlBootstrap> {
    let leader = report
        .candidate(&report.leader)
        .ok_or_else(|| Error::CandidateNotFound(report.leader.clone()))?;
    let entry = report
        .candidate(control)
        .ok_or_else(|| Error::CandidateNotFound(control.to_string()))?;

    let separated = entry.spread.upper < leader.spread.lower;
    info!(
        control,
        upper = entry.spread.upper,
        leader_lower = leader.spread.lower,
        separated,
        "control bootstrap"
    );

    Ok(ControlBootstrap {
        control: control.to_string(),
        trials: report.trials,
        leader: report.leader.clone(),
        leader_win_probability: report.leader_win_probability,
        leader_spread: leader.spread,
        control_win_probability: entry.win_probability,
        control_spread: entry.spread,
        separated,
    })
}
