//! Small statistics helpers shared by the engines

use serde::Serialize;
use std::cmp::Ordering;

/// Arithmetic mean; 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sort ascending, NaN-tolerant
pub fn sort_ascending(values: &mut [f64]) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
}

/// Value at sorted index `floor(q * n)`, clamped to the last element
///
/// `sorted` must already be ascending. Returns `None` for an empty slice.
pub fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let index = ((q * sorted.len() as f64).floor() as usize).min(sorted.len() - 1);
    Some(sorted[index])
}

/// Index of the highest value; the first one wins on ties
pub fn leader_index(values: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, value) in values.iter().enumerate() {
        match best {
            Some(b) if *value <= values[b] => {}
            _ => best = Some(i),
        }
    }
    best
}

/// 1-based rank of every value, descending, ties broken by position
pub fn ranks(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|a, b| {
        values[*b]
            .partial_cmp(&values[*a])
            .unwrap_or(Ordering::Equal)
    });
    let mut ranks = vec![0; values.len()];
    for (rank, index) in order.into_iter().enumerate() {
        ranks[index] = rank + 1;
    }
    ranks
}

/// Spread of a sampled quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spread {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Value at sorted index `floor(0.025 n)`
    pub lower: f64,
    /// Value at sorted index `floor(0.975 n)`
    pub upper: f64,
}

impl Spread {
    /// Summarize samples; `None` when there are none
    ///
    /// A zero-variance sample collapses to `lower == upper`.
    pub fn from_samples(mut samples: Vec<f64>) -> Option<Self> {
        sort_ascending(&mut samples);
        Some(Self {
            mean: mean(&samples),
            min: *samples.first()?,
            max: *samples.last()?,
            lower: percentile(&samples, 0.025)?,
            upper: percentile(&samples, 0.975)?,
        })
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}
