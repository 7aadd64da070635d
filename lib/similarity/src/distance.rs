//! Per-dimension scoring functions
//!
//! Each scorer compares one section of a candidate with the target.
//! Dimension scorers return a score in range [0.0, 100.0] where 100.0 means
//! identical; [`bigram_similarity`] returns [0.0, 1.0] like a plain index.
//! Every division is guarded: an empty divisor yields 0, never NaN.

use glossa_core::{clamp_score, PhonemeTable};
use std::collections::HashSet;

/// Scale converting phoneme divergence (bits) into score points.
///
/// Calibrated on the reference families: the Hattusha-dialect Hurrian
/// distribution (divergence ~0.03) lands near 85 and the Kartvelian
/// distribution (divergence ~0.36) lands at 0. Changing it shifts every
/// vowel-system score and therefore every downstream verdict.
pub const VOWEL_DIVERGENCE_SCALE: f64 = 500.0;

/// Divergence of the candidate distribution from the target's
///
/// Computes `sum(p_t * log2(p_t / p_c))` over the target alphabet, with
/// percentages converted to proportions. Phonemes absent (or zero) on either
/// side contribute nothing.
pub fn phoneme_divergence(target: &PhonemeTable, candidate: &PhonemeTable) -> f64 {
    target
        .iter()
        .map(|(symbol, t)| {
            let t = t / 100.0;
            let c = candidate.get(symbol).copied().unwrap_or(0.0) / 100.0;
            if t > 0.0 && c > 0.0 {
                t * (t / c).log2()
            } else {
                0.0
            }
        })
        .sum()
}

/// Convert a divergence into a 0-100 score
#[inline]
pub fn divergence_to_score(divergence: f64) -> f64 {
    clamp_score(100.0 - divergence * VOWEL_DIVERGENCE_SCALE)
}

/// Score the vowel system, picking whichever distribution matches best
///
/// Regional variants are alternatives, not samples: the variant with the
/// smallest divergence wins.
pub fn vowel_score(target: &PhonemeTable, primary: &PhonemeTable, variants: &[PhonemeTable]) -> f64 {
    let best = std::iter::once(primary)
        .chain(variants.iter())
        .map(|table| phoneme_divergence(target, table))
        .fold(f64::INFINITY, f64::min);
    divergence_to_score(best)
}

/// Percentage of features whose candidate value equals the target value
///
/// A feature the candidate does not define counts as a non-match.
pub fn feature_overlap(target: &[bool], candidate: &[Option<bool>]) -> f64 {
    if target.is_empty() {
        return 0.0;
    }
    let matches = target
        .iter()
        .zip(candidate.iter())
        .filter(|(t, c)| **c == Some(**t))
        .count();
    clamp_score(matches as f64 / target.len() as f64 * 100.0)
}

/// Arithmetic mean of already-normalized 0-100 values
///
/// Used for both case-suffix similarity and vocabulary matches, which are
/// aligned (and zero-filled) against the same key list for every candidate.
pub fn mean_score(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    clamp_score(values.iter().sum::<f64>() / values.len() as f64)
}

/// Character bigram set of a word (lowercased)
pub fn bigrams(word: &str) -> HashSet<(char, char)> {
    let chars: Vec<char> = word.to_lowercase().chars().collect();
    chars.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Jaccard overlap of the character bigram sets of two words
///
/// Returns 0.0 when either word is shorter than two characters.
pub fn bigram_similarity(a: &str, b: &str) -> f64 {
    jaccard(&bigrams(a), &bigrams(b))
}

/// Jaccard index of two bigram sets; 0.0 if either is empty
pub fn jaccard(a: &HashSet<(char, char)>, b: &HashSet<(char, char)>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}
