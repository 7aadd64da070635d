//! Lexical chance control
//!
//! Asks whether the observed words resemble a reference lexicon more than
//! random words with the same syllable structure would. The null
//! distribution comes from synthetic lexicons of pseudo-words: each syllable
//! is a consonant onset drawn uniformly (the empty onset is allowed) plus a
//! vowel drawn with the target's empirical vowel weights.

use crate::stats::{mean, percentile, sort_ascending};
use glossa_core::{Error, PhonemeTable, Result};
use glossa_similarity::{bigrams, jaccard};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

/// Default number of synthetic lexicons
pub const DEFAULT_PSEUDO_LEXICONS: usize = 1_000;

pub const MIN_SYLLABLES: usize = 2;
pub const MAX_SYLLABLES: usize = 5;

/// Always attached to the report
pub const CHANCE_CAVEAT: &str = "This excludes chance resemblance under a simple syllable model; \
    it is not evidence of a linguistic relationship.";

type Bigrams = HashSet<(char, char)>;

/// Random CV-syllable word source
#[derive(Debug, Clone)]
pub struct PseudoWordGenerator {
    consonants: Vec<String>,
    vowels: Vec<String>,
    vowel_weights: WeightedIndex<f64>,
}

impl PseudoWordGenerator {
    /// Build from a consonant inventory and a vowel-frequency table
    ///
    /// Include `""` in `consonants` to allow vowel-only syllables.
    pub fn new(consonants: Vec<String>, vowels: &PhonemeTable) -> Result<Self> {
        if consonants.is_empty() {
            return Err(Error::InvalidParameter(
                "consonant inventory is empty".to_string(),
            ));
        }
        let vowel_weights = WeightedIndex::new(vowels.values().copied())
            .map_err(|e| Error::InvalidParameter(format!("vowel weights: {}", e)))?;

        Ok(Self {
            consonants,
            vowels: vowels.keys().cloned().collect(),
            vowel_weights,
        })
    }

    /// One pseudo-word of 2-5 syllables
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let syllables = rng.random_range(MIN_SYLLABLES..=MAX_SYLLABLES);
        let mut word = String::new();
        for _ in 0..syllables {
            let consonant = &self.consonants[rng.random_range(0..self.consonants.len())];
            let vowel = &self.vowels[self.vowel_weights.sample(rng)];
            word.push_str(consonant);
            word.push_str(vowel);
        }
        word
    }

    /// A lexicon of `size` pseudo-words
    pub fn lexicon<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Vec<String> {
        (0..size).map(|_| self.generate(rng)).collect()
    }
}

/// Mean over `words` of the best bigram similarity to any reference word
pub fn lexical_similarity<S: AsRef<str>>(words: &[S], reference: &[Bigrams]) -> f64 {
    let best: Vec<f64> = words
        .iter()
        .map(|word| {
            let word = bigrams(word.as_ref());
            reference
                .iter()
                .map(|r| jaccard(&word, r))
                .fold(0.0, f64::max)
        })
        .collect();
    mean(&best)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChanceVerdict {
    /// p < 0.01
    HighlySignificant,
    /// p < 0.05
    Significant,
    NotSignificant,
}

impl ChanceVerdict {
    pub fn from_p_value(p: f64) -> Self {
        if p < 0.01 {
            ChanceVerdict::HighlySignificant
        } else if p < 0.05 {
            ChanceVerdict::Significant
        } else {
            ChanceVerdict::NotSignificant
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChanceControlReport {
    pub lexicons: usize,
    pub words: usize,
    pub observed_mean: f64,
    pub null_mean: f64,
    /// `observed_mean / null_mean`; absent when the null mean is 0
    pub ratio: Option<f64>,
    /// Fraction of synthetic lexicons scoring at least the observed mean
    pub p_value: f64,
    pub percentile_95: f64,
    pub percentile_99: f64,
    pub verdict: ChanceVerdict,
    pub caveat: &'static str,
}

#[derive(Debug, Clone)]
pub struct ChanceControlEngine {
    lexicons: usize,
}

impl Default for ChanceControlEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PSEUDO_LEXICONS)
    }
}

impl ChanceControlEngine {
    pub fn new(lexicons: usize) -> Self {
        Self { lexicons }
    }

    pub fn lexicons(&self) -> usize {
        self.lexicons
    }

    /// Compare `observed` against `reference` and against synthetic lexicons
    /// of the same size
    pub fn run<R: Rng + ?Sized>(
        &self,
        observed: &[String],
        reference: &[String],
        generator: &PseudoWordGenerator,
        rng: &mut R,
    ) -> Result<ChanceControlReport> {
        if self.lexicons == 0 {
            return Err(Error::Degenerate("chance control needs at least one pseudo-lexicon".to_string()));
        }
        if observed.is_empty() {
            return Err(Error::Degenerate("no observed words".to_string()));
        }
        if reference.is_empty() {
            return Err(Error::Degenerate("no reference words".to_string()));
        }

        debug!(
            lexicons = self.lexicons,
            words = observed.len(),
            reference = reference.len(),
            "starting chance control"
        );

        let reference: Vec<Bigrams> = reference.iter().map(|w| bigrams(w)).collect();
        let observed_mean = lexical_similarity(observed, &reference);

        let mut null: Vec<f64> = (0..self.lexicons)
            .map(|_| lexical_similarity(&generator.lexicon(observed.len(), rng), &reference))
            .collect();

        let at_least = null.iter().filter(|v| **v >= observed_mean).count();
        let p_value = at_least as f64 / self.lexicons as f64;
        let null_mean = mean(&null);

        sort_ascending(&mut null);
        let percentile_95 = percentile(&null, 0.95).unwrap_or(0.0);
        let percentile_99 = percentile(&null, 0.99).unwrap_or(0.0);
        let verdict = ChanceVerdict::from_p_value(p_value);

        info!(observed_mean, null_mean, p_value, ?verdict, "chance control complete");

        Ok(ChanceControlReport {
            lexicons: self.lexicons,
            words: observed.len(),
            observed_mean,
            null_mean,
            ratio: (null_mean > 0.0).then(|| observed_mean / null_mean),
            p_value,
            percentile_95,
            percentile_99,
            verdict,
            caveat: CHANCE_CAVEAT,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn consonants() -> Vec<String> {
        ["", "d", "k", "m", "n", "p", "r", "s", "t"]
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    fn vowels() -> PhonemeTable {
        PhonemeTable::from([
            ("a".to_string(), 43.3),
            ("e".to_string(), 14.4),
            ("i".to_string(), 20.6),
            ("o".to_string(), 4.1),
            ("u".to_string(), 17.5),
        ])
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn reference() -> Vec<String> {
        words(&["attai", "sarri", "une", "tani", "ame", "ebri", "enni", "asti", "neri", "kelu"])
    }

    #[test]
    fn test_generated_words_follow_syllable_model() {
        let generator = PseudoWordGenerator::new(consonants(), &vowels()).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..200 {
            let word = generator.generate(&mut rng);
            let vowel_count = word.chars().filter(|c| "aeiou".contains(*c)).count();
            assert!((MIN_SYLLABLES..=MAX_SYLLABLES).contains(&vowel_count), "{}", word);
            assert!(word.ends_with(|c: char| "aeiou".contains(c)));
        }
    }

    #[test]
    fn test_vowel_weights_are_respected() {
        let generator = PseudoWordGenerator::new(vec![String::new()], &vowels()).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        let text: String = generator.lexicon(2_000, &mut rng).concat();
        let a = text.chars().filter(|c| *c == 'a').count();
        let o = text.chars().filter(|c| *c == 'o').count();
        assert!(a > 5 * o);
    }

    #[test]
    fn test_generator_rejects_bad_inventories() {
        assert!(PseudoWordGenerator::new(Vec::new(), &vowels()).is_err());
        assert!(PseudoWordGenerator::new(consonants(), &PhonemeTable::new()).is_err());
        let zeros = PhonemeTable::from([("a".to_string(), 0.0)]);
        assert!(PseudoWordGenerator::new(consonants(), &zeros).is_err());
    }

    #[test]
    fn test_lexical_similarity() {
        let reference: Vec<Bigrams> = reference().iter().map(|w| bigrams(w)).collect();
        assert_eq!(lexical_similarity(&["attai"], &reference), 1.0);
        assert_eq!(lexical_similarity(&["x"], &reference), 0.0);
        // "atai" vs "attai": 3 shared of 4 distinct bigrams
        assert!((lexical_similarity(&["atai", "attai"], &reference) - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_verdict_bands() {
        assert_eq!(ChanceVerdict::from_p_value(0.0), ChanceVerdict::HighlySignificant);
        assert_eq!(ChanceVerdict::from_p_value(0.03), ChanceVerdict::Significant);
        assert_eq!(ChanceVerdict::from_p_value(0.05), ChanceVerdict::NotSignificant);
    }

    #[test]
    fn test_copied_lexicon_is_significant() {
        let generator = PseudoWordGenerator::new(consonants(), &vowels()).unwrap();
        let report = ChanceControlEngine::new(200)
            .run(&reference(), &reference(), &generator, &mut StdRng::seed_from_u64(1))
            .unwrap();

        assert_eq!(report.observed_mean, 1.0);
        assert_eq!(report.p_value, 0.0);
        assert_eq!(report.verdict, ChanceVerdict::HighlySignificant);
        assert!(report.ratio.unwrap() > 1.0);
        assert!(report.percentile_95 <= report.percentile_99);
        assert_eq!(report.caveat, CHANCE_CAVEAT);
    }

    #[test]
    fn test_pseudo_words_are_not_significant_on_average() {
        // Observed words drawn from the null model itself give roughly uniform p-values
        let generator = PseudoWordGenerator::new(consonants(), &vowels()).unwrap();
        let engine = ChanceControlEngine::new(100);
        let mut rng = StdRng::seed_from_u64(2024);

        let runs = 40;
        let mut total = 0.0;
        for _ in 0..runs {
            let observed = generator.lexicon(9, &mut rng);
            total += engine.run(&observed, &reference(), &generator, &mut rng).unwrap().p_value;
        }
        let average = total / runs as f64;
        assert!(average > 0.3 && average < 0.8, "average p-value {}", average);
    }

    #[test]
    fn test_degenerate_inputs() {
        let generator = PseudoWordGenerator::new(consonants(), &vowels()).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let observed = words(&["atai"]);

        assert!(matches!(
            ChanceControlEngine::new(0).run(&observed, &reference(), &generator, &mut rng),
            Err(Error::Degenerate(_))
        ));
        assert!(matches!(
            ChanceControlEngine::new(10).run(&[], &reference(), &generator, &mut rng),
            Err(Error::Degenerate(_))
        ));
        assert!(matches!(
            ChanceControlEngine::new(10).run(&observed, &[], &generator, &mut rng),
            Err(Error::Degenerate(_))
        ));
    }
}
