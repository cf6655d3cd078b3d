//! Randomized augmentation of (text, actions) samples.
//!
//! Each augmenter substitutes one category of parameter value (compound
//! names, quantities, durations, temperatures) with candidates from a pool,
//! editing the action parameter and the matching literal in the source text
//! in the same step so the two representations never diverge. All randomness
//! comes from the injected generator; a fixed seed gives a fixed result.

mod attribute;
mod compound_name;
mod compound_quantity;

pub use attribute::{DurationAugmenter, TemperatureAugmenter};
pub use compound_name::CompoundNameAugmenter;
pub use compound_quantity::CompoundQuantityAugmenter;

use crate::sample::TextWithActions;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use tracing::warn;

// ---------------------------------------------------------------------------
// Augmenter
// ---------------------------------------------------------------------------

pub trait Augmenter {
    /// Generates a new sample that has potentially been data-augmented.
    fn augment(&self, sample: &TextWithActions, rng: &mut dyn RngCore) -> TextWithActions;
}

// ---------------------------------------------------------------------------
// SubstitutionPool
// ---------------------------------------------------------------------------

/// Substitution probability and candidate values, fixed at construction.
pub struct SubstitutionPool {
    probability: f64,
    values: Vec<String>,
}

impl SubstitutionPool {
    /// Panics if `probability` is outside `[0, 1]`. An empty `values` pool is
    /// allowed and turns the owning augmenter into a no-op.
    pub fn new(probability: f64, values: Vec<String>) -> Self {
        assert!(
            (0.0..=1.0).contains(&probability),
            "substitution probability must be within [0, 1]"
        );
        if values.is_empty() {
            warn!("empty candidate pool: augmentation degrades to a no-op");
        }
        Self {
            probability,
            values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn passes(&self, rng: &mut dyn RngCore) -> bool {
        rng.random::<f64>() < self.probability
    }

    pub(crate) fn draw(&self, rng: &mut dyn RngCore) -> Option<&str> {
        self.values.choose(rng).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// AugmenterPipeline
// ---------------------------------------------------------------------------

/// Feeds a sample through several augmenters in sequence. The augmenters are
/// independent, but their order fixes the sequence of random draws, so keep
/// it stable when reproducibility matters.
pub struct AugmenterPipeline {
    augmenters: Vec<Box<dyn Augmenter>>,
}

impl AugmenterPipeline {
    pub fn new(augmenters: Vec<Box<dyn Augmenter>>) -> Self {
        Self { augmenters }
    }
}

impl Augmenter for AugmenterPipeline {
    fn augment(&self, sample: &TextWithActions, rng: &mut dyn RngCore) -> TextWithActions {
        let mut out = sample.clone();
        for augmenter in &self.augmenters {
            out = augmenter.augment(&out, rng);
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Candidate selection
// ---------------------------------------------------------------------------

/// Deduplicates candidate literals, keeping first-occurrence order, and drops
/// any literal contained in a longer one: substituting "0 °C" while "10 °C"
/// is also present would corrupt the longer literal in the text. Empty
/// literals have no anchor and are dropped as well.
pub(crate) fn substitution_candidates<I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut unique: Vec<String> = Vec::new();
    for value in values {
        if value.is_empty() || unique.contains(&value) {
            continue;
        }
        unique.push(value);
    }
    unique
        .iter()
        .filter(|value| {
            !unique
                .iter()
                .any(|other| other != *value && other.contains(value.as_str()))
        })
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn candidates_keep_first_occurrence_order() {
        let candidates = substitution_candidates(
            ["2 h", "30 minutes", "2 h", "overnight"]
                .iter()
                .map(|s| s.to_string()),
        );
        assert_eq!(candidates, vec!["2 h", "30 minutes", "overnight"]);
    }

    #[test]
    fn candidates_drop_contained_literals() {
        let candidates =
            substitution_candidates(["0 °C", "10 °C"].iter().map(|s| s.to_string()));
        assert_eq!(candidates, vec!["10 °C"]);
    }

    #[test]
    fn candidates_drop_empty_literals() {
        let candidates = substitution_candidates(["", "1 h"].iter().map(|s| s.to_string()));
        assert_eq!(candidates, vec!["1 h"]);
    }

    #[test]
    fn pipeline_is_deterministic_for_a_fixed_seed() {
        let sample = TextWithActions::new(
            "The mixture was stirred overnight at 0 °C.",
            vec![Action::Stir {
                duration: Some("overnight".to_string()),
                temperature: Some("0 °C".to_string()),
                atmosphere: None,
            }],
        );
        let pipeline = AugmenterPipeline::new(vec![
            Box::new(DurationAugmenter::new(
                0.5,
                vec!["15 minutes".to_string(), "3 h".to_string()],
            )),
            Box::new(TemperatureAugmenter::new(
                0.5,
                vec!["25 °C".to_string(), "reflux".to_string()],
            )),
        ]);

        let mut rng_a = StdRng::seed_from_u64(17);
        let mut rng_b = StdRng::seed_from_u64(17);
        assert_eq!(
            pipeline.augment(&sample, &mut rng_a),
            pipeline.augment(&sample, &mut rng_b)
        );
    }

    #[test]
    #[should_panic(expected = "probability must be within")]
    fn out_of_range_probability_panics() {
        SubstitutionPool::new(1.5, vec!["x".to_string()]);
    }
}
