use super::{substitution_candidates, Augmenter, SubstitutionPool};
use crate::action::Action;
use crate::sample::TextWithActions;
use rand::RngCore;

// ---------------------------------------------------------------------------
// Attribute substitution core
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Attribute {
    Duration,
    Temperature,
}

impl Attribute {
    fn get(self, action: &Action) -> Option<&str> {
        match self {
            Attribute::Duration => action.duration(),
            Attribute::Temperature => action.temperature(),
        }
    }

    fn set(self, action: &mut Action, value: &str) -> bool {
        match self {
            Attribute::Duration => action.set_duration(value),
            Attribute::Temperature => action.set_temperature(value),
        }
    }
}

/// Substitutes one free-text attribute of actions (durations or
/// temperatures) in the actions and the source text together.
struct AttributeAugmenter {
    pool: SubstitutionPool,
    attribute: Attribute,
}

impl AttributeAugmenter {
    fn augment(&self, sample: &TextWithActions, rng: &mut dyn RngCore) -> TextWithActions {
        let mut out = sample.clone();
        if self.pool.is_empty() {
            return out;
        }

        let candidates = substitution_candidates(
            out.actions
                .iter()
                .filter_map(|a| self.attribute.get(a).map(str::to_string)),
        );

        for value in candidates {
            if !self.pool.passes(rng) || !out.text.contains(&value) {
                continue;
            }
            let Some(new_value) = self.pool.draw(rng) else {
                continue;
            };
            out.text = out.text.replace(&value, new_value);
            for action in &mut out.actions {
                if self.attribute.get(action) == Some(value.as_str()) {
                    self.attribute.set(action, new_value);
                }
            }
        }

        out
    }
}

// ---------------------------------------------------------------------------
// Concrete augmenters
// ---------------------------------------------------------------------------

/// Augments data by substituting action durations.
pub struct DurationAugmenter {
    inner: AttributeAugmenter,
}

impl DurationAugmenter {
    pub fn new(probability: f64, durations: Vec<String>) -> Self {
        Self {
            inner: AttributeAugmenter {
                pool: SubstitutionPool::new(probability, durations),
                attribute: Attribute::Duration,
            },
        }
    }
}

impl Augmenter for DurationAugmenter {
    fn augment(&self, sample: &TextWithActions, rng: &mut dyn RngCore) -> TextWithActions {
        self.inner.augment(sample, rng)
    }
}

/// Augments data by substituting action temperatures.
pub struct TemperatureAugmenter {
    inner: AttributeAugmenter,
}

impl TemperatureAugmenter {
    pub fn new(probability: f64, temperatures: Vec<String>) -> Self {
        Self {
            inner: AttributeAugmenter {
                pool: SubstitutionPool::new(probability, temperatures),
                attribute: Attribute::Temperature,
            },
        }
    }
}

impl Augmenter for TemperatureAugmenter {
    fn augment(&self, sample: &TextWithActions, rng: &mut dyn RngCore) -> TextWithActions {
        self.inner.augment(sample, rng)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
