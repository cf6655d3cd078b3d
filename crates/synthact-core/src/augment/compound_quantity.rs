use super::{substitution_candidates, Augmenter, SubstitutionPool};
use crate::sample::TextWithActions;
use rand::RngCore;

/// Augments data by substituting compound quantities.
///
/// Adding or removing quantities is not considered: that would also require
/// structural changes to the text.
pub struct CompoundQuantityAugmenter {
    pool: SubstitutionPool,
}

impl CompoundQuantityAugmenter {
    pub fn new(probability: f64, quantities: Vec<String>) -> Self {
        Self {
            pool: SubstitutionPool::new(probability, quantities),
        }
    }
}

impl Augmenter for CompoundQuantityAugmenter {
    fn augment(&self, sample: &TextWithActions, rng: &mut dyn RngCore) -> TextWithActions {
        let mut out = sample.clone();
        if self.pool.is_empty() {
            return out;
        }

        let candidates = substitution_candidates(
            out.actions
                .iter()
                .flat_map(|a| a.chemicals())
                .flat_map(|c| c.quantity.iter().cloned()),
        );

        for quantity in candidates {
            if !self.pool.passes(rng) || !out.text.contains(&quantity) {
                continue;
            }
            let Some(new_quantity) = self.pool.draw(rng) else {
                continue;
            };
            out.text = out.text.replace(&quantity, new_quantity);
            for action in &mut out.actions {
                for chemical in action.chemicals_mut() {
                    for entry in &mut chemical.quantity {
                        if *entry == quantity {
                            *entry = new_quantity.to_string();
                        }
                    }
                }
            }
        }

        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
