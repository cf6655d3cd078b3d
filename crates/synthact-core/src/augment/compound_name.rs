use super::{substitution_candidates, Augmenter, SubstitutionPool};
use crate::action::extract_chemicals;
use crate::sample::TextWithActions;
use rand::RngCore;
use regex::{NoExpand, Regex};

/// Augments data by substituting compound names.
pub struct CompoundNameAugmenter {
    pool: SubstitutionPool,
}

impl CompoundNameAugmenter {
    pub fn new(probability: f64, compounds: Vec<String>) -> Self {
        Self {
            pool: SubstitutionPool::new(probability, compounds),
        }
    }
}

impl Augmenter for CompoundNameAugmenter {
    fn augment(&self, sample: &TextWithActions, rng: &mut dyn RngCore) -> TextWithActions {
        let mut out = sample.clone();
        if self.pool.is_empty() {
            return out;
        }

        let candidates = substitution_candidates(
            extract_chemicals(&out.actions)
                .iter()
                .map(|c| c.name.clone()),
        );

        for name in candidates {
            if !self.pool.passes(rng) {
                continue;
            }
            // Replace at word boundaries only, to avoid things like
            // 'H2SO4' -> 'waterSO4' when replacing 'H2' by 'water'.
            let Ok(pattern) = Regex::new(&format!(r"\b{}\b", regex::escape(&name))) else {
                continue;
            };
            if !pattern.is_match(&out.text) {
                continue;
            }
            let Some(new_name) = self.pool.draw(rng) else {
                continue;
            };
            out.text = pattern.replace_all(&out.text, NoExpand(new_name)).into_owned();
            for action in &mut out.actions {
                for chemical in action.chemicals_mut() {
                    if chemical.name == name {
                        chemical.name = new_name.to_string();
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
