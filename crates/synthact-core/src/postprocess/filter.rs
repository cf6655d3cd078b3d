use super::Postprocessor;
use crate::action::{Action, ActionKind, FilterPhase};

/// Decides what a bare FILTER keeps.
///
/// Model output frequently leaves the phase implicit. The neighboring actions
/// usually disambiguate it: a drying or concentration step works on the
/// filtrate, drying a solid means the precipitate was kept. A FILTER that no
/// neighbor explains defaults to the filtrate, so that none stays ambiguous.
pub struct FilterPostprocessor {
    pre_filtrate: Vec<ActionKind>,
    post_filtrate: Vec<ActionKind>,
    pre_precipitate: Vec<ActionKind>,
    post_precipitate: Vec<ActionKind>,
}

impl FilterPostprocessor {
    pub fn new() -> Self {
        Self {
            pre_filtrate: vec![ActionKind::DrySolution],
            post_filtrate: vec![ActionKind::Concentrate, ActionKind::DrySolution],
            pre_precipitate: Vec::new(),
            post_precipitate: vec![ActionKind::DrySolid],
        }
    }

    fn inferred_phase(&self, prev: Option<ActionKind>, next: Option<ActionKind>) -> FilterPhase {
        if let Some(prev) = prev {
            if self.pre_filtrate.contains(&prev) {
                return FilterPhase::Filtrate;
            }
            if self.pre_precipitate.contains(&prev) {
                return FilterPhase::Precipitate;
            }
        }
        if let Some(next) = next {
            if self.post_filtrate.contains(&next) {
                return FilterPhase::Filtrate;
            }
            if self.post_precipitate.contains(&next) {
                return FilterPhase::Precipitate;
            }
        }
        FilterPhase::Filtrate
    }
}

impl Default for FilterPostprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Postprocessor for FilterPostprocessor {
    fn postprocess(&self, actions: &[Action]) -> Vec<Action> {
        let kinds: Vec<ActionKind> = actions.iter().map(Action::kind).collect();
        let mut out = actions.to_vec();
        for (i, action) in out.iter_mut().enumerate() {
            if let Action::Filter {
                phase_to_keep: phase @ None,
            } = action
            {
                let prev = (i > 0).then(|| kinds[i - 1]);
                let next = kinds.get(i + 1).copied();
                *phase = Some(self.inferred_phase(prev, next));
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_filter() -> Action {
        Action::Filter {
            phase_to_keep: None,
        }
    }

    fn phase_of(action: &Action) -> Option<FilterPhase> {
        match action {
            Action::Filter { phase_to_keep } => *phase_to_keep,
            _ => panic!("expected a Filter action"),
        }
    }

    #[test]
    fn filter_before_drysolid_keeps_the_precipitate() {
        let out = FilterPostprocessor::new().postprocess(&[
            bare_filter(),
            Action::DrySolid {
                duration: None,
                temperature: None,
                atmosphere: None,
            },
        ]);
        assert_eq!(phase_of(&out[0]), Some(FilterPhase::Precipitate));
    }

    #[test]
    fn filter_before_concentrate_keeps_the_filtrate() {
        let out =
            FilterPostprocessor::new().postprocess(&[bare_filter(), Action::Concentrate]);
        assert_eq!(phase_of(&out[0]), Some(FilterPhase::Filtrate));
    }

    #[test]
    fn filter_after_drysolution_keeps_the_filtrate() {
        let out = FilterPostprocessor::new().postprocess(&[
            Action::DrySolution {
                material: Some("MgSO4".to_string()),
            },
            bare_filter(),
            Action::DrySolid {
                duration: None,
                temperature: None,
                atmosphere: None,
            },
        ]);
        // The preceding drying step wins over the following one.
        assert_eq!(phase_of(&out[1]), Some(FilterPhase::Filtrate));
    }

    #[test]
    fn isolated_filter_defaults_to_the_filtrate() {
        let out = FilterPostprocessor::new().postprocess(&[bare_filter()]);
        assert_eq!(phase_of(&out[0]), Some(FilterPhase::Filtrate));
    }

    #[test]
    fn explicit_phase_is_untouched() {
        let explicit = Action::Filter {
            phase_to_keep: Some(FilterPhase::Precipitate),
        };
        let out = FilterPostprocessor::new().postprocess(&[explicit.clone(), Action::Concentrate]);
        assert_eq!(out[0], explicit);
    }
}
