use super::Postprocessor;
use crate::action::{Action, ActionKind};

/// Removes immediately repeated identical actions. Stir, Reflux, and
/// Microwave are exempt: repeating those is meaningful.
pub struct DuplicateActionsPostprocessor;

impl Postprocessor for DuplicateActionsPostprocessor {
    fn postprocess(&self, actions: &[Action]) -> Vec<Action> {
        let mut out: Vec<Action> = Vec::with_capacity(actions.len());
        let mut last: Option<&Action> = None;
        for action in actions {
            let repeatable = matches!(
                action.kind(),
                ActionKind::Stir | ActionKind::Reflux | ActionKind::Microwave
            );
            if last != Some(action) || repeatable {
                out.push(action.clone());
            }
            last = Some(action);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_consecutive_identical_actions() {
        let out = DuplicateActionsPostprocessor.postprocess(&[
            Action::Concentrate,
            Action::Concentrate,
            Action::Purify,
        ]);
        assert_eq!(out, vec![Action::Concentrate, Action::Purify]);
    }

    #[test]
    fn differing_parameters_are_not_duplicates() {
        let a = Action::DrySolution {
            material: Some("MgSO4".to_string()),
        };
        let b = Action::DrySolution {
            material: Some("Na2SO4".to_string()),
        };
        let actions = vec![a, b];
        assert_eq!(DuplicateActionsPostprocessor.postprocess(&actions), actions);
    }

    #[test]
    fn repeated_stir_is_kept() {
        let stir = Action::Stir {
            duration: Some("5 minutes".to_string()),
            temperature: None,
            atmosphere: None,
        };
        let actions = vec![stir.clone(), stir];
        assert_eq!(DuplicateActionsPostprocessor.postprocess(&actions), actions);
    }

    #[test]
    fn non_adjacent_duplicates_are_kept() {
        let actions = vec![Action::Concentrate, Action::Purify, Action::Concentrate];
        assert_eq!(DuplicateActionsPostprocessor.postprocess(&actions), actions);
    }
}
