use super::Postprocessor;
use crate::action::{Action, ActionKind, FilterPhase};

/// Ensures that a DrySolution action is followed by a Filter action.
///
/// Paragraphs often leave the filtration of the desiccant implicit. When a
/// filtering step does appear a few actions later it usually belongs to
/// another operation (keeping a precipitate after concentration), so the
/// safe reading is to filter right after drying.
pub struct DrySolutionPostprocessor;

impl Postprocessor for DrySolutionPostprocessor {
    fn postprocess(&self, actions: &[Action]) -> Vec<Action> {
        let mut out: Vec<Action> = Vec::with_capacity(actions.len());
        for (i, action) in actions.iter().enumerate() {
            out.push(action.clone());
            if action.kind() != ActionKind::DrySolution {
                continue;
            }
            let next_is_filter = actions
                .get(i + 1)
                .is_some_and(|a| a.kind() == ActionKind::Filter);
            if !next_is_filter {
                out.push(Action::Filter {
                    phase_to_keep: Some(FilterPhase::Filtrate),
                });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dry_solution() -> Action {
        Action::DrySolution {
            material: Some("sodium sulfate".to_string()),
        }
    }

    #[test]
    fn inserts_a_filter_after_drysolution() {
        let out = DrySolutionPostprocessor.postprocess(&[dry_solution(), Action::Concentrate]);
        assert_eq!(
            out,
            vec![
                dry_solution(),
                Action::Filter {
                    phase_to_keep: Some(FilterPhase::Filtrate),
                },
                Action::Concentrate,
            ]
        );
    }

    #[test]
    fn existing_filter_is_not_duplicated() {
        let actions = vec![
            dry_solution(),
            Action::Filter {
                phase_to_keep: None,
            },
        ];
        assert_eq!(DrySolutionPostprocessor.postprocess(&actions), actions);
    }

    #[test]
    fn trailing_drysolution_gets_a_filter() {
        let out = DrySolutionPostprocessor.postprocess(&[dry_solution()]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].kind(), ActionKind::Filter);
    }
}
