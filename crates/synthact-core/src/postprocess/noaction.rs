use super::Postprocessor;
use crate::action::{Action, ActionKind};

/// Removes NOACTION placeholders. A sequence that loses all its actions is
/// left empty: nothing is substituted.
pub struct NoActionPostprocessor;

impl Postprocessor for NoActionPostprocessor {
    fn postprocess(&self, actions: &[Action]) -> Vec<Action> {
        actions
            .iter()
            .filter(|a| a.kind() != ActionKind::NoAction)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_every_noaction() {
        let out = NoActionPostprocessor.postprocess(&[
            Action::NoAction,
            Action::Concentrate,
            Action::NoAction,
            Action::Purify,
            Action::NoAction,
        ]);
        assert_eq!(out, vec![Action::Concentrate, Action::Purify]);
    }

    #[test]
    fn all_noaction_input_becomes_empty() {
        let out = NoActionPostprocessor.postprocess(&[Action::NoAction, Action::NoAction]);
        assert!(out.is_empty());
    }
}
