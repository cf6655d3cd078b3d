use super::Postprocessor;
use crate::action::{Action, ActionKind};

/// Removes Purify actions, for consumers that handle purification outside
/// the predicted sequence.
pub struct RemovePurifyPostprocessor;

impl Postprocessor for RemovePurifyPostprocessor {
    fn postprocess(&self, actions: &[Action]) -> Vec<Action> {
        actions
            .iter()
            .filter(|a| a.kind() != ActionKind::Purify)
            .cloned()
            .collect()
    }
}
