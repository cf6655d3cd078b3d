//! Rule-based cleanup of predicted action sequences.
//!
//! Each rule is a single deterministic forward pass; chained together they
//! bring raw model output into an executable form: no NOACTION placeholders,
//! no ambiguous FILTER, no WAIT step next to an action that could have
//! carried its duration.

mod dry_solution;
mod duplicates;
mod filter;
mod initial_make_solution;
mod noaction;
mod purify;
mod same_temperature;
mod wait;

pub use dry_solution::DrySolutionPostprocessor;
pub use duplicates::DuplicateActionsPostprocessor;
pub use filter::FilterPostprocessor;
pub use initial_make_solution::InitialMakeSolutionPostprocessor;
pub use noaction::NoActionPostprocessor;
pub use purify::RemovePurifyPostprocessor;
pub use same_temperature::SameTemperaturePostprocessor;
pub use wait::WaitPostprocessor;

use crate::action::Action;

// ---------------------------------------------------------------------------
// Postprocessor
// ---------------------------------------------------------------------------

/// A deterministic rewrite of an action sequence (merging, removal, edition).
///
/// Total over any well-formed input: whatever a rule does not specifically
/// handle passes through unchanged. Applicable to single sentences and to
/// full paragraphs alike.
pub trait Postprocessor {
    fn postprocess(&self, actions: &[Action]) -> Vec<Action>;
}

// ---------------------------------------------------------------------------
// PostprocessorCombiner
// ---------------------------------------------------------------------------

/// Applies postprocessors in a fixed order, each consuming the previous
/// one's output. The stages do not commute, so the order is part of the
/// configuration.
pub struct PostprocessorCombiner {
    postprocessors: Vec<Box<dyn Postprocessor>>,
}

impl PostprocessorCombiner {
    pub fn new(postprocessors: Vec<Box<dyn Postprocessor>>) -> Self {
        Self { postprocessors }
    }

    /// The standard inference-time chain: drop NOACTION placeholders, fold
    /// WAIT durations into their preceding action, then disambiguate FILTER.
    pub fn default_chain() -> Self {
        Self::new(vec![
            Box::new(NoActionPostprocessor),
            Box::new(WaitPostprocessor::new()),
            Box::new(FilterPostprocessor::new()),
        ])
    }
}

impl Postprocessor for PostprocessorCombiner {
    fn postprocess(&self, actions: &[Action]) -> Vec<Action> {
        let mut actions = actions.to_vec();
        for postprocessor in &self.postprocessors {
            actions = postprocessor.postprocess(&actions);
        }
        actions
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{ActionStringConverter, ReadableConverter};

    #[test]
    fn default_chain_cleans_a_raw_predicted_string() {
        let converter = ReadableConverter::new();
        let raw = converter
            .string_to_actions(
                "NOACTION; STIR at 5 °C; WAIT for 10 minutes; FILTER; DRYSOLUTION over sodium sulfate.",
            )
            .unwrap();
        let cleaned = PostprocessorCombiner::default_chain().postprocess(&raw);
        assert_eq!(
            converter.actions_to_string(&cleaned),
            "STIR for 10 minutes at 5 °C; FILTER keep filtrate; DRYSOLUTION over sodium sulfate."
        );
    }

    #[test]
    fn default_chain_reaches_a_fixed_point_in_one_pass() {
        let converter = ReadableConverter::new();
        let inputs = [
            "NOACTION; STIR at 5 °C; WAIT for 10 minutes; FILTER; DRYSOLUTION over sodium sulfate.",
            "SETTEMPERATURE 0 °C; WAIT for 2 h; NOACTION.",
            "FILTER; DRYSOLID at 60 °C; WAIT for 1 h.",
            "NOACTION; NOACTION.",
            ".",
        ];
        let chain = PostprocessorCombiner::default_chain();
        for input in inputs {
            let raw = converter.string_to_actions(input).unwrap();
            let once = chain.postprocess(&raw);
            assert_eq!(chain.postprocess(&once), once, "not idempotent for {input}");
        }
    }

    #[test]
    fn removing_every_action_leaves_the_sequence_empty() {
        let raw = ReadableConverter::new()
            .string_to_actions("NOACTION; NOACTION.")
            .unwrap();
        assert!(PostprocessorCombiner::default_chain()
            .postprocess(&raw)
            .is_empty());
    }

    #[test]
    fn empty_combiner_is_the_identity() {
        let raw = ReadableConverter::new()
            .string_to_actions("NOACTION; PURIFY.")
            .unwrap();
        assert_eq!(PostprocessorCombiner::new(Vec::new()).postprocess(&raw), raw);
    }

    #[test]
    fn extended_chain_applies_supplementary_rules() {
        let converter = ReadableConverter::new();
        let raw = converter
            .string_to_actions(
                "MAKESOLUTION with THF (10 mL) and NaH (2 g); ADD SLN; CONCENTRATE; CONCENTRATE; DRYSOLUTION over MgSO4; PURIFY.",
            )
            .unwrap();
        let chain = PostprocessorCombiner::new(vec![
            Box::new(InitialMakeSolutionPostprocessor),
            Box::new(DuplicateActionsPostprocessor),
            Box::new(DrySolutionPostprocessor),
            Box::new(RemovePurifyPostprocessor),
            Box::new(FilterPostprocessor::new()),
        ]);
        let cleaned = chain.postprocess(&raw);
        assert_eq!(
            converter.actions_to_string(&cleaned),
            "ADD THF (10 mL); ADD NaH (2 g); CONCENTRATE; DRYSOLUTION over MgSO4; FILTER keep filtrate."
        );
    }
}
