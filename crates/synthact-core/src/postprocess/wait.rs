use super::Postprocessor;
use crate::action::{Action, ActionKind};
use crate::grammar::{template, ParamTag};

/// Folds a WAIT step into the action just before it.
///
/// A WAIT without its own temperature that follows an action with an empty
/// duration slot is that action's duration, not a separate step. A bare
/// SETTEMPERATURE followed by WAIT becomes a STIR at that temperature.
/// ADD never absorbs: its duration slot is the addition time. WAITs that
/// cannot be merged are kept as they are.
pub struct WaitPostprocessor {
    ineligible: Vec<ActionKind>,
}

impl WaitPostprocessor {
    pub fn new() -> Self {
        Self {
            ineligible: vec![ActionKind::Add],
        }
    }

    fn can_absorb(&self, action: &Action) -> bool {
        !self.ineligible.contains(&action.kind())
            && template(action.kind()).has_param(ParamTag::Duration)
            && action.duration().is_none()
    }
}

impl Default for WaitPostprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Postprocessor for WaitPostprocessor {
    fn postprocess(&self, actions: &[Action]) -> Vec<Action> {
        // Consumed WAITs become None and are compacted away at the end.
        let mut updated: Vec<Option<Action>> = actions.iter().cloned().map(Some).collect();

        for i in 0..updated.len().saturating_sub(1) {
            let duration = match &updated[i + 1] {
                Some(Action::Wait {
                    duration,
                    temperature: None,
                }) => duration.clone(),
                _ => continue,
            };
            let mut first = match &updated[i] {
                Some(action) => action.clone(),
                None => continue,
            };
            if let Action::SetTemperature { temperature } = &first {
                first = Action::Stir {
                    duration: None,
                    temperature: Some(temperature.clone()),
                    atmosphere: None,
                };
            }
            if !self.can_absorb(&first) {
                continue;
            }
            first.set_duration(duration);
            updated[i] = Some(first);
            updated[i + 1] = None;
        }

        updated.into_iter().flatten().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn wait(duration: &str) -> Action {
        Action::Wait {
            duration: duration.to_string(),
            temperature: None,
        }
    }

    fn stir(duration: Option<&str>, temperature: Option<&str>) -> Action {
        Action::Stir {
            duration: duration.map(str::to_string),
            temperature: temperature.map(str::to_string),
            atmosphere: None,
        }
    }

    #[test]
    fn stir_absorbs_a_following_wait() {
        let out = WaitPostprocessor::new().postprocess(&[stir(None, Some("5 °C")), wait("10 minutes")]);
        assert_eq!(out, vec![stir(Some("10 minutes"), Some("5 °C"))]);
    }

    #[test]
    fn settemperature_becomes_a_stir_with_the_wait_duration() {
        let out = WaitPostprocessor::new().postprocess(&[
            Action::SetTemperature {
                temperature: "0 °C".to_string(),
            },
            wait("2 h"),
        ]);
        assert_eq!(out, vec![stir(Some("2 h"), Some("0 °C"))]);
    }

    #[test]
    fn add_never_absorbs_a_wait() {
        let add = Action::Add {
            material: crate::action::Chemical::new("water"),
            dropwise: false,
            temperature: None,
            atmosphere: None,
            duration: None,
        };
        let actions = vec![add, wait("5 minutes")];
        assert_eq!(WaitPostprocessor::new().postprocess(&actions), actions);
    }

    #[test]
    fn wait_with_a_temperature_is_not_merged() {
        let actions = vec![
            stir(None, None),
            Action::Wait {
                duration: "1 h".to_string(),
                temperature: Some("4 °C".to_string()),
            },
        ];
        assert_eq!(WaitPostprocessor::new().postprocess(&actions), actions);
    }

    #[test]
    fn an_action_with_a_duration_already_set_is_not_merged() {
        let actions = vec![stir(Some("30 minutes"), None), wait("1 h")];
        assert_eq!(WaitPostprocessor::new().postprocess(&actions), actions);
    }

    #[test]
    fn unmergeable_wait_is_kept() {
        let actions = vec![Action::Concentrate, wait("1 h")];
        assert_eq!(WaitPostprocessor::new().postprocess(&actions), actions);
    }

    #[test]
    fn consumed_wait_does_not_merge_into_the_next_pair() {
        // The second WAIT follows a consumed slot; it stays in place.
        let out = WaitPostprocessor::new().postprocess(&[
            stir(None, None),
            wait("10 minutes"),
            wait("1 h"),
        ]);
        assert_eq!(out, vec![stir(Some("10 minutes"), None), wait("1 h")]);
    }
}
