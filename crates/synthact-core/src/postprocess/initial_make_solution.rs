use super::Postprocessor;
use crate::action::Action;
use tracing::warn;

/// Replaces a MakeSolution at the start of a sequence by individual Add
/// actions, when the next step is adding the freshly made solution ("SLN").
/// With nothing in the vessel yet, making the solution separately and adding
/// it is the same as adding its components one by one.
pub struct InitialMakeSolutionPostprocessor;

impl Postprocessor for InitialMakeSolutionPostprocessor {
    fn postprocess(&self, actions: &[Action]) -> Vec<Action> {
        let [first, second, rest @ ..] = actions else {
            return actions.to_vec();
        };
        let (
            Action::MakeSolution { materials },
            Action::Add {
                material,
                dropwise,
                temperature,
                atmosphere,
                duration,
            },
        ) = (first, second)
        else {
            return actions.to_vec();
        };
        if material.name != "SLN" {
            return actions.to_vec();
        }

        if *dropwise {
            warn!("dropwise addition of the initial solution is ignored");
        }
        if duration.is_some() {
            warn!("addition duration of the initial solution is ignored");
        }

        materials
            .iter()
            .map(|m| Action::Add {
                material: m.clone(),
                dropwise: false,
                temperature: temperature.clone(),
                atmosphere: atmosphere.clone(),
                duration: None,
            })
            .chain(rest.iter().cloned())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Chemical;

    fn add_sln() -> Action {
        Action::Add {
            material: Chemical::new("SLN"),
            dropwise: false,
            temperature: Some("0 °C".to_string()),
            atmosphere: None,
            duration: None,
        }
    }

    #[test]
    fn expands_an_initial_makesolution() {
        let out = InitialMakeSolutionPostprocessor.postprocess(&[
            Action::MakeSolution {
                materials: vec![
                    Chemical::with_quantity("THF", vec!["10 mL".to_string()]),
                    Chemical::new("NaH"),
                ],
            },
            add_sln(),
            Action::Concentrate,
        ]);
        assert_eq!(out.len(), 3);
        assert_eq!(
            out[0],
            Action::Add {
                material: Chemical::with_quantity("THF", vec!["10 mL".to_string()]),
                dropwise: false,
                temperature: Some("0 °C".to_string()),
                atmosphere: None,
                duration: None,
            }
        );
        assert_eq!(out[1].chemicals()[0].name, "NaH");
        assert_eq!(out[2], Action::Concentrate);
    }

    #[test]
    fn makesolution_later_in_the_sequence_is_untouched() {
        let actions = vec![
            Action::Concentrate,
            Action::MakeSolution {
                materials: vec![Chemical::new("A"), Chemical::new("B")],
            },
            add_sln(),
        ];
        assert_eq!(
            InitialMakeSolutionPostprocessor.postprocess(&actions),
            actions
        );
    }

    #[test]
    fn add_of_a_real_compound_is_untouched() {
        let actions = vec![
            Action::MakeSolution {
                materials: vec![Chemical::new("A"), Chemical::new("B")],
            },
            Action::Add {
                material: Chemical::new("water"),
                dropwise: false,
                temperature: None,
                atmosphere: None,
                duration: None,
            },
        ];
        assert_eq!(
            InitialMakeSolutionPostprocessor.postprocess(&actions),
            actions
        );
    }
}
