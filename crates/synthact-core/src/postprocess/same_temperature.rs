use super::Postprocessor;
use crate::action::{extract_temperatures, Action};

/// Resolves the literal "same temperature" by looking backwards for the
/// latest concrete temperature.
pub struct SameTemperaturePostprocessor {
    markers: Vec<String>,
}

impl SameTemperaturePostprocessor {
    pub fn new() -> Self {
        Self {
            markers: vec!["same temperature".to_string()],
        }
    }

    fn is_marker(&self, value: &str) -> bool {
        self.markers.iter().any(|m| m == value)
    }
}

impl Default for SameTemperaturePostprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Postprocessor for SameTemperaturePostprocessor {
    fn postprocess(&self, actions: &[Action]) -> Vec<Action> {
        let mut out = actions.to_vec();
        if !extract_temperatures(&out).iter().any(|t| self.is_marker(t)) {
            return out;
        }

        for i in 0..out.len() {
            let substitute = out[..i]
                .iter()
                .rev()
                .filter_map(Action::temperature)
                .find(|t| !self.is_marker(t))
                .map(str::to_string);
            let Some(substitute) = substitute else {
                continue;
            };
            if out[i].temperature().is_some_and(|t| self.is_marker(t)) {
                out[i].set_temperature(substitute);
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

    fn stir_at(temperature: &str) -> Action {
        Action::Stir {
            duration: None,
            temperature: Some(temperature.to_string()),
            atmosphere: None,
        }
    }

    #[test]
    fn marker_takes_the_latest_preceding_temperature() {
        let out = SameTemperaturePostprocessor::new().postprocess(&[
            stir_at("0 °C"),
            stir_at("50 °C"),
            stir_at("same temperature"),
        ]);
        assert_eq!(out[2].temperature(), Some("50 °C"));
    }

    #[test]
    fn marker_without_a_preceding_temperature_is_kept() {
        let out = SameTemperaturePostprocessor::new().postprocess(&[
            stir_at("same temperature"),
            stir_at("0 °C"),
        ]);
        assert_eq!(out[0].temperature(), Some("same temperature"));
    }

    #[test]
    fn resolved_markers_propagate_forward() {
        let out = SameTemperaturePostprocessor::new().postprocess(&[
            stir_at("25 °C"),
            stir_at("same temperature"),
            stir_at("same temperature"),
        ]);
        assert_eq!(out[1].temperature(), Some("25 °C"));
        assert_eq!(out[2].temperature(), Some("25 °C"));
    }

    #[test]
    fn sequences_without_markers_are_untouched() {
        let actions = vec![stir_at("25 °C"), Action::Concentrate];
        assert_eq!(
            SameTemperaturePostprocessor::new().postprocess(&actions),
            actions
        );
    }
}
