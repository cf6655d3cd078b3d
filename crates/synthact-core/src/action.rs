use crate::error::SynthactError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Chemical
// ---------------------------------------------------------------------------

/// Substance with attached quantities.
///
/// Quantities are optional, and several may be given simultaneously
/// (f.i. `["1 mmol", "2.0 g", "2.0 mL"]`), therefore they are kept as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chemical {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quantity: Vec<String>,
}

impl Chemical {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: Vec::new(),
        }
    }

    pub fn with_quantity(name: impl Into<String>, quantity: Vec<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

// ---------------------------------------------------------------------------
// Constrained parameter values
// ---------------------------------------------------------------------------

/// Which layer to keep after a phase separation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Aqueous,
    Organic,
}

impl Layer {
    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Aqueous => "aqueous",
            Layer::Organic => "organic",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Layer {
    type Err = SynthactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aqueous" => Ok(Layer::Aqueous),
            "organic" => Ok(Layer::Organic),
            _ => Err(SynthactError::InvalidValue {
                field: "layer",
                value: s.to_string(),
                expected: "aqueous, organic",
            }),
        }
    }
}

/// Which phase to keep after a filtration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPhase {
    Filtrate,
    Precipitate,
}

impl FilterPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterPhase::Filtrate => "filtrate",
            FilterPhase::Precipitate => "precipitate",
        }
    }
}

impl fmt::Display for FilterPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FilterPhase {
    type Err = SynthactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "filtrate" => Ok(FilterPhase::Filtrate),
            "precipitate" => Ok(FilterPhase::Precipitate),
            _ => Err(SynthactError::InvalidValue {
                field: "phase_to_keep",
                value: s.to_string(),
                expected: "filtrate, precipitate",
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A single operation in a synthesis procedure.
///
/// Temperatures, durations, and atmospheres are kept as free text
/// ("25 °C", "overnight", "N2"): the values come straight from procedure
/// text and are never normalized to numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Add {
        material: Chemical,
        dropwise: bool,
        temperature: Option<String>,
        atmosphere: Option<String>,
        duration: Option<String>,
    },
    CollectLayer {
        layer: Layer,
    },
    Concentrate,
    Degas {
        gas: Option<String>,
        duration: Option<String>,
    },
    /// Dry a solid under air, vacuum, or a gas atmosphere.
    DrySolid {
        duration: Option<String>,
        temperature: Option<String>,
        atmosphere: Option<String>,
    },
    /// Dry an organic solution with a desiccant.
    DrySolution {
        material: Option<String>,
    },
    Extract {
        solvent: Chemical,
        repetitions: u32,
    },
    Filter {
        phase_to_keep: Option<FilterPhase>,
    },
    /// Placeholder for sentences that refer to another experimental procedure.
    FollowOtherProcedure,
    /// Placeholder produced when a predicted action string could not be parsed.
    InvalidAction {
        error: Option<String>,
    },
    /// Make a solution out of several compounds. Usually followed by another
    /// action using it (Add, Quench, etc.).
    MakeSolution {
        materials: Vec<Chemical>,
    },
    Microwave {
        duration: Option<String>,
        temperature: Option<String>,
    },
    /// Placeholder for sentences that have no action.
    NoAction,
    /// Placeholder for sentences that are not in English.
    OtherLanguage,
    Partition {
        material_1: Chemical,
        material_2: Chemical,
    },
    Ph {
        material: Chemical,
        ph: Option<String>,
        dropwise: bool,
        temperature: Option<String>,
    },
    PhaseSeparation,
    Purify,
    Quench {
        material: Chemical,
        dropwise: bool,
        temperature: Option<String>,
    },
    Recrystallize {
        solvent: Chemical,
    },
    Reflux {
        duration: Option<String>,
        dean_stark: bool,
        atmosphere: Option<String>,
    },
    /// Cooling/heating without a duration. With a duration, use Stir instead.
    SetTemperature {
        temperature: String,
    },
    Sonicate {
        duration: Option<String>,
        temperature: Option<String>,
    },
    Stir {
        duration: Option<String>,
        temperature: Option<String>,
        atmosphere: Option<String>,
    },
    Triturate {
        solvent: Chemical,
    },
    /// NB: seldom means "waiting without doing anything"; often "continue
    /// what was done before".
    Wait {
        duration: String,
        temperature: Option<String>,
    },
    Wash {
        material: Chemical,
        repetitions: u32,
    },
    Yield {
        material: Chemical,
    },
}

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

/// Closed vocabulary of action kinds. The order here fixes the indices of the
/// grammar template table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Add,
    CollectLayer,
    Concentrate,
    Degas,
    DrySolid,
    DrySolution,
    Extract,
    Filter,
    FollowOtherProcedure,
    InvalidAction,
    MakeSolution,
    Microwave,
    NoAction,
    OtherLanguage,
    Partition,
    Ph,
    PhaseSeparation,
    Purify,
    Quench,
    Recrystallize,
    Reflux,
    SetTemperature,
    Sonicate,
    Stir,
    Triturate,
    Wait,
    Wash,
    Yield,
}

impl ActionKind {
    pub fn all() -> &'static [ActionKind] {
        &[
            ActionKind::Add,
            ActionKind::CollectLayer,
            ActionKind::Concentrate,
            ActionKind::Degas,
            ActionKind::DrySolid,
            ActionKind::DrySolution,
            ActionKind::Extract,
            ActionKind::Filter,
            ActionKind::FollowOtherProcedure,
            ActionKind::InvalidAction,
            ActionKind::MakeSolution,
            ActionKind::Microwave,
            ActionKind::NoAction,
            ActionKind::OtherLanguage,
            ActionKind::Partition,
            ActionKind::Ph,
            ActionKind::PhaseSeparation,
            ActionKind::Purify,
            ActionKind::Quench,
            ActionKind::Recrystallize,
            ActionKind::Reflux,
            ActionKind::SetTemperature,
            ActionKind::Sonicate,
            ActionKind::Stir,
            ActionKind::Triturate,
            ActionKind::Wait,
            ActionKind::Wash,
            ActionKind::Yield,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Uppercase wire token, the leading word of the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Add => "ADD",
            ActionKind::CollectLayer => "COLLECTLAYER",
            ActionKind::Concentrate => "CONCENTRATE",
            ActionKind::Degas => "DEGAS",
            ActionKind::DrySolid => "DRYSOLID",
            ActionKind::DrySolution => "DRYSOLUTION",
            ActionKind::Extract => "EXTRACT",
            ActionKind::Filter => "FILTER",
            ActionKind::FollowOtherProcedure => "FOLLOWOTHERPROCEDURE",
            ActionKind::InvalidAction => "INVALIDACTION",
            ActionKind::MakeSolution => "MAKESOLUTION",
            ActionKind::Microwave => "MICROWAVE",
            ActionKind::NoAction => "NOACTION",
            ActionKind::OtherLanguage => "OTHERLANGUAGE",
            ActionKind::Partition => "PARTITION",
            ActionKind::Ph => "PH",
            ActionKind::PhaseSeparation => "PHASESEPARATION",
            ActionKind::Purify => "PURIFY",
            ActionKind::Quench => "QUENCH",
            ActionKind::Recrystallize => "RECRYSTALLIZE",
            ActionKind::Reflux => "REFLUX",
            ActionKind::SetTemperature => "SETTEMPERATURE",
            ActionKind::Sonicate => "SONICATE",
            ActionKind::Stir => "STIR",
            ActionKind::Triturate => "TRITURATE",
            ActionKind::Wait => "WAIT",
            ActionKind::Wash => "WASH",
            ActionKind::Yield => "YIELD",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionKind {
    type Err = SynthactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SynthactError::UnknownAction(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Typed accessors
// ---------------------------------------------------------------------------

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Add { .. } => ActionKind::Add,
            Action::CollectLayer { .. } => ActionKind::CollectLayer,
            Action::Concentrate => ActionKind::Concentrate,
            Action::Degas { .. } => ActionKind::Degas,
            Action::DrySolid { .. } => ActionKind::DrySolid,
            Action::DrySolution { .. } => ActionKind::DrySolution,
            Action::Extract { .. } => ActionKind::Extract,
            Action::Filter { .. } => ActionKind::Filter,
            Action::FollowOtherProcedure => ActionKind::FollowOtherProcedure,
            Action::InvalidAction { .. } => ActionKind::InvalidAction,
            Action::MakeSolution { .. } => ActionKind::MakeSolution,
            Action::Microwave { .. } => ActionKind::Microwave,
            Action::NoAction => ActionKind::NoAction,
            Action::OtherLanguage => ActionKind::OtherLanguage,
            Action::Partition { .. } => ActionKind::Partition,
            Action::Ph { .. } => ActionKind::Ph,
            Action::PhaseSeparation => ActionKind::PhaseSeparation,
            Action::Purify => ActionKind::Purify,
            Action::Quench { .. } => ActionKind::Quench,
            Action::Recrystallize { .. } => ActionKind::Recrystallize,
            Action::Reflux { .. } => ActionKind::Reflux,
            Action::SetTemperature { .. } => ActionKind::SetTemperature,
            Action::Sonicate { .. } => ActionKind::Sonicate,
            Action::Stir { .. } => ActionKind::Stir,
            Action::Triturate { .. } => ActionKind::Triturate,
            Action::Wait { .. } => ActionKind::Wait,
            Action::Wash { .. } => ActionKind::Wash,
            Action::Yield { .. } => ActionKind::Yield,
        }
    }

    /// Temperature attached to this action, if its kind carries one and it is set.
    pub fn temperature(&self) -> Option<&str> {
        match self {
            Action::Add { temperature, .. }
            | Action::DrySolid { temperature, .. }
            | Action::Microwave { temperature, .. }
            | Action::Ph { temperature, .. }
            | Action::Quench { temperature, .. }
            | Action::Sonicate { temperature, .. }
            | Action::Stir { temperature, .. }
            | Action::Wait { temperature, .. } => temperature.as_deref(),
            Action::SetTemperature { temperature } => Some(temperature),
            _ => None,
        }
    }

    /// Sets the temperature. Returns false if the kind has no temperature slot.
    pub fn set_temperature(&mut self, value: impl Into<String>) -> bool {
        match self {
            Action::Add { temperature, .. }
            | Action::DrySolid { temperature, .. }
            | Action::Microwave { temperature, .. }
            | Action::Ph { temperature, .. }
            | Action::Quench { temperature, .. }
            | Action::Sonicate { temperature, .. }
            | Action::Stir { temperature, .. }
            | Action::Wait { temperature, .. } => {
                *temperature = Some(value.into());
                true
            }
            Action::SetTemperature { temperature } => {
                *temperature = value.into();
                true
            }
            _ => false,
        }
    }

    /// Duration attached to this action, if its kind carries one and it is set.
    pub fn duration(&self) -> Option<&str> {
        match self {
            Action::Add { duration, .. }
            | Action::Degas { duration, .. }
            | Action::DrySolid { duration, .. }
            | Action::Microwave { duration, .. }
            | Action::Reflux { duration, .. }
            | Action::Sonicate { duration, .. }
            | Action::Stir { duration, .. } => duration.as_deref(),
            Action::Wait { duration, .. } => Some(duration),
            _ => None,
        }
    }

    /// Sets the duration. Returns false if the kind has no duration slot.
    pub fn set_duration(&mut self, value: impl Into<String>) -> bool {
        match self {
            Action::Add { duration, .. }
            | Action::Degas { duration, .. }
            | Action::DrySolid { duration, .. }
            | Action::Microwave { duration, .. }
            | Action::Reflux { duration, .. }
            | Action::Sonicate { duration, .. }
            | Action::Stir { duration, .. } => {
                *duration = Some(value.into());
                true
            }
            Action::Wait { duration, .. } => {
                *duration = value.into();
                true
            }
            _ => false,
        }
    }

    /// All `Chemical` instances carried by this action.
    pub fn chemicals(&self) -> Vec<&Chemical> {
        match self {
            Action::Add { material, .. }
            | Action::Ph { material, .. }
            | Action::Quench { material, .. }
            | Action::Wash { material, .. }
            | Action::Yield { material } => vec![material],
            Action::Extract { solvent, .. }
            | Action::Recrystallize { solvent }
            | Action::Triturate { solvent } => vec![solvent],
            Action::MakeSolution { materials } => materials.iter().collect(),
            Action::Partition {
                material_1,
                material_2,
            } => vec![material_1, material_2],
            _ => Vec::new(),
        }
    }

    pub fn chemicals_mut(&mut self) -> Vec<&mut Chemical> {
        match self {
            Action::Add { material, .. }
            | Action::Ph { material, .. }
            | Action::Quench { material, .. }
            | Action::Wash { material, .. }
            | Action::Yield { material } => vec![material],
            Action::Extract { solvent, .. }
            | Action::Recrystallize { solvent }
            | Action::Triturate { solvent } => vec![solvent],
            Action::MakeSolution { materials } => materials.iter_mut().collect(),
            Action::Partition {
                material_1,
                material_2,
            } => vec![material_1, material_2],
            _ => Vec::new(),
        }
    }

    /// Names of all compounds in this action, including the ones that exist
    /// only as plain strings (Degas gas, DrySolution desiccant).
    pub fn compound_names(&self) -> Vec<&str> {
        match self {
            Action::Degas { gas: Some(gas), .. } => vec![gas.as_str()],
            Action::DrySolution {
                material: Some(material),
            } => vec![material.as_str()],
            _ => self.chemicals().into_iter().map(|c| c.name.as_str()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sequence helpers
// ---------------------------------------------------------------------------

/// All chemicals present in a sequence of actions, in order of appearance.
pub fn extract_chemicals(actions: &[Action]) -> Vec<&Chemical> {
    actions.iter().flat_map(Action::chemicals).collect()
}

/// All temperatures present in a sequence of actions.
pub fn extract_temperatures(actions: &[Action]) -> Vec<&str> {
    actions.iter().filter_map(Action::temperature).collect()
}

/// All durations present in a sequence of actions.
pub fn extract_durations(actions: &[Action]) -> Vec<&str> {
    actions.iter().filter_map(Action::duration).collect()
}

/// All compound names present in a sequence of actions. "SLN" is the marker
/// for a previously prepared solution, not a real compound, and is skipped
/// unless requested.
pub fn extract_compound_names(actions: &[Action], ignore_sln: bool) -> Vec<&str> {
    actions
        .iter()
        .flat_map(Action::compound_names)
        .filter(|name| !ignore_sln || *name != "SLN")
        .collect()
}

/// Strip the quantities from every chemical in a sequence of actions.
pub fn remove_quantities(actions: &mut [Action]) {
    for action in actions.iter_mut() {
        for chemical in action.chemicals_mut() {
            chemical.quantity.clear();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_token_roundtrip() {
        for kind in ActionKind::all() {
            let parsed: ActionKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, *kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = "SHAKE".parse::<ActionKind>().unwrap_err();
        assert!(matches!(err, SynthactError::UnknownAction(name) if name == "SHAKE"));
    }

    #[test]
    fn kind_index_matches_all_order() {
        for (i, kind) in ActionKind::all().iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn temperature_accessor_covers_required_and_optional_slots() {
        let mut stir = Action::Stir {
            duration: None,
            temperature: Some("0 °C".to_string()),
            atmosphere: None,
        };
        assert_eq!(stir.temperature(), Some("0 °C"));
        assert!(stir.set_temperature("25 °C"));
        assert_eq!(stir.temperature(), Some("25 °C"));

        let mut set = Action::SetTemperature {
            temperature: "reflux".to_string(),
        };
        assert_eq!(set.temperature(), Some("reflux"));
        assert!(set.set_temperature("0 °C"));
        assert_eq!(set.temperature(), Some("0 °C"));

        let mut filter = Action::Filter {
            phase_to_keep: None,
        };
        assert_eq!(filter.temperature(), None);
        assert!(!filter.set_temperature("25 °C"));
    }

    #[test]
    fn duration_accessor_covers_wait() {
        let mut wait = Action::Wait {
            duration: "1 h".to_string(),
            temperature: None,
        };
        assert_eq!(wait.duration(), Some("1 h"));
        assert!(wait.set_duration("30 minutes"));
        assert_eq!(wait.duration(), Some("30 minutes"));
    }

    #[test]
    fn extract_compound_names_skips_sln() {
        let actions = vec![
            Action::MakeSolution {
                materials: vec![Chemical::new("THF"), Chemical::new("NaH")],
            },
            Action::Add {
                material: Chemical::new("SLN"),
                dropwise: false,
                temperature: None,
                atmosphere: None,
                duration: None,
            },
            Action::DrySolution {
                material: Some("sodium sulfate".to_string()),
            },
        ];
        assert_eq!(
            extract_compound_names(&actions, true),
            vec!["THF", "NaH", "sodium sulfate"]
        );
        assert_eq!(
            extract_compound_names(&actions, false),
            vec!["THF", "NaH", "SLN", "sodium sulfate"]
        );
    }

    #[test]
    fn remove_quantities_clears_all_chemicals() {
        let mut actions = vec![Action::Extract {
            solvent: Chemical::with_quantity("ethyl acetate", vec!["3 x 50 mL".to_string()]),
            repetitions: 3,
        }];
        remove_quantities(&mut actions);
        assert!(extract_chemicals(&actions)[0].quantity.is_empty());
    }

    #[test]
    fn action_json_roundtrip() {
        let action = Action::Add {
            material: Chemical::with_quantity("HCl", vec!["1 M".to_string(), "5 mL".to_string()]),
            dropwise: true,
            temperature: Some("0 °C".to_string()),
            atmosphere: None,
            duration: None,
        };
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.contains("\"action\":\"add\""));
        let parsed: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, action);
    }

    #[test]
    fn sequence_equality_is_order_sensitive() {
        let a = vec![Action::Concentrate, Action::Purify];
        let b = vec![Action::Purify, Action::Concentrate];
        assert_ne!(a, b);
    }
}
