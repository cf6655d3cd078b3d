//! Per-kind serialization templates.
//!
//! One `ActionTemplate` per `ActionKind` describes which parameters the kind
//! recognizes, the connective keyword that introduces each of them in the
//! serialized form, and their order. The table drives both directions of the
//! string conversion: adding a kind means adding a data entry here plus the
//! accessor arms in `converter`.

use crate::action::ActionKind;

// ---------------------------------------------------------------------------
// ParamTag
// ---------------------------------------------------------------------------

/// Semantic role of a parameter slot. Closed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamTag {
    Material,
    Solvent,
    Materials,
    Gas,
    Layer,
    PhaseToKeep,
    Temperature,
    Duration,
    Atmosphere,
    Dropwise,
    Ph,
    DeanStark,
    Repetitions,
    Error,
}

impl ParamTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamTag::Material => "material",
            ParamTag::Solvent => "solvent",
            ParamTag::Materials => "materials",
            ParamTag::Gas => "gas",
            ParamTag::Layer => "layer",
            ParamTag::PhaseToKeep => "phase_to_keep",
            ParamTag::Temperature => "temperature",
            ParamTag::Duration => "duration",
            ParamTag::Atmosphere => "atmosphere",
            ParamTag::Dropwise => "dropwise",
            ParamTag::Ph => "ph",
            ParamTag::DeanStark => "dean_stark",
            ParamTag::Repetitions => "repetitions",
            ParamTag::Error => "error",
        }
    }
}

// ---------------------------------------------------------------------------
// ParamSlot
// ---------------------------------------------------------------------------

/// Shape of a parameter slot in the serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSlot {
    /// Boolean; the connective itself is the serialized text.
    Flag,
    /// Required free text introduced by the connective.
    Text,
    /// Optional free text introduced by the connective.
    OptText,
    /// Required free text directly after the action name, no connective.
    Trailing,
    /// Optional free text directly after the action name, no connective.
    OptTrailing,
    /// A single chemical, with optional quantities in parentheses.
    Compound,
    /// Two or more chemicals joined by " and ".
    Compounds,
    /// Trailing repetition count, serialized as " N x" when N > 1.
    Repetitions,
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ParamSpec {
    pub tag: ParamTag,
    pub connective: Option<&'static str>,
    pub slot: ParamSlot,
}

#[derive(Debug)]
pub struct ActionTemplate {
    pub kind: ActionKind,
    /// Leading chemical parameter. Parsed last: it can only be isolated once
    /// everything after it has been stripped, since compound names are free
    /// text.
    pub compound: Option<ParamSpec>,
    /// Remaining parameters, in serialization order.
    pub params: &'static [ParamSpec],
}

impl ActionTemplate {
    /// Whether the kind recognizes a parameter with the given tag.
    pub fn has_param(&self, tag: ParamTag) -> bool {
        self.compound.as_ref().is_some_and(|p| p.tag == tag)
            || self.params.iter().any(|p| p.tag == tag)
    }
}

const fn spec(tag: ParamTag, connective: Option<&'static str>, slot: ParamSlot) -> ParamSpec {
    ParamSpec {
        tag,
        connective,
        slot,
    }
}

const fn bare(kind: ActionKind) -> ActionTemplate {
    ActionTemplate {
        kind,
        compound: None,
        params: &[],
    }
}

/// Indexed by `ActionKind::index()`; checked by `template()` and the tests.
static TEMPLATES: &[ActionTemplate] = &[
    ActionTemplate {
        kind: ActionKind::Add,
        compound: Some(spec(ParamTag::Material, None, ParamSlot::Compound)),
        params: &[
            spec(ParamTag::Dropwise, Some("dropwise"), ParamSlot::Flag),
            spec(ParamTag::Temperature, Some("at"), ParamSlot::OptText),
            spec(ParamTag::Atmosphere, Some("under"), ParamSlot::OptText),
            spec(ParamTag::Duration, Some("over"), ParamSlot::OptText),
        ],
    },
    ActionTemplate {
        kind: ActionKind::CollectLayer,
        compound: None,
        params: &[spec(ParamTag::Layer, None, ParamSlot::Trailing)],
    },
    bare(ActionKind::Concentrate),
    ActionTemplate {
        kind: ActionKind::Degas,
        compound: None,
        params: &[
            spec(ParamTag::Gas, Some("with"), ParamSlot::OptText),
            spec(ParamTag::Duration, Some("for"), ParamSlot::OptText),
        ],
    },
    ActionTemplate {
        kind: ActionKind::DrySolid,
        compound: None,
        params: &[
            spec(ParamTag::Duration, Some("for"), ParamSlot::OptText),
            spec(ParamTag::Temperature, Some("at"), ParamSlot::OptText),
            spec(ParamTag::Atmosphere, Some("under"), ParamSlot::OptText),
        ],
    },
    ActionTemplate {
        kind: ActionKind::DrySolution,
        compound: None,
        params: &[spec(ParamTag::Material, Some("over"), ParamSlot::OptText)],
    },
    ActionTemplate {
        kind: ActionKind::Extract,
        compound: Some(spec(ParamTag::Solvent, Some("with"), ParamSlot::Compound)),
        params: &[spec(ParamTag::Repetitions, None, ParamSlot::Repetitions)],
    },
    ActionTemplate {
        kind: ActionKind::Filter,
        compound: None,
        params: &[spec(ParamTag::PhaseToKeep, Some("keep"), ParamSlot::OptText)],
    },
    bare(ActionKind::FollowOtherProcedure),
    ActionTemplate {
        kind: ActionKind::InvalidAction,
        compound: None,
        params: &[spec(ParamTag::Error, None, ParamSlot::OptTrailing)],
    },
    ActionTemplate {
        kind: ActionKind::MakeSolution,
        compound: Some(spec(ParamTag::Materials, Some("with"), ParamSlot::Compounds)),
        params: &[],
    },
    ActionTemplate {
        kind: ActionKind::Microwave,
        compound: None,
        params: &[
            spec(ParamTag::Duration, Some("for"), ParamSlot::OptText),
            spec(ParamTag::Temperature, Some("at"), ParamSlot::OptText),
        ],
    },
    bare(ActionKind::NoAction),
    bare(ActionKind::OtherLanguage),
    ActionTemplate {
        kind: ActionKind::Partition,
        compound: Some(spec(ParamTag::Materials, Some("with"), ParamSlot::Compounds)),
        params: &[],
    },
    ActionTemplate {
        kind: ActionKind::Ph,
        compound: Some(spec(ParamTag::Material, Some("with"), ParamSlot::Compound)),
        params: &[
            spec(ParamTag::Ph, Some("to pH"), ParamSlot::OptText),
            spec(ParamTag::Dropwise, Some("dropwise"), ParamSlot::Flag),
            spec(ParamTag::Temperature, Some("at"), ParamSlot::OptText),
        ],
    },
    bare(ActionKind::PhaseSeparation),
    bare(ActionKind::Purify),
    ActionTemplate {
        kind: ActionKind::Quench,
        compound: Some(spec(ParamTag::Material, Some("with"), ParamSlot::Compound)),
        params: &[
            spec(ParamTag::Dropwise, Some("dropwise"), ParamSlot::Flag),
            spec(ParamTag::Temperature, Some("at"), ParamSlot::OptText),
        ],
    },
    ActionTemplate {
        kind: ActionKind::Recrystallize,
        compound: Some(spec(ParamTag::Solvent, Some("from"), ParamSlot::Compound)),
        params: &[],
    },
    ActionTemplate {
        kind: ActionKind::Reflux,
        compound: None,
        params: &[
            spec(ParamTag::Duration, Some("for"), ParamSlot::OptText),
            spec(ParamTag::Atmosphere, Some("under"), ParamSlot::OptText),
            spec(
                ParamTag::DeanStark,
                Some("with Dean-Stark apparatus"),
                ParamSlot::Flag,
            ),
        ],
    },
    ActionTemplate {
        kind: ActionKind::SetTemperature,
        compound: None,
        params: &[spec(ParamTag::Temperature, None, ParamSlot::Trailing)],
    },
    ActionTemplate {
        kind: ActionKind::Sonicate,
        compound: None,
        params: &[
            spec(ParamTag::Duration, Some("for"), ParamSlot::OptText),
            spec(ParamTag::Temperature, Some("at"), ParamSlot::OptText),
        ],
    },
    ActionTemplate {
        kind: ActionKind::Stir,
        compound: None,
        params: &[
            spec(ParamTag::Duration, Some("for"), ParamSlot::OptText),
            spec(ParamTag::Temperature, Some("at"), ParamSlot::OptText),
            spec(ParamTag::Atmosphere, Some("under"), ParamSlot::OptText),
        ],
    },
    ActionTemplate {
        kind: ActionKind::Triturate,
        compound: Some(spec(ParamTag::Solvent, Some("with"), ParamSlot::Compound)),
        params: &[],
    },
    ActionTemplate {
        kind: ActionKind::Wait,
        compound: None,
        params: &[
            spec(ParamTag::Duration, Some("for"), ParamSlot::Text),
            spec(ParamTag::Temperature, Some("at"), ParamSlot::OptText),
        ],
    },
    ActionTemplate {
        kind: ActionKind::Wash,
        compound: Some(spec(ParamTag::Material, Some("with"), ParamSlot::Compound)),
        params: &[spec(ParamTag::Repetitions, None, ParamSlot::Repetitions)],
    },
    ActionTemplate {
        kind: ActionKind::Yield,
        compound: Some(spec(ParamTag::Material, None, ParamSlot::Compound)),
        params: &[],
    },
];

pub fn template(kind: ActionKind) -> &'static ActionTemplate {
    let template = &TEMPLATES[kind.index()];
    debug_assert_eq!(template.kind, kind);
    template
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
