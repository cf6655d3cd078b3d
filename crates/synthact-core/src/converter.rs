//! Bidirectional conversion between action sequences and their wire format.
//!
//! The wire format is one segment per action, joined by `"; "` and terminated
//! by `"."`:
//!
//! > `STIR for 10 minutes at 5 °C; FILTER keep filtrate; DRYSOLUTION over sodium sulfate.`
//!
//! Each segment starts with the uppercase action name, followed by parameter
//! fragments introduced by the connectives of the kind's grammar template.

use crate::action::{Action, ActionKind, Chemical, FilterPhase};
use crate::error::{Result, SynthactError};
use crate::grammar::{template, ParamSlot, ParamTag};
use regex::Regex;
use std::sync::OnceLock;

/// Zero-width non-joiner, inserted to neutralize separator sequences that
/// occur inside parameter values so that splitting stays top-level only.
const NO_BREAK: char = '\u{200C}';

// ---------------------------------------------------------------------------
// Converter trait
// ---------------------------------------------------------------------------

/// Conversion of action sequences to and from a string representation.
pub trait ActionStringConverter {
    /// Whether conversion to and from the given kind is supported.
    fn action_kind_supported(&self, kind: ActionKind) -> bool;

    fn actions_to_string(&self, actions: &[Action]) -> String;

    fn action_to_string(&self, action: &Action) -> String;

    fn string_to_actions(&self, action_string: &str) -> Result<Vec<Action>>;

    fn string_to_action(&self, text: &str) -> Result<Action>;

    /// Like `string_to_actions`, but a segment that fails to parse becomes an
    /// `InvalidAction` carrying the error instead of aborting the whole
    /// string. Useful to surface feedback when a single action out of many is
    /// broken.
    fn string_to_actions_lenient(&self, action_string: &str) -> Vec<Action>;
}

// ---------------------------------------------------------------------------
// ReadableConverter
// ---------------------------------------------------------------------------

/// The default, human-readable wire format used for training data and model
/// output.
pub struct ReadableConverter {
    separator: String,
    end_mark: String,
    /// Separator with a no-break character between its first and second
    /// characters; substituted into values on the way out, restored on the
    /// way in.
    separator_substitute: String,
}

impl ReadableConverter {
    pub fn new() -> Self {
        Self::with_format("; ", ".")
    }

    pub fn with_format(separator: &str, end_mark: &str) -> Self {
        assert!(
            separator.len() > 1,
            "separator must be at least two characters for escaping to work"
        );
        let mut separator_substitute = String::with_capacity(separator.len() + NO_BREAK.len_utf8());
        separator_substitute.push_str(&separator[..1]);
        separator_substitute.push(NO_BREAK);
        separator_substitute.push_str(&separator[1..]);
        Self {
            separator: separator.to_string(),
            end_mark: end_mark.to_string(),
            separator_substitute,
        }
    }

    fn segments<'a>(&self, action_string: &'a str) -> Vec<&'a str> {
        let body = if self.end_mark.is_empty() {
            action_string
        } else {
            action_string
                .strip_suffix(&self.end_mark)
                .unwrap_or(action_string)
        };
        if body.is_empty() {
            return Vec::new();
        }
        body.split(self.separator.as_str()).collect()
    }
}

impl Default for ReadableConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionStringConverter for ReadableConverter {
    fn action_kind_supported(&self, _kind: ActionKind) -> bool {
        // The template table is total over ActionKind.
        true
    }

    fn actions_to_string(&self, actions: &[Action]) -> String {
        let joined = actions
            .iter()
            .map(|a| self.action_to_string(a))
            .collect::<Vec<_>>()
            .join(&self.separator);
        joined + &self.end_mark
    }

    fn action_to_string(&self, action: &Action) -> String {
        serialize_action(action).replace(&self.separator, &self.separator_substitute)
    }

    fn string_to_actions(&self, action_string: &str) -> Result<Vec<Action>> {
        self.segments(action_string)
            .into_iter()
            .map(|segment| self.string_to_action(segment))
            .collect()
    }

    fn string_to_action(&self, text: &str) -> Result<Action> {
        let restored = text.replace(&self.separator_substitute, &self.separator);
        parse_action(&restored)
    }

    fn string_to_actions_lenient(&self, action_string: &str) -> Vec<Action> {
        self.segments(action_string)
            .into_iter()
            .map(|segment| {
                self.string_to_action(segment)
                    .unwrap_or_else(|e| Action::InvalidAction {
                        error: Some(e.to_string()),
                    })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Chemical text form
// ---------------------------------------------------------------------------

/// `name` or `name (q1, q2)`. A `" ("` inside the name itself is escaped with
/// a no-break character so that the quantity parenthesis stays unambiguous in
/// the back-conversion.
fn chemical_to_string(chemical: &Chemical) -> String {
    let escaped_open = format!(" {NO_BREAK}(");
    let name = chemical.name.replace(" (", &escaped_open);
    if chemical.quantity.is_empty() {
        name
    } else {
        format!("{} ({})", name, chemical.quantity.join(", "))
    }
}

fn chemicals_to_string(chemicals: &[&Chemical]) -> String {
    chemicals
        .iter()
        .map(|c| chemical_to_string(c))
        .collect::<Vec<_>>()
        .join(" and ")
}

fn parse_chemical(text: &str) -> Chemical {
    let (name, quantity) = split_quantities(text);
    let escaped_open = format!(" {NO_BREAK}(");
    Chemical {
        name: name.replace(&escaped_open, " ("),
        quantity,
    }
}

/// Splits a trailing ` (...)` quantity block off a chemical text. The escaped
/// `" ("` of a compound name never matches because of the no-break character.
fn split_quantities(text: &str) -> (&str, Vec<String>) {
    if text.ends_with(')') {
        if let Some(idx) = text.rfind(" (") {
            let inner = &text[idx + 2..text.len() - 1];
            let quantities = inner.split(", ").map(str::to_string).collect();
            return (&text[..idx], quantities);
        }
    }
    (text, Vec::new())
}

// ---------------------------------------------------------------------------
// Serialization (template-driven)
// ---------------------------------------------------------------------------

fn serialize_action(action: &Action) -> String {
    let kind = action.kind();
    let t = template(kind);
    let mut s = kind.as_str().to_string();

    if let Some(cp) = &t.compound {
        let fragment = match cp.slot {
            ParamSlot::Compound => compound_ref(action).map(chemical_to_string),
            ParamSlot::Compounds => {
                let list = compounds_ref(action);
                (!list.is_empty()).then(|| chemicals_to_string(&list))
            }
            _ => None,
        };
        if let Some(fragment) = fragment {
            if let Some(conn) = cp.connective {
                s.push(' ');
                s.push_str(conn);
            }
            s.push(' ');
            s.push_str(&fragment);
        }
    }

    for p in t.params {
        match p.slot {
            ParamSlot::Flag => {
                if param_flag(action, p.tag) {
                    if let Some(conn) = p.connective {
                        s.push(' ');
                        s.push_str(conn);
                    }
                }
            }
            ParamSlot::Text | ParamSlot::OptText => {
                if let Some(value) = param_text(action, p.tag) {
                    if let Some(conn) = p.connective {
                        s.push(' ');
                        s.push_str(conn);
                    }
                    s.push(' ');
                    s.push_str(value);
                }
            }
            ParamSlot::Trailing | ParamSlot::OptTrailing => {
                if let Some(value) = param_text(action, p.tag) {
                    s.push(' ');
                    s.push_str(value);
                }
            }
            ParamSlot::Repetitions => {
                let n = param_count(action);
                if n != 1 {
                    s.push_str(&format!(" {n} x"));
                }
            }
            // Compound slots only appear in the leading position.
            ParamSlot::Compound | ParamSlot::Compounds => {}
        }
    }

    s
}

fn param_text(action: &Action, tag: ParamTag) -> Option<&str> {
    match (action, tag) {
        (_, ParamTag::Temperature) => action.temperature(),
        (_, ParamTag::Duration) => action.duration(),
        (
            Action::Add { atmosphere, .. }
            | Action::DrySolid { atmosphere, .. }
            | Action::Reflux { atmosphere, .. }
            | Action::Stir { atmosphere, .. },
            ParamTag::Atmosphere,
        ) => atmosphere.as_deref(),
        (Action::Degas { gas, .. }, ParamTag::Gas) => gas.as_deref(),
        (Action::DrySolution { material }, ParamTag::Material) => material.as_deref(),
        (Action::CollectLayer { layer }, ParamTag::Layer) => Some(layer.as_str()),
        (Action::Filter { phase_to_keep }, ParamTag::PhaseToKeep) => {
            phase_to_keep.map(FilterPhase::as_str)
        }
        (Action::Ph { ph, .. }, ParamTag::Ph) => ph.as_deref(),
        (Action::InvalidAction { error }, ParamTag::Error) => error.as_deref(),
        _ => None,
    }
}

fn param_flag(action: &Action, tag: ParamTag) -> bool {
    match (action, tag) {
        (
            Action::Add { dropwise, .. }
            | Action::Ph { dropwise, .. }
            | Action::Quench { dropwise, .. },
            ParamTag::Dropwise,
        ) => *dropwise,
        (Action::Reflux { dean_stark, .. }, ParamTag::DeanStark) => *dean_stark,
        _ => false,
    }
}

fn param_count(action: &Action) -> u32 {
    match action {
        Action::Extract { repetitions, .. } | Action::Wash { repetitions, .. } => *repetitions,
        _ => 1,
    }
}

fn compound_ref(action: &Action) -> Option<&Chemical> {
    match action {
        Action::Add { material, .. }
        | Action::Ph { material, .. }
        | Action::Quench { material, .. }
        | Action::Wash { material, .. }
        | Action::Yield { material } => Some(material),
        Action::Extract { solvent, .. }
        | Action::Recrystallize { solvent }
        | Action::Triturate { solvent } => Some(solvent),
        _ => None,
    }
}

fn compounds_ref(action: &Action) -> Vec<&Chemical> {
    match action {
        Action::MakeSolution { materials } => materials.iter().collect(),
        Action::Partition {
            material_1,
            material_2,
        } => vec![material_1, material_2],
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Parsing (template-driven)
// ---------------------------------------------------------------------------

enum ParamValue {
    Flag(bool),
    Text(Option<String>),
    Count(u32),
}

#[derive(Default)]
struct ParsedParams {
    values: Vec<(ParamTag, ParamValue)>,
    compound: Option<Chemical>,
    compounds: Vec<Chemical>,
}

impl ParsedParams {
    fn push(&mut self, tag: ParamTag, value: ParamValue) {
        self.values.push((tag, value));
    }

    fn text(&self, tag: ParamTag) -> Option<String> {
        self.values.iter().find_map(|(t, v)| match v {
            ParamValue::Text(value) if *t == tag => value.clone(),
            _ => None,
        })
    }

    fn required_text(&self, tag: ParamTag, kind: ActionKind, segment: &str) -> Result<String> {
        self.text(tag).ok_or_else(|| {
            malformed(
                kind,
                segment,
                format!("missing required {} value", tag.as_str()),
            )
        })
    }

    fn flag(&self, tag: ParamTag) -> bool {
        self.values.iter().any(|(t, v)| matches!(v, ParamValue::Flag(true) if *t == tag))
    }

    fn count(&self, tag: ParamTag) -> u32 {
        self.values
            .iter()
            .find_map(|(t, v)| match v {
                ParamValue::Count(n) if *t == tag => Some(*n),
                _ => None,
            })
            .unwrap_or(1)
    }
}

fn malformed(kind: ActionKind, text: &str, reason: impl Into<String>) -> SynthactError {
    SynthactError::MalformedAction {
        kind: kind.as_str().to_string(),
        text: text.to_string(),
        reason: reason.into(),
    }
}

static REPETITIONS_RE: OnceLock<Regex> = OnceLock::new();

fn repetitions_re() -> &'static Regex {
    REPETITIONS_RE.get_or_init(|| Regex::new(r"( (\d+) x)$").unwrap())
}

/// Parses one segment. Template parameters are stripped from the right in
/// reverse order; the leading compound, being free text, is isolated last,
/// once only the action name can precede it.
fn parse_action(text: &str) -> Result<Action> {
    let name = text.split(' ').next().unwrap_or("");
    let kind: ActionKind = name.parse()?;
    let t = template(kind);

    let mut remaining = text.to_string();
    let mut parsed = ParsedParams::default();

    for p in t.params.iter().rev() {
        match p.slot {
            ParamSlot::Repetitions => {
                let mut count = 1;
                if let Some(caps) = repetitions_re().captures(&remaining) {
                    let digits = caps[2].to_string();
                    let matched_len = caps[1].len();
                    count = digits.parse::<u32>().map_err(|_| {
                        malformed(kind, text, format!("repetition count out of range: {digits}"))
                    })?;
                    remaining.truncate(remaining.len() - matched_len);
                }
                parsed.push(p.tag, ParamValue::Count(count));
            }
            ParamSlot::Flag => {
                let mut value = false;
                if let Some(conn) = p.connective {
                    let suffix = format!(" {conn}");
                    if remaining.ends_with(&suffix) {
                        remaining.truncate(remaining.len() - suffix.len());
                        value = true;
                    }
                }
                parsed.push(p.tag, ParamValue::Flag(value));
            }
            ParamSlot::Text | ParamSlot::OptText => {
                let mut value = None;
                if let Some(conn) = p.connective {
                    let sep = format!(" {conn} ");
                    let split = remaining
                        .split_once(&sep)
                        .map(|(before, after)| (before.to_string(), after.to_string()));
                    if let Some((before, after)) = split {
                        remaining = before;
                        value = Some(after);
                    }
                }
                if value.is_none() && p.slot == ParamSlot::Text {
                    return Err(malformed(
                        kind,
                        text,
                        format!("missing required {} value", p.tag.as_str()),
                    ));
                }
                parsed.push(p.tag, ParamValue::Text(value));
            }
            ParamSlot::Trailing | ParamSlot::OptTrailing => {
                if remaining == kind.as_str() {
                    if p.slot == ParamSlot::Trailing {
                        return Err(malformed(
                            kind,
                            text,
                            format!("missing required {} value", p.tag.as_str()),
                        ));
                    }
                    parsed.push(p.tag, ParamValue::Text(None));
                } else {
                    let prefix = format!("{} ", kind.as_str());
                    let rest = remaining.strip_prefix(&prefix).map(str::to_string);
                    match rest {
                        Some(value) if !value.is_empty() => {
                            parsed.push(p.tag, ParamValue::Text(Some(value)));
                            remaining = kind.as_str().to_string();
                        }
                        _ => {
                            return Err(malformed(kind, text, "unrecognized text after action name"))
                        }
                    }
                }
            }
            // Compound slots only appear in the leading position.
            ParamSlot::Compound | ParamSlot::Compounds => {}
        }
    }

    if let Some(cp) = &t.compound {
        let prefix = match cp.connective {
            Some(conn) => format!("{} {conn} ", kind.as_str()),
            None => format!("{} ", kind.as_str()),
        };
        let rest = remaining.strip_prefix(&prefix).map(str::to_string);
        match rest {
            Some(rest) if !rest.is_empty() => {
                match cp.slot {
                    ParamSlot::Compound => parsed.compound = Some(parse_chemical(&rest)),
                    ParamSlot::Compounds => {
                        parsed.compounds = rest.split(" and ").map(parse_chemical).collect();
                    }
                    _ => {}
                }
                remaining = kind.as_str().to_string();
            }
            _ => {
                return Err(malformed(
                    kind,
                    text,
                    format!("missing {} value", cp.tag.as_str()),
                ));
            }
        }
    }

    if remaining != kind.as_str() {
        return Err(malformed(
            kind,
            text,
            format!("unrecognized leftover text: \"{remaining}\""),
        ));
    }

    build_action(kind, parsed, text)
}

fn require_compound(
    parsed: &mut ParsedParams,
    kind: ActionKind,
    segment: &str,
) -> Result<Chemical> {
    parsed
        .compound
        .take()
        .ok_or_else(|| malformed(kind, segment, "missing compound"))
}

fn build_action(kind: ActionKind, mut parsed: ParsedParams, segment: &str) -> Result<Action> {
    let action = match kind {
        ActionKind::Add => Action::Add {
            material: require_compound(&mut parsed, kind, segment)?,
            dropwise: parsed.flag(ParamTag::Dropwise),
            temperature: parsed.text(ParamTag::Temperature),
            atmosphere: parsed.text(ParamTag::Atmosphere),
            duration: parsed.text(ParamTag::Duration),
        },
        ActionKind::CollectLayer => Action::CollectLayer {
            layer: parsed
                .required_text(ParamTag::Layer, kind, segment)?
                .parse()?,
        },
        ActionKind::Concentrate => Action::Concentrate,
        ActionKind::Degas => Action::Degas {
            gas: parsed.text(ParamTag::Gas),
            duration: parsed.text(ParamTag::Duration),
        },
        ActionKind::DrySolid => Action::DrySolid {
            duration: parsed.text(ParamTag::Duration),
            temperature: parsed.text(ParamTag::Temperature),
            atmosphere: parsed.text(ParamTag::Atmosphere),
        },
        ActionKind::DrySolution => Action::DrySolution {
            material: parsed.text(ParamTag::Material),
        },
        ActionKind::Extract => Action::Extract {
            solvent: require_compound(&mut parsed, kind, segment)?,
            repetitions: parsed.count(ParamTag::Repetitions),
        },
        ActionKind::Filter => Action::Filter {
            phase_to_keep: parsed
                .text(ParamTag::PhaseToKeep)
                .map(|s| s.parse())
                .transpose()?,
        },
        ActionKind::FollowOtherProcedure => Action::FollowOtherProcedure,
        ActionKind::InvalidAction => Action::InvalidAction {
            error: parsed.text(ParamTag::Error),
        },
        ActionKind::MakeSolution => {
            let materials = std::mem::take(&mut parsed.compounds);
            if materials.len() < 2 {
                return Err(malformed(
                    kind,
                    segment,
                    format!("requires at least two components (actual: {})", materials.len()),
                ));
            }
            Action::MakeSolution { materials }
        }
        ActionKind::Microwave => Action::Microwave {
            duration: parsed.text(ParamTag::Duration),
            temperature: parsed.text(ParamTag::Temperature),
        },
        ActionKind::NoAction => Action::NoAction,
        ActionKind::OtherLanguage => Action::OtherLanguage,
        ActionKind::Partition => {
            let materials = std::mem::take(&mut parsed.compounds);
            match <[Chemical; 2]>::try_from(materials) {
                Ok([material_1, material_2]) => Action::Partition {
                    material_1,
                    material_2,
                },
                Err(materials) => {
                    return Err(malformed(
                        kind,
                        segment,
                        format!("requires exactly two compounds (actual: {})", materials.len()),
                    ));
                }
            }
        }
        ActionKind::Ph => Action::Ph {
            material: require_compound(&mut parsed, kind, segment)?,
            ph: parsed.text(ParamTag::Ph),
            dropwise: parsed.flag(ParamTag::Dropwise),
            temperature: parsed.text(ParamTag::Temperature),
        },
        ActionKind::PhaseSeparation => Action::PhaseSeparation,
        ActionKind::Purify => Action::Purify,
        ActionKind::Quench => Action::Quench {
            material: require_compound(&mut parsed, kind, segment)?,
            dropwise: parsed.flag(ParamTag::Dropwise),
            temperature: parsed.text(ParamTag::Temperature),
        },
        ActionKind::Recrystallize => Action::Recrystallize {
            solvent: require_compound(&mut parsed, kind, segment)?,
        },
        ActionKind::Reflux => Action::Reflux {
            duration: parsed.text(ParamTag::Duration),
            dean_stark: parsed.flag(ParamTag::DeanStark),
            atmosphere: parsed.text(ParamTag::Atmosphere),
        },
        ActionKind::SetTemperature => Action::SetTemperature {
            temperature: parsed.required_text(ParamTag::Temperature, kind, segment)?,
        },
        ActionKind::Sonicate => Action::Sonicate {
            duration: parsed.text(ParamTag::Duration),
            temperature: parsed.text(ParamTag::Temperature),
        },
        ActionKind::Stir => Action::Stir {
            duration: parsed.text(ParamTag::Duration),
            temperature: parsed.text(ParamTag::Temperature),
            atmosphere: parsed.text(ParamTag::Atmosphere),
        },
        ActionKind::Triturate => Action::Triturate {
            solvent: require_compound(&mut parsed, kind, segment)?,
        },
        ActionKind::Wait => Action::Wait {
            duration: parsed.required_text(ParamTag::Duration, kind, segment)?,
            temperature: parsed.text(ParamTag::Temperature),
        },
        ActionKind::Wash => Action::Wash {
            material: require_compound(&mut parsed, kind, segment)?,
            repetitions: parsed.count(ParamTag::Repetitions),
        },
        ActionKind::Yield => Action::Yield {
            material: require_compound(&mut parsed, kind, segment)?,
        },
    };
    Ok(action)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
