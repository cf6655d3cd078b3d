use crate::action::Action;
use crate::converter::ActionStringConverter;
use crate::error::{Result, SynthactError};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

// ---------------------------------------------------------------------------
// TextWithActions
// ---------------------------------------------------------------------------

/// Sentence (or paragraph) and its corresponding actions.
///
/// The two representations describe the same procedure: any edit to one must
/// be mirrored in the other, which is why augmenters consume and produce
/// whole instances rather than editing the parts separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextWithActions {
    pub text: String,
    pub actions: Vec<Action>,
}

impl TextWithActions {
    pub fn new(text: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            text: text.into(),
            actions,
        }
    }
}

// ---------------------------------------------------------------------------
// Corpus files
// ---------------------------------------------------------------------------

/// Loads samples from two aligned files, one line of source text and one line
/// of serialized actions per sample (the layout expected by the translation
/// tooling).
pub fn load_samples(
    text_file: &Path,
    actions_file: &Path,
    converter: &dyn ActionStringConverter,
) -> Result<Vec<TextWithActions>> {
    let texts = std::fs::read_to_string(text_file)?;
    let action_strings = std::fs::read_to_string(actions_file)?;

    let texts: Vec<&str> = texts.lines().collect();
    let action_strings: Vec<&str> = action_strings.lines().collect();
    if texts.len() != action_strings.len() {
        return Err(SynthactError::CorpusLengthMismatch {
            texts: texts.len(),
            actions: action_strings.len(),
        });
    }

    texts
        .into_iter()
        .zip(action_strings)
        .map(|(text, action_string)| {
            let actions = converter.string_to_actions(action_string.trim())?;
            Ok(TextWithActions::new(text.trim(), actions))
        })
        .collect()
}

/// Saves samples to two aligned files, the inverse of `load_samples`.
pub fn save_samples<'a>(
    samples: impl IntoIterator<Item = &'a TextWithActions>,
    converter: &dyn ActionStringConverter,
    text_file: &Path,
    actions_file: &Path,
) -> Result<()> {
    let mut text_out = std::fs::File::create(text_file)?;
    let mut actions_out = std::fs::File::create(actions_file)?;
    for sample in samples {
        writeln!(text_out, "{}", sample.text)?;
        writeln!(actions_out, "{}", converter.actions_to_string(&sample.actions))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
