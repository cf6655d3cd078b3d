//! Boundary to the sentence-to-actions translation model.
//!
//! The model itself (a sequence-to-sequence network with its own tokenizer)
//! lives outside this crate; it is consumed as a black box that maps a
//! sentence to a raw action string. This module owns everything around it:
//! splitting a paragraph into sentences, parsing the predicted strings, and
//! assembling the result.

use crate::action::Action;
use crate::converter::{ActionStringConverter, ReadableConverter};
use crate::error::Result;
use crate::sample::TextWithActions;
use regex::Regex;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Translator
// ---------------------------------------------------------------------------

/// The external translation model: one sentence in, one raw action string out.
pub trait Translator {
    fn translate_sentences(&self, sentences: &[String]) -> Result<Vec<String>>;

    fn translate(&self, sentence: &str) -> Result<String> {
        self.translate_sentences(&[sentence.to_string()])?
            .pop()
            .ok_or_else(|| {
                crate::error::SynthactError::Translation("model returned no translation".to_string())
            })
    }
}

// ---------------------------------------------------------------------------
// Sentence splitting
// ---------------------------------------------------------------------------

pub trait SentenceSplitter {
    fn split(&self, text: &str) -> Vec<String>;
}

/// Splits sentences at dots followed by spaces. Newlines always separate
/// sentences, and a missing final full stop is restored, since the
/// translation model only ever saw complete sentences.
pub struct DotSplitter;

static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();

fn whitespace_re() -> &'static Regex {
    WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

impl SentenceSplitter for DotSplitter {
    fn split(&self, text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        for paragraph in text.lines() {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }
            let collapsed = whitespace_re().replace_all(paragraph, " ");
            for sentence in collapsed.split(". ") {
                let sentence = sentence.trim();
                if sentence.is_empty() {
                    continue;
                }
                if sentence.ends_with('.') {
                    sentences.push(sentence.to_string());
                } else {
                    sentences.push(format!("{sentence}."));
                }
            }
        }
        sentences
    }
}

// ---------------------------------------------------------------------------
// Paragraph
// ---------------------------------------------------------------------------

/// Recipe paragraph and the corresponding actions, available through the
/// contained sentences.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub sentences: Vec<TextWithActions>,
}

impl Paragraph {
    pub fn actions(&self) -> Vec<Action> {
        self.sentences
            .iter()
            .flat_map(|s| s.actions.iter().cloned())
            .collect()
    }

    pub fn sentence_texts(&self) -> Vec<&str> {
        self.sentences.iter().map(|s| s.text.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// ParagraphTranslator
// ---------------------------------------------------------------------------

/// Translates paragraphs into series of actions.
///
/// Failed conversions of single sentences are wrapped into `InvalidAction`
/// rather than aborting the paragraph, so one bad prediction does not lose
/// the rest.
pub struct ParagraphTranslator {
    translator: Box<dyn Translator>,
    converter: Box<dyn ActionStringConverter>,
    splitter: Box<dyn SentenceSplitter>,
}

impl ParagraphTranslator {
    pub fn new(translator: Box<dyn Translator>) -> Self {
        Self::with_parts(
            translator,
            Box::new(ReadableConverter::new()),
            Box::new(DotSplitter),
        )
    }

    pub fn with_parts(
        translator: Box<dyn Translator>,
        converter: Box<dyn ActionStringConverter>,
        splitter: Box<dyn SentenceSplitter>,
    ) -> Self {
        Self {
            translator,
            converter,
            splitter,
        }
    }

    pub fn extract_paragraph(&self, text: &str) -> Result<Paragraph> {
        let sentences = self.splitter.split(text);
        let action_strings = self.translator.translate_sentences(&sentences)?;

        let paired = sentences
            .into_iter()
            .zip(action_strings)
            .map(|(sentence, action_string)| {
                let actions = self.converter.string_to_actions_lenient(&action_string);
                TextWithActions::new(sentence, actions)
            })
            .collect();

        Ok(Paragraph {
            text: text.to_string(),
            sentences: paired,
        })
    }

    pub fn extract_actions(&self, text: &str) -> Result<Vec<Action>> {
        Ok(self.extract_paragraph(text)?.actions())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionKind, Chemical};
    use crate::error::SynthactError;
    use std::collections::HashMap;

    /// Canned stand-in for the external model.
    struct FakeTranslator {
        responses: HashMap<String, String>,
    }

    impl FakeTranslator {
        fn new(pairs: &[(&str, &str)]) -> Self {
            Self {
                responses: pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    impl Translator for FakeTranslator {
        fn translate_sentences(&self, sentences: &[String]) -> Result<Vec<String>> {
            sentences
                .iter()
                .map(|s| {
                    self.responses
                        .get(s)
                        .cloned()
                        .ok_or_else(|| SynthactError::Translation(format!("no prediction for {s}")))
                })
                .collect()
        }
    }

    #[test]
    fn dot_splitter_splits_and_restores_full_stops() {
        let sentences = DotSplitter.split("First step. Second  step\nthird step");
        assert_eq!(
            sentences,
            vec![
                "First step.".to_string(),
                "Second step.".to_string(),
                "third step.".to_string(),
            ]
        );
    }

    #[test]
    fn dot_splitter_skips_blank_lines() {
        assert_eq!(DotSplitter.split("\n\nOnly line.\n\n"), vec!["Only line."]);
    }

    #[test]
    fn paragraph_translation_pairs_sentences_with_actions() {
        let translator = FakeTranslator::new(&[
            ("The mixture was stirred for 2 h.", "STIR for 2 h."),
            (
                "Washed with brine.",
                "WASH with brine.",
            ),
        ]);
        let paragraph_translator = ParagraphTranslator::new(Box::new(translator));
        let paragraph = paragraph_translator
            .extract_paragraph("The mixture was stirred for 2 h. Washed with brine")
            .unwrap();

        assert_eq!(paragraph.sentences.len(), 2);
        assert_eq!(
            paragraph.actions(),
            vec![
                Action::Stir {
                    duration: Some("2 h".to_string()),
                    temperature: None,
                    atmosphere: None,
                },
                Action::Wash {
                    material: Chemical::new("brine"),
                    repetitions: 1,
                },
            ]
        );
    }

    #[test]
    fn unparseable_prediction_becomes_invalidaction() {
        let translator = FakeTranslator::new(&[("Gibberish sentence.", "FROB the widget.")]);
        let paragraph_translator = ParagraphTranslator::new(Box::new(translator));
        let actions = paragraph_translator
            .extract_actions("Gibberish sentence.")
            .unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind(), ActionKind::InvalidAction);
    }

    #[test]
    fn translator_errors_are_surfaced() {
        let paragraph_translator = ParagraphTranslator::new(Box::new(FakeTranslator::new(&[])));
        let err = paragraph_translator
            .extract_actions("Unknown sentence.")
            .unwrap_err();
        assert!(matches!(err, SynthactError::Translation(_)));
    }
}
