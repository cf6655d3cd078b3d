//! Structured representation of chemical synthesis procedures.
//!
//! Converts free-text procedures to ordered sequences of typed lab actions
//! and back, augments (text, actions) samples for training-data expansion,
//! and cleans up raw model predictions into executable sequences.

pub mod action;
pub mod augment;
pub mod converter;
pub mod error;
pub mod grammar;
pub mod postprocess;
pub mod sample;
pub mod translate;

pub use action::{Action, ActionKind, Chemical, FilterPhase, Layer};
pub use converter::{ActionStringConverter, ReadableConverter};
pub use error::{Result, SynthactError};
pub use sample::TextWithActions;
