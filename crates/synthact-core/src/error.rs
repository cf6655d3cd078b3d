use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthactError {
    #[error("unknown action name: {0}")]
    UnknownAction(String),

    #[error("malformed {kind} action \"{text}\": {reason}")]
    MalformedAction {
        kind: String,
        text: String,
        reason: String,
    },

    #[error("invalid value \"{value}\" for {field}: expected one of {expected}")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("text file and actions file have different lengths: {texts} vs {actions}")]
    CorpusLengthMismatch { texts: usize, actions: usize },

    #[error("translation failed: {0}")]
    Translation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SynthactError>;
