//! Crate-wide error types.

use thiserror::Error;

pub type StepwiseResult<T> = Result<T, StepwiseError>;

#[derive(Debug, Error)]
pub enum StepwiseError {
    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error("trace exceeded {limit} steps")]
    TraceLimit { limit: usize },

    #[error("recorder produced no steps")]
    EmptyTrace,

    #[error("unknown problem: {0}")]
    UnknownProblem(String),

    #[error("invalid speed: {0}")]
    InvalidSpeed(String),

    #[error("trace error: {0}")]
    Trace(String),

    #[error("script error: {0}")]
    Script(String),
}

impl StepwiseError {
    /// True for the recoverable "no trace" family: the caller keeps whatever
    /// trace it was already showing.
    pub fn is_input_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_) | Self::Precondition(_) | Self::TraceLimit { .. } | Self::EmptyTrace
        )
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
