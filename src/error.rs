use thiserror::Error;

/// Why a transition was refused by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Transition {
    #[strum(serialize = "keystroke")]
    Keystroke,
    #[strum(serialize = "tick")]
    Tick,
}

#[derive(Error, Debug)]
pub enum TypingError {
    #[error("Configuration Error: {0}")]
    Configuration(String),

    #[error("Invalid Transition: {0} received after the session finished")]
    InvalidTransition(Transition),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TypingError {
    /// Errors that only mean "input ignored" and never end the program.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TypingError::InvalidTransition(_))
    }
}

pub type TypingResult<T> = Result<T, TypingError>;
