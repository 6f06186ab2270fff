use thiserror::Error;

pub type Result<T, E = RoshamboError> = std::result::Result<T, E>;

/// Unified error type covering common failure scenarios across subsystems.
#[derive(Debug, Error)]
pub enum RoshamboError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid move: {0:?}")]
    InvalidMove(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("engine error: {0}")]
    Engine(String),
    #[error("session error: {0}")]
    Session(String),
    #[error("operational error: {0}")]
    Ops(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Recoverable, user-facing authentication outcomes.
///
/// The display strings are shown to the player verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Username already exists")]
    AlreadyExists,
    #[error("User not found")]
    NotFound,
    #[error("Incorrect password")]
    WrongPassword,
    #[error("Passwords don't match")]
    PasswordMismatch,
    #[error("Please fill in {0}")]
    MissingField(&'static str),
}
