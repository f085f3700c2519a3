use thiserror::Error;

#[derive(Debug, Error)]
pub enum YodaDbError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Arguments error: {0}")]
    ArgumentsError(String),

    #[error(transparent)]
    StatementError(#[from] rusqlite::Error),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Table already exists: {0}")]
    AlreadyExistsError(String),

    #[error("Invalid identifier: {0}")]
    IdentifierError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("Connection is closed")]
    ClosedError,
}

impl YodaDbError {
    pub(crate) fn arguments(msg: impl Into<String>) -> Self {
        YodaDbError::ArgumentsError(msg.into())
    }
}

impl From<serde_json::Error> for YodaDbError {
    fn from(err: serde_json::Error) -> Self {
        YodaDbError::ConfigError(format!("Failed to parse table options: {err}"))
    }
}
