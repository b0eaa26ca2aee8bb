use thiserror::Error;

/// Errors surfaced by the paginator.
///
/// Unknown sort columns, unknown filter keys and unrecognized operator syntax are
/// not errors: they narrow to a safe default. Only structurally broken input and
/// repository failures reach the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed filter: {0}")]
    MalformedFilter(String),

    #[error("invalid pagination config: {0}")]
    Config(String),

    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

impl Error {
    /// True when the error was caused by client input and should map to a 4xx.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::MalformedFilter(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
