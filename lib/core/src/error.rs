use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{collaborator} unavailable: {message}")]
    CollaboratorUnavailable {
        collaborator: &'static str,
        message: String,
    },

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Malformed catalog: {0}")]
    MalformedCatalog(String),

    #[error("Malformed index: {0}")]
    MalformedIndex(String),

    #[error("Query is empty")]
    EmptyQuery,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    pub fn collaborator(collaborator: &'static str, message: impl Into<String>) -> Self {
        Error::CollaboratorUnavailable {
            collaborator,
            message: message.into(),
        }
    }

    /// True when the failure came from an external collaborator rather than
    /// from local data or configuration.
    pub fn is_collaborator(&self) -> bool {
        matches!(self, Error::CollaboratorUnavailable { .. })
    }
}
