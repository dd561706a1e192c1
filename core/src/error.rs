use thiserror::Error;

/// Failures at the data boundary. The evaluation functions themselves never
/// fail; they degrade to neutral values instead.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{what} parse at {path}: {source}")]
    Parse {
        what: &'static str,
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("{0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
