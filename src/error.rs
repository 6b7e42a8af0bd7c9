use std::path::PathBuf;

/// Hard failures raised by the engine.
///
/// Soft failures of a swap request (same index, non-adjacent cells, finished
/// session, no match) are not errors; they come back as a
/// [`Rejection`](crate::swap::Rejection) inside the swap outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("index {index} is out of range for a grid of {len} cells")]
    OutOfRange { index: usize, len: usize },

    #[error("invalid session configuration: {0}")]
    InvalidConfig(String),

    #[error("grid must hold {expected} cells, found {found}")]
    GridShape { expected: usize, found: usize },

    #[error("board already contains a match")]
    PreexistingMatch,

    #[error("cell {index} is cleared; a starting board must be fully live")]
    ClearedCell { index: usize },

    #[error("failed to parse board: {0}")]
    Parse(String),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
