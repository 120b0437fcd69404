use thiserror::Error;

/// Errors surfaced at the edges of the engine.
///
/// Parsing itself is total: once a `SourceDocument` exists the pipeline
/// always produces a tree. These variants only cover input-contract
/// violations, bad configuration and the I/O helpers around them.
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, SurveyError>;
