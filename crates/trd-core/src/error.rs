use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrdError {
    #[error("not initialized: run 'trd init'")]
    NotInitialized,

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("project already exists: {0}")]
    ProjectExists(String),

    #[error("document not found: {0}")]
    DocumentNotFound(String),

    #[error("document already exists: {0}")]
    DocumentExists(String),

    #[error("text input not found: {0}")]
    TextInputNotFound(String),

    #[error("analysis not found: {0}")]
    AnalysisNotFound(String),

    #[error("approval not found: {0}")]
    ApprovalNotFound(String),

    #[error("approval already decided: {0}")]
    ApprovalDecided(String),

    #[error("unknown section key: {0}")]
    UnknownSection(String),

    #[error("no sections selected: selected_sections must be omitted or non-empty")]
    EmptySectionSelection,

    #[error("invalid id '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidId(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrdError>;
