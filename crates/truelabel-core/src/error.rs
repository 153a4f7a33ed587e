use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TrueLabelError {
    #[error("invalid reading for '{parameter}': {reason}")]
    InvalidReading { parameter: String, reason: String },

    #[error("failed to load rule table from {path}: {reason}")]
    RuleTableLoad { path: PathBuf, reason: String },

    #[error("invalid rule table: {0}")]
    RuleTableInvalid(String),

    #[error("unsupported input: {0}. Expected a JSON product analysis.")]
    UnsupportedInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
