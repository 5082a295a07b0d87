use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors raised while turning a payload into a response body.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to serialize debug report: {0}")]
    Json(#[from] serde_json::Error),
}
