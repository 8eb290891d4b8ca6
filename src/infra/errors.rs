// src/infra/errors.rs — Error types for CopyBloom

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CopyBloomError {
    // Provider errors (retriable)
    #[error("Provider '{provider}' error: {message}")]
    Provider {
        provider: String,
        message: String,
        retriable: bool,
    },

    #[error("Rate limited by '{provider}', retry after {retry_after_ms}ms")]
    RateLimited {
        provider: String,
        retry_after_ms: u64,
    },

    #[error("All providers exhausted")]
    AllProvidersExhausted,

    // Content errors (not retriable)
    #[error("Response blocked by '{provider}' safety filter")]
    SafetyBlocked { provider: String },

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Could not parse model output: {0}")]
    MalformedOutput(String),

    // User errors
    #[error("No API key configured. Run `copybloom init` or set GEMINI_API_KEY.")]
    NoProvider,

    #[error("Campaign '{id}' not found")]
    CampaignNotFound { id: String },

    // Infra
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CopyBloomError {
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            CopyBloomError::Provider {
                retriable: true,
                ..
            } | CopyBloomError::RateLimited { .. }
        )
    }
}
