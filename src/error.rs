use thiserror::Error;

/// PCBuilderAI error types
#[derive(Error, Debug)]
pub enum PcBuilderError {
    #[error("OpenAI API error: {0}")]
    OpenAi(#[from] async_openai::error::OpenAIError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Model returned no choices")]
    EmptyResponse,

    #[error("No API key found. Set OPENAI_API_KEY environment variable.")]
    MissingApiKey,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl PcBuilderError {
    /// True when the failure came from the model provider rather than local setup
    pub fn is_provider(&self) -> bool {
        matches!(self, PcBuilderError::OpenAi(_) | PcBuilderError::EmptyResponse)
    }
}

/// Result type alias for PCBuilderAI operations
pub type Result<T> = std::result::Result<T, PcBuilderError>;
