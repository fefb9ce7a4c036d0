use thiserror::Error;

/// Custom error types for the extraction pipeline.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to the model API: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize model API response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("Model API returned an error: {0}")]
    AiApi(String),
    #[error("Request must contain at least one image")]
    MissingImage,
    #[error("Failed to read image file: {0}")]
    ImageRead(#[from] std::io::Error),
    #[error("Model response is not valid JSON: {message}")]
    Parse { message: String, raw: String },
    #[error("AI provider is missing")]
    MissingAiProvider,
    #[error("Model tier configuration is missing")]
    MissingModelTiers,
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

impl ExtractError {
    /// Whether this error came from the model invocation itself, as opposed
    /// to validation or response parsing. Only these errors are eligible for
    /// the model-tier fallback.
    pub fn is_model_failure(&self) -> bool {
        matches!(
            self,
            ExtractError::AiRequest(_) | ExtractError::AiDeserialization(_) | ExtractError::AiApi(_)
        )
    }
}
