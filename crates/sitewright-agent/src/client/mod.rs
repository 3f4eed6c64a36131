pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Generation method a model must support to be considered for selection.
pub const GENERATE_CONTENT: &str = "generateContent";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP client init: {0}")]
    Init(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("json decode: {0}")]
    Decode(String),

    #[error("model returned no text")]
    EmptyResponse,
}

/// A model as reported by the provider's catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: String,
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_CONTENT)
    }
}

/// Generative model provider.
///
/// Implementations make one request per call and never retry.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Enumerate every model the provider exposes.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ClientError>;

    /// Send `prompt` to `model` and return the plain-text reply.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ClientError>;
}
