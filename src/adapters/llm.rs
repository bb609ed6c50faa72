use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ReviewError;

/// Everything a model adapter needs, resolved once at startup.
///
/// The API key arrives here from the configuration layer; adapters never
/// read the process environment themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_name: String,
    pub api_key: String,
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_output_tokens: usize,
}

/// A single-turn content-generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

#[async_trait]
pub trait TextModel: Send + Sync {
    async fn complete(&self, request: CompletionRequest)
        -> Result<CompletionResponse, ReviewError>;

    fn model_name(&self) -> &str;
}
