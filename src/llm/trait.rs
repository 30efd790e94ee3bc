use crate::error::ProviderError;

/// One text-generation call, independent of the vendor
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction, if the operation has one
    pub system: Option<String>,
    /// User prompt with all placeholders already filled
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            max_tokens,
            temperature,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Vendor wire client: sends one request, returns the first text candidate
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate text for the request, trimmed
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;

    /// Model name used for requests
    fn model(&self) -> &str;
}
