pub mod claude;
pub mod gemini;
pub mod prompts;
pub mod service;
pub mod r#trait;

pub use claude::ClaudeClient;
pub use gemini::GeminiClient;
pub use prompts::{PromptKey, PromptSet};
pub use r#trait::{CompletionClient, CompletionRequest};
pub use service::{create_service, create_service_with, AiService, SharedClient};

#[cfg(test)]
pub use r#trait::MockCompletionClient;
