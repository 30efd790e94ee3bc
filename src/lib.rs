pub mod batch;
pub mod catalog;
pub mod collections;
pub mod config;
pub mod constants;
pub mod error;
pub mod llm;
pub mod models;
pub mod runtime;
pub mod tagger;
pub mod utils;

pub use batch::BatchScheduler;
pub use config::{Config, ProviderConfig, ProviderKind};
pub use error::{ProviderError, SyncBridgeError};
pub use llm::{create_service, AiService, CompletionClient};
pub use models::{KeywordMap, Product, TagRef};
pub use runtime::run_sync;
pub use tagger::Taggable;
