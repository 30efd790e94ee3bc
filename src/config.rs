use crate::collections::seo::{CleanupRule, SeoTemplates};
use crate::constants::{
    ANTHROPIC_API_KEY_ENV, DEFAULT_BATCH_SIZE, DEFAULT_CLAUDE_MODEL, DEFAULT_GEMINI_MODEL,
    DEFAULT_MAX_CONCURRENT_CALLS, DEFAULT_STORE_NAME, DEFAULT_TIMEOUT_SECS, GEMINI_API_KEY_ENV,
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// LLM vendors the adapter can talk to
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Claude,
    Gemini,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Gemini => "gemini",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Claude => DEFAULT_CLAUDE_MODEL,
            Self::Gemini => DEFAULT_GEMINI_MODEL,
        }
    }

    /// Environment variable holding this vendor's API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::Claude => ANTHROPIC_API_KEY_ENV,
            Self::Gemini => GEMINI_API_KEY_ENV,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "claude" | "anthropic" => Ok(Self::Claude),
            "gemini" | "google" => Ok(Self::Gemini),
            other => anyhow::bail!("Unknown AI provider '{}'. Supported: claude, gemini", other),
        }
    }
}

/// Settings an `AiService` is built from
///
/// Immutable once built. Rotating credentials means building a new config
/// and a new service from it.
#[derive(Debug)]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    pub api_key: Option<SecretString>,
    pub model_name: Option<String>,
    /// Prompt overrides keyed by operation name (e.g. "generate_tags")
    pub custom_prompts: HashMap<String, String>,
    pub timeout_secs: u64,
    /// Override of the vendor base URL
    pub api_base: Option<String>,
}

impl ProviderConfig {
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            api_key: None,
            model_name: None,
            custom_prompts: HashMap::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_base: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    pub fn with_custom_prompt(
        mut self,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.custom_prompts.insert(key.into(), template.into());
        self
    }

    /// True when a non-blank API key is present
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .map(|key| !key.expose_secret().trim().is_empty())
            .unwrap_or(false)
    }

    /// Configured model or the vendor default
    pub fn model(&self) -> &str {
        self.model_name
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

/// Application configuration loaded from settings.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub seo: SeoConfig,
    #[serde(default)]
    pub cleanup_rules: Vec<CleanupRule>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub custom_prompts: HashMap<String, String>,
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model_name", &self.model_name)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_base", &self.api_base)
            .field("custom_prompts", &self.custom_prompts.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Claude,
            api_key: None,
            model_name: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_base: None,
            custom_prompts: HashMap::new(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl AiConfig {
    /// Build the adapter config, falling back to the vendor's env var for the key
    pub fn provider_config(&self) -> ProviderConfig {
        self.provider_config_with(|name| std::env::var(name).ok())
    }

    /// Same as `provider_config` with an explicit environment lookup
    pub fn provider_config_with<F>(&self, env: F) -> ProviderConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = self
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| env(self.provider.api_key_env()))
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from);

        ProviderConfig {
            provider: self.provider,
            api_key,
            model_name: self.model_name.clone(),
            custom_prompts: self.custom_prompts.clone(),
            timeout_secs: self.timeout_secs,
            api_base: self.api_base.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_concurrent_calls")]
    pub max_concurrent_calls: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_concurrent_calls: DEFAULT_MAX_CONCURRENT_CALLS,
        }
    }
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_max_concurrent_calls() -> usize {
    DEFAULT_MAX_CONCURRENT_CALLS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_name")]
    pub name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: default_store_name(),
        }
    }
}

fn default_store_name() -> String {
    DEFAULT_STORE_NAME.to_string()
}

/// SEO templates per entity type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeoConfig {
    #[serde(default)]
    pub product: SeoTemplates,
    #[serde(default)]
    pub collection: SeoTemplates,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration from default location or return defaults
    pub fn load() -> Result<Self> {
        for path in Self::default_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::from_file(&path);
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    fn default_paths() -> Vec<PathBuf> {
        ["config/settings.toml", "./config/settings.toml", "~/.config/shoptag/settings.toml"]
            .iter()
            .map(|p| PathBuf::from(shellexpand::tilde(p).into_owned()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.ai.provider, ProviderKind::Claude);
        assert_eq!(config.batch.batch_size, 50);
        assert_eq!(config.batch.max_concurrent_calls, 10);
        assert_eq!(config.store.name, DEFAULT_STORE_NAME);
        assert!(config.cleanup_rules.is_empty());
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[ai]
provider = "gemini"
model_name = "gemini-1.5-pro"

[ai.custom_prompts]
generate_tags = "Tags for {{product_title}}"

[batch]
batch_size = 20

[store]
name = "Brew Supply"

[seo.collection]
meta_title = "{{name}} | {{store_name}}"

[[cleanup_rules]]
pattern = "\\s*\\(.*?\\)"
replacement = "''"
is_regex = true
priority = 1
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.ai.provider, ProviderKind::Gemini);
        assert_eq!(config.ai.model_name.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(
            config.ai.custom_prompts.get("generate_tags").map(String::as_str),
            Some("Tags for {product_title}")
        );
        assert_eq!(config.batch.batch_size, 20);
        assert_eq!(config.batch.max_concurrent_calls, 10);
        assert_eq!(config.store.name, "Brew Supply");
        assert_eq!(
            config.seo.collection.meta_title.as_deref(),
            Some("{name} | {store_name}")
        );
        assert_eq!(config.cleanup_rules.len(), 1);
        assert!(config.cleanup_rules[0].is_regex);
    }

    #[test]
    fn test_config_from_missing_file_errors() {
        assert!(Config::from_file("/nonexistent/shoptag.toml").is_err());
    }

    #[test]
    fn test_provider_config_prefers_configured_key() {
        let ai = AiConfig {
            api_key: Some("sk-file".to_string()),
            ..Default::default()
        };
        let config = ai.provider_config_with(|_| Some("sk-env".to_string()));
        assert_eq!(config.api_key.unwrap().expose_secret(), "sk-file");
    }

    #[test]
    fn test_provider_config_falls_back_to_env() {
        let ai = AiConfig {
            provider: ProviderKind::Gemini,
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        let config = ai.provider_config_with(|name| {
            assert_eq!(name, GEMINI_API_KEY_ENV);
            Some("g-env".to_string())
        });
        assert!(config.has_api_key());
        assert_eq!(config.model(), DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_provider_config_without_key() {
        let config = AiConfig::default().provider_config_with(|_| None);
        assert!(!config.has_api_key());
        assert_eq!(config.model(), DEFAULT_CLAUDE_MODEL);
    }

    #[test]
    fn test_provider_kind_from_str() {
        assert_eq!("Claude".parse::<ProviderKind>().unwrap(), ProviderKind::Claude);
        assert_eq!("gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert!("grok".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_ai_config_debug_redacts_key() {
        let ai = AiConfig {
            api_key: Some("sk-secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", ai);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
