//! Vendor-neutral adapter exposing the five catalog AI operations.
//!
//! Every operation first checks whether the service is configured (has a
//! completion client). Unconfigured services answer with the documented
//! sentinel without touching the network. Vendor, transport and validation
//! failures are logged and replaced by the same per-operation fallbacks, so
//! no operation here ever returns an error.

use crate::batch::BatchScheduler;
use crate::config::{ProviderConfig, ProviderKind};
use crate::constants::{
    API_KEY_MISSING_TAG, DESCRIPTION_HTML_MARKERS, ERROR_GENERATING_TAGS, KEYWORD_MAP_KEYS,
    META_DESCRIPTION_LIMIT, META_DESCRIPTION_SOFT_LIMIT,
};
use crate::error::{ProviderError, SyncBridgeError};
use crate::llm::prompts::{system_prompt, PromptKey, PromptSet};
use crate::llm::{ClaudeClient, CompletionClient, CompletionRequest, GeminiClient};
use crate::models::{KeywordMap, ProductExample};
use crate::runtime::run_sync;
use crate::tagger::{clean_tags, normalize_category, Taggable};
use crate::utils::{truncate_chars, truncate_on_word};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared completion client handle
pub type SharedClient = Arc<dyn CompletionClient>;

/// Catalog AI adapter for one vendor
pub struct AiService {
    provider: ProviderKind,
    client: Option<SharedClient>,
    prompts: PromptSet,
}

impl std::fmt::Debug for AiService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiService")
            .field("provider", &self.provider)
            .field("configured", &self.is_configured())
            .finish()
    }
}

/// Build the service for the configured vendor
pub fn create_service(config: &ProviderConfig) -> Result<AiService, ProviderError> {
    create_service_with(config, connect)
}

/// Build the service, using `connect` to create the client when a key is present
pub fn create_service_with<F>(
    config: &ProviderConfig,
    connect: F,
) -> Result<AiService, ProviderError>
where
    F: FnOnce(&ProviderConfig, SecretString) -> Result<SharedClient, ProviderError>,
{
    let prompts = PromptSet::new(config.provider, config.custom_prompts.clone());

    let key = config
        .api_key
        .as_ref()
        .map(|key| key.expose_secret().trim().to_string())
        .filter(|key| !key.is_empty());

    let Some(key) = key else {
        warn!(
            provider = %config.provider,
            "API key is missing, AI operations will return fallbacks"
        );
        return Ok(AiService::unconfigured(config.provider, prompts));
    };

    let client = connect(config, SecretString::from(key))?;
    info!(provider = %config.provider, model = %client.model(), "AI service configured");
    Ok(AiService::new(config.provider, client, prompts))
}

/// Default connector: one HTTP client per vendor
fn connect(config: &ProviderConfig, api_key: SecretString) -> Result<SharedClient, ProviderError> {
    let api_base = config.api_base.as_deref();
    let client: SharedClient = match config.provider {
        ProviderKind::Claude => Arc::new(ClaudeClient::new(
            api_key,
            config.model(),
            api_base,
            config.timeout_secs,
        )?),
        ProviderKind::Gemini => Arc::new(GeminiClient::new(
            api_key,
            config.model(),
            api_base,
            config.timeout_secs,
        )?),
    };
    Ok(client)
}

/// Fallback HTML used when description generation is unavailable
pub fn default_collection_description(tag_name: &str, product_count: usize) -> String {
    format!(
        "<p>A curated selection of {} products related to {}.</p>",
        product_count, tag_name
    )
}

/// Fallback meta description used when generation is unavailable
pub fn default_meta_description(tag_name: &str, product_titles_text: &str) -> String {
    let text = format!(
        "Explore our {} collection featuring {}. Find the perfect {} for your needs.",
        tag_name, product_titles_text, tag_name
    );
    truncate_chars(&text, META_DESCRIPTION_LIMIT).to_string()
}

/// Locate, parse and validate the JSON object in a keyword-map response
///
/// Takes the text between the first `{` and the last `}`. Returns `None`
/// when there is no object, it does not parse, or a required key is missing.
pub fn parse_keyword_map(response_text: &str) -> Option<KeywordMap> {
    let start = response_text.find('{')?;
    let end = response_text.rfind('}')?;
    if end < start {
        return None;
    }

    let value: Value = match serde_json::from_str(&response_text[start..=end]) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "keyword map response is not valid JSON");
            return None;
        }
    };

    let object = value.as_object()?;
    if let Some(missing) = KEYWORD_MAP_KEYS.iter().find(|key| !object.contains_key(**key)) {
        warn!(key = %missing, "keyword map response is missing a required key");
        return None;
    }

    match serde_json::from_value(value) {
        Ok(map) => Some(map),
        Err(e) => {
            warn!(error = %e, "keyword map response has unexpected value types");
            None
        }
    }
}

impl AiService {
    /// Configured service backed by the given client
    pub fn new(provider: ProviderKind, client: SharedClient, prompts: PromptSet) -> Self {
        Self {
            provider,
            client: Some(client),
            prompts,
        }
    }

    /// Service without credentials; every operation returns its sentinel
    pub fn unconfigured(provider: ProviderKind, prompts: PromptSet) -> Self {
        Self {
            provider,
            client: None,
            prompts,
        }
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Model in use, if configured
    pub fn model(&self) -> Option<&str> {
        self.client.as_ref().map(|client| client.model())
    }

    async fn call(
        &self,
        key: PromptKey,
        request: CompletionRequest,
    ) -> Result<String, ProviderError> {
        // callers check configuration first
        let Some(client) = &self.client else {
            return Err(ProviderError::EmptyResponse {
                provider: self.provider.as_str(),
            });
        };
        let request = request.with_system(system_prompt(key));
        client.complete(&request).await
    }

    /// Generate cleaned tags for one entity
    pub async fn generate_tags<'a, T: Taggable>(&self, entity: &'a T) -> (&'a T, Vec<String>) {
        if !self.is_configured() {
            debug!(title = %entity.title(), "API key is missing, returning api_key_missing tag");
            return (entity, vec![API_KEY_MISSING_TAG.to_string()]);
        }

        info!(provider = %self.provider, title = %entity.title(), "Generating tags");

        let prompt = self.prompts.render(
            PromptKey::GenerateTags,
            &[
                ("product_title", entity.title()),
                ("product_description", entity.description()),
            ],
        );

        match self
            .call(PromptKey::GenerateTags, CompletionRequest::new(prompt, 500, 0.2))
            .await
        {
            Ok(text) => {
                debug!(title = %entity.title(), raw = %text, "raw tags");
                let tags = clean_tags(&text);
                info!(title = %entity.title(), tags = ?tags, "Generated tags");
                (entity, tags)
            }
            Err(e) => {
                warn!(
                    title = %entity.title(),
                    category = %e.category(),
                    error = %e,
                    "Error generating tags"
                );
                (entity, vec![ERROR_GENERATING_TAGS.to_string()])
            }
        }
    }

    /// Pick the primary collection category for one entity
    pub async fn analyze_for_collection<'a, T: Taggable>(
        &self,
        entity: &'a T,
    ) -> (&'a T, Option<String>) {
        if !self.is_configured() {
            debug!(title = %entity.title(), "API key is missing, cannot analyze product");
            return (entity, None);
        }

        info!(
            provider = %self.provider,
            title = %entity.title(),
            "Analyzing product for collection"
        );

        let tag_names = entity.tag_names();
        let product_tags = if tag_names.is_empty() {
            "None".to_string()
        } else {
            tag_names.join(", ")
        };

        let prompt = self.prompts.render(
            PromptKey::AnalyzeProductForCollection,
            &[
                ("product_title", entity.title()),
                ("product_description", entity.description()),
                ("product_tags", &product_tags),
            ],
        );

        match self
            .call(
                PromptKey::AnalyzeProductForCollection,
                CompletionRequest::new(prompt, 50, 0.1),
            )
            .await
        {
            Ok(text) if text.trim().is_empty() => {
                warn!(title = %entity.title(), "empty category response");
                (entity, None)
            }
            Ok(text) => {
                let category = normalize_category(&text);
                info!(title = %entity.title(), category = %category, "Determined category");
                (entity, Some(category))
            }
            Err(e) => {
                warn!(
                    title = %entity.title(),
                    category = %e.category(),
                    error = %e,
                    "Error analyzing product for collection"
                );
                (entity, None)
            }
        }
    }

    /// HTML description for a tag-based collection
    pub async fn generate_collection_description(
        &self,
        tag_name: &str,
        product_count: usize,
        examples: &[ProductExample],
    ) -> String {
        let fallback = default_collection_description(tag_name, product_count);
        if !self.is_configured() {
            debug!(tag = %tag_name, "API key is missing, returning default collection description");
            return fallback;
        }

        info!(provider = %self.provider, tag = %tag_name, "Generating collection description");

        let examples_json = match serde_json::to_string_pretty(examples) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize product examples");
                "[]".to_string()
            }
        };
        let count = product_count.to_string();

        let prompt = self.prompts.render(
            PromptKey::GenerateCollectionDescription,
            &[
                ("tag_name", tag_name),
                ("product_count", &count),
                ("product_examples_json", &examples_json),
            ],
        );

        match self
            .call(
                PromptKey::GenerateCollectionDescription,
                CompletionRequest::new(prompt, 1000, 0.7),
            )
            .await
        {
            Ok(description) => {
                let looks_like_html = DESCRIPTION_HTML_MARKERS
                    .iter()
                    .any(|marker| description.contains(marker));
                if !looks_like_html {
                    warn!(tag = %tag_name, "description has no HTML markup, using default");
                    return fallback;
                }
                info!(tag = %tag_name, "Generated collection description");
                description
            }
            Err(e) => {
                warn!(
                    tag = %tag_name,
                    category = %e.category(),
                    error = %e,
                    "Error generating collection description"
                );
                fallback
            }
        }
    }

    /// Short SEO meta description for a tag-based collection
    pub async fn generate_collection_meta_description(
        &self,
        tag_name: &str,
        product_titles_text: &str,
    ) -> String {
        let fallback = default_meta_description(tag_name, product_titles_text);
        if !self.is_configured() {
            debug!(tag = %tag_name, "API key is missing, returning default meta description");
            return fallback;
        }

        info!(provider = %self.provider, tag = %tag_name, "Generating meta description");

        let prompt = self.prompts.render(
            PromptKey::GenerateCollectionMetaDescription,
            &[
                ("tag_name", tag_name),
                ("product_titles_text", product_titles_text),
            ],
        );

        match self
            .call(
                PromptKey::GenerateCollectionMetaDescription,
                CompletionRequest::new(prompt, 60, 0.4),
            )
            .await
        {
            Ok(meta) if meta.trim().is_empty() => {
                warn!(tag = %tag_name, "empty meta description, using default");
                fallback
            }
            Ok(meta) => {
                if meta.chars().count() > META_DESCRIPTION_SOFT_LIMIT {
                    warn!(
                        tag = %tag_name,
                        length = meta.chars().count(),
                        "meta description too long, truncating"
                    );
                    return truncate_on_word(&meta, META_DESCRIPTION_LIMIT);
                }
                meta
            }
            Err(e) => {
                warn!(
                    tag = %tag_name,
                    category = %e.category(),
                    error = %e,
                    "Error generating meta description"
                );
                fallback
            }
        }
    }

    /// Semantic keyword map for a store concept, empty on any failure
    pub async fn generate_keyword_map(&self, concept: &str) -> KeywordMap {
        if !self.is_configured() {
            debug!("API key is missing, cannot generate keyword map");
            return KeywordMap::default();
        }
        if concept.trim().is_empty() {
            warn!("concept is empty, cannot generate keyword map");
            return KeywordMap::default();
        }

        let preview = truncate_chars(concept, 50);
        info!(provider = %self.provider, concept = %preview, "Generating keyword map");

        let prompt = self
            .prompts
            .render(PromptKey::GenerateKeywordMap, &[("concept", concept)]);

        match self
            .call(
                PromptKey::GenerateKeywordMap,
                CompletionRequest::new(prompt, 1000, 0.3),
            )
            .await
        {
            Ok(text) => {
                debug!(raw = %text, "raw keyword map response");
                match parse_keyword_map(&text) {
                    Some(map) => {
                        info!(concept = %preview, "Parsed keyword map");
                        map
                    }
                    None => KeywordMap::default(),
                }
            }
            Err(e) => {
                warn!(
                    concept = %preview,
                    category = %e.category(),
                    error = %e,
                    "Error generating keyword map"
                );
                KeywordMap::default()
            }
        }
    }

    /// Tag many entities with bounded concurrency, in input order
    pub async fn batch_generate_tags<'a, T: Taggable>(
        &self,
        entities: &'a [T],
        scheduler: &BatchScheduler,
    ) -> Vec<(&'a T, Vec<String>)> {
        scheduler
            .batch_apply(entities, |entity| self.generate_tags(entity))
            .await
    }

    /// Categorize many entities with bounded concurrency, in input order
    pub async fn batch_analyze_products<'a, T: Taggable>(
        &self,
        entities: &'a [T],
        scheduler: &BatchScheduler,
    ) -> Vec<(&'a T, Option<String>)> {
        scheduler
            .batch_apply(entities, |entity| self.analyze_for_collection(entity))
            .await
    }

    pub fn generate_tags_blocking<T: Taggable>(
        &self,
        entity: &T,
    ) -> Result<Vec<String>, SyncBridgeError> {
        run_sync(async { self.generate_tags(entity).await.1 })
    }

    pub fn analyze_for_collection_blocking<T: Taggable>(
        &self,
        entity: &T,
    ) -> Result<Option<String>, SyncBridgeError> {
        run_sync(async { self.analyze_for_collection(entity).await.1 })
    }

    pub fn generate_collection_description_blocking(
        &self,
        tag_name: &str,
        product_count: usize,
        examples: &[ProductExample],
    ) -> Result<String, SyncBridgeError> {
        run_sync(self.generate_collection_description(tag_name, product_count, examples))
    }

    pub fn generate_collection_meta_description_blocking(
        &self,
        tag_name: &str,
        product_titles_text: &str,
    ) -> Result<String, SyncBridgeError> {
        run_sync(self.generate_collection_meta_description(tag_name, product_titles_text))
    }

    pub fn generate_keyword_map_blocking(
        &self,
        concept: &str,
    ) -> Result<KeywordMap, SyncBridgeError> {
        run_sync(self.generate_keyword_map(concept))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FALLBACK_TAG, UNCATEGORIZED_CATEGORY};
    use crate::llm::MockCompletionClient;
    use crate::models::Product;
    use std::collections::HashMap;

    fn service_with(mock: MockCompletionClient, provider: ProviderKind) -> AiService {
        AiService::new(
            provider,
            Arc::new(mock),
            PromptSet::new(provider, HashMap::new()),
        )
    }

    fn replying(text: &'static str) -> AiService {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .returning(move |_| Ok(text.to_string()));
        service_with(mock, ProviderKind::Claude)
    }

    fn failing() -> AiService {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().returning(|_| {
            Err(ProviderError::from_status("claude", 429, "rate limited".to_string()))
        });
        service_with(mock, ProviderKind::Claude)
    }

    fn speaker() -> Product {
        Product::new("Wireless Speaker", "Waterproof bluetooth speaker")
            .with_tags(["outdoor audio gear"])
    }

    #[tokio::test]
    async fn test_unconfigured_service_never_calls_client() {
        let config = ProviderConfig::new(ProviderKind::Claude);
        let service = create_service_with(&config, |_, _| {
            let mut mock = MockCompletionClient::new();
            mock.expect_complete().never();
            Ok(Arc::new(mock) as SharedClient)
        })
        .unwrap();
        assert!(!service.is_configured());

        let product = speaker();
        assert_eq!(service.generate_tags(&product).await.1, vec![API_KEY_MISSING_TAG]);
        assert_eq!(service.analyze_for_collection(&product).await.1, None);
        assert_eq!(
            service.generate_collection_description("desk lamps", 4, &[]).await,
            default_collection_description("desk lamps", 4)
        );
        assert_eq!(
            service.generate_collection_meta_description("desk lamps", "LED Lamp").await,
            default_meta_description("desk lamps", "LED Lamp")
        );
        assert!(service.generate_keyword_map("coffee gear").await.is_empty());
    }

    #[test]
    fn test_blank_api_key_is_unconfigured() {
        let config = ProviderConfig::new(ProviderKind::Gemini).with_api_key("   ");
        let service =
            create_service_with(&config, |_, _| panic!("connector must not run")).unwrap();
        assert!(!service.is_configured());
        assert_eq!(service.model(), None);
    }

    #[test]
    fn test_create_service_with_key_is_configured() {
        let config = ProviderConfig::new(ProviderKind::Gemini)
            .with_api_key("g-key")
            .with_model("gemini-1.5-pro");
        let service = create_service(&config).unwrap();
        assert!(service.is_configured());
        assert_eq!(service.provider(), ProviderKind::Gemini);
        assert_eq!(service.model(), Some("gemini-1.5-pro"));
    }

    #[tokio::test]
    async fn test_generate_tags_cleans_output() {
        let service =
            replying("Wireless Bluetooth Speaker, waterproof, Sale, portable audio device");
        let product = speaker();
        let (entity, tags) = service.generate_tags(&product).await;
        assert!(std::ptr::eq(entity, &product));
        assert_eq!(tags, vec!["wireless bluetooth speaker", "portable audio device"]);
    }

    #[tokio::test]
    async fn test_generate_tags_request_parameters() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .withf(|request| {
                request.max_tokens == 500
                    && (request.temperature - 0.2).abs() < f32::EPSILON
                    && request.prompt.contains("Product Title: Wireless Speaker")
                    && request.system.is_some()
            })
            .times(1)
            .returning(|_| Ok("outdoor party speaker".to_string()));
        let service = service_with(mock, ProviderKind::Claude);

        let product = speaker();
        assert_eq!(service.generate_tags(&product).await.1, vec!["outdoor party speaker"]);
    }

    #[tokio::test]
    async fn test_generate_tags_uses_custom_prompt() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .withf(|request| request.prompt == "Tag: Wireless Speaker")
            .times(1)
            .returning(|_| Ok("sale".to_string()));
        let mut overrides = HashMap::new();
        overrides.insert("generate_tags".to_string(), "Tag: {product_title}".to_string());
        let service = AiService::new(
            ProviderKind::Gemini,
            Arc::new(mock),
            PromptSet::new(ProviderKind::Gemini, overrides),
        );

        let product = speaker();
        assert_eq!(service.generate_tags(&product).await.1, vec![FALLBACK_TAG]);
    }

    #[tokio::test]
    async fn test_generate_tags_failure_sentinel() {
        let product = speaker();
        assert_eq!(
            failing().generate_tags(&product).await.1,
            vec![ERROR_GENERATING_TAGS]
        );
    }

    #[tokio::test]
    async fn test_analyze_for_collection_normalizes() {
        let product = speaker();
        assert_eq!(
            replying("Bluetooth Speakers").analyze_for_collection(&product).await.1,
            Some("bluetooth speakers".to_string())
        );
        assert_eq!(
            replying("Speakers").analyze_for_collection(&product).await.1,
            Some("speakers category".to_string())
        );
        assert_eq!(
            replying("merchandise").analyze_for_collection(&product).await.1,
            Some(UNCATEGORIZED_CATEGORY.to_string())
        );
        assert_eq!(failing().analyze_for_collection(&product).await.1, None);
    }

    #[tokio::test]
    async fn test_analyze_prompt_lists_tags() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .withf(|request| {
                request.prompt.contains("Current Tags: None") && request.max_tokens == 50
            })
            .times(1)
            .returning(|_| Ok("ceramic mugs".to_string()));
        let service = service_with(mock, ProviderKind::Claude);

        let product = Product::new("Mug", "Stoneware mug");
        assert_eq!(
            service.analyze_for_collection(&product).await.1.as_deref(),
            Some("ceramic mugs")
        );
    }

    #[tokio::test]
    async fn test_collection_description_requires_html() {
        let examples = vec![ProductExample {
            title: "LED Lamp".to_string(),
            description: "Bright".to_string(),
        }];

        let html = "<h2>Light up</h2><p>Desk lamps for every desk.</p>";
        assert_eq!(
            replying(html)
                .generate_collection_description("desk lamps", 3, &examples)
                .await,
            html
        );

        assert_eq!(
            replying("Sure! Here is your description: lamps are great.")
                .generate_collection_description("desk lamps", 3, &examples)
                .await,
            default_collection_description("desk lamps", 3)
        );

        assert_eq!(
            failing()
                .generate_collection_description("desk lamps", 3, &examples)
                .await,
            "<p>A curated selection of 3 products related to desk lamps.</p>"
        );
    }

    #[tokio::test]
    async fn test_meta_description_truncates_long_output() {
        let long = "word ".repeat(40);
        let mut mock = MockCompletionClient::new();
        let reply = long.clone();
        mock.expect_complete().returning(move |_| Ok(reply.trim().to_string()));
        let service = service_with(mock, ProviderKind::Claude);

        let meta = service
            .generate_collection_meta_description("desk lamps", "LED Lamp")
            .await;
        assert!(meta.ends_with("..."));
        assert!(meta.chars().count() <= META_DESCRIPTION_LIMIT + 3);
        assert!(!meta.trim_end_matches("...").ends_with(' '));
    }

    #[tokio::test]
    async fn test_meta_description_keeps_short_output() {
        let meta = replying("Shop desk lamps that brighten every workspace.")
            .generate_collection_meta_description("desk lamps", "LED Lamp")
            .await;
        assert_eq!(meta, "Shop desk lamps that brighten every workspace.");
    }

    #[test]
    fn test_default_meta_description_is_capped() {
        let titles = "Lamp ".repeat(60);
        let meta = default_meta_description("desk lamps", &titles);
        assert_eq!(meta.chars().count(), META_DESCRIPTION_LIMIT);
        assert!(meta.starts_with("Explore our desk lamps collection featuring"));
    }

    #[test]
    fn test_parse_keyword_map_from_prose() {
        let text = r#"Here is the map you asked for:
{
  "core_concepts": ["specialty coffee"],
  "related_topics": ["pour over brewing", "coffee grinders"],
  "long_tail_keywords": ["best burr grinder for espresso"],
  "audience_descriptors": ["home baristas"]
}
Let me know if you need anything else."#;
        let map = parse_keyword_map(text).unwrap();
        assert_eq!(map.core_concepts, vec!["specialty coffee"]);
        assert_eq!(map.related_topics.len(), 2);
        assert_eq!(map.audience_descriptors, vec!["home baristas"]);
    }

    #[test]
    fn test_parse_keyword_map_rejects_incomplete() {
        assert!(parse_keyword_map(r#"{"core_concepts": [], "related_topics": []}"#).is_none());
        assert!(parse_keyword_map("no json here").is_none());
        assert!(parse_keyword_map("} backwards {").is_none());
        assert!(parse_keyword_map("{not json}").is_none());
        assert!(parse_keyword_map(
            r#"{"core_concepts": "a", "related_topics": [], "long_tail_keywords": [], "audience_descriptors": []}"#
        )
        .is_none());
    }

    #[tokio::test]
    async fn test_generate_keyword_map() {
        let service = replying(
            r#"{"core_concepts": ["tea"], "related_topics": [], "long_tail_keywords": [], "audience_descriptors": []}"#,
        );
        assert_eq!(service.generate_keyword_map("loose leaf tea").await.core_concepts, vec!["tea"]);

        assert!(failing().generate_keyword_map("loose leaf tea").await.is_empty());
        assert!(replying("not json").generate_keyword_map("loose leaf tea").await.is_empty());
    }

    #[tokio::test]
    async fn test_generate_keyword_map_empty_concept_skips_call() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().never();
        let service = service_with(mock, ProviderKind::Claude);
        assert!(service.generate_keyword_map("   ").await.is_empty());
    }

    #[tokio::test]
    async fn test_batch_generate_tags_isolates_failures() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().returning(|request| {
            if request.prompt.contains("Broken") {
                Err(ProviderError::EmptyResponse { provider: "claude" })
            } else {
                Ok("handmade ceramic mug".to_string())
            }
        });
        let service = service_with(mock, ProviderKind::Claude);

        let products = vec![
            Product::new("Mug", ""),
            Product::new("Broken", ""),
            Product::new("Cup", ""),
        ];
        let scheduler = BatchScheduler::new(2, 2);
        let results = service.batch_generate_tags(&products, &scheduler).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].1, vec!["handmade ceramic mug"]);
        assert_eq!(results[1].1, vec![ERROR_GENERATING_TAGS]);
        assert_eq!(results[2].0.title, "Cup");
    }

    #[test]
    fn test_blocking_wrappers_outside_runtime() {
        let service = replying("stoneware coffee mug");
        let product = Product::new("Mug", "");
        assert_eq!(
            service.generate_tags_blocking(&product).unwrap(),
            vec!["stoneware coffee mug"]
        );
        assert_eq!(
            service.analyze_for_collection_blocking(&product).unwrap().as_deref(),
            Some("stoneware coffee mug")
        );
        assert!(service.generate_keyword_map_blocking("mugs").unwrap().is_empty());
    }

    #[test]
    fn test_blocking_description_wrappers_unconfigured() {
        let service = AiService::unconfigured(
            ProviderKind::Claude,
            PromptSet::new(ProviderKind::Claude, HashMap::new()),
        );
        assert_eq!(
            service
                .generate_collection_description_blocking("tea sets", 2, &[])
                .unwrap(),
            default_collection_description("tea sets", 2)
        );
        assert_eq!(
            service
                .generate_collection_meta_description_blocking("tea sets", "Kyusu")
                .unwrap(),
            default_meta_description("tea sets", "Kyusu")
        );
    }
}
