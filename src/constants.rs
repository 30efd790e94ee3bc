/// Constants used throughout shoptag
/// This module centralizes the denylist, sentinel values and field limits

/// Overly broad words that never make useful tags or categories
/// Matched exactly against lowercased, trimmed tag text
pub const GENERIC_TAGS: &[&str] = &[
    "product",
    "item",
    "good",
    "merchandise",
    "quality",
    "value",
    "best",
    "new",
    "popular",
    "trending",
    "featured",
    "recommended",
    // Promotional wording
    "sale",
    "discount",
    "deal",
    "offer",
    "promotion",
    "bargain",
    // Catch-all buckets
    "general",
    "misc",
    "miscellaneous",
    "other",
    "various",
    "assorted",
    // Grouping nouns
    "collection",
    "set",
    "bundle",
    "pack",
    "kit",
    "package",
    "group",
];

/// Returned by the tag cleaner when every fragment was filtered out
pub const FALLBACK_TAG: &str = "multi word tag";

/// Tag sentinel for an adapter without credentials
pub const API_KEY_MISSING_TAG: &str = "api_key_missing";

/// Tag sentinel for a failed vendor call
pub const ERROR_GENERATING_TAGS: &str = "error generating tags";

/// Category used when the model answers with a denylisted word
pub const UNCATEGORIZED_CATEGORY: &str = "uncategorized product";

/// Appended to single-word categories so every category is multi-word
pub const CATEGORY_SUFFIX: &str = "category";

/// Default number of entities per batch slice
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Default number of in-flight vendor calls per batch slice
pub const DEFAULT_MAX_CONCURRENT_CALLS: usize = 10;

/// Default HTTP timeout for vendor calls, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_CLAUDE_MODEL: &str = "claude-3-7-sonnet-20250219";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

pub const CLAUDE_API_BASE: &str = "https://api.anthropic.com";
pub const CLAUDE_API_VERSION: &str = "2023-06-01";
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Environment variables consulted when no API key is configured
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Keys a keyword map must carry to be accepted
pub const KEYWORD_MAP_KEYS: &[&str] = &[
    "core_concepts",
    "related_topics",
    "long_tail_keywords",
    "audience_descriptors",
];

/// HTML markers a generated collection description must contain
pub const DESCRIPTION_HTML_MARKERS: &[&str] = &["<p>", "<h2>", "<h3>"];

/// Meta descriptions above this length are truncated
pub const META_DESCRIPTION_SOFT_LIMIT: usize = 170;

/// Length meta descriptions are truncated to
pub const META_DESCRIPTION_LIMIT: usize = 160;

/// Number of example products sent to the description prompt
pub const DESCRIPTION_EXAMPLE_COUNT: usize = 5;

/// Number of product titles sent to the meta description prompt
pub const META_EXAMPLE_TITLE_COUNT: usize = 5;

/// Number of example product titles exposed to collection SEO templates
pub const SEO_EXAMPLE_PRODUCT_COUNT: usize = 3;

/// Length of the description excerpt exposed to product SEO templates
pub const SEO_DESCRIPTION_EXCERPT_LEN: usize = 100;

/// Store name used in SEO templates when none is configured
pub const DEFAULT_STORE_NAME: &str = "Our Store";

/// Words marking a tag as imported from Shopify rather than generated
pub const IMPORTED_TAG_MARKERS: &[&str] = &["imported", "shopify"];
