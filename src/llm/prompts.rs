//! Prompt templates for the five adapter operations.
//!
//! Templates use `{name}` placeholders. Only names passed to [`fill`] are
//! substituted; any other brace text (such as the JSON skeleton in the
//! keyword-map prompt) is left as-is.

use crate::config::ProviderKind;
use std::collections::HashMap;

/// Adapter operations that carry a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKey {
    GenerateTags,
    AnalyzeProductForCollection,
    GenerateCollectionDescription,
    GenerateCollectionMetaDescription,
    GenerateKeywordMap,
}

impl PromptKey {
    pub const ALL: [PromptKey; 5] = [
        PromptKey::GenerateTags,
        PromptKey::AnalyzeProductForCollection,
        PromptKey::GenerateCollectionDescription,
        PromptKey::GenerateCollectionMetaDescription,
        PromptKey::GenerateKeywordMap,
    ];

    /// Key used for custom prompt overrides in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GenerateTags => "generate_tags",
            Self::AnalyzeProductForCollection => "analyze_product_for_collection",
            Self::GenerateCollectionDescription => "generate_collection_description",
            Self::GenerateCollectionMetaDescription => "generate_collection_meta_description",
            Self::GenerateKeywordMap => "generate_keyword_map",
        }
    }
}

const CLAUDE_TAG_PROMPT: &str = "\
You are a product tagging expert. Analyze the product below and generate comprehensive, specific tags.

Product Title: {product_title}
Product Description: {product_description}

Generate tags in these groups:

1. BASE TAGS (required): nouns and adjectives from the title and description, materials, colors, sizes, styles, product types and brand names.
2. FEATURE TAGS (required): features, functionality, technical specifications and special attributes.
3. USE CASE TAGS (required): where or how the product is used, problems it solves, activities it is made for.
4. AUDIENCE TAGS (if applicable): target demographic, skill level and user groups.

Guidelines:
- Every tag MUST be a multi-word phrase of 2-4 words
- Do NOT produce single-word tags
- Tags are lowercase with no special characters
- Prefer many specific tags over a few generic ones
- Avoid generic terms such as \"product\", \"item\", \"quality\", \"value\", \"new\" or \"trending\"
- Combine related concepts into one phrase (\"stainless steel coffee maker\" rather than \"coffee maker\")

Return only the tags as a comma-separated list, without headings, categories or explanation.
";

const CLAUDE_COLLECTION_ANALYSIS_PROMPT: &str = "\
You are a product categorization expert. Determine the most appropriate primary category for the product below.

Product Title: {product_title}
Product Description: {product_description}
Current Tags: {product_tags}

The category must be:
- specific and meaningful for this product type
- useful for grouping similar products
- not generic (avoid \"product\", \"item\", \"goods\" and similar)
- a multi-word phrase of 2-3 words
- lowercase with no special characters

Useful e-commerce categories are product types (\"bluetooth speaker\", \"ceramic mug\"), primary materials (\"leather goods\") or primary functions (\"kitchen tools\").

Return only the category name, without any explanation.
";

const CLAUDE_COLLECTION_DESC_PROMPT: &str = "\
Write a unique, engaging description for a collection of {product_count} products tagged '{tag_name}'.

Example products in this collection:
{product_examples_json}

The description should:
- be creative and specific to this collection
- highlight the key features and benefits of these products
- use an engaging, conversational tone
- use HTML formatting (paragraphs, optionally a feature list)
- be 3-5 paragraphs long
- use h2 or h3 for headings, never h1

Return only the HTML content, without any explanation.
";

const CLAUDE_META_DESC_PROMPT: &str = "\
Write a concise, SEO-friendly meta description for a collection of products tagged '{tag_name}'.

Products in this collection include: {product_titles_text}

The meta description should:
- be at most 150-160 characters
- include the collection name ('{tag_name}')
- be compelling and encourage clicks
- make no claims about shipping, pricing or guarantees
- focus on the value of the collection

Return only the meta description text.
";

const KEYWORD_MAP_PROMPT: &str = "\
You are an SEO and e-commerce expert. Analyze the store concept below and produce a semantic keyword map in JSON.

Store Concept: {concept}

Produce a JSON object with exactly this structure:
{
  \"core_concepts\": [\"3-5 primary keywords for the concept\"],
  \"related_topics\": [\"5-10 keywords for related themes or product categories\"],
  \"long_tail_keywords\": [\"10-15 longer, specific phrases customers search for\"],
  \"audience_descriptors\": [\"3-5 keywords describing the target audience\"]
}

Guidelines:
- All keywords are lowercase
- Use terms customers actually search for
- Output ONLY the JSON object, with no surrounding text
";

const GEMINI_TAG_PROMPT: &str = "\
Analyze the product information below and generate comprehensive, specific tags for e-commerce collections.

Product Title: {product_title}
Product Description: {product_description}

Cover these groups:
- BASE TAGS: nouns, adjectives, materials, colors, sizes, styles, product types, brand names.
- FEATURE TAGS: features, functionality, technical specs, special attributes.
- USE CASE TAGS: how and where the product is used, problems solved, activities.
- AUDIENCE TAGS (if applicable): demographic, skill level, user groups.

Guidelines:
- Each tag MUST be a multi-word phrase (2-4 words).
- Do NOT create single-word tags.
- Tags are lowercase with no special characters.
- Avoid generic terms like \"product\", \"item\", \"quality\", \"new\".
- Combine related concepts (e.g. \"stainless steel coffee maker\").

Return ONLY the tags as a single comma-separated string.
";

const GEMINI_COLLECTION_ANALYSIS_PROMPT: &str = "\
Determine the single most appropriate primary category (2-3 words, lowercase) for the product. Focus on product type, material or function. Avoid generic terms.

Product Title: {product_title}
Product Description: {product_description}
Current Tags: {product_tags}

Return ONLY the category name.
";

const GEMINI_COLLECTION_DESC_PROMPT: &str = "\
Create a unique, engaging HTML description (3-5 paragraphs, h2/h3 for headings) for a collection named '{tag_name}' with {product_count} products. Highlight key features and benefits. Be conversational.

Example Products:
{product_examples_json}

Return ONLY the HTML content.
";

const GEMINI_META_DESC_PROMPT: &str = "\
Create a concise, SEO-friendly meta description (150-160 characters max) for the collection '{tag_name}'. Include the collection name and encourage clicks. Do not mention shipping or price. Focus on value.

Example Product Titles: {product_titles_text}

Return ONLY the meta description text.
";

/// Built-in template for an operation on a given vendor
pub fn default_template(provider: ProviderKind, key: PromptKey) -> &'static str {
    match (provider, key) {
        (ProviderKind::Claude, PromptKey::GenerateTags) => CLAUDE_TAG_PROMPT,
        (ProviderKind::Claude, PromptKey::AnalyzeProductForCollection) => {
            CLAUDE_COLLECTION_ANALYSIS_PROMPT
        }
        (ProviderKind::Claude, PromptKey::GenerateCollectionDescription) => {
            CLAUDE_COLLECTION_DESC_PROMPT
        }
        (ProviderKind::Claude, PromptKey::GenerateCollectionMetaDescription) => {
            CLAUDE_META_DESC_PROMPT
        }
        (ProviderKind::Gemini, PromptKey::GenerateTags) => GEMINI_TAG_PROMPT,
        (ProviderKind::Gemini, PromptKey::AnalyzeProductForCollection) => {
            GEMINI_COLLECTION_ANALYSIS_PROMPT
        }
        (ProviderKind::Gemini, PromptKey::GenerateCollectionDescription) => {
            GEMINI_COLLECTION_DESC_PROMPT
        }
        (ProviderKind::Gemini, PromptKey::GenerateCollectionMetaDescription) => {
            GEMINI_META_DESC_PROMPT
        }
        (_, PromptKey::GenerateKeywordMap) => KEYWORD_MAP_PROMPT,
    }
}

/// System instruction sent alongside each operation's prompt
pub fn system_prompt(key: PromptKey) -> &'static str {
    match key {
        PromptKey::GenerateTags => {
            "You are a product tagging expert that generates specific, meaningful tags that avoid generic terms and focus on distinctive product attributes."
        }
        PromptKey::AnalyzeProductForCollection => {
            "You are a product categorization expert that determines specific, meaningful categories for products, avoiding generic terms."
        }
        PromptKey::GenerateCollectionDescription => {
            "You are a creative copywriter specializing in e-commerce collection descriptions that are engaging, informative, and optimized for conversion."
        }
        PromptKey::GenerateCollectionMetaDescription => {
            "You are an SEO expert who creates compelling meta descriptions that drive clicks while staying within character limits."
        }
        PromptKey::GenerateKeywordMap => {
            "You are an SEO expert generating structured keyword data in JSON format based on a provided concept."
        }
    }
}

/// Templates for one vendor, with caller overrides applied
#[derive(Debug, Clone)]
pub struct PromptSet {
    provider: ProviderKind,
    overrides: HashMap<String, String>,
}

impl PromptSet {
    pub fn new(provider: ProviderKind, overrides: HashMap<String, String>) -> Self {
        Self { provider, overrides }
    }

    /// Override for the operation if configured, otherwise the vendor default
    pub fn template(&self, key: PromptKey) -> &str {
        self.overrides
            .get(key.as_str())
            .map(String::as_str)
            .unwrap_or_else(|| default_template(self.provider, key))
    }

    /// Fill the operation's template with the given variables
    pub fn render(&self, key: PromptKey, vars: &[(&str, &str)]) -> String {
        fill(self.template(key), vars)
    }
}

/// Substitute `{name}` placeholders in a single pass
///
/// Unknown placeholders and unmatched braces are copied verbatim, and
/// substituted values are never rescanned.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let replaced = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });

        match replaced {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
