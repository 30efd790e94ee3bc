//! SEO field templating and store cleanup rules.

use crate::constants::SEO_DESCRIPTION_EXCERPT_LEN;
use crate::constants::SEO_EXAMPLE_PRODUCT_COUNT;
use crate::llm::prompts::fill;
use crate::models::{Product, SeoFields};
use crate::utils::{truncate_chars, truncate_on_word};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Replacement value that stands for the empty string
const EMPTY_REPLACEMENT: &str = "''";

/// Store-defined text replacement applied before templating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanupRule {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
    #[serde(default)]
    pub is_regex: bool,
    /// Lower runs first
    #[serde(default)]
    pub priority: i32,
}

impl CleanupRule {
    pub fn literal(
        pattern: impl Into<String>,
        replacement: impl Into<String>,
        priority: i32,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            is_regex: false,
            priority,
        }
    }

    pub fn regex(
        pattern: impl Into<String>,
        replacement: impl Into<String>,
        priority: i32,
    ) -> Self {
        Self {
            is_regex: true,
            ..Self::literal(pattern, replacement, priority)
        }
    }

    fn replacement(&self) -> &str {
        if self.replacement == EMPTY_REPLACEMENT {
            ""
        } else {
            &self.replacement
        }
    }
}

/// Translate a `\1` / `\g<name>` style replacement into `regex` syntax
///
/// A literal `$` is escaped, so "$5 off" stays as written.
fn regex_replacement(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len());
    let mut chars = replacement.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '$' => out.push_str("$$"),
            '\\' => match chars.peek().copied() {
                Some(d) if d.is_ascii_digit() => {
                    let mut group = String::new();
                    while let Some(d) = chars.next_if(char::is_ascii_digit) {
                        group.push(d);
                    }
                    out.push_str(&format!("${{{}}}", group));
                }
                Some('g') => {
                    chars.next();
                    if chars.next_if_eq(&'<').is_some() {
                        let name: String = chars.by_ref().take_while(|&c| c != '>').collect();
                        out.push_str(&format!("${{{}}}", name));
                    } else {
                        out.push_str("\\g");
                    }
                }
                Some('\\') => {
                    chars.next();
                    out.push('\\');
                }
                _ => out.push('\\'),
            },
            _ => out.push(c),
        }
    }
    out
}

/// Apply rules in ascending priority and trim the result
///
/// Rules with an invalid regex are logged and skipped.
pub fn apply_cleanup_rules(text: &str, rules: &[CleanupRule]) -> String {
    let mut ordered: Vec<&CleanupRule> = rules.iter().collect();
    ordered.sort_by_key(|rule| rule.priority);

    let mut cleaned = text.to_string();
    for rule in ordered {
        if rule.is_regex {
            match Regex::new(&rule.pattern) {
                Ok(re) => {
                    let replacement = regex_replacement(rule.replacement());
                    cleaned = re.replace_all(&cleaned, replacement.as_str()).into_owned();
                }
                Err(e) => {
                    warn!(pattern = %rule.pattern, error = %e, "Skipping invalid cleanup regex");
                }
            }
        } else if !rule.pattern.is_empty() {
            cleaned = cleaned.replace(&rule.pattern, rule.replacement());
        }
    }

    cleaned.trim().to_string()
}

/// SEO fields that can be generated from templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeoField {
    MetaTitle,
    MetaDescription,
    OgTitle,
    OgDescription,
    TwitterTitle,
    TwitterDescription,
    Description,
}

impl SeoField {
    /// Fields stored in [`SeoFields`]
    pub const META: [SeoField; 6] = [
        SeoField::MetaTitle,
        SeoField::MetaDescription,
        SeoField::OgTitle,
        SeoField::OgDescription,
        SeoField::TwitterTitle,
        SeoField::TwitterDescription,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MetaTitle => "meta_title",
            Self::MetaDescription => "meta_description",
            Self::OgTitle => "og_title",
            Self::OgDescription => "og_description",
            Self::TwitterTitle => "twitter_title",
            Self::TwitterDescription => "twitter_description",
            Self::Description => "description",
        }
    }

    /// Character limit, `None` when unlimited
    pub fn limit(&self) -> Option<usize> {
        match self {
            Self::MetaTitle => Some(60),
            Self::MetaDescription => Some(160),
            Self::OgTitle => Some(95),
            Self::OgDescription => Some(200),
            Self::TwitterTitle => Some(70),
            Self::TwitterDescription => Some(200),
            Self::Description => None,
        }
    }

    fn slot<'a>(&self, fields: &'a mut SeoFields) -> Option<&'a mut Option<String>> {
        match self {
            Self::MetaTitle => Some(&mut fields.meta_title),
            Self::MetaDescription => Some(&mut fields.meta_description),
            Self::OgTitle => Some(&mut fields.og_title),
            Self::OgDescription => Some(&mut fields.og_description),
            Self::TwitterTitle => Some(&mut fields.twitter_title),
            Self::TwitterDescription => Some(&mut fields.twitter_description),
            Self::Description => None,
        }
    }
}

/// One optional template per SEO field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoTemplates {
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub og_title: Option<String>,
    #[serde(default)]
    pub og_description: Option<String>,
    #[serde(default)]
    pub twitter_title: Option<String>,
    #[serde(default)]
    pub twitter_description: Option<String>,
    /// Template for the main description body
    #[serde(default)]
    pub description: Option<String>,
}

impl SeoTemplates {
    pub fn template(&self, field: SeoField) -> Option<&str> {
        let template = match field {
            SeoField::MetaTitle => &self.meta_title,
            SeoField::MetaDescription => &self.meta_description,
            SeoField::OgTitle => &self.og_title,
            SeoField::OgDescription => &self.og_description,
            SeoField::TwitterTitle => &self.twitter_title,
            SeoField::TwitterDescription => &self.twitter_description,
            SeoField::Description => &self.description,
        };
        template.as_deref().filter(|t| !t.is_empty())
    }
}

/// Named values substituted into SEO templates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeoVariables(Vec<(&'static str, String)>);

impl SeoVariables {
    pub fn set(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    fn as_pairs(&self) -> Vec<(&str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }
}

/// Template variables for a product
pub fn product_variables(
    product: &Product,
    store_name: &str,
    rules: &[CleanupRule],
) -> SeoVariables {
    let mut vars = SeoVariables::default();
    vars.set("store_name", store_name);
    vars.set("title", apply_cleanup_rules(&product.title, rules));
    vars.set(
        "price",
        product
            .price
            .map(|price| format!("${:.2}", price))
            .unwrap_or_default(),
    );

    let description = apply_cleanup_rules(&product.description, rules);
    let mut excerpt = truncate_chars(&description, SEO_DESCRIPTION_EXCERPT_LEN).to_string();
    if description.chars().count() > SEO_DESCRIPTION_EXCERPT_LEN {
        excerpt.push_str("...");
    }
    vars.set("description_excerpt", excerpt);

    vars.set(
        "primary_tag",
        product
            .tags
            .first()
            .map(|tag| tag.name.clone())
            .unwrap_or_default(),
    );
    vars
}

/// Template variables for a collection
pub fn collection_variables(
    name: &str,
    tag_name: &str,
    example_titles: &[String],
    product_count: usize,
    store_name: &str,
    rules: &[CleanupRule],
) -> SeoVariables {
    let examples: Vec<String> = example_titles
        .iter()
        .take(SEO_EXAMPLE_PRODUCT_COUNT)
        .map(|title| apply_cleanup_rules(title, rules))
        .collect();

    let mut vars = SeoVariables::default();
    vars.set("store_name", store_name);
    vars.set("name", apply_cleanup_rules(name, rules));
    vars.set("product_count", product_count.to_string());
    vars.set("example_products", examples.join(", "));
    vars.set("tag_name", tag_name);
    vars
}

/// Render one field, truncating on a word boundary past its limit
///
/// Returns `None` when there is no template.
pub fn render_seo_field(field: SeoField, template: &str, vars: &SeoVariables) -> Option<String> {
    if template.is_empty() {
        return None;
    }

    let value = fill(template, &vars.as_pairs());
    let value = match field.limit() {
        Some(limit) if value.chars().count() > limit => {
            let cut = truncate_on_word(&value, limit);
            if cut.chars().count() > limit + 3 {
                format!("{}...", truncate_chars(&value, limit))
            } else {
                cut
            }
        }
        _ => value,
    };

    Some(value.trim().to_string())
}

/// Fill SEO fields from templates, returns how many were written
///
/// With `only_empty`, fields that already hold a non-blank value are kept.
pub fn apply_seo_defaults(
    templates: &SeoTemplates,
    vars: &SeoVariables,
    only_empty: bool,
    fields: &mut SeoFields,
) -> usize {
    let mut written = 0;
    for field in SeoField::META {
        let Some(template) = templates.template(field) else {
            continue;
        };
        let Some(slot) = field.slot(fields) else {
            continue;
        };
        if only_empty && slot.as_deref().is_some_and(|v| !v.trim().is_empty()) {
            continue;
        }
        if let Some(value) = render_seo_field(field, template, vars) {
            *slot = Some(value);
            written += 1;
        }
    }
    written
}

/// Fill every product's own SEO fields from the product templates
///
/// Returns the total number of fields written across the catalog.
pub fn apply_product_seo(
    products: &mut [Product],
    templates: &SeoTemplates,
    store_name: &str,
    rules: &[CleanupRule],
    only_empty: bool,
) -> usize {
    let mut written = 0;
    for product in products.iter_mut() {
        let vars = product_variables(product, store_name, rules);
        written += apply_seo_defaults(templates, &vars, only_empty, &mut product.seo);
    }
    debug!(products = products.len(), written, "Applied product SEO defaults");
    written
}
