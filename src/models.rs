use serde::{Deserialize, Serialize};

/// A tag already attached to a product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
}

impl TagRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A catalog product as seen by the tagging pipeline
///
/// Callers adapt their own persistence model to this struct. The pipeline
/// only reads it; new tags are merged by the caller once a batch completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Caller-side identifier, echoed back in outputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<TagRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "SeoFields::is_empty")]
    pub seo: SeoFields,
}

impl Product {
    /// Create a new Product with no tags
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            tags: Vec::new(),
            price: None,
            seo: SeoFields::default(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(TagRef::new).collect();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Tag names in their stored order
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }

    /// Append tags not already present, keeping existing order
    /// Returns the number of tags added
    pub fn merge_tags(&mut self, tags: &[String]) -> usize {
        let mut added = 0;
        for tag in tags {
            if !self.tags.iter().any(|t| &t.name == tag) {
                self.tags.push(TagRef::new(tag.clone()));
                added += 1;
            }
        }
        added
    }
}

/// Title/description pair sent to the collection description prompt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductExample {
    pub title: String,
    pub description: String,
}

impl From<&Product> for ProductExample {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            description: product.description.clone(),
        }
    }
}

/// Tags generated for one product
pub type TagResult<'a> = (&'a Product, Vec<String>);

/// Category chosen for one product, `None` when analysis failed
pub type CategoryResult<'a> = (&'a Product, Option<String>);

/// Semantic keyword map generated from a store concept
///
/// The default value (all lists empty) stands for "no map".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordMap {
    pub core_concepts: Vec<String>,
    pub related_topics: Vec<String>,
    pub long_tail_keywords: Vec<String>,
    pub audience_descriptors: Vec<String>,
}

impl KeywordMap {
    pub fn is_empty(&self) -> bool {
        self.core_concepts.is_empty()
            && self.related_topics.is_empty()
            && self.long_tail_keywords.is_empty()
            && self.audience_descriptors.is_empty()
    }
}

/// SEO fields of a product or collection
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeoFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_description: Option<String>,
}

impl SeoFields {
    pub fn is_empty(&self) -> bool {
        self.meta_title.is_none()
            && self.meta_description.is_none()
            && self.og_title.is_none()
            && self.og_description.is_none()
            && self.twitter_title.is_none()
            && self.twitter_description.is_none()
    }
}

/// A tag selected to become a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionPlan {
    pub tag_name: String,
    pub name: String,
    pub slug: String,
    /// Positions of the member products in the planner's input
    pub product_indices: Vec<usize>,
}

/// A fully assembled collection, ready for the caller to persist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionDraft {
    pub name: String,
    pub slug: String,
    pub tag_name: String,
    pub product_count: usize,
    pub product_titles: Vec<String>,
    pub description_html: String,
    #[serde(default)]
    pub seo: SeoFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_creation() {
        let product = Product::new("Desk Lamp", "A lamp").with_tags(["led desk lamp"]);
        assert_eq!(product.title, "Desk Lamp");
        assert_eq!(product.tag_names(), vec!["led desk lamp"]);
        assert_eq!(product.id, None);
    }

    #[test]
    fn test_merge_tags_skips_duplicates() {
        let mut product = Product::new("Mug", "").with_tags(["ceramic coffee mug"]);
        let added = product.merge_tags(&[
            "ceramic coffee mug".to_string(),
            "dishwasher safe mug".to_string(),
        ]);
        assert_eq!(added, 1);
        assert_eq!(
            product.tag_names(),
            vec!["ceramic coffee mug", "dishwasher safe mug"]
        );
    }

    #[test]
    fn test_product_deserialization_defaults() {
        let product: Product = serde_json::from_str(r#"{"title": "Speaker"}"#).unwrap();
        assert_eq!(product.description, "");
        assert!(product.tags.is_empty());
        assert_eq!(product.price, None);
    }

    #[test]
    fn test_keyword_map_default_is_empty() {
        assert!(KeywordMap::default().is_empty());
        let map = KeywordMap {
            core_concepts: vec!["coffee gear".to_string()],
            ..Default::default()
        };
        assert!(!map.is_empty());
    }
}
