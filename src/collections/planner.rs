//! Select which tags become collections.

use crate::constants::IMPORTED_TAG_MARKERS;
use crate::models::{CollectionPlan, Product};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, info};

/// Knobs for [`plan_collections`]
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Skip tags that look imported from the storefront
    pub exclude_imported: bool,
    /// Tags that already have a collection
    pub existing_tags: HashSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    TooFewProducts(usize),
    SingleWord,
    Underscore,
    Imported,
    AlreadyExists,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewProducts(count) => write!(f, "only {} product(s)", count),
            Self::SingleWord => write!(f, "single-word tag"),
            Self::Underscore => write!(f, "contains an underscore"),
            Self::Imported => write!(f, "imported tag"),
            Self::AlreadyExists => write!(f, "collection already exists"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTag {
    pub tag_name: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default)]
pub struct PlanOutcome {
    pub plans: Vec<CollectionPlan>,
    pub skipped: Vec<SkippedTag>,
}

/// Lowercase and replace spaces with dashes
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// `base`, or `base-1`, `base-2`, ... whichever is not yet taken
pub fn unique_slug(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{}-{}", base, counter);
        if !taken.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Uppercase the first letter of every alphabetic run
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

fn skip_reason(tag: &str, product_count: usize, options: &PlanOptions) -> Option<SkipReason> {
    if product_count <= 1 {
        return Some(SkipReason::TooFewProducts(product_count));
    }
    if tag.split_whitespace().count() < 2 {
        return Some(SkipReason::SingleWord);
    }
    if tag.contains('_') {
        return Some(SkipReason::Underscore);
    }
    if options.exclude_imported {
        let lower = tag.to_lowercase();
        if IMPORTED_TAG_MARKERS.iter().any(|marker| lower.contains(marker)) {
            return Some(SkipReason::Imported);
        }
    }
    if options.existing_tags.contains(tag) {
        return Some(SkipReason::AlreadyExists);
    }
    None
}

/// Group products by tag and plan one collection per qualifying tag
///
/// Tags are visited in first-seen order. Slugs are unique against
/// `existing_slugs` and against the slugs planned earlier in this call.
pub fn plan_collections(
    products: &[Product],
    existing_slugs: &HashSet<String>,
    options: &PlanOptions,
) -> PlanOutcome {
    let mut order: Vec<&str> = Vec::new();
    let mut members: HashMap<&str, Vec<usize>> = HashMap::new();

    for (index, product) in products.iter().enumerate() {
        for tag in &product.tags {
            let entry = members.entry(tag.name.as_str()).or_insert_with(|| {
                order.push(tag.name.as_str());
                Vec::new()
            });
            if entry.last() != Some(&index) {
                entry.push(index);
            }
        }
    }

    let mut taken = existing_slugs.clone();
    let mut outcome = PlanOutcome::default();

    for tag in order {
        let product_indices = members.remove(tag).unwrap_or_default();

        if let Some(reason) = skip_reason(tag, product_indices.len(), options) {
            debug!(tag = %tag, reason = %reason, "Skipping tag");
            outcome.skipped.push(SkippedTag {
                tag_name: tag.to_string(),
                reason,
            });
            continue;
        }

        let slug = unique_slug(&slugify(tag), &taken);
        taken.insert(slug.clone());

        outcome.plans.push(CollectionPlan {
            tag_name: tag.to_string(),
            name: format!("{} Collection", title_case(tag)),
            slug,
            product_indices,
        });
    }

    info!(
        planned = outcome.plans.len(),
        skipped = outcome.skipped.len(),
        "Planned collections from tags"
    );
    outcome
}
