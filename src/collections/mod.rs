pub mod assembly;
pub mod planner;
pub mod seo;

pub use assembly::CollectionAssembler;
pub use planner::{
    plan_collections, slugify, unique_slug, PlanOptions, PlanOutcome, SkipReason, SkippedTag,
};
pub use seo::{
    apply_cleanup_rules, apply_product_seo, apply_seo_defaults, collection_variables,
    product_variables, render_seo_field, CleanupRule, SeoField, SeoTemplates, SeoVariables,
};
