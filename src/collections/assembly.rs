//! Turn planned collections into drafts with AI copy and SEO fields.

use super::planner::{plan_collections, slugify, unique_slug, PlanOptions};
use super::seo::{
    apply_seo_defaults, collection_variables, render_seo_field, CleanupRule, SeoField, SeoTemplates,
};
use crate::batch::BatchScheduler;
use crate::constants::{DESCRIPTION_EXAMPLE_COUNT, META_EXAMPLE_TITLE_COUNT, UNCATEGORIZED_CATEGORY};
use crate::llm::AiService;
use crate::models::{CollectionDraft, CollectionPlan, Product, ProductExample, SeoFields};
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Builds collection drafts for one store
pub struct CollectionAssembler<'a> {
    pub service: &'a AiService,
    pub scheduler: &'a BatchScheduler,
    pub templates: &'a SeoTemplates,
    pub cleanup_rules: &'a [CleanupRule],
    pub store_name: &'a str,
}

/// First character uppercased, the rest lowercased
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

impl<'a> CollectionAssembler<'a> {
    /// Plan collections from existing product tags and draft each one
    pub async fn assemble_from_tags(
        &self,
        products: &[Product],
        existing_slugs: &HashSet<String>,
        options: &PlanOptions,
    ) -> Vec<CollectionDraft> {
        let outcome = plan_collections(products, existing_slugs, options);
        self.draft_all(products, &outcome.plans).await
    }

    /// Categorize products with the AI service and draft one collection per category
    ///
    /// Products without a category, or with the uncategorized sentinel, are left out.
    pub async fn assemble_from_categories(
        &self,
        products: &[Product],
        existing_slugs: &HashSet<String>,
    ) -> Vec<CollectionDraft> {
        let results = self
            .service
            .batch_analyze_products(products, self.scheduler)
            .await;

        let mut order: Vec<String> = Vec::new();
        let mut members: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, (_, category)) in results.into_iter().enumerate() {
            let Some(category) = category else { continue };
            if category == UNCATEGORIZED_CATEGORY {
                continue;
            }
            members
                .entry(category.clone())
                .or_insert_with(|| {
                    order.push(category);
                    Vec::new()
                })
                .push(index);
        }

        let mut taken = existing_slugs.clone();
        let plans: Vec<CollectionPlan> = order
            .into_iter()
            .map(|category| {
                let slug = unique_slug(&slugify(&category), &taken);
                taken.insert(slug.clone());
                CollectionPlan {
                    name: format!("{} Collection", capitalize(&category)),
                    product_indices: members.remove(&category).unwrap_or_default(),
                    tag_name: category,
                    slug,
                }
            })
            .collect();

        info!(categories = plans.len(), "Grouped products by category");
        self.draft_all(products, &plans).await
    }

    async fn draft_all(
        &self,
        products: &[Product],
        plans: &[CollectionPlan],
    ) -> Vec<CollectionDraft> {
        self.scheduler
            .batch_apply(plans, |plan| self.draft(products, plan))
            .await
    }

    async fn draft(&self, products: &[Product], plan: &CollectionPlan) -> CollectionDraft {
        let members: Vec<&Product> = plan
            .product_indices
            .iter()
            .filter_map(|&index| products.get(index))
            .collect();
        let product_titles: Vec<String> = members.iter().map(|p| p.title.clone()).collect();

        let examples: Vec<ProductExample> = members
            .iter()
            .take(DESCRIPTION_EXAMPLE_COUNT)
            .map(|&p| ProductExample::from(p))
            .collect();
        let titles_text = product_titles
            .iter()
            .take(META_EXAMPLE_TITLE_COUNT)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        let vars = collection_variables(
            &plan.name,
            &plan.tag_name,
            &product_titles,
            members.len(),
            self.store_name,
            self.cleanup_rules,
        );

        let description_html = match self.templates.template(SeoField::Description) {
            Some(template) if !self.service.is_configured() => {
                render_seo_field(SeoField::Description, template, &vars).unwrap_or_default()
            }
            _ => {
                self.service
                    .generate_collection_description(&plan.tag_name, members.len(), &examples)
                    .await
            }
        };

        let meta_description = self
            .service
            .generate_collection_meta_description(&plan.tag_name, &titles_text)
            .await;

        let mut seo = SeoFields {
            meta_description: Some(meta_description),
            ..Default::default()
        };
        apply_seo_defaults(self.templates, &vars, false, &mut seo);

        info!(collection = %plan.name, products = members.len(), "Assembled collection");

        CollectionDraft {
            name: plan.name.clone(),
            slug: plan.slug.clone(),
            tag_name: plan.tag_name.clone(),
            product_count: members.len(),
            product_titles,
            description_html,
            seo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;
    use crate::llm::service::{default_collection_description, default_meta_description};
    use crate::llm::{MockCompletionClient, PromptSet};
    use std::sync::Arc;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("Arc Lamp", "Tall lamp").with_tags(["floor reading lamp"]),
            Product::new("Tripod Lamp", "Wooden legs").with_tags(["floor reading lamp"]),
            Product::new("Mug", "Stoneware").with_tags(["ceramic coffee mug"]),
        ]
    }

    fn unconfigured() -> AiService {
        AiService::unconfigured(
            ProviderKind::Claude,
            PromptSet::new(ProviderKind::Claude, HashMap::new()),
        )
    }

    #[tokio::test]
    async fn test_assemble_from_tags_with_fallbacks() {
        let service = unconfigured();
        let scheduler = BatchScheduler::new(10, 2);
        let templates = SeoTemplates {
            meta_title: Some("{name} | {store_name}".to_string()),
            ..Default::default()
        };
        let assembler = CollectionAssembler {
            service: &service,
            scheduler: &scheduler,
            templates: &templates,
            cleanup_rules: &[],
            store_name: "Lumen",
        };

        let products = catalog();
        let drafts = assembler
            .assemble_from_tags(&products, &HashSet::new(), &PlanOptions::default())
            .await;

        assert_eq!(drafts.len(), 1);
        let draft = &drafts[0];
        assert_eq!(draft.name, "Floor Reading Lamp Collection");
        assert_eq!(draft.slug, "floor-reading-lamp");
        assert_eq!(draft.product_count, 2);
        assert_eq!(draft.product_titles, vec!["Arc Lamp", "Tripod Lamp"]);
        assert_eq!(
            draft.description_html,
            default_collection_description("floor reading lamp", 2)
        );
        assert_eq!(
            draft.seo.meta_description.as_deref(),
            Some(default_meta_description("floor reading lamp", "Arc Lamp, Tripod Lamp").as_str())
        );
        assert_eq!(
            draft.seo.meta_title.as_deref(),
            Some("Floor Reading Lamp Collection | Lumen")
        );
    }

    #[tokio::test]
    async fn test_description_template_used_when_unconfigured() {
        let service = unconfigured();
        let scheduler = BatchScheduler::default();
        let templates = SeoTemplates {
            description: Some("<p>{product_count} picks: {example_products}</p>".to_string()),
            meta_description: Some("Shop {name} at {store_name}".to_string()),
            ..Default::default()
        };
        let assembler = CollectionAssembler {
            service: &service,
            scheduler: &scheduler,
            templates: &templates,
            cleanup_rules: &[],
            store_name: "Lumen",
        };

        let products = catalog();
        let drafts = assembler
            .assemble_from_tags(&products, &HashSet::new(), &PlanOptions::default())
            .await;

        assert_eq!(drafts[0].description_html, "<p>2 picks: Arc Lamp, Tripod Lamp</p>");
        assert_eq!(
            drafts[0].seo.meta_description.as_deref(),
            Some("Shop Floor Reading Lamp Collection at Lumen")
        );
    }

    #[tokio::test]
    async fn test_assemble_from_categories_groups_products() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().returning(|request| {
            let reply = if request.prompt.contains("Product Title: Mug") {
                "merchandise"
            } else if request.prompt.contains("Lamp") && request.max_tokens == 50 {
                "Floor Lamps"
            } else if request.max_tokens == 1000 {
                "<p>Lamps that light up a reading corner.</p>"
            } else {
                "Floor lamps for cozy reading corners."
            };
            Ok(reply.to_string())
        });
        let service = AiService::new(
            ProviderKind::Claude,
            Arc::new(mock),
            PromptSet::new(ProviderKind::Claude, HashMap::new()),
        );
        let scheduler = BatchScheduler::new(2, 2);
        let templates = SeoTemplates::default();
        let assembler = CollectionAssembler {
            service: &service,
            scheduler: &scheduler,
            templates: &templates,
            cleanup_rules: &[],
            store_name: "Lumen",
        };

        let products = catalog();
        let existing: HashSet<String> = ["floor-lamps".to_string()].into_iter().collect();
        let drafts = assembler.assemble_from_categories(&products, &existing).await;

        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].name, "Floor lamps Collection");
        assert_eq!(drafts[0].slug, "floor-lamps-1");
        assert_eq!(drafts[0].product_count, 2);
        assert_eq!(drafts[0].description_html, "<p>Lamps that light up a reading corner.</p>");
        assert_eq!(
            drafts[0].seo.meta_description.as_deref(),
            Some("Floor lamps for cozy reading corners.")
        );
    }
}
