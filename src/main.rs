use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use shoptag::{
    batch::BatchScheduler,
    catalog,
    collections::{apply_product_seo, CollectionAssembler, PlanOptions, SeoTemplates},
    config::{Config, ProviderKind},
    constants::{
        API_KEY_MISSING_TAG, DESCRIPTION_EXAMPLE_COUNT, ERROR_GENERATING_TAGS,
        META_EXAMPLE_TITLE_COUNT,
    },
    llm::{create_service, AiService},
    models::{Product, ProductExample},
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shoptag")]
#[command(about = "AI-assisted tagging, categorization and collection copy for product catalogs")]
#[command(version)]
struct Cli {
    /// Config file (defaults to config/settings.toml or ~/.config/shoptag/settings.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// AI provider: claude or gemini (overrides config)
    #[arg(long, global = true)]
    provider: Option<ProviderKind>,

    /// API key (overrides config and env)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Model name (overrides config)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Products per batch (overrides config)
    #[arg(long, global = true)]
    batch_size: Option<usize>,

    /// Maximum concurrent AI calls (overrides config)
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate tags for every product in a catalog file
    Tag {
        /// Product file (.json or .csv)
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Output file (.json or .csv), stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the catalog back with the new tags merged in (JSON)
        #[arg(long)]
        merge: bool,
    },
    /// Pick a collection category for every product
    Categorize {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate an HTML description for a tag collection
    Describe {
        /// Tag the collection is built from
        #[arg(value_name = "TAG")]
        tag: String,
        /// Products used as examples
        #[arg(long)]
        products: Option<PathBuf>,
    },
    /// Generate an SEO meta description for a tag collection
    Meta {
        #[arg(value_name = "TAG")]
        tag: String,
        /// Example product titles, comma separated
        #[arg(long)]
        titles: Option<String>,
        /// Products whose titles are used as examples
        #[arg(long)]
        products: Option<PathBuf>,
    },
    /// Generate a semantic keyword map for a store concept
    Keywords {
        #[arg(value_name = "CONCEPT")]
        concept: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Plan and draft collections from product tags or AI categories
    Collections {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Group by AI-chosen category instead of existing tags
        #[arg(long)]
        from_categories: bool,
        /// Skip tags that look imported from the storefront
        #[arg(long)]
        exclude_imported: bool,
        /// Slugs already in use, comma separated
        #[arg(long, value_delimiter = ',')]
        existing_slugs: Vec<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fill product SEO fields from the [seo.product] templates
    Seo {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Replace fields that already hold a value
        #[arg(long)]
        overwrite: bool,
        /// Output catalog (JSON), stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load().unwrap_or_default(),
    };

    if let Some(provider) = cli.provider {
        config.ai.provider = provider;
    }
    if let Some(key) = &cli.api_key {
        config.ai.api_key = Some(key.clone());
    }
    if let Some(model) = &cli.model {
        config.ai.model_name = Some(model.clone());
    }
    if let Some(batch_size) = cli.batch_size {
        config.batch.batch_size = batch_size;
    }
    if let Some(concurrency) = cli.concurrency {
        config.batch.max_concurrent_calls = concurrency;
    }

    Ok(config)
}

/// Scheduler that advances a progress bar at every slice checkpoint
///
/// Each batch run restarts the bar at its own length, so multi-stage
/// commands show one pass per stage.
fn scheduler_with_progress(config: &Config, total: usize) -> Result<(BatchScheduler, ProgressBar)> {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({msg})",
            )?
            .progress_chars("#>-"),
    );

    let bar = pb.clone();
    let scheduler = BatchScheduler::from_config(&config.batch).with_progress(move |progress| {
        if progress.slice == 1 {
            bar.reset();
            bar.set_length(progress.total as u64);
        }
        bar.set_position(progress.completed as u64);
        bar.set_message(format!("batch {}/{}", progress.slice, progress.total_slices));
    });
    Ok((scheduler, pb))
}

fn example_products<'a>(products: &'a [Product], tag: &str) -> Vec<&'a Product> {
    let tagged: Vec<&Product> = products
        .iter()
        .filter(|p| p.tags.iter().any(|t| t.name == tag))
        .collect();
    if tagged.is_empty() {
        products.iter().collect()
    } else {
        tagged
    }
}

fn load_optional(path: Option<&Path>) -> Result<Vec<Product>> {
    match path {
        Some(path) => catalog::load_products(path),
        None => Ok(Vec::new()),
    }
}

async fn run(cli: Cli, config: Config, service: AiService) -> Result<()> {
    match cli.command {
        Commands::Tag { input, output, merge } => {
            let mut products = catalog::load_products(&input)?;
            info!(products = products.len(), provider = %service.provider(), "Tagging products");

            let (scheduler, pb) = scheduler_with_progress(&config, products.len())?;
            let generated: Vec<Vec<String>> = {
                let results = service.batch_generate_tags(&products, &scheduler).await;
                pb.finish_with_message("done");
                if !merge {
                    catalog::write_tag_results(output.as_deref(), &results)?;
                }
                results.into_iter().map(|(_, tags)| tags).collect()
            };

            if merge {
                let mut added = 0;
                for (product, tags) in products.iter_mut().zip(&generated) {
                    let usable: Vec<String> = tags
                        .iter()
                        .filter(|t| *t != API_KEY_MISSING_TAG && *t != ERROR_GENERATING_TAGS)
                        .cloned()
                        .collect();
                    added += product.merge_tags(&usable);
                }
                info!(added, "Merged generated tags");
                catalog::write_json(output.as_deref(), &products)?;
            }
        }
        Commands::Categorize { input, output } => {
            let products = catalog::load_products(&input)?;
            info!(
                products = products.len(),
                provider = %service.provider(),
                "Categorizing products"
            );

            let (scheduler, pb) = scheduler_with_progress(&config, products.len())?;
            let results = service.batch_analyze_products(&products, &scheduler).await;
            pb.finish_with_message("done");

            let categorized = results.iter().filter(|(_, c)| c.is_some()).count();
            info!(categorized, total = results.len(), "Categorization finished");
            catalog::write_category_results(output.as_deref(), &results)?;
        }
        Commands::Describe { tag, products } => {
            let products = load_optional(products.as_deref())?;
            let members = example_products(&products, &tag);
            let examples: Vec<ProductExample> = members
                .iter()
                .take(DESCRIPTION_EXAMPLE_COUNT)
                .map(|&p| ProductExample::from(p))
                .collect();

            let html = service
                .generate_collection_description(&tag, members.len(), &examples)
                .await;
            println!("{}", html);
        }
        Commands::Meta { tag, titles, products } => {
            let titles = match titles {
                Some(titles) => titles,
                None => {
                    let products = load_optional(products.as_deref())?;
                    example_products(&products, &tag)
                        .iter()
                        .take(META_EXAMPLE_TITLE_COUNT)
                        .map(|p| p.title.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                }
            };

            let meta = service.generate_collection_meta_description(&tag, &titles).await;
            println!("{}", meta);
        }
        Commands::Keywords { concept, output } => {
            let map = service.generate_keyword_map(&concept).await;
            if map.is_empty() {
                warn!(concept = %concept, "No keyword map could be generated for this concept");
            }
            catalog::write_json(output.as_deref(), &map)?;
        }
        Commands::Collections {
            input,
            from_categories,
            exclude_imported,
            existing_slugs,
            output,
        } => {
            let products = catalog::load_products(&input)?;
            let existing_slugs: HashSet<String> = existing_slugs
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();

            let (scheduler, pb) = scheduler_with_progress(&config, products.len())?;
            let assembler = CollectionAssembler {
                service: &service,
                scheduler: &scheduler,
                templates: &config.seo.collection,
                cleanup_rules: &config.cleanup_rules,
                store_name: &config.store.name,
            };

            let drafts = if from_categories {
                assembler.assemble_from_categories(&products, &existing_slugs).await
            } else {
                let options = PlanOptions {
                    exclude_imported,
                    ..Default::default()
                };
                assembler
                    .assemble_from_tags(&products, &existing_slugs, &options)
                    .await
            };
            pb.finish_and_clear();

            info!(collections = drafts.len(), "Drafted collections");
            catalog::write_json(output.as_deref(), &drafts)?;
        }
        Commands::Seo { input, overwrite, output } => {
            let mut products = catalog::load_products(&input)?;
            if config.seo.product == SeoTemplates::default() {
                warn!("No [seo.product] templates configured, catalog is written unchanged");
            }

            let written = apply_product_seo(
                &mut products,
                &config.seo.product,
                &config.store.name,
                &config.cleanup_rules,
                !overwrite,
            );
            info!(products = products.len(), written, "Applied product SEO templates");
            catalog::write_json(output.as_deref(), &products)?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let service =
        create_service(&config.ai.provider_config()).context("Failed to create AI service")?;

    if !service.is_configured() {
        warn!(
            provider = %config.ai.provider,
            env = config.ai.provider.api_key_env(),
            "No API key configured, results will be placeholders"
        );
    }

    if let Err(e) = run(cli, config, service).await {
        error!(error = %e, "command failed");
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_seo_subcommand_defaults_to_only_empty() {
        let cli = Cli::try_parse_from(["shoptag", "seo", "products.json"]).unwrap();
        match cli.command {
            Commands::Seo { input, overwrite, output } => {
                assert_eq!(input, PathBuf::from("products.json"));
                assert!(!overwrite);
                assert_eq!(output, None);
            }
            _ => panic!("expected the seo subcommand"),
        }
    }
}
