use anyhow::{Context, Result};
use clap::Parser;
use shoptag::{
    config::{Config, ProviderKind},
    llm::create_service,
    models::Product,
    tagger::render_tags,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shoptag-tag")]
#[command(about = "Tag a single product from the command line")]
#[command(version)]
struct Cli {
    /// Product title
    #[arg(value_name = "TITLE")]
    title: String,

    /// Product description
    #[arg(short, long, default_value = "")]
    description: String,

    /// Existing tags, comma separated
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,

    /// Also pick a collection category
    #[arg(long)]
    categorize: bool,

    /// Config file (overrides default locations)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// AI provider: claude or gemini (overrides config)
    #[arg(long)]
    provider: Option<ProviderKind>,

    /// API key (overrides config and env)
    #[arg(long)]
    api_key: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

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

    let service =
        create_service(&config.ai.provider_config()).context("Failed to create AI service")?;

    let product = Product::new(cli.title.as_str(), cli.description.as_str()).with_tags(
        cli.tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty()),
    );

    println!("Tagging product: {}", product.title);
    let tags = service
        .generate_tags_blocking(&product)
        .context("Failed to run tag generation")?;
    println!("Tags: {}", render_tags(&tags));

    if cli.categorize {
        let category = service
            .analyze_for_collection_blocking(&product)
            .context("Failed to run category analysis")?;
        match category {
            Some(category) => println!("Category: {}", category),
            None => println!("Category: (none)"),
        }
    }

    Ok(())
}
