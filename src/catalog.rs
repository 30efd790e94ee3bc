//! Product catalog files read and written by the command-line tools.

use crate::models::{CategoryResult, Product, SeoFields, TagRef, TagResult};
use crate::utils::get_extension;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Output encoding for result files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    /// CSV for `.csv` paths, JSON otherwise (including stdout)
    pub fn for_path(path: Option<&Path>) -> Self {
        match path.and_then(get_extension).as_deref() {
            Some("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

/// One CSV input row; tags are separated by `;` or `,`
#[derive(Debug, Deserialize)]
struct ProductRow {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: String,
    #[serde(default)]
    price: Option<f64>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id.filter(|id| !id.trim().is_empty()),
            title: row.title,
            description: row.description,
            tags: row
                .tags
                .split([';', ','])
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(TagRef::new)
                .collect(),
            price: row.price,
            seo: SeoFields::default(),
        }
    }
}

/// Load products from a `.json` array or a `.csv` file
pub fn load_products(path: &Path) -> Result<Vec<Product>> {
    let products: Vec<Product> = match get_extension(path).as_deref() {
        Some("json") => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open product file: {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse product JSON: {}", path.display()))?
        }
        Some("csv") => {
            let mut reader = csv::Reader::from_path(path)
                .with_context(|| format!("Failed to open product CSV: {}", path.display()))?;
            let mut products = Vec::new();
            for (line, row) in reader.deserialize::<ProductRow>().enumerate() {
                let row = row.with_context(|| format!("Invalid product row {}", line + 1))?;
                products.push(Product::from(row));
            }
            products
        }
        other => bail!(
            "Unsupported product file type {:?} for {} (expected .json or .csv)",
            other.unwrap_or(""),
            path.display()
        ),
    };

    debug!(path = %path.display(), count = products.len(), "loaded products");
    Ok(products)
}

#[derive(Debug, Serialize)]
struct TagRecord<'a, T: Serialize> {
    id: Option<&'a str>,
    title: &'a str,
    tags: T,
}

#[derive(Debug, Serialize)]
struct CategoryRecord<'a> {
    id: Option<&'a str>,
    title: &'a str,
    category: Option<&'a str>,
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    })
}

/// Write tag results to `output` (stdout when `None`)
///
/// CSV rows are `id,title,tags` with tags joined by `; `.
pub fn write_tag_results(output: Option<&Path>, results: &[TagResult<'_>]) -> Result<()> {
    let writer = open_output(output)?;
    match OutputFormat::for_path(output) {
        OutputFormat::Json => {
            let records: Vec<_> = results
                .iter()
                .map(|(product, tags)| TagRecord {
                    id: product.id.as_deref(),
                    title: &product.title,
                    tags,
                })
                .collect();
            write_json_to(writer, &records)
        }
        OutputFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for (product, tags) in results {
                csv_writer.serialize(TagRecord {
                    id: product.id.as_deref(),
                    title: &product.title,
                    tags: tags.join("; "),
                })?;
            }
            csv_writer.flush().context("Failed to write CSV output")
        }
    }
}

/// Write category results to `output` (stdout when `None`)
pub fn write_category_results(
    output: Option<&Path>,
    results: &[CategoryResult<'_>],
) -> Result<()> {
    let records: Vec<_> = results
        .iter()
        .map(|(product, category)| CategoryRecord {
            id: product.id.as_deref(),
            title: &product.title,
            category: category.as_deref(),
        })
        .collect();

    let writer = open_output(output)?;
    match OutputFormat::for_path(output) {
        OutputFormat::Json => write_json_to(writer, &records),
        OutputFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for record in &records {
                csv_writer.serialize(record)?;
            }
            csv_writer.flush().context("Failed to write CSV output")
        }
    }
}

/// Pretty-print any serializable value as JSON to `output` (stdout when `None`)
pub fn write_json<T: Serialize + ?Sized>(output: Option<&Path>, value: &T) -> Result<()> {
    write_json_to(open_output(output)?, value)
}

fn write_json_to<T: Serialize + ?Sized>(mut writer: Box<dyn Write>, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value).context("Failed to serialize output")?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
