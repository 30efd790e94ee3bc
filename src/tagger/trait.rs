use crate::models::Product;

/// Read contract for entities the tagging pipeline can work on
///
/// Implement this for your own catalog model instead of converting it into
/// a `Product` first.
pub trait Taggable: Send + Sync {
    /// Title used in prompts and logs
    fn title(&self) -> &str;

    /// Free-text description used in prompts
    fn description(&self) -> &str;

    /// Names of the tags already attached, in stored order
    fn tag_names(&self) -> Vec<&str>;
}

impl Taggable for Product {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn tag_names(&self) -> Vec<&str> {
        Product::tag_names(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_is_taggable() {
        let product = Product::new("Canvas Tote", "Sturdy bag").with_tags(["canvas tote bag"]);
        let entity: &dyn Taggable = &product;
        assert_eq!(entity.title(), "Canvas Tote");
        assert_eq!(entity.description(), "Sturdy bag");
        assert_eq!(entity.tag_names(), vec!["canvas tote bag"]);
    }
}
