use crate::constants::{CATEGORY_SUFFIX, FALLBACK_TAG, GENERIC_TAGS, UNCATEGORIZED_CATEGORY};

/// Check whether a lowercased tag is on the generic denylist
pub fn is_generic_tag(tag: &str) -> bool {
    GENERIC_TAGS.contains(&tag)
}

/// Drop denylisted tags, keeping order
pub fn filter_generic_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter().filter(|tag| !is_generic_tag(tag)).collect()
}

/// Turn raw model output into a list of multi-word, lowercase tags
///
/// Never fails: when nothing survives filtering the result is the single
/// fallback tag, so callers never see an empty list.
pub fn clean_tags(raw_text: &str) -> Vec<String> {
    let collapsed = raw_text.split_whitespace().collect::<Vec<_>>().join(" ");

    let tags: Vec<String> = collapsed
        .split(',')
        .map(|fragment| fragment.trim().to_lowercase())
        .filter(|fragment| !fragment.is_empty())
        .collect();

    let tags: Vec<String> = filter_generic_tags(tags)
        .into_iter()
        .filter(|tag| tag.contains(' '))
        .collect();

    if tags.is_empty() {
        return vec![FALLBACK_TAG.to_string()];
    }

    tags
}

/// Render a tag list back to the comma-separated form models produce
pub fn render_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Normalize a category answer so it is lowercase, multi-word and specific
pub fn normalize_category(raw: &str) -> String {
    let category = raw.trim().to_lowercase();

    if is_generic_tag(&category) {
        return UNCATEGORIZED_CATEGORY.to_string();
    }

    if !category.contains(' ') {
        return format!("{} {}", category, CATEGORY_SUFFIX);
    }

    category
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_tags_filters_single_words_and_denylist() {
        let tags =
            clean_tags("Wireless Bluetooth Speaker, waterproof, Sale, portable audio device");
        assert_eq!(tags, vec!["wireless bluetooth speaker", "portable audio device"]);
    }

    #[test]
    fn test_clean_tags_collapses_whitespace() {
        let tags = clean_tags("  stainless   steel\nkettle ,\n\n  gooseneck\tpour over  ");
        assert_eq!(tags, vec!["stainless steel kettle", "gooseneck pour over"]);
    }

    #[test]
    fn test_clean_tags_empty_input_returns_fallback() {
        assert_eq!(clean_tags(""), vec![FALLBACK_TAG]);
        assert_eq!(clean_tags(",,,"), vec![FALLBACK_TAG]);
        assert_eq!(clean_tags("sale, new, quality"), vec![FALLBACK_TAG]);
    }

    #[test]
    fn test_clean_tags_is_idempotent_on_valid_lists() {
        let valid = vec![
            "ceramic coffee mug".to_string(),
            "microwave safe mug".to_string(),
            "gift for coffee lovers".to_string(),
        ];
        assert_eq!(clean_tags(&render_tags(&valid)), valid);
    }

    #[test]
    fn test_clean_tags_output_invariants() {
        let inputs = [
            "Best, Trending Now, a b, LED Lamp,, desk lamp",
            "\n\n",
            "Kit, starter kit, bundle",
        ];
        for input in inputs {
            let tags = clean_tags(input);
            assert!(!tags.is_empty());
            for tag in &tags {
                assert!(tag.contains(' '), "{tag:?} should be multi-word");
                assert!(!is_generic_tag(tag));
                assert_eq!(tag, &tag.to_lowercase());
                assert_eq!(tag, tag.trim());
            }
        }
    }

    #[test]
    fn test_denylist_words_never_multi_word() {
        // a multi-word tag can never match the denylist, only single words are listed
        assert!(GENERIC_TAGS.iter().all(|word| !word.contains(' ')));
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category("Bluetooth Speaker\n"), "bluetooth speaker");
        assert_eq!(normalize_category("Candles"), "candles category");
        assert_eq!(normalize_category("Product"), UNCATEGORIZED_CATEGORY);
    }
}
