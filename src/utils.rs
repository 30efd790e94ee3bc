/// Get file extension from path (without the dot), lowercased
pub fn get_extension(path: &std::path::Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
}

/// First `max_chars` characters of `text`, never splitting a character
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Cut `text` to `max_chars`, back off to the last space and append `...`
///
/// Text without a space inside the limit is cut hard.
pub fn truncate_on_word(text: &str, max_chars: usize) -> String {
    let head = truncate_chars(text, max_chars);
    let head = match head.rfind(' ') {
        Some(idx) => &head[..idx],
        None => head,
    };
    format!("{}...", head)
}
