use lazy_static::lazy_static;
use regex::Regex;

/// Default cap for [`clean_text`]
pub const DEFAULT_MAX_LENGTH: usize = 400;

/// Cap applied to a whole description before it is split
pub const DESCRIPTION_MAX_LENGTH: usize = 1200;

lazy_static! {
    /// Anything shaped like a tag, valid markup or not
    static ref TAG: Regex = Regex::new(r"<[^>]*>").expect("tag pattern");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("whitespace pattern");
    /// Whitespace other than line breaks
    static ref INLINE_WHITESPACE: Regex = Regex::new(r"[^\S\r\n]+").expect("inline whitespace pattern");
    /// Markup that ends a line when rendered
    static ref LINE_BREAK_TAG: Regex =
        Regex::new(r"(?i)<br\s*/?>|</(?:p|div|li)\s*>").expect("line break tag pattern");
    static ref SEGMENT_BREAK: Regex = Regex::new(r"\r?\n|\r|•|-\s+").expect("segment break pattern");
}

/// Strip markup, collapse whitespace and cap the length.
///
/// Over-long results are cut to `max_length` characters and get a literal
/// `"..."` appended, so the output can be up to three characters longer
/// than the cap.
pub fn clean_text(value: &str, max_length: usize) -> String {
    if value.is_empty() {
        return String::new();
    }

    let stripped = TAG.replace_all(value, "");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    truncate(collapsed.trim(), max_length)
}

/// Split a description into its lines and list items, in order.
///
/// Cleaning keeps line breaks (including `<br>`-style markup) so they can
/// separate segments; every other run of whitespace collapses to one space.
pub fn split_description_segments(description: &str) -> Vec<String> {
    if description.is_empty() {
        return Vec::new();
    }

    let with_breaks = LINE_BREAK_TAG.replace_all(description, "\n");
    let stripped = TAG.replace_all(&with_breaks, "");
    let collapsed = INLINE_WHITESPACE.replace_all(&stripped, " ");
    let cleaned = truncate(collapsed.trim(), DESCRIPTION_MAX_LENGTH);

    SEGMENT_BREAK
        .split(&cleaned)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

fn truncate(value: &str, max_length: usize) -> String {
    match value.char_indices().nth(max_length) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}
