use std::collections::{HashMap, HashSet};

use ammonia::Builder;

use crate::error::ApiError;

const RICH_TEXT_TAGS: &[&str] = &["b", "i", "u", "s", "p", "ul", "ol", "li", "a", "img"];

/// Filter user-supplied HTML down to the rich-text allow-list:
/// basic formatting, lists, links (`href`) and images (`src`).
pub fn rich_text(input: &str) -> String {
    let tags: HashSet<&str> = RICH_TEXT_TAGS.iter().copied().collect();
    let attributes = HashMap::from([
        ("a", HashSet::from(["href"])),
        ("img", HashSet::from(["src"])),
    ]);

    Builder::empty()
        .tags(tags)
        .tag_attributes(attributes)
        .generic_attributes(HashSet::new())
        .clean(input)
        .to_string()
}

/// A text field that must be present and not blank.
pub fn required_text(value: Option<String>, message: &'static str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ApiError::BadRequest(message))
}
