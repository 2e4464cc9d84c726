//! Placeholder syntax: `{{NAME}}` where `NAME` is `[A-Z_]+`.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\{\{([A-Z_]+)\}\}").expect("placeholder pattern is valid")
    })
}

/// The literal token for a placeholder name
pub fn placeholder_token(name: &str) -> String {
    format!("{{{{{name}}}}}")
}

/// Distinct placeholder names in order of first appearance
pub fn extract_placeholders(body: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    placeholder_pattern()
        .captures_iter(body)
        .filter_map(|captures| captures.get(1))
        .map(|name| name.as_str())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Placeholder names still present in rendered text
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    extract_placeholders(text)
}

/// Whether `name` is a syntactically valid placeholder name
pub fn is_valid_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_uppercase() || c == '_')
}
