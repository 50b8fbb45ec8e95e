//! Item ID generation
//!
//! IDs use the format: `{type}-{slug}-{12-char-hex}`
//! Example: `content-twitter-9f1c04b2e7aa`

/// Generate an ID from a type and label
pub fn generate_id(domain_type: &str, label: &str) -> String {
    let simple = uuid::Uuid::now_v7().simple().to_string();
    // v7 leads with the timestamp; the tail is random
    let suffix = &simple[simple.len() - 12..];
    format!("{}-{}-{}", domain_type, slugify(label), suffix)
}

/// Slugify a label for use in IDs
fn slugify(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c == '\'' || c == '\u{2019}' || c == '\u{2018}' {
                None
            } else {
                Some('-')
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
