//! Shared place-name alias table.
//!
//! Each group lists spellings that refer to the same place. Lookups are
//! case-insensitive and symmetric: any member of a group expands to the
//! whole group.

use std::collections::BTreeSet;

const ALIAS_GROUPS: &[&[&str]] = &[
    &["hubli", "hubballi", "huballi"],
    &["dharwad", "dharwar"],
    &["bangalore", "bengaluru", "banglore"],
    &["mysore", "mysuru"],
    &["mangalore", "mangaluru"],
    &["belgaum", "belagavi"],
    &["gulbarga", "kalaburagi"],
    &["bijapur", "vijayapura"],
    &["shimoga", "shivamogga"],
    &["tumkur", "tumakuru"],
    &["bellary", "ballari"],
    &["bombay", "mumbai"],
];

fn group_for(token: &str) -> Option<&'static [&'static str]> {
    ALIAS_GROUPS
        .iter()
        .copied()
        .find(|group| group.contains(&token))
}

/// Every spelling interchangeable with `token`, including the token itself
/// (lowercased).
pub fn canonicalize(token: &str) -> BTreeSet<String> {
    let token = token.trim().to_lowercase();
    let mut variants: BTreeSet<String> = group_for(&token)
        .map(|group| group.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default();
    variants.insert(token);
    variants
}

/// The query token first, followed by its other known spellings.
pub fn expand_query(token: &str) -> Vec<String> {
    let token = token.trim().to_lowercase();
    let mut expanded = vec![token.clone()];
    if let Some(group) = group_for(&token) {
        expanded.extend(
            group
                .iter()
                .filter(|variant| **variant != token)
                .map(|variant| variant.to_string()),
        );
    }
    expanded
}
