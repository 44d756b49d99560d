//! Small helpers for auth validation and avatar derivation.

use regex::Regex;

/// Basic email format check (`text@text.text`), the same rule the
/// storefront's signup form applies client-side.
pub(crate) fn valid_email(email: &str) -> bool {
    Regex::new(r"\S+@\S+\.\S+").is_ok_and(|regex| regex.is_match(email))
}

/// Up to two uppercase initials from a whitespace-split display name.
pub(crate) fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

/// Placeholder avatar URL embedding the user's initials.
pub(crate) fn avatar_url(name: &str) -> String {
    format!(
        "https://placehold.co/60x60/0f172a/white?text={}",
        initials(name)
    )
}
