//! Street-name sort keys.

use std::sync::LazyLock;

use regex::Regex;

/// Leading house number, optionally with a single unit letter ("42B ").
static HOUSE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+[A-Za-z]?\s+").expect("house number pattern"));

/// Extracts a case-insensitive street key from a free-text address.
///
/// 1. Strip a leading house number (`123 ` or `42B `).
/// 2. Drop everything from the first comma on (city, state, ZIP).
/// 3. Trim and lower-case.
///
/// The result is only ever used for ordering; it is not a parsed address.
pub fn street_key(address: &str) -> String {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let street = HOUSE_NUMBER.replace(trimmed, "");
    let street = street.split(',').next().unwrap_or_default();
    street.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_number_and_locality() {
        assert_eq!(street_key("42B Main St, Springfield"), "main st");
        assert_eq!(street_key("123 Elm Avenue, Milton, MA 02186"), "elm avenue");
    }

    #[test]
    fn keeps_addresses_without_numbers() {
        assert_eq!(street_key("Old Post Road"), "old post road");
        assert_eq!(street_key("  High St , Town"), "high st");
    }

    #[test]
    fn number_must_be_followed_by_space() {
        // "1st" is part of the street name, not a house number.
        assert_eq!(street_key("1st Avenue, Springfield"), "1st avenue");
        assert_eq!(street_key("10 1st Avenue"), "1st avenue");
    }

    #[test]
    fn empty_input_gives_empty_key() {
        assert_eq!(street_key(""), "");
        assert_eq!(street_key("   "), "");
        assert_eq!(street_key(", Springfield"), "");
    }
}
