//! Bundle letter labels.
//!
//! Bundle suffixes use spreadsheet-column numbering: A..Z, AA..ZZ, AAA...
//! Both the initial split and the final relabel go through `encode_label`,
//! so the two passes always agree on naming.

/// Formats a zero-based index as bijective base-26 capital letters.
///
/// `0 -> "A"`, `25 -> "Z"`, `26 -> "AA"`, `701 -> "ZZ"`, `702 -> "AAA"`.
pub fn encode_label(index: usize) -> String {
    let mut result = Vec::new();
    let mut value = index + 1;

    while value != 0 {
        let remainder = ((value - 1) % 26) as u8;
        value = (value - 1) / 26;
        result.push((b'A' + remainder) as char);
    }

    result.reverse();
    result.into_iter().collect()
}

/// Parses a label produced by `encode_label` back into its index.
///
/// Returns `None` for empty strings, anything other than `A-Z`, or values
/// that overflow `usize`.
pub fn decode_label(label: &str) -> Option<usize> {
    if label.is_empty() {
        return None;
    }
    let mut value: usize = 0;
    for b in label.bytes() {
        if !b.is_ascii_uppercase() {
            return None;
        }
        let digit = (b - b'A') as usize + 1;
        value = value.checked_mul(26)?.checked_add(digit)?;
    }
    Some(value - 1)
}

/// Builds a bundle key of the form `{cluster_key}-{label}`.
pub fn bundle_key(cluster_key: &str, index: usize) -> String {
    format!("{}-{}", cluster_key, encode_label(index))
}

/// Splits a bundle key into its cluster key and label index.
///
/// The cluster key is everything before the last `-`.
pub fn split_bundle_key(key: &str) -> Option<(&str, usize)> {
    let (cluster, suffix) = key.rsplit_once('-')?;
    if cluster.is_empty() {
        return None;
    }
    Some((cluster, decode_label(suffix)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_matches_column_names() {
        assert_eq!(encode_label(0), "A");
        assert_eq!(encode_label(1), "B");
        assert_eq!(encode_label(25), "Z");
        assert_eq!(encode_label(26), "AA");
        assert_eq!(encode_label(27), "AB");
        assert_eq!(encode_label(51), "AZ");
        assert_eq!(encode_label(52), "BA");
        assert_eq!(encode_label(701), "ZZ");
        assert_eq!(encode_label(702), "AAA");
    }

    #[test]
    fn decode_inverts_encode() {
        for i in [0, 1, 25, 26, 27, 51, 52, 675, 701, 702, 18277, 18278] {
            assert_eq!(decode_label(&encode_label(i)), Some(i));
        }
    }

    #[test]
    fn decode_rejects_garbage() {
        assert_eq!(decode_label(""), None);
        assert_eq!(decode_label("a"), None);
        assert_eq!(decode_label("A1"), None);
        assert_eq!(decode_label("ZZZZZZZZZZZZZZZZZZZZZZ"), None);
    }

    #[test]
    fn bundle_keys_round_trip_through_split() {
        assert_eq!(bundle_key("3", 27), "3-AB");
        assert_eq!(split_bundle_key("3-AB"), Some(("3", 27)));
        assert_eq!(split_bundle_key("north-1-C"), Some(("north-1", 2)));
        assert_eq!(split_bundle_key("-A"), None);
        assert_eq!(split_bundle_key("3A"), None);
    }
}
