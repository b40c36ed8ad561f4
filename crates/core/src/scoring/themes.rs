use crate::domain::product::dedupe_themes;

/// Returns the product's themes, unwrapping the double-encoded shape one
/// upstream producer emits: a single element holding a JSON array string such
/// as `["[\"a\",\"b\"]"]`. Anything that does not decode is used as supplied.
pub fn decode_themes(themes: &[String]) -> Vec<String> {
    if let [only] = themes {
        let trimmed = only.trim();
        if trimmed.starts_with('[') {
            if let Ok(decoded) = serde_json::from_str::<Vec<String>>(trimmed) {
                return dedupe_themes(decoded);
            }
        }
    }
    dedupe_themes(themes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::decode_themes;

    fn themes(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn double_encoded_list_is_unwrapped() {
        assert_eq!(decode_themes(&themes(&[r#"["a","b"]"#])), themes(&["a", "b"]));
    }

    #[test]
    fn plain_lists_pass_through() {
        assert_eq!(decode_themes(&themes(&["a", "b"])), themes(&["a", "b"]));
        assert_eq!(decode_themes(&themes(&["a"])), themes(&["a"]));
        assert!(decode_themes(&[]).is_empty());
    }

    #[test]
    fn undecodable_value_falls_back_to_raw() {
        assert_eq!(decode_themes(&themes(&["[not json"])), themes(&["[not json"]));
        assert_eq!(decode_themes(&themes(&["[1, 2]"])), themes(&["[1, 2]"]));
    }

    #[test]
    fn decoded_duplicates_collapse() {
        assert_eq!(decode_themes(&themes(&[r#"["a","a","b"]"#])), themes(&["a", "b"]));
    }
}
