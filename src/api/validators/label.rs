//! Subdomain label validation.

/// Minimum label length after sanitization.
const MIN_LABEL_LEN: usize = 3;

/// Normalize a requested subdomain label: lower-case, strip everything
/// outside `[a-z0-9-]`, reject anything shorter than three characters.
///
/// Pure and deterministic. Only charset and length are checked, so a label
/// of dashes alone (`"---"`) is accepted.
pub fn sanitize(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    if cleaned.len() < MIN_LABEL_LEN {
        return None;
    }
    Some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_input_is_normalized() {
        assert_eq!(sanitize("My_Cool-Site!"), Some("mycool-site".to_string()));
    }

    #[test]
    fn test_short_label_rejected() {
        assert_eq!(sanitize("ab"), None);
        assert_eq!(sanitize("a"), None);
        assert_eq!(sanitize(""), None);
    }

    #[test]
    fn test_stripping_can_drop_below_minimum() {
        // Four characters, but only two survive the charset filter.
        assert_eq!(sanitize("a!b?"), None);
    }

    #[test]
    fn test_dashes_alone_are_accepted() {
        // Only charset and length are checked.
        assert_eq!(sanitize("---"), Some("---".to_string()));
    }

    #[test]
    fn test_valid_labels_pass_through() {
        assert_eq!(sanitize("lab"), Some("lab".to_string()));
        assert_eq!(sanitize("my-site-01"), Some("my-site-01".to_string()));
    }

    #[test]
    fn test_uppercase_is_lowered() {
        assert_eq!(sanitize("LAB01"), Some("lab01".to_string()));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(sanitize("My_Cool-Site!"), sanitize("My_Cool-Site!"));
    }
}
