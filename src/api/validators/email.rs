//! Email address validation.

/// Maximum accepted local-part length.
const MAX_LOCAL_LEN: usize = 32;

/// Accept 1-32 characters of `[a-z0-9._-]`, case-insensitive.
pub fn is_valid_local_part(local: &str) -> bool {
    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        return false;
    }
    local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
}

/// Loose destination address check: exactly one `@`, no whitespace, and at
/// least one `.` in the domain part.
///
/// Deliberately NOT a full RFC validator. Tightening this would reject
/// previously-accepted real-world addresses.
pub fn is_valid_destination(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    // A dot that is neither the first nor the last character of the domain.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i < domain.len() - 1)
}
