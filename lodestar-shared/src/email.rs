//! Email address normalization.
//!
//! Accounts are keyed by email, so every address is normalized the same way
//! before it is stored or looked up: surrounding whitespace is dropped and the
//! domain part is lowercased. The local part is left alone because mailbox
//! names are case-sensitive on some servers.

/// Maximum stored length of an email address, matching the `accounts.email` column
pub const MAX_EMAIL_LEN: usize = 255;

/// Normalizes an email address for storage and lookup
///
/// The split happens at the last `@`. Input without an `@` only has its
/// whitespace trimmed.
///
/// ```
/// use lodestar_shared::email::normalize_email;
///
/// assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "Jane.Doe@example.com");
/// assert_eq!(normalize_email("no-at-sign"), "no-at-sign");
/// ```
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_is_lowercased() {
        assert_eq!(normalize_email("user@EXAMPLE.com"), "user@example.com");
    }

    #[test]
    fn test_local_part_is_preserved() {
        assert_eq!(normalize_email("MixedCase@Example.org"), "MixedCase@example.org");
    }

    #[test]
    fn test_splits_on_last_at_sign() {
        assert_eq!(
            normalize_email("\"weird@local\"@Example.NET"),
            "\"weird@local\"@example.net"
        );
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(normalize_email("\t user@example.com \n"), "user@example.com");
        assert_eq!(normalize_email("   "), "");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = normalize_email(" Someone@Sub.Example.COM ");
        assert_eq!(normalize_email(&once), once);
    }
}
