//! Credential pair data model and email-shape validation.
//!
//! A [`CredentialPair`] can only be built through [`CredentialPair::new`],
//! which trims both sides, lowercases the email and rejects anything that
//! fails [`is_valid_email`]. Pairs are immutable afterwards; equality, hashing
//! and ordering all use the full `(email, secret)` tuple, so the derived `Ord`
//! sorts by email first and secret second.
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[a-zA-Z0-9]+$").expect("email pattern is a valid regex")
});

/// Permissive email-shape check: `local@domain.label`, no `@` or whitespace in
/// either side, and an alphanumeric final label.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// A validated `(email, secret)` tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CredentialPair {
    email: String,
    secret: String,
}

impl CredentialPair {
    /// Normalize and validate a raw email candidate and secret. Returns `None`
    /// when the email does not have a valid shape.
    pub fn new(email: &str, secret: &str) -> Option<Self> {
        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return None;
        }
        Some(Self {
            email,
            secret: secret.trim().to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Substring after the `@` of the email.
    pub fn domain(&self) -> &str {
        self.email
            .split_once('@')
            .map(|(_, domain)| domain)
            .unwrap_or_default()
    }

    pub fn into_parts(self) -> (String, String) {
        (self.email, self.secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("first.last+tag@mail.co.uk"));
        assert!(is_valid_email("x@y.z9"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@b.c-m"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn new_lowercases_and_trims() {
        let p = CredentialPair::new("  Alice@Example.COM ", "  Passw0rd! ").unwrap();
        assert_eq!(p.email(), "alice@example.com");
        assert_eq!(p.secret(), "Passw0rd!");
        assert_eq!(p.domain(), "example.com");
    }

    #[test]
    fn new_keeps_secret_case_and_inner_spaces() {
        let p = CredentialPair::new("bob@test.org", " Hunter 2 ").unwrap();
        assert_eq!(p.secret(), "Hunter 2");
    }

    #[test]
    fn new_rejects_invalid_email() {
        assert!(CredentialPair::new("bob", "pw").is_none());
    }

    #[test]
    fn ordering_is_email_then_secret() {
        let a = CredentialPair::new("a@x.com", "zzz").unwrap();
        let b = CredentialPair::new("b@x.com", "aaa").unwrap();
        let a2 = CredentialPair::new("a@x.com", "aaa").unwrap();
        let mut v = vec![b.clone(), a.clone(), a2.clone()];
        v.sort();
        assert_eq!(v, vec![a2, a, b]);
    }
}
