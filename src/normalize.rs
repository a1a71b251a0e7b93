use crate::credential::CredentialPair;

/// Field delimiters in priority order.
pub const DELIMITERS: [char; 4] = [':', '|', ';', ','];

/// How many delimiters a line gets to try before it is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DelimiterPolicy {
    /// Try every delimiter present in the line, in priority order, until one
    /// produces a valid email.
    #[default]
    FallThrough,
    /// Only the highest-priority delimiter present in the line is tried.
    FirstFound,
}

/// Split on the first occurrence of `delim`; the remainder keeps any further
/// occurrences so secrets containing the delimiter survive intact.
pub fn split_on(line: &str, delim: char) -> Option<CredentialPair> {
    let (email, secret) = line.trim().split_once(delim)?;
    CredentialPair::new(email, secret)
}

pub fn normalize_line(line: &str, policy: DelimiterPolicy) -> Option<CredentialPair> {
    for delim in DELIMITERS.into_iter().filter(|d| line.contains(*d)) {
        if let Some(pair) = split_on(line, delim) {
            return Some(pair);
        }
        if policy == DelimiterPolicy::FirstFound {
            return None;
        }
    }
    None
}

pub fn normalize_contents(contents: &str, policy: DelimiterPolicy) -> Vec<CredentialPair> {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| normalize_line(line, policy))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(line: &str) -> Option<(String, String)> {
        normalize_line(line, DelimiterPolicy::default()).map(CredentialPair::into_parts)
    }

    #[test]
    fn colon_line_is_lowercased() {
        assert_eq!(
            pair("Alice@Example.com:Passw0rd!"),
            Some(("alice@example.com".into(), "Passw0rd!".into()))
        );
    }

    #[test]
    fn each_delimiter_is_recognized() {
        for line in [
            "a@b.com:pw",
            "a@b.com|pw",
            "a@b.com;pw",
            "a@b.com,pw",
            "  a@b.com : pw  ",
        ] {
            assert_eq!(pair(line), Some(("a@b.com".into(), "pw".into())), "{line}");
        }
    }

    #[test]
    fn secret_keeps_repeated_delimiter() {
        assert_eq!(
            pair("a@b.com:pa:ss:wd"),
            Some(("a@b.com".into(), "pa:ss:wd".into()))
        );
        assert_eq!(
            pair("a@b.com|x|y"),
            Some(("a@b.com".into(), "x|y".into()))
        );
    }

    #[test]
    fn no_delimiter_yields_nothing() {
        assert_eq!(pair("alice@example.com"), None);
        assert_eq!(pair(""), None);
    }

    #[test]
    fn invalid_email_yields_nothing() {
        assert_eq!(pair("not-an-email,12345"), None);
        assert_eq!(pair("user:secret"), None);
    }

    #[test]
    fn empty_secret_is_kept() {
        assert_eq!(pair("a@b.com:"), Some(("a@b.com".into(), String::new())));
    }

    #[test]
    fn fall_through_tries_lower_priority_delimiters() {
        // ':' is present but its first field is not an email; '|' succeeds.
        let line = "a@b.com|pass:word";
        assert_eq!(
            normalize_line(line, DelimiterPolicy::FallThrough).map(CredentialPair::into_parts),
            Some(("a@b.com".into(), "pass:word".into()))
        );
    }

    #[test]
    fn first_found_stops_after_first_delimiter() {
        let line = "a@b.com|pass:word";
        assert_eq!(normalize_line(line, DelimiterPolicy::FirstFound), None);
        assert!(normalize_line("a@b.com:pass|word", DelimiterPolicy::FirstFound).is_some());
    }

    #[test]
    fn contents_skip_blank_and_invalid_lines() {
        let pairs = normalize_contents(
            "\nx@y.com:1\n   \ngarbage\nINSERT INTO t VALUES (1);\nz@y.com;2\n",
            DelimiterPolicy::default(),
        );
        let emails: Vec<_> = pairs.iter().map(|p| p.email()).collect();
        assert_eq!(emails, vec!["x@y.com", "z@y.com"]);
    }
}
