//! Deduplication store: the set of unique credential pairs accumulated across
//! every input of a run.
//!
//! Insertion is idempotent. Iteration order of [`DedupStore::iter`] is
//! unspecified; [`DedupStore::sorted`] gives the deterministic order used for
//! output (email ascending, then secret).
use std::collections::HashSet;
use std::collections::hash_set;

use crate::credential::CredentialPair;

#[derive(Debug, Default, Clone)]
pub struct DedupStore {
    pairs: HashSet<CredentialPair>,
}

impl DedupStore {
    pub fn new() -> Self {
        Self {
            pairs: HashSet::new(),
        }
    }

    /// Insert a pair. Returns `true` when the pair was not already present.
    pub fn add(&mut self, pair: CredentialPair) -> bool {
        self.pairs.insert(pair)
    }

    pub fn contains(&self, pair: &CredentialPair) -> bool {
        self.pairs.contains(pair)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Move every pair of `other` into this store, returning how many were new.
    pub fn merge(&mut self, other: DedupStore) -> usize {
        let before = self.pairs.len();
        self.pairs.extend(other.pairs);
        self.pairs.len() - before
    }

    pub fn iter(&self) -> hash_set::Iter<'_, CredentialPair> {
        self.pairs.iter()
    }

    /// All pairs sorted by email, then secret.
    pub fn sorted(&self) -> Vec<&CredentialPair> {
        let mut out: Vec<&CredentialPair> = self.pairs.iter().collect();
        out.sort_unstable();
        out
    }

    /// Number of distinct emails; lower than `len()` when an email carries
    /// several secrets.
    pub fn unique_emails(&self) -> usize {
        self.pairs
            .iter()
            .map(CredentialPair::email)
            .collect::<HashSet<_>>()
            .len()
    }
}

impl Extend<CredentialPair> for DedupStore {
    fn extend<T: IntoIterator<Item = CredentialPair>>(&mut self, iter: T) {
        self.pairs.extend(iter);
    }
}

impl FromIterator<CredentialPair> for DedupStore {
    fn from_iter<T: IntoIterator<Item = CredentialPair>>(iter: T) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DedupStore {
    type Item = &'a CredentialPair;
    type IntoIter = hash_set::Iter<'a, CredentialPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(email: &str, secret: &str) -> CredentialPair {
        CredentialPair::new(email, secret).unwrap()
    }

    #[test]
    fn add_is_idempotent() {
        let mut s = DedupStore::new();
        assert!(s.add(p("a@b.com", "pw")));
        assert!(!s.add(p("A@B.com", "pw")));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn different_secrets_are_both_kept() {
        let s: DedupStore = [p("a@b.com", "one"), p("a@b.com", "two")]
            .into_iter()
            .collect();
        assert_eq!(s.len(), 2);
        assert_eq!(s.unique_emails(), 1);
    }

    #[test]
    fn sorted_is_by_email_then_secret() {
        let s: DedupStore = [
            p("c@x.com", "1"),
            p("a@x.com", "b"),
            p("a@x.com", "a"),
            p("b@x.com", "z"),
        ]
        .into_iter()
        .collect();
        let got: Vec<_> = s.sorted().iter().map(|c| (c.email(), c.secret())).collect();
        assert_eq!(
            got,
            vec![
                ("a@x.com", "a"),
                ("a@x.com", "b"),
                ("b@x.com", "z"),
                ("c@x.com", "1")
            ]
        );
    }

    #[test]
    fn merge_counts_only_new_pairs() {
        let mut a: DedupStore = [p("a@x.com", "1")].into_iter().collect();
        let b: DedupStore = [p("a@x.com", "1"), p("b@x.com", "2")].into_iter().collect();
        assert_eq!(a.merge(b), 1);
        assert_eq!(a.len(), 2);
        assert!(a.contains(&p("b@x.com", "2")));
    }
}
