//! Statistical summaries over the deduplicated store.
//!
//! Everything here is a read-only pass. Frequency rankings walk the store in
//! sorted order and break count ties by first-encountered order, so a summary
//! is reproducible for a given set of pairs.
use std::cmp::Reverse;
use std::collections::HashMap;

use crate::store::DedupStore;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total_pairs: usize,
    pub unique_emails: usize,
    pub top_domains: Vec<(String, usize)>,
    pub top_secrets: Vec<(String, usize)>,
}

pub fn summarize(store: &DedupStore, top_n: usize) -> Summary {
    Summary {
        total_pairs: store.len(),
        unique_emails: store.unique_emails(),
        top_domains: top_domains(store, top_n),
        top_secrets: top_secrets(store, top_n),
    }
}

/// Most frequent email domains, counted once per pair.
pub fn top_domains(store: &DedupStore, top_n: usize) -> Vec<(String, usize)> {
    rank(store.sorted().into_iter().map(|p| p.domain()), top_n)
}

/// Most frequent secrets, counted once per pair.
pub fn top_secrets(store: &DedupStore, top_n: usize) -> Vec<(String, usize)> {
    rank(store.sorted().into_iter().map(|p| p.secret()), top_n)
}

fn rank<'a, I: IntoIterator<Item = &'a str>>(items: I, top_n: usize) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for item in items {
        match index.get(item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item, counts.len());
                counts.push((item, 1));
            }
        }
    }
    // Stable: equal counts keep first-encountered order.
    counts.sort_by_key(|&(_, n)| Reverse(n));
    counts.truncate(top_n);
    counts
        .into_iter()
        .map(|(item, n)| (item.to_string(), n))
        .collect()
}
