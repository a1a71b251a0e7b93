//! Export helpers for writing the deduplicated set.
//!
//! - `save_pairs_txt` writes `email:secret` lines. No escaping is applied, so
//!   a secret containing `:` reads back the same only because the email side
//!   never contains one.
//! - `save_pairs_jsonl` writes one `{"email", "password"}` object per line.
//!
//! Both write in sorted order and truncate an existing destination.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::OutputConfig;
use crate::store::DedupStore;

#[derive(Debug, Serialize)]
pub struct JsonlRecord<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

pub fn save_pairs_txt<P: AsRef<Path>>(store: &DedupStore, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    for p in store.sorted() {
        writeln!(w, "{}:{}", p.email(), p.secret())?;
    }
    w.flush()?;
    Ok(())
}

pub fn save_pairs_jsonl<P: AsRef<Path>>(store: &DedupStore, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    for p in store.sorted() {
        let record = JsonlRecord {
            email: p.email(),
            password: p.secret(),
        };
        serde_json::to_writer(&mut w, &record)?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(())
}

/// Write every output `config` asks for; returns the paths written.
pub fn write_outputs(store: &DedupStore, config: &OutputConfig) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if let Some(txt) = &config.text {
        save_pairs_txt(store, txt).with_context(|| format!("write {}", txt.display()))?;
        written.push(txt.clone());
    }
    if let Some(jsonl) = &config.jsonl {
        save_pairs_jsonl(store, jsonl).with_context(|| format!("write {}", jsonl.display()))?;
        written.push(jsonl.clone());
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputChoice;
    use crate::credential::CredentialPair;
    use crate::normalize::{DelimiterPolicy, normalize_line};
    use serde::Deserialize;
    use std::collections::HashSet;
    use tempfile::tempdir;

    #[derive(Deserialize)]
    struct ParsedRecord {
        email: String,
        password: String,
    }

    fn sample_store() -> DedupStore {
        [
            ("zed@last.io", "z"),
            ("amy@first.io", "pa:ss|wd"),
            ("amy@first.io", "plain"),
            ("uni@code.io", "p\u{e4}ssw\u{f6}rd \"quoted\""),
        ]
        .into_iter()
        .filter_map(|(e, s)| CredentialPair::new(e, s))
        .collect()
    }

    fn as_set(store: &DedupStore) -> HashSet<(String, String)> {
        store
            .iter()
            .map(|p| (p.email().to_string(), p.secret().to_string()))
            .collect()
    }

    #[test]
    fn txt_is_sorted_email_colon_secret() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        save_pairs_txt(&sample_store(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "amy@first.io:pa:ss|wd\namy@first.io:plain\nuni@code.io:p\u{e4}ssw\u{f6}rd \"quoted\"\nzed@last.io:z\n"
        );
    }

    #[test]
    fn jsonl_is_one_object_per_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        save_pairs_jsonl(&sample_store(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let first = content.lines().next().unwrap();
        assert_eq!(first, r#"{"email":"amy@first.io","password":"pa:ss|wd"}"#);
        assert_eq!(content.lines().count(), 4);
    }

    #[test]
    fn both_formats_round_trip_to_the_same_set() {
        let dir = tempdir().unwrap();
        let store = sample_store();
        let txt = dir.path().join("out.txt");
        let jsonl = dir.path().join("out.jsonl");
        save_pairs_txt(&store, &txt).unwrap();
        save_pairs_jsonl(&store, &jsonl).unwrap();

        let from_txt: HashSet<(String, String)> = std::fs::read_to_string(&txt)
            .unwrap()
            .lines()
            .filter_map(|l| normalize_line(l, DelimiterPolicy::default()))
            .map(CredentialPair::into_parts)
            .collect();
        let jsonl_content = std::fs::read_to_string(&jsonl).unwrap();
        let from_jsonl: HashSet<(String, String)> = jsonl_content
            .lines()
            .map(|l| serde_json::from_str::<ParsedRecord>(l).unwrap())
            .map(|r| (r.email, r.password))
            .collect();

        assert_eq!(from_txt, as_set(&store));
        assert_eq!(from_jsonl, as_set(&store));
    }

    #[test]
    fn existing_files_are_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "stale line that is much longer than the new content\n").unwrap();
        let store: DedupStore = CredentialPair::new("a@b.com", "1").into_iter().collect();
        save_pairs_txt(&store, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a@b.com:1\n");
    }

    #[test]
    fn write_outputs_follows_config() {
        let dir = tempdir().unwrap();
        let txt = dir.path().join("o.txt");
        let jsonl = dir.path().join("o.jsonl");
        let config = OutputConfig::new(
            OutputChoice::JsonlOnly,
            Some(txt.clone()),
            Some(jsonl.clone()),
        );
        let written = write_outputs(&sample_store(), &config).unwrap();
        assert_eq!(written, vec![jsonl.clone()]);
        assert!(!txt.exists());
        assert!(jsonl.exists());
    }

    #[test]
    fn unwritable_destination_is_an_error() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("missing-dir").join("out.txt");
        assert!(save_pairs_txt(&sample_store(), &bad).is_err());
    }
}
