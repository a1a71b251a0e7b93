//! Per-format extractors. Each one feeds validated pairs into a
//! [`DedupStore`] and reports how many records it looked at.
use std::io::{self, Read};

use csv::ReaderBuilder;
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::credential::CredentialPair;
use crate::normalize::{DelimiterPolicy, normalize_line};
use crate::store::DedupStore;

/// Record counts for one extraction pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractCounts {
    pub records_seen: usize,
    pub records_rejected: usize,
    pub pairs_added: usize,
}

impl ExtractCounts {
    fn offer(&mut self, pair: Option<CredentialPair>, store: &mut DedupStore) {
        self.records_seen += 1;
        match pair {
            Some(p) => {
                if store.add(p) {
                    self.pairs_added += 1;
                }
            }
            None => self.records_rejected += 1,
        }
    }
}

/// Normalize every non-blank line. A read error ends the pass early; what was
/// collected up to that point is kept.
pub fn extract_lines<I>(
    lines: I,
    policy: DelimiterPolicy,
    store: &mut DedupStore,
) -> ExtractCounts
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut counts = ExtractCounts::default();
    for line in lines {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!("stopped reading after {} lines: {}", counts.records_seen, e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        counts.offer(normalize_line(&line, policy), store);
    }
    counts
}

/// Comma-separated rows, standard quoting, no header. Field 0 is the email,
/// field 1 the secret; rows with fewer than two fields are rejected.
pub fn extract_csv<R: Read>(reader: R, store: &mut DedupStore) -> ExtractCounts {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut counts = ExtractCounts::default();
    for record in rdr.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) if e.is_io_error() => {
                warn!("stopped reading csv after {} rows: {}", counts.records_seen, e);
                break;
            }
            Err(e) => {
                debug!("skipping malformed csv row: {}", e);
                counts.records_seen += 1;
                counts.records_rejected += 1;
                continue;
            }
        };
        let pair = match (record.get(0), record.get(1)) {
            (Some(email), Some(secret)) => CredentialPair::new(email, secret),
            _ => None,
        };
        counts.offer(pair, store);
    }
    counts
}

#[derive(Debug, thiserror::Error)]
pub enum JsonExtractError {
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("expected a top-level array, found {0}")]
    NotAnArray(&'static str),
}

/// A whole JSON document holding an array of `{"email", "password"}` objects.
/// Elements that are not objects are rejected; the document as a whole is
/// rejected when it does not parse or is not an array.
pub fn extract_json(
    document: &str,
    store: &mut DedupStore,
) -> Result<ExtractCounts, JsonExtractError> {
    let value: Value = serde_json::from_str(document)?;
    let records = match value {
        Value::Array(records) => records,
        other => return Err(JsonExtractError::NotAnArray(kind_of(&other))),
    };
    let mut counts = ExtractCounts::default();
    for record in &records {
        let pair = record.as_object().and_then(|obj| {
            CredentialPair::new(&field_text(obj, "email"), &field_text(obj, "password"))
        });
        counts.offer(pair, store);
    }
    Ok(counts)
}

/// Missing and `null` become empty; strings are taken verbatim; anything else
/// is rendered as JSON text.
fn field_text(record: &Map<String, Value>, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
