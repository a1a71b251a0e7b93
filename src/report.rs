//! Human-readable report rendering for terminal output.
//!
//! Produces a colored summary of the deduplicated set: record counts, the most
//! common email domains and the most common passwords.
use colored::*;

use crate::stats::Summary;

fn visible_len(s: &str) -> usize {
    // Strip ANSI escape sequences (\x1b[ ... m) to compute printable width
    let mut len = 0;
    let mut iter = s.chars().peekable();
    while let Some(ch) = iter.next() {
        if ch == '\u{1b}' {
            if let Some('[') = iter.peek().cloned() {
                let _ = iter.next();
            }
            for c in iter.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            len += 1;
        }
    }
    len
}

fn section_header(title: &str) -> String {
    let len = visible_len(title);
    let mut s = String::new();
    s.push('\n');
    s.push_str(title);
    s.push('\n');
    s.push_str(&"─".repeat(len));
    s.push_str("\n\n");
    s
}

fn ranking_lines(items: &[(String, usize)], empty: &str) -> Vec<String> {
    if items.is_empty() {
        return vec![empty.to_string()];
    }
    items
        .iter()
        .map(|(item, count)| format!(" - {}: {}", item, count))
        .collect()
}

pub fn render_summary(summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n",
        "breachclean: Credential Dump Summary".bold().cyan()
    ));

    out.push_str(&section_header(
        &"Record Statistics".bold().yellow().to_string(),
    ));
    out.push_str(&format!("Total valid records: {}\n", summary.total_pairs));
    out.push_str(&format!("Unique emails: {}\n", summary.unique_emails));

    out.push_str(&section_header(
        &"Top Email Domains".bold().cyan().to_string(),
    ));
    for line in ranking_lines(&summary.top_domains, "(No domains)") {
        out.push_str(&line);
        out.push('\n');
    }

    out.push_str(&section_header(
        &"Top Passwords".bold().magenta().to_string(),
    ));
    for line in ranking_lines(&summary.top_secrets, "(No passwords)") {
        out.push_str(&line);
        out.push('\n');
    }

    out
}
