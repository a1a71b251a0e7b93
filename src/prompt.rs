//! Interactive output-format selection.
//!
//! Generic over the input and output streams so it can be driven from tests.
//! An empty file name answer selects the default name.
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{
    ConfigError, DEFAULT_JSONL_OUTPUT, DEFAULT_TEXT_OUTPUT, OutputChoice, OutputConfig,
};

pub fn prompt_output_config<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<OutputConfig, ConfigError> {
    writeln!(out, "\nChoose Output Format:")?;
    writeln!(out, "1. .txt (newline-delimited email:password)")?;
    writeln!(out, "2. .jsonl (1 JSON object per line)")?;
    writeln!(out, "3. Both")?;
    let choice: OutputChoice = ask(input, out, "Enter choice [1/2/3]: ")?.parse()?;

    let text = if choice.wants_text() {
        Some(ask_path(input, out, "Enter output .txt filename", DEFAULT_TEXT_OUTPUT)?)
    } else {
        None
    };
    let jsonl = if choice.wants_jsonl() {
        Some(ask_path(
            input,
            out,
            "Enter output .jsonl filename",
            DEFAULT_JSONL_OUTPUT,
        )?)
    } else {
        None
    };
    Ok(OutputConfig::new(choice, text, jsonl))
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    question: &str,
) -> Result<String, ConfigError> {
    write!(out, "{}", question)?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn ask_path<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    question: &str,
    default: &str,
) -> Result<PathBuf, ConfigError> {
    let answer = ask(input, out, &format!("{} [{}]: ", question, default))?;
    Ok(PathBuf::from(if answer.is_empty() { default } else { answer.as_str() }))
}
