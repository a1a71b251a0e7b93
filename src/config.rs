//! Output configuration: which formats to write and where.
//!
//! An [`OutputConfig`] is built once, from command-line flags or from the
//! interactive prompt in [`crate::prompt`], and handed to the export stage.
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_TEXT_OUTPUT: &str = "cleaned.txt";
pub const DEFAULT_JSONL_OUTPUT: &str = "cleaned.jsonl";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid output format selection {0:?} (expected 1, 2 or 3)")]
    InvalidSelection(String),
    #[error("read selection: {0}")]
    Io(#[from] io::Error),
}

/// The three recognized selections: `1` text only, `2` JSON-lines only,
/// `3` both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputChoice {
    TextOnly,
    JsonlOnly,
    Both,
}

impl OutputChoice {
    pub fn wants_text(self) -> bool {
        matches!(self, Self::TextOnly | Self::Both)
    }

    pub fn wants_jsonl(self) -> bool {
        matches!(self, Self::JsonlOnly | Self::Both)
    }
}

impl FromStr for OutputChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "text" | "txt" => Ok(Self::TextOnly),
            "2" | "jsonl" => Ok(Self::JsonlOnly),
            "3" | "both" => Ok(Self::Both),
            _ => Err(ConfigError::InvalidSelection(s.to_string())),
        }
    }
}

impl fmt::Display for OutputChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TextOnly => "text",
            Self::JsonlOnly => "jsonl",
            Self::Both => "both",
        };
        f.write_str(s)
    }
}

/// Destinations of the outputs to write; `None` means "do not write".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub text: Option<PathBuf>,
    pub jsonl: Option<PathBuf>,
}

impl OutputConfig {
    /// Keep the destinations `choice` asks for, falling back to the default
    /// file names, and drop the rest.
    pub fn new(choice: OutputChoice, text: Option<PathBuf>, jsonl: Option<PathBuf>) -> Self {
        Self {
            text: choice
                .wants_text()
                .then(|| text.unwrap_or_else(|| PathBuf::from(DEFAULT_TEXT_OUTPUT))),
            jsonl: choice
                .wants_jsonl()
                .then(|| jsonl.unwrap_or_else(|| PathBuf::from(DEFAULT_JSONL_OUTPUT))),
        }
    }
}
