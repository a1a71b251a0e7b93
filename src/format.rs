use std::path::{Path, PathBuf};

use crate::io::Compression;

/// Closed set of input kinds, decided by the last extension of a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    Zip,
    Csv,
    Json,
    Sql,
    /// `.txt`, `.log`, compressed files and anything unrecognized.
    Text,
}

impl InputFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "zip" => Self::Zip,
            "csv" => Self::Csv,
            "json" => Self::Json,
            "sql" => Self::Sql,
            _ => Self::Text,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map_or(Self::Text, Self::from_extension)
    }
}

/// A discovered input: where it is, how to parse it and how to decompress it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputDescriptor {
    pub path: PathBuf,
    pub format: InputFormat,
    pub compression: Compression,
}

impl InputDescriptor {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let format = InputFormat::from_path(path);
        // Structured formats are read as-is; only the line fallback decompresses.
        let compression = match format {
            InputFormat::Text => Compression::from_path(path),
            _ => Compression::None,
        };
        Self {
            path: path.to_path_buf(),
            format,
            compression,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_table() {
        let cases = [
            ("dump.zip", InputFormat::Zip),
            ("DUMP.ZIP", InputFormat::Zip),
            ("users.csv", InputFormat::Csv),
            ("users.Json", InputFormat::Json),
            ("db.sql", InputFormat::Sql),
            ("combo.txt", InputFormat::Text),
            ("server.log", InputFormat::Text),
            ("combo.txt.gz", InputFormat::Text),
            ("users.csv.bz2", InputFormat::Text),
            ("x.xz", InputFormat::Text),
            ("README", InputFormat::Text),
            (".hidden", InputFormat::Text),
        ];
        for (path, expected) in cases {
            assert_eq!(InputFormat::from_path(path), expected, "{path}");
        }
    }

    #[test]
    fn descriptor_only_decompresses_text_fallback() {
        let gz = InputDescriptor::from_path("combo.txt.gz");
        assert_eq!(gz.format, InputFormat::Text);
        assert_eq!(gz.compression, Compression::Gzip);

        let csv = InputDescriptor::from_path("users.csv");
        assert_eq!(csv.compression, Compression::None);
    }
}
