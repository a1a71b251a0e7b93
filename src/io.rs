//! Decompression adapter: turns a path into a decoded UTF-8 text stream.
//!
//! The codec is chosen by extension (`.gz`, `.bz2`, `.xz`, otherwise raw).
//! Large uncompressed files are read through a memory map. The first
//! [`SAMPLE_BYTES`](crate::encoding::SAMPLE_BYTES) of the decompressed stream
//! decide the text encoding, and the stream is transcoded to UTF-8 with
//! malformed sequences replaced by U+FFFD. Every returned reader owns its file
//! handle and decoder, so dropping it releases them.
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use encoding_rs::Encoding;
use encoding_rs_io::DecodeReaderBytesBuilder;
use memmap2::Mmap;

use crate::encoding::{detect_encoding, read_sample};

/// Threshold in bytes above which we attempt to use mmap for reading.
/// Callers can override via API; this is a reasonable default.
pub const DEFAULT_MMAP_THRESHOLD_BYTES: u64 = 16 * 1024 * 1024; // 16 MiB

pub type LineIter = Box<dyn Iterator<Item = io::Result<String>> + Send + 'static>;

type RawReader = Box<dyn Read + Send + 'static>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Xz,
}

impl Compression {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("gz") => Self::Gzip,
            Some("bz2") => Self::Bzip2,
            Some("xz") => Self::Xz,
            _ => Self::None,
        }
    }

    /// Wrap `reader` in the matching decoder. Multi-member/multi-stream
    /// inputs are decoded to the end.
    pub fn decoder<R: Read + Send + 'static>(self, reader: R) -> RawReader {
        match self {
            Self::None => Box::new(reader),
            Self::Gzip => Box::new(flate2::read::MultiGzDecoder::new(reader)),
            Self::Bzip2 => Box::new(bzip2::read::MultiBzDecoder::new(reader)),
            Self::Xz => Box::new(xz2::read::XzDecoder::new_multi_decoder(reader)),
        }
    }
}

/// A decoded text stream together with the encoding it was decoded from.
pub struct TextStream {
    pub encoding: &'static Encoding,
    pub reader: Box<dyn BufRead + Send + 'static>,
}

impl TextStream {
    /// Decoded lines; CRLF endings are stripped.
    pub fn lines(self) -> LineIter {
        Box::new(self.reader.lines())
    }

    /// The whole decoded document.
    pub fn into_string(mut self) -> io::Result<String> {
        let mut out = String::new();
        self.reader.read_to_string(&mut out)?;
        Ok(out)
    }
}

/// Decide whether to use mmap based on file size and threshold.
pub fn should_use_mmap(file_size_bytes: u64, threshold_bytes: u64) -> bool {
    file_size_bytes >= threshold_bytes
}

fn open_raw(path: &Path, threshold_bytes: u64) -> Result<RawReader> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let meta = file
        .metadata()
        .with_context(|| format!("stat {}", path.display()))?;
    if !meta.is_file() {
        bail!("{} is not a regular file", path.display());
    }
    // Mapping an empty file fails on some platforms.
    if meta.len() > 0 && should_use_mmap(meta.len(), threshold_bytes) {
        let mmap =
            unsafe { Mmap::map(&file) }.with_context(|| format!("mmap {}", path.display()))?;
        return Ok(Box::new(Cursor::new(mmap)));
    }
    Ok(Box::new(BufReader::new(file)))
}

/// Detect the encoding from the head of `reader` and transcode the whole
/// stream to UTF-8.
pub fn decode_stream<R: Read + Send + 'static>(mut reader: R) -> io::Result<TextStream> {
    let sample = read_sample(&mut reader)?;
    let encoding = detect_encoding(&sample);
    let rejoined = Cursor::new(sample).chain(reader);
    let decoded = DecodeReaderBytesBuilder::new()
        .encoding(Some(encoding))
        .bom_override(true)
        .build(rejoined);
    Ok(TextStream {
        encoding,
        reader: Box::new(BufReader::new(decoded)),
    })
}

/// Open `path` through an explicit codec and return its decoded text.
pub fn open_with<P: AsRef<Path>>(
    path: P,
    compression: Compression,
    threshold_bytes: u64,
) -> Result<TextStream> {
    let path = path.as_ref();
    let raw = open_raw(path, threshold_bytes)?;
    decode_stream(compression.decoder(raw)).with_context(|| format!("read {}", path.display()))
}
