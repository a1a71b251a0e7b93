//! Zip archive expansion into a scratch directory.
//!
//! [`expand_zip`] never fails: a corrupt or unreadable archive is logged and
//! produces an empty [`Expansion`]. The scratch directory is owned by the
//! returned `Expansion` and removed when it is dropped, so callers process the
//! members first and let the value go out of scope afterwards.
//!
//! The total uncompressed size is read from the central directory before
//! anything is written; archives above the configured limit are refused.
use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use tempfile::TempDir;
use zip::ZipArchive;
use zip::result::{ZipError, ZipResult};

/// Prefix of every scratch directory created for an archive.
pub const SCRATCH_PREFIX: &str = "breach_unzip_";

/// Archives declaring more uncompressed bytes than this are not extracted.
pub const DEFAULT_MAX_UNZIP_BYTES: u64 = 32 * 1024 * 1024 * 1024; // 32 GiB

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("create scratch directory: {0}")]
    Scratch(#[source] io::Error),
    #[error("open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("corrupt archive {}: {source}", path.display())]
    Corrupt { path: PathBuf, source: ZipError },
    #[error(
        "{} would unpack to {}, above the {} limit",
        path.display(),
        format_bytes(*size),
        format_bytes(*limit)
    )]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
    #[error("list scratch directory {}: {source}", path.display())]
    List { path: PathBuf, source: io::Error },
}

/// Members extracted from one archive, plus the scratch directory holding them.
#[derive(Debug, Default)]
pub struct Expansion {
    scratch: Option<TempDir>,
    members: Vec<PathBuf>,
}

impl Expansion {
    /// Top-level members, sorted by path.
    pub fn members(&self) -> &[PathBuf] {
        &self.members
    }

    pub fn scratch_path(&self) -> Option<&Path> {
        self.scratch.as_ref().map(TempDir::path)
    }

    /// `false` when extraction failed and nothing was written.
    pub fn is_extracted(&self) -> bool {
        self.scratch.is_some()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Human-readable byte count with two decimals, `B` through `PB`.
pub fn format_bytes(size: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = size as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{:.2} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.2} PB", size)
}

/// Sum of the uncompressed sizes declared by every entry.
pub fn uncompressed_size<R: Read + Seek>(archive: &mut ZipArchive<R>) -> ZipResult<u64> {
    let mut total: u64 = 0;
    for i in 0..archive.len() {
        total = total.saturating_add(archive.by_index_raw(i)?.size());
    }
    Ok(total)
}

/// Extract `path` into a fresh scratch directory under `scratch_root`
/// (the system temp dir when `None`). Nothing is written when the archive
/// declares more than `max_bytes` uncompressed.
pub fn try_expand_zip(
    path: &Path,
    scratch_root: Option<&Path>,
    max_bytes: u64,
) -> Result<Expansion, ArchiveError> {
    let file = File::open(path).map_err(|source| ArchiveError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let corrupt = |source: ZipError| ArchiveError::Corrupt {
        path: path.to_path_buf(),
        source,
    };
    let mut archive = ZipArchive::new(file).map_err(corrupt)?;
    let size = uncompressed_size(&mut archive).map_err(corrupt)?;
    info!(
        "estimated unzip size for {}: {}",
        path.display(),
        format_bytes(size)
    );
    if size > max_bytes {
        return Err(ArchiveError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: max_bytes,
        });
    }

    let mut builder = tempfile::Builder::new();
    builder.prefix(SCRATCH_PREFIX);
    let scratch = match scratch_root {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    }
    .map_err(ArchiveError::Scratch)?;
    archive.extract(scratch.path()).map_err(corrupt)?;

    let list_err = |source: io::Error| ArchiveError::List {
        path: scratch.path().to_path_buf(),
        source,
    };
    let mut members = fs::read_dir(scratch.path())
        .map_err(list_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()
        .map_err(list_err)?;
    members.sort();
    debug!(
        "extracted {} member(s) of {} into {}",
        members.len(),
        path.display(),
        scratch.path().display()
    );
    Ok(Expansion {
        scratch: Some(scratch),
        members,
    })
}

/// Like [`try_expand_zip`], but failures are logged and yield no members.
/// Any partially written scratch directory is removed before returning.
pub fn expand_zip(path: &Path, scratch_root: Option<&Path>, max_bytes: u64) -> Expansion {
    match try_expand_zip(path, scratch_root, max_bytes) {
        Ok(expansion) => expansion,
        Err(e) => {
            warn!("error extracting zip {}: {}", path.display(), e);
            Expansion::default()
        }
    }
}
