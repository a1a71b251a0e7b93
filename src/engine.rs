//! Engine: dispatches every input to its extractor, expands archives
//! recursively and accumulates unique pairs in a [`DedupStore`].
//!
//! Per-file failures never abort a run: a missing, unreadable, corrupt or
//! malformed input is logged and contributes zero records.
//!
//! Typical usage:
//!
//! ```no_run
//! use breachclean::engine::Engine;
//! let mut engine = Engine::new();
//! engine.load_from_file_paths(&["/path/to/combo.txt", "/path/to/dump.zip"]);
//! let summary = breachclean::stats::summarize(&engine.store, 10);
//! println!("{}", breachclean::report::render_summary(&summary));
//! ```
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::Result;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::archive::{DEFAULT_MAX_UNZIP_BYTES, expand_zip};
use crate::extract::{ExtractCounts, extract_csv, extract_json, extract_lines};
use crate::format::{InputDescriptor, InputFormat};
use crate::io::{DEFAULT_MMAP_THRESHOLD_BYTES, open_with};
use crate::normalize::{DelimiterPolicy, normalize_contents};
use crate::progress::Progress;
use crate::store::DedupStore;

/// Archives nested deeper than this are skipped.
pub const DEFAULT_MAX_ARCHIVE_DEPTH: usize = 8;

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub policy: DelimiterPolicy,
    /// Plain inputs at least this large are memory-mapped.
    pub mmap_threshold_bytes: u64,
    pub max_archive_depth: usize,
    /// Archives declaring more uncompressed bytes than this are skipped.
    pub max_unzip_bytes: u64,
    /// Where archive scratch directories are created; system temp dir if `None`.
    pub scratch_root: Option<PathBuf>,
    pub show_progress: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            policy: DelimiterPolicy::default(),
            mmap_threshold_bytes: DEFAULT_MMAP_THRESHOLD_BYTES,
            max_archive_depth: DEFAULT_MAX_ARCHIVE_DEPTH,
            max_unzip_bytes: DEFAULT_MAX_UNZIP_BYTES,
            scratch_root: None,
            show_progress: false,
        }
    }
}

/// Counters over a whole run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    pub files_processed: usize,
    pub files_skipped: usize,
    pub records_seen: usize,
    pub records_rejected: usize,
    pub pairs_added: usize,
}

impl ParseStats {
    fn absorb(&mut self, counts: ExtractCounts) {
        self.records_seen += counts.records_seen;
        self.records_rejected += counts.records_rejected;
        self.pairs_added += counts.pairs_added;
    }

    fn merge(&mut self, other: ParseStats) {
        self.files_processed += other.files_processed;
        self.files_skipped += other.files_skipped;
        self.records_seen += other.records_seen;
        self.records_rejected += other.records_rejected;
        self.pairs_added += other.pairs_added;
    }
}

/// Aggregates unique credential pairs and exposes loading helpers.
#[derive(Debug)]
pub struct Engine {
    pub store: DedupStore,
    pub parse_stats: ParseStats,
    options: EngineOptions,
    progress: Progress,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an empty engine with default options and no progress output.
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Self {
        let progress = Progress::new(options.show_progress);
        Self {
            store: DedupStore::new(),
            parse_stats: ParseStats::default(),
            options,
            progress,
        }
    }

    /// Load line-oriented inputs already in memory. Intended for tests and
    /// small programmatic integrations.
    pub fn load_from_strings(&mut self, contents: &[&str]) {
        for c in contents {
            let before = self.store.len();
            self.store.extend(normalize_contents(c, self.options.policy));
            self.parse_stats.pairs_added += self.store.len() - before;
        }
    }

    /// Dispatch a single path (archive, CSV, JSON, SQL or text). Returns the
    /// number of pairs that were new to the store.
    pub fn process_path<P: AsRef<Path>>(&mut self, path: P) -> usize {
        let job = FileJob {
            options: &self.options,
            progress: &self.progress,
        };
        let mut stats = ParseStats::default();
        job.run(path.as_ref(), 0, &mut self.store, &mut stats);
        self.parse_stats.merge(stats);
        stats.pairs_added
    }

    /// Sequentially process every path. Missing paths are logged and skipped.
    pub fn load_from_file_paths<P: AsRef<Path>>(&mut self, paths: &[P]) {
        for p in paths {
            let p = p.as_ref();
            if !p.exists() {
                warn!("file not found: {} (continuing)", p.display());
                self.parse_stats.files_skipped += 1;
                continue;
            }
            info!("processing {}", p.display());
            self.process_path(p);
        }
    }

    /// Process paths concurrently on the rayon pool. Each file is extracted
    /// into its own store; merging into the shared store is the only
    /// synchronized step.
    pub fn load_from_file_paths_parallel<P: AsRef<Path> + Sync>(&mut self, paths: &[P]) {
        let shared = Mutex::new(std::mem::take(&mut self.store));
        let totals = Mutex::new(self.parse_stats);
        let job = FileJob {
            options: &self.options,
            progress: &self.progress,
        };
        paths.par_iter().for_each(|p| {
            let p = p.as_ref();
            let mut stats = ParseStats::default();
            if p.exists() {
                info!("processing {}", p.display());
                let mut local = DedupStore::new();
                job.run(p, 0, &mut local, &mut stats);
                let mut store = shared.lock().unwrap_or_else(PoisonError::into_inner);
                // Pairs already contributed by another file are not new.
                stats.pairs_added = store.merge(local);
            } else {
                warn!("file not found: {} (continuing)", p.display());
                stats.files_skipped += 1;
            }
            totals
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .merge(stats);
        });
        self.store = shared.into_inner().unwrap_or_else(PoisonError::into_inner);
        self.parse_stats = totals.into_inner().unwrap_or_else(PoisonError::into_inner);
    }
}

/// Borrowed view of what a worker needs to process one input tree.
struct FileJob<'a> {
    options: &'a EngineOptions,
    progress: &'a Progress,
}

impl FileJob<'_> {
    fn run(&self, path: &Path, depth: usize, store: &mut DedupStore, stats: &mut ParseStats) {
        if path.is_dir() {
            warn!("skipping directory {}", path.display());
            stats.files_skipped += 1;
            return;
        }
        let descriptor = InputDescriptor::from_path(path);
        if descriptor.format == InputFormat::Zip {
            self.run_archive(&descriptor, depth, store, stats);
            return;
        }
        match self.extract_file(&descriptor, store) {
            Ok(counts) => {
                info!(
                    "{}: {} records, {} rejected, {} new pairs",
                    path.display(),
                    counts.records_seen,
                    counts.records_rejected,
                    counts.pairs_added
                );
                stats.files_processed += 1;
                stats.absorb(counts);
            }
            Err(e) => {
                warn!("skipped {}: {:#}", path.display(), e);
                stats.files_skipped += 1;
            }
        }
    }

    fn run_archive(
        &self,
        descriptor: &InputDescriptor,
        depth: usize,
        store: &mut DedupStore,
        stats: &mut ParseStats,
    ) {
        let path = descriptor.path.as_path();
        if depth >= self.options.max_archive_depth {
            warn!(
                "skipping {}: archive nesting deeper than {}",
                path.display(),
                self.options.max_archive_depth
            );
            stats.files_skipped += 1;
            return;
        }
        let expansion = expand_zip(
            path,
            self.options.scratch_root.as_deref(),
            self.options.max_unzip_bytes,
        );
        if !expansion.is_extracted() {
            stats.files_skipped += 1;
            return;
        }
        stats.files_processed += 1;
        for member in expansion.members() {
            // Extracted symlinks may point anywhere on the host.
            let is_link = fs::symlink_metadata(member)
                .map(|m| m.file_type().is_symlink())
                .unwrap_or(true);
            if is_link {
                warn!("skipping link or unreadable member {}", member.display());
                stats.files_skipped += 1;
                continue;
            }
            self.run(member, depth + 1, store, stats);
        }
        // Dropping the expansion removes its scratch directory.
    }

    fn extract_file(
        &self,
        descriptor: &InputDescriptor,
        store: &mut DedupStore,
    ) -> Result<ExtractCounts> {
        let stream = open_with(
            &descriptor.path,
            descriptor.compression,
            self.options.mmap_threshold_bytes,
        )?;
        debug!(
            "{}: decoding as {}",
            descriptor.path.display(),
            stream.encoding.name()
        );
        let bar = self.progress.start_file(&descriptor.path);
        let stream = bar.wrap(stream);
        let counts = match descriptor.format {
            InputFormat::Csv => extract_csv(stream.reader, store),
            InputFormat::Json => extract_json(&stream.into_string()?, store)?,
            InputFormat::Sql | InputFormat::Text => {
                extract_lines(stream.lines(), self.options.policy, store)
            }
            InputFormat::Zip => unreachable!("archives are expanded before extraction"),
        };
        bar.finish(format!("{} new pairs", counts.pairs_added));
        Ok(counts)
    }
}
