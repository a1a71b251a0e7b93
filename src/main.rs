//! CLI entrypoint for `breachclean`.
//!
//! Parses command-line arguments, runs every input through the library
//! engine (sequentially or in parallel), resolves the output configuration
//! from flags or an interactive prompt, writes the requested outputs and
//! prints a terminal summary.
use std::io;
use std::path::PathBuf;

use breachclean::{
    archive::DEFAULT_MAX_UNZIP_BYTES,
    config::{ConfigError, OutputChoice, OutputConfig},
    engine::{DEFAULT_MAX_ARCHIVE_DEPTH, Engine, EngineOptions},
    export::write_outputs,
    io::DEFAULT_MMAP_THRESHOLD_BYTES,
    normalize::DelimiterPolicy,
    prompt::prompt_output_config,
    report::render_summary,
    stats::summarize,
};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, error, info};

#[derive(Parser, Debug)]
#[command(
    name = "breachclean",
    version,
    about = "Credential dump cleaner: extract, validate and deduplicate email/password pairs"
)]
struct Args {
    /// Input files (.zip, .gz, .bz2, .xz, .csv, .json, .sql, .txt, .log or any text)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format: 1/text, 2/jsonl or 3/both. Prompted for when omitted.
    #[arg(short = 'f', long = "format")]
    format: Option<OutputChoice>,

    /// Destination of the email:password text output
    #[arg(long = "txt-out")]
    txt_out: Option<PathBuf>,

    /// Destination of the JSON-lines output
    #[arg(long = "jsonl-out")]
    jsonl_out: Option<PathBuf>,

    /// Override mmap threshold in bytes. If zero, disable mmap.
    #[arg(long = "mmap-threshold", default_value_t = DEFAULT_MMAP_THRESHOLD_BYTES)]
    mmap_threshold: u64,

    /// Skip zip archives that would unpack to more than this many bytes. If zero, no limit.
    #[arg(long = "max-unzip-size", default_value_t = DEFAULT_MAX_UNZIP_BYTES)]
    max_unzip_size: u64,

    /// Maximum nesting depth of zip archives
    #[arg(long = "max-depth", default_value_t = DEFAULT_MAX_ARCHIVE_DEPTH)]
    max_depth: usize,

    /// Only try the first delimiter found on a line
    #[arg(long = "first-delimiter-only")]
    first_delimiter_only: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Enable parallel loading of input files
    #[arg(long = "parallel")]
    parallel: bool,

    /// Log counts of processed/skipped files and rejected records
    #[arg(long = "log-parse-stats")]
    log_parse_stats: bool,

    /// Limit number of entries in the top domains/passwords rankings
    #[arg(long = "top", default_value_t = 10)]
    top_limit: usize,

    /// Control color output (auto, always, never)
    #[arg(long = "color", value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Hide per-file progress spinners
    #[arg(long = "no-progress")]
    no_progress: bool,

    /// Suppress progress and summary output (still writes outputs)
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

fn init_logger(verbosity: u8, log_parse_stats: bool) {
    let level = match verbosity {
        0 if log_parse_stats => LevelFilter::Info,
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();
}

fn resolve_output(args: &Args) -> Result<OutputConfig, ConfigError> {
    match args.format {
        Some(choice) => Ok(OutputConfig::new(
            choice,
            args.txt_out.clone(),
            args.jsonl_out.clone(),
        )),
        None => prompt_output_config(&mut io::stdin().lock(), &mut io::stdout()),
    }
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose, args.log_parse_stats);
    // Configure color policy
    match args.color {
        ColorChoice::Always => {
            colored::control::set_override(true);
        }
        ColorChoice::Never => {
            colored::control::set_override(false);
        }
        ColorChoice::Auto => {}
    }

    let threshold = if args.mmap_threshold == 0 {
        u64::MAX
    } else {
        args.mmap_threshold
    };
    let options = EngineOptions {
        policy: if args.first_delimiter_only {
            DelimiterPolicy::FirstFound
        } else {
            DelimiterPolicy::FallThrough
        },
        mmap_threshold_bytes: threshold,
        max_archive_depth: args.max_depth,
        max_unzip_bytes: if args.max_unzip_size == 0 {
            u64::MAX
        } else {
            args.max_unzip_size
        },
        scratch_root: None,
        show_progress: !(args.quiet || args.no_progress),
    };
    let mut engine = Engine::with_options(options);

    if !args.quiet {
        println!("Starting cleanup on {} file(s)...", args.files.len());
    }
    if args.parallel {
        engine.load_from_file_paths_parallel(&args.files);
    } else {
        engine.load_from_file_paths(&args.files);
    }
    if !args.quiet {
        println!("Total valid unique entries: {}", engine.store.len());
    }

    let output = match resolve_output(&args) {
        Ok(o) => o,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };
    match write_outputs(&engine.store, &output) {
        Ok(written) => {
            for path in written {
                info!("saved {}", path.display());
                if !args.quiet {
                    println!("Saved {}", path.display());
                }
            }
        }
        Err(e) => {
            error!("failed to write outputs: {:#}", e);
            std::process::exit(4);
        }
    }

    if !args.quiet {
        let summary = summarize(&engine.store, args.top_limit);
        println!("{}", render_summary(&summary));
    }

    if args.log_parse_stats {
        let stats = engine.parse_stats;
        info!(
            "parse stats: files_processed={}, files_skipped={}, records_seen={}, records_rejected={}, pairs_added={}",
            stats.files_processed,
            stats.files_skipped,
            stats.records_seen,
            stats.records_rejected,
            stats.pairs_added
        );
    }
}
