//! Per-file progress spinners on stderr.
//!
//! Purely cosmetic: bars count decoded bytes and never touch extraction
//! results. `Progress::new(false)` draws nothing.
use std::path::Path;
use std::sync::LazyLock;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::io::TextStream;

const SPINNER_STYLE: &str = "{spinner:.blue} {prefix:.cyan.bold} [{elapsed_precise}] {bytes} ({bytes_per_sec}) {wide_msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

static SPINNER_TEMPLATE: LazyLock<Option<ProgressStyle>> = LazyLock::new(|| {
    ProgressStyle::with_template(SPINNER_STYLE)
        .ok()
        .map(|style| style.tick_chars(TICK))
});

#[derive(Debug, Clone)]
pub struct Progress {
    multi: MultiProgress,
}

impl Progress {
    pub fn new(visible: bool) -> Self {
        let target = if visible {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        Self {
            multi: MultiProgress::with_draw_target(target),
        }
    }

    /// Start a spinner labelled with the file name of `path`.
    pub fn start_file(&self, path: &Path) -> FileProgress {
        let bar = self.multi.add(ProgressBar::new_spinner());
        if let Some(style) = SPINNER_TEMPLATE.as_ref() {
            bar.set_style(style.clone());
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        bar.set_prefix(format!("Processing {}", name));
        FileProgress { bar }
    }
}

pub struct FileProgress {
    bar: ProgressBar,
}

impl FileProgress {
    /// Count decoded bytes read from `stream` on this bar.
    pub fn wrap(&self, stream: TextStream) -> TextStream {
        TextStream {
            encoding: stream.encoding,
            reader: Box::new(self.bar.wrap_read(stream.reader)),
        }
    }

    pub fn finish(self, message: String) {
        self.bar.finish_with_message(message);
    }
}
