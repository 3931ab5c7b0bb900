//! Progress reporting while the input file is read: a byte-based bar sized to
//! the file length.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BYTES_TEMPLATE: &str = "{spinner:.green} {msg} {bytes:>10}/{total_bytes:<10} [{bar:.cyan/blue}] {percent:>3}%  \
                              {bytes_per_sec}  elapsed: {elapsed_precise}";

/// Thin wrapper around an `indicatif` bar; `ProgressScope::hidden()` is a
/// no-op sink so callers never branch on whether progress is enabled.
pub struct ProgressScope {
    pb: ProgressBar,
}

impl ProgressScope {
    pub fn bytes<T: Into<String>>(label: T, total_bytes: u64) -> Self {
        let pb = ProgressBar::new(total_bytes);
        // Template is a constant; fall back to the default style if it is ever rejected.
        if let Ok(style) = ProgressStyle::with_template(BYTES_TEMPLATE) {
            pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
        }
        let label = label.into();
        if !label.is_empty() {
            pb.set_message(label);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    pub fn hidden() -> Self {
        Self { pb: ProgressBar::hidden() }
    }

    #[inline]
    pub fn inc_bytes(&self, delta: u64) {
        self.pb.inc(delta);
    }

    pub fn finish<T: Into<String>>(&self, msg: T) {
        self.pb.finish_with_message(msg.into());
    }
}
