//! Output formatting.
//!
//! Truncates redacted text to the display budget, attaches the source
//! label and artifact path, and builds the immutable pipeline result.
//! Truncation is the only mutation applied to the text.

use crate::config::DisplayConfig;
use crate::types::{PipelineResult, TextSource};
use std::path::PathBuf;
use tracing::debug;

/// Marker appended whenever the display budget forces truncation
pub const TRUNCATION_MARKER: &str = "\n[truncated]";

pub struct OutputFormatter {
    budget_chars: usize,
}

impl OutputFormatter {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            budget_chars: config.budget_chars,
        }
    }

    /// Build the terminal result for a run
    pub fn format(
        &self,
        source: TextSource,
        redacted: String,
        artifact_path: PathBuf,
    ) -> PipelineResult {
        let (display_text, truncated) = self.truncate(redacted);
        if truncated {
            debug!("Display text truncated to {} chars", self.budget_chars);
        }

        PipelineResult {
            artifact_path,
            source,
            source_label: source.label(),
            display_text,
            truncated,
            completed_at: chrono::Utc::now(),
        }
    }

    /// Keep the first `budget_chars` characters, marking truncation
    fn truncate(&self, text: String) -> (String, bool) {
        match text.char_indices().nth(self.budget_chars) {
            Some((byte_idx, _)) => {
                let mut out = text[..byte_idx].to_string();
                out.push_str(TRUNCATION_MARKER);
                (out, true)
            }
            None => (text, false),
        }
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(&DisplayConfig::default())
    }
}
