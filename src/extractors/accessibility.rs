//! Structured accessibility-tree extraction client.
//!
//! Spawns the platform accessibility walker and applies the accumulation
//! contract the rest of the pipeline depends on: trivial candidates are
//! skipped, candidates already contained in the buffer are skipped,
//! accumulation stops at a character cap, and an under-length result is
//! collapsed to empty so callers see "no signal" instead of a degenerate
//! success.

use crate::config::AccessibilityConfig;
use crate::extractors::{resolve_binary_path, AccessibilityTextService};
use crate::types::WindowRef;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Default walker binary name, expected next to the executable or on PATH
const WALKER_BINARY: &str = "ax-walker";

/// Minimum candidate length worth accumulating
const MIN_CANDIDATE_CHARS: usize = 3;

/// Subprocess-backed accessibility text client
pub struct AccessibilityClient {
    binary_path: PathBuf,
    char_cap: usize,
    min_signal_chars: usize,
}

impl AccessibilityClient {
    pub fn new(config: &AccessibilityConfig) -> Self {
        Self {
            binary_path: resolve_binary_path(&config.binary_path, WALKER_BINARY),
            char_cap: config.char_cap,
            min_signal_chars: config.min_signal_chars,
        }
    }

    /// Run the walker and collect its candidate strings.
    /// Any failure degrades to an empty candidate list.
    async fn run_walker(&self, window: &WindowRef) -> Vec<String> {
        // The bounded wait upstream can drop this future mid-flight;
        // the walker must die with it rather than linger.
        let output = match Command::new(&self.binary_path)
            .arg("--window-id")
            .arg(window.id.to_string())
            .arg("--json")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                warn!("Accessibility walker failed to start: {}", e);
                return Vec::new();
            }
        };

        if !output.status.success() {
            warn!(
                "Accessibility walker exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            );
            return Vec::new();
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let result: serde_json::Value = match serde_json::from_str(&stdout) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to parse walker output: {}", e);
                return Vec::new();
            }
        };

        if let Some(error) = result["error"].as_str() {
            warn!("Accessibility walker reported: {}", error);
            return Vec::new();
        }

        // Candidate strings in tree order: element names first, editable
        // values where the walker found them.
        result["texts"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl AccessibilityTextService for AccessibilityClient {
    async fn extract(&self, window: &WindowRef) -> String {
        let candidates = self.run_walker(window).await;
        let text = accumulate(
            candidates.iter().map(String::as_str),
            self.char_cap,
            self.min_signal_chars,
        );
        debug!(
            "Accessibility extraction for '{}': {} chars from {} candidates",
            window.title,
            text.chars().count(),
            candidates.len()
        );
        text
    }
}

/// Accumulate candidate strings into one buffer.
///
/// A candidate is appended only if it is at least three characters long,
/// fits under the cap together with its separator, and is not already a
/// substring of the accumulated buffer. The containment check is O(n^2)
/// and only catches exact-substring duplicates; that is intentional,
/// preserved from the walker's established behavior.
pub fn accumulate<'a, I>(candidates: I, char_cap: usize, min_signal_chars: usize) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    let mut out_chars = 0usize;

    for candidate in candidates {
        let len = candidate.chars().count();
        if len < MIN_CANDIDATE_CHARS {
            continue;
        }
        if out_chars + len + 1 > char_cap {
            continue;
        }
        if out.contains(candidate) {
            continue;
        }

        out.push_str(candidate);
        out.push('\n');
        out_chars += len + 1;

        if out_chars >= char_cap {
            break;
        }
    }

    // Under-length output is no signal, not a short success
    if out_chars < min_signal_chars {
        return String::new();
    }
    out
}
