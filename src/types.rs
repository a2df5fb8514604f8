//! Core types used throughout the capture pipeline.
//!
//! This module defines the fundamental data structures for window capture,
//! text extraction results, classification verdicts, and the terminal
//! pipeline result handed to the presentation surface.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Opaque identity handle for a captured window (platform-specific)
pub type WindowId = u64;

/// Reference to the window a capture was taken from
#[derive(Debug, Clone)]
pub struct WindowRef {
    /// Unique window identifier
    pub id: WindowId,
    /// Window title at capture time
    pub title: String,
    /// Application name owning the window
    pub app_name: String,
}

/// Raw pixel data for a captured window.
///
/// Fixed layout: 32 bits per pixel, BGRA byte order, top-down rows.
/// Owned exclusively by the capture stage until handed to the encoder,
/// and dropped right after the persist step on every path.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    /// BGRA bytes, `width * height * 4` long
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self { width, height, data }
    }

    /// Expected byte length for the fixed 32-bpp layout
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Which extraction strategy produced a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextSource {
    /// Structured accessibility-tree read
    StructuredTree,
    /// Image-based optical recognition fallback
    Recognition,
}

impl TextSource {
    /// Human-readable label attached to the displayed result
    pub fn label(&self) -> &'static str {
        match self {
            TextSource::StructuredTree => "structured extraction",
            TextSource::Recognition => "recognition fallback",
        }
    }
}

/// Text selected from exactly one source per pipeline run.
/// Never mutated after creation, only wrapped.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub source: TextSource,
    pub raw: String,
}

impl ExtractedText {
    pub fn new(source: TextSource, raw: String) -> Self {
        Self { source, raw }
    }
}

/// Why a structured-text read was judged usable or not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictReason {
    /// Below the minimum content length
    TooShort,
    /// Dominated by interface-chrome vocabulary
    ChromeDominated,
    /// Trustworthy content
    Clean,
}

/// Verdict over a structured-text read; pure function of the raw string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationVerdict {
    pub usable: bool,
    pub reason: VerdictReason,
}

impl ClassificationVerdict {
    pub fn clean() -> Self {
        Self { usable: true, reason: VerdictReason::Clean }
    }

    pub fn unusable(reason: VerdictReason) -> Self {
        Self { usable: false, reason }
    }
}

/// Terminal value of one pipeline run, immutable once constructed
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Where the image artifact was persisted
    pub artifact_path: PathBuf,
    /// Which source produced the text
    pub source: TextSource,
    /// Human-readable source label
    pub source_label: &'static str,
    /// Redacted text, truncated to the display budget
    pub display_text: String,
    /// Whether the display budget forced truncation
    pub truncated: bool,
    /// When the run completed
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

impl PipelineResult {
    /// Compose the full display string shown on the presentation surface
    pub fn render(&self) -> String {
        format!(
            "Source: {}\nArtifact: {}\n\n{}",
            self.source_label,
            self.artifact_path.display(),
            self.display_text
        )
    }
}

/// External signal that starts one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    /// Global hotkey pressed in the host shell
    Hotkey,
    /// Manual request (driver console, tests)
    Manual,
}

/// Errors that can end a pipeline run.
///
/// All are non-fatal: the coordinator returns to idle and the next
/// trigger starts a fresh run. Nothing is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("capture failed: no foreground window or empty client area")]
    CaptureFailed,

    #[error("could not save capture artifact: {0}")]
    SaveFailed(String),

    #[error("no text could be extracted from either source")]
    ExtractionEmpty {
        /// Artifact that was persisted before extraction was attempted
        artifact_path: PathBuf,
    },

    #[error("{collaborator} did not respond within {timeout_secs}s")]
    CollaboratorTimeout {
        collaborator: &'static str,
        timeout_secs: u64,
    },
}

impl PipelineError {
    /// Distinct user-facing message for the presentation surface
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::CaptureFailed => {
                "Capture failed: no foreground window or the window has an empty client area."
                    .to_string()
            }
            PipelineError::SaveFailed(reason) => {
                format!("Captured the window, but saving the screenshot failed: {reason}")
            }
            PipelineError::ExtractionEmpty { artifact_path } => format!(
                "No text could be extracted from the capture.\nArtifact: {}",
                artifact_path.display()
            ),
            PipelineError::CollaboratorTimeout { collaborator, timeout_secs } => {
                format!("The {collaborator} call timed out after {timeout_secs}s.")
            }
        }
    }
}
