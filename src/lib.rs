//! screenlens - foreground window capture and text extraction pipeline
//!
//! One pipeline run per trigger event: capture the foreground window,
//! persist a PNG artifact, obtain the window's visible text, scrub
//! secret-shaped tokens, and format the result for display.
//!
//! # Architecture
//!
//! Two complementary extraction strategies feed the pipeline: a
//! structured accessibility-tree read, preferred when its output looks
//! like real content, and an image-recognition fallback over the
//! persisted artifact when the structured read is too short or dominated
//! by interface chrome. Exactly one source's output reaches redaction.
//! All external collaborators (capture backend, accessibility walker,
//! recognition engine, presentation surface) sit behind trait seams.

pub mod capture;
pub mod classifier;
pub mod config;
pub mod extractors;
pub mod formatter;
pub mod pipeline;
pub mod redaction;
pub mod selector;
pub mod surface;
pub mod types;

// Re-export commonly used types
pub use capture::{CaptureClient, ImageEncoder, PngEncoder, WindowCaptureService};
pub use classifier::UsefulnessClassifier;
pub use config::Config;
pub use extractors::accessibility::AccessibilityClient;
pub use extractors::recognition::RecognitionClient;
pub use extractors::{AccessibilityTextService, RecognitionService};
pub use formatter::{OutputFormatter, TRUNCATION_MARKER};
pub use pipeline::{CaptureCoordinator, PipelineState};
pub use redaction::RedactionEngine;
pub use selector::TextSourceSelector;
pub use surface::{ConsoleSurface, PresentationSurface};
pub use types::{
    ClassificationVerdict, ExtractedText, PipelineError, PipelineResult, PixelBuffer,
    TextSource, TriggerEvent, VerdictReason, WindowId, WindowRef,
};
