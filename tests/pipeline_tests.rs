//! End-to-end pipeline tests with in-memory collaborators.

use screenlens::capture::{CaptureError, EncodeError};
use screenlens::{
    AccessibilityTextService, CaptureCoordinator, Config, ImageEncoder, PipelineError,
    PipelineState, PixelBuffer, RecognitionService, TextSource, TriggerEvent,
    WindowCaptureService, WindowRef, TRUNCATION_MARKER,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn test_buffer() -> PixelBuffer {
    PixelBuffer::new(2, 2, vec![0u8; 16])
}

struct MockCapture {
    fail: bool,
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl WindowCaptureService for MockCapture {
    async fn capture(&self) -> Result<(WindowRef, PixelBuffer), CaptureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CaptureError::NoWindow);
        }
        let window = WindowRef {
            id: 42,
            title: "Document".to_string(),
            app_name: "Editor".to_string(),
        };
        Ok((window, test_buffer()))
    }
}

struct MockEncoder {
    fail: bool,
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl ImageEncoder for MockEncoder {
    async fn persist(&self, _buffer: &PixelBuffer, _path: &Path) -> Result<(), EncodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EncodeError::Encode("disk full".to_string()));
        }
        Ok(())
    }
}

struct MockAccessibility {
    text: String,
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl AccessibilityTextService for MockAccessibility {
    async fn extract(&self, _window: &WindowRef) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text.clone()
    }
}

struct MockRecognition {
    text: String,
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl RecognitionService for MockRecognition {
    async fn recognize(&self, _artifact: &Path) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text.clone()
    }
}

struct Counters {
    capture: Arc<AtomicUsize>,
    encode: Arc<AtomicUsize>,
    accessibility: Arc<AtomicUsize>,
    recognition: Arc<AtomicUsize>,
}

fn coordinator(
    config: Config,
    capture_fails: bool,
    encode_fails: bool,
    structured: &str,
    recognized: &str,
) -> (CaptureCoordinator, Counters) {
    let counters = Counters {
        capture: Arc::new(AtomicUsize::new(0)),
        encode: Arc::new(AtomicUsize::new(0)),
        accessibility: Arc::new(AtomicUsize::new(0)),
        recognition: Arc::new(AtomicUsize::new(0)),
    };

    let coordinator = CaptureCoordinator::new(
        &config,
        Box::new(MockCapture {
            fail: capture_fails,
            calls: counters.capture.clone(),
        }),
        Box::new(MockEncoder {
            fail: encode_fails,
            calls: counters.encode.clone(),
        }),
        Box::new(MockAccessibility {
            text: structured.to_string(),
            calls: counters.accessibility.clone(),
        }),
        Box::new(MockRecognition {
            text: recognized.to_string(),
            calls: counters.recognition.clone(),
        }),
    );

    (coordinator, counters)
}

fn prose(len: usize) -> String {
    "lorem ipsum dolor sit amet. ".chars().cycle().take(len).collect()
}

#[tokio::test]
async fn clean_structured_text_flows_through() {
    let structured = prose(500);
    let (mut coordinator, counters) = coordinator(Config::default(), false, false, &structured, "");

    let result = coordinator.run(TriggerEvent::Hotkey).await.unwrap();

    assert_eq!(result.source, TextSource::StructuredTree);
    assert_eq!(result.source_label, "structured extraction");
    assert_eq!(result.display_text, structured);
    assert!(!result.truncated);
    // Recognition was never consulted: exactly one source per run
    assert_eq!(counters.recognition.load(Ordering::SeqCst), 0);
    assert_eq!(coordinator.state(), PipelineState::Idle);
}

#[tokio::test]
async fn chrome_dominated_with_empty_recognition_is_extraction_empty() {
    let chrome = format!("{} Minimize Restore File Edit Explorer Toggle", prose(250));
    let (mut coordinator, counters) = coordinator(Config::default(), false, false, &chrome, "");

    let err = coordinator.run(TriggerEvent::Hotkey).await.unwrap_err();

    match &err {
        PipelineError::ExtractionEmpty { artifact_path } => {
            assert_eq!(artifact_path, coordinator.artifact_path());
        }
        other => panic!("expected ExtractionEmpty, got {other:?}"),
    }
    assert_eq!(counters.recognition.load(Ordering::SeqCst), 1);
    // User message carries only the artifact path and the explanation
    assert!(err.user_message().contains("No text could be extracted"));
    assert_eq!(coordinator.state(), PipelineState::Idle);
}

#[tokio::test]
async fn chrome_dominated_falls_back_to_recognition() {
    let chrome = format!("{} Minimize Restore File Edit Explorer Toggle", prose(250));
    let (mut coordinator, counters) =
        coordinator(Config::default(), false, false, &chrome, "text read off the pixels");

    let result = coordinator.run(TriggerEvent::Hotkey).await.unwrap();

    assert_eq!(result.source, TextSource::Recognition);
    assert_eq!(result.source_label, "recognition fallback");
    assert_eq!(result.display_text, "text read off the pixels");
    assert_eq!(counters.recognition.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn capture_failure_short_circuits() {
    let (mut coordinator, counters) = coordinator(Config::default(), true, false, &prose(500), "");

    let err = coordinator.run(TriggerEvent::Hotkey).await.unwrap_err();

    assert!(matches!(err, PipelineError::CaptureFailed));
    // No artifact, no extraction attempted
    assert_eq!(counters.encode.load(Ordering::SeqCst), 0);
    assert_eq!(counters.accessibility.load(Ordering::SeqCst), 0);
    assert_eq!(counters.recognition.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn save_failure_skips_extraction() {
    let (mut coordinator, counters) = coordinator(Config::default(), false, true, &prose(500), "");

    let err = coordinator.run(TriggerEvent::Hotkey).await.unwrap_err();

    assert!(matches!(err, PipelineError::SaveFailed(_)));
    assert_eq!(counters.capture.load(Ordering::SeqCst), 1);
    // The artifact is input to the fallback, so extraction never runs
    assert_eq!(counters.accessibility.load(Ordering::SeqCst), 0);
    assert_eq!(counters.recognition.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn secrets_are_redacted_before_display() {
    let secret_text = format!(
        "{} api_key=ABC123 Bearer xyz.abc.def and sk-abcdefghij0123456789",
        prose(300)
    );
    let (mut coordinator, _) = coordinator(Config::default(), false, false, &secret_text, "");

    let result = coordinator.run(TriggerEvent::Hotkey).await.unwrap();

    assert!(result.display_text.contains("api_key=[REDACTED]"));
    assert!(result.display_text.contains("Bearer [REDACTED_TOKEN]"));
    assert!(result.display_text.contains("[REDACTED_API_KEY]"));
    assert!(!result.display_text.contains("ABC123"));
    assert!(!result.display_text.contains("xyz.abc.def"));
}

#[tokio::test]
async fn display_budget_is_enforced() {
    let mut config = Config::default();
    config.display.budget_chars = 100;

    let structured = prose(500);
    let (mut coordinator, _) = coordinator(config, false, false, &structured, "");

    let result = coordinator.run(TriggerEvent::Hotkey).await.unwrap();

    assert!(result.truncated);
    let expected: String = structured.chars().take(100).collect();
    assert_eq!(result.display_text, format!("{expected}{TRUNCATION_MARKER}"));
}

#[tokio::test]
async fn coordinator_accepts_next_trigger_after_failure() {
    let (mut coordinator, _) = coordinator(Config::default(), false, false, "", "");

    // First run fails: both sources empty
    let err = coordinator.run(TriggerEvent::Manual).await.unwrap_err();
    assert!(matches!(err, PipelineError::ExtractionEmpty { .. }));
    assert_eq!(coordinator.state(), PipelineState::Idle);

    // The same coordinator serves the next trigger
    let err = coordinator.run(TriggerEvent::Manual).await.unwrap_err();
    assert!(matches!(err, PipelineError::ExtractionEmpty { .. }));
}

#[tokio::test]
async fn rendered_output_embeds_artifact_and_label() {
    let structured = prose(500);
    let (mut coordinator, _) = coordinator(Config::default(), false, false, &structured, "");

    let result = coordinator.run(TriggerEvent::Hotkey).await.unwrap();
    let rendered = result.render();

    assert!(rendered.contains("structured extraction"));
    assert!(rendered.contains(&coordinator.artifact_path().display().to_string()));
}
