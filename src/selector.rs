//! Text source selection.
//!
//! Tries the structured accessibility read first, scores it, and falls
//! back to recognition over the persisted artifact when the structured
//! read is too short or dominated by interface chrome. Exactly one
//! source's output survives a run; the losing read is discarded.

use crate::classifier::UsefulnessClassifier;
use crate::config::Config;
use crate::extractors::{AccessibilityTextService, RecognitionService};
use crate::types::{ExtractedText, PipelineError, TextSource, WindowRef};
use std::path::Path;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

pub struct TextSourceSelector {
    classifier: UsefulnessClassifier,
    accessibility: Box<dyn AccessibilityTextService>,
    recognition: Box<dyn RecognitionService>,
    collaborator_timeout: Duration,
}

impl TextSourceSelector {
    pub fn new(
        config: &Config,
        accessibility: Box<dyn AccessibilityTextService>,
        recognition: Box<dyn RecognitionService>,
    ) -> Self {
        Self {
            classifier: UsefulnessClassifier::new(&config.selector),
            accessibility,
            recognition,
            collaborator_timeout: Duration::from_secs(config.timing.collaborator_timeout_secs),
        }
    }

    /// Select exactly one text source for this run.
    ///
    /// A structured read that times out degrades to empty (and therefore
    /// to the fallback); a recognition timeout surfaces as an error since
    /// there is nothing left to fall back to.
    pub async fn select(
        &self,
        window: &WindowRef,
        artifact: &Path,
    ) -> Result<ExtractedText, PipelineError> {
        let structured = match timeout(
            self.collaborator_timeout,
            self.accessibility.extract(window),
        )
        .await
        {
            Ok(text) => text,
            Err(_) => {
                warn!(
                    "Accessibility read timed out after {:?}, treating as no signal",
                    self.collaborator_timeout
                );
                String::new()
            }
        };

        let verdict = self.classifier.classify(&structured);
        if verdict.usable {
            info!(
                "Selected structured extraction ({} chars)",
                structured.chars().count()
            );
            return Ok(ExtractedText::new(TextSource::StructuredTree, structured));
        }

        debug!(
            "Structured read unusable ({:?}), falling back to recognition",
            verdict.reason
        );

        let recognized = timeout(
            self.collaborator_timeout,
            self.recognition.recognize(artifact),
        )
        .await
        .map_err(|_| PipelineError::CollaboratorTimeout {
            collaborator: "recognition engine",
            timeout_secs: self.collaborator_timeout.as_secs(),
        })?;

        info!(
            "Selected recognition fallback ({} chars)",
            recognized.chars().count()
        );
        Ok(ExtractedText::new(TextSource::Recognition, recognized))
    }
}
