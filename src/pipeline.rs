//! Top-level pipeline coordination.
//!
//! One run per trigger event, strictly linear:
//! capture -> persist artifact -> select text source -> redact -> format.
//! Every collaborator call carries a bounded wait so a hung backend
//! surfaces as a timeout instead of stalling the driver loop forever.
//! All failures are non-fatal; the coordinator returns to idle and
//! accepts the next trigger.

use crate::capture::{ImageEncoder, WindowCaptureService};
use crate::config::Config;
use crate::extractors::{AccessibilityTextService, RecognitionService};
use crate::formatter::OutputFormatter;
use crate::redaction::RedactionEngine;
use crate::selector::TextSourceSelector;
use crate::types::{PipelineError, PipelineResult, TriggerEvent};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Pipeline stages, in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Capturing,
    Extracting,
    Redacting,
    Presenting,
}

/// Drives one full pipeline run per trigger
pub struct CaptureCoordinator {
    capture: Box<dyn WindowCaptureService>,
    encoder: Box<dyn ImageEncoder>,
    selector: TextSourceSelector,
    redaction: RedactionEngine,
    formatter: OutputFormatter,
    artifact_path: PathBuf,
    collaborator_timeout: Duration,
    state: PipelineState,
}

impl CaptureCoordinator {
    pub fn new(
        config: &Config,
        capture: Box<dyn WindowCaptureService>,
        encoder: Box<dyn ImageEncoder>,
        accessibility: Box<dyn AccessibilityTextService>,
        recognition: Box<dyn RecognitionService>,
    ) -> Self {
        Self {
            capture,
            encoder,
            selector: TextSourceSelector::new(config, accessibility, recognition),
            redaction: RedactionEngine::new(&config.redaction.rules),
            formatter: OutputFormatter::new(&config.display),
            artifact_path: config.artifact.artifact_path(),
            collaborator_timeout: Duration::from_secs(config.timing.collaborator_timeout_secs),
            state: PipelineState::Idle,
        }
    }

    /// Current stage; `Idle` between runs
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Fixed artifact path, overwritten on every run
    pub fn artifact_path(&self) -> &PathBuf {
        &self.artifact_path
    }

    /// Run the pipeline once. Returns to `Idle` on every exit path.
    pub async fn run(&mut self, trigger: TriggerEvent) -> Result<PipelineResult, PipelineError> {
        info!("Pipeline run triggered by {:?}", trigger);
        let result = self.run_stages().await;
        self.enter(PipelineState::Idle);
        match &result {
            Ok(r) => info!(
                "Run complete: {} ({} chars{})",
                r.source_label,
                r.display_text.chars().count(),
                if r.truncated { ", truncated" } else { "" }
            ),
            Err(e) => warn!("Run ended without a result: {}", e),
        }
        result
    }

    async fn run_stages(&mut self) -> Result<PipelineResult, PipelineError> {
        self.enter(PipelineState::Capturing);
        let (window, buffer) = timeout(self.collaborator_timeout, self.capture.capture())
            .await
            .map_err(|_| PipelineError::CollaboratorTimeout {
                collaborator: "capture service",
                timeout_secs: self.collaborator_timeout.as_secs(),
            })?
            .map_err(|e| {
                warn!("Capture failed: {}", e);
                PipelineError::CaptureFailed
            })?;

        // The pixel buffer does not outlive the persist step; it is
        // dropped here whether persistence succeeded or not.
        let persisted = timeout(
            self.collaborator_timeout,
            self.encoder.persist(&buffer, &self.artifact_path),
        )
        .await;
        drop(buffer);

        match persisted {
            Err(_) => {
                return Err(PipelineError::CollaboratorTimeout {
                    collaborator: "image encoder",
                    timeout_secs: self.collaborator_timeout.as_secs(),
                })
            }
            // The artifact is required input to the recognition fallback,
            // so a persist failure ends the run before extraction.
            Ok(Err(e)) => return Err(PipelineError::SaveFailed(e.to_string())),
            Ok(Ok(())) => {}
        }

        self.enter(PipelineState::Extracting);
        let extracted = self.selector.select(&window, &self.artifact_path).await?;
        // A Clean structured read is never blank, so a blank selection
        // means the recognition fallback ran and found nothing: both
        // sources have been consulted by this point.
        if extracted.raw.trim().is_empty() {
            return Err(PipelineError::ExtractionEmpty {
                artifact_path: self.artifact_path.clone(),
            });
        }

        self.enter(PipelineState::Redacting);
        let redacted = self.redaction.redact(&extracted.raw);

        self.enter(PipelineState::Presenting);
        Ok(self
            .formatter
            .format(extracted.source, redacted, self.artifact_path.clone()))
    }

    fn enter(&mut self, next: PipelineState) {
        debug!("Pipeline state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
