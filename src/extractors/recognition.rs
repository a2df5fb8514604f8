//! Optical-recognition extraction client.
//!
//! Spawns the recognition engine on the persisted image artifact. Any
//! failure (missing binary, bad exit, unparseable output) degrades to an
//! empty string; the selector decides whether that ends the run.

use crate::config::RecognitionConfig;
use crate::extractors::{resolve_binary_path, RecognitionService};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Default recognition binary name
const RECOGNIZER_BINARY: &str = "ocr-engine";

/// Subprocess-backed recognition client
pub struct RecognitionClient {
    binary_path: PathBuf,
}

impl RecognitionClient {
    pub fn new(config: &RecognitionConfig) -> Self {
        Self {
            binary_path: resolve_binary_path(&config.binary_path, RECOGNIZER_BINARY),
        }
    }
}

#[async_trait::async_trait]
impl RecognitionService for RecognitionClient {
    async fn recognize(&self, artifact: &Path) -> String {
        // Dies with the caller's bounded wait instead of lingering
        let output = match Command::new(&self.binary_path)
            .arg("--image")
            .arg(artifact)
            .arg("--json")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                warn!("Recognition engine failed to start: {}", e);
                return String::new();
            }
        };

        if !output.status.success() {
            warn!(
                "Recognition engine exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr)
            );
            return String::new();
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let result: serde_json::Value = match serde_json::from_str(&stdout) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to parse recognition output: {}", e);
                return String::new();
            }
        };

        if let Some(error) = result["error"].as_str() {
            warn!("Recognition engine reported: {}", error);
            return String::new();
        }

        let text = result["text"].as_str().unwrap_or("").to_string();
        debug!(
            "Recognition on {:?}: {} chars",
            artifact,
            text.chars().count()
        );
        text
    }
}
