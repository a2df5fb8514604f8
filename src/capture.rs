//! Window capture and artifact persistence collaborators.
//!
//! Capture hands the pipeline a pixel buffer in the fixed 32-bpp BGRA
//! top-down layout; the encoder converts it to RGBA and writes the single
//! overwritten PNG artifact. The buffer is owned by the capture stage and
//! dropped right after the persist step, successful or not.

use crate::config::CaptureConfig;
use crate::extractors::resolve_binary_path;
use crate::types::{PixelBuffer, WindowRef};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Default capture helper binary name
const CAPTURE_BINARY: &str = "window-grab";

/// Errors from the capture collaborator
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("no foreground window")]
    NoWindow,

    #[error("window has an empty client area")]
    EmptyClientArea,

    #[error("capture backend: {0}")]
    Backend(String),
}

/// Errors from the artifact encoder
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("pixel buffer layout mismatch: expected {expected} bytes, got {actual}")]
    LayoutMismatch { expected: usize, actual: usize },

    #[error("encode failed: {0}")]
    Encode(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Captures the foreground window.
///
/// Contract: reports failure, never a degenerate 0x0 buffer, when there
/// is no foreground window or its client area is empty.
#[async_trait::async_trait]
pub trait WindowCaptureService: Send + Sync {
    async fn capture(&self) -> Result<(WindowRef, PixelBuffer), CaptureError>;
}

/// Persists a pixel buffer to an image file
#[async_trait::async_trait]
pub trait ImageEncoder: Send + Sync {
    async fn persist(&self, buffer: &PixelBuffer, path: &Path) -> Result<(), EncodeError>;
}

/// Subprocess-backed capture client.
///
/// The helper emits JSON metadata and dumps the raw BGRA pixels to a
/// temporary file, which is read back and deleted here.
pub struct CaptureClient {
    binary_path: PathBuf,
}

impl CaptureClient {
    pub fn new(config: &CaptureConfig) -> Self {
        Self {
            binary_path: resolve_binary_path(&config.binary_path, CAPTURE_BINARY),
        }
    }
}

#[async_trait::async_trait]
impl WindowCaptureService for CaptureClient {
    async fn capture(&self) -> Result<(WindowRef, PixelBuffer), CaptureError> {
        // Dies with the caller's bounded wait instead of lingering
        let output = Command::new(&self.binary_path)
            .arg("--foreground")
            .arg("--json")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| CaptureError::Backend(e.to_string()))?;

        if !output.status.success() {
            return Err(CaptureError::Backend(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let result: serde_json::Value = serde_json::from_str(&stdout)
            .map_err(|e| CaptureError::Backend(format!("unparseable output: {e}")))?;

        if result["error"].as_str() == Some("no_foreground_window") {
            return Err(CaptureError::NoWindow);
        }
        if let Some(error) = result["error"].as_str() {
            return Err(CaptureError::Backend(error.to_string()));
        }

        let width = parse_dimension(&result, "width")?;
        let height = parse_dimension(&result, "height")?;
        if width == 0 || height == 0 {
            return Err(CaptureError::EmptyClientArea);
        }

        let raw_path = result["raw_path"]
            .as_str()
            .ok_or_else(|| CaptureError::Backend("missing raw_path".to_string()))?;
        let data = tokio::fs::read(raw_path)
            .await
            .map_err(|e| CaptureError::Backend(format!("raw pixel read: {e}")))?;
        if let Err(e) = tokio::fs::remove_file(raw_path).await {
            warn!("Failed to remove temp pixel dump {}: {}", raw_path, e);
        }

        let buffer = PixelBuffer::new(width, height, data);
        if buffer.data.len() != buffer.expected_len() {
            return Err(CaptureError::Backend(format!(
                "pixel dump is {} bytes, expected {}",
                buffer.data.len(),
                buffer.expected_len()
            )));
        }

        let window = WindowRef {
            id: result["id"].as_u64().unwrap_or(0),
            title: result["title"].as_str().unwrap_or("").to_string(),
            app_name: result["app_name"].as_str().unwrap_or("").to_string(),
        };

        debug!(
            "Captured '{}' ({}): {}x{}",
            window.title, window.app_name, width, height
        );
        Ok((window, buffer))
    }
}

/// PNG encoder over the fixed BGRA layout
pub struct PngEncoder;

#[async_trait::async_trait]
impl ImageEncoder for PngEncoder {
    async fn persist(&self, buffer: &PixelBuffer, path: &Path) -> Result<(), EncodeError> {
        if buffer.data.len() != buffer.expected_len() {
            return Err(EncodeError::LayoutMismatch {
                expected: buffer.expected_len(),
                actual: buffer.data.len(),
            });
        }

        let rgba = bgra_to_rgba(&buffer.data);
        let image = RgbaImage::from_raw(buffer.width, buffer.height, rgba)
            .ok_or_else(|| EncodeError::Encode("buffer does not fit dimensions".to_string()))?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // image's save is synchronous; the buffer is small enough that
        // blocking the driver here matches the rest of the pipeline
        image
            .save(path)
            .map_err(|e| EncodeError::Encode(e.to_string()))?;

        debug!("Persisted artifact to {:?}", path);
        Ok(())
    }
}

/// Read a pixel dimension from the helper's metadata. A value that does
/// not fit u32 is corrupt backend output, not a plausible dimension.
fn parse_dimension(result: &serde_json::Value, key: &str) -> Result<u32, CaptureError> {
    let raw = result[key].as_u64().unwrap_or(0);
    u32::try_from(raw)
        .map_err(|_| CaptureError::Backend(format!("{key} {raw} out of range")))
}

/// Swap BGRA byte order to the RGBA the encoder expects
fn bgra_to_rgba(data: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(data.len());
    for px in data.chunks_exact(4) {
        rgba.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
    }
    rgba
}
