//! Text extraction collaborators.
//!
//! The pipeline consumes two complementary text sources behind trait
//! seams: a structured accessibility-tree read and an image-based
//! recognition fallback. Both degrade to an empty string on failure;
//! the pipeline never sees an extraction fault as a panic or error.

pub mod accessibility;
pub mod recognition;

use crate::types::WindowRef;
use std::path::Path;

/// Structured accessibility-tree text source.
///
/// Contract: returns an empty string (never a degenerate short result)
/// when the window carries no usable signal.
#[async_trait::async_trait]
pub trait AccessibilityTextService: Send + Sync {
    async fn extract(&self, window: &WindowRef) -> String;
}

/// Optical-recognition text source over a persisted image artifact.
///
/// Contract: returns an empty string on failure or when no text is found.
#[async_trait::async_trait]
pub trait RecognitionService: Send + Sync {
    async fn recognize(&self, artifact: &Path) -> String;
}

/// Locate a collaborator helper binary the way the extractor clients do:
/// explicit override first, then next to the running executable, then a
/// bare name resolved through PATH.
pub(crate) fn resolve_binary_path(
    override_path: &Option<String>,
    name: &str,
) -> std::path::PathBuf {
    if let Some(path) = override_path {
        return std::path::PathBuf::from(path);
    }

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    {
        let sibling = exe_dir.join(name);
        if sibling.exists() {
            return sibling;
        }
    }

    std::path::PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_binary_path_prefers_override() {
        let path = resolve_binary_path(&Some("/opt/tools/walker".to_string()), "walker");
        assert_eq!(path, std::path::PathBuf::from("/opt/tools/walker"));
    }

    #[test]
    fn test_resolve_binary_path_falls_back_to_name() {
        let path = resolve_binary_path(&None, "definitely-not-a-real-binary");
        assert_eq!(path.file_name().unwrap(), "definitely-not-a-real-binary");
    }
}
