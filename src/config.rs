//! Configuration management for the capture pipeline.
//!
//! Loads configuration from TOML files and provides runtime defaults.
//! The chrome vocabulary and the redaction rule table live here so they
//! can be substituted without code changes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub selector: SelectorConfig,

    #[serde(default)]
    pub accessibility: AccessibilityConfig,

    #[serde(default)]
    pub recognition: RecognitionConfig,

    #[serde(default)]
    pub capture: CaptureConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub redaction: RedactionConfig,

    #[serde(default)]
    pub artifact: ArtifactConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Whether the pipeline is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Bounded wait applied to every collaborator call
    #[serde(default = "default_collaborator_timeout")]
    pub collaborator_timeout_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            collaborator_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Structured text shorter than this is judged too short to trust
    #[serde(default = "default_min_content_chars")]
    pub min_content_chars: usize,

    /// Distinct vocabulary hits at or above this count mean chrome-dominated
    #[serde(default = "default_chrome_token_threshold")]
    pub chrome_token_threshold: usize,

    /// Interface-chrome tokens matched case-sensitively as substrings
    #[serde(default = "default_chrome_vocabulary")]
    pub chrome_vocabulary: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            min_content_chars: 200,
            chrome_token_threshold: 5,
            chrome_vocabulary: default_chrome_vocabulary(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessibilityConfig {
    /// Accumulation stops once this many characters are collected
    #[serde(default = "default_char_cap")]
    pub char_cap: usize,

    /// Accumulated output below this length is discarded as no-signal
    #[serde(default = "default_min_signal_chars")]
    pub min_signal_chars: usize,

    /// Path to the accessibility walker binary
    #[serde(default)]
    pub binary_path: Option<String>,
}

impl Default for AccessibilityConfig {
    fn default() -> Self {
        Self {
            char_cap: 12_000,
            min_signal_chars: 40,
            binary_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognitionConfig {
    /// Path to the optical-recognition binary
    #[serde(default)]
    pub binary_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Path to the window capture helper binary
    #[serde(default)]
    pub binary_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Maximum characters shown before truncation
    #[serde(default = "default_budget_chars")]
    pub budget_chars: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { budget_chars: 6500 }
    }
}

/// One entry in the ordered redaction chain.
/// `ordinal` defines evaluation order; lower runs first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionRuleSpec {
    pub pattern: String,
    pub replacement: String,
    pub ordinal: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionConfig {
    #[serde(default = "default_redaction_rules")]
    pub rules: Vec<RedactionRuleSpec>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            rules: default_redaction_rules(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Constant filename, overwritten on every run
    #[serde(default = "default_artifact_filename")]
    pub filename: String,

    /// Override for the pictures directory
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            filename: default_artifact_filename(),
            directory: None,
        }
    }
}

impl ArtifactConfig {
    /// Resolve the fixed artifact path: pictures directory + constant filename
    pub fn artifact_path(&self) -> PathBuf {
        let dir = self
            .directory
            .clone()
            .or_else(dirs::picture_dir)
            .unwrap_or_else(std::env::temp_dir);
        dir.join(&self.filename)
    }
}

// Default value functions for serde

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_collaborator_timeout() -> u64 {
    30
}

fn default_min_content_chars() -> usize {
    200
}

fn default_chrome_token_threshold() -> usize {
    5
}

fn default_char_cap() -> usize {
    12_000
}

fn default_min_signal_chars() -> usize {
    40
}

fn default_budget_chars() -> usize {
    6500
}

fn default_artifact_filename() -> String {
    "screenlens_capture.png".to_string()
}

/// Menu, toolbar and panel labels that accessibility trees surface even
/// when the document content itself is invisible to them.
fn default_chrome_vocabulary() -> Vec<String> {
    [
        "Minimize",
        "Maximize",
        "Restore",
        "Close Window",
        "File",
        "Edit",
        "View",
        "Help",
        "Window",
        "Tools",
        "Explorer",
        "Toggle",
        "Navigation",
        "Toolbar",
        "Menu Bar",
        "Status Bar",
        "Activity Bar",
        "Side Bar",
        "Scroll Bar",
        "Terminal",
        "Settings",
        "Search",
        "Selection",
        "Run and Debug",
        "Source Control",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Ordered redaction chain. Specific token shapes (1-4) run before the
/// generic key/value rules (5-6) so a generic rule never consumes text a
/// specific rule has already condensed into a placeholder, and vice versa.
fn default_redaction_rules() -> Vec<RedactionRuleSpec> {
    vec![
        RedactionRuleSpec {
            pattern: r"sk-[A-Za-z0-9]{10,}".to_string(),
            replacement: "[REDACTED_API_KEY]".to_string(),
            ordinal: 1,
        },
        RedactionRuleSpec {
            pattern: r"Bearer\s+[A-Za-z0-9\-\._~\+/]+=*".to_string(),
            replacement: "Bearer [REDACTED_TOKEN]".to_string(),
            ordinal: 2,
        },
        RedactionRuleSpec {
            pattern: r"AKIA[0-9A-Z]{16}".to_string(),
            replacement: "[REDACTED_AWS_KEY]".to_string(),
            ordinal: 3,
        },
        RedactionRuleSpec {
            pattern: r"-----BEGIN [A-Z ]+PRIVATE KEY-----[\s\S]*?-----END [A-Z ]+PRIVATE KEY-----"
                .to_string(),
            replacement: "[REDACTED_PRIVATE_KEY_BLOCK]".to_string(),
            ordinal: 4,
        },
        RedactionRuleSpec {
            pattern: r#"(?i)(api[_-]?key\s*[:=]\s*)([^\s"']+)"#.to_string(),
            replacement: "${1}[REDACTED]".to_string(),
            ordinal: 5,
        },
        RedactionRuleSpec {
            pattern: r#"(?i)(token\s*[:=]\s*)([^\s"']+)"#.to_string(),
            replacement: "${1}[REDACTED]".to_string(),
            ordinal: 6,
        },
    ]
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Self {
        Self::load_from_path(Self::default_config_path())
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: PathBuf) -> Self {
        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config file: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config file found at {:?}, using defaults", path);
                Self::default()
            }
        }
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("screenlens")
            .join("config.toml")
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: PathBuf) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

        std::fs::write(&path, contents)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }
}
