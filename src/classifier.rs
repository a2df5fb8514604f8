//! Usefulness classification of structured-text reads.
//!
//! Accessibility trees for many modern UI frameworks surface only chrome
//! widgets (menus, toolbars, navigation labels) and not the document or
//! editor content. Counting vocabulary hits is a cheap proxy for "this is
//! navigation furniture, not content" without semantic understanding.

use crate::config::SelectorConfig;
use crate::types::{ClassificationVerdict, VerdictReason};
use tracing::debug;

/// Scores raw structured text to decide whether it is trustworthy
pub struct UsefulnessClassifier {
    min_content_chars: usize,
    chrome_token_threshold: usize,
    chrome_vocabulary: Vec<String>,
}

impl UsefulnessClassifier {
    pub fn new(config: &SelectorConfig) -> Self {
        Self {
            min_content_chars: config.min_content_chars,
            chrome_token_threshold: config.chrome_token_threshold,
            chrome_vocabulary: config.chrome_vocabulary.clone(),
        }
    }

    /// Classify a raw structured-text read. Pure, no side effects.
    pub fn classify(&self, text: &str) -> ClassificationVerdict {
        // Whitespace-only padding can reach any length without carrying
        // content; it must not survive as a Clean selection.
        if text.trim().is_empty() || text.chars().count() < self.min_content_chars {
            return ClassificationVerdict::unusable(VerdictReason::TooShort);
        }

        let hits = self.chrome_token_count(text);
        if hits >= self.chrome_token_threshold {
            debug!("Structured text chrome-dominated: {} vocabulary hits", hits);
            return ClassificationVerdict::unusable(VerdictReason::ChromeDominated);
        }

        ClassificationVerdict::clean()
    }

    /// Count distinct vocabulary tokens present as case-sensitive
    /// substrings. Each entry counts at most once however often it repeats.
    fn chrome_token_count(&self, text: &str) -> usize {
        self.chrome_vocabulary
            .iter()
            .filter(|token| text.contains(token.as_str()))
            .count()
    }
}

impl Default for UsefulnessClassifier {
    fn default() -> Self {
        Self::new(&SelectorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Prose padding free of vocabulary tokens
    fn padding(len: usize) -> String {
        "lorem ipsum dolor sit amet. ".chars().cycle().take(len).collect()
    }

    #[test]
    fn test_short_text_is_too_short() {
        let verdict = UsefulnessClassifier::default().classify("just a title");
        assert!(!verdict.usable);
        assert_eq!(verdict.reason, VerdictReason::TooShort);
    }

    #[test]
    fn test_199_chars_too_short_200_not() {
        let classifier = UsefulnessClassifier::default();

        let verdict = classifier.classify(&padding(199));
        assert_eq!(verdict.reason, VerdictReason::TooShort);

        let verdict = classifier.classify(&padding(200));
        assert_eq!(verdict.reason, VerdictReason::Clean);
    }

    #[test]
    fn test_whitespace_only_is_too_short_at_any_length() {
        let classifier = UsefulnessClassifier::default();
        let verdict = classifier.classify(&" \t\n".repeat(100));
        assert!(!verdict.usable);
        assert_eq!(verdict.reason, VerdictReason::TooShort);
    }

    #[test]
    fn test_clean_prose() {
        let verdict = UsefulnessClassifier::default().classify(&padding(500));
        assert!(verdict.usable);
        assert_eq!(verdict.reason, VerdictReason::Clean);
    }

    #[test]
    fn test_chrome_threshold_boundary() {
        let classifier = UsefulnessClassifier::default();

        let four = format!("{} Minimize Restore File Edit", padding(250));
        let verdict = classifier.classify(&four);
        assert!(verdict.usable, "4 tokens must not trigger the fallback");
        assert_eq!(verdict.reason, VerdictReason::Clean);

        let five = format!("{} Explorer", four);
        let verdict = classifier.classify(&five);
        assert!(!verdict.usable);
        assert_eq!(verdict.reason, VerdictReason::ChromeDominated);
    }

    #[test]
    fn test_repeated_token_counts_once() {
        let text = format!("{} Toggle Toggle Toggle Toggle Toggle Toggle", padding(250));
        let verdict = UsefulnessClassifier::default().classify(&text);
        assert!(verdict.usable);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let text = format!("{} minimize restore file edit explorer toggle", padding(250));
        let verdict = UsefulnessClassifier::default().classify(&text);
        assert!(verdict.usable, "lowercase variants are not vocabulary hits");
    }

    #[test]
    fn test_short_circuit_prefers_too_short() {
        // Length is checked before vocabulary scanning
        let text = "Minimize Restore File Edit Explorer Toggle";
        let verdict = UsefulnessClassifier::default().classify(text);
        assert_eq!(verdict.reason, VerdictReason::TooShort);
    }
}
