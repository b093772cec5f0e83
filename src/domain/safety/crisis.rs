//! Keyword-based crisis detection.
//!
//! This check runs before any AI call and is deliberately blunt: plain
//! case-insensitive substring matching over a configured keyword list. False
//! positives route a patient to crisis resources unnecessarily; false
//! negatives leave a patient in danger talking to a language model. The
//! trade-off only goes one way.

use tracing::warn;

/// Default crisis keyword list.
///
/// Phrases are stored lowercase; matching lowercases the input.
pub const DEFAULT_CRISIS_KEYWORDS: &[&str] = &[
    "suicide",
    "suicidal",
    "kill myself",
    "end my life",
    "want to die",
    "wish i was dead",
    "hurt myself",
    "harm myself",
    "self-harm",
    "self harm",
    "overdose",
    "no reason to live",
    "better off dead",
    "end it all",
    "can't go on",
    "kill him",
    "kill her",
    "kill them",
    "hurt someone",
];

/// Scans patient messages for crisis language.
#[derive(Debug, Clone)]
pub struct CrisisDetector {
    keywords: Vec<String>,
}

impl CrisisDetector {
    /// Creates a detector with a custom keyword list.
    ///
    /// Keywords are lowercased; empty entries are discarded.
    pub fn new(keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let keywords = keywords
            .into_iter()
            .map(|k| k.into().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    /// Returns true if the text contains any crisis keyword.
    ///
    /// Matching is case-insensitive substring search at any position. This
    /// function never fails; an empty text or empty keyword list simply
    /// returns false.
    pub fn detect(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }

        let lowered = text.to_lowercase();
        for keyword in &self.keywords {
            if lowered.contains(keyword.as_str()) {
                warn!(keyword = %keyword, "Crisis keyword detected in patient message");
                return true;
            }
        }
        false
    }

    /// The active keyword list.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for CrisisDetector {
    fn default() -> Self {
        Self::new(DEFAULT_CRISIS_KEYWORDS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_keyword_anywhere_in_text() {
        let detector = CrisisDetector::default();
        assert!(detector.detect("I've been thinking about suicide lately"));
        assert!(detector.detect("suicide"));
        assert!(detector.detect("honestly I just want to die"));
    }

    #[test]
    fn detection_is_case_insensitive() {
        let detector = CrisisDetector::default();
        assert!(detector.detect("I want to KILL MYSELF"));
        assert!(detector.detect("I Want To End My Life"));
    }

    #[test]
    fn multi_word_phrases_match_as_substrings() {
        let detector = CrisisDetector::default();
        assert!(detector.detect("sometimes i feel like everyone would be better off dead without me"));
        assert!(!detector.detect("I feel better today"));
    }

    #[test]
    fn benign_text_does_not_match() {
        let detector = CrisisDetector::default();
        assert!(!detector.detect("My knee has been sore since the surgery"));
        assert!(!detector.detect("When should I take my medication?"));
    }

    #[test]
    fn empty_text_never_matches() {
        let detector = CrisisDetector::default();
        assert!(!detector.detect(""));
    }

    #[test]
    fn custom_keywords_replace_defaults() {
        let detector = CrisisDetector::new(["chest pain"]);
        assert!(detector.detect("I have Chest Pain right now"));
        assert!(!detector.detect("I want to die"));
    }

    #[test]
    fn custom_keywords_are_normalized() {
        let detector = CrisisDetector::new(["  Chest Pain  ", "", "  "]);
        assert_eq!(detector.keywords(), &["chest pain".to_string()]);
    }
}
