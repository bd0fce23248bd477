//! Transcriber output.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A word with its own timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Word {
    pub start: f64,
    pub end: f64,
    #[serde(alias = "word")]
    pub text: String,
}

/// A transcript segment (roughly a phrase or sentence).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default)]
    pub words: Vec<Word>,
}

impl TranscriptSegment {
    /// Whitespace tokens of the segment text.
    pub fn tokens(&self) -> Vec<String> {
        self.text.split_whitespace().map(str::to_string).collect()
    }

    /// Words with timing. Segments without word timings get tokens spread
    /// uniformly across the segment.
    pub fn timed_words(&self) -> Vec<Word> {
        if !self.words.is_empty() {
            return self.words.clone();
        }
        let tokens = self.tokens();
        if tokens.is_empty() {
            return Vec::new();
        }
        let step = (self.end - self.start).max(0.0) / tokens.len() as f64;
        tokens
            .into_iter()
            .enumerate()
            .map(|(i, text)| Word {
                start: self.start + step * i as f64,
                end: self.start + step * (i + 1) as f64,
                text,
            })
            .collect()
    }
}

/// Ordered transcript segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Transcript {
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        Self { segments }
    }

    /// Every timed word overlapping `[start, end]`, in transcript order.
    pub fn words_between(&self, start: f64, end: f64) -> Vec<Word> {
        self.segments
            .iter()
            .flat_map(|s| s.timed_words())
            .filter(|w| w.end > start && w.start < end)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_words_fallback_is_uniform() {
        let seg = TranscriptSegment {
            start: 2.0,
            end: 4.0,
            text: "one two three four".into(),
            words: vec![],
        };
        let words = seg.timed_words();
        assert_eq!(words.len(), 4);
        assert!((words[1].start - 2.5).abs() < 1e-9);
        assert!((words[3].end - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_word_alias() {
        let w: Word = serde_json::from_str(r#"{"start":0,"end":1,"word":"hi"}"#).unwrap();
        assert_eq!(w.text, "hi");
    }
}
