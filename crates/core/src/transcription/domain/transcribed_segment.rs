use serde::{Deserialize, Serialize};

/// Timing of a single recognized word.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    pub word: String,
    pub start: f64,
    pub end: f64,
    pub confidence: f32,
}

impl WordTiming {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A time-stamped chunk of recognized speech.
///
/// Speech recognizers emit these in non-decreasing `start` order; the
/// matcher's windowing depends on that order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranscribedSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<WordTiming>>,
}

impl TranscribedSegment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            words: None,
        }
    }

    pub fn with_words(mut self, words: Vec<WordTiming>) -> Self {
        self.words = Some(words);
        self
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Checks the ordering contract recognizers must honor: each segment has
/// `start <= end` and starts are non-decreasing.
pub fn is_chronological(segments: &[TranscribedSegment]) -> bool {
    segments.iter().all(|s| s.start <= s.end)
        && segments.windows(2).all(|w| w[0].start <= w[1].start)
}
