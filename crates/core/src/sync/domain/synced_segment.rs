use std::ops::Range;

use crate::transcription::domain::transcribed_segment::WordTiming;

/// A reference line placed on the audio timeline.
///
/// Built once by the timing synthesizer and never mutated. Estimated
/// placeholders carry zero confidence and no contributing segments.
#[derive(Clone, Debug, PartialEq)]
pub struct SyncedLyricSegment {
    start_time: f64,
    end_time: f64,
    text: String,
    confidence: f64,
    word_timings: Option<Vec<WordTiming>>,
    source_segments: Range<usize>,
}

impl SyncedLyricSegment {
    /// A line resolved against transcribed segments `source_segments`.
    pub fn matched(
        start_time: f64,
        end_time: f64,
        text: impl Into<String>,
        confidence: f64,
        word_timings: Option<Vec<WordTiming>>,
        source_segments: Range<usize>,
    ) -> Self {
        Self {
            start_time,
            end_time,
            text: text.into(),
            confidence: confidence.clamp(0.0, 1.0),
            word_timings,
            source_segments,
        }
    }

    /// A placeholder for a line with no sufficiently similar segment.
    pub fn estimated(start_time: f64, end_time: f64, text: impl Into<String>) -> Self {
        Self {
            start_time,
            end_time,
            text: text.into(),
            confidence: 0.0,
            word_timings: None,
            source_segments: 0..0,
        }
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// The original, unnormalized reference text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn word_timings(&self) -> Option<&[WordTiming]> {
        self.word_timings.as_deref()
    }

    /// Indices of the transcribed segments this line consumed; empty for
    /// estimated lines.
    pub fn source_segments(&self) -> Range<usize> {
        self.source_segments.clone()
    }

    pub fn is_estimated(&self) -> bool {
        self.source_segments.is_empty()
    }
}
