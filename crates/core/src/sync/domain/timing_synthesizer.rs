use crate::lyrics::domain::reference_line::ReferenceLine;
use crate::shared::constants::{FALLBACK_DURATION, FALLBACK_GAP};
use crate::transcription::domain::transcribed_segment::WordTiming;

use super::segment_matcher::MatchResult;
use super::synced_segment::SyncedLyricSegment;

/// Turns matcher results into timed lyric segments and estimates timing for
/// lines without a match.
#[derive(Debug, Clone)]
pub struct TimingSynthesizer {
    fallback_gap: f64,
    fallback_duration: f64,
}

impl TimingSynthesizer {
    pub fn new(fallback_gap: f64, fallback_duration: f64) -> Self {
        Self {
            fallback_gap: fallback_gap.max(0.0),
            fallback_duration: fallback_duration.max(0.0),
        }
    }

    /// Spans the contributing segments: earliest start to latest end.
    ///
    /// Word timings are concatenated in segment order without re-sorting;
    /// segments arrive chronologically. A line whose segments carry no word
    /// timings gets none.
    pub fn build(&self, line: &ReferenceLine, found: &MatchResult<'_>) -> SyncedLyricSegment {
        let segments = found.segments();
        let start = segments
            .iter()
            .map(|s| s.start)
            .fold(f64::INFINITY, f64::min);
        let end = segments
            .iter()
            .map(|s| s.end)
            .fold(f64::NEG_INFINITY, f64::max);

        let word_timings = if segments.iter().any(|s| s.words.is_some()) {
            let words: Vec<WordTiming> = segments
                .iter()
                .filter_map(|s| s.words.as_ref())
                .flatten()
                .cloned()
                .collect();
            Some(words)
        } else {
            None
        };

        SyncedLyricSegment::matched(
            start,
            end,
            line.text(),
            found.score(),
            word_timings,
            found.indices(),
        )
    }

    /// Places an unmatched line a fixed gap after `previous`, or at zero for
    /// the first line, with a fixed default duration.
    pub fn fallback(
        &self,
        line: &ReferenceLine,
        previous: Option<&SyncedLyricSegment>,
    ) -> SyncedLyricSegment {
        let start = previous.map_or(0.0, |p| p.end_time() + self.fallback_gap);
        SyncedLyricSegment::estimated(start, start + self.fallback_duration, line.text())
    }
}

impl Default for TimingSynthesizer {
    fn default() -> Self {
        Self::new(FALLBACK_GAP, FALLBACK_DURATION)
    }
}
