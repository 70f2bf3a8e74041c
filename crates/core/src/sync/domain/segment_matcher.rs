use std::ops::Range;

use crate::lyrics::domain::text_normalizer::normalize;
use crate::shared::constants::{DEFAULT_SIMILARITY_THRESHOLD, MAX_WINDOW_SIZE, MIN_WINDOW_SIZE};
use crate::transcription::domain::transcribed_segment::TranscribedSegment;

use super::consumption_set::ConsumptionSet;
use super::similarity::{best_score, single_segment_scorers, window_scorers, SimilarityScorer};

/// Transcribed segments paired with their normalized text.
///
/// Normalizing once per run keeps the per-line matching loop free of
/// repeated Unicode work.
pub struct CandidateSegments<'a> {
    segments: &'a [TranscribedSegment],
    normalized: Vec<String>,
}

impl<'a> CandidateSegments<'a> {
    pub fn new(segments: &'a [TranscribedSegment]) -> Self {
        let normalized = segments.iter().map(|s| normalize(&s.text)).collect();
        Self {
            segments,
            normalized,
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &'a [TranscribedSegment] {
        self.segments
    }

    pub fn normalized(&self, index: usize) -> &str {
        &self.normalized[index]
    }

    /// Normalized text of a contiguous window, joined with single spaces.
    fn joined(&self, range: Range<usize>) -> String {
        self.normalized[range]
            .iter()
            .filter(|t| !t.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The contiguous run of transcribed segments chosen for one reference line.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'a> {
    first_index: usize,
    segments: &'a [TranscribedSegment],
    score: f64,
}

impl<'a> MatchResult<'a> {
    pub fn new(first_index: usize, segments: &'a [TranscribedSegment], score: f64) -> Self {
        Self {
            first_index,
            segments,
            score,
        }
    }

    /// Indices of the contributing segments in the full transcription.
    pub fn indices(&self) -> Range<usize> {
        self.first_index..self.first_index + self.segments.len()
    }

    pub fn segments(&self) -> &'a [TranscribedSegment] {
        self.segments
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn is_multi_segment(&self) -> bool {
        self.segments.len() > 1
    }
}

/// Finds the transcribed segment, or short window of consecutive segments,
/// that best matches a normalized reference line.
pub struct SegmentMatcher {
    threshold: f64,
    single_scorers: Vec<Box<dyn SimilarityScorer>>,
    window_scorers: Vec<Box<dyn SimilarityScorer>>,
}

impl SegmentMatcher {
    /// `threshold` is clamped to `[0, 1]`; a non-finite value falls back to
    /// the default.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: sanitize_threshold(threshold),
            single_scorers: single_segment_scorers(),
            window_scorers: window_scorers(),
        }
    }

    /// Replaces the metrics used for single segments and for windows.
    pub fn with_scorers(
        mut self,
        single_scorers: Vec<Box<dyn SimilarityScorer>>,
        window_scorers: Vec<Box<dyn SimilarityScorer>>,
    ) -> Self {
        self.single_scorers = single_scorers;
        self.window_scorers = window_scorers;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the best-scoring unconsumed candidate at or above the
    /// threshold. A candidate sharing nothing with the line (score 0.0) is
    /// never returned, even at threshold 0.
    ///
    /// Single segments are scored first. Windows of 2 to 4 consecutive,
    /// wholly unconsumed segments are scored when no single segment reaches
    /// the threshold, and also when the best single segment is an imperfect
    /// match, since the line may have been split across segments. A window
    /// replaces the single-segment result only with a strictly higher score;
    /// among equal scores the earliest candidate found is kept.
    pub fn find_best_match<'a>(
        &self,
        normalized_line: &str,
        candidates: &CandidateSegments<'a>,
        consumed: &ConsumptionSet,
    ) -> Option<MatchResult<'a>> {
        if normalized_line.is_empty() || candidates.is_empty() {
            return None;
        }

        let single = self.best_single(normalized_line, candidates, consumed);
        let needs_windows = single.as_ref().map_or(true, |m| m.score < 1.0);

        let best = if needs_windows {
            match (single, self.best_window(normalized_line, candidates, consumed)) {
                (Some(s), Some(w)) if w.score > s.score => Some(w),
                (Some(s), _) => Some(s),
                (None, w) => w,
            }
        } else {
            single
        };

        best.filter(|m| m.score > 0.0 && m.score >= self.threshold)
    }

    fn best_single<'a>(
        &self,
        normalized_line: &str,
        candidates: &CandidateSegments<'a>,
        consumed: &ConsumptionSet,
    ) -> Option<MatchResult<'a>> {
        let mut best: Option<MatchResult<'a>> = None;
        for index in 0..candidates.len() {
            if consumed.contains(index) {
                continue;
            }
            let score = best_score(
                &self.single_scorers,
                normalized_line,
                candidates.normalized(index),
            );
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(MatchResult::new(
                    index,
                    &candidates.segments()[index..=index],
                    score,
                ));
            }
        }
        best
    }

    fn best_window<'a>(
        &self,
        normalized_line: &str,
        candidates: &CandidateSegments<'a>,
        consumed: &ConsumptionSet,
    ) -> Option<MatchResult<'a>> {
        let mut best: Option<MatchResult<'a>> = None;
        for size in MIN_WINDOW_SIZE..=MAX_WINDOW_SIZE {
            if size > candidates.len() {
                break;
            }
            for start in 0..=candidates.len() - size {
                let range = start..start + size;
                if !consumed.is_range_free(range.clone()) {
                    continue;
                }
                let joined = candidates.joined(range.clone());
                let score = best_score(&self.window_scorers, normalized_line, &joined);
                if best.as_ref().map_or(true, |b| score > b.score) {
                    best = Some(MatchResult::new(
                        start,
                        &candidates.segments()[range],
                        score,
                    ));
                }
            }
        }
        best
    }
}

impl Default for SegmentMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

fn sanitize_threshold(threshold: f64) -> f64 {
    if threshold.is_finite() {
        threshold.clamp(0.0, 1.0)
    } else {
        DEFAULT_SIMILARITY_THRESHOLD
    }
}
