use crate::lyrics::domain::reference_line::ReferenceLine;
use crate::shared::constants::DEFAULT_SIMILARITY_THRESHOLD;
use crate::transcription::domain::transcribed_segment::TranscribedSegment;

use super::consumption_set::ConsumptionSet;
use super::segment_matcher::{CandidateSegments, SegmentMatcher};
use super::synced_segment::SyncedLyricSegment;
use super::timing_synthesizer::TimingSynthesizer;

/// Aligns reference lyric lines to a transcription, one line at a time.
///
/// Each line takes the best unconsumed match available when it is reached;
/// earlier decisions are never revisited, so a wrong early match can leave
/// a later line without its true segments. Lines with no match get an
/// estimated placement chained after the previous output segment.
pub struct LyricsAligner {
    matcher: SegmentMatcher,
    synthesizer: TimingSynthesizer,
}

impl LyricsAligner {
    pub fn new(matcher: SegmentMatcher, synthesizer: TimingSynthesizer) -> Self {
        Self {
            matcher,
            synthesizer,
        }
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self::new(SegmentMatcher::new(threshold), TimingSynthesizer::default())
    }

    /// Produces exactly one segment per reference line, in line order.
    pub fn align(
        &self,
        lines: &[ReferenceLine],
        segments: &[TranscribedSegment],
    ) -> Vec<SyncedLyricSegment> {
        self.align_with_progress(lines, segments, &mut |_, _| {})
    }

    /// Like [`align`](Self::align), calling `progress(lines_done, total)`
    /// after each line is resolved.
    pub fn align_with_progress(
        &self,
        lines: &[ReferenceLine],
        segments: &[TranscribedSegment],
        progress: &mut dyn FnMut(usize, usize),
    ) -> Vec<SyncedLyricSegment> {
        let candidates = CandidateSegments::new(segments);
        let mut consumed = ConsumptionSet::new();
        let mut output: Vec<SyncedLyricSegment> = Vec::with_capacity(lines.len());
        let total = lines.len();

        for (done, line) in lines.iter().enumerate() {
            let synced =
                match self
                    .matcher
                    .find_best_match(line.normalized(), &candidates, &consumed)
                {
                    Some(found) => {
                        consumed.consume(found.indices());
                        log::debug!(
                            "Matched line {} to segments {:?} (confidence {:.2}): {}",
                            line.index(),
                            found.indices(),
                            found.score(),
                            preview(line.text())
                        );
                        self.synthesizer.build(line, &found)
                    }
                    None => {
                        log::warn!(
                            "No match for line {}, estimating timing: {}",
                            line.index(),
                            preview(line.text())
                        );
                        self.synthesizer.fallback(line, output.last())
                    }
                };
            output.push(synced);
            progress(done + 1, total);
        }

        log::debug!(
            "Aligned {} lines, consumed {}/{} transcribed segments",
            output.len(),
            consumed.len(),
            segments.len()
        );
        output
    }
}

impl Default for LyricsAligner {
    fn default() -> Self {
        Self::with_threshold(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

/// Synchronizes raw lyric lines with a transcription.
///
/// Always returns one segment per input line. Each carries the matcher's
/// similarity as its confidence, or `0.0` when the timing was estimated.
pub fn synchronize<S: AsRef<str>>(
    reference_lines: &[S],
    transcribed_segments: &[TranscribedSegment],
    similarity_threshold: f64,
) -> Vec<SyncedLyricSegment> {
    let lines = ReferenceLine::from_lines(reference_lines);
    LyricsAligner::with_threshold(similarity_threshold).align(&lines, transcribed_segments)
}

fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 50;
    if text.chars().count() > MAX_CHARS {
        let cut: String = text.chars().take(MAX_CHARS).collect();
        format!("'{cut}...'")
    } else {
        format!("'{text}'")
    }
}
