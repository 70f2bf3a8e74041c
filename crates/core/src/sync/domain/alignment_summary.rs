use std::fmt;

use super::synced_segment::SyncedLyricSegment;

pub const HIGH_CONFIDENCE: f64 = 0.8;
pub const MEDIUM_CONFIDENCE: f64 = 0.5;

/// Aggregate quality figures for one synchronization run.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentSummary {
    pub total: usize,
    pub high_confidence: usize,
    pub medium_confidence: usize,
    pub low_confidence: usize,
    pub estimated: usize,
    /// Last segment's end minus first segment's start.
    pub total_duration: f64,
    pub average_confidence: f64,
}

impl AlignmentSummary {
    pub fn from_segments(segments: &[SyncedLyricSegment]) -> Self {
        let count = |pred: &dyn Fn(f64) -> bool| {
            segments.iter().filter(|s| pred(s.confidence())).count()
        };

        let total_duration = match (segments.first(), segments.last()) {
            (Some(first), Some(last)) => last.end_time() - first.start_time(),
            _ => 0.0,
        };
        let average_confidence = if segments.is_empty() {
            0.0
        } else {
            segments.iter().map(|s| s.confidence()).sum::<f64>() / segments.len() as f64
        };

        Self {
            total: segments.len(),
            high_confidence: count(&|c| c >= HIGH_CONFIDENCE),
            medium_confidence: count(&|c| (MEDIUM_CONFIDENCE..HIGH_CONFIDENCE).contains(&c)),
            low_confidence: count(&|c| c < MEDIUM_CONFIDENCE),
            estimated: segments.iter().filter(|s| s.is_estimated()).count(),
            total_duration,
            average_confidence,
        }
    }
}

impl fmt::Display for AlignmentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Alignment summary:")?;
        writeln!(f, "  Total segments: {}", self.total)?;
        writeln!(f, "  High confidence (>=80%): {}", self.high_confidence)?;
        writeln!(f, "  Medium confidence (50-79%): {}", self.medium_confidence)?;
        writeln!(f, "  Low confidence (<50%): {}", self.low_confidence)?;
        writeln!(f, "  Estimated timings: {}", self.estimated)?;
        if self.total > 0 {
            writeln!(f, "  Total duration: {:.1} seconds", self.total_duration)?;
            write!(f, "  Average confidence: {:.2}", self.average_confidence)?;
        }
        Ok(())
    }
}
