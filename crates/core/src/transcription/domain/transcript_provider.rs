use std::path::Path;

use super::transcribed_segment::TranscribedSegment;

/// Produces a chronological transcription for a song.
///
/// This is the seam the synchronization pipeline depends on: one
/// implementation decodes the audio and runs a speech model, another loads
/// a transcription saved earlier.
pub trait TranscriptProvider: Send {
    fn transcribe(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> Result<Vec<TranscribedSegment>, Box<dyn std::error::Error>>;
}
