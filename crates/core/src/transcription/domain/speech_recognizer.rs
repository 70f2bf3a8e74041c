use crate::audio::domain::audio_segment::AudioSegment;

use super::transcribed_segment::TranscribedSegment;

/// Domain interface for speech-to-text transcription.
///
/// Implementations return segments in chronological order, each with
/// optional word-level timings. `language` is an ISO code hint such as
/// `"en"` or `"ko"`; `None` lets the model detect it.
pub trait SpeechRecognizer: Send {
    fn transcribe(
        &self,
        audio: &AudioSegment,
        language: Option<&str>,
    ) -> Result<Vec<TranscribedSegment>, Box<dyn std::error::Error>>;
}
