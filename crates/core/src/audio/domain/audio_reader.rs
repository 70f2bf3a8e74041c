use std::path::Path;

use super::audio_segment::AudioSegment;

/// Domain interface for decoding a song (or its vocal stem) to PCM.
pub trait AudioReader: Send {
    /// Decode the best audio stream to mono samples at `target_sample_rate`.
    /// A file without an audio stream is an error.
    fn read_audio(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<AudioSegment, Box<dyn std::error::Error>>;
}
