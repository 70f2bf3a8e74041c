use std::path::{Path, PathBuf};

use crate::audio::domain::audio_reader::AudioReader;
use crate::shared::constants::WHISPER_SAMPLE_RATE;
use crate::transcription::domain::speech_recognizer::SpeechRecognizer;
use crate::transcription::domain::transcribed_segment::TranscribedSegment;
use crate::transcription::domain::transcript_provider::TranscriptProvider;

use super::transcript_file::read_transcript;

/// Decodes the audio file and runs a speech recognizer over it.
pub struct RecognizerTranscriptProvider {
    reader: Box<dyn AudioReader>,
    recognizer: Box<dyn SpeechRecognizer>,
}

impl RecognizerTranscriptProvider {
    pub fn new(reader: Box<dyn AudioReader>, recognizer: Box<dyn SpeechRecognizer>) -> Self {
        Self { reader, recognizer }
    }
}

impl TranscriptProvider for RecognizerTranscriptProvider {
    fn transcribe(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> Result<Vec<TranscribedSegment>, Box<dyn std::error::Error>> {
        let audio = self.reader.read_audio(audio_path, WHISPER_SAMPLE_RATE)?;
        if audio.is_empty() {
            return Err(format!("No audio samples decoded from {}", audio_path.display()).into());
        }
        if audio.rms() < 1e-4 {
            log::warn!(
                "Audio in {} is nearly silent; transcription will likely be empty",
                audio_path.display()
            );
        }
        self.recognizer.transcribe(&audio, language)
    }
}

/// Serves a transcription saved to JSON, ignoring the audio path.
pub struct FileTranscriptProvider {
    path: PathBuf,
}

impl FileTranscriptProvider {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TranscriptProvider for FileTranscriptProvider {
    fn transcribe(
        &self,
        _audio_path: &Path,
        _language: Option<&str>,
    ) -> Result<Vec<TranscribedSegment>, Box<dyn std::error::Error>> {
        Ok(read_transcript(&self.path)?.segments)
    }
}
