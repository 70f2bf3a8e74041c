pub mod recognizer_transcript_provider;
pub mod transcript_file;
pub mod whisper_recognizer;
