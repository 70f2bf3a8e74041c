pub mod speech_recognizer;
pub mod transcribed_segment;
pub mod transcript_provider;
