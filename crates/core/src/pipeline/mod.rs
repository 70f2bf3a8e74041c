pub mod pipeline_logger;
pub mod sync_lyrics_use_case;
pub mod transcribe_use_case;
