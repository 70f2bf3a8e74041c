/// Minimum similarity for a transcription match to be accepted.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

/// Window sizes tried when a line may span consecutive segments.
pub const MIN_WINDOW_SIZE: usize = 2;
pub const MAX_WINDOW_SIZE: usize = 4;

/// Seconds between the previous segment's end and an estimated line.
pub const FALLBACK_GAP: f64 = 0.5;
/// Duration given to an estimated line, in seconds.
pub const FALLBACK_DURATION: f64 = 3.0;

pub const WHISPER_SAMPLE_RATE: u32 = 16000;
pub const DEFAULT_WHISPER_MODEL: &str = "base";
pub const WHISPER_MODELS: &[&str] = &["tiny", "base", "small", "medium", "large-v3"];
pub const WHISPER_MODEL_BASE_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

pub const LYRICS_EXTENSIONS: &[&str] = &["txt", "lrc", "srt"];

/// Suffix appended to the audio file stem for synchronized outputs.
pub const SYNCED_SUFFIX: &str = "_synced";
pub const DEFAULT_OUTPUT_DIR: &str = "./sync_output";
