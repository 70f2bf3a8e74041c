use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::output::domain::lyrics_writer::LyricsWriter;
use crate::output::domain::output_format::OutputFormat;
use crate::sync::domain::synced_segment::SyncedLyricSegment;
use crate::transcription::domain::transcribed_segment::WordTiming;

pub const JSON_GENERATOR: &str = "karaoke-sync";

#[derive(Serialize)]
struct JsonDocument<'a> {
    metadata: JsonMetadata,
    segments: Vec<JsonSegment<'a>>,
}

#[derive(Serialize)]
struct JsonMetadata {
    generator: &'static str,
    version: &'static str,
    /// Seconds since the Unix epoch.
    timestamp: u64,
    total_segments: usize,
}

#[derive(Serialize)]
struct JsonSegment<'a> {
    start_time: f64,
    end_time: f64,
    duration: f64,
    text: &'a str,
    confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    word_timings: Option<&'a [WordTiming]>,
}

/// Writes the detailed JSON form, including per-word timings when present.
pub struct JsonWriter {
    timestamp: Option<u64>,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self { timestamp: None }
    }

    /// Pins the metadata timestamp instead of reading the clock.
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    fn timestamp(&self) -> u64 {
        self.timestamp.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        })
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl LyricsWriter for JsonWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn render(&self, segments: &[SyncedLyricSegment]) -> Result<String, Box<dyn std::error::Error>> {
        let document = JsonDocument {
            metadata: JsonMetadata {
                generator: JSON_GENERATOR,
                version: env!("CARGO_PKG_VERSION"),
                timestamp: self.timestamp(),
                total_segments: segments.len(),
            },
            segments: segments
                .iter()
                .map(|s| JsonSegment {
                    start_time: s.start_time(),
                    end_time: s.end_time(),
                    duration: s.duration(),
                    text: s.text(),
                    confidence: s.confidence(),
                    word_timings: s.word_timings().filter(|w| !w.is_empty()),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}
