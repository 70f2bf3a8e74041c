use crate::output::domain::lyrics_writer::LyricsWriter;
use crate::output::domain::output_format::OutputFormat;
use crate::output::domain::timestamp::format_lrc_time;
use crate::sync::domain::synced_segment::SyncedLyricSegment;

pub const LRC_ARTIST_TAG: &str = "Generated by karaoke-sync";
pub const LRC_TITLE_TAG: &str = "Synchronized Lyrics";
pub const LRC_CREATOR_TAG: &str = "karaoke-sync";

/// Writes line-synchronized LRC: ID tags, a blank line, then one
/// `[MM:SS.cc]text` line per segment keyed on its start time.
pub struct LrcWriter {
    title: String,
}

impl LrcWriter {
    pub fn new() -> Self {
        Self {
            title: LRC_TITLE_TAG.to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl Default for LrcWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl LyricsWriter for LrcWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Lrc
    }

    fn render(&self, segments: &[SyncedLyricSegment]) -> Result<String, Box<dyn std::error::Error>> {
        let mut out = String::new();
        out.push_str(&format!("[ar:{LRC_ARTIST_TAG}]\n"));
        out.push_str(&format!("[ti:{}]\n", self.title));
        out.push_str(&format!("[by:{LRC_CREATOR_TAG}]\n\n"));
        for segment in segments {
            out.push_str(&format!(
                "[{}]{}\n",
                format_lrc_time(segment.start_time()),
                segment.text()
            ));
        }
        Ok(out)
    }
}
