use crate::output::domain::lyrics_writer::LyricsWriter;
use crate::output::domain::output_format::OutputFormat;
use crate::output::domain::timestamp::format_srt_time;
use crate::sync::domain::synced_segment::SyncedLyricSegment;

/// Writes SubRip cues numbered from 1.
pub struct SrtWriter;

impl SrtWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SrtWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl LyricsWriter for SrtWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Srt
    }

    fn render(&self, segments: &[SyncedLyricSegment]) -> Result<String, Box<dyn std::error::Error>> {
        Ok(render_cues(
            segments
                .iter()
                .map(|s| (s.start_time(), s.end_time(), s.text())),
        ))
    }
}

/// Renders `(start, end, text)` triples as numbered SubRip cues.
pub fn render_cues<'a>(cues: impl IntoIterator<Item = (f64, f64, &'a str)>) -> String {
    let mut out = String::new();
    for (i, (start, end, text)) in cues.into_iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            format_srt_time(start),
            format_srt_time(end),
            text.trim()
        ));
    }
    out
}
