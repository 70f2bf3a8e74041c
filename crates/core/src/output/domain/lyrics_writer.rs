use std::fs;
use std::path::Path;

use crate::sync::domain::synced_segment::SyncedLyricSegment;

use super::output_format::OutputFormat;

/// Domain interface for serializing synchronized lyrics.
pub trait LyricsWriter: Send {
    fn format(&self) -> OutputFormat;

    /// Render the full file contents.
    fn render(&self, segments: &[SyncedLyricSegment]) -> Result<String, Box<dyn std::error::Error>>;

    fn write(
        &self,
        path: &Path,
        segments: &[SyncedLyricSegment],
    ) -> Result<(), Box<dyn std::error::Error>> {
        let contents = self.render(segments)?;
        fs::write(path, contents)
            .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
        Ok(())
    }
}
