use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LyricsError {
    #[error("lyrics file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read lyrics from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no lyric lines found in {0}")]
    Empty(PathBuf),
}

/// Domain interface for loading reference lyrics.
///
/// Implementations return the raw lines in order, already stripped of any
/// timestamps or cue numbers the source format carries.
pub trait LyricsReader: Send {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, LyricsError>;
}
