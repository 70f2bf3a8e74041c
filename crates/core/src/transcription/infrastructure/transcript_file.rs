use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transcription::domain::transcribed_segment::{is_chronological, TranscribedSegment};

#[derive(Error, Debug)]
pub enum TranscriptFileError {
    #[error("transcript file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to access transcript {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid transcript JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("segment {index} in {path} has invalid times: start {start}, end {end}")]
    InvalidSegment {
        path: PathBuf,
        index: usize,
        start: f64,
        end: f64,
    },
}

/// A saved transcription, so a song can be re-synchronized without running
/// the speech model again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub segments: Vec<TranscribedSegment>,
}

/// Accepts either the full document or a bare segment array.
#[derive(Deserialize)]
#[serde(untagged)]
enum TranscriptShape {
    Document(TranscriptDocument),
    Segments(Vec<TranscribedSegment>),
}

pub fn read_transcript(path: &Path) -> Result<TranscriptDocument, TranscriptFileError> {
    if !path.exists() {
        return Err(TranscriptFileError::NotFound(path.to_path_buf()));
    }
    let json = fs::read_to_string(path).map_err(|e| TranscriptFileError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let shape: TranscriptShape =
        serde_json::from_str(&json).map_err(|e| TranscriptFileError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut document = match shape {
        TranscriptShape::Document(doc) => doc,
        TranscriptShape::Segments(segments) => TranscriptDocument {
            language: None,
            segments,
        },
    };

    if let Some((index, segment)) = document
        .segments
        .iter()
        .enumerate()
        .find(|(_, s)| !s.start.is_finite() || !s.end.is_finite() || s.start > s.end)
    {
        return Err(TranscriptFileError::InvalidSegment {
            path: path.to_path_buf(),
            index,
            start: segment.start,
            end: segment.end,
        });
    }

    if !is_chronological(&document.segments) {
        log::warn!(
            "Transcript {} is not in chronological order; sorting by start time",
            path.display()
        );
        document
            .segments
            .sort_by(|a, b| a.start.total_cmp(&b.start));
    }
    Ok(document)
}

pub fn write_transcript(
    path: &Path,
    document: &TranscriptDocument,
) -> Result<(), TranscriptFileError> {
    let json =
        serde_json::to_string_pretty(document).map_err(|e| TranscriptFileError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
    fs::write(path, json).map_err(|e| TranscriptFileError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
