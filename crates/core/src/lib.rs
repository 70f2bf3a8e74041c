//! Aligns reference lyrics to a time-stamped transcription of a song and
//! writes karaoke-ready LRC, SRT and JSON files.

pub mod audio;
pub mod lyrics;
pub mod output;
pub mod pipeline;
pub mod shared;
pub mod sync;
pub mod transcription;

pub use sync::domain::lyrics_aligner::synchronize;
pub use sync::domain::synced_segment::SyncedLyricSegment;
pub use transcription::domain::transcribed_segment::{TranscribedSegment, WordTiming};
