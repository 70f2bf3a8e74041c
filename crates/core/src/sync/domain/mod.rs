pub mod alignment_summary;
pub mod consumption_set;
pub mod lyrics_aligner;
pub mod segment_matcher;
pub mod similarity;
pub mod synced_segment;
pub mod timing_synthesizer;
