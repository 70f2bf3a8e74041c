pub mod lyrics_writer;
pub mod output_format;
pub mod timestamp;
