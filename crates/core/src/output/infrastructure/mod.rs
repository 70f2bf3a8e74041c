pub mod json_writer;
pub mod lrc_writer;
pub mod srt_writer;
pub mod writer_factory;
