pub mod lyrics_reader;
pub mod reference_line;
pub mod text_normalizer;
