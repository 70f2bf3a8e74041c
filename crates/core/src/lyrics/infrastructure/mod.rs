pub mod lyrics_file_reader;
