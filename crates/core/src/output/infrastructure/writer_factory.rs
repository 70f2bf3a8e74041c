use crate::output::domain::lyrics_writer::LyricsWriter;
use crate::output::domain::output_format::OutputFormat;

use super::json_writer::JsonWriter;
use super::lrc_writer::LrcWriter;
use super::srt_writer::SrtWriter;

pub fn create_writer(format: OutputFormat) -> Box<dyn LyricsWriter> {
    match format {
        OutputFormat::Lrc => Box::new(LrcWriter::new()),
        OutputFormat::Srt => Box::new(SrtWriter::new()),
        OutputFormat::Json => Box::new(JsonWriter::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_returns_matching_format() {
        for format in OutputFormat::ALL {
            assert_eq!(create_writer(*format).format(), *format);
        }
    }
}
