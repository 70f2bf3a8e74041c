use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::lyrics::domain::lyrics_reader::{LyricsError, LyricsReader};

static LRC_TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+:\d+(?:[.:]\d+)?\]").expect("valid LRC timestamp regex"));

/// ID tags such as `[ar:Artist]` or `[offset:+200]` occupy a whole line.
static LRC_ID_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[A-Za-z#]+:[^\]]*\]$").expect("valid LRC tag regex"));

/// Source format of a lyrics file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricsFormat {
    Plain,
    Lrc,
    Srt,
}

impl LyricsFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref()
        {
            Some("lrc") => LyricsFormat::Lrc,
            Some("srt") => LyricsFormat::Srt,
            _ => LyricsFormat::Plain,
        }
    }

    pub fn parse(self, content: &str) -> Vec<String> {
        match self {
            LyricsFormat::Plain => parse_plain(content),
            LyricsFormat::Lrc => parse_lrc(content),
            LyricsFormat::Srt => parse_srt(content),
        }
    }
}

/// Reads reference lyrics from plain text, LRC, or SRT files.
pub struct LyricsFileReader;

impl LyricsFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LyricsFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LyricsReader for LyricsFileReader {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>, LyricsError> {
        if !path.exists() {
            return Err(LyricsError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|e| LyricsError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let content = content.trim_start_matches('\u{feff}');

        let lines = LyricsFormat::from_path(path).parse(content);
        if lines.is_empty() {
            return Err(LyricsError::Empty(path.to_path_buf()));
        }
        log::debug!("Loaded {} lyric lines from {}", lines.len(), path.display());
        Ok(lines)
    }
}

pub fn parse_plain(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_lrc(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !LRC_ID_TAG.is_match(line))
        .map(|line| LRC_TIMESTAMP.replace_all(line, "").trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

pub fn parse_srt(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty() && !line.chars().all(|c| c.is_ascii_digit()) && !line.contains("-->")
        })
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::txt("song.txt", LyricsFormat::Plain)]
    #[case::lrc("song.lrc", LyricsFormat::Lrc)]
    #[case::lrc_upper("SONG.LRC", LyricsFormat::Lrc)]
    #[case::srt("song.srt", LyricsFormat::Srt)]
    #[case::no_extension("lyrics", LyricsFormat::Plain)]
    fn test_format_from_path(#[case] path: &str, #[case] expected: LyricsFormat) {
        assert_eq!(LyricsFormat::from_path(Path::new(path)), expected);
    }

    #[test]
    fn test_parse_plain_skips_blank_lines_and_trims() {
        let lines = parse_plain("  first line \n\n\r\nsecond line\r\n   \n");
        assert_eq!(lines, vec!["first line", "second line"]);
    }

    #[test]
    fn test_parse_lrc_strips_timestamps() {
        let content = "[00:12.34]Hello world\n[00:15.00] Goodbye now \n";
        assert_eq!(parse_lrc(content), vec!["Hello world", "Goodbye now"]);
    }

    #[test]
    fn test_parse_lrc_skips_id_tags_and_empty_timestamps() {
        let content = "[ar:Someone]\n[ti:Song]\n\n[00:01.00]\n[00:02.00]Line one\n";
        assert_eq!(parse_lrc(content), vec!["Line one"]);
    }

    #[test]
    fn test_parse_lrc_repeated_timestamps_on_one_line() {
        let content = "[00:10.00][01:10.00]Chorus line";
        assert_eq!(parse_lrc(content), vec!["Chorus line"]);
    }

    #[test]
    fn test_parse_srt_extracts_text_only() {
        let content = "1\n00:00:01,000 --> 00:00:02,500\nHello world\n\n\
                       2\n00:00:03,000 --> 00:00:04,000\nSecond cue\nwraps here\n\n";
        assert_eq!(
            parse_srt(content),
            vec!["Hello world", "Second cue", "wraps here"]
        );
    }

    #[test]
    fn test_read_lines_missing_file() {
        let reader = LyricsFileReader::new();
        let result = reader.read_lines(Path::new("/nonexistent/lyrics.txt"));
        assert!(matches!(result, Err(LyricsError::NotFound(_))));
    }

    #[test]
    fn test_read_lines_from_lrc_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.lrc");
        fs::write(&path, "\u{feff}[ar:Artist]\n[00:01.00]One\n[00:02.00]Two\n").unwrap();

        let lines = LyricsFileReader::new().read_lines(&path).unwrap();
        assert_eq!(lines, vec!["One", "Two"]);
    }

    #[test]
    fn test_read_lines_empty_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "\n\n  \n").unwrap();

        let result = LyricsFileReader::new().read_lines(&path);
        assert!(matches!(result, Err(LyricsError::Empty(_))));
    }
}
