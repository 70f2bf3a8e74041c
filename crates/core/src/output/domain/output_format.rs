use std::fmt;

use serde::{Deserialize, Serialize};

/// Supported synchronized-lyrics file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Lrc,
    Srt,
    Json,
}

impl OutputFormat {
    pub const ALL: &[OutputFormat] = &[OutputFormat::Lrc, OutputFormat::Srt, OutputFormat::Json];

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Lrc => "lrc",
            OutputFormat::Srt => "srt",
            OutputFormat::Json => "json",
        }
    }

    /// Case-insensitive lookup by name, e.g. `"LRC"` or `"json"`.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL.iter().copied().find(|f| f.extension() == name)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension().to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("lrc", Some(OutputFormat::Lrc))]
    #[case("SRT", Some(OutputFormat::Srt))]
    #[case(" json ", Some(OutputFormat::Json))]
    #[case("txt", None)]
    fn test_parse(#[case] name: &str, #[case] expected: Option<OutputFormat>) {
        assert_eq!(OutputFormat::parse(name), expected);
    }

    #[test]
    fn test_display_is_uppercase() {
        assert_eq!(OutputFormat::Lrc.to_string(), "LRC");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&OutputFormat::Srt).unwrap();
        assert_eq!(json, "\"srt\"");
    }
}
