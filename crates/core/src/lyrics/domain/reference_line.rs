use super::text_normalizer::normalize;

/// One line of intended lyrics, independent of the audio.
///
/// The normalized form is computed once at construction and cached, so the
/// matcher never re-normalizes the reference side.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceLine {
    index: usize,
    text: String,
    normalized: String,
}

impl ReferenceLine {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        let normalized = normalize(&text);
        Self {
            index,
            text,
            normalized,
        }
    }

    /// Builds reference lines from raw strings, numbering them in order.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Vec<ReferenceLine> {
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| ReferenceLine::new(i, line.as_ref()))
            .collect()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}
