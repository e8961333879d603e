//! Splitting raw OCR text into ordered, trimmed lines.

/// A non-empty, trimmed line of card text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Position among the non-empty lines (order of appearance on the card).
    pub index: usize,
    /// Trimmed text.
    pub text: &'a str,
}

impl Line<'_> {
    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split text on `\n`, `\r\n` or `\r`, trim each line and drop empty ones.
pub fn split_lines(text: &str) -> Vec<Line<'_>> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .enumerate()
        .map(|(index, text)| Line { index, text })
        .collect()
}
