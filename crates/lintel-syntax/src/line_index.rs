use serde::{Deserialize, Serialize};

/// A 1-based line and 1-based column (counted in characters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
}

impl LineCol {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Positions of line starts, used to turn byte offsets into line/column.
///
/// Only `\n` starts a new line, so `\r\n` endings count once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = Vec::with_capacity(text.len() / 32 + 1);
        line_starts.push(0);
        line_starts.extend(memchr::memchr_iter(b'\n', text.as_bytes()).map(|pos| pos + 1));
        Self { line_starts, len: text.len() }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-based line containing `offset`. Offsets past the end map to the
    /// last line.
    pub fn line(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset.min(self.len))
    }

    /// Byte offset of the first character of a 1-based line.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        line.checked_sub(1).and_then(|i| self.line_starts.get(i)).copied()
    }

    pub fn line_col(&self, text: &str, offset: usize) -> LineCol {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = self.line(offset);
        let start = self.line_starts[line - 1];
        let column = text[start..offset].chars().count() + 1;
        LineCol { line, column }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let text = "a = 1;\nb = 2;\n\nc";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_col(text, 0), LineCol::new(1, 1));
        assert_eq!(index.line_col(text, 4), LineCol::new(1, 5));
        assert_eq!(index.line_col(text, 7), LineCol::new(2, 1));
        assert_eq!(index.line_col(text, 14), LineCol::new(3, 1));
        assert_eq!(index.line_col(text, 15), LineCol::new(4, 1));
        assert_eq!(index.line_start(2), Some(7));
        assert_eq!(index.line_start(0), None);
    }

    #[test]
    fn test_columns_count_characters() {
        let text = "s = 'é'; x";
        let index = LineIndex::new(text);
        // `é` takes two bytes: `x` is at byte 10 but is the tenth character.
        assert_eq!(index.line_col(text, 10), LineCol::new(1, 10));
    }

    #[test]
    fn test_crlf() {
        let text = "a\r\nb";
        let index = LineIndex::new(text);
        assert_eq!(index.line_col(text, 3), LineCol::new(2, 1));
    }
}
