use crate::{OneIndexed, SourceLocation};

/// Index of the start offset of every line in a source file.
///
/// Lines are terminated by `\n`, `\r`, or `\r\n`. The index stores byte
/// offsets; columns are computed in characters so that they match what an
/// editor displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn from_source_text(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = Vec::with_capacity(text.len() / 32 + 1);
        line_starts.push(0);

        let mut offset = 0;
        while let Some(position) = memchr::memchr2(b'\n', b'\r', &bytes[offset..]) {
            let eol = offset + position;
            let next = if bytes[eol] == b'\r' && bytes.get(eol + 1) == Some(&b'\n') {
                eol + 2
            } else {
                eol + 1
            };
            line_starts.push(u32::try_from(next).expect("file larger than 4GiB"));
            offset = next;
        }

        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// The one-indexed line containing `offset`.
    pub fn line_of(&self, offset: u32) -> OneIndexed {
        match self.line_starts.binary_search(&offset) {
            Ok(index) => OneIndexed::from_zero_indexed(index),
            Err(next) => OneIndexed::from_zero_indexed(next - 1),
        }
    }

    /// The byte offset at which `line` starts.
    pub fn line_start(&self, line: OneIndexed) -> u32 {
        self.line_starts[line.to_zero_indexed()]
    }

    /// Convert a byte offset into a one-indexed `(line, column)` pair.
    ///
    /// The column counts characters, not bytes, so multi-byte characters
    /// occupy a single column.
    pub fn source_location(&self, offset: u32, text: &str) -> SourceLocation {
        let row = self.line_of(offset);
        let start = self.line_start(row) as usize;
        let column = text[start..(offset as usize).min(text.len())].chars().count();
        SourceLocation {
            row,
            column: OneIndexed::from_zero_indexed(column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LineIndex;
    use crate::OneIndexed;

    #[test]
    fn empty_source() {
        let index = LineIndex::from_source_text("");
        assert_eq!(index.line_count(), 1);
        let location = index.source_location(0, "");
        assert_eq!(location.row, OneIndexed::MIN);
        assert_eq!(location.column, OneIndexed::MIN);
    }

    #[test]
    fn line_and_column() {
        let text = "let x = 1\nlet y = 2\n";
        let index = LineIndex::from_source_text(text);
        assert_eq!(index.line_count(), 3);

        let location = index.source_location(14, text);
        assert_eq!(location.row.get(), 2);
        assert_eq!(location.column.get(), 5);
    }

    #[test]
    fn carriage_return_line_feed() {
        let text = "a\r\nb\rc\n";
        let index = LineIndex::from_source_text(text);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_of(3).get(), 2);
        assert_eq!(index.line_of(5).get(), 3);
    }

    #[test]
    fn multi_byte_characters() {
        let text = "let \u{4e9c} = 1\n";
        let index = LineIndex::from_source_text(text);
        let offset = u32::try_from(text.find('=').unwrap()).unwrap();
        let location = index.source_location(offset, text);
        assert_eq!(location.column.get(), 7);
    }
}
