use super::Span;

/// Source text of one compilation unit with a line index
#[derive(Debug, Clone)]
pub struct SourceText {
    text: String,
    line_starts: Vec<usize>,
}

impl SourceText {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, line_starts }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text covered by `span`, or `None` when the span is not a valid range
    pub fn slice(&self, span: Span) -> Option<&str> {
        if span.start > span.end {
            return None;
        }
        self.text.get(span.start..span.end)
    }

    /// 1-based line and column of a byte offset
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let column = offset - self.line_starts[line] + 1;
        (line + 1, column)
    }

    /// Whitespace between the start of the line and `offset`, if nothing else precedes it
    pub fn indentation(&self, offset: usize) -> Option<&str> {
        if offset > self.text.len() {
            return None;
        }
        let (line, _) = self.line_col(offset);
        let prefix = self.text.get(self.line_starts[line - 1]..offset)?;
        prefix
            .chars()
            .all(|c| c == ' ' || c == '\t')
            .then_some(prefix)
    }

    /// Widen a statement span so that deleting it leaves no blank line behind
    ///
    /// When the statement is the only thing on its line(s) the span grows to
    /// cover the leading indentation and the trailing line break. Otherwise
    /// trailing horizontal whitespace is absorbed so `a(); b();` becomes
    /// `a();` rather than `a(); `.
    pub fn removal_span(&self, span: Span) -> Span {
        let bytes = self.text.as_bytes();
        if span.end > bytes.len() || span.start > span.end {
            return span;
        }

        let mut start = span.start;
        while start > 0 && matches!(bytes[start - 1], b' ' | b'\t') {
            start -= 1;
        }
        let at_line_start = start == 0 || bytes[start - 1] == b'\n';

        let mut end = span.end;
        while end < bytes.len() && matches!(bytes[end], b' ' | b'\t' | b'\r') {
            end += 1;
        }
        let at_line_end = end == bytes.len() || bytes[end] == b'\n';

        if at_line_start && at_line_end {
            if end < bytes.len() {
                end += 1;
            }
            Span::new(start, end)
        } else if at_line_end {
            Span::new(start, span.end)
        } else {
            Span::new(span.start, end)
        }
    }
}
