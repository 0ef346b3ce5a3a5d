use std::fmt;
use std::ops::Range;
use thiserror::Error;
use vec1::Vec1;

/// Where in the notation something went wrong.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePosition {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    pub slice: String,
}

impl SourcePosition {
    pub(crate) fn new(src: &str, span: Range<usize>) -> Self {
        let offset = span.start.min(src.len());
        let before = &src[..offset];
        let line = before.matches('\n').count() + 1;
        let column = offset - before.rfind('\n').map_or(0, |i| i + 1) + 1;
        Self {
            offset,
            line,
            column,
            slice: src[span.start.min(src.len())..span.end.min(src.len())].to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error(
    "syntax error at line {}, column {} (offset {}): found {}, expected {}",
    .pos.line,
    .pos.column,
    .pos.offset,
    found_desc(&.pos.slice),
    .expected.fmt_expected()
)]
pub struct SyntaxError {
    pub pos: SourcePosition,
    pub expected: Vec1<String>,
}

fn found_desc(slice: &str) -> String {
    if slice.is_empty() {
        "end of input".to_string()
    } else {
        format!("{:?}", slice)
    }
}

trait FormatExpected {
    fn fmt_expected(&self) -> String;
}

impl FormatExpected for [String] {
    fn fmt_expected(&self) -> String {
        match self {
            [] => unreachable!("expected set cannot be empty"),
            [a] => a.to_owned(),
            [a, b] => format!("{} or {}", a, b),
            s => format!("{}, or {}", s[..s.len() - 1].join(", "), &s[s.len() - 1]),
        }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vec1::vec1;

    #[test]
    fn test_position_line_column() {
        let pos = SourcePosition::new("1d6 +\nbad", 6..9);
        assert_eq!(pos.offset, 6);
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 1);
        assert_eq!(pos.slice, "bad");
    }

    #[test]
    fn test_error_message() {
        let err = SyntaxError {
            pos: SourcePosition::new("4d6q", 3..4),
            expected: vec1!["a modifier".to_string(), "an operator".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("line 1, column 4"));
        assert!(msg.contains("\"q\""));
        assert!(msg.contains("a modifier or an operator"));
    }
}
