//! Human-readable resolved source locations.

use std::fmt;
use std::path::PathBuf;

/// A span resolved to 1-indexed line/column coordinates for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSpan {
    /// Path of the file containing the span.
    pub file_path: PathBuf,
    /// 1-indexed line of the span start.
    pub start_line: u32,
    /// 1-indexed column of the span start.
    pub start_col: u32,
    /// 1-indexed line of the span end.
    pub end_line: u32,
    /// 1-indexed column of the span end.
    pub end_col: u32,
}

impl fmt::Display for ResolvedSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file_path.display(),
            self.start_line,
            self.start_col
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let r = ResolvedSpan {
            file_path: PathBuf::from("cpu.gl"),
            start_line: 12,
            start_col: 3,
            end_line: 12,
            end_col: 9,
        };
        assert_eq!(format!("{r}"), "cpu.gl:12:3");
    }
}
