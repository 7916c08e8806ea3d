//! Line tokenizer for the directive-oriented macro language.
//!
//! The language is line-oriented: every construct fits on one line. Tokens
//! are runs of non-separator characters; whitespace, commas, and parentheses
//! all separate, so `And2(a, b, q)` and `And2 a b q` tokenize identically.

use gatling_source::{FileId, Span};

/// A single token with its source location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    /// The token text.
    pub text: &'a str,
    /// Byte range of the token in its file.
    pub span: Span,
}

/// One source line split into tokens.
#[derive(Clone, Debug)]
pub struct Line<'a> {
    /// 1-based line number.
    pub number: u32,
    /// Byte range of the whole line (without the newline).
    pub span: Span,
    /// Tokens on the line, left to right. Empty for blank lines.
    pub tokens: Vec<Token<'a>>,
}

impl Line<'_> {
    /// Returns `true` if the line has no tokens.
    pub fn is_blank(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Returns `true` for characters that separate tokens.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ',' || c == '(' || c == ')'
}

/// Splits source text into lines of tokens with byte-accurate spans.
///
/// A trailing newline does not produce a phantom empty line, so the result
/// has exactly one entry per source line.
pub fn tokenize(source: &str, file: FileId) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut line_start = 0usize;
    let mut number = 1u32;

    let body = source.strip_suffix('\n').unwrap_or(source);
    for raw_line in body.split('\n') {
        let line_end = line_start + raw_line.len();
        let mut tokens = Vec::new();
        let mut token_start: Option<usize> = None;

        for (i, c) in raw_line.char_indices() {
            if is_separator(c) {
                if let Some(start) = token_start.take() {
                    tokens.push(Token {
                        text: &raw_line[start..i],
                        span: Span::new(
                            file,
                            (line_start + start) as u32,
                            (line_start + i) as u32,
                        ),
                    });
                }
            } else if token_start.is_none() {
                token_start = Some(i);
            }
        }
        if let Some(start) = token_start {
            tokens.push(Token {
                text: &raw_line[start..],
                span: Span::new(
                    file,
                    (line_start + start) as u32,
                    line_end as u32,
                ),
            });
        }

        lines.push(Line {
            number,
            span: Span::new(file, line_start as u32, line_end as u32),
            tokens,
        });

        line_start = line_end + 1;
        number += 1;
    }

    lines
}
