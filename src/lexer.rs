//! Template lexer.
//!
//! Splits source text into a flat token stream of three kinds: an open
//! brace, a close brace, or a run of brace-free text. `{` and `}` are
//! always token boundaries; everything between them coalesces into one
//! [`Token::Text`]. The lexer never fails.
//!
//! There is no escape mechanism: a literal brace character cannot appear
//! in template output. This is a known limitation of the source format,
//! not something the lexer works around.

/// One lexed token. Borrows from the source text; byte offsets are kept
/// for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    OpenBrace { offset: usize },
    CloseBrace { offset: usize },
    Text { text: &'a str, offset: usize },
}

/// Split source text into tokens.
pub(crate) fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut run_start = 0;

    for (offset, ch) in source.char_indices() {
        if ch != '{' && ch != '}' {
            continue;
        }
        if run_start < offset {
            tokens.push(Token::Text {
                text: &source[run_start..offset],
                offset: run_start,
            });
        }
        tokens.push(if ch == '{' {
            Token::OpenBrace { offset }
        } else {
            Token::CloseBrace { offset }
        });
        run_start = offset + 1;
    }

    if run_start < source.len() {
        tokens.push(Token::Text {
            text: &source[run_start..],
            offset: run_start,
        });
    }

    tokens
}
