//! Template parser.
//!
//! Consumes the token stream from [`crate::lexer`] and builds a nested
//! block tree: leaves are text tokens, internal nodes are the contents
//! of matched `{ }` pairs. The tree is transient — the compiler turns it
//! into the typed [`Node`](crate::ast::Node) tree and the blocks are
//! discarded.
//!
//! A `}` with nothing open is always a hard error, regardless of the
//! strictness mode. End-of-input with blocks still open closes them
//! silently; templates whose final directive omits its closing brace
//! are accepted.

use crate::error::CompileError;
use crate::lexer::Token;

/// One element of a block: a text leaf or a nested block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Element<'a> {
    Text { text: &'a str, offset: usize },
    Block(Block<'a>),
}

/// The contents between one matched `{ }` pair (or, for the root, the
/// whole template).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block<'a> {
    pub elements: Vec<Element<'a>>,
    /// Byte offset of the opening brace; 0 for the root block.
    pub offset: usize,
}

/// Build the root block from a token stream.
///
/// `max_depth` bounds brace nesting so that pathological input cannot
/// grow the stack without limit; parsing and compilation both recurse
/// per nesting level.
pub(crate) fn parse<'a>(
    tokens: &[Token<'a>],
    max_depth: usize,
) -> Result<Block<'a>, CompileError> {
    let mut iter = tokens.iter();
    parse_block(&mut iter, 0, 0, max_depth)
}

fn parse_block<'a>(
    iter: &mut std::slice::Iter<'_, Token<'a>>,
    offset: usize,
    depth: usize,
    max_depth: usize,
) -> Result<Block<'a>, CompileError> {
    if depth > max_depth {
        return Err(CompileError::TooDeeplyNested { limit: max_depth });
    }

    let mut elements = Vec::new();
    while let Some(token) = iter.next() {
        match *token {
            Token::OpenBrace { offset } => {
                let inner = parse_block(iter, offset, depth + 1, max_depth)?;
                elements.push(Element::Block(inner));
            }
            Token::CloseBrace {
                offset: close_offset,
            } => {
                if depth == 0 {
                    return Err(CompileError::UnbalancedCloseBrace {
                        offset: close_offset,
                    });
                }
                return Ok(Block { elements, offset });
            }
            Token::Text { text, offset } => {
                elements.push(Element::Text { text, offset });
            }
        }
    }

    // End of input with this block still open: treat it as closed.
    Ok(Block { elements, offset })
}
