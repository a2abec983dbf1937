//! Template compiler.
//!
//! Walks the nested block tree from [`crate::parser`] and resolves each
//! block's leading text into one of the five directive kinds by its
//! first character, producing the typed [`Node`] tree. Text leaves
//! become [`Node::Literal`]s; the elements of every block compile in
//! order into a [`Node::Sequence`]'s children.
//!
//! A block whose first character is not a recognized operator is a
//! compile error. Lenient compilation recovers by emitting an inline
//! error marker literal in the malformed block's place and continuing
//! with its siblings; strict compilation aborts.

use tracing::{trace, warn};

use crate::Strictness;
use crate::ast::Node;
use crate::error::{CompileError, inline_marker};
use crate::parser::{Block, Element};

/// Configuration for template compilation.
///
/// Create with [`CompileOptions::new()`] and chain builder methods:
///
/// ```rust
/// use curly::{CompileOptions, Strictness};
///
/// let opts = CompileOptions::new()
///     .strictness(Strictness::Strict)
///     .max_depth(16);
/// ```
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Whether malformed directives abort compilation or become inline
    /// error markers.
    pub strictness: Strictness,
    /// Maximum brace nesting depth, enforced during parsing.
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            strictness: Strictness::Lenient,
            max_depth: 64,
        }
    }
}

impl CompileOptions {
    /// Create options with the defaults: lenient, nesting depth 64.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the strictness mode.
    pub fn strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Set the maximum brace nesting depth.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Compile a block tree into the root [`Node::Sequence`].
pub(crate) fn compile_block(
    block: &Block<'_>,
    options: &CompileOptions,
) -> Result<Node, CompileError> {
    Ok(Node::Sequence(compile_elements(&block.elements, options)?))
}

fn compile_elements(
    elements: &[Element<'_>],
    options: &CompileOptions,
) -> Result<Vec<Node>, CompileError> {
    let mut nodes = Vec::with_capacity(elements.len());
    for element in elements {
        match element {
            Element::Text { text, .. } => nodes.push(Node::Literal((*text).to_string())),
            Element::Block(block) => nodes.push(compile_directive(block, options)?),
        }
    }
    Ok(nodes)
}

fn compile_directive(block: &Block<'_>, options: &CompileOptions) -> Result<Node, CompileError> {
    // The directive line is always the first thing inside a brace pair.
    let (head, head_offset) = match block.elements.first() {
        Some(Element::Text { text, offset }) => (*text, *offset),
        Some(Element::Block(_)) => return unrecognized("{", block.offset, options),
        None => return unrecognized("", block.offset, options),
    };

    let (first, tail) = split_directive(head);
    let Some(operator) = first.chars().next() else {
        return unrecognized(first, head_offset, options);
    };
    let name = &first[operator.len_utf8()..];
    trace!(%operator, %name, "compiling directive");

    match operator {
        '?' | '!' => Ok(Node::Conditional {
            name: name.to_string(),
            inverted: operator == '!',
            children: compile_body(block, tail, options)?,
        }),
        '#' => Ok(Node::Repetition {
            name: name.to_string(),
            children: compile_body(block, tail, options)?,
        }),
        '/' => Ok(Node::Separator(compile_body(block, tail, options)?)),
        '=' => {
            // The directive leaf is dropped entirely; anything else in
            // the block compiles into children that are never rendered.
            let children = compile_elements(&block.elements[1..], options)?;
            if !tail.is_empty() || !children.is_empty() {
                warn!(%name, "content inside a substitution block is never rendered");
            }
            Ok(Node::Substitution {
                name: name.to_string(),
                children,
            })
        }
        _ => unrecognized(first, head_offset, options),
    }
}

/// Compile a directive block's body: the directive leaf is replaced by
/// a literal holding the leftover text of its line, and the whole block
/// compiles into the node's children.
fn compile_body(
    block: &Block<'_>,
    tail: &str,
    options: &CompileOptions,
) -> Result<Vec<Node>, CompileError> {
    let mut children = vec![Node::Literal(tail.to_string())];
    children.extend(compile_elements(&block.elements[1..], options)?);
    Ok(children)
}

fn unrecognized(
    found: &str,
    offset: usize,
    options: &CompileOptions,
) -> Result<Node, CompileError> {
    let err = CompileError::UnrecognizedDirective {
        found: found.to_string(),
        offset,
    };
    match options.strictness {
        Strictness::Strict => Err(err),
        Strictness::Lenient => Ok(Node::Literal(inline_marker(&err))),
    }
}

/// Split a directive line at its first whitespace character into the
/// operator-plus-name word and the rest of the line. Exactly one
/// whitespace character is consumed; any further whitespace is part of
/// the body.
fn split_directive(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(at) => {
            let ws = text[at..].chars().next().map_or(0, char::len_utf8);
            (&text[..at], &text[at + ws..])
        }
        None => (text, ""),
    }
}
