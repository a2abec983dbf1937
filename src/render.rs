//! Template renderer.
//!
//! Walks the compiled [`Node`] tree against a context [`Value`] and
//! produces the output string. The walk is a pure function of the tree,
//! the context, and one piece of threaded state: the last-in-iteration
//! flag, set by repetitions and consumed by separators. Nothing is
//! mutated and nothing is cached, so one compiled template can be
//! rendered from many threads at once.
//!
//! Variable lookup is a two-case capability check resolved once per
//! lookup: maps resolve by key; records, which have no key lookup, fall
//! back to attribute-style field lookup. Anything else supports neither
//! and cannot resolve names at all.

use tracing::trace;

use crate::Strictness;
use crate::ast::{Node, Value};
use crate::error::{DirectiveKind, RenderError, inline_marker};

/// Configuration for template rendering.
///
/// ```rust
/// use curly::{RenderOptions, Strictness};
///
/// let opts = RenderOptions::new().strictness(Strictness::Strict);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Whether unresolvable variables abort rendering or become inline
    /// error markers.
    pub strictness: Strictness,
}

impl RenderOptions {
    /// Create options with the default: lenient.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the strictness mode.
    pub fn strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }
}

/// The outcome of looking up a name on a context value.
enum Resolution {
    Found(Value),
    /// The context supports lookup but has no entry for the name.
    Absent,
    /// The context value supports neither key-based nor attribute-style
    /// lookup (a scalar, a list, or null).
    Unsupported,
}

/// Resolve a name against a context value: key-based lookup where the
/// value supports it, attribute-style field lookup as the fallback.
fn resolve(context: &Value, name: &str) -> Resolution {
    match context {
        Value::Map(entries) => match entries.get(name) {
            Some(value) => Resolution::Found(value.clone()),
            None => Resolution::Absent,
        },
        Value::Record(fields) => match fields.field(name) {
            Some(value) => Resolution::Found(value),
            None => Resolution::Absent,
        },
        _ => Resolution::Unsupported,
    }
}

pub(crate) struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub(crate) fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render the root node. The last-in-iteration flag starts out false;
    /// only a repetition sets it.
    pub(crate) fn render_root(
        &self,
        root: &Node,
        context: &Value,
    ) -> Result<String, RenderError> {
        let mut output = String::new();
        self.render_node(root, context, false, &mut output)?;
        Ok(output)
    }

    fn render_node(
        &self,
        node: &Node,
        context: &Value,
        last: bool,
        output: &mut String,
    ) -> Result<(), RenderError> {
        match node {
            Node::Literal(text) => {
                output.push_str(text);
                Ok(())
            }
            Node::Sequence(children) => self.render_children(children, context, last, output),
            Node::Substitution { name, .. } => self.render_substitution(name, context, output),
            Node::Conditional {
                name,
                inverted,
                children,
            } => {
                let truthy = match resolve(context, name) {
                    Resolution::Found(value) => value.is_truthy(),
                    // A missing condition counts as false, never an error.
                    Resolution::Absent | Resolution::Unsupported => false,
                };
                if truthy != *inverted {
                    self.render_children(children, context, last, output)?;
                }
                Ok(())
            }
            Node::Repetition { name, children } => {
                self.render_repetition(name, children, context, output)
            }
            Node::Separator(children) => {
                if last {
                    return Ok(());
                }
                self.render_children(children, context, last, output)
            }
        }
    }

    fn render_children(
        &self,
        children: &[Node],
        context: &Value,
        last: bool,
        output: &mut String,
    ) -> Result<(), RenderError> {
        for child in children {
            self.render_node(child, context, last, output)?;
        }
        Ok(())
    }

    fn render_substitution(
        &self,
        name: &str,
        context: &Value,
        output: &mut String,
    ) -> Result<(), RenderError> {
        let value = match resolve(context, name) {
            Resolution::Found(value) => value,
            Resolution::Absent | Resolution::Unsupported => {
                return self.unknown_variable(DirectiveKind::Substitution, name, output);
            }
        };
        match value.scalar_text() {
            Some(text) => {
                output.push_str(&text);
                Ok(())
            }
            // Lists, maps, and records are not string-like; fatal in
            // both modes.
            None => Err(RenderError::WrongShape {
                directive: DirectiveKind::Substitution,
                name: name.to_string(),
                expected: "a string-like value",
                actual: value.type_name(),
            }),
        }
    }

    fn render_repetition(
        &self,
        name: &str,
        children: &[Node],
        context: &Value,
        output: &mut String,
    ) -> Result<(), RenderError> {
        let value = match resolve(context, name) {
            Resolution::Found(value) => value,
            // A missing repetition variable is a lookup failure, not an
            // empty sequence.
            Resolution::Absent | Resolution::Unsupported => {
                return self.unknown_variable(DirectiveKind::Repetition, name, output);
            }
        };
        let Some(items) = value.as_list() else {
            return Err(RenderError::WrongShape {
                directive: DirectiveKind::Repetition,
                name: name.to_string(),
                expected: "a list",
                actual: value.type_name(),
            });
        };
        trace!(%name, count = items.len(), "rendering repetition");

        let n = items.len();
        for (i, item) in items.iter().enumerate() {
            self.render_children(children, item, i == n - 1, output)?;
        }
        Ok(())
    }

    fn unknown_variable(
        &self,
        directive: DirectiveKind,
        name: &str,
        output: &mut String,
    ) -> Result<(), RenderError> {
        let err = RenderError::UnknownVariable {
            directive,
            name: name.to_string(),
        };
        match self.options.strictness {
            Strictness::Strict => Err(err),
            Strictness::Lenient => {
                output.push_str(&inline_marker(&err));
                Ok(())
            }
        }
    }
}
