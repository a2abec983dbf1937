/// A compiled template element.
///
/// The five directive shapes plus the implicit [`Sequence`](Node::Sequence)
/// container form one closed variant type; rendering dispatches on it
/// with a single exhaustive match. The tree is immutable once compiled
/// and owned exclusively by its
/// [`CompiledTemplate`](crate::CompiledTemplate) — rendering only reads
/// it, so a compiled template can be rendered concurrently against
/// different contexts.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An ordered run of nodes whose outputs are concatenated. The root
    /// of every compiled template is a `Sequence`.
    Sequence(Vec<Node>),

    /// Fixed output text between directives.
    Literal(String),

    /// `{=name}` — emits the context value named `name`.
    ///
    /// Content placed inside the block beyond the name is compiled into
    /// `children` but never rendered; it is dead content kept for
    /// inspection.
    Substitution { name: String, children: Vec<Node> },

    /// `{?name body}` / `{!name body}` — renders the body when `name`
    /// is truthy (or falsy, when `inverted`). A missing name counts as
    /// false rather than an error.
    Conditional {
        name: String,
        inverted: bool,
        children: Vec<Node>,
    },

    /// `{#name body}` — renders the body once per element of the list
    /// named `name`, with the element as the new context.
    Repetition { name: String, children: Vec<Node> },

    /// `{/name body}` — renders the body except on the last iteration
    /// of the enclosing repetition.
    Separator(Vec<Node>),
}
