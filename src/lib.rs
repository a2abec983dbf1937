//! # curly
//!
//! A minimal brace-directive text templating engine. Template source is
//! a mix of literal text and `{ }` blocks whose first character selects
//! the directive: `{=name}` substitution, `{?name body}` conditional,
//! `{!name body}` inverted conditional, `{#name body}` repetition, and
//! `{/name body}` separator (suppressed on the last iteration of the
//! enclosing repetition).
//!
//! The crate exposes exactly two core operations: compiling source text
//! into a [`CompiledTemplate`] and rendering that template against a
//! [`Value`] context. Everything else (file loading, pretty-printing,
//! CLI surfaces) belongs to callers.
//!
//! ## Quick start
//!
//! ```rust
//! use curly::{Value, render};
//!
//! let ctx = Value::from_iter([("name", "Alice")]);
//! let output = render("Hello, {=name}!", &ctx).unwrap();
//! assert_eq!(output, "Hello, Alice!");
//! ```
//!
//! ## Compiled templates
//!
//! For repeated rendering, compile once and render against different
//! contexts. A compiled template is immutable: rendering only reads it,
//! so it can be shared freely across threads.
//!
//! ```rust
//! use curly::{CompiledTemplate, Value};
//!
//! let template = CompiledTemplate::compile("HP: {=hp}").unwrap();
//!
//! let ctx = Value::from_iter([("hp", 100i64)]);
//! assert_eq!(template.render(&ctx).unwrap(), "HP: 100");
//!
//! let ctx = Value::from_iter([("hp", 75i64)]);
//! assert_eq!(template.render(&ctx).unwrap(), "HP: 75");
//! ```
//!
//! ## Lenient and strict modes
//!
//! By default both compilation and rendering are lenient: malformed
//! directives and unknown variables become visible inline markers and
//! processing continues, so partial templates stay usable for
//! debugging. Strict mode turns those recoveries into hard errors for
//! build-time validation.
//!
//! ```rust
//! use curly::{CompiledTemplate, RenderOptions, Strictness, Value};
//!
//! let template = CompiledTemplate::compile("Hi {=missing}!").unwrap();
//! let ctx = Value::from_iter([("name", "Alice")]);
//!
//! let lenient = template.render(&ctx).unwrap();
//! assert!(lenient.contains("template error"));
//!
//! let strict = RenderOptions::new().strictness(Strictness::Strict);
//! assert!(template.render_with_options(&ctx, &strict).is_err());
//! ```
//!
//! ## Observability
//!
//! The engine emits [`tracing`] events (a debug event per compilation,
//! a render span named after the template, warnings for dead content in
//! substitution blocks). Attach any `tracing` subscriber to see them;
//! the crate never installs one itself.

pub mod ast;
mod compiler;
pub mod error;
mod lexer;
mod parser;
mod render;

pub use ast::{Fields, Node, Value};
pub use compiler::CompileOptions;
pub use error::{CompileError, DirectiveKind, Error, RenderError};
pub use render::RenderOptions;

/// Whether recoverable errors become inline markers or hard failures.
///
/// Lenient mode (the default) substitutes a visible error marker for
/// malformed directives at compile time and unknown variables at render
/// time, and keeps going. Strict mode aborts with the precise error
/// instead. Structural failures — an unbalanced `}`, excessive nesting,
/// a repetition over a non-list — are hard errors in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    #[default]
    Lenient,
    Strict,
}

/// Compile template source with the default options (lenient, nesting
/// depth 64).
///
/// Shorthand for [`CompiledTemplate::compile`].
pub fn compile(source: &str) -> Result<CompiledTemplate, CompileError> {
    CompiledTemplate::compile(source)
}

/// Compile source text and render it against a context in a single step.
///
/// For repeated rendering of the same source, prefer [`CompiledTemplate`]
/// to avoid re-compiling.
pub fn render(source: &str, context: &Value) -> Result<String, Error> {
    let template = CompiledTemplate::compile(source)?;
    Ok(template.render(context)?)
}

/// A compiled template that can be rendered any number of times against
/// different contexts.
///
/// Owns the immutable [`Node`] tree produced by compilation and an
/// optional name used only in diagnostics.
///
/// ```rust
/// use curly::{CompiledTemplate, Value};
///
/// let template = CompiledTemplate::compile("{#items <{=id}>}")
///     .unwrap()
///     .with_name("items.tpl");
///
/// let ctx = Value::from_iter([(
///     "items",
///     Value::List(vec![
///         Value::from_iter([("id", 1i64)]),
///         Value::from_iter([("id", 2i64)]),
///     ]),
/// )]);
/// assert_eq!(template.render(&ctx).unwrap(), "<1><2>");
/// ```
pub struct CompiledTemplate {
    root: Node,
    name: Option<String>,
}

impl CompiledTemplate {
    /// Compile source text with the default options.
    pub fn compile(source: &str) -> Result<Self, CompileError> {
        Self::compile_with_options(source, &CompileOptions::default())
    }

    /// Compile source text with explicit options.
    pub fn compile_with_options(
        source: &str,
        options: &CompileOptions,
    ) -> Result<Self, CompileError> {
        let tokens = lexer::tokenize(source);
        let block = parser::parse(&tokens, options.max_depth)?;
        let root = compiler::compile_block(&block, options)?;
        tracing::debug!(bytes = source.len(), "compiled template");
        Ok(Self { root, name: None })
    }

    /// Attach a diagnostic name (usually the file the source came from).
    /// The name appears in the render tracing span and nowhere else.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The diagnostic name, if one was attached.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Render this template against a context with the default options
    /// (lenient).
    pub fn render(&self, context: &Value) -> Result<String, RenderError> {
        self.render_with_options(context, &RenderOptions::default())
    }

    /// Render this template with explicit options.
    pub fn render_with_options(
        &self,
        context: &Value,
        options: &RenderOptions,
    ) -> Result<String, RenderError> {
        let span = tracing::trace_span!("render", template = self.name.as_deref());
        let _guard = span.enter();
        render::Renderer::new(options.clone()).render_root(&self.root, context)
    }

    /// Access the compiled node tree for inspection or analysis.
    pub fn root(&self) -> &Node {
        &self.root
    }
}
