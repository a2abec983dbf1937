//! Error types for compilation and rendering.
//!
//! [`CompileError`] is produced while turning source text into a
//! [`CompiledTemplate`](crate::CompiledTemplate) and carries byte offsets
//! into the source for diagnostics. [`RenderError`] is produced while
//! rendering a compiled template against a context value.
//!
//! In lenient mode most failures never surface as `Err`: they are
//! rewritten into inline markers (see `inline_marker`) so that partial
//! templates stay usable for debugging. The exceptions are structural
//! parse failures (an unbalanced `}`, excessive nesting) and
//! [`RenderError::WrongShape`], which have no sensible recovery.

use std::fmt;
use thiserror::Error;

/// An error produced while compiling template source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A `}` appeared with no matching open `{`. Always a hard failure,
    /// in both lenient and strict mode.
    #[error("unbalanced '}}' at byte {offset}")]
    UnbalancedCloseBrace { offset: usize },

    /// Directive blocks were nested deeper than the configured limit.
    #[error("block nesting exceeds the maximum depth of {limit}")]
    TooDeeplyNested { limit: usize },

    /// A block's first character is not one of the five directive
    /// operators (`?`, `!`, `#`, `=`, `/`). Hard failure only in strict
    /// mode; lenient compilation recovers with an inline marker.
    #[error("unrecognized directive {found:?} at byte {offset}")]
    UnrecognizedDirective { found: String, offset: usize },
}

/// An error produced while rendering a compiled template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A substitution or repetition named a variable the context could
    /// not resolve, via neither key-based nor attribute-style lookup.
    /// Hard failure only in strict mode.
    #[error("unknown variable {name:?} in {directive}")]
    UnknownVariable {
        directive: DirectiveKind,
        name: String,
    },

    /// A resolved value had a shape the directive cannot work with,
    /// e.g. a repetition over a non-list. Fatal in both modes.
    #[error("{directive} {name:?} expected {expected}, got {actual}")]
    WrongShape {
        directive: DirectiveKind,
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// The directive kind a render failure occurred in. Part of the error
/// contract: markers for a missing variable in a substitution must be
/// distinguishable from those in a repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Substitution,
    Repetition,
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DirectiveKind::Substitution => "substitution",
            DirectiveKind::Repetition => "repetition",
        })
    }
}

/// Combined error type returned by the one-shot [`render`](crate::render)
/// entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Wrap an error's display form into the fixed inline marker emitted in
/// lenient mode.
///
/// The frame is deliberately plain text so it survives any output
/// channel; presentation layers that want styled markers can rewrite it.
pub(crate) fn inline_marker(error: &impl fmt::Display) -> String {
    format!("[template error: {error}]")
}
