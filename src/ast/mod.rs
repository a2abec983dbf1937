//! The compiled template tree and the runtime context value type.
//!
//! [`Node`] is the output of compilation; [`Value`] is what templates
//! are rendered against.

mod node;
pub mod value;

pub use node::Node;
pub use value::{Fields, Value};
