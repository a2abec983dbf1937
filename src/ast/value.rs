use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Attribute-style lookup for fixed-field record types.
///
/// Contexts are usually [`Value::Map`]s, but any type with a fixed set
/// of named fields can serve as a context too — the record analogue of
/// iterating over structs instead of maps. Implement `Fields` and wrap
/// the value with [`Value::record`]; the renderer falls back to
/// [`field`](Fields::field) whenever a context value does not support
/// key-based lookup.
///
/// ```rust
/// use curly::{Fields, Value};
///
/// struct Entry {
///     name: &'static str,
///     telephone: &'static str,
/// }
///
/// impl Fields for Entry {
///     fn field(&self, name: &str) -> Option<Value> {
///         match name {
///             "name" => Some(self.name.into()),
///             "telephone" => Some(self.telephone.into()),
///             _ => None,
///         }
///     }
/// }
///
/// let ctx = Value::record(Entry { name: "Mary", telephone: "0203898" });
/// ```
pub trait Fields: Send + Sync {
    /// Look up a field by name. `None` means the field does not exist.
    fn field(&self, name: &str) -> Option<Value>;
}

/// A runtime context value.
///
/// Templates are rendered against a `Value`, usually a [`Map`](Value::Map)
/// whose entries are queried by directive names. Conversion from common
/// Rust types is provided via `From` impls, and a `Map` can be collected
/// from key/value pairs:
///
/// ```rust
/// use curly::Value;
///
/// let s: Value = "hello".into();
/// let n: Value = 42i64.into();
/// let b: Value = true.into();
/// let ctx = Value::from_iter([("status", "ok")]);
/// ```
#[derive(Clone)]
pub enum Value {
    String(String),
    Number(f64),
    Bool(bool),
    /// An ordered sequence, iterated by repetition directives.
    List(Vec<Value>),
    /// A key-addressable mapping, the common context shape.
    Map(BTreeMap<String, Value>),
    /// A fixed-field record resolved via the [`Fields`] trait.
    Record(Arc<dyn Fields>),
    /// The absence of a value. Falsy, renders as an empty string.
    Null,
}

impl Value {
    /// Wrap a fixed-field record type as a context value.
    pub fn record(fields: impl Fields + 'static) -> Self {
        Value::Record(Arc::new(fields))
    }

    /// Type name for diagnostic messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
            Value::Null => "null",
        }
    }

    /// Truthiness check, used by `{?name ...}` and `{!name ...}`.
    ///
    /// Falsy values: `Null`, empty string, `0`, `false`, empty list,
    /// empty map. Everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::String(s) => !s.is_empty(),
            Value::Number(n) => *n != 0.0,
            Value::Bool(b) => *b,
            Value::List(items) => !items.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
            Value::Record(_) => true,
            Value::Null => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// The canonical output text for scalar values, or `None` for
    /// values that have no scalar rendering (lists, maps, records).
    ///
    /// Numbers print without trailing zero padding: `7.70` renders as
    /// `"7.7"` and whole-valued floats drop the `.0` entirely.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(format_number(*n)),
            Value::Bool(b) => Some(if *b { "true" } else { "false" }.to_string()),
            Value::Null => Some(String::new()),
            Value::List(_) | Value::Map(_) | Value::Record(_) => None,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Value::Record(_) => f.write_str("Record(..)"),
            Value::Null => f.write_str("Null"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            // Records have no structural equality; compare identity.
            (Value::Record(a), Value::Record(b)) => Arc::ptr_eq(a, b),
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Value::Map(entries)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
