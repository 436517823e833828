//! Call records and the value model shared by the spy and its matchers.
//!
//! Spied callables traffic in dynamically-typed values, represented as
//! [`serde_json::Value`]. A return slot is a [`ReturnValue`], which adds a
//! "no value" sentinel on top of `Value` so that an invocation that produced
//! nothing stays distinguishable from one that explicitly returned `null`.
//!
//! Deep structural equality compares canonical serialized forms byte for
//! byte, exposed as [`deep_eq`] for single values and [`args_match`] for
//! argument lists.

use serde::{Serialize, Serializer};
use serde_json::Value;

/// The value a spied invocation handed back.
///
/// `ReturnValue::None` marks an invocation that produced no value. It is not
/// the same thing as `Value::Null`: a spy programmed with an explicit `null`
/// return reports `ReturnValue::Value(Value::Null)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ReturnValue {
    /// The invocation produced no value.
    #[default]
    None,
    /// The invocation produced this value.
    Value(Value),
}

impl ReturnValue {
    /// True when this slot holds an actual value.
    pub fn is_value(&self) -> bool {
        matches!(self, ReturnValue::Value(_))
    }

    /// True when this slot is the "no value" sentinel.
    pub fn is_none(&self) -> bool {
        matches!(self, ReturnValue::None)
    }

    /// Borrow the held value, if any.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ReturnValue::None => None,
            ReturnValue::Value(value) => Some(value),
        }
    }

    /// Compare by canonical serialized form.
    ///
    /// The sentinel has no serialized form, so it deep-equals only the
    /// sentinel. Everything else is compared the same way [`deep_eq`]
    /// compares plain values.
    pub fn deep_eq(&self, other: &ReturnValue) -> bool {
        self.canonical() == other.canonical()
    }

    fn canonical(&self) -> Option<String> {
        self.as_value().map(Value::to_string)
    }
}

impl Serialize for ReturnValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ReturnValue::None => serializer.serialize_none(),
            ReturnValue::Value(value) => value.serialize(serializer),
        }
    }
}

impl From<Value> for ReturnValue {
    fn from(value: Value) -> Self {
        ReturnValue::Value(value)
    }
}

impl From<&str> for ReturnValue {
    fn from(value: &str) -> Self {
        ReturnValue::Value(Value::from(value))
    }
}

impl From<String> for ReturnValue {
    fn from(value: String) -> Self {
        ReturnValue::Value(Value::from(value))
    }
}

impl From<bool> for ReturnValue {
    fn from(value: bool) -> Self {
        ReturnValue::Value(Value::from(value))
    }
}

impl From<i32> for ReturnValue {
    fn from(value: i32) -> Self {
        ReturnValue::Value(Value::from(value))
    }
}

impl From<i64> for ReturnValue {
    fn from(value: i64) -> Self {
        ReturnValue::Value(Value::from(value))
    }
}

impl From<u64> for ReturnValue {
    fn from(value: u64) -> Self {
        ReturnValue::Value(Value::from(value))
    }
}

impl From<f64> for ReturnValue {
    fn from(value: f64) -> Self {
        ReturnValue::Value(Value::from(value))
    }
}

/// One logged invocation: the arguments it received and the value it
/// returned. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct CallRecord {
    args: Vec<Value>,
    returned: ReturnValue,
}

impl CallRecord {
    pub(crate) fn new(args: Vec<Value>, returned: ReturnValue) -> Self {
        Self { args, returned }
    }

    /// The arguments passed to this invocation, in order.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// The value this invocation handed back.
    pub fn returned(&self) -> &ReturnValue {
        &self.returned
    }
}

/// Compare two values by canonical serialized form.
///
/// `serde_json` keeps object keys ordered, so `Value::to_string()` is a
/// canonical form and byte-for-byte comparison of those forms is a deep,
/// order- and type-sensitive structural equality. Note that `1` and `1.0`
/// serialize differently and therefore do not match.
///
/// # Example
///
/// ```rust
/// use tattle::deep_eq;
/// use serde_json::json;
///
/// assert!(deep_eq(&json!({"a": [1, 2]}), &json!({"a": [1, 2]})));
/// assert!(!deep_eq(&json!(1), &json!(1.0)));
/// ```
pub fn deep_eq(a: &Value, b: &Value) -> bool {
    a.to_string() == b.to_string()
}

/// Match an expected argument list against a recorded one.
///
/// Length- and order-sensitive; each position is compared with [`deep_eq`].
///
/// # Example
///
/// ```rust
/// use tattle::{args, args_match};
///
/// assert!(args_match(&args!["john", "doe"], &args!["john", "doe"]));
/// assert!(!args_match(&args!["doe", "john"], &args!["john", "doe"]));
/// assert!(!args_match(&args!["john"], &args!["john", "doe"]));
/// ```
pub fn args_match(expected: &[Value], actual: &[Value]) -> bool {
    expected.len() == actual.len()
        && expected.iter().zip(actual).all(|(e, a)| deep_eq(e, a))
}

/// Build an argument list (`Vec<serde_json::Value>`) from expressions.
///
/// # Example
///
/// ```rust
/// use tattle::args;
///
/// let empty = args![];
/// assert!(empty.is_empty());
///
/// let two = args!["john", 42];
/// assert_eq!(two.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::__json::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::__json::json!($value)),+]
    };
}
