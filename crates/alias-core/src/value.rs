//! Dynamic values stored inside scope slots.

use serde::{Deserialize, Serialize, Serializer};

use crate::alias::Alias;

/// A value held by a scope slot or a detached alias.
///
/// Only [`Value::List`] is sequence-like. Strings are treated as scalars.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "PlainValue")]
pub enum Value {
    /// Absence of a value; an empty alias holds this.
    #[default]
    None,
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Double precision float.
    Float(f64),
    /// UTF-8 string.
    Str(String),
    /// Ordered sequence of values.
    List(Vec<Value>),
    /// Another alias stored in the slot (pointer to pointer).
    ///
    /// A nested alias bound into the scope that stores it keeps that scope
    /// alive; remove the slot to release it.
    Alias(Alias),
}

impl Value {
    /// Returns whether the value is [`Value::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Returns whether the value can be indexed as a sequence.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Returns the boolean payload, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the integer payload, if any.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            Value::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Returns the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the sequence payload, if any.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the nested alias, if any.
    pub fn as_alias(&self) -> Option<&Alias> {
        match self {
            Value::Alias(alias) => Some(alias),
            _ => None,
        }
    }

    /// Short type label used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Alias(_) => "alias",
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::None => serializer.serialize_none(),
            Value::Bool(flag) => serializer.serialize_bool(*flag),
            Value::Int(value) => serializer.serialize_i64(*value),
            Value::Float(value) => serializer.serialize_f64(*value),
            Value::Str(value) => serializer.serialize_str(value),
            Value::List(items) => serializer.collect_seq(items),
            // Nested aliases are rendered, never followed.
            Value::Alias(alias) => serializer.collect_str(alias),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PlainValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<PlainValue>),
}

impl From<PlainValue> for Value {
    fn from(plain: PlainValue) -> Self {
        match plain {
            PlainValue::Null => Value::None,
            PlainValue::Bool(flag) => Value::Bool(flag),
            PlainValue::Int(value) => Value::Int(value),
            PlainValue::Float(value) => Value::Float(value),
            PlainValue::Str(value) => Value::Str(value),
            PlainValue::List(items) => Value::List(items.into_iter().map(Value::from).collect()),
        }
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Alias> for Value {
    fn from(alias: Alias) -> Self {
        Value::Alias(alias)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}
