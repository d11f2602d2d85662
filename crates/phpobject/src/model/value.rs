//! The value type.
//!
//! Values form an owned tree: arrays and objects own their children and the
//! format has no back-references, so no sharing is needed.

use std::fmt;

use crate::codec::primitives::Writer;
use crate::model::{Array, Object};

/// Kinds of values, identified on the wire by a single tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueType {
    Nil = b'N',
    Bool = b'b',
    Long = b'i',
    Double = b'd',
    Str = b's',
    Array = b'a',
    Object = b'O',
}

impl ValueType {
    /// Creates a ValueType from its wire tag.
    pub fn from_tag(tag: u8) -> Option<ValueType> {
        match tag {
            b'N' => Some(ValueType::Nil),
            b'b' => Some(ValueType::Bool),
            b'i' => Some(ValueType::Long),
            b'd' => Some(ValueType::Double),
            b's' => Some(ValueType::Str),
            b'a' => Some(ValueType::Array),
            b'O' => Some(ValueType::Object),
            _ => None,
        }
    }

    /// Returns the wire tag.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Returns the human-readable type name.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Nil => "nil",
            ValueType::Bool => "boolean",
            ValueType::Long => "long",
            ValueType::Double => "double",
            ValueType::Str => "string",
            ValueType::Array => "array",
            ValueType::Object => "object",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A serializable value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The null value.
    #[default]
    Nil,

    Bool(bool),

    /// Signed 64-bit integer.
    Long(i64),

    /// IEEE 754 double. NaN and the infinities are representable.
    Double(f64),

    /// Byte string. The length on the wire is the byte count; the payload
    /// may contain NUL and non-UTF-8 bytes.
    Str(Vec<u8>),

    Array(Array),

    Object(Object),
}

impl Value {
    /// Returns the type of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Nil => ValueType::Nil,
            Value::Bool(_) => ValueType::Bool,
            Value::Long(_) => ValueType::Long,
            Value::Double(_) => ValueType::Double,
            Value::Str(_) => ValueType::Str,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
        }
    }

    /// Writes the wire form of this value to `writer`.
    pub fn serialize(&self, writer: &mut Writer) {
        crate::codec::encode_value(writer, self);
    }

    /// Returns the wire form of this value.
    pub fn to_bytes(&self) -> Vec<u8> {
        crate::codec::serialize(self)
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the raw bytes of a string value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Str(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns a string value as `&str` if its bytes are valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Str(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            Value::Array(a) => fmt::Display::fmt(a, f),
            Value::Object(o) => fmt::Display::fmt(o, f),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Long(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Long(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Str(v.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Str(v)
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Value::Array(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_tags() {
        for tag in *b"NbidsaO" {
            assert_eq!(ValueType::from_tag(tag).map(ValueType::tag), Some(tag));
        }
        assert_eq!(ValueType::from_tag(b'o'), None);
        assert_eq!(ValueType::from_tag(b'r'), None);
        assert_eq!(ValueType::Bool.name(), "boolean");
        assert_eq!(ValueType::Long.to_string(), "long");
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Long(-42).to_string(), "-42");
        assert_eq!(Value::Double(1.5).to_string(), "1.5");
        assert_eq!(Value::from("hi").to_string(), "hi");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(7i32), Value::Long(7));
        assert_eq!(Value::from(None::<i64>), Value::Nil);
        assert_eq!(Value::from(Some("x")), Value::Str(b"x".to_vec()));
        assert_eq!(Value::from(String::from("ab")).as_str(), Some("ab"));
        assert_eq!(Value::from(vec![0xffu8]).as_str(), None);
        assert_eq!(Value::from(vec![0xffu8]).as_bytes(), Some(&[0xffu8][..]));
    }

    #[test]
    fn test_accessors() {
        let mut v = Value::Array(Array::new());
        assert_eq!(v.value_type(), ValueType::Array);
        assert!(v.as_array_mut().is_some());
        assert!(v.as_object().is_none());
        assert!(Value::Nil.is_nil());
        assert_eq!(Value::Long(3).as_long(), Some(3));
        assert_eq!(Value::Long(3).as_double(), None);
    }
}
