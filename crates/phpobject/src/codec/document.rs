//! Top-level entry points: whole documents to and from bytes or streams.

use std::io::{self, Read, Write};

use crate::codec::primitives::{IoReader, Reader, Source, Writer};
use crate::codec::value::{decode_value, encode_value};
use crate::error::DecodeError;
use crate::limits::{DEFAULT_MAX_CONTAINER_LEN, DEFAULT_MAX_DEPTH, DEFAULT_MAX_STRING_LEN};
use crate::model::Value;

// =============================================================================
// DECODING
// =============================================================================

/// Options for decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum nesting of arrays and objects. The root container is level 1.
    pub max_depth: usize,

    /// Maximum declared length of a string or class name.
    pub max_string_len: usize,

    /// Maximum declared entry count of an array or object.
    pub max_container_len: usize,

    /// Accept bytes after the root value when decoding a slice.
    ///
    /// Stream decoding never reads past the root value, so this has no
    /// effect there.
    pub allow_trailing_data: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_string_len: DEFAULT_MAX_STRING_LEN,
            max_container_len: DEFAULT_MAX_CONTAINER_LEN,
            allow_trailing_data: false,
        }
    }
}

impl DecodeOptions {
    /// Creates options with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_string_len(mut self, max_string_len: usize) -> Self {
        self.max_string_len = max_string_len;
        self
    }

    pub fn with_max_container_len(mut self, max_container_len: usize) -> Self {
        self.max_container_len = max_container_len;
        self
    }

    pub fn with_trailing_data(mut self, allow: bool) -> Self {
        self.allow_trailing_data = allow;
        self
    }
}

/// Decodes a single value occupying all of `input`.
///
/// ```rust
/// use phpobject::{unserialize, Value};
///
/// let value = unserialize(b"a:1:{i:0;s:3:\"foo\";}").unwrap();
/// assert_eq!(value.as_array().and_then(|a| a.iget(0)), Some(&Value::from("foo")));
/// ```
pub fn unserialize(input: &[u8]) -> Result<Value, DecodeError> {
    unserialize_with_options(input, &DecodeOptions::default())
}

/// Decodes a single value from `input` with the given options.
pub fn unserialize_with_options(input: &[u8], options: &DecodeOptions) -> Result<Value, DecodeError> {
    let mut reader = Reader::new(input);
    let value = decode_value(&mut reader, options, 0)?;
    if !options.allow_trailing_data && !reader.is_empty() {
        return Err(DecodeError::TrailingData {
            position: reader.position(),
        });
    }
    Ok(value)
}

/// Decodes one value from a stream, leaving any following bytes unread.
///
/// The stream is read one byte at a time; wrap slow readers in a
/// [`std::io::BufReader`] that the caller keeps for subsequent reads.
pub fn unserialize_from<R: Read>(reader: R) -> Result<Value, DecodeError> {
    unserialize_from_with_options(reader, &DecodeOptions::default())
}

/// Decodes one value from a stream with the given options.
pub fn unserialize_from_with_options<R: Read>(
    reader: R,
    options: &DecodeOptions,
) -> Result<Value, DecodeError> {
    decode_value(&mut IoReader::new(reader), options, 0)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a value to bytes.
///
/// ```rust
/// use phpobject::{serialize, Value};
///
/// assert_eq!(serialize(&Value::from("hi")), b"s:2:\"hi\";");
/// ```
pub fn serialize(value: &Value) -> Vec<u8> {
    let mut writer = Writer::new();
    encode_value(&mut writer, value);
    writer.into_bytes()
}

/// Encodes a value into `sink`.
pub fn serialize_to<W: Write>(mut sink: W, value: &Value) -> io::Result<()> {
    sink.write_all(&serialize(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::{Array, Object, Visibility};

    #[test]
    fn test_literal_scenarios() {
        assert_eq!(serialize(&Value::Nil), b"N;");
        assert_eq!(serialize(&Value::Bool(true)), b"b:1;");
        assert_eq!(serialize(&Value::Long(-42)), b"i:-42;");
        assert_eq!(serialize(&Value::from("hi")), b"s:2:\"hi\";");

        let mut array = Array::new();
        array.set("0", 1);
        array.set("foo", "bar");
        assert_eq!(
            serialize(&Value::Array(array)),
            b"a:2:{i:0;i:1;s:3:\"foo\";s:3:\"bar\";}"
        );

        let mut object = Object::new("Foo");
        object.set_protected_var("x", 1).unwrap();
        assert_eq!(
            serialize(&Value::Object(object)),
            b"O:3:\"Foo\":1:{s:4:\"\0*\0x\";i:1;}"
        );
    }

    #[test]
    fn test_literal_decoding() {
        assert_eq!(unserialize(b"N;"), Ok(Value::Nil));
        assert_eq!(unserialize(b"b:0;"), Ok(Value::Bool(false)));

        let decoded = unserialize(b"O:3:\"Foo\":1:{s:4:\"\0*\0x\";i:1;}").unwrap();
        let object = decoded.as_object().unwrap();
        assert_eq!(object.class_name(), b"Foo");
        assert_eq!(object.get_var("x"), Some((&Value::Long(1), Visibility::Protected)));
    }

    #[test]
    fn test_error_scenarios() {
        assert_eq!(unserialize(b"s:5:\"abc\";").unwrap_err().kind(), ErrorKind::MalformedString);
        assert_eq!(unserialize(b"a:1:{i:0;").unwrap_err().kind(), ErrorKind::Truncated);
        assert_eq!(unserialize(b"x:0;").unwrap_err().kind(), ErrorKind::UnknownType);
        assert_eq!(unserialize(b"b:2;").unwrap_err().kind(), ErrorKind::MalformedBool);
        assert_eq!(
            unserialize(b"O:1:\"A\":1:{s:6:\"\0B-C\0x\";N;}").unwrap_err().kind(),
            ErrorKind::InvalidClassName
        );
    }

    #[test]
    fn test_trailing_data() {
        assert_eq!(
            unserialize(b"N;N;"),
            Err(DecodeError::TrailingData { position: 2 })
        );
        let options = DecodeOptions::new().with_trailing_data(true);
        assert_eq!(unserialize_with_options(b"N;N;", &options), Ok(Value::Nil));
    }

    #[test]
    fn test_unserialize_from_leaves_rest_unread() {
        let mut input: &[u8] = b"i:1;s:1:\"a\";tail";
        assert_eq!(unserialize_from(&mut input), Ok(Value::Long(1)));
        assert_eq!(unserialize_from(&mut input), Ok(Value::from("a")));
        assert_eq!(input, b"tail");
    }

    #[test]
    fn test_unserialize_from_truncated_stream() {
        let input: &[u8] = b"a:2:{i:0;N;";
        assert_eq!(unserialize_from(input).unwrap_err().kind(), ErrorKind::Truncated);
    }

    #[test]
    fn test_serialize_to_sink() {
        let mut array = Array::new();
        array.push(true);
        array.push(2.5);
        let value = Value::Array(array);

        let mut sink = Vec::new();
        serialize_to(&mut sink, &value).unwrap();
        assert_eq!(sink, b"a:2:{i:0;b:1;i:1;d:2.5;}");
        assert_eq!(unserialize(&sink), Ok(value));
    }

    #[test]
    fn test_default_options() {
        let options = DecodeOptions::default();
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert!(!options.allow_trailing_data);
        assert_eq!(DecodeOptions::new(), options);
    }

    #[test]
    fn test_deep_nesting_is_limited() {
        let depth = DEFAULT_MAX_DEPTH + 1;
        let mut input = Vec::new();
        for _ in 0..depth {
            input.extend_from_slice(b"a:1:{i:0;");
        }
        input.extend_from_slice(b"N;");
        input.extend(std::iter::repeat_n(b'}', depth));
        assert_eq!(unserialize(&input).unwrap_err().kind(), ErrorKind::LimitExceeded);

        let options = DecodeOptions::new().with_max_depth(depth);
        assert!(unserialize_with_options(&input, &options).is_ok());
    }
}
