//! Value encoding/decoding for the serialize format.
//!
//! Implements the grammar for scalars, strings, keys and arrays. Objects
//! live in [`crate::codec::object`] because of their member-key mangling.

use crate::codec::document::DecodeOptions;
use crate::codec::object::{decode_object, encode_object};
use crate::codec::primitives::{Source, Writer};
use crate::error::DecodeError;
use crate::limits::{MAX_DOUBLE_LITERAL_LEN, MAX_LENGTH_DIGITS, MAX_LONG_DIGITS, MAX_PREALLOC_ENTRIES};
use crate::model::{Array, Value, ValueType};
use crate::validate::is_numeric_key;

// =============================================================================
// DECODING
// =============================================================================

/// Decodes one value, starting at its tag byte.
///
/// `depth` is the number of arrays and objects enclosing the value; it is
/// checked against [`DecodeOptions::max_depth`] whenever a container is
/// entered.
pub fn decode_value<S: Source>(
    src: &mut S,
    options: &DecodeOptions,
    depth: usize,
) -> Result<Value, DecodeError> {
    let position = src.position();
    let tag = src.read_byte("value tag")?;
    let value_type = ValueType::from_tag(tag).ok_or(DecodeError::UnknownType { tag, position })?;
    match value_type {
        ValueType::Nil => decode_nil(src).map(|()| Value::Nil),
        ValueType::Bool => decode_bool(src).map(Value::Bool),
        ValueType::Long => decode_long(src).map(Value::Long),
        ValueType::Double => decode_double(src).map(Value::Double),
        ValueType::Str => decode_str(src, options).map(Value::Str),
        ValueType::Array => decode_array(src, options, depth).map(Value::Array),
        ValueType::Object => decode_object(src, options, depth).map(Value::Object),
    }
}

fn decode_nil<S: Source>(src: &mut S) -> Result<(), DecodeError> {
    let position = src.position();
    if src.read_byte("nil")? != b';' {
        return Err(DecodeError::MalformedNil { position });
    }
    Ok(())
}

fn decode_bool<S: Source>(src: &mut S) -> Result<bool, DecodeError> {
    let position = src.position();
    if src.read_byte("bool")? != b':' {
        return Err(DecodeError::MalformedBool { position });
    }
    let value = match src.read_byte("bool")? {
        b'0' => false,
        b'1' => true,
        _ => return Err(DecodeError::MalformedBool { position: position + 1 }),
    };
    if src.read_byte("bool")? != b';' {
        return Err(DecodeError::MalformedBool { position: position + 2 });
    }
    Ok(value)
}

fn decode_long<S: Source>(src: &mut S) -> Result<i64, DecodeError> {
    let position = src.position();
    if src.read_byte("long")? != b':' {
        return Err(DecodeError::MalformedLong { position });
    }
    read_until(src, b';', MAX_LONG_DIGITS + 1, "long")?
        .as_deref()
        .and_then(parse_long)
        .ok_or(DecodeError::MalformedLong { position: position + 1 })
}

fn decode_double<S: Source>(src: &mut S) -> Result<f64, DecodeError> {
    let position = src.position();
    if src.read_byte("double")? != b':' {
        return Err(DecodeError::MalformedDouble { position });
    }
    read_until(src, b';', MAX_DOUBLE_LITERAL_LEN, "double")?
        .as_deref()
        .and_then(parse_double)
        .ok_or(DecodeError::MalformedDouble { position: position + 1 })
}

/// Decodes the body of a string after its `s` tag.
pub(crate) fn decode_str<S: Source>(src: &mut S, options: &DecodeOptions) -> Result<Vec<u8>, DecodeError> {
    let position = src.position();
    if src.read_byte("string")? != b':' {
        return Err(DecodeError::MalformedString {
            context: "missing ':' after tag",
            position,
        });
    }
    let len = read_length(src, b':', "string length", |position| DecodeError::MalformedString {
        context: "length",
        position,
    })?;
    if len > options.max_string_len {
        return Err(DecodeError::LimitExceeded {
            field: "string length",
            len,
            max: options.max_string_len,
        });
    }
    let position = src.position();
    if src.read_byte("string")? != b'"' {
        return Err(DecodeError::MalformedString {
            context: "missing opening quote",
            position,
        });
    }
    let payload = src.read_bytes(len, "string payload")?;

    // Payload is complete: a missing or wrong terminator means the declared
    // length does not match the data.
    let position = src.position();
    if src.next_byte() != Some(b'"') || src.next_byte() != Some(b';') {
        return Err(DecodeError::LengthMismatch {
            declared: len,
            position,
        });
    }
    Ok(payload)
}

/// Decodes an array or member key and returns its canonical text form.
///
/// Only string and integer keys are accepted; integer keys are converted to
/// their decimal representation.
pub(crate) fn decode_key<S: Source>(src: &mut S, options: &DecodeOptions) -> Result<Vec<u8>, DecodeError> {
    let position = src.position();
    let tag = src.read_byte("key tag")?;
    match ValueType::from_tag(tag) {
        Some(ValueType::Str) => decode_str(src, options),
        Some(ValueType::Long) => decode_long(src).map(|v| v.to_string().into_bytes()),
        Some(_) => Err(DecodeError::InvalidKey { tag, position }),
        None => Err(DecodeError::UnknownType { tag, position }),
    }
}

fn decode_array<S: Source>(src: &mut S, options: &DecodeOptions, depth: usize) -> Result<Array, DecodeError> {
    let depth = enter_container(depth, options)?;
    let position = src.position();
    if src.read_byte("array")? != b':' {
        return Err(DecodeError::MalformedArray {
            context: "missing ':' after tag",
            position,
        });
    }
    let count = read_length(src, b':', "array count", |position| DecodeError::MalformedArray {
        context: "count",
        position,
    })?;
    check_container_len(count, "array count", options)?;
    let position = src.position();
    if src.read_byte("array")? != b'{' {
        return Err(DecodeError::MalformedArray {
            context: "missing '{'",
            position,
        });
    }

    let mut array = Array::with_capacity(count.min(MAX_PREALLOC_ENTRIES));
    for _ in 0..count {
        let key = decode_key(src, options)?;
        let value = decode_value(src, options, depth)?;
        array.set(key, value);
    }

    let position = src.position();
    if src.read_byte("array end")? != b'}' {
        return Err(DecodeError::MalformedArray {
            context: "missing '}'",
            position,
        });
    }
    Ok(array)
}

/// Returns the depth of a container's children, or fails if entering the
/// container exceeds the configured nesting limit.
pub(crate) fn enter_container(depth: usize, options: &DecodeOptions) -> Result<usize, DecodeError> {
    let level = depth + 1;
    if level > options.max_depth {
        return Err(DecodeError::LimitExceeded {
            field: "nesting depth",
            len: level,
            max: options.max_depth,
        });
    }
    Ok(level)
}

pub(crate) fn check_container_len(
    count: usize,
    field: &'static str,
    options: &DecodeOptions,
) -> Result<(), DecodeError> {
    if count > options.max_container_len {
        return Err(DecodeError::LimitExceeded {
            field,
            len: count,
            max: options.max_container_len,
        });
    }
    Ok(())
}

/// Reads an unsigned decimal terminated by `terminator`, consuming it.
///
/// `malformed` builds the error for a missing, empty, non-numeric or
/// oversized field from the field's start position.
pub(crate) fn read_length<S: Source>(
    src: &mut S,
    terminator: u8,
    context: &'static str,
    malformed: impl Fn(usize) -> DecodeError,
) -> Result<usize, DecodeError> {
    let position = src.position();
    read_until(src, terminator, MAX_LENGTH_DIGITS, context)?
        .filter(|digits| !digits.is_empty() && digits.iter().all(u8::is_ascii_digit))
        .and_then(|digits| std::str::from_utf8(&digits).ok()?.parse::<usize>().ok())
        .ok_or_else(|| malformed(position))
}

/// Reads bytes up to and including `terminator` and returns the bytes before
/// it, or `None` if more than `max_len` bytes precede it.
fn read_until<S: Source>(
    src: &mut S,
    terminator: u8,
    max_len: usize,
    context: &'static str,
) -> Result<Option<Vec<u8>>, DecodeError> {
    let mut text = Vec::new();
    loop {
        let byte = src.read_byte(context)?;
        if byte == terminator {
            return Ok(Some(text));
        }
        if text.len() == max_len {
            return Ok(None);
        }
        text.push(byte);
    }
}

/// Parses `-?[0-9]+` into an `i64`.
fn parse_long(text: &[u8]) -> Option<i64> {
    let digits = text.strip_prefix(b"-").unwrap_or(text);
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(text).ok()?.parse().ok()
}

/// Parses a float literal: `NAN`, `INF`, `-INF` or a decimal with an
/// optional exponent.
fn parse_double(text: &[u8]) -> Option<f64> {
    match text {
        b"NAN" => Some(f64::NAN),
        b"INF" => Some(f64::INFINITY),
        b"-INF" => Some(f64::NEG_INFINITY),
        _ => {
            let allowed = |b: &u8| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E');
            if !text.iter().all(allowed) {
                return None;
            }
            std::str::from_utf8(text).ok()?.parse().ok()
        }
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes a value. Encoding cannot fail.
pub fn encode_value(writer: &mut Writer, value: &Value) {
    match value {
        Value::Nil => writer.write_bytes(b"N;"),
        Value::Bool(b) => writer.write_bytes(if *b { b"b:1;" } else { b"b:0;" }),
        Value::Long(v) => {
            writer.write_bytes(b"i:");
            writer.write_i64(*v);
            writer.write_byte(b';');
        }
        Value::Double(v) => {
            writer.write_bytes(b"d:");
            writer.write_bytes(format_double(*v).as_bytes());
            writer.write_byte(b';');
        }
        Value::Str(bytes) => encode_str(writer, bytes),
        Value::Array(array) => encode_array(writer, array),
        Value::Object(object) => encode_object(writer, object),
    }
}

pub(crate) fn encode_str(writer: &mut Writer, bytes: &[u8]) {
    writer.write_bytes(b"s:");
    writer.write_usize(bytes.len());
    writer.write_bytes(b":\"");
    writer.write_bytes(bytes);
    writer.write_bytes(b"\";");
}

/// Encodes an array key as an integer if it is numeric, else as a string.
fn encode_key(writer: &mut Writer, key: &[u8]) {
    if is_numeric_key(key) {
        writer.write_bytes(b"i:");
        writer.write_bytes(key);
        writer.write_byte(b';');
    } else {
        encode_str(writer, key);
    }
}

fn encode_array(writer: &mut Writer, array: &Array) {
    writer.write_bytes(b"a:");
    writer.write_usize(array.len());
    writer.write_bytes(b":{");
    for (key, value) in array.iter() {
        encode_key(writer, key);
        encode_value(writer, value);
    }
    writer.write_byte(b'}');
}

/// Formats a double as the shortest literal that parses back to the same
/// value.
fn format_double(v: f64) -> String {
    if v.is_nan() {
        "NAN".to_string()
    } else if v.is_infinite() {
        String::from(if v > 0.0 { "INF" } else { "-INF" })
    } else {
        format!("{v:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::primitives::Reader;
    use crate::error::ErrorKind;

    fn encode(value: &Value) -> Vec<u8> {
        let mut writer = Writer::new();
        encode_value(&mut writer, value);
        writer.into_bytes()
    }

    fn decode(input: &[u8]) -> Result<Value, DecodeError> {
        let mut reader = Reader::new(input);
        decode_value(&mut reader, &DecodeOptions::default(), 0)
    }

    #[test]
    fn test_scalar_literals() {
        assert_eq!(encode(&Value::Nil), b"N;");
        assert_eq!(encode(&Value::Bool(true)), b"b:1;");
        assert_eq!(encode(&Value::Bool(false)), b"b:0;");
        assert_eq!(encode(&Value::Long(-42)), b"i:-42;");
        assert_eq!(encode(&Value::from("hi")), b"s:2:\"hi\";");

        assert_eq!(decode(b"N;"), Ok(Value::Nil));
        assert_eq!(decode(b"b:1;"), Ok(Value::Bool(true)));
        assert_eq!(decode(b"i:-42;"), Ok(Value::Long(-42)));
        assert_eq!(decode(b"s:2:\"hi\";"), Ok(Value::from("hi")));
    }

    #[test]
    fn test_long_range() {
        assert_eq!(decode(b"i:9223372036854775807;"), Ok(Value::Long(i64::MAX)));
        assert_eq!(decode(b"i:-9223372036854775808;"), Ok(Value::Long(i64::MIN)));
        assert_eq!(decode(b"i:007;"), Ok(Value::Long(7)));
        for input in [
            &b"i:9223372036854775808;"[..],
            b"i:;",
            b"i:-;",
            b"i:+1;",
            b"i:1.5;",
            b"i:12345678901234567890123;",
            b"i;5;",
        ] {
            let err = decode(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedLong, "input {:?}", input);
        }
    }

    #[test]
    fn test_double_roundtrip() {
        let test_values = [0.0, -0.0, 1.0, -1.5, 0.1, 3.14159, 1e300, 5e-324, f64::MAX, f64::MIN_POSITIVE];
        for v in test_values {
            let bytes = encode(&Value::Double(v));
            let decoded = decode(&bytes).unwrap();
            assert_eq!(decoded.as_double().map(f64::to_bits), Some(v.to_bits()), "failed for {}", v);
        }
    }

    #[test]
    fn test_double_special_values() {
        assert_eq!(encode(&Value::Double(f64::INFINITY)), b"d:INF;");
        assert_eq!(encode(&Value::Double(f64::NEG_INFINITY)), b"d:-INF;");
        assert_eq!(encode(&Value::Double(f64::NAN)), b"d:NAN;");
        assert_eq!(decode(b"d:INF;"), Ok(Value::Double(f64::INFINITY)));
        assert_eq!(decode(b"d:-INF;"), Ok(Value::Double(f64::NEG_INFINITY)));
        assert!(decode(b"d:NAN;").unwrap().as_double().is_some_and(f64::is_nan));
    }

    #[test]
    fn test_double_literal_forms() {
        assert_eq!(decode(b"d:1;"), Ok(Value::Double(1.0)));
        assert_eq!(decode(b"d:0.5;"), Ok(Value::Double(0.5)));
        assert_eq!(decode(b"d:1.0E+25;"), Ok(Value::Double(1.0e25)));
        assert_eq!(decode(b"d:-2.5e-3;"), Ok(Value::Double(-2.5e-3)));
        for input in [&b"d:;"[..], b"d:abc;", b"d:inf;", b"d:nan;", b"d:1..2;", b"d:0x10;"] {
            let err = decode(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedDouble, "input {:?}", input);
        }
    }

    #[test]
    fn test_malformed_nil_and_bool() {
        assert_eq!(decode(b"N:"), Err(DecodeError::MalformedNil { position: 1 }));
        assert_eq!(decode(b"b:2;"), Err(DecodeError::MalformedBool { position: 2 }));
        assert_eq!(decode(b"b:1:"), Err(DecodeError::MalformedBool { position: 3 }));
        assert_eq!(decode(b"b;1;"), Err(DecodeError::MalformedBool { position: 1 }));
        assert_eq!(decode(b"b:x;").unwrap_err().kind(), ErrorKind::MalformedBool);
    }

    #[test]
    fn test_string_is_byte_exact() {
        let payload = "h\u{e9}\0llo \u{1F600}".as_bytes().to_vec();
        let bytes = encode(&Value::Str(payload.clone()));
        let expected_prefix = format!("s:{}:\"", payload.len());
        assert!(bytes.starts_with(expected_prefix.as_bytes()));
        assert_eq!(decode(&bytes), Ok(Value::Str(payload)));

        // payload may contain the terminator sequence itself
        assert_eq!(decode(b"s:4:\"a\";b\";"), Ok(Value::from("a\";b")));
        assert_eq!(decode(b"s:2:\"\xff\xfe\";"), Ok(Value::Str(vec![0xff, 0xfe])));
    }

    #[test]
    fn test_string_length_mismatch() {
        let err = decode(b"s:5:\"abc\";").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedString);
        assert_eq!(err, DecodeError::LengthMismatch { declared: 5, position: 10 });

        let err = decode(b"s:2:\"abc\";").unwrap_err();
        assert_eq!(err, DecodeError::LengthMismatch { declared: 2, position: 7 });

        assert_eq!(
            decode(b"s:20:\"abc\";"),
            Err(DecodeError::Truncated { context: "string payload" })
        );
    }

    #[test]
    fn test_string_malformed_header() {
        for input in [&b"s:x:\"a\";"[..], b"s::\"\";", b"s:-1:\"\";", b"s;1:\"a\";", b"s:1:a\";"] {
            let err = decode(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedString, "input {:?}", input);
        }
    }

    #[test]
    fn test_array_literal() {
        let mut array = Array::new();
        array.set("0", 1);
        array.set("foo", "bar");
        let bytes = encode(&Value::Array(array.clone()));
        assert_eq!(bytes, b"a:2:{i:0;i:1;s:3:\"foo\";s:3:\"bar\";}");
        assert_eq!(decode(&bytes), Ok(Value::Array(array)));
    }

    #[test]
    fn test_array_key_canonicalization() {
        let mut array = Array::new();
        array.set("-7", 1);
        array.set("00", 2);
        array.set("01", 3);
        array.set("abc", 4);
        assert_eq!(
            encode(&Value::Array(array)),
            b"a:4:{i:-7;i:1;s:2:\"00\";i:2;s:2:\"01\";i:3;s:3:\"abc\";i:4;}"
        );

        // string keys that look numeric decode to the same canonical key
        let decoded = decode(b"a:1:{s:1:\"5\";N;}").unwrap();
        assert_eq!(decoded.as_array().and_then(|a| a.iget(5)), Some(&Value::Nil));
        assert_eq!(encode(&decoded), b"a:1:{i:5;N;}");
    }

    #[test]
    fn test_array_errors() {
        assert_eq!(decode(b"a:1:{i:0;"), Err(DecodeError::Truncated { context: "value tag" }));
        assert_eq!(
            decode(b"a:0:{]"),
            Err(DecodeError::MalformedArray { context: "missing '}'", position: 5 })
        );
        assert_eq!(
            decode(b"a:1:{b:1;i:0;}"),
            Err(DecodeError::InvalidKey { tag: b'b', position: 5 })
        );
        assert_eq!(
            decode(b"a:1:{x:1;i:0;}"),
            Err(DecodeError::UnknownType { tag: b'x', position: 5 })
        );
        assert_eq!(decode(b"a;1:{}").unwrap_err().kind(), ErrorKind::MalformedArray);
        assert_eq!(decode(b"a:1:[").unwrap_err().kind(), ErrorKind::MalformedArray);
        assert_eq!(decode(b"a:1:{i:0;N;i:1;N;}").unwrap_err().kind(), ErrorKind::MalformedArray);
    }

    #[test]
    fn test_unknown_type() {
        assert_eq!(decode(b"r:1;"), Err(DecodeError::UnknownType { tag: b'r', position: 0 }));
        assert_eq!(decode(b""), Err(DecodeError::Truncated { context: "value tag" }));
    }

    #[test]
    fn test_depth_limit() {
        let options = DecodeOptions::default().with_max_depth(2);
        let mut reader = Reader::new(b"a:1:{i:0;a:0:{}}");
        assert!(decode_value(&mut reader, &options, 0).is_ok());

        let mut reader = Reader::new(b"a:1:{i:0;a:1:{i:0;a:0:{}}}");
        assert_eq!(
            decode_value(&mut reader, &options, 0),
            Err(DecodeError::LimitExceeded { field: "nesting depth", len: 3, max: 2 })
        );
    }

    #[test]
    fn test_size_limits() {
        let options = DecodeOptions::default()
            .with_max_string_len(3)
            .with_max_container_len(1);

        let mut reader = Reader::new(b"s:4:\"abcd\";");
        assert_eq!(
            decode_value(&mut reader, &options, 0).unwrap_err().kind(),
            ErrorKind::LimitExceeded
        );

        let mut reader = Reader::new(b"a:2:{i:0;N;i:1;N;}");
        assert_eq!(
            decode_value(&mut reader, &options, 0),
            Err(DecodeError::LimitExceeded { field: "array count", len: 2, max: 1 })
        );

        // declared count larger than the input does not preallocate it
        let err = decode(b"a:16000000:{}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownType);
    }

    #[test]
    fn test_length_field_digit_limit() {
        let err = decode(b"s:99999999999999999999999:\"\";").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedString);
    }
}
