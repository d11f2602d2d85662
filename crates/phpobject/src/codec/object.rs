//! Object encoding/decoding.
//!
//! Member keys carry the member's visibility:
//!
//! ```text
//! public      name
//! protected   \0*\0name
//! private     \0<own class>\0name
//! inherited   \0<declaring class>\0name
//! ```
//!
//! Telling private from inherited private needs the object's own class, so
//! the class header is always parsed before any member key.

use crate::codec::document::DecodeOptions;
use crate::codec::primitives::{Source, Writer};
use crate::codec::value::{
    check_container_len, decode_key, decode_value, encode_str, encode_value, enter_container,
    read_length,
};
use crate::error::DecodeError;
use crate::model::Object;

// =============================================================================
// DECODING
// =============================================================================

/// Decodes the body of an object after its `O` tag.
pub(crate) fn decode_object<S: Source>(
    src: &mut S,
    options: &DecodeOptions,
    depth: usize,
) -> Result<Object, DecodeError> {
    let depth = enter_container(depth, options)?;
    expect(src, b':', "missing ':' after tag")?;
    let class_len = read_length(src, b':', "class name length", |position| {
        DecodeError::MalformedObject {
            context: "class name length",
            position,
        }
    })?;
    if class_len > options.max_string_len {
        return Err(DecodeError::LimitExceeded {
            field: "class name length",
            len: class_len,
            max: options.max_string_len,
        });
    }
    expect(src, b'"', "missing class name opening quote")?;
    let class = src.read_bytes(class_len, "class name")?;
    expect(src, b'"', "missing class name closing quote")?;
    expect(src, b':', "missing ':' after class name")?;

    let count = read_length(src, b':', "member count", |position| DecodeError::MalformedObject {
        context: "member count",
        position,
    })?;
    check_container_len(count, "member count", options)?;
    expect(src, b'{', "missing '{'")?;

    let mut object = Object::new(class);
    for _ in 0..count {
        let position = src.position();
        let key = decode_key(src, options)?;
        let (declaring_class, name) = demangle(&key).ok_or(DecodeError::MalformedObject {
            context: "mangled member key",
            position,
        })?;
        let value = decode_value(src, options, depth)?;
        object.set(declaring_class, name, value)?;
    }

    expect(src, b'}', "missing '}'")?;
    Ok(object)
}

/// Splits a member key into its class part and member name.
///
/// The class part is empty for public members and `*` for protected ones.
/// Returns `None` for a key with a leading NUL but no separator.
pub fn demangle(key: &[u8]) -> Option<(&[u8], &[u8])> {
    match key.split_first() {
        Some((&0, rest)) => {
            let sep = rest.iter().position(|&b| b == 0)?;
            Some((&rest[..sep], &rest[sep + 1..]))
        }
        _ => Some((&key[..0], key)),
    }
}

fn expect<S: Source>(src: &mut S, expected: u8, context: &'static str) -> Result<(), DecodeError> {
    let position = src.position();
    if src.read_byte("object")? != expected {
        return Err(DecodeError::MalformedObject { context, position });
    }
    Ok(())
}

// =============================================================================
// ENCODING
// =============================================================================

pub(crate) fn encode_object(writer: &mut Writer, object: &Object) {
    writer.write_bytes(b"O:");
    writer.write_usize(object.class_name().len());
    writer.write_bytes(b":\"");
    writer.write_bytes(object.class_name());
    writer.write_bytes(b"\":");
    writer.write_usize(object.len());
    writer.write_bytes(b":{");
    for member in object.members() {
        encode_str(writer, &object.mangled_key(member));
        encode_value(writer, member.value());
    }
    writer.write_byte(b'}');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::primitives::Reader;
    use crate::error::ErrorKind;
    use crate::model::{Value, Visibility};

    fn encode(object: &Object) -> Vec<u8> {
        let mut writer = Writer::new();
        encode_object(&mut writer, object);
        writer.into_bytes()
    }

    fn decode(input: &[u8]) -> Result<Value, DecodeError> {
        let mut reader = Reader::new(input);
        decode_value(&mut reader, &DecodeOptions::default(), 0)
    }

    fn sample() -> Object {
        let mut object = Object::new("Child");
        object.set_public_var("a", 1).unwrap();
        object.set_protected_var("b", 2).unwrap();
        object.set_private_var("c", 3).unwrap();
        object.set_base_var("Parent", "d", 4).unwrap();
        object
    }

    #[test]
    fn test_demangle() {
        assert_eq!(demangle(b"name"), Some((&b""[..], &b"name"[..])));
        assert_eq!(demangle(b"\0*\0name"), Some((&b"*"[..], &b"name"[..])));
        assert_eq!(demangle(b"\0Foo\0name"), Some((&b"Foo"[..], &b"name"[..])));
        assert_eq!(demangle(b"\0\0name"), Some((&b""[..], &b"name"[..])));
        assert_eq!(demangle(b"\0Foo"), None);
        assert_eq!(demangle(b""), Some((&b""[..], &b""[..])));
    }

    #[test]
    fn test_encode_mangles_keys() {
        let bytes = encode(&sample());
        assert_eq!(
            bytes,
            b"O:5:\"Child\":4:{\
              s:1:\"a\";i:1;\
              s:4:\"\0*\0b\";i:2;\
              s:8:\"\0Child\0c\";i:3;\
              s:9:\"\0Parent\0d\";i:4;}"
        );
    }

    #[test]
    fn test_visibility_roundtrip() {
        let object = sample();
        let decoded = decode(&encode(&object)).unwrap();
        let decoded = decoded.as_object().unwrap();

        assert_eq!(decoded, &object);
        assert_eq!(decoded.class_name(), b"Child");
        assert_eq!(decoded.get_var("a"), Some((&Value::Long(1), Visibility::Public)));
        assert_eq!(decoded.get_var("b"), Some((&Value::Long(2), Visibility::Protected)));
        assert_eq!(decoded.get_var("c"), Some((&Value::Long(3), Visibility::Private)));
        assert_eq!(decoded.get_base_var("Parent", "d"), Some(&Value::Long(4)));
    }

    #[test]
    fn test_empty_object() {
        let object = Object::new("stdClass");
        assert_eq!(encode(&object), b"O:8:\"stdClass\":0:{}");
        assert_eq!(decode(b"O:8:\"stdClass\":0:{}"), Ok(Value::Object(object)));
    }

    #[test]
    fn test_nested_object() {
        let mut inner = Object::new("Inner");
        inner.set_public_var("x", "y").unwrap();
        let mut outer = Object::new("Outer");
        outer.set_private_var("inner", inner).unwrap();

        let value = Value::Object(outer);
        let mut writer = Writer::new();
        encode_value(&mut writer, &value);
        assert_eq!(decode(writer.as_bytes()), Ok(value));
    }

    #[test]
    fn test_rejects_bad_member_names() {
        assert_eq!(
            decode(b"O:1:\"A\":1:{s:3:\"a b\";N;}"),
            Err(DecodeError::InvalidIdentifier { name: "a b".into() })
        );
        assert_eq!(
            decode(b"O:1:\"A\":1:{i:0;N;}"),
            Err(DecodeError::InvalidIdentifier { name: "0".into() })
        );
        assert_eq!(
            decode(b"O:1:\"A\":1:{s:6:\"\0B-C\0x\";N;}"),
            Err(DecodeError::InvalidClassName { name: "B-C".into() })
        );
        assert_eq!(
            decode(b"O:1:\"A\":1:{s:4:\"\0Bxy\";N;}"),
            Err(DecodeError::MalformedObject { context: "mangled member key", position: 11 })
        );
    }

    #[test]
    fn test_malformed_object_header() {
        for input in [
            &b"O;1:\"A\":0:{}"[..],
            b"O:x:\"A\":0:{}",
            b"O:1:A\":0:{}",
            b"O:1:\"AB:0:{}",
            b"O:1:\"A\";0:{}",
            b"O:1:\"A\":0:[}",
            b"O:1:\"A\":0:{]",
        ] {
            let err = decode(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedObject, "input {:?}", input);
        }
    }

    #[test]
    fn test_truncated_object() {
        for input in [&b"O:1:\"A\""[..], b"O:1:\"A\":1:{s:1:\"a\";", b"O:1:\"A\":0:{"] {
            assert_eq!(decode(input).unwrap_err().kind(), ErrorKind::Truncated, "input {:?}", input);
        }
    }

    #[test]
    fn test_non_identifier_class_name() {
        // class names are taken verbatim; only member keys are validated
        let decoded = decode(b"O:8:\"App\\User\":1:{s:11:\"\0App\\User\0x\";i:1;}").unwrap();
        let object = decoded.as_object().unwrap();
        assert_eq!(object.class_name(), b"App\\User");
        assert_eq!(object.get_var("x"), Some((&Value::Long(1), Visibility::Private)));
    }

    #[test]
    fn test_object_limits() {
        let options = DecodeOptions::default().with_max_string_len(2);
        let mut reader = Reader::new(b"O:3:\"Abc\":0:{}");
        assert_eq!(
            decode_value(&mut reader, &options, 0),
            Err(DecodeError::LimitExceeded { field: "class name length", len: 3, max: 2 })
        );

        let options = DecodeOptions::default().with_max_depth(0);
        let mut reader = Reader::new(b"O:1:\"A\":0:{}");
        assert_eq!(
            decode_value(&mut reader, &options, 0).unwrap_err().kind(),
            ErrorKind::LimitExceeded
        );
    }
}
