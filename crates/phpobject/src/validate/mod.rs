//! Key and name predicates.
//!
//! These decide how array keys are written on the wire and which class and
//! member names an [`crate::Object`] accepts. They are pure functions over
//! byte slices and hold no state.

/// Returns true if `key` is an array key that is written as an integer.
///
/// A key is numeric when it is `"0"` or matches `-?[1-9][0-9]*` and its
/// value fits in an `i64`. Leading zeros (`"00"`, `"01"`) and negative zero
/// (`"-0"`) keep a key a string. Integers outside the `i64` range stay
/// strings so that every numeric key decodes back to the same text.
pub fn is_numeric_key(key: &[u8]) -> bool {
    if key == b"0" {
        return true;
    }
    let digits = match key.split_first() {
        Some((b'-', rest)) => rest,
        _ => key,
    };
    match digits.split_first() {
        Some((first, rest)) if (b'1'..=b'9').contains(first) => {
            if !rest.iter().all(u8::is_ascii_digit) {
                return false;
            }
        }
        _ => return false,
    }
    // all ASCII at this point
    std::str::from_utf8(key)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .is_some()
}

/// Returns true if `name` matches `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(name: &[u8]) -> bool {
    match name.split_first() {
        Some((first, rest)) => {
            (first.is_ascii_alphabetic() || *first == b'_')
                && rest.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'_')
        }
        None => false,
    }
}

/// Returns `name` as a `&str` if it is a valid identifier.
pub fn as_identifier(name: &[u8]) -> Option<&str> {
    if is_identifier(name) {
        std::str::from_utf8(name).ok()
    } else {
        None
    }
}
