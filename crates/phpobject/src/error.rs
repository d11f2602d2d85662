//! Error types for serialize-format decoding and object construction.

use thiserror::Error;

/// Coarse classification of decode failures.
///
/// Several [`DecodeError`] variants may share a kind; for example a string
/// whose terminator does not follow its declared length is reported as
/// [`DecodeError::LengthMismatch`] but classifies as
/// [`ErrorKind::MalformedString`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Tag byte is not one of `N b i d s a O`.
    UnknownType,
    /// Input ended in the middle of a value.
    Truncated,
    MalformedNil,
    MalformedBool,
    MalformedLong,
    MalformedDouble,
    MalformedString,
    MalformedArray,
    MalformedObject,
    /// Array or member key is neither a string nor an integer.
    InvalidKey,
    /// Class or member name does not match `[A-Za-z_][A-Za-z0-9_]*`.
    InvalidIdentifier,
    /// Member key names a declaring class that cannot be dispatched.
    InvalidClassName,
    /// A depth or size limit from [`crate::DecodeOptions`] was hit.
    LimitExceeded,
    /// Bytes remain after the root value.
    TrailingData,
}

impl ErrorKind {
    /// Returns a short stable name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::UnknownType => "unknown-type",
            ErrorKind::Truncated => "truncated",
            ErrorKind::MalformedNil => "malformed-nil",
            ErrorKind::MalformedBool => "malformed-bool",
            ErrorKind::MalformedLong => "malformed-long",
            ErrorKind::MalformedDouble => "malformed-double",
            ErrorKind::MalformedString => "malformed-string",
            ErrorKind::MalformedArray => "malformed-array",
            ErrorKind::MalformedObject => "malformed-object",
            ErrorKind::InvalidKey => "invalid-key",
            ErrorKind::InvalidIdentifier => "invalid-identifier",
            ErrorKind::InvalidClassName => "invalid-class-name",
            ErrorKind::LimitExceeded => "limit-exceeded",
            ErrorKind::TrailingData => "trailing-data",
        }
    }
}

/// Error during decoding.
///
/// Positions are byte offsets from the start of the decoded input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown value type {} at byte {position}", show_tag(.tag))]
    UnknownType { tag: u8, position: usize },

    #[error("unexpected end of input while reading {context}")]
    Truncated { context: &'static str },

    #[error("malformed nil at byte {position}")]
    MalformedNil { position: usize },

    #[error("malformed bool at byte {position}")]
    MalformedBool { position: usize },

    #[error("malformed long at byte {position}")]
    MalformedLong { position: usize },

    #[error("malformed double at byte {position}")]
    MalformedDouble { position: usize },

    #[error("malformed string ({context}) at byte {position}")]
    MalformedString {
        context: &'static str,
        position: usize,
    },

    #[error("string of declared length {declared} is not terminated by '\";' at byte {position}")]
    LengthMismatch { declared: usize, position: usize },

    #[error("malformed array ({context}) at byte {position}")]
    MalformedArray {
        context: &'static str,
        position: usize,
    },

    #[error("malformed object ({context}) at byte {position}")]
    MalformedObject {
        context: &'static str,
        position: usize,
    },

    #[error("invalid key type {} at byte {position}", show_tag(.tag))]
    InvalidKey { tag: u8, position: usize },

    #[error("invalid identifier {name:?}")]
    InvalidIdentifier { name: String },

    #[error("invalid class name {name:?}")]
    InvalidClassName { name: String },

    #[error("{field} {len} exceeds maximum {max}")]
    LimitExceeded {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("unexpected trailing data at byte {position}")]
    TrailingData { position: usize },
}

impl DecodeError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::UnknownType { .. } => ErrorKind::UnknownType,
            DecodeError::Truncated { .. } => ErrorKind::Truncated,
            DecodeError::MalformedNil { .. } => ErrorKind::MalformedNil,
            DecodeError::MalformedBool { .. } => ErrorKind::MalformedBool,
            DecodeError::MalformedLong { .. } => ErrorKind::MalformedLong,
            DecodeError::MalformedDouble { .. } => ErrorKind::MalformedDouble,
            DecodeError::MalformedString { .. } | DecodeError::LengthMismatch { .. } => {
                ErrorKind::MalformedString
            }
            DecodeError::MalformedArray { .. } => ErrorKind::MalformedArray,
            DecodeError::MalformedObject { .. } => ErrorKind::MalformedObject,
            DecodeError::InvalidKey { .. } => ErrorKind::InvalidKey,
            DecodeError::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            DecodeError::InvalidClassName { .. } => ErrorKind::InvalidClassName,
            DecodeError::LimitExceeded { .. } => ErrorKind::LimitExceeded,
            DecodeError::TrailingData { .. } => ErrorKind::TrailingData,
        }
    }
}

impl From<ObjectError> for DecodeError {
    fn from(err: ObjectError) -> Self {
        match err {
            ObjectError::InvalidIdentifier { name } => DecodeError::InvalidIdentifier { name },
            ObjectError::InvalidClassName { name } => DecodeError::InvalidClassName { name },
        }
    }
}

/// Error raised by the named [`crate::Object`] mutators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    #[error("invalid identifier {name:?}")]
    InvalidIdentifier { name: String },

    #[error("invalid class name {name:?}")]
    InvalidClassName { name: String },
}

impl ObjectError {
    pub(crate) fn identifier(name: impl AsRef<[u8]>) -> Self {
        ObjectError::InvalidIdentifier {
            name: String::from_utf8_lossy(name.as_ref()).into_owned(),
        }
    }

    pub(crate) fn class_name(name: impl AsRef<[u8]>) -> Self {
        ObjectError::InvalidClassName {
            name: String::from_utf8_lossy(name.as_ref()).into_owned(),
        }
    }
}

fn show_tag(tag: &u8) -> String {
    if tag.is_ascii_graphic() {
        format!("'{}'", *tag as char)
    } else {
        format!("0x{tag:02x}")
    }
}
