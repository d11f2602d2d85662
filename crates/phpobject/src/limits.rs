//! Security limits for decoding.
//!
//! These bound the work a decoder performs on untrusted input. The
//! defaults can be overridden per call through [`crate::DecodeOptions`].

/// Default maximum nesting depth of arrays and objects.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Default maximum declared byte length of a string or class name (64 MiB).
pub const DEFAULT_MAX_STRING_LEN: usize = 64 * 1024 * 1024;

/// Default maximum declared entry count of an array or object.
pub const DEFAULT_MAX_CONTAINER_LEN: usize = 16 * 1024 * 1024;

/// Upper bound on entries preallocated from a declared count.
pub const MAX_PREALLOC_ENTRIES: usize = 1024;

/// Maximum number of digits in a length or count field.
pub const MAX_LENGTH_DIGITS: usize = 19;

/// Maximum number of digits in an integer value, excluding the sign.
pub const MAX_LONG_DIGITS: usize = 19;

/// Maximum byte length of a float literal.
pub const MAX_DOUBLE_LITERAL_LEN: usize = 64;
