//! phpobject: encoder and decoder for the PHP `serialize()` text format.
//!
//! This crate reads and writes the self-describing text format produced by
//! PHP's `serialize()`, including objects whose member keys carry their
//! visibility.
//!
//! # Overview
//!
//! Values are a closed set of kinds:
//! - **Scalars**: nil, boolean, 64-bit integer, double, byte string
//! - **Arrays**: ordered maps with canonical integer or string keys
//! - **Objects**: a class name plus public, protected, private and
//!   inherited private members
//!
//! # Quick Start
//!
//! ```rust
//! use phpobject::{serialize, unserialize, Array, Object, Value, Visibility};
//!
//! let mut tags = Array::new();
//! tags.push("admin");
//! tags.set("lead", true);
//!
//! let mut user = Object::new("User");
//! user.set_public_var("name", "Alice").unwrap();
//! user.set_protected_var("tags", tags).unwrap();
//! user.set_base_var("Model", "id", 42).unwrap();
//!
//! // Encode to the wire format
//! let bytes = serialize(&Value::Object(user.clone()));
//! assert!(bytes.starts_with(b"O:4:\"User\":3:{"));
//!
//! // Decode back
//! let decoded = unserialize(&bytes).unwrap();
//! let object = decoded.as_object().unwrap();
//! assert_eq!(object, &user);
//! assert_eq!(object.get_var("name"), Some((&Value::from("Alice"), Visibility::Public)));
//! assert_eq!(object.get_base_var("Model", "id"), Some(&Value::Long(42)));
//! ```
//!
//! # Modules
//!
//! - [`model`]: Core data types (Value, Array, Object, builders)
//! - [`codec`]: Encoding/decoding over slices and streams
//! - [`validate`]: Key and name predicates
//! - [`error`]: Error types
//! - [`limits`]: Security limits for decoding
//! - [`util`]: `print_r`-style rendering
//!
//! # Security
//!
//! The decoder is designed to safely handle untrusted input:
//! - Declared lengths and counts are bounded before any allocation
//! - Nesting depth is limited
//! - Invalid data is rejected with descriptive errors carrying byte offsets
//!
//! Limits are configurable through [`DecodeOptions`].

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod util;
pub mod validate;

// Re-export commonly used types at crate root
pub use codec::{
    serialize, serialize_to, unserialize, unserialize_from, unserialize_from_with_options,
    unserialize_with_options, DecodeOptions,
};
pub use error::{DecodeError, ErrorKind, ObjectError};
pub use model::{Array, ArrayBuilder, Member, Object, ObjectBuilder, Value, ValueType, Visibility};
pub use util::dump;
pub use validate::{is_identifier, is_numeric_key};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
