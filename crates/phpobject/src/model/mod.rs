//! Data model types.
//!
//! This module contains the in-memory representation of serialized data:
//! - Values (the closed set of value kinds)
//! - Arrays (ordered key/value maps with canonical keys)
//! - Objects (class name plus visibility-tagged members)
//! - Builders (ergonomic construction)

pub mod array;
pub mod builder;
pub mod object;
pub mod value;

pub use array::Array;
pub use builder::{ArrayBuilder, ObjectBuilder};
pub use object::{Member, Object, Visibility};
pub use value::{Value, ValueType};
