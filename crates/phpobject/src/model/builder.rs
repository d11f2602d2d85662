//! Builder API for ergonomic value construction.
//!
//! # Example
//!
//! ```rust
//! use phpobject::model::builder::{ArrayBuilder, ObjectBuilder};
//! use phpobject::Value;
//!
//! let user = ObjectBuilder::new("User")
//!     .public("name", "Alice")
//!     .protected("roles", ArrayBuilder::new().push("admin").push("dev"))
//!     .private("token", Value::Nil)
//!     .inherited("Model", "id", 42)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(user.len(), 4);
//! ```

use crate::error::ObjectError;
use crate::model::{Array, Object, Value, Visibility};

/// Builder for an [`Array`].
#[derive(Debug, Clone, Default)]
pub struct ArrayBuilder {
    array: Array,
}

impl ArrayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value at the next integer index.
    pub fn push(mut self, value: impl Into<Value>) -> Self {
        self.array.push(value);
        self
    }

    /// Sets a value under `key`.
    pub fn entry(mut self, key: impl AsRef<[u8]>, value: impl Into<Value>) -> Self {
        self.array.set(key, value);
        self
    }

    /// Sets a value at integer `index`.
    pub fn index(mut self, index: i64, value: impl Into<Value>) -> Self {
        self.array.iset(index, value);
        self
    }

    pub fn build(self) -> Array {
        self.array
    }
}

impl From<ArrayBuilder> for Value {
    fn from(builder: ArrayBuilder) -> Self {
        Value::Array(builder.build())
    }
}

/// Builder for an [`Object`].
///
/// Name validation errors are deferred: the first one is returned from
/// [`ObjectBuilder::build`] and later members are ignored.
#[derive(Debug, Clone)]
pub struct ObjectBuilder {
    object: Object,
    error: Option<ObjectError>,
}

impl ObjectBuilder {
    /// Creates a builder for an object of class `class`.
    pub fn new(class: &str) -> Self {
        match Object::try_new(class) {
            Ok(object) => Self { object, error: None },
            Err(err) => Self {
                object: Object::new(class),
                error: Some(err),
            },
        }
    }

    pub fn public(self, name: &str, value: impl Into<Value>) -> Self {
        self.member(name, Visibility::Public, value)
    }

    pub fn protected(self, name: &str, value: impl Into<Value>) -> Self {
        self.member(name, Visibility::Protected, value)
    }

    pub fn private(self, name: &str, value: impl Into<Value>) -> Self {
        self.member(name, Visibility::Private, value)
    }

    /// Adds a private member declared by the ancestor `declaring_class`.
    pub fn inherited(mut self, declaring_class: &str, name: &str, value: impl Into<Value>) -> Self {
        if self.error.is_none() {
            self.error = self.object.set_base_var(declaring_class, name, value).err();
        }
        self
    }

    fn member(mut self, name: &str, visibility: Visibility, value: impl Into<Value>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let result = match visibility {
            Visibility::Public => self.object.set_public_var(name, value),
            Visibility::Protected => self.object.set_protected_var(name, value),
            Visibility::Private | Visibility::InheritedPrivate => {
                self.object.set_private_var(name, value)
            }
        };
        self.error = result.err();
        self
    }

    pub fn build(self) -> Result<Object, ObjectError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.object),
        }
    }
}
