//! Class-tagged objects with per-member visibility.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::ObjectError;
use crate::model::Value;
use crate::validate::{as_identifier, is_identifier};

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    /// Private to the object's own class.
    Private,
    /// Private to an ancestor of the object's class.
    InheritedPrivate,
}

impl Visibility {
    pub fn name(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
            Visibility::InheritedPrivate => "inherited-private",
        }
    }
}

/// A named member of an [`Object`].
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    name: String,
    visibility: Visibility,
    /// Set only for [`Visibility::InheritedPrivate`].
    declaring_class: Option<String>,
    value: Value,
}

impl Member {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Returns the ancestor class that declares an inherited private member.
    pub fn declaring_class(&self) -> Option<&str> {
        self.declaring_class.as_deref()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// An object: a class name plus visibility-tagged members.
///
/// Public, protected and private members share one slot per name, so
/// setting `x` as protected replaces a public `x`. Inherited private members
/// are keyed by their declaring class as well and never collide with the
/// other three.
#[derive(Debug, Clone, Default)]
pub struct Object {
    class: Vec<u8>,
    members: Vec<Member>,
    index: FxHashMap<String, usize>,
}

impl Object {
    /// Creates an empty object of class `class`.
    ///
    /// The class name is not validated, since decoded class names may hold
    /// arbitrary bytes. Use [`Object::try_new`] to require an identifier.
    pub fn new(class: impl AsRef<[u8]>) -> Self {
        Self {
            class: class.as_ref().to_vec(),
            members: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Creates an empty object, failing if `class` is not an identifier.
    pub fn try_new(class: &str) -> Result<Self, ObjectError> {
        if !is_identifier(class.as_bytes()) {
            return Err(ObjectError::class_name(class));
        }
        Ok(Self::new(class))
    }

    pub fn class_name(&self) -> &[u8] {
        &self.class
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates over members in insertion order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    pub fn set_public_var(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ObjectError> {
        self.set_var(name.as_bytes(), Visibility::Public, value.into())
    }

    pub fn set_protected_var(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ObjectError> {
        self.set_var(name.as_bytes(), Visibility::Protected, value.into())
    }

    pub fn set_private_var(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ObjectError> {
        self.set_var(name.as_bytes(), Visibility::Private, value.into())
    }

    /// Records a private member declared by `declaring_class`.
    ///
    /// If `declaring_class` is the object's own class the member is stored
    /// as [`Visibility::Private`].
    pub fn set_base_var(
        &mut self,
        declaring_class: &str,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), ObjectError> {
        self.set_base_var_bytes(declaring_class.as_bytes(), name.as_bytes(), value.into())
    }

    /// Sets a member from a demangled key.
    ///
    /// `class` selects the visibility: empty for public, `*` for protected,
    /// the object's own class for private, any other identifier for
    /// inherited private.
    pub fn set(
        &mut self,
        class: impl AsRef<[u8]>,
        name: impl AsRef<[u8]>,
        value: impl Into<Value>,
    ) -> Result<(), ObjectError> {
        let class = class.as_ref();
        let name = name.as_ref();
        let value = value.into();
        if class.is_empty() {
            self.set_var(name, Visibility::Public, value)
        } else if class == b"*" {
            self.set_var(name, Visibility::Protected, value)
        } else if class == self.class.as_slice() {
            self.set_var(name, Visibility::Private, value)
        } else if is_identifier(class) {
            self.set_base_var_bytes(class, name, value)
        } else {
            Err(ObjectError::class_name(class))
        }
    }

    /// Looks up a public, protected or private member.
    pub fn get_var(&self, name: &str) -> Option<(&Value, Visibility)> {
        self.index
            .get(name)
            .map(|&i| &self.members[i])
            .map(|m| (&m.value, m.visibility))
    }

    /// Looks up a private member declared by `declaring_class`.
    pub fn get_base_var(&self, declaring_class: &str, name: &str) -> Option<&Value> {
        if declaring_class.as_bytes() == self.class.as_slice() {
            return match self.get_var(name) {
                Some((value, Visibility::Private)) => Some(value),
                _ => None,
            };
        }
        self.index
            .get(&inherited_slot(declaring_class, name))
            .map(|&i| &self.members[i].value)
    }

    /// Returns the wire key for `member`, with the visibility mangled in.
    pub fn mangled_key(&self, member: &Member) -> Vec<u8> {
        let mut key = Vec::with_capacity(member.name.len() + self.class.len() + 2);
        match member.visibility {
            Visibility::Public => {}
            Visibility::Protected => key.extend_from_slice(b"\0*\0"),
            Visibility::Private => {
                key.push(0);
                key.extend_from_slice(&self.class);
                key.push(0);
            }
            Visibility::InheritedPrivate => {
                key.push(0);
                key.extend_from_slice(member.declaring_class.as_deref().unwrap_or_default().as_bytes());
                key.push(0);
            }
        }
        key.extend_from_slice(member.name.as_bytes());
        key
    }

    fn set_var(&mut self, name: &[u8], visibility: Visibility, value: Value) -> Result<(), ObjectError> {
        let name = as_identifier(name).ok_or_else(|| ObjectError::identifier(name))?;
        self.insert(name.to_string(), name, visibility, None, value);
        Ok(())
    }

    fn set_base_var_bytes(&mut self, class: &[u8], name: &[u8], value: Value) -> Result<(), ObjectError> {
        let name = as_identifier(name).ok_or_else(|| ObjectError::identifier(name))?;
        let class = as_identifier(class).ok_or_else(|| ObjectError::identifier(class))?;
        if class.as_bytes() == self.class.as_slice() {
            self.insert(name.to_string(), name, Visibility::Private, None, value);
        } else {
            self.insert(
                inherited_slot(class, name),
                name,
                Visibility::InheritedPrivate,
                Some(class.to_string()),
                value,
            );
        }
        Ok(())
    }

    fn insert(
        &mut self,
        slot: String,
        name: &str,
        visibility: Visibility,
        declaring_class: Option<String>,
        value: Value,
    ) {
        match self.index.get(&slot) {
            Some(&i) => {
                let member = &mut self.members[i];
                member.visibility = visibility;
                member.declaring_class = declaring_class;
                member.value = value;
            }
            None => {
                self.index.insert(slot, self.members.len());
                self.members.push(Member {
                    name: name.to_string(),
                    visibility,
                    declaring_class,
                    value,
                });
            }
        }
    }
}

/// Index key of an inherited private member.
fn inherited_slot(class: &str, name: &str) -> String {
    format!("\0{class}\0{name}")
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class
            && self.len() == other.len()
            && self.index.iter().all(|(slot, &i)| {
                other
                    .index
                    .get(slot)
                    .is_some_and(|&j| self.members[i] == other.members[j])
            })
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({}:{}) {{", String::from_utf8_lossy(&self.class), self.len())?;
        for m in &self.members {
            match (m.visibility, &m.declaring_class) {
                (Visibility::Protected, _) => write!(f, " -{} : {},", m.name, m.value)?,
                (Visibility::Private, _) => write!(f, " *{} : {},", m.name, m.value)?,
                (Visibility::InheritedPrivate, Some(class)) => {
                    write!(f, " {}*{} : {},", class, m.name, m.value)?
                }
                _ => write!(f, " {} : {},", m.name, m.value)?,
            }
        }
        f.write_str(" }")
    }
}
