//! Ordered associative array.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::model::Value;
use crate::validate::is_numeric_key;

/// Mapping from canonical byte-string keys to values.
///
/// Entries keep their insertion order, which fixes the order they are
/// written in. Equality ignores order: two arrays are equal when they hold
/// the same key/value pairs.
///
/// Keys are stored in canonical text form. A key that passes
/// [`is_numeric_key`] is written on the wire as an integer, every other key
/// as a string.
#[derive(Debug, Clone, Default)]
pub struct Array {
    entries: Vec<(Vec<u8>, Value)>,
    index: FxHashMap<Vec<u8>, usize>,
}

impl Array {
    /// Creates an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty array with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Inserts or overwrites the entry for `key`.
    ///
    /// Returns whether `key` is numeric. Overwriting keeps the entry's
    /// original position.
    pub fn set(&mut self, key: impl AsRef<[u8]>, value: impl Into<Value>) -> bool {
        let key = key.as_ref();
        let value = value.into();
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.to_vec(), self.entries.len());
                self.entries.push((key.to_vec(), value));
            }
        }
        is_numeric_key(key)
    }

    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&Value> {
        self.index.get(key.as_ref()).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: impl AsRef<[u8]>) -> Option<&mut Value> {
        match self.index.get(key.as_ref()) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    /// Sets the entry at integer `index`.
    pub fn iset(&mut self, index: i64, value: impl Into<Value>) -> bool {
        self.set(index.to_string(), value)
    }

    /// Gets the entry at integer `index`.
    pub fn iget(&self, index: i64) -> Option<&Value> {
        self.get(index.to_string())
    }

    /// Appends `value` at [`Array::next_index`] and returns the index used.
    pub fn push(&mut self, value: impl Into<Value>) -> i64 {
        let index = self.next_index();
        self.iset(index, value);
        index
    }

    /// Returns one past the largest numeric key, or 0 if there is none.
    ///
    /// Saturates at `i64::MAX`.
    pub fn next_index(&self) -> i64 {
        self.entries
            .iter()
            .filter(|(k, _)| is_numeric_key(k))
            .filter_map(|(k, _)| std::str::from_utf8(k).ok()?.parse::<i64>().ok())
            .max()
            .map_or(0, |max| max.saturating_add(1).max(0))
    }

    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.index.contains_key(key.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_slice(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.iter().map(|(k, _)| k.as_slice())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| o == v))
    }
}

impl<K: AsRef<[u8]>, V: Into<Value>> FromIterator<(K, V)> for Array {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut array = Array::new();
        for (k, v) in iter {
            array.set(k, v);
        }
        array
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Array({}) [", self.len())?;
        for (k, v) in self.iter() {
            write!(f, " {} : {},", String::from_utf8_lossy(k), v)?;
        }
        f.write_str(" ]")
    }
}
