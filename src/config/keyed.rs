//! Identity-keyed collections.
//!
//! Device lists such as interfaces, MST instances and per-VLAN entries are
//! matched by a key field rather than by position. [`KeyedList`] stores them
//! in a map ordered by key and projects them back to a sequence on the wire.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ConfigError;

/// An entity identified by a key field that is unique within its list.
pub trait Keyed {
    /// Type of the key.
    type Key: Ord + Clone + fmt::Debug + fmt::Display;

    /// Name of the key field, used in error messages.
    const KEY_FIELD: &'static str;

    /// Returns the entity's key.
    fn key(&self) -> &Self::Key;
}

/// A list of entities with unique keys, kept in canonical key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedList<T: Keyed>(BTreeMap<T::Key, T>);

impl<T: Keyed> KeyedList<T> {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builds a list, rejecting duplicate keys.
    ///
    /// # Errors
    ///
    /// Returns an error if two items share a key.
    pub fn try_from_items(items: impl IntoIterator<Item = T>) -> Result<Self, ConfigError> {
        let mut map = BTreeMap::new();
        for item in items {
            let key = item.key().clone();
            if map.insert(key.clone(), item).is_some() {
                return Err(ConfigError::DuplicateKey {
                    list: T::KEY_FIELD.to_string(),
                    key: key.to_string(),
                });
            }
        }
        Ok(Self(map))
    }

    /// Looks up an entity by key.
    #[must_use]
    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.0.get(key)
    }

    /// Looks up an entity by key for modification.
    pub fn get_mut(&mut self, key: &T::Key) -> Option<&mut T> {
        self.0.get_mut(key)
    }

    /// Inserts an entity, replacing any entity with the same key.
    pub fn insert(&mut self, item: T) -> Option<T> {
        self.0.insert(item.key().clone(), item)
    }

    /// Removes the entity with the given key.
    pub fn remove(&mut self, key: &T::Key) -> Option<T> {
        self.0.remove(key)
    }

    /// Returns true if an entity with the key exists.
    #[must_use]
    pub fn contains_key(&self, key: &T::Key) -> bool {
        self.0.contains_key(key)
    }

    /// Iterates the entities in key order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.values()
    }

    /// Iterates the entities in key order for modification.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.0.values_mut()
    }

    /// Iterates the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &T::Key> {
        self.0.keys()
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Keyed> Default for KeyedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Later items replace earlier items with the same key.
impl<T: Keyed> FromIterator<T> for KeyedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for item in iter {
            list.insert(item);
        }
        list
    }
}

impl<T: Keyed> IntoIterator for KeyedList<T> {
    type Item = T;
    type IntoIter = std::collections::btree_map::IntoValues<T::Key, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_values()
    }
}

impl<T: Keyed + Serialize> Serialize for KeyedList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.values())
    }
}

impl<'de, T: Keyed + Deserialize<'de>> Deserialize<'de> for KeyedList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default();
        Self::try_from_items(items).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct Port {
        name: String,
        cost: u32,
    }

    impl Keyed for Port {
        type Key = String;
        const KEY_FIELD: &'static str = "name";

        fn key(&self) -> &String {
            &self.name
        }
    }

    fn port(name: &str, cost: u32) -> Port {
        Port {
            name: name.to_string(),
            cost,
        }
    }

    #[test]
    fn test_sorted_by_key() {
        let list: KeyedList<Port> = vec![port("Eth8", 1), port("Eth0", 2)].into_iter().collect();
        let names: Vec<&str> = list.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Eth0", "Eth8"]);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result = KeyedList::try_from_items(vec![port("Eth0", 1), port("Eth0", 2)]);
        assert!(matches!(result, Err(ConfigError::DuplicateKey { .. })));

        let parsed: std::result::Result<KeyedList<Port>, _> =
            serde_json::from_str(r#"[{"name":"a","cost":1},{"name":"a","cost":2}]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_null_is_empty() {
        let parsed: KeyedList<Port> = serde_json::from_str("null").unwrap();
        assert!(parsed.is_empty());
    }
}
