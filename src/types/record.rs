//! Decoded record: name to value mapping in schema order

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

use super::{FromValue, Value};
use crate::{CodecError, Result};

/// Mapping from field name to decoded value.
///
/// Iteration follows insertion order, which for decoded records is schema
/// order. Inserting an existing name replaces the value in place. Equality
/// compares name/value pairs and ignores order.
#[derive(Debug, Clone, Default)]
pub struct Record {
    entries: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity), index: HashMap::with_capacity(capacity) }
    }

    /// Insert a value, returning the one it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.index.get(&name) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, value)),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Remove a field, keeping the order of the remaining ones.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let position = self.index.remove(name)?;
        let (_, value) = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(value)
    }

    /// Raw value lookup.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.index.get(name).map(|&position| &self.entries[position].1)
    }

    /// Generic typed lookup by field name.
    /// Returns None if the field is missing or type conversion fails.
    pub fn get<T: FromValue>(&self, name: &str) -> Option<T> {
        T::from_value(self.value(name)?).ok()
    }

    /// Typed lookup that reports why the value is unavailable.
    pub fn require<T: FromValue>(&self, name: &str) -> Result<T> {
        let value = self.value(name).ok_or_else(|| CodecError::missing_field(name))?;
        T::from_value(value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Names of select fields holding an index outside their option list.
    pub fn unknown_options(&self) -> Vec<&str> {
        self.iter().filter(|(_, value)| value.is_unknown_option()).map(|(name, _)| name).collect()
    }

    /// Names whose value differs from `other`, including names only one side has.
    /// Order follows `self`, then names only present in `other`.
    pub fn changed_fields<'a>(&'a self, other: &'a Record) -> Vec<&'a str> {
        let mut changed: Vec<&str> = self
            .iter()
            .filter(|(name, value)| other.value(name) != Some(*value))
            .map(|(name, _)| name)
            .collect();
        changed.extend(other.names().filter(|name| !self.contains(name)));
        changed
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(name, value)| other.value(name) == Some(value))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        record.extend(iter);
        record
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Record {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_is_kept_and_duplicates_replace_in_place() {
        let mut record = Record::new();
        record.insert("b", 1u8);
        record.insert("a", 2u8);
        assert_eq!(record.insert("b", 3u8), Some(Value::UInt8(1)));
        assert_eq!(record.names().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(record.get::<u8>("b"), Some(3));
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let forward: Record = [("a", 1u8), ("b", 2u8)].into_iter().collect();
        let reversed: Record = [("b", 2u8), ("a", 1u8)].into_iter().collect();
        assert_eq!(forward, reversed);

        let edited: Record = [("b", 3u8), ("a", 1u8)].into_iter().collect();
        assert_ne!(forward, edited);

        let mut extra = forward.clone();
        extra.insert("c", 0u8);
        assert_ne!(forward, extra);
        assert_ne!(extra, forward);
    }

    #[test]
    fn remove_reindexes_later_entries() {
        let mut record: Record = [("a", 1u8), ("b", 2u8), ("c", 3u8)].into_iter().collect();
        assert_eq!(record.remove("a"), Some(Value::UInt8(1)));
        assert_eq!(record.get::<u8>("c"), Some(3));
        assert_eq!(record.names().collect::<Vec<_>>(), ["b", "c"]);
        assert_eq!(record.remove("a"), None);
    }

    #[test]
    fn require_reports_missing_fields() {
        let record: Record = [("port", 80u16)].into_iter().collect();
        assert_eq!(record.require::<u16>("port").unwrap(), 80);
        assert!(matches!(
            record.require::<u16>("ssid"),
            Err(CodecError::MissingField { field }) if field == "ssid"
        ));
    }

    #[test]
    fn changed_fields_reports_edits_and_extra_keys() {
        let before: Record = [("a", 1u8), ("b", 2u8)].into_iter().collect();
        let mut after = before.clone();
        after.insert("b", 5u8);
        after.insert("c", 0u8);
        assert_eq!(before.changed_fields(&after), ["b", "c"]);
        assert!(before.changed_fields(&before).is_empty());
    }

    #[test]
    fn unknown_options_are_listed() {
        let mut record = Record::new();
        record.insert("mode", Value::Select { index: 5, known: false });
        record.insert("led", Value::Select { index: 0, known: true });
        assert_eq!(record.unknown_options(), ["mode"]);
    }
}
