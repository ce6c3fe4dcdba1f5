//! String metadata attached to matrices.

use std::collections::BTreeMap;
use std::fmt;

/// Separator between keys and values in serialized metadata.
pub const META_SEPARATOR: &str = "||";

/// Sorted key to value map. `|` is stripped from keys and values on insert so
/// the serialized form stays unambiguous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meta {
    entries: BTreeMap<String, String>,
}

fn strip_bars(s: &str) -> String {
    s.chars().filter(|&c| c != '|').collect()
}

impl Meta {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or overwrite `key`.
    pub fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(strip_bars(key), strip_bars(value));
    }

    /// The value for `key`, if stored.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// True if `key` is stored.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Copy every entry of `other` into this map, overwriting duplicates.
    pub fn extend_from(&mut self, other: &Meta) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    /// Encode as `key||value||key||value||`.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (k, v) in &self.entries {
            out.push_str(k);
            out.push_str(META_SEPARATOR);
            out.push_str(v);
            out.push_str(META_SEPARATOR);
        }
        out
    }

    /// Decode a string produced by [`Meta::serialize`] and merge it into this map.
    ///
    /// Pieces between separators pair up in order, so empty values survive. A
    /// trailing key without a value maps to the empty string.
    pub fn deserialize(&mut self, s: &str) {
        let mut parts: Vec<&str> = s.split(META_SEPARATOR).collect();
        if parts.last() == Some(&"") {
            parts.pop();
        }
        let mut parts = parts.into_iter();
        while let Some(key) = parts.next() {
            let value = parts.next().unwrap_or("");
            self.entries.insert(key.to_owned(), value.to_owned());
        }
    }

    /// Build a map from serialized form.
    pub fn from_serialized(s: &str) -> Self {
        let mut meta = Self::new();
        meta.deserialize(s);
        meta
    }
}

impl fmt::Display for Meta {
    /// One `key = value` line per entry.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, v) in &self.entries {
            writeln!(f, "{} = {}", k, v)?;
        }
        Ok(())
    }
}
