//! OpenStreetMap tag handling: a deterministic key/value store with
//! `:`-separated hierarchical keys, plus a per-call read tracker so that a
//! transformation can report which recognized tags it never understood.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

mod key;
pub use key::TagKey;

/// A map from OSM tag keys to values. Makes copies of strings for
/// convenience; don't use in performance sensitive contexts.
//
// BTreeMap for deterministic iteration and serialization; output is compared
// directly in tests and cannot tolerate reordering.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Construct from key/value pairs, rejecting duplicate keys.
    pub fn from_pairs<'a, I: IntoIterator<Item = [&'a str; 2]>>(pairs: I) -> Result<Self> {
        let mut map = BTreeMap::new();
        for [key, value] in pairs {
            if map.insert(key.to_string(), value.to_string()).is_some() {
                bail!("duplicate tag key {}", key);
            }
        }
        Ok(Self(map))
    }

    pub fn from_pair(key: impl AsRef<str>, value: &str) -> Self {
        let mut map = BTreeMap::new();
        map.insert(key.as_ref().to_string(), value.to_string());
        Self(map)
    }

    /// Get the value for a key. Values come back trimmed; OSM data is full of
    /// stray whitespace.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        self.0.get(key.as_ref()).map(|v| v.as_str().trim())
    }

    /// Does the key have this value? Enumerated OSM values are compared
    /// case-insensitively.
    pub fn is(&self, key: impl AsRef<str>, value: &str) -> bool {
        self.get(key).map_or(false, |v| v.eq_ignore_ascii_case(value))
    }

    pub fn is_any(&self, key: impl AsRef<str>, values: &[&str]) -> bool {
        self.get(key)
            .map_or(false, |v| values.iter().any(|want| v.eq_ignore_ascii_case(want)))
    }

    /// The subset of these tags under the given keys. Missing keys are
    /// skipped.
    pub fn subset<T: AsRef<str>>(&self, keys: &[T]) -> Self {
        let mut map = BTreeMap::new();
        for key in keys {
            if let Some(value) = self.0.get(key.as_ref()) {
                map.insert(key.as_ref().to_string(), value.clone());
            }
        }
        Self(map)
    }

    /// Returns the old value if the key was already present.
    pub fn insert(&mut self, key: impl Into<TagKey>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into().as_str().to_string(), value.into())
    }

    /// Insert, rejecting duplicate keys.
    pub fn checked_insert(&mut self, key: impl Into<TagKey>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        if self.0.insert(key.as_str().to_string(), value.into()).is_some() {
            bail!("duplicate tag key {}", key);
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The tags as `key=value` strings.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().map(|(k, v)| format!("{}={}", k, v)).collect()
    }
}

impl FromStr for Tags {
    type Err = anyhow::Error;

    /// Parse `=` separated tag pairs from a newline separated list.
    ///
    /// ```
    /// use std::str::FromStr;
    /// use osm_tags::Tags;
    /// let tags = Tags::from_str("foo=bar\nabra=cadabra").unwrap();
    /// assert_eq!(tags.get("foo"), Some("bar"));
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        let mut map = BTreeMap::new();
        for line in s.lines() {
            let (key, value) = match line.split_once('=') {
                Some(kv) => kv,
                None => bail!("tag must be = separated: {}", line),
            };
            if map.insert(key.to_string(), value.to_string()).is_some() {
                bail!("duplicate tag key {}", key);
            }
        }
        Ok(Self(map))
    }
}

impl fmt::Display for Tags {
    /// The tags as a newline separated `key=value` list.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_vec().join("\n"))
    }
}

/// Read access to tags for a single transformation call.
///
/// Every key a parser inspects gets marked as used; `unused` returns the
/// keys nothing ever looked at, so the caller can distinguish recognized
/// tags that were ignored from foreign tags to pass through untouched. The
/// marks live only as long as the call, behind a `RefCell` so parsers can
/// share the source immutably.
pub struct TagSource<'t> {
    tags: &'t Tags,
    used: RefCell<BTreeSet<String>>,
}

impl<'t> TagSource<'t> {
    pub fn new(tags: &'t Tags) -> Self {
        Self {
            tags,
            used: RefCell::new(BTreeSet::new()),
        }
    }

    pub fn tags(&self) -> &'t Tags {
        self.tags
    }

    /// Read a value without marking the key as used.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&'t str> {
        self.tags.get(key)
    }

    /// Read a value and mark the key as used.
    pub fn get_consume(&self, key: impl AsRef<str>) -> Option<&'t str> {
        let key = key.as_ref();
        self.used.borrow_mut().insert(key.to_string());
        self.tags.get(key)
    }

    /// Does the key have this value? Marks the key as used.
    pub fn is(&self, key: impl AsRef<str>, value: &str) -> bool {
        self.get_consume(key.as_ref())
            .map_or(false, |v| v.eq_ignore_ascii_case(value))
    }

    /// Does the key have any of these values? Marks the key as used.
    pub fn is_any(&self, key: impl AsRef<str>, values: &[&str]) -> bool {
        self.get_consume(key.as_ref())
            .map_or(false, |v| values.iter().any(|want| v.eq_ignore_ascii_case(want)))
    }

    /// All present keys equal to `prefix` or underneath `prefix:`, marked as
    /// used.
    pub fn subtree(&self, prefix: impl AsRef<str>) -> Vec<(&'t str, &'t str)> {
        let prefix = prefix.as_ref();
        let mut used = self.used.borrow_mut();
        self.tags
            .iter()
            .filter(|&(k, _)| k == prefix || k.starts_with(prefix) && k[prefix.len()..].starts_with(':'))
            .map(|(k, v)| {
                used.insert(k.to_string());
                (k, v)
            })
            .collect()
    }

    /// Is any key equal to `prefix` or underneath `prefix:` present? Does not
    /// mark anything as used.
    pub fn has_subtree(&self, prefix: impl AsRef<str>) -> bool {
        let prefix = prefix.as_ref();
        self.tags
            .iter()
            .any(|(k, _)| k == prefix || k.starts_with(prefix) && k[prefix.len()..].starts_with(':'))
    }

    /// Mark a key as used without reading it.
    pub fn consume(&self, key: impl AsRef<str>) {
        self.used.borrow_mut().insert(key.as_ref().to_string());
    }

    /// The subset of the underlying tags under the given keys, for attaching
    /// to diagnostics. Does not mark anything as used.
    pub fn subset<T: AsRef<str>>(&self, keys: &[T]) -> Tags {
        self.tags.subset(keys)
    }

    /// Present keys that were never inspected.
    pub fn unused(&self) -> Vec<(&'t str, &'t str)> {
        let used = self.used.borrow();
        self.tags
            .iter()
            .filter(|(k, _)| !used.contains(*k))
            .collect()
    }
}
