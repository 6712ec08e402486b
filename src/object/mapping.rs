use hashbrown::HashMap;

use super::index::Index;
use super::Elem;
use crate::error::Result;

/// String keyed store of elements
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping(HashMap<String, Elem>);

impl Mapping {
    pub fn new() -> Self {
        Mapping(HashMap::new())
    }

    /// Builder-style insertion
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Elem>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Elem> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Elem> {
        self.0.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert or replace an entry, returning the previous one
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Elem>) -> Option<Elem> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Elem> {
        self.0.remove(key)
    }

    /// Keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.0.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Elem)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn deep_copy(&self) -> Self {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.deep_copy()))
            .collect()
    }

    /// Subset every entry along the same axes
    pub fn subset(&self, rows: Option<&Index>, cols: Option<&Index>) -> Result<Self> {
        self.0
            .iter()
            .map(|(k, v)| v.subset(rows, cols).map(|v| (k.clone(), v)))
            .collect()
    }
}

impl FromIterator<(String, Elem)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, Elem)>>(iter: I) -> Self {
        Mapping(iter.into_iter().collect())
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Elem);
    type IntoIter = hashbrown::hash_map::IntoIter<String, Elem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
