use hashbrown::HashMap;

use super::Elem;
use crate::error::{Error, Result};

/// Attribute state of a root object
///
/// Maps each top-level attribute name to its element. Copying a root copies
/// its `Attrs`, and materializing a view hands a (mutated) copy back.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attrs(HashMap<String, Elem>);

impl Attrs {
    pub fn new() -> Self {
        Attrs(HashMap::new())
    }

    pub fn get(&self, name: &str) -> Option<&Elem> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Elem> {
        self.0.get_mut(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, elem: impl Into<Elem>) -> Option<Elem> {
        self.0.insert(name.into(), elem.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Elem)> {
        self.0.iter()
    }

    /// Attribute names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.0.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// A copy sharing no memory with `self`, with views copied into plain
    /// containers
    pub fn deep_copy(&self) -> Self {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.deep_copy()))
            .collect()
    }

    /// Walk from attribute `attr` through nested mappings along `keys`
    pub fn resolve_mut(&mut self, attr: &str, keys: &[String]) -> Result<&mut Elem> {
        let Some(mut elem) = self.0.get_mut(attr) else {
            return Err(Error::structure(attr, "root has no such attribute"));
        };

        for key in keys {
            elem = match elem {
                Elem::Mapping(m) => match m.get_mut(key) {
                    Some(child) => child,
                    None => return Err(Error::structure(attr, format!("key `{key}` not found"))),
                },
                other => {
                    let msg = format!("cannot look up key `{key}` in a {}", other.kind());
                    return Err(Error::structure(attr, msg));
                }
            };
        }
        Ok(elem)
    }
}

impl FromIterator<(String, Elem)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (String, Elem)>>(iter: I) -> Self {
        Attrs(iter.into_iter().collect())
    }
}
