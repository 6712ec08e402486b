use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::error::{Error, Result};
use crate::object::{Attrs, Elem};

/// An object owning attributes that may be exposed as views
///
/// A root hands out copies of its attribute state and adopts a (mutated)
/// copy in its place once a view of it is written to.
///
pub trait Root {
    /// An independent copy of every attribute; views become plain containers
    fn copy_state(&self) -> Attrs;

    /// Replace the attribute state, after which the root is no longer a view
    fn init_as_actual(&self, attrs: Attrs);

    /// Attribute `name` of the object this root was subset from, or of the
    /// root itself when it is not a view
    fn original_attr(&self, name: &str) -> Option<Elem>;
}

/// Location of a view's container within its root
///
/// `attr` names the top-level attribute of the root and `keys` walk through
/// nested mappings from there. The root is held weakly; a view never keeps
/// its root alive.
///
#[derive(Clone)]
pub struct ElementRef {
    root: Weak<dyn Root>,
    attr: String,
    keys: Vec<String>,
}

impl ElementRef {
    pub fn new(root: Weak<dyn Root>, attr: impl Into<String>, keys: Vec<String>) -> Self {
        ElementRef {
            root,
            attr: attr.into(),
            keys,
        }
    }

    pub fn attr(&self) -> &str {
        &self.attr
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The reference to entry `key` of the mapping this refers to
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut keys = self.keys.clone();
        keys.push(key.into());
        ElementRef {
            root: self.root.clone(),
            attr: self.attr.clone(),
            keys,
        }
    }

    fn upgrade(&self) -> Result<Rc<dyn Root>> {
        self.root
            .upgrade()
            .ok_or_else(|| Error::RootDropped(self.attr.clone()))
    }

    /// Materialize the root and apply `f` to the referenced element
    ///
    /// The root's state is copied, `f` is given the element this reference
    /// points to within the copy, and the copy is then adopted by the root.
    /// The copy is adopted however `f` exits, including by returning an
    /// error or panicking. If the element cannot be found in the copy,
    /// nothing is adopted.
    ///
    pub fn update<R>(&self, f: impl FnOnce(&mut Elem) -> Result<R>) -> Result<R> {
        let root = self.upgrade()?;
        let mut scope = Commit {
            root: root.as_ref(),
            state: root.copy_state(),
            attr: &self.attr,
            armed: false,
        };

        let elem = scope.state.resolve_mut(&self.attr, &self.keys)?;
        scope.armed = true;
        f(elem)
    }

    /// An independent copy of the referenced element, taken from the object
    /// the root was subset from
    pub fn original(&self) -> Result<Elem> {
        let root = self.upgrade()?;
        let Some(mut elem) = root.original_attr(&self.attr) else {
            return Err(Error::structure(&self.attr, "root has no such attribute"));
        };

        for key in &self.keys {
            elem = match elem.as_mapping().and_then(|m| m.get(key)) {
                Some(child) => child.clone(),
                None => return Err(Error::structure(&self.attr, format!("key `{key}` not found"))),
            };
        }
        Ok(elem.deep_copy())
    }
}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("attr", &self.attr)
            .field("keys", &self.keys)
            .field("alive", &(self.root.strong_count() > 0))
            .finish()
    }
}

impl PartialEq for ElementRef {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.root, &other.root) && self.attr == other.attr && self.keys == other.keys
    }
}

/// Hands a materialized state back to its root when dropped
struct Commit<'a> {
    root: &'a dyn Root,
    state: Attrs,
    attr: &'a str,
    armed: bool,
}

impl Drop for Commit<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!(target: "annview::view", attr = self.attr, "adopting materialized copy");
            self.root.init_as_actual(std::mem::take(&mut self.state));
        }
    }
}
