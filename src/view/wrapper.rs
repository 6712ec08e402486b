use std::ops::Deref;

use tracing::warn;

use super::{Container, ElementRef};
use crate::error::{Error, Result};

/// A native container exposed as a view into a root
///
/// Reads go straight to the wrapped container. Writes go through
/// [`View::set_item`] and friends: when the view refers to a root, the root
/// is first materialized into an independent copy and the write is applied
/// to that copy instead. The view itself is left untouched, so it keeps
/// showing the data as it was before the write.
///
/// Without a reference (`view_args` is `None`) writes go to the wrapped
/// container directly.
///
#[derive(Debug, Clone, PartialEq)]
pub struct View<T> {
    pub(crate) data: T,
    pub(crate) view_args: Option<ElementRef>,
}

impl<T: Container> View<T> {
    pub fn new(data: T, view_args: Option<ElementRef>) -> Self {
        View { data, view_args }
    }

    pub fn view_args(&self) -> Option<&ElementRef> {
        self.view_args.as_ref()
    }

    pub fn is_view(&self) -> bool {
        self.view_args.is_some()
    }

    /// Assign `value` at `key`
    pub fn set_item(&mut self, key: T::Key, value: T::Value) -> Result<()> {
        self.intercept(|x| x.set_item(key, value))
    }

    /// Apply a mutation to the container this view stands for
    pub(crate) fn intercept<R>(&mut self, f: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
        let Some(args) = &self.view_args else {
            return f(&mut self.data);
        };

        warn!(
            target: "annview::view",
            attr = args.attr(),
            "Trying to modify attribute `.{}` of view, initializing view as actual.",
            args.attr()
        );

        args.update(|elem| {
            let found = elem.kind();
            match T::from_elem_mut(elem) {
                Some(live) => f(live),
                None => Err(Error::structure(
                    args.attr(),
                    format!("expected {}, found {found}", T::KIND),
                )),
            }
        })
    }

    /// An independent, plain copy of the current data
    pub fn copy(&self) -> T {
        self.data.deep_copy()
    }

    /// An independent copy of the container this view was taken from
    ///
    /// For a view this is the element of the object its root was subset
    /// from, not the subset data the view currently shows.
    ///
    pub fn deep_copy(&self) -> Result<T> {
        let Some(args) = &self.view_args else {
            return Ok(self.copy());
        };

        let mut original = args.original()?;
        let found = original.kind();
        match T::from_elem_mut(&mut original) {
            Some(x) => Ok(x.clone()),
            None => Err(Error::UnexpectedKind {
                expected: T::KIND,
                found,
            }),
        }
    }

    /// Unwrap the container without copying it
    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T> Deref for View<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}
