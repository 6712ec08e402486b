use std::fmt::Debug;

use super::{View, ViewElem};
use crate::error::Result;
use crate::object::{Column, Compressed, DenseArray, Elem, ElemKind, Layout, Mapping, Table};

/// A native container that can be wrapped as a view
///
/// `set_item` is the container's own, unintercepted mutation.
///
pub trait Container: Clone + Debug + PartialEq + Into<Elem> {
    type Key;
    type Value;

    const KIND: ElemKind;

    fn set_item(&mut self, key: Self::Key, value: Self::Value) -> Result<()>;

    /// A copy sharing no memory with `self`
    fn deep_copy(&self) -> Self;

    /// The container held by `elem`, if it is of this kind
    fn from_elem_mut(elem: &mut Elem) -> Option<&mut Self>;

    fn wrap_view(view: View<Self>) -> ViewElem;
}

impl Container for DenseArray {
    type Key = Vec<usize>;
    type Value = f64;

    const KIND: ElemKind = ElemKind::Array;

    fn set_item(&mut self, key: Vec<usize>, value: f64) -> Result<()> {
        self.set(&key, value)
    }

    fn deep_copy(&self) -> Self {
        DenseArray::deep_copy(self)
    }

    fn from_elem_mut(elem: &mut Elem) -> Option<&mut Self> {
        match elem {
            Elem::Array(x) => Some(x),
            _ => None,
        }
    }

    fn wrap_view(view: View<Self>) -> ViewElem {
        ViewElem::Array(view)
    }
}

impl<L: Layout> Container for Compressed<L> {
    type Key = (usize, usize);
    type Value = f64;

    const KIND: ElemKind = L::KIND;

    fn set_item(&mut self, (row, col): (usize, usize), value: f64) -> Result<()> {
        self.set(row, col, value)
    }

    fn deep_copy(&self) -> Self {
        self.clone()
    }

    fn from_elem_mut(elem: &mut Elem) -> Option<&mut Self> {
        L::unwrap_mut(elem)
    }

    fn wrap_view(view: View<Self>) -> ViewElem {
        L::wrap_view(view)
    }
}

impl Container for Mapping {
    type Key = String;
    type Value = Elem;

    const KIND: ElemKind = ElemKind::Mapping;

    fn set_item(&mut self, key: String, value: Elem) -> Result<()> {
        self.set(key, value);
        Ok(())
    }

    fn deep_copy(&self) -> Self {
        Mapping::deep_copy(self)
    }

    fn from_elem_mut(elem: &mut Elem) -> Option<&mut Self> {
        match elem {
            Elem::Mapping(x) => Some(x),
            _ => None,
        }
    }

    fn wrap_view(view: View<Self>) -> ViewElem {
        ViewElem::Dict(view)
    }
}

impl Container for Table {
    type Key = String;
    type Value = Column;

    const KIND: ElemKind = ElemKind::Table;

    fn set_item(&mut self, key: String, value: Column) -> Result<()> {
        self.set_column(key, value)
    }

    fn deep_copy(&self) -> Self {
        self.clone()
    }

    fn from_elem_mut(elem: &mut Elem) -> Option<&mut Self> {
        match elem {
            Elem::Table(x) => Some(x),
            _ => None,
        }
    }

    fn wrap_view(view: View<Self>) -> ViewElem {
        ViewElem::Table(view)
    }
}
