/// Store
///
/// A minimal root object: a set of named attributes, each aligned to the
/// rows (`obs`), the columns (`var`), both, or neither of a two dimensional
/// shape. Subsetting a store produces a view store whose attributes are
/// views referring back to it; writing to any of those views turns the view
/// store into an actual one without touching the store it was taken from.
///
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use hashbrown::HashMap;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::object::index::{compose_pair, Index};
use crate::object::{Attrs, Elem, ElemKind, Mapping};
use crate::view::{as_view, ElementRef, Root};

/// Alignment of an attribute to the axes of its store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Axes {
    /// First axis follows the store's rows
    Obs,
    /// First axis follows the store's columns
    Var,
    /// First axis follows rows, second follows columns
    Both,
    #[default]
    Unaligned,
}

impl Axes {
    /// The (first axis, second axis) indices for an attribute with this
    /// alignment, given the store's (row, column) indices
    pub fn select<'a>(self, obs: &'a Index, var: &'a Index) -> (Option<&'a Index>, Option<&'a Index>) {
        match self {
            Axes::Obs => (Some(obs), None),
            Axes::Var => (Some(var), None),
            Axes::Both => (Some(obs), Some(var)),
            Axes::Unaligned => (None, None),
        }
    }

    /// Expected lengths of the aligned axes
    fn lengths(self, (n_obs, n_vars): (usize, usize)) -> Vec<usize> {
        match self {
            Axes::Obs => vec![n_obs],
            Axes::Var => vec![n_vars],
            Axes::Both => vec![n_obs, n_vars],
            Axes::Unaligned => Vec::new(),
        }
    }
}

/// The store a view store was subset from, and how
#[derive(Debug)]
struct Reference {
    store: Store,
    obs: Index,
    var: Index,
}

#[derive(Debug)]
struct StoreState {
    shape: (usize, usize),
    attrs: Attrs,
    axes: HashMap<String, Axes>,
    reference: Option<Reference>,
}

#[derive(Debug)]
struct StoreCell(RefCell<StoreState>);

impl Root for StoreCell {
    fn copy_state(&self) -> Attrs {
        self.0.borrow().attrs.deep_copy()
    }

    fn init_as_actual(&self, attrs: Attrs) {
        let mut state = self.0.borrow_mut();
        state.attrs = attrs;
        state.reference = None;
        debug!(target: "annview::store", shape = ?state.shape, "initialized view as actual");
    }

    fn original_attr(&self, name: &str) -> Option<Elem> {
        let state = self.0.borrow();
        match &state.reference {
            Some(reference) => reference.store.attr(name),
            None => state.attrs.get(name).cloned(),
        }
    }
}

/// Handle to a shared store; clones refer to the same store
#[derive(Debug, Clone)]
pub struct Store(Rc<StoreCell>);

impl Store {
    pub fn new(n_obs: usize, n_vars: usize) -> Self {
        Store::from_state(StoreState {
            shape: (n_obs, n_vars),
            attrs: Attrs::new(),
            axes: HashMap::new(),
            reference: None,
        })
    }

    fn from_state(state: StoreState) -> Self {
        Store(Rc::new(StoreCell(RefCell::new(state))))
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        self.0 .0.borrow().shape
    }

    pub fn is_view(&self) -> bool {
        self.0 .0.borrow().reference.is_some()
    }

    /// The (row, column) indices this view was taken with, relative to the
    /// store it refers to
    pub fn view_indices(&self) -> Option<(Index, Index)> {
        let state = self.0 .0.borrow();
        let reference = state.reference.as_ref()?;
        Some((reference.obs.clone(), reference.var.clone()))
    }

    pub fn attr(&self, name: &str) -> Option<Elem> {
        self.0 .0.borrow().attrs.get(name).cloned()
    }

    pub fn axes(&self, name: &str) -> Option<Axes> {
        self.0 .0.borrow().axes.get(name).copied()
    }

    pub fn attr_names(&self) -> Vec<String> {
        let state = self.0 .0.borrow();
        state.attrs.names().into_iter().map(String::from).collect()
    }

    /// Weak handle used by views to refer back to this store
    pub fn as_root(&self) -> Weak<dyn Root> {
        let weak: Weak<dyn Root> = Rc::downgrade(&self.0) as Weak<dyn Root>;
        weak
    }

    /// Whether both handles refer to the same store
    pub fn ptr_eq(&self, other: &Store) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// An independent, actual store with the same contents
    pub fn copy(&self) -> Store {
        let state = self.0 .0.borrow();
        Store::from_state(StoreState {
            shape: state.shape,
            attrs: state.attrs.deep_copy(),
            axes: state.axes.clone(),
            reference: None,
        })
    }

    /// Set an attribute, checking the lengths of its aligned axes
    ///
    /// Setting an attribute of a view store first makes it actual.
    ///
    pub fn insert(&self, name: impl Into<String>, axes: Axes, elem: impl Into<Elem>) -> Result<()> {
        let (name, elem) = (name.into(), elem.into());
        if let Elem::Value(_) = elem {
            return Err(Error::UnexpectedKind {
                expected: ElemKind::Mapping,
                found: ElemKind::Value,
            });
        }
        check_aligned(&name, &axes.lengths(self.shape()), &elem)?;

        if self.is_view() {
            warn!(
                target: "annview::store",
                attr = name.as_str(),
                "Trying to set attribute `.{}` of view, copying.",
                name
            );
            self.0.init_as_actual(self.0.copy_state());
        }

        let mut state = self.0 .0.borrow_mut();
        state.axes.insert(name.clone(), axes);
        state.attrs.insert(name, elem);
        Ok(())
    }

    /// Subset rows and columns into a view store
    ///
    /// Subsetting a view composes the indices with the ones the view was
    /// taken with, so the result refers directly to the actual store at the
    /// bottom of the chain.
    ///
    pub fn subset(&self, obs: impl Into<Index>, var: impl Into<Index>) -> Result<Store> {
        let (obs, var) = (obs.into(), var.into());

        let composed = match &self.0 .0.borrow().reference {
            Some(reference) => {
                let old = (&reference.obs, &reference.var);
                let (obs, var) = compose_pair(old, (&obs, &var), reference.store.shape())?;
                Some((reference.store.clone(), obs, var))
            }
            None => None,
        };

        match composed {
            Some((store, obs, var)) => store.init_as_view(obs, var),
            None => self.init_as_view(obs, var),
        }
    }

    fn init_as_view(&self, obs: Index, var: Index) -> Result<Store> {
        let state = self.0 .0.borrow();
        let shape = (
            obs.len_along(state.shape.0)?,
            var.len_along(state.shape.1)?,
        );

        let mut attrs = Vec::new();
        for (name, elem) in state.attrs.iter() {
            let axes = state.axes.get(name).copied().unwrap_or_default();
            let (rows, cols) = axes.select(&obs, &var);
            attrs.push((name.clone(), elem.subset(rows, cols)?));
        }

        debug!(target: "annview::store", %obs, %var, ?shape, "subset store into view");
        let view = Store::from_state(StoreState {
            shape,
            attrs: Attrs::new(),
            axes: state.axes.clone(),
            reference: Some(Reference {
                store: self.clone(),
                obs,
                var,
            }),
        });

        let root = view.as_root();
        let attrs = attrs
            .into_iter()
            .map(|(name, elem)| {
                let args = ElementRef::new(root.clone(), name.clone(), Vec::new());
                wrap(elem, args).map(|elem| (name, elem))
            })
            .collect::<Result<Attrs>>()?;

        view.0 .0.borrow_mut().attrs = attrs;
        Ok(view)
    }
}

/// Expose an element as a view, giving each non-scalar entry of a mapping
/// a view of its own
fn wrap(elem: Elem, args: ElementRef) -> Result<Elem> {
    let Elem::Mapping(mapping) = elem else {
        return as_view(elem, args);
    };

    let children = mapping
        .into_iter()
        .map(|(key, child)| match child {
            Elem::Value(_) => Ok((key, child)),
            _ => wrap(child, args.child(key.clone())).map(|child| (key, child)),
        })
        .collect::<Result<Mapping>>()?;

    as_view(children.into(), args)
}

fn check_aligned(name: &str, lengths: &[usize], elem: &Elem) -> Result<()> {
    if lengths.is_empty() {
        return Ok(());
    }

    if let Some(mapping) = elem.as_mapping() {
        for (key, child) in mapping.iter() {
            check_aligned(&format!("{name}/{key}"), lengths, child)?;
        }
        return Ok(());
    }

    if let Elem::Value(_) = elem {
        return Err(Error::AxisOutOfRange { axis: 0, ndim: 0 });
    }

    for (axis, &expected) in lengths.iter().enumerate() {
        let found = elem.dim(axis)?;
        if found != expected {
            return Err(Error::ShapeMismatch {
                what: name.to_string(),
                axis,
                expected,
                found,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::index::Slice;
    use crate::object::{CsrMatrix, DenseArray, Table, Value};
    use crate::utils::count_warnings;

    fn arange(rows: usize, cols: usize) -> DenseArray {
        let values = (0..rows * cols).map(|i| i as f64).collect();
        DenseArray::from_shape_vec(&[rows, cols], values).unwrap()
    }

    fn store() -> Store {
        let store = Store::new(6, 3);
        store.insert("X", Axes::Both, arange(6, 3)).unwrap();
        store.insert("obsm", Axes::Obs, Mapping::new().with("pca", arange(6, 2))).unwrap();
        store.insert("obs", Axes::Obs, Table::with_rows(6)).unwrap();
        store.insert("varp", Axes::Var, CsrMatrix::zeros((3, 3))).unwrap();
        store
            .insert("uns", Axes::Unaligned, Mapping::new().with("title", Value::from("cells")))
            .unwrap();
        store
    }

    #[test]
    fn insert_checks_alignment() {
        let s = Store::new(6, 3);
        assert_eq!(
            s.insert("X", Axes::Both, arange(6, 2)),
            Err(Error::ShapeMismatch {
                what: "X".into(),
                axis: 1,
                expected: 3,
                found: 2
            })
        );

        let nested = Mapping::new().with("pca", arange(5, 2));
        assert!(matches!(
            s.insert("obsm", Axes::Obs, nested),
            Err(Error::ShapeMismatch { what, .. }) if what == "obsm/pca"
        ));

        let scalar = Mapping::new().with("n", Value::from(1_i64));
        assert!(s.insert("obsm", Axes::Obs, scalar.clone()).is_err());
        assert!(s.insert("uns", Axes::Unaligned, scalar).is_ok());
        assert!(s.insert("n", Axes::Unaligned, Value::from(1_i64)).is_err());
    }

    #[test]
    fn subset_wraps_attributes() {
        let s = store();
        let view = s.subset(1..4, Index::full()).unwrap();
        assert!(view.is_view());
        assert_eq!(view.shape(), (3, 3));
        assert_eq!(view.attr_names(), vec!["X", "obs", "obsm", "uns", "varp"]);

        for name in view.attr_names() {
            assert!(view.attr(&name).unwrap().is_view(), "{name}");
        }

        let obsm = view.attr("obsm").unwrap();
        let pca = obsm.as_mapping().unwrap().get("pca").unwrap();
        let args = pca.as_view().unwrap().view_args().unwrap();
        assert_eq!((args.attr(), args.keys()), ("obsm", &["pca".to_string()][..]));
        assert_eq!(pca.dim(0), Ok(3));

        let uns = view.attr("uns").unwrap();
        let title = uns.as_mapping().unwrap().get("title").unwrap();
        assert!(!title.is_view());
    }

    #[test]
    fn slices_share_memory_until_written() {
        let s = store();
        let view = s.subset(0..2, Index::full()).unwrap();
        let x = view.attr("X").unwrap();
        assert_eq!(x.as_array().unwrap().as_ptr(), s.attr("X").unwrap().as_array().unwrap().as_ptr());
    }

    #[test]
    fn view_of_view_composes() {
        let s = store();
        let view = s.subset(1..5, Index::full()).unwrap();
        let nested = view.subset(Slice::new(None, None, Some(2)), Index::full()).unwrap();

        let (obs, _) = nested.view_indices().unwrap();
        assert_eq!(obs, Index::from(Slice::new(Some(1), Some(5), Some(2))));
        assert_eq!(nested.shape(), (2, 3));

        let x = nested.attr("X").unwrap();
        assert_eq!(x.as_array().unwrap().get(&[1, 0]), Some(9.0));
    }

    #[test]
    fn view_of_view_mask_then_scalar() {
        let s = Store::new(5, 1);
        s.insert("X", Axes::Obs, arange(5, 1)).unwrap();
        let mask = Index::Mask(vec![true, false, true, true, false]);
        let view = s.subset(mask, Index::full()).unwrap();
        let nested = view.subset(1_isize, Index::full()).unwrap();

        let (obs, _) = nested.view_indices().unwrap();
        assert_eq!(obs, Index::Scalar(2));
        assert_eq!(nested.attr("X").unwrap().as_array().unwrap().get(&[0, 0]), Some(2.0));
    }

    #[test]
    fn insert_into_view_materializes() {
        let s = store();
        let view = s.subset(0..3, Index::full()).unwrap();

        let (res, warnings) = count_warnings(|| view.insert("layer", Axes::Both, arange(3, 3)));
        res.unwrap();
        assert_eq!(warnings, 1);
        assert!(!view.is_view());
        assert!(!view.attr("X").unwrap().is_view());
        assert!(s.attr("layer").is_none());
    }

    #[test]
    fn copy_is_actual() {
        let s = store();
        let view = s.subset(0..3, 1..3).unwrap();
        let copy = view.copy();
        assert!(!copy.is_view());
        assert!(!copy.ptr_eq(&view));
        assert_eq!(copy.shape(), (3, 2));

        let x = copy.attr("X").unwrap();
        assert!(!x.is_view());
        assert_eq!(x.as_array().unwrap().shape(), &[3, 2]);
    }
}
