use super::{Container, ElementRef, View};
use crate::error::{Error, Result};
use crate::object::{
    index::Index, CscMatrix, CsrMatrix, DenseArray, Elem, ElemKind, Mapping, Table, TableAxis,
};

pub type ArrayView = View<DenseArray>;
pub type SparseCsrView = View<CsrMatrix>;
pub type SparseCscView = View<CscMatrix>;
pub type DictView = View<Mapping>;
pub type TableView = View<Table>;

impl View<DenseArray> {
    /// A plain array with its own buffer
    pub fn to_array(&self) -> DenseArray {
        self.copy()
    }

    /// Subset the view, keeping its reference
    ///
    /// The result refers to the same element of the same root, so writing
    /// to it materializes that root.
    ///
    pub fn subset(&self, rows: Option<&Index>, cols: Option<&Index>) -> Result<ArrayView> {
        Ok(View::new(
            self.data.subset(rows, cols)?,
            self.view_args.clone(),
        ))
    }
}

impl View<Table> {
    /// Drop rows or columns by label
    ///
    /// Unless `inplace`, returns a new plain table and leaves the root alone.
    /// In place, the drop is applied to the materialized root and `None` is
    /// returned.
    ///
    pub fn drop(&mut self, labels: &[&str], axis: TableAxis, inplace: bool) -> Result<Option<Table>> {
        if !inplace {
            return Ok(Some(self.copy().drop(labels, axis)?));
        }
        self.intercept(|table| table.drop_inplace(labels, axis))?;
        Ok(None)
    }
}

/// Any view, tagged by the kind of container it wraps
#[derive(Debug, Clone, PartialEq)]
pub enum ViewElem {
    Array(ArrayView),
    Csr(SparseCsrView),
    Csc(SparseCscView),
    Dict(DictView),
    Table(TableView),
}

impl ViewElem {
    pub fn kind(&self) -> ElemKind {
        match self {
            ViewElem::Array(_) => ElemKind::Array,
            ViewElem::Csr(_) => ElemKind::Csr,
            ViewElem::Csc(_) => ElemKind::Csc,
            ViewElem::Dict(_) => ElemKind::Mapping,
            ViewElem::Table(_) => ElemKind::Table,
        }
    }

    pub fn view_args(&self) -> Option<&ElementRef> {
        match self {
            ViewElem::Array(v) => v.view_args(),
            ViewElem::Csr(v) => v.view_args(),
            ViewElem::Csc(v) => v.view_args(),
            ViewElem::Dict(v) => v.view_args(),
            ViewElem::Table(v) => v.view_args(),
        }
    }

    fn dims(&self) -> Vec<usize> {
        match self {
            ViewElem::Array(v) => v.shape()[..v.ndim()].to_vec(),
            ViewElem::Csr(v) => vec![v.shape().0, v.shape().1],
            ViewElem::Csc(v) => vec![v.shape().0, v.shape().1],
            ViewElem::Table(v) => vec![v.nrows(), v.ncols()],
            ViewElem::Dict(_) => Vec::new(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.dims().len()
    }

    pub fn dim(&self, axis: usize) -> Result<usize> {
        let dims = self.dims();
        dims.get(axis).copied().ok_or(Error::AxisOutOfRange {
            axis,
            ndim: dims.len(),
        })
    }

    /// A plain, independent copy of the current data
    pub fn copy(&self) -> Elem {
        match self {
            ViewElem::Array(v) => v.copy().into(),
            ViewElem::Csr(v) => v.copy().into(),
            ViewElem::Csc(v) => v.copy().into(),
            ViewElem::Dict(v) => v.copy().into(),
            ViewElem::Table(v) => v.copy().into(),
        }
    }

    /// See [`View::deep_copy`]
    pub fn deep_copy(&self) -> Result<Elem> {
        Ok(match self {
            ViewElem::Array(v) => v.deep_copy()?.into(),
            ViewElem::Csr(v) => v.deep_copy()?.into(),
            ViewElem::Csc(v) => v.deep_copy()?.into(),
            ViewElem::Dict(v) => v.deep_copy()?.into(),
            ViewElem::Table(v) => v.deep_copy()?.into(),
        })
    }

    /// The wrapped container, as a plain element
    pub fn into_inner(self) -> Elem {
        match self {
            ViewElem::Array(v) => v.into_inner().into(),
            ViewElem::Csr(v) => v.into_inner().into(),
            ViewElem::Csc(v) => v.into_inner().into(),
            ViewElem::Dict(v) => v.into_inner().into(),
            ViewElem::Table(v) => v.into_inner().into(),
        }
    }
}

impl<T: Container> From<View<T>> for ViewElem {
    fn from(value: View<T>) -> Self {
        T::wrap_view(value)
    }
}

impl<T: Container> From<View<T>> for Elem {
    fn from(value: View<T>) -> Self {
        Elem::View(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Column, Value};
    use crate::store::{Axes, Store};
    use crate::utils::count_warnings;

    fn store() -> Store {
        let store = Store::new(3, 3);
        let x = DenseArray::from_shape_vec(&[3, 3], (0..9).map(f64::from).collect()).unwrap();
        let obs = Table::new(vec!["c1".into(), "c2".into(), "c3".into()])
            .with_column("n_genes", vec![10_i64, 20, 30])
            .unwrap()
            .with_column("qc", vec![true, false, true])
            .unwrap();
        let sparse = CsrMatrix::from_triplets((3, 3), &[(0, 0, 1.0), (2, 1, 5.0)]).unwrap();

        store.insert("X", Axes::Both, x).unwrap();
        store.insert("obs", Axes::Obs, obs).unwrap();
        store.insert("obsp", Axes::Obs, sparse.clone()).unwrap();
        store.insert("varp", Axes::Var, CscMatrix::from_dense(&sparse.to_dense())).unwrap();
        store
    }

    fn table_view(store: &Store) -> TableView {
        match store.attr("obs") {
            Some(Elem::View(ViewElem::Table(v))) => v,
            other => panic!("expected a table view, found {other:?}"),
        }
    }

    #[test]
    fn array_subset_keeps_reference() {
        let parent = store();
        let view = parent.subset(.., ..).unwrap();
        let Some(Elem::View(ViewElem::Array(x))) = view.attr("X") else {
            panic!("expected an array view")
        };

        let mut sub = x.subset(Some(&Index::from(1..3)), None).unwrap();
        assert_eq!(sub.view_args(), x.view_args());
        assert_eq!(sub.shape(), &[2, 3]);

        // writes address the referenced attribute as a whole
        let (res, warnings) = count_warnings(|| sub.set_item(vec![0, 0], -1.0));
        res.unwrap();
        assert_eq!(warnings, 1);
        assert_eq!(view.attr("X").unwrap().as_array().unwrap().get(&[0, 0]), Some(-1.0));
        assert_eq!(parent.attr("X").unwrap().as_array().unwrap().get(&[0, 0]), Some(0.0));
        assert_eq!(x.to_array().get(&[0, 0]), Some(0.0));
    }

    #[test]
    fn record_keys() {
        let data = ndarray::array![[1.0, 2.0], [3.0, 4.0]].into_dyn().into_shared();
        let records = DenseArray::records(data, vec!["a".into(), "b".into()]).unwrap();
        let view = View::new(records, None);
        assert_eq!(view.keys(), Some(&["a".to_string(), "b".to_string()][..]));
    }

    #[test]
    fn sparse_subset_is_plain() {
        let parent = store();
        let view = parent.subset(.., ..).unwrap();
        let rows = Index::from(1..3);

        for name in ["obsp", "varp"] {
            let before = (view.attr(name), parent.attr(name));
            let sub = match view.attr(name) {
                Some(Elem::View(ViewElem::Csr(m))) => {
                    let mut sub = m.subset(Some(&rows), None).unwrap();
                    sub.set(0, 0, 9.0).unwrap();
                    assert_eq!(sub.get(0, 0), Some(9.0));
                    Elem::from(sub)
                }
                Some(Elem::View(ViewElem::Csc(m))) => {
                    let mut sub = m.subset(Some(&rows), None).unwrap();
                    sub.set(0, 0, 9.0).unwrap();
                    assert_eq!(sub.get(0, 0), Some(9.0));
                    Elem::from(sub)
                }
                other => panic!("expected a sparse view, found {other:?}"),
            };
            assert!(!sub.is_view(), "{name}");
            assert_eq!(sub.dim(0), Ok(2));
            assert_eq!((view.attr(name), parent.attr(name)), before, "{name}");
        }
        assert!(view.is_view());
    }

    #[test]
    fn sparse_write() {
        let parent = store();
        let view = parent.subset(1..3, ..).unwrap();
        let Some(Elem::View(ViewElem::Csr(mut m))) = view.attr("obsp") else {
            panic!("expected a csr view")
        };

        m.set_item((0, 2), 7.0).unwrap();
        assert_eq!(m.get(0, 2), Some(0.0));
        let obsp = view.attr("obsp").unwrap();
        assert_eq!(obsp.as_csr().unwrap().get(0, 2), Some(7.0));
        assert_eq!(parent.attr("obsp").unwrap().as_csr().unwrap().nnz(), 2);
    }

    #[test]
    fn sparse_csc_write() {
        let parent = store();
        let view = parent.subset(.., 1..3).unwrap();
        let Some(Elem::View(ViewElem::Csc(mut m))) = view.attr("varp") else {
            panic!("expected a csc view")
        };

        let (res, warnings) = count_warnings(|| m.set_item((0, 0), 3.0));
        res.unwrap();
        assert_eq!(warnings, 1);
        assert!(!view.is_view());

        let varp = view.attr("varp").unwrap();
        assert_eq!(varp.as_csc().unwrap().get(0, 0), Some(3.0));
        assert_eq!(parent.attr("varp").unwrap().as_csc().unwrap().get(1, 0), Some(0.0));
        assert!(parent.attr("varp").unwrap().as_view().is_none());
    }

    #[test]
    fn table_drop_copy() {
        let parent = store();
        let view = parent.subset(..2, ..).unwrap();
        let mut obs = table_view(&view);

        let (res, warnings) = count_warnings(|| obs.drop(&["qc"], TableAxis::Columns, false));
        let dropped = res.unwrap().unwrap();
        assert_eq!(warnings, 0);
        assert_eq!(dropped.column_names(), vec!["n_genes"]);
        assert_eq!(dropped.nrows(), 2);
        assert!(view.is_view());
        assert_eq!(obs.ncols(), 2);
    }

    #[test]
    fn table_drop_inplace() {
        let parent = store();
        let view = parent.subset(..2, ..).unwrap();
        let mut obs = table_view(&view);

        let (res, warnings) = count_warnings(|| obs.drop(&["c1"], TableAxis::Rows, true));
        assert_eq!(res, Ok(None));
        assert_eq!(warnings, 1);
        assert!(!view.is_view());

        let materialized = view.attr("obs").unwrap();
        assert_eq!(materialized.as_table().unwrap().index(), &["c2".to_string()]);
        assert_eq!(obs.nrows(), 2);
        assert_eq!(parent.attr("obs").unwrap().as_table().unwrap().nrows(), 3);
    }

    #[test]
    fn table_set_column() {
        let parent = store();
        let view = parent.subset(..2, ..).unwrap();
        let mut obs = table_view(&view);

        obs.set_item("batch".into(), Column::from(vec!["a", "b"])).unwrap();
        let materialized = view.attr("obs").unwrap();
        assert_eq!(
            materialized.as_table().unwrap().get("c2", "batch"),
            Some(Value::Str("b".into()))
        );
        assert!(parent.attr("obs").unwrap().as_table().unwrap().column("batch").is_none());
    }

    #[test]
    fn view_elem_accessors() {
        let parent = store();
        let view = parent.subset(..2, ..).unwrap();
        let Some(Elem::View(obs)) = view.attr("obs") else {
            panic!("expected a view")
        };

        assert_eq!(obs.kind(), ElemKind::Table);
        assert_eq!(obs.view_args().map(ElementRef::attr), Some("obs"));
        assert_eq!(obs.dim(0), Ok(2));
        assert!(!obs.copy().is_view());
        assert_eq!(obs.deep_copy().unwrap().dim(0), Ok(3));
        assert_eq!(obs.clone().into_inner().kind(), ElemKind::Table);
    }
}
