use std::fmt::Debug;
use std::marker::PhantomData;

use ndarray::Array2;

use super::index::Index;
use super::{Elem, ElemKind};
use crate::error::{Error, Result};
use crate::view::{View, ViewElem};

/// Storage order of a compressed sparse matrix
///
/// Entries are grouped by their "outer" coordinate (rows for CSR, columns
/// for CSC) and sorted by their "inner" coordinate within each group.
///
pub trait Layout: Debug + Clone + Copy + PartialEq + Default + 'static {
    const KIND: ElemKind;

    /// Map a (row, column) pair to (outer, inner) and back
    fn orient<T>(first: T, second: T) -> (T, T);

    fn wrap(matrix: Compressed<Self>) -> Elem;
    fn unwrap_mut(elem: &mut Elem) -> Option<&mut Compressed<Self>>;
    fn wrap_view(view: View<Compressed<Self>>) -> ViewElem;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Csr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Csc;

impl Layout for Csr {
    const KIND: ElemKind = ElemKind::Csr;

    fn orient<T>(first: T, second: T) -> (T, T) {
        (first, second)
    }

    fn wrap(matrix: Compressed<Self>) -> Elem {
        Elem::Csr(matrix)
    }

    fn unwrap_mut(elem: &mut Elem) -> Option<&mut Compressed<Self>> {
        match elem {
            Elem::Csr(m) => Some(m),
            _ => None,
        }
    }

    fn wrap_view(view: View<Compressed<Self>>) -> ViewElem {
        ViewElem::Csr(view)
    }
}

impl Layout for Csc {
    const KIND: ElemKind = ElemKind::Csc;

    fn orient<T>(first: T, second: T) -> (T, T) {
        (second, first)
    }

    fn wrap(matrix: Compressed<Self>) -> Elem {
        Elem::Csc(matrix)
    }

    fn unwrap_mut(elem: &mut Elem) -> Option<&mut Compressed<Self>> {
        match elem {
            Elem::Csc(m) => Some(m),
            _ => None,
        }
    }

    fn wrap_view(view: View<Compressed<Self>>) -> ViewElem {
        ViewElem::Csc(view)
    }
}

/// Compressed sparse matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Compressed<L: Layout> {
    shape: (usize, usize),
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
    layout: PhantomData<L>,
}

pub type CsrMatrix = Compressed<Csr>;
pub type CscMatrix = Compressed<Csc>;

impl<L: Layout> Compressed<L> {
    pub fn zeros(shape: (usize, usize)) -> Self {
        let (outer, _) = L::orient(shape.0, shape.1);
        Compressed {
            shape,
            indptr: vec![0; outer + 1],
            indices: Vec::new(),
            data: Vec::new(),
            layout: PhantomData,
        }
    }

    /// Build from `(row, column, value)` entries; later duplicates win
    pub fn from_triplets(shape: (usize, usize), entries: &[(usize, usize, f64)]) -> Result<Self> {
        let mut m = Self::zeros(shape);
        for &(row, col, value) in entries {
            m.set(row, col, value)?;
        }
        Ok(m)
    }

    pub fn from_dense(dense: &Array2<f64>) -> Self {
        let mut m = Self::zeros(dense.dim());
        for ((row, col), &value) in dense.indexed_iter() {
            if value != 0.0 {
                m.insert(row, col, value);
            }
        }
        m
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.shape.0 || col >= self.shape.1 {
            return None;
        }
        match self.find(row, col) {
            Ok(k) => Some(self.data[k]),
            Err(_) => Some(0.0),
        }
    }

    /// Write an entry, storing it if it is not yet stored
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        for (index, len) in [(row, self.shape.0), (col, self.shape.1)] {
            if index >= len {
                return Err(Error::IndexOutOfBounds {
                    index: index as isize,
                    len,
                });
            }
        }
        self.insert(row, col, value);
        Ok(())
    }

    /// Iterate stored `(row, column, value)` entries in storage order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.indptr.windows(2).enumerate().flat_map(move |(outer, w)| {
            (w[0]..w[1]).map(move |k| {
                let (row, col) = L::orient(outer, self.indices[k]);
                (row, col, self.data[k])
            })
        })
    }

    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros(self.shape);
        for (row, col, value) in self.iter() {
            dense[[row, col]] = value;
        }
        dense
    }

    /// Subset rows and columns into a new matrix
    pub fn subset(&self, rows: Option<&Index>, cols: Option<&Index>) -> Result<Self> {
        let select = |index: Option<&Index>, len: usize| match index {
            Some(index) => index.positions(len),
            None => Ok((0..len).collect()),
        };
        let rows = select(rows, self.shape.0)?;
        let cols = select(cols, self.shape.1)?;

        let (outer_sel, inner_sel) = L::orient(rows, cols);
        let (_, n_inner) = L::orient(self.shape.0, self.shape.1);

        // old inner position -> every new inner position it moves to
        let mut remap: Vec<Vec<usize>> = vec![Vec::new(); n_inner];
        for (new, &old) in inner_sel.iter().enumerate() {
            remap[old].push(new);
        }

        let mut indptr = Vec::with_capacity(outer_sel.len() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);

        for &outer in &outer_sel {
            let mut entries: Vec<(usize, f64)> = (self.indptr[outer]..self.indptr[outer + 1])
                .flat_map(|k| remap[self.indices[k]].iter().map(move |&i| (i, self.data[k])))
                .collect();
            entries.sort_by_key(|&(i, _)| i);

            for (i, value) in entries {
                indices.push(i);
                data.push(value);
            }
            indptr.push(indices.len());
        }

        Ok(Compressed {
            shape: L::orient(outer_sel.len(), inner_sel.len()),
            indptr,
            indices,
            data,
            layout: PhantomData,
        })
    }

    fn find(&self, row: usize, col: usize) -> std::result::Result<usize, usize> {
        let (outer, inner) = L::orient(row, col);
        let (lo, hi) = (self.indptr[outer], self.indptr[outer + 1]);
        self.indices[lo..hi]
            .binary_search(&inner)
            .map(|k| lo + k)
            .map_err(|k| lo + k)
    }

    fn insert(&mut self, row: usize, col: usize, value: f64) {
        match self.find(row, col) {
            Ok(k) => self.data[k] = value,
            Err(k) => {
                let (outer, inner) = L::orient(row, col);
                self.indices.insert(k, inner);
                self.data.insert(k, value);
                for p in &mut self.indptr[outer + 1..] {
                    *p += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn example<L: Layout>() -> Compressed<L> {
        let dense = array![[1.0, 0.0, 2.0], [0.0, 0.0, 3.0], [4.0, 5.0, 0.0]];
        Compressed::from_dense(&dense)
    }

    #[test]
    fn from_dense_roundtrip() {
        let dense = array![[1.0, 0.0, 2.0], [0.0, 0.0, 3.0], [4.0, 5.0, 0.0]];
        assert_eq!(example::<Csr>().to_dense(), dense);
        assert_eq!(example::<Csc>().to_dense(), dense);
        assert_eq!(example::<Csr>().nnz(), 5);
    }

    #[test]
    fn set_inserts_entries() {
        let mut m = CsrMatrix::zeros((2, 3));
        m.set(1, 2, 7.0).unwrap();
        m.set(1, 0, 6.0).unwrap();
        m.set(1, 2, 8.0).unwrap();
        assert_eq!(m.nnz(), 2);
        assert_eq!(m.get(1, 2), Some(8.0));
        assert_eq!(m.get(1, 0), Some(6.0));
        assert_eq!(m.get(0, 0), Some(0.0));
        assert_eq!(m.get(2, 0), None);
        assert!(m.set(0, 3, 1.0).is_err());
    }

    #[test]
    fn subset_reorders_and_repeats() {
        let rows = Index::Positions(vec![2, 0]);
        let cols = Index::Positions(vec![2, 0, 0]);

        let expect = array![[0.0, 4.0, 4.0], [2.0, 1.0, 1.0]];
        let csr = example::<Csr>().subset(Some(&rows), Some(&cols)).unwrap();
        let csc = example::<Csc>().subset(Some(&rows), Some(&cols)).unwrap();
        assert_eq!(csr.to_dense(), expect);
        assert_eq!(csc.to_dense(), expect);
    }

    #[test]
    fn subset_rows_only() {
        let m = example::<Csc>().subset(Some(&(1..3).into()), None).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.to_dense(), array![[0.0, 0.0, 3.0], [4.0, 5.0, 0.0]]);
    }
}
