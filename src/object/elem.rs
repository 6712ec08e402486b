use super::dense::DenseArray;
use super::frozen::FrozenArray;
use super::index::Index;
use super::mapping::Mapping;
use super::sparse::{CscMatrix, CsrMatrix, Compressed, Layout};
use super::table::Table;
use super::value::Value;
use crate::error::{Error, Result};
use crate::view::ViewElem;

/// Type tag of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ElemKind {
    Array,
    Csr,
    Csc,
    Mapping,
    Table,
    Frozen,
    Value,
}

/// Any element that can be stored as an attribute of a root, or within a
/// mapping
#[derive(Debug, Clone, PartialEq)]
pub enum Elem {
    Array(DenseArray),
    Csr(CsrMatrix),
    Csc(CscMatrix),
    Mapping(Mapping),
    Table(Table),
    Frozen(FrozenArray),
    Value(Value),
    View(ViewElem),
}

impl Elem {
    /// Kind of the element, or of the container a view wraps
    pub fn kind(&self) -> ElemKind {
        match self {
            Elem::Array(_) => ElemKind::Array,
            Elem::Csr(_) => ElemKind::Csr,
            Elem::Csc(_) => ElemKind::Csc,
            Elem::Mapping(_) => ElemKind::Mapping,
            Elem::Table(_) => ElemKind::Table,
            Elem::Frozen(_) => ElemKind::Frozen,
            Elem::Value(_) => ElemKind::Value,
            Elem::View(v) => v.kind(),
        }
    }

    pub fn is_view(&self) -> bool {
        matches!(self, Elem::View(_))
    }

    /// Number of indexable axes; mappings and scalars have none
    pub fn ndim(&self) -> usize {
        match self {
            Elem::Array(x) => x.ndim(),
            Elem::Frozen(x) => x.shape().len(),
            Elem::Csr(_) | Elem::Csc(_) | Elem::Table(_) => 2,
            Elem::Mapping(_) | Elem::Value(_) => 0,
            Elem::View(v) => v.ndim(),
        }
    }

    /// Length along `axis`
    pub fn dim(&self, axis: usize) -> Result<usize> {
        let oob = Error::AxisOutOfRange {
            axis,
            ndim: self.ndim(),
        };
        if axis >= self.ndim() {
            return Err(oob);
        }

        let dim = match self {
            Elem::Array(x) => x.shape()[axis],
            Elem::Frozen(x) => x.shape()[axis],
            Elem::Csr(x) => [x.shape().0, x.shape().1][axis],
            Elem::Csc(x) => [x.shape().0, x.shape().1][axis],
            Elem::Table(x) => [x.nrows(), x.ncols()][axis],
            Elem::View(v) => return v.dim(axis),
            Elem::Mapping(_) | Elem::Value(_) => return Err(oob),
        };
        Ok(dim)
    }

    /// An independent copy; views are copied into plain containers
    pub fn deep_copy(&self) -> Elem {
        match self {
            Elem::Array(x) => Elem::Array(x.deep_copy()),
            Elem::Mapping(x) => Elem::Mapping(x.deep_copy()),
            Elem::View(v) => v.copy(),
            // immutable or owning containers
            Elem::Csr(_) | Elem::Csc(_) | Elem::Table(_) | Elem::Frozen(_) | Elem::Value(_) => {
                self.clone()
            }
        }
    }

    /// Subset along the first two axes into a plain element
    pub fn subset(&self, rows: Option<&Index>, cols: Option<&Index>) -> Result<Elem> {
        Ok(match self {
            Elem::Array(x) => x.subset(rows, cols)?.into(),
            Elem::Csr(x) => x.subset(rows, cols)?.into(),
            Elem::Csc(x) => x.subset(rows, cols)?.into(),
            Elem::Mapping(x) => x.subset(rows, cols)?.into(),
            Elem::Table(x) => x.subset(rows, cols)?.into(),
            Elem::Frozen(x) => x.subset(rows, cols)?.into(),
            Elem::Value(_) if rows.is_none() && cols.is_none() => self.clone(),
            Elem::Value(_) => return Err(Error::AxisOutOfRange { axis: 0, ndim: 0 }),
            Elem::View(v) => v.clone().into_inner().subset(rows, cols)?,
        })
    }

    pub fn as_array(&self) -> Option<&DenseArray> {
        match self {
            Elem::Array(x) => Some(x),
            Elem::View(ViewElem::Array(v)) => Some(&**v),
            _ => None,
        }
    }

    pub fn as_csr(&self) -> Option<&CsrMatrix> {
        match self {
            Elem::Csr(x) => Some(x),
            Elem::View(ViewElem::Csr(v)) => Some(&**v),
            _ => None,
        }
    }

    pub fn as_csc(&self) -> Option<&CscMatrix> {
        match self {
            Elem::Csc(x) => Some(x),
            Elem::View(ViewElem::Csc(v)) => Some(&**v),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Elem::Mapping(x) => Some(x),
            Elem::View(ViewElem::Dict(v)) => Some(&**v),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Elem::Table(x) => Some(x),
            Elem::View(ViewElem::Table(v)) => Some(&**v),
            _ => None,
        }
    }

    pub fn as_frozen(&self) -> Option<&FrozenArray> {
        match self {
            Elem::Frozen(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Elem::Value(x) => Some(x),
            _ => None,
        }
    }

    pub fn as_view(&self) -> Option<&ViewElem> {
        match self {
            Elem::View(v) => Some(v),
            _ => None,
        }
    }
}

impl From<DenseArray> for Elem {
    fn from(value: DenseArray) -> Self {
        Elem::Array(value)
    }
}

impl<L: Layout> From<Compressed<L>> for Elem {
    fn from(value: Compressed<L>) -> Self {
        L::wrap(value)
    }
}

impl From<Mapping> for Elem {
    fn from(value: Mapping) -> Self {
        Elem::Mapping(value)
    }
}

impl From<Table> for Elem {
    fn from(value: Table) -> Self {
        Elem::Table(value)
    }
}

impl From<FrozenArray> for Elem {
    fn from(value: FrozenArray) -> Self {
        Elem::Frozen(value)
    }
}

impl From<Value> for Elem {
    fn from(value: Value) -> Self {
        Elem::Value(value)
    }
}

impl From<ViewElem> for Elem {
    fn from(value: ViewElem) -> Self {
        Elem::View(value)
    }
}
