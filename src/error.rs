use thiserror::Error;

use crate::object::ElemKind;

#[macro_export]
macro_rules! err {
    ( $x:expr ) => {
        Err($crate::error::Error::Other($x.to_string()))
    };
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // unsupported types
    #[error("no view type has been registered for {0}")]
    NoViewType(ElemKind),
    #[error("expected {expected}, found {found}")]
    UnexpectedKind { expected: ElemKind, found: ElemKind },

    // structural mismatches, raised while materializing a view
    #[error("cannot materialize view of `.{attr}`: {msg}")]
    Structure { attr: String, msg: String },
    #[error("root object of view `.{0}` no longer exists")]
    RootDropped(String),

    // indexing
    #[error("index {index} is out of bounds for axis with size {len}")]
    IndexOutOfBounds { index: isize, len: usize },
    #[error("boolean index did not match indexed axis; axis has size {expected} but index has size {found}")]
    MaskLength { expected: usize, found: usize },
    #[error("slice step cannot be zero")]
    ZeroStep,
    #[error("composed index does not fit in a signed machine integer")]
    IndexOverflow,
    #[error("cannot index axis {axis} of an object with {ndim} dimension(s)")]
    AxisOutOfRange { axis: usize, ndim: usize },

    // shapes
    #[error("`{what}` has size {found} along axis {axis}, expected {expected}")]
    ShapeMismatch {
        what: String,
        axis: usize,
        expected: usize,
        found: usize,
    },
    #[error("column `{name}` has length {found}, table has {expected} rows")]
    ColumnLength {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("key `{0}` not found")]
    KeyNotFound(String),

    // parsing
    #[error("unable to parse index `{input}`\n{msg}")]
    Parse { input: String, msg: String },

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn structure(attr: &str, msg: impl Into<String>) -> Self {
        Error::Structure {
            attr: attr.to_string(),
            msg: msg.into(),
        }
    }
}
