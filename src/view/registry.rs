use super::{Container, ElementRef, View};
use crate::error::{Error, Result};
use crate::object::Elem;

/// Expose `elem` as a view referring to `view_args`
///
/// Frozen arrays cannot be written to and are returned as they are. An
/// existing view is re-wrapped with the new reference. Scalars have no view
/// type.
///
pub fn as_view(elem: Elem, view_args: ElementRef) -> Result<Elem> {
    fn wrap<T: Container>(data: T, view_args: ElementRef) -> Elem {
        View::new(data, Some(view_args)).into()
    }

    match elem {
        Elem::Array(x) => Ok(wrap(x, view_args)),
        Elem::Csr(x) => Ok(wrap(x, view_args)),
        Elem::Csc(x) => Ok(wrap(x, view_args)),
        Elem::Mapping(x) => Ok(wrap(x, view_args)),
        Elem::Table(x) => Ok(wrap(x, view_args)),
        Elem::Frozen(_) => Ok(elem),
        Elem::View(v) => as_view(v.into_inner(), view_args),
        Elem::Value(_) => Err(Error::NoViewType(elem.kind())),
    }
}
