use super::{normalize, Index, Slice};
use crate::error::Result;

/// Compose two sequential indices into one
///
/// Given `old`, an index already applied to an axis of length `len`, and
/// `new`, an index applied to the result, produce a single index such that
/// `base[old][new] == base[compose(old, new, len)]`.
///
/// Two slices always compose into a slice. Any other combination densifies
/// into explicit positions, except that a scalar `new` index yields a
/// scalar.
///
/// ```
/// use annview::{compose, Index, Slice};
///
/// let old = Index::from(Slice::new(Some(2), Some(8), Some(2)));
/// let new = Index::from(Slice::new(Some(1), None, None));
/// let combined = compose(&old, &new, 10).unwrap();
/// assert_eq!(combined, Index::from(Slice::new(Some(4), Some(8), Some(2))));
/// ```
///
pub fn compose(old: &Index, new: &Index, len: usize) -> Result<Index> {
    match old {
        Index::Slice(old) => match new {
            Index::Slice(new) => compose_slices(old, new, len),
            _ => compose_positions(old.stride(len)?.iter().collect(), new),
        },
        Index::Mask(mask) => {
            let positions = mask
                .iter()
                .enumerate()
                .filter_map(|(i, &m)| m.then_some(i as isize))
                .collect();
            compose_positions(positions, new)
        }
        Index::Scalar(i) => compose_positions(vec![*i], new),
        Index::Positions(positions) => compose_positions(positions.clone(), new),
    }
}

/// Compose a (row, column) pair of indices against a (rows, columns) shape
pub fn compose_pair(
    old: (&Index, &Index),
    new: (&Index, &Index),
    shape: (usize, usize),
) -> Result<(Index, Index)> {
    Ok((
        compose(old.0, new.0, shape.0)?,
        compose(old.1, new.1, shape.1)?,
    ))
}

fn compose_slices(old: &Slice, new: &Slice, len: usize) -> Result<Index> {
    let stride = old.stride(len)?.slice(new)?;
    Ok(Index::Slice(stride.into_slice()))
}

fn compose_positions(old: Vec<isize>, new: &Index) -> Result<Index> {
    let n = old.len();
    match new {
        Index::Scalar(i) => Ok(Index::Scalar(old[normalize(*i, n)?])),
        _ => Ok(Index::Positions(
            new.positions(n)?.into_iter().map(|i| old[i]).collect(),
        )),
    }
}
