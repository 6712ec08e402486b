/// Indices
///
/// Representations of how a single axis may be subset, mirroring the index
/// forms accepted by array libraries: slices, boolean masks, integer position
/// arrays and integer scalars. Positions are 0-indexed and may be negative,
/// counting from the end of the axis.
///
use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};
use std::str::FromStr;

use crate::error::{Error, Result};

mod slice;
pub use slice::*;

mod compose;
pub use compose::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Index {
    Slice(Slice),
    Mask(Vec<bool>),
    Positions(Vec<isize>),
    Scalar(isize),
}

/// Resolve a possibly negative position against an axis of length `len`
pub fn normalize(index: isize, len: usize) -> Result<usize> {
    let n = len as isize;
    let i = if index < 0 { index + n } else { index };
    if 0 <= i && i < n {
        Ok(i as usize)
    } else {
        Err(Error::IndexOutOfBounds { index, len })
    }
}

impl Index {
    /// Select an entire axis
    pub fn full() -> Self {
        Index::Slice(Slice::full())
    }

    pub fn is_slice(&self) -> bool {
        matches!(self, Index::Slice(_))
    }

    /// Concrete positions selected on an axis of length `len`
    ///
    /// Scalars select a single position; the axis is kept rather than
    /// dropped.
    ///
    pub fn positions(&self, len: usize) -> Result<Vec<usize>> {
        match self {
            Index::Slice(s) => Ok(s.stride(len)?.iter().map(|i| i as usize).collect()),
            Index::Mask(mask) => {
                if mask.len() != len {
                    return Err(Error::MaskLength {
                        expected: len,
                        found: mask.len(),
                    });
                }
                Ok(mask
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &m)| m.then_some(i))
                    .collect())
            }
            Index::Positions(p) => p.iter().map(|&i| normalize(i, len)).collect(),
            Index::Scalar(i) => Ok(vec![normalize(*i, len)?]),
        }
    }

    /// Length of an axis of length `len` after applying this index
    pub fn len_along(&self, len: usize) -> Result<usize> {
        match self {
            Index::Slice(s) => Ok(s.stride(len)?.len()),
            _ => Ok(self.positions(len)?.len()),
        }
    }

    /// Apply the index to a sequence, `base[index]`
    ///
    /// ```
    /// use annview::Index;
    ///
    /// let base = vec!['a', 'b', 'c', 'd', 'e'];
    /// let index: Index = "::-2".parse().unwrap();
    /// assert_eq!(index.select(&base).unwrap(), vec!['e', 'c', 'a']);
    /// ```
    ///
    pub fn select<T: Clone>(&self, base: &[T]) -> Result<Vec<T>> {
        Ok(self
            .positions(base.len())?
            .into_iter()
            .map(|i| base[i].clone())
            .collect())
    }
}

impl Default for Index {
    fn default() -> Self {
        Index::full()
    }
}

impl From<Slice> for Index {
    fn from(value: Slice) -> Self {
        Index::Slice(value)
    }
}

impl From<Range<usize>> for Index {
    fn from(value: Range<usize>) -> Self {
        Index::Slice(value.into())
    }
}

impl From<RangeFrom<usize>> for Index {
    fn from(value: RangeFrom<usize>) -> Self {
        Index::Slice(value.into())
    }
}

impl From<RangeTo<usize>> for Index {
    fn from(value: RangeTo<usize>) -> Self {
        Index::Slice(value.into())
    }
}

impl From<RangeFull> for Index {
    fn from(value: RangeFull) -> Self {
        Index::Slice(value.into())
    }
}

impl From<Vec<bool>> for Index {
    fn from(value: Vec<bool>) -> Self {
        Index::Mask(value)
    }
}

impl From<Vec<isize>> for Index {
    fn from(value: Vec<isize>) -> Self {
        Index::Positions(value)
    }
}

impl From<isize> for Index {
    fn from(value: isize) -> Self {
        Index::Scalar(value)
    }
}

impl FromStr for Index {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        crate::parser::parse_index(s)
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn bound(x: Option<isize>) -> String {
            x.map(|i| i.to_string()).unwrap_or_default()
        }

        fn list<T>(f: &mut fmt::Formatter<'_>, items: &[T], show: fn(&T) -> String) -> fmt::Result {
            let items: Vec<String> = items.iter().map(show).collect();
            write!(f, "[{}]", items.join(", "))
        }

        match self {
            Index::Slice(s) => match s.step {
                Some(step) => write!(f, "{}:{}:{}", bound(s.start), bound(s.stop), step),
                None => write!(f, "{}:{}", bound(s.start), bound(s.stop)),
            },
            Index::Mask(m) => list(f, m, |&b| if b { "T" } else { "F" }.to_string()),
            Index::Positions(p) => list(f, p, |i| i.to_string()),
            Index::Scalar(i) => write!(f, "{i}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_negative() {
        let index = Index::Positions(vec![-1, 0, -2]);
        assert_eq!(index.positions(4), Ok(vec![3, 0, 2]));
    }

    #[test]
    fn positions_out_of_bounds() {
        let index = Index::Scalar(4);
        assert_eq!(
            index.positions(4),
            Err(Error::IndexOutOfBounds { index: 4, len: 4 })
        );
    }

    #[test]
    fn mask_length_mismatch() {
        let index = Index::Mask(vec![true, false]);
        assert_eq!(
            index.positions(3),
            Err(Error::MaskLength { expected: 3, found: 2 })
        );
    }

    #[test]
    fn len_along_slice() {
        let index = Index::from(Slice::new(Some(1), None, Some(3)));
        assert_eq!(index.len_along(10), Ok(3));
    }

    #[test]
    fn display() {
        assert_eq!(Index::from(2..8).to_string(), "2:8");
        assert_eq!(Index::from(Slice::new(Some(8), None, Some(-2))).to_string(), "8::-2");
        assert_eq!(Index::Mask(vec![true, false]).to_string(), "[T, F]");
        assert_eq!(Index::Positions(vec![0, -1]).to_string(), "[0, -1]");
        assert_eq!(Index::Scalar(-3).to_string(), "-3");
    }
}
