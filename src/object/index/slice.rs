use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::error::{Error, Result};

/// Slice
///
/// An unresolved `start:stop:step` selection. Bounds may be negative (counted
/// from the end of the axis) or absent, and are only made concrete against
/// an axis length with [Slice::indices].
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl Slice {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Slice { start, stop, step }
    }

    /// The slice selecting a whole axis, `:`
    pub fn full() -> Self {
        Slice::default()
    }

    /// Resolve bounds against an axis of length `len`
    ///
    /// Returns a normalized `(start, stop, step)` triple. Out of range bounds
    /// are clamped, negative bounds count from the end, and missing bounds
    /// default to the ends of the axis in the direction of `step`.
    ///
    /// ```
    /// use annview::Slice;
    ///
    /// let s = Slice::new(Some(-3), None, None);
    /// assert_eq!(s.indices(10).unwrap(), (7, 10, 1));
    ///
    /// let s = Slice::new(None, None, Some(-1));
    /// assert_eq!(s.indices(10).unwrap(), (9, -1, -1));
    /// ```
    ///
    pub fn indices(&self, len: usize) -> Result<(isize, isize, isize)> {
        let n = len as isize;
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(Error::ZeroStep);
        }

        let (lower, upper) = if step < 0 { (-1, n - 1) } else { (0, n) };
        let adjust = |bound: Option<isize>, default: isize| match bound {
            None => default,
            Some(b) if b < 0 => (b + n).max(lower),
            Some(b) => b.min(upper),
        };

        let start = adjust(self.start, if step < 0 { upper } else { lower });
        let stop = adjust(self.stop, if step < 0 { lower } else { upper });
        Ok((start, stop, step))
    }

    /// The concrete progression this slice selects on an axis of length `len`
    pub fn stride(&self, len: usize) -> Result<Stride> {
        let (start, stop, step) = self.indices(len)?;
        Ok(Stride { start, stop, step }.normalized())
    }
}

impl From<Range<usize>> for Slice {
    fn from(value: Range<usize>) -> Self {
        Slice::new(Some(value.start as isize), Some(value.end as isize), None)
    }
}

impl From<RangeFrom<usize>> for Slice {
    fn from(value: RangeFrom<usize>) -> Self {
        Slice::new(Some(value.start as isize), None, None)
    }
}

impl From<RangeTo<usize>> for Slice {
    fn from(value: RangeTo<usize>) -> Self {
        Slice::new(None, Some(value.end as isize), None)
    }
}

impl From<RangeFull> for Slice {
    fn from(_: RangeFull) -> Self {
        Slice::full()
    }
}

/// Stride
///
/// A concrete arithmetic progression `start, start + step, ...` bounded
/// (exclusively) by `stop`. Unlike a [Slice], a stride is independent of any
/// axis length; every value it yields is a literal position.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stride {
    pub start: isize,
    pub stop: isize,
    pub step: isize,
}

impl Stride {
    pub fn new(start: isize, stop: isize, step: isize) -> Result<Self> {
        if step == 0 {
            return Err(Error::ZeroStep);
        }
        Ok(Stride { start, stop, step })
    }

    pub fn len(&self) -> usize {
        let (lo, hi) = if self.step > 0 {
            (self.start, self.stop)
        } else {
            (self.stop, self.start)
        };

        if lo < hi {
            (hi.abs_diff(lo) - 1) / self.step.unsigned_abs() + 1
        } else {
            0
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The last value of the progression, if any
    pub fn last(&self) -> Option<isize> {
        match self.len() {
            0 => None,
            n => Some(self.start + (n as isize - 1) * self.step),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = isize> {
        let Stride { start, step, .. } = *self;
        (0..self.len()).map(move |i| start + i as isize * step)
    }

    /// Apply a slice to the progression itself
    ///
    /// The result is again a progression, selecting exactly the values that
    /// slicing the materialized sequence would select.
    ///
    pub fn slice(&self, slice: &Slice) -> Result<Stride> {
        let outer = self.normalized();
        let inner = slice.stride(outer.len())?;
        let at = |i: isize| {
            i.checked_mul(outer.step)
                .and_then(|offset| offset.checked_add(outer.start))
                .ok_or(Error::IndexOverflow)
        };

        Ok(Stride {
            start: at(inner.start)?,
            stop: at(inner.stop)?,
            step: inner.step.checked_mul(outer.step).ok_or(Error::IndexOverflow)?,
        })
    }

    /// The same values, with the step reduced to `±1` when at most one value
    /// is selected
    pub fn normalized(self) -> Stride {
        let unit = self.step.signum();
        match self.len() {
            0 => Stride { stop: self.start, step: unit, ..self },
            1 => Stride { stop: self.start + unit, step: unit, ..self },
            _ => self,
        }
    }

    /// Express the progression as a [Slice]
    ///
    /// Empty progressions collapse to `start:start`. A negative stop can only
    /// arise when stepping backwards past position `0`, so it is left open
    /// rather than being misread as counted from the end.
    ///
    pub fn into_slice(self) -> Slice {
        let stop = if self.is_empty() {
            Some(self.start)
        } else if self.stop < 0 {
            None
        } else {
            Some(self.stop)
        };

        Slice::new(Some(self.start), stop, Some(self.step))
    }
}
