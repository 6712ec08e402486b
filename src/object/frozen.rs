use super::dense::{take_axis, Buffer};
use super::index::Index;
use crate::error::{Error, Result};

/// Externally immutable array
///
/// Exposes no way to write to its buffer, so it is always safe to alias and
/// never needs copy-on-write protection.
///
#[derive(Debug, Clone, PartialEq)]
pub struct FrozenArray(Buffer);

impl FrozenArray {
    pub fn new(data: Buffer) -> Self {
        FrozenArray(data)
    }

    pub fn shape(&self) -> &[usize] {
        self.0.shape()
    }

    pub fn get(&self, index: &[usize]) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn as_ptr(&self) -> *const f64 {
        self.0.as_ptr()
    }

    pub fn subset(&self, rows: Option<&Index>, cols: Option<&Index>) -> Result<Self> {
        let mut data = self.0.clone();
        for (axis, index) in [rows, cols].into_iter().enumerate() {
            if let Some(index) = index {
                if axis >= data.ndim() {
                    return Err(Error::AxisOutOfRange {
                        axis,
                        ndim: data.ndim(),
                    });
                }
                data = take_axis(data, axis, index)?;
            }
        }
        Ok(FrozenArray(data))
    }
}
