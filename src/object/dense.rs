use std::rc::Rc;

use ndarray::{ArcArray, Array, Array2, Axis, IxDyn};

use super::index::{Index, Stride};
use crate::err;
use crate::error::{Error, Result};

pub type Buffer = ArcArray<f64, IxDyn>;

/// Element type of a dense array
///
/// Record arrays carry named fields; the last axis of the buffer enumerates
/// them and is not an indexable axis of the array.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DType {
    #[default]
    Float,
    Record(Rc<[String]>),
}

/// Dense n-dimensional array
///
/// The buffer is reference counted. Clones and slices share memory until
/// one of them is written to, at which point the writer takes its own copy,
/// so a shared buffer is never modified through an alias.
///
#[derive(Debug, Clone, PartialEq)]
pub struct DenseArray {
    data: Buffer,
    dtype: DType,
}

impl DenseArray {
    pub fn new(data: Buffer) -> Self {
        DenseArray {
            data,
            dtype: DType::Float,
        }
    }

    pub fn from_shape_vec(shape: &[usize], values: Vec<f64>) -> Result<Self> {
        match Array::from_shape_vec(IxDyn(shape), values) {
            Ok(data) => Ok(DenseArray::new(data.into_shared())),
            Err(e) => err!(e),
        }
    }

    /// A record array, with one named field per entry of the last axis
    pub fn records(data: Buffer, fields: Vec<String>) -> Result<Self> {
        if data.ndim() == 0 {
            return Err(Error::AxisOutOfRange { axis: 0, ndim: 0 });
        }

        let found = data.shape().last().copied().unwrap_or(0);
        if found != fields.len() {
            return Err(Error::ShapeMismatch {
                what: "record fields".to_string(),
                axis: data.ndim().saturating_sub(1),
                expected: fields.len(),
                found,
            });
        }

        Ok(DenseArray {
            data,
            dtype: DType::Record(fields.into()),
        })
    }

    pub fn data(&self) -> &Buffer {
        &self.data
    }

    pub fn dtype(&self) -> &DType {
        &self.dtype
    }

    /// Field names of a record array
    pub fn keys(&self) -> Option<&[String]> {
        match &self.dtype {
            DType::Record(fields) => Some(&fields[..]),
            DType::Float => None,
        }
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Number of indexable axes, excluding the field axis of record arrays
    pub fn ndim(&self) -> usize {
        match self.dtype {
            DType::Record(_) => self.data.ndim().saturating_sub(1),
            DType::Float => self.data.ndim(),
        }
    }

    pub fn get(&self, index: &[usize]) -> Option<f64> {
        self.data.get(index).copied()
    }

    /// Write a single element
    ///
    /// If the buffer is shared with other arrays it is copied first.
    ///
    pub fn set(&mut self, index: &[usize], value: f64) -> Result<()> {
        check_bounds(self.data.shape(), index)?;
        match self.data.get_mut(index) {
            Some(x) => *x = value,
            None => return err!(format!("unable to index array with {index:?}")),
        }
        Ok(())
    }

    /// A copy that shares no memory with `self`
    pub fn deep_copy(&self) -> Self {
        DenseArray {
            data: self.data.to_owned().into_shared(),
            dtype: self.dtype.clone(),
        }
    }

    pub fn as_ptr(&self) -> *const f64 {
        self.data.as_ptr()
    }

    /// Subset along the first two axes
    ///
    /// Slices keep sharing the buffer, any other index selects into a new
    /// buffer.
    ///
    pub fn subset(&self, rows: Option<&Index>, cols: Option<&Index>) -> Result<Self> {
        let mut data = self.data.clone();
        for (axis, index) in [rows, cols].into_iter().enumerate() {
            if let Some(index) = index {
                if axis >= self.ndim() {
                    return Err(Error::AxisOutOfRange {
                        axis,
                        ndim: self.ndim(),
                    });
                }
                data = take_axis(data, axis, index)?;
            }
        }

        Ok(DenseArray {
            data,
            dtype: self.dtype.clone(),
        })
    }

    pub fn to_array2(&self) -> Result<Array2<f64>> {
        match self.data.to_owned().into_dimensionality() {
            Ok(x) => Ok(x),
            Err(e) => err!(e),
        }
    }
}

impl From<Array2<f64>> for DenseArray {
    fn from(value: Array2<f64>) -> Self {
        DenseArray::new(value.into_dyn().into_shared())
    }
}

impl From<Array<f64, IxDyn>> for DenseArray {
    fn from(value: Array<f64, IxDyn>) -> Self {
        DenseArray::new(value.into_shared())
    }
}

fn check_bounds(shape: &[usize], index: &[usize]) -> Result<()> {
    if index.len() != shape.len() {
        return Err(Error::AxisOutOfRange {
            axis: index.len().saturating_sub(1),
            ndim: shape.len(),
        });
    }

    for (&i, &len) in index.iter().zip(shape) {
        if i >= len {
            return Err(Error::IndexOutOfBounds {
                index: i as isize,
                len,
            });
        }
    }
    Ok(())
}

/// Apply an index along one axis of a buffer
pub(crate) fn take_axis(mut data: Buffer, axis: usize, index: &Index) -> Result<Buffer> {
    let Some(&len) = data.shape().get(axis) else {
        return Err(Error::AxisOutOfRange {
            axis,
            ndim: data.ndim(),
        });
    };

    match index {
        Index::Slice(s) => {
            data.slice_axis_inplace(Axis(axis), as_nd_slice(&s.stride(len)?));
            Ok(data)
        }
        _ => {
            let positions = index.positions(len)?;
            Ok(data.select(Axis(axis), &positions).into_shared())
        }
    }
}

/// Translate a normalized progression into an `ndarray` slice
///
/// `ndarray` applies negative steps from the end of the sliced range, so a
/// backwards progression is expressed as the range it covers.
///
fn as_nd_slice(stride: &Stride) -> ndarray::Slice {
    match stride.last() {
        None => ndarray::Slice::new(0, Some(0), 1),
        Some(_) if stride.step > 0 => {
            ndarray::Slice::new(stride.start, Some(stride.stop), stride.step)
        }
        Some(last) => ndarray::Slice::new(last, Some(stride.start + 1), stride.step),
    }
}
