// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Labeled N-dimensional arrays and caller-supplied numeric data.
//!
//! [`LabeledArray`] pairs a [`Grid`] with row-major data. It is the storage
//! behind bounds, right-hand sides, masks and label arrays. [`ArrayLike`] is
//! what callers pass in wherever numbers are expected: a scalar, unlabeled
//! data ([`RawArray`]) or a labeled array.

use crate::{
    coords::CoordValue,
    error::{ModelError, Result},
    grid::{Grid, Selection, Shape},
};
use linmod_core::num::missing::Missing;

/// Values on a grid, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledArray<T> {
    grid: Grid,
    data: Vec<T>,
}

impl<T> LabeledArray<T>
where
    T: Copy,
{
    /// Creates an array from a grid and row-major data.
    ///
    /// # Errors
    ///
    /// `DataLength` if `data.len() != grid.size()`.
    pub fn new(grid: Grid, data: Vec<T>) -> Result<Self> {
        if data.len() != grid.size() {
            return Err(ModelError::DataLength {
                len: data.len(),
                size: grid.size(),
            });
        }
        Ok(Self { grid, data })
    }

    /// Creates an array with every position set to `value`.
    pub fn full(grid: Grid, value: T) -> Self {
        let data = vec![value; grid.size()];
        Self { grid, data }
    }

    /// Creates a zero-dimensional array.
    pub fn scalar(value: T) -> Self {
        Self::full(Grid::scalar(), value)
    }

    pub(crate) fn from_parts(grid: Grid, data: Vec<T>) -> Self {
        debug_assert_eq!(
            data.len(),
            grid.size(),
            "called `LabeledArray::from_parts` with data that does not fit the grid"
        );
        Self { grid, data }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.grid.shape()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Returns the value at the given coordinates, one per dimension.
    pub fn get(&self, coords: &[CoordValue]) -> Option<T> {
        if coords.len() != self.grid.ndim() {
            return None;
        }
        let strides = self.grid.strides();
        let mut position = 0;
        for ((dim, stride), value) in self.grid.dims().iter().zip(strides.iter()).zip(coords) {
            position += dim.position(value)? * stride;
        }
        self.data.get(position).copied()
    }

    /// Maps every value.
    pub fn map<U, F>(&self, f: F) -> LabeledArray<U>
    where
        U: Copy,
        F: FnMut(T) -> U,
    {
        LabeledArray {
            grid: self.grid.clone(),
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Returns `true` if `pred` holds at every position.
    pub fn all<F>(&self, pred: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.data.iter().all(pred)
    }

    /// Counts the positions where `pred` holds.
    pub fn count<F>(&self, mut pred: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        self.data.iter().filter(|v| pred(v)).count()
    }

    fn gather(&self, grid: Grid, offsets: &[Option<usize>], fill: T) -> Self {
        let data = offsets
            .iter()
            .map(|o| o.map_or(fill, |p| self.data[p]))
            .collect();
        Self { grid, data }
    }

    /// Reindexes onto `target`, filling positions without a source with `fill`.
    ///
    /// # Errors
    ///
    /// `MissingDimension` if `self` has a dimension `target` lacks.
    pub fn reindex_with(&self, target: &Grid, fill: T) -> Result<Self> {
        if &self.grid == target {
            return Ok(self.clone());
        }
        let offsets = self.grid.offsets_into(target)?;
        Ok(self.gather(target.clone(), &offsets, fill))
    }

    /// Reindexes onto a grid known to contain every dimension of `self`.
    pub(crate) fn aligned_with(&self, target: &Grid, fill: T) -> Self {
        if &self.grid == target {
            return self.clone();
        }
        let offsets = self.grid.aligned_offsets(target);
        self.gather(target.clone(), &offsets, fill)
    }

    /// Combines two arrays elementwise on the union of their grids.
    pub fn zip_with<U, V, F>(&self, other: &LabeledArray<U>, fill: (T, U), mut f: F) -> LabeledArray<V>
    where
        U: Copy,
        V: Copy,
        F: FnMut(T, U) -> V,
    {
        let grid = self.grid.union(&other.grid);
        let a = self.aligned_with(&grid, fill.0);
        let b = other.aligned_with(&grid, fill.1);
        let data = a.data.iter().zip(&b.data).map(|(&x, &y)| f(x, y)).collect();
        LabeledArray { grid, data }
    }

    /// Selects by position along `dim`.
    pub fn isel(&self, dim: &str, selection: impl Into<Selection<usize>>) -> Result<Self> {
        let (grid, offsets) = self.grid.select(dim, &selection.into())?;
        let data = offsets.iter().map(|&p| self.data[p]).collect();
        Ok(Self { grid, data })
    }

    /// Selects by coordinate along `dim`.
    pub fn sel(&self, dim: &str, selection: impl Into<Selection<CoordValue>>) -> Result<Self> {
        let positions = self.grid.locate(dim, &selection.into())?;
        self.isel(dim, positions)
    }
}

impl<T> LabeledArray<T>
where
    T: Missing,
{
    /// Reindexes onto `target`, filling new positions with `T::missing()`.
    pub fn reindex(&self, target: &Grid) -> Result<Self> {
        self.reindex_with(target, T::missing())
    }

    /// Counts positions that hold a value.
    pub fn count_present(&self) -> usize {
        self.count(|v| !v.is_missing())
    }
}

/// Unlabeled row-major data with an explicit shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RawArray {
    shape: Shape,
    data: Vec<f64>,
}

impl RawArray {
    /// Creates unlabeled data.
    ///
    /// # Errors
    ///
    /// `DataLength` if the data does not fill the shape.
    pub fn new(shape: &[usize], data: Vec<f64>) -> Result<Self> {
        let size: usize = shape.iter().product();
        if size != data.len() {
            return Err(ModelError::DataLength {
                len: data.len(),
                size,
            });
        }
        Ok(Self {
            shape: shape.iter().copied().collect(),
            data,
        })
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Places the data on `grid` by trailing-dimension broadcasting.
    pub fn attach(&self, grid: &Grid) -> Result<LabeledArray<f64>> {
        let offsets = grid.attach_offsets(&self.shape)?;
        Ok(LabeledArray::from_parts(
            grid.clone(),
            offsets.iter().map(|&p| self.data[p]).collect(),
        ))
    }

    /// Labels the data with default `dim_N` dimensions.
    pub fn into_labeled(self) -> LabeledArray<f64> {
        LabeledArray::from_parts(Grid::from_shape(&self.shape), self.data)
    }
}

impl From<Vec<f64>> for RawArray {
    fn from(data: Vec<f64>) -> Self {
        Self {
            shape: std::iter::once(data.len()).collect(),
            data,
        }
    }
}

/// Numeric input: a scalar, unlabeled data or a labeled array.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayLike {
    Scalar(f64),
    Raw(RawArray),
    Labeled(LabeledArray<f64>),
}

impl ArrayLike {
    /// Returns the grid of labeled input.
    pub fn grid(&self) -> Option<&Grid> {
        match self {
            Self::Labeled(array) => Some(array.grid()),
            _ => None,
        }
    }

    /// Returns the scalar value, if this is a scalar.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Materializes the input on `grid`.
    ///
    /// Labeled input must not have dimensions `grid` lacks; positions it does
    /// not cover are `NaN`.
    pub fn resolve(&self, grid: &Grid) -> Result<LabeledArray<f64>> {
        match self {
            Self::Scalar(v) => Ok(LabeledArray::full(grid.clone(), *v)),
            Self::Raw(raw) => raw.attach(grid),
            Self::Labeled(array) => array.reindex(grid),
        }
    }
}

impl From<f64> for ArrayLike {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<i32> for ArrayLike {
    fn from(value: i32) -> Self {
        Self::Scalar(value as f64)
    }
}

impl From<Vec<f64>> for ArrayLike {
    fn from(value: Vec<f64>) -> Self {
        Self::Raw(value.into())
    }
}

impl From<RawArray> for ArrayLike {
    fn from(value: RawArray) -> Self {
        Self::Raw(value)
    }
}

impl From<LabeledArray<f64>> for ArrayLike {
    fn from(value: LabeledArray<f64>) -> Self {
        Self::Labeled(value)
    }
}

impl From<&LabeledArray<f64>> for ArrayLike {
    fn from(value: &LabeledArray<f64>) -> Self {
        Self::Labeled(value.clone())
    }
}
