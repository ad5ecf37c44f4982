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

//! # Coordinate Grids
//!
//! A [`Grid`] is an ordered list of named dimensions. Every labeled array,
//! expression and entity of a model lives on one. This module implements the
//! two operations the rest of the crate is built on:
//!
//! - **Alignment** (`Grid::union`): dimensions shared by name are outer-joined,
//!   dimensions present on one side only are broadcast. The left operand's
//!   dimension and coordinate order is preserved; everything new from the right
//!   is appended.
//! - **Reindexing** (`Grid::offsets_into`): for every position of a target grid,
//!   the flat position in the source grid it reads from, or `None` when the
//!   source has no such coordinate.
//!
//! Offsets are computed per axis and combined with an outer sum, so the cost
//! is linear in the size of the target grid, never in the product of all
//! coordinate lookups.
//!
//! Unlabeled data (bare shapes) follows numpy broadcasting instead: trailing
//! dimensions are aligned and size-1 dimensions stretch.

use crate::{
    coords::{CoordValue, DEFAULT_DIM_PREFIX, Index},
    error::{ModelError, Result},
};
use smallvec::SmallVec;

/// Shape of a grid or unlabeled array.
pub type Shape = SmallVec<usize, 4>;

/// Selects along one dimension, either a single key (dropping the
/// dimension) or a list of keys (keeping it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<K> {
    One(K),
    Many(Vec<K>),
}

impl From<usize> for Selection<usize> {
    fn from(value: usize) -> Self {
        Self::One(value)
    }
}

impl From<Vec<usize>> for Selection<usize> {
    fn from(value: Vec<usize>) -> Self {
        Self::Many(value)
    }
}

impl<const N: usize> From<[usize; N]> for Selection<usize> {
    fn from(value: [usize; N]) -> Self {
        Self::Many(value.to_vec())
    }
}

impl From<CoordValue> for Selection<CoordValue> {
    fn from(value: CoordValue) -> Self {
        Self::One(value)
    }
}

impl From<i64> for Selection<CoordValue> {
    fn from(value: i64) -> Self {
        Self::One(value.into())
    }
}

impl From<i32> for Selection<CoordValue> {
    fn from(value: i32) -> Self {
        Self::One(value.into())
    }
}

impl From<&str> for Selection<CoordValue> {
    fn from(value: &str) -> Self {
        Self::One(value.into())
    }
}

impl<V: Into<CoordValue>> From<Vec<V>> for Selection<CoordValue> {
    fn from(value: Vec<V>) -> Self {
        Self::Many(value.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<CoordValue>, const N: usize> From<[V; N]> for Selection<CoordValue> {
    fn from(value: [V; N]) -> Self {
        Self::Many(value.into_iter().map(Into::into).collect())
    }
}

/// Combines per-axis steps into flat offsets, last axis fastest.
fn outer<T, F>(steps: &[Vec<T>], zero: T, combine: F) -> Vec<T>
where
    T: Copy,
    F: Fn(T, T) -> T,
{
    let mut acc = vec![zero];
    for axis in steps {
        let mut next = Vec::with_capacity(acc.len() * axis.len());
        for &base in &acc {
            next.extend(axis.iter().map(|&step| combine(base, step)));
        }
        acc = next;
    }
    acc
}

/// Row-major strides of a shape.
pub(crate) fn strides_of(shape: &[usize]) -> Shape {
    let mut strides: Shape = shape.iter().map(|_| 1).collect();
    for k in (0..shape.len().saturating_sub(1)).rev() {
        strides[k] = strides[k + 1] * shape[k + 1];
    }
    strides
}

/// Broadcasts two unlabeled shapes following numpy rules.
///
/// # Errors
///
/// `ShapeMismatch` if two aligned dimensions differ and neither is 1.
///
/// # Examples
///
/// ```rust
/// # use linmod_model::grid::broadcast_shapes;
///
/// assert_eq!(broadcast_shapes(&[3, 1], &[4]).unwrap().as_slice(), &[3, 4]);
/// assert!(broadcast_shapes(&[3], &[4]).is_err());
/// ```
pub fn broadcast_shapes(a: &[usize], b: &[usize]) -> Result<Shape> {
    let ndim = a.len().max(b.len());
    let mut out: Shape = SmallVec::new();
    for k in 0..ndim {
        let da = (k + a.len()).checked_sub(ndim).map_or(1, |j| a[j]);
        let db = (k + b.len()).checked_sub(ndim).map_or(1, |j| b[j]);
        let d = match (da, db) {
            (x, y) if x == y => x,
            (1, y) => y,
            (x, 1) => x,
            _ => {
                return Err(ModelError::ShapeMismatch {
                    left: a.to_vec(),
                    right: b.to_vec(),
                });
            }
        };
        out.push(d);
    }
    Ok(out)
}

/// How the positions of a grid map onto a grid with some dimensions summed out.
#[derive(Debug, Clone)]
pub(crate) struct Reduction {
    /// The grid that remains.
    pub grid: Grid,
    /// For every source position, its position in `grid`.
    pub target: Vec<usize>,
    /// For every source position, its row-major rank among the summed dimensions.
    pub slot: Vec<usize>,
    /// Number of source positions folded into each target position.
    pub fold: usize,
}

/// An ordered set of named dimensions.
#[derive(Clone, PartialEq)]
pub struct Grid {
    dims: SmallVec<Index, 4>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::scalar()
    }
}

impl Grid {
    /// The zero-dimensional grid with exactly one position.
    #[inline]
    pub fn scalar() -> Self {
        Self {
            dims: SmallVec::new(),
        }
    }

    /// Creates a grid from its dimensions.
    ///
    /// # Errors
    ///
    /// `DuplicateDimension` if two dimensions share a name.
    pub fn new<I>(dims: I) -> Result<Self>
    where
        I: IntoIterator<Item = Index>,
    {
        let mut grid = Self::scalar();
        for dim in dims {
            if grid.axis(dim.name()).is_some() {
                return Err(ModelError::DuplicateDimension(dim.name().to_string()));
            }
            grid.dims.push(dim);
        }
        Ok(grid)
    }

    /// Creates a grid with dimensions `dim_0, dim_1, ...` over integer ranges.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linmod_model::grid::Grid;
    ///
    /// let grid = Grid::from_shape(&[2, 3]);
    /// assert_eq!(grid.shape().as_slice(), &[2, 3]);
    /// assert_eq!(grid.dims()[1].name(), "dim_1");
    /// ```
    pub fn from_shape(shape: &[usize]) -> Self {
        Self {
            dims: shape
                .iter()
                .enumerate()
                .map(|(k, &len)| Index::range(format!("{DEFAULT_DIM_PREFIX}{k}"), len))
                .collect(),
        }
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    #[inline]
    pub fn dims(&self) -> &[Index] {
        &self.dims
    }

    /// Returns the dimension called `name`.
    pub fn dim(&self, name: &str) -> Option<&Index> {
        self.dims.iter().find(|d| d.name() == name)
    }

    /// Returns the axis number of the dimension called `name`.
    pub fn axis(&self, name: &str) -> Option<usize> {
        self.dims.iter().position(|d| d.name() == name)
    }

    pub fn shape(&self) -> Shape {
        self.dims.iter().map(Index::len).collect()
    }

    /// Number of positions; 1 for the scalar grid.
    pub fn size(&self) -> usize {
        self.dims.iter().map(Index::len).product()
    }

    pub fn strides(&self) -> Shape {
        strides_of(&self.shape())
    }

    /// Returns the first dimension with a default `dim_N` name.
    pub fn default_named_dim(&self) -> Option<&str> {
        self.dims
            .iter()
            .find(|d| d.has_default_name())
            .map(Index::name)
    }

    /// Returns `true` if every dimension of `other` is a dimension of `self`.
    pub fn contains_dims_of(&self, other: &Grid) -> bool {
        other.dims.iter().all(|d| self.axis(d.name()).is_some())
    }

    /// Returns a copy with the dimension of the same name replaced by `index`.
    pub(crate) fn with_index(&self, index: &Index) -> Grid {
        let mut grid = self.clone();
        if let Some(axis) = grid.axis(index.name()) {
            grid.dims[axis] = index.clone();
        }
        grid
    }

    /// Aligns and broadcasts two grids.
    ///
    /// Shared dimensions are outer-joined; dimensions of `other` that `self`
    /// lacks are appended after the dimensions of `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linmod_model::{coords::Index, grid::Grid};
    ///
    /// let a = Grid::new([Index::new("t", [0, 1]).unwrap()]).unwrap();
    /// let b = Grid::new([
    ///     Index::new("r", ["x"]).unwrap(),
    ///     Index::new("t", [1, 2]).unwrap(),
    /// ])
    /// .unwrap();
    /// let u = a.union(&b);
    /// assert_eq!(u.shape().as_slice(), &[3, 1]);
    /// assert_eq!(u.dims()[1].name(), "r");
    /// ```
    pub fn union(&self, other: &Grid) -> Grid {
        if self == other || other.is_scalar() {
            return self.clone();
        }
        if self.is_scalar() {
            return other.clone();
        }

        let mut dims: SmallVec<Index, 4> = self
            .dims
            .iter()
            .map(|d| match other.dim(d.name()) {
                Some(o) => d.union(o),
                None => d.clone(),
            })
            .collect();
        dims.extend(
            other
                .dims
                .iter()
                .filter(|d| self.axis(d.name()).is_none())
                .cloned(),
        );
        Grid { dims }
    }

    /// Per-axis read offsets of `self` for every coordinate of `target`.
    fn axis_steps(&self, target: &Grid) -> Vec<Vec<Option<usize>>> {
        let strides = self.strides();
        target
            .dims
            .iter()
            .map(|tdim| match self.axis(tdim.name()) {
                Some(axis) => {
                    let src = &self.dims[axis];
                    let stride = strides[axis];
                    if src == tdim {
                        (0..tdim.len()).map(|i| Some(i * stride)).collect()
                    } else {
                        tdim.values()
                            .iter()
                            .map(|v| src.position(v).map(|p| p * stride))
                            .collect()
                    }
                }
                None => vec![Some(0); tdim.len()],
            })
            .collect()
    }

    /// For every position of `target`, the position of `self` holding the same
    /// coordinates, or `None` if `self` has no such coordinates.
    ///
    /// Dimensions of `target` that `self` lacks are broadcast.
    ///
    /// # Errors
    ///
    /// `MissingDimension` if `self` has a dimension that `target` lacks.
    pub fn offsets_into(&self, target: &Grid) -> Result<Vec<Option<usize>>> {
        if let Some(dim) = self.dims.iter().find(|d| target.axis(d.name()).is_none()) {
            return Err(ModelError::MissingDimension {
                dim: dim.name().to_string(),
            });
        }
        Ok(self.aligned_offsets(target))
    }

    /// Like [`Grid::offsets_into`] for targets produced by [`Grid::union`],
    /// which always contain every dimension of `self`.
    pub(crate) fn aligned_offsets(&self, target: &Grid) -> Vec<Option<usize>> {
        debug_assert!(
            target.contains_dims_of(self),
            "called `Grid::aligned_offsets` with a target missing source dimensions"
        );

        if self == target {
            return (0..self.size()).map(Some).collect();
        }
        outer(&self.axis_steps(target), Some(0), |a, b| {
            a.zip(b).map(|(a, b)| a + b)
        })
    }

    /// Read offsets of unlabeled data of shape `shape` for every position of
    /// `self`, aligning trailing dimensions and stretching size-1 dimensions.
    ///
    /// # Errors
    ///
    /// - `UnlabeledArray` if `self` is scalar but the data is not.
    /// - `ShapeMismatch` if the data would have to enlarge `self`.
    pub(crate) fn attach_offsets(&self, shape: &[usize]) -> Result<Vec<usize>> {
        let target = self.shape();
        let mismatch = || {
            if self.is_scalar() {
                ModelError::UnlabeledArray {
                    shape: shape.to_vec(),
                }
            } else {
                ModelError::ShapeMismatch {
                    left: shape.to_vec(),
                    right: target.to_vec(),
                }
            }
        };

        let broadcast = broadcast_shapes(shape, &target).map_err(|_| mismatch())?;
        if broadcast.as_slice() != target.as_slice() {
            return Err(mismatch());
        }

        let strides = strides_of(shape);
        let lead = target.len() - shape.len();
        let steps: Vec<Vec<usize>> = (0..target.len())
            .map(|k| match k.checked_sub(lead) {
                Some(j) if shape[j] != 1 => (0..target[k]).map(|i| i * strides[j]).collect(),
                _ => vec![0; target[k]],
            })
            .collect();
        Ok(outer(&steps, 0, |a, b| a + b))
    }

    /// Returns the coordinates of the flat `position`.
    pub fn coords_at(&self, position: usize) -> Vec<&CoordValue> {
        debug_assert!(
            position < self.size(),
            "called `Grid::coords_at` with position out of bounds: the size is {} but the position is {}",
            self.size(),
            position
        );

        let strides = self.strides();
        self.dims
            .iter()
            .zip(strides.iter())
            .map(|(dim, &stride)| &dim.values()[(position / stride) % dim.len()])
            .collect()
    }

    /// Translates a coordinate selection on `dim` into a position selection.
    pub(crate) fn locate(
        &self,
        dim: &str,
        selection: &Selection<CoordValue>,
    ) -> Result<Selection<usize>> {
        let index = self
            .dim(dim)
            .ok_or_else(|| ModelError::UnknownDimension(dim.to_string()))?;
        let find = |value: &CoordValue| {
            index
                .position(value)
                .ok_or_else(|| ModelError::CoordinateNotFound {
                    dim: dim.to_string(),
                    value: value.to_string(),
                })
        };
        Ok(match selection {
            Selection::One(v) => Selection::One(find(v)?),
            Selection::Many(vs) => Selection::Many(vs.iter().map(find).collect::<Result<_>>()?),
        })
    }

    /// Selects positions along `dim`.
    ///
    /// Returns the selected grid and, for each of its positions, the source
    /// position in `self`.
    pub(crate) fn select(&self, dim: &str, selection: &Selection<usize>) -> Result<(Grid, Vec<usize>)> {
        let axis = self
            .axis(dim)
            .ok_or_else(|| ModelError::UnknownDimension(dim.to_string()))?;
        let len = self.dims[axis].len();
        let picked: &[usize] = match selection {
            Selection::One(p) => std::slice::from_ref(p),
            Selection::Many(ps) => ps,
        };
        if let Some(&position) = picked.iter().find(|&&p| p >= len) {
            return Err(ModelError::PositionOutOfBounds {
                dim: dim.to_string(),
                position,
                len,
            });
        }

        let strides = self.strides();
        let steps: Vec<Vec<usize>> = self
            .dims
            .iter()
            .enumerate()
            .map(|(k, d)| {
                if k == axis {
                    picked.iter().map(|&p| p * strides[k]).collect()
                } else {
                    (0..d.len()).map(|i| i * strides[k]).collect()
                }
            })
            .collect();
        let offsets = outer(&steps, 0, |a, b| a + b);

        let mut grid = self.clone();
        match selection {
            Selection::One(_) => {
                grid.dims.remove(axis);
            }
            Selection::Many(ps) => grid.dims[axis] = self.dims[axis].take(ps)?,
        }
        Ok((grid, offsets))
    }

    /// Describes summing out `dims`.
    ///
    /// # Errors
    ///
    /// `UnknownDimension` if a name is not a dimension of `self`.
    pub(crate) fn reduce(&self, dims: &[&str]) -> Result<Reduction> {
        if let Some(missing) = dims.iter().find(|d| self.axis(d).is_none()) {
            return Err(ModelError::UnknownDimension(missing.to_string()));
        }
        Ok(self.reduction(|d| dims.contains(&d.name())))
    }

    /// Describes summing out every dimension for which `folded` holds.
    pub(crate) fn reduction<F>(&self, folded: F) -> Reduction
    where
        F: Fn(&Index) -> bool,
    {
        let kept: SmallVec<Index, 4> = self.dims.iter().filter(|d| !folded(d)).cloned().collect();
        let kept_shape: Shape = kept.iter().map(Index::len).collect();
        let folded_shape: Shape = self
            .dims
            .iter()
            .filter(|d| folded(d))
            .map(Index::len)
            .collect();
        let kept_strides = strides_of(&kept_shape);
        let folded_strides = strides_of(&folded_shape);

        let (mut k, mut r) = (0, 0);
        let steps: Vec<Vec<(usize, usize)>> = self
            .dims
            .iter()
            .map(|d| {
                if folded(d) {
                    let stride = folded_strides[r];
                    r += 1;
                    (0..d.len()).map(|i| (0, i * stride)).collect()
                } else {
                    let stride = kept_strides[k];
                    k += 1;
                    (0..d.len()).map(|i| (i * stride, 0)).collect()
                }
            })
            .collect();
        let pairs = outer(&steps, (0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

        Reduction {
            grid: Grid { dims: kept },
            target: pairs.iter().map(|p| p.0).collect(),
            slot: pairs.iter().map(|p| p.1).collect(),
            fold: folded_shape.iter().product(),
        }
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dims: Vec<String> = self
            .dims
            .iter()
            .map(|d| format!("{}: {}", d.name(), d.len()))
            .collect();
        write!(f, "Grid({})", dims.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx<V: Into<CoordValue>>(name: &str, values: impl IntoIterator<Item = V>) -> Index {
        Index::new(name, values).unwrap()
    }

    #[test]
    fn test_scalar_grid() {
        let g = Grid::scalar();
        assert!(g.is_scalar());
        assert_eq!(g.size(), 1);
        assert!(g.shape().is_empty());
    }

    #[test]
    fn test_new_rejects_duplicate_dims() {
        let err = Grid::new([Index::range("t", 2), Index::range("t", 3)]).unwrap_err();
        assert_eq!(err, ModelError::DuplicateDimension("t".into()));
    }

    #[test]
    fn test_strides_row_major() {
        let g = Grid::from_shape(&[2, 3, 4]);
        assert_eq!(g.strides().as_slice(), &[12, 4, 1]);
        assert_eq!(g.size(), 24);
    }

    #[test]
    fn test_broadcast_shapes_rules() {
        assert_eq!(broadcast_shapes(&[], &[3]).unwrap().as_slice(), &[3]);
        assert_eq!(broadcast_shapes(&[2, 1], &[1, 5]).unwrap().as_slice(), &[2, 5]);
        assert_eq!(broadcast_shapes(&[5], &[2, 5]).unwrap().as_slice(), &[2, 5]);
        assert!(matches!(
            broadcast_shapes(&[2], &[3]),
            Err(ModelError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_union_outer_joins_shared_dims() {
        let a = Grid::new([idx("t", [0, 1, 2])]).unwrap();
        let b = Grid::new([idx("t", [2, 3])]).unwrap();
        let u = a.union(&b);
        assert_eq!(u.shape().as_slice(), &[4]);
        assert_eq!(u.dims()[0].position(&3.into()), Some(3));
    }

    #[test]
    fn test_union_with_scalar_is_identity() {
        let a = Grid::from_shape(&[3]);
        assert_eq!(a.union(&Grid::scalar()), a);
        assert_eq!(Grid::scalar().union(&a), a);
    }

    #[test]
    fn test_union_appends_right_only_dims() {
        let a = Grid::new([idx("first", [0, 1])]).unwrap();
        let b = Grid::new([idx("second", [1, 2, 3])]).unwrap();
        let u = a.union(&b);
        let names: Vec<&str> = u.dims().iter().map(Index::name).collect();
        assert_eq!(names, ["first", "second"]);
        assert_eq!(u.size(), 6);
    }

    #[test]
    fn test_offsets_into_marks_missing_and_broadcasts() {
        let src = Grid::new([idx("t", [0, 1])]).unwrap();
        let target = Grid::new([idx("t", [1, 5]), idx("r", ["a", "b"])]).unwrap();
        let offsets = src.offsets_into(&target).unwrap();
        assert_eq!(offsets, vec![Some(1), Some(1), None, None]);
    }

    #[test]
    fn test_offsets_into_rejects_dropped_dimension() {
        let src = Grid::from_shape(&[2, 2]);
        let target = Grid::from_shape(&[2]);
        assert!(matches!(
            src.offsets_into(&target),
            Err(ModelError::MissingDimension { .. })
        ));
    }

    #[test]
    fn test_offsets_into_respects_permuted_dims() {
        let src = Grid::new([idx("a", [0, 1]), idx("b", [0, 1, 2])]).unwrap();
        let target = Grid::new([idx("b", [0, 1, 2]), idx("a", [0, 1])]).unwrap();
        let offsets = src.offsets_into(&target).unwrap();
        // target (b=1, a=1) -> src (a=1, b=1) = 1 * 3 + 1
        assert_eq!(offsets[3], Some(4));
    }

    #[test]
    fn test_attach_trailing_dims() {
        let g = Grid::from_shape(&[2, 3]);
        assert_eq!(g.attach_offsets(&[3]).unwrap(), vec![0, 1, 2, 0, 1, 2]);
        assert_eq!(g.attach_offsets(&[2, 1]).unwrap(), vec![0, 0, 0, 1, 1, 1]);
        assert_eq!(g.attach_offsets(&[]).unwrap(), vec![0; 6]);
    }

    #[test]
    fn test_attach_rejects_enlarging_data() {
        let g = Grid::from_shape(&[3]);
        assert!(matches!(
            g.attach_offsets(&[2, 3]),
            Err(ModelError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            Grid::scalar().attach_offsets(&[2]),
            Err(ModelError::UnlabeledArray { .. })
        ));
    }

    #[test]
    fn test_coords_at_unravels() {
        let g = Grid::new([idx("r", ["a", "b"]), idx("t", [10, 20, 30])]).unwrap();
        let coords = g.coords_at(4);
        assert_eq!(coords, vec![&CoordValue::from("b"), &CoordValue::from(20)]);
    }

    #[test]
    fn test_select_single_drops_dim() {
        let g = Grid::from_shape(&[2, 3]);
        let (sub, offsets) = g.select("dim_0", &Selection::One(1)).unwrap();
        assert_eq!(sub.shape().as_slice(), &[3]);
        assert_eq!(offsets, vec![3, 4, 5]);
    }

    #[test]
    fn test_select_many_keeps_dim() {
        let g = Grid::from_shape(&[2, 3]);
        let (sub, offsets) = g.select("dim_1", &Selection::Many(vec![2, 0])).unwrap();
        assert_eq!(sub.shape().as_slice(), &[2, 2]);
        assert_eq!(offsets, vec![2, 0, 5, 3]);
    }

    #[test]
    fn test_select_out_of_bounds() {
        let g = Grid::from_shape(&[2]);
        assert!(matches!(
            g.select("dim_0", &Selection::One(2)),
            Err(ModelError::PositionOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_locate_unknown_coordinate() {
        let g = Grid::new([idx("r", ["a"])]).unwrap();
        assert!(matches!(
            g.locate("r", &Selection::One("z".into())),
            Err(ModelError::CoordinateNotFound { .. })
        ));
        assert!(matches!(
            g.locate("q", &Selection::One("a".into())),
            Err(ModelError::UnknownDimension(_))
        ));
    }

    #[test]
    fn test_reduce_middle_dim() {
        let g = Grid::from_shape(&[2, 3, 2]);
        let red = g.reduce(&["dim_1"]).unwrap();
        assert_eq!(red.grid.shape().as_slice(), &[2, 2]);
        assert_eq!(red.fold, 3);
        // source (1, 2, 1) = 1*6 + 2*2 + 1 = 11 -> target (1, 1) = 3, slot 2
        assert_eq!(red.target[11], 3);
        assert_eq!(red.slot[11], 2);
    }

    #[test]
    fn test_reduce_all_dims() {
        let g = Grid::from_shape(&[2, 2]);
        let red = g.reduce(&["dim_0", "dim_1"]).unwrap();
        assert!(red.grid.is_scalar());
        assert_eq!(red.target, vec![0; 4]);
        assert_eq!(red.slot, vec![0, 1, 2, 3]);
    }
}
