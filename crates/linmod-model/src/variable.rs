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

//! # Variables
//!
//! A [`Variable`] is a block of decision variables replicated over a grid.
//! Each grid position owns one label from the model's registry, or the
//! sentinel if the position is masked out. Bounds live on the same grid.
//!
//! Handles returned by the model are snapshots: when a later declaration
//! enlarges a shared dimension, the model's copy is reindexed but handles
//! already held by the caller are not.

use crate::{
    array::{ArrayLike, LabeledArray},
    constraint::{AnonymousConstraint, Rhs},
    coords::CoordValue,
    error::{ModelError, Result},
    expr::LinearExpression,
    grid::{Grid, Selection, Shape},
    registry::{LabelKind, LabelQuery, resolve_label},
    sign::Sign,
};
use indexmap::IndexMap;
use linmod_core::label::Label;
use std::ops::{Add, Mul, Neg, Range, Sub};

/// A named block of decision variables.
#[derive(Debug, Clone)]
pub struct Variable {
    name: String,
    labels: LabeledArray<Label>,
    lower: LabeledArray<f64>,
    upper: LabeledArray<f64>,
    mask: Option<LabeledArray<bool>>,
    range: Range<i64>,
}

impl Variable {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One label per grid position; masked positions hold the sentinel.
    #[inline]
    pub fn labels(&self) -> &LabeledArray<Label> {
        &self.labels
    }

    #[inline]
    pub fn lower(&self) -> &LabeledArray<f64> {
        &self.lower
    }

    #[inline]
    pub fn upper(&self) -> &LabeledArray<f64> {
        &self.upper
    }

    #[inline]
    pub fn mask(&self) -> Option<&LabeledArray<bool>> {
        self.mask.as_ref()
    }

    /// The block of labels allocated for this variable.
    #[inline]
    pub fn label_range(&self) -> Range<i64> {
        self.range.clone()
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        self.labels.grid()
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.labels.shape()
    }

    /// Number of positions holding a label.
    pub fn count_active(&self) -> usize {
        self.labels.count(|l| l.is_some())
    }

    /// The single-term expression `1 * self`.
    pub fn to_expr(&self) -> LinearExpression {
        LinearExpression::from(self)
    }

    /// `factor * self`
    ///
    /// # Errors
    ///
    /// See [`LinearExpression::scale`].
    pub fn scale(&self, factor: impl Into<ArrayLike>) -> Result<LinearExpression> {
        self.to_expr().scale(factor)
    }

    /// Sums over `dims`.
    pub fn sum(&self, dims: &[&str]) -> Result<LinearExpression> {
        self.to_expr().sum(dims)
    }

    /// Sums over every dimension.
    pub fn sum_all(&self) -> LinearExpression {
        self.to_expr().sum_all()
    }

    /// `self <= rhs`
    pub fn le(&self, rhs: impl Into<Rhs>) -> Result<AnonymousConstraint> {
        self.to_expr().compare(Sign::LessEqual, rhs)
    }

    /// `self >= rhs`
    pub fn ge(&self, rhs: impl Into<Rhs>) -> Result<AnonymousConstraint> {
        self.to_expr().compare(Sign::GreaterEqual, rhs)
    }

    /// `self == rhs`
    pub fn eq(&self, rhs: impl Into<Rhs>) -> Result<AnonymousConstraint> {
        self.to_expr().compare(Sign::Equal, rhs)
    }

    /// Selects by position along `dim`.
    pub fn isel(&self, dim: &str, selection: impl Into<Selection<usize>>) -> Result<Self> {
        let selection = selection.into();
        Ok(Self {
            name: self.name.clone(),
            labels: self.labels.isel(dim, selection.clone())?,
            lower: self.lower.isel(dim, selection.clone())?,
            upper: self.upper.isel(dim, selection.clone())?,
            mask: self
                .mask
                .as_ref()
                .map(|m| m.isel(dim, selection))
                .transpose()?,
            range: self.range.clone(),
        })
    }

    /// Selects by coordinate along `dim`.
    pub fn sel(&self, dim: &str, selection: impl Into<Selection<CoordValue>>) -> Result<Self> {
        let positions = self.grid().locate(dim, &selection.into())?;
        self.isel(dim, positions)
    }

    /// The scalar variable at flat row-major `position`.
    pub(crate) fn at(&self, position: usize) -> Result<Self> {
        let grid = self.grid();
        debug_assert!(position < grid.size());
        let steps: Vec<(String, usize)> = grid
            .dims()
            .iter()
            .zip(grid.strides().iter().zip(grid.shape().iter()))
            .map(|(d, (&stride, &len))| (d.name().to_owned(), position / stride % len))
            .collect();
        steps
            .iter()
            .try_fold(self.clone(), |var, (dim, i)| var.isel(dim, *i))
    }

    /// Reindexes onto an enlarged copy of its own grid; new positions are
    /// missing.
    pub(crate) fn reindex_onto(&mut self, grid: &Grid) {
        self.labels = self.labels.aligned_with(grid, Label::NONE);
        self.lower = self.lower.aligned_with(grid, f64::NAN);
        self.upper = self.upper.aligned_with(grid, f64::NAN);
        if let Some(mask) = &self.mask {
            self.mask = Some(mask.aligned_with(grid, false));
        }
    }
}

/// Describes a block of variables to add to a model.
///
/// Bounds default to `-inf` and `+inf`. The grid is `coords` joined with the
/// grids of labeled bounds; unlabeled bounds are attached to that grid.
///
/// # Examples
///
/// ```rust
/// # use linmod_model::{grid::Grid, model::Model, variable::VariableDeclaration};
///
/// let mut m = Model::new();
/// let x = m
///     .add_variables(
///         VariableDeclaration::new()
///             .name("x")
///             .lower(0.0)
///             .upper(vec![1.0, 2.0, 3.0])
///             .coords(Grid::from_shape(&[3])),
///     )
///     .unwrap();
/// assert_eq!(x.shape().as_slice(), &[3]);
/// assert_eq!(x.upper().data(), &[1.0, 2.0, 3.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VariableDeclaration {
    name: Option<String>,
    lower: Option<ArrayLike>,
    upper: Option<ArrayLike>,
    coords: Option<Grid>,
    mask: Option<LabeledArray<bool>>,
}

/// A declaration checked against its own inputs, ready for label allocation.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedVariable {
    pub grid: Grid,
    pub lower: LabeledArray<f64>,
    pub upper: LabeledArray<f64>,
    pub mask: Option<LabeledArray<bool>>,
}

impl VariableDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn lower(mut self, lower: impl Into<ArrayLike>) -> Self {
        self.lower = Some(lower.into());
        self
    }

    pub fn upper(mut self, upper: impl Into<ArrayLike>) -> Self {
        self.upper = Some(upper.into());
        self
    }

    pub fn coords(mut self, coords: Grid) -> Self {
        self.coords = Some(coords);
        self
    }

    /// Positions where the mask is `false`, or that the mask does not
    /// cover, get no label.
    pub fn mask(mut self, mask: LabeledArray<bool>) -> Self {
        self.mask = Some(mask);
        self
    }

    pub(crate) fn declared_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Resolves the grid and materializes bounds and mask on it.
    ///
    /// # Errors
    ///
    /// - `UnlabeledArray` if unlabeled bounds are given without a grid.
    /// - `ShapeMismatch` if unlabeled bounds do not fit the grid.
    /// - `MissingDimension` if the mask has a dimension the grid lacks.
    /// - `UnnamedDimension` if `force_dim_names` is set and a dimension has a
    ///   default name.
    pub(crate) fn resolve(&self, force_dim_names: bool) -> Result<ResolvedVariable> {
        let mut grid = self.coords.clone().unwrap_or_default();
        for bound in [&self.lower, &self.upper].into_iter().flatten() {
            if let Some(g) = bound.grid() {
                grid = grid.union(g);
            }
        }
        if force_dim_names {
            if let Some(dim) = grid.default_named_dim() {
                return Err(ModelError::UnnamedDimension(dim.to_string()));
            }
        }

        let resolve = |bound: &Option<ArrayLike>, default: f64| match bound {
            Some(values) => values.resolve(&grid),
            None => Ok(LabeledArray::full(grid.clone(), default)),
        };
        let lower = resolve(&self.lower, f64::NEG_INFINITY)?;
        let upper = resolve(&self.upper, f64::INFINITY)?;
        let mask = self
            .mask
            .as_ref()
            .map(|m| m.reindex_with(&grid, false))
            .transpose()?;

        Ok(ResolvedVariable {
            grid,
            lower,
            upper,
            mask,
        })
    }
}

impl ResolvedVariable {
    /// Assigns labels from `range` row-major, skipping masked positions.
    pub(crate) fn into_variable(self, name: String, range: Range<i64>) -> Variable {
        debug_assert_eq!(
            (range.end - range.start) as usize,
            self.grid.size(),
            "called `ResolvedVariable::into_variable` with a label block that does not fit the grid"
        );

        let data = range
            .clone()
            .enumerate()
            .map(|(p, label)| match &self.mask {
                Some(mask) if !mask.data()[p] => Label::NONE,
                _ => Label::from_raw(label),
            })
            .collect();
        Variable {
            name,
            labels: LabeledArray::from_parts(self.grid, data),
            lower: self.lower,
            upper: self.upper,
            mask: self.mask,
            range,
        }
    }
}

/// The ordered variables of a model.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    entries: IndexMap<String, Variable>,
}

impl Variables {
    /// Returns the variable called `name`.
    ///
    /// # Errors
    ///
    /// `UnknownName` if there is none.
    pub fn get(&self, name: &str) -> Result<&Variable> {
        self.entries.get(name).ok_or_else(|| ModelError::UnknownName {
            kind: LabelKind::Variable,
            name: name.to_string(),
        })
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterates in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.entries.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of active (non-masked) variable labels.
    pub fn nvars(&self) -> usize {
        self.iter().map(Variable::count_active).sum()
    }

    /// Returns the name of the variable owning `label`.
    ///
    /// # Errors
    ///
    /// - `LabelNotFound` if the label was never allocated.
    /// - `AmbiguousLabel` if a name is passed instead of a label.
    pub fn get_name_by_label<'q>(&self, label: impl Into<LabelQuery<'q>>) -> Result<&str> {
        let extent = self.entries.last().map_or(0, |(_, v)| v.range.end);
        resolve_label(LabelKind::Variable, extent, label.into(), |label| {
            let idx = self.entries.partition_point(|_, v| v.range.start <= label);
            let (_, v) = self.entries.get_index(idx.checked_sub(1)?)?;
            Some((v.name(), v.label_range()))
        })
        .map(|(name, _)| name)
    }

    pub(crate) fn insert(&mut self, variable: Variable) {
        debug_assert!(
            !self.contains(variable.name()),
            "called `Variables::insert` with a name that already exists: {}",
            variable.name()
        );
        self.entries.insert(variable.name.clone(), variable);
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Variable> {
        self.entries.values_mut()
    }
}

impl std::ops::Index<&str> for Variables {
    type Output = Variable;

    /// # Panics
    ///
    /// Panics if there is no variable called `name`.
    fn index(&self, name: &str) -> &Variable {
        match self.entries.get(name) {
            Some(v) => v,
            None => panic!("called `Variables::index` with unknown variable `{name}`"),
        }
    }
}

impl<'a> IntoIterator for &'a Variables {
    type Item = &'a Variable;
    type IntoIter = indexmap::map::Values<'a, String, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

impl Add<&Variable> for &Variable {
    type Output = LinearExpression;

    fn add(self, rhs: &Variable) -> LinearExpression {
        self.to_expr().add(&rhs.to_expr())
    }
}

impl Add<&LinearExpression> for &Variable {
    type Output = LinearExpression;

    fn add(self, rhs: &LinearExpression) -> LinearExpression {
        self.to_expr().add(rhs)
    }
}

impl Add<LinearExpression> for &Variable {
    type Output = LinearExpression;

    fn add(self, rhs: LinearExpression) -> LinearExpression {
        self.to_expr().add(&rhs)
    }
}

impl Add<f64> for &Variable {
    type Output = LinearExpression;

    fn add(self, rhs: f64) -> LinearExpression {
        self.to_expr() + rhs
    }
}

impl Sub<&Variable> for &Variable {
    type Output = LinearExpression;

    fn sub(self, rhs: &Variable) -> LinearExpression {
        self.to_expr().sub(&rhs.to_expr())
    }
}

impl Sub<&LinearExpression> for &Variable {
    type Output = LinearExpression;

    fn sub(self, rhs: &LinearExpression) -> LinearExpression {
        self.to_expr().sub(rhs)
    }
}

impl Sub<f64> for &Variable {
    type Output = LinearExpression;

    fn sub(self, rhs: f64) -> LinearExpression {
        self.to_expr() - rhs
    }
}

impl Neg for &Variable {
    type Output = LinearExpression;

    fn neg(self) -> LinearExpression {
        self.to_expr().neg()
    }
}

impl Mul<f64> for &Variable {
    type Output = LinearExpression;

    fn mul(self, rhs: f64) -> LinearExpression {
        self.to_expr() * rhs
    }
}

impl Mul<&Variable> for f64 {
    type Output = LinearExpression;

    fn mul(self, rhs: &Variable) -> LinearExpression {
        rhs.to_expr() * self
    }
}
