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

//! # Linear Expressions
//!
//! A [`LinearExpression`] assigns to every position of its grid a list of
//! `nterm` terms (coefficient, variable label) plus a constant. Terms are
//! stored position-major so a position's terms are one contiguous slice.
//!
//! ## Missing values
//!
//! An empty term slot holds `Label::NONE` and a `NaN` coefficient. A missing
//! constant is `NaN`; adding two constants skips missing operands and only
//! yields a missing value if both are missing.
//!
//! ## Highlights
//!
//! - Addition aligns both grids and concatenates the term lists.
//! - Scaling broadcasts the factor onto the expression grid; positions where
//!   the factor is missing become empty.
//! - [`LinearExpression::flatten`] is the view the matrix assembler consumes.

use crate::{
    array::{ArrayLike, LabeledArray},
    constraint::{AnonymousConstraint, Rhs},
    coords::CoordValue,
    error::{ModelError, Result},
    grid::{Grid, Reduction, Selection, Shape},
    sign::Sign,
    variable::Variable,
};
use linmod_core::{
    label::Label,
    num::missing::{Missing, nan_add},
};
use std::{
    borrow::Cow,
    iter::{FusedIterator, repeat_n},
    ops::{Add, Mul, Neg, Sub},
};

/// A linear expression replicated over a coordinate grid.
#[derive(Debug, Clone)]
pub struct LinearExpression {
    grid: Grid,
    nterm: usize,
    coeffs: Vec<f64>,
    vars: Vec<Label>,
    constant: Vec<f64>,
}

impl Default for LinearExpression {
    /// The scalar expression `0`.
    fn default() -> Self {
        Self::constant(LabeledArray::scalar(0.0))
    }
}

/// Coefficients compare `NaN` equal to `NaN`, so an empty slot equals an
/// empty slot.
impl PartialEq for LinearExpression {
    fn eq(&self, other: &Self) -> bool {
        fn same(a: &[f64], b: &[f64]) -> bool {
            a.len() == b.len()
                && a
                    .iter()
                    .zip(b)
                    .all(|(x, y)| x == y || (x.is_nan() && y.is_nan()))
        }
        self.grid == other.grid
            && self.nterm == other.nterm
            && self.vars == other.vars
            && same(&self.coeffs, &other.coeffs)
            && same(&self.constant, &other.constant)
    }
}

impl LinearExpression {
    /// Creates an expression from its raw parts.
    ///
    /// `coeffs` and `vars` hold `grid.size() * nterm` values, position-major;
    /// `constant` holds one value per position.
    ///
    /// # Errors
    ///
    /// `DataLength` if any part does not fit the grid.
    pub fn new(
        grid: Grid,
        nterm: usize,
        coeffs: Vec<f64>,
        vars: Vec<Label>,
        constant: Vec<f64>,
    ) -> Result<Self> {
        let size = grid.size();
        for len in [coeffs.len(), vars.len()] {
            if len != size * nterm {
                return Err(ModelError::DataLength {
                    len,
                    size: size * nterm,
                });
            }
        }
        if constant.len() != size {
            return Err(ModelError::DataLength {
                len: constant.len(),
                size,
            });
        }
        Ok(Self {
            grid,
            nterm,
            coeffs,
            vars,
            constant,
        })
    }

    /// An expression without terms.
    pub fn constant(values: LabeledArray<f64>) -> Self {
        Self {
            grid: values.grid().clone(),
            nterm: 0,
            coeffs: Vec::new(),
            vars: Vec::new(),
            constant: values.data().to_vec(),
        }
    }

    /// The single-term expression `1 * labels` with constant 0.
    pub fn from_labels(labels: &LabeledArray<Label>) -> Self {
        let coeffs = labels
            .iter()
            .map(|l| if l.is_some() { 1.0 } else { f64::NAN })
            .collect();
        Self {
            grid: labels.grid().clone(),
            nterm: 1,
            coeffs,
            vars: labels.data().to_vec(),
            constant: vec![0.0; labels.len()],
        }
    }

    /// Builds `sum(coeff_i * var_i)`.
    ///
    /// # Errors
    ///
    /// Fails like [`LinearExpression::scale`] if a coefficient does not fit
    /// its variable.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linmod_model::{expr::LinearExpression, model::Model, variable::VariableDeclaration};
    ///
    /// let mut m = Model::new();
    /// let x = m.add_variables(VariableDeclaration::new().name("x")).unwrap();
    /// let y = m.add_variables(VariableDeclaration::new().name("y")).unwrap();
    /// let e = LinearExpression::from_terms([(2.0, &x), (-1.0, &y)]).unwrap();
    /// assert_eq!(e.nterm(), 2);
    /// assert_eq!(e.coeffs(), &[2.0, -1.0]);
    /// ```
    pub fn from_terms<'a, I, C>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, &'a Variable)>,
        C: Into<ArrayLike>,
    {
        let mut acc: Option<Self> = None;
        for (coeff, var) in terms {
            let term = Self::from(var).scale(coeff)?;
            acc = Some(match acc {
                Some(expr) => expr.add(&term),
                None => term,
            });
        }
        Ok(acc.unwrap_or_default())
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of term slots per position.
    #[inline]
    pub fn nterm(&self) -> usize {
        self.nterm
    }

    /// Grid shape followed by the term dimension.
    pub fn shape(&self) -> Shape {
        let mut shape = self.grid.shape();
        shape.push(self.nterm);
        shape
    }

    /// Number of grid positions.
    #[inline]
    pub fn size(&self) -> usize {
        self.constant.len()
    }

    #[inline]
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    #[inline]
    pub fn vars(&self) -> &[Label] {
        &self.vars
    }

    /// The constants as a labeled array.
    pub fn constants(&self) -> LabeledArray<f64> {
        LabeledArray::from_parts(self.grid.clone(), self.constant.clone())
    }

    /// The coefficients of the terms at `position`.
    pub fn coeffs_at(&self, position: usize) -> &[f64] {
        &self.coeffs[self.slots(position)]
    }

    /// The variable labels of the terms at `position`.
    pub fn vars_at(&self, position: usize) -> &[Label] {
        &self.vars[self.slots(position)]
    }

    /// Returns `true` if some term at `position` references a variable.
    pub fn has_terms_at(&self, position: usize) -> bool {
        self.vars_at(position).iter().any(|l| l.is_some())
    }

    #[inline]
    fn slots(&self, position: usize) -> std::ops::Range<usize> {
        debug_assert!(
            position < self.size(),
            "called `LinearExpression::slots` with position out of bounds: the size is {} but the position is {}",
            self.size(),
            position
        );
        position * self.nterm..(position + 1) * self.nterm
    }

    /// Copies positions of `self` onto `grid`; `None` becomes an empty
    /// position with a missing constant.
    fn gather(&self, grid: Grid, offsets: impl ExactSizeIterator<Item = Option<usize>>) -> Self {
        let n = self.nterm;
        let mut coeffs = Vec::with_capacity(offsets.len() * n);
        let mut vars = Vec::with_capacity(offsets.len() * n);
        let mut constant = Vec::with_capacity(offsets.len());
        for offset in offsets {
            match offset {
                Some(p) => {
                    coeffs.extend_from_slice(&self.coeffs[p * n..(p + 1) * n]);
                    vars.extend_from_slice(&self.vars[p * n..(p + 1) * n]);
                    constant.push(self.constant[p]);
                }
                None => {
                    coeffs.extend(repeat_n(f64::NAN, n));
                    vars.extend(repeat_n(Label::NONE, n));
                    constant.push(f64::NAN);
                }
            }
        }
        Self {
            grid,
            nterm: n,
            coeffs,
            vars,
            constant,
        }
    }

    /// Reindexes onto a grid known to contain every dimension of `self`.
    pub(crate) fn aligned_with(&self, grid: &Grid) -> Cow<'_, Self> {
        if &self.grid == grid {
            return Cow::Borrowed(self);
        }
        let offsets = self.grid.aligned_offsets(grid);
        Cow::Owned(self.gather(grid.clone(), offsets.into_iter()))
    }

    /// Reindexes onto `grid`, broadcasting over its extra dimensions.
    ///
    /// # Errors
    ///
    /// `MissingDimension` if `self` has a dimension `grid` lacks.
    pub fn reindex_onto(&self, grid: &Grid) -> Result<Self> {
        if &self.grid == grid {
            return Ok(self.clone());
        }
        let offsets = self.grid.offsets_into(grid)?;
        Ok(self.gather(grid.clone(), offsets.into_iter()))
    }

    /// Adds two expressions.
    ///
    /// The result lives on the union of both grids and carries the terms of
    /// `self` followed by the terms of `other`.
    pub fn add(&self, other: &LinearExpression) -> LinearExpression {
        let grid = self.grid.union(&other.grid);
        let a = self.aligned_with(&grid);
        let b = other.aligned_with(&grid);
        let nterm = a.nterm + b.nterm;
        let size = grid.size();

        let mut coeffs = Vec::with_capacity(size * nterm);
        let mut vars = Vec::with_capacity(size * nterm);
        for p in 0..size {
            coeffs.extend_from_slice(a.coeffs_at(p));
            coeffs.extend_from_slice(b.coeffs_at(p));
            vars.extend_from_slice(a.vars_at(p));
            vars.extend_from_slice(b.vars_at(p));
        }
        let constant = a
            .constant
            .iter()
            .zip(&b.constant)
            .map(|(&x, &y)| nan_add(x, y))
            .collect();

        LinearExpression {
            grid,
            nterm,
            coeffs,
            vars,
            constant,
        }
    }

    /// Subtracts `other` from `self`.
    pub fn sub(&self, other: &LinearExpression) -> LinearExpression {
        self.add(&other.neg())
    }

    /// Negates every coefficient and the constant.
    pub fn neg(&self) -> LinearExpression {
        self.scaled_by(|_| -1.0)
    }

    /// Multiplies coefficients and constants by `factor`.
    ///
    /// Labeled factors are aligned with the expression grid; unlabeled ones
    /// are attached to it. Positions where the factor is missing lose their
    /// terms.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` or `UnlabeledArray` if unlabeled data does not fit the
    /// expression grid.
    pub fn scale(&self, factor: impl Into<ArrayLike>) -> Result<LinearExpression> {
        let factor = factor.into();
        if let Some(f) = factor.as_scalar() {
            return Ok(self.scaled_by(|_| f));
        }
        let grid = factor
            .grid()
            .map_or_else(|| self.grid.clone(), |g| self.grid.union(g));
        let factor = factor.resolve(&grid)?;
        Ok(self.aligned_with(&grid).scaled_by(|p| factor.data()[p]))
    }

    fn scaled_by<F>(&self, factor: F) -> LinearExpression
    where
        F: Fn(usize) -> f64,
    {
        let mut out = self.clone();
        for p in 0..out.size() {
            let f = factor(p);
            let slots = out.slots(p);
            if f.is_missing() {
                out.coeffs[slots.clone()].fill(f64::NAN);
                out.vars[slots].fill(Label::NONE);
            } else {
                out.coeffs[slots].iter_mut().for_each(|c| *c *= f);
            }
            out.constant[p] *= f;
        }
        out
    }

    /// Adds numeric values to the constant.
    ///
    /// # Errors
    ///
    /// Fails like [`LinearExpression::scale`] for unlabeled data.
    pub fn add_values(&self, values: impl Into<ArrayLike>) -> Result<LinearExpression> {
        let values = values.into();
        let grid = values
            .grid()
            .map_or_else(|| self.grid.clone(), |g| self.grid.union(g));
        let values = values.resolve(&grid)?;
        let mut out = self.aligned_with(&grid).into_owned();
        for (c, &v) in out.constant.iter_mut().zip(values.data()) {
            *c = nan_add(*c, v);
        }
        Ok(out)
    }

    /// Sums over `dims`, moving the summed positions into the term dimension.
    ///
    /// Missing constants are skipped.
    ///
    /// # Errors
    ///
    /// `UnknownDimension` if a name is not a dimension of the expression.
    pub fn sum(&self, dims: &[&str]) -> Result<LinearExpression> {
        let reduction = self.grid.reduce(dims)?;
        Ok(self.fold(reduction))
    }

    /// Sums over every dimension into a scalar expression.
    pub fn sum_all(&self) -> LinearExpression {
        self.fold(self.grid.reduction(|_| true))
    }

    fn fold(&self, reduction: Reduction) -> LinearExpression {
        let n = self.nterm;
        let nterm = n * reduction.fold;
        let size = reduction.grid.size();
        let mut coeffs = vec![f64::NAN; size * nterm];
        let mut vars = vec![Label::NONE; size * nterm];
        let mut constant = vec![0.0; size];

        for p in 0..self.size() {
            let target = reduction.target[p];
            let base = target * nterm + reduction.slot[p] * n;
            coeffs[base..base + n].copy_from_slice(self.coeffs_at(p));
            vars[base..base + n].copy_from_slice(self.vars_at(p));
            constant[target] = nan_add(constant[target], self.constant[p]);
        }

        LinearExpression {
            grid: reduction.grid,
            nterm,
            coeffs,
            vars,
            constant,
        }
    }

    /// Clears terms whose coefficient is exactly zero.
    ///
    /// Idempotent.
    pub fn sanitize_zeros(&mut self) {
        for (c, v) in self.coeffs.iter_mut().zip(self.vars.iter_mut()) {
            if *c == 0.0 {
                *c = f64::NAN;
                *v = Label::NONE;
            }
        }
    }

    /// Packs the valid terms of every position to the front and drops the
    /// term slots that are then empty everywhere.
    pub fn densify_terms(&self) -> LinearExpression {
        let valid = |c: f64, v: Label| v.is_some() && !c.is_missing();
        let nterm = (0..self.size())
            .map(|p| {
                self.coeffs_at(p)
                    .iter()
                    .zip(self.vars_at(p))
                    .filter(|&(&c, &v)| valid(c, v))
                    .count()
            })
            .max()
            .unwrap_or(0);
        if nterm == self.nterm {
            return self.clone();
        }

        let mut coeffs = Vec::with_capacity(self.size() * nterm);
        let mut vars = Vec::with_capacity(self.size() * nterm);
        for p in 0..self.size() {
            let before = vars.len();
            for (&c, &v) in self.coeffs_at(p).iter().zip(self.vars_at(p)) {
                if valid(c, v) {
                    coeffs.push(c);
                    vars.push(v);
                }
            }
            let pad = nterm - (vars.len() - before);
            coeffs.extend(repeat_n(f64::NAN, pad));
            vars.extend(repeat_n(Label::NONE, pad));
        }

        LinearExpression {
            grid: self.grid.clone(),
            nterm,
            coeffs,
            vars,
            constant: self.constant.clone(),
        }
    }

    /// Iterates over the valid terms in grid order, then term order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linmod_model::{model::Model, variable::VariableDeclaration, grid::Grid};
    ///
    /// let mut m = Model::new();
    /// let x = m
    ///     .add_variables(VariableDeclaration::new().name("x").coords(Grid::from_shape(&[3])))
    ///     .unwrap();
    /// let terms: Vec<_> = (&x * 2.0).flatten().map(|t| (t.position, t.var.raw())).collect();
    /// assert_eq!(terms, vec![(0, 0), (1, 1), (2, 2)]);
    /// ```
    pub fn flatten(&self) -> FlatTerms<'_> {
        FlatTerms {
            expr: self,
            cursor: 0,
        }
    }

    /// Selects by position along `dim`.
    pub fn isel(&self, dim: &str, selection: impl Into<Selection<usize>>) -> Result<Self> {
        let (grid, offsets) = self.grid.select(dim, &selection.into())?;
        Ok(self.gather(grid, offsets.into_iter().map(Some)))
    }

    /// Selects by coordinate along `dim`.
    pub fn sel(&self, dim: &str, selection: impl Into<Selection<CoordValue>>) -> Result<Self> {
        let positions = self.grid.locate(dim, &selection.into())?;
        self.isel(dim, positions)
    }

    /// `self <= rhs`
    pub fn le(&self, rhs: impl Into<Rhs>) -> Result<AnonymousConstraint> {
        self.compare(Sign::LessEqual, rhs)
    }

    /// `self >= rhs`
    pub fn ge(&self, rhs: impl Into<Rhs>) -> Result<AnonymousConstraint> {
        self.compare(Sign::GreaterEqual, rhs)
    }

    /// `self == rhs`
    pub fn eq(&self, rhs: impl Into<Rhs>) -> Result<AnonymousConstraint> {
        self.compare(Sign::Equal, rhs)
    }

    /// Compares `self` with `rhs`.
    ///
    /// # Errors
    ///
    /// - `AmbiguousComparison` if `self` is zero-dimensional and `rhs` is a
    ///   bare zero-dimensional variable.
    /// - Shape errors if unlabeled `rhs` data does not fit.
    pub fn compare(&self, sign: Sign, rhs: impl Into<Rhs>) -> Result<AnonymousConstraint> {
        AnonymousConstraint::new(self.clone(), sign, rhs.into())
    }

    /// Moves the constant out of the expression, treating missing as 0.
    pub(crate) fn take_constant(&mut self) -> LabeledArray<f64> {
        let constant = self
            .constant
            .iter_mut()
            .map(|c| {
                let value = if c.is_missing() { 0.0 } else { *c };
                *c = 0.0;
                value
            })
            .collect();
        LabeledArray::from_parts(self.grid.clone(), constant)
    }

    /// Overwrites every term coefficient at a position with `values`.
    pub(crate) fn set_coeffs(&mut self, values: &LabeledArray<f64>) {
        debug_assert_eq!(
            values.grid(),
            &self.grid,
            "called `LinearExpression::set_coeffs` with values on a different grid"
        );
        for (p, &v) in values.iter().enumerate() {
            let slots = self.slots(p);
            self.coeffs[slots].fill(v);
        }
    }

    /// Overwrites every term label at a position with `labels`.
    pub(crate) fn set_vars(&mut self, labels: &LabeledArray<Label>) {
        debug_assert_eq!(
            labels.grid(),
            &self.grid,
            "called `LinearExpression::set_vars` with labels on a different grid"
        );
        for (p, &l) in labels.iter().enumerate() {
            let slots = self.slots(p);
            self.vars[slots].fill(l);
        }
    }
}

/// One valid term of a flattened expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatTerm {
    /// Flat grid position the term belongs to.
    pub position: usize,
    pub var: Label,
    pub coeff: f64,
}

/// Lazy iterator returned by [`LinearExpression::flatten`].
#[derive(Debug)]
pub struct FlatTerms<'a> {
    expr: &'a LinearExpression,
    cursor: usize,
}

impl Iterator for FlatTerms<'_> {
    type Item = FlatTerm;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor < self.expr.vars.len() {
            let slot = self.cursor;
            self.cursor += 1;
            let var = self.expr.vars[slot];
            let coeff = self.expr.coeffs[slot];
            if var.is_none() || coeff.is_missing() {
                continue;
            }
            return Some(FlatTerm {
                position: slot / self.expr.nterm,
                var,
                coeff,
            });
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.expr.vars.len() - self.cursor))
    }
}

impl FusedIterator for FlatTerms<'_> {}

impl From<&Variable> for LinearExpression {
    fn from(var: &Variable) -> Self {
        Self::from_labels(var.labels())
    }
}

impl From<Variable> for LinearExpression {
    fn from(var: Variable) -> Self {
        Self::from(&var)
    }
}

impl From<f64> for LinearExpression {
    fn from(value: f64) -> Self {
        Self::constant(LabeledArray::scalar(value))
    }
}

impl From<LabeledArray<f64>> for LinearExpression {
    fn from(values: LabeledArray<f64>) -> Self {
        Self::constant(values)
    }
}

impl Add<&LinearExpression> for &LinearExpression {
    type Output = LinearExpression;

    fn add(self, rhs: &LinearExpression) -> LinearExpression {
        LinearExpression::add(self, rhs)
    }
}

impl Add for LinearExpression {
    type Output = LinearExpression;

    fn add(self, rhs: LinearExpression) -> LinearExpression {
        LinearExpression::add(&self, &rhs)
    }
}

impl Add<&LinearExpression> for LinearExpression {
    type Output = LinearExpression;

    fn add(self, rhs: &LinearExpression) -> LinearExpression {
        LinearExpression::add(&self, rhs)
    }
}

impl Add<&Variable> for &LinearExpression {
    type Output = LinearExpression;

    fn add(self, rhs: &Variable) -> LinearExpression {
        LinearExpression::add(self, &rhs.into())
    }
}

impl Add<&Variable> for LinearExpression {
    type Output = LinearExpression;

    fn add(self, rhs: &Variable) -> LinearExpression {
        LinearExpression::add(&self, &rhs.into())
    }
}

impl Add<f64> for &LinearExpression {
    type Output = LinearExpression;

    fn add(self, rhs: f64) -> LinearExpression {
        let mut out = self.clone();
        out.constant.iter_mut().for_each(|c| *c = nan_add(*c, rhs));
        out
    }
}

impl Add<f64> for LinearExpression {
    type Output = LinearExpression;

    fn add(self, rhs: f64) -> LinearExpression {
        &self + rhs
    }
}

impl Sub<&LinearExpression> for &LinearExpression {
    type Output = LinearExpression;

    fn sub(self, rhs: &LinearExpression) -> LinearExpression {
        LinearExpression::sub(self, rhs)
    }
}

impl Sub for LinearExpression {
    type Output = LinearExpression;

    fn sub(self, rhs: LinearExpression) -> LinearExpression {
        LinearExpression::sub(&self, &rhs)
    }
}

impl Sub<&LinearExpression> for LinearExpression {
    type Output = LinearExpression;

    fn sub(self, rhs: &LinearExpression) -> LinearExpression {
        LinearExpression::sub(&self, rhs)
    }
}

impl Sub<&Variable> for &LinearExpression {
    type Output = LinearExpression;

    fn sub(self, rhs: &Variable) -> LinearExpression {
        LinearExpression::sub(self, &rhs.into())
    }
}

impl Sub<&Variable> for LinearExpression {
    type Output = LinearExpression;

    fn sub(self, rhs: &Variable) -> LinearExpression {
        LinearExpression::sub(&self, &rhs.into())
    }
}

impl Sub<f64> for &LinearExpression {
    type Output = LinearExpression;

    fn sub(self, rhs: f64) -> LinearExpression {
        self + (-rhs)
    }
}

impl Sub<f64> for LinearExpression {
    type Output = LinearExpression;

    fn sub(self, rhs: f64) -> LinearExpression {
        &self + (-rhs)
    }
}

impl Neg for &LinearExpression {
    type Output = LinearExpression;

    fn neg(self) -> LinearExpression {
        LinearExpression::neg(self)
    }
}

impl Neg for LinearExpression {
    type Output = LinearExpression;

    fn neg(self) -> LinearExpression {
        LinearExpression::neg(&self)
    }
}

impl Mul<f64> for &LinearExpression {
    type Output = LinearExpression;

    fn mul(self, rhs: f64) -> LinearExpression {
        self.scaled_by(|_| rhs)
    }
}

impl Mul<f64> for LinearExpression {
    type Output = LinearExpression;

    fn mul(self, rhs: f64) -> LinearExpression {
        self.scaled_by(|_| rhs)
    }
}

impl Mul<&LinearExpression> for f64 {
    type Output = LinearExpression;

    fn mul(self, rhs: &LinearExpression) -> LinearExpression {
        rhs * self
    }
}

impl Mul<LinearExpression> for f64 {
    type Output = LinearExpression;

    fn mul(self, rhs: LinearExpression) -> LinearExpression {
        rhs * self
    }
}
