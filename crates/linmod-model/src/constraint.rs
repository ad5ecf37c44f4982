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

//! # Constraints
//!
//! Comparing an expression with a right-hand side yields an
//! [`AnonymousConstraint`] in normal form: every variable term sits on the
//! left, every constant on the right, and the left constant is zero.
//! Adding it to a model assigns one label per grid position and turns it
//! into a named [`Constraint`].
//!
//! ## Highlights
//!
//! - Right-hand sides are numbers, arrays, expressions or variables
//!   ([`Rhs`]); variable terms are moved to the left with negated
//!   coefficients.
//! - Rows whose left side references no active variable can be masked
//!   automatically when the constraint is added.
//! - Labels are fixed at creation. Everything else can be reassigned through
//!   the `set_*` methods, which keep the normal form.

use crate::{
    array::{ArrayLike, LabeledArray, RawArray},
    coords::CoordValue,
    error::{ModelError, Result},
    expr::{FlatTerm, LinearExpression},
    grid::{Grid, Selection, Shape},
    registry::{LabelKind, LabelQuery, resolve_label},
    sign::{IntoSign, Sign},
    variable::Variable,
};
use indexmap::IndexMap;
use linmod_core::label::Label;
use std::ops::Range;

/// The right-hand side of a comparison.
#[derive(Debug, Clone)]
pub enum Rhs {
    Values(ArrayLike),
    Expression(LinearExpression),
    Variable(Variable),
}

impl From<ArrayLike> for Rhs {
    fn from(value: ArrayLike) -> Self {
        Self::Values(value)
    }
}

impl From<f64> for Rhs {
    fn from(value: f64) -> Self {
        Self::Values(value.into())
    }
}

impl From<i32> for Rhs {
    fn from(value: i32) -> Self {
        Self::Values(value.into())
    }
}

impl From<Vec<f64>> for Rhs {
    fn from(value: Vec<f64>) -> Self {
        Self::Values(value.into())
    }
}

impl From<RawArray> for Rhs {
    fn from(value: RawArray) -> Self {
        Self::Values(value.into())
    }
}

impl From<LabeledArray<f64>> for Rhs {
    fn from(value: LabeledArray<f64>) -> Self {
        Self::Values(value.into())
    }
}

impl From<&LabeledArray<f64>> for Rhs {
    fn from(value: &LabeledArray<f64>) -> Self {
        Self::Values(value.into())
    }
}

impl From<LinearExpression> for Rhs {
    fn from(value: LinearExpression) -> Self {
        Self::Expression(value)
    }
}

impl From<&LinearExpression> for Rhs {
    fn from(value: &LinearExpression) -> Self {
        Self::Expression(value.clone())
    }
}

impl From<Variable> for Rhs {
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}

impl From<&Variable> for Rhs {
    fn from(value: &Variable) -> Self {
        Self::Variable(value.clone())
    }
}

/// A comparison in normal form that has not been added to a model.
#[derive(Debug, Clone, PartialEq)]
pub struct AnonymousConstraint {
    lhs: LinearExpression,
    sign: Sign,
    rhs: LabeledArray<f64>,
}

impl AnonymousConstraint {
    /// Brings `lhs sign rhs` into normal form.
    ///
    /// # Errors
    ///
    /// - `AmbiguousComparison` if `lhs` is zero-dimensional and `rhs` is a
    ///   bare zero-dimensional variable.
    /// - `ShapeMismatch` or `UnlabeledArray` if unlabeled values do not fit.
    pub fn new(lhs: LinearExpression, sign: Sign, rhs: Rhs) -> Result<Self> {
        match rhs {
            Rhs::Variable(var) if lhs.grid().is_scalar() && var.grid().is_scalar() => {
                Err(ModelError::AmbiguousComparison(var.name().to_string()))
            }
            Rhs::Variable(var) => Ok(Self::from_difference(lhs - &var.to_expr(), sign)),
            Rhs::Expression(expr) => Ok(Self::from_difference(lhs - &expr, sign)),
            Rhs::Values(values) => {
                let grid = values
                    .grid()
                    .map_or_else(|| lhs.grid().clone(), |g| lhs.grid().union(g));
                let values = values.resolve(&grid)?;
                let mut lhs = lhs.aligned_with(&grid).into_owned();
                let constant = lhs.take_constant();
                let rhs = values.zip_with(&constant, (f64::NAN, 0.0), |v, c| v - c);
                Ok(Self { lhs, sign, rhs })
            }
        }
    }

    /// `diff sign 0` with the constant of `diff` moved to the right.
    fn from_difference(mut diff: LinearExpression, sign: Sign) -> Self {
        let rhs = diff.take_constant().map(|c| if c == 0.0 { 0.0 } else { -c });
        Self {
            lhs: diff,
            sign,
            rhs,
        }
    }

    #[inline]
    pub fn lhs(&self) -> &LinearExpression {
        &self.lhs
    }

    #[inline]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    #[inline]
    pub fn rhs(&self) -> &LabeledArray<f64> {
        &self.rhs
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        self.lhs.grid()
    }

    /// Starts a declaration with the given name.
    pub fn named(self, name: impl Into<String>) -> ConstraintDeclaration {
        ConstraintDeclaration::from(self).name(name)
    }

    /// Selects by position along `dim`.
    pub fn isel(&self, dim: &str, selection: impl Into<Selection<usize>>) -> Result<Self> {
        let selection = selection.into();
        Ok(Self {
            lhs: self.lhs.isel(dim, selection.clone())?,
            sign: self.sign,
            rhs: self.rhs.isel(dim, selection)?,
        })
    }

    /// Selects by coordinate along `dim`.
    pub fn sel(&self, dim: &str, selection: impl Into<Selection<CoordValue>>) -> Result<Self> {
        let positions = self.grid().locate(dim, &selection.into())?;
        self.isel(dim, positions)
    }
}

#[derive(Debug, Clone)]
enum Body {
    Built(AnonymousConstraint),
    Parts {
        lhs: LinearExpression,
        sign: Result<Sign>,
        rhs: Rhs,
    },
}

/// Describes a constraint to add to a model.
///
/// # Examples
///
/// ```rust
/// # use linmod_model::{constraint::ConstraintDeclaration, grid::Grid, model::Model, variable::VariableDeclaration};
///
/// let mut m = Model::new();
/// let x = m
///     .add_variables(VariableDeclaration::new().name("x").coords(Grid::from_shape(&[4])))
///     .unwrap();
///
/// // from a comparison
/// let c = m.add_constraints(x.ge(0.0).unwrap().named("lower")).unwrap();
/// assert_eq!(c.labels().len(), 4);
///
/// // from an explicit triple; the sign is checked when the constraint is added
/// let bad = ConstraintDeclaration::from_parts(&x, ",", 0.0);
/// assert!(m.add_constraints(bad).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ConstraintDeclaration {
    body: Body,
    name: Option<String>,
    mask: Option<LabeledArray<bool>>,
}

/// A declaration checked against its own inputs, ready for label allocation.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedConstraint {
    pub body: AnonymousConstraint,
    pub mask: Option<LabeledArray<bool>>,
}

impl ConstraintDeclaration {
    /// Declares `lhs sign rhs`.
    pub fn from_parts(
        lhs: impl Into<LinearExpression>,
        sign: impl IntoSign,
        rhs: impl Into<Rhs>,
    ) -> Self {
        Self {
            body: Body::Parts {
                lhs: lhs.into(),
                sign: sign.into_sign(),
                rhs: rhs.into(),
            },
            name: None,
            mask: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
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

    /// Normalizes the body and computes the effective mask.
    ///
    /// With `mask_empty_rows`, positions whose left side references no
    /// active variable are masked as well.
    pub(crate) fn resolve(self, mask_empty_rows: bool) -> Result<ResolvedConstraint> {
        let body = match self.body {
            Body::Built(body) => body,
            Body::Parts { lhs, sign, rhs } => AnonymousConstraint::new(lhs, sign?, rhs)?,
        };
        let explicit = self
            .mask
            .map(|m| m.reindex_with(body.grid(), false))
            .transpose()?;

        let mask = if mask_empty_rows {
            let active: Vec<bool> = (0..body.grid().size())
                .map(|p| {
                    explicit.as_ref().is_none_or(|m| m.data()[p]) && body.lhs.has_terms_at(p)
                })
                .collect();
            if active.iter().all(|&a| a) {
                None
            } else {
                Some(LabeledArray::from_parts(body.grid().clone(), active))
            }
        } else {
            explicit
        };

        Ok(ResolvedConstraint { body, mask })
    }
}

impl From<AnonymousConstraint> for ConstraintDeclaration {
    fn from(body: AnonymousConstraint) -> Self {
        Self {
            body: Body::Built(body),
            name: None,
            mask: None,
        }
    }
}

impl ResolvedConstraint {
    /// Assigns labels from `range` row-major, skipping masked positions.
    pub(crate) fn into_constraint(self, name: String, range: Range<i64>) -> Constraint {
        let grid = self.body.grid().clone();
        debug_assert_eq!(
            (range.end - range.start) as usize,
            grid.size(),
            "called `ResolvedConstraint::into_constraint` with a label block that does not fit the grid"
        );

        let data = range
            .clone()
            .enumerate()
            .map(|(p, label)| match &self.mask {
                Some(mask) if !mask.data()[p] => Label::NONE,
                _ => Label::from_raw(label),
            })
            .collect();
        Constraint {
            name,
            labels: LabeledArray::from_parts(grid, data),
            lhs: self.body.lhs,
            sign: self.body.sign,
            rhs: self.body.rhs,
            mask: self.mask,
            range,
        }
    }
}

/// One matrix entry contributed by a constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintTerm {
    pub row: Label,
    pub var: Label,
    pub coeff: f64,
}

/// A named block of constraints owned by a model.
#[derive(Debug, Clone)]
pub struct Constraint {
    name: String,
    labels: LabeledArray<Label>,
    lhs: LinearExpression,
    sign: Sign,
    rhs: LabeledArray<f64>,
    mask: Option<LabeledArray<bool>>,
    range: Range<i64>,
}

impl Constraint {
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
    pub fn lhs(&self) -> &LinearExpression {
        &self.lhs
    }

    #[inline]
    pub fn sign(&self) -> Sign {
        self.sign
    }

    #[inline]
    pub fn rhs(&self) -> &LabeledArray<f64> {
        &self.rhs
    }

    #[inline]
    pub fn mask(&self) -> Option<&LabeledArray<bool>> {
        self.mask.as_ref()
    }

    #[inline]
    pub fn vars(&self) -> &[Label] {
        self.lhs.vars()
    }

    #[inline]
    pub fn coeffs(&self) -> &[f64] {
        self.lhs.coeffs()
    }

    #[inline]
    pub fn nterm(&self) -> usize {
        self.lhs.nterm()
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        self.labels.grid()
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.labels.shape()
    }

    /// The block of labels allocated for this constraint.
    #[inline]
    pub fn label_range(&self) -> Range<i64> {
        self.range.clone()
    }

    /// Number of positions holding a label.
    pub fn count_active(&self) -> usize {
        self.labels.count(|l| l.is_some())
    }

    /// The valid terms of every active row, in row order.
    pub fn flat(&self) -> impl Iterator<Item = ConstraintTerm> + '_ {
        let labels = self.labels.data();
        self.lhs
            .flatten()
            .filter_map(move |FlatTerm { position, var, coeff }| {
                let row = labels[position];
                row.is_some().then_some(ConstraintTerm { row, var, coeff })
            })
    }

    fn check_dims(&self, grid: &Grid, what: &'static str) -> Result<()> {
        if self.grid().contains_dims_of(grid) {
            return Ok(());
        }
        Err(ModelError::InvalidAssignment {
            name: self.name.clone(),
            what,
            reason: format!(
                "{grid:?} has dimensions outside of the constraint grid {:?}",
                self.grid()
            ),
        })
    }

    /// Replaces the left side; its constant moves to the right.
    ///
    /// # Errors
    ///
    /// `InvalidAssignment` if `lhs` has dimensions the constraint lacks.
    pub fn set_lhs(&mut self, lhs: impl Into<LinearExpression>) -> Result<()> {
        let lhs = lhs.into();
        self.check_dims(lhs.grid(), "lhs")?;
        let mut lhs = lhs.reindex_onto(self.grid())?;
        let constant = lhs.take_constant();
        for (r, &c) in self.rhs.data_mut().iter_mut().zip(constant.data()) {
            *r -= c;
        }
        self.lhs = lhs;
        Ok(())
    }

    /// Replaces the right side. Variable terms of `rhs` move to the left.
    ///
    /// # Errors
    ///
    /// - `InvalidAssignment` if `rhs` has dimensions the constraint lacks.
    /// - `ShapeMismatch` if unlabeled values do not fit the constraint grid.
    pub fn set_rhs(&mut self, rhs: impl Into<Rhs>) -> Result<()> {
        let grid = self.grid().clone();
        match rhs.into() {
            Rhs::Values(values) => {
                if let Some(g) = values.grid() {
                    self.check_dims(g, "rhs")?;
                }
                self.rhs = values.resolve(&grid)?;
            }
            Rhs::Expression(expr) => self.move_terms_left(expr, &grid)?,
            Rhs::Variable(var) => self.move_terms_left(var.to_expr(), &grid)?,
        }
        Ok(())
    }

    fn move_terms_left(&mut self, expr: LinearExpression, grid: &Grid) -> Result<()> {
        self.check_dims(expr.grid(), "rhs")?;
        let mut expr = expr.reindex_onto(grid)?;
        self.rhs = expr.take_constant();
        self.lhs = &self.lhs - &expr;
        Ok(())
    }

    /// # Errors
    ///
    /// `InvalidSign` if the token is not a known sign.
    pub fn set_sign(&mut self, sign: impl IntoSign) -> Result<()> {
        self.sign = sign.into_sign()?;
        Ok(())
    }

    /// Sets every term coefficient of a position to the given value.
    ///
    /// # Errors
    ///
    /// - `InvalidAssignment` if `coeffs` has dimensions the constraint lacks.
    /// - `ShapeMismatch` if unlabeled values do not fit the constraint grid.
    pub fn set_coeffs(&mut self, coeffs: impl Into<ArrayLike>) -> Result<()> {
        let coeffs = coeffs.into();
        if let Some(g) = coeffs.grid() {
            self.check_dims(g, "coeffs")?;
        }
        let coeffs = coeffs.resolve(self.grid())?;
        self.lhs.set_coeffs(&coeffs);
        Ok(())
    }

    /// Sets every term variable of a position to the given label.
    ///
    /// # Errors
    ///
    /// `InvalidAssignment` if `vars` has dimensions the constraint lacks.
    pub fn set_vars(&mut self, vars: &LabeledArray<Label>) -> Result<()> {
        self.check_dims(vars.grid(), "vars")?;
        let vars = vars.reindex(self.grid())?;
        self.lhs.set_vars(&vars);
        Ok(())
    }

    /// Clears zero-coefficient terms of the left side.
    pub fn sanitize_zeros(&mut self) {
        self.lhs.sanitize_zeros();
    }

    /// Selects by position along `dim`.
    pub fn isel(&self, dim: &str, selection: impl Into<Selection<usize>>) -> Result<Self> {
        let selection = selection.into();
        Ok(Self {
            name: self.name.clone(),
            labels: self.labels.isel(dim, selection.clone())?,
            lhs: self.lhs.isel(dim, selection.clone())?,
            sign: self.sign,
            rhs: self.rhs.isel(dim, selection.clone())?,
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
}

/// The ordered constraints of a model.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    entries: IndexMap<String, Constraint>,
}

impl Constraints {
    fn unknown(name: &str) -> ModelError {
        ModelError::UnknownName {
            kind: LabelKind::Constraint,
            name: name.to_string(),
        }
    }

    /// Returns the constraint called `name`.
    ///
    /// # Errors
    ///
    /// `UnknownName` if there is none.
    pub fn get(&self, name: &str) -> Result<&Constraint> {
        self.entries.get(name).ok_or_else(|| Self::unknown(name))
    }

    /// Returns the constraint called `name` for reassignment.
    ///
    /// # Errors
    ///
    /// `UnknownName` if there is none.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Constraint> {
        self.entries.get_mut(name).ok_or_else(|| Self::unknown(name))
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterates in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
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

    /// Number of active (non-masked) constraint labels.
    pub fn ncons(&self) -> usize {
        self.iter().map(Constraint::count_active).sum()
    }

    /// The constraints called `names`, in declaration order.
    ///
    /// # Errors
    ///
    /// `UnknownName` if a name is not present.
    pub fn subset(&self, names: &[&str]) -> Result<Constraints> {
        if let Some(missing) = names.iter().find(|n| !self.contains(n)) {
            return Err(Self::unknown(missing));
        }
        Ok(self.filter(|c| names.contains(&c.name())))
    }

    /// The constraints whose sign is not `=`.
    pub fn inequalities(&self) -> Constraints {
        self.filter(|c| !c.sign().is_equality())
    }

    /// The constraints whose sign is `=`.
    pub fn equalities(&self) -> Constraints {
        self.filter(|c| c.sign().is_equality())
    }

    fn filter<F>(&self, keep: F) -> Constraints
    where
        F: Fn(&Constraint) -> bool,
    {
        Constraints {
            entries: self
                .entries
                .iter()
                .filter(|(_, c)| keep(*c))
                .map(|(n, c)| (n.clone(), c.clone()))
                .collect(),
        }
    }

    /// Clears zero-coefficient terms of every constraint.
    pub fn sanitize_zeros(&mut self) {
        self.entries.values_mut().for_each(Constraint::sanitize_zeros);
    }

    /// Returns the name of the constraint owning `label`.
    ///
    /// # Errors
    ///
    /// - `LabelNotFound` if the label was never allocated, or belongs to a
    ///   constraint outside of this collection.
    /// - `AmbiguousLabel` if a name is passed instead of a label.
    pub fn get_name_by_label<'q>(&self, label: impl Into<LabelQuery<'q>>) -> Result<&str> {
        let extent = self.entries.last().map_or(0, |(_, c)| c.range.end);
        resolve_label(LabelKind::Constraint, extent, label.into(), |label| {
            let idx = self.entries.partition_point(|_, c| c.range.start <= label);
            let (_, c) = self.entries.get_index(idx.checked_sub(1)?)?;
            Some((c.name(), c.label_range()))
        })
        .map(|(name, _)| name)
    }

    pub(crate) fn insert(&mut self, constraint: Constraint) {
        debug_assert!(
            !self.contains(constraint.name()),
            "called `Constraints::insert` with a name that already exists: {}",
            constraint.name()
        );
        self.entries.insert(constraint.name.clone(), constraint);
    }
}

impl std::ops::Index<&str> for Constraints {
    type Output = Constraint;

    /// # Panics
    ///
    /// Panics if there is no constraint called `name`.
    fn index(&self, name: &str) -> &Constraint {
        match self.entries.get(name) {
            Some(c) => c,
            None => panic!("called `Constraints::index` with unknown constraint `{name}`"),
        }
    }
}

impl<'a> IntoIterator for &'a Constraints {
    type Item = &'a Constraint;
    type IntoIter = indexmap::map::Values<'a, String, Constraint>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{coords::Index, error::ErrorKind};

    fn labels(grid: Grid, first: i64) -> LabeledArray<Label> {
        let data = (0..grid.size() as i64).map(|i| Label::from_raw(first + i)).collect();
        LabeledArray::new(grid, data).unwrap()
    }

    fn expr(len: usize, first: i64) -> LinearExpression {
        LinearExpression::from_labels(&labels(Grid::from_shape(&[len]), first))
    }

    fn build(body: AnonymousConstraint, name: &str, start: i64) -> Constraint {
        let resolved = ConstraintDeclaration::from(body).resolve(true).unwrap();
        let size = resolved.body.grid().size() as i64;
        resolved.into_constraint(name.to_string(), start..start + size)
    }

    #[test]
    fn test_values_rhs_absorbs_lhs_constant() {
        let c = (expr(2, 0) + 3.0).le(vec![10.0, 20.0]).unwrap();
        assert_eq!(c.sign(), Sign::LessEqual);
        assert_eq!(c.rhs().data(), &[7.0, 17.0]);
        assert_eq!(c.lhs().constants().data(), &[0.0, 0.0]);
    }

    #[test]
    fn test_expression_rhs_moves_to_lhs() {
        let lhs = expr(3, 0);
        let rhs = expr(3, 3) + 5.0;
        let c = lhs.eq(&rhs).unwrap();
        assert_eq!(c.lhs().nterm(), lhs.nterm() + rhs.nterm());
        assert_eq!(c.lhs().coeffs_at(0), &[1.0, -1.0]);
        assert_eq!(c.rhs().data(), &[5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_rhs_is_zero_without_constants() {
        let c = expr(3, 0).eq(expr(3, 3)).unwrap();
        assert!(c.rhs().all(|&r| r == 0.0));
    }

    #[test]
    fn test_labeled_rhs_broadcasts() {
        let rhs = LabeledArray::new(
            Grid::new([Index::new("r", ["a", "b"]).unwrap()]).unwrap(),
            vec![1.0, 2.0],
        )
        .unwrap();
        let c = expr(3, 0).ge(rhs).unwrap();
        assert_eq!(c.grid().shape().as_slice(), &[3, 2]);
        assert_eq!(c.rhs().data(), &[1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
    }

    #[test]
    fn test_declaration_reports_invalid_sign_at_resolve() {
        let decl = ConstraintDeclaration::from_parts(expr(2, 0), ",", 0.0);
        let err = decl.resolve(true).unwrap_err();
        assert_eq!(err, ModelError::InvalidSign(",".into()));
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_declaration_from_parts_accepts_aliases() {
        for (token, sign) in [("==", Sign::Equal), ("<", Sign::LessEqual), (">", Sign::GreaterEqual)] {
            let resolved = ConstraintDeclaration::from_parts(expr(2, 0), token, 0.0)
                .resolve(true)
                .unwrap();
            assert_eq!(resolved.body.sign(), sign);
        }
    }

    #[test]
    fn test_empty_rows_are_masked() {
        let vars = LabeledArray::new(
            Grid::from_shape(&[3]),
            vec![Label::NONE, Label::from_raw(1), Label::NONE],
        )
        .unwrap();
        let body = LinearExpression::from_labels(&vars).ge(0.0).unwrap();
        let c = build(body.clone(), "c", 0);
        assert_eq!(c.labels().data(), &[Label::NONE, Label::from_raw(1), Label::NONE]);
        assert_eq!(c.count_active(), 1);

        let kept = ConstraintDeclaration::from(body).resolve(false).unwrap();
        assert!(kept.mask.is_none());
    }

    #[test]
    fn test_explicit_mask_and_flat() {
        let mask = LabeledArray::new(Grid::from_shape(&[3]), vec![true, false, true]).unwrap();
        let resolved = ConstraintDeclaration::from((2.0 * &expr(3, 10)).le(1.0).unwrap())
            .mask(mask)
            .resolve(true)
            .unwrap();
        let c = resolved.into_constraint("c".into(), 5..8);
        let flat: Vec<_> = c.flat().map(|t| (t.row.raw(), t.var.raw(), t.coeff)).collect();
        assert_eq!(flat, vec![(5, 10, 2.0), (7, 12, 2.0)]);
    }

    #[test]
    fn test_set_rhs_with_expression() {
        let x = expr(10, 0);
        let mut c = build(x.ge(0.0).unwrap(), "c", 0);
        c.set_rhs(&x + 1.0).unwrap();
        assert_eq!(c.nterm(), 2);
        assert!(c.rhs().all(|&r| r == 1.0));
        let sums: Vec<f64> = (0..10).map(|p| c.lhs().coeffs_at(p).iter().sum()).collect();
        assert!(sums.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_set_lhs_with_constant() {
        let mut c = build(expr(4, 0).ge(0.0).unwrap(), "c", 0);
        c.set_lhs(10.0).unwrap();
        assert_eq!(c.nterm(), 0);
        assert!(c.rhs().all(|&r| r == -10.0));
    }

    #[test]
    fn test_setters_reject_foreign_dims() {
        let mut c = build(expr(2, 0).ge(0.0).unwrap(), "c", 0);
        let foreign = LabeledArray::new(
            Grid::new([Index::new("other", [0, 1]).unwrap()]).unwrap(),
            vec![1.0, 2.0],
        )
        .unwrap();
        let err = c.set_rhs(&foreign).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert!(matches!(
            c.set_coeffs(foreign),
            Err(ModelError::InvalidAssignment { what: "coeffs", .. })
        ));

        // a wider left side would need more constraint labels
        let wide = labels(Grid::new([Index::new("other", [0, 1]).unwrap()]).unwrap(), 5);
        let before = c.vars().to_vec();
        assert!(matches!(
            c.set_lhs(LinearExpression::from_labels(&wide)),
            Err(ModelError::InvalidAssignment { what: "lhs", .. })
        ));
        assert_eq!(c.vars(), before.as_slice());
    }

    #[test]
    fn test_set_coeffs_vars_and_sign() {
        let mut c = build(expr(2, 0).ge(0.0).unwrap(), "c", 0);
        c.set_coeffs(vec![3.0, 4.0]).unwrap();
        assert_eq!(c.coeffs(), &[3.0, 4.0]);
        c.set_vars(&labels(Grid::from_shape(&[2]), 7)).unwrap();
        assert_eq!(c.vars(), &[Label::from_raw(7), Label::from_raw(8)]);
        c.set_sign("==").unwrap();
        assert_eq!(c.sign(), Sign::Equal);
        assert!(c.set_sign("=<").is_err());
    }

    #[test]
    fn test_collection_filters_and_lookup() {
        let mut cons = Constraints::default();
        cons.insert(build(expr(10, 0).le(10.0).unwrap(), "first", 0));
        cons.insert(build(expr(10, 10).eq(0.0).unwrap(), "second", 10));
        assert_eq!(cons.ncons(), 20);
        assert_eq!(cons.get_name_by_label(4).unwrap(), "first");
        assert_eq!(cons.get_name_by_label(14).unwrap(), "second");
        assert!(matches!(
            cons.get_name_by_label(30),
            Err(ModelError::LabelNotFound { .. })
        ));
        assert!(matches!(
            cons.get_name_by_label("first"),
            Err(ModelError::AmbiguousLabel(_))
        ));

        assert_eq!(cons.inequalities().names().collect::<Vec<_>>(), ["first"]);
        assert_eq!(cons.equalities().names().collect::<Vec<_>>(), ["second"]);
        let sub = cons.subset(&["second"]).unwrap();
        assert_eq!(sub.len(), 1);
        assert!(sub.get_name_by_label(4).is_err());
        assert!(cons.subset(&["third"]).is_err());
    }

    #[test]
    fn test_isel_slices_every_field() {
        let c = build(expr(3, 0).le(vec![1.0, 2.0, 3.0]).unwrap(), "c", 0);
        let s = c.isel("dim_0", 2usize).unwrap();
        assert_eq!(s.labels().data(), &[Label::from_raw(2)]);
        assert_eq!(s.rhs().data(), &[3.0]);
        assert_eq!(s.vars(), &[Label::from_raw(2)]);
    }
}
