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

//! # Model
//!
//! The [`Model`] owns everything: the label registry, the variables and
//! constraints, the objective and the model-wide coordinate index of every
//! dimension name. It is the only place where labels are allocated.
//!
//! ## Coordinate merging
//!
//! All variables agree on the coordinates of a dimension name. When a new
//! variable brings coordinates a shared dimension does not have yet, the
//! shared index is enlarged (existing coordinates first) and every variable
//! using the dimension is reindexed onto it. Positions added this way hold no
//! label and `NaN` bounds.
//!
//! ## Failure atomicity
//!
//! Declarations are validated completely before labels are allocated, so a
//! failed `add_*` call leaves the model untouched.

use crate::{
    array::ArrayLike,
    constraint::{Constraint, ConstraintDeclaration, Constraints},
    coords::Index,
    error::{ModelError, Result},
    expr::LinearExpression,
    grid::Grid,
    matrix::{MatrixAssembler, MatrixSystem},
    registry::{LabelKind, LabelQuery, LabelRegistry},
    variable::{Variable, VariableDeclaration, Variables},
};
use indexmap::IndexMap;
use sprs::CsMat;
use std::borrow::Cow;

/// Behavior switches of a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelConfig {
    force_dim_names: bool,
    mask_empty_rows: bool,
    sanitize_on_export: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            force_dim_names: false,
            mask_empty_rows: true,
            sanitize_on_export: false,
        }
    }
}

impl ModelConfig {
    /// Reject grids with default `dim_N` dimension names.
    #[inline]
    pub fn force_dim_names(&self) -> bool {
        self.force_dim_names
    }

    /// Mask constraint rows whose left side references no active variable.
    #[inline]
    pub fn mask_empty_rows(&self) -> bool {
        self.mask_empty_rows
    }

    /// Skip zero coefficients and entries that cancel during matrix assembly.
    #[inline]
    pub fn sanitize_on_export(&self) -> bool {
        self.sanitize_on_export
    }
}

/// Builds a [`Model`] with a non-default configuration.
///
/// # Defaults
///
/// | Setting | Default |
/// | :--- | :--- |
/// | `force_dim_names` | `false` |
/// | `mask_empty_rows` | `true` |
/// | `sanitize_on_export` | `false` |
///
/// # Examples
///
/// ```rust
/// # use linmod_model::model::ModelBuilder;
///
/// let mut builder = ModelBuilder::new();
/// builder.set_force_dim_names(true);
/// let model = builder.build();
/// assert!(model.config().force_dim_names());
/// assert!(model.config().mask_empty_rows());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    config: ModelConfig,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn set_force_dim_names(&mut self, force: bool) -> &mut Self {
        self.config.force_dim_names = force;
        self
    }

    #[inline]
    pub fn set_mask_empty_rows(&mut self, mask: bool) -> &mut Self {
        self.config.mask_empty_rows = mask;
        self
    }

    #[inline]
    pub fn set_sanitize_on_export(&mut self, sanitize: bool) -> &mut Self {
        self.config.sanitize_on_export = sanitize;
        self
    }

    pub fn build(self) -> Model {
        Model {
            config: self.config,
            registry: LabelRegistry::new(),
            variables: Variables::default(),
            constraints: Constraints::default(),
            objective: None,
            shared_coords: IndexMap::new(),
        }
    }
}

/// A linear optimization model.
#[derive(Debug, Clone)]
pub struct Model {
    config: ModelConfig,
    registry: LabelRegistry,
    variables: Variables,
    constraints: Constraints,
    objective: Option<LinearExpression>,
    shared_coords: IndexMap<String, Index>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Creates an empty model with the default configuration.
    pub fn new() -> Self {
        ModelBuilder::new().build()
    }

    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }

    #[inline]
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    #[inline]
    pub fn registry(&self) -> &LabelRegistry {
        &self.registry
    }

    #[inline]
    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    #[inline]
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// The constraints, for reassigning their left or right sides.
    #[inline]
    pub fn constraints_mut(&mut self) -> &mut Constraints {
        &mut self.constraints
    }

    #[inline]
    pub fn objective(&self) -> Option<&LinearExpression> {
        self.objective.as_ref()
    }

    /// The model-wide index of dimension `name`.
    pub fn coords(&self, name: &str) -> Option<&Index> {
        self.shared_coords.get(name)
    }

    /// Number of active variable labels.
    pub fn nvars(&self) -> usize {
        self.variables.nvars()
    }

    /// Number of active constraint labels.
    pub fn ncons(&self) -> usize {
        self.constraints.ncons()
    }

    /// `(constraint labels, variable labels)` ever allocated.
    pub fn shape(&self) -> (usize, usize) {
        (
            self.registry.allocated(LabelKind::Constraint),
            self.registry.allocated(LabelKind::Variable),
        )
    }

    fn next_name(&self, kind: LabelKind) -> String {
        let prefix = match kind {
            LabelKind::Variable => "var",
            LabelKind::Constraint => "con",
        };
        let mut n = self.registry.blocks(kind).len();
        loop {
            let name = format!("{prefix}{n}");
            if !self.registry.contains(kind, &name) {
                return name;
            }
            n += 1;
        }
    }

    fn claim_name(&self, kind: LabelKind, declared: Option<&str>) -> Result<String> {
        let name = declared.map_or_else(|| self.next_name(kind), str::to_string);
        if self.registry.contains(kind, &name) {
            return Err(ModelError::DuplicateName { kind, name });
        }
        Ok(name)
    }

    /// The grid `grid` takes after merging its dimensions into the shared
    /// coordinates.
    fn merged_grid(&self, grid: &Grid) -> Result<Grid> {
        Grid::new(grid.dims().iter().map(|dim| match self.shared_coords.get(dim.name()) {
            Some(shared) => shared.union(dim),
            None => dim.clone(),
        }))
    }

    /// Adds a block of variables and returns a snapshot of it.
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if a variable of that name exists.
    /// - Shape errors if the bounds do not fit each other or the coordinates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linmod_model::{grid::Grid, model::Model, variable::VariableDeclaration};
    ///
    /// let mut m = Model::new();
    /// let x = m
    ///     .add_variables(VariableDeclaration::new().name("x").coords(Grid::from_shape(&[10])))
    ///     .unwrap();
    /// assert_eq!(x.label_range(), 0..10);
    /// assert!(m.add_variables(VariableDeclaration::new().name("x")).is_err());
    /// assert_eq!(m.nvars(), 10);
    /// ```
    pub fn add_variables(&mut self, decl: VariableDeclaration) -> Result<Variable> {
        let name = self.claim_name(LabelKind::Variable, decl.declared_name())?;
        let resolved = decl.resolve(self.config.force_dim_names)?;
        let merged = self.merged_grid(&resolved.grid)?;

        let range = self
            .registry
            .allocate(LabelKind::Variable, &name, resolved.grid.size())?;
        let mut variable = resolved.into_variable(name, range);
        if &merged != variable.grid() {
            variable.reindex_onto(&merged);
        }

        for dim in merged.dims() {
            if self.shared_coords.get(dim.name()) != Some(dim) {
                self.share_dimension(dim);
            }
        }

        tracing::debug!(
            component = "model",
            operation = "add_variables",
            entity = variable.name(),
            shape = ?variable.shape(),
            active = variable.count_active(),
            labels = ?variable.label_range(),
            "Added variables"
        );

        self.variables.insert(variable.clone());
        Ok(variable)
    }

    /// Makes `dim` the shared index of its name and reindexes every variable
    /// that uses an older version of it.
    fn share_dimension(&mut self, dim: &Index) {
        let previous = self.shared_coords.insert(dim.name().to_string(), dim.clone());
        if let Some(previous) = previous {
            tracing::debug!(
                component = "model",
                operation = "merge_coords",
                dim = dim.name(),
                from = previous.len(),
                to = dim.len(),
                "Enlarged shared dimension"
            );
        }

        for variable in self.variables.iter_mut() {
            let Some(own) = variable.grid().dim(dim.name()) else {
                continue;
            };
            if own == dim {
                continue;
            }
            let grid = variable.grid().with_index(dim);
            tracing::trace!(
                component = "model",
                operation = "reindex",
                entity = variable.name(),
                dim = dim.name(),
                "Reindexed variable onto shared dimension"
            );
            variable.reindex_onto(&grid);
        }
    }

    /// Adds a block of constraints and returns a snapshot of it.
    ///
    /// # Errors
    ///
    /// - `DuplicateName` if a constraint of that name exists.
    /// - `InvalidSign` if an explicit sign token is unknown.
    /// - `AmbiguousComparison` or shape errors from normalizing the body.
    pub fn add_constraints(&mut self, decl: impl Into<ConstraintDeclaration>) -> Result<Constraint> {
        let decl = decl.into();
        let name = self.claim_name(LabelKind::Constraint, decl.declared_name())?;
        let resolved = decl.resolve(self.config.mask_empty_rows)?;
        if self.config.force_dim_names {
            if let Some(dim) = resolved.body.grid().default_named_dim() {
                return Err(ModelError::UnnamedDimension(dim.to_string()));
            }
        }

        let size = resolved.body.grid().size();
        let range = self.registry.allocate(LabelKind::Constraint, &name, size)?;
        let constraint = resolved.into_constraint(name, range);

        tracing::debug!(
            component = "model",
            operation = "add_constraints",
            entity = constraint.name(),
            sign = %constraint.sign(),
            shape = ?constraint.shape(),
            nterm = constraint.nterm(),
            active = constraint.count_active(),
            "Added constraints"
        );

        self.constraints.insert(constraint.clone());
        Ok(constraint)
    }

    /// Sets the objective to the sum of `expr` over all its dimensions.
    ///
    /// # Errors
    ///
    /// `ObjectiveExists` if an objective is set and `overwrite` is `false`.
    pub fn add_objective(&mut self, expr: impl Into<LinearExpression>, overwrite: bool) -> Result<()> {
        if self.objective.is_some() && !overwrite {
            return Err(ModelError::ObjectiveExists);
        }
        let objective = expr.into().sum_all();
        tracing::debug!(
            component = "model",
            operation = "add_objective",
            nterm = objective.nterm(),
            overwrite,
            "Set objective"
        );
        self.objective = Some(objective);
        Ok(())
    }

    /// Builds `sum(coeff_i * var_i)`.
    ///
    /// A term refers to a whole variable by name or to the single scalar
    /// variable that was allocated an integer label.
    ///
    /// # Errors
    ///
    /// - `UnknownName` if a variable does not exist.
    /// - `LabelNotFound` if a label is unallocated or masked.
    /// - Shape errors if a coefficient does not fit its variable.
    pub fn linexpr<'n, I, C, R>(&self, terms: I) -> Result<LinearExpression>
    where
        I: IntoIterator<Item = (C, R)>,
        C: Into<ArrayLike>,
        R: Into<LabelQuery<'n>>,
    {
        let (coeffs, vars): (Vec<C>, Vec<Cow<'_, Variable>>) = terms
            .into_iter()
            .map(|(coeff, var)| {
                let var = match var.into() {
                    LabelQuery::Name(name) => Cow::Borrowed(self.variables.get(name)?),
                    LabelQuery::Label(label) => Cow::Owned(self.variable_at_label(label)?),
                };
                Ok((coeff, var))
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .unzip();
        LinearExpression::from_terms(coeffs.into_iter().zip(vars.iter().map(|v| &**v)))
    }

    /// The scalar variable currently holding `label`.
    fn variable_at_label(&self, label: i64) -> Result<Variable> {
        let (name, _) = self.registry.lookup_name(LabelKind::Variable, label)?;
        let variable = self.variables.get(name)?;
        let position = variable
            .labels()
            .iter()
            .position(|l| l.raw() == label)
            .ok_or(ModelError::LabelNotFound {
                kind: LabelKind::Variable,
                label,
            })?;
        variable.at(position)
    }

    /// Name of the variable that was allocated `label`.
    ///
    /// # Errors
    ///
    /// - `LabelNotFound` if the label was never allocated.
    /// - `AmbiguousLabel` if a name is passed instead of a label.
    pub fn variable_name_by_label<'q>(&self, label: impl Into<LabelQuery<'q>>) -> Result<&str> {
        self.registry
            .lookup_name(LabelKind::Variable, label)
            .map(|(name, _)| name)
    }

    /// Name of the constraint that was allocated `label`.
    ///
    /// # Errors
    ///
    /// - `LabelNotFound` if the label was never allocated.
    /// - `AmbiguousLabel` if a name is passed instead of a label.
    pub fn constraint_name_by_label<'q>(&self, label: impl Into<LabelQuery<'q>>) -> Result<&str> {
        self.registry
            .lookup_name(LabelKind::Constraint, label)
            .map(|(name, _)| name)
    }

    /// Assembles the constraint matrix and its companion vectors.
    ///
    /// With `filter_missings` the shape is `(ncons, nvars)`, otherwise it is
    /// [`Model::shape`].
    pub fn matrices(&self, filter_missings: bool) -> MatrixSystem {
        MatrixAssembler::new(&self.variables, &self.constraints, self.shape())
            .objective(self.objective.as_ref())
            .filter_missings(filter_missings)
            .sanitize_zeros(self.config.sanitize_on_export)
            .assemble()
    }

    /// Assembles only the constraint matrix.
    pub fn to_matrix(&self, filter_missings: bool) -> CsMat<f64> {
        self.matrices(filter_missings).into_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        array::{LabeledArray, RawArray},
        error::ErrorKind,
        sign::Sign,
    };
    use linmod_core::label::Label;

    fn vars(m: &mut Model, name: &str, shape: &[usize]) -> Variable {
        m.add_variables(
            VariableDeclaration::new()
                .name(name)
                .coords(Grid::from_shape(shape)),
        )
        .unwrap()
    }

    fn half_mask() -> LabeledArray<bool> {
        let data = (0..10).map(|i| i >= 5).collect();
        LabeledArray::new(Grid::from_shape(&[10]), data).unwrap()
    }

    #[test]
    fn test_matrix_shape_unfiltered() {
        let mut m = Model::new();
        let x = vars(&mut m, "x", &[10]);
        m.add_variables(
            VariableDeclaration::new()
                .name("y")
                .coords(Grid::new([Index::new("r", ["a", "b", "c"]).unwrap()]).unwrap()),
        )
        .unwrap();
        m.add_variables(VariableDeclaration::new().name("z")).unwrap();
        m.add_constraints(x.ge(0.0).unwrap()).unwrap();
        assert_eq!(m.to_matrix(false).shape(), (10, 14));
        assert_eq!(m.shape(), (10, 14));
    }

    #[test]
    fn test_matrix_masked_variables() {
        let mut m = Model::new();
        let x = m
            .add_variables(
                VariableDeclaration::new()
                    .coords(Grid::from_shape(&[10]))
                    .mask(half_mask()),
            )
            .unwrap();
        m.add_variables(VariableDeclaration::new()).unwrap();
        m.add_constraints(ConstraintDeclaration::from_parts(&x, "=", 0.0)).unwrap();
        assert_eq!(m.to_matrix(true).shape(), (5, 6));
        assert_eq!((m.ncons(), m.nvars()), (5, 6));
        assert_eq!(m.to_matrix(false).shape(), m.shape());
        assert_eq!(m.shape(), (10, 11));
    }

    #[test]
    fn test_matrix_masked_constraints() {
        let mut m = Model::new();
        let x = vars(&mut m, "x", &[10]);
        m.add_variables(VariableDeclaration::new()).unwrap();
        m.add_constraints(ConstraintDeclaration::from_parts(&x, "=", 0.0).mask(half_mask()))
            .unwrap();
        assert_eq!(m.to_matrix(true).shape(), (5, 11));
        assert_eq!((m.ncons(), m.nvars()), (5, 11));
        assert_eq!(m.to_matrix(false).shape(), m.shape());
    }

    #[test]
    fn test_matrix_masked_constraints_and_variables() {
        let mut m = Model::new();
        let x = m
            .add_variables(
                VariableDeclaration::new()
                    .coords(Grid::from_shape(&[10]))
                    .mask(half_mask()),
            )
            .unwrap();
        m.add_variables(VariableDeclaration::new()).unwrap();
        m.add_constraints(ConstraintDeclaration::from_parts(&x, "=", 0.0).mask(half_mask()))
            .unwrap();
        assert_eq!(m.to_matrix(true).shape(), (5, 6));
        assert_eq!(m.to_matrix(false).shape(), m.shape());
    }

    #[test]
    fn test_matrices_vectors_follow_index_convention() {
        let mut m = Model::new();
        let x = m
            .add_variables(
                VariableDeclaration::new()
                    .name("x")
                    .lower(1.0)
                    .upper(2.0)
                    .coords(Grid::from_shape(&[10]))
                    .mask(half_mask()),
            )
            .unwrap();
        m.add_constraints((&(&x * 2.0) + &x).le(4.0).unwrap().named("c")).unwrap();
        m.add_objective(&x * 3.0, false).unwrap();

        let sys = m.matrices(true);
        assert_eq!(sys.shape(), (5, 5));
        assert_eq!(sys.row_of(Label::from_raw(5)).map(|r| r.get()), Some(0));
        assert_eq!(sys.column_of(Label::from_raw(9)).map(|c| c.get()), Some(4));
        assert_eq!(sys.column_of(Label::from_raw(0)), None);
        assert_eq!(sys.lower(), &[1.0; 5]);
        assert_eq!(sys.rhs(), &[4.0; 5]);
        assert!(sys.sense().iter().all(|&s| s == Sign::LessEqual));
        assert_eq!(sys.objective(), &[3.0; 5]);
        // duplicate (row, column) pairs are summed
        assert_eq!(sys.matrix().get(0, 0), Some(&3.0));
        assert_eq!(sys.matrix().nnz(), 5);

        let full = m.matrices(false);
        assert_eq!(full.shape(), (10, 10));
        assert_eq!(full.upper()[0], 0.0);
        assert_eq!(full.sense()[0], Sign::Equal);
        assert_eq!(full.rhs()[0], 0.0);
        assert_eq!(full.row_labels()[0], Label::NONE);
        assert_eq!(full.col_labels()[7], Label::from_raw(7));
    }

    #[test]
    fn test_sanitize_on_export_drops_zero_terms() {
        let mut builder = Model::builder();
        builder.set_sanitize_on_export(true);
        let mut m = builder.build();
        let x = vars(&mut m, "x", &[3]);
        let y = vars(&mut m, "y", &[3]);
        m.add_constraints((&(&x * 0.0) + &y).ge(0.0).unwrap()).unwrap();
        assert_eq!(m.to_matrix(true).nnz(), 3);

        // x - x sums to an explicit zero only after duplicate merging
        let cancel = &(&(&x * -1.0) + &x) + &y;
        m.add_constraints(cancel.ge(0.0).unwrap()).unwrap();
        let sys = m.matrices(true);
        assert_eq!(sys.matrix().nnz(), 6);
        assert_eq!(sys.matrix().get(3, 0), None);

        let mut plain = Model::new();
        let x = vars(&mut plain, "x", &[3]);
        let y = vars(&mut plain, "y", &[3]);
        plain.add_constraints((&(&x * 0.0) + &y).ge(0.0).unwrap()).unwrap();
        plain.constraints_mut().sanitize_zeros();
        assert_eq!(plain.to_matrix(true).nnz(), 3);

        let cancel = &(&(&x * -1.0) + &x) + &y;
        plain.add_constraints(cancel.ge(0.0).unwrap()).unwrap();
        assert_eq!(plain.matrices(true).matrix().get(3, 0), Some(&0.0));
    }

    #[test]
    fn test_labels_unique_across_model() {
        let mut m = Model::new();
        let a = vars(&mut m, "a", &[4]);
        let b = m
            .add_variables(
                VariableDeclaration::new()
                    .name("b")
                    .coords(Grid::from_shape(&[10]))
                    .mask(half_mask()),
            )
            .unwrap();
        let mut seen = std::collections::HashSet::new();
        for l in a.labels().iter().chain(b.labels().iter()).filter(|l| l.is_some()) {
            assert!(seen.insert(*l));
        }
        assert_eq!(seen.len(), 9);
        assert_eq!(b.label_range(), 4..14);
    }

    #[test]
    fn test_name_by_label() {
        let mut m = Model::new();
        let x = vars(&mut m, "x", &[10]);
        let y = vars(&mut m, "y", &[10]);
        m.add_constraints((&x + &y).le(10.0).unwrap().named("first")).unwrap();
        m.add_constraints((&x - &y).ge(5.0).unwrap().named("second")).unwrap();

        assert_eq!(m.constraints().get_name_by_label(4).unwrap(), "first");
        assert_eq!(m.constraints().get_name_by_label(14).unwrap(), "second");
        assert_eq!(m.constraint_name_by_label(14).unwrap(), "second");
        assert_eq!(m.variable_name_by_label(12).unwrap(), "y");

        let err = m.constraints().get_name_by_label(30).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = m.constraints().get_name_by_label("first").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_coordinate_merge_reindexes_existing_variables() {
        let mut m = Model::new();
        let lower = LabeledArray::full(Grid::from_shape(&[10, 10]), 0.0);
        let upper = LabeledArray::full(Grid::from_shape(&[10]), 1.0);
        let handle = m
            .add_variables(VariableDeclaration::new().name("var9").lower(lower).upper(upper))
            .unwrap();
        assert_eq!(handle.shape().as_slice(), &[10, 10]);

        let lower = LabeledArray::full(Grid::from_shape(&[20, 10]), 0.0);
        let upper = LabeledArray::full(Grid::from_shape(&[20]), 1.0);
        let var10 = m
            .add_variables(
                VariableDeclaration::new()
                    .name("var10")
                    .lower(lower.clone())
                    .upper(upper.clone()),
            )
            .unwrap();
        assert_eq!(var10.shape().as_slice(), &[20, 10]);

        let var9 = &m.variables()["var9"];
        assert_eq!(var9.shape().as_slice(), &[20, 10]);
        assert_eq!(var9.count_active(), 100);
        assert!(var9.lower().data()[150].is_nan());
        assert_eq!(m.coords("dim_0").map(Index::len), Some(20));

        assert_eq!(m.shape(), (0, 300));

        // handles are snapshots
        assert_eq!(handle.shape().as_slice(), &[10, 10]);

        let err = m
            .add_variables(VariableDeclaration::new().name("var9").lower(lower).upper(upper))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Assertion);
    }

    #[test]
    fn test_failed_declaration_leaves_model_untouched() {
        let mut m = Model::new();
        let err = m
            .add_variables(VariableDeclaration::new().name("var11").lower(0.0).upper(vec![1.0, 2.0]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(m.shape(), (0, 0));
        assert!(m.variables().is_empty());

        let err = m
            .add_variables(
                VariableDeclaration::new()
                    .coords(Grid::from_shape(&[3]))
                    .upper(RawArray::new(&[2, 2], vec![0.0; 4]).unwrap()),
            )
            .unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch { .. }));
        assert_eq!(m.shape(), (0, 0));

        let x = vars(&mut m, "x", &[3]);
        let err = m
            .add_constraints(ConstraintDeclaration::from_parts(&x, ",", 0.0))
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidSign(_)));
        assert_eq!(m.shape(), (0, 3));
        let con = m
            .add_constraints(ConstraintDeclaration::from_parts(&x, ">=", 0.0))
            .unwrap();
        assert_eq!(con.name(), "con0");
        assert_eq!(m.shape(), (3, 3));

        let err = m
            .add_constraints(ConstraintDeclaration::from_parts(&x, ",", 0.0).name("c"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(m.shape(), (3, 3));
        assert!(!m.constraints().contains("c"));
        m.add_constraints(ConstraintDeclaration::from_parts(&x, ">=", 0.0).name("c"))
            .unwrap();
        assert_eq!(m.shape(), (6, 3));
    }

    #[test]
    fn test_auto_names() {
        let mut m = Model::new();
        let a = m.add_variables(VariableDeclaration::new()).unwrap();
        let b = m.add_variables(VariableDeclaration::new().name("var1")).unwrap();
        let c = m.add_variables(VariableDeclaration::new()).unwrap();
        assert_eq!([a.name(), b.name(), c.name()], ["var0", "var1", "var2"]);
        let con = m.add_constraints(a.ge(0.0).unwrap()).unwrap();
        assert_eq!(con.name(), "con0");
    }

    #[test]
    fn test_scalar_comparison_is_ambiguous() {
        let mut m = Model::new();
        let x = m.add_variables(VariableDeclaration::new().name("x")).unwrap();
        let y = m.add_variables(VariableDeclaration::new().name("y")).unwrap();
        let err = x.ge(&y).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert!(x.ge(y.to_expr()).is_ok());

        let v = vars(&mut m, "v", &[3]);
        assert!(v.le(&x).is_ok());
    }

    #[test]
    fn test_constraint_setters_through_model() {
        let mut m = Model::new();
        let x = vars(&mut m, "x", &[10]);
        m.add_constraints(x.ge(0.0).unwrap().named("c")).unwrap();

        let c = m.constraints_mut().get_mut("c").unwrap();
        c.set_rhs(&x + 1.0).unwrap();
        assert_eq!(c.nterm(), 2);
        assert!(c.rhs().all(|&r| r == 1.0));

        c.set_lhs(10.0).unwrap();
        assert_eq!(c.nterm(), 0);
        assert!(c.rhs().all(|&r| r == -9.0));
    }

    #[test]
    fn test_constraint_sign_aliases() {
        let mut m = Model::new();
        let x = vars(&mut m, "x", &[2]);
        let y = vars(&mut m, "y", &[2]);
        for (i, (token, sign)) in [
            ("<=", Sign::LessEqual),
            (">=", Sign::GreaterEqual),
            ("=", Sign::Equal),
            ("<", Sign::LessEqual),
            (">", Sign::GreaterEqual),
            ("==", Sign::Equal),
        ]
        .into_iter()
        .enumerate()
        {
            let c = m
                .add_constraints(ConstraintDeclaration::from_parts(&x + &y, token, 0.0).name(format!("c{i}")))
                .unwrap();
            assert_eq!(c.sign(), sign);
            assert!(c.rhs().all(|&r| r == 0.0));
        }
        let err = m
            .add_constraints(ConstraintDeclaration::from_parts(&x + &y, ",", 0.0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert_eq!(m.ncons(), 12);
    }

    #[test]
    fn test_linexpr_and_objective() {
        let mut m = Model::new();
        let lower = LabeledArray::full(Grid::from_shape(&[10, 10]), 0.0);
        let upper = LabeledArray::full(Grid::from_shape(&[10, 10]), 1.0);
        m.add_variables(VariableDeclaration::new().name("var1").lower(lower.clone()).upper(upper.clone()))
            .unwrap();
        m.add_variables(VariableDeclaration::new().name("var2").lower(lower).upper(upper))
            .unwrap();

        let weights: Vec<f64> = (0..10).map(|i| (2 * i) as f64).collect();
        let expr = m
            .linexpr([(ArrayLike::from(weights), "var1"), (ArrayLike::from(10.0), "var2")])
            .unwrap();
        assert_eq!(expr.nterm(), 2);
        assert_eq!(expr.grid().shape().as_slice(), &[10, 10]);
        assert!(matches!(
            m.linexpr([(1.0, "missing")]),
            Err(ModelError::UnknownName { .. })
        ));

        m.add_objective(expr.clone(), false).unwrap();
        assert_eq!(m.objective().map(LinearExpression::nterm), Some(200));
        assert_eq!(m.add_objective(expr.clone(), false), Err(ModelError::ObjectiveExists));
        assert!(m.add_objective(expr, true).is_ok());
    }

    #[test]
    fn test_linexpr_with_labels() {
        let mut m = Model::new();
        let bounds = LabeledArray::full(Grid::from_shape(&[10, 10]), 0.0);
        m.add_variables(VariableDeclaration::new().name("var1").lower(bounds))
            .unwrap();

        let expr = m
            .linexpr([(1.0, LabelQuery::from(1i64)), (10.0, LabelQuery::from("var1"))])
            .unwrap();
        assert_eq!(expr.grid().shape().as_slice(), &[10, 10]);
        assert_eq!(expr.vars_at(0), &[Label::from_raw(1), Label::from_raw(0)]);

        let arange: Vec<f64> = (0..10).map(f64::from).collect();
        let arange = LabeledArray::new(Grid::from_shape(&[10]), arange).unwrap();
        let expr = m
            .linexpr([
                (ArrayLike::from(arange), LabelQuery::from(1i64)),
                (ArrayLike::from(10.0), LabelQuery::from("var1")),
            ])
            .unwrap();
        assert_eq!(expr.grid().shape().as_slice(), &[10, 10]);
        assert_eq!(expr.coeffs_at(10), &[1.0, 10.0]);

        let expr = m.linexpr([(1.0, 1i64), (10.0, 2i64)]).unwrap();
        assert!(expr.grid().is_scalar());
        assert_eq!(expr.nterm(), 2);
        assert_eq!(expr.coeffs_at(0), &[1.0, 10.0]);
        assert_eq!(expr.vars_at(0), &[Label::from_raw(1), Label::from_raw(2)]);

        let err = m.linexpr([(1.0, 100i64)]).unwrap_err();
        assert!(matches!(err, ModelError::LabelNotFound { label: 100, .. }));
    }

    #[test]
    fn test_force_dim_names() {
        let mut builder = ModelBuilder::new();
        builder.set_force_dim_names(true);
        let mut m = builder.build();
        let err = m
            .add_variables(VariableDeclaration::new().coords(Grid::from_shape(&[2])))
            .unwrap_err();
        assert!(matches!(err, ModelError::UnnamedDimension(_)));
        assert_eq!(m.shape(), (0, 0));
    }

    #[test]
    fn test_empty_row_masking_is_configurable() {
        let mut builder = ModelBuilder::new();
        builder.set_mask_empty_rows(false);
        let mut m = builder.build();
        let x = m
            .add_variables(
                VariableDeclaration::new()
                    .coords(Grid::from_shape(&[10]))
                    .mask(half_mask()),
            )
            .unwrap();
        m.add_constraints(x.eq(0.0).unwrap()).unwrap();
        assert_eq!(m.ncons(), 10);
        assert_eq!(m.to_matrix(true).shape(), (10, 5));
    }
}
