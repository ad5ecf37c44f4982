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

//! # Matrix Assembly
//!
//! Turns the constraints of a model into one sparse coefficient matrix plus
//! the per-row and per-column vectors a solver needs (bounds, senses,
//! right-hand sides, objective).
//!
//! ## Index convention
//!
//! Rows are constraint labels and columns are variable labels. Without
//! filtering, position `i` *is* label `i` and inactive labels leave zero rows
//! and columns. With filtering, only active labels get a position, and
//! position `i` is the `i`-th active label in ascending order. Every vector of
//! a [`MatrixSystem`] uses the same convention as its matrix; use
//! [`MatrixSystem::row_of`] and [`MatrixSystem::column_of`] to translate.
//!
//! Repeated `(row, column)` pairs are summed before the sparse matrix is
//! built, so the sink only ever sees unique entries.

use crate::{
    constraint::Constraints, expr::LinearExpression, sign::Sign, variable::Variables,
};
use fixedbitset::FixedBitSet;
use linmod_core::{
    label::Label,
    utils::index::{TypedIndex, TypedIndexTag},
};
use sprs::{CsMat, TriMat};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RowTag;

impl TypedIndexTag for RowTag {
    const NAME: &'static str = "RowIndex";
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ColumnTag;

impl TypedIndexTag for ColumnTag {
    const NAME: &'static str = "ColumnIndex";
}

/// A row position of an assembled matrix.
pub type RowIndex = TypedIndex<RowTag>;

/// A column position of an assembled matrix.
pub type ColumnIndex = TypedIndex<ColumnTag>;

/// Maps the labels of one kind onto matrix positions.
#[derive(Debug, Clone)]
struct LabelSpace {
    active: FixedBitSet,
    /// Rank of every active label; only present when filtering.
    ranks: Option<Vec<usize>>,
    len: usize,
}

impl LabelSpace {
    fn new(active: FixedBitSet, filter: bool) -> Self {
        if !filter {
            let len = active.len();
            return Self {
                active,
                ranks: None,
                len,
            };
        }

        let mut ranks = vec![usize::MAX; active.len()];
        let mut len = 0;
        for label in active.ones() {
            ranks[label] = len;
            len += 1;
        }
        Self {
            active,
            ranks: Some(ranks),
            len,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    /// Position of `label`, or `None` if the label is not active.
    #[inline]
    fn position(&self, label: Label) -> Option<usize> {
        let label = label.into_option()?;
        if !self.active.contains(label) {
            return None;
        }
        Some(match &self.ranks {
            Some(ranks) => ranks[label],
            None => label,
        })
    }

    /// Label at every position.
    fn labels(&self) -> Vec<Label> {
        match self.ranks {
            Some(_) => self.active.ones().map(Label::some).collect(),
            None => (0..self.len)
                .map(|i| {
                    if self.active.contains(i) {
                        Label::some(i)
                    } else {
                        Label::NONE
                    }
                })
                .collect(),
        }
    }
}

fn mark(active: &mut FixedBitSet, labels: &[Label]) {
    for label in labels.iter().filter_map(Label::into_option) {
        debug_assert!(
            label < active.len(),
            "called `mark` with label out of bounds: the extent is {} but the label is {}",
            active.len(),
            label
        );
        if label < active.len() {
            active.insert(label);
        }
    }
}

/// Sorts triplets by `(row, column)` and sums duplicates in place.
///
/// With `drop_zeros`, entries whose sum is exactly zero are removed.
fn merge_duplicates(triplets: &mut Vec<(usize, usize, f64)>, drop_zeros: bool) {
    triplets.sort_unstable_by_key(|&(r, c, _)| (r, c));
    triplets.dedup_by(|next, kept| {
        if (next.0, next.1) == (kept.0, kept.1) {
            kept.2 += next.2;
            true
        } else {
            false
        }
    });
    if drop_zeros {
        triplets.retain(|&(_, _, v)| v != 0.0);
    }
}

/// The assembled linear system.
#[derive(Debug, Clone)]
pub struct MatrixSystem {
    matrix: CsMat<f64>,
    rows: LabelSpace,
    columns: LabelSpace,
    lower: Vec<f64>,
    upper: Vec<f64>,
    sense: Vec<Sign>,
    rhs: Vec<f64>,
    objective: Vec<f64>,
}

impl MatrixSystem {
    /// The constraint matrix in CSR layout.
    #[inline]
    pub fn matrix(&self) -> &CsMat<f64> {
        &self.matrix
    }

    #[inline]
    pub fn into_matrix(self) -> CsMat<f64> {
        self.matrix
    }

    /// `(rows, columns)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.matrix.shape()
    }

    /// Constraint label of every row; the sentinel for inactive rows.
    pub fn row_labels(&self) -> Vec<Label> {
        self.rows.labels()
    }

    /// Variable label of every column; the sentinel for inactive columns.
    pub fn col_labels(&self) -> Vec<Label> {
        self.columns.labels()
    }

    /// Lower bound per column; `0` for inactive columns.
    #[inline]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper bound per column; `0` for inactive columns.
    #[inline]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Sign per row; `=` for inactive rows.
    #[inline]
    pub fn sense(&self) -> &[Sign] {
        &self.sense
    }

    /// Right-hand side per row; `0` for inactive rows.
    #[inline]
    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }

    /// Objective coefficient per column.
    #[inline]
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    /// Row holding constraint `label`, if it is active.
    pub fn row_of(&self, label: Label) -> Option<RowIndex> {
        self.rows.position(label).map(RowIndex::new)
    }

    /// Column holding variable `label`, if it is active.
    pub fn column_of(&self, label: Label) -> Option<ColumnIndex> {
        self.columns.position(label).map(ColumnIndex::new)
    }
}

/// Collects the inputs of an assembly.
///
/// `extent` is `(constraint labels, variable labels)` ever allocated.
#[derive(Debug, Clone)]
pub struct MatrixAssembler<'a> {
    variables: &'a Variables,
    constraints: &'a Constraints,
    objective: Option<&'a LinearExpression>,
    extent: (usize, usize),
    filter_missings: bool,
    sanitize_zeros: bool,
}

impl<'a> MatrixAssembler<'a> {
    pub fn new(variables: &'a Variables, constraints: &'a Constraints, extent: (usize, usize)) -> Self {
        Self {
            variables,
            constraints,
            objective: None,
            extent,
            filter_missings: true,
            sanitize_zeros: false,
        }
    }

    pub fn objective(mut self, objective: Option<&'a LinearExpression>) -> Self {
        self.objective = objective;
        self
    }

    /// Drop inactive rows and columns instead of keeping them as zeros.
    pub fn filter_missings(mut self, filter: bool) -> Self {
        self.filter_missings = filter;
        self
    }

    /// Skip terms whose coefficient is exactly zero.
    pub fn sanitize_zeros(mut self, sanitize: bool) -> Self {
        self.sanitize_zeros = sanitize;
        self
    }

    pub fn assemble(&self) -> MatrixSystem {
        let (nrows, ncols) = self.extent;

        let mut active_rows = FixedBitSet::with_capacity(nrows);
        for c in self.constraints {
            mark(&mut active_rows, c.labels().data());
        }
        let mut active_cols = FixedBitSet::with_capacity(ncols);
        for v in self.variables {
            mark(&mut active_cols, v.labels().data());
        }
        let rows = LabelSpace::new(active_rows, self.filter_missings);
        let columns = LabelSpace::new(active_cols, self.filter_missings);

        let mut lower = vec![0.0; columns.len()];
        let mut upper = vec![0.0; columns.len()];
        for v in self.variables {
            let bounds = v.lower().iter().zip(v.upper().iter());
            for (&label, (&lo, &up)) in v.labels().iter().zip(bounds) {
                if let Some(j) = columns.position(label) {
                    lower[j] = lo;
                    upper[j] = up;
                }
            }
        }

        let mut sense = vec![Sign::Equal; rows.len()];
        let mut rhs = vec![0.0; rows.len()];
        let mut triplets = Vec::new();
        for c in self.constraints {
            for (&label, &r) in c.labels().iter().zip(c.rhs().iter()) {
                if let Some(i) = rows.position(label) {
                    sense[i] = c.sign();
                    rhs[i] = r;
                }
            }
            triplets.extend(c.flat().filter_map(|t| {
                if self.sanitize_zeros && t.coeff == 0.0 {
                    return None;
                }
                Some((rows.position(t.row)?, columns.position(t.var)?, t.coeff))
            }));
        }
        let nterms = triplets.len();
        merge_duplicates(&mut triplets, self.sanitize_zeros);

        let mut objective = vec![0.0; columns.len()];
        if let Some(expr) = self.objective {
            for t in expr.flatten() {
                if let Some(j) = columns.position(t.var) {
                    objective[j] += t.coeff;
                }
            }
        }

        let mut sink = TriMat::with_capacity((rows.len(), columns.len()), triplets.len());
        for &(i, j, v) in &triplets {
            sink.add_triplet(i, j, v);
        }
        let matrix: CsMat<f64> = sink.to_csr();

        tracing::debug!(
            component = "matrix",
            operation = "assemble",
            rows = rows.len(),
            columns = columns.len(),
            terms = nterms,
            nnz = matrix.nnz(),
            filter_missings = self.filter_missings,
            "Assembled constraint matrix"
        );

        MatrixSystem {
            matrix,
            rows,
            columns,
            lower,
            upper,
            sense,
            rhs,
            objective,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_duplicates_sums_entries() {
        let mut t = vec![(1, 0, 1.0), (0, 2, 2.0), (1, 0, 3.0), (0, 2, -2.0)];
        merge_duplicates(&mut t, false);
        assert_eq!(t, vec![(0, 2, 0.0), (1, 0, 4.0)]);
    }

    #[test]
    fn test_merge_duplicates_drops_cancelled_entries() {
        let mut t = vec![(1, 0, 1.0), (0, 2, 2.0), (1, 0, 3.0), (0, 2, -2.0)];
        merge_duplicates(&mut t, true);
        assert_eq!(t, vec![(1, 0, 4.0)]);
    }

    #[test]
    fn test_label_space_unfiltered_is_identity() {
        let mut active = FixedBitSet::with_capacity(4);
        mark(&mut active, &[Label::from_raw(1), Label::NONE, Label::from_raw(3)]);
        let space = LabelSpace::new(active, false);
        assert_eq!(space.len(), 4);
        assert_eq!(space.position(Label::from_raw(3)), Some(3));
        assert_eq!(space.position(Label::from_raw(0)), None);
        assert_eq!(space.labels()[0], Label::NONE);
    }

    #[test]
    fn test_label_space_filtered_ranks() {
        let mut active = FixedBitSet::with_capacity(6);
        mark(&mut active, &[Label::from_raw(5), Label::from_raw(2)]);
        let space = LabelSpace::new(active, true);
        assert_eq!(space.len(), 2);
        assert_eq!(space.position(Label::from_raw(2)), Some(0));
        assert_eq!(space.position(Label::from_raw(5)), Some(1));
        assert_eq!(space.position(Label::from_raw(4)), None);
        assert_eq!(space.labels(), vec![Label::from_raw(2), Label::from_raw(5)]);
    }

    #[test]
    fn test_typed_positions_display() {
        assert_eq!(format!("{}", RowIndex::new(2)), "RowIndex(2)");
        assert_eq!(format!("{:?}", ColumnIndex::new(4)), "ColumnIndex(4)");
    }
}
