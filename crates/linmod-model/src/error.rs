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

//! Error type shared by every fallible operation of the model crate.
//!
//! All failures are local validation errors raised at the offending call.
//! Nothing is retried and nothing is partially applied: operations that
//! allocate labels validate their inputs first.

use crate::registry::LabelKind;

/// Coarse classification of a [`ModelError`].
///
/// Mirrors the usual error classes of array modeling APIs so callers can
/// react to a family of failures without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or unresolvable input values (signs, shapes, coordinates).
    Value,
    /// An argument of the wrong kind, or an ambiguous comparison.
    Type,
    /// A programmer error such as re-declaring a name.
    Assertion,
    /// A label, name or coordinate that does not exist.
    NotFound,
}

/// The error type for model construction, arithmetic and export.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("invalid constraint sign `{0}`, expected one of `<=`, `>=`, `=` (or `<`, `>`, `==`)")]
    InvalidSign(String),

    #[error("cannot broadcast shapes {left:?} and {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },

    #[error("cannot infer coordinates for unlabeled data of shape {shape:?}")]
    UnlabeledArray { shape: Vec<usize> },

    #[error("data of length {len} does not match a grid of size {size}")]
    DataLength { len: usize, size: usize },

    #[error("coordinate `{value}` appears more than once in dimension `{dim}`")]
    DuplicateCoordinate { dim: String, value: String },

    #[error("dimension `{0}` appears more than once")]
    DuplicateDimension(String),

    #[error("dimension name `{0}` is reserved")]
    ReservedDimension(String),

    #[error("dimension `{0}` has a default name; explicit dimension names are required")]
    UnnamedDimension(String),

    #[error("dimension `{0}` does not exist")]
    UnknownDimension(String),

    #[error("dimension `{dim}` is not part of the target grid")]
    MissingDimension { dim: String },

    #[error("coordinate `{value}` not found in dimension `{dim}`")]
    CoordinateNotFound { dim: String, value: String },

    #[error("position {position} is out of bounds for dimension `{dim}` of length {len}")]
    PositionOutOfBounds {
        dim: String,
        position: usize,
        len: usize,
    },

    #[error(
        "comparing a scalar expression with the scalar variable `{0}` is ambiguous; \
         convert the variable into an expression first"
    )]
    AmbiguousComparison(String),

    #[error("cannot assign {what} to constraint `{name}`: {reason}")]
    InvalidAssignment {
        name: String,
        what: &'static str,
        reason: String,
    },

    #[error("a {kind} named `{name}` already exists")]
    DuplicateName { kind: LabelKind, name: String },

    #[error("no {kind} named `{name}`")]
    UnknownName { kind: LabelKind, name: String },

    #[error("{kind} label {label} was never allocated")]
    LabelNotFound { kind: LabelKind, label: i64 },

    #[error("expected an integer label, got the name `{0}`")]
    AmbiguousLabel(String),

    #[error("the model already has an objective")]
    ObjectiveExists,
}

impl ModelError {
    /// Returns the class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AmbiguousComparison(_) | Self::InvalidAssignment { .. } => ErrorKind::Type,
            Self::DuplicateName { .. } => ErrorKind::Assertion,
            Self::UnknownName { .. }
            | Self::LabelNotFound { .. }
            | Self::CoordinateNotFound { .. }
            | Self::PositionOutOfBounds { .. } => ErrorKind::NotFound,
            _ => ErrorKind::Value,
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
