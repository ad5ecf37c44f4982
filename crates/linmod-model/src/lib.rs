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

//! # linmod Model
//!
//! **Labeled linear optimization models over multi-dimensional coordinates.**
//!
//! Decision variables and constraints are declared over named coordinate
//! grids, combined with broadcasting linear arithmetic, assigned unique
//! integer labels, and finally assembled into a sparse coefficient matrix
//! with bound, sense and right-hand-side vectors for an external solver.
//!
//! ## Architecture
//!
//! * **`coords`**, **`grid`**, **`array`**: coordinate indexes, grids with
//!   outer-join alignment and numpy-style broadcasting, and labeled arrays.
//! * **`expr`**: `LinearExpression`, the broadcasting term arithmetic.
//! * **`variable`**, **`constraint`**: declarations, handles and the ordered
//!   collections of a model.
//! * **`registry`**: per-model label counters with reverse lookup.
//! * **`matrix`**: assembly of the sparse system.
//! * **`model`**: the `Model` facade and its configuration.
//! * **`error`**, **`sign`**: the error type and constraint signs.
//!
//! ## Example
//!
//! ```rust
//! use linmod_model::{grid::Grid, model::Model, variable::VariableDeclaration};
//!
//! let mut m = Model::new();
//! let x = m
//!     .add_variables(
//!         VariableDeclaration::new()
//!             .name("x")
//!             .lower(0.0)
//!             .coords(Grid::from_shape(&[10])),
//!     )
//!     .unwrap();
//! let y = m.add_variables(VariableDeclaration::new().name("y")).unwrap();
//!
//! m.add_constraints((&(&x * 2.0) + &y).le(10.0).unwrap().named("cap"))
//!     .unwrap();
//! m.add_objective(x.sum_all(), false).unwrap();
//!
//! let system = m.matrices(true);
//! assert_eq!(system.shape(), (10, 11));
//! assert_eq!(system.matrix().nnz(), 20);
//! ```

pub mod array;
pub mod constraint;
pub mod coords;
pub mod error;
pub mod expr;
pub mod grid;
pub mod matrix;
pub mod model;
pub mod registry;
pub mod sign;
pub mod variable;
