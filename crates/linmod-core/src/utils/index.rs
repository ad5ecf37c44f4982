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

//! # Strongly Typed Positions
//!
//! Phantom-typed wrappers around `usize` that keep position spaces apart.
//! A sparse system has at least three integer spaces in play at once: global
//! labels, matrix rows and matrix columns. With missing entries filtered out,
//! row `i` is *not* constraint label `i`, and mixing them up silently corrupts
//! the exported system. `TypedIndex<T>` makes that mistake a type error while
//! compiling down to a plain `usize` (`#[repr(transparent)]`).
//!
//! ## Usage
//!
//! ```rust
//! use linmod_core::utils::index::{TypedIndex, TypedIndexTag};
//!
//! #[derive(Clone)]
//! struct RowTag;
//! impl TypedIndexTag for RowTag { const NAME: &'static str = "RowIndex"; }
//!
//! type RowIndex = TypedIndex<RowTag>;
//! let r = RowIndex::new(3);
//! assert_eq!(r.get(), 3);
//! assert_eq!(format!("{}", r), "RowIndex(3)");
//! ```

/// Names a typed index for `Debug` and `Display`.
pub trait TypedIndexTag: Clone {
    const NAME: &'static str;
}

/// A `usize` position tagged with the space it belongs to.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedIndex<T> {
    index: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T> TypedIndex<T> {
    /// Creates a new `TypedIndex` from a raw position.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns the underlying position.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.index
    }
}

impl<T> std::fmt::Debug for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> std::fmt::Display for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> From<usize> for TypedIndex<T> {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T> From<TypedIndex<T>> for usize {
    fn from(typed_index: TypedIndex<T>) -> Self {
        typed_index.index
    }
}

macro_rules! impl_index_op {
    ($trait_name:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl<T> std::ops::$trait_name<usize> for TypedIndex<T> {
            type Output = Self;

            fn $method(self, rhs: usize) -> Self::Output {
                Self::new(self.index $op rhs)
            }
        }
        impl<T> std::ops::$assign_trait<usize> for TypedIndex<T> {
            fn $assign_method(&mut self, rhs: usize) {
                self.index = self.index $op rhs;
            }
        }
    };
}

impl_index_op!(Add, add, AddAssign, add_assign, +);
impl_index_op!(Sub, sub, SubAssign, sub_assign, -);
