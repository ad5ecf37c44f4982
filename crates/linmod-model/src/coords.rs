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

//! Coordinate values and single-dimension indexes.
//!
//! An [`Index`] is one named dimension of a grid: an ordered list of unique
//! coordinate values plus a hash lookup from value to position. Alignment of
//! two indexes is an outer join that keeps the left order and appends the
//! right-only values in their own order.

use crate::error::{ModelError, Result};
use rustc_hash::FxHashMap;

/// Dimension name reserved for the term axis of linear expressions.
pub const TERM_DIM: &str = "_term";

/// Prefix of the names given to dimensions created from bare shapes.
pub const DEFAULT_DIM_PREFIX: &str = "dim_";

/// A coordinate key along one dimension.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CoordValue {
    Int(i64),
    Str(String),
}

impl std::fmt::Display for CoordValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for CoordValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for CoordValue {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<usize> for CoordValue {
    fn from(value: usize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<&str> for CoordValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for CoordValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// One named dimension with unique coordinate values.
#[derive(Clone)]
pub struct Index {
    name: String,
    values: Vec<CoordValue>,
    positions: FxHashMap<CoordValue, usize>,
}

impl Index {
    /// Creates an index from a name and coordinate values.
    ///
    /// # Errors
    ///
    /// - `DuplicateCoordinate` if a value appears twice.
    /// - `ReservedDimension` if `name` is the term dimension name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linmod_model::coords::Index;
    ///
    /// let regions = Index::new("region", ["north", "south"]).unwrap();
    /// assert_eq!(regions.len(), 2);
    /// assert_eq!(regions.position(&"south".into()), Some(1));
    /// ```
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<CoordValue>,
    {
        let name = name.into();
        if name == TERM_DIM {
            return Err(ModelError::ReservedDimension(name));
        }

        let values: Vec<CoordValue> = values.into_iter().map(Into::into).collect();
        let mut positions =
            FxHashMap::with_capacity_and_hasher(values.len(), Default::default());
        for (pos, value) in values.iter().enumerate() {
            if positions.insert(value.clone(), pos).is_some() {
                return Err(ModelError::DuplicateCoordinate {
                    dim: name,
                    value: value.to_string(),
                });
            }
        }

        Ok(Self {
            name,
            values,
            positions,
        })
    }

    /// Creates an index over the integers `0..len`.
    pub fn range(name: impl Into<String>, len: usize) -> Self {
        let values: Vec<CoordValue> = (0..len as i64).map(CoordValue::Int).collect();
        let positions = values
            .iter()
            .cloned()
            .enumerate()
            .map(|(pos, value)| (value, pos))
            .collect();
        Self {
            name: name.into(),
            values,
            positions,
        }
    }

    /// Builds an index from values already known to be unique.
    fn from_unique(name: String, values: Vec<CoordValue>) -> Self {
        let positions = values
            .iter()
            .cloned()
            .enumerate()
            .map(|(pos, value)| (value, pos))
            .collect();
        Self {
            name,
            values,
            positions,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn values(&self) -> &[CoordValue] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the position of `value`, if present.
    #[inline]
    pub fn position(&self, value: &CoordValue) -> Option<usize> {
        self.positions.get(value).copied()
    }

    #[inline]
    pub fn contains(&self, value: &CoordValue) -> bool {
        self.positions.contains_key(value)
    }

    /// Returns `true` if the name follows the `dim_N` pattern given to
    /// dimensions built from bare shapes.
    pub fn has_default_name(&self) -> bool {
        self.name
            .strip_prefix(DEFAULT_DIM_PREFIX)
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Outer join: all values of `self` in order, then the values of `other`
    /// that `self` lacks, in `other`'s order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linmod_model::coords::Index;
    ///
    /// let a = Index::new("t", [0, 1, 2]).unwrap();
    /// let b = Index::new("t", [3, 1]).unwrap();
    /// let u = a.union(&b);
    /// assert_eq!(u.values(), Index::new("t", [0, 1, 2, 3]).unwrap().values());
    /// ```
    pub fn union(&self, other: &Index) -> Index {
        debug_assert_eq!(
            self.name, other.name,
            "called `Index::union` on indexes of different dimensions"
        );

        if self == other {
            return self.clone();
        }

        let mut values = self.values.clone();
        values.extend(other.values.iter().filter(|v| !self.contains(v)).cloned());
        Self::from_unique(self.name.clone(), values)
    }

    /// Returns the index restricted to `positions`, in the given order.
    ///
    /// # Errors
    ///
    /// `DuplicateCoordinate` if a position is repeated.
    pub(crate) fn take(&self, positions: &[usize]) -> Result<Index> {
        let values: Vec<CoordValue> = positions.iter().map(|&p| self.values[p].clone()).collect();
        Index::new(self.name.clone(), values)
    }
}

impl PartialEq for Index {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.values == other.values
    }
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Index({}: {} values)", self.name, self.values.len())
    }
}
