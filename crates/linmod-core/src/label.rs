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

//! # Labels
//!
//! Every scalar variable and every scalar constraint instance of a model is
//! identified by a non-negative integer, its label. Label arrays are dense
//! (one entry per grid position), so positions without an entity (masked or
//! introduced by alignment) need a representation too.
//!
//! Instead of `Option<u64>`, `Label` uses a sentinel encoding: `-1` means
//! "no entity here". This keeps label arrays at one machine word per entry
//! and matches the layout solvers expect for index arrays.

use crate::num::missing::Missing;

/// A variable or constraint label that may be absent.
///
/// Encoding:
/// - Non-negative values (>= 0) identify an entity.
/// - Negative values (<= -1) mark the position as empty.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(i64);

impl Label {
    const NONE_SENTINEL: i64 = -1;

    /// The empty label.
    pub const NONE: Label = Label(Self::NONE_SENTINEL);

    /// Creates a `Label` from an `Option<usize>`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linmod_core::label::Label;
    ///
    /// let label = Label::from_option(Some(5));
    /// assert!(label.is_some());
    /// assert_eq!(label.raw(), 5);
    /// assert!(Label::from_option(None).is_none());
    /// ```
    #[inline]
    pub fn from_option(value: Option<usize>) -> Self {
        match value {
            Some(v) => Label::some(v),
            None => Self::NONE,
        }
    }

    /// Creates a `Label` from a raw value without checking for the sentinel.
    /// Any negative value is treated as empty.
    #[inline]
    pub const fn from_raw(value: i64) -> Self {
        Label(value)
    }

    /// Creates a present `Label`.
    ///
    /// # Panics
    ///
    /// Panics if `value` does not fit into an `i64`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linmod_core::label::Label;
    ///
    /// let label = Label::some(7);
    /// assert_eq!(label.into_option(), Some(7));
    /// ```
    #[inline]
    pub fn some(value: usize) -> Self {
        assert!(
            value <= i64::MAX as usize,
            "called `Label::some` with a value that does not fit into i64: {}",
            value
        );

        Label(value as i64)
    }

    /// Creates an empty `Label`.
    #[inline]
    pub const fn none() -> Self {
        Self::NONE
    }

    /// Checks if the label is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linmod_core::label::Label;
    ///
    /// assert!(Label::none().is_none());
    /// assert!(Label::from_raw(-3).is_none());
    /// assert!(!Label::some(0).is_none());
    /// ```
    #[inline]
    pub const fn is_none(&self) -> bool {
        self.0 <= Self::NONE_SENTINEL
    }

    /// Checks if the label identifies an entity.
    #[inline]
    pub const fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Returns the raw value, including the sentinel if present.
    #[inline]
    pub const fn raw(&self) -> i64 {
        self.0
    }

    /// Converts the label into an `Option<usize>`.
    #[inline]
    pub const fn into_option(&self) -> Option<usize> {
        if self.is_none() { None } else { Some(self.0 as usize) }
    }

    /// Returns the label as a `usize` index.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the label is empty.
    #[inline]
    pub fn index(&self) -> usize {
        debug_assert!(
            self.is_some(),
            "called `Label::index` on an empty label"
        );

        self.0 as usize
    }
}

impl Default for Label {
    #[inline]
    fn default() -> Self {
        Self::NONE
    }
}

impl Missing for Label {
    #[inline(always)]
    fn missing() -> Self {
        Self::NONE
    }

    #[inline(always)]
    fn is_missing(&self) -> bool {
        self.is_none()
    }
}

impl From<Option<usize>> for Label {
    #[inline]
    fn from(value: Option<usize>) -> Self {
        Label::from_option(value)
    }
}

impl From<Label> for Option<usize> {
    #[inline]
    fn from(value: Label) -> Self {
        value.into_option()
    }
}

impl std::fmt::Debug for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "Label(None)")
        } else {
            write!(f, "Label({})", self.0)
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_minus_one() {
        assert_eq!(Label::NONE.raw(), -1);
        assert_eq!(Label::default(), Label::NONE);
    }

    #[test]
    fn test_negative_raw_values_are_none() {
        assert!(Label::from_raw(-1).is_none());
        assert!(Label::from_raw(-42).is_none());
        assert!(Label::from_raw(0).is_some());
    }

    #[test]
    fn test_option_round_trip() {
        assert_eq!(Label::from_option(Some(3)).into_option(), Some(3));
        assert_eq!(Label::from_option(None).into_option(), None);
        let opt: Option<usize> = Label::some(11).into();
        assert_eq!(opt, Some(11));
    }

    #[test]
    fn test_ordering_puts_none_first() {
        let mut labels = vec![Label::some(2), Label::NONE, Label::some(0)];
        labels.sort();
        assert_eq!(labels, vec![Label::NONE, Label::some(0), Label::some(2)]);
    }

    #[test]
    fn test_missing_impl() {
        assert!(Label::missing().is_missing());
        assert!(!Label::some(1).is_missing());
    }

    #[test]
    fn test_debug_and_display() {
        assert_eq!(format!("{:?}", Label::some(4)), "Label(4)");
        assert_eq!(format!("{:?}", Label::NONE), "Label(None)");
        assert_eq!(format!("{}", Label::NONE), "-1");
    }
}
