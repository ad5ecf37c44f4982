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

//! Fill values for positions that exist in a grid but carry no data.
//!
//! Alignment of two labeled arrays over an outer join introduces positions
//! that one operand never had. Each element type decides what such a position
//! holds: floating point data uses `NaN`, labels use the `-1` sentinel.

use num_traits::Float;

/// A type with a designated "missing" value.
pub trait Missing: Copy {
    /// Returns the value that marks a missing position.
    fn missing() -> Self;

    /// Returns `true` if `self` marks a missing position.
    fn is_missing(&self) -> bool;
}

macro_rules! impl_missing_for_float {
    ($t:ty) => {
        impl Missing for $t {
            #[inline(always)]
            fn missing() -> Self {
                <$t as Float>::nan()
            }

            #[inline(always)]
            fn is_missing(&self) -> bool {
                self.is_nan()
            }
        }
    };
}

impl_missing_for_float!(f32);
impl_missing_for_float!(f64);

/// Adds two possibly missing values.
///
/// A missing operand is skipped; the result is only missing when both are.
#[inline]
pub fn nan_add<T>(a: T, b: T) -> T
where
    T: Missing + std::ops::Add<Output = T>,
{
    match (a.is_missing(), b.is_missing()) {
        (true, true) => a,
        (true, false) => b,
        (false, true) => a,
        (false, false) => a + b,
    }
}
