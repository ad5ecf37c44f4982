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

//! Constraint signs.

use crate::error::{ModelError, Result};

/// The relation between the left- and right-hand side of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    LessEqual,
    GreaterEqual,
    Equal,
}

/// Accepted spellings; the first three are canonical.
const SIGN_ALIASES: [(&str, Sign); 6] = [
    ("<=", Sign::LessEqual),
    (">=", Sign::GreaterEqual),
    ("=", Sign::Equal),
    ("<", Sign::LessEqual),
    (">", Sign::GreaterEqual),
    ("==", Sign::Equal),
];

impl Sign {
    /// Returns the canonical token.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Equal => "=",
        }
    }

    #[inline]
    pub const fn is_equality(&self) -> bool {
        matches!(self, Self::Equal)
    }

    /// Parses a canonical token or one of its aliases.
    ///
    /// # Errors
    ///
    /// `InvalidSign` for anything else.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use linmod_model::sign::Sign;
    ///
    /// assert_eq!(Sign::parse("==").unwrap(), Sign::Equal);
    /// assert_eq!(Sign::parse("<").unwrap(), Sign::LessEqual);
    /// assert!(Sign::parse(",").is_err());
    /// ```
    pub fn parse(token: &str) -> Result<Sign> {
        let token = token.trim();
        SIGN_ALIASES
            .iter()
            .find(|(alias, _)| *alias == token)
            .map(|(_, sign)| *sign)
            .ok_or_else(|| ModelError::InvalidSign(token.to_string()))
    }
}

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sign {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Sign::parse(s)
    }
}

/// Conversion into a [`Sign`], fallible for textual input.
pub trait IntoSign {
    fn into_sign(self) -> Result<Sign>;
}

impl IntoSign for Sign {
    #[inline]
    fn into_sign(self) -> Result<Sign> {
        Ok(self)
    }
}

impl IntoSign for &str {
    #[inline]
    fn into_sign(self) -> Result<Sign> {
        Sign::parse(self)
    }
}

impl IntoSign for String {
    #[inline]
    fn into_sign(self) -> Result<Sign> {
        Sign::parse(&self)
    }
}
