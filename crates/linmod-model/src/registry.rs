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

//! # Label Registry
//!
//! Hands out labels for variables and constraints. Each kind draws from its
//! own counter starting at 0; every allocation is one contiguous block that
//! is owned by exactly one named entity and never handed out again.
//!
//! Because blocks are allocated in increasing order, the owner of any label
//! can be recovered with a binary search over block starts. The registry is
//! plain per-model state: it is created with a `Model` and dropped with it.

use crate::error::{ModelError, Result};
use std::ops::Range;

/// The two label spaces of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Variable,
    Constraint,
}

impl std::fmt::Display for LabelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Variable => write!(f, "variable"),
            Self::Constraint => write!(f, "constraint"),
        }
    }
}

/// A reverse-lookup key.
///
/// Lookups are defined on integer labels only. The `Name` variant exists so
/// that callers forwarding untyped input get a proper error instead of a
/// silent miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelQuery<'a> {
    Label(i64),
    Name(&'a str),
}

impl From<i64> for LabelQuery<'_> {
    fn from(value: i64) -> Self {
        Self::Label(value)
    }
}

impl From<i32> for LabelQuery<'_> {
    fn from(value: i32) -> Self {
        Self::Label(value as i64)
    }
}

impl From<usize> for LabelQuery<'_> {
    fn from(value: usize) -> Self {
        Self::Label(value as i64)
    }
}

impl From<linmod_core::label::Label> for LabelQuery<'_> {
    fn from(value: linmod_core::label::Label) -> Self {
        Self::Label(value.raw())
    }
}

impl<'a> From<&'a str> for LabelQuery<'a> {
    fn from(value: &'a str) -> Self {
        Self::Name(value)
    }
}

/// A contiguous run of labels owned by one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelBlock {
    name: String,
    range: Range<i64>,
}

impl LabelBlock {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn range(&self) -> Range<i64> {
        self.range.clone()
    }
}

/// Resolves `label` in a space of `extent` allocated labels.
///
/// `owner` receives a label inside the extent and returns the block with the
/// greatest start not above it. Negative labels, labels at or beyond `extent`
/// and labels in a gap after that block (entities outside the searched
/// collection) are reported as not found.
pub(crate) fn resolve_label<'a, F>(
    kind: LabelKind,
    extent: i64,
    query: LabelQuery<'_>,
    owner: F,
) -> Result<(&'a str, usize)>
where
    F: FnOnce(i64) -> Option<(&'a str, Range<i64>)>,
{
    let label = match query {
        LabelQuery::Label(label) => label,
        LabelQuery::Name(name) => return Err(ModelError::AmbiguousLabel(name.to_string())),
    };

    let not_found = || ModelError::LabelNotFound { kind, label };
    if label < 0 || label >= extent {
        return Err(not_found());
    }

    match owner(label) {
        Some((name, range)) if range.contains(&label) => Ok((name, (label - range.start) as usize)),
        _ => Err(not_found()),
    }
}

/// Per-model label counters with reverse lookup.
#[derive(Debug, Clone, Default)]
pub struct LabelRegistry {
    variables: Vec<LabelBlock>,
    constraints: Vec<LabelBlock>,
}

impl LabelRegistry {
    /// Creates an empty registry; both counters start at 0.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn blocks_mut(&mut self, kind: LabelKind) -> &mut Vec<LabelBlock> {
        match kind {
            LabelKind::Variable => &mut self.variables,
            LabelKind::Constraint => &mut self.constraints,
        }
    }

    /// Returns the blocks of `kind` in allocation order.
    #[inline]
    pub fn blocks(&self, kind: LabelKind) -> &[LabelBlock] {
        match kind {
            LabelKind::Variable => &self.variables,
            LabelKind::Constraint => &self.constraints,
        }
    }

    /// Returns the number of labels of `kind` ever allocated.
    #[inline]
    pub fn allocated(&self, kind: LabelKind) -> usize {
        self.blocks(kind).last().map_or(0, |b| b.range.end as usize)
    }

    /// Returns `true` if `name` already owns a block of `kind`.
    pub fn contains(&self, kind: LabelKind, name: &str) -> bool {
        self.blocks(kind).iter().any(|b| b.name == name)
    }

    /// Allocates `count` consecutive labels of `kind` for the entity `name`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` if `name` already owns labels of this kind.
    pub fn allocate(&mut self, kind: LabelKind, name: &str, count: usize) -> Result<Range<i64>> {
        if self.contains(kind, name) {
            return Err(ModelError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }

        let start = self.allocated(kind) as i64;
        let range = start..start + count as i64;
        self.blocks_mut(kind).push(LabelBlock {
            name: name.to_string(),
            range: range.clone(),
        });

        tracing::trace!(
            component = "registry",
            operation = "allocate",
            kind = %kind,
            entity = name,
            start = range.start,
            end = range.end,
            "Allocated label block"
        );
        Ok(range)
    }

    /// Returns the owner of `query` and the label's offset inside the owner's block.
    ///
    /// # Errors
    ///
    /// - `LabelNotFound` if the label is negative or was never allocated.
    /// - `AmbiguousLabel` if a name is passed instead of an integer label.
    pub fn lookup_name<'q>(
        &self,
        kind: LabelKind,
        query: impl Into<LabelQuery<'q>>,
    ) -> Result<(&str, usize)> {
        let blocks = self.blocks(kind);
        resolve_label(kind, self.allocated(kind) as i64, query.into(), |label| {
            let idx = blocks.partition_point(|b| b.range.start <= label);
            let block = &blocks[idx.checked_sub(1)?];
            Some((block.name(), block.range()))
        })
    }
}
