//! Fix model
//!
//! A [`Fix`] is one named alternative: a list of textual [`Edit`]s against
//! the original source of a compilation unit. Edits of one fix never
//! overlap once [`Fix::normalized`] has accepted them, so they can be
//! applied in any order from the back of the text to the front.

pub mod naming;
pub mod synth;

pub use synth::{synthesize, FixContext};

use crate::error::{Error, Result};
use crate::syntax::Span;
use serde::Serialize;

/// Replace `start..end` of the original text with `replacement`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl Edit {
    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            start: span.start,
            end: span.end,
            replacement: replacement.into(),
        }
    }

    pub fn delete(span: Span) -> Self {
        Self::replace(span, "")
    }

    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::replace(Span::new(offset, offset), text)
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    fn is_insert(&self) -> bool {
        self.start == self.end
    }

    fn is_deletion(&self) -> bool {
        self.replacement.is_empty() && !self.is_insert()
    }

    /// Whether both edits cannot be applied to the same text
    pub fn conflicts_with(&self, other: &Edit) -> bool {
        match (self.is_insert(), other.is_insert()) {
            (true, true) => self.start == other.start && self.replacement != other.replacement,
            (true, false) => other.start < self.start && self.start < other.end,
            (false, true) => self.start < other.start && other.start < self.end,
            (false, false) => self.start < other.end && other.start < self.end,
        }
    }
}

/// A named alternative set of edits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fix {
    pub description: String,
    pub edits: Vec<Edit>,
}

impl Fix {
    pub fn new(description: impl Into<String>, edits: Vec<Edit>) -> Self {
        Self {
            description: description.into(),
            edits,
        }
    }

    /// Sort and de-duplicate the edits, rejecting any that cannot be applied together
    ///
    /// Overlapping pure deletions are merged into one deletion covering
    /// both ranges, so removing two neighbouring statements whose widened
    /// spans touch is still valid.
    pub fn normalized(mut self, source_len: usize) -> Result<Self> {
        for edit in &self.edits {
            if edit.start > edit.end || edit.end > source_len {
                return Err(Error::EditOutOfBounds {
                    start: edit.start,
                    end: edit.end,
                });
            }
        }

        self.edits.sort();
        self.edits.dedup();

        let mut merged: Vec<Edit> = Vec::with_capacity(self.edits.len());
        for edit in self.edits {
            if let Some(last) = merged.last_mut() {
                if last.is_deletion() && edit.is_deletion() && edit.start < last.end {
                    last.end = last.end.max(edit.end);
                    continue;
                }
            }
            if let Some(conflict) = merged.iter().find(|other| other.conflicts_with(&edit)) {
                return Err(Error::OverlappingEdits {
                    offset: conflict.start.max(edit.start),
                });
            }
            merged.push(edit);
        }

        self.edits = merged;
        Ok(self)
    }

    /// Whether any edit of `self` conflicts with any edit of `other`
    pub fn conflicts_with(&self, other: &Fix) -> bool {
        self.edits
            .iter()
            .any(|a| other.edits.iter().any(|b| a.conflicts_with(b)))
    }

    /// Apply to the text the edits were computed against
    pub fn apply(&self, source: &str) -> Result<String> {
        apply_edits(source, &self.edits)
    }
}

/// Apply non-conflicting edits to `source`
pub fn apply_edits(source: &str, edits: &[Edit]) -> Result<String> {
    let mut ordered: Vec<&Edit> = edits.iter().collect();
    ordered.sort_by(|a, b| (b.start, b.end).cmp(&(a.start, a.end)));

    let mut text = source.to_string();
    let mut limit = usize::MAX;
    for edit in ordered {
        if edit.start > edit.end
            || edit.end > source.len()
            || !source.is_char_boundary(edit.start)
            || !source.is_char_boundary(edit.end)
        {
            return Err(Error::EditOutOfBounds {
                start: edit.start,
                end: edit.end,
            });
        }
        if edit.end > limit {
            return Err(Error::OverlappingEdits { offset: edit.start });
        }
        text.replace_range(edit.start..edit.end, &edit.replacement);
        limit = edit.start;
    }
    Ok(text)
}
