use crate::error::Result;
use crate::syntax::{CompilationUnit, SourceText};

/// Front end that turns source text into a resolved syntax tree
pub trait Parser {
    /// Parse and resolve one compilation unit
    fn parse(&self, source: &SourceText) -> Result<CompilationUnit>;
}
