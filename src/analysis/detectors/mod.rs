// Detectors run over one parsed compilation unit at a time

mod unused_variable;

pub use unused_variable::UnusedVariableDetector;

use crate::analysis::Finding;
use crate::syntax::{CompilationUnit, SourceText};

/// Trait for per-unit detectors
pub trait Detector {
    /// Run the detector on one unit and return found issues, sorted by position
    ///
    /// Finding locations carry an empty file path; the caller fills it in.
    fn detect(&self, unit: &CompilationUnit, source: &SourceText) -> Vec<Finding>;
}
