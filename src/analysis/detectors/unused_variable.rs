//! Unused Variable Detector
//!
//! Detects local variables, parameters and private fields whose value is
//! never read, and assignments whose value is overwritten before any read.
//!
//! ## Detection Algorithm
//!
//! 1. Collect candidate declarations, dropping exempted ones
//!    (a `native` method anywhere skips the whole unit)
//! 2. Resolve every reference into reads and writes, splitting each
//!    declaration's lifetime at unconditional reassignments
//! 3. Report declarations with an unread window, and intentionally unused
//!    names that are read anyway
//! 4. Attach fix alternatives to each finding
//!
//! ## Examples Detected
//!
//! ```java
//! class Example {
//!     private int hits;               // UNUSED: never read
//!
//!     int run(int unusedArg) {        // UNUSED: never read
//!         int result = compute();     // DEAD: overwritten below
//!         result = 42;
//!         return result;
//!     }
//! }
//! ```
//!
//! ## Not Detected
//!
//! ```java
//! class Example {
//!     @Inject Service service;        // set by the injector
//!     private static final long serialVersionUID = 1L;
//!
//!     @Override
//!     public void onEvent(Event e) {} // signature fixed by the supertype
//! }
//! ```

use super::Detector;
use crate::analysis::collector::collect;
use crate::analysis::resolver::resolve;
use crate::analysis::windows;
use crate::analysis::{AnalysisOptions, Finding, Location};
use crate::fix::{self, FixContext};
use crate::syntax::{CompilationUnit, SourceText};
use std::path::PathBuf;
use tracing::debug;

/// Detector for unused variables, parameters and private fields
pub struct UnusedVariableDetector {
    options: AnalysisOptions,
}

impl UnusedVariableDetector {
    pub fn new() -> Self {
        Self {
            options: AnalysisOptions::default(),
        }
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }
}

impl Default for UnusedVariableDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for UnusedVariableDetector {
    fn detect(&self, unit: &CompilationUnit, source: &SourceText) -> Vec<Finding> {
        let Some(collection) = collect(unit, &self.options) else {
            debug!("Skipping unit with a native method");
            return Vec::new();
        };
        let usages = resolve(unit, &collection);
        debug!("Tracking {} declarations", collection.len());

        let cx = FixContext {
            source,
            collection: &collection,
            options: &self.options,
        };

        let mut findings: Vec<Finding> = windows::synthesize(&collection, &usages, &self.options)
            .iter()
            .map(|outcome| {
                let declaration = outcome.declaration();
                let anchor = outcome.anchor();
                let (line, column) = source.line_col(anchor.start);
                Finding::new(
                    outcome.issue(),
                    declaration.kind.symbol_kind(),
                    declaration.name(),
                    Location::new(PathBuf::new(), line, column, anchor),
                )
                .with_fixes(fix::synthesize(outcome, &cx))
            })
            .collect();

        // Sort by position
        findings.sort_by_key(|f| (f.location.line, f.location.column));
        findings
    }
}
