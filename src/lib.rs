//! SearchUnused - Fast unused variable detection for Java
//!
//! This library finds local variables, parameters and private fields whose
//! values are never read, along with dead assignments, and proposes
//! alternative source edits that remove them.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **File Discovery** - Find all .java files
//! 2. **Parsing** - Parse source files using tree-sitter and resolve names
//! 3. **Collection** - Record candidate declarations and exemptions
//! 4. **Resolution** - Classify every reference as a read or a write
//! 5. **Synthesis** - Merge unread liveness windows into findings with fixes
//! 6. **Reporting** - Output results in various formats, or apply fixes
//!
//! ```no_run
//! use searchunused::{analyze_source, AnalysisOptions};
//!
//! let findings = analyze_source("class A { void f() { int x = 1; } }", &AnalysisOptions::default())?;
//! assert_eq!(findings.len(), 1);
//! # Ok::<(), searchunused::Error>(())
//! ```

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod error;
pub mod fix;
pub mod parser;
pub mod refactor;
pub mod report;
pub mod syntax;

pub use analysis::{
    AnalysisOptions, Detector, Finding, Issue, Location, Severity, SymbolKind,
    UnusedVariableDetector,
};
pub use config::Config;
pub use discovery::FileFinder;
pub use error::{Error, Result};
pub use fix::{Edit, Fix};
pub use parser::{JavaParser, Parser};
pub use refactor::SafeFixer;
pub use report::{ReportFormat, Reporter};
pub use syntax::SourceText;

use std::path::Path;

/// Analyse one compilation unit given as text
pub fn analyze_source(source: &str, options: &AnalysisOptions) -> Result<Vec<Finding>> {
    let text = SourceText::new(source);
    let unit = JavaParser::new().parse(&text)?;
    let detector = UnusedVariableDetector::new().with_options(options.clone());
    Ok(detector.detect(&unit, &text))
}

/// Analyse one Java file, filling in the file of every finding
pub fn analyze_file(path: &Path, options: &AnalysisOptions) -> Result<Vec<Finding>> {
    let source = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let findings = analyze_source(&source, options)?;
    Ok(findings
        .into_iter()
        .map(|f| f.with_file(path.to_path_buf()))
        .collect())
}
