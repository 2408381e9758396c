//! Unused declaration analysis
//!
//! The analysis of one compilation unit runs in strictly sequential passes:
//!
//! 1. [`collector`] records every candidate declaration and applies the
//!    exemption rules from [`exemptions`]
//! 2. [`resolver`] classifies every reference as a read or a write and
//!    splits each declaration's lifetime into liveness windows
//! 3. [`windows`] merges the unread windows into one outcome per symbol
//! 4. [`crate::fix`] turns each outcome into alternative source edits
//!
//! [`detectors::UnusedVariableDetector`] drives the passes and produces
//! [`Finding`]s.

pub mod collector;
pub mod detectors;
pub mod exemptions;
pub mod names;
pub mod resolver;
pub mod windows;

pub use collector::{DeclKind, Declaration};
pub use detectors::{Detector, UnusedVariableDetector};
pub use exemptions::AnalysisOptions;

use crate::fix::Fix;
use crate::syntax::Span;
use serde::Serialize;
use std::path::PathBuf;

/// Position of a finding in a source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: PathBuf,
    /// 1-based
    pub line: usize,
    /// 1-based, in bytes
    pub column: usize,
    pub span: Span,
}

impl Location {
    pub fn new(file: PathBuf, line: usize, column: usize, span: Span) -> Self {
        Self {
            file,
            line,
            column,
            span,
        }
    }
}

/// What kind of declaration a finding is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    LocalVariable,
    Parameter,
    Field,
}

impl SymbolKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            SymbolKind::LocalVariable => "local variable",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Field => "field",
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Types of findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Issue {
    /// Local variable is never read
    UnusedVariable,

    /// Parameter is never read
    UnusedParameter,

    /// Private field is never read
    UnusedField,

    /// A value assigned to a variable is overwritten or dropped before it is read
    DeadAssignment,

    /// Variable is named as intentionally unused but is read
    SuppressedButUsed,
}

impl Issue {
    pub fn default_severity(&self) -> Severity {
        match self {
            Issue::UnusedVariable => Severity::Warning,
            Issue::UnusedParameter => Severity::Warning,
            Issue::UnusedField => Severity::Warning,
            Issue::DeadAssignment => Severity::Warning,
            Issue::SuppressedButUsed => Severity::Info,
        }
    }

    /// Primary finding kind for a declaration that is never read at all
    pub fn unused(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::LocalVariable => Issue::UnusedVariable,
            SymbolKind::Parameter => Issue::UnusedParameter,
            SymbolKind::Field => Issue::UnusedField,
        }
    }

    pub fn default_message(&self, kind: SymbolKind, name: &str) -> String {
        match self {
            Issue::UnusedVariable | Issue::UnusedParameter | Issue::UnusedField => {
                format!("The {} '{}' is never read.", kind, name)
            }
            Issue::DeadAssignment => {
                format!("The assignment to this {} '{}' is never read.", kind, name)
            }
            Issue::SuppressedButUsed => format!(
                "The {} '{}' is read but has unused-variable checking suppressed because of its name.",
                kind, name
            ),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Issue::UnusedVariable => "UV001",
            Issue::UnusedParameter => "UV002",
            Issue::UnusedField => "UV003",
            Issue::DeadAssignment => "UV004",
            Issue::SuppressedButUsed => "UV005",
        }
    }
}

/// Severity levels for findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One reported declaration with its candidate fixes
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub location: Location,

    pub issue: Issue,

    pub severity: Severity,

    pub symbol_kind: SymbolKind,

    /// Declared name of the symbol
    pub name: String,

    pub message: String,

    /// Mutually exclusive alternatives, preferred first
    pub fixes: Vec<Fix>,
}

impl Finding {
    pub fn new(issue: Issue, symbol_kind: SymbolKind, name: impl Into<String>, location: Location) -> Self {
        let name = name.into();
        Self {
            severity: issue.default_severity(),
            message: issue.default_message(symbol_kind, &name),
            location,
            issue,
            symbol_kind,
            name,
            fixes: Vec::new(),
        }
    }

    pub fn with_fixes(mut self, fixes: Vec<Fix>) -> Self {
        self.fixes = fixes;
        self
    }

    pub fn with_file(mut self, file: PathBuf) -> Self {
        self.location.file = file;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}
