mod colors;
mod compact;
mod json;
mod terminal;

pub use compact::CompactReporter;
pub use json::JsonReporter;
pub use terminal::TerminalReporter;

use crate::analysis::Finding;
use crate::error::Result;
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Default)]
pub enum ReportFormat {
    /// Default terminal output, grouped by file with fix alternatives
    #[default]
    Terminal,
    /// Compact one-line-per-issue format
    Compact,
    /// JSON machine-readable format
    Json,
}

/// Options for report generation
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Output file path (for JSON)
    pub output_path: Option<PathBuf>,
    /// Base path to strip from file paths for shorter display
    pub base_path: Option<PathBuf>,
}

/// Reporter for outputting analysis results
pub struct Reporter {
    format: ReportFormat,
    options: ReportOptions,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self {
            format,
            options: ReportOptions {
                output_path,
                ..Default::default()
            },
        }
    }

    pub fn with_options(format: ReportFormat, options: ReportOptions) -> Self {
        Self { format, options }
    }

    /// Report the findings
    pub fn report(&self, findings: &[Finding]) -> Result<()> {
        match &self.format {
            ReportFormat::Terminal => {
                TerminalReporter::new().report(findings);
                Ok(())
            }
            ReportFormat::Compact => {
                let mut reporter = CompactReporter::new();
                if let Some(base) = &self.options.base_path {
                    reporter = reporter.with_base_path(base.clone());
                }
                reporter.report(findings);
                Ok(())
            }
            ReportFormat::Json => JsonReporter::new(self.options.output_path.clone()).report(findings),
        }
    }
}
