//! Compact terminal reporter - minimal output format
//!
//! One line per issue, optimized for scanning large result sets

use crate::analysis::{Finding, Severity};
use crate::report::colors;
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Compact reporter for minimal, scannable output
pub struct CompactReporter {
    /// Base path to strip from file paths for shorter display
    base_path: Option<PathBuf>,
    /// Maximum width for file paths (truncate if longer)
    max_path_width: usize,
}

impl CompactReporter {
    pub fn new() -> Self {
        Self {
            base_path: None,
            max_path_width: 60,
        }
    }

    pub fn with_base_path(mut self, path: PathBuf) -> Self {
        self.base_path = Some(path);
        self
    }

    /// Format a path relative to base path if set
    fn format_path(&self, path: &Path) -> String {
        let display = if let Some(base) = &self.base_path {
            path.strip_prefix(base)
                .unwrap_or(path)
                .display()
                .to_string()
        } else {
            path.display().to_string()
        };

        // Truncate if too long
        let chars: Vec<char> = display.chars().collect();
        if chars.len() > self.max_path_width {
            let tail: String = chars[chars.len() - (self.max_path_width - 3)..].iter().collect();
            format!("...{}", tail)
        } else {
            display
        }
    }

    pub fn report(&self, findings: &[Finding]) {
        if findings.is_empty() {
            println!("{}", "No issues found!".green().bold());
            return;
        }

        // Group by file
        let mut by_file: BTreeMap<&Path, Vec<&Finding>> = BTreeMap::new();
        for item in findings {
            by_file.entry(item.location.file.as_path()).or_default().push(item);
        }

        for (file, mut items) in by_file {
            println!("{}", colors::file_header(&self.format_path(file)));

            items.sort_by_key(|i| (i.location.line, i.location.column));
            for item in items {
                self.print_item(item);
            }
            println!();
        }

        self.print_summary(findings);
    }

    fn print_item(&self, item: &Finding) {
        let location = colors::location(item.location.line, item.location.column);
        let severity_symbol = colors::severity_mark(item.severity);
        let rule_code = colors::issue_code(item.issue);

        let message = item.message.replace(
            &format!("'{}'", item.name),
            &format!("'{}'", colors::name(&item.name)),
        );

        let fixes = match item.fixes.len() {
            0 => String::new(),
            1 => format!(" {}", "[1 fix]".dimmed()),
            n => format!(" {}", format!("[{} fixes]", n).dimmed()),
        };

        println!(
            "  {}  {}  {}  {}{}",
            location,
            severity_symbol,
            rule_code,
            message,
            fixes
        );
    }

    fn print_summary(&self, findings: &[Finding]) {
        let warnings = findings.iter().filter(|d| d.severity == Severity::Warning).count();
        let infos = findings.iter().filter(|d| d.severity == Severity::Info).count();

        println!("{}", colors::separator(50));

        let mut parts = Vec::new();
        if warnings > 0 {
            parts.push(format!("{} {}", warnings, "warnings".yellow()));
        }
        if infos > 0 {
            parts.push(format!("{} {}", infos, "info".blue()));
        }

        println!(
            "  {} {} ({})",
            colors::count(findings.len()),
            "issues".bold(),
            parts.join(", ")
        );
    }
}

impl Default for CompactReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_truncation() {
        let reporter = CompactReporter::new();
        let long_path = Path::new("/very/long/path/that/exceeds/the/maximum/width/setting/for/display/purposes/File.java");
        let formatted = reporter.format_path(long_path);
        assert!(formatted.len() <= 60);
        assert!(formatted.starts_with("..."));
        assert!(formatted.ends_with("File.java"));
    }

    #[test]
    fn test_base_path_stripped() {
        let reporter = CompactReporter::new().with_base_path(PathBuf::from("/project"));
        let formatted = reporter.format_path(Path::new("/project/src/App.java"));
        assert_eq!(formatted, "src/App.java");
    }
}
