//! Terminal reporter with colored output

use crate::analysis::Finding;
use crate::report::colors;
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Terminal reporter with colored output
pub struct TerminalReporter {
    /// List fix alternatives under each finding
    show_fixes: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self { show_fixes: true }
    }

    pub fn with_fixes(mut self, show: bool) -> Self {
        self.show_fixes = show;
        self
    }

    pub fn report(&self, findings: &[Finding]) {
        if findings.is_empty() {
            println!("{}", "No unused variables found!".green().bold());
            return;
        }

        // Group by file
        let mut by_file: BTreeMap<PathBuf, Vec<&Finding>> = BTreeMap::new();
        for item in findings {
            by_file
                .entry(item.location.file.clone())
                .or_default()
                .push(item);
        }

        println!();
        println!(
            "Found {} issues:",
            colors::count(findings.len())
        );
        println!();

        for (file, mut items) in by_file {
            println!("{}", colors::file_header(&file.display().to_string()));

            items.sort_by_key(|i| (i.location.line, i.location.column));
            for item in items {
                self.print_item(item);
            }

            println!();
        }
    }

    fn print_item(&self, item: &Finding) {
        let severity_symbol = colors::severity_mark(item.severity);
        let location = colors::location(item.location.line, item.location.column);
        let issue_code = colors::issue_code(item.issue);

        println!(
            "  {} {} [{}] {}",
            location,
            severity_symbol,
            issue_code,
            item.message
        );

        println!(
            "    {} {} '{}'",
            "→".dimmed(),
            item.symbol_kind.display_name().dimmed(),
            colors::name(&item.name)
        );

        if !self.show_fixes {
            return;
        }
        for (index, fix) in item.fixes.iter().enumerate() {
            println!(
                "    {} {}",
                format!("fix {}:", index + 1).dimmed(),
                colors::fix(&fix.description)
            );
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
