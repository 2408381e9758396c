//! Styling shared by the terminal and compact reporters
//!
//! Issue kinds get their own colors so dead assignments and suppressed names
//! stand out from plain unused declarations when scanning a long listing.

use crate::analysis::{Issue, Severity};
use colored::{ColoredString, Colorize};

pub fn file_header(path: &str) -> ColoredString {
    path.cyan().bold()
}

/// `line:column`, right-aligned so messages start in one column
pub fn location(line: usize, column: usize) -> ColoredString {
    format!("{:>5}:{:<3}", line, column).dimmed()
}

pub fn issue_code(issue: Issue) -> ColoredString {
    let code = issue.code();
    match issue {
        Issue::UnusedVariable | Issue::UnusedParameter | Issue::UnusedField => code.magenta(),
        Issue::DeadAssignment => code.yellow(),
        Issue::SuppressedButUsed => code.blue(),
    }
}

pub fn severity_mark(severity: Severity) -> ColoredString {
    let mark = mark(severity);
    match severity {
        Severity::Warning => mark.yellow(),
        Severity::Info => mark.blue(),
    }
}

fn mark(severity: Severity) -> &'static str {
    match severity {
        Severity::Warning => "⚠",
        Severity::Info => "ℹ",
    }
}

/// Variable name inside a message
pub fn name(text: &str) -> ColoredString {
    text.white().bold()
}

pub fn fix(description: &str) -> ColoredString {
    description.green()
}

pub fn count(n: usize) -> ColoredString {
    n.to_string().white().bold()
}

pub fn separator(width: usize) -> ColoredString {
    "━".repeat(width).dimmed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_marks_differ() {
        assert_ne!(mark(Severity::Warning), mark(Severity::Info));
    }

    #[test]
    fn test_styling_keeps_text() {
        assert_eq!(&*issue_code(Issue::DeadAssignment), "UV004");
        assert_eq!(&*location(12, 5), "   12:5  ");
        assert_eq!(&*separator(3), "━━━");
        assert_eq!(&*count(13), "13");
    }
}
