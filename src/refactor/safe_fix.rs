//! Applying fix alternatives to files on disk
//!
//! Findings are grouped by file. For each finding one alternative is chosen
//! (the first, or the user's pick in interactive mode); alternatives that
//! conflict with one already chosen for the same file are skipped. All
//! chosen edits of a file are then applied at once against the text the
//! analysis saw.

use super::editor::FileEditor;
use crate::analysis::Finding;
use crate::error::{Error, Result};
use crate::fix::{Edit, Fix};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Select};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Counts of what a fix run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixSummary {
    /// Fix alternatives applied (or that would be, in dry-run mode)
    pub applied: usize,
    /// Findings left alone: no fix, declined, or conflicting
    pub skipped: usize,
    pub files_changed: usize,
}

/// Applies fixes with optional confirmation and dry-run
pub struct SafeFixer {
    interactive: bool,
    dry_run: bool,
}

impl SafeFixer {
    pub fn new(interactive: bool, dry_run: bool) -> Self {
        Self {
            interactive,
            dry_run,
        }
    }

    pub fn fix(&self, findings: &[Finding]) -> Result<FixSummary> {
        let mut by_file: BTreeMap<&Path, Vec<&Finding>> = BTreeMap::new();
        for finding in findings {
            by_file
                .entry(finding.location.file.as_path())
                .or_default()
                .push(finding);
        }

        let mut summary = FixSummary::default();
        for (path, mut findings) in by_file {
            findings.sort_by_key(|f| (f.location.line, f.location.column));
            self.fix_file(path, &findings, &mut summary)?;
        }

        if self.dry_run {
            println!(
                "{}",
                format!("Dry run: {} fixes would be applied", summary.applied).yellow()
            );
        } else {
            println!(
                "{}",
                format!(
                    "Applied {} fixes in {} files ({} skipped)",
                    summary.applied, summary.files_changed, summary.skipped
                )
                .green()
            );
        }
        Ok(summary)
    }

    fn fix_file(&self, path: &Path, findings: &[&Finding], summary: &mut FixSummary) -> Result<()> {
        let editor = FileEditor::open(path)?;

        let chosen = select_fixes(findings, |finding| self.choose(path, finding))?;
        summary.skipped += findings.len() - chosen.len();
        if chosen.is_empty() {
            return Ok(());
        }

        let edits: Vec<Edit> = chosen
            .iter()
            .flat_map(|fix| fix.edits.iter().cloned())
            .collect();

        if self.dry_run {
            for fix in &chosen {
                let line = fix.edits.first().map(|e| editor.line_of(e.start)).unwrap_or(1);
                println!(
                    "  {} {}:{} {}",
                    "Would apply:".yellow(),
                    path.display(),
                    line,
                    fix.description
                );
            }
            // Still prove the edits apply cleanly
            editor.preview(&edits)?;
            summary.applied += chosen.len();
            return Ok(());
        }

        if editor.apply(&edits)? {
            summary.files_changed += 1;
        }
        summary.applied += chosen.len();
        debug!("Applied {} fixes to {}", chosen.len(), path.display());
        Ok(())
    }

    fn choose<'a>(&self, path: &Path, finding: &'a Finding) -> Result<Option<&'a Fix>> {
        if !self.interactive {
            return Ok(finding.fixes.first());
        }

        println!(
            "{}:{} {}",
            path.display(),
            finding.location.line,
            finding.message
        );
        let mut items: Vec<&str> = finding
            .fixes
            .iter()
            .map(|fix| fix.description.as_str())
            .collect();
        items.push("Skip");

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Apply fix?")
            .items(&items)
            .default(0)
            .interact()
            .map_err(Error::Prompt)?;
        Ok(finding.fixes.get(selection))
    }
}

/// Pick at most one alternative per finding, skipping ones that conflict with earlier picks
pub fn select_fixes<'a, F>(findings: &[&'a Finding], mut choose: F) -> Result<Vec<&'a Fix>>
where
    F: FnMut(&'a Finding) -> Result<Option<&'a Fix>>,
{
    let mut chosen: Vec<&'a Fix> = Vec::new();
    for &finding in findings {
        if finding.fixes.is_empty() {
            continue;
        }
        let Some(fix) = choose(finding)? else {
            continue;
        };
        if chosen.iter().any(|other| other.conflicts_with(fix)) {
            warn!(
                "Skipping fix for '{}' at line {}: it overlaps another fix",
                finding.name, finding.location.line
            );
            continue;
        }
        chosen.push(fix);
    }
    Ok(chosen)
}
