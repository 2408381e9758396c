//! Unused-span synthesis
//!
//! Merges the liveness windows the resolver produced into at most one
//! [`Outcome`] per declaration.
//!
//! ## Rules
//!
//! - A declaration exempted by name never gets the primary finding. If it
//!   has any usage besides its declaration it is reported as
//!   [`Outcome::SuppressedButUsed`] instead.
//! - Otherwise every window without a read is unused; a declaration with
//!   at least one unused window gets [`Outcome::Unused`].
//! - With `check_non_private_parameters` off, the declaration window of a
//!   parameter of a non-private method is ignored, so only dead
//!   reassignments of such parameters are reported.

use super::collector::{Collection, DeclKind, DeclSite, Declaration};
use super::resolver::{SymbolUsage, Usages, WindowStart};
use super::{AnalysisOptions, Issue};
use crate::syntax::{Modifier, Span};

/// What to report about one declaration
#[derive(Debug, Clone)]
pub enum Outcome<'a, 'ast> {
    Unused {
        declaration: &'a Declaration<'ast>,
        usage: &'a SymbolUsage<'ast>,
        /// Indices of the unread windows, in source order
        windows: Vec<usize>,
    },
    SuppressedButUsed {
        declaration: &'a Declaration<'ast>,
        usage: &'a SymbolUsage<'ast>,
    },
}

impl<'a, 'ast> Outcome<'a, 'ast> {
    pub fn declaration(&self) -> &'a Declaration<'ast> {
        match self {
            Outcome::Unused { declaration, .. } | Outcome::SuppressedButUsed { declaration, .. } => {
                declaration
            }
        }
    }

    pub fn issue(&self) -> Issue {
        match self {
            Outcome::Unused {
                declaration, usage, ..
            } => {
                if usage.is_ever_read() {
                    Issue::DeadAssignment
                } else {
                    Issue::unused(declaration.kind.symbol_kind())
                }
            }
            Outcome::SuppressedButUsed { .. } => Issue::SuppressedButUsed,
        }
    }

    /// Where the finding is reported
    pub fn anchor(&self) -> Span {
        match self {
            Outcome::Unused {
                declaration,
                usage,
                windows,
            } => windows
                .first()
                .and_then(|&index| usage.windows.get(index))
                .and_then(|window| match window.start {
                    WindowStart::Declaration => None,
                    WindowStart::Reassignment(site) => Some(site.target),
                })
                .unwrap_or(declaration.ident.span),
            Outcome::SuppressedButUsed { declaration, .. } => declaration.ident.span,
        }
    }
}

/// One outcome per reportable declaration, in declaration order
pub fn synthesize<'a, 'ast>(
    collection: &'a Collection<'ast>,
    usages: &'a Usages<'ast>,
    options: &AnalysisOptions,
) -> Vec<Outcome<'a, 'ast>> {
    collection
        .declarations
        .iter()
        .filter_map(|declaration| {
            let usage = usages.get(declaration.symbol)?;
            outcome(declaration, usage, options)
        })
        .collect()
}

fn outcome<'a, 'ast>(
    declaration: &'a Declaration<'ast>,
    usage: &'a SymbolUsage<'ast>,
    options: &AnalysisOptions,
) -> Option<Outcome<'a, 'ast>> {
    if declaration.exempt_by_name {
        return (usage.usage_count() > 1)
            .then_some(Outcome::SuppressedButUsed { declaration, usage });
    }

    let mut windows = usage.unused_windows();
    if !options.check_non_private_parameters && is_non_private_parameter(declaration) {
        windows.retain(|&index| index != 0);
    }
    if windows.is_empty() {
        return None;
    }
    Some(Outcome::Unused {
        declaration,
        usage,
        windows,
    })
}

fn is_non_private_parameter(declaration: &Declaration<'_>) -> bool {
    match declaration.site {
        DeclSite::Parameter { method, .. } => {
            declaration.kind == DeclKind::Parameter && !method.modifiers.has(Modifier::Private)
        }
        _ => false,
    }
}
