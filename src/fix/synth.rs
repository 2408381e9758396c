//! Fix Synthesizer
//!
//! Turns an [`Outcome`] into ordered alternative [`Fix`]es.
//!
//! ## Alternatives
//!
//! Every outcome is planned twice in lock step. The *keep* plan preserves
//! the side effects of anything it removes by leaving the side-effecting
//! expression behind as a statement; the *strip* plan removes it. When no
//! removed expression had side effects both plans are identical and only
//! one fix is produced. A plan that hits an edit it cannot express is
//! abandoned; the other one may still be offered.
//!
//! ## Declarations
//!
//! | Kind | When the declaration value is never read |
//! |------|------------------------------------------|
//! | local | statement or declarator removed |
//! | for-init | no fix |
//! | enhanced-for, lambda parameter | renamed as intentionally unused |
//! | parameter | removed with its call-site arguments, or renamed |
//! | field | declaration removed, or turned into an initializer block |
//!
//! Writes inside unread windows are removed. If the declaration goes away
//! while a later window is still read, that window's reassignment becomes
//! the new declaration.

use super::naming;
use super::{Edit, Fix};
use crate::analysis::collector::{CallSite, Collection, DeclKind, DeclSite, Declaration};
use crate::analysis::resolver::{SymbolUsage, WindowStart, WriteSite};
use crate::analysis::windows::Outcome;
use crate::analysis::AnalysisOptions;
use crate::syntax::visit::{self, Visitor};
use crate::syntax::*;
use tracing::debug;

/// What the synthesizer needs besides the outcome itself
pub struct FixContext<'a, 'ast> {
    pub source: &'a SourceText,
    pub collection: &'a Collection<'ast>,
    pub options: &'a AnalysisOptions,
}

/// Alternative fixes for one outcome, preferred first
pub fn synthesize<'ast>(outcome: &Outcome<'_, 'ast>, cx: &FixContext<'_, 'ast>) -> Vec<Fix> {
    let fixes = match outcome {
        Outcome::Unused {
            declaration,
            usage,
            windows,
        } => Planner::new(cx).unused(declaration, usage, windows),
        Outcome::SuppressedButUsed { declaration, usage } => {
            rename_used(declaration, usage, cx).into_iter().collect()
        }
    };

    fixes
        .into_iter()
        .filter_map(|fix| match fix.normalized(cx.source.len()) {
            Ok(fix) => Some(fix),
            Err(e) => {
                debug!("Dropping fix alternative: {}", e);
                None
            }
        })
        .collect()
}

/// Whether evaluating `expr` can be observed
pub fn has_side_effects(expr: &Expr) -> bool {
    let mut finder = SideEffects { found: false };
    finder.visit_expr(expr);
    finder.found
}

struct SideEffects {
    found: bool,
}

impl<'ast> Visitor<'ast> for SideEffects {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        if self.found {
            return;
        }
        match &expr.kind {
            ExprKind::Call { .. }
            | ExprKind::New { .. }
            | ExprKind::ConstructorCall { .. }
            | ExprKind::Assign { .. }
            | ExprKind::CompoundAssign { .. } => self.found = true,
            ExprKind::Unary { op, .. } if op.is_increment() => self.found = true,
            _ => visit::walk_expr(self, expr),
        }
    }

    // Creating a lambda runs none of its body
    fn visit_lambda(&mut self, _lambda: &'ast Lambda) {}
}

/// Rename a declaration and every reference to the unmarked name
///
/// Nothing is offered when a reference was only matched by field name, or
/// when the new name is already in use where the declaration is visible.
fn rename_used(
    declaration: &Declaration<'_>,
    usage: &SymbolUsage<'_>,
    cx: &FixContext<'_, '_>,
) -> Option<Fix> {
    let name = declaration.name();
    let new_name = naming::unmark(name, &cx.options.unused_name_prefix);
    if new_name == name {
        return None;
    }
    if usage.sites.iter().any(|site| !site.resolved) {
        debug!("Not renaming '{}': some references are not resolved", name);
        return None;
    }
    if is_name_taken(&new_name, declaration, cx) {
        debug!("Not renaming '{}': '{}' is already in use", name, new_name);
        return None;
    }
    let edits = std::iter::once(declaration.ident.span)
        .chain(usage.sites.iter().map(|site| site.span))
        .map(|span| Edit::replace(span, new_name.as_str()))
        .collect();
    Some(Fix::new(format!("Rename '{}' to '{}'", name, new_name), edits))
}

fn is_name_taken(new_name: &str, declaration: &Declaration<'_>, cx: &FixContext<'_, '_>) -> bool {
    cx.collection.names.is_taken(
        new_name,
        declaration.ident.span,
        declaration.kind == DeclKind::Field,
    )
}

/// One fix alternative under construction
#[derive(Debug, Default)]
struct Alternative {
    edits: Vec<Edit>,
    abandoned: bool,
}

impl Alternative {
    fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    fn abandon(&mut self) {
        self.abandoned = true;
    }
}

/// What happens to the declaration itself
#[derive(Debug, Clone, PartialEq, Eq)]
enum DeclarationChange {
    Kept,
    Removed,
    Renamed(String),
}

struct Planner<'c, 'a, 'ast> {
    cx: &'c FixContext<'a, 'ast>,
    keep: Alternative,
    strip: Alternative,
    /// The plans diverged because something removed had side effects
    side_effects: bool,
}

impl<'c, 'a, 'ast> Planner<'c, 'a, 'ast> {
    fn new(cx: &'c FixContext<'a, 'ast>) -> Self {
        Self {
            cx,
            keep: Alternative::default(),
            strip: Alternative::default(),
            side_effects: false,
        }
    }

    fn both(&mut self, edit: Edit) {
        self.keep.push(edit.clone());
        self.strip.push(edit);
    }

    fn abandon_both(&mut self) {
        self.keep.abandon();
        self.strip.abandon();
    }

    fn text(&mut self, span: Span) -> Option<String> {
        let text = self.cx.source.slice(span).map(str::to_string);
        if text.is_none() {
            self.abandon_both();
        }
        text
    }

    /// Remove a whole statement, leaving `{}` where a body is required
    fn remove_statement(&mut self, stmt: &Stmt, needs_block: bool) {
        let edit = if needs_block {
            Edit::replace(stmt.span, "{}")
        } else {
            Edit::delete(self.cx.source.removal_span(stmt.span))
        };
        self.both(edit);
    }

    /// Replace `stmt` by `expr;` in the keep plan and remove it in the strip plan
    fn keep_as_statement(&mut self, stmt: &Stmt, expr: &Expr, needs_block: bool) {
        self.side_effects = true;
        let expr = expr.unparenthesized();
        if expr.is_statement_expression() {
            match self.cx.source.slice(expr.span) {
                Some(text) => self.keep.push(Edit::replace(stmt.span, format!("{};", text))),
                None => self.keep.abandon(),
            }
        } else {
            self.keep.abandon();
        }
        let edit = if needs_block {
            Edit::replace(stmt.span, "{}")
        } else {
            Edit::delete(self.cx.source.removal_span(stmt.span))
        };
        self.strip.push(edit);
    }

    fn unused(
        mut self,
        declaration: &Declaration<'ast>,
        usage: &SymbolUsage<'ast>,
        windows: &[usize],
    ) -> Vec<Fix> {
        let name = declaration.name();
        let declaration_unread = windows.contains(&0);

        let change = if declaration_unread {
            self.declaration(declaration)
        } else {
            DeclarationChange::Kept
        };
        if self.keep.abandoned && self.strip.abandoned {
            return Vec::new();
        }

        for &index in windows {
            let Some(window) = usage.windows.get(index) else {
                continue;
            };
            for write in &window.writes {
                self.dead_write(write);
            }
        }

        if change != DeclarationChange::Kept {
            self.redeclare(declaration, usage, windows);
        }

        let description = match &change {
            DeclarationChange::Removed => format!(
                "Remove unused {} '{}'",
                declaration.kind.symbol_kind(),
                name
            ),
            DeclarationChange::Renamed(new_name) => format!("Rename '{}' to '{}'", name, new_name),
            DeclarationChange::Kept => format!("Remove dead assignment to '{}'", name),
        };

        let mut fixes = Vec::new();
        if self.side_effects {
            if !self.keep.abandoned {
                fixes.push(Fix::new(
                    format!("{} (keeping side effects)", description),
                    self.keep.edits,
                ));
            }
            if !self.strip.abandoned {
                fixes.push(Fix::new(
                    format!("{} (also removes side effects)", description),
                    self.strip.edits,
                ));
            }
        } else if !self.keep.abandoned && !self.keep.edits.is_empty() {
            fixes.push(Fix::new(description, self.keep.edits));
        }
        fixes
    }

    /// Plan the change to a declaration whose initial value is never read
    fn declaration(&mut self, declaration: &Declaration<'ast>) -> DeclarationChange {
        match declaration.site {
            DeclSite::Local { stmt, var, index } => {
                self.remove_local(stmt, var, index);
                DeclarationChange::Removed
            }
            DeclSite::ForInit => {
                self.abandon_both();
                DeclarationChange::Kept
            }
            DeclSite::ForEach | DeclSite::LambdaParameter => self.rename(declaration),
            DeclSite::Parameter { method, index, owner } => {
                if self.cx.collection.is_changeable_everywhere(method, owner) {
                    self.remove_parameter(method, index);
                    DeclarationChange::Removed
                } else {
                    self.rename(declaration)
                }
            }
            DeclSite::Field {
                field,
                index,
                injected,
            } => {
                if injected {
                    self.abandon_both();
                    return DeclarationChange::Kept;
                }
                self.remove_field(field, index);
                DeclarationChange::Removed
            }
        }
    }

    fn rename(&mut self, declaration: &Declaration<'ast>) -> DeclarationChange {
        let new_name = naming::mark(declaration.name(), &self.cx.options.unused_name_prefix);
        if new_name == declaration.name() || is_name_taken(&new_name, declaration, self.cx) {
            debug!("Not renaming '{}' to '{}'", declaration.name(), new_name);
            self.abandon_both();
            return DeclarationChange::Kept;
        }
        self.both(Edit::replace(declaration.ident.span, new_name.as_str()));
        DeclarationChange::Renamed(new_name)
    }

    fn remove_local(&mut self, stmt: &Stmt, var: &LocalVar, index: usize) {
        let Some(declarator) = var.declarators.get(index) else {
            return self.abandon_both();
        };
        let init = declarator.init.as_ref().filter(|init| has_side_effects(init));

        if var.declarators.len() == 1 {
            match init {
                Some(init) => self.keep_as_statement(stmt, init, false),
                None => self.remove_statement(stmt, false),
            }
            return;
        }

        let span = list_item_removal(&var.declarators, index, |d| d.span);
        if init.is_some() {
            self.side_effects = true;
            self.keep.abandon();
            self.strip.push(Edit::delete(span));
        } else {
            self.both(Edit::delete(span));
        }
    }

    fn remove_field(&mut self, field: &FieldDecl, index: usize) {
        let Some(declarator) = field.declarators.get(index) else {
            return self.abandon_both();
        };
        let init = declarator.init.as_ref().filter(|init| has_side_effects(init));

        if field.declarators.len() > 1 {
            let span = list_item_removal(&field.declarators, index, |d| d.span);
            if init.is_some() {
                self.side_effects = true;
                self.keep.abandon();
                self.strip.push(Edit::delete(span));
            } else {
                self.both(Edit::delete(span));
            }
            return;
        }

        let removal = Edit::delete(self.cx.source.removal_span(field.span));
        let Some(init) = init else {
            return self.both(removal);
        };

        self.side_effects = true;
        self.strip.push(removal);
        let init = init.unparenthesized();
        if !init.is_statement_expression() {
            return self.keep.abandon();
        }
        match self.cx.source.slice(init.span) {
            Some(text) => {
                let block = if field.modifiers.has(Modifier::Static) {
                    format!("static {{ {}; }}", text)
                } else {
                    format!("{{ {}; }}", text)
                };
                self.keep.push(Edit::replace(field.span, block));
            }
            None => self.keep.abandon(),
        }
    }

    /// Drop the parameter from the signature and every call site
    fn remove_parameter(&mut self, method: &MethodDecl, index: usize) {
        let Some(param) = method.params.get(index) else {
            return self.abandon_both();
        };
        self.both(Edit::delete(list_item_removal(&method.params, index, |p| p.span)));

        let cx = self.cx;
        let arity = method.params.len();
        let call_sites = cx
            .collection
            .call_sites
            .get(&method.id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for site in call_sites {
            let args = &site.args.items;
            let count = args.len();
            if param.varargs {
                // The varargs slot absorbs every argument from its index on
                if count < index {
                    return self.abandon_both();
                }
                if count > index {
                    let start = if index == 0 {
                        args[index].span.start
                    } else {
                        args[index - 1].span.end
                    };
                    let span = Span::new(start, args[count - 1].span.end);
                    self.delete_arguments(site, index, count, span);
                }
                continue;
            }

            let valid = if method.is_varargs() {
                count + 1 >= arity
            } else {
                count == arity
            };
            if !valid || index >= count {
                return self.abandon_both();
            }
            let span = list_item_removal(args, index, |a| a.span);
            self.delete_arguments(site, index, index + 1, span);
        }
    }

    /// Delete `site.args[first..end]`, hoisting their side effects in the keep plan
    fn delete_arguments(&mut self, site: &CallSite<'ast>, first: usize, end: usize, span: Span) {
        let removed = &site.args.items[first..end];
        if !removed.iter().any(has_side_effects) {
            return self.both(Edit::delete(span));
        }
        self.side_effects = true;
        self.strip.push(Edit::delete(span));
        match self.hoisted(site, first, removed) {
            Some(insert) => {
                self.keep.push(insert);
                self.keep.push(Edit::delete(span));
            }
            None => self.keep.abandon(),
        }
    }

    /// Statements evaluating the side-effecting `removed` arguments, inserted before the call
    ///
    /// Only possible when the call is a whole statement of a block and
    /// nothing evaluated ahead of the arguments can observe the reordering.
    fn hoisted(&self, site: &CallSite<'ast>, first: usize, removed: &[Expr]) -> Option<Edit> {
        let stmt = site.stmt?;
        let earlier_stable = site.receiver.map_or(true, |r| self.is_stable(r))
            && site.args.items[..first].iter().all(|arg| self.is_stable(arg));
        if !earlier_stable {
            return None;
        }

        let mut statements = Vec::new();
        for arg in removed.iter().filter(|arg| has_side_effects(arg)) {
            let arg = arg.unparenthesized();
            if !matches!(arg.kind, ExprKind::Call { .. } | ExprKind::New { .. }) {
                return None;
            }
            statements.push(format!("{};", self.cx.source.slice(arg.span)?));
        }

        let separator = match self.cx.source.indentation(stmt.span.start) {
            Some(indent) => format!("\n{}", indent),
            None => " ".to_string(),
        };
        let mut text = statements.join(&separator);
        text.push_str(&separator);
        Some(Edit::insert(stmt.span.start, text))
    }

    /// Evaluates to the same value before and after a call: a literal, `this` or a local
    fn is_stable(&self, expr: &Expr) -> bool {
        match &expr.unparenthesized().kind {
            ExprKind::Literal | ExprKind::This => true,
            ExprKind::Name {
                symbol: Some(symbol),
                ..
            } => self
                .cx
                .collection
                .get(*symbol)
                .is_some_and(|decl| decl.kind != DeclKind::Field),
            _ => false,
        }
    }

    fn dead_write(&mut self, write: &WriteSite<'ast>) {
        match &write.expr.kind {
            ExprKind::Assign { value, .. } if has_side_effects(value) => {
                self.keep_as_statement(write.stmt, value, write.needs_block);
            }
            ExprKind::CompoundAssign { value, .. } if has_side_effects(value) => {
                let value = value.unparenthesized();
                if !value.is_statement_expression() {
                    self.side_effects = true;
                    self.keep.abandon();
                    let edit = if write.needs_block {
                        Edit::replace(write.stmt.span, "{}")
                    } else {
                        Edit::delete(self.cx.source.removal_span(write.stmt.span))
                    };
                    return self.strip.push(edit);
                }
                if let Some(text) = self.text(value.span) {
                    self.both(Edit::replace(write.stmt.span, format!("{};", text)));
                }
            }
            _ => self.remove_statement(write.stmt, write.needs_block),
        }
    }

    /// Turn the first surviving reassignment into the declaration
    fn redeclare(
        &mut self,
        declaration: &Declaration<'ast>,
        usage: &SymbolUsage<'ast>,
        unused: &[usize],
    ) {
        let survivor = usage
            .windows
            .iter()
            .enumerate()
            .find(|(index, _)| !unused.contains(index))
            .map(|(_, window)| window.start);
        let Some(WindowStart::Reassignment(site)) = survivor else {
            return;
        };

        let mut ty = declaration
            .ty
            .map(|ty| ty.text.clone())
            .unwrap_or_else(|| "var".to_string());
        if declaration.varargs {
            ty.push_str("[]");
        }
        self.both(Edit::insert(site.stmt.span.start, format!("{} ", ty)));
    }
}

/// Span removing `items[index]` together with one separating comma
fn list_item_removal<T>(items: &[T], index: usize, span: impl Fn(&T) -> Span) -> Span {
    let this = span(&items[index]);
    if let Some(next) = items.get(index + 1) {
        Span::new(this.start, span(next).start)
    } else if index > 0 {
        Span::new(span(&items[index - 1]).end, this.end)
    } else {
        this
    }
}
