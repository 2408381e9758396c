//! Usage Resolver
//!
//! Second pass over the compilation unit. Every reference to a collected
//! declaration becomes a [`UsageSite`]; reads mark the symbol's current
//! liveness [`Window`], writes are attached to it, and unconditional
//! reassignments close it and open the next one.
//!
//! ## Read/write classification
//!
//! An assignment, compound assignment or `++`/`--` is a write only when it is
//! the whole expression of an expression statement. Anywhere else (a return
//! value, a call argument, a nested expression, a for-loop header) its
//! target is read. In a write, the receiver of a field select and every part
//! of an array access count as reads.
//!
//! ## Unconditional reassignment
//!
//! A plain `=` statement assigning a bare name, directly inside the block
//! the variable was declared for. This is a lexical approximation: an
//! assignment in a nested block or a branch never closes a window.

use super::collector::{Collection, DeclKind, DeclSite};
use crate::syntax::visit::{self, Visitor};
use crate::syntax::*;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageKind {
    Read,
    Write,
    CompoundWrite,
    Increment,
}

/// One syntactic reference to a tracked declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageSite {
    /// Span of the referencing identifier
    pub span: Span,
    pub kind: UsageKind,
    /// Bound to the symbol by name resolution, not matched by field name alone
    pub resolved: bool,
}

/// A write statement to a tracked declaration
#[derive(Debug, Clone, Copy)]
pub struct WriteSite<'ast> {
    pub stmt: &'ast Stmt,
    /// The assignment, compound assignment or increment, without parentheses
    pub expr: &'ast Expr,
    /// Span of the assigned identifier
    pub target: Span,
    /// The statement is the sole body of an `if`, loop, label or switch rule
    pub needs_block: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum WindowStart<'ast> {
    Declaration,
    Reassignment(WriteSite<'ast>),
}

/// Stretch of a symbol's lifetime between two unconditional writes
#[derive(Debug, Clone)]
pub struct Window<'ast> {
    pub start: WindowStart<'ast>,
    /// Writes inside the window in traversal order; a reassignment window starts with its own
    pub writes: Vec<WriteSite<'ast>>,
    pub read: bool,
}

impl<'ast> Window<'ast> {
    fn new(start: WindowStart<'ast>) -> Self {
        let writes = match start {
            WindowStart::Declaration => Vec::new(),
            WindowStart::Reassignment(site) => vec![site],
        };
        Self {
            start,
            writes,
            read: false,
        }
    }
}

/// Everything the resolver learned about one symbol
#[derive(Debug, Clone)]
pub struct SymbolUsage<'ast> {
    /// References in traversal order, excluding the declaration itself
    pub sites: Vec<UsageSite>,
    /// Contiguous and in traversal order; never empty
    pub windows: Vec<Window<'ast>>,
    /// Declared without a value and not yet written
    awaiting_initial_write: bool,
}

impl<'ast> SymbolUsage<'ast> {
    fn new(awaiting_initial_write: bool) -> Self {
        Self {
            sites: Vec::new(),
            windows: vec![Window::new(WindowStart::Declaration)],
            awaiting_initial_write,
        }
    }

    pub fn is_ever_read(&self) -> bool {
        self.windows.iter().any(|w| w.read)
    }

    /// Declaration plus every reference
    pub fn usage_count(&self) -> usize {
        1 + self.sites.len()
    }

    pub fn unused_windows(&self) -> Vec<usize> {
        self.windows
            .iter()
            .enumerate()
            .filter(|(_, w)| !w.read)
            .map(|(i, _)| i)
            .collect()
    }

    fn current(&mut self) -> &mut Window<'ast> {
        if self.windows.is_empty() {
            self.windows.push(Window::new(WindowStart::Declaration));
        }
        let last = self.windows.len() - 1;
        &mut self.windows[last]
    }
}

/// Usage information for every collected declaration
#[derive(Debug, Default)]
pub struct Usages<'ast> {
    symbols: HashMap<SymbolId, SymbolUsage<'ast>>,
}

impl<'ast> Usages<'ast> {
    pub fn get(&self, symbol: SymbolId) -> Option<&SymbolUsage<'ast>> {
        self.symbols.get(&symbol)
    }
}

/// Resolve every reference to the collected declarations
pub fn resolve<'ast>(unit: &'ast CompilationUnit, collection: &Collection<'ast>) -> Usages<'ast> {
    let mut field_names: HashMap<String, Vec<SymbolId>> = HashMap::new();
    let symbols = collection
        .declarations
        .iter()
        .map(|decl| {
            if decl.kind == DeclKind::Field {
                field_names
                    .entry(decl.name().to_string())
                    .or_default()
                    .push(decl.symbol);
            }
            let awaiting = decl.kind == DeclKind::Local && !decl.initialized;
            (decl.symbol, SymbolUsage::new(awaiting))
        })
        .collect();

    let mut resolver = Resolver {
        collection,
        usages: Usages { symbols },
        field_names,
        scopes: Vec::new(),
        current_body: None,
        for_header: 0,
    };
    resolver.visit_unit(unit);
    resolver.apply_method_references();
    resolver.usages
}

struct Resolver<'c, 'ast> {
    collection: &'c Collection<'ast>,
    usages: Usages<'ast>,
    /// Private fields by name, for selects whose receiver is not `this`
    field_names: HashMap<String, Vec<SymbolId>>,
    /// Innermost block, switch body or unbraced statement body
    scopes: Vec<NodeId>,
    /// Statement currently being visited as an unbraced body
    current_body: Option<NodeId>,
    for_header: usize,
}

impl<'c, 'ast> Resolver<'c, 'ast> {
    fn read(&mut self, symbol: SymbolId, span: Span) {
        self.record_read(symbol, span, true);
    }

    fn record_read(&mut self, symbol: SymbolId, span: Span, resolved: bool) {
        if let Some(usage) = self.usages.symbols.get_mut(&symbol) {
            usage.sites.push(UsageSite {
                span,
                kind: UsageKind::Read,
                resolved,
            });
            usage.current().read = true;
        }
    }

    /// `other.field` may name a private field of this unit on another instance
    fn read_field_by_name(&mut self, name: &str, span: Span) {
        let Some(symbols) = self.field_names.get(name).cloned() else {
            return;
        };
        for symbol in symbols {
            self.record_read(symbol, span, false);
        }
    }

    fn write(&mut self, symbol: SymbolId, kind: UsageKind, site: WriteSite<'ast>, bare: bool) {
        let in_scope = self
            .collection
            .get(symbol)
            .and_then(|decl| decl.scope)
            .is_some_and(|scope| self.scopes.last() == Some(&scope));
        let unconditional = bare && kind == UsageKind::Write && in_scope;

        let Some(usage) = self.usages.symbols.get_mut(&symbol) else {
            return;
        };
        usage.sites.push(UsageSite {
            span: site.target,
            kind,
            resolved: true,
        });

        if unconditional && !usage.awaiting_initial_write {
            usage.windows.push(Window::new(WindowStart::Reassignment(site)));
        } else {
            usage.awaiting_initial_write = false;
            usage.current().writes.push(site);
        }
    }

    /// Tracked symbol assigned by `target`, with its identifier span and whether it is a bare name
    fn write_target(&self, target: &Expr) -> Option<(SymbolId, Span, bool)> {
        let target = target.unparenthesized();
        match &target.kind {
            ExprKind::Name {
                symbol: Some(symbol),
                ..
            } if self.collection.contains(*symbol) => Some((*symbol, target.span, true)),
            ExprKind::FieldAccess {
                target: receiver,
                field,
                symbol: Some(symbol),
            } if self.collection.contains(*symbol)
                && matches!(receiver.unparenthesized().kind, ExprKind::This) =>
            {
                Some((*symbol, field.span, false))
            }
            _ => None,
        }
    }

    fn expression_statement(&mut self, stmt: &'ast Stmt, expr: &'ast Expr) {
        if self.for_header > 0 {
            return self.visit_expr(expr);
        }
        let inner = expr.unparenthesized();
        let (target, value, kind) = match &inner.kind {
            ExprKind::Assign { target, value } => (target, Some(value), UsageKind::Write),
            ExprKind::CompoundAssign { target, value, .. } => {
                (target, Some(value), UsageKind::CompoundWrite)
            }
            ExprKind::Unary { op, operand } if op.is_increment() => {
                (operand, None, UsageKind::Increment)
            }
            _ => return self.visit_expr(expr),
        };
        let Some((symbol, target_span, bare)) = self.write_target(target) else {
            return self.visit_expr(expr);
        };

        // The right-hand side belongs to the window being closed
        if let Some(value) = value {
            self.visit_expr(value);
        }
        let site = WriteSite {
            stmt,
            expr: inner,
            target: target_span,
            needs_block: self.current_body == Some(stmt.id),
        };
        self.write(symbol, kind, site, bare);
    }

    /// Visit the body of an `if`, loop, label or switch rule
    fn body(&mut self, stmt: &'ast Stmt) {
        if let StmtKind::Block(block) = &stmt.kind {
            return self.visit_block(block);
        }
        let saved = self.current_body.replace(stmt.id);
        self.scopes.push(stmt.id);
        self.visit_stmt(stmt);
        self.scopes.pop();
        self.current_body = saved;
    }

    /// A method reference is a call site for every parameter of its target
    fn apply_method_references(&mut self) {
        for decl in &self.collection.declarations {
            let DeclSite::Parameter { method, .. } = decl.site else {
                continue;
            };
            if !self.collection.method_refs.contains(&method.id) {
                continue;
            }
            if let Some(window) = self
                .usages
                .symbols
                .get_mut(&decl.symbol)
                .and_then(|usage| usage.windows.first_mut())
            {
                window.read = true;
            }
        }
    }
}

impl<'c, 'ast> Visitor<'ast> for Resolver<'c, 'ast> {
    fn visit_block(&mut self, block: &'ast Block) {
        let saved = self.current_body.take();
        self.scopes.push(block.id);
        visit::walk_block(self, block);
        self.scopes.pop();
        self.current_body = saved;
    }

    fn visit_switch_body(&mut self, body: &'ast SwitchBody) {
        let saved = self.current_body.take();
        self.scopes.push(body.id);
        for case in &body.cases {
            for label in &case.labels {
                self.visit_expr(label);
            }
            for stmt in &case.body {
                if case.rule {
                    self.body(stmt);
                } else {
                    self.visit_stmt(stmt);
                }
            }
        }
        self.scopes.pop();
        self.current_body = saved;
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match &stmt.kind {
            StmtKind::Expr(expr) => self.expression_statement(stmt, expr),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.visit_expr(cond);
                self.body(then_branch);
                if let Some(else_branch) = else_branch {
                    self.body(else_branch);
                }
            }
            StmtKind::While { cond, body } => {
                self.visit_expr(cond);
                self.body(body);
            }
            StmtKind::DoWhile { body, cond } => {
                self.body(body);
                self.visit_expr(cond);
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => {
                self.for_header += 1;
                for stmt in init {
                    self.visit_stmt(stmt);
                }
                if let Some(cond) = cond {
                    self.visit_expr(cond);
                }
                for expr in update {
                    self.visit_expr(expr);
                }
                self.for_header -= 1;
                self.body(body);
            }
            StmtKind::ForEach {
                var,
                iterable,
                body,
            } => {
                self.visit_expr(iterable);
                self.visit_local_var(var);
                self.body(body);
            }
            StmtKind::Labeled { body, .. } => self.body(body),
            _ => visit::walk_stmt(self, stmt),
        }
    }

    fn visit_lambda(&mut self, lambda: &'ast Lambda) {
        // A lambda body is never inside the enclosing for-loop header
        let saved = std::mem::take(&mut self.for_header);
        visit::walk_lambda(self, lambda);
        self.for_header = saved;
    }

    fn visit_type_decl(&mut self, decl: &'ast TypeDecl) {
        let saved = std::mem::take(&mut self.for_header);
        visit::walk_type_decl(self, decl);
        self.for_header = saved;
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        match &expr.kind {
            ExprKind::Name {
                symbol: Some(symbol),
                ..
            } => self.read(*symbol, expr.span),
            ExprKind::FieldAccess {
                target,
                field,
                symbol,
            } => {
                match symbol {
                    Some(symbol) => self.read(*symbol, field.span),
                    None => self.read_field_by_name(&field.name, field.span),
                }
                self.visit_expr(target);
            }
            ExprKind::New { body: Some(_), .. } => {
                let saved = std::mem::take(&mut self.for_header);
                visit::walk_expr(self, expr);
                self.for_header = saved;
            }
            _ => visit::walk_expr(self, expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::collector::collect;
    use crate::analysis::AnalysisOptions;
    use crate::parser::{JavaParser, Parser};

    fn parse(source: &str) -> CompilationUnit {
        JavaParser::new()
            .parse(&SourceText::new(source))
            .expect("Failed to parse")
    }

    /// Windows of the symbol declared with `name`, as (read, writes) pairs
    fn windows_of(source: &str, name: &str) -> Vec<(bool, usize)> {
        let unit = parse(source);
        let collection = collect(&unit, &AnalysisOptions::default()).unwrap();
        let usages = resolve(&unit, &collection);
        let decl = collection
            .declarations
            .iter()
            .find(|d| d.name() == name)
            .expect("declaration not collected");
        usages
            .get(decl.symbol)
            .unwrap()
            .windows
            .iter()
            .map(|w| (w.read, w.writes.len()))
            .collect()
    }

    fn wrap(body: &str) -> String {
        format!("class A {{\n  void run() {{\n{}\n  }}\n  void use(int v) {{}}\n}}\n", body)
    }

    #[test]
    fn test_read_marks_window() {
        let windows = windows_of(&wrap("int x = 1; use(x);"), "x");
        assert_eq!(windows, vec![(true, 0)]);
    }

    #[test]
    fn test_unread_declaration() {
        let windows = windows_of(&wrap("int x = 1;"), "x");
        assert_eq!(windows, vec![(false, 0)]);
    }

    #[test]
    fn test_reassignment_opens_window() {
        let windows = windows_of(&wrap("int x = 1; use(x); x = 2;"), "x");
        assert_eq!(windows, vec![(true, 0), (false, 1)]);
    }

    #[test]
    fn test_rhs_reads_previous_window() {
        let windows = windows_of(&wrap("int x = 1; x = x + 1;"), "x");
        assert_eq!(windows, vec![(true, 0), (false, 1)]);
    }

    #[test]
    fn test_nested_assignment_is_not_a_reassignment() {
        let windows = windows_of(&wrap("int x = 1; if (true) { x = 2; } use(x);"), "x");
        assert_eq!(windows, vec![(true, 1)]);
    }

    #[test]
    fn test_compound_assignment_is_not_a_read() {
        let windows = windows_of(&wrap("int x = 1; x += 2; x++;"), "x");
        assert_eq!(windows, vec![(false, 2)]);
    }

    #[test]
    fn test_assignment_in_expression_is_a_read() {
        let windows = windows_of(&wrap("int x = 1; use(x = 2);"), "x");
        assert_eq!(windows, vec![(true, 0)]);
    }

    #[test]
    fn test_for_header_write_is_a_read() {
        let windows = windows_of(&wrap("int x = 0; for (x = 1; false; ) {}"), "x");
        assert_eq!(windows, vec![(true, 0)]);
    }

    #[test]
    fn test_uninitialized_first_assignment_is_initial_write() {
        let windows = windows_of(&wrap("int x; x = 1; use(x);"), "x");
        assert_eq!(windows, vec![(true, 1)]);
    }

    #[test]
    fn test_array_element_write_reads_array() {
        let windows = windows_of(&wrap("int[] a = new int[1]; a[0] = 1;"), "a");
        assert_eq!(windows, vec![(true, 0)]);
    }

    #[test]
    fn test_window_count_matches_reassignments() {
        let windows = windows_of(&wrap("int x = 1; x = 2; x = 3; use(x);"), "x");
        assert_eq!(windows.len(), 3);
        assert_eq!(windows, vec![(false, 0), (false, 1), (true, 1)]);
    }

    #[test]
    fn test_parameter_reassignment_in_body() {
        let source = "class A {\n  private void run(int p) { p = 2; use(p); }\n  void use(int v) {}\n}\n";
        assert_eq!(windows_of(source, "p"), vec![(false, 0), (true, 1)]);
    }

    #[test]
    fn test_field_write_through_this() {
        let source = "class A {\n  private int count;\n  void inc() { this.count = 2; count++; }\n}\n";
        assert_eq!(windows_of(source, "count"), vec![(false, 2)]);
    }

    #[test]
    fn test_field_read_on_other_instance() {
        let source = "class A {\n  private int count;\n  boolean same(A other) { return other.count == 0; }\n}\n";
        assert_eq!(windows_of(source, "count"), vec![(true, 0)]);
    }

    #[test]
    fn test_field_read_by_name_is_unresolved() {
        let source = "class A {\n  private int count;\n  int get(B b) { return count + b.count; }\n}\n";
        let unit = parse(source);
        let collection = collect(&unit, &AnalysisOptions::default()).unwrap();
        let usages = resolve(&unit, &collection);
        let usage = usages.get(collection.declarations[0].symbol).unwrap();
        let resolved: Vec<bool> = usage.sites.iter().map(|site| site.resolved).collect();
        assert_eq!(resolved, vec![true, false]);
    }

    #[test]
    fn test_method_reference_marks_parameters_read() {
        let source = "class A {\n  void run() { java.util.function.IntConsumer c = this::sink; c.accept(1); }\n  private void sink(int value) {}\n}\n";
        assert_eq!(windows_of(source, "value"), vec![(true, 0)]);
    }

    #[test]
    fn test_unbraced_body_needs_block() {
        let unit = parse(&wrap("int x = 1; use(x); if (true) x = 2;"));
        let collection = collect(&unit, &AnalysisOptions::default()).unwrap();
        let usages = resolve(&unit, &collection);
        let usage = usages.get(collection.declarations[0].symbol).unwrap();
        assert_eq!(usage.windows.len(), 1);
        let write = usage.windows[0].writes[0];
        assert!(write.needs_block);
    }
}
