//! Declaration Collector
//!
//! First pass over a compilation unit. Records every candidate declaration
//! (locals, parameters, lambda parameters, private fields) together with the
//! scope its unconditional reassignments must happen in, and gathers the
//! call-site information the fix synthesizer needs to change method
//! signatures safely.
//!
//! ## Candidates
//!
//! - local variables, including enhanced-for variables and for-init declarators
//! - parameters of methods and constructors that have a body
//! - lambda parameters
//! - private fields
//!
//! Catch parameters, try-with-resources variables and record components are
//! never candidates. Declarations exempted by annotation, type, enclosing
//! class or `@SuppressWarnings` are dropped here; declarations exempted by
//! name are kept and flagged so the resolver still counts their usages.
//!
//! A `native` method anywhere in the unit aborts the whole analysis.

use super::exemptions::{self, AnalysisOptions};
use super::names::NameIndex;
use crate::syntax::visit::{self, Visitor};
use crate::syntax::*;
use std::collections::{HashMap, HashSet};

/// Kind of a tracked declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Local,
    /// Declared in a basic for-loop header
    ForInit,
    /// Enhanced-for loop variable
    ForEach,
    Parameter,
    LambdaParameter,
    Field,
}

impl DeclKind {
    pub fn symbol_kind(&self) -> super::SymbolKind {
        match self {
            DeclKind::Local | DeclKind::ForInit | DeclKind::ForEach => {
                super::SymbolKind::LocalVariable
            }
            DeclKind::Parameter | DeclKind::LambdaParameter => super::SymbolKind::Parameter,
            DeclKind::Field => super::SymbolKind::Field,
        }
    }

    /// Declared without a value but definitely assigned on entry
    pub fn is_pre_assigned(&self) -> bool {
        matches!(
            self,
            DeclKind::ForEach | DeclKind::Parameter | DeclKind::LambdaParameter
        )
    }
}

/// Where a declaration lives in the tree, for rewriting it
#[derive(Debug, Clone, Copy)]
pub enum DeclSite<'ast> {
    /// `index` is the declarator's position inside `var`
    Local {
        stmt: &'ast Stmt,
        var: &'ast LocalVar,
        index: usize,
    },
    ForInit,
    ForEach,
    Parameter {
        method: &'ast MethodDecl,
        index: usize,
        owner: OwnerInfo,
    },
    LambdaParameter,
    Field {
        field: &'ast FieldDecl,
        index: usize,
        injected: bool,
    },
}

/// Facts about the type declaring a method
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerInfo {
    pub is_interface: bool,
    pub is_enum: bool,
}

/// One tracked declaration
#[derive(Debug, Clone)]
pub struct Declaration<'ast> {
    pub symbol: SymbolId,
    pub kind: DeclKind,
    pub ident: &'ast Ident,
    /// Declared type as written, absent for inferred lambda parameters
    pub ty: Option<&'ast TypeRef>,
    pub varargs: bool,
    /// Block in which a plain assignment counts as an unconditional reassignment
    pub scope: Option<NodeId>,
    /// Has a value at its declaration
    pub initialized: bool,
    /// Intentionally unused by name; only checked for being used anyway
    pub exempt_by_name: bool,
    pub site: DeclSite<'ast>,
}

impl<'ast> Declaration<'ast> {
    pub fn name(&self) -> &'ast str {
        &self.ident.name
    }

    /// Initializer expression of a local or field declarator
    pub fn initializer(&self) -> Option<&'ast Expr> {
        match self.site {
            DeclSite::Local { var, index, .. } => var.declarators.get(index)?.init.as_ref(),
            DeclSite::Field { field, index, .. } => field.declarators.get(index)?.init.as_ref(),
            _ => None,
        }
    }
}

/// One resolved invocation of a method or constructor
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'ast> {
    pub args: &'ast Args,
    /// Receiver of a qualified call, or the outer instance of `outer.new T()`
    pub receiver: Option<&'ast Expr>,
    /// Expression statement consisting of exactly this invocation
    pub stmt: Option<&'ast Stmt>,
}

/// Output of the collection pass
#[derive(Debug, Default)]
pub struct Collection<'ast> {
    /// In traversal order
    pub declarations: Vec<Declaration<'ast>>,
    index: HashMap<SymbolId, usize>,
    /// Argument lists of every resolved invocation, per target
    pub call_sites: HashMap<MethodId, Vec<CallSite<'ast>>>,
    /// Methods used as method references
    pub method_refs: HashSet<MethodId>,
    /// Names of method calls and method references that did not resolve
    pub unresolved_calls: HashSet<String>,
    /// Simple type names of constructor invocations that did not resolve
    pub unresolved_constructors: HashSet<String>,
    /// Name of the type declaring each method
    pub method_owners: HashMap<MethodId, String>,
    /// Variable names per region, for rename collision checks
    pub names: NameIndex,
}

impl<'ast> Collection<'ast> {
    pub fn get(&self, symbol: SymbolId) -> Option<&Declaration<'ast>> {
        self.index.get(&symbol).map(|&i| &self.declarations[i])
    }

    pub fn contains(&self, symbol: SymbolId) -> bool {
        self.index.contains_key(&symbol)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Whether every invocation of `method` is visible and editable
    ///
    /// Only then may one of its parameters be deleted; otherwise callers or
    /// overriders outside this unit would break.
    pub fn is_changeable_everywhere(&self, method: &MethodDecl, owner: OwnerInfo) -> bool {
        if method.body.is_none() || owner.is_interface {
            return false;
        }
        let private = method.modifiers.has(Modifier::Private)
            || (owner.is_enum && method.kind == MethodKind::Constructor);
        if !private || self.method_refs.contains(&method.id) {
            return false;
        }
        match method.kind {
            MethodKind::Method => !self.unresolved_calls.contains(&method.name.name),
            MethodKind::Constructor => {
                !self.unresolved_constructors.contains(&method.name.name)
            }
        }
    }

    fn push(&mut self, declaration: Declaration<'ast>) {
        self.index
            .insert(declaration.symbol, self.declarations.len());
        self.declarations.push(declaration);
    }
}

/// Collect candidate declarations, or `None` when the unit contains a native method
pub fn collect<'ast>(
    unit: &'ast CompilationUnit,
    options: &AnalysisOptions,
) -> Option<Collection<'ast>> {
    let mut collector = Collector {
        options,
        collection: Collection::default(),
        types: Vec::new(),
        scopes: Vec::new(),
        suppressed: 0,
        native: false,
        statement_expr: None,
    };
    collector.visit_unit(unit);
    if collector.native {
        return None;
    }
    let mut collection = collector.collection;
    collection.names = NameIndex::scan(unit);
    Some(collection)
}

struct TypeContext {
    name: String,
    supertypes: Vec<String>,
    owner: OwnerInfo,
    exempts_fields: bool,
}

struct Collector<'a, 'ast> {
    options: &'a AnalysisOptions,
    collection: Collection<'ast>,
    types: Vec<TypeContext>,
    /// Innermost block or switch body
    scopes: Vec<NodeId>,
    /// Depth of enclosing `@SuppressWarnings("unused")` declarations
    suppressed: usize,
    native: bool,
    /// Innermost expression statement of a block or switch group, with its expression id
    statement_expr: Option<(&'ast Stmt, NodeId)>,
}

impl<'a, 'ast> Collector<'a, 'ast> {
    fn exempt_by_modifiers(&self, modifiers: &Modifiers, ty: Option<&TypeRef>) -> bool {
        exemptions::has_exempting_annotation(modifiers, self.options)
            || ty.is_some_and(|ty| exemptions::has_exempting_type(ty, self.options))
    }

    fn declare(
        &mut self,
        kind: DeclKind,
        symbol: SymbolId,
        ident: &'ast Ident,
        ty: Option<&'ast TypeRef>,
        scope: Option<NodeId>,
        initialized: bool,
        site: DeclSite<'ast>,
    ) {
        let varargs = match site {
            DeclSite::Parameter { method, index, .. } => {
                method.params.get(index).is_some_and(|p| p.varargs)
            }
            _ => false,
        };
        self.collection.push(Declaration {
            symbol,
            kind,
            ident,
            ty,
            varargs,
            scope,
            initialized,
            exempt_by_name: exemptions::is_exempt_by_name(&ident.name, self.options),
            site,
        });
    }

    fn with_suppression<F>(&mut self, modifiers: &Modifiers, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let suppressed = exemptions::is_suppressed(modifiers);
        if suppressed {
            self.suppressed += 1;
        }
        f(self);
        if suppressed {
            self.suppressed -= 1;
        }
    }

    fn enter_type(&mut self, context: TypeContext, f: impl FnOnce(&mut Self)) {
        self.types.push(context);
        f(self);
        self.types.pop();
    }

    fn collect_local(&mut self, stmt: &'ast Stmt, var: &'ast LocalVar, for_init: bool) {
        if self.suppressed > 0 || exemptions::is_suppressed(&var.modifiers) {
            return;
        }
        if self.exempt_by_modifiers(&var.modifiers, Some(&var.ty)) {
            return;
        }
        let scope = if for_init {
            None
        } else {
            self.scopes.last().copied()
        };
        for (index, declarator) in var.declarators.iter().enumerate() {
            let (kind, site) = if for_init {
                (DeclKind::ForInit, DeclSite::ForInit)
            } else {
                (DeclKind::Local, DeclSite::Local { stmt, var, index })
            };
            self.declare(
                kind,
                declarator.symbol,
                &declarator.name,
                Some(&var.ty),
                scope,
                declarator.init.is_some(),
                site,
            );
        }
    }

    fn collect_for_each(&mut self, var: &'ast LocalVar, body: &'ast Stmt) {
        if self.suppressed > 0 || exemptions::is_suppressed(&var.modifiers) {
            return;
        }
        if self.exempt_by_modifiers(&var.modifiers, Some(&var.ty)) {
            return;
        }
        let scope = match &body.kind {
            StmtKind::Block(block) => block.id,
            _ => body.id,
        };
        for declarator in &var.declarators {
            self.declare(
                DeclKind::ForEach,
                declarator.symbol,
                &declarator.name,
                Some(&var.ty),
                Some(scope),
                true,
                DeclSite::ForEach,
            );
        }
    }

    fn collect_params(&mut self, method: &'ast MethodDecl) {
        let Some(body) = &method.body else {
            return;
        };
        if self.suppressed > 0 || exemptions::method_exempts_params(method, self.options) {
            return;
        }
        let owner = self.types.last().map(|t| t.owner).unwrap_or_default();
        for (index, param) in method.params.iter().enumerate() {
            if exemptions::is_suppressed(&param.modifiers)
                || self.exempt_by_modifiers(&param.modifiers, param.ty.as_ref())
            {
                continue;
            }
            self.declare(
                DeclKind::Parameter,
                param.symbol,
                &param.name,
                param.ty.as_ref(),
                Some(body.id),
                true,
                DeclSite::Parameter {
                    method,
                    index,
                    owner,
                },
            );
        }
    }

    fn collect_fields(&mut self, field: &'ast FieldDecl) {
        if self.suppressed > 0 || !field.modifiers.has(Modifier::Private) {
            return;
        }
        if self.types.last().is_some_and(|t| t.exempts_fields) {
            return;
        }
        if self.exempt_by_modifiers(&field.modifiers, Some(&field.ty)) {
            return;
        }
        let injected = exemptions::is_injected(&field.modifiers);
        if injected && !self.options.report_injected_fields {
            return;
        }
        for (index, declarator) in field.declarators.iter().enumerate() {
            if exemptions::is_serial_version_uid(&declarator.name.name) {
                continue;
            }
            self.declare(
                DeclKind::Field,
                declarator.symbol,
                &declarator.name,
                Some(&field.ty),
                None,
                declarator.init.is_some(),
                DeclSite::Field {
                    field,
                    index,
                    injected,
                },
            );
        }
    }

    fn collect_lambda_params(&mut self, lambda: &'ast Lambda) {
        if self.suppressed > 0 {
            return;
        }
        let scope = match &lambda.body {
            LambdaBody::Block(block) => Some(block.id),
            LambdaBody::Expr(_) => None,
        };
        for param in &lambda.params {
            if exemptions::is_suppressed(&param.modifiers)
                || self.exempt_by_modifiers(&param.modifiers, param.ty.as_ref())
            {
                continue;
            }
            self.declare(
                DeclKind::LambdaParameter,
                param.symbol,
                &param.name,
                param.ty.as_ref(),
                scope,
                true,
                DeclSite::LambdaParameter,
            );
        }
    }

    /// A statement of a block or switch group, where statements may be inserted before it
    fn statement_in_sequence(&mut self, stmt: &'ast Stmt) {
        let StmtKind::Expr(expr) = &stmt.kind else {
            return self.visit_stmt(stmt);
        };
        let saved = self
            .statement_expr
            .replace((stmt, expr.unparenthesized().id));
        self.visit_expr(expr);
        self.statement_expr = saved;
    }

    fn call_site(
        &self,
        expr: &'ast Expr,
        args: &'ast Args,
        receiver: Option<&'ast Expr>,
    ) -> CallSite<'ast> {
        let stmt = self
            .statement_expr
            .filter(|(_, id)| *id == expr.id)
            .map(|(stmt, _)| stmt);
        CallSite {
            args,
            receiver,
            stmt,
        }
    }

    fn record_call(&mut self, method: Option<MethodId>, name: &str, site: CallSite<'ast>) {
        match method {
            Some(id) => self.collection.call_sites.entry(id).or_default().push(site),
            None => {
                self.collection.unresolved_calls.insert(name.to_string());
            }
        }
    }

    fn record_constructor_call(
        &mut self,
        constructor: Option<MethodId>,
        type_name: &str,
        site: CallSite<'ast>,
    ) {
        match constructor {
            Some(id) => self.collection.call_sites.entry(id).or_default().push(site),
            None => {
                self.collection
                    .unresolved_constructors
                    .insert(type_name.to_string());
            }
        }
    }
}

impl<'a, 'ast> Visitor<'ast> for Collector<'a, 'ast> {
    fn visit_type_decl(&mut self, decl: &'ast TypeDecl) {
        let context = TypeContext {
            name: decl.name.name.clone(),
            supertypes: decl
                .supertypes
                .iter()
                .map(|t| t.simple_name().to_string())
                .collect(),
            owner: OwnerInfo {
                is_interface: matches!(decl.kind, TypeKind::Interface | TypeKind::Annotation),
                is_enum: decl.kind == TypeKind::Enum,
            },
            exempts_fields: exemptions::class_exempts_fields(decl, self.options),
        };
        self.with_suppression(&decl.modifiers, |this| {
            this.enter_type(context, |this| visit::walk_type_decl(this, decl));
        });
    }

    fn visit_enum_constant(&mut self, constant: &'ast EnumConstant) {
        let enum_name = self.types.last().map(|t| t.name.clone()).unwrap_or_default();
        match (&constant.args, constant.constructor) {
            (Some(args), constructor) => {
                let site = CallSite {
                    args,
                    receiver: None,
                    stmt: None,
                };
                self.record_constructor_call(constructor, &enum_name, site);
            }
            (None, None) => {
                self.collection.unresolved_constructors.insert(enum_name);
            }
            (None, Some(_)) => {}
        }
        visit::walk_enum_constant(self, constant);
    }

    fn visit_field(&mut self, field: &'ast FieldDecl) {
        self.with_suppression(&field.modifiers, |this| {
            this.collect_fields(field);
            visit::walk_field(this, field);
        });
    }

    fn visit_method(&mut self, method: &'ast MethodDecl) {
        if method.modifiers.has(Modifier::Native) {
            self.native = true;
            return;
        }
        if let Some(owner) = self.types.last() {
            self.collection
                .method_owners
                .insert(method.id, owner.name.clone());
        }
        self.with_suppression(&method.modifiers, |this| {
            this.collect_params(method);
            visit::walk_method(this, method);
        });
    }

    fn visit_block(&mut self, block: &'ast Block) {
        self.scopes.push(block.id);
        for stmt in &block.stmts {
            self.statement_in_sequence(stmt);
        }
        self.scopes.pop();
    }

    fn visit_switch_body(&mut self, body: &'ast SwitchBody) {
        self.scopes.push(body.id);
        for case in &body.cases {
            for label in &case.labels {
                self.visit_expr(label);
            }
            for stmt in &case.body {
                if case.rule {
                    self.visit_stmt(stmt);
                } else {
                    self.statement_in_sequence(stmt);
                }
            }
        }
        self.scopes.pop();
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match &stmt.kind {
            StmtKind::LocalVar(var) => {
                self.with_suppression(&var.modifiers, |this| {
                    // Initializers are walked first; lambdas inside them are candidates too
                    visit::walk_local_var(this, var);
                    this.collect_local(stmt, var, false);
                });
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => {
                for init_stmt in init {
                    match &init_stmt.kind {
                        StmtKind::LocalVar(var) => {
                            visit::walk_local_var(self, var);
                            self.collect_local(init_stmt, var, true);
                        }
                        _ => self.visit_stmt(init_stmt),
                    }
                }
                if let Some(cond) = cond {
                    self.visit_expr(cond);
                }
                for expr in update {
                    self.visit_expr(expr);
                }
                self.visit_stmt(body);
            }
            StmtKind::ForEach {
                var,
                iterable,
                body,
            } => {
                self.visit_expr(iterable);
                self.collect_for_each(var, body);
                self.visit_stmt(body);
            }
            StmtKind::Try {
                resources,
                body,
                catches,
                finally,
            } => {
                // Resources and catch parameters are never candidates
                for resource in resources {
                    match resource {
                        Resource::Declared(var) => visit::walk_local_var(self, var),
                        Resource::Expr(expr) => self.visit_expr(expr),
                    }
                }
                self.visit_block(body);
                for catch in catches {
                    self.visit_block(&catch.body);
                }
                if let Some(finally) = finally {
                    self.visit_block(finally);
                }
            }
            _ => visit::walk_stmt(self, stmt),
        }
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        match &expr.kind {
            ExprKind::Call {
                target,
                name,
                args,
                method,
            } => {
                let site = self.call_site(expr, args, target.as_deref());
                self.record_call(*method, &name.name, site);
            }
            ExprKind::New {
                outer,
                ty,
                args,
                constructor,
                body,
            } => {
                let site = self.call_site(expr, args, outer.as_deref());
                self.record_constructor_call(*constructor, ty.simple_name(), site);
                if let Some(body) = body {
                    // Anonymous class: its members belong to a new type context
                    let context = TypeContext {
                        name: ty.simple_name().to_string(),
                        supertypes: vec![ty.simple_name().to_string()],
                        owner: OwnerInfo::default(),
                        exempts_fields: self
                            .options
                            .exempting_class_supertypes
                            .iter()
                            .any(|name| ty.matches(name)),
                    };
                    if let Some(outer) = outer {
                        self.visit_expr(outer);
                    }
                    for arg in &args.items {
                        self.visit_expr(arg);
                    }
                    self.enter_type(context, |this| {
                        for member in body {
                            this.visit_member(member);
                        }
                    });
                    return;
                }
            }
            ExprKind::ConstructorCall {
                delegate,
                args,
                constructor,
            } => match delegate {
                ConstructorDelegate::This => {
                    let name = self.types.last().map(|t| t.name.clone()).unwrap_or_default();
                    // Nothing may precede `this(..)`, so there is no statement to hoist into
                    let site = CallSite {
                        args,
                        receiver: None,
                        stmt: None,
                    };
                    self.record_constructor_call(*constructor, &name, site);
                }
                ConstructorDelegate::Super => {
                    let supertypes = self
                        .types
                        .last()
                        .map(|t| t.supertypes.clone())
                        .unwrap_or_default();
                    self.collection.unresolved_constructors.extend(supertypes);
                }
            },
            ExprKind::MethodRef { target, name, method } => match method {
                Some(id) => {
                    self.collection.method_refs.insert(*id);
                }
                None if name.name == "new" => {
                    if let ExprKind::Name { name, .. } = &target.kind {
                        self.collection.unresolved_constructors.insert(name.clone());
                    }
                }
                None => {
                    self.collection.unresolved_calls.insert(name.name.clone());
                }
            },
            ExprKind::Lambda(lambda) => self.collect_lambda_params(lambda),
            _ => {}
        }
        visit::walk_expr(self, expr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{JavaParser, Parser};

    fn parse(source: &str) -> CompilationUnit {
        JavaParser::new()
            .parse(&SourceText::new(source))
            .expect("Failed to parse")
    }

    fn names(collection: &Collection) -> Vec<String> {
        collection
            .declarations
            .iter()
            .map(|d| d.name().to_string())
            .collect()
    }

    #[test]
    fn test_collects_all_candidate_kinds() {
        let unit = parse(
            r#"
class A {
    private int field;
    public int visible;
    void run(int param) {
        int local = 1;
        for (int i = 0; i < 3; i++) {}
        for (String item : items()) {}
        Runnable r = () -> {};
        java.util.function.Function<String, String> f = s -> s;
        try (AutoCloseable res = open()) {
        } catch (Exception e) {
        }
    }
}
"#,
        );
        let collection = collect(&unit, &AnalysisOptions::default()).unwrap();
        let names = names(&collection);
        for expected in ["field", "param", "local", "i", "item", "r", "f", "s"] {
            assert!(names.contains(&expected.to_string()), "missing {}", expected);
        }
        for excluded in ["visible", "res", "e"] {
            assert!(!names.contains(&excluded.to_string()), "unexpected {}", excluded);
        }
    }

    #[test]
    fn test_native_method_aborts() {
        let unit = parse("class A {\n  private native void poke(int x);\n  void run() { int y = 1; }\n}\n");
        assert!(collect(&unit, &AnalysisOptions::default()).is_none());
    }

    #[test]
    fn test_suppress_warnings_exempts_nested() {
        let unit = parse(
            "class A {\n  @SuppressWarnings(\"unused\")\n  void run(int p) { int x = 1; }\n  void other() { int y = 2; }\n}\n",
        );
        let collection = collect(&unit, &AnalysisOptions::default()).unwrap();
        assert_eq!(names(&collection), vec!["y".to_string()]);
    }

    #[test]
    fn test_override_parameters_are_exempt() {
        let unit = parse(
            "class A {\n  @Override\n  public boolean equals(Object other) { return true; }\n}\n",
        );
        let collection = collect(&unit, &AnalysisOptions::default()).unwrap();
        assert!(collection.is_empty());
    }

    #[test]
    fn test_name_exemption_is_flagged() {
        let unit = parse("class A {\n  void run() { int _ignored = 1; }\n}\n");
        let collection = collect(&unit, &AnalysisOptions::default()).unwrap();
        assert_eq!(collection.len(), 1);
        assert!(collection.declarations[0].exempt_by_name);
    }

    #[test]
    fn test_field_exemptions() {
        let unit = parse(
            r#"
class A implements java.io.Serializable {
    private int state;
}
class B {
    private static final long serialVersionUID = 1L;
    @Mock private Object mock;
    @Inject private Object injected;
    private Logger log;
    private int plain;
}
"#,
        );
        let collection = collect(&unit, &AnalysisOptions::default()).unwrap();
        assert_eq!(names(&collection), vec!["plain".to_string()]);
    }

    #[test]
    fn test_report_injected_fields() {
        let unit = parse("class B {\n  @Inject private Object injected;\n}\n");
        let options = AnalysisOptions {
            report_injected_fields: true,
            ..Default::default()
        };
        let collection = collect(&unit, &options).unwrap();
        assert_eq!(collection.len(), 1);
        assert!(matches!(
            collection.declarations[0].site,
            DeclSite::Field { injected: true, .. }
        ));
    }

    #[test]
    fn test_private_method_is_changeable() {
        let unit = parse(
            "class A {\n  void run() { helper(1); }\n  private void helper(int x) {}\n  public void api(int y) {}\n}\n",
        );
        let collection = collect(&unit, &AnalysisOptions::default()).unwrap();
        let changeable: Vec<_> = collection
            .declarations
            .iter()
            .filter_map(|d| match d.site {
                DeclSite::Parameter { method, owner, .. } => {
                    Some((d.name(), collection.is_changeable_everywhere(method, owner)))
                }
                _ => None,
            })
            .collect();
        assert_eq!(changeable, vec![("x", true), ("y", false)]);
    }

    #[test]
    fn test_call_sites_know_their_statement() {
        let unit = parse(
            "class A {\n  void run(boolean c) {\n    helper(1);\n    int r = helper(2);\n    if (c) helper(3);\n  }\n  private int helper(int x) { return x; }\n}\n",
        );
        let collection = collect(&unit, &AnalysisOptions::default()).unwrap();
        let statements: Vec<bool> = collection
            .call_sites
            .values()
            .flatten()
            .map(|site| site.stmt.is_some())
            .collect();
        assert_eq!(statements, vec![true, false, false]);
    }

    #[test]
    fn test_unresolved_call_blocks_signature_change() {
        let unit = parse(
            "class A {\n  void run(A other) { other.helper(1); }\n  private void helper(int x) {}\n}\n",
        );
        let collection = collect(&unit, &AnalysisOptions::default()).unwrap();
        let helper = collection
            .declarations
            .iter()
            .find(|d| d.name() == "x")
            .unwrap();
        let DeclSite::Parameter { method, owner, .. } = helper.site else {
            panic!("expected parameter");
        };
        assert!(!collection.is_changeable_everywhere(method, owner));
    }
}
