//! Java front end
//!
//! Lowers a tree-sitter-java concrete syntax tree into the resolved
//! [`crate::syntax`] tree.
//!
//! ## Resolution
//!
//! Resolution is lexical and unit-local:
//!
//! 1. An index pass visits every class body in the file and assigns ids to
//!    its fields and methods, so members can be referenced before they are
//!    declared.
//! 2. The lowering pass keeps a scope stack (class → method → block →
//!    statement-sequential locals) and resolves each simple name to the
//!    innermost declaration with that name.
//! 3. Calls resolve by name and arity among the enclosing classes' methods;
//!    `new T(..)` resolves among the constructors of the unique class `T`
//!    declared in the file. Anything ambiguous stays unresolved.

use super::Parser;
use crate::error::{Error, Result};
use crate::syntax::*;
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::debug;
use tree_sitter::Node;

thread_local! {
    /// One tree-sitter parser per worker thread
    static JAVA_PARSER: RefCell<Option<tree_sitter::Parser>> = const { RefCell::new(None) };
}

fn with_parser<F, R>(f: F) -> Result<R>
where
    F: FnOnce(&mut tree_sitter::Parser) -> Result<R>,
{
    JAVA_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            let mut parser = tree_sitter::Parser::new();
            parser
                .set_language(&tree_sitter_java::language())
                .map_err(|e| Error::Language(e.to_string()))?;
            *slot = Some(parser);
        }
        match slot.as_mut() {
            Some(parser) => f(parser),
            None => Err(Error::NoTree),
        }
    })
}

/// Parser for Java source files
pub struct JavaParser;

impl JavaParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JavaParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for JavaParser {
    fn parse(&self, source: &SourceText) -> Result<CompilationUnit> {
        let tree = with_parser(|parser| parser.parse(source.as_str(), None).ok_or(Error::NoTree))?;
        let root = tree.root_node();

        if root.has_error() {
            let (line, column) = first_error(root)
                .map(|node| {
                    let pos = node.start_position();
                    (pos.row + 1, pos.column + 1)
                })
                .unwrap_or((1, 1));
            return Err(Error::Syntax { line, column });
        }

        let mut lowering = Lowering::new(source.as_str());
        lowering.index_tree(root);
        let unit = lowering.lower_program(root);
        debug!(
            "Lowered unit: {} types, {} symbols",
            unit.types.len(),
            lowering.next_symbol
        );
        Ok(unit)
    }
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error)
}

fn span_of(node: Node) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

fn is_comment(node: Node) -> bool {
    node.kind().ends_with("comment")
}

fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !is_comment(*child))
        .collect()
}

fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    named_children(node).into_iter().find(|c| c.kind() == kind)
}

fn children_by_field<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}

fn is_type_decl(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration"
    )
}

fn is_class_body(kind: &str) -> bool {
    matches!(
        kind,
        "class_body" | "interface_body" | "enum_body" | "annotation_type_body"
    )
}

fn is_method_like(kind: &str) -> bool {
    matches!(
        kind,
        "method_declaration" | "constructor_declaration" | "compact_constructor_declaration"
    )
}

fn count_params(node: Node) -> (usize, bool) {
    let Some(params) = node.child_by_field_name("parameters") else {
        return (0, false);
    };
    let params: Vec<_> = named_children(params)
        .into_iter()
        .filter(|p| matches!(p.kind(), "formal_parameter" | "spread_parameter"))
        .collect();
    let varargs = params.last().is_some_and(|p| p.kind() == "spread_parameter");
    (params.len(), varargs)
}

#[derive(Debug)]
struct MethodSig {
    id: MethodId,
    name: String,
    arity: usize,
    varargs: bool,
    constructor: bool,
}

impl MethodSig {
    fn accepts(&self, argc: usize) -> bool {
        if self.varargs {
            argc + 1 >= self.arity
        } else {
            argc == self.arity
        }
    }
}

#[derive(Debug, Default)]
struct ClassInfo {
    fields: HashMap<String, SymbolId>,
    methods: Vec<MethodSig>,
}

/// Ids assigned to members before bodies are lowered
#[derive(Debug, Default)]
struct UnitIndex {
    /// Keyed by the class body node id
    classes: HashMap<usize, ClassInfo>,
    types_by_name: HashMap<String, Vec<usize>>,
    method_ids: HashMap<usize, MethodId>,
    field_ids: HashMap<usize, SymbolId>,
}

enum Scope {
    /// Members of the class whose body has this node id
    Class(usize),
    Vars(HashMap<String, SymbolId>),
}

struct Lowering<'s> {
    source: &'s str,
    index: UnitIndex,
    scopes: Vec<Scope>,
    next_symbol: u32,
    next_method: u32,
    next_node: u32,
}

impl<'s> Lowering<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            index: UnitIndex::default(),
            scopes: Vec::new(),
            next_symbol: 0,
            next_method: 0,
            next_node: 0,
        }
    }

    fn text(&self, node: Node) -> &'s str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    fn ident(&self, node: Node) -> Ident {
        Ident {
            name: self.text(node).to_string(),
            span: span_of(node),
        }
    }

    fn type_ref(&self, node: Node) -> TypeRef {
        TypeRef {
            text: self.text(node).to_string(),
            span: span_of(node),
        }
    }

    fn fresh_symbol(&mut self) -> SymbolId {
        let id = SymbolId(self.next_symbol);
        self.next_symbol += 1;
        id
    }

    fn fresh_method(&mut self) -> MethodId {
        let id = MethodId(self.next_method);
        self.next_method += 1;
        id
    }

    fn fresh_node(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    // ------------------------------------------------------------------
    // Index pass
    // ------------------------------------------------------------------

    fn index_tree(&mut self, node: Node) {
        if is_class_body(node.kind()) {
            self.index_class_body(node);
        }
        for child in named_children(node) {
            self.index_tree(child);
        }
    }

    fn index_class_body(&mut self, body: Node) {
        let mut info = ClassInfo::default();

        let mut members = named_children(body);
        if let Some(decls) = members
            .iter()
            .copied()
            .find(|m| m.kind() == "enum_body_declarations")
        {
            members.extend(named_children(decls));
        }

        for member in members {
            match member.kind() {
                "field_declaration" | "constant_declaration" => {
                    for declarator in children_by_field(member, "declarator") {
                        let Some(name) = declarator.child_by_field_name("name") else {
                            continue;
                        };
                        let id = self.fresh_symbol();
                        self.index.field_ids.insert(declarator.id(), id);
                        info.fields.insert(self.text(name).to_string(), id);
                    }
                }
                kind if is_method_like(kind) => {
                    let id = self.fresh_method();
                    self.index.method_ids.insert(member.id(), id);
                    let (arity, varargs) = count_params(member);
                    let name = member
                        .child_by_field_name("name")
                        .map(|n| self.text(n).to_string())
                        .unwrap_or_default();
                    info.methods.push(MethodSig {
                        id,
                        name,
                        arity,
                        varargs,
                        constructor: kind != "method_declaration",
                    });
                }
                _ => {}
            }
        }

        if let Some(parent) = body.parent() {
            if is_type_decl(parent.kind()) {
                if let Some(name) = parent.child_by_field_name("name") {
                    self.index
                        .types_by_name
                        .entry(self.text(name).to_string())
                        .or_default()
                        .push(body.id());
                }
            }
        }

        self.index.classes.insert(body.id(), info);
    }

    // ------------------------------------------------------------------
    // Scopes and resolution
    // ------------------------------------------------------------------

    fn push_vars(&mut self) {
        self.scopes.push(Scope::Vars(HashMap::new()));
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &str) -> SymbolId {
        let id = self.fresh_symbol();
        if let Some(Scope::Vars(vars)) = self.scopes.last_mut() {
            vars.insert(name.to_string(), id);
        }
        id
    }

    fn lookup_var(&self, name: &str) -> Option<SymbolId> {
        self.scopes.iter().rev().find_map(|scope| match scope {
            Scope::Vars(vars) => vars.get(name).copied(),
            Scope::Class(body) => self.index.classes.get(body)?.fields.get(name).copied(),
        })
    }

    fn nearest_class(&self) -> Option<&ClassInfo> {
        self.scopes.iter().rev().find_map(|scope| match scope {
            Scope::Class(body) => self.index.classes.get(body),
            Scope::Vars(_) => None,
        })
    }

    fn lookup_field(&self, name: &str) -> Option<SymbolId> {
        self.nearest_class()?.fields.get(name).copied()
    }

    fn pick_method<'a>(
        candidates: impl Iterator<Item = &'a MethodSig>,
        argc: usize,
    ) -> Option<MethodId> {
        let applicable: Vec<_> = candidates.filter(|m| m.accepts(argc)).collect();
        match applicable.as_slice() {
            [only] => Some(only.id),
            _ => None,
        }
    }

    /// Resolve an unqualified call; the innermost class declaring the name wins
    fn resolve_call(&self, name: &str, argc: usize) -> Option<MethodId> {
        for scope in self.scopes.iter().rev() {
            let Scope::Class(body) = scope else { continue };
            let Some(info) = self.index.classes.get(body) else {
                continue;
            };
            if info.methods.iter().any(|m| !m.constructor && m.name == name) {
                let candidates = info
                    .methods
                    .iter()
                    .filter(|m| !m.constructor && m.name == name);
                return Self::pick_method(candidates, argc);
            }
        }
        None
    }

    fn resolve_this_call(&self, name: &str, argc: usize) -> Option<MethodId> {
        let info = self.nearest_class()?;
        let candidates = info
            .methods
            .iter()
            .filter(|m| !m.constructor && m.name == name);
        Self::pick_method(candidates, argc)
    }

    fn resolve_constructor_of(&self, body: usize, argc: usize) -> Option<MethodId> {
        let info = self.index.classes.get(&body)?;
        Self::pick_method(info.methods.iter().filter(|m| m.constructor), argc)
    }

    fn resolve_new(&self, ty: &TypeRef, argc: usize) -> Option<MethodId> {
        match self.index.types_by_name.get(ty.simple_name())?.as_slice() {
            [body] => self.resolve_constructor_of(*body, argc),
            _ => None,
        }
    }

    fn resolve_own_constructor(&self, argc: usize) -> Option<MethodId> {
        let body = self.scopes.iter().rev().find_map(|scope| match scope {
            Scope::Class(body) => Some(*body),
            Scope::Vars(_) => None,
        })?;
        self.resolve_constructor_of(body, argc)
    }

    /// Method references carry no arity, so the name alone must be unique
    fn resolve_method_ref(&self, name: &str) -> Option<MethodId> {
        let info = self.nearest_class()?;
        let mut candidates = info
            .methods
            .iter()
            .filter(|m| !m.constructor && m.name == name);
        match (candidates.next(), candidates.next()) {
            (Some(only), None) => Some(only.id),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn lower_program(&mut self, root: Node) -> CompilationUnit {
        let types = named_children(root)
            .into_iter()
            .filter(|child| is_type_decl(child.kind()))
            .map(|child| self.lower_type_decl(child))
            .collect();
        CompilationUnit {
            types,
            span: span_of(root),
        }
    }

    fn lower_modifiers(&self, owner: Node) -> Modifiers {
        let Some(node) = child_of_kind(owner, "modifiers") else {
            return Modifiers::default();
        };
        let mut modifiers = Modifiers::default();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "marker_annotation" | "annotation" => {
                    let name = child
                        .child_by_field_name("name")
                        .map(|n| self.text(n).to_string())
                        .unwrap_or_default();
                    let arguments = child
                        .child_by_field_name("arguments")
                        .map(|a| self.text(a).to_string());
                    modifiers.annotations.push(Annotation {
                        name,
                        arguments,
                        span: span_of(child),
                    });
                }
                kind => {
                    if let Some(keyword) = Modifier::from_keyword(kind) {
                        modifiers.keywords.push(keyword);
                    }
                }
            }
        }
        modifiers
    }

    fn lower_supertypes(&self, node: Node) -> Vec<TypeRef> {
        let mut supertypes = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "superclass" => {
                    supertypes.extend(named_children(child).into_iter().map(|t| self.type_ref(t)));
                }
                "super_interfaces" | "extends_interfaces" => {
                    if let Some(list) = child_of_kind(child, "type_list") {
                        supertypes
                            .extend(named_children(list).into_iter().map(|t| self.type_ref(t)));
                    }
                }
                _ => {}
            }
        }
        supertypes
    }

    fn lower_type_decl(&mut self, node: Node) -> TypeDecl {
        let kind = match node.kind() {
            "interface_declaration" => TypeKind::Interface,
            "enum_declaration" => TypeKind::Enum,
            "record_declaration" => TypeKind::Record,
            "annotation_type_declaration" => TypeKind::Annotation,
            _ => TypeKind::Class,
        };
        let id = self.fresh_node();
        let name = node
            .child_by_field_name("name")
            .map(|n| self.ident(n))
            .unwrap_or_else(|| Ident {
                name: String::new(),
                span: span_of(node),
            });
        let modifiers = self.lower_modifiers(node);
        let supertypes = self.lower_supertypes(node);

        let mut enum_constants = Vec::new();
        let mut members = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            self.scopes.push(Scope::Class(body.id()));
            for child in named_children(body) {
                match child.kind() {
                    "enum_constant" => {
                        let constant = self.lower_enum_constant(child, body.id());
                        enum_constants.push(constant);
                    }
                    "enum_body_declarations" => {
                        for decl in named_children(child) {
                            if let Some(member) = self.lower_member(decl) {
                                members.push(member);
                            }
                        }
                    }
                    _ => {
                        if let Some(member) = self.lower_member(child) {
                            members.push(member);
                        }
                    }
                }
            }
            self.pop_scope();
        }

        TypeDecl {
            id,
            kind,
            name,
            modifiers,
            supertypes,
            enum_constants,
            members,
            span: span_of(node),
        }
    }

    fn lower_enum_constant(&mut self, node: Node, enum_body: usize) -> EnumConstant {
        let id = self.fresh_node();
        let name = node
            .child_by_field_name("name")
            .map(|n| self.ident(n))
            .unwrap_or_else(|| self.ident(node));
        let args = node
            .child_by_field_name("arguments")
            .map(|a| self.lower_args(a));
        let argc = args.as_ref().map_or(0, |a| a.items.len());
        let constructor = self.resolve_constructor_of(enum_body, argc);
        let body = node
            .child_by_field_name("body")
            .or_else(|| child_of_kind(node, "class_body"))
            .map(|b| self.lower_class_body(b));
        EnumConstant {
            id,
            name,
            args,
            constructor,
            body,
            span: span_of(node),
        }
    }

    fn lower_class_body(&mut self, body: Node) -> Vec<Member> {
        self.scopes.push(Scope::Class(body.id()));
        let members = named_children(body)
            .into_iter()
            .filter_map(|child| self.lower_member(child))
            .collect();
        self.pop_scope();
        members
    }

    fn lower_member(&mut self, node: Node) -> Option<Member> {
        match node.kind() {
            "field_declaration" | "constant_declaration" => {
                Some(Member::Field(self.lower_field(node)))
            }
            kind if is_method_like(kind) => Some(Member::Method(self.lower_method(node))),
            kind if is_type_decl(kind) => Some(Member::Type(self.lower_type_decl(node))),
            "block" => Some(Member::Initializer {
                is_static: false,
                body: self.lower_block(node),
            }),
            "static_initializer" => {
                let block = child_of_kind(node, "block")?;
                Some(Member::Initializer {
                    is_static: true,
                    body: self.lower_block(block),
                })
            }
            _ => None,
        }
    }

    fn lower_field(&mut self, node: Node) -> FieldDecl {
        let id = self.fresh_node();
        let modifiers = self.lower_modifiers(node);
        let ty = node
            .child_by_field_name("type")
            .map(|t| self.type_ref(t))
            .unwrap_or_else(|| self.type_ref(node));
        let declarators = children_by_field(node, "declarator")
            .into_iter()
            .map(|declarator| {
                let symbol = match self.index.field_ids.get(&declarator.id()) {
                    Some(symbol) => *symbol,
                    None => self.fresh_symbol(),
                };
                self.lower_declarator(declarator, symbol)
            })
            .collect();
        FieldDecl {
            id,
            modifiers,
            ty,
            declarators,
            span: span_of(node),
        }
    }

    fn lower_declarator(&mut self, node: Node, symbol: SymbolId) -> Declarator {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.ident(n))
            .unwrap_or_else(|| self.ident(node));
        let init = node.child_by_field_name("value").map(|v| self.lower_expr(v));
        Declarator {
            symbol,
            name,
            init,
            span: span_of(node),
        }
    }

    fn lower_method(&mut self, node: Node) -> MethodDecl {
        let id = match self.index.method_ids.get(&node.id()) {
            Some(id) => *id,
            None => self.fresh_method(),
        };
        let kind = if node.kind() == "method_declaration" {
            MethodKind::Method
        } else {
            MethodKind::Constructor
        };
        let modifiers = self.lower_modifiers(node);
        let name = node
            .child_by_field_name("name")
            .map(|n| self.ident(n))
            .unwrap_or_else(|| self.ident(node));
        let return_type = match kind {
            MethodKind::Method => node.child_by_field_name("type").map(|t| self.type_ref(t)),
            MethodKind::Constructor => None,
        };

        self.push_vars();
        let (params, params_span) = match node.child_by_field_name("parameters") {
            Some(list) => (self.lower_formal_params(list), span_of(list)),
            None => (Vec::new(), Span::new(name.span.end, name.span.end)),
        };
        let body = node.child_by_field_name("body").map(|b| self.lower_block(b));
        self.pop_scope();

        MethodDecl {
            id,
            kind,
            modifiers,
            name,
            return_type,
            params,
            params_span,
            body,
            span: span_of(node),
        }
    }

    /// Lower a `formal_parameters` list, declaring each name in the current scope
    fn lower_formal_params(&mut self, list: Node) -> Vec<Param> {
        let mut params = Vec::new();
        for node in named_children(list) {
            let param = match node.kind() {
                "formal_parameter" => {
                    let Some(name) = node.child_by_field_name("name") else {
                        continue;
                    };
                    let ty = node.child_by_field_name("type").map(|t| self.type_ref(t));
                    self.lower_param(node, name, ty, false)
                }
                "spread_parameter" => {
                    let name = child_of_kind(node, "variable_declarator")
                        .and_then(|d| d.child_by_field_name("name"))
                        .or_else(|| node.child_by_field_name("name"));
                    let Some(name) = name else { continue };
                    let ty = named_children(node)
                        .into_iter()
                        .find(|c| {
                            !matches!(c.kind(), "modifiers" | "variable_declarator" | "identifier")
                        })
                        .map(|t| self.type_ref(t));
                    self.lower_param(node, name, ty, true)
                }
                _ => continue,
            };
            params.push(param);
        }
        params
    }

    fn lower_param(&mut self, node: Node, name: Node, ty: Option<TypeRef>, varargs: bool) -> Param {
        let modifiers = self.lower_modifiers(node);
        let name = self.ident(name);
        let symbol = self.declare(&name.name);
        Param {
            symbol,
            modifiers,
            ty,
            name,
            varargs,
            span: span_of(node),
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn lower_block(&mut self, node: Node) -> Block {
        let id = self.fresh_node();
        self.push_vars();
        let stmts = named_children(node)
            .into_iter()
            .map(|child| self.lower_stmt(child))
            .collect();
        self.pop_scope();
        Block {
            id,
            stmts,
            span: span_of(node),
        }
    }

    fn stmt(&mut self, node: Node, kind: StmtKind) -> Stmt {
        Stmt {
            id: self.fresh_node(),
            span: span_of(node),
            kind,
        }
    }

    fn boxed_stmt(&mut self, node: Option<Node>, owner: Node) -> Box<Stmt> {
        match node {
            Some(node) => Box::new(self.lower_stmt(node)),
            None => Box::new(self.stmt(owner, StmtKind::Empty)),
        }
    }

    fn lower_opt_expr(&mut self, node: Option<Node>, owner: Node) -> Expr {
        match node {
            Some(node) => self.lower_expr(node),
            None => self.expr(owner, ExprKind::Other(Vec::new())),
        }
    }

    fn lower_local_var(&mut self, node: Node) -> LocalVar {
        let modifiers = self.lower_modifiers(node);
        let ty = node
            .child_by_field_name("type")
            .map(|t| self.type_ref(t))
            .unwrap_or_else(|| self.type_ref(node));
        let mut declarators = Vec::new();
        for declarator in children_by_field(node, "declarator") {
            let name = declarator
                .child_by_field_name("name")
                .map(|n| self.ident(n))
                .unwrap_or_else(|| self.ident(declarator));
            let init = declarator
                .child_by_field_name("value")
                .map(|v| self.lower_expr(v));
            let symbol = self.declare(&name.name);
            declarators.push(Declarator {
                symbol,
                name,
                init,
                span: span_of(declarator),
            });
        }
        LocalVar {
            modifiers,
            ty,
            declarators,
        }
    }

    fn lower_stmt(&mut self, node: Node) -> Stmt {
        let kind = match node.kind() {
            "block" => StmtKind::Block(self.lower_block(node)),
            "local_variable_declaration" => StmtKind::LocalVar(self.lower_local_var(node)),
            "expression_statement" => {
                let expr = named_children(node).into_iter().next();
                StmtKind::Expr(self.lower_opt_expr(expr, node))
            }
            "explicit_constructor_invocation" => {
                StmtKind::Expr(self.lower_constructor_invocation(node))
            }
            "if_statement" => {
                let cond = self.lower_opt_expr(node.child_by_field_name("condition"), node);
                let then_branch = self.boxed_stmt(node.child_by_field_name("consequence"), node);
                let else_branch = node
                    .child_by_field_name("alternative")
                    .map(|alt| Box::new(self.lower_stmt(alt)));
                StmtKind::If {
                    cond,
                    then_branch,
                    else_branch,
                }
            }
            "while_statement" => {
                let cond = self.lower_opt_expr(node.child_by_field_name("condition"), node);
                let body = self.boxed_stmt(node.child_by_field_name("body"), node);
                StmtKind::While { cond, body }
            }
            "do_statement" => {
                let body = self.boxed_stmt(node.child_by_field_name("body"), node);
                let cond = self.lower_opt_expr(node.child_by_field_name("condition"), node);
                StmtKind::DoWhile { body, cond }
            }
            "for_statement" => self.lower_for(node),
            "enhanced_for_statement" => self.lower_for_each(node),
            "try_statement" | "try_with_resources_statement" => self.lower_try(node),
            "switch_expression" => {
                let selector = self.lower_opt_expr(node.child_by_field_name("condition"), node);
                let body = self.lower_switch_body(node.child_by_field_name("body"), false);
                StmtKind::Switch { selector, body }
            }
            "synchronized_statement" => {
                let lock = named_children(node)
                    .into_iter()
                    .find(|c| c.kind() == "parenthesized_expression");
                let lock = self.lower_opt_expr(lock, node);
                let body = match node.child_by_field_name("body") {
                    Some(body) => self.lower_block(body),
                    None => Block {
                        id: self.fresh_node(),
                        stmts: Vec::new(),
                        span: span_of(node),
                    },
                };
                StmtKind::Synchronized { lock, body }
            }
            "labeled_statement" => {
                let children = named_children(node);
                let label = children
                    .iter()
                    .find(|c| c.kind() == "identifier")
                    .map(|l| self.ident(*l))
                    .unwrap_or_else(|| self.ident(node));
                let body = children.into_iter().find(|c| c.kind() != "identifier");
                let body = self.boxed_stmt(body, node);
                StmtKind::Labeled { label, body }
            }
            "return_statement" => {
                let value = named_children(node).into_iter().next();
                StmtKind::Return(value.map(|v| self.lower_expr(v)))
            }
            "throw_statement" => {
                let value = named_children(node).into_iter().next();
                StmtKind::Throw(self.lower_opt_expr(value, node))
            }
            "yield_statement" => {
                let value = named_children(node).into_iter().next();
                StmtKind::Yield(self.lower_opt_expr(value, node))
            }
            "assert_statement" => {
                let mut exprs = named_children(node).into_iter();
                let cond = exprs.next();
                let cond = self.lower_opt_expr(cond, node);
                let message = exprs.next().map(|m| self.lower_expr(m));
                StmtKind::Assert { cond, message }
            }
            "break_statement" => StmtKind::Break,
            "continue_statement" => StmtKind::Continue,
            kind if is_type_decl(kind) => StmtKind::LocalClass(Box::new(self.lower_type_decl(node))),
            ";" => StmtKind::Empty,
            _ => StmtKind::Other(self.lower_children(node)),
        };
        self.stmt(node, kind)
    }

    fn lower_for(&mut self, node: Node) -> StmtKind {
        self.push_vars();
        let mut init = Vec::new();
        for child in children_by_field(node, "init") {
            if child.kind() == "local_variable_declaration" {
                let var = self.lower_local_var(child);
                init.push(self.stmt(child, StmtKind::LocalVar(var)));
            } else {
                let expr = self.lower_expr(child);
                init.push(self.stmt(child, StmtKind::Expr(expr)));
            }
        }
        let cond = node
            .child_by_field_name("condition")
            .map(|c| self.lower_expr(c));
        let update = children_by_field(node, "update")
            .into_iter()
            .map(|u| self.lower_expr(u))
            .collect();
        let body = self.boxed_stmt(node.child_by_field_name("body"), node);
        self.pop_scope();
        StmtKind::For {
            init,
            cond,
            update,
            body,
        }
    }

    fn lower_for_each(&mut self, node: Node) -> StmtKind {
        let iterable = self.lower_opt_expr(node.child_by_field_name("value"), node);
        self.push_vars();
        let modifiers = self.lower_modifiers(node);
        let ty = node
            .child_by_field_name("type")
            .map(|t| self.type_ref(t))
            .unwrap_or_else(|| self.type_ref(node));
        let mut declarators = Vec::new();
        if let Some(name) = node.child_by_field_name("name") {
            let name = self.ident(name);
            let symbol = self.declare(&name.name);
            declarators.push(Declarator {
                symbol,
                span: name.span,
                name,
                init: None,
            });
        }
        let body = self.boxed_stmt(node.child_by_field_name("body"), node);
        self.pop_scope();
        StmtKind::ForEach {
            var: LocalVar {
                modifiers,
                ty,
                declarators,
            },
            iterable,
            body,
        }
    }

    fn lower_try(&mut self, node: Node) -> StmtKind {
        self.push_vars();
        let mut resources = Vec::new();
        if let Some(spec) = node.child_by_field_name("resources") {
            for resource in named_children(spec) {
                if resource.kind() != "resource" {
                    continue;
                }
                if resource.child_by_field_name("type").is_some() {
                    let modifiers = self.lower_modifiers(resource);
                    let ty = resource
                        .child_by_field_name("type")
                        .map(|t| self.type_ref(t))
                        .unwrap_or_else(|| self.type_ref(resource));
                    let name = resource
                        .child_by_field_name("name")
                        .map(|n| self.ident(n))
                        .unwrap_or_else(|| self.ident(resource));
                    let init = resource
                        .child_by_field_name("value")
                        .map(|v| self.lower_expr(v));
                    let symbol = self.declare(&name.name);
                    resources.push(Resource::Declared(LocalVar {
                        modifiers,
                        ty,
                        declarators: vec![Declarator {
                            symbol,
                            name,
                            init,
                            span: span_of(resource),
                        }],
                    }));
                } else if let Some(expr) = named_children(resource).into_iter().next() {
                    resources.push(Resource::Expr(self.lower_expr(expr)));
                }
            }
        }
        let body = match node.child_by_field_name("body") {
            Some(body) => self.lower_block(body),
            None => Block {
                id: self.fresh_node(),
                stmts: Vec::new(),
                span: span_of(node),
            },
        };
        self.pop_scope();

        let mut catches = Vec::new();
        let mut finally = None;
        for child in named_children(node) {
            match child.kind() {
                "catch_clause" => {
                    if let Some(clause) = self.lower_catch(child) {
                        catches.push(clause);
                    }
                }
                "finally_clause" => {
                    finally = child_of_kind(child, "block").map(|b| self.lower_block(b));
                }
                _ => {}
            }
        }

        StmtKind::Try {
            resources,
            body,
            catches,
            finally,
        }
    }

    fn lower_catch(&mut self, node: Node) -> Option<CatchClause> {
        let formal = child_of_kind(node, "catch_formal_parameter")?;
        let name = formal.child_by_field_name("name")?;
        let ty = child_of_kind(formal, "catch_type").map(|t| self.type_ref(t));
        self.push_vars();
        let param = self.lower_param(formal, name, ty, false);
        let body = match node.child_by_field_name("body") {
            Some(body) => self.lower_block(body),
            None => Block {
                id: self.fresh_node(),
                stmts: Vec::new(),
                span: span_of(node),
            },
        };
        self.pop_scope();
        Some(CatchClause {
            param,
            body,
            span: span_of(node),
        })
    }

    fn lower_switch_body(&mut self, node: Option<Node>, is_expression: bool) -> SwitchBody {
        let id = self.fresh_node();
        let mut cases = Vec::new();
        let Some(node) = node else {
            return SwitchBody { id, cases };
        };

        self.push_vars();
        for group in named_children(node) {
            let mut labels = Vec::new();
            let mut body = Vec::new();
            for child in named_children(group) {
                if child.kind() == "switch_label" {
                    for label in named_children(child) {
                        labels.push(self.lower_case_label(label));
                    }
                    continue;
                }
                if group.kind() == "switch_rule" && child.kind() == "expression_statement" {
                    let value = named_children(child).into_iter().next();
                    let value = self.lower_opt_expr(value, child);
                    let kind = if is_expression {
                        StmtKind::Yield(value)
                    } else {
                        StmtKind::Expr(value)
                    };
                    body.push(self.stmt(child, kind));
                } else {
                    body.push(self.lower_stmt(child));
                }
            }
            cases.push(SwitchCase {
                labels,
                body,
                rule: group.kind() == "switch_rule",
            });
        }
        self.pop_scope();

        SwitchBody { id, cases }
    }

    fn lower_case_label(&mut self, node: Node) -> Expr {
        if matches!(
            node.kind(),
            "pattern" | "type_pattern" | "record_pattern" | "guard"
        ) {
            self.declare_pattern(node);
            if node.kind() == "guard" {
                let children = self.lower_children(node);
                return self.expr(node, ExprKind::Other(children));
            }
            return self.expr(node, ExprKind::Literal);
        }
        self.lower_expr(node)
    }

    /// Declare every binding name inside a pattern
    fn declare_pattern(&mut self, node: Node) {
        match node.kind() {
            "identifier" => {
                let name = self.text(node);
                self.declare(name);
            }
            "guard" => {}
            _ => {
                for child in named_children(node) {
                    self.declare_pattern(child);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn expr(&mut self, node: Node, kind: ExprKind) -> Expr {
        Expr {
            id: self.fresh_node(),
            span: span_of(node),
            kind,
        }
    }

    fn boxed(&mut self, node: Option<Node>, owner: Node) -> Box<Expr> {
        Box::new(self.lower_opt_expr(node, owner))
    }

    fn lower_children(&mut self, node: Node) -> Vec<Expr> {
        named_children(node)
            .into_iter()
            .map(|child| self.lower_expr(child))
            .collect()
    }

    fn lower_args(&mut self, node: Node) -> Args {
        Args {
            items: self.lower_children(node),
            span: span_of(node),
        }
    }

    fn lower_args_field(&mut self, node: Node) -> Args {
        match node.child_by_field_name("arguments") {
            Some(args) => self.lower_args(args),
            None => Args {
                items: Vec::new(),
                span: Span::new(node.end_byte(), node.end_byte()),
            },
        }
    }

    fn lower_constructor_invocation(&mut self, node: Node) -> Expr {
        let delegate = match node.child_by_field_name("constructor").map(|c| c.kind()) {
            Some("this") => ConstructorDelegate::This,
            _ => ConstructorDelegate::Super,
        };
        let args = self.lower_args_field(node);
        let constructor = match delegate {
            ConstructorDelegate::This => self.resolve_own_constructor(args.items.len()),
            ConstructorDelegate::Super => None,
        };
        self.expr(
            node,
            ExprKind::ConstructorCall {
                delegate,
                args,
                constructor,
            },
        )
    }

    fn lower_expr(&mut self, node: Node) -> Expr {
        let kind = match node.kind() {
            "identifier" => {
                let name = self.text(node).to_string();
                let symbol = self.lookup_var(&name);
                ExprKind::Name { name, symbol }
            }
            "this" => ExprKind::This,
            "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal"
            | "decimal_floating_point_literal"
            | "hex_floating_point_literal"
            | "true"
            | "false"
            | "character_literal"
            | "string_literal"
            | "text_block"
            | "null_literal"
            | "class_literal" => ExprKind::Literal,
            "parenthesized_expression" => {
                let inner = named_children(node).into_iter().next();
                ExprKind::Paren(self.boxed(inner, node))
            }
            "field_access" => self.lower_field_access(node),
            "array_access" => {
                let array = self.boxed(node.child_by_field_name("array"), node);
                let index = self.boxed(node.child_by_field_name("index"), node);
                ExprKind::ArrayAccess { array, index }
            }
            "method_invocation" => self.lower_call(node),
            "object_creation_expression" => self.lower_new(node),
            "array_creation_expression" => {
                let dims = named_children(node)
                    .into_iter()
                    .filter(|c| c.kind() == "dimensions_expr")
                    .filter_map(|d| named_children(d).into_iter().last())
                    .map(|d| self.lower_expr(d))
                    .collect();
                let init = node
                    .child_by_field_name("value")
                    .map(|v| Box::new(self.lower_expr(v)));
                ExprKind::NewArray { dims, init }
            }
            "array_initializer" => ExprKind::ArrayInit(self.lower_children(node)),
            "assignment_expression" => {
                let op = node
                    .child_by_field_name("operator")
                    .map(|o| self.text(o).to_string())
                    .unwrap_or_else(|| "=".to_string());
                let target = self.boxed(node.child_by_field_name("left"), node);
                let value = self.boxed(node.child_by_field_name("right"), node);
                if op == "=" {
                    ExprKind::Assign { target, value }
                } else {
                    ExprKind::CompoundAssign { op, target, value }
                }
            }
            "binary_expression" => {
                let op = node
                    .child_by_field_name("operator")
                    .map(|o| self.text(o).to_string())
                    .unwrap_or_default();
                let lhs = self.boxed(node.child_by_field_name("left"), node);
                let rhs = self.boxed(node.child_by_field_name("right"), node);
                ExprKind::Binary { op, lhs, rhs }
            }
            "unary_expression" => {
                let op = match node.child_by_field_name("operator").map(|o| o.kind()) {
                    Some("-") => UnaryOp::Minus,
                    Some("!") => UnaryOp::Not,
                    Some("~") => UnaryOp::BitNot,
                    _ => UnaryOp::Plus,
                };
                let operand = self.boxed(node.child_by_field_name("operand"), node);
                ExprKind::Unary { op, operand }
            }
            "update_expression" => {
                let first = node.child(0).map(|c| c.kind());
                let last = node
                    .child(node.child_count().saturating_sub(1))
                    .map(|c| c.kind());
                let op = match (first, last) {
                    (Some("++"), _) => UnaryOp::PreIncrement,
                    (Some("--"), _) => UnaryOp::PreDecrement,
                    (_, Some("--")) => UnaryOp::PostDecrement,
                    _ => UnaryOp::PostIncrement,
                };
                let operand = named_children(node).into_iter().next();
                let operand = self.boxed(operand, node);
                ExprKind::Unary { op, operand }
            }
            "ternary_expression" => {
                let cond = self.boxed(node.child_by_field_name("condition"), node);
                let then_expr = self.boxed(node.child_by_field_name("consequence"), node);
                let else_expr = self.boxed(node.child_by_field_name("alternative"), node);
                ExprKind::Conditional {
                    cond,
                    then_expr,
                    else_expr,
                }
            }
            "cast_expression" => {
                let ty = node
                    .child_by_field_name("type")
                    .map(|t| self.type_ref(t))
                    .unwrap_or_else(|| self.type_ref(node));
                let expr = self.boxed(node.child_by_field_name("value"), node);
                ExprKind::Cast { ty, expr }
            }
            "instanceof_expression" => {
                let expr = self.boxed(node.child_by_field_name("left"), node);
                let right = node.child_by_field_name("right");
                let ty = right
                    .or_else(|| node.child_by_field_name("pattern"))
                    .map(|t| self.type_ref(t))
                    .unwrap_or_else(|| self.type_ref(node));
                if let Some(binding) = node.child_by_field_name("name") {
                    let name = self.text(binding);
                    self.declare(name);
                }
                if let Some(pattern) = node.child_by_field_name("pattern") {
                    self.declare_pattern(pattern);
                }
                ExprKind::InstanceOf { expr, ty }
            }
            "lambda_expression" => ExprKind::Lambda(Box::new(self.lower_lambda(node))),
            "method_reference" => self.lower_method_ref(node),
            "switch_expression" => {
                let selector = self.boxed(node.child_by_field_name("condition"), node);
                let body = self.lower_switch_body(node.child_by_field_name("body"), true);
                ExprKind::Switch { selector, body }
            }
            kind if kind.ends_with("type")
                || kind.ends_with("type_identifier")
                || kind == "type_arguments"
                || kind == "dimensions" =>
            {
                ExprKind::Literal
            }
            _ => ExprKind::Other(self.lower_children(node)),
        };
        self.expr(node, kind)
    }

    fn lower_field_access(&mut self, node: Node) -> ExprKind {
        let Some(field) = node.child_by_field_name("field") else {
            return ExprKind::Other(self.lower_children(node));
        };
        if field.kind() == "this" {
            return ExprKind::This;
        }
        let object = node.child_by_field_name("object");
        let symbol = match object.map(|o| o.kind()) {
            Some("this") => self.lookup_field(self.text(field)),
            _ => None,
        };
        let target = self.boxed(object, node);
        ExprKind::FieldAccess {
            target,
            field: self.ident(field),
            symbol,
        }
    }

    fn lower_call(&mut self, node: Node) -> ExprKind {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.ident(n))
            .unwrap_or_else(|| self.ident(node));
        let object = node.child_by_field_name("object");
        let target = object.map(|o| Box::new(self.lower_expr(o)));
        let args = self.lower_args_field(node);
        let argc = args.items.len();
        let method = match object.map(|o| o.kind()) {
            None => self.resolve_call(&name.name, argc),
            Some("this") => self.resolve_this_call(&name.name, argc),
            Some(_) => None,
        };
        ExprKind::Call {
            target,
            name,
            args,
            method,
        }
    }

    fn lower_new(&mut self, node: Node) -> ExprKind {
        let ty_node = node.child_by_field_name("type");
        let ty = ty_node
            .map(|t| self.type_ref(t))
            .unwrap_or_else(|| self.type_ref(node));
        let outer = named_children(node)
            .into_iter()
            .next()
            .filter(|first| {
                Some(first.id()) != ty_node.map(|t| t.id())
                    && !matches!(first.kind(), "type_arguments" | "argument_list" | "class_body")
            })
            .map(|o| Box::new(self.lower_expr(o)));
        let args = self.lower_args_field(node);
        let constructor = self.resolve_new(&ty, args.items.len());
        let body = child_of_kind(node, "class_body").map(|b| self.lower_class_body(b));
        ExprKind::New {
            outer,
            ty,
            args,
            body,
            constructor,
        }
    }

    fn lower_lambda(&mut self, node: Node) -> Lambda {
        self.push_vars();
        let mut params = Vec::new();
        if let Some(list) = node.child_by_field_name("parameters") {
            match list.kind() {
                "identifier" => params.push(self.lower_inferred_param(list)),
                "inferred_parameters" => {
                    for name in named_children(list) {
                        if name.kind() == "identifier" {
                            params.push(self.lower_inferred_param(name));
                        }
                    }
                }
                _ => params = self.lower_formal_params(list),
            }
        }
        let body = match node.child_by_field_name("body") {
            Some(body) if body.kind() == "block" => LambdaBody::Block(self.lower_block(body)),
            body => LambdaBody::Expr(self.boxed(body, node)),
        };
        self.pop_scope();
        Lambda { params, body }
    }

    fn lower_inferred_param(&mut self, name: Node) -> Param {
        let ident = self.ident(name);
        let symbol = self.declare(&ident.name);
        Param {
            symbol,
            modifiers: Modifiers::default(),
            ty: None,
            span: ident.span,
            name: ident,
            varargs: false,
        }
    }

    fn lower_method_ref(&mut self, node: Node) -> ExprKind {
        let children = named_children(node);
        let Some(target_node) = children.first().copied() else {
            return ExprKind::Other(Vec::new());
        };
        let name = match children.last().copied() {
            Some(last) if children.len() > 1 && last.kind() == "identifier" => self.ident(last),
            _ => Ident {
                name: "new".to_string(),
                span: Span::new(node.end_byte(), node.end_byte()),
            },
        };
        let method = match target_node.kind() {
            "this" => self.resolve_method_ref(&name.name),
            _ => {
                let target_name = self.text(target_node);
                let own_class = self.index.types_by_name.get(target_name).is_some_and(|bodies| {
                    self.scopes
                        .iter()
                        .any(|s| matches!(s, Scope::Class(body) if bodies.contains(body)))
                });
                if own_class {
                    self.resolve_method_ref(&name.name)
                } else {
                    None
                }
            }
        };
        let target = Box::new(self.lower_expr(target_node));
        ExprKind::MethodRef {
            target,
            name,
            method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> CompilationUnit {
        JavaParser::new()
            .parse(&SourceText::new(source))
            .expect("Failed to parse")
    }

    fn first_method(unit: &CompilationUnit) -> &MethodDecl {
        unit.types[0]
            .members
            .iter()
            .find_map(|m| match m {
                Member::Method(method) => Some(method),
                _ => None,
            })
            .expect("No method")
    }

    #[test]
    fn test_parse_class_with_field_and_method() {
        let unit = parse(
            "class A {\n  private int count = 0;\n  void run(int x) { count = x; }\n}\n",
        );
        assert_eq!(unit.types.len(), 1);
        assert_eq!(unit.types[0].name.name, "A");
        assert_eq!(unit.types[0].members.len(), 2);
        let method = first_method(&unit);
        assert_eq!(method.params.len(), 1);
        assert_eq!(method.params[0].name.name, "x");
    }

    #[test]
    fn test_names_resolve_to_declarations() {
        let unit = parse("class A {\n  void run(int x) {\n    int y = x;\n  }\n}\n");
        let method = first_method(&unit);
        let param = method.params[0].symbol;
        let body = method.body.as_ref().unwrap();
        let StmtKind::LocalVar(var) = &body.stmts[0].kind else {
            panic!("expected local variable");
        };
        let init = var.declarators[0].init.as_ref().unwrap();
        match &init.kind {
            ExprKind::Name { symbol, .. } => assert_eq!(*symbol, Some(param)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_calls_resolve_by_arity() {
        let unit = parse(
            "class A {\n  void run() { helper(1); helper(1, 2); }\n  private void helper(int a) {}\n  private void helper(int a, int b) {}\n}\n",
        );
        let method = first_method(&unit);
        let body = method.body.as_ref().unwrap();
        let resolved: Vec<_> = body
            .stmts
            .iter()
            .map(|s| match &s.kind {
                StmtKind::Expr(Expr {
                    kind: ExprKind::Call { method, .. },
                    ..
                }) => *method,
                _ => None,
            })
            .collect();
        assert!(resolved.iter().all(Option::is_some));
        assert_ne!(resolved[0], resolved[1]);
    }

    #[test]
    fn test_varargs_parameter() {
        let unit = parse("class A {\n  private void log(String fmt, Object... args) {}\n}\n");
        let method = first_method(&unit);
        assert!(method.is_varargs());
        assert_eq!(method.params[1].name.name, "args");
    }

    #[test]
    fn test_native_modifier_is_lowered() {
        let unit = parse("class A {\n  private native void poke(int x);\n}\n");
        let method = first_method(&unit);
        assert!(method.modifiers.has(Modifier::Native));
        assert!(method.body.is_none());
    }

    #[test]
    fn test_syntax_error_is_rejected() {
        let result = JavaParser::new().parse(&SourceText::new("class A { void run( { }"));
        assert!(matches!(result, Err(Error::Syntax { .. })));
    }
}
