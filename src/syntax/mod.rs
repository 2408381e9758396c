//! Syntax tree facade
//!
//! A resolved, language-neutral syntax tree for one compilation unit.
//! The analysis never looks at concrete syntax: the front end in
//! [`crate::parser`] lowers source into these types and resolves every name
//! it can to a [`SymbolId`] or [`MethodId`].
//!
//! Nodes are plain tagged unions (`StmtKind`, `ExprKind`, `Member`) and are
//! traversed with the [`Visitor`] trait, whose default methods delegate to
//! the exhaustive `walk_*` functions in [`visit`].

mod source;
pub mod visit;

pub use source::SourceText;
pub use visit::Visitor;

use serde::Serialize;

/// Byte range into the unit's source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `other` lies entirely inside this span
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Identity of a declared variable (local, parameter or field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub u32);

/// Identity of a method or constructor declared in the unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MethodId(pub u32);

/// Identity of a statement, expression or scope-bearing node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// A type as written in source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub text: String,
    pub span: Span,
}

impl TypeRef {
    /// The unqualified type name without type arguments or array dimensions
    ///
    /// `java.util.List<String>[]` becomes `List`.
    pub fn simple_name(&self) -> &str {
        let base = self.text.split('<').next().unwrap_or(&self.text);
        let base = base.trim_end_matches(|c: char| c == '[' || c == ']' || c.is_whitespace());
        base.rsplit('.').next().unwrap_or(base).trim()
    }

    /// Match against a simple or fully qualified name
    pub fn matches(&self, name: &str) -> bool {
        let qualified = self.text.split('<').next().unwrap_or(&self.text).trim();
        qualified == name || self.simple_name() == simple_name_of(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Name as written, possibly qualified (`javax.inject.Inject`)
    pub name: String,
    /// Raw argument text including parentheses, if any
    pub arguments: Option<String>,
    pub span: Span,
}

impl Annotation {
    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.name)
    }

    /// Match against a simple or fully qualified annotation name
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.simple_name() == simple_name_of(name)
    }
}

fn simple_name_of(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Native,
    Default,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
    Sealed,
    NonSealed,
}

impl Modifier {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "public" => Modifier::Public,
            "protected" => Modifier::Protected,
            "private" => Modifier::Private,
            "static" => Modifier::Static,
            "final" => Modifier::Final,
            "abstract" => Modifier::Abstract,
            "native" => Modifier::Native,
            "default" => Modifier::Default,
            "synchronized" => Modifier::Synchronized,
            "transient" => Modifier::Transient,
            "volatile" => Modifier::Volatile,
            "strictfp" => Modifier::Strictfp,
            "sealed" => Modifier::Sealed,
            "non-sealed" => Modifier::NonSealed,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub keywords: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
}

impl Modifiers {
    pub fn has(&self, modifier: Modifier) -> bool {
        self.keywords.contains(&modifier)
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.matches(name))
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }
}

/// One parsed source file
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub types: Vec<TypeDecl>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub id: NodeId,
    pub kind: TypeKind,
    pub name: Ident,
    pub modifiers: Modifiers,
    /// `extends` and `implements` clauses
    pub supertypes: Vec<TypeRef>,
    pub enum_constants: Vec<EnumConstant>,
    pub members: Vec<Member>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct EnumConstant {
    pub id: NodeId,
    pub name: Ident,
    pub args: Option<Args>,
    /// Constructor invoked by this constant, when resolvable
    pub constructor: Option<MethodId>,
    pub body: Option<Vec<Member>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
    Type(TypeDecl),
    Initializer { is_static: bool, body: Block },
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub id: NodeId,
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    pub declarators: Vec<Declarator>,
    pub span: Span,
}

/// `name = init` inside a field, local or for-each declaration
#[derive(Debug, Clone)]
pub struct Declarator {
    pub symbol: SymbolId,
    pub name: Ident,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Method,
    Constructor,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub id: MethodId,
    pub kind: MethodKind,
    pub modifiers: Modifiers,
    pub name: Ident,
    pub return_type: Option<TypeRef>,
    pub params: Vec<Param>,
    /// Span of the parameter list including parentheses
    pub params_span: Span,
    pub body: Option<Block>,
    pub span: Span,
}

impl MethodDecl {
    pub fn is_varargs(&self) -> bool {
        self.params.last().is_some_and(|p| p.varargs)
    }
}

#[derive(Debug, Clone)]
pub struct Param {
    pub symbol: SymbolId,
    pub modifiers: Modifiers,
    /// Absent for inferred lambda parameters
    pub ty: Option<TypeRef>,
    pub name: Ident,
    pub varargs: bool,
    pub span: Span,
}

/// Argument list, `span` covers the parentheses
#[derive(Debug, Clone)]
pub struct Args {
    pub items: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub id: NodeId,
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub id: NodeId,
    pub span: Span,
    pub kind: StmtKind,
}

#[derive(Debug, Clone)]
pub struct LocalVar {
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Block(Block),
    LocalVar(LocalVar),
    Expr(Expr),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        cond: Expr,
    },
    For {
        init: Vec<Stmt>,
        cond: Option<Expr>,
        update: Vec<Expr>,
        body: Box<Stmt>,
    },
    ForEach {
        var: LocalVar,
        iterable: Expr,
        body: Box<Stmt>,
    },
    Try {
        resources: Vec<Resource>,
        body: Block,
        catches: Vec<CatchClause>,
        finally: Option<Block>,
    },
    Switch {
        selector: Expr,
        body: SwitchBody,
    },
    Synchronized {
        lock: Expr,
        body: Block,
    },
    Labeled {
        label: Ident,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
    Throw(Expr),
    Yield(Expr),
    Assert {
        cond: Expr,
        message: Option<Expr>,
    },
    Break,
    Continue,
    Empty,
    LocalClass(Box<TypeDecl>),
    /// Unsupported statement; children are still walked
    Other(Vec<Expr>),
}

#[derive(Debug, Clone)]
pub enum Resource {
    Declared(LocalVar),
    Expr(Expr),
}

#[derive(Debug, Clone)]
pub struct CatchClause {
    pub param: Param,
    pub body: Block,
    pub span: Span,
}

/// Body of a switch statement or expression; one scope for all groups
#[derive(Debug, Clone)]
pub struct SwitchBody {
    pub id: NodeId,
    pub cases: Vec<SwitchCase>,
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub labels: Vec<Expr>,
    pub body: Vec<Stmt>,
    /// `case X -> ...` form, whose single body statement cannot be removed
    pub rule: bool,
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
    Plus,
    Minus,
    Not,
    BitNot,
}

impl UnaryOp {
    pub fn is_increment(&self) -> bool {
        matches!(
            self,
            UnaryOp::PreIncrement
                | UnaryOp::PreDecrement
                | UnaryOp::PostIncrement
                | UnaryOp::PostDecrement
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructorDelegate {
    This,
    Super,
}

#[derive(Debug, Clone)]
pub struct Lambda {
    pub params: Vec<Param>,
    pub body: LambdaBody,
}

#[derive(Debug, Clone)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Block),
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Literal,
    Name {
        name: String,
        symbol: Option<SymbolId>,
    },
    This,
    FieldAccess {
        target: Box<Expr>,
        field: Ident,
        symbol: Option<SymbolId>,
    },
    ArrayAccess {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        target: Option<Box<Expr>>,
        name: Ident,
        args: Args,
        method: Option<MethodId>,
    },
    ConstructorCall {
        delegate: ConstructorDelegate,
        args: Args,
        constructor: Option<MethodId>,
    },
    New {
        outer: Option<Box<Expr>>,
        ty: TypeRef,
        args: Args,
        body: Option<Vec<Member>>,
        constructor: Option<MethodId>,
    },
    NewArray {
        dims: Vec<Expr>,
        init: Option<Box<Expr>>,
    },
    ArrayInit(Vec<Expr>),
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    CompoundAssign {
        op: String,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: String,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Conditional {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    Cast {
        ty: TypeRef,
        expr: Box<Expr>,
    },
    InstanceOf {
        expr: Box<Expr>,
        ty: TypeRef,
    },
    Lambda(Box<Lambda>),
    MethodRef {
        target: Box<Expr>,
        name: Ident,
        method: Option<MethodId>,
    },
    Switch {
        selector: Box<Expr>,
        body: SwitchBody,
    },
    Paren(Box<Expr>),
    /// Unsupported expression; children are still walked
    Other(Vec<Expr>),
}

impl Expr {
    /// Strip any number of enclosing parentheses
    pub fn unparenthesized(&self) -> &Expr {
        let mut expr = self;
        while let ExprKind::Paren(inner) = &expr.kind {
            expr = inner;
        }
        expr
    }

    /// Expression kinds that may stand alone as a statement
    pub fn is_statement_expression(&self) -> bool {
        match &self.unparenthesized().kind {
            ExprKind::Assign { .. }
            | ExprKind::CompoundAssign { .. }
            | ExprKind::Call { .. }
            | ExprKind::New { .. } => true,
            ExprKind::Unary { op, .. } => op.is_increment(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_ref(text: &str) -> TypeRef {
        TypeRef {
            text: text.to_string(),
            span: Span::default(),
        }
    }

    #[test]
    fn test_simple_type_name() {
        assert_eq!(type_ref("java.util.List<String>").simple_name(), "List");
        assert_eq!(type_ref("int[]").simple_name(), "int");
        assert_eq!(type_ref("Logger").simple_name(), "Logger");
    }

    #[test]
    fn test_type_matches_qualified_or_simple() {
        let ty = type_ref("org.slf4j.Logger");
        assert!(ty.matches("org.slf4j.Logger"));
        assert!(ty.matches("Logger"));
        assert!(type_ref("Logger").matches("org.slf4j.Logger"));
        assert!(!ty.matches("LoggerFactory"));
    }

    #[test]
    fn test_annotation_matches() {
        let ann = Annotation {
            name: "Mock".to_string(),
            arguments: None,
            span: Span::default(),
        };
        assert!(ann.matches("org.mockito.Mock"));
        assert!(!ann.matches("org.mockito.Spy"));
    }

    #[test]
    fn test_span_contains() {
        let outer = Span::new(10, 50);
        assert!(outer.contains(Span::new(10, 20)));
        assert!(!outer.contains(Span::new(5, 20)));
        assert_eq!(outer.len(), 40);
    }
}
