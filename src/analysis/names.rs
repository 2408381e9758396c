//! Variable names visible around a declaration
//!
//! Renaming a declaration is only safe when the new name is not declared or
//! referenced anywhere the renamed symbol can be seen. The index records
//! every declared variable name and every simple-name reference of the
//! unit, plus the spans of members and top-level types used as lookup
//! regions.

use crate::syntax::visit::{self, Visitor};
use crate::syntax::*;

#[derive(Debug, Default)]
pub struct NameIndex {
    /// Declared variable names and simple-name references
    occurrences: Vec<(String, Span)>,
    /// Methods, constructors, initializer blocks and fields at any depth
    members: Vec<Span>,
    top_level: Vec<Span>,
}

impl NameIndex {
    pub fn scan(unit: &CompilationUnit) -> Self {
        let mut scanner = Scanner {
            index: NameIndex::default(),
            depth: 0,
        };
        scanner.visit_unit(unit);
        scanner.index
    }

    /// Whether `name` already occurs where a declaration at `at` is visible
    ///
    /// Local declarations are looked up in their innermost enclosing member,
    /// fields (`whole_type`) in their top-level type. A position outside
    /// every known region counts as taken.
    pub fn is_taken(&self, name: &str, at: Span, whole_type: bool) -> bool {
        let innermost = |spans: &[Span]| {
            spans
                .iter()
                .filter(|span| span.contains(at))
                .min_by_key(|span| span.len())
                .copied()
        };
        let region = if whole_type {
            innermost(&self.top_level)
        } else {
            innermost(&self.members).or_else(|| innermost(&self.top_level))
        };
        let Some(region) = region else {
            return true;
        };
        self.occurrences
            .iter()
            .any(|(occurrence, span)| occurrence == name && region.contains(*span))
    }
}

struct Scanner {
    index: NameIndex,
    depth: usize,
}

impl Scanner {
    fn record(&mut self, ident: &Ident) {
        self.index
            .occurrences
            .push((ident.name.clone(), ident.span));
    }
}

impl<'ast> Visitor<'ast> for Scanner {
    fn visit_type_decl(&mut self, decl: &'ast TypeDecl) {
        if self.depth == 0 {
            self.index.top_level.push(decl.span);
        }
        self.depth += 1;
        visit::walk_type_decl(self, decl);
        self.depth -= 1;
    }

    fn visit_member(&mut self, member: &'ast Member) {
        match member {
            Member::Field(field) => self.index.members.push(field.span),
            Member::Method(method) => self.index.members.push(method.span),
            Member::Initializer { body, .. } => self.index.members.push(body.span),
            Member::Type(_) => {}
        }
        visit::walk_member(self, member);
    }

    fn visit_param(&mut self, param: &'ast Param) {
        self.record(&param.name);
    }

    fn visit_declarator(&mut self, declarator: &'ast Declarator) {
        self.record(&declarator.name);
        visit::walk_declarator(self, declarator);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        if let ExprKind::Name { name, .. } = &expr.kind {
            self.index.occurrences.push((name.clone(), expr.span));
        }
        visit::walk_expr(self, expr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{JavaParser, Parser};

    fn scan(source: &str) -> NameIndex {
        let unit = JavaParser::new()
            .parse(&SourceText::new(source))
            .expect("Failed to parse");
        NameIndex::scan(&unit)
    }

    fn at(source: &str, needle: &str) -> Span {
        let start = source.find(needle).expect("needle in source");
        Span::new(start, start + needle.len())
    }

    #[test]
    fn test_local_lookup_stays_in_member() {
        let source = "class A {\n  void f(int count) { int _count = 1; }\n  void g() { int total = 0; }\n}\n";
        let index = scan(source);
        let count = at(source, "count)");
        assert!(index.is_taken("_count", count, false));
        assert!(!index.is_taken("total", count, false));
    }

    #[test]
    fn test_references_count_as_taken() {
        let source = "class A {\n  private int limit;\n  int f() { int _limit = 1; return _limit + limit; }\n}\n";
        let index = scan(source);
        assert!(index.is_taken("limit", at(source, "_limit ="), false));
    }

    #[test]
    fn test_field_lookup_covers_whole_type() {
        let source = "class A {\n  private int _x;\n  void f() { int x = 2; }\n}\nclass B {\n  int y;\n}\n";
        let index = scan(source);
        let field = at(source, "_x");
        assert!(index.is_taken("x", field, true));
        assert!(!index.is_taken("y", field, true));
    }

    #[test]
    fn test_lambda_and_catch_parameters() {
        let source = "class A {\n  void f() {\n    Runnable r = () -> {};\n    java.util.function.IntUnaryOperator op = v -> v;\n    try { r.run(); } catch (Exception e) {}\n  }\n}\n";
        let index = scan(source);
        let r = at(source, "r =");
        assert!(index.is_taken("v", r, false));
        assert!(index.is_taken("e", r, false));
    }
}
