//! Generic traversal over the syntax tree
//!
//! Override the `visit_*` methods for the node families you care about and
//! call the matching `walk_*` function to continue into children.

use super::*;

pub trait Visitor<'ast> {
    fn visit_unit(&mut self, unit: &'ast CompilationUnit) {
        walk_unit(self, unit)
    }

    fn visit_type_decl(&mut self, decl: &'ast TypeDecl) {
        walk_type_decl(self, decl)
    }

    fn visit_enum_constant(&mut self, constant: &'ast EnumConstant) {
        walk_enum_constant(self, constant)
    }

    fn visit_member(&mut self, member: &'ast Member) {
        walk_member(self, member)
    }

    fn visit_field(&mut self, field: &'ast FieldDecl) {
        walk_field(self, field)
    }

    fn visit_method(&mut self, method: &'ast MethodDecl) {
        walk_method(self, method)
    }

    fn visit_param(&mut self, _param: &'ast Param) {}

    fn visit_declarator(&mut self, declarator: &'ast Declarator) {
        walk_declarator(self, declarator)
    }

    fn visit_block(&mut self, block: &'ast Block) {
        walk_block(self, block)
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt)
    }

    fn visit_local_var(&mut self, var: &'ast LocalVar) {
        walk_local_var(self, var)
    }

    fn visit_switch_body(&mut self, body: &'ast SwitchBody) {
        walk_switch_body(self, body)
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr)
    }

    fn visit_lambda(&mut self, lambda: &'ast Lambda) {
        walk_lambda(self, lambda)
    }
}

pub fn walk_unit<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, unit: &'ast CompilationUnit) {
    for decl in &unit.types {
        v.visit_type_decl(decl);
    }
}

pub fn walk_type_decl<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, decl: &'ast TypeDecl) {
    for constant in &decl.enum_constants {
        v.visit_enum_constant(constant);
    }
    for member in &decl.members {
        v.visit_member(member);
    }
}

pub fn walk_enum_constant<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, constant: &'ast EnumConstant) {
    if let Some(args) = &constant.args {
        for arg in &args.items {
            v.visit_expr(arg);
        }
    }
    if let Some(body) = &constant.body {
        for member in body {
            v.visit_member(member);
        }
    }
}

pub fn walk_member<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, member: &'ast Member) {
    match member {
        Member::Field(field) => v.visit_field(field),
        Member::Method(method) => v.visit_method(method),
        Member::Type(decl) => v.visit_type_decl(decl),
        Member::Initializer { body, .. } => v.visit_block(body),
    }
}

pub fn walk_field<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, field: &'ast FieldDecl) {
    for declarator in &field.declarators {
        v.visit_declarator(declarator);
    }
}

pub fn walk_method<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, method: &'ast MethodDecl) {
    for param in &method.params {
        v.visit_param(param);
    }
    if let Some(body) = &method.body {
        v.visit_block(body);
    }
}

pub fn walk_declarator<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, declarator: &'ast Declarator) {
    if let Some(init) = &declarator.init {
        v.visit_expr(init);
    }
}

pub fn walk_block<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, block: &'ast Block) {
    for stmt in &block.stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_local_var<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, var: &'ast LocalVar) {
    for declarator in &var.declarators {
        v.visit_declarator(declarator);
    }
}

pub fn walk_switch_body<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, body: &'ast SwitchBody) {
    for case in &body.cases {
        for label in &case.labels {
            v.visit_expr(label);
        }
        for stmt in &case.body {
            v.visit_stmt(stmt);
        }
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, stmt: &'ast Stmt) {
    match &stmt.kind {
        StmtKind::Block(block) => v.visit_block(block),
        StmtKind::LocalVar(var) => v.visit_local_var(var),
        StmtKind::Expr(expr) | StmtKind::Throw(expr) | StmtKind::Yield(expr) => v.visit_expr(expr),
        StmtKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            v.visit_expr(cond);
            v.visit_stmt(then_branch);
            if let Some(else_branch) = else_branch {
                v.visit_stmt(else_branch);
            }
        }
        StmtKind::While { cond, body } => {
            v.visit_expr(cond);
            v.visit_stmt(body);
        }
        StmtKind::DoWhile { body, cond } => {
            v.visit_stmt(body);
            v.visit_expr(cond);
        }
        StmtKind::For {
            init,
            cond,
            update,
            body,
        } => {
            for stmt in init {
                v.visit_stmt(stmt);
            }
            if let Some(cond) = cond {
                v.visit_expr(cond);
            }
            for expr in update {
                v.visit_expr(expr);
            }
            v.visit_stmt(body);
        }
        StmtKind::ForEach {
            var,
            iterable,
            body,
        } => {
            v.visit_expr(iterable);
            v.visit_local_var(var);
            v.visit_stmt(body);
        }
        StmtKind::Try {
            resources,
            body,
            catches,
            finally,
        } => {
            for resource in resources {
                match resource {
                    Resource::Declared(var) => v.visit_local_var(var),
                    Resource::Expr(expr) => v.visit_expr(expr),
                }
            }
            v.visit_block(body);
            for catch in catches {
                v.visit_param(&catch.param);
                v.visit_block(&catch.body);
            }
            if let Some(finally) = finally {
                v.visit_block(finally);
            }
        }
        StmtKind::Switch { selector, body } => {
            v.visit_expr(selector);
            v.visit_switch_body(body);
        }
        StmtKind::Synchronized { lock, body } => {
            v.visit_expr(lock);
            v.visit_block(body);
        }
        StmtKind::Labeled { body, .. } => v.visit_stmt(body),
        StmtKind::Return(value) => {
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
        StmtKind::Assert { cond, message } => {
            v.visit_expr(cond);
            if let Some(message) = message {
                v.visit_expr(message);
            }
        }
        StmtKind::Break | StmtKind::Continue | StmtKind::Empty => {}
        StmtKind::LocalClass(decl) => v.visit_type_decl(decl),
        StmtKind::Other(children) => {
            for child in children {
                v.visit_expr(child);
            }
        }
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, expr: &'ast Expr) {
    match &expr.kind {
        ExprKind::Literal | ExprKind::Name { .. } | ExprKind::This => {}
        ExprKind::FieldAccess { target, .. } => v.visit_expr(target),
        ExprKind::ArrayAccess { array, index } => {
            v.visit_expr(array);
            v.visit_expr(index);
        }
        ExprKind::Call { target, args, .. } => {
            if let Some(target) = target {
                v.visit_expr(target);
            }
            for arg in &args.items {
                v.visit_expr(arg);
            }
        }
        ExprKind::ConstructorCall { args, .. } => {
            for arg in &args.items {
                v.visit_expr(arg);
            }
        }
        ExprKind::New {
            outer, args, body, ..
        } => {
            if let Some(outer) = outer {
                v.visit_expr(outer);
            }
            for arg in &args.items {
                v.visit_expr(arg);
            }
            if let Some(body) = body {
                for member in body {
                    v.visit_member(member);
                }
            }
        }
        ExprKind::NewArray { dims, init } => {
            for dim in dims {
                v.visit_expr(dim);
            }
            if let Some(init) = init {
                v.visit_expr(init);
            }
        }
        ExprKind::ArrayInit(items) | ExprKind::Other(items) => {
            for item in items {
                v.visit_expr(item);
            }
        }
        ExprKind::Assign { target, value } | ExprKind::CompoundAssign { target, value, .. } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        ExprKind::Unary { operand, .. } => v.visit_expr(operand),
        ExprKind::Binary { lhs, rhs, .. } => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        ExprKind::Conditional {
            cond,
            then_expr,
            else_expr,
        } => {
            v.visit_expr(cond);
            v.visit_expr(then_expr);
            v.visit_expr(else_expr);
        }
        ExprKind::Cast { expr, .. } | ExprKind::InstanceOf { expr, .. } => v.visit_expr(expr),
        ExprKind::Lambda(lambda) => v.visit_lambda(lambda),
        ExprKind::MethodRef { target, .. } => v.visit_expr(target),
        ExprKind::Switch { selector, body } => {
            v.visit_expr(selector);
            v.visit_switch_body(body);
        }
        ExprKind::Paren(inner) => v.visit_expr(inner),
    }
}

pub fn walk_lambda<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, lambda: &'ast Lambda) {
    for param in &lambda.params {
        v.visit_param(param);
    }
    match &lambda.body {
        LambdaBody::Expr(expr) => v.visit_expr(expr),
        LambdaBody::Block(block) => v.visit_block(block),
    }
}
