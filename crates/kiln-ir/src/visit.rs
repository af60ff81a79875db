//! Read-only traversal over file trees
//!
//! Implement [`Visitor`] and override the hooks of interest; the default of
//! each hook walks into the node's children.

use crate::tree::{Call, Expr, ExprKind, FileDeclaration, FunctionBody, IrFile, Statement};

/// Read-only IR visitor
pub trait Visitor: Sized {
    /// Visit a function body
    fn visit_function(&mut self, body: &FunctionBody) {
        walk_function(self, body);
    }

    /// Visit a statement
    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt);
    }

    /// Visit an expression
    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }
}

/// Visit every function body of a file
pub fn walk_file<V: Visitor>(visitor: &mut V, file: &IrFile) {
    walk_declarations(visitor, &file.declarations);
}

/// Visit a list of file entries
pub fn walk_declarations<V: Visitor>(visitor: &mut V, decls: &[FileDeclaration]) {
    for decl in decls {
        match decl {
            FileDeclaration::Class { members, .. } => walk_declarations(visitor, members),
            FileDeclaration::Function(body) => visitor.visit_function(body),
        }
    }
}

/// Visit the statements of a body
pub fn walk_function<V: Visitor>(visitor: &mut V, body: &FunctionBody) {
    for stmt in &body.statements {
        visitor.visit_statement(stmt);
    }
}

/// Visit the expressions held by a statement
pub fn walk_statement<V: Visitor>(visitor: &mut V, stmt: &Statement) {
    match stmt {
        Statement::Expression(expr) => visitor.visit_expr(expr),
        Statement::Variable(var) => {
            if let Some(init) = &var.initializer {
                visitor.visit_expr(init);
            }
        }
        Statement::Return(Some(expr)) => visitor.visit_expr(expr),
        Statement::Return(None) => {}
    }
}

/// Visit the children of an expression
pub fn walk_expr<V: Visitor>(visitor: &mut V, expr: &Expr) {
    match &expr.kind {
        ExprKind::Const(_) | ExprKind::GetValue(_) => {}
        ExprKind::Call(call) | ExprKind::DelegatingConstructorCall(call) => {
            walk_call(visitor, call)
        }
        ExprKind::Composite(statements) => {
            for stmt in statements {
                visitor.visit_statement(stmt);
            }
        }
        ExprKind::StringConcat(parts) => {
            for part in parts {
                visitor.visit_expr(part);
            }
        }
    }
}

/// Visit the receiver, then the arguments
pub fn walk_call<V: Visitor>(visitor: &mut V, call: &Call) {
    if let Some(recv) = &call.dispatch_receiver {
        visitor.visit_expr(recv);
    }
    for arg in &call.args {
        visitor.visit_expr(arg);
    }
}
