//! Rewriting traversal over file trees
//!
//! [`Transformer`] takes every statement and expression by value and returns
//! its replacement, so a rewrite is an explicit ownership transfer: the old
//! subtree is consumed and the new one takes its place. Each hook defaults to
//! the matching `walk_*` function, which rebuilds the node after transforming
//! its children in evaluation order.
//!
//! # Example
//!
//! ```rust,ignore
//! struct DropStrings;
//!
//! impl Transformer for DropStrings {
//!     fn transform_expr(&mut self, expr: Expr) -> Expr {
//!         let expr = walk_expr(self, expr);
//!         match expr.kind {
//!             ExprKind::Const(Constant::String(_)) => IrBuilder::at(expr.span).null(expr.ty),
//!             _ => expr,
//!         }
//!     }
//! }
//! ```

use crate::tree::{Call, Expr, ExprKind, FileDeclaration, FunctionBody, Statement, Variable};

/// Consuming IR transformer
pub trait Transformer: Sized {
    /// Transform a top-level or member entry in place
    fn transform_declaration(&mut self, decl: &mut FileDeclaration) {
        walk_declaration(self, decl);
    }

    /// Transform a function body in place
    fn transform_function(&mut self, body: &mut FunctionBody) {
        walk_function(self, body);
    }

    /// Transform a statement
    fn transform_statement(&mut self, stmt: Statement) -> Statement {
        walk_statement(self, stmt)
    }

    /// Transform an expression
    fn transform_expr(&mut self, expr: Expr) -> Expr {
        walk_expr(self, expr)
    }
}

/// Run `transformer` over a list of file entries
pub fn transform_declarations<T: Transformer>(transformer: &mut T, decls: &mut [FileDeclaration]) {
    for decl in decls {
        transformer.transform_declaration(decl);
    }
}

/// Transform the members of a class, or the body of a function
pub fn walk_declaration<T: Transformer>(transformer: &mut T, decl: &mut FileDeclaration) {
    match decl {
        FileDeclaration::Class { members, .. } => transform_declarations(transformer, members),
        FileDeclaration::Function(body) => transformer.transform_function(body),
    }
}

/// Transform every statement of a body
pub fn walk_function<T: Transformer>(transformer: &mut T, body: &mut FunctionBody) {
    let statements = std::mem::take(&mut body.statements);
    body.statements = statements
        .into_iter()
        .map(|stmt| transformer.transform_statement(stmt))
        .collect();
}

/// Transform the expressions held by a statement
pub fn walk_statement<T: Transformer>(transformer: &mut T, stmt: Statement) -> Statement {
    match stmt {
        Statement::Expression(expr) => Statement::Expression(transformer.transform_expr(expr)),
        Statement::Variable(var) => Statement::Variable(walk_variable(transformer, var)),
        Statement::Return(value) => {
            Statement::Return(value.map(|expr| transformer.transform_expr(expr)))
        }
    }
}

/// Transform a variable's initializer
pub fn walk_variable<T: Transformer>(transformer: &mut T, var: Variable) -> Variable {
    Variable {
        initializer: var.initializer.map(|init| transformer.transform_expr(init)),
        ..var
    }
}

/// Transform the children of an expression and rebuild it
pub fn walk_expr<T: Transformer>(transformer: &mut T, expr: Expr) -> Expr {
    let Expr {
        kind,
        ty,
        span,
        origin,
    } = expr;

    let kind = match kind {
        ExprKind::Call(call) => ExprKind::Call(walk_call(transformer, call)),
        ExprKind::DelegatingConstructorCall(call) => {
            ExprKind::DelegatingConstructorCall(walk_call(transformer, call))
        }
        ExprKind::Composite(statements) => ExprKind::Composite(
            statements
                .into_iter()
                .map(|stmt| transformer.transform_statement(stmt))
                .collect(),
        ),
        ExprKind::StringConcat(parts) => ExprKind::StringConcat(
            parts
                .into_iter()
                .map(|part| transformer.transform_expr(part))
                .collect(),
        ),
        leaf @ (ExprKind::Const(_) | ExprKind::GetValue(_)) => leaf,
    };

    Expr {
        kind,
        ty,
        span,
        origin,
    }
}

/// Transform the receiver, then the arguments left to right
pub fn walk_call<T: Transformer>(transformer: &mut T, call: Call) -> Call {
    let Call {
        target,
        dispatch_receiver,
        args,
    } = call;

    let dispatch_receiver = dispatch_receiver.map(|recv| Box::new(transformer.transform_expr(*recv)));
    let args = args
        .into_iter()
        .map(|arg| transformer.transform_expr(arg))
        .collect();

    Call {
        target,
        dispatch_receiver,
        args,
    }
}
