//! Pretty-printing for IR
//!
//! Provides human-readable output for debugging IR trees. Names are resolved
//! through the [`SymbolTable`], so every printer takes one.

use crate::symbols::SymbolTable;
use crate::tree::{
    Expr, ExprKind, FileDeclaration, FunctionBody, IrFile, Statement, StatementOrigin, ValueRef,
};
use crate::types::{IrType, TypeKind};

/// Trait for pretty-printing IR constructs
pub trait PrettyPrint {
    /// Render `self` using `symbols` for names
    fn pretty_print(&self, symbols: &SymbolTable) -> String;
}

impl PrettyPrint for IrFile {
    fn pretty_print(&self, symbols: &SymbolTable) -> String {
        let mut output = format!("file {}\n", self.name);
        for decl in &self.declarations {
            print_declaration(symbols, decl, 0, &mut output);
        }
        output
    }
}

impl PrettyPrint for FunctionBody {
    fn pretty_print(&self, symbols: &SymbolTable) -> String {
        let mut output = String::new();
        print_function(symbols, self, 0, &mut output);
        output
    }
}

impl PrettyPrint for Statement {
    fn pretty_print(&self, symbols: &SymbolTable) -> String {
        format_statement(symbols, self)
    }
}

impl PrettyPrint for Expr {
    fn pretty_print(&self, symbols: &SymbolTable) -> String {
        format_expr(symbols, self)
    }
}

fn print_declaration(symbols: &SymbolTable, decl: &FileDeclaration, indent: usize, out: &mut String) {
    match decl {
        FileDeclaration::Class { class, members } => {
            let prefix = "  ".repeat(indent);
            out.push_str(&format!("{}class {} {{\n", prefix, symbols.class(*class).fq_name()));
            for member in members {
                print_declaration(symbols, member, indent + 1, out);
            }
            out.push_str(&format!("{}}}\n", prefix));
        }
        FileDeclaration::Function(body) => print_function(symbols, body, indent, out),
    }
}

fn print_function(symbols: &SymbolTable, body: &FunctionBody, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let decl = symbols.function(body.function);
    let params: Vec<String> = decl
        .params
        .iter()
        .map(|p| format!("{}: {}", p.name, format_type(symbols, p.ty)))
        .collect();

    out.push_str(&format!(
        "{}fun {}({}): {} {{\n",
        prefix,
        symbols.function_fq_name(body.function),
        params.join(", "),
        format_type(symbols, decl.return_type)
    ));
    for stmt in &body.statements {
        out.push_str(&format!("{}  {}\n", prefix, format_statement(symbols, stmt)));
    }
    out.push_str(&format!("{}}}\n", prefix));
}

fn format_statement(symbols: &SymbolTable, stmt: &Statement) -> String {
    match stmt {
        Statement::Expression(expr) => format_expr(symbols, expr),
        Statement::Variable(var) => {
            let keyword = if var.mutable { "var" } else { "val" };
            let mut text = format!(
                "{} {} ({}): {}",
                keyword,
                var.id,
                var.name,
                format_type(symbols, var.ty)
            );
            if let Some(init) = &var.initializer {
                text.push_str(" = ");
                text.push_str(&format_expr(symbols, init));
            }
            text
        }
        Statement::Return(Some(expr)) => format!("return {}", format_expr(symbols, expr)),
        Statement::Return(None) => "return".to_string(),
    }
}

fn format_expr(symbols: &SymbolTable, expr: &Expr) -> String {
    let text = match &expr.kind {
        ExprKind::Const(c) => c.to_string(),
        ExprKind::GetValue(ValueRef::Variable(id)) => id.to_string(),
        ExprKind::GetValue(ValueRef::Parameter(index)) => format!("param#{}", index),
        ExprKind::GetValue(ValueRef::This(class)) => format!("this@{}", symbols.class(*class).name),
        ExprKind::Call(call) => {
            let args = format_args(symbols, &call.args);
            let target = symbols.function_fq_name(call.target);
            match &call.dispatch_receiver {
                Some(recv) => format!("{}.{}({})", format_expr(symbols, recv), target, args),
                None => format!("{}({})", target, args),
            }
        }
        ExprKind::DelegatingConstructorCall(call) => format!(
            "delegate {}({})",
            symbols.function_fq_name(call.target),
            format_args(symbols, &call.args)
        ),
        ExprKind::Composite(statements) => {
            let parts: Vec<String> = statements
                .iter()
                .map(|stmt| format_statement(symbols, stmt))
                .collect();
            format!("composite: {} {{ {} }}", format_type(symbols, expr.ty), parts.join("; "))
        }
        ExprKind::StringConcat(parts) => format!("concat({})", format_args(symbols, parts)),
    };

    match expr.origin {
        Some(StatementOrigin::LoweredThrowableAllocation) => format!("{} /*lowered*/", text),
        _ => text,
    }
}

fn format_args(symbols: &SymbolTable, args: &[Expr]) -> String {
    args.iter()
        .map(|arg| format_expr(symbols, arg))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a type with class names resolved
pub fn format_type(symbols: &SymbolTable, ty: IrType) -> String {
    match ty.kind {
        TypeKind::Class(class) => {
            let name = &symbols.class(class).name;
            if ty.nullable {
                format!("{}?", name)
            } else {
                name.clone()
            }
        }
        _ => ty.to_string(),
    }
}
