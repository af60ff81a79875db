//! Post-lowering checks
//!
//! Finds nodes that should not survive the throwable lowering: calls to a
//! base-class constructor that the lowering did not emit itself, and base
//! getter reads that still have a receiver.

use crate::bindings::RuntimeBindings;
use crate::override_search::is_same_or_synthetic_override;
use kiln_ir::visit::{walk_expr, walk_file};
use kiln_ir::{Expr, ExprKind, FunctionId, IrFile, Span, StatementOrigin, SymbolTable, Visitor};
use thiserror::Error;

/// A node left behind by the lowering
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// A base-class constructor call that is not a lowered allocation
    #[error("{span}: unlowered throwable constructor call to {target}")]
    ConstructorCall {
        /// Location
        span: Span,
        /// Called constructor
        target: FunctionId,
    },

    /// A `message` / `cause` getter call with a receiver
    #[error("{span}: unlowered throwable property read via {target}")]
    PropertyRead {
        /// Location
        span: Span,
        /// Called getter
        target: FunctionId,
    },
}

struct ViolationFinder<'a> {
    symbols: &'a SymbolTable,
    bindings: &'a RuntimeBindings,
    found: Vec<Violation>,
}

impl ViolationFinder<'_> {
    fn reads_base_getter(&self, target: FunctionId) -> bool {
        is_same_or_synthetic_override(self.symbols, target, self.bindings.message_getter)
            || is_same_or_synthetic_override(self.symbols, target, self.bindings.cause_getter)
    }
}

impl Visitor for ViolationFinder<'_> {
    fn visit_expr(&mut self, expr: &Expr) {
        let lowered = expr.origin == Some(StatementOrigin::LoweredThrowableAllocation);
        match &expr.kind {
            ExprKind::Call(call) | ExprKind::DelegatingConstructorCall(call)
                if !lowered && self.bindings.is_throwable_constructor(call.target) =>
            {
                self.found.push(Violation::ConstructorCall {
                    span: expr.span,
                    target: call.target,
                });
            }
            ExprKind::Call(call)
                if call.dispatch_receiver.is_some() && self.reads_base_getter(call.target) =>
            {
                self.found.push(Violation::PropertyRead {
                    span: expr.span,
                    target: call.target,
                });
            }
            _ => {}
        }
        walk_expr(self, expr);
    }
}

/// Collect every violation in `file`, in traversal order
pub fn find_violations(symbols: &SymbolTable, bindings: &RuntimeBindings, file: &IrFile) -> Vec<Violation> {
    let mut finder = ViolationFinder {
        symbols,
        bindings,
        found: Vec::new(),
    };
    walk_file(&mut finder, file);
    finder.found
}
