//! Throwable property read lowering
//!
//! Reads of the base `message` and `cause` getters become dynamic field reads
//! of the fields the constructor lowering wrote. A getter reached only through
//! synthetic overrides is still the base getter; a source override is left as
//! a call.

use crate::bindings::RuntimeBindings;
use crate::override_search::is_same_or_synthetic_override;
use crate::stats::LoweringStats;
use kiln_ir::transform::walk_expr;
use kiln_ir::{Call, Expr, ExprKind, FunctionId, IrBuilder, IrType, Span, SymbolTable, Transformer};
use tracing::{debug, warn};

/// Rewrites `message` / `cause` getter calls into field reads
pub struct PropertyAccessRewriter<'a> {
    symbols: &'a SymbolTable,
    bindings: &'a RuntimeBindings,
    stats: LoweringStats,
}

impl<'a> PropertyAccessRewriter<'a> {
    /// Create a rewriter
    pub fn new(symbols: &'a SymbolTable, bindings: &'a RuntimeBindings) -> Self {
        Self {
            symbols,
            bindings,
            stats: LoweringStats::default(),
        }
    }

    /// Counts collected so far
    pub fn stats(&self) -> &LoweringStats {
        &self.stats
    }

    /// Consume the rewriter, returning its counts
    pub fn into_stats(self) -> LoweringStats {
        self.stats
    }

    /// Field key read by a call to `target`, if it reads a base getter
    pub fn field_key(&self, target: FunctionId) -> Option<&'a str> {
        let bindings = self.bindings;
        if is_same_or_synthetic_override(self.symbols, target, bindings.message_getter) {
            Some(bindings.keys.message.as_str())
        } else if is_same_or_synthetic_override(self.symbols, target, bindings.cause_getter) {
            Some(bindings.keys.cause.as_str())
        } else {
            None
        }
    }

    fn rewrite_read(&mut self, call: Call, key: &str, ty: IrType, span: Span) -> Expr {
        let Call {
            target,
            dispatch_receiver,
            args,
        } = call;

        let Some(receiver) = dispatch_receiver else {
            warn!(
                span = %span,
                getter = %self.symbols.function_fq_name(target),
                "throwable property read without a receiver left as a call"
            );
            return Expr::new(ExprKind::Call(Call::new(target, args)), ty, span);
        };

        self.stats.property_reads += 1;
        debug!(span = %span, key, "lowered throwable property read");

        let b = IrBuilder::at(span);
        b.call(ty, self.bindings.field_get, None, vec![*receiver, b.string(key)])
    }
}

impl Transformer for PropertyAccessRewriter<'_> {
    fn transform_expr(&mut self, expr: Expr) -> Expr {
        let Expr {
            kind,
            ty,
            span,
            origin,
        } = walk_expr(self, expr);

        match kind {
            ExprKind::Call(call) => match self.field_key(call.target) {
                Some(key) => self.rewrite_read(call, key, ty, span),
                None => Expr {
                    kind: ExprKind::Call(call),
                    ty,
                    span,
                    origin,
                },
            },
            kind => Expr {
                kind,
                ty,
                span,
                origin,
            },
        }
    }
}
