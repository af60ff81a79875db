//! Throwable construction lowering
//!
//! The target runtime allocates throwables through a single zero-argument
//! constructor and stores `message`, `cause` and `name` as dynamic fields. Every
//! call to a base-class constructor is therefore rewritten into:
//!
//! ```text
//! val tmp$0 = <arg0>                       // one temporary per argument
//! val tmp$1 = <arg1>
//! val tmp$2 = Throwable.<init>()           // or: delegate Throwable.<init>()
//! jsSetJSField(tmp$2, "message", <message>)
//! jsSetJSField(tmp$2, "cause", <cause>)
//! jsSetJSField(tmp$2, "name", "<class name>")
//! captureStack(tmp$2)
//! tmp$2                                     // direct construction only
//! ```
//!
//! How `message` and `cause` derive from the arguments depends on their
//! number and, for a single argument, on whether it is itself a throwable.

use crate::bindings::RuntimeBindings;
use crate::stats::LoweringStats;
use kiln_ir::transform::{walk_expr, walk_function};
use kiln_ir::{
    Call, ClassId, Expr, ExprKind, FunctionBody, FunctionId, IrBuilder, IrType, Span, Statement,
    StatementOrigin, SymbolTable, Transformer, ValueRef, Variable, VariableAllocator,
};
use tracing::{debug, warn};

/// Rewrites base-class constructions and `super(...)` calls
pub struct ConstructorRewriter<'a> {
    symbols: &'a SymbolTable,
    bindings: &'a RuntimeBindings,
    variables: &'a mut VariableAllocator,
    /// Function whose body is being walked
    current_function: Option<FunctionId>,
    stats: LoweringStats,
}

/// Message and cause values plus the statements binding the arguments
struct ExtractedArguments {
    message: Expr,
    cause: Expr,
    temporaries: Vec<Statement>,
}

impl<'a> ConstructorRewriter<'a> {
    /// Create a rewriter drawing temporaries from `variables`
    pub fn new(
        symbols: &'a SymbolTable,
        bindings: &'a RuntimeBindings,
        variables: &'a mut VariableAllocator,
    ) -> Self {
        Self {
            symbols,
            bindings,
            variables,
            current_function: None,
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

    /// `Throwable(...)` becomes an allocation bound to a temporary, the field
    /// initialization, and a read of the temporary.
    fn lower_construction(&mut self, call: Call, ty: IrType, span: Span) -> Expr {
        let b = IrBuilder::at(span);
        let arg_count = call.args.len();
        let ExtractedArguments {
            message,
            cause,
            mut temporaries,
        } = self.extract_arguments(call.args, span);

        let allocation = b
            .call(ty, self.bindings.default_constructor, None, vec![])
            .with_origin(StatementOrigin::LoweredThrowableAllocation);
        let instance = b.temporary(self.variables, allocation);
        let (instance_id, instance_ty) = (instance.id, instance.ty);
        let receiver = || b.get_value(ValueRef::Variable(instance_id), instance_ty);

        let name = b.string(self.bindings.throwable_name.as_str());
        let fill = self.fill_instance(b, &receiver, message, cause, name);

        temporaries.push(instance.into());
        temporaries.extend(fill);
        temporaries.push(receiver().into());

        self.stats.constructor_calls += 1;
        debug!(
            span = %span,
            args = arg_count,
            instance = %instance_id,
            "lowered throwable construction"
        );

        b.composite(ty, temporaries)
            .with_origin(StatementOrigin::LoweredThrowableInit)
    }

    /// `super(...)` becomes `super()` followed by field initialization on `this`
    fn lower_delegation(&mut self, call: Call, ty: IrType, span: Span) -> Expr {
        let b = IrBuilder::at(span);
        let arg_count = call.args.len();
        let ExtractedArguments {
            message,
            cause,
            mut temporaries,
        } = self.extract_arguments(call.args, span);

        let (class, class_name) = match self.enclosing_class() {
            Some(class) => (class, self.symbols.class(class).name.clone()),
            None => {
                warn!(
                    span = %span,
                    "delegating throwable constructor call outside a constructor body"
                );
                (self.bindings.throwable, self.bindings.throwable_name.clone())
            }
        };

        let delegation = Expr::new(
            ExprKind::DelegatingConstructorCall(Call::new(self.bindings.default_constructor, vec![])),
            ty,
            span,
        )
        .with_origin(StatementOrigin::LoweredThrowableAllocation);
        let receiver = || b.get_value(ValueRef::This(class), IrType::class(class));

        let name = b.string(class_name.as_str());
        let fill = self.fill_instance(b, &receiver, message, cause, name);

        temporaries.push(delegation.into());
        temporaries.extend(fill);

        self.stats.delegating_calls += 1;
        debug!(
            span = %span,
            args = arg_count,
            class = %class_name,
            "lowered throwable delegation"
        );

        b.composite(ty, temporaries)
            .with_origin(StatementOrigin::LoweredThrowableInit)
    }

    /// Class whose constructor body is being walked
    fn enclosing_class(&self) -> Option<ClassId> {
        let decl = self.symbols.function(self.current_function?);
        if decl.is_constructor() {
            decl.parent_class()
        } else {
            None
        }
    }

    /// Bind every argument to a temporary, in order, and derive message and
    /// cause from the temporaries
    fn extract_arguments(&mut self, args: Vec<Expr>, span: Span) -> ExtractedArguments {
        let b = IrBuilder::at(span);
        let null = || b.null(self.bindings.types.nothing_n);

        let bound: Vec<Variable> = args
            .into_iter()
            .map(|arg| b.temporary(self.variables, arg))
            .collect();

        let (message, cause) = match bound.as_slice() {
            [] => (null(), null()),
            [message, cause] => (b.get_variable(message), b.get_variable(cause)),
            [arg] if self.bindings.is_throwable_type(self.symbols, arg.ty) => {
                let to_string = b.call(
                    self.bindings.types.string,
                    self.bindings.to_string,
                    Some(b.get_variable(arg)),
                    vec![],
                );
                (to_string, b.get_variable(arg))
            }
            [arg] => (b.get_variable(arg), null()),
            [first, ..] => {
                warn!(
                    span = %span,
                    args = bound.len(),
                    "unexpected throwable constructor arity, using the first argument as message"
                );
                self.stats.fallback_shapes += 1;
                (b.get_variable(first), null())
            }
        };

        ExtractedArguments {
            message,
            cause,
            temporaries: bound.into_iter().map(Statement::from).collect(),
        }
    }

    /// Set message, cause and name, then capture the stack
    fn fill_instance(
        &self,
        b: IrBuilder,
        receiver: &dyn Fn() -> Expr,
        message: Expr,
        cause: Expr,
        name: Expr,
    ) -> Vec<Statement> {
        let keys = &self.bindings.keys;
        let set = |key: &str, value: Expr| -> Statement {
            b.call(
                self.bindings.types.unit,
                self.bindings.field_set,
                None,
                vec![receiver(), b.string(key), value],
            )
            .into()
        };

        vec![
            set(keys.message.as_str(), message),
            set(keys.cause.as_str(), cause),
            set(keys.name.as_str(), name),
            b.call(
                self.bindings.types.unit,
                self.bindings.capture_stack,
                None,
                vec![receiver()],
            )
            .into(),
        ]
    }
}

impl Transformer for ConstructorRewriter<'_> {
    fn transform_function(&mut self, body: &mut FunctionBody) {
        let outer = self.current_function.replace(body.function);
        walk_function(self, body);
        self.current_function = outer;
    }

    fn transform_expr(&mut self, expr: Expr) -> Expr {
        let expr = walk_expr(self, expr);
        if expr.origin == Some(StatementOrigin::LoweredThrowableAllocation) {
            return expr;
        }

        let Expr {
            kind,
            ty,
            span,
            origin,
        } = expr;
        match kind {
            ExprKind::Call(call) if self.bindings.is_throwable_constructor(call.target) => {
                self.lower_construction(call, ty, span)
            }
            ExprKind::DelegatingConstructorCall(call)
                if self.bindings.is_throwable_constructor(call.target) =>
            {
                self.lower_delegation(call, ty, span)
            }
            kind => Expr {
                kind,
                ty,
                span,
                origin,
            },
        }
    }
}
