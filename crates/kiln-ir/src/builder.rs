//! Expression builders
//!
//! [`IrBuilder`] creates nodes positioned at one source span, which is how
//! lowering passes attribute synthesized code to the construct it replaces.

use crate::symbols::{DeclOrigin, FunctionId};
use crate::tree::{
    Call, Constant, Expr, ExprKind, Span, Statement, ValueRef, Variable, VariableAllocator,
};
use crate::types::IrType;

/// Builds IR nodes at a fixed span
#[derive(Debug, Clone, Copy)]
pub struct IrBuilder {
    span: Span,
}

impl IrBuilder {
    /// Builder for nodes attributed to `span`
    pub fn at(span: Span) -> Self {
        Self { span }
    }

    fn expr(&self, kind: ExprKind, ty: IrType) -> Expr {
        Expr::new(kind, ty, self.span)
    }

    /// String constant
    pub fn string(&self, value: impl Into<String>) -> Expr {
        self.expr(ExprKind::Const(Constant::String(value.into())), IrType::string())
    }

    /// Integer constant
    pub fn int(&self, value: i64) -> Expr {
        self.expr(ExprKind::Const(Constant::Int(value)), IrType::int())
    }

    /// `null` of the given type
    pub fn null(&self, ty: IrType) -> Expr {
        self.expr(ExprKind::Const(Constant::Null), ty)
    }

    /// Read a variable, parameter or receiver
    pub fn get_value(&self, value: ValueRef, ty: IrType) -> Expr {
        self.expr(ExprKind::GetValue(value), ty)
    }

    /// Read a declared variable
    pub fn get_variable(&self, var: &Variable) -> Expr {
        self.get_value(ValueRef::Variable(var.id), var.ty)
    }

    /// Direct call
    pub fn call(
        &self,
        ty: IrType,
        target: FunctionId,
        receiver: Option<Expr>,
        args: Vec<Expr>,
    ) -> Expr {
        let call = Call {
            target,
            dispatch_receiver: receiver.map(Box::new),
            args,
        };
        self.expr(ExprKind::Call(call), ty)
    }

    /// Delegating constructor call (`super(...)` / `this(...)`)
    pub fn delegating_call(&self, target: FunctionId, args: Vec<Expr>) -> Expr {
        self.expr(
            ExprKind::DelegatingConstructorCall(Call::new(target, args)),
            IrType::unit(),
        )
    }

    /// Statement sequence
    pub fn composite(&self, ty: IrType, statements: Vec<Statement>) -> Expr {
        self.expr(ExprKind::Composite(statements), ty)
    }

    /// String template
    pub fn string_concat(&self, parts: Vec<Expr>) -> Expr {
        self.expr(ExprKind::StringConcat(parts), IrType::string())
    }

    /// Source-level local variable
    pub fn variable(
        &self,
        vars: &mut VariableAllocator,
        name: impl Into<String>,
        ty: IrType,
        initializer: Option<Expr>,
        mutable: bool,
    ) -> Variable {
        Variable {
            id: vars.fresh(),
            name: name.into(),
            ty,
            initializer,
            mutable,
            origin: DeclOrigin::Source,
        }
    }

    /// Immutable compiler temporary holding `initializer`, typed like it
    pub fn temporary(&self, vars: &mut VariableAllocator, initializer: Expr) -> Variable {
        let id = vars.fresh();
        Variable {
            id,
            name: format!("tmp${}", id.as_u32()),
            ty: initializer.ty,
            initializer: Some(initializer),
            mutable: false,
            origin: DeclOrigin::Other,
        }
    }
}
