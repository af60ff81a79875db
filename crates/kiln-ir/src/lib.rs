//! Kiln backend IR
//!
//! The tree-shaped IR that backend lowering passes operate on after the front
//! end has resolved and type-checked a program.
//!
//! # Structure
//!
//! - [`SymbolTable`] - Whole-program declarations (classes, functions, properties)
//!   together with their override edges. Shared, read-only while passes run.
//! - [`IrFile`] - One compilation unit: function bodies made of [`Statement`]s
//!   and [`Expr`]s. Owned and mutated by exactly one pass invocation at a time.
//! - [`Transformer`] / [`Visitor`] - Consuming rewrite and read-only traversal.
//! - [`IrBuilder`] - Helpers for synthesizing expressions at a source span.
//! - [`PrettyPrint`] - Human-readable dumps for debugging.
//! - [`eval::Evaluator`] - Reference evaluator for lowered trees.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod builder;
pub mod error;
pub mod eval;
pub mod pretty;
pub mod symbols;
pub mod transform;
pub mod tree;
pub mod types;
pub mod visit;

pub use builder::IrBuilder;
pub use error::{EvalError, EvalResult};
pub use pretty::PrettyPrint;
pub use symbols::{
    ClassDecl, ClassId, DeclOrigin, FunctionDecl, FunctionId, FunctionKind,
    FunctionParent, Parameter, PropertyDecl, PropertyId, SymbolTable,
};
pub use transform::Transformer;
pub use tree::{
    Call, Constant, Expr, ExprKind, FileDeclaration, FunctionBody, IrFile, Span, Statement,
    StatementOrigin, ValueRef, Variable, VariableAllocator, VariableId,
};
pub use types::{BuiltinTypes, IrType, TypeKind};
pub use visit::Visitor;
