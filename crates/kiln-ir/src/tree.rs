//! Per-file IR trees
//!
//! An [`IrFile`] holds the bodies of the functions declared in one compilation
//! unit. Every node is exclusively owned by its parent: rewriting a subtree
//! means taking it out and putting a replacement back, never sharing a node
//! between two parents.

use crate::symbols::{ClassId, DeclOrigin, FunctionId};
use crate::types::IrType;
use std::fmt;

/// Source range covered by a node (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start offset
    pub start: u32,
    /// End offset (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a span
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Local variable identifier, unique within one [`IrFile`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub u32);

impl VariableId {
    /// Create a new variable ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Hands out file-unique variable ids
#[derive(Debug, Clone, Default)]
pub struct VariableAllocator {
    next: u32,
}

impl VariableAllocator {
    /// Create an allocator starting at `v0`
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh id
    pub fn fresh(&mut self) -> VariableId {
        let id = VariableId::new(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    pub fn allocated(&self) -> u32 {
        self.next
    }
}

/// Marks expressions synthesized by a lowering pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementOrigin {
    /// Zero-argument allocation of a throwable, already followed by explicit
    /// field initialization
    LoweredThrowableAllocation,
    /// The composite replacing a throwable construction
    LoweredThrowableInit,
}

/// Constant values
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// `null`
    Null,
    /// Integer literal
    Int(i64),
    /// String literal
    String(String),
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Null => write!(f, "null"),
            Constant::Int(v) => write!(f, "{}", v),
            Constant::String(s) => write!(f, "\"{}\"", s.escape_default()),
        }
    }
}

/// Something a `GetValue` can read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueRef {
    /// A local variable
    Variable(VariableId),
    /// A value parameter of the enclosing function, by position
    Parameter(u32),
    /// The `this` receiver of the given class
    This(ClassId),
}

/// A call-like node: target declaration plus positional arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// Called function or constructor
    pub target: FunctionId,
    /// Receiver for member calls
    pub dispatch_receiver: Option<Box<Expr>>,
    /// Positional value arguments
    pub args: Vec<Expr>,
}

impl Call {
    /// Create a call without a dispatch receiver
    pub fn new(target: FunctionId, args: Vec<Expr>) -> Self {
        Self {
            target,
            dispatch_receiver: None,
            args,
        }
    }

    /// Set the dispatch receiver
    pub fn with_receiver(mut self, receiver: Expr) -> Self {
        self.dispatch_receiver = Some(Box::new(receiver));
        self
    }
}

/// Expression shapes
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A constant
    Const(Constant),
    /// Read a variable, parameter or receiver
    GetValue(ValueRef),
    /// Direct call, including `new`-style constructor calls
    Call(Call),
    /// A constructor delegating to another constructor (`super(...)`)
    DelegatingConstructorCall(Call),
    /// A statement sequence evaluating to its last expression statement
    Composite(Vec<Statement>),
    /// String template: operands are stringified and joined
    StringConcat(Vec<Expr>),
}

/// A typed expression node
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// Expression shape
    pub kind: ExprKind,
    /// Static type
    pub ty: IrType,
    /// Source span
    pub span: Span,
    /// Set on nodes a lowering pass produced
    pub origin: Option<StatementOrigin>,
}

impl Expr {
    /// Create an expression
    pub fn new(kind: ExprKind, ty: IrType, span: Span) -> Self {
        Self {
            kind,
            ty,
            span,
            origin: None,
        }
    }

    /// Tag the expression with a statement origin
    pub fn with_origin(mut self, origin: StatementOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// The call, if this is a direct call
    pub fn as_call(&self) -> Option<&Call> {
        match &self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Check if this is a direct call to `target`
    pub fn is_call_to(&self, target: FunctionId) -> bool {
        self.as_call().is_some_and(|call| call.target == target)
    }

    /// Statements of a composite expression
    pub fn as_composite(&self) -> Option<&[Statement]> {
        match &self.kind {
            ExprKind::Composite(statements) => Some(statements),
            _ => None,
        }
    }
}

/// A local variable declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// File-unique id
    pub id: VariableId,
    /// Display name
    pub name: String,
    /// Declared type
    pub ty: IrType,
    /// Initial value
    pub initializer: Option<Expr>,
    /// Whether the variable may be reassigned
    pub mutable: bool,
    /// Source variable or compiler temporary
    pub origin: DeclOrigin,
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Expression evaluated for its effects (or as a composite's value)
    Expression(Expr),
    /// Local variable declaration
    Variable(Variable),
    /// Return from the enclosing function
    Return(Option<Expr>),
}

impl Statement {
    /// The expression, if this is an expression statement
    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Statement::Expression(expr) => Some(expr),
            _ => None,
        }
    }

    /// The variable, if this is a declaration
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Statement::Variable(var) => Some(var),
            _ => None,
        }
    }
}

impl From<Expr> for Statement {
    fn from(expr: Expr) -> Self {
        Statement::Expression(expr)
    }
}

impl From<Variable> for Statement {
    fn from(var: Variable) -> Self {
        Statement::Variable(var)
    }
}

/// Body of a declared function or constructor
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBody {
    /// The declaration this body implements
    pub function: FunctionId,
    /// Statements, in order
    pub statements: Vec<Statement>,
}

impl FunctionBody {
    /// Create a body
    pub fn new(function: FunctionId, statements: Vec<Statement>) -> Self {
        Self {
            function,
            statements,
        }
    }
}

/// Top-level entries of a file
#[derive(Debug, Clone, PartialEq)]
pub enum FileDeclaration {
    /// A class and the bodies of its members
    Class {
        /// Declared class
        class: ClassId,
        /// Member bodies (and nested classes)
        members: Vec<FileDeclaration>,
    },
    /// A function body
    Function(FunctionBody),
}

/// One compilation unit
#[derive(Debug, Clone, Default)]
pub struct IrFile {
    /// File name
    pub name: String,
    /// Top-level entries
    pub declarations: Vec<FileDeclaration>,
    /// Variable id source for this file
    pub variables: VariableAllocator,
}

impl IrFile {
    /// Create an empty file
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declarations: Vec::new(),
            variables: VariableAllocator::new(),
        }
    }

    /// Append a top-level entry
    pub fn add_declaration(&mut self, decl: FileDeclaration) {
        self.declarations.push(decl);
    }

    /// All function bodies, classes flattened, in declaration order
    pub fn function_bodies(&self) -> Vec<&FunctionBody> {
        fn collect<'a>(decls: &'a [FileDeclaration], out: &mut Vec<&'a FunctionBody>) {
            for decl in decls {
                match decl {
                    FileDeclaration::Class { members, .. } => collect(members, out),
                    FileDeclaration::Function(body) => out.push(body),
                }
            }
        }

        let mut out = Vec::new();
        collect(&self.declarations, &mut out);
        out
    }

    /// Find the body of `function`
    pub fn body_of(&self, function: FunctionId) -> Option<&FunctionBody> {
        self.function_bodies()
            .into_iter()
            .find(|body| body.function == function)
    }
}
