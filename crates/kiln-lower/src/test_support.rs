//! Minimal runtime library for unit tests

use crate::bindings::RuntimeBindings;
use crate::config::BindingNames;
use kiln_ir::{
    BuiltinTypes, ClassDecl, ClassId, DeclOrigin, FunctionDecl, FunctionId, IrType, Parameter,
    SymbolTable,
};

pub(crate) struct Runtime {
    pub symbols: SymbolTable,
    pub throwable: ClassId,
    pub ctor_empty: FunctionId,
    pub ctor_message: FunctionId,
    pub ctor_message_cause: FunctionId,
    pub ctor_cause: FunctionId,
    pub to_string: FunctionId,
    pub message_getter: FunctionId,
    pub cause_getter: FunctionId,
    pub field_get: FunctionId,
    pub field_set: FunctionId,
    pub capture_stack: FunctionId,
}

impl Runtime {
    pub fn bindings(&self) -> RuntimeBindings {
        RuntimeBindings::resolve(&self.symbols, BuiltinTypes::default(), &BindingNames::default())
            .expect("test runtime resolves")
    }

    /// Declare a fresh top-level function to hold test code
    pub fn main_function(&mut self) -> FunctionId {
        self.symbols
            .declare_top_level("app", FunctionDecl::new("main", IrType::unit()))
    }
}

pub(crate) fn runtime() -> Runtime {
    let mut symbols = SymbolTable::new();
    let throwable = symbols.declare_class(ClassDecl::new("kotlin", "Throwable"));
    let string_n = IrType::string().make_nullable();
    let throwable_n = IrType::class(throwable).make_nullable();

    let ctor_empty = symbols.declare_constructor(throwable, vec![], DeclOrigin::Source);
    let ctor_message = symbols.declare_constructor(
        throwable,
        vec![Parameter::new("message", string_n)],
        DeclOrigin::Source,
    );
    let ctor_message_cause = symbols.declare_constructor(
        throwable,
        vec![Parameter::new("message", string_n), Parameter::new("cause", throwable_n)],
        DeclOrigin::Source,
    );
    let ctor_cause = symbols.declare_constructor(
        throwable,
        vec![Parameter::new("cause", throwable_n)],
        DeclOrigin::Source,
    );

    let to_string = symbols.declare_method(throwable, FunctionDecl::new("toString", IrType::string()));
    let message = symbols.declare_property(throwable, "message", string_n, DeclOrigin::Source);
    let message_getter = symbols.declare_getter(message, DeclOrigin::Source, vec![]);
    let cause = symbols.declare_property(throwable, "cause", throwable_n, DeclOrigin::Source);
    let cause_getter = symbols.declare_getter(cause, DeclOrigin::Source, vec![]);

    let any_n = IrType::nullable_any();
    let field_get = symbols.declare_top_level(
        "kotlin.js",
        FunctionDecl::new("jsGetJSField", any_n)
            .with_params(vec![Parameter::new("receiver", any_n), Parameter::new("key", IrType::string())]),
    );
    let field_set = symbols.declare_top_level(
        "kotlin.js",
        FunctionDecl::new("jsSetJSField", IrType::unit()).with_params(vec![
            Parameter::new("receiver", any_n),
            Parameter::new("key", IrType::string()),
            Parameter::new("value", any_n),
        ]),
    );
    let capture_stack = symbols.declare_top_level(
        "kotlin.js",
        FunctionDecl::new("captureStack", IrType::unit())
            .with_params(vec![Parameter::new("instance", any_n)]),
    );

    Runtime {
        symbols,
        throwable,
        ctor_empty,
        ctor_message,
        ctor_message_cause,
        ctor_cause,
        to_string,
        message_getter,
        cause_getter,
        field_get,
        field_set,
        capture_stack,
    }
}
