//! Test harness for lowering and evaluating programs
//!
//! Declares a runtime library shaped like the JS backend's (`kotlin.Throwable`
//! plus the `kotlin.js` intrinsics) and installs native implementations of the
//! intrinsics into the reference evaluator, so lowered programs can be run and
//! their objects inspected.

#![allow(dead_code)]

pub use kiln_ir::eval::{Evaluator, ObjectRef, Value};
pub use kiln_ir::{
    BuiltinTypes, ClassDecl, ClassId, DeclOrigin, EvalError, EvalResult, Expr, ExprKind,
    FileDeclaration, FunctionBody, FunctionDecl, FunctionId, IrBuilder, IrFile, IrType, Parameter,
    Span, Statement, StatementOrigin, SymbolTable, ValueRef,
};
pub use kiln_lower::{BindingNames, ConfigError, FileLoweringPass, LoweringStats, ThrowableLowering};

/// Runtime library declarations
pub struct Runtime {
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

/// A user class extending the base class, with synthetic `message` / `cause`
/// overrides and one constructor
#[derive(Debug, Clone, Copy)]
pub struct Subclass {
    pub class: ClassId,
    pub ctor: FunctionId,
    pub message_getter: FunctionId,
    pub cause_getter: FunctionId,
}

pub fn string_n() -> IrType {
    IrType::string().make_nullable()
}

/// Declare the runtime library
pub fn runtime() -> Runtime {
    let mut symbols = SymbolTable::new();
    let throwable = symbols.declare_class(ClassDecl::new("kotlin", "Throwable"));
    let throwable_n = IrType::class(throwable).make_nullable();

    let ctor_empty = symbols.declare_constructor(throwable, vec![], DeclOrigin::Source);
    let ctor_message = symbols.declare_constructor(
        throwable,
        vec![Parameter::new("message", string_n())],
        DeclOrigin::Source,
    );
    let ctor_message_cause = symbols.declare_constructor(
        throwable,
        vec![Parameter::new("message", string_n()), Parameter::new("cause", throwable_n)],
        DeclOrigin::Source,
    );
    let ctor_cause = symbols.declare_constructor(
        throwable,
        vec![Parameter::new("cause", throwable_n)],
        DeclOrigin::Source,
    );

    let to_string = symbols.declare_method(throwable, FunctionDecl::new("toString", IrType::string()));
    let message = symbols.declare_property(throwable, "message", string_n(), DeclOrigin::Source);
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

impl Runtime {
    pub fn throwable_type(&self) -> IrType {
        IrType::class(self.throwable)
    }

    /// Declare `class name(params) : parent` with synthetic `message` and
    /// `cause` overrides. `parent` defaults to the base class.
    pub fn subclass(&mut self, name: &str, parent: Option<&Subclass>, params: Vec<Parameter>) -> Subclass {
        let (parent_class, parent_message, parent_cause) = match parent {
            Some(p) => (p.class, p.message_getter, p.cause_getter),
            None => (self.throwable, self.message_getter, self.cause_getter),
        };
        let class = self
            .symbols
            .declare_class(ClassDecl::new("app", name).with_supertypes(vec![parent_class]));
        let ctor = self.symbols.declare_constructor(class, params, DeclOrigin::Source);

        let message = self
            .symbols
            .declare_property(class, "message", string_n(), DeclOrigin::SyntheticOverride);
        let message_getter =
            self.symbols
                .declare_getter(message, DeclOrigin::SyntheticOverride, vec![parent_message]);
        let cause = self.symbols.declare_property(
            class,
            "cause",
            self.throwable_type().make_nullable(),
            DeclOrigin::SyntheticOverride,
        );
        let cause_getter = self
            .symbols
            .declare_getter(cause, DeclOrigin::SyntheticOverride, vec![parent_cause]);

        Subclass {
            class,
            ctor,
            message_getter,
            cause_getter,
        }
    }

    /// Declare a top-level function in `app`
    pub fn function(&mut self, name: &str, ret: IrType) -> FunctionId {
        self.symbols.declare_top_level("app", FunctionDecl::new(name, ret))
    }

    /// Lower `file` with the default bindings
    pub fn lower(&self, file: &mut IrFile) -> LoweringStats {
        ThrowableLowering::with_defaults(&self.symbols)
            .expect("runtime resolves")
            .lower(file)
    }

    /// Evaluator over `file` with the intrinsics installed
    pub fn evaluator<'a>(&'a self, file: &'a IrFile) -> Evaluator<'a> {
        let mut eval = Evaluator::new(&self.symbols);
        eval.add_file(file);
        self.install_natives(&mut eval);
        eval
    }

    /// Native intrinsics plus `toString`.
    ///
    /// `captureStack` records `"<name>: <message>"` under `stack`, using the
    /// fields as they are when it runs.
    pub fn install_natives(&self, eval: &mut Evaluator<'_>) {
        eval.register_native(self.field_set, |_, args| {
            let obj = object(&args[0])?;
            obj.set_field(key(&args[1])?, args[2].clone());
            Ok(Value::Unit)
        });
        eval.register_native(self.field_get, |_, args| {
            let obj = object(&args[0])?;
            Ok(obj.get_field(key(&args[1])?).unwrap_or(Value::Null))
        });
        eval.register_native(self.capture_stack, |_, args| {
            let obj = object(&args[0])?;
            let name = obj.get_field("name").unwrap_or(Value::Null);
            let message = obj.get_field("message").unwrap_or(Value::Null);
            obj.set_field("stack", Value::string(format!("{}: {}", name, message)));
            Ok(Value::Unit)
        });
        eval.register_native(self.to_string, |_, args| {
            let obj = object(&args[0])?;
            let name = obj.get_field("name").unwrap_or(Value::Null);
            match obj.get_field("message") {
                None | Some(Value::Null) => Ok(Value::string(name.to_string())),
                Some(message) => Ok(Value::string(format!("{}: {}", name, message))),
            }
        });
    }
}

fn object(value: &Value) -> EvalResult<&ObjectRef> {
    value.as_object().ok_or_else(|| EvalError::TypeMismatch {
        expected: "object".to_string(),
        found: value.to_string(),
    })
}

fn key(value: &Value) -> EvalResult<&str> {
    value.as_str().ok_or_else(|| EvalError::TypeMismatch {
        expected: "string key".to_string(),
        found: value.to_string(),
    })
}

/// A file holding one class with one constructor body
pub fn class_file(name: &str, class: ClassId, ctor: FunctionId, body: Vec<Statement>) -> IrFile {
    let mut file = IrFile::new(name);
    file.add_declaration(FileDeclaration::Class {
        class,
        members: vec![FileDeclaration::Function(FunctionBody::new(ctor, body))],
    });
    file
}

/// Append `fun main() { return <value> }` to `file`
pub fn add_main(file: &mut IrFile, main: FunctionId, value: Expr) {
    file.add_declaration(FileDeclaration::Function(FunctionBody::new(
        main,
        vec![Statement::Return(Some(value))],
    )));
}

/// Read a dynamic field of an object value
pub fn field(value: &Value, name: &str) -> Value {
    value
        .as_object()
        .expect("object value")
        .get_field(name)
        .unwrap_or(Value::Null)
}

/// Builder at the default span
pub fn builder() -> IrBuilder {
    IrBuilder::at(Span::default())
}
