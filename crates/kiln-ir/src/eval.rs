//! Reference evaluator
//!
//! A small tree-walking evaluator used to check the runtime behaviour of
//! lowered IR: which fields an object ends up with, and how many times each
//! argument expression ran. It is not a backend.
//!
//! Functions resolve, in order, to a registered native implementation, to a
//! body found in one of the added files, or (for synthetic overrides without a
//! body) to the first function they override. Constructors without a body or
//! native only allocate.

use crate::error::{EvalError, EvalResult};
use crate::symbols::{ClassId, FunctionId, SymbolTable};
use crate::tree::{
    Constant, Expr, ExprKind, FunctionBody, IrFile, Statement, ValueRef, VariableId,
};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Maximum nesting of calls before evaluation is aborted
const MAX_CALL_DEPTH: usize = 256;

/// Runtime values
#[derive(Debug, Clone)]
pub enum Value {
    /// Result of unit-typed expressions
    Unit,
    /// `null`
    Null,
    /// Integer
    Int(i64),
    /// String
    Str(Rc<str>),
    /// Heap object
    Object(ObjectRef),
}

impl Value {
    /// Create a string value
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(s.as_ref()))
    }

    /// Try to get as a string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as an object
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Check if this is `null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) | (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "Unit"),
            Value::Null => write!(f, "null"),
            Value::Int(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{}", s),
            Value::Object(obj) => write!(f, "<{} instance>", obj.class()),
        }
    }
}

/// Object state: runtime class plus dynamic fields in first-write order
#[derive(Debug)]
pub struct Object {
    class: ClassId,
    fields: Vec<(String, Value)>,
}

/// Shared handle to a heap object; equality is identity
#[derive(Debug, Clone)]
pub struct ObjectRef(Rc<RefCell<Object>>);

impl ObjectRef {
    /// Allocate an object with no fields
    pub fn new(class: ClassId) -> Self {
        Self(Rc::new(RefCell::new(Object {
            class,
            fields: Vec::new(),
        })))
    }

    /// Runtime class
    pub fn class(&self) -> ClassId {
        self.0.borrow().class
    }

    /// Read a dynamic field
    pub fn get_field(&self, key: &str) -> Option<Value> {
        self.0
            .borrow()
            .fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
    }

    /// Write a dynamic field, creating it on first write
    pub fn set_field(&self, key: &str, value: Value) {
        let mut obj = self.0.borrow_mut();
        match obj.fields.iter_mut().find(|(name, _)| name == key) {
            Some(slot) => slot.1 = value,
            None => obj.fields.push((key.to_string(), value)),
        }
    }

    /// Field names in first-write order
    pub fn field_names(&self) -> Vec<String> {
        self.0
            .borrow()
            .fields
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Native implementation of a function. Receives the receiver (or the
/// instance, for constructors) first, then the value arguments.
pub type NativeFn = Box<dyn Fn(&SymbolTable, &[Value]) -> EvalResult<Value>>;

/// Local state of one activation
#[derive(Default)]
struct Frame {
    this: Option<Value>,
    params: Vec<Value>,
    locals: FxHashMap<VariableId, Value>,
}

enum Completion {
    Normal(Value),
    Return(Value),
}

/// Tree-walking evaluator over one or more files
pub struct Evaluator<'a> {
    symbols: &'a SymbolTable,
    bodies: FxHashMap<FunctionId, &'a FunctionBody>,
    natives: FxHashMap<FunctionId, NativeFn>,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator with no bodies or natives
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            bodies: FxHashMap::default(),
            natives: FxHashMap::default(),
            depth: 0,
        }
    }

    /// Make the function bodies of `file` callable
    pub fn add_file(&mut self, file: &'a IrFile) {
        for body in file.function_bodies() {
            self.bodies.insert(body.function, body);
        }
    }

    /// Register a native implementation, replacing any body
    pub fn register_native<F>(&mut self, function: FunctionId, native: F)
    where
        F: Fn(&SymbolTable, &[Value]) -> EvalResult<Value> + 'static,
    {
        self.natives.insert(function, Box::new(native));
    }

    /// Call a non-constructor function
    pub fn call(
        &mut self,
        function: FunctionId,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> EvalResult<Value> {
        self.invoke(function, receiver, args)
    }

    /// Evaluate a free-standing expression (no receiver, no parameters)
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        let mut frame = Frame::default();
        self.eval_in(expr, &mut frame)
    }

    /// Count one more active call; pair with `self.depth -= 1` on return
    fn enter(&mut self) -> EvalResult<()> {
        if self.depth >= MAX_CALL_DEPTH {
            return Err(EvalError::Unsupported(format!(
                "call depth exceeded {}",
                MAX_CALL_DEPTH
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn invoke(
        &mut self,
        function: FunctionId,
        receiver: Option<Value>,
        args: Vec<Value>,
    ) -> EvalResult<Value> {
        if let Some(native) = self.natives.get(&function) {
            let mut all: Vec<Value> = receiver.into_iter().collect();
            all.extend(args);
            return native(self.symbols, &all);
        }

        let decl = self.symbols.function(function);
        match self.bodies.get(&function).copied() {
            Some(body) => {
                self.enter()?;
                let mut frame = Frame {
                    this: receiver,
                    params: args,
                    locals: FxHashMap::default(),
                };
                let result = self.run_body(body, &mut frame);
                self.depth -= 1;
                result
            }
            None if decl.origin.is_synthetic_override() => match decl.overridden.first() {
                Some(&base) => {
                    self.enter()?;
                    let result = self.invoke(base, receiver, args);
                    self.depth -= 1;
                    result
                }
                None => Err(self.no_body(function)),
            },
            None => Err(self.no_body(function)),
        }
    }

    fn construct(&mut self, ctor: FunctionId, this: Value, args: Vec<Value>) -> EvalResult<()> {
        if let Some(native) = self.natives.get(&ctor) {
            let mut all = vec![this];
            all.extend(args);
            native(self.symbols, &all)?;
            return Ok(());
        }

        if let Some(body) = self.bodies.get(&ctor).copied() {
            self.enter()?;
            let mut frame = Frame {
                this: Some(this),
                params: args,
                locals: FxHashMap::default(),
            };
            let result = self.run_body(body, &mut frame);
            self.depth -= 1;
            result?;
        }
        Ok(())
    }

    fn no_body(&self, function: FunctionId) -> EvalError {
        EvalError::NoBody {
            function: self.symbols.function_fq_name(function),
        }
    }

    fn run_body(&mut self, body: &FunctionBody, frame: &mut Frame) -> EvalResult<Value> {
        for stmt in &body.statements {
            if let Completion::Return(value) = self.exec(stmt, frame)? {
                return Ok(value);
            }
        }
        Ok(Value::Unit)
    }

    fn exec(&mut self, stmt: &Statement, frame: &mut Frame) -> EvalResult<Completion> {
        match stmt {
            Statement::Expression(expr) => Ok(Completion::Normal(self.eval_in(expr, frame)?)),
            Statement::Variable(var) => {
                let value = match &var.initializer {
                    Some(init) => self.eval_in(init, frame)?,
                    None => Value::Null,
                };
                frame.locals.insert(var.id, value);
                Ok(Completion::Normal(Value::Unit))
            }
            Statement::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_in(expr, frame)?,
                    None => Value::Unit,
                };
                Ok(Completion::Return(value))
            }
        }
    }

    fn eval_in(&mut self, expr: &Expr, frame: &mut Frame) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Const(c) => Ok(match c {
                Constant::Null => Value::Null,
                Constant::Int(v) => Value::Int(*v),
                Constant::String(s) => Value::string(s),
            }),
            ExprKind::GetValue(value) => self.read(*value, frame),
            ExprKind::Call(call) => {
                let receiver = match &call.dispatch_receiver {
                    Some(recv) => Some(self.eval_in(recv, frame)?),
                    None => None,
                };
                let args = self.eval_args(&call.args, frame)?;

                let decl = self.symbols.function(call.target);
                match decl.parent_class() {
                    Some(class) if decl.is_constructor() => {
                        let instance = Value::Object(ObjectRef::new(class));
                        self.construct(call.target, instance.clone(), args)?;
                        Ok(instance)
                    }
                    _ => self.invoke(call.target, receiver, args),
                }
            }
            ExprKind::DelegatingConstructorCall(call) => {
                let this = frame.this.clone().ok_or(EvalError::NoReceiver)?;
                let args = self.eval_args(&call.args, frame)?;
                self.construct(call.target, this, args)?;
                Ok(Value::Unit)
            }
            ExprKind::Composite(statements) => {
                let mut last = Value::Unit;
                for stmt in statements {
                    match self.exec(stmt, frame)? {
                        Completion::Normal(value) => last = value,
                        Completion::Return(_) => {
                            return Err(EvalError::Unsupported(
                                "return inside a composite".to_string(),
                            ))
                        }
                    }
                }
                if expr.ty.is_unit() {
                    Ok(Value::Unit)
                } else {
                    Ok(last)
                }
            }
            ExprKind::StringConcat(parts) => {
                let mut text = String::new();
                for part in parts {
                    text.push_str(&self.eval_in(part, frame)?.to_string());
                }
                Ok(Value::string(text))
            }
        }
    }

    fn eval_args(&mut self, args: &[Expr], frame: &mut Frame) -> EvalResult<Vec<Value>> {
        args.iter().map(|arg| self.eval_in(arg, frame)).collect()
    }

    fn read(&self, value: ValueRef, frame: &Frame) -> EvalResult<Value> {
        match value {
            ValueRef::Variable(id) => frame
                .locals
                .get(&id)
                .cloned()
                .ok_or(EvalError::UnboundVariable(id)),
            ValueRef::Parameter(index) => frame
                .params
                .get(index as usize)
                .cloned()
                .ok_or(EvalError::MissingParameter { index }),
            ValueRef::This(_) => frame.this.clone().ok_or(EvalError::NoReceiver),
        }
    }
}
