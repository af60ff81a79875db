//! Canonical runtime bindings
//!
//! Resolves, once per pass instance, every declaration the rewriters refer to:
//! the throwable base class and its constructors, its `toString`, the message
//! and cause getters, and the three runtime intrinsics. Resolution fails fast
//! with a [`ConfigError`] if the runtime library does not look as expected.

use crate::config::{BindingNames, FieldKeys};
use crate::error::{ConfigError, ConfigResult};
use kiln_ir::symbols::getter_name;
use kiln_ir::{BuiltinTypes, ClassDecl, ClassId, FunctionId, IrType, SymbolTable};
use rustc_hash::FxHashSet;

/// Declarations the throwable lowering is bound to. Immutable after
/// resolution.
#[derive(Debug, Clone)]
pub struct RuntimeBindings {
    /// Builtin types for synthesized nodes
    pub types: BuiltinTypes,
    /// The throwable base class
    pub throwable: ClassId,
    /// Simple name of the base class, written as `name` on direct instances
    pub throwable_name: String,
    /// Every declared constructor of the base class
    pub constructors: FxHashSet<FunctionId>,
    /// The base class's zero-argument constructor
    pub default_constructor: FunctionId,
    /// The base class's `toString`
    pub to_string: FunctionId,
    /// Getter of the base `message` property
    pub message_getter: FunctionId,
    /// Getter of the base `cause` property
    pub cause_getter: FunctionId,
    /// `(receiver, key) -> value`
    pub field_get: FunctionId,
    /// `(receiver, key, value) -> Unit`
    pub field_set: FunctionId,
    /// `(receiver) -> Unit`
    pub capture_stack: FunctionId,
    /// Dynamic field keys
    pub keys: FieldKeys,
}

impl RuntimeBindings {
    /// Resolve `names` against `symbols`
    pub fn resolve(
        symbols: &SymbolTable,
        types: BuiltinTypes,
        names: &BindingNames,
    ) -> ConfigResult<Self> {
        let throwable = symbols
            .lookup_class(&names.throwable_class)
            .ok_or_else(|| ConfigError::ClassNotFound(names.throwable_class.clone()))?;
        let class = symbols.class(throwable);

        if class.constructors.is_empty() {
            return Err(ConfigError::NoConstructors(class.fq_name()));
        }
        let constructors: FxHashSet<FunctionId> = class.constructors.iter().copied().collect();

        let zero_arg: Vec<FunctionId> = class
            .constructors
            .iter()
            .copied()
            .filter(|&ctor| symbols.function(ctor).params.is_empty())
            .collect();
        let default_constructor = match zero_arg.as_slice() {
            [single] => *single,
            _ => {
                return Err(ConfigError::DefaultConstructor {
                    class: class.fq_name(),
                    found: zero_arg.len(),
                })
            }
        };

        let to_string = single_member(symbols, class, &names.to_string)?;
        let message_getter = resolve_getter(symbols, class, &names.message_property)?;
        let cause_getter = resolve_getter(symbols, class, &names.cause_property)?;

        let field_get = resolve_intrinsic(symbols, &names.intrinsics.field_get, 2)?;
        let field_set = resolve_intrinsic(symbols, &names.intrinsics.field_set, 3)?;
        let capture_stack = resolve_intrinsic(symbols, &names.intrinsics.capture_stack, 1)?;

        Ok(Self {
            types,
            throwable,
            throwable_name: class.name.clone(),
            constructors,
            default_constructor,
            to_string,
            message_getter,
            cause_getter,
            field_get,
            field_set,
            capture_stack,
            keys: names.keys.clone(),
        })
    }

    /// Check if `function` is one of the base class's constructors
    pub fn is_throwable_constructor(&self, function: FunctionId) -> bool {
        self.constructors.contains(&function)
    }

    /// Check if values of `ty`, ignoring nullability, are throwables
    pub fn is_throwable_type(&self, symbols: &SymbolTable, ty: IrType) -> bool {
        ty.make_not_null()
            .class_id()
            .is_some_and(|class| symbols.is_subclass_of(class, self.throwable))
    }
}

/// Exactly one member function named `name`
fn single_member(symbols: &SymbolTable, class: &ClassDecl, name: &str) -> ConfigResult<FunctionId> {
    match at_most_one_function(symbols, class, name)? {
        Some(function) => Ok(function),
        None => Err(ConfigError::MemberNotFound {
            class: class.fq_name(),
            member: name.to_string(),
        }),
    }
}

/// A `<get-name>` member function if there is one, else the getter of the
/// property `name`
fn resolve_getter(symbols: &SymbolTable, class: &ClassDecl, property: &str) -> ConfigResult<FunctionId> {
    if let Some(getter) = at_most_one_function(symbols, class, &getter_name(property))? {
        return Ok(getter);
    }

    let matching: Vec<_> = class
        .properties
        .iter()
        .copied()
        .filter(|&p| symbols.property(p).name == property)
        .collect();
    match matching.as_slice() {
        [] => Err(ConfigError::MemberNotFound {
            class: class.fq_name(),
            member: property.to_string(),
        }),
        [single] => symbols
            .property(*single)
            .getter
            .ok_or_else(|| ConfigError::MemberNotFound {
                class: class.fq_name(),
                member: getter_name(property),
            }),
        _ => Err(ConfigError::AmbiguousMember {
            class: class.fq_name(),
            member: property.to_string(),
            count: matching.len(),
        }),
    }
}

fn at_most_one_function(
    symbols: &SymbolTable,
    class: &ClassDecl,
    name: &str,
) -> ConfigResult<Option<FunctionId>> {
    let matching: Vec<FunctionId> = class
        .functions
        .iter()
        .copied()
        .filter(|&f| symbols.function(f).name == name)
        .collect();
    match matching.as_slice() {
        [] => Ok(None),
        [single] => Ok(Some(*single)),
        _ => Err(ConfigError::AmbiguousMember {
            class: class.fq_name(),
            member: name.to_string(),
            count: matching.len(),
        }),
    }
}

fn resolve_intrinsic(symbols: &SymbolTable, fq_name: &str, arity: usize) -> ConfigResult<FunctionId> {
    let function = match symbols.lookup_functions(fq_name) {
        [] => return Err(ConfigError::IntrinsicNotFound(fq_name.to_string())),
        [single] => *single,
        overloads => {
            return Err(ConfigError::AmbiguousIntrinsic {
                name: fq_name.to_string(),
                count: overloads.len(),
            })
        }
    };

    let found = symbols.function(function).params.len();
    if found != arity {
        return Err(ConfigError::IntrinsicArity {
            name: fq_name.to_string(),
            expected: arity,
            found,
        });
    }
    Ok(function)
}
