//! Semantic types attached to IR nodes
//!
//! Types are small `Copy` values. Class types refer to declarations in the
//! [`SymbolTable`](crate::SymbolTable) by id, so printing a class type by name
//! needs the table (see [`crate::pretty`]).

use crate::symbols::ClassId;
use std::fmt;

/// Shape of a type, ignoring nullability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// The unit type (no meaningful value)
    Unit,
    /// The bottom type; `Nothing?` is the type of the `null` literal
    Nothing,
    /// 64-bit integer
    Int,
    /// String
    String,
    /// Top type
    Any,
    /// Instance of a declared class or interface
    Class(ClassId),
}

/// A semantic type: a kind plus a nullability flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IrType {
    /// Type shape
    pub kind: TypeKind,
    /// Whether `null` inhabits the type
    pub nullable: bool,
}

impl IrType {
    /// Create a type
    pub const fn new(kind: TypeKind, nullable: bool) -> Self {
        Self { kind, nullable }
    }

    /// `Unit`
    pub const fn unit() -> Self {
        Self::new(TypeKind::Unit, false)
    }

    /// `Nothing?`, the type of the untyped `null` constant
    pub const fn nullable_nothing() -> Self {
        Self::new(TypeKind::Nothing, true)
    }

    /// `String`
    pub const fn string() -> Self {
        Self::new(TypeKind::String, false)
    }

    /// `Int`
    pub const fn int() -> Self {
        Self::new(TypeKind::Int, false)
    }

    /// `Any?`
    pub const fn nullable_any() -> Self {
        Self::new(TypeKind::Any, true)
    }

    /// Non-null instance type of `class`
    pub const fn class(class: ClassId) -> Self {
        Self::new(TypeKind::Class(class), false)
    }

    /// The same type with `null` admitted
    pub const fn make_nullable(self) -> Self {
        Self::new(self.kind, true)
    }

    /// The same type with `null` excluded
    pub const fn make_not_null(self) -> Self {
        Self::new(self.kind, false)
    }

    /// The class this type refers to, if any
    pub fn class_id(&self) -> Option<ClassId> {
        match self.kind {
            TypeKind::Class(id) => Some(id),
            _ => None,
        }
    }

    /// Check if this is the unit type
    pub fn is_unit(&self) -> bool {
        self.kind == TypeKind::Unit
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TypeKind::Unit => write!(f, "Unit")?,
            TypeKind::Nothing => write!(f, "Nothing")?,
            TypeKind::Int => write!(f, "Int")?,
            TypeKind::String => write!(f, "String")?,
            TypeKind::Any => write!(f, "Any")?,
            TypeKind::Class(id) => write!(f, "{}", id)?,
        }
        if self.nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}

/// The builtin types a backend context hands to lowering passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinTypes {
    /// `Unit`, the result type of intrinsic setters
    pub unit: IrType,
    /// `Nothing?`, the type of synthesized `null` constants
    pub nothing_n: IrType,
    /// `String`, the type of field keys and `toString()` results
    pub string: IrType,
}

impl Default for BuiltinTypes {
    fn default() -> Self {
        Self {
            unit: IrType::unit(),
            nothing_n: IrType::nullable_nothing(),
            string: IrType::string(),
        }
    }
}
