//! Whole-program declaration table
//!
//! The front end registers every class, function and property here before any
//! backend pass runs. Declarations are never mutated by lowering passes, so a
//! single table can be shared by passes running over different files.
//!
//! Function declarations carry the functions they immediately override, which
//! makes the table the override graph as well.

use crate::types::IrType;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

/// Class identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

impl ClassId {
    /// Create a new class ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Function identifier (constructors and getters included)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub u32);

impl FunctionId {
    /// Create a new function ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

/// Property identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(pub u32);

impl PropertyId {
    /// Create a new property ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Where a declaration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeclOrigin {
    /// Written in source
    #[default]
    Source,
    /// Inserted by the front end to stand for an inherited member that has no
    /// textual override. Carries no logic of its own; calls delegate to the
    /// overridden declaration.
    SyntheticOverride,
    /// Any other compiler-introduced declaration (temporaries, bridges)
    Other,
}

impl DeclOrigin {
    /// Check if this is a synthetic pass-through override
    pub fn is_synthetic_override(self) -> bool {
        self == DeclOrigin::SyntheticOverride
    }
}

/// A class declaration
#[derive(Debug, Clone)]
pub struct ClassDecl {
    /// Simple name
    pub name: String,
    /// Dotted package name (empty for the root package)
    pub package: String,
    /// Declared supertypes (superclass and interfaces)
    pub supertypes: Vec<ClassId>,
    /// Declared constructors, in declaration order
    pub constructors: Vec<FunctionId>,
    /// Member functions, in declaration order (getters live on their property)
    pub functions: Vec<FunctionId>,
    /// Member properties, in declaration order
    pub properties: Vec<PropertyId>,
    /// Declaration origin
    pub origin: DeclOrigin,
}

impl ClassDecl {
    /// Create a source class with no supertypes
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            supertypes: Vec::new(),
            constructors: Vec::new(),
            functions: Vec::new(),
            properties: Vec::new(),
            origin: DeclOrigin::Source,
        }
    }

    /// Set the declared supertypes
    pub fn with_supertypes(mut self, supertypes: Vec<ClassId>) -> Self {
        self.supertypes = supertypes;
        self
    }

    /// Fully qualified name, e.g. `kotlin.Throwable`
    pub fn fq_name(&self) -> String {
        qualify(&self.package, &self.name)
    }
}

/// What a function declaration is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// A constructor of its parent class
    Constructor,
    /// An ordinary function or method
    Simple,
    /// The getter of a property
    Getter(PropertyId),
}

/// Owner of a function declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionParent {
    /// Member of a class
    Class(ClassId),
    /// Top-level function in a package
    Package(String),
}

/// A value parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub ty: IrType,
}

impl Parameter {
    /// Create a parameter
    pub fn new(name: impl Into<String>, ty: IrType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A function, constructor or getter declaration
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    /// Name (`<init>` for constructors, `<get-x>` for getters)
    pub name: String,
    /// Function kind
    pub kind: FunctionKind,
    /// Owning class or package
    pub parent: FunctionParent,
    /// Value parameters, excluding the dispatch receiver
    pub params: Vec<Parameter>,
    /// Return type
    pub return_type: IrType,
    /// Functions this one immediately overrides
    pub overridden: Vec<FunctionId>,
    /// Declaration origin
    pub origin: DeclOrigin,
}

impl FunctionDecl {
    /// Create an ordinary source function with no parameters
    pub fn new(name: impl Into<String>, return_type: IrType) -> Self {
        Self {
            name: name.into(),
            kind: FunctionKind::Simple,
            parent: FunctionParent::Package(String::new()),
            params: Vec::new(),
            return_type,
            overridden: Vec::new(),
            origin: DeclOrigin::Source,
        }
    }

    /// Set the value parameters
    pub fn with_params(mut self, params: Vec<Parameter>) -> Self {
        self.params = params;
        self
    }

    /// Set the immediately overridden functions
    pub fn with_overridden(mut self, overridden: Vec<FunctionId>) -> Self {
        self.overridden = overridden;
        self
    }

    /// Set the declaration origin
    pub fn with_origin(mut self, origin: DeclOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// The class owning this function, if it is a member
    pub fn parent_class(&self) -> Option<ClassId> {
        match self.parent {
            FunctionParent::Class(class) => Some(class),
            FunctionParent::Package(_) => None,
        }
    }

    /// Check if this is a constructor
    pub fn is_constructor(&self) -> bool {
        self.kind == FunctionKind::Constructor
    }
}

/// A property declaration
#[derive(Debug, Clone)]
pub struct PropertyDecl {
    /// Property name
    pub name: String,
    /// Owning class
    pub parent: ClassId,
    /// Property type
    pub ty: IrType,
    /// Getter, once declared
    pub getter: Option<FunctionId>,
    /// Declaration origin
    pub origin: DeclOrigin,
}

/// Whole-program declaration table
#[derive(Debug, Default)]
pub struct SymbolTable {
    classes: Vec<ClassDecl>,
    functions: Vec<FunctionDecl>,
    properties: Vec<PropertyDecl>,
    /// Fully qualified class name → class
    class_index: FxHashMap<String, ClassId>,
    /// Fully qualified top-level function name → overloads
    function_index: FxHashMap<String, Vec<FunctionId>>,
}

impl SymbolTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a class. A later class with the same qualified name shadows
    /// the earlier one in [`lookup_class`](Self::lookup_class).
    pub fn declare_class(&mut self, decl: ClassDecl) -> ClassId {
        let id = ClassId::new(self.classes.len() as u32);
        self.class_index.insert(decl.fq_name(), id);
        self.classes.push(decl);
        id
    }

    /// Register a constructor of `class`
    pub fn declare_constructor(
        &mut self,
        class: ClassId,
        params: Vec<Parameter>,
        origin: DeclOrigin,
    ) -> FunctionId {
        let decl = FunctionDecl {
            name: "<init>".to_string(),
            kind: FunctionKind::Constructor,
            parent: FunctionParent::Class(class),
            params,
            return_type: IrType::class(class),
            overridden: Vec::new(),
            origin,
        };
        let id = self.push_function(decl);
        self.classes[class.0 as usize].constructors.push(id);
        id
    }

    /// Register a member function of `class`
    pub fn declare_method(&mut self, class: ClassId, mut decl: FunctionDecl) -> FunctionId {
        decl.kind = FunctionKind::Simple;
        decl.parent = FunctionParent::Class(class);
        let id = self.push_function(decl);
        self.classes[class.0 as usize].functions.push(id);
        id
    }

    /// Register a top-level function in `package`
    pub fn declare_top_level(
        &mut self,
        package: impl Into<String>,
        mut decl: FunctionDecl,
    ) -> FunctionId {
        let package = package.into();
        let fq_name = qualify(&package, &decl.name);
        decl.kind = FunctionKind::Simple;
        decl.parent = FunctionParent::Package(package);
        let id = self.push_function(decl);
        self.function_index.entry(fq_name).or_default().push(id);
        id
    }

    /// Register a property of `class` (without a getter)
    pub fn declare_property(
        &mut self,
        class: ClassId,
        name: impl Into<String>,
        ty: IrType,
        origin: DeclOrigin,
    ) -> PropertyId {
        let id = PropertyId::new(self.properties.len() as u32);
        self.properties.push(PropertyDecl {
            name: name.into(),
            parent: class,
            ty,
            getter: None,
            origin,
        });
        self.classes[class.0 as usize].properties.push(id);
        id
    }

    /// Register the getter of `property`, named `<get-name>`
    pub fn declare_getter(
        &mut self,
        property: PropertyId,
        origin: DeclOrigin,
        overridden: Vec<FunctionId>,
    ) -> FunctionId {
        let prop = &self.properties[property.0 as usize];
        let decl = FunctionDecl {
            name: getter_name(&prop.name),
            kind: FunctionKind::Getter(property),
            parent: FunctionParent::Class(prop.parent),
            params: Vec::new(),
            return_type: prop.ty,
            overridden,
            origin,
        };
        let id = self.push_function(decl);
        self.properties[property.0 as usize].getter = Some(id);
        id
    }

    /// Add an override edge after the fact (`function` overrides `base`)
    pub fn add_override(&mut self, function: FunctionId, base: FunctionId) {
        self.functions[function.0 as usize].overridden.push(base);
    }

    fn push_function(&mut self, decl: FunctionDecl) -> FunctionId {
        let id = FunctionId::new(self.functions.len() as u32);
        self.functions.push(decl);
        id
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Get a class declaration. Panics if `id` was not issued by this table.
    pub fn class(&self, id: ClassId) -> &ClassDecl {
        &self.classes[id.0 as usize]
    }

    /// Get a function declaration. Panics if `id` was not issued by this table.
    pub fn function(&self, id: FunctionId) -> &FunctionDecl {
        &self.functions[id.0 as usize]
    }

    /// Get a property declaration. Panics if `id` was not issued by this table.
    pub fn property(&self, id: PropertyId) -> &PropertyDecl {
        &self.properties[id.0 as usize]
    }

    /// Resolve a class by fully qualified name
    pub fn lookup_class(&self, fq_name: &str) -> Option<ClassId> {
        self.class_index.get(fq_name).copied()
    }

    /// Resolve all top-level overloads with this fully qualified name
    pub fn lookup_functions(&self, fq_name: &str) -> &[FunctionId] {
        self.function_index
            .get(fq_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Functions `function` immediately overrides
    pub fn overridden(&self, function: FunctionId) -> &[FunctionId] {
        &self.function(function).overridden
    }

    /// Fully qualified name of a function, e.g. `kotlin.Throwable.toString`
    pub fn function_fq_name(&self, id: FunctionId) -> String {
        let decl = self.function(id);
        match &decl.parent {
            FunctionParent::Class(class) => format!("{}.{}", self.class(*class).fq_name(), decl.name),
            FunctionParent::Package(package) => qualify(package, &decl.name),
        }
    }

    /// Check whether `sub` is `sup` or inherits from it, directly or not
    pub fn is_subclass_of(&self, sub: ClassId, sup: ClassId) -> bool {
        let mut visited = FxHashSet::default();
        let mut stack = vec![sub];
        while let Some(class) = stack.pop() {
            if class == sup {
                return true;
            }
            if visited.insert(class) {
                stack.extend(self.class(class).supertypes.iter().copied());
            }
        }
        false
    }
}

/// Name of the getter for a property called `property`
pub fn getter_name(property: &str) -> String {
    format!("<get-{}>", property)
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}
