//! Kiln throwable lowering
//!
//! Backend pass for targets whose runtime has no constructor overloading and
//! no typed fields on exceptions. It rewrites, per file:
//!
//! 1. every call to a constructor of the throwable base class (direct or via
//!    `super(...)`) into the zero-argument constructor followed by dynamic
//!    `message` / `cause` / `name` field writes and a stack capture;
//! 2. every read of the base `message` / `cause` getters, including reads
//!    through synthetic overrides on subclasses, into a dynamic field read.
//!
//! # Example
//!
//! ```rust,ignore
//! use kiln_lower::{FileLoweringPass, ThrowableLowering};
//!
//! let pass = ThrowableLowering::with_defaults(&symbols)?;
//! let stats = pass.lower(&mut file);
//! ```
//!
//! Which declarations count as the base class and the intrinsics is set by
//! [`BindingNames`], loadable from TOML.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bindings;
pub mod config;
pub mod constructor;
pub mod error;
pub mod override_search;
pub mod pass;
pub mod property;
pub mod stats;
pub mod verify;

#[cfg(test)]
mod test_support;

pub use bindings::RuntimeBindings;
pub use config::{BindingNames, FieldKeys, IntrinsicNames};
pub use constructor::ConstructorRewriter;
pub use error::{ConfigError, ConfigResult};
pub use pass::{FileLoweringPass, ThrowableLowering};
pub use property::PropertyAccessRewriter;
pub use stats::LoweringStats;
pub use verify::Violation;
