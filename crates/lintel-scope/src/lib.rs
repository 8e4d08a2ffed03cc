//! Lexical scope analysis.
//!
//! [`analyze`] walks a [`lintel_syntax::Tree`] once and records every scope,
//! the variables declared in it and the identifier references that resolve
//! to them. References no declaration resolves are attached to implicit
//! global variables and listed in the global scope's `through`.

mod analyzer;
mod globals;
mod model;

pub use analyzer::{analyze, pattern_identifiers};
pub use globals::{Ambient, Environment, Globals};
pub use model::{
    Definition, DefinitionKind, ReadWrite, Reference, ReferenceId, Scope, ScopeId, ScopeKind,
    ScopeManager, Variable, VariableId,
};
