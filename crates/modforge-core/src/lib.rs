//! Core contracts and helpers for modforge.
//!
//! This crate defines the model descriptor types produced by introspection,
//! the shared error type, and the naming helpers used by every generated
//! artifact.

pub mod descriptor;
pub mod error;
pub mod naming;
pub mod validation;

pub use descriptor::{EnumDescriptor, FieldDescriptor, FieldKind, ModelDescriptor};
pub use error::{Error, Result, SourceLocation};
pub use naming::{capitalize, pluralize, route_path, validate_module_name};
pub use validation::validate_model;

/// Fields managed by the persistence layer, never validated in payloads.
pub const SYSTEM_FIELDS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// Returns true when `name` belongs to [`SYSTEM_FIELDS`].
pub fn is_system_field(name: &str) -> bool {
    SYSTEM_FIELDS.contains(&name)
}
