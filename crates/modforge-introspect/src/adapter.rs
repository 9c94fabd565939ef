use modforge_core::{ModelDescriptor, Result};

use crate::reader::SchemaText;

/// Trait implemented by schema languages that can describe a model.
pub trait Adapter {
    /// Returns the schema language identifier (e.g. `prisma`).
    fn engine(&self) -> &'static str;

    /// Locate `model` in the schema text and describe its fields.
    fn introspect_model(&self, schema: &SchemaText, model: &str) -> Result<ModelDescriptor>;
}
