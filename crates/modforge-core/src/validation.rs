use std::collections::BTreeSet;

use crate::descriptor::{FieldKind, ModelDescriptor};
use crate::error::{Error, Result};

/// Validate internal consistency of a model descriptor.
///
/// This checks:
/// - duplicate field names
/// - enum fields reference an enumeration carried by the descriptor
/// - identifier formatting only appears on scalar text fields
pub fn validate_model(model: &ModelDescriptor) -> Result<()> {
    let mut names = BTreeSet::new();
    for field in &model.fields {
        if !names.insert(field.name.as_str()) {
            return Err(Error::InvalidDescriptor(format!(
                "duplicate field name: {}.{}",
                model.name, field.name
            )));
        }

        if field.kind == FieldKind::Enum && model.enum_named(&field.type_name).is_none() {
            return Err(Error::InvalidDescriptor(format!(
                "enum not carried by descriptor: {}.{} ({})",
                model.name, field.name, field.type_name
            )));
        }

        if field.is_identifier_formatted
            && (field.kind != FieldKind::Scalar || field.type_name != "String")
        {
            return Err(Error::InvalidDescriptor(format!(
                "identifier format on non-text field: {}.{}",
                model.name, field.name
            )));
        }
    }

    Ok(())
}
