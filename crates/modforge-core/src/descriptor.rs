use serde::Serialize;

/// A model located in the persistence schema, with its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    /// Model name exactly as declared in the schema.
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    /// Enumerations referenced by the fields, in first-reference order.
    pub enums: Vec<EnumDescriptor>,
}

impl ModelDescriptor {
    /// Look up a field by its declared name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Look up a referenced enumeration by name.
    pub fn enum_named(&self, name: &str) -> Option<&EnumDescriptor> {
        self.enums.iter().find(|item| item.name == name)
    }
}

/// Structural metadata for one field declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    /// Scalar type name (`String`, `Int`, ...), enum name, or related model name.
    pub type_name: String,
    pub kind: FieldKind,
    pub is_list: bool,
    pub is_required: bool,
    pub has_default_value: bool,
    /// Text field stored as a storage-layer object identifier.
    pub is_identifier_formatted: bool,
}

/// What a field's type refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Scalar,
    Enum,
    Relation,
}

/// Declared enumeration and its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDescriptor {
    pub name: String,
    pub values: Vec<String>,
}
