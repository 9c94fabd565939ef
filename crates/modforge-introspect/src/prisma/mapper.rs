use std::collections::BTreeMap;

use modforge_core::{EnumDescriptor, Error, FieldDescriptor, FieldKind, ModelDescriptor, Result};

use super::parser::{Block, BlockBody, BlockKeyword, FieldDecl, SchemaDocument, TypeModifier};

/// Built-in scalar types of the schema language.
pub const SCALAR_TYPES: &[&str] = &[
    "String",
    "Boolean",
    "Int",
    "BigInt",
    "Float",
    "Decimal",
    "DateTime",
    "Json",
    "Bytes",
    "Unsupported",
];

/// Native type attribute marking a text field as an object identifier.
const OBJECT_ID_ATTRIBUTE: &str = "db.ObjectId";

/// Find the single model (or view) named `name`, ignoring case. Models that
/// differ only by case make the lookup ambiguous.
pub fn find_model<'d>(document: &'d SchemaDocument, name: &str) -> Result<&'d Block> {
    let candidates: Vec<&Block> = document
        .blocks
        .iter()
        .filter(|block| matches!(block.keyword, BlockKeyword::Model | BlockKeyword::View))
        .filter(|block| block.name.eq_ignore_ascii_case(name))
        .collect();

    match candidates.as_slice() {
        [] => Err(Error::ModelNotFound(name.to_string())),
        [single] => Ok(*single),
        many => Err(Error::AmbiguousModel {
            name: name.to_string(),
            candidates: many.iter().map(|block| block.name.clone()).collect(),
        }),
    }
}

pub fn map_model(document: &SchemaDocument, block: &Block) -> ModelDescriptor {
    let catalog = TypeCatalog::new(document);
    let decls: &[FieldDecl] = match &block.body {
        BlockBody::Fields(fields) => fields,
        _ => &[],
    };

    let fields: Vec<FieldDescriptor> = decls
        .iter()
        .map(|decl| map_field(decl, &catalog))
        .collect();

    let mut enums: Vec<EnumDescriptor> = Vec::new();
    for field in &fields {
        if field.kind != FieldKind::Enum || enums.iter().any(|item| item.name == field.type_name) {
            continue;
        }
        if let Some(values) = catalog.enums.get(field.type_name.as_str()) {
            enums.push(EnumDescriptor {
                name: field.type_name.clone(),
                values: values.to_vec(),
            });
        }
    }

    ModelDescriptor {
        name: block.name.clone(),
        fields,
        enums,
    }
}

fn map_field(decl: &FieldDecl, catalog: &TypeCatalog<'_>) -> FieldDescriptor {
    let kind = catalog.kind_of(&decl.type_name);
    FieldDescriptor {
        name: decl.name.clone(),
        type_name: decl.type_name.clone(),
        kind,
        is_list: decl.modifier == TypeModifier::List,
        is_required: decl.modifier != TypeModifier::Optional,
        has_default_value: decl.has_attribute("default"),
        is_identifier_formatted: kind == FieldKind::Scalar
            && decl.type_name == "String"
            && decl.has_attribute(OBJECT_ID_ATTRIBUTE),
    }
}

/// Names declared anywhere in the schema, by what they declare.
struct TypeCatalog<'d> {
    enums: BTreeMap<&'d str, &'d [String]>,
    records: Vec<&'d str>,
}

impl<'d> TypeCatalog<'d> {
    fn new(document: &'d SchemaDocument) -> Self {
        let mut enums = BTreeMap::new();
        let mut records = Vec::new();
        for block in &document.blocks {
            match (&block.keyword, &block.body) {
                (BlockKeyword::Enum, BlockBody::Values(values)) => {
                    enums.insert(block.name.as_str(), values.as_slice());
                }
                (BlockKeyword::Model | BlockKeyword::View | BlockKeyword::Type, _) => {
                    records.push(block.name.as_str());
                }
                _ => {}
            }
        }
        Self { enums, records }
    }

    fn kind_of(&self, type_name: &str) -> FieldKind {
        if SCALAR_TYPES.contains(&type_name) {
            FieldKind::Scalar
        } else if self.enums.contains_key(type_name) {
            FieldKind::Enum
        } else if self.records.contains(&type_name) {
            FieldKind::Relation
        } else {
            FieldKind::Scalar
        }
    }
}
