//! Maps field metadata to payload validation rules.
//!
//! Rules are `zod` expressions. A field gets at most one rule per mode; fields
//! the synthesizer cannot express are left out of the mapping.

use serde::Serialize;

use modforge_core::{FieldDescriptor, FieldKind, ModelDescriptor, is_system_field};

/// Pattern for 24-character hexadecimal object identifiers.
pub const OBJECT_ID_RULE: &str = "z.string().regex(/^[0-9a-fA-F]{24}$/, 'Invalid ObjectId')";

/// Which payload the rules validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleMode {
    Create,
    Update,
}

/// One `field: rule` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRule {
    pub field: String,
    pub expression: String,
}

/// Ordered rules for one mode, in field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RuleMapping {
    rules: Vec<FieldRule>,
}

impl RuleMapping {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.field == field)
            .map(|rule| rule.expression.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldRule> {
        self.rules.iter()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.field.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Create and update rules for one model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationRuleSet {
    pub create: RuleMapping,
    pub update: RuleMapping,
}

impl ValidationRuleSet {
    pub fn for_model(model: &ModelDescriptor) -> Self {
        Self {
            create: synthesize(model, RuleMode::Create),
            update: synthesize(model, RuleMode::Update),
        }
    }
}

/// Build the rule mapping of `model` for `mode`.
pub fn synthesize(model: &ModelDescriptor, mode: RuleMode) -> RuleMapping {
    let rules = model
        .fields
        .iter()
        .filter_map(|field| {
            rule_for_field(model, field, mode).map(|expression| FieldRule {
                field: field.name.clone(),
                expression,
            })
        })
        .collect();
    RuleMapping { rules }
}

/// Rule expression for one field, or `None` when the field is not validated.
pub fn rule_for_field(
    model: &ModelDescriptor,
    field: &FieldDescriptor,
    mode: RuleMode,
) -> Option<String> {
    if is_system_field(&field.name) || field.kind == FieldKind::Relation {
        return None;
    }

    let base = base_rule(model, field)?;
    let rule = if field.is_list {
        format!("z.array({base})")
    } else {
        base
    };

    let optional = match mode {
        RuleMode::Update => true,
        RuleMode::Create => !field.is_required && !field.has_default_value,
    };

    Some(if optional {
        format!("{rule}.optional()")
    } else {
        rule
    })
}

fn base_rule(model: &ModelDescriptor, field: &FieldDescriptor) -> Option<String> {
    match field.kind {
        FieldKind::Relation => None,
        FieldKind::Enum => {
            let values = &model.enum_named(&field.type_name)?.values;
            if values.is_empty() {
                return None;
            }
            let members: Vec<String> = values.iter().map(|value| format!("'{value}'")).collect();
            Some(format!("z.enum([{}])", members.join(", ")))
        }
        FieldKind::Scalar if field.is_identifier_formatted => Some(OBJECT_ID_RULE.to_string()),
        FieldKind::Scalar => scalar_rule(&field.type_name).map(str::to_string),
    }
}

fn scalar_rule(type_name: &str) -> Option<&'static str> {
    match type_name {
        "String" => Some("z.string()"),
        "Int" | "BigInt" => Some("z.number().int()"),
        "Float" | "Decimal" => Some("z.number()"),
        "Boolean" => Some("z.boolean()"),
        "DateTime" => Some("z.coerce.date()"),
        _ => None,
    }
}
