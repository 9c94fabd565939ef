//! Fixed artifact templates and slot substitution.
//!
//! A slot is `{slotName}` with no inner whitespace. Only the slots passed to
//! [`render`] are replaced; every other brace in the template is copied as-is,
//! and substituted values are never scanned again.

use modforge_core::{FieldKind, ModelDescriptor, capitalize, is_system_field};

use crate::model::{ArtifactKind, ModuleArtifactBundle};
use crate::rules::{RuleMapping, ValidationRuleSet};

const CONTROLLER_TEMPLATE: &str = include_str!("../templates/controller.ts.tmpl");
const SERVICE_TEMPLATE: &str = include_str!("../templates/service.ts.tmpl");
const ROUTES_TEMPLATE: &str = include_str!("../templates/routes.ts.tmpl");
const VALIDATION_TEMPLATE: &str = include_str!("../templates/validation.ts.tmpl");

/// Body line used when a mode has no rules.
pub const EMPTY_RULES_PLACEHOLDER: &str = "    // no fields to validate";

const RULE_INDENT: &str = "    ";

pub fn template_for(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Controller => CONTROLLER_TEMPLATE,
        ArtifactKind::Service => SERVICE_TEMPLATE,
        ArtifactKind::Routes => ROUTES_TEMPLATE,
        ArtifactKind::Validation => VALIDATION_TEMPLATE,
    }
}

/// Render all four artifacts for `module`.
pub fn render_bundle(
    module: &str,
    model: &ModelDescriptor,
    rules: &ValidationRuleSet,
) -> ModuleArtifactBundle {
    let capitalized = capitalize(module);
    let create_rules = render_rule_body(&rules.create);
    let update_rules = render_rule_body(&rules.update);
    let searchable = searchable_fields(model);

    let slots = [
        ("name", module),
        ("Name", capitalized.as_str()),
        ("createRules", create_rules.as_str()),
        ("updateRules", update_rules.as_str()),
        ("searchableFields", searchable.as_str()),
    ];

    let artifact = |kind| finish(render(template_for(kind), &slots));
    ModuleArtifactBundle {
        controller: artifact(ArtifactKind::Controller),
        service: artifact(ArtifactKind::Service),
        routes: artifact(ArtifactKind::Routes),
        validation: artifact(ArtifactKind::Validation),
    }
}

/// Substitute `{slot}` occurrences whose name appears in `slots`.
pub fn render(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let name = &after[..name_len];
        let closed = after[name_len..].starts_with('}');

        match slots.iter().find(|(slot, _)| *slot == name) {
            Some((_, value)) if closed && !name.is_empty() => {
                out.push_str(value);
                rest = &after[name_len + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// One `field: rule,` line per rule, or the placeholder line.
pub fn render_rule_body(mapping: &RuleMapping) -> String {
    if mapping.is_empty() {
        return EMPTY_RULES_PLACEHOLDER.to_string();
    }
    mapping
        .iter()
        .map(|rule| format!("{RULE_INDENT}{}: {},", rule.field, rule.expression))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Quoted names of plain text fields, used for free-text search.
fn searchable_fields(model: &ModelDescriptor) -> String {
    model
        .fields
        .iter()
        .filter(|field| {
            field.kind == FieldKind::Scalar
                && field.type_name == "String"
                && !field.is_list
                && !field.is_identifier_formatted
                && !is_system_field(&field.name)
        })
        .map(|field| format!("'{}'", field.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn finish(text: String) -> String {
    let mut text = text.trim().to_string();
    text.push('\n');
    text
}
