//! Module scaffolding for modforge.
//!
//! Turns one schema model into validation rules, renders the four module
//! artifacts, writes them under the modules root and registers the module's
//! router in the central route table.

pub mod atomic;
pub mod engine;
pub mod errors;
pub mod materialize;
pub mod model;
pub mod registrar;
pub mod rules;
pub mod templates;

pub use engine::{GenerationEngine, Stage};
pub use errors::GenerationError;
pub use model::{
    ArtifactKind, ArtifactReport, GenerateOptions, GenerationReport, ModuleArtifactBundle,
    RegistrationOutcome,
};
pub use registrar::{RouteRegistration, RouterIndex, register_route};
pub use rules::{RuleMapping, RuleMode, ValidationRuleSet, synthesize};
pub use templates::render_bundle;
