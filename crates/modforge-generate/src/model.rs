use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use modforge_core::ModelDescriptor;

use crate::rules::ValidationRuleSet;

/// Options for the generation engine.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Schema fragment directory or single schema file.
    pub schema_path: PathBuf,
    /// Root under which each module gets its own directory.
    pub modules_dir: PathBuf,
    /// Central router registration file.
    pub router_index: PathBuf,
    /// Extension of generated files, without the dot.
    pub extension: String,
    /// Name of the route table array in the router index.
    pub route_table: String,
    /// Import path prefix from the router index to the modules root.
    pub import_prefix: String,
    /// Render only; never touch the filesystem.
    pub dry_run: bool,
    /// Leave the router index untouched.
    pub skip_register: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            schema_path: PathBuf::from("prisma/schema"),
            modules_dir: PathBuf::from("src/app/modules"),
            router_index: PathBuf::from("src/app/routes/index.ts"),
            extension: "ts".to_string(),
            route_table: "moduleRoutes".to_string(),
            import_prefix: "../modules".to_string(),
            dry_run: false,
            skip_register: false,
        }
    }
}

impl GenerateOptions {
    pub fn module_dir(&self, module: &str) -> PathBuf {
        self.modules_dir.join(module)
    }
}

/// The four artifacts written for every module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Controller,
    Service,
    Routes,
    Validation,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Controller,
        ArtifactKind::Service,
        ArtifactKind::Routes,
        ArtifactKind::Validation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Controller => "controller",
            ArtifactKind::Service => "service",
            ArtifactKind::Routes => "routes",
            ArtifactKind::Validation => "validation",
        }
    }

    /// `{module}.{kind}.{extension}`
    pub fn file_name(&self, module: &str, extension: &str) -> String {
        format!("{module}.{}.{extension}", self.as_str())
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendered text of every artifact of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleArtifactBundle {
    pub controller: String,
    pub service: String,
    pub routes: String,
    pub validation: String,
}

impl ModuleArtifactBundle {
    pub fn text(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Controller => &self.controller,
            ArtifactKind::Service => &self.service,
            ArtifactKind::Routes => &self.routes,
            ArtifactKind::Validation => &self.validation,
        }
    }

    /// Artifacts in write order, paired with their kind.
    pub fn iter(&self) -> impl Iterator<Item = (ArtifactKind, &str)> {
        ArtifactKind::ALL.into_iter().map(|kind| (kind, self.text(kind)))
    }
}

/// What happened to the router index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationOutcome {
    Registered,
    AlreadyRegistered,
    Skipped,
}

/// One artifact of the run.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactReport {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub written: bool,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub module: String,
    pub route_path: String,
    pub model: ModelDescriptor,
    pub rules: ValidationRuleSet,
    pub module_dir: PathBuf,
    pub artifacts: Vec<ArtifactReport>,
    pub registration: RegistrationOutcome,
    pub dry_run: bool,
}

impl GenerationReport {
    pub fn artifact_paths(&self) -> impl Iterator<Item = &Path> {
        self.artifacts.iter().map(|artifact| artifact.path.as_path())
    }
}
