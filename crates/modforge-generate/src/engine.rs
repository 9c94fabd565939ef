use std::fmt;
use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};

use modforge_core::{ModelDescriptor, route_path, validate_module_name};
use modforge_introspect::{Adapter, PrismaAdapter, SchemaText, read_schema};

use crate::errors::GenerationError;
use crate::materialize::{artifact_paths, materialize};
use crate::model::{ArtifactReport, GenerateOptions, GenerationReport, RegistrationOutcome};
use crate::registrar::{RouteRegistration, register_route};
use crate::rules::ValidationRuleSet;
use crate::templates::render_bundle;

/// Pipeline stages, in the order a successful run reaches them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Start,
    SchemaLoaded,
    ModelIntrospected,
    RulesSynthesized,
    ArtifactsRendered,
    Materialized,
    Registered,
    Done,
    Failed(String),
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::SchemaLoaded => "schema_loaded",
            Stage::ModelIntrospected => "model_introspected",
            Stage::RulesSynthesized => "rules_synthesized",
            Stage::ArtifactsRendered => "artifacts_rendered",
            Stage::Materialized => "materialized",
            Stage::Registered => "registered",
            Stage::Done => "done",
            Stage::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Failed(reason) => write!(f, "failed: {reason}"),
            other => f.write_str(other.as_str()),
        }
    }
}

struct Progress<'a> {
    module: &'a str,
    stage: Stage,
}

impl<'a> Progress<'a> {
    fn new(module: &'a str) -> Self {
        Self {
            module,
            stage: Stage::Start,
        }
    }

    fn reach(&mut self, stage: Stage) {
        info!(event = "stage_entered", module = self.module, stage = stage.as_str());
        self.stage = stage;
    }

    /// Terminal state for `err`, logged with the last stage reached.
    fn fail(self, err: &GenerationError) -> Stage {
        let failed = Stage::Failed(err.to_string());
        warn!(
            event = "stage_failed",
            module = self.module,
            after = self.stage.as_str(),
            state = %failed
        );
        failed
    }
}

/// Entry point for scaffolding one module from the schema.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
    adapter: PrismaAdapter,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self {
            options,
            adapter: PrismaAdapter,
        }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Run the whole pipeline for `module`.
    ///
    /// Stops at the first failing stage. Nothing is written before the model
    /// has been resolved and all artifacts rendered.
    pub fn run(&self, module: &str) -> Result<GenerationReport, GenerationError> {
        let start = Instant::now();
        let mut progress = Progress::new(module);
        match self.run_stages(module, &mut progress) {
            Ok(report) => {
                progress.reach(Stage::Done);
                info!(
                    event = "generation_finished",
                    module,
                    dry_run = report.dry_run,
                    registration = ?report.registration,
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Ok(report)
            }
            Err(err) => {
                progress.fail(&err);
                Err(err)
            }
        }
    }

    fn run_stages(
        &self,
        module: &str,
        progress: &mut Progress<'_>,
    ) -> Result<GenerationReport, GenerationError> {
        validate_module_name(module)?;

        let schema = read_schema(&self.options.schema_path)?;
        progress.reach(Stage::SchemaLoaded);

        let model = self.introspect(&schema, module)?;
        progress.reach(Stage::ModelIntrospected);

        let rules = ValidationRuleSet::for_model(&model);
        progress.reach(Stage::RulesSynthesized);

        let bundle = render_bundle(module, &model, &rules);
        progress.reach(Stage::ArtifactsRendered);

        let module_dir = self.options.module_dir(module);
        let mut report = GenerationReport {
            module: module.to_string(),
            route_path: route_path(module),
            model,
            rules,
            module_dir: module_dir.clone(),
            artifacts: Vec::new(),
            registration: RegistrationOutcome::Skipped,
            dry_run: self.options.dry_run,
        };

        if self.options.dry_run {
            if module_dir.exists() {
                return Err(GenerationError::ModuleAlreadyExists(module_dir));
            }
            report.artifacts = self.planned_artifacts(module, &module_dir, false);
            return Ok(report);
        }

        materialize(&module_dir, module, &self.options.extension, &bundle)?;
        report.artifacts = self.planned_artifacts(module, &module_dir, true);
        progress.reach(Stage::Materialized);

        if self.options.skip_register {
            info!(event = "registration_skipped", module);
            return Ok(report);
        }

        let registration = RouteRegistration::for_module(module, &self.options.import_prefix);
        report.registration = register_route(
            &self.options.router_index,
            &registration,
            &self.options.route_table,
        )?;
        progress.reach(Stage::Registered);

        Ok(report)
    }

    fn introspect(
        &self,
        schema: &SchemaText,
        module: &str,
    ) -> Result<ModelDescriptor, GenerationError> {
        let model = self.adapter.introspect_model(schema, module)?;
        info!(
            event = "model_resolved",
            engine = self.adapter.engine(),
            module,
            model = %model.name,
            fields = model.fields.len()
        );
        Ok(model)
    }

    fn planned_artifacts(
        &self,
        module: &str,
        module_dir: &Path,
        written: bool,
    ) -> Vec<ArtifactReport> {
        artifact_paths(module_dir, module, &self.options.extension)
            .into_iter()
            .map(|(kind, path)| ArtifactReport {
                kind,
                path,
                written,
            })
            .collect()
    }
}
