use std::fs;
use std::path::{Path, PathBuf};

use modforge_core::Error as CoreError;
use modforge_generate::{
    ArtifactKind, GenerateOptions, GenerationEngine, GenerationError, RegistrationOutcome,
};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn temp_project(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("modforge_generate_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(dir.join("src/app/routes")).expect("create temp project");
    fs::copy(
        fixtures().join("router/index.ts"),
        dir.join("src/app/routes/index.ts"),
    )
    .expect("copy router index");
    dir
}

fn options_for(project: &Path) -> GenerateOptions {
    GenerateOptions {
        schema_path: fixtures().join("schema"),
        modules_dir: project.join("src/app/modules"),
        router_index: project.join("src/app/routes/index.ts"),
        ..GenerateOptions::default()
    }
}

fn router_text(project: &Path) -> String {
    fs::read_to_string(project.join("src/app/routes/index.ts")).expect("read router index")
}

fn read_artifacts(dir: &Path, module: &str) -> Vec<String> {
    ArtifactKind::ALL
        .iter()
        .map(|kind| {
            fs::read_to_string(dir.join(kind.file_name(module, "ts"))).expect("read artifact")
        })
        .collect()
}

#[test]
fn generates_module_and_registers_route() {
    let project = temp_project("full");
    let engine = GenerationEngine::new(options_for(&project));

    let report = engine.run("invoice").expect("run generation");

    let module_dir = project.join("src/app/modules/invoice");
    assert_eq!(report.module_dir, module_dir);
    assert_eq!(report.model.name, "Invoice");
    assert_eq!(report.route_path, "/invoices");
    assert_eq!(report.registration, RegistrationOutcome::Registered);
    assert!(!report.dry_run);

    let mut names: Vec<String> = fs::read_dir(&module_dir)
        .expect("list module dir")
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "invoice.controller.ts",
            "invoice.routes.ts",
            "invoice.service.ts",
            "invoice.validation.ts",
        ]
    );
    assert!(report.artifacts.iter().all(|artifact| artifact.written));
    assert_eq!(
        report.artifact_paths().collect::<Vec<_>>(),
        ArtifactKind::ALL
            .iter()
            .map(|kind| module_dir.join(kind.file_name("invoice", "ts")))
            .collect::<Vec<_>>()
    );

    let golden = fs::read_to_string(fixtures().join("golden/invoice.validation.ts"))
        .expect("read golden validation");
    let validation =
        fs::read_to_string(module_dir.join("invoice.validation.ts")).expect("read validation");
    assert_eq!(validation, golden);

    let router = router_text(&project);
    assert!(router.contains("import { invoiceRoutes } from '../modules/invoice/invoice.routes';"));
    assert!(router.contains("    path: '/invoices',\n    route: invoiceRoutes,\n"));
}

#[test]
fn rendered_artifacts_use_module_names() {
    let project = temp_project("names");
    let engine = GenerationEngine::new(options_for(&project));
    engine.run("invoice").expect("run generation");

    let dir = project.join("src/app/modules/invoice");
    let controller = fs::read_to_string(dir.join("invoice.controller.ts")).expect("controller");
    let service = fs::read_to_string(dir.join("invoice.service.ts")).expect("service");
    let routes = fs::read_to_string(dir.join("invoice.routes.ts")).expect("routes");

    assert!(controller.contains("import { invoiceService } from './invoice.service';"));
    assert!(controller.contains("const createInvoice = catchAsync("));
    assert!(service.contains("const invoiceSearchableFields: string[] = ['note'];"));
    assert!(service.contains("prisma.invoice.findMany({"));
    assert!(routes.contains("validateRequest(invoiceValidation.createInvoiceZodSchema)"));
    assert!(routes.ends_with("export const invoiceRoutes = router;\n"));
    for text in [&controller, &service, &routes] {
        assert!(!text.contains("{name}") && !text.contains("{Name}"));
    }
}

#[test]
fn identical_inputs_render_identical_artifacts() {
    let first = temp_project("determinism_a");
    let second = temp_project("determinism_b");

    GenerationEngine::new(options_for(&first))
        .run("product")
        .expect("first run");
    GenerationEngine::new(options_for(&second))
        .run("product")
        .expect("second run");

    assert_eq!(
        read_artifacts(&first.join("src/app/modules/product"), "product"),
        read_artifacts(&second.join("src/app/modules/product"), "product")
    );
}

#[test]
fn missing_model_writes_nothing() {
    let project = temp_project("missing_model");
    let before = router_text(&project);
    let engine = GenerationEngine::new(options_for(&project));

    let err = engine.run("shipment").unwrap_err();

    assert!(matches!(
        err,
        GenerationError::Core(CoreError::ModelNotFound(ref name)) if name == "shipment"
    ));
    assert!(!project.join("src/app/modules").exists());
    assert_eq!(router_text(&project), before);
}

#[test]
fn second_run_fails_and_keeps_first_files() {
    let project = temp_project("existing");
    let engine = GenerationEngine::new(options_for(&project));
    engine.run("invoice").expect("first run");

    let module_dir = project.join("src/app/modules/invoice");
    let artifacts = read_artifacts(&module_dir, "invoice");
    let router = router_text(&project);

    let err = engine.run("invoice").unwrap_err();

    assert!(matches!(err, GenerationError::ModuleAlreadyExists(ref dir) if *dir == module_dir));
    assert_eq!(read_artifacts(&module_dir, "invoice"), artifacts);
    assert_eq!(router_text(&project), router);
}

#[test]
fn dry_run_touches_nothing() {
    let project = temp_project("dry_run");
    let before = router_text(&project);
    let options = GenerateOptions {
        dry_run: true,
        ..options_for(&project)
    };

    let report = GenerationEngine::new(options).run("invoice").expect("dry run");

    assert!(report.dry_run);
    assert_eq!(report.registration, RegistrationOutcome::Skipped);
    assert_eq!(report.artifacts.len(), 4);
    assert!(report.artifacts.iter().all(|artifact| !artifact.written));
    assert!(!project.join("src/app/modules").exists());
    assert_eq!(router_text(&project), before);
}

#[test]
fn skip_register_leaves_router_alone() {
    let project = temp_project("skip_register");
    let before = router_text(&project);
    let options = GenerateOptions {
        skip_register: true,
        ..options_for(&project)
    };

    let report = GenerationEngine::new(options).run("invoice").expect("run");

    assert_eq!(report.registration, RegistrationOutcome::Skipped);
    assert!(project.join("src/app/modules/invoice/invoice.routes.ts").is_file());
    assert_eq!(router_text(&project), before);
}

#[test]
fn invalid_module_name_fails_before_reading_schema() {
    let project = temp_project("invalid_name");
    let options = GenerateOptions {
        schema_path: project.join("does-not-exist"),
        ..options_for(&project)
    };

    let err = GenerationEngine::new(options).run("../invoice").unwrap_err();

    assert!(matches!(
        err,
        GenerationError::Core(CoreError::InvalidModuleName(_))
    ));
    assert!(!project.join("src/app/modules").exists());
}

#[test]
fn missing_schema_is_reported() {
    let project = temp_project("missing_schema");
    let options = GenerateOptions {
        schema_path: project.join("prisma/schema"),
        ..options_for(&project)
    };

    let err = GenerationEngine::new(options).run("invoice").unwrap_err();

    assert!(matches!(
        err,
        GenerationError::Core(CoreError::SchemaNotFound(_))
    ));
}

#[test]
fn missing_router_index_surfaces_after_materializing() {
    let project = temp_project("missing_router");
    fs::remove_file(project.join("src/app/routes/index.ts")).expect("remove router index");

    let err = GenerationEngine::new(options_for(&project))
        .run("invoice")
        .unwrap_err();

    assert!(matches!(err, GenerationError::RouterIndexMissing(_)));
    assert!(project.join("src/app/modules/invoice").is_dir());
}
