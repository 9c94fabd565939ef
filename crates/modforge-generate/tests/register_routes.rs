use std::fs;
use std::path::PathBuf;

use modforge_generate::{
    GenerationError, RegistrationOutcome, RouteRegistration, RouterIndex, register_route,
};

const TABLE: &str = "moduleRoutes";

fn fixture_index() -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/router/index.ts");
    fs::read_to_string(path).expect("read router fixture")
}

fn temp_index(label: &str, text: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("modforge_registrar_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("index.ts");
    fs::write(&path, text).expect("write router index");
    path
}

fn invoice() -> RouteRegistration {
    RouteRegistration::for_module("invoice", "../modules")
}

fn register_text(text: &str) -> Result<(RegistrationOutcome, String), GenerationError> {
    let mut index = RouterIndex::from_text("index.ts", text);
    let outcome = index.register(&invoice(), TABLE)?;
    Ok((outcome, index.into_text()))
}

#[test]
fn canonical_import_and_entry() {
    let registration = RouteRegistration::for_module("invoiceLine", "../modules/");
    assert_eq!(
        registration.import_statement,
        "import { invoiceLineRoutes } from '../modules/invoiceLine/invoiceLine.routes';"
    );
    assert_eq!(registration.route_path, "/invoicelines");
    assert_eq!(
        registration.entry("  "),
        "  {\n    path: '/invoicelines',\n    route: invoiceLineRoutes,\n  },\n"
    );
}

#[test]
fn inserts_after_last_import_and_before_table_close() {
    let (outcome, text) = register_text(&fixture_index()).expect("register");
    assert_eq!(outcome, RegistrationOutcome::Registered);

    let expected = "\
import express from 'express';
import { userRoutes } from '../modules/user/user.routes';
import { invoiceRoutes } from '../modules/invoice/invoice.routes';

const router = express.Router();

const moduleRoutes = [
  {
    path: '/users',
    route: userRoutes,
  },
  {
    path: '/invoices',
    route: invoiceRoutes,
  },
];

moduleRoutes.forEach((route) => router.use(route.path, route.route));

export default router;
";
    assert_eq!(text, expected);
}

#[test]
fn single_import_single_entry_grows_to_two_of_each() {
    let original = "import { userRoutes } from '../modules/user/user.routes';\n\nconst moduleRoutes = [\n  { path: '/users', route: userRoutes },\n];\n";
    let (_, text) = register_text(original).expect("register");

    let index = RouterIndex::from_text("index.ts", text.as_str());
    assert_eq!(
        index.imports().expect("imports"),
        vec![
            "import { userRoutes } from '../modules/user/user.routes';",
            "import { invoiceRoutes } from '../modules/invoice/invoice.routes';",
        ]
    );
    let table = index
        .route_table(TABLE)
        .expect("valid pattern")
        .expect("route table");
    assert_eq!(table.paths, vec!["/users", "/invoices"]);
    assert!(text.ends_with("    route: invoiceRoutes,\n  },\n];\n"));
}

#[test]
fn adds_missing_comma_after_previous_entry() {
    let original = "import a from 'a';\nconst moduleRoutes = [\n  { path: '/users', route: userRoutes } // users\n];\n";
    let (_, text) = register_text(original).expect("register");
    assert!(
        text.contains("  { path: '/users', route: userRoutes }, // users\n  {\n    path: '/invoices',"),
        "{text}"
    );
}

#[test]
fn fills_empty_inline_table() {
    let original = "import a from 'a';\nexport const moduleRoutes: { path: string; route: Router }[] = [];\n";
    let (_, text) = register_text(original).expect("register");
    assert!(
        text.ends_with(
            "= [\n  {\n    path: '/invoices',\n    route: invoiceRoutes,\n  },\n];\n"
        ),
        "{text}"
    );
}

#[test]
fn brackets_inside_strings_and_comments_do_not_end_the_table() {
    let original = "import a from 'a';\nconst moduleRoutes = [\n  // ]\n  { path: '/x]', route: xRoutes, tags: ['a'] },\n];\nconst other = [];\n";
    let (_, text) = register_text(original).expect("register");
    assert!(text.contains("tags: ['a'] },\n  {\n    path: '/invoices',"), "{text}");
    assert!(text.ends_with("  },\n];\nconst other = [];\n"), "{text}");
}

#[test]
fn existing_path_only_adds_import() {
    let original = "import a from 'a';\nconst moduleRoutes = [\n  { path: '/invoices', route: legacyRoutes },\n];\n";
    let (outcome, text) = register_text(original).expect("register");
    assert_eq!(outcome, RegistrationOutcome::Registered);
    assert_eq!(text.matches("path: '/invoices'").count(), 1);
    assert!(text.contains(&invoice().import_statement));
}

#[test]
fn missing_anchors_leave_text_untouched() {
    let mut index = RouterIndex::from_text("index.ts", "const moduleRoutes = [];\n");
    let err = index.register(&invoice(), TABLE).unwrap_err();
    assert!(matches!(err, GenerationError::NoImportAnchor(_)));
    assert_eq!(index.text(), "const moduleRoutes = [];\n");

    let mut index = RouterIndex::from_text("index.ts", "import a from 'a';\nconst routes = [];\n");
    let err = index.register(&invoice(), TABLE).unwrap_err();
    assert!(matches!(
        err,
        GenerationError::NoRouteTableAnchor { ref table, .. } if table == TABLE
    ));
    assert_eq!(index.text(), "import a from 'a';\nconst routes = [];\n");
}

#[test]
fn commented_out_imports_are_not_anchors() {
    let original = "\
import express from 'express';
import { userRoutes } from '../modules/user/user.routes';
/*
import { oldRoutes } from '../modules/old/old.routes';
*/
const moduleRoutes = [
  { path: '/users', route: userRoutes },
];
";
    let (outcome, text) = register_text(original).expect("register");
    assert_eq!(outcome, RegistrationOutcome::Registered);

    let import_at = text.find(&invoice().import_statement).expect("new import");
    let comment_at = text.find("/*").expect("comment start");
    assert!(import_at < comment_at, "{text}");
    assert!(text.contains(
        "import { userRoutes } from '../modules/user/user.routes';\nimport { invoiceRoutes } from '../modules/invoice/invoice.routes';\n/*\n"
    ));
    assert!(text.contains("/*\nimport { oldRoutes } from '../modules/old/old.routes';\n*/\n"));

    let index = RouterIndex::from_text("index.ts", text.as_str());
    assert_eq!(index.imports().expect("imports").len(), 3);
}

#[test]
fn table_mentioned_in_comment_is_ignored() {
    let original = "\
import { userRoutes } from '../modules/user/user.routes';
// entries go into moduleRoutes = [ ... ] below
const label = 'moduleRoutes = [';
const moduleRoutes = [
  { path: '/users', route: userRoutes },
];
";
    let (outcome, text) = register_text(original).expect("register");
    assert_eq!(outcome, RegistrationOutcome::Registered);
    assert!(text.contains("// entries go into moduleRoutes = [ ... ] below\n"));
    assert!(text.contains("const label = 'moduleRoutes = [';\n"));
    assert!(
        text.ends_with(
            "  { path: '/users', route: userRoutes },\n  {\n    path: '/invoices',\n    route: invoiceRoutes,\n  },\n];\n"
        ),
        "{text}"
    );

    let index = RouterIndex::from_text("index.ts", text.as_str());
    let table = index
        .route_table(TABLE)
        .expect("valid pattern")
        .expect("route table");
    assert_eq!(table.paths, vec!["/users", "/invoices"]);
}

#[test]
fn commented_import_does_not_count_as_registered() {
    let original = "\
import { userRoutes } from '../modules/user/user.routes';
// import { invoiceRoutes } from '../modules/invoice/invoice.routes';
const moduleRoutes = [
  { path: '/users', route: userRoutes },
];
";
    let index = RouterIndex::from_text("index.ts", original);
    assert!(!index.contains_import(&invoice().import_statement));

    let (outcome, text) = register_text(original).expect("register");
    assert_eq!(outcome, RegistrationOutcome::Registered);
    assert!(text.contains(
        "import { userRoutes } from '../modules/user/user.routes';\nimport { invoiceRoutes } from '../modules/invoice/invoice.routes';\n// import"
    ));
    assert!(text.contains("path: '/invoices',"));

    let (second, again) = register_text(&text).expect("second registration");
    assert_eq!(second, RegistrationOutcome::AlreadyRegistered);
    assert_eq!(again, text);
}

#[test]
fn registering_twice_is_byte_identical() {
    let path = temp_index("idempotent", &fixture_index());

    let first = register_route(&path, &invoice(), TABLE).expect("first registration");
    let after_first = fs::read(&path).expect("read after first");
    let second = register_route(&path, &invoice(), TABLE).expect("second registration");
    let after_second = fs::read(&path).expect("read after second");

    assert_eq!(first, RegistrationOutcome::Registered);
    assert_eq!(second, RegistrationOutcome::AlreadyRegistered);
    assert_eq!(after_first, after_second);

    let leftovers: Vec<_> = fs::read_dir(path.parent().expect("parent"))
        .expect("list dir")
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name() != "index.ts")
        .collect();
    assert!(leftovers.is_empty(), "temp file left behind");
}

#[test]
fn missing_router_index_is_reported() {
    let path = std::env::temp_dir()
        .join(format!("modforge_registrar_missing_{}", uuid::Uuid::new_v4()))
        .join("index.ts");
    let err = register_route(&path, &invoice(), TABLE).unwrap_err();
    assert!(matches!(err, GenerationError::RouterIndexMissing(p) if p == path));
}
