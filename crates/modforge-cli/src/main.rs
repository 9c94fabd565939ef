mod config;
mod logging;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{ArgAction, Parser};
use config::{ConfigError, Settings};
use logging::{LoggingError, init_logging};
use modforge_core::{Error as CoreError, validate_module_name};
use modforge_generate::{GenerationEngine, GenerationError, GenerationReport, RegistrationOutcome};
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "modforge",
    version,
    about = "Scaffold a CRUD module from a Prisma model"
)]
struct Cli {
    /// Module name; resolves the model case-insensitively.
    #[arg(value_name = "MODULE")]
    module: String,
    /// Config file (defaults to ./modforge.toml when present).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Schema fragment directory or single schema file.
    #[arg(long, value_name = "PATH")]
    schema: Option<PathBuf>,
    /// Root directory for generated modules.
    #[arg(long, value_name = "DIR")]
    modules_dir: Option<PathBuf>,
    /// Router index file holding the route table.
    #[arg(long, value_name = "PATH")]
    router_index: Option<PathBuf>,
    /// Render and report without writing anything.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Write the module but leave the router index untouched.
    #[arg(long, default_value_t = false)]
    skip_register: bool,
    /// Print the generation report as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Append JSON logs to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    validate_module_name(&cli.module)?;
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let mut options = Settings::load(cli.config.as_deref())?.into_options();
    if let Some(schema) = cli.schema {
        options.schema_path = schema;
    }
    if let Some(modules_dir) = cli.modules_dir {
        options.modules_dir = modules_dir;
    }
    if let Some(router_index) = cli.router_index {
        options.router_index = router_index;
    }
    options.dry_run = cli.dry_run;
    options.skip_register = cli.skip_register;

    tracing::info!(
        event = "run_started",
        module = %cli.module,
        schema = %options.schema_path.display(),
        dry_run = options.dry_run
    );
    let timer = Instant::now();

    let report = GenerationEngine::new(options).run(&cli.module)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        write_summary(&mut out, &report)?;
    }

    tracing::info!(
        event = "run_finished",
        status = "success",
        duration_ms = timer.elapsed().as_millis() as u64
    );
    Ok(())
}

fn write_summary(out: &mut impl Write, report: &GenerationReport) -> io::Result<()> {
    let verb = if report.dry_run { "Would create" } else { "Created" };
    for artifact in &report.artifacts {
        writeln!(out, "{verb}: {}", artifact.path.display())?;
    }

    let registration = match report.registration {
        RegistrationOutcome::Registered => "registered",
        RegistrationOutcome::AlreadyRegistered => "already registered",
        RegistrationOutcome::Skipped => "not registered",
    };
    writeln!(out, "Route {}: {registration}", report.route_path)?;
    writeln!(
        out,
        "Module `{}` generated from model `{}` ({} create rules, {} update rules)",
        report.module,
        report.model.name,
        report.rules.create.len(),
        report.rules.update.len()
    )
}
