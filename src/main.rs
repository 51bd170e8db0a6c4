//! CLI entry point: imports an OpenAPI document and writes its canonical
//! JSON form to stdout. Thin orchestration only; all policy and
//! classification logic lives in the library.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use openapi_importer::{
    AppConfig, CancelToken, ErrorType, FileLoader, ImportError, ImportService, LoaderOptions,
    TracingLogger, VersionPolicy,
};

/// Import and validate an OpenAPI document (YAML or JSON).
///
/// On success the document is re-emitted as canonical JSON on stdout.
/// Failures are reported on stderr with a stable machine-readable kind.
#[derive(Parser, Debug)]
#[command(name = "openapi-importer", version, about)]
struct Cli {
    /// Path to the OpenAPI document.
    spec_file: PathBuf,

    /// Path to a YAML configuration file (accepted major versions).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Permit $ref targets outside the document (disabled by default).
    #[arg(long)]
    allow_external_refs: bool,

    /// Enable verbose output. Repeat for more verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("configuration rejected: {e}");
            return ExitCode::from(2);
        }
    };

    let loader = FileLoader::with_options(LoaderOptions {
        allow_external_refs: cli.allow_external_refs,
    });

    let service = match ImportService::builder()
        .loader(Box::new(loader))
        .logger(Arc::new(TracingLogger))
        .policy(VersionPolicy::new(&config.openapi.supported_majors))
        .build()
    {
        Ok(service) => service,
        Err(e) => {
            tracing::error!("failed to assemble import service: {e}");
            return ExitCode::from(2);
        }
    };

    match service.import(&CancelToken::new(), &cli.spec_file) {
        Ok(doc) => {
            let mut stdout = std::io::stdout().lock();
            if stdout.write_all(&doc.json).and_then(|_| stdout.write_all(b"\n")).is_err() {
                return ExitCode::from(2);
            }
            ExitCode::SUCCESS
        }
        Err(ImportError::Cancelled) => {
            tracing::warn!("import cancelled");
            ExitCode::from(1)
        }
        Err(ImportError::App(e)) => {
            match e.kind() {
                Some(kind) => tracing::error!(kind, "{e}"),
                None => tracing::error!("{e}"),
            }
            ExitCode::from(if e.error_type == ErrorType::Validation {
                1
            } else {
                2
            })
        }
    }
}
