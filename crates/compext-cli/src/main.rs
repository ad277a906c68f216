use std::path::PathBuf;

use anyhow::Context;
use compext_cli::cli::args::{Args, parse_args, print_help};
use compext_cli::providers::builtin_providers;
use compext_cli::report::{Report, open_project, project_file_path};
use compext_core::ExtensionError;
use compext_core::paths::{self, APP_NAME, VERSION};

const EXIT_DIAGNOSTICS: i32 = 1;
const EXIT_CONFIG_ERROR: i32 = 2;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "compext_core={default_level},compext_cli={default_level},compext={default_level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(args: &Args) -> anyhow::Result<i32> {
    let project = match &args.project {
        Some(path) => project_file_path(&PathBuf::from(path)),
        None => paths::project_file(
            &std::env::current_dir().context("Failed to read current directory")?,
        ),
    };

    let cache = match open_project(&project, args.extended_diagnostics, builtin_providers()) {
        Ok(cache) => cache,
        Err(e @ (ExtensionError::Config(_) | ExtensionError::Json(_) | ExtensionError::Io(_))) => {
            eprintln!("Error: {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }
        Err(e) => return Err(e).context("Failed to open project"),
    };

    let report = Report::from_cache(&cache);
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text());
    }

    Ok(if report.has_diagnostics() {
        EXIT_DIAGNOSTICS
    } else {
        0
    })
}

fn main() {
    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&raw_args);

    if args.help {
        print_help(APP_NAME);
        return;
    }
    if args.version {
        println!("{APP_NAME} {VERSION}");
        return;
    }

    init_logging(args.verbose);
    for flag in &args.unknown_flags {
        tracing::warn!("Ignoring unknown option {flag}");
    }

    match run(&args) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(EXIT_CONFIG_ERROR);
        }
    }
}
