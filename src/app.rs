//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the run configuration (flags, `.env`, defaults)
//! - runs the pipeline
//! - prints reports or launches the TUI
//! - writes optional exports

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{Command, ExportArgs, RunArgs};
use crate::data::cache::DataCache;
use crate::data::loader::DEFAULT_DATA_PATH;
use crate::domain::{RunConfig, YearSelection};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `sider` binary.
pub fn run() -> Result<(), AppError> {
    // We want `sider` and `sider -y 2024` to behave like `sider tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Summary(args) => handle_summary(args),
        Command::Export(args) => handle_export(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

fn handle_summary(args: RunArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let mut cache = DataCache::new();
    let run = pipeline::run_dashboard(&mut cache, &config)?;

    let source = source_label(&config);
    println!("{}", crate::report::format::format_run_summary(&run, &source));
    println!("{}", crate::report::format::format_kpis(run.kpis.as_ref()));
    println!(
        "{}",
        crate::report::format::format_recent_table(&run.filtered, args.tail)
    );

    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.run);
    let mut cache = DataCache::new();
    let run = pipeline::run_dashboard(&mut cache, &config)?;

    for spec in &run.specs {
        if let Some(view) = args.view {
            if spec.view != view {
                continue;
            }
        }
        let path = crate::io::export::write_chart_spec_json(&args.out, spec)?;
        println!("wrote {}", path.display());
    }

    let series_path = args.out.join("series.csv");
    let long = crate::transform::reshape_long(&run.filtered, &crate::domain::Indicator::ALL);
    crate::io::export::write_series_csv(&series_path, &long)?;
    println!("wrote {}", series_path.display());

    Ok(())
}

/// Resolve CLI flags (plus `.env` and defaults) into a `RunConfig`.
pub fn run_config_from_args(args: &RunArgs) -> RunConfig {
    let data_path = args.data.clone().unwrap_or_else(|| {
        dotenvy::dotenv().ok();
        std::env::var("SIDER_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH))
    });

    let years = if args.all_years {
        // Explicit empty selection: every year.
        Some(YearSelection::default())
    } else if args.years.is_empty() {
        // No flag: apply the default-selection policy downstream.
        None
    } else {
        Some(YearSelection::new(args.years.iter().copied()))
    };

    RunConfig {
        data_path,
        years,
        use_sample: args.sample,
        sample_seed: args.seed,
    }
}

pub(crate) fn source_label(config: &RunConfig) -> String {
    if config.use_sample {
        format!("synthetic sample (seed={})", config.sample_seed)
    } else {
        config.data_path.display().to_string()
    }
}

/// Rewrite argv so `sider` defaults to `sider tui`.
///
/// Rules:
/// - `sider`                   -> `sider tui`
/// - `sider -y 2024 ...`       -> `sider tui -y 2024 ...`
/// - `sider --help/--version`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "summary" | "export" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
