//! Command-line parsing for the steel-trade dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::View;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sider", version, about = "Brazilian steel-trade dashboard (Aço Brasil / MDIC)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print dataset stats, KPIs, and the most recent months.
    Summary(RunArgs),
    /// Write chart specs (JSON) and the long-form series (CSV) to a directory.
    Export(ExportArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same pipeline as `sider summary`, but renders the views
    /// as tabs in a terminal UI using Ratatui.
    Tui(RunArgs),
}

/// Common options shared by every subcommand.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Dataset CSV path (falls back to $SIDER_DATA, then the published filename).
    #[arg(short = 'd', long)]
    pub data: Option<PathBuf>,

    /// Years to include (repeatable or comma-separated). Defaults to the last
    /// 3 years present in the dataset.
    #[arg(short = 'y', long, value_delimiter = ',')]
    pub years: Vec<i32>,

    /// Include every year in the dataset.
    #[arg(long)]
    pub all_years: bool,

    /// Use a deterministic synthetic dataset instead of reading a file.
    #[arg(long)]
    pub sample: bool,

    /// Seed for synthetic data generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Rows to show in the recent-months table.
    #[arg(long, default_value_t = 12)]
    pub tail: usize,
}

/// Options for exporting artifacts.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Output directory for exported artifacts.
    #[arg(short = 'o', long, default_value = "export")]
    pub out: PathBuf,

    /// Restrict the export to a single view.
    #[arg(long, value_enum)]
    pub view: Option<View>,
}
