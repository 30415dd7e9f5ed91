//! Command-line argument definitions for the Cadence CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, per-run overrides and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Cadence animation tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input diagram description (TOML)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output JSON bundle
    #[arg(short, long, default_value = "timeline.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Layout algorithm override (grid, horizontal, vertical, radial)
    #[arg(long)]
    pub layout: Option<String>,

    /// Frame rate override for the frame manifest
    #[arg(long)]
    pub fps: Option<f64>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
