//! CLI logic for the Cadence animation tool.
//!
//! Reads a TOML diagram description, runs it through the Cadence pipeline and
//! writes a JSON bundle holding the laid-out diagram, its timeline and every
//! sync view.

mod args;
mod config;
mod error;
mod input;

pub use args::Args;
pub use error::CliError;

use std::fs;

use log::{info, warn};
use serde::Serialize;

use cadence::{
    Pipeline,
    config::AppConfig,
    layout::Layout,
    semantic::LayoutAlgorithm,
    sync::{ContinuousAnimation, FrameManifest, NarrationScript},
    timeline::Timeline,
};

use input::DiagramFile;

/// The JSON document written by [`run`].
#[derive(Debug, Serialize)]
struct Bundle<'a> {
    total_duration: f64,
    layout: &'a Layout,
    timeline: &'a Timeline,
    continuous: ContinuousAnimation,
    frames: FrameManifest,
    narration: NarrationScript,
}

/// Run the Cadence CLI application
///
/// This function processes the input file through the Cadence pipeline
/// and writes the resulting bundle to the output file.
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed diagram descriptions
/// - Invalid diagrams or overrides
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing diagram"
    );

    let app_config = apply_overrides(config::load_config(args.config.as_ref())?, args)?;

    let source = fs::read_to_string(&args.input)?;
    let diagram = toml::from_str::<DiagramFile>(&source)
        .map_err(|e| CliError::toml(&args.input, e))?
        .into_diagram()?;

    let pipeline = Pipeline::new(app_config)?;
    let rendered = pipeline.run(&diagram)?;
    for warning in rendered.warnings() {
        warn!(warning:%; "Pipeline warning");
    }

    let bundle = Bundle {
        total_duration: rendered.timeline().total_duration(),
        layout: rendered.layout(),
        timeline: rendered.timeline(),
        continuous: rendered.continuous(),
        frames: rendered.frames()?,
        narration: rendered.narration(),
    };
    fs::write(&args.output, serde_json::to_string_pretty(&bundle)?)?;

    info!(
        output_file = args.output,
        total_duration = bundle.total_duration;
        "Timeline exported successfully"
    );

    Ok(())
}

fn apply_overrides(mut config: AppConfig, args: &Args) -> Result<AppConfig, CliError> {
    if let Some(name) = &args.layout {
        let algorithm: LayoutAlgorithm = name.parse()?;
        let layout = config.layout().clone().with_algorithm(algorithm);
        config = config.with_layout(layout);
    }
    if let Some(fps) = args.fps {
        let sync = config.sync().clone().with_fps(fps);
        config = config.with_sync(sync);
    }
    Ok(config)
}
