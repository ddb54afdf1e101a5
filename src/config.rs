// src/config.rs
use crate::constants::{DEFAULT_TOOL_NAME, TOOL_ENV_VAR};
use crate::error::AppError;
use crate::output::{BaseNameRule, NamingRules, OutputOverrides};
use crate::target::{ExportParams, Target};
use crate::types::{BaseName, ExportDpi, PdfVersion, PsLevel};
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(
    name = "svg2vector",
    author,
    version,
    about = "Converts SVG graphics into other vector formats using Inkscape, with options for handling layers",
    long_about = None
)]
pub struct CommandLineInput {
    /// Input SVG or SVGZ file
    #[arg(short = 'f', long = "input", value_name = "FILE")]
    pub input: String,

    /// Output format
    #[arg(short, long, value_enum)]
    pub target: Target,

    /// Output file for single-file conversions (target extension optional)
    #[arg(short, long)]
    pub output_file: Option<String>,

    /// Output directory
    #[arg(short = 'd', long)]
    pub output_directory: Option<PathBuf>,

    /// Create missing output directories
    #[arg(long, default_value_t = false)]
    pub create_directories: bool,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite_existing: bool,

    /// Keep temporary files and directories after the run
    #[arg(long = "keep-tmp-artifacts", default_value_t = false)]
    pub keep_tmp_artifacts: bool,

    /// Only show what would be done, without touching the filesystem or running Inkscape
    #[arg(short, long, default_value_t = false)]
    pub simulate: bool,

    /// Create one output file per layer
    #[arg(short = 'l', long, conflicts_with = "layers_if_exist")]
    pub layers: bool,

    /// Create one output file per layer if the input has layers
    #[arg(short = 'L', long)]
    pub layers_if_exist: bool,

    /// Add the layer index to layer output file names
    #[arg(short = 'i', long)]
    pub layer_index: bool,

    /// Add the layer id to layer output file names
    #[arg(short = 'I', long)]
    pub layer_id: bool,

    /// Leave the input base name out of layer output file names
    #[arg(short = 'n', long)]
    pub no_basename: bool,

    /// Base name for layer output files instead of the input file name
    #[arg(short = 'b', long, value_name = "NAME")]
    pub use_basename: Option<String>,

    /// Switch on all layers before converting to a single file
    #[arg(long)]
    pub all_layers: bool,

    /// Convert text to paths
    #[arg(long)]
    pub text_as_shape: bool,

    /// Resolution for PNG export
    #[arg(long, value_name = "DPI")]
    pub export_dpi: Option<u32>,

    /// PDF version for PDF export (1.4 or 1.5)
    #[arg(long, value_name = "VERSION")]
    pub export_pdf_version: Option<String>,

    /// PostScript level for PS export (2 or 3)
    #[arg(long, value_name = "LEVEL")]
    pub export_ps_level: Option<u8>,

    /// Convert to temporary SVG files first, then to the target
    #[arg(short = 'g', long)]
    pub svg_first: bool,

    /// Isolate layers by rewriting the document instead of asking Inkscape
    #[arg(short = 'm', long)]
    pub manual_layers: bool,

    /// Inkscape executable (defaults to $INKSCAPE_EXEC, then `inkscape` on PATH)
    #[arg(short = 'x', long, value_name = "PATH")]
    pub inkscape_exec: Option<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Show progress messages
    #[arg(long, default_value_t = false)]
    pub progress: bool,

    /// Print errors only
    #[arg(short, long, default_value_t = false, conflicts_with_all = ["verbose", "progress"])]
    pub quiet: bool,

    /// Also write the log to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Print a JSON report of the run on stdout
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl CommandLineInput {
    /// Console log level selected by the verbosity flags.
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else if self.verbose {
            LevelFilter::Debug
        } else if self.progress {
            LevelFilter::Info
        } else {
            LevelFilter::Warn
        }
    }
}

/// How a run treats the layers of its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayerRequest {
    #[default]
    Off,
    /// Layers requested; a layer-less input falls back with a warning.
    Always,
    /// Layers if there are any, silently.
    IfExist,
}

/// Resolved run configuration — validated once, then only read.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub input: PathBuf,
    pub target: Target,
    pub tool: PathBuf,
    pub output: OutputOverrides,
    pub layers: LayerRequest,
    pub export: ExportParams,
    pub simulate: bool,
    pub keep_artifacts: bool,
    pub svg_first: bool,
    pub manual_layers: bool,
    pub text_as_shape: bool,
    pub switch_on_all_layers: bool,
}

impl ResolvedOptions {
    /// Options converting `input` to `target` with every flag off.
    pub fn for_input(input: impl Into<PathBuf>, target: Target) -> Self {
        Self {
            input: input.into(),
            target,
            tool: PathBuf::from(DEFAULT_TOOL_NAME),
            output: OutputOverrides::default(),
            layers: LayerRequest::Off,
            export: ExportParams::default(),
            simulate: false,
            keep_artifacts: false,
            svg_first: false,
            manual_layers: false,
            text_as_shape: false,
            switch_on_all_layers: false,
        }
    }

    /// Resolves a complete configuration from CLI input and environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let basename = if cli.no_basename {
            if cli.use_basename.is_some() {
                log::debug!("<no-basename> given, ignoring <use-basename>");
            }
            BaseNameRule::Suppressed
        } else if let Some(name) = cli.use_basename {
            BaseNameRule::Custom(BaseName::new(name)?)
        } else {
            BaseNameRule::FromInput
        };

        let layers = if cli.layers {
            LayerRequest::Always
        } else if cli.layers_if_exist {
            LayerRequest::IfExist
        } else {
            LayerRequest::Off
        };

        let export = ExportParams {
            dpi: cli.export_dpi.map(ExportDpi::new).transpose()?,
            pdf_version: cli
                .export_pdf_version
                .as_deref()
                .map(PdfVersion::parse)
                .transpose()?,
            ps_level: cli.export_ps_level.map(PsLevel::new).transpose()?,
        };

        Ok(Self {
            input: PathBuf::from(cli.input),
            target: cli.target,
            tool: resolve_tool(cli.inkscape_exec),
            output: OutputOverrides {
                file: cli.output_file,
                directory: cli.output_directory,
                create_directories: cli.create_directories,
                overwrite_existing: cli.overwrite_existing,
                naming: NamingRules {
                    basename,
                    layer_index: cli.layer_index,
                    layer_id: cli.layer_id,
                },
            },
            layers,
            export,
            simulate: cli.simulate,
            keep_artifacts: cli.keep_tmp_artifacts,
            svg_first: cli.svg_first,
            manual_layers: cli.manual_layers,
            text_as_shape: cli.text_as_shape,
            switch_on_all_layers: cli.all_layers,
        })
    }
}

/// Tool executable from the command line, the environment or `PATH`, in
/// that order. Falls back to the bare default name so the executable check
/// reports it as missing.
fn resolve_tool(cli_value: Option<String>) -> PathBuf {
    if let Some(value) = cli_value {
        return PathBuf::from(value);
    }
    if let Ok(value) = std::env::var(TOOL_ENV_VAR) {
        log::debug!("Using {} from {}", value, TOOL_ENV_VAR);
        return PathBuf::from(value);
    }
    which::which(DEFAULT_TOOL_NAME).unwrap_or_else(|_| PathBuf::from(DEFAULT_TOOL_NAME))
}
