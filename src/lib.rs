//! svg2vector library: converts SVG documents into other vector formats by
//! driving Inkscape, one file per document or one file per layer.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError` and one error enum per failure category
//! - **Configuration**: `CommandLineInput`, `ResolvedOptions`
//! - **Targets**: `Target`, `ExportParams`
//! - **Output resolution**: `resolve`, `plan_output`, `OutputPlan`, `NamingPattern`
//! - **Orchestration**: `Orchestrator`, `RunReport`
//! - **Collaborators**: `DocumentLoader`, `ToolRunner` and their implementations

// Internal modules
mod config;
mod constants;
mod error;
mod loader;
mod orchestrator;
mod output;
mod pipeline;
mod runner;
mod target;
mod types;

// --- Error Handling ---
pub use crate::error::{
    AppError, ExternalToolError, InputError, OutputDirectoryError, OutputFileError, PatternError,
    TempArtifactError,
};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, LayerRequest, ResolvedOptions};
pub use crate::constants::{flags, EXIT_HELP, EXIT_SUCCESS, EXIT_USAGE};

// --- Domain Types ---
pub use crate::target::{ExportParam, ExportParams, Target};
pub use crate::types::{BaseName, ExportDpi, LayerEntry, LayerSet, PdfVersion, PsLevel};

// --- Output Resolution ---
pub use crate::output::{
    plan_output, resolve, simulated_root, BaseNameRule, Effects, NamingPattern, NamingRules,
    OutputMode, OutputOverrides, OutputPlan, OutputTarget, PatternToken, Placeholder,
};

// --- Orchestration ---
pub use crate::orchestrator::{
    CommandLine, CommandTemplate, ConversionStep, Orchestrator, RunReport, RunState, StepPhase,
};

// --- Pipeline Traits ---
pub use crate::pipeline::{DocumentLoader, ToolExit, ToolRunner};

// --- Collaborators ---
pub use crate::loader::InkscapeSvgLoader;
pub use crate::runner::{check_executable, ProcessRunner};
