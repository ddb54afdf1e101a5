// src/output/types.rs
//! Type definitions for output resolution.
//!
//! An [`OutputPlan`] is computed once per run and then only read. Single-file
//! and layer output are separate variants of [`OutputTarget`], so a plan can
//! never carry both a file and a pattern.

use super::paths::append_extension;
use super::pattern::{NamingPattern, NamingRules, Placeholder};
use crate::error::PatternError;
use crate::target::Target;
use crate::types::LayerEntry;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Whether the run produces one file or one file per layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OutputMode {
    SingleFile,
    /// `count` is the number of layers that will be emitted.
    Layers { count: usize },
}

impl OutputMode {
    pub fn does_layers(&self) -> bool {
        matches!(self, Self::Layers { .. })
    }
}

/// Caller-supplied influence on output locations and names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputOverrides {
    /// Output file for single-file runs, as typed by the caller.
    pub file: Option<String>,
    pub directory: Option<PathBuf>,
    pub create_directories: bool,
    pub overwrite_existing: bool,
    pub naming: NamingRules,
}

/// Where output goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OutputTarget {
    SingleFile {
        /// Output path without extension.
        file: PathBuf,
        directory: PathBuf,
    },
    Layers {
        directory: PathBuf,
        pattern: NamingPattern,
    },
}

/// The resolved decision for a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputPlan {
    pub target: OutputTarget,
    pub file_extension: &'static str,
    pub warnings: Vec<String>,
}

impl OutputPlan {
    pub fn single_file(file: PathBuf, directory: PathBuf, target: Target) -> Self {
        Self {
            target: OutputTarget::SingleFile { file, directory },
            file_extension: target.extension(),
            warnings: Vec::new(),
        }
    }

    pub fn layers(directory: PathBuf, pattern: NamingPattern, target: Target) -> Self {
        Self {
            target: OutputTarget::Layers { directory, pattern },
            file_extension: target.extension(),
            warnings: Vec::new(),
        }
    }

    /// Adds a warning to the plan.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings<I>(mut self, warnings: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.warnings.extend(warnings);
        self
    }

    pub fn file(&self) -> Option<&Path> {
        match &self.target {
            OutputTarget::SingleFile { file, .. } => Some(file),
            OutputTarget::Layers { .. } => None,
        }
    }

    pub fn pattern(&self) -> Option<&NamingPattern> {
        match &self.target {
            OutputTarget::SingleFile { .. } => None,
            OutputTarget::Layers { pattern, .. } => Some(pattern),
        }
    }

    pub fn directory(&self) -> &Path {
        match &self.target {
            OutputTarget::SingleFile { directory, .. } | OutputTarget::Layers { directory, .. } => {
                directory
            }
        }
    }

    pub fn does_layers(&self) -> bool {
        matches!(self.target, OutputTarget::Layers { .. })
    }

    /// Final path of a single-file run, extension included.
    pub fn output_file(&self) -> Option<PathBuf> {
        self.file()
            .map(|file| append_extension(file, self.file_extension))
    }

    /// Final path of one layer's output, extension included.
    pub fn layer_output(&self, entry: &LayerEntry) -> Option<PathBuf> {
        match &self.target {
            OutputTarget::Layers { directory, pattern } => Some(append_extension(
                &directory.join(pattern.render(entry)),
                self.file_extension,
            )),
            OutputTarget::SingleFile { .. } => None,
        }
    }

    /// Narrows the naming pattern; a no-op for single-file plans.
    pub fn remove_pattern_options(&mut self, removed: &[Placeholder]) -> Result<(), PatternError> {
        match &mut self.target {
            OutputTarget::Layers { pattern, .. } => pattern.remove_placeholders(removed),
            OutputTarget::SingleFile { .. } => Ok(()),
        }
    }

    /// Fixes the base name of the naming pattern; a no-op for single-file plans.
    pub fn set_pattern_basename(&mut self, name: &str) -> Result<(), PatternError> {
        match &mut self.target {
            OutputTarget::Layers { pattern, .. } => pattern.set_basename(name),
            OutputTarget::SingleFile { .. } => Ok(()),
        }
    }
}
