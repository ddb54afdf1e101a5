// src/target.rs
//! Catalog of supported output formats.
//!
//! A [`Target`] knows its file extension, the export flag the conversion tool
//! expects for it, and which export parameters it understands. Parameters
//! supplied for a target that ignores them are reported as warnings, never
//! as errors.

use crate::constants::flags;
use crate::types::{ExportDpi, PdfVersion, PsLevel};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

/// Output format kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Svg,
    Png,
    Pdf,
    Ps,
    Eps,
    Emf,
    Wmf,
}

impl Target {
    pub const ALL: [Target; 7] = [
        Target::Svg,
        Target::Png,
        Target::Pdf,
        Target::Ps,
        Target::Eps,
        Target::Emf,
        Target::Wmf,
    ];

    /// Canonical name, also used as the file extension.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Pdf => "pdf",
            Self::Ps => "ps",
            Self::Eps => "eps",
            Self::Emf => "emf",
            Self::Wmf => "wmf",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.name()
    }

    /// Flag telling the conversion tool where to write this format.
    pub fn export_flag(&self) -> &'static str {
        match self {
            Self::Svg => "--export-plain-svg",
            Self::Png => "--export-png",
            Self::Pdf => "--export-pdf",
            Self::Ps => "--export-ps",
            Self::Eps => "--export-eps",
            Self::Emf => "--export-emf",
            Self::Wmf => "--export-wmf",
        }
    }

    pub fn accepts(&self, param: ExportParam) -> bool {
        param.target() == *self
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Format-specific export parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExportParam {
    Dpi,
    PdfVersion,
    PsLevel,
}

impl ExportParam {
    /// The only target that understands this parameter.
    pub fn target(&self) -> Target {
        match self {
            Self::Dpi => Target::Png,
            Self::PdfVersion => Target::Pdf,
            Self::PsLevel => Target::Ps,
        }
    }

    /// Long name of the command-line flag supplying the parameter.
    pub fn cli_flag(&self) -> &'static str {
        match self {
            Self::Dpi => flags::EXPORT_DPI,
            Self::PdfVersion => flags::EXPORT_PDF_VERSION,
            Self::PsLevel => flags::EXPORT_PS_LEVEL,
        }
    }

    /// Flag passed on to the conversion tool.
    pub fn tool_flag(&self) -> &'static str {
        match self {
            Self::Dpi => "--export-dpi",
            Self::PdfVersion => "--export-pdf-version",
            Self::PsLevel => "--export-ps-level",
        }
    }
}

/// Export parameter values supplied for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportParams {
    pub dpi: Option<ExportDpi>,
    pub pdf_version: Option<PdfVersion>,
    pub ps_level: Option<PsLevel>,
}

impl ExportParams {
    /// Supplied parameters with their rendered values.
    fn supplied(&self) -> Vec<(ExportParam, String)> {
        let mut supplied = Vec::new();
        if let Some(dpi) = self.dpi {
            supplied.push((ExportParam::Dpi, dpi.to_string()));
        }
        if let Some(version) = self.pdf_version {
            supplied.push((ExportParam::PdfVersion, version.to_string()));
        }
        if let Some(level) = self.ps_level {
            supplied.push((ExportParam::PsLevel, level.to_string()));
        }
        supplied
    }

    /// Tool arguments for the parameters `target` accepts.
    pub fn tool_args(&self, target: Target) -> Vec<String> {
        self.supplied()
            .into_iter()
            .filter(|(param, _)| target.accepts(*param))
            .map(|(param, value)| format!("{}={}", param.tool_flag(), value))
            .collect()
    }

    /// Warnings for parameters `target` will ignore.
    pub fn warnings(&self, target: Target) -> Vec<String> {
        self.supplied()
            .into_iter()
            .filter(|(param, _)| !target.accepts(*param))
            .map(|(param, _)| {
                format!(
                    "target is not <{}> but CLI option <{}> used, will be ignored",
                    param.target(),
                    param.cli_flag()
                )
            })
            .collect()
    }
}
