// src/orchestrator/command.rs
//! Command lines for the conversion tool.

use crate::target::{ExportParams, Target};
use crate::types::LayerEntry;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A program and its arguments, never passed through a shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(word: &str) -> String {
    if word.is_empty() || word.contains(char::is_whitespace) {
        format!("\"{}\"", word)
    } else {
        word.to_string()
    }
}

/// Per-target command template.
#[derive(Debug, Clone)]
pub struct CommandTemplate {
    program: PathBuf,
    target: Target,
    params: ExportParams,
    text_to_path: bool,
}

impl CommandTemplate {
    pub fn new(program: &Path, target: Target, params: ExportParams, text_to_path: bool) -> Self {
        Self {
            program: program.to_path_buf(),
            target,
            params,
            text_to_path,
        }
    }

    /// Template exporting plain SVG, for the intermediate phase of two-phase
    /// runs. Target parameters do not apply to intermediates.
    pub fn intermediate(&self) -> Self {
        Self {
            program: self.program.clone(),
            target: Target::Svg,
            params: ExportParams::default(),
            text_to_path: self.text_to_path,
        }
    }

    /// Builds the command converting `input` into `output`, restricted to
    /// one layer when `layer` is given.
    pub fn build(&self, input: &Path, output: &Path, layer: Option<&LayerEntry>) -> CommandLine {
        let mut args = vec![
            "--without-gui".to_string(),
            format!("--file={}", input.display()),
            format!("{}={}", self.target.export_flag(), output.display()),
        ];
        if self.text_to_path {
            args.push("--export-text-to-path".to_string());
        }
        args.extend(self.params.tool_args(self.target));
        if let Some(entry) = layer {
            args.push(format!("--export-id={}", entry.node));
            args.push("--export-id-only".to_string());
        }

        CommandLine {
            program: self.program.display().to_string(),
            args,
        }
    }
}
