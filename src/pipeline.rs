// src/pipeline.rs
//! Pipeline capability traits: the two collaborators a conversion run drives.
//!
//! Each trait describes a single capability, so the orchestrator can be
//! tested with in-memory stand-ins for the document and the external tool.

use crate::error::{ExternalToolError, InputError};
use crate::orchestrator::CommandLine;
use crate::types::LayerSet;
use std::path::Path;

/// Reads a source document, reports its layers and toggles their visibility.
pub trait DocumentLoader {
    fn load(&mut self, path: &Path) -> Result<(), InputError>;

    fn has_layers(&self) -> bool {
        !self.layers().is_empty()
    }

    /// Layers of the loaded document, in document order.
    fn layers(&self) -> &LayerSet;

    fn switch_on_layer(&mut self, id: &str);

    fn switch_off_all_layers(&mut self);

    fn switch_on_all_layers(&mut self);

    /// The document in its current visibility state, one entry per line,
    /// without line terminators.
    fn serialize_current_state(&self) -> Vec<String>;
}

/// Exit status of one tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolExit {
    /// `None` when the process was ended by a signal.
    pub code: Option<i32>,
}

impl ToolExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs one command line to completion.
pub trait ToolRunner {
    fn run(&mut self, command: &CommandLine) -> Result<ToolExit, ExternalToolError>;
}
