// src/orchestrator/report.rs
//! What a finished run did.

use super::command::CommandLine;
use crate::output::OutputPlan;
use crate::types::LayerEntry;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// States of a conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Init,
    InputValidated,
    OutputResolved,
    TempPrepared,
    Converting,
    CleanedUp,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::InputValidated => "input validated",
            Self::OutputResolved => "output resolved",
            Self::TempPrepared => "temporary artifacts prepared",
            Self::Converting => "converting",
            Self::CleanedUp => "cleaned up",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Which pass of a run a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPhase {
    /// Extracts plain SVG into a temporary artifact.
    Intermediate,
    /// Produces a final output file.
    Target,
}

/// One tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionStep {
    pub phase: StepPhase,
    pub input: PathBuf,
    pub output: PathBuf,
    pub layer: Option<LayerEntry>,
    pub command: CommandLine,
}

/// Result of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub simulated: bool,
    pub plan: OutputPlan,
    pub steps: Vec<ConversionStep>,
    /// Plan warnings followed by cleanup warnings.
    pub warnings: Vec<String>,
    pub kept_artifacts: Vec<PathBuf>,
    pub final_state: RunState,
}

impl RunReport {
    pub fn new(plan: OutputPlan, simulated: bool) -> Self {
        Self {
            simulated,
            warnings: plan.warnings.clone(),
            plan,
            steps: Vec::new(),
            kept_artifacts: Vec::new(),
            final_state: RunState::Init,
        }
    }

    pub fn with_steps(mut self, steps: Vec<ConversionStep>) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_warning(mut self, warning: String) -> Self {
        self.warnings.push(warning);
        self
    }

    pub fn with_kept_artifact(mut self, path: PathBuf) -> Self {
        self.kept_artifacts.push(path);
        self
    }

    pub fn finish(mut self, state: RunState) -> Self {
        self.final_state = state;
        self
    }

    /// Command lines in the order they were issued.
    pub fn commands(&self) -> Vec<&CommandLine> {
        self.steps.iter().map(|step| &step.command).collect()
    }

    /// Final outputs, one per target step.
    pub fn outputs(&self) -> Vec<&PathBuf> {
        self.steps
            .iter()
            .filter(|step| step.phase == StepPhase::Target)
            .map(|step| &step.output)
            .collect()
    }
}
