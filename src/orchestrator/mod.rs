// src/orchestrator/mod.rs
//! Conversion orchestration as an explicit state machine.
//!
//! ```text
//! Init -> InputValidated -> OutputResolved -> [TempPrepared] -> Converting
//!      -> CleanedUp -> Done
//! ```
//!
//! Any error moves the run to `Failed`. Tool invocations run one at a time in
//! layer index order; the first failure stops the run and leaves outputs
//! already written in place.

mod artifacts;
mod command;
mod report;

pub use artifacts::{Released, TempArtifact};
pub use command::{CommandLine, CommandTemplate};
pub use report::{ConversionStep, RunReport, RunState, StepPhase};

use crate::config::ResolvedOptions;
use crate::constants::INTERMEDIATE_EXTENSION;
use crate::error::{AppError, InputError};
use crate::output::paths::append_extension;
use crate::output::{plan_output, Effects, OutputPlan, OutputTarget};
use crate::pipeline::{DocumentLoader, ToolRunner};
use crate::types::LayerEntry;
use std::path::{Path, PathBuf};

/// One output file to produce.
#[derive(Debug, Clone)]
struct OutputUnit {
    layer: Option<LayerEntry>,
    /// File name without directory or extension.
    name: String,
    output: PathBuf,
}

/// Drives one conversion run.
pub struct Orchestrator<'a, L, R> {
    options: &'a ResolvedOptions,
    loader: L,
    runner: R,
    effects: Effects,
    state: RunState,
    steps: Vec<ConversionStep>,
}

impl<'a, L, R> Orchestrator<'a, L, R>
where
    L: DocumentLoader,
    R: ToolRunner,
{
    pub fn new(options: &'a ResolvedOptions, loader: L, runner: R) -> Self {
        Self {
            options,
            loader,
            runner,
            effects: Effects::new(options.simulate),
            state: RunState::Init,
            steps: Vec::new(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs the conversion to completion or to the first fatal error.
    pub fn run(&mut self) -> Result<RunReport, AppError> {
        let mut temp = None;
        match self.drive(&mut temp) {
            Ok(report) => Ok(report),
            Err(err) => {
                if let Some(artifact) = temp.take() {
                    if let Some(warning) = self.release(artifact).err() {
                        log::warn!("{}", warning);
                    }
                }
                self.transition(RunState::Failed);
                Err(err)
            }
        }
    }

    fn drive(&mut self, temp: &mut Option<TempArtifact>) -> Result<RunReport, AppError> {
        self.validate_input()?;
        let plan = self.resolve_output()?;

        let template = CommandTemplate::new(
            &self.options.tool,
            self.options.target,
            self.options.export,
            self.options.text_as_shape,
        );
        let units = self.output_units(&plan);

        let intermediates = if self.needs_intermediate(&plan) {
            let artifact = if plan.does_layers() {
                self.effects.create_temp_dir()?
            } else {
                self.effects.create_temp_file()?
            };
            let root = artifact.path().to_path_buf();
            *temp = Some(artifact);
            self.transition(RunState::TempPrepared);
            Some(self.prepare_intermediates(&units, &root, &template)?)
        } else {
            None
        };

        self.transition(RunState::Converting);
        self.effects.ensure_directory(plan.directory())?;
        self.convert(&units, intermediates, &template)?;

        let mut report = RunReport::new(plan, self.effects.is_simulated())
            .with_steps(std::mem::take(&mut self.steps));
        if let Some(artifact) = temp.take() {
            report = match self.release(artifact) {
                Ok(Released::Kept(path)) => report.with_kept_artifact(path),
                Ok(Released::Removed(_)) => report,
                Err(warning) => {
                    log::warn!("{}", warning);
                    report.with_warning(warning)
                }
            };
        }
        self.transition(RunState::CleanedUp);

        self.transition(RunState::Done);
        log::info!("finished successfully");
        Ok(report.finish(RunState::Done))
    }

    /// Init -> InputValidated: the input is a readable file the loader
    /// accepts.
    fn validate_input(&mut self) -> Result<(), AppError> {
        let input = &self.options.input;
        if input.to_string_lossy().trim().is_empty() {
            return Err(InputError::Blank.into());
        }
        if !input.exists() {
            return Err(InputError::Missing {
                path: input.clone(),
            }
            .into());
        }
        if !input.is_file() {
            return Err(InputError::NotAFile {
                path: input.clone(),
            }
            .into());
        }

        self.loader.load(input)?;
        log::info!(
            "Loaded {} with {} layers",
            input.display(),
            self.loader.layers().len()
        );
        self.transition(RunState::InputValidated);
        Ok(())
    }

    /// InputValidated -> OutputResolved.
    fn resolve_output(&mut self) -> Result<OutputPlan, AppError> {
        let plan = plan_output(self.options, self.loader.layers().len())?;
        self.transition(RunState::OutputResolved);
        Ok(plan)
    }

    /// Whether all layers are switched on for a single output file.
    fn all_layers_apply(&self, plan: &OutputPlan) -> bool {
        self.options.switch_on_all_layers && !plan.does_layers() && self.loader.has_layers()
    }

    /// Guard for OutputResolved -> TempPrepared.
    fn needs_intermediate(&self, plan: &OutputPlan) -> bool {
        self.options.svg_first || self.all_layers_apply(plan)
    }

    fn output_units(&self, plan: &OutputPlan) -> Vec<OutputUnit> {
        match &plan.target {
            OutputTarget::SingleFile { file, .. } => vec![OutputUnit {
                layer: None,
                name: file
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                output: append_extension(file, plan.file_extension),
            }],
            OutputTarget::Layers { directory, pattern } => self
                .loader
                .layers()
                .by_index()
                .into_iter()
                .map(|entry| {
                    let name = pattern.render(&entry);
                    OutputUnit {
                        output: append_extension(&directory.join(&name), plan.file_extension),
                        name,
                        layer: Some(entry),
                    }
                })
                .collect(),
        }
    }

    /// Fills the temporary artifact; returns the conversion input per unit.
    fn prepare_intermediates(
        &mut self,
        units: &[OutputUnit],
        root: &Path,
        template: &CommandTemplate,
    ) -> Result<Vec<PathBuf>, AppError> {
        let options = self.options;
        let extract = template.intermediate();
        let mut inputs = Vec::with_capacity(units.len());

        for unit in units {
            let path = match &unit.layer {
                Some(entry) => {
                    let path = append_extension(&root.join(&unit.name), INTERMEDIATE_EXTENSION);
                    if options.manual_layers {
                        self.loader.switch_off_all_layers();
                        self.loader.switch_on_layer(&entry.id);
                        self.write_document(&path)?;
                    } else {
                        let command = extract.build(&options.input, &path, Some(entry));
                        self.execute(
                            StepPhase::Intermediate,
                            &options.input,
                            &path,
                            unit,
                            command,
                        )?;
                    }
                    path
                }
                None => {
                    let path = root.to_path_buf();
                    if options.switch_on_all_layers && self.loader.has_layers() {
                        self.loader.switch_on_all_layers();
                        self.write_document(&path)?;
                    } else {
                        let command = extract.build(&options.input, &path, None);
                        self.execute(
                            StepPhase::Intermediate,
                            &options.input,
                            &path,
                            unit,
                            command,
                        )?;
                    }
                    path
                }
            };
            inputs.push(path);
        }
        Ok(inputs)
    }

    fn write_document(&mut self, path: &Path) -> Result<(), AppError> {
        let lines = self.loader.serialize_current_state();
        self.effects.write_lines(path, &lines)?;
        Ok(())
    }

    /// Converting: one target step per unit, reading the intermediates when
    /// there are any and selecting the layer in the tool otherwise.
    fn convert(
        &mut self,
        units: &[OutputUnit],
        intermediates: Option<Vec<PathBuf>>,
        template: &CommandTemplate,
    ) -> Result<(), AppError> {
        let direct = intermediates.is_none();
        let inputs =
            intermediates.unwrap_or_else(|| vec![self.options.input.clone(); units.len()]);

        for (unit, input) in units.iter().zip(inputs) {
            let selector = if direct { unit.layer.as_ref() } else { None };
            let command = template.build(&input, &unit.output, selector);
            self.execute(StepPhase::Target, &input, &unit.output, unit, command)?;
        }
        Ok(())
    }

    fn execute(
        &mut self,
        phase: StepPhase,
        input: &Path,
        output: &Path,
        unit: &OutputUnit,
        command: CommandLine,
    ) -> Result<(), AppError> {
        log::debug!(
            "running tool for input <{}> creating output <{}>",
            input.display(),
            output.display()
        );
        self.effects.run_tool(&mut self.runner, &command)?;
        self.steps.push(ConversionStep {
            phase,
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            layer: unit.layer.clone(),
            command,
        });
        Ok(())
    }

    fn release(&self, artifact: TempArtifact) -> Result<Released, String> {
        let path = artifact.path().to_path_buf();
        self.effects
            .release_artifact(artifact, self.options.keep_artifacts)
            .map_err(|err| {
                format!(
                    "could not remove temporary artifact <{}>: {}",
                    path.display(),
                    err
                )
            })
    }

    fn transition(&mut self, next: RunState) {
        log::debug!("run state {} -> {}", self.state, next);
        self.state = next;
    }
}
