// src/output/writer.rs
//! Performs every side effect of a conversion run.
//!
//! This module is the only place where directories are created, files are
//! written, artifacts are deleted and the conversion tool is launched. Each
//! operation checks the simulate switch first and, when set, only logs what
//! it would have done.

use crate::constants::{INTERMEDIATE_EXTENSION, SIMULATED_TMP_NAME, TMP_FN_PREFIX};
use crate::error::{ExternalToolError, OutputDirectoryError, TempArtifactError};
use crate::orchestrator::{CommandLine, Released, TempArtifact};
use crate::output::paths::append_extension;
use crate::pipeline::ToolRunner;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Gate for all mutating operations of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effects {
    simulate: bool,
}

impl Effects {
    pub fn new(simulate: bool) -> Self {
        Self { simulate }
    }

    pub fn is_simulated(&self) -> bool {
        self.simulate
    }

    /// Creates `path` and its parents unless it already is a directory.
    pub fn ensure_directory(&self, path: &Path) -> Result<(), OutputDirectoryError> {
        if path.is_dir() {
            return Ok(());
        }
        if path.exists() {
            return Err(OutputDirectoryError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        if self.simulate {
            log::info!("would create directory {}", path.display());
            return Ok(());
        }

        fs::create_dir_all(path).map_err(|source| OutputDirectoryError::CreateFailed {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Created directory: {}", path.display());
        Ok(())
    }

    /// Creates the temporary directory holding per-layer intermediates.
    pub fn create_temp_dir(&self) -> Result<TempArtifact, TempArtifactError> {
        if self.simulate {
            let placeholder = simulated_root();
            log::info!("would create temporary directory {}", placeholder.display());
            return Ok(TempArtifact::Simulated(placeholder));
        }

        let dir = tempfile::Builder::new()
            .prefix(TMP_FN_PREFIX)
            .tempdir()
            .map_err(|source| TempArtifactError::CreateDirectory { source })?;
        log::debug!("Created temporary directory: {}", dir.path().display());
        Ok(TempArtifact::Directory(dir))
    }

    /// Creates the temporary file holding a single-file intermediate.
    pub fn create_temp_file(&self) -> Result<TempArtifact, TempArtifactError> {
        if self.simulate {
            let placeholder = append_extension(&simulated_root(), INTERMEDIATE_EXTENSION);
            log::info!("would create temporary file {}", placeholder.display());
            return Ok(TempArtifact::Simulated(placeholder));
        }

        let file = tempfile::Builder::new()
            .prefix(TMP_FN_PREFIX)
            .suffix(&format!(".{}", INTERMEDIATE_EXTENSION))
            .tempfile()
            .map_err(|source| TempArtifactError::CreateFile { source })?;
        let path = file.into_temp_path();
        log::debug!("Created temporary file: {}", path.display());
        Ok(TempArtifact::File(path))
    }

    /// Writes a document line by line.
    pub fn write_lines(&self, path: &Path, lines: &[String]) -> Result<(), TempArtifactError> {
        if lines.is_empty() {
            return Err(TempArtifactError::EmptyDocument {
                path: path.to_path_buf(),
            });
        }
        if self.simulate {
            log::info!("would write {} lines to {}", lines.len(), path.display());
            return Ok(());
        }

        let mut content = lines.join("\n");
        content.push('\n');
        fs::write(path, &content).map_err(|source| TempArtifactError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }

    /// Deletes an artifact, or detaches it when `keep` is set.
    pub fn release_artifact(&self, artifact: TempArtifact, keep: bool) -> io::Result<Released> {
        if keep {
            let path = artifact.keep()?;
            log::info!("Keeping temporary artifact {}", path.display());
            return Ok(Released::Kept(path));
        }
        if self.simulate {
            log::info!("would remove temporary artifact {}", artifact.path().display());
            return Ok(Released::Removed(artifact.path().to_path_buf()));
        }

        let path = artifact.close()?;
        log::debug!("Removed temporary artifact {}", path.display());
        Ok(Released::Removed(path))
    }

    /// Runs one tool invocation to completion; a non-zero exit is an error.
    pub fn run_tool<R: ToolRunner>(
        &self,
        runner: &mut R,
        command: &CommandLine,
    ) -> Result<(), ExternalToolError> {
        if self.simulate {
            log::info!("would run {}", command);
            return Ok(());
        }

        log::info!("Running {}", command);
        let exit = runner.run(command)?;
        if !exit.success() {
            return Err(ExternalToolError::NonZeroExit {
                command: command.to_string(),
                code: exit.code,
            });
        }
        Ok(())
    }
}

/// Stand-in for the temporary artifact of a simulated run.
pub fn simulated_root() -> PathBuf {
    std::env::temp_dir().join(SIMULATED_TMP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ToolExit;

    struct CountingRunner {
        calls: usize,
        code: Option<i32>,
    }

    impl ToolRunner for CountingRunner {
        fn run(&mut self, _command: &CommandLine) -> Result<ToolExit, ExternalToolError> {
            self.calls += 1;
            Ok(ToolExit { code: self.code })
        }
    }

    fn command() -> CommandLine {
        CommandLine {
            program: "inkscape".to_string(),
            args: vec!["--version".to_string()],
        }
    }

    #[test]
    fn simulate_mutates_nothing() {
        let sandbox = tempfile::tempdir().unwrap();
        let effects = Effects::new(true);
        let target = sandbox.path().join("a/b");

        effects.ensure_directory(&target).unwrap();
        effects
            .write_lines(&sandbox.path().join("x.svg"), &["<svg/>".to_string()])
            .unwrap();
        let artifact = effects.create_temp_dir().unwrap();
        assert!(artifact.is_simulated());
        effects.release_artifact(artifact, false).unwrap();

        let mut runner = CountingRunner {
            calls: 0,
            code: Some(0),
        };
        effects.run_tool(&mut runner, &command()).unwrap();

        assert_eq!(runner.calls, 0);
        assert_eq!(fs::read_dir(sandbox.path()).unwrap().count(), 0);
    }

    #[test]
    fn real_effects_write_and_remove() {
        let sandbox = tempfile::tempdir().unwrap();
        let effects = Effects::new(false);
        let target = sandbox.path().join("a/b");

        effects.ensure_directory(&target).unwrap();
        assert!(target.is_dir());

        let file = target.join("x.svg");
        effects
            .write_lines(&file, &["<svg>".to_string(), "</svg>".to_string()])
            .unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "<svg>\n</svg>\n");

        let artifact = effects.create_temp_file().unwrap();
        let path = artifact.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(
            effects.release_artifact(artifact, false).unwrap(),
            Released::Removed(path.clone())
        );
        assert!(!path.exists());
    }

    #[test]
    fn empty_documents_are_refused() {
        let err = Effects::new(true)
            .write_lines(Path::new("x.svg"), &[])
            .unwrap_err();
        assert!(matches!(err, TempArtifactError::EmptyDocument { .. }));
    }

    #[test]
    fn non_zero_exit_is_an_error() {
        let mut runner = CountingRunner {
            calls: 0,
            code: Some(3),
        };
        let err = Effects::new(false)
            .run_tool(&mut runner, &command())
            .unwrap_err();
        assert!(matches!(
            err,
            ExternalToolError::NonZeroExit { code: Some(3), .. }
        ));
        assert_eq!(runner.calls, 1);
    }
}
