// src/runner.rs
//! Runs the conversion tool as a child process.

use crate::constants::flags;
use crate::error::ExternalToolError;
use crate::orchestrator::CommandLine;
use crate::pipeline::{ToolExit, ToolRunner};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Checks that `program` names an executable file.
pub fn check_executable(program: &Path) -> Result<(), ExternalToolError> {
    if program.to_string_lossy().trim().is_empty() {
        return Err(ExternalToolError::Blank {
            flag: flags::INKSCAPE_EXEC,
        });
    }
    if !program.exists() {
        return Err(ExternalToolError::Missing {
            path: program.to_path_buf(),
        });
    }
    if !program.is_file() {
        return Err(ExternalToolError::NotAFile {
            path: program.to_path_buf(),
        });
    }
    if !is_executable(program) {
        return Err(ExternalToolError::NotExecutable {
            path: program.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// [`ToolRunner`] backed by `std::process::Command`.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: PathBuf,
}

impl ProcessRunner {
    /// Creates a runner for a validated executable.
    pub fn new(program: impl Into<PathBuf>) -> Result<Self, ExternalToolError> {
        let program = program.into();
        check_executable(&program)?;
        log::debug!("Conversion tool: {}", program.display());
        Ok(Self { program })
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&mut self, command: &CommandLine) -> Result<ToolExit, ExternalToolError> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ExternalToolError::Launch {
                command: command.to_string(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines().filter(|line| !line.trim().is_empty()) {
            log::debug!("{}: {}", self.program.display(), line);
        }

        Ok(ToolExit {
            code: output.status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unusable_executables() {
        assert!(matches!(
            check_executable(Path::new(" ")),
            Err(ExternalToolError::Blank { .. })
        ));
        assert!(matches!(
            check_executable(Path::new("/definitely/not/inkscape")),
            Err(ExternalToolError::Missing { .. })
        ));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            check_executable(dir.path()),
            Err(ExternalToolError::NotAFile { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn rejects_files_without_execute_permission() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            check_executable(file.path()),
            Err(ExternalToolError::NotExecutable { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn reports_exit_codes() {
        let mut runner = ProcessRunner::new("/bin/sh").unwrap();
        let exit = runner
            .run(&CommandLine {
                program: "/bin/sh".to_string(),
                args: vec!["-c".to_string(), "echo oops >&2; exit 3".to_string()],
            })
            .unwrap();
        assert_eq!(exit, ToolExit { code: Some(3) });
        assert!(!exit.success());
    }

    #[cfg(unix)]
    #[test]
    fn launch_failure_is_an_error() {
        let mut runner = ProcessRunner::new("/bin/sh").unwrap();
        let err = runner
            .run(&CommandLine {
                program: "/definitely/not/inkscape".to_string(),
                args: Vec::new(),
            })
            .unwrap_err();
        assert!(matches!(err, ExternalToolError::Launch { .. }));
        assert!(err.is_runtime());
    }
}
