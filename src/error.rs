// src/error.rs
//! Application error types with structured error handling.
//!
//! Each category of fatal failure has its own enum carrying the offending
//! path and, where one exists, the flag that would resolve it. Categories map
//! to process exit codes only at the outermost boundary, through
//! [`AppError::exit_code`].

use crate::constants::{
    EXIT_INPUT, EXIT_IO, EXIT_OUTPUT_PATH, EXIT_PATTERN, EXIT_TOOL_FAILED, EXIT_TOOL_INVALID,
    EXIT_USAGE,
};
use std::path::PathBuf;
use thiserror::Error;

/// The source document is unusable.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("no input file given")]
    Blank,

    #[error("input file <{}> does not exist, please check path and filename", .path.display())]
    Missing { path: PathBuf },

    #[error("input file <{}> is not a file, please check path and filename", .path.display())]
    NotAFile { path: PathBuf },

    #[error("cannot read input file <{}>: {source}", .path.display())]
    NotReadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An output directory fails validation or cannot be created.
#[derive(Error, Debug)]
pub enum OutputDirectoryError {
    #[error("output directory <{}> exists but is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("output directory <{}> exists but cannot write into it, check permissions", .path.display())]
    NotWritable { path: PathBuf },

    #[error("output directory <{}> does not exist and CLI option <{flag}> not used", .path.display())]
    DoesNotExistAndNoCreateFlag { path: PathBuf, flag: &'static str },

    #[error(
        "output directory <{}> contains files with extension <{extension}> and CLI option <{flag}> not used",
        .path.display()
    )]
    WouldOverwriteExistingTargets {
        path: PathBuf,
        extension: String,
        flag: &'static str,
    },

    #[error("could not create output directory <{}>: {source}", .path.display())]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single output file fails validation.
#[derive(Error, Debug)]
pub enum OutputFileError {
    #[error("output filename is blank")]
    Blank,

    #[error(
        "output file <{}> is the same as input file <{}>, will not overwrite the input",
        .output.display(),
        .input.display()
    )]
    SameAsInput { input: PathBuf, output: PathBuf },

    #[error("output file <{}> exists and no option <{flag}> used", .path.display())]
    ExistsWithoutOverwrite { path: PathBuf, flag: &'static str },

    #[error("output file <{}> exists but cannot write to it", .path.display())]
    NotWritable { path: PathBuf },

    #[error("output file <{}> exists but is a directory", .path.display())]
    IsDirectory { path: PathBuf },
}

/// The layer naming pattern cannot produce unambiguous file names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error(
        "processing layers but neither <{id_flag}> nor <{index_flag}> options requested, ambiguous output file names"
    )]
    Ambiguous {
        index_flag: &'static str,
        id_flag: &'static str,
    },

    #[error("output file name pattern is empty")]
    Empty,
}

/// The conversion tool is unusable or one of its invocations failed.
#[derive(Error, Debug)]
pub enum ExternalToolError {
    #[error("expected conversion tool executable, found blank value for <{flag}>")]
    Blank { flag: &'static str },

    #[error("conversion tool <{}> does not exist, please check path and filename", .path.display())]
    Missing { path: PathBuf },

    #[error("conversion tool <{}> is not a file, please check path and filename", .path.display())]
    NotAFile { path: PathBuf },

    #[error("cannot execute conversion tool <{}>, please check file permissions", .path.display())]
    NotExecutable { path: PathBuf },

    #[error("could not launch <{command}>: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("<{command}> exited with {}", describe_exit(.code))]
    NonZeroExit { command: String, code: Option<i32> },
}

impl ExternalToolError {
    /// Whether the failure happened while running, not while validating.
    pub fn is_runtime(&self) -> bool {
        matches!(self, Self::Launch { .. } | Self::NonZeroExit { .. })
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// A temporary artifact could not be created or written.
#[derive(Error, Debug)]
pub enum TempArtifactError {
    #[error("problem creating temporary directory: {source}")]
    CreateDirectory {
        #[source]
        source: std::io::Error,
    },

    #[error("problem creating temporary file: {source}")]
    CreateFile {
        #[source]
        source: std::io::Error,
    },

    #[error("could not write temporary file <{}>: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("refusing to write empty document to <{}>", .path.display())]
    EmptyDocument { path: PathBuf },
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    OutputDirectory(#[from] OutputDirectoryError),

    #[error(transparent)]
    OutputFile(#[from] OutputFileError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    ExternalTool(#[from] ExternalToolError),

    #[error(transparent)]
    TempArtifact(#[from] TempArtifactError),

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Process exit code for this error's category.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => EXIT_USAGE,
            Self::Input(_) => EXIT_INPUT,
            Self::OutputDirectory(_) | Self::OutputFile(_) => EXIT_OUTPUT_PATH,
            Self::Pattern(_) => EXIT_PATTERN,
            Self::ExternalTool(err) if err.is_runtime() => EXIT_TOOL_FAILED,
            Self::ExternalTool(_) => EXIT_TOOL_INVALID,
            Self::TempArtifact(_) | Self::Io(_) => EXIT_IO,
        }
    }
}
