// src/orchestrator/artifacts.rs
//! Temporary artifacts owned by a single run.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, TempPath};

/// A temporary file or directory, or a stand-in for one when simulating.
///
/// Dropping a real artifact deletes it, so an aborted run never leaks one.
#[derive(Debug)]
pub enum TempArtifact {
    Directory(TempDir),
    File(TempPath),
    Simulated(PathBuf),
}

/// What happened to an artifact at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Released {
    Kept(PathBuf),
    Removed(PathBuf),
}

impl TempArtifact {
    pub fn path(&self) -> &Path {
        match self {
            Self::Directory(dir) => dir.path(),
            Self::File(path) => &**path,
            Self::Simulated(path) => path.as_path(),
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, Self::Simulated(_))
    }

    /// Detaches the artifact from automatic deletion and returns its path.
    pub fn keep(self) -> io::Result<PathBuf> {
        match self {
            Self::Directory(dir) => Ok(dir.keep()),
            Self::File(path) => path.keep().map_err(|err| err.error),
            Self::Simulated(path) => Ok(path),
        }
    }

    /// Deletes the artifact, reporting failures instead of ignoring them.
    pub fn close(self) -> io::Result<PathBuf> {
        let path = self.path().to_path_buf();
        match self {
            Self::Directory(dir) => dir.close()?,
            Self::File(file) => file.close()?,
            Self::Simulated(_) => {}
        }
        Ok(path)
    }
}
