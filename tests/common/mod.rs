// tests/common/mod.rs
//! In-memory collaborators and filesystem sandboxes shared by the
//! integration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use svg2vector::{
    CommandLine, DocumentLoader, ExternalToolError, InputError, LayerSet, ToolExit, ToolRunner,
};
use tempfile::TempDir;

/// Document loader that serves a fixed layer set and tracks visibility.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    layers: LayerSet,
    visible: BTreeSet<String>,
    pub loaded: Vec<PathBuf>,
}

impl MemoryLoader {
    pub fn with_layers(layers: &[(&str, usize)]) -> Self {
        Self {
            layers: layers.iter().map(|(id, index)| (*id, *index)).collect(),
            ..Self::default()
        }
    }

    pub fn without_layers() -> Self {
        Self::default()
    }
}

impl DocumentLoader for MemoryLoader {
    fn load(&mut self, path: &Path) -> Result<(), InputError> {
        self.loaded.push(path.to_path_buf());
        Ok(())
    }

    fn layers(&self) -> &LayerSet {
        &self.layers
    }

    fn switch_on_layer(&mut self, id: &str) {
        self.visible.insert(id.to_string());
    }

    fn switch_off_all_layers(&mut self) {
        self.visible.clear();
    }

    fn switch_on_all_layers(&mut self) {
        self.visible = self.layers.entries().into_iter().map(|e| e.id).collect();
    }

    fn serialize_current_state(&self) -> Vec<String> {
        let visible: Vec<_> = self.visible.iter().cloned().collect();
        vec!["<svg>".to_string(), format!("visible: {}", visible.join(",")), "</svg>".to_string()]
    }
}

/// Tool runner that records every command and can fail on a chosen call.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub commands: Vec<CommandLine>,
    /// Zero-based call that exits with status 1.
    pub fail_at: Option<usize>,
    /// Zero-based call that deletes the directory holding its `--file=` input.
    pub remove_input_dir_at: Option<usize>,
}

impl RecordingRunner {
    pub fn failing_at(call: usize) -> Self {
        Self {
            fail_at: Some(call),
            ..Self::default()
        }
    }

    pub fn removing_input_dir_at(call: usize) -> Self {
        Self {
            remove_input_dir_at: Some(call),
            ..Self::default()
        }
    }
}

impl ToolRunner for RecordingRunner {
    fn run(&mut self, command: &CommandLine) -> Result<ToolExit, ExternalToolError> {
        let call = self.commands.len();
        self.commands.push(command.clone());
        if self.remove_input_dir_at == Some(call) {
            let input = command
                .args
                .iter()
                .find_map(|arg| arg.strip_prefix("--file="))
                .map(PathBuf::from)
                .expect("command has an input");
            let dir = input.parent().expect("input has a parent");
            fs::remove_dir_all(dir).expect("remove input directory");
        }
        let code = if self.fail_at == Some(call) { 1 } else { 0 };
        Ok(ToolExit { code: Some(code) })
    }
}

/// A scratch directory holding `drawing.svg`.
pub struct Sandbox {
    pub dir: TempDir,
    pub input: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create sandbox");
        let input = dir.path().join("drawing.svg");
        fs::write(&input, "<svg/>\n").expect("write input");
        Self { dir, input }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Every path below the sandbox, sorted.
    pub fn listing(&self) -> Vec<PathBuf> {
        fn walk(dir: &Path, found: &mut Vec<PathBuf>) {
            for entry in fs::read_dir(dir).expect("read sandbox") {
                let path = entry.expect("sandbox entry").path();
                if path.is_dir() {
                    walk(&path, found);
                }
                found.push(path);
            }
        }
        let mut found = Vec::new();
        walk(self.path(), &mut found);
        found.sort();
        found
    }
}
