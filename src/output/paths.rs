// src/output/paths.rs
//! Pure functions for path calculations and filename generation.
//!
//! Nothing in here creates, writes or deletes anything. The only filesystem
//! access is the metadata lookup in [`is_writable`].

use crate::constants::SOURCE_EXTENSIONS;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Removes a trailing `.svg` or `.svgz` from an input path.
pub fn strip_source_extension(path: &str) -> &str {
    SOURCE_EXTENSIONS
        .iter()
        .find_map(|ext| path.strip_suffix(ext))
        .unwrap_or(path)
}

/// Removes a redundant trailing `.<extension>` from a caller-supplied name.
pub fn strip_extension<'a>(name: &'a str, extension: &str) -> &'a str {
    name.strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(name)
}

/// Appends `.<extension>` without touching any dot already in the name.
///
/// `Path::with_extension` would turn `my.drawing` into `my.png`; this keeps
/// it as `my.drawing.png`.
pub fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// File stem of the input, used as the default base name of layer outputs.
pub fn input_basename(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Moves `file` into `directory`, keeping only its file name.
pub fn replace_directory(file: &Path, directory: &Path) -> PathBuf {
    match file.file_name() {
        Some(name) => directory.join(name),
        None => directory.join(file),
    }
}

/// Parent directory of `path`, if it names one explicitly.
pub fn explicit_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|parent| !parent.as_os_str().is_empty())
}

/// Component-wise comparison, so `out//a.svg` and `out/a.svg` are equal.
pub fn same_path(a: &Path, b: &Path) -> bool {
    a.components().eq(b.components())
}

/// Whether an existing file or directory accepts writes.
pub fn is_writable(path: &Path) -> bool {
    path.metadata()
        .map(|meta| !meta.permissions().readonly())
        .unwrap_or(false)
}

/// Whether a directory entry name carries the given extension anywhere.
pub fn mentions_extension(name: &str, extension: &str) -> bool {
    name.contains(&format!(".{}", extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_source_extension() {
        assert_eq!(strip_source_extension("drawing.svg"), "drawing");
        assert_eq!(strip_source_extension("dir/drawing.svgz"), "dir/drawing");
        assert_eq!(strip_source_extension("drawing.svg.bak"), "drawing.svg.bak");
        assert_eq!(strip_source_extension("drawing"), "drawing");
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("poster.png", "png"), "poster");
        assert_eq!(strip_extension("posterpng", "png"), "posterpng");
        assert_eq!(strip_extension(".png", "png"), ".png");
        assert_eq!(strip_extension("poster.pdf", "png"), "poster.pdf");
    }

    #[test]
    fn test_append_extension_keeps_dots() {
        assert_eq!(
            append_extension(Path::new("out/my.drawing"), "png"),
            PathBuf::from("out/my.drawing.png")
        );
    }

    #[test]
    fn test_replace_directory() {
        assert_eq!(
            replace_directory(Path::new("in/sub/drawing"), Path::new("out")),
            PathBuf::from("out/drawing")
        );
    }

    #[test]
    fn test_same_path() {
        assert!(same_path(Path::new("out//a.svg"), Path::new("out/a.svg")));
        assert!(!same_path(Path::new("a.svg"), Path::new("b.svg")));
    }

    #[test]
    fn test_input_basename() {
        assert_eq!(input_basename(Path::new("art/drawing.svg")), "drawing");
        assert_eq!(input_basename(Path::new("drawing")), "drawing");
    }
}
