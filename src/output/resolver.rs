// src/output/resolver.rs
//! Output resolution: from mode, target, input and overrides to an
//! [`OutputPlan`].
//!
//! The filesystem is inspected here but never changed. Creating a missing
//! output directory is left to the orchestrator, which only does it when
//! this module has confirmed creation is permitted.

use super::paths::{
    append_extension, explicit_parent, is_writable, mentions_extension, replace_directory,
    same_path, strip_extension, strip_source_extension,
};
use super::pattern::NamingPattern;
use super::types::{OutputMode, OutputOverrides, OutputPlan};
use crate::config::{LayerRequest, ResolvedOptions};
use crate::constants::{flags, DEFAULT_OUTPUT_DIR};
use crate::error::{AppError, InputError, OutputDirectoryError, OutputFileError};
use crate::target::Target;
use std::fs;
use std::path::{Path, PathBuf};

/// Computes and validates the output plan for one run.
pub fn resolve(
    mode: OutputMode,
    target: Target,
    input: &Path,
    overrides: &OutputOverrides,
) -> Result<OutputPlan, AppError> {
    if input.to_string_lossy().trim().is_empty() {
        return Err(InputError::Blank.into());
    }

    match mode {
        OutputMode::Layers { count } => resolve_layers(count, target, input, overrides),
        OutputMode::SingleFile => resolve_single_file(target, input, overrides),
    }
}

fn resolve_layers(
    count: usize,
    target: Target,
    input: &Path,
    overrides: &OutputOverrides,
) -> Result<OutputPlan, AppError> {
    let directory = overrides
        .directory
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    check_directory(&directory, overrides, Some(target.extension()))?;
    let pattern = NamingPattern::build(&overrides.naming, input, count > 1)?;

    let mut plan = OutputPlan::layers(directory, pattern, target);
    if overrides.file.is_some() {
        plan = plan.with_warning(ignored_in_layer_mode(flags::OUTPUT_FILE));
    }
    log::debug!(
        "Layer output into {} named {}",
        plan.directory().display(),
        plan.pattern().map(ToString::to_string).unwrap_or_default()
    );
    Ok(plan)
}

fn resolve_single_file(
    target: Target,
    input: &Path,
    overrides: &OutputOverrides,
) -> Result<OutputPlan, AppError> {
    let extension = target.extension();

    let file = match &overrides.file {
        Some(name) if name.trim().is_empty() => return Err(OutputFileError::Blank.into()),
        Some(name) => PathBuf::from(strip_extension(name, extension)),
        None => PathBuf::from(strip_source_extension(&input.to_string_lossy())),
    };

    let (file, directory) = match &overrides.directory {
        Some(directory) => (replace_directory(&file, directory), directory.clone()),
        None => {
            let directory = explicit_parent(&file)
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
            (file, directory)
        }
    };

    let candidate = append_extension(&file, extension);
    if same_path(&candidate, input) {
        return Err(OutputFileError::SameAsInput {
            input: input.to_path_buf(),
            output: candidate,
        }
        .into());
    }

    check_directory(&directory, overrides, None)?;
    check_output_file(&candidate, overrides)?;

    let warnings = overrides
        .naming
        .flags_used()
        .into_iter()
        .map(ignored_in_single_mode);

    log::debug!("Single output file {}", candidate.display());
    Ok(OutputPlan::single_file(file, directory, target).with_warnings(warnings))
}

/// Validates an output directory, optionally refusing one that already holds
/// files of the target type.
fn check_directory(
    directory: &Path,
    overrides: &OutputOverrides,
    content_extension: Option<&str>,
) -> Result<(), AppError> {
    if !directory.exists() {
        if !overrides.create_directories {
            return Err(OutputDirectoryError::DoesNotExistAndNoCreateFlag {
                path: directory.to_path_buf(),
                flag: flags::CREATE_DIRECTORIES,
            }
            .into());
        }
        return Ok(());
    }

    if !directory.is_dir() {
        return Err(OutputDirectoryError::NotADirectory {
            path: directory.to_path_buf(),
        }
        .into());
    }
    if !is_writable(directory) {
        return Err(OutputDirectoryError::NotWritable {
            path: directory.to_path_buf(),
        }
        .into());
    }

    if let Some(extension) = content_extension {
        if !overrides.overwrite_existing && holds_extension(directory, extension)? {
            return Err(OutputDirectoryError::WouldOverwriteExistingTargets {
                path: directory.to_path_buf(),
                extension: extension.to_string(),
                flag: flags::OVERWRITE_EXISTING,
            }
            .into());
        }
    }
    Ok(())
}

/// Whether any entry of `directory`, file or not, has `.<extension>` in its
/// name.
fn holds_extension(directory: &Path, extension: &str) -> Result<bool, AppError> {
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if mentions_extension(&entry.file_name().to_string_lossy(), extension) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn check_output_file(candidate: &Path, overrides: &OutputOverrides) -> Result<(), OutputFileError> {
    if candidate.is_dir() {
        return Err(OutputFileError::IsDirectory {
            path: candidate.to_path_buf(),
        });
    }
    if candidate.exists() {
        if !overrides.overwrite_existing {
            return Err(OutputFileError::ExistsWithoutOverwrite {
                path: candidate.to_path_buf(),
                flag: flags::OVERWRITE_EXISTING,
            });
        }
        if !is_writable(candidate) {
            return Err(OutputFileError::NotWritable {
                path: candidate.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Decides the output mode for a document with `layer_count` layers and
/// resolves the plan, collecting every option warning along the way.
pub fn plan_output(options: &ResolvedOptions, layer_count: usize) -> Result<OutputPlan, AppError> {
    let has_layers = layer_count > 0;
    let (mode, degraded) = match options.layers {
        LayerRequest::Off => (OutputMode::SingleFile, false),
        LayerRequest::Always if !has_layers => (OutputMode::SingleFile, true),
        LayerRequest::IfExist if !has_layers => (OutputMode::SingleFile, false),
        LayerRequest::Always | LayerRequest::IfExist => (
            OutputMode::Layers { count: layer_count },
            false,
        ),
    };

    let mut plan = resolve(mode, options.target, &options.input, &options.output)?;

    if degraded {
        plan.warnings.insert(
            0,
            "layers activated but input file has no layers, continue for single output file"
                .to_string(),
        );
    }

    let mut extra = Vec::new();
    if mode.does_layers() && options.switch_on_all_layers {
        extra.push(ignored_in_layer_mode(flags::ALL_LAYERS));
    }
    if options.manual_layers {
        if !options.svg_first {
            extra.push(format!(
                "found CLI option <{}> but not <{}>, option will be ignored",
                flags::MANUAL_LAYERS,
                flags::SVG_FIRST
            ));
        } else if !mode.does_layers() {
            extra.push(ignored_in_single_mode(flags::MANUAL_LAYERS));
        }
    }
    extra.extend(options.export.warnings(options.target));

    let plan = plan.with_warnings(extra);
    for warning in &plan.warnings {
        log::warn!("{}", warning);
    }
    Ok(plan)
}

fn ignored_in_layer_mode(flag: &str) -> String {
    format!("layers processed but CLI option <{}> used, will be ignored", flag)
}

fn ignored_in_single_mode(flag: &str) -> String {
    format!("no layers processed but CLI option <{}> used, will be ignored", flag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PatternError;
    use crate::output::pattern::NamingRules;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sandbox() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    fn index_naming() -> OutputOverrides {
        OutputOverrides {
            naming: NamingRules {
                layer_index: true,
                ..NamingRules::default()
            },
            ..OutputOverrides::default()
        }
    }

    #[test]
    fn single_file_strips_source_extension() {
        let dir = sandbox();
        let input = dir.path().join("drawing.svgz");

        let plan = resolve(
            OutputMode::SingleFile,
            Target::Png,
            &input,
            &OutputOverrides::default(),
        )
        .unwrap();

        assert_eq!(plan.file(), Some(dir.path().join("drawing").as_path()));
        assert_eq!(plan.directory(), dir.path());
        assert_eq!(plan.output_file(), Some(dir.path().join("drawing.png")));
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn file_override_drops_redundant_extension() {
        let dir = sandbox();
        let overrides = OutputOverrides {
            file: Some(dir.path().join("poster.pdf").to_string_lossy().into_owned()),
            ..OutputOverrides::default()
        };

        let plan = resolve(
            OutputMode::SingleFile,
            Target::Pdf,
            Path::new("drawing.svg"),
            &overrides,
        )
        .unwrap();
        assert_eq!(plan.output_file(), Some(dir.path().join("poster.pdf")));
    }

    #[test]
    fn directory_override_keeps_file_name() {
        let dir = sandbox();
        let overrides = OutputOverrides {
            directory: Some(dir.path().to_path_buf()),
            ..OutputOverrides::default()
        };

        let plan = resolve(
            OutputMode::SingleFile,
            Target::Eps,
            Path::new("in/sub/drawing.svg"),
            &overrides,
        )
        .unwrap();
        assert_eq!(plan.output_file(), Some(dir.path().join("drawing.eps")));
    }

    #[test]
    fn svg_to_svg_without_override_is_same_as_input() {
        let err = resolve(
            OutputMode::SingleFile,
            Target::Svg,
            Path::new("drawing.svg"),
            &OutputOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::OutputFile(OutputFileError::SameAsInput { .. })
        ));
    }

    #[test]
    fn blank_values_are_rejected() {
        let err = resolve(
            OutputMode::SingleFile,
            Target::Png,
            Path::new("  "),
            &OutputOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::Blank)));

        let overrides = OutputOverrides {
            file: Some(" ".to_string()),
            ..OutputOverrides::default()
        };
        let err = resolve(
            OutputMode::SingleFile,
            Target::Png,
            Path::new("drawing.svg"),
            &overrides,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::OutputFile(OutputFileError::Blank)));
    }

    #[test]
    fn existing_output_needs_overwrite_flag() {
        let dir = sandbox();
        let input = dir.path().join("drawing.svg");
        fs::write(dir.path().join("drawing.png"), b"old").unwrap();

        let err = resolve(
            OutputMode::SingleFile,
            Target::Png,
            &input,
            &OutputOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::OutputFile(OutputFileError::ExistsWithoutOverwrite { .. })
        ));

        let overrides = OutputOverrides {
            overwrite_existing: true,
            ..OutputOverrides::default()
        };
        assert!(resolve(OutputMode::SingleFile, Target::Png, &input, &overrides).is_ok());
    }

    #[test]
    fn output_that_is_a_directory_is_rejected() {
        let dir = sandbox();
        fs::create_dir(dir.path().join("drawing.png")).unwrap();

        let err = resolve(
            OutputMode::SingleFile,
            Target::Png,
            &dir.path().join("drawing.svg"),
            &OutputOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::OutputFile(OutputFileError::IsDirectory { .. })
        ));
    }

    #[test]
    fn layer_mode_ignores_file_override_with_warning() {
        let dir = sandbox();
        let overrides = OutputOverrides {
            file: Some("ignored".to_string()),
            directory: Some(dir.path().to_path_buf()),
            ..index_naming()
        };

        let plan = resolve(
            OutputMode::Layers { count: 2 },
            Target::Png,
            Path::new("drawing.svg"),
            &overrides,
        )
        .unwrap();

        assert!(plan.file().is_none());
        assert_eq!(plan.directory(), dir.path());
        assert_eq!(
            plan.warnings,
            ["layers processed but CLI option <output-file> used, will be ignored"]
        );
    }

    #[test]
    fn layer_directory_with_targets_needs_overwrite() {
        let dir = sandbox();
        fs::write(dir.path().join("old-01.png"), b"png").unwrap();
        let mut overrides = OutputOverrides {
            directory: Some(dir.path().to_path_buf()),
            ..index_naming()
        };

        let err = resolve(
            OutputMode::Layers { count: 2 },
            Target::Png,
            Path::new("drawing.svg"),
            &overrides,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::OutputDirectory(OutputDirectoryError::WouldOverwriteExistingTargets { .. })
        ));

        overrides.overwrite_existing = true;
        assert!(resolve(
            OutputMode::Layers { count: 2 },
            Target::Png,
            Path::new("drawing.svg"),
            &overrides,
        )
        .is_ok());
    }

    #[test]
    fn layer_directory_content_check_counts_any_entry() {
        let dir = sandbox();
        fs::create_dir(dir.path().join("renders.png.d")).unwrap();
        let overrides = OutputOverrides {
            directory: Some(dir.path().to_path_buf()),
            ..index_naming()
        };

        let err = resolve(
            OutputMode::Layers { count: 2 },
            Target::Png,
            Path::new("drawing.svg"),
            &overrides,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::OutputDirectory(OutputDirectoryError::WouldOverwriteExistingTargets { .. })
        ));
    }

    #[test]
    fn missing_directory_needs_create_flag() {
        let dir = sandbox();
        let mut overrides = OutputOverrides {
            directory: Some(dir.path().join("new")),
            ..index_naming()
        };

        let err = resolve(
            OutputMode::Layers { count: 2 },
            Target::Png,
            Path::new("drawing.svg"),
            &overrides,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::OutputDirectory(OutputDirectoryError::DoesNotExistAndNoCreateFlag { .. })
        ));

        overrides.create_directories = true;
        let plan = resolve(
            OutputMode::Layers { count: 2 },
            Target::Png,
            Path::new("drawing.svg"),
            &overrides,
        )
        .unwrap();
        assert!(!dir.path().join("new").exists());
        assert_eq!(plan.directory(), dir.path().join("new"));
    }

    #[test]
    fn layer_mode_without_index_or_id_is_ambiguous() {
        let dir = sandbox();
        let overrides = OutputOverrides {
            directory: Some(dir.path().to_path_buf()),
            ..OutputOverrides::default()
        };

        let err = resolve(
            OutputMode::Layers { count: 3 },
            Target::Png,
            Path::new("drawing.svg"),
            &overrides,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::Pattern(PatternError::Ambiguous { .. })
        ));
    }

    #[test]
    fn single_mode_warns_about_naming_flags() {
        let dir = sandbox();
        let overrides = OutputOverrides {
            naming: NamingRules {
                layer_index: true,
                layer_id: true,
                ..NamingRules::default()
            },
            ..OutputOverrides::default()
        };

        let plan = resolve(
            OutputMode::SingleFile,
            Target::Png,
            &dir.path().join("drawing.svg"),
            &overrides,
        )
        .unwrap();
        assert_eq!(
            plan.warnings,
            [
                "no layers processed but CLI option <layer-index> used, will be ignored",
                "no layers processed but CLI option <layer-id> used, will be ignored",
            ]
        );
    }
}
