// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. Reading these constants should tell you how a conversion
//! run names its files, where it puts temporary artifacts and how it reports
//! failure to the shell.

// ---------------------------------------------------------------------------
// Source documents
// ---------------------------------------------------------------------------

/// Extensions stripped from an input file name to derive an output name.
pub const SOURCE_EXTENSIONS: [&str; 2] = [".svg", ".svgz"];

/// Magic bytes of a gzip stream, used to recognise compressed SVG input.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

// ---------------------------------------------------------------------------
// Output naming
// ---------------------------------------------------------------------------

/// Directory used for layer output when no output directory was given.
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Literal placed between the components of a layer naming pattern.
pub const PATTERN_SEPARATOR: &str = "-";

/// Minimum width of a rendered layer index; wider indices are never truncated.
pub const LAYER_INDEX_MIN_WIDTH: usize = 2;

/// Prefix of the node identifier the conversion tool uses to select a layer.
pub const LAYER_NODE_PREFIX: &str = "layer";

// ---------------------------------------------------------------------------
// Temporary artifacts
// ---------------------------------------------------------------------------

/// Prefix for every temporary file or directory a run creates.
pub const TMP_FN_PREFIX: &str = "s2v-";

/// Name standing in for the temporary artifact when simulating.
pub const SIMULATED_TMP_NAME: &str = "s2v-simulated";

/// Extension of the intermediate documents produced by two-phase runs.
pub const INTERMEDIATE_EXTENSION: &str = "svg";

// ---------------------------------------------------------------------------
// External tool
// ---------------------------------------------------------------------------

/// Executable looked up on `PATH` when nothing else was configured.
pub const DEFAULT_TOOL_NAME: &str = "inkscape";

/// Environment variable naming the conversion tool executable.
pub const TOOL_ENV_VAR: &str = "INKSCAPE_EXEC";

// ---------------------------------------------------------------------------
// Process exit codes
// ---------------------------------------------------------------------------

pub const EXIT_SUCCESS: i32 = 0;
/// Help or version text was displayed instead of running.
pub const EXIT_HELP: i32 = 1;
pub const EXIT_USAGE: i32 = -1;
pub const EXIT_INPUT: i32 = -2;
pub const EXIT_OUTPUT_PATH: i32 = -3;
pub const EXIT_PATTERN: i32 = -4;
pub const EXIT_TOOL_INVALID: i32 = -5;
pub const EXIT_TOOL_FAILED: i32 = -6;
pub const EXIT_IO: i32 = -7;

/// Long names of the command-line flags, as they appear in warnings and
/// error messages.
pub mod flags {
    pub const OUTPUT_FILE: &str = "output-file";
    pub const OUTPUT_DIRECTORY: &str = "output-directory";
    pub const CREATE_DIRECTORIES: &str = "create-directories";
    pub const OVERWRITE_EXISTING: &str = "overwrite-existing";
    pub const LAYERS: &str = "layers";
    pub const LAYER_INDEX: &str = "layer-index";
    pub const LAYER_ID: &str = "layer-id";
    pub const NO_BASENAME: &str = "no-basename";
    pub const USE_BASENAME: &str = "use-basename";
    pub const ALL_LAYERS: &str = "all-layers";
    pub const SVG_FIRST: &str = "svg-first";
    pub const MANUAL_LAYERS: &str = "manual-layers";
    pub const EXPORT_DPI: &str = "export-dpi";
    pub const EXPORT_PDF_VERSION: &str = "export-pdf-version";
    pub const EXPORT_PS_LEVEL: &str = "export-ps-level";
    pub const INKSCAPE_EXEC: &str = "inkscape-exec";
}
