// src/output/mod.rs
//! Output handling with clear separation of planning and execution.
//!
//! Planning (paths, naming patterns, validation) is pure apart from
//! inspecting the filesystem; every mutation goes through the [`Effects`]
//! gate in `writer`.

pub(crate) mod paths;
mod pattern;
mod resolver;
mod types;
mod writer;

// Re-export the public interface
pub use pattern::{BaseNameRule, NamingPattern, NamingRules, PatternToken, Placeholder};
pub use resolver::{plan_output, resolve};
pub use types::{OutputMode, OutputOverrides, OutputPlan, OutputTarget};
pub use writer::{simulated_root, Effects};
