// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use crate::constants::{flags, PATTERN_SEPARATOR};
use serde::Serialize;
use std::fmt;

/// Resolution used when exporting bitmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExportDpi(u32);

impl ExportDpi {
    const MIN: u32 = 1;
    const MAX: u32 = 10_000;

    /// Create a new DPI value with bounds validation
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::OutOfBounds {
                option: flags::EXPORT_DPI,
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ExportDpi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// PDF format version written by the conversion tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PdfVersion {
    #[serde(rename = "1.4")]
    V1_4,
    #[serde(rename = "1.5")]
    V1_5,
}

impl PdfVersion {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim() {
            "1.4" => Ok(Self::V1_4),
            "1.5" => Ok(Self::V1_5),
            other => Err(ValidationError::UnsupportedValue {
                option: flags::EXPORT_PDF_VERSION,
                value: other.to_string(),
                expected: "1.4, 1.5",
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1_4 => "1.4",
            Self::V1_5 => "1.5",
        }
    }
}

impl fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PostScript language level written by the conversion tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PsLevel(u8);

impl PsLevel {
    pub fn new(level: u8) -> Result<Self, ValidationError> {
        match level {
            2 | 3 => Ok(Self(level)),
            other => Err(ValidationError::OutOfBounds {
                option: flags::EXPORT_PS_LEVEL,
                value: u32::from(other),
                min: 2,
                max: 3,
            }),
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for PsLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-supplied base name for layer output files.
///
/// Ends up as a literal inside a file name, so it can neither be blank nor
/// carry path separators, and it cannot be the bare pattern separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BaseName(String);

impl BaseName {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(ValidationError::EmptyField(flags::USE_BASENAME));
        }

        if name.contains('/') || name.contains('\\') {
            return Err(ValidationError::InvalidBaseName {
                name: name.clone(),
                reason: "base name cannot contain path separators".to_string(),
            });
        }

        if name == PATTERN_SEPARATOR {
            return Err(ValidationError::InvalidBaseName {
                name: name.clone(),
                reason: "base name cannot be the pattern separator".to_string(),
            });
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
