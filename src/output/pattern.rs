// src/output/pattern.rs
//! Naming patterns for per-layer output files.
//!
//! A pattern is a sequence of literal text and placeholders. Rendering is a
//! pure function of the pattern and one [`LayerEntry`]; edits are list
//! operations on the tokens followed by re-validation, so a placeholder can
//! never be half-replaced.

use super::paths::input_basename;
use crate::constants::{flags, LAYER_INDEX_MIN_WIDTH, PATTERN_SEPARATOR};
use crate::error::PatternError;
use crate::types::{BaseName, LayerEntry};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;

/// Values substituted per layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// Stem of the input file, fixed when the pattern is built.
    BaseName,
    /// Layer index, zero-padded.
    LayerIndex,
    /// Raw layer identifier.
    LayerId,
}

impl Placeholder {
    fn key(&self) -> &'static str {
        match self {
            Self::BaseName => "basename",
            Self::LayerIndex => "index",
            Self::LayerId => "id",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternToken {
    Literal(String),
    Placeholder(Placeholder),
}

impl PatternToken {
    fn is_separator(&self) -> bool {
        matches!(self, Self::Literal(text) if text == PATTERN_SEPARATOR)
    }
}

/// Where the base name of layer outputs comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BaseNameRule {
    /// Stem of the input file.
    #[default]
    FromInput,
    /// Caller-supplied name, used as a literal.
    Custom(BaseName),
    /// No base name at all.
    Suppressed,
}

/// Construction rules for a [`NamingPattern`], straight from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingRules {
    pub basename: BaseNameRule,
    pub layer_index: bool,
    pub layer_id: bool,
}

impl NamingRules {
    /// Long names of the flags these rules were built from.
    pub fn flags_used(&self) -> Vec<&'static str> {
        let mut used = Vec::new();
        if self.layer_index {
            used.push(flags::LAYER_INDEX);
        }
        if self.layer_id {
            used.push(flags::LAYER_ID);
        }
        match self.basename {
            BaseNameRule::FromInput => {}
            BaseNameRule::Custom(_) => used.push(flags::USE_BASENAME),
            BaseNameRule::Suppressed => used.push(flags::NO_BASENAME),
        }
        used
    }
}

/// Template producing one output file name (without extension) per layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingPattern {
    tokens: Vec<PatternToken>,
    basename: String,
    multiple_layers: bool,
}

impl NamingPattern {
    /// Builds a pattern: base name, then layer index, then layer id, joined
    /// by the separator.
    pub fn build(
        rules: &NamingRules,
        input: &Path,
        multiple_layers: bool,
    ) -> Result<Self, PatternError> {
        if multiple_layers && !rules.layer_index && !rules.layer_id {
            return Err(ambiguous());
        }

        let mut components = Vec::new();
        match &rules.basename {
            BaseNameRule::FromInput => {
                components.push(PatternToken::Placeholder(Placeholder::BaseName))
            }
            BaseNameRule::Custom(name) => {
                components.push(PatternToken::Literal(name.as_str().to_string()))
            }
            BaseNameRule::Suppressed => {}
        }
        if rules.layer_index {
            components.push(PatternToken::Placeholder(Placeholder::LayerIndex));
        }
        if rules.layer_id {
            components.push(PatternToken::Placeholder(Placeholder::LayerId));
        }

        let pattern = Self {
            tokens: join_components(components),
            basename: input_basename(input),
            multiple_layers,
        };
        pattern.test_pattern()?;
        Ok(pattern)
    }

    /// Renders the file name for one layer.
    pub fn render(&self, entry: &LayerEntry) -> String {
        self.tokens
            .iter()
            .map(|token| match token {
                PatternToken::Literal(text) => text.clone(),
                PatternToken::Placeholder(Placeholder::BaseName) => self.basename.clone(),
                PatternToken::Placeholder(Placeholder::LayerIndex) => {
                    format!("{:0width$}", entry.index, width = LAYER_INDEX_MIN_WIDTH)
                }
                PatternToken::Placeholder(Placeholder::LayerId) => entry.id.clone(),
            })
            .collect()
    }

    pub fn contains(&self, placeholder: Placeholder) -> bool {
        self.tokens
            .iter()
            .any(|token| *token == PatternToken::Placeholder(placeholder))
    }

    /// Drops the given placeholders and tidies the separators around them.
    ///
    /// The pattern is left untouched when the result would be invalid.
    pub fn remove_placeholders(&mut self, removed: &[Placeholder]) -> Result<(), PatternError> {
        let components = self
            .tokens
            .iter()
            .filter(|token| !token.is_separator())
            .filter(|token| !matches!(token, PatternToken::Placeholder(p) if removed.contains(p)))
            .cloned()
            .collect();

        self.commit(join_components(components))
    }

    /// Replaces the base name placeholder with a fixed name; blank names are
    /// ignored.
    pub fn set_basename(&mut self, name: &str) -> Result<(), PatternError> {
        if name.trim().is_empty() {
            return Ok(());
        }
        let tokens = self
            .tokens
            .iter()
            .map(|token| match token {
                PatternToken::Placeholder(Placeholder::BaseName) => {
                    PatternToken::Literal(name.to_string())
                }
                other => other.clone(),
            })
            .collect();

        self.commit(tokens)
    }

    /// Checks the pattern is non-empty and tells layers apart.
    pub fn test_pattern(&self) -> Result<(), PatternError> {
        Self::validate(&self.tokens, self.multiple_layers)
    }

    fn validate(tokens: &[PatternToken], multiple_layers: bool) -> Result<(), PatternError> {
        let renders_something = tokens.iter().any(|token| match token {
            PatternToken::Literal(text) => !text.is_empty(),
            PatternToken::Placeholder(_) => true,
        });
        if !renders_something {
            return Err(PatternError::Empty);
        }

        let distinguishes_layers = tokens.iter().any(|token| {
            matches!(
                token,
                PatternToken::Placeholder(Placeholder::LayerIndex | Placeholder::LayerId)
            )
        });
        if multiple_layers && !distinguishes_layers {
            return Err(ambiguous());
        }
        Ok(())
    }

    fn commit(&mut self, tokens: Vec<PatternToken>) -> Result<(), PatternError> {
        Self::validate(&tokens, self.multiple_layers)?;
        self.tokens = tokens;
        Ok(())
    }
}

impl fmt::Display for NamingPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            match token {
                PatternToken::Literal(text) => f.write_str(text)?,
                PatternToken::Placeholder(p) => write!(f, "${{{}}}", p.key())?,
            }
        }
        Ok(())
    }
}

impl Serialize for NamingPattern {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

fn ambiguous() -> PatternError {
    PatternError::Ambiguous {
        index_flag: flags::LAYER_INDEX,
        id_flag: flags::LAYER_ID,
    }
}

fn join_components(components: Vec<PatternToken>) -> Vec<PatternToken> {
    let mut tokens = Vec::with_capacity(components.len() * 2);
    for component in components {
        if !tokens.is_empty() {
            tokens.push(PatternToken::Literal(PATTERN_SEPARATOR.to_string()));
        }
        tokens.push(component);
    }
    tokens
}
