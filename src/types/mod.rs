use thiserror::Error;

mod domain_types;
mod layers;

pub use domain_types::*;
pub use layers::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Value out of bounds for <{option}>: {value}, expected {min}..={max}")]
    OutOfBounds {
        option: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("Unsupported value for <{option}>: {value}, expected one of {expected}")]
    UnsupportedValue {
        option: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Invalid base name: {name} - {reason}")]
    InvalidBaseName { name: String, reason: String },

    #[error("Duplicate layer identifier: {0}")]
    DuplicateLayer(String),

    #[error("Duplicate layer index {index} for layer {id}")]
    DuplicateLayerIndex { id: String, index: usize },
}
