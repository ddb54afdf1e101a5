// src/types/layers.rs
//! Layers as reported by a document loader.

use super::ValidationError;
use crate::constants::LAYER_NODE_PREFIX;
use indexmap::IndexMap;
use serde::Serialize;

/// One named layer of a source document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LayerEntry {
    /// Identifier, unique within the document.
    pub id: String,
    /// Stable ordering position, unique within the document.
    pub index: usize,
    /// Element id the conversion tool selects the layer by.
    pub node: String,
}

impl LayerEntry {
    /// A layer whose node follows the `layer<index>` convention.
    pub fn new(id: impl Into<String>, index: usize) -> Self {
        Self {
            id: id.into(),
            index,
            node: default_node(index),
        }
    }

    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = node.into();
        self
    }
}

fn default_node(index: usize) -> String {
    format!("{}{}", LAYER_NODE_PREFIX, index)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct LayerSlot {
    index: usize,
    node: String,
}

/// Ordered mapping of layer identifier to layer index.
///
/// Identifiers and indices are both unique. Iteration follows insertion
/// (document) order; [`LayerSet::by_index`] yields the order conversions run
/// in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LayerSet {
    layers: IndexMap<String, LayerSlot>,
}

impl LayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer selected by `layer<index>`.
    pub fn insert(&mut self, id: impl Into<String>, index: usize) -> Result<(), ValidationError> {
        self.insert_entry(LayerEntry::new(id, index))
    }

    /// Adds a layer, rejecting identifiers and indices already present.
    pub fn insert_entry(&mut self, entry: LayerEntry) -> Result<(), ValidationError> {
        if self.layers.contains_key(&entry.id) {
            return Err(ValidationError::DuplicateLayer(entry.id));
        }
        if self.holds_index(entry.index) {
            return Err(ValidationError::DuplicateLayerIndex {
                id: entry.id,
                index: entry.index,
            });
        }
        self.layers.insert(
            entry.id,
            LayerSlot {
                index: entry.index,
                node: entry.node,
            },
        );
        Ok(())
    }

    pub fn holds_index(&self, index: usize) -> bool {
        self.layers.values().any(|slot| slot.index == index)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.layers.contains_key(id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.layers.get(id).map(|slot| slot.index)
    }

    /// Entries in document order.
    pub fn entries(&self) -> Vec<LayerEntry> {
        self.layers
            .iter()
            .map(|(id, slot)| LayerEntry {
                id: id.clone(),
                index: slot.index,
                node: slot.node.clone(),
            })
            .collect()
    }

    /// Entries in ascending index order.
    pub fn by_index(&self) -> Vec<LayerEntry> {
        let mut entries = self.entries();
        entries.sort_by_key(|entry| entry.index);
        entries
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for LayerSet {
    /// Later duplicates of an identifier or index are dropped.
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (id, index) in iter {
            let _ = set.insert(id, index);
        }
        set
    }
}
