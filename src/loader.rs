// src/loader.rs
//! Text-level reader for Inkscape SVG documents.
//!
//! The document is never parsed as XML. Layer groups are found by scanning
//! opening `<g>` tags for `inkscape:groupmode="layer"`, and visibility is
//! changed by rewriting the `display` declaration in those tags only. All
//! other text is written back byte for byte.

use crate::constants::{GZIP_MAGIC, LAYER_NODE_PREFIX};
use crate::error::InputError;
use crate::pipeline::DocumentLoader;
use crate::types::{LayerEntry, LayerSet};
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::ops::Range;
use std::path::Path;

lazy_static::lazy_static! {
    static ref GROUP_TAG: Regex =
        Regex::new(r"<g\b[^>]*>").expect("Failed to compile group tag regex - this is a bug in the code");
    static ref LAYER_MODE: Regex = Regex::new(r#"inkscape:groupmode\s*=\s*["']layer["']"#)
        .expect("Failed to compile group mode regex - this is a bug in the code");
    static ref LABEL_ATTR: Regex = Regex::new(r#"inkscape:label\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("Failed to compile label regex - this is a bug in the code");
    static ref ID_ATTR: Regex = Regex::new(r#"\sid\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("Failed to compile id regex - this is a bug in the code");
    static ref STYLE_ATTR: Regex = Regex::new(r#"\sstyle\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("Failed to compile style regex - this is a bug in the code");
    static ref DISPLAY_DECL: Regex = Regex::new(r"display\s*:\s*[A-Za-z-]+")
        .expect("Failed to compile display regex - this is a bug in the code");
    static ref LAYER_NUMBER: Regex = Regex::new(&format!(r"^{}(\d+)$", LAYER_NODE_PREFIX))
        .expect("Failed to compile layer number regex - this is a bug in the code");
}

/// Opening tag of one layer group.
#[derive(Debug, Clone)]
struct LayerGroup {
    /// Identifier in the [`LayerSet`]; `None` when it could not be made unique.
    id: Option<String>,
    span: Range<usize>,
    /// `None` until the visibility is changed.
    visible: Option<bool>,
}

/// Loader for SVG files written by Inkscape.
#[derive(Debug, Default)]
pub struct InkscapeSvgLoader {
    source: String,
    groups: Vec<LayerGroup>,
    layers: LayerSet,
}

impl InkscapeSvgLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a document from text already in memory.
    pub fn load_str(&mut self, source: impl Into<String>) {
        self.source = source.into();
        self.groups.clear();
        self.layers = LayerSet::new();
        self.scan();
    }

    /// Finds the layer groups. Indices come from `id="layerN"`; groups with
    /// any other id take their 1-based position, moved up past indices
    /// already claimed so no two layers share one.
    fn scan(&mut self) {
        let tags: Vec<(Range<usize>, Option<usize>)> = GROUP_TAG
            .find_iter(&self.source)
            .filter(|found| LAYER_MODE.is_match(found.as_str()))
            .map(|found| {
                let number = attribute(&ID_ATTR, found.as_str()).and_then(layer_number);
                (found.range(), number)
            })
            .collect();
        let mut claimed: HashSet<usize> = tags.iter().filter_map(|(_, number)| *number).collect();

        for (position, (span, number)) in tags.into_iter().enumerate() {
            let tag = &self.source[span.clone()];
            let index = match number {
                Some(number) => number,
                None => {
                    let mut index = position + 1;
                    while claimed.contains(&index) {
                        index += 1;
                    }
                    claimed.insert(index);
                    index
                }
            };

            let element_id = attribute(&ID_ATTR, tag);
            let node = element_id
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}{}", LAYER_NODE_PREFIX, index));
            let candidates = [
                attribute(&LABEL_ATTR, tag).filter(|label| !label.trim().is_empty()),
                element_id,
            ];
            let id = candidates
                .into_iter()
                .flatten()
                .find(|candidate| {
                    let entry = LayerEntry::new(*candidate, index).with_node(node.as_str());
                    self.layers.insert_entry(entry).is_ok()
                })
                .map(str::to_string);

            if id.is_none() {
                log::warn!(
                    "layer group at byte {} has no unique label, id or index, it will not be converted",
                    span.start
                );
            }
            self.groups.push(LayerGroup {
                id,
                span,
                visible: None,
            });
        }
        log::debug!("Found {} layers", self.layers.len());
    }

    fn set_visibility<F>(&mut self, visible: bool, mut selects: F)
    where
        F: FnMut(&LayerGroup) -> bool,
    {
        for group in self.groups.iter_mut().filter(|group| selects(group)) {
            group.visible = Some(visible);
        }
    }
}

impl DocumentLoader for InkscapeSvgLoader {
    fn load(&mut self, path: &Path) -> Result<(), InputError> {
        let bytes = fs::read(path).map_err(|source| InputError::NotReadable {
            path: path.to_path_buf(),
            source,
        })?;

        let compressed = bytes.starts_with(&GZIP_MAGIC)
            || path.extension().is_some_and(|ext| ext == "svgz");
        if compressed {
            log::warn!(
                "input file <{}> is compressed, layers are not scanned",
                path.display()
            );
            self.load_str(String::new());
            return Ok(());
        }

        let source = String::from_utf8(bytes).map_err(|err| InputError::NotReadable {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, err),
        })?;
        self.load_str(source);
        Ok(())
    }

    fn layers(&self) -> &LayerSet {
        &self.layers
    }

    fn switch_on_layer(&mut self, id: &str) {
        self.set_visibility(true, |group| group.id.as_deref() == Some(id));
    }

    fn switch_off_all_layers(&mut self) {
        self.set_visibility(false, |_| true);
    }

    fn switch_on_all_layers(&mut self) {
        self.set_visibility(true, |_| true);
    }

    fn serialize_current_state(&self) -> Vec<String> {
        let mut document = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for group in &self.groups {
            document.push_str(&self.source[cursor..group.span.start]);
            let tag = &self.source[group.span.clone()];
            match group.visible {
                Some(visible) => document.push_str(&with_display(tag, visible)),
                None => document.push_str(tag),
            }
            cursor = group.span.end;
        }
        document.push_str(&self.source[cursor..]);

        document.lines().map(str::to_string).collect()
    }
}

/// `N` of an element id of the form `layerN`.
fn layer_number(id: &str) -> Option<usize> {
    LAYER_NUMBER
        .captures(id)
        .and_then(|caps| caps.get(1))
        .and_then(|n| n.as_str().parse().ok())
}

/// Value of an attribute matched by one of the attribute regexes.
fn attribute<'t>(regex: &Regex, tag: &'t str) -> Option<&'t str> {
    regex
        .captures(tag)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|value| value.as_str())
}

/// Rewrites an opening tag so its `display` style matches `visible`.
fn with_display(tag: &str, visible: bool) -> String {
    let declaration = if visible {
        "display:inline"
    } else {
        "display:none"
    };

    let style = STYLE_ATTR
        .captures(tag)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)));
    if let Some(style) = style {
        let value = style.as_str();
        let rewritten: Cow<'_, str> = if DISPLAY_DECL.is_match(value) {
            DISPLAY_DECL.replace(value, declaration)
        } else if value.trim().is_empty() {
            Cow::Borrowed(declaration)
        } else {
            Cow::Owned(format!("{};{}", declaration, value))
        };
        return format!("{}{}{}", &tag[..style.start()], rewritten, &tag[style.end()..]);
    }

    let close = if tag.ends_with("/>") {
        tag.len() - 2
    } else {
        tag.len() - 1
    };
    format!(
        "{} style=\"{}\"{}",
        tag[..close].trim_end(),
        declaration,
        &tag[close..]
    )
}
