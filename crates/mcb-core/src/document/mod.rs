//! Build documents
//!
//! The document is the round-trippable intermediate between discovery and
//! replay:
//! - `signs`: descriptor groups written by `init` (id and caption, plus the
//!   recorded position of groups adopted under force)
//! - `blocks`: structure declarations authored by hand, never rewritten
//!
//! Only `signs` is replaced on merge. Every other child of the root, known
//! or not, is written back as it was read.

mod entry;
mod value;
pub mod xml;

pub use entry::{ContentSelector, EntryError, GroupRef, RecordedSign, StructureEntry};
pub use value::{ScalarKind, ValueNode};
pub use xml::{Element, XmlError, XmlNode};

use crate::diagnostics::{Diagnostics, Location};
use crate::error::DocumentError;
use crate::registry::DescriptorRegistry;
use std::io::ErrorKind;
use std::path::Path;

/// Root element name
pub const ROOT: &str = "mcbuilder";
/// Descriptor group section
pub const SIGNS: &str = "signs";
/// Structure section
pub const BLOCKS: &str = "blocks";

/// Build document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Element::new(ROOT),
        }
    }

    /// Load from `path`; an absent file yields an empty document
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text, path),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No document at {}, starting empty", path.display());
                Ok(Self::new())
            }
            Err(e) => Err(DocumentError::io_error(path, e)),
        }
    }

    /// Parse document text; `path` is only used in errors
    pub fn parse(text: &str, path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let root = xml::parse(text).map_err(|e| DocumentError::parse_error(path, e))?;
        if root.name != ROOT {
            return Err(DocumentError::UnexpectedRoot {
                path: path.to_path_buf(),
                found: root.name,
            });
        }
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The `signs` section, if present
    #[must_use]
    pub fn signs(&self) -> Option<&Element> {
        self.root.find(SIGNS)
    }

    /// The `blocks` section, if present
    #[must_use]
    pub fn blocks(&self) -> Option<&Element> {
        self.root.find(BLOCKS)
    }

    /// Number of `block` elements, valid or not
    #[must_use]
    pub fn structure_count(&self) -> usize {
        self.root
            .elements_named(BLOCKS)
            .map(|b| b.elements_named("block").count())
            .sum()
    }

    /// Replace the `signs` section with a fresh serialization of `registry`
    ///
    /// The section keeps its place among the root's children; a document
    /// without one gets it as first child.
    pub fn merge_signs(&mut self, registry: &DescriptorRegistry) {
        self.merge_signs_keeping(registry, &[]);
    }

    /// [`Document::merge_signs`], writing `adopted` signs in full
    ///
    /// Groups placed from a recorded position have no marker in the world,
    /// so their position and data must survive the rewrite.
    pub fn merge_signs_keeping(&mut self, registry: &DescriptorRegistry, adopted: &[RecordedSign]) {
        let mut signs = Element::new(SIGNS);
        for group in registry.groups() {
            let sign = match adopted.iter().find(|sign| sign.id == group.id()) {
                Some(sign) => sign.to_element(),
                None => RecordedSign::discovered(group.id(), group.caption()).to_element(),
            };
            signs.children.push(XmlNode::Element(sign));
        }

        let is_signs = |node: &XmlNode| matches!(node, XmlNode::Element(e) if e.name == SIGNS);
        match self.root.children.iter().position(is_signs) {
            Some(at) => {
                self.root.children[at] = XmlNode::Element(signs);
                let mut index = 0;
                self.root.children.retain(|node| {
                    let keep = index <= at || !is_signs(node);
                    index += 1;
                    keep
                });
            }
            None => self.root.children.insert(0, XmlNode::Element(signs)),
        }
    }

    /// Canonical text form
    pub fn to_xml_string(&self, indent: usize) -> Result<String, DocumentError> {
        xml::write(&self.root, indent).map_err(|e| DocumentError::Serialize(e.to_string()))
    }

    /// Serialize and write to `path`, returning the written text
    ///
    /// Nothing is written when serialization yields no text.
    pub fn save(&self, path: impl AsRef<Path>, indent: usize) -> Result<String, DocumentError> {
        let path = path.as_ref();
        let text = self.to_xml_string(indent)?;
        if text.trim().is_empty() {
            tracing::warn!("Empty serialization, not writing {}", path.display());
            return Ok(text);
        }
        std::fs::write(path, &text).map_err(|e| DocumentError::io_error(path, e))?;
        tracing::info!("Wrote document {}", path.display());
        Ok(text)
    }

    /// Groups recorded in the `signs` section
    pub fn recorded_signs(&self, diag: &mut Diagnostics) -> Vec<RecordedSign> {
        let mut recorded = Vec::new();
        for section in self.root.elements_named(SIGNS) {
            for element in section.elements_named("sign") {
                match RecordedSign::from_element(element) {
                    Some(sign) => recorded.push(sign),
                    None => diag.warn(
                        Location::Run,
                        format!("ignoring sign entry without numeric id: {:?}", element.attributes),
                    ),
                }
            }
        }
        recorded
    }

    /// Structure declarations of the `blocks` section
    ///
    /// Entries that cannot be read are dropped with an error diagnostic.
    pub fn read_structures(&self, diag: &mut Diagnostics) -> Vec<StructureEntry> {
        let mut entries = Vec::new();
        let blocks = self
            .root
            .elements_named(BLOCKS)
            .flat_map(|section| section.elements_named("block"));
        for (index, element) in blocks.enumerate() {
            match StructureEntry::from_element(index, element) {
                Ok(entry) => entries.push(entry),
                Err(e) => diag.error(Location::Structure(index), format!("dropping block entry: {e}")),
            }
        }
        entries
    }
}
