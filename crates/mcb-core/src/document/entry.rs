//! Typed views over `signs/sign` and `blocks/block` entries

use super::value::ValueNode;
use super::xml::Element;
use crate::error::TemplateError;
use mcb_world::Position;
use std::fmt;

/// Which descriptor groups a structure targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRef {
    Id(u64),
    /// `sign="*"`
    All,
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::All => f.write_str("*"),
        }
    }
}

/// How a structure names its content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSelector {
    ExplicitId(u16),
    NamePattern(String),
}

impl fmt::Display for ContentSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExplicitId(id) => write!(f, "blockId={id}"),
            Self::NamePattern(p) => write!(f, "blockName='{p}'"),
        }
    }
}

/// User-authored structure declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureEntry {
    /// Position among the `block` elements, for diagnostics
    pub index: usize,
    pub group: GroupRef,
    pub selector: ContentSelector,
    /// Data byte template (`data` attribute)
    pub data: Option<String>,
    pub value: Option<ValueNode>,
}

/// Why a `block` element was not usable
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryError {
    #[error("missing attribute '{0}'")]
    MissingAttribute(&'static str),

    #[error("invalid attribute {key}='{value}'")]
    InvalidAttribute { key: &'static str, value: String },

    #[error("more than one value tree")]
    MultipleValueTrees,

    #[error("invalid value tree: {0}")]
    Template(#[from] TemplateError),
}

impl StructureEntry {
    /// Read a `block` element
    pub fn from_element(index: usize, element: &Element) -> Result<Self, EntryError> {
        let group = match element.attr("sign").map(str::trim) {
            None | Some("") => return Err(EntryError::MissingAttribute("sign")),
            Some("*") => GroupRef::All,
            Some(raw) => GroupRef::Id(raw.parse().map_err(|_| EntryError::InvalidAttribute {
                key: "sign",
                value: raw.to_string(),
            })?),
        };

        let selector = match (element.attr("blockId"), element.attr("blockName")) {
            (Some(raw), _) => ContentSelector::ExplicitId(raw.trim().parse().map_err(|_| {
                EntryError::InvalidAttribute {
                    key: "blockId",
                    value: raw.to_string(),
                }
            })?),
            (None, Some(pattern)) => ContentSelector::NamePattern(pattern.to_string()),
            (None, None) => return Err(EntryError::MissingAttribute("blockId|blockName")),
        };

        let mut trees = element.elements();
        let value = trees.next().map(ValueNode::from_element).transpose()?;
        if trees.next().is_some() {
            return Err(EntryError::MultipleValueTrees);
        }

        Ok(Self {
            index,
            group,
            selector,
            data: element.attr("data").map(str::to_string),
            value,
        })
    }
}

/// Group recorded in the `signs` section of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSign {
    pub id: u64,
    pub caption: Option<String>,
    /// Present only in hand-authored or older documents
    pub position: Option<Position>,
    pub data: Option<u8>,
}

impl RecordedSign {
    /// Read a `sign` element; `None` when `id` is missing or not a number
    #[must_use]
    pub fn from_element(element: &Element) -> Option<Self> {
        let id = element.attr("id")?.trim().parse().ok()?;
        let coord = |axis| element.attr(axis).and_then(|v| v.trim().parse::<i32>().ok());
        let position = match (coord("x"), coord("y"), coord("z")) {
            (Some(x), Some(y), Some(z)) => Some(Position::new(x, y, z)),
            _ => None,
        };
        Some(Self {
            id,
            caption: element.attr("name").map(str::to_string),
            position,
            data: element.attr("data").and_then(|v| v.trim().parse().ok()),
        })
    }

    /// Sign of a discovered group, without position
    #[must_use]
    pub fn discovered(id: u64, caption: Option<&str>) -> Self {
        Self {
            id,
            caption: caption.map(str::to_string),
            position: None,
            data: None,
        }
    }

    /// Element form; position and data are written only when recorded
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("sign").with_attr("id", self.id.to_string());
        if let Some(caption) = &self.caption {
            element.set_attr("name", caption.as_str());
        }
        if let Some(position) = self.position {
            element.set_attr("x", position.x.to_string());
            element.set_attr("y", position.y.to_string());
            element.set_attr("z", position.z.to_string());
        }
        if let Some(data) = self.data {
            element.set_attr("data", data.to_string());
        }
        element
    }
}
