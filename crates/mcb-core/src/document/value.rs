//! Value-tree templates as authored in build documents

use super::xml::Element;
use crate::error::TemplateError;
use mcb_world::TagKind;

/// Scalar leaf kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl ScalarKind {
    #[must_use]
    pub const fn tag_kind(self) -> TagKind {
        match self {
            Self::String => TagKind::String,
            Self::Byte => TagKind::Byte,
            Self::Short => TagKind::Short,
            Self::Int => TagKind::Int,
            Self::Long => TagKind::Long,
            Self::Float => TagKind::Float,
            Self::Double => TagKind::Double,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.tag_kind().as_str()
    }
}

/// Template node: containers recurse, scalars hold unsubstituted text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueNode {
    Compound {
        name: Option<String>,
        children: Vec<ValueNode>,
    },
    List {
        name: Option<String>,
        children: Vec<ValueNode>,
    },
    Scalar {
        name: Option<String>,
        kind: ScalarKind,
        text: String,
    },
}

impl ValueNode {
    /// Convert an authored element; unknown element names are rejected
    pub fn from_element(element: &Element) -> Result<Self, TemplateError> {
        let kind: TagKind = element
            .name
            .parse()
            .map_err(|_| TemplateError::UnknownKind(element.name.clone()))?;
        let name = element.attr("name").map(str::to_string);

        let children = || element.elements().map(Self::from_element).collect::<Result<Vec<_>, _>>();
        Ok(match kind {
            TagKind::Compound => Self::Compound {
                name,
                children: children()?,
            },
            TagKind::List => Self::List {
                name,
                children: children()?,
            },
            scalar => {
                if element.elements().next().is_some() {
                    return Err(TemplateError::ScalarWithChildren(element.name.clone()));
                }
                Self::Scalar {
                    name,
                    kind: scalar_kind(scalar),
                    text: element.text(),
                }
            }
        })
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Compound { name, .. } | Self::List { name, .. } | Self::Scalar { name, .. } => {
                name.as_deref()
            }
        }
    }
}

fn scalar_kind(kind: TagKind) -> ScalarKind {
    match kind {
        TagKind::Byte => ScalarKind::Byte,
        TagKind::Short => ScalarKind::Short,
        TagKind::Int => ScalarKind::Int,
        TagKind::Long => ScalarKind::Long,
        TagKind::Float => ScalarKind::Float,
        TagKind::Double => ScalarKind::Double,
        TagKind::String | TagKind::Compound | TagKind::List => ScalarKind::String,
    }
}
