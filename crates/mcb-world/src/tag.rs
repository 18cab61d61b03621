//! Typed tag tree
//!
//! Containers keep insertion order so that a value written from a template
//! reads back in the order it was authored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a tag node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Compound,
    List,
    String,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl TagKind {
    /// Canonical name, as used in build documents
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compound => "Compound",
            Self::List => "List",
            Self::String => "String",
            Self::Byte => "Byte",
            Self::Short => "Short",
            Self::Int => "Int",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TagKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Compound" => Self::Compound,
            "List" => Self::List,
            "String" => Self::String,
            "Byte" => Self::Byte,
            "Short" => Self::Short,
            "Int" => Self::Int,
            "Long" => Self::Long,
            "Float" => Self::Float,
            "Double" => Self::Double,
            other => return Err(format!("unknown tag kind '{other}'")),
        })
    }
}

/// Tag value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Tag {
    Compound(IndexMap<String, Tag>),
    List(Vec<Tag>),
    String(String),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Tag {
    /// Empty compound
    #[inline]
    #[must_use]
    pub fn compound() -> Self {
        Self::Compound(IndexMap::new())
    }

    #[must_use]
    pub fn kind(&self) -> TagKind {
        match self {
            Self::Compound(_) => TagKind::Compound,
            Self::List(_) => TagKind::List,
            Self::String(_) => TagKind::String,
            Self::Byte(_) => TagKind::Byte,
            Self::Short(_) => TagKind::Short,
            Self::Int(_) => TagKind::Int,
            Self::Long(_) => TagKind::Long,
            Self::Float(_) => TagKind::Float,
            Self::Double(_) => TagKind::Double,
        }
    }

    /// Builder-style insert into a compound; ignored for other kinds
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Tag) -> Self {
        if let Self::Compound(map) = &mut self {
            map.insert(name.into(), value);
        }
        self
    }

    /// Child of a compound by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tag> {
        match self {
            Self::Compound(map) => map.get(name),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_compound(&self) -> Option<&IndexMap<String, Tag>> {
        match self {
            Self::Compound(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_compound_mut(&mut self) -> Option<&mut IndexMap<String, Tag>> {
        match self {
            Self::Compound(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether every float in the tree is finite
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Compound(map) => map.values().all(Tag::is_finite),
            Self::List(items) => items.iter().all(Tag::is_finite),
            Self::Float(v) => v.is_finite(),
            Self::Double(v) => v.is_finite(),
            _ => true,
        }
    }

    /// Integral value widened to `i64`
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Byte(v) => Some(i64::from(v)),
            Self::Short(v) => Some(i64::from(v)),
            Self::Int(v) => Some(i64::from(v)),
            Self::Long(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in [
            TagKind::Compound,
            TagKind::List,
            TagKind::String,
            TagKind::Byte,
            TagKind::Short,
            TagKind::Int,
            TagKind::Long,
            TagKind::Float,
            TagKind::Double,
        ] {
            assert_eq!(kind.as_str().parse::<TagKind>().unwrap(), kind);
        }
        assert!("Array".parse::<TagKind>().is_err());
    }

    #[test]
    fn compound_keeps_insertion_order() {
        let tag = Tag::compound()
            .with("id", Tag::String("Chest".into()))
            .with("x", Tag::Int(10))
            .with("Items", Tag::List(vec![]));

        let keys: Vec<_> = tag.as_compound().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["id", "x", "Items"]);
        assert_eq!(tag.get("x").and_then(Tag::as_i64), Some(10));
        assert_eq!(tag.get("id").and_then(Tag::as_str), Some("Chest"));
    }

    #[test]
    fn finiteness_is_checked_through_the_tree() {
        let ok = Tag::compound().with("f", Tag::Float(1.5));
        assert!(ok.is_finite());
        let nested = Tag::compound().with("Items", Tag::List(vec![Tag::Double(f64::NAN)]));
        assert!(!nested.is_finite());
        assert!(!Tag::Float(f32::INFINITY).is_finite());
    }

    #[test]
    fn json_shape_is_tagged() {
        let json = serde_json::to_string(&Tag::Short(3)).unwrap();
        assert_eq!(json, r#"{"type":"Short","value":3}"#);
        let back: Tag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Tag::Short(3));
    }
}
