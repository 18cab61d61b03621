//! Value-tree resolution
//!
//! Turns a [`ValueNode`] template into a concrete [`Tag`]. Scalar text has
//! every `%(name)s` placeholder replaced from a [`PlaceholderContext`] and
//! is then parsed as the node's declared kind. Resolution fails fast: an
//! unknown placeholder or unparsable scalar aborts the whole tree.

use crate::descriptor::Descriptor;
use crate::document::{ScalarKind, ValueNode};
use crate::error::TemplateError;
use mcb_world::Tag;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Flat name → text mapping used for substitution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderContext {
    values: BTreeMap<String, String>,
}

impl PlaceholderContext {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context of one placement: `x`, `y`, `z`, `facing`, `data`, `id`, `name`
    #[must_use]
    pub fn for_descriptor(descriptor: &Descriptor, caption: Option<&str>) -> Self {
        Self::new()
            .with("x", descriptor.position.x)
            .with("y", descriptor.position.y)
            .with("z", descriptor.position.z)
            .with("facing", descriptor.facing.as_byte())
            .with("data", descriptor.data)
            .with("id", descriptor.group_id)
            .with("name", caption.unwrap_or_default())
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.values.insert(name.into(), value.to_string());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"%\((\w+)\)s?").expect("placeholder pattern is valid"))
}

/// Replace every `%(name)s` in `text`
pub fn substitute(text: &str, context: &PlaceholderContext) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in placeholder().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let key = &caps[1];
        let value = context
            .get(key)
            .ok_or_else(|| TemplateError::UnresolvedPlaceholder(key.to_string()))?;
        out.push_str(&text[last..whole.start()]);
        out.push_str(value);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// Resolve a template tree against `context`
pub fn resolve(node: &ValueNode, context: &PlaceholderContext) -> Result<Tag, TemplateError> {
    match node {
        ValueNode::Compound { children, .. } => {
            let mut compound = Tag::compound();
            for child in children {
                let name = child.name().ok_or(TemplateError::UnnamedChild)?;
                if compound.get(name).is_some() {
                    return Err(TemplateError::DuplicateChild(name.to_string()));
                }
                compound = compound.with(name, resolve(child, context)?);
            }
            Ok(compound)
        }
        ValueNode::List { children, .. } => {
            let items = children
                .iter()
                .map(|child| resolve(child, context))
                .collect::<Result<Vec<_>, _>>()?;
            if let Some(first) = items.first() {
                let expected = first.kind();
                if let Some(other) = items.iter().find(|t| t.kind() != expected) {
                    return Err(TemplateError::HeterogeneousList {
                        expected: expected.as_str(),
                        found: other.kind().as_str(),
                    });
                }
            }
            Ok(Tag::List(items))
        }
        ValueNode::Scalar { kind, text, .. } => scalar(*kind, &substitute(text, context)?),
    }
}

/// Convert substituted text to a scalar tag
pub fn scalar(kind: ScalarKind, text: &str) -> Result<Tag, TemplateError> {
    let invalid = || TemplateError::InvalidScalar {
        kind: kind.as_str(),
        text: text.to_string(),
    };
    let trimmed = text.trim();
    Ok(match kind {
        ScalarKind::String => Tag::String(text.to_string()),
        ScalarKind::Byte => Tag::Byte(parse_byte(trimmed).ok_or_else(invalid)?),
        ScalarKind::Short => Tag::Short(trimmed.parse().map_err(|_| invalid())?),
        ScalarKind::Int => Tag::Int(trimmed.parse().map_err(|_| invalid())?),
        ScalarKind::Long => Tag::Long(trimmed.parse().map_err(|_| invalid())?),
        // `inf` and `NaN` parse but cannot be stored
        ScalarKind::Float => Tag::Float(
            trimmed
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(invalid)?,
        ),
        ScalarKind::Double => Tag::Double(
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(invalid)?,
        ),
    })
}

/// Signed byte, accepting unsigned spellings 128..=255 as their two's complement
fn parse_byte(text: &str) -> Option<i8> {
    text.parse::<i8>()
        .ok()
        .or_else(|| text.parse::<u8>().ok().map(|v| i8::from_ne_bytes([v])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Annotation;
    use crate::document::{xml, ValueNode};
    use crate::orientation::Facing;
    use mcb_world::Position;
    use pretty_assertions::assert_eq;

    fn xyz(x: i32, y: i32, z: i32) -> PlaceholderContext {
        PlaceholderContext::new().with("x", x).with("y", y).with("z", z)
    }

    fn node(text: &str) -> ValueNode {
        ValueNode::from_element(&xml::parse(text).unwrap()).unwrap()
    }

    #[test]
    fn substitutes_coordinates() {
        assert_eq!(
            substitute("%(x)s,%(y)s,%(z)s", &xyz(10, 64, -3)).unwrap(),
            "10,64,-3"
        );
        let tag = resolve(&node("<String>%(x)s,%(y)s,%(z)s</String>"), &xyz(10, 64, -3)).unwrap();
        assert_eq!(tag, Tag::String("10,64,-3".into()));
    }

    #[test]
    fn bare_placeholder_without_suffix() {
        assert_eq!(substitute("at %(y)", &xyz(0, 5, 0)).unwrap(), "at 5");
    }

    #[test]
    fn unresolved_placeholder_fails() {
        assert_eq!(
            substitute("%(w)s", &xyz(0, 0, 0)),
            Err(TemplateError::UnresolvedPlaceholder("w".into()))
        );
    }

    #[test]
    fn scalars_convert_per_kind() {
        let ctx = xyz(10, 64, -3);
        assert_eq!(resolve(&node("<Int>%(z)s</Int>"), &ctx).unwrap(), Tag::Int(-3));
        assert_eq!(resolve(&node("<Byte>255</Byte>"), &ctx).unwrap(), Tag::Byte(-1));
        assert_eq!(resolve(&node("<Short>%(y)s</Short>"), &ctx).unwrap(), Tag::Short(64));
        assert_eq!(resolve(&node("<Long>%(x)s</Long>"), &ctx).unwrap(), Tag::Long(10));
        assert_eq!(resolve(&node("<Float>0.5</Float>"), &ctx).unwrap(), Tag::Float(0.5));
        assert_eq!(resolve(&node("<Double>%(y)s.25</Double>"), &ctx).unwrap(), Tag::Double(64.25));
        assert!(matches!(
            resolve(&node("<Int>%(x)s,%(y)s</Int>"), &ctx),
            Err(TemplateError::InvalidScalar { kind: "Int", .. })
        ));
        assert!(resolve(&node("<Byte>300</Byte>"), &ctx).is_err());
    }

    #[test]
    fn resolves_nested_tile_entity() {
        let template = node(
            r#"<Compound>
                <String name="id">Chest</String>
                <Int name="x">%(x)s</Int>
                <Int name="y">%(y)s</Int>
                <Int name="z">%(z)s</Int>
                <List name="Items">
                    <Compound><Byte name="Slot">0</Byte><Short name="id">%(data)s</Short></Compound>
                </List>
            </Compound>"#,
        );
        let descriptor = Descriptor::new(
            Annotation {
                group_id: 6,
                caption: "Loot".into(),
            },
            Position::new(1, 70, 2),
            Facing::East,
            5,
        );
        let ctx = PlaceholderContext::for_descriptor(&descriptor, Some("Loot"));
        let tag = resolve(&template, &ctx).unwrap();

        let expected = Tag::compound()
            .with("id", Tag::String("Chest".into()))
            .with("x", Tag::Int(1))
            .with("y", Tag::Int(70))
            .with("z", Tag::Int(2))
            .with(
                "Items",
                Tag::List(vec![Tag::compound()
                    .with("Slot", Tag::Byte(0))
                    .with("id", Tag::Short(5))]),
            );
        assert_eq!(tag, expected);
    }

    #[test]
    fn lists_must_be_homogeneous() {
        let err = resolve(&node("<List><Int>1</Int><String>a</String></List>"), &xyz(0, 0, 0));
        assert_eq!(
            err,
            Err(TemplateError::HeterogeneousList {
                expected: "Int",
                found: "String"
            })
        );
    }

    #[test]
    fn compound_children_need_distinct_names() {
        let ctx = xyz(0, 0, 0);
        assert_eq!(
            resolve(&node("<Compound><Int>1</Int><Int>2</Int></Compound>"), &ctx),
            Err(TemplateError::UnnamedChild)
        );
        assert_eq!(
            resolve(
                &node(r#"<Compound><Int name="a">3</Int><Int name="a">4</Int></Compound>"#),
                &ctx
            ),
            Err(TemplateError::DuplicateChild("a".into()))
        );
        // Same name at different depths is fine
        let nested = node(r#"<Compound><Int name="a">1</Int><Compound name="b"><Int name="a">2</Int></Compound></Compound>"#);
        let tag = resolve(&nested, &ctx).unwrap();
        assert_eq!(tag.get("b").and_then(|b| b.get("a")), Some(&Tag::Int(2)));
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let ctx = xyz(0, 0, 0);
        for text in ["inf", "-inf", "NaN", "infinity"] {
            assert!(matches!(
                scalar(ScalarKind::Float, text),
                Err(TemplateError::InvalidScalar { kind: "Float", .. })
            ));
            assert!(scalar(ScalarKind::Double, text).is_err());
        }
        assert!(resolve(&node("<Compound><Float name=\"f\">inf</Float></Compound>"), &ctx).is_err());
        assert_eq!(scalar(ScalarKind::Double, "-1e300").unwrap(), Tag::Double(-1e300));
    }

    #[test]
    fn padded_string_leaf_is_kept_verbatim() {
        let tag = resolve(
            &node(r#"<Compound><String name="CustomName">  Two  Words  </String></Compound>"#),
            &xyz(0, 0, 0),
        )
        .unwrap();
        assert_eq!(tag.get("CustomName"), Some(&Tag::String("  Two  Words  ".into())));
    }

    #[test]
    fn descriptor_context_carries_facing_byte() {
        let descriptor = Descriptor::new(
            Annotation {
                group_id: 2,
                caption: String::new(),
            },
            Position::new(0, 0, 0),
            Facing::North,
            9,
        );
        let ctx = PlaceholderContext::for_descriptor(&descriptor, None);
        assert_eq!(ctx.get("facing"), Some("2"));
        assert_eq!(ctx.get("data"), Some("9"));
        assert_eq!(ctx.get("name"), Some(""));
    }
}
