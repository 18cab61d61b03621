//! Marker annotations
//!
//! A marker carrying text of the form `<digits># <caption>` is a build
//! descriptor. Everything else is decoration and is ignored.

use crate::orientation::Facing;
use mcb_world::{Position, TileEntity};
use regex::Regex;
use std::sync::OnceLock;

/// Raw marker read from the world, not retained past scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub position: Position,
    pub content_type: u16,
    pub data: u8,
    pub lines: [String; 4],
}

impl Marker {
    /// Marker from its tile entity and the block under it
    #[must_use]
    pub fn from_tile(position: Position, tile: &TileEntity, content_type: u16, data: u8) -> Self {
        Self {
            position,
            content_type,
            data,
            lines: tile.text_lines().map(str::to_string),
        }
    }

    /// Non-empty lines joined by a single space
    #[must_use]
    pub fn text(&self) -> String {
        join_lines(self.lines.iter().map(String::as_str))
    }
}

/// Join text lines with single spaces, skipping empty ones
pub fn join_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    lines
        .into_iter()
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Group id and caption parsed from marker text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub group_id: u64,
    pub caption: String,
}

fn grammar() -> &'static Regex {
    static GRAMMAR: OnceLock<Regex> = OnceLock::new();
    GRAMMAR.get_or_init(|| Regex::new(r"^(\d+)# ?(.*)$").expect("annotation grammar is valid"))
}

/// Parse marker text; `None` when the text is not an annotation
#[must_use]
pub fn parse(text: &str) -> Option<Annotation> {
    let caps = grammar().captures(text)?;
    let group_id = caps[1].parse().ok()?;
    Some(Annotation {
        group_id,
        caption: caps[2].to_string(),
    })
}

/// Marker that passed parsing and orientation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub group_id: u64,
    pub caption: String,
    pub position: Position,
    pub facing: Facing,
    /// Raw orientation byte of the marker
    pub data: u8,
}

impl Descriptor {
    #[must_use]
    pub fn new(annotation: Annotation, position: Position, facing: Facing, data: u8) -> Self {
        Self {
            group_id: annotation.group_id,
            caption: annotation.caption,
            position,
            facing,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_id_and_caption() {
        assert_eq!(
            parse("42# Storage Room"),
            Some(Annotation {
                group_id: 42,
                caption: "Storage Room".to_string()
            })
        );
    }

    #[test]
    fn rejects_text_without_annotation() {
        assert_eq!(parse("no hash here"), None);
        assert_eq!(parse("#5 wrong order"), None);
        assert_eq!(parse(" 5# leading space"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn empty_caption_is_allowed() {
        let a = parse("7#").unwrap();
        assert_eq!(a.group_id, 7);
        assert_eq!(a.caption, "");
    }

    #[test]
    fn only_one_space_is_consumed() {
        assert_eq!(parse("3#  two").unwrap().caption, " two");
        assert_eq!(parse("3#tight").unwrap().caption, "tight");
    }

    #[test]
    fn lines_join_with_single_spaces() {
        let tile = TileEntity::marker("Sign", Position::new(0, 0, 0), ["12# Great", "", "Hall", ""]);
        let marker = Marker::from_tile(Position::new(0, 0, 0), &tile, 63, 0);
        assert_eq!(marker.text(), "12# Great Hall");
        assert_eq!(parse(&marker.text()).unwrap().caption, "Great Hall");
    }

    #[test]
    fn oversized_id_is_not_an_annotation() {
        assert_eq!(parse("99999999999999999999999# huge"), None);
    }

    proptest! {
        #[test]
        fn prop_parse_recovers_id_and_caption(id in 0u64..1_000_000, caption in "[A-Za-z0-9 ]{0,20}") {
            let parsed = parse(&format!("{id}# {caption}")).unwrap();
            prop_assert_eq!(parsed.group_id, id);
            prop_assert_eq!(parsed.caption, caption);
        }
    }
}
