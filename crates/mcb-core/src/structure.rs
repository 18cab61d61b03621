//! Structure resolution
//!
//! Binds a [`StructureEntry`] to a content type and to the positions of the
//! groups it targets. Everything that can fail is resolved here, ahead of
//! any world mutation, so a structure is either fully placeable or skipped.

use crate::descriptor::Descriptor;
use crate::diagnostics::{Diagnostics, Location};
use crate::document::{ContentSelector, GroupRef, ScalarKind, StructureEntry};
use crate::error::TemplateError;
use crate::registry::{DescriptorGroup, DescriptorRegistry};
use crate::template::{self, PlaceholderContext};
use mcb_world::{ContentType, Materials, Position, Tag};

/// One position to write
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub position: Position,
    pub data: u8,
    pub value: Option<Tag>,
}

/// Structure ready for the executor
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStructure {
    pub index: usize,
    pub content: ContentType,
    pub placements: Vec<Placement>,
}

/// Content type named by `selector`; explicit ids are taken as-is
#[must_use]
pub fn resolve_content(selector: &ContentSelector, materials: &Materials) -> Option<ContentType> {
    match selector {
        ContentSelector::ExplicitId(id) => Some(materials.with_id(*id)),
        ContentSelector::NamePattern(pattern) => materials.first_matching(pattern),
    }
}

/// Resolve `entry` against the scanned groups
///
/// Templates are resolved once per group member, each against that member's
/// own position, facing and data, so every placement carries its own
/// coordinates. The group caption is shared.
///
/// Returns `None`, with the reason in `diag`, when the content type or any
/// placement cannot be resolved.
pub fn resolve(
    entry: &StructureEntry,
    registry: &DescriptorRegistry,
    materials: &Materials,
    diag: &mut Diagnostics,
) -> Option<ResolvedStructure> {
    let location = Location::Structure(entry.index);
    let Some(content) = resolve_content(&entry.selector, materials) else {
        diag.error(location, format!("no content type matches {}", entry.selector));
        return None;
    };

    let groups: Vec<&DescriptorGroup> = match entry.group {
        GroupRef::Id(id) => match registry.get(id) {
            Some(group) => vec![group],
            None => {
                diag.error(location, format!("group {id} was not discovered"));
                return None;
            }
        },
        GroupRef::All => registry.groups().collect(),
    };

    let mut placements = Vec::new();
    for group in groups {
        if group.members().is_empty() {
            diag.warn(Location::Group(group.id()), "group has no positions to build at");
        }
        for descriptor in group.members() {
            match placement(entry, descriptor, group.caption()) {
                Ok(p) => placements.push(p),
                Err(e) => {
                    diag.error(
                        location,
                        format!("aborting structure at {}: {e}", descriptor.position),
                    );
                    return None;
                }
            }
        }
    }

    tracing::debug!(
        "Resolved structure {} to {} at {} positions",
        entry.index,
        content,
        placements.len()
    );
    Some(ResolvedStructure {
        index: entry.index,
        content,
        placements,
    })
}

fn placement(
    entry: &StructureEntry,
    descriptor: &Descriptor,
    caption: Option<&str>,
) -> Result<Placement, TemplateError> {
    let context = PlaceholderContext::for_descriptor(descriptor, caption);
    let data = match &entry.data {
        Some(text) => data_byte(&template::substitute(text, &context)?)?,
        None => descriptor.data,
    };
    let value = entry
        .value
        .as_ref()
        .map(|node| template::resolve(node, &context))
        .transpose()?;
    Ok(Placement {
        position: descriptor.position,
        data,
        value,
    })
}

fn data_byte(text: &str) -> Result<u8, TemplateError> {
    match template::scalar(ScalarKind::Byte, text)? {
        Tag::Byte(v) => Ok(v.to_ne_bytes()[0]),
        _ => Err(TemplateError::InvalidScalar {
            kind: "Byte",
            text: text.to_string(),
        }),
    }
}
