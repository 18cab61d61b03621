//! Testing utilities for the mcbuilder workspace
//!
//! World fixtures with markers and canned build documents.

#![allow(missing_docs)]

use mcb_world::{BlockState, MemoryWorld, Position, RegionPos, TileEntity};

/// Standing marker content type
pub const STANDING: u16 = 63;
/// Wall marker content type
pub const WALL: u16 = 68;

/// One marker to place: position, content type, data byte, text lines
#[derive(Debug, Clone)]
pub struct MarkerSpec {
    pub position: Position,
    pub content_type: u16,
    pub data: u8,
    pub lines: Vec<String>,
}

impl MarkerSpec {
    /// Wall marker with a single text line
    pub fn wall(position: Position, facing: u8, text: &str) -> Self {
        Self {
            position,
            content_type: WALL,
            data: facing,
            lines: vec![text.to_string()],
        }
    }

    /// Standing marker with a single text line
    pub fn standing(position: Position, rotation: u8, text: &str) -> Self {
        Self {
            position,
            content_type: STANDING,
            data: rotation,
            lines: vec![text.to_string()],
        }
    }

    /// Replace the text with several lines
    #[must_use]
    pub fn with_lines(mut self, lines: &[&str]) -> Self {
        self.lines = lines.iter().map(|l| (*l).to_string()).collect();
        self
    }
}

/// Place a marker block and its tile entity
pub fn place_marker(world: &mut MemoryWorld, marker: &MarkerSpec) {
    world.set_block(marker.position, BlockState::new(marker.content_type, marker.data));
    world
        .add_tile_entity(TileEntity::marker(
            "Sign",
            marker.position,
            marker.lines.iter().map(String::as_str),
        ))
        .unwrap();
}

/// World named `name` holding `markers`
pub fn world_with_markers(name: &str, markers: &[MarkerSpec]) -> MemoryWorld {
    let mut world = MemoryWorld::new(name);
    for marker in markers {
        place_marker(&mut world, marker);
    }
    world
}

/// Single wall marker `5# Gate` at (0, 64, 0), facing north
pub fn gate_world() -> MemoryWorld {
    world_with_markers("Gate", &[MarkerSpec::wall(Position::new(0, 64, 0), 2, "5# Gate")])
}

/// Village: two groups across two regions, one decorative marker and one corrupt region
pub fn village_world() -> MemoryWorld {
    let mut world = world_with_markers(
        "Village",
        &[
            MarkerSpec::wall(Position::new(1, 64, 1), 5, "1# Well"),
            MarkerSpec::standing(Position::new(20, 65, 3), 0, "2#").with_lines(&["2#", "", "Storage", ""]),
            MarkerSpec::standing(Position::new(-5, 66, 7), 9, "2# Storage"),
            MarkerSpec::standing(Position::new(4, 64, 4), 0, "Welcome to the village"),
        ],
    );
    world.mark_malformed(RegionPos::new(9, 9), "truncated chunk");
    world
}

/// Document with one structure for group 5 and no `signs` section
pub const GATE_DOCUMENT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<mcbuilder>
    <blocks>
        <block sign="5" blockId="7"/>
    </blocks>
</mcbuilder>
"#;

/// Document for [`village_world`] with a value tree, an unknown section and a comment
pub const VILLAGE_DOCUMENT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<mcbuilder>
    <!-- hand-authored -->
    <signs>
        <sign id="1" name="Well"/>
        <sign id="2" name="Storage"/>
    </signs>
    <blocks>
        <block sign="1" blockName="cobble"/>
        <block sign="2" blockName="chest" data="%(facing)s">
            <Compound>
                <String name="id">Chest</String>
                <Int name="x">%(x)s</Int>
                <Int name="y">%(y)s</Int>
                <Int name="z">%(z)s</Int>
                <List name="Items">
                    <Compound>
                        <Byte name="Slot">0</Byte>
                        <Short name="id">264</Short>
                        <Byte name="Count">%(id)s</Byte>
                    </Compound>
                </List>
            </Compound>
        </block>
    </blocks>
    <notes author="builder">keep the well clear</notes>
</mcbuilder>
"#;
