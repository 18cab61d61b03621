//! Build executor
//!
//! Writes a [`ResolvedStructure`] into a world. Each placement runs
//! clear → write → attach in order. A failed attach leaves the written block
//! in place; a failed clear or write skips the position.

use crate::diagnostics::{Diagnostics, Location};
use crate::structure::{Placement, ResolvedStructure};
use mcb_world::{BoundingBox, ContentType, WorldResult, WorldStore};

/// Outcome of applying one structure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    pub placements_written: usize,
    pub placements_failed: usize,
    pub metadata_failures: usize,
}

impl ApplyStats {
    pub fn absorb(&mut self, other: Self) {
        self.placements_written += other.placements_written;
        self.placements_failed += other.placements_failed;
        self.metadata_failures += other.metadata_failures;
    }
}

/// Apply `resolved` to `world`
pub fn apply<W: WorldStore + ?Sized>(
    resolved: &ResolvedStructure,
    world: &mut W,
    diag: &mut Diagnostics,
) -> ApplyStats {
    let mut stats = ApplyStats::default();
    for placement in &resolved.placements {
        let location = Location::Position(placement.position);
        if let Err(e) = write_block(world, &resolved.content, placement) {
            diag.error(location, format!("cannot place {}: {e}", resolved.content));
            stats.placements_failed += 1;
            continue;
        }
        stats.placements_written += 1;

        if let Some(value) = &placement.value {
            if let Err(e) = world.attach_metadata(placement.position, value.clone()) {
                diag.warn(location, format!("block written without metadata: {e}"));
                stats.metadata_failures += 1;
            }
        }
    }

    tracing::info!(
        "Structure {} ({}): {} placed, {} failed",
        resolved.index,
        resolved.content,
        stats.placements_written,
        stats.placements_failed
    );
    stats
}

fn write_block<W: WorldStore + ?Sized>(
    world: &mut W,
    content: &ContentType,
    placement: &Placement,
) -> WorldResult<()> {
    let unit = BoundingBox::unit(placement.position);
    let removed = world.remove_tile_entities(unit)?;
    if removed > 0 {
        tracing::debug!("Cleared {} tile entities @ {}", removed, placement.position);
    }
    world.fill_blocks(unit, content, placement.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcb_world::{BlockState, MemoryWorld, Position, Tag, TileEntity};

    fn world_with_marker(pos: Position) -> MemoryWorld {
        let mut world = MemoryWorld::new("Test");
        world.set_block(pos, BlockState::new(63, 0));
        world
            .add_tile_entity(TileEntity::marker("Sign", pos, ["5# Gate"]))
            .unwrap();
        world
    }

    fn structure(content: u16, placements: Vec<Placement>) -> ResolvedStructure {
        ResolvedStructure {
            index: 0,
            content: ContentType::from_id(content),
            placements,
        }
    }

    #[test]
    fn replaces_marker_with_block() {
        let pos = Position::new(0, 64, 0);
        let mut world = world_with_marker(pos);
        let mut diag = Diagnostics::new();

        let stats = apply(
            &structure(7, vec![Placement { position: pos, data: 0, value: None }]),
            &mut world,
            &mut diag,
        );

        assert_eq!(stats.placements_written, 1);
        assert_eq!(world.block_at(pos).unwrap(), BlockState::new(7, 0));
        assert!(world.tile_entity_at(pos).is_none());
    }

    #[test]
    fn same_type_still_clears_old_metadata() {
        let pos = Position::new(3, 70, 3);
        let mut world = world_with_marker(pos);
        let mut diag = Diagnostics::new();

        apply(
            &structure(63, vec![Placement { position: pos, data: 4, value: None }]),
            &mut world,
            &mut diag,
        );
        assert!(world.tile_entity_at(pos).is_none());
        assert_eq!(world.block_at(pos).unwrap(), BlockState::new(63, 4));
    }

    #[test]
    fn attaches_value_tree() {
        let pos = Position::new(1, 64, 1);
        let mut world = world_with_marker(pos);
        let mut diag = Diagnostics::new();
        let value = Tag::compound().with("id", Tag::String("Chest".into()));

        apply(
            &structure(54, vec![Placement { position: pos, data: 2, value: Some(value) }]),
            &mut world,
            &mut diag,
        );
        let tile = world.tile_entity_at(pos).unwrap();
        assert_eq!(tile.id(), Some("Chest"));
        assert_eq!(tile.position(), Some(pos));
    }

    #[test]
    fn metadata_failure_keeps_block() {
        let pos = Position::new(2, 64, 2);
        let mut world = world_with_marker(pos);
        let mut diag = Diagnostics::new();

        let stats = apply(
            &structure(54, vec![Placement { position: pos, data: 0, value: Some(Tag::Int(1)) }]),
            &mut world,
            &mut diag,
        );
        assert_eq!(stats.metadata_failures, 1);
        assert_eq!(world.block_at(pos).unwrap().id, 54);
        assert_eq!(diag.entries().len(), 1);
    }

    #[test]
    fn unloaded_region_skips_position() {
        let inside = Position::new(0, 64, 0);
        let outside = Position::new(500, 64, 500);
        let mut world = world_with_marker(inside);
        let mut diag = Diagnostics::new();

        let stats = apply(
            &structure(
                1,
                vec![
                    Placement { position: outside, data: 0, value: None },
                    Placement { position: inside, data: 0, value: None },
                ],
            ),
            &mut world,
            &mut diag,
        );
        assert_eq!(stats.placements_failed, 1);
        assert_eq!(stats.placements_written, 1);
        assert_eq!(world.block_at(inside).unwrap().id, 1);
    }
}
