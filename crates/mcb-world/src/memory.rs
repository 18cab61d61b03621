//! In-memory world store

use crate::error::{WorldError, WorldResult};
use crate::material::{ContentType, Materials};
use crate::position::{BoundingBox, Position, RegionPos};
use crate::store::{BlockState, TileEntity, WorldStore};
use crate::tag::Tag;
use std::collections::BTreeMap;

/// One region column: blocks, tile entities and derived light data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    pub blocks: BTreeMap<Position, BlockState>,
    pub tile_entities: Vec<TileEntity>,
    /// Highest non-air block per (x, z) column, rebuilt by relighting
    pub height_map: BTreeMap<(i32, i32), i32>,
    /// Integrity failure reason; a malformed region refuses reads and writes
    pub malformed: Option<String>,
}

impl Region {
    fn check(&self, pos: RegionPos) -> WorldResult<()> {
        match &self.malformed {
            Some(reason) => Err(WorldError::malformed(pos, reason.clone())),
            None => Ok(()),
        }
    }

    fn relight(&mut self) {
        self.height_map.clear();
        for (pos, state) in &self.blocks {
            if state.is_air() {
                continue;
            }
            let top = self.height_map.entry((pos.x, pos.z)).or_insert(pos.y);
            *top = (*top).max(pos.y);
        }
    }
}

/// World held entirely in memory
#[derive(Debug, Clone)]
pub struct MemoryWorld {
    display_name: String,
    materials: Materials,
    regions: BTreeMap<RegionPos, Region>,
    relight_passes: usize,
    saves: usize,
}

impl MemoryWorld {
    /// Create empty world with the classic palette
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            materials: Materials::classic(),
            regions: BTreeMap::new(),
            relight_passes: 0,
            saves: 0,
        }
    }

    /// With a custom palette
    #[inline]
    #[must_use]
    pub fn with_materials(mut self, materials: Materials) -> Self {
        self.materials = materials;
        self
    }

    /// Set a block, creating its region on demand
    pub fn set_block(&mut self, pos: Position, state: BlockState) {
        self.regions
            .entry(pos.region())
            .or_default()
            .blocks
            .insert(pos, state);
    }

    /// Add a tile entity, creating its region on demand
    pub fn add_tile_entity(&mut self, tile: TileEntity) -> WorldResult<()> {
        let pos = tile.position().ok_or(WorldError::UnplacedTileEntity)?;
        let region = self.regions.entry(pos.region()).or_default();
        region.tile_entities.retain(|t| t.position() != Some(pos));
        region.tile_entities.push(tile);
        Ok(())
    }

    /// Tile entity at a position, if any
    #[must_use]
    pub fn tile_entity_at(&self, pos: Position) -> Option<&TileEntity> {
        self.regions
            .get(&pos.region())?
            .tile_entities
            .iter()
            .find(|t| t.position() == Some(pos))
    }

    /// Flag a region as failing its integrity check
    pub fn mark_malformed(&mut self, region: RegionPos, reason: impl Into<String>) {
        self.regions.entry(region).or_default().malformed = Some(reason.into());
    }

    pub fn insert_region(&mut self, pos: RegionPos, region: Region) {
        self.regions.insert(pos, region);
    }

    #[must_use]
    pub fn region(&self, pos: RegionPos) -> Option<&Region> {
        self.regions.get(&pos)
    }

    pub fn regions_iter(&self) -> impl Iterator<Item = (&RegionPos, &Region)> {
        self.regions.iter()
    }

    /// Highest non-air block of a column, as of the last relight
    #[must_use]
    pub fn height_at(&self, x: i32, z: i32) -> Option<i32> {
        self.regions
            .get(&Position::new(x, 0, z).region())?
            .height_map
            .get(&(x, z))
            .copied()
    }

    #[inline]
    #[must_use]
    pub fn relight_passes(&self) -> usize {
        self.relight_passes
    }

    #[inline]
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves
    }

    fn region_mut(&mut self, pos: RegionPos) -> WorldResult<&mut Region> {
        let region = self
            .regions
            .get_mut(&pos)
            .ok_or(WorldError::RegionNotLoaded(pos))?;
        region.check(pos)?;
        Ok(region)
    }

    fn region_ref(&self, pos: RegionPos) -> WorldResult<&Region> {
        let region = self
            .regions
            .get(&pos)
            .ok_or(WorldError::RegionNotLoaded(pos))?;
        region.check(pos)?;
        Ok(region)
    }
}

impl WorldStore for MemoryWorld {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn set_display_name(&mut self, name: String) {
        self.display_name = name;
    }

    fn materials(&self) -> &Materials {
        &self.materials
    }

    fn regions(&self) -> Vec<RegionPos> {
        self.regions.keys().copied().collect()
    }

    fn tile_entities(&self, region: RegionPos) -> WorldResult<Vec<TileEntity>> {
        Ok(self.region_ref(region)?.tile_entities.clone())
    }

    fn block_at(&self, position: Position) -> WorldResult<BlockState> {
        Ok(self
            .region_ref(position.region())?
            .blocks
            .get(&position)
            .copied()
            .unwrap_or_default())
    }

    fn remove_tile_entities(&mut self, bbox: BoundingBox) -> WorldResult<usize> {
        let mut removed = 0;
        let regions: std::collections::BTreeSet<_> = bbox.positions().map(Position::region).collect();
        for pos in regions {
            let region = self.region_mut(pos)?;
            let before = region.tile_entities.len();
            region
                .tile_entities
                .retain(|t| !t.position().is_some_and(|p| bbox.contains(p)));
            removed += before - region.tile_entities.len();
        }
        Ok(removed)
    }

    fn fill_blocks(&mut self, bbox: BoundingBox, content: &ContentType, data: u8) -> WorldResult<()> {
        let state = BlockState::new(content.id, data);
        for pos in bbox.positions() {
            self.region_mut(pos.region())?.blocks.insert(pos, state);
        }
        Ok(())
    }

    fn attach_metadata(&mut self, position: Position, value: Tag) -> WorldResult<()> {
        let tile = TileEntity::at(position, value)?;
        let region = self.region_mut(position.region())?;
        region.tile_entities.retain(|t| t.position() != Some(position));
        region.tile_entities.push(tile);
        Ok(())
    }

    fn relight(&mut self) -> WorldResult<()> {
        for region in self.regions.values_mut().filter(|r| r.malformed.is_none()) {
            region.relight();
        }
        self.relight_passes += 1;
        tracing::debug!("Relit {} regions", self.regions.len());
        Ok(())
    }

    fn save(&mut self) -> WorldResult<()> {
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_with_marker(pos: Position) -> MemoryWorld {
        let mut world = MemoryWorld::new("Test");
        world.set_block(pos, BlockState::new(68, 2));
        world
            .add_tile_entity(TileEntity::marker("Sign", pos, ["1# a"]))
            .unwrap();
        world
    }

    #[test]
    fn malformed_region_refuses_reads() {
        let mut world = world_with_marker(Position::new(0, 64, 0));
        world.mark_malformed(RegionPos::new(0, 0), "checksum");
        assert!(matches!(
            world.tile_entities(RegionPos::new(0, 0)),
            Err(WorldError::RegionMalformed { .. })
        ));
        assert_eq!(world.regions(), vec![RegionPos::new(0, 0)]);
    }

    #[test]
    fn writes_outside_loaded_regions_fail() {
        let mut world = MemoryWorld::new("Test");
        let far = BoundingBox::unit(Position::new(1000, 64, 1000));
        assert!(matches!(
            world.fill_blocks(far, &ContentType::from_id(1), 0),
            Err(WorldError::RegionNotLoaded(_))
        ));
    }

    #[test]
    fn remove_only_touches_the_box() {
        let a = Position::new(0, 64, 0);
        let b = Position::new(1, 64, 0);
        let mut world = world_with_marker(a);
        world
            .add_tile_entity(TileEntity::marker("Sign", b, ["2# b"]))
            .unwrap();

        assert_eq!(world.remove_tile_entities(BoundingBox::unit(a)).unwrap(), 1);
        assert!(world.tile_entity_at(a).is_none());
        assert!(world.tile_entity_at(b).is_some());
    }

    #[test]
    fn attach_replaces_existing_metadata() {
        let pos = Position::new(2, 64, 2);
        let mut world = world_with_marker(pos);
        let chest = Tag::compound().with("id", Tag::String("Chest".into()));
        world.attach_metadata(pos, chest).unwrap();

        let region = world.region(pos.region()).unwrap();
        assert_eq!(region.tile_entities.len(), 1);
        assert_eq!(world.tile_entity_at(pos).unwrap().id(), Some("Chest"));
    }

    #[test]
    fn tile_entity_without_coordinates_is_refused() {
        let mut world = MemoryWorld::new("Test");
        let unplaced = Tag::compound().with("id", Tag::String("Sign".into()));
        let tile: TileEntity = serde_json::from_value(serde_json::to_value(unplaced).unwrap()).unwrap();
        assert!(matches!(
            world.add_tile_entity(tile),
            Err(WorldError::UnplacedTileEntity)
        ));
        assert!(world.regions().is_empty());
    }

    #[test]
    fn non_finite_metadata_is_refused() {
        let pos = Position::new(2, 64, 2);
        let mut world = world_with_marker(pos);
        let bad = Tag::compound().with("f", Tag::Float(f32::NAN));
        assert!(matches!(
            world.attach_metadata(pos, bad),
            Err(WorldError::InvalidMetadata { .. })
        ));
        assert_eq!(world.tile_entity_at(pos).unwrap().id(), Some("Sign"));
    }

    #[test]
    fn relight_tracks_column_heights() {
        let mut world = MemoryWorld::new("Test");
        world.set_block(Position::new(3, 10, 3), BlockState::new(1, 0));
        world.set_block(Position::new(3, 40, 3), BlockState::new(20, 0));
        world.set_block(Position::new(3, 50, 3), BlockState::AIR);
        world.relight().unwrap();

        assert_eq!(world.height_at(3, 3), Some(40));
        assert_eq!(world.height_at(4, 3), None);
        assert_eq!(world.relight_passes(), 1);
    }
}
