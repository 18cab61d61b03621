//! Directory-backed world store
//!
//! A world directory holds a single `world.json`. Regions are decoded one by
//! one; a region that fails to decode or whose contents lie outside its own
//! column is kept as raw JSON, reported as malformed on read and written back
//! untouched on save.

use crate::error::{WorldError, WorldResult};
use crate::material::{ContentType, Material, Materials};
use crate::memory::{MemoryWorld, Region};
use crate::position::{BoundingBox, Position, RegionPos};
use crate::store::{BlockState, TileEntity, WorldStore};
use crate::tag::Tag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the world file inside a world directory
pub const WORLD_FILE_NAME: &str = "world.json";

#[derive(Debug, Serialize, Deserialize)]
struct WorldFile {
    display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    materials: Option<Vec<Material>>,
    #[serde(default)]
    regions: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RegionFile {
    x: i32,
    z: i32,
    #[serde(default)]
    blocks: Vec<BlockEntry>,
    #[serde(default)]
    tile_entities: Vec<TileEntity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    height_map: Vec<HeightEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BlockEntry {
    x: i32,
    y: i32,
    z: i32,
    id: u16,
    #[serde(default)]
    data: u8,
}

#[derive(Debug, Serialize, Deserialize)]
struct HeightEntry {
    x: i32,
    z: i32,
    y: i32,
}

impl RegionFile {
    fn into_region(self) -> Result<(RegionPos, Region), String> {
        let pos = RegionPos::new(self.x, self.z);
        let mut region = Region::default();
        for b in self.blocks {
            let p = Position::new(b.x, b.y, b.z);
            if p.region() != pos {
                return Err(format!("block at {p} lies outside the region"));
            }
            region.blocks.insert(p, BlockState::new(b.id, b.data));
        }
        for tile in self.tile_entities {
            match tile.position() {
                Some(p) if p.region() == pos => region.tile_entities.push(tile),
                Some(p) => return Err(format!("tile entity at {p} lies outside the region")),
                None => return Err("tile entity without coordinates".to_string()),
            }
        }
        region.height_map = self
            .height_map
            .into_iter()
            .map(|h| ((h.x, h.z), h.y))
            .collect();
        Ok((pos, region))
    }

    fn from_region(pos: RegionPos, region: &Region) -> Self {
        Self {
            x: pos.x,
            z: pos.z,
            blocks: region
                .blocks
                .iter()
                .map(|(p, s)| BlockEntry {
                    x: p.x,
                    y: p.y,
                    z: p.z,
                    id: s.id,
                    data: s.data,
                })
                .collect(),
            tile_entities: region.tile_entities.clone(),
            height_map: region
                .height_map
                .iter()
                .map(|(&(x, z), &y)| HeightEntry { x, z, y })
                .collect(),
        }
    }
}

/// World persisted as `world.json` inside a directory
#[derive(Debug)]
pub struct FileWorld {
    path: PathBuf,
    world: MemoryWorld,
    custom_materials: bool,
    /// Raw JSON of regions that failed to decode, by address
    malformed: BTreeMap<RegionPos, serde_json::Value>,
    /// Raw JSON of regions without a readable address
    unaddressable: Vec<serde_json::Value>,
}

impl FileWorld {
    /// Open the world directory at `dir`
    pub fn open(dir: impl AsRef<Path>) -> WorldResult<Self> {
        let path = dir.as_ref().join(WORLD_FILE_NAME);
        if !path.is_file() {
            return Err(WorldError::NotFound(path));
        }
        let text = std::fs::read_to_string(&path).map_err(|e| WorldError::io_error(&path, e))?;
        let file: WorldFile = serde_json::from_str(&text).map_err(|source| WorldError::Format {
            path: path.clone(),
            source,
        })?;

        let custom_materials = file.materials.is_some();
        let materials = file.materials.map_or_else(Materials::classic, Materials::new);
        let mut world = MemoryWorld::new(file.display_name).with_materials(materials);
        let mut malformed = BTreeMap::new();
        let mut unaddressable = Vec::new();

        for raw in file.regions {
            let decoded = serde_json::from_value::<RegionFile>(raw.clone())
                .map_err(|e| e.to_string())
                .and_then(RegionFile::into_region);
            match decoded {
                Ok((pos, region)) => world.insert_region(pos, region),
                Err(reason) => match region_address(&raw) {
                    Some(pos) => {
                        tracing::warn!("Region {} is malformed: {}", pos, reason);
                        world.mark_malformed(pos, reason);
                        malformed.insert(pos, raw);
                    }
                    None => {
                        tracing::warn!("Dropping unaddressable region from scan: {}", reason);
                        unaddressable.push(raw);
                    }
                },
            }
        }

        tracing::info!("World loaded, title: {}", world.display_name());
        Ok(Self {
            path,
            world,
            custom_materials,
            malformed,
            unaddressable,
        })
    }

    /// Persist `world` as a new world directory at `dir`
    pub fn create(dir: impl AsRef<Path>, world: MemoryWorld) -> WorldResult<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| WorldError::io_error(dir, e))?;
        let mut created = Self {
            path: dir.join(WORLD_FILE_NAME),
            custom_materials: world.materials() != &Materials::classic(),
            world,
            malformed: BTreeMap::new(),
            unaddressable: Vec::new(),
        };
        created.save()?;
        Ok(created)
    }

    /// Path of the backing `world.json`
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The decoded world
    #[must_use]
    pub fn inner(&self) -> &MemoryWorld {
        &self.world
    }

    fn encode(&self) -> WorldResult<WorldFile> {
        let mut regions: Vec<serde_json::Value> = Vec::new();
        for (pos, region) in self.world.regions_iter() {
            let value = match self.malformed.get(pos) {
                Some(raw) => raw.clone(),
                None => serde_json::to_value(RegionFile::from_region(*pos, region)).map_err(|source| {
                    WorldError::Format {
                        path: self.path.clone(),
                        source,
                    }
                })?,
            };
            regions.push(value);
        }
        regions.extend(self.unaddressable.iter().cloned());
        Ok(WorldFile {
            display_name: self.world.display_name().to_string(),
            materials: self
                .custom_materials
                .then(|| self.world.materials().entries().to_vec()),
            regions,
        })
    }
}

fn region_address(raw: &serde_json::Value) -> Option<RegionPos> {
    let coord = |key| {
        raw.get(key)
            .and_then(serde_json::Value::as_i64)
            .and_then(|v| i32::try_from(v).ok())
    };
    Some(RegionPos::new(coord("x")?, coord("z")?))
}

impl WorldStore for FileWorld {
    fn display_name(&self) -> &str {
        self.world.display_name()
    }

    fn set_display_name(&mut self, name: String) {
        self.world.set_display_name(name);
    }

    fn materials(&self) -> &Materials {
        self.world.materials()
    }

    fn regions(&self) -> Vec<RegionPos> {
        self.world.regions()
    }

    fn tile_entities(&self, region: RegionPos) -> WorldResult<Vec<TileEntity>> {
        self.world.tile_entities(region)
    }

    fn block_at(&self, position: Position) -> WorldResult<BlockState> {
        self.world.block_at(position)
    }

    fn remove_tile_entities(&mut self, bbox: BoundingBox) -> WorldResult<usize> {
        self.world.remove_tile_entities(bbox)
    }

    fn fill_blocks(&mut self, bbox: BoundingBox, content: &ContentType, data: u8) -> WorldResult<()> {
        self.world.fill_blocks(bbox, content, data)
    }

    fn attach_metadata(&mut self, position: Position, value: Tag) -> WorldResult<()> {
        self.world.attach_metadata(position, value)
    }

    fn relight(&mut self) -> WorldResult<()> {
        self.world.relight()
    }

    fn save(&mut self) -> WorldResult<()> {
        let text = serde_json::to_string_pretty(&self.encode()?).map_err(|source| WorldError::Format {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, text).map_err(|e| WorldError::io_error(&self.path, e))?;
        self.world.save()?;
        tracing::info!("World saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WORLD: &str = r#"{
        "display_name": "Castle",
        "regions": [
            {
                "x": 0, "z": 0,
                "blocks": [{ "x": 1, "y": 64, "z": 2, "id": 63, "data": 9 }],
                "tile_entities": [{
                    "type": "Compound",
                    "value": {
                        "id": { "type": "String", "value": "Sign" },
                        "x": { "type": "Int", "value": 1 },
                        "y": { "type": "Int", "value": 64 },
                        "z": { "type": "Int", "value": 2 },
                        "Text1": { "type": "String", "value": "3# Hall" }
                    }
                }]
            },
            { "x": 1, "z": 0, "blocks": "corrupt" },
            { "blocks": [] }
        ]
    }"#;

    fn write_world(dir: &Path) {
        std::fs::write(dir.join(WORLD_FILE_NAME), WORLD).unwrap();
    }

    #[test]
    fn open_decodes_regions_and_flags_corrupt_ones() {
        let dir = tempfile::tempdir().unwrap();
        write_world(dir.path());
        let world = FileWorld::open(dir.path()).unwrap();

        assert_eq!(world.display_name(), "Castle");
        assert_eq!(world.regions(), vec![RegionPos::new(0, 0), RegionPos::new(1, 0)]);
        assert_eq!(world.tile_entities(RegionPos::new(0, 0)).unwrap().len(), 1);
        assert!(world.tile_entities(RegionPos::new(1, 0)).is_err());
        assert_eq!(world.block_at(Position::new(1, 64, 2)).unwrap(), BlockState::new(63, 9));
    }

    #[test]
    fn missing_world_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(FileWorld::open(dir.path()), Err(WorldError::NotFound(_))));
    }

    #[test]
    fn save_preserves_corrupt_regions_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        write_world(dir.path());
        let mut world = FileWorld::open(dir.path()).unwrap();

        let pos = Position::new(1, 64, 2);
        world.remove_tile_entities(BoundingBox::unit(pos)).unwrap();
        world.fill_blocks(BoundingBox::unit(pos), &ContentType::from_id(7), 0).unwrap();
        world.relight().unwrap();
        world.save().unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(world.path()).unwrap()).unwrap();
        let regions = saved["regions"].as_array().unwrap();
        assert_eq!(regions.len(), 3);
        assert_eq!(regions[1]["blocks"], "corrupt");
        assert!(saved.get("materials").is_none());

        let reopened = FileWorld::open(dir.path()).unwrap();
        assert_eq!(reopened.block_at(pos).unwrap(), BlockState::new(7, 0));
        assert!(reopened.tile_entities(RegionPos::new(0, 0)).unwrap().is_empty());
        assert_eq!(reopened.inner().height_at(1, 2), Some(64));
    }

    #[test]
    fn create_writes_a_reopenable_world() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("fresh");
        let mut memory = MemoryWorld::new("Fresh");
        let pos = Position::new(-1, 70, -1);
        memory.set_block(pos, BlockState::new(68, 5));
        memory
            .add_tile_entity(TileEntity::marker("Sign", pos, ["2# Tower"]))
            .unwrap();

        FileWorld::create(&target, memory).unwrap();
        let reopened = FileWorld::open(&target).unwrap();
        assert_eq!(reopened.display_name(), "Fresh");
        assert_eq!(reopened.regions(), vec![RegionPos::new(-1, -1)]);
        assert_eq!(reopened.block_at(pos).unwrap(), BlockState::new(68, 5));
        assert_eq!(reopened.inner().tile_entity_at(pos).unwrap().text_lines()[0], "2# Tower");
    }
}
