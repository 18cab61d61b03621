//! Marker discovery
//!
//! Walks every region of a world, turns marker tiles into descriptors and
//! groups them. Corrupt regions and non-annotated markers are reported and
//! skipped; nothing here aborts a run.

use crate::config::BuilderConfig;
use crate::descriptor::{self, Descriptor, Marker};
use crate::diagnostics::{Diagnostics, Location};
use crate::orientation;
use crate::registry::DescriptorRegistry;
use mcb_world::{TileEntity, WorldStore};

/// Counters of one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub regions_scanned: usize,
    pub regions_skipped: usize,
    pub markers_seen: usize,
    pub markers_ignored: usize,
}

/// Scan result
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub registry: DescriptorRegistry,
    pub stats: ScanStats,
}

/// Scan `world` for annotated markers
pub fn scan<W: WorldStore + ?Sized>(
    world: &W,
    config: &BuilderConfig,
    diag: &mut Diagnostics,
) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    let regions = world.regions();
    tracing::info!("Scanning {} regions for markers", regions.len());

    for (i, region) in regions.into_iter().enumerate() {
        let tiles = match world.tile_entities(region) {
            Ok(tiles) => tiles,
            Err(e) => {
                diag.warn(Location::Region(region), format!("skipping region: {e}"));
                outcome.stats.regions_skipped += 1;
                continue;
            }
        };
        outcome.stats.regions_scanned += 1;

        for tile in tiles
            .iter()
            .filter(|t| t.id() == Some(config.marker_tile_id.as_str()))
        {
            outcome.stats.markers_seen += 1;
            match read_marker(world, tile, config, diag) {
                Some(d) => outcome.registry.insert(d),
                None => outcome.stats.markers_ignored += 1,
            }
        }

        if i % 100 == 0 {
            tracing::debug!("Read tiles from region {} ({})", i, region);
        }
    }

    tracing::info!(
        "Found {} descriptors in {} groups",
        outcome.registry.descriptor_count(),
        outcome.registry.len()
    );
    outcome
}

fn read_marker<W: WorldStore + ?Sized>(
    world: &W,
    tile: &TileEntity,
    config: &BuilderConfig,
    diag: &mut Diagnostics,
) -> Option<Descriptor> {
    let Some(position) = tile.position() else {
        diag.warn(Location::Run, "marker tile without coordinates");
        return None;
    };
    let block = match world.block_at(position) {
        Ok(block) => block,
        Err(e) => {
            diag.warn(Location::Position(position), format!("cannot read marker block: {e}"));
            return None;
        }
    };
    tracing::debug!("Marker found @ {} id={} data={}", position, block.id, block.data);

    let marker = Marker::from_tile(position, tile, block.id, block.data);
    let text = marker.text();
    let Some(annotation) = descriptor::parse(&text) else {
        diag.warn(
            Location::Position(position),
            format!("ignoring marker with content: {text}"),
        );
        return None;
    };

    match orientation::facing(config.marker_blocks, marker.content_type, marker.data) {
        Ok(facing) => Some(Descriptor::new(annotation, position, facing, marker.data)),
        Err(e) => {
            diag.warn(
                Location::Position(position),
                format!("ignoring marker '{text}': {e}"),
            );
            None
        }
    }
}
