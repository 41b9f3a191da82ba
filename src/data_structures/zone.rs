//! Zones: the playable areas the player moves between through exits.

use std::collections::HashMap;

use crate::{
    context::{Config, ExitBounds},
    data_structures::tile::{Exit, GRID_SIZE, Tile, TileGrid, TileMap, ZoneId},
    error::GridError,
};

/// A zone with a `width` × `height` interior starting at tile (1, 1), so the
/// interior is always enclosed by at least one ring of wall. Exits are
/// checked against the grid according to the [`Config::exit_bounds`] the
/// zone was created with.
#[derive(Clone, Debug)]
pub struct Zone {
    id: ZoneId,
    width: usize,
    height: usize,
    tiles: TileMap,
    exit_bounds: ExitBounds,
}

impl Zone {
    pub fn new(
        id: impl Into<ZoneId>,
        width: usize,
        height: usize,
        config: &Config,
    ) -> Result<Self, GridError> {
        if width >= GRID_SIZE || height >= GRID_SIZE {
            return Err(GridError::InteriorTooLarge {
                width,
                height,
                limit: GRID_SIZE - 1,
            });
        }
        let mut tiles = TileMap::new();
        tiles.carve(1..width + 1, 1..height + 1);
        Ok(Self {
            id: id.into(),
            width,
            height,
            tiles,
            exit_bounds: config.exit_bounds,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn exit_bounds(&self) -> ExitBounds {
        self.exit_bounds
    }

    pub fn tile(&self, x: usize, y: usize) -> Option<&Tile> {
        self.tiles.tile(x, y)
    }

    /// Turn tile (`x`, `y`) into a door leading to (`target_x`, `target_y`)
    /// in `target_zone`.
    ///
    /// Under [`ExitBounds::Strict`] a target outside the grid is rejected here;
    /// under [`ExitBounds::Deferred`] it is accepted and fails on
    /// [`Exit::resolve`].
    pub fn set_exit(
        &mut self,
        x: usize,
        y: usize,
        target_zone: impl Into<ZoneId>,
        target_x: usize,
        target_y: usize,
    ) -> Result<(), GridError> {
        let target_zone = target_zone.into();
        if self.exit_bounds == ExitBounds::Strict && !in_bounds(target_x, target_y) {
            return Err(GridError::ExitOutOfBounds {
                zone: target_zone,
                x: target_x,
                y: target_y,
            });
        }
        let tile = self
            .tiles
            .tile_mut(x, y)
            .ok_or(GridError::TileOutOfBounds { x, y })?;
        tile.set_exit(Exit {
            target_zone,
            target_x,
            target_y,
        });
        log::debug!("Zone {}: exit at ({}, {})", self.id, x, y);
        Ok(())
    }
}

impl TileGrid for Zone {
    fn tile_map(&self) -> &TileMap {
        &self.tiles
    }
}

fn in_bounds(x: usize, y: usize) -> bool {
    x < GRID_SIZE && y < GRID_SIZE
}

impl Exit {
    /// The tile this exit leads to.
    pub fn resolve<'a>(&self, zones: &'a HashMap<ZoneId, Zone>) -> Result<&'a Tile, GridError> {
        let zone = zones
            .get(&self.target_zone)
            .ok_or_else(|| GridError::UnknownZone(self.target_zone.clone()))?;
        zone.tile(self.target_x, self.target_y)
            .ok_or_else(|| GridError::ExitOutOfBounds {
                zone: self.target_zone.clone(),
                x: self.target_x,
                y: self.target_y,
            })
    }
}
