//! Tile occupancy grids and the floor/wall/door instances derived from them.
//!
//! A grid is always 16x16. Cells start out as impassable wall; rooms and
//! zones carve their interior out of that. Instances are placed on a 16 unit
//! pitch with tile `(x, y)` centred at world `(16x, _, 16y)`.

use std::{collections::HashMap, sync::Arc};

use cgmath::Deg;

use crate::{
    data_structures::{instance::Instance, model::Model},
    error::GridError,
};

pub const GRID_SIZE: usize = 16;
pub const TILE_SIZE: f32 = 16.0;

pub const FLOOR_MODEL: &str = "floor";
pub const BLOCK_MODEL: &str = "block";
pub const DOOR_MODEL: &str = "door";

const FLOOR_LEVEL: f32 = -9.0;
/// Walls are two blocks high.
const WALL_LEVELS: [f32; 2] = [0.0, TILE_SIZE];
/// Offset of a wall from the centre of the tile it belongs to.
const WALL_OFFSET: f32 = 6.0;

/// Loaded models by name.
pub type ModelSet = HashMap<String, Arc<Model>>;

/// Name of a zone, used by exits to refer to their target.
pub type ZoneId = String;

/// A door leading to a tile of another zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exit {
    pub target_zone: ZoneId,
    pub target_x: usize,
    pub target_y: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub x: usize,
    pub y: usize,
    pub wall: bool,
    pub impassable: bool,
    pub exit: Option<Exit>,
}

impl Tile {
    pub fn new(x: usize, y: usize) -> Self {
        Self {
            x,
            y,
            wall: true,
            impassable: true,
            exit: None,
        }
    }

    pub fn floor(&mut self) {
        self.wall = false;
        self.impassable = false;
    }

    pub fn is_exit(&self) -> bool {
        self.exit.is_some()
    }

    /// Turns the tile into a door. Exits are never walls.
    pub fn set_exit(&mut self, exit: Exit) {
        self.exit = Some(exit);
        self.wall = false;
    }
}

/// Whatever owns a tile map and can be turned into scene instances.
pub trait TileGrid {
    fn tile_map(&self) -> &TileMap;

    fn build_instances(&self, models: &ModelSet) -> Result<Vec<Instance>, GridError> {
        self.tile_map().build_instances(models)
    }
}

/// The fully allocated 16x16 grid, indexed `[x][y]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    tiles: [[Tile; GRID_SIZE]; GRID_SIZE],
}

impl Default for TileMap {
    fn default() -> Self {
        Self::new()
    }
}

impl TileMap {
    pub fn new() -> Self {
        Self {
            tiles: std::array::from_fn(|x| std::array::from_fn(|y| Tile::new(x, y))),
        }
    }

    pub fn tile(&self, x: usize, y: usize) -> Option<&Tile> {
        self.tiles.get(x)?.get(y)
    }

    pub fn tile_mut(&mut self, x: usize, y: usize) -> Option<&mut Tile> {
        self.tiles.get_mut(x)?.get_mut(y)
    }

    /// All tiles, column by column.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().flatten()
    }

    /// Marks every tile in `x_range` × `y_range` as floor.
    pub(crate) fn carve(&mut self, x_range: std::ops::Range<usize>, y_range: std::ops::Range<usize>) {
        for x in x_range {
            for y in y_range.clone() {
                self.tiles[x][y].floor();
            }
        }
    }

    fn is_wall(&self, x: usize, y: usize) -> bool {
        self.tiles[x][y].wall
    }

    /**
     * Derive the render instances for this grid.
     *
     * Every non-wall tile gets a floor. Exits get a door with a lintel block
     * above it and no other walls. Any other open tile gets a two block high
     * wall on its west edge and on its south edge whenever the neighbour on
     * that side is a wall or the edge is the grid border. Each exposed west
     * or south edge therefore carries exactly one wall and shared open edges
     * carry none. East and north edges are never walled, which keeps the
     * room open towards the isometric camera.
     */
    pub fn build_instances(&self, models: &ModelSet) -> Result<Vec<Instance>, GridError> {
        let model = |name: &str| {
            models
                .get(name)
                .cloned()
                .ok_or_else(|| GridError::MissingModel(name.to_string()))
        };
        let mut instances = Vec::new();

        for tile in self.iter().filter(|t| !t.wall) {
            let mut floor = Instance::new(model(FLOOR_MODEL)?, world(tile, FLOOR_LEVEL));
            floor.rotate_x(Deg(90.0));
            instances.push(floor);
        }

        for tile in self.iter() {
            let (x, y) = (tile.x, tile.y);
            let (wx, wz) = (x as f32 * TILE_SIZE, y as f32 * TILE_SIZE);

            if tile.is_exit() {
                let mut door = Instance::new(model(DOOR_MODEL)?, [wx + 8.0, 0.0, wz].into());
                door.rotate_y(Deg(90.0));
                let mut lintel = Instance::new(
                    model(BLOCK_MODEL)?,
                    [wx + WALL_OFFSET, WALL_LEVELS[1], wz].into(),
                )
                .with_scale([1.0, 1.0, 0.5].into());
                lintel.rotate_y(Deg(90.0));
                instances.push(door);
                instances.push(lintel);
                continue;
            }
            if tile.wall {
                continue;
            }

            if x == 0 || self.is_wall(x - 1, y) {
                for level in WALL_LEVELS {
                    let mut wall = Instance::new(
                        model(BLOCK_MODEL)?,
                        [wx - TILE_SIZE + WALL_OFFSET, level, wz].into(),
                    )
                    .with_scale([1.0, 1.0, 0.5].into());
                    wall.rotate_y(Deg(90.0));
                    instances.push(wall);
                }
            }

            if y == 0 || self.is_wall(x, y - 1) {
                for level in WALL_LEVELS {
                    // Slightly narrower so the corners of crossing walls don't z-fight
                    let wall = Instance::new(
                        model(BLOCK_MODEL)?,
                        [wx, level, wz - TILE_SIZE + WALL_OFFSET].into(),
                    )
                    .with_scale([0.9999, 1.0, 0.5].into());
                    instances.push(wall);
                }
            }
        }

        Ok(instances)
    }
}

fn world(tile: &Tile, height: f32) -> cgmath::Vector3<f32> {
    cgmath::Vector3::new(tile.x as f32 * TILE_SIZE, height, tile.y as f32 * TILE_SIZE)
}
