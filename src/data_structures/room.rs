use crate::{
    data_structures::tile::{GRID_SIZE, TileGrid, TileMap},
    error::GridError,
};

/// Extra floor cells that turn the rectangle into an L-shaped room with an
/// annex. This is a fixed layout, not a generator.
pub const EXTRA_FLOOR: [(usize, usize); 16] = [
    (4, 0),
    (3, 0),
    (2, 3),
    (2, 4),
    (0, 5),
    (1, 5),
    (2, 5),
    (3, 5),
    (0, 6),
    (1, 6),
    (2, 6),
    (3, 6),
    (0, 7),
    (1, 7),
    (2, 7),
    (3, 7),
];

/**
 * A simple room: a `width` × `height` block of floor anchored at tile (0, 0).
 * The grid border doubles as the outer wall.
 */
#[derive(Clone, Debug)]
pub struct Room {
    width: usize,
    height: usize,
    tiles: TileMap,
}

impl Room {
    /// The rectangle plus the fixed [`EXTRA_FLOOR`] cells.
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        let mut room = Self::rectangle(width, height)?;
        for (x, y) in EXTRA_FLOOR {
            if let Some(tile) = room.tiles.tile_mut(x, y) {
                tile.floor();
            }
        }
        Ok(room)
    }

    /// Only the `width` × `height` rectangle.
    pub fn rectangle(width: usize, height: usize) -> Result<Self, GridError> {
        if width > GRID_SIZE || height > GRID_SIZE {
            return Err(GridError::InteriorTooLarge {
                width,
                height,
                limit: GRID_SIZE,
            });
        }
        let mut tiles = TileMap::new();
        tiles.carve(0..width, 0..height);
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

impl TileGrid for Room {
    fn tile_map(&self) -> &TileMap {
        &self.tiles
    }
}
