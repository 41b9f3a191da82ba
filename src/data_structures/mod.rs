//! Engine data structures: models, instances and tile grids.
//!
//! - `model` contains parts, materials and the vertex layout of loaded models
//! - `instance` holds per-instance transformation data
//! - `tile` is the 16x16 occupancy grid and its instance derivation
//! - `room` and `zone` are the two kinds of tile grid

pub mod instance;
pub mod model;
pub mod room;
pub mod tile;
pub mod zone;
