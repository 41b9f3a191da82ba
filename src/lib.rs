//! isoquest
//!
//! Scene assembly for an isometric dungeon renderer. Text assets (Wavefront
//! OBJ meshes and their MTL material libraries) are parsed into shared
//! models, and 16x16 tile grids are turned into floor, wall and door
//! instances. The renderer itself, cameras and input live outside this crate;
//! what it receives is a list of [`data_structures::instance::Instance`]s.
//!
//! High-level modules
//! - `context`: configuration and a headless GPU device for buffer uploads
//! - `data_structures`: models, materials, instances and tile grids
//! - `error`: typed parser and grid errors
//! - `resources`: asset sources, the OBJ/MTL parsers and model loading
//! - `scene`: scene assembly and per-model instance batching
//!

pub mod context;
pub mod data_structures;
pub mod error;
pub mod resources;
pub mod scene;

pub use cgmath;

/// Install the platform logger: `env_logger` natively (honours `RUST_LOG`),
/// the browser console on wasm. Calling it twice is harmless.
pub fn init_logger() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            log::debug!("Logger already initialized: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            log::debug!("Logger already initialized: {}", e);
        }
    }
}
