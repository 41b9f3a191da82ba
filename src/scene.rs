//! Scene assembly.
//!
//! [`SceneBuilder`] loads the models a level needs, lets the tile grid place
//! floors, walls and doors, and adds the furniture on top. The resulting
//! list is in render order; nothing is sorted by depth or material, which is
//! left to the renderer.
//!
//! [`batches`] regroups a scene per model so each model can be drawn with one
//! instanced call.

use std::sync::Arc;

use cgmath::Deg;
use futures::future::try_join_all;

use crate::{
    data_structures::{
        instance::{Instance, InstanceRaw},
        model::Model,
        tile::{BLOCK_MODEL, DOOR_MODEL, FLOOR_MODEL, ModelSet, TileGrid},
    },
    resources::{AssetSource, cache::ModelCache, mesh::BufferBuilder},
};

pub const TABLE_MODEL: &str = "table";
pub const CHEST_MODEL: &str = "chest";

/// Every model a scene may reference.
pub const SCENE_MODELS: [&str; 5] = [FLOOR_MODEL, BLOCK_MODEL, TABLE_MODEL, CHEST_MODEL, DOOR_MODEL];

/// A fixed piece of furniture. Rotations are in degrees about X, Y and Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decoration {
    pub model: &'static str,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

pub const DECORATIONS: [Decoration; 3] = [
    Decoration {
        model: CHEST_MODEL,
        position: [16.0, -1.5, 0.0],
        rotation: [0.0, 0.0, 0.0],
        scale: [0.8, 0.8, 0.8],
    },
    Decoration {
        model: CHEST_MODEL,
        position: [0.0, -1.5, 112.0],
        rotation: [0.0, 90.0, 0.0],
        scale: [0.8, 0.8, 0.8],
    },
    Decoration {
        model: TABLE_MODEL,
        position: [0.0, -3.0, 80.0],
        rotation: [90.0, 0.0, 0.0],
        scale: [1.4, 1.4, 0.7],
    },
];

impl Decoration {
    fn instantiate(&self, models: &ModelSet) -> anyhow::Result<Instance> {
        let model = models
            .get(self.model)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("decoration model {} is not loaded", self.model))?;
        let mut instance = Instance::new(model, self.position.into()).with_scale(self.scale.into());
        instance.rotate_x(Deg(self.rotation[0]));
        instance.rotate_y(Deg(self.rotation[1]));
        instance.rotate_z(Deg(self.rotation[2]));
        Ok(instance)
    }
}

pub struct SceneBuilder<'a, S, B> {
    cache: &'a ModelCache,
    source: &'a S,
    builder: &'a B,
}

impl<'a, S: AssetSource, B: BufferBuilder> SceneBuilder<'a, S, B> {
    pub fn new(cache: &'a ModelCache, source: &'a S, builder: &'a B) -> Self {
        Self {
            cache,
            source,
            builder,
        }
    }

    /// Loads (or fetches from the cache) every model in [`SCENE_MODELS`].
    pub async fn load_models(&self) -> anyhow::Result<ModelSet> {
        let models = try_join_all(SCENE_MODELS.iter().map(|name| async move {
            let model = self.cache.get_or_load(name, self.source, self.builder).await?;
            anyhow::Ok((name.to_string(), model))
        }))
        .await?;
        Ok(models.into_iter().collect())
    }

    pub async fn build(&self, grid: &impl TileGrid) -> anyhow::Result<Vec<Instance>> {
        let models = self.load_models().await?;
        let mut instances = grid.build_instances(&models)?;
        for decoration in DECORATIONS.iter() {
            instances.push(decoration.instantiate(&models)?);
        }
        log::info!("Scene built with {} instances", instances.len());
        Ok(instances)
    }
}

/// Groups `instances` per model, keeping the order in which models first
/// appear and the order of instances within each model.
pub fn batches(instances: &[Instance]) -> Vec<(Arc<Model>, Vec<InstanceRaw>)> {
    let mut batches: Vec<(Arc<Model>, Vec<InstanceRaw>)> = Vec::new();
    for instance in instances {
        match batches
            .iter_mut()
            .find(|(model, _)| Arc::ptr_eq(model, &instance.model))
        {
            Some((_, raws)) => raws.push(instance.to_raw()),
            None => batches.push((instance.model.clone(), vec![instance.to_raw()])),
        }
    }
    batches
}
