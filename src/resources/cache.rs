//! Load-once model cache.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError},
};

use crate::{
    data_structures::model::Model,
    resources::{AssetSource, load_model_obj, mesh::BufferBuilder},
};

type Slot = Arc<futures_intrusive::sync::Mutex<Option<Arc<Model>>>>;

/**
 * Maps model names to assembled models.
 *
 * Every name owns a slot behind an async mutex. The first caller holds the
 * slot while it assembles; callers asking for the same name in the meantime
 * wait on that slot and receive the stored model, so a name is fetched and
 * parsed at most once. A failed load leaves the slot empty and the next
 * caller tries again.
 */
#[derive(Default)]
pub struct ModelCache {
    slots: std::sync::Mutex<HashMap<String, Slot>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, name: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(futures_intrusive::sync::Mutex::new(None, true)))
            .clone()
    }

    pub async fn get_or_load<S: AssetSource, B: BufferBuilder>(
        &self,
        name: &str,
        source: &S,
        builder: &B,
    ) -> anyhow::Result<Arc<Model>> {
        let slot = self.slot(name);
        let mut entry = slot.lock().await;
        if let Some(model) = entry.as_ref() {
            log::debug!("Model {} served from cache", name);
            return Ok(model.clone());
        }
        let model = Arc::new(load_model_obj(name, source, builder).await?);
        *entry = Some(model.clone());
        Ok(model)
    }

    /// The model stored under `name`, if it finished loading and is not
    /// currently being assembled.
    pub fn cached(&self, name: &str) -> Option<Arc<Model>> {
        let slot = self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()?;
        let entry = slot.try_lock()?;
        (*entry).clone()
    }
}
