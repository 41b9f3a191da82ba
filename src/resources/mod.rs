use std::{collections::HashMap, path::PathBuf};

use anyhow::Context;

use crate::{
    data_structures::model::{self, DEFAULT_MATERIAL, Material},
    resources::mesh::BufferBuilder,
};

/**
 * This module contains all logic for loading models from external files.
 */
pub mod cache;
pub mod mesh;
pub mod mtl;
pub mod obj;

/// Where model and material text comes from.
#[allow(async_fn_in_trait)]
pub trait AssetSource {
    async fn load_string(&self, file_name: &str) -> anyhow::Result<String>;
}

/**
 * Reads assets below `root`. Natively that is a directory; on the web it is a
 * path below the page origin.
 */
#[derive(Clone, Debug)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[cfg(target_arch = "wasm32")]
fn format_url(root: &std::path::Path, file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("no browser window available")?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("page origin is not readable"))?;
    let base = reqwest::Url::parse(&format!("{}/{}/", origin, root.display()))?;
    Ok(base.join(file_name)?)
}

impl AssetSource for FileSource {
    async fn load_string(&self, file_name: &str) -> anyhow::Result<String> {
        #[cfg(target_arch = "wasm32")]
        let txt = {
            let url = format_url(&self.root, file_name)?;
            reqwest::get(url).await?.error_for_status()?.text().await?
        };
        #[cfg(not(target_arch = "wasm32"))]
        let txt = {
            let path = self.root.join(file_name);
            tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("cannot read {}", path.display()))?
        };

        Ok(txt)
    }
}

/// Serves assets from memory, e.g. text compiled into the binary.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, file_name: &str, text: &str) -> Self {
        self.insert(file_name, text);
        self
    }

    pub fn insert(&mut self, file_name: &str, text: &str) {
        self.files.insert(file_name.to_string(), text.to_string());
    }
}

impl AssetSource for MemorySource {
    async fn load_string(&self, file_name: &str) -> anyhow::Result<String> {
        self.files
            .get(file_name)
            .cloned()
            .with_context(|| format!("asset {file_name} not found"))
    }
}

/**
 * Only the first `mtllib` is read; the rest are reported and ignored. A
 * library that cannot be fetched or parsed leaves the model without
 * materials instead of failing it.
 */
async fn load_materials<S: AssetSource>(
    file_name: &str,
    libs: &[String],
    source: &S,
) -> HashMap<String, Material> {
    let Some(lib) = libs.first() else {
        return HashMap::new();
    };
    if libs.len() > 1 {
        log::warn!(
            "{} references {} material libraries, only {} is loaded",
            file_name,
            libs.len(),
            lib
        );
    }
    let parsed = match source.load_string(lib).await {
        Ok(text) => mtl::parse_mtl(&text).map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };
    match parsed {
        Ok(raw) => raw.into_iter().map(|(name, m)| (name, m.into())).collect(),
        Err(e) => {
            log::warn!("Unable to load material library {} for {}: {:#}", lib, file_name, e);
            HashMap::new()
        }
    }
}

/**
 * Assemble the model `<name>.obj`.
 *
 * The mesh is required: fetch and parse failures are returned. The fallback
 * material is always present under [`DEFAULT_MATERIAL`] and every part whose
 * material is missing from the library is pointed at it.
 */
pub async fn load_model_obj<S: AssetSource, B: BufferBuilder>(
    name: &str,
    source: &S,
    builder: &B,
) -> anyhow::Result<model::Model> {
    let file_name = format!("{name}.obj");
    let obj_text = source
        .load_string(&file_name)
        .await
        .with_context(|| format!("Unable to fetch mesh {file_name}"))?;
    let obj = obj::parse_obj(&obj_text).with_context(|| format!("Unable to parse mesh {file_name}"))?;

    let mut materials = load_materials(&file_name, &obj.material_libs, source).await;
    materials.insert(DEFAULT_MATERIAL.to_string(), Material::fallback());

    let parts = obj
        .geometries
        .iter()
        .enumerate()
        .filter_map(|(idx, geometry)| {
            let material = if materials.contains_key(&geometry.material) {
                geometry.material.clone()
            } else {
                log::warn!(
                    "Material {} used by {} is not defined, using {}",
                    geometry.material,
                    file_name,
                    DEFAULT_MATERIAL
                );
                DEFAULT_MATERIAL.to_string()
            };
            let label = format!("{}:{}", name, geometry.material);
            match builder.build(&label, geometry) {
                Ok(buffers) => Some(model::Part { buffers, material }),
                Err(e) => {
                    log::warn!("Part at index {} in file {} could not be built: {}", idx, file_name, e);
                    None
                }
            }
        })
        .collect::<Vec<_>>();

    log::info!(
        "Loaded model {} with {} parts and {} materials",
        name,
        parts.len(),
        materials.len()
    );
    Ok(model::Model {
        name: name.to_string(),
        parts,
        materials,
    })
}
