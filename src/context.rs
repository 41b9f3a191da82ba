use std::path::PathBuf;

use crate::resources::{FileSource, mesh::WgpuBufferBuilder};

/// Environment variable that overrides [`Config::asset_root`].
pub const ASSETS_ENV: &str = "ISOQUEST_ASSETS";

/**
 * How exits pointing outside the 16x16 grid are handled.
 *
 * `Strict` refuses such exits when they are set. `Deferred` stores them as
 * given and reports the error only when the target tile is looked up.
 * Neither policy clamps.
 */
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExitBounds {
    #[default]
    Strict,
    Deferred,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub asset_root: PathBuf,
    pub exit_bounds: ExitBounds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("./assets"),
            exit_bounds: ExitBounds::default(),
        }
    }
}

impl Config {
    /// Defaults, with the asset root taken from `ISOQUEST_ASSETS` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(root) = std::env::var(ASSETS_ENV) {
            log::info!("Using asset root {} from {}", root, ASSETS_ENV);
            config.asset_root = PathBuf::from(root);
        }
        config
    }

    pub fn source(&self) -> FileSource {
        FileSource::new(&self.asset_root)
    }
}

/// A headless GPU device for uploading model buffers.
#[derive(Debug)]
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    pub async fn new() -> anyhow::Result<Self> {
        // The instance is a handle to our GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..wgpu::InstanceDescriptor::new_without_display_handle()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter {:?}", adapter.get_info().name);
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                experimental_features: wgpu::ExperimentalFeatures::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        Ok(Self { device, queue })
    }

    pub fn buffer_builder(&self) -> WgpuBufferBuilder<'_> {
        WgpuBufferBuilder {
            device: &self.device,
        }
    }
}
