#![allow(dead_code)]

use std::{
    collections::HashMap,
    future::Future,
    path::PathBuf,
    pin::Pin,
    sync::{Arc, Mutex},
    task::{Context, Poll},
};

use isoquest::{
    data_structures::{model::Model, tile::ModelSet},
    resources::{AssetSource, MemorySource},
    scene::SCENE_MODELS,
};

pub const QUAD_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";

pub const CRATE_OBJ: &str = "\
mtllib crate.mtl
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vn 0 0 1
usemtl red
f 1/1/1 2/2/1 3/3/1
usemtl missing
f 1/1/1 3/3/1 4/3/1
";

pub const CRATE_MTL: &str = "\
newmtl red
Kd 1 0 0
Ns 10
";

pub fn assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}

/// A model without parts, good enough for placing instances.
pub fn stub_model(name: &str) -> Arc<Model> {
    Arc::new(Model {
        name: name.to_string(),
        parts: Vec::new(),
        materials: HashMap::new(),
    })
}

pub fn stub_models() -> ModelSet {
    SCENE_MODELS
        .iter()
        .map(|name| (name.to_string(), stub_model(name)))
        .collect()
}

/// Every scene model as a single quad without a material library.
pub fn scene_source() -> MemorySource {
    SCENE_MODELS
        .iter()
        .fold(MemorySource::new(), |source, name| {
            source.with(&format!("{name}.obj"), QUAD_OBJ)
        })
}

/// Returns `Pending` once so that other futures get a chance to run.
pub struct YieldNow(bool);

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

pub fn yield_now() -> YieldNow {
    YieldNow(false)
}

/// Wraps a source, counting fetches per file and yielding before each one.
pub struct CountingSource<S> {
    inner: S,
    fetches: Mutex<HashMap<String, usize>>,
}

impl<S> CountingSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fetches: Mutex::new(HashMap::new()),
        }
    }

    pub fn fetches(&self, file_name: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .get(file_name)
            .copied()
            .unwrap_or(0)
    }
}

impl<S: AssetSource> AssetSource for CountingSource<S> {
    async fn load_string(&self, file_name: &str) -> anyhow::Result<String> {
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(file_name.to_string())
            .or_insert(0) += 1;
        yield_now().await;
        self.inner.load_string(file_name).await
    }
}
