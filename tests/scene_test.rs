use std::{f32::consts::FRAC_PI_2, sync::Arc};

use approx::{assert_abs_diff_eq, assert_relative_eq};
use futures::executor::block_on;
use isoquest::{
    cgmath::{Deg, Point3, Transform, vec3},
    data_structures::{
        instance::Instance,
        room::Room,
        tile::{BLOCK_MODEL, DOOR_MODEL, FLOOR_MODEL, TileGrid},
    },
    resources::{FileSource, MemorySource, cache::ModelCache, mesh::HeadlessBufferBuilder},
    scene::{CHEST_MODEL, DECORATIONS, SCENE_MODELS, SceneBuilder, TABLE_MODEL, batches},
};

mod common;

use crate::common::test_utils::{
    CountingSource, QUAD_OBJ, assets_dir, scene_source, stub_model, stub_models,
};

#[test]
fn scene_is_the_grid_plus_furniture() {
    let cache = ModelCache::new();
    let source = scene_source();
    let builder = HeadlessBufferBuilder;
    let room = Room::new(3, 3).unwrap();

    let scene = block_on(SceneBuilder::new(&cache, &source, &builder).build(&room)).unwrap();
    let grid = room.build_instances(&stub_models()).unwrap();

    assert_eq!(scene.len(), grid.len() + DECORATIONS.len());
    for (built, placed) in scene.iter().zip(grid.iter()) {
        assert_eq!(built.model.name, placed.model.name);
        assert_eq!(built.position, placed.position);
    }
}

#[test]
fn furniture_is_placed_last() {
    let cache = ModelCache::new();
    let source = scene_source();
    let builder = HeadlessBufferBuilder;
    let room = Room::rectangle(2, 2).unwrap();

    let scene = block_on(SceneBuilder::new(&cache, &source, &builder).build(&room)).unwrap();
    let furniture = &scene[scene.len() - 3..];

    assert_eq!(furniture[0].model.name, CHEST_MODEL);
    assert_eq!(furniture[0].position, vec3(16.0, -1.5, 0.0));
    assert_eq!(furniture[0].scale, vec3(0.8, 0.8, 0.8));
    assert_eq!(furniture[0].rotation, vec3(0.0, 0.0, 0.0));

    assert_eq!(furniture[1].model.name, CHEST_MODEL);
    assert_eq!(furniture[1].position, vec3(0.0, -1.5, 112.0));
    assert_relative_eq!(furniture[1].rotation.y, FRAC_PI_2, epsilon = 1e-6);

    assert_eq!(furniture[2].model.name, TABLE_MODEL);
    assert_eq!(furniture[2].position, vec3(0.0, -3.0, 80.0));
    assert_relative_eq!(furniture[2].rotation.x, FRAC_PI_2, epsilon = 1e-6);
    assert_eq!(furniture[2].scale, vec3(1.4, 1.4, 0.7));

    // both chests share one model
    assert!(Arc::ptr_eq(&furniture[0].model, &furniture[1].model));
}

#[test]
fn rebuilding_reuses_cached_models() {
    let cache = ModelCache::new();
    let source = CountingSource::new(scene_source());
    let builder = HeadlessBufferBuilder;
    let scenes = SceneBuilder::new(&cache, &source, &builder);

    let first = block_on(scenes.build(&Room::new(3, 3).unwrap())).unwrap();
    let second = block_on(scenes.build(&Room::rectangle(5, 4).unwrap())).unwrap();

    for name in SCENE_MODELS {
        assert_eq!(source.fetches(&format!("{name}.obj")), 1, "{name}");
    }
    let last = |scene: &[Instance]| scene.last().map(|i| i.model.clone()).unwrap();
    assert!(Arc::ptr_eq(&last(&first), &last(&second)));
}

#[test]
fn missing_scene_model_fails_the_build() {
    let cache = ModelCache::new();
    let source = SCENE_MODELS
        .iter()
        .filter(|name| **name != TABLE_MODEL)
        .fold(MemorySource::new(), |source, name| {
            source.with(&format!("{name}.obj"), QUAD_OBJ)
        });
    let builder = HeadlessBufferBuilder;

    let err = block_on(SceneBuilder::new(&cache, &source, &builder).build(&Room::new(3, 3).unwrap()))
        .unwrap_err();

    assert!(format!("{err:#}").contains("table.obj"));
    assert!(cache.cached(TABLE_MODEL).is_none());
}

#[test]
fn batches_group_by_model_in_first_seen_order() {
    let models = stub_models();
    let mut scene = Room::rectangle(3, 3).unwrap().build_instances(&models).unwrap();
    scene.push(Instance::new(models[CHEST_MODEL].clone(), vec3(0.0, 0.0, 0.0)));
    scene.push(Instance::new(models[FLOOR_MODEL].clone(), vec3(99.0, 0.0, 0.0)));

    let grouped = batches(&scene);
    let summary: Vec<(&str, usize)> = grouped
        .iter()
        .map(|(model, raws)| (model.name.as_str(), raws.len()))
        .collect();

    assert_eq!(summary, vec![(FLOOR_MODEL, 10), (BLOCK_MODEL, 12), (CHEST_MODEL, 1)]);
    assert!(!grouped.iter().any(|(model, _)| model.name == DOOR_MODEL));
    // the extra floor keeps its place at the end of its batch
    assert_eq!(grouped[0].1[9].model[3], [99.0, 0.0, 0.0, 1.0]);
}

#[test]
fn world_matrix_scales_then_rotates_then_translates() {
    let mut instance =
        Instance::new(stub_model(CHEST_MODEL), vec3(10.0, 0.0, 0.0)).with_scale(vec3(2.0, 2.0, 2.0));
    instance.rotate_y(Deg(90.0));

    let moved = instance.to_matrix().transform_point(Point3::new(1.0, 0.0, 0.0));
    assert_abs_diff_eq!(moved.x, 10.0, epsilon = 1e-5);
    assert_abs_diff_eq!(moved.y, 0.0, epsilon = 1e-5);
    assert_abs_diff_eq!(moved.z, -2.0, epsilon = 1e-5);

    let raw = instance.to_raw();
    assert_eq!(raw.model[3], [10.0, 0.0, 0.0, 1.0]);
    assert_eq!(raw.handedness, 1.0);
    assert_abs_diff_eq!(raw.normal[0][0], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(raw.normal[0][2], -1.0, epsilon = 1e-6);
}

#[test]
fn mirrored_instances_flip_handedness() {
    let instance =
        Instance::new(stub_model(BLOCK_MODEL), vec3(0.0, 0.0, 0.0)).with_scale(vec3(-1.0, 1.0, 1.0));

    assert_eq!(instance.to_raw().handedness, -1.0);
}

#[test]
fn cloned_instances_move_independently() {
    let models = stub_models();
    let original = Instance::new(models[CHEST_MODEL].clone(), vec3(1.0, 2.0, 3.0));

    let mut moved = original.clone();
    moved.position.x += 16.0;
    moved.rotate_z(Deg(45.0));

    assert_eq!(original.position, vec3(1.0, 2.0, 3.0));
    assert_eq!(original.rotation, vec3(0.0, 0.0, 0.0));
    assert!(Arc::ptr_eq(&original.model, &moved.model));
}

#[tokio::test]
async fn builds_the_bundled_dungeon() {
    let cache = ModelCache::new();
    let source = FileSource::new(assets_dir());
    let builder = HeadlessBufferBuilder;

    let scene = SceneBuilder::new(&cache, &source, &builder)
        .build(&Room::new(3, 3).unwrap())
        .await
        .unwrap();

    // 25 floors, 16 two block walls, two chests and a table
    assert_eq!(scene.len(), 25 + 32 + 3);
    let grouped = batches(&scene);
    let names: Vec<&str> = grouped.iter().map(|(m, _)| m.name.as_str()).collect();
    assert_eq!(names, vec![FLOOR_MODEL, BLOCK_MODEL, CHEST_MODEL, TABLE_MODEL]);
    assert_eq!(grouped[3].0.parts.len(), 3);
    assert!(cache.cached(DOOR_MODEL).is_some());
}

#[test]
fn z_rotation_acts_on_vertices_before_x() {
    let mut instance = Instance::new(stub_model(BLOCK_MODEL), vec3(0.0, 0.0, 0.0));
    instance.rotate_x(Deg(90.0));
    instance.rotate_z(Deg(90.0));

    // Rz takes +X to +Y, then Rx takes +Y to +Z
    let moved = instance.to_matrix().transform_point(Point3::new(1.0, 0.0, 0.0));
    assert_abs_diff_eq!(moved.x, 0.0, epsilon = 1e-5);
    assert_abs_diff_eq!(moved.y, 0.0, epsilon = 1e-5);
    assert_abs_diff_eq!(moved.z, 1.0, epsilon = 1e-5);
}
