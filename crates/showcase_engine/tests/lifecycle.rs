//! Scene switching: teardown completeness, re-entry and stale loads

mod common;

use approx::assert_relative_eq;
use common::{Broken, Hud, Kiosk, Plaza, RedCube, TRAM};
use showcase_engine::assets::Latency;
use showcase_engine::scene::{DeliveryReport, SceneCatalog, SceneError, SceneLifecycleManager};

fn catalog() -> SceneCatalog {
    SceneCatalog::builder()
        .register(1, RedCube::new())
        .register(2, Plaza::new())
        .register(3, Kiosk)
        .register(4, Broken)
        .build()
        .unwrap()
}

/// Container shape: (root children, arena nodes, live GPU allocations)
fn shape(manager: &SceneLifecycleManager) -> (usize, usize, usize) {
    let container = manager.container();
    (
        container.child_count(),
        container.node_count(),
        container.resources().live_count(),
    )
}

fn settle(manager: &mut SceneLifecycleManager) {
    for _ in 0..4 {
        manager.deliver_assets();
    }
}

#[test]
fn test_teardown_leaves_only_new_scene() {
    for (from, to) in [(2, 3), (2, 1), (1, 2), (3, 2), (2, 2)] {
        let mut fresh = common::manager(catalog(), 1);
        fresh.switch_to(to).unwrap();
        settle(&mut fresh);

        let mut switched = common::manager(catalog(), 1);
        switched.switch_to(from).unwrap();
        settle(&mut switched);
        switched.switch_to(to).unwrap();
        settle(&mut switched);

        assert_eq!(shape(&switched), shape(&fresh), "switch {from} -> {to}");
        assert_eq!(
            switched.container().lights().len(),
            fresh.container().lights().len(),
            "lights after {from} -> {to}"
        );
    }
}

#[test]
fn test_teardown_releases_everything_but_camera() {
    let mut manager = common::manager(catalog(), 1);
    manager.switch_to(2).unwrap();
    settle(&mut manager);
    assert_eq!(manager.mixers().len(), 1);
    assert!(manager.container().aux().debug_panel.is_some());

    let report = manager.teardown();

    let container = manager.container();
    assert_eq!(container.child_count(), 1);
    assert_eq!(container.children(), &[container.camera_node().unwrap()]);
    assert_eq!(container.node_count(), 1);
    assert_eq!(container.resources().live_count(), 0);
    assert!(container.aux().is_clear());
    assert!(manager.actors().is_empty());
    assert!(manager.mixers().is_empty());

    assert_eq!(report.mixers, 1);
    assert_eq!(report.actor_nodes, 3);
    assert_eq!(report.light_nodes, 3);
    assert_eq!(report.helper_nodes, 2);
    assert_eq!(report.orphan_nodes, 1);
    assert!(report.panel_destroyed);
    assert_eq!(report.failures, 0);
}

#[test]
fn test_idempotent_reentry() {
    let mut once = common::manager(catalog(), 1);
    once.switch_to(2).unwrap();
    settle(&mut once);

    let mut twice = common::manager(catalog(), 1);
    twice.switch_to(2).unwrap();
    settle(&mut twice);
    twice.switch_to(2).unwrap();
    settle(&mut twice);

    assert_eq!(shape(&twice), shape(&once));
    assert_eq!(twice.actors().populated(), once.actors().populated());
    assert_eq!(twice.mixers().len(), once.mixers().len());
}

#[test]
fn test_lists_reset_on_switch() {
    let mut manager = common::manager(catalog(), 1);
    manager.switch_to(2).unwrap();
    settle(&mut manager);
    assert_eq!(manager.actors().populated(), 1);
    assert_eq!(manager.mixers().len(), 1);

    manager.switch_to(3).unwrap();
    assert_eq!(manager.actors().len(), 0);
    assert_eq!(manager.mixers().len(), 0);
}

#[test]
fn test_camera_survives_switch() {
    let mut manager = common::manager(catalog(), 1);
    manager.switch_to(2).unwrap();
    let camera_node = manager.container().camera_node();
    let position = manager.camera().position;

    manager.switch_to(3).unwrap();

    assert_eq!(manager.container().camera_node(), camera_node);
    assert_eq!(manager.camera().position, position);
}

#[test]
fn test_unknown_id_keeps_current_scene() {
    let mut manager = common::manager(catalog(), 1);
    manager.switch_to(2).unwrap();
    settle(&mut manager);
    let before = shape(&manager);
    let generation = manager.generation();

    let err = manager.switch_to(99).unwrap_err();

    assert_eq!(err, SceneError::UnknownScene(99));
    assert_eq!(manager.active(), Some(2));
    assert_eq!(manager.generation(), generation);
    assert_eq!(shape(&manager), before);
    assert!(manager.container().aux().debug_panel.is_some());
}

#[test]
fn test_stale_load_discarded_for_every_interleaving() {
    let latency = 3;
    for pumps_before_switch in 0..latency {
        let mut manager = common::manager(catalog(), latency);
        manager.switch_to(2).unwrap();
        for _ in 0..pumps_before_switch {
            assert_eq!(manager.deliver_assets().delivered, 0);
        }

        let switch = manager.switch_to(3).unwrap();
        let expected = shape(&manager);

        let mut discarded = switch.dropped_requests;
        for _ in 0..latency {
            let report = manager.deliver_assets();
            assert_eq!(report.delivered, 0);
            discarded += report.discarded;
        }

        assert_eq!(discarded, 1, "pumps before switch: {pumps_before_switch}");
        assert_eq!(manager.loader().pending_count(), 0);
        assert_eq!(manager.container().find_by_name("tram"), None);
        assert_eq!(manager.actors().len(), 0);
        assert_eq!(manager.mixers().len(), 0);
        assert_eq!(shape(&manager), expected);
        assert_eq!(manager.loader().stats().discarded, 1);
    }
}

#[test]
fn test_stale_load_into_same_scene_reentry() {
    let mut manager = common::manager(catalog(), 2);
    manager.switch_to(2).unwrap();
    manager.deliver_assets();
    let reentry = manager.switch_to(2).unwrap();

    let first = manager.deliver_assets();
    let second = manager.deliver_assets();

    assert_eq!(reentry.dropped_requests, 1);
    assert_eq!(first, DeliveryReport::default());
    assert_eq!(second.delivered, 1);
    assert_eq!(manager.actors().populated(), 1);
    assert_eq!(manager.mixers().len(), 1);
}

#[test]
fn test_hung_load_leaves_hole() {
    let mut manager = common::manager(catalog(), 1);
    manager.loader_mut().set_latency(TRAM, Latency::Never);
    manager.switch_to(2).unwrap();
    settle(&mut manager);

    assert_eq!(manager.actors().len(), 1);
    assert_eq!(manager.actors().get(0), None);
    assert_eq!(manager.loader().pending_count(), 1);

    manager.switch_to(3).unwrap();
    settle(&mut manager);
    assert_eq!(manager.container().find_by_name("tram"), None);
}

#[test]
fn test_hung_loads_do_not_pile_up() {
    let mut manager = common::manager(catalog(), 1);
    manager.loader_mut().set_latency(TRAM, Latency::Never);

    for _ in 0..100 {
        manager.switch_to(2).unwrap();
        manager.deliver_assets();
    }

    assert_eq!(manager.loader().pending_count(), 1);
    assert_eq!(manager.loader().stats().discarded, 99);
    assert_eq!(manager.loader().stats().requested, 100);
}

#[test]
fn test_nodes_mounted_on_camera_are_released() {
    let catalog = SceneCatalog::builder()
        .register(1, Hud)
        .register(2, Kiosk)
        .build()
        .unwrap();
    let mut baseline = common::manager(
        SceneCatalog::builder().register(2, Kiosk).build().unwrap(),
        1,
    );
    baseline.switch_to(2).unwrap();

    let mut manager = common::manager(catalog, 1);
    for id in [1, 2, 1, 2] {
        manager.switch_to(id).unwrap();
        settle(&mut manager);
    }

    assert_eq!(shape(&manager), shape(&baseline));
    let camera = manager.container().camera_node().unwrap();
    assert!(manager.container().get(camera).unwrap().children().is_empty());
    assert_eq!(manager.container().find_by_name("reticle"), None);
}

#[test]
fn test_teardown_keeps_camera_but_not_its_mounts() {
    let catalog = SceneCatalog::builder().register(1, Hud).build().unwrap();
    let mut manager = common::manager(catalog, 1);
    manager.switch_to(1).unwrap();
    let camera = manager.container().camera_node();
    assert!(manager.container().resources().live_count() > 0);

    let report = manager.teardown();

    assert_eq!(manager.container().camera_node(), camera);
    assert_eq!(manager.container().node_count(), 1);
    assert_eq!(manager.container().resources().live_count(), 0);
    assert_eq!(report.light_nodes, 1);
    assert_eq!(report.other_nodes, 2);
    assert_eq!(report.failures, 0);
}

#[test]
fn test_asset_failure_does_not_abort_switch() {
    let mut manager = common::manager(catalog(), 1);
    let report = manager.switch_to(4).unwrap();
    assert!(report.load_error.is_none());

    let delivery = manager.deliver_assets();

    assert_eq!(delivery.failed, 1);
    assert_eq!(manager.active(), Some(4));
    assert_eq!(manager.container().lights().len(), 1);
}

#[test]
fn test_disposal_failure_is_tolerated() {
    let catalog = SceneCatalog::builder()
        .register(
            1,
            Plaza {
                faulty_emitter: true,
                detach_panel: true,
            },
        )
        .register(2, Kiosk)
        .build()
        .unwrap();
    let mut manager = common::manager(catalog, 1);
    manager.switch_to(1).unwrap();
    settle(&mut manager);

    let report = manager.switch_to(2).unwrap();

    assert_eq!(report.teardown.failures, 1);
    assert!(report.teardown.panel_destroyed);
    assert!(manager.container().find_by_name("ground").is_none());
    assert!(manager.container().find_by_name("kiosk").is_some());
    assert_eq!(manager.container().child_count(), 3);
}

#[test]
fn test_red_cube_scenario() {
    let mut manager = common::manager(catalog(), 1);
    manager.switch_to(1).unwrap();
    let cube = manager.actors().get(0).unwrap();
    let initial_z = manager.container().get(cube).unwrap().transform.position.z;

    for _ in 0..10 {
        manager.advance_mixers(1.0);
        manager.animate_active(1.0).unwrap();
    }
    let z = manager.container().get(cube).unwrap().transform.position.z;
    assert_relative_eq!(z, initial_z + 2.0, epsilon = 1e-5);

    assert_eq!(manager.switch_to(99), Err(SceneError::UnknownScene(99)));
    assert_eq!(manager.actors().get(0), Some(cube));
    assert_eq!(manager.container().get(cube).unwrap().transform.position.z, z);
}
