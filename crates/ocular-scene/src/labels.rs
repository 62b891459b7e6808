//! Floating part labels projected into screen space

use bevy::prelude::*;

use crate::camera::MainCamera;
use crate::projection::{clip_from_world, project_to_viewport};
use crate::types::{
    HoveredPart, LabelPlacement, LabelSettings, PartLabel, PartObject, ToggleLabels, ViewportSize,
};
use crate::ViewerSet;

pub struct LabelsPlugin;

impl Plugin for LabelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LabelSettings>()
            .add_systems(Update, handle_toggle_labels.in_set(ViewerSet::Commands))
            .add_systems(Update, project_labels.in_set(ViewerSet::Labels));
    }
}

/// Placement for one label given its projected position
///
/// The global switch wins over everything; parts behind the camera have no
/// projected position and stay hidden.
pub fn label_placement(labels_enabled: bool, projected: Option<Vec2>, hovered: bool) -> LabelPlacement {
    match projected {
        Some(position) if labels_enabled => LabelPlacement {
            visible: true,
            position,
            emphasized: hovered,
        },
        _ => LabelPlacement::default(),
    }
}

pub fn handle_toggle_labels(
    mut messages: MessageReader<ToggleLabels>,
    mut settings: ResMut<LabelSettings>,
) {
    for _ in messages.read() {
        settings.visible = !settings.visible;
        tracing::info!("Labels {}", if settings.visible { "shown" } else { "hidden" });
    }
}

/// Placement for a label whose part sits at `world`, with labels switched on
pub fn place_label(
    clip_from_world: Mat4,
    viewport: Vec2,
    world: Option<Vec3>,
    hovered: bool,
) -> LabelPlacement {
    let projected = world.and_then(|w| project_to_viewport(clip_from_world, w, viewport));
    label_placement(true, projected, hovered)
}

/// Re-project every label from its part's world position
pub fn project_labels(
    settings: Res<LabelSettings>,
    hovered: Res<HoveredPart>,
    viewport: Res<ViewportSize>,
    camera_query: Query<(&Projection, &GlobalTransform), With<MainCamera>>,
    parts: Query<&GlobalTransform, With<PartObject>>,
    mut labels: Query<(&PartLabel, &mut LabelPlacement)>,
) {
    let clip = camera_query
        .single()
        .ok()
        .and_then(|(projection, transform)| clip_from_world(projection, transform));

    // Switched off, or nothing to project through
    let Some(clip) = clip.filter(|_| settings.visible) else {
        for (_, mut placement) in labels.iter_mut() {
            placement.set_if_neq(LabelPlacement::default());
        }
        return;
    };

    let viewport = viewport.as_vec2();
    for (label, mut placement) in labels.iter_mut() {
        let world = parts.get(label.part).ok().map(|t| t.translation());
        placement.set_if_neq(place_label(clip, viewport, world, hovered.0 == Some(label.part)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        camera_clip_from_world, move_part, part_entity, scene_app, spawn_default_camera,
    };

    fn placements(app: &mut App) -> Vec<(Entity, LabelPlacement)> {
        let world = app.world_mut();
        world
            .query::<(&PartLabel, &LabelPlacement)>()
            .iter(world)
            .map(|(label, placement)| (label.part, *placement))
            .collect()
    }

    fn hide_count(app: &mut App) -> usize {
        placements(app).iter().filter(|(_, p)| !p.visible).count()
    }

    #[test]
    fn test_label_placement() {
        let at = Vec2::new(320.0, 200.0);

        let shown = label_placement(true, Some(at), false);
        assert!(shown.visible);
        assert_eq!(shown.position, at);
        assert!(!shown.emphasized);

        assert!(label_placement(true, Some(at), true).emphasized);

        // Behind the camera
        assert!(!label_placement(true, None, true).visible);

        // Global switch overrides projection
        assert!(!label_placement(false, Some(at), true).visible);
    }

    #[test]
    fn test_toggle_labels_off_hides_all() {
        let mut app = scene_app();
        app.add_systems(Update, project_labels.after(handle_toggle_labels));

        // Pretend every label was on screen last frame
        let world = app.world_mut();
        let mut placements = world.query::<&mut LabelPlacement>();
        for mut placement in placements.iter_mut(world) {
            placement.visible = true;
            placement.position = Vec2::new(10.0, 10.0);
        }

        app.world_mut().write_message(ToggleLabels);
        app.update();

        assert!(!app.world().resource::<LabelSettings>().visible);
        let world = app.world_mut();
        let visible = world
            .query::<&LabelPlacement>()
            .iter(world)
            .filter(|p| p.visible)
            .count();
        assert_eq!(visible, 0);

        app.world_mut().write_message(ToggleLabels);
        app.update();
        assert!(app.world().resource::<LabelSettings>().visible);
    }

    #[test]
    fn test_place_label_front_and_behind() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let clip = Mat4::perspective_infinite_reverse_rh(75f32.to_radians(), 800.0 / 600.0, 0.1) * view;
        let viewport = Vec2::new(800.0, 600.0);

        let front = place_label(clip, viewport, Some(Vec3::ZERO), true);
        assert!(front.visible && front.emphasized);
        assert!((front.position - Vec2::new(400.0, 300.0)).length() < 1e-3);

        assert!(!place_label(clip, viewport, Some(Vec3::new(0.0, 0.0, 8.0)), false).visible);
        assert!(!place_label(clip, viewport, None, false).visible);
    }

    #[test]
    fn test_toggle_on_restores_projection() {
        let mut app = scene_app();
        let camera = spawn_default_camera(&mut app);
        app.add_systems(Update, project_labels.after(handle_toggle_labels));

        app.update();
        assert_eq!(hide_count(&mut app), 0);

        app.world_mut().write_message(ToggleLabels);
        app.update();
        assert_eq!(hide_count(&mut app), 10);

        // Put one part behind the camera before switching back on
        let lens = part_entity(&mut app, "Lens");
        move_part(&mut app, lens, Vec3::new(0.0, 0.0, 9.0));

        app.world_mut().write_message(ToggleLabels);
        app.update();

        let clip = camera_clip_from_world(&app, camera);
        let viewport = app.world().resource::<ViewportSize>().as_vec2();
        for (part, placement) in placements(&mut app) {
            if part == lens {
                assert!(!placement.visible);
                continue;
            }
            let position = app.world().get::<GlobalTransform>(part).unwrap().translation();
            let expected = project_to_viewport(clip, position, viewport).unwrap();
            assert!(placement.visible);
            assert!((placement.position - expected).length() < 1e-3);
        }
    }

    #[test]
    fn test_labels_hidden_without_camera() {
        let mut app = scene_app();
        app.add_systems(Update, project_labels);

        let world = app.world_mut();
        let mut placements = world.query::<&mut LabelPlacement>();
        for mut placement in placements.iter_mut(world) {
            placement.visible = true;
        }

        app.update();
        assert!(app.world().resource::<LabelSettings>().visible);
        assert_eq!(hide_count(&mut app), 10);
    }
}
