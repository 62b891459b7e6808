//! Headless app fixture shared by the scene tests

use bevy::prelude::*;
use ocular_core::Catalogue;

use crate::camera::{viewer_projection, MainCamera, OrbitCamera};
use crate::picking::PointerSample;
use crate::projection::clip_from_world;
use crate::types::*;
use crate::{labels, parts, picking, view};

/// App with the parts spawned and every command handler registered
///
/// No window, camera or egui: pointer tracking and label projection are
/// left out and added by the tests that need them.
pub fn scene_app() -> App {
    let mut app = App::new();
    app.insert_resource(PartCatalogue(Catalogue::builtin().unwrap()))
        .init_resource::<Assets<Mesh>>()
        .init_resource::<Assets<StandardMaterial>>()
        .init_resource::<ButtonInput<KeyCode>>()
        .init_resource::<PartIndex>()
        .init_resource::<HighlightState>()
        .init_resource::<HoveredPart>()
        .init_resource::<InfoPanel>()
        .init_resource::<LabelSettings>()
        .init_resource::<ViewportSize>()
        .init_resource::<ActiveViewPreset>()
        .init_resource::<OrbitCamera>()
        .init_resource::<PointerSample>()
        .add_message::<SelectPart>()
        .add_message::<ClearSelection>()
        .add_message::<ResetView>()
        .add_message::<ApplyViewPreset>()
        .add_message::<ToggleLabels>()
        .add_systems(Startup, parts::spawn_parts)
        .add_systems(
            Update,
            (
                view::handle_reset_view,
                view::handle_view_presets,
                picking::handle_select_part,
                picking::handle_clear_selection,
                labels::handle_toggle_labels,
            )
                .chain(),
        );
    app.update();
    app
}

pub fn part_entity(app: &mut App, name: &str) -> Entity {
    let world = app.world();
    let index = world.resource::<PartCatalogue>().position_of(name).unwrap();
    world.resource::<PartIndex>().entity(index).unwrap()
}

/// Parts currently wearing the highlight material
pub fn highlighted_parts(app: &mut App) -> Vec<Entity> {
    let highlight = app.world().resource::<HighlightMaterial>().0.clone();
    let world = app.world_mut();
    world
        .query::<(Entity, &MeshMaterial3d<StandardMaterial>)>()
        .iter(world)
        .filter(|(_, material)| material.0 == highlight)
        .map(|(entity, _)| entity)
        .collect()
}

/// Main camera at the default orbit pose, sized to the viewport
pub fn spawn_default_camera(app: &mut App) -> Entity {
    let orbit = OrbitCamera::default();
    let viewport = *app.world().resource::<ViewportSize>();
    let transform =
        Transform::from_translation(orbit.position()).looking_at(orbit.target, Vec3::Y);
    app.world_mut()
        .spawn((
            viewer_projection(viewport.width / viewport.height),
            transform,
            GlobalTransform::from(transform),
            MainCamera,
        ))
        .id()
}

pub fn camera_clip_from_world(app: &App, camera: Entity) -> Mat4 {
    let world = app.world();
    let projection = world.get::<Projection>(camera).unwrap();
    let transform = world.get::<GlobalTransform>(camera).unwrap();
    clip_from_world(projection, transform).unwrap()
}

/// Move a part, keeping its global transform in step
pub fn move_part(app: &mut App, part: Entity, position: Vec3) {
    let transform = Transform::from_translation(position);
    app.world_mut()
        .entity_mut(part)
        .insert((transform, GlobalTransform::from(transform)));
}
