//! Scene setup - lights, part meshes and their labels

use bevy::prelude::*;
use bevy::render::render_resource::Face;
use ocular_core::PartDefinition;

use crate::types::{
    HighlightMaterial, LabelPlacement, PartCatalogue, PartIndex, PartLabel, PartObject, PickVolume,
};

/// Marker component for the main directional light
#[derive(Component)]
pub struct MainDirectionalLight;

/// Plugin that builds the part scene from the [`PartCatalogue`] resource
pub struct PartsPlugin;

impl Plugin for PartsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PartIndex>()
            .add_systems(Startup, (setup_lighting, spawn_parts));
    }
}

fn setup_lighting(mut commands: Commands) {
    // Key light from the front-right-top, as seen from the default camera
    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(1.0, 1.0, 1.0).looking_at(Vec3::ZERO, Vec3::Y),
        MainDirectionalLight,
    ));

    // Dim fill so the back of the eye is not black
    commands.spawn((
        DirectionalLight {
            illuminance: 2500.0,
            shadows_enabled: false,
            color: Color::srgb(0.95, 0.95, 1.0),
            ..default()
        },
        Transform::from_xyz(-1.0, -0.5, -1.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Material a part is rendered with when not highlighted
pub fn part_material(part: &PartDefinition) -> StandardMaterial {
    let [r, g, b] = part.rgb().to_f32_array();
    StandardMaterial {
        base_color: Color::srgba(r, g, b, part.effective_opacity()),
        alpha_mode: if part.is_translucent() {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        },
        perceptual_roughness: 0.5,
        metallic: 0.0,
        // Shells only show their inside; boxes show both faces
        cull_mode: if part.spherical { Some(Face::Front) } else { None },
        double_sided: true,
        ..default()
    }
}

/// Shared highlight overlay: unlit yellow at half opacity
pub fn highlight_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 0.0, 0.5),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        cull_mode: None,
        double_sided: true,
        ..default()
    }
}

/// Pick volume matching the part's rendered geometry
pub fn pick_volume(part: &PartDefinition) -> PickVolume {
    if part.spherical {
        PickVolume::Shell {
            radius: part.radius(),
        }
    } else {
        PickVolume::Box {
            half_extents: Vec3::from(part.size) * 0.5,
        }
    }
}

fn part_mesh(part: &PartDefinition) -> Mesh {
    if part.spherical {
        Sphere::new(part.radius()).mesh().uv(32, 32)
    } else {
        let [x, y, z] = part.size;
        Cuboid::new(x, y, z).into()
    }
}

/// Spawn one mesh entity and one hidden label entity per catalogue entry
pub(crate) fn spawn_parts(
    mut commands: Commands,
    catalogue: Res<PartCatalogue>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut index: ResMut<PartIndex>,
) {
    commands.insert_resource(HighlightMaterial(materials.add(highlight_material())));

    index.0.clear();
    for (i, part) in catalogue.parts().enumerate() {
        let material = materials.add(part_material(part));
        // Parts are roots, so the global transform is known at spawn
        let transform = Transform::from_translation(Vec3::from(part.position));

        let entity = commands
            .spawn((
                Mesh3d(meshes.add(part_mesh(part))),
                MeshMaterial3d(material.clone()),
                transform,
                GlobalTransform::from(transform),
                PartObject {
                    index: i,
                    name: part.name.clone(),
                    description: part.description.clone(),
                    original_material: material,
                },
                pick_volume(part),
                Name::new(part.name.clone()),
            ))
            .id();

        commands.spawn((
            PartLabel {
                part: entity,
                text: part.name.clone(),
            },
            LabelPlacement::default(),
        ));

        index.0.push(entity);
    }

    tracing::info!("Spawned {} eye parts", index.0.len());
}
