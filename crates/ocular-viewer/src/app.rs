//! Bevy application setup

use bevy::prelude::*;
use bevy::winit::WinitSettings;
use bevy_egui::EguiPlugin;
use bevy_picking::DefaultPickingPlugins;
use ocular_core::Catalogue;
use ocular_scene::{OcularScenePlugin, PartCatalogue, UiLayout};
use std::time::Duration;

use crate::ui::UiPlugin;

pub fn run() {
    let catalogue = match Catalogue::builtin() {
        Ok(catalogue) => catalogue,
        Err(e) => {
            tracing::error!("Failed to load part catalogue: {}", e);
            return;
        }
    };
    tracing::info!("Loaded part catalogue with {} parts", catalogue.len());

    App::new()
        .insert_resource(ClearColor(Color::srgb_u8(0xf0, 0xf0, 0xf0)))
        // Start with default continuous rendering - mobile will switch to power-saving mode
        .insert_resource(WinitSettings::default())
        .insert_resource(PartCatalogue(catalogue))
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Eye Anatomy Explorer".to_string(),
                    canvas: Some("#ocular-canvas".to_string()),
                    fit_canvas_to_parent: true,
                    prevent_default_event_handling: false,
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                meta_check: bevy::asset::AssetMetaCheck::Never,
                ..default()
            })
        )
        // Core picking must be registered before EguiPlugin so egui can detect it
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(EguiPlugin::default())
        .init_resource::<UiLayout>()
        .add_plugins(OcularScenePlugin)
        .add_plugins(UiPlugin)
        .add_systems(Update, adjust_power_settings_for_mobile)
        .run();
}

/// On mobile, use power saving mode. On desktop, use continuous rendering for smooth 3D.
fn adjust_power_settings_for_mobile(
    layout: Res<UiLayout>,
    mut winit_settings: ResMut<WinitSettings>,
) {
    if !layout.is_changed() {
        return;
    }

    if layout.is_mobile {
        use bevy::winit::UpdateMode;
        winit_settings.focused_mode = UpdateMode::reactive_low_power(Duration::from_millis(100));
        winit_settings.unfocused_mode = UpdateMode::reactive_low_power(Duration::from_millis(500));
    } else {
        *winit_settings = WinitSettings::default();
    }
}
