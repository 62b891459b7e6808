//! Reset and named camera views

use bevy::prelude::*;
use ocular_core::{CameraPose, ViewPreset};

use crate::camera::OrbitCamera;
use crate::picking::{handle_select_part, PartMaterials};
use crate::types::{ActiveViewPreset, ApplyViewPreset, HighlightState, InfoPanel, ResetView};
use crate::ViewerSet;

pub struct ViewPlugin;

impl Plugin for ViewPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveViewPreset>().add_systems(
            Update,
            (handle_reset_view, handle_view_presets)
                .chain()
                .before(handle_select_part)
                .in_set(ViewerSet::Commands),
        );
    }
}

/// Default camera, no highlight, default info panel
pub fn handle_reset_view(
    mut messages: MessageReader<ResetView>,
    mut orbit: ResMut<OrbitCamera>,
    mut highlight: ResMut<HighlightState>,
    mut info: ResMut<InfoPanel>,
    mut active: ResMut<ActiveViewPreset>,
    mut parts: PartMaterials,
) {
    if messages.read().count() == 0 {
        return;
    }

    orbit.snap_to(CameraPose::DEFAULT);
    highlight.0.clear();

    // Every part back to its own material, not only the last highlighted one
    for (part, _, mut material) in parts.iter_mut() {
        if material.0 != part.original_material {
            material.0 = part.original_material.clone();
        }
    }

    *info = InfoPanel::default();
    active.0 = ViewPreset::Front;
    tracing::info!("View reset");
}

pub fn handle_view_presets(
    mut messages: MessageReader<ApplyViewPreset>,
    mut orbit: ResMut<OrbitCamera>,
    mut active: ResMut<ActiveViewPreset>,
) {
    let Some(ApplyViewPreset(preset)) = messages.read().last().copied() else {
        return;
    };

    orbit.snap_to(preset.pose());
    active.0 = preset;
    tracing::info!("Switched to {} view", preset);
}
