//! Ocular Scene - 3D eye model, picking, labels and camera control
//!
//! Builds one mesh per catalogue part, keeps a single part highlighted,
//! projects floating labels into screen space and drives an orbit camera.
//! The viewer crate adds the window, panels and URL options on top.

pub mod camera;
pub mod labels;
pub mod parts;
pub mod picking;
pub mod projection;
pub mod types;
pub mod ui;
pub mod view;

#[cfg(test)]
mod test_support;

use bevy::prelude::*;

/// Frame ordering: pointer input, then commands, then camera, then labels
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewerSet {
    Input,
    Commands,
    Camera,
    Labels,
}

/// Plugin that sets up the eye scene and all its interactions
pub struct OcularScenePlugin;

impl Plugin for OcularScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SelectPart>()
            .add_message::<ClearSelection>()
            .add_message::<ResetView>()
            .add_message::<ApplyViewPreset>()
            .add_message::<ToggleLabels>()
            .configure_sets(
                Update,
                (
                    ViewerSet::Input,
                    ViewerSet::Commands,
                    ViewerSet::Camera,
                    ViewerSet::Labels,
                )
                    .chain(),
            )
            .add_plugins(camera::CameraPlugin)
            .add_plugins(parts::PartsPlugin)
            .add_plugins(picking::PartPickingPlugin)
            .add_plugins(labels::LabelsPlugin)
            .add_plugins(view::ViewPlugin);
    }
}

// Re-export commonly used types
pub use types::*;
pub use camera::{MainCamera, OrbitCamera};
