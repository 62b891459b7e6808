//! Shared resources, components and messages for the viewer

use bevy::prelude::*;
use ocular_core::{Catalogue, Selection, ViewPreset};

/// Schematic shown on the default info panel
pub const EYE_DIAGRAM_URL: &str = "https://upload.wikimedia.org/wikipedia/commons/thumb/1/1e/Schematic_diagram_of_the_human_eye_en.svg/1200px-Schematic_diagram_of_the_human_eye_en.svg.png";

/// The catalogue the scene was built from
#[derive(Debug, Clone, Resource, Deref)]
pub struct PartCatalogue(pub Catalogue);

/// A renderable anatomical part, one per catalogue entry
#[derive(Debug, Clone, Component)]
pub struct PartObject {
    /// Index into the catalogue
    pub index: usize,
    pub name: String,
    pub description: String,
    /// Material the part was built with, restored on deselection
    pub original_material: Handle<StandardMaterial>,
}

/// Analytic shape a picking ray is tested against
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub enum PickVolume {
    /// Axis-aligned box around the part position
    Box { half_extents: Vec3 },
    /// Sphere rendered back-face-only; hit on its far side
    Shell { radius: f32 },
}

/// Screen-space label bound to exactly one part
#[derive(Debug, Clone, Component)]
pub struct PartLabel {
    pub part: Entity,
    pub text: String,
}

/// Where and whether a label is drawn this frame
#[derive(Debug, Clone, Copy, PartialEq, Component, Default)]
pub struct LabelPlacement {
    pub visible: bool,
    /// Top-left corner in logical pixels
    pub position: Vec2,
    /// Drawn emphasised (pointer is over the part)
    pub emphasized: bool,
}

/// Part entities in catalogue order
#[derive(Debug, Clone, Resource, Default)]
pub struct PartIndex(pub Vec<Entity>);

impl PartIndex {
    pub fn entity(&self, index: usize) -> Option<Entity> {
        self.0.get(index).copied()
    }
}

/// The single highlighted part
#[derive(Debug, Clone, Resource, Default)]
pub struct HighlightState(pub Selection<Entity>);

/// Part currently under the pointer
#[derive(Debug, Clone, Resource, Default, PartialEq, Eq)]
pub struct HoveredPart(pub Option<Entity>);

/// Shared translucent material applied to the highlighted part
#[derive(Debug, Clone, Resource)]
pub struct HighlightMaterial(pub Handle<StandardMaterial>);

/// Global label switch; off overrides per-frame visibility
#[derive(Debug, Clone, Resource)]
pub struct LabelSettings {
    pub visible: bool,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self { visible: true }
    }
}

/// Title and description shown in the info panel
#[derive(Debug, Clone, Resource, PartialEq)]
pub struct InfoPanel {
    pub title: String,
    pub description: String,
    /// Link to the schematic diagram (default panel only)
    pub diagram_url: Option<String>,
}

impl Default for InfoPanel {
    fn default() -> Self {
        Self {
            title: "Eye Anatomy".to_string(),
            description: "Click on any part of the eye to learn about its structure and function."
                .to_string(),
            diagram_url: Some(EYE_DIAGRAM_URL.to_string()),
        }
    }
}

impl InfoPanel {
    pub fn for_part(part: &PartObject) -> Self {
        Self {
            title: part.name.clone(),
            description: part.description.clone(),
            diagram_url: None,
        }
    }
}

/// Size of the rendering viewport in logical pixels
#[derive(Debug, Clone, Copy, Resource, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl ViewportSize {
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Screen-size dependent panel layout
#[derive(Debug, Clone, Resource)]
pub struct UiLayout {
    pub is_mobile: bool,
    pub screen_width: f32,
    pub screen_height: f32,
    pub show_left_panel: bool,
    pub show_right_panel: bool,
}

impl Default for UiLayout {
    fn default() -> Self {
        Self {
            is_mobile: false,
            screen_width: 1280.0,
            screen_height: 720.0,
            show_left_panel: true,
            show_right_panel: true,
        }
    }
}

impl UiLayout {
    pub fn update_from_window(&mut self, width: f32, height: f32) {
        self.screen_width = width;
        self.screen_height = height;
        // Narrow or portrait screens get the mobile layout
        self.is_mobile = width < 800.0 || (height > width * 1.2);
    }

    pub fn left_panel_width(&self) -> f32 {
        if self.is_mobile {
            self.screen_width * 0.85
        } else {
            240.0
        }
    }

    pub fn right_panel_width(&self) -> f32 {
        if self.is_mobile {
            self.screen_width * 0.85
        } else {
            300.0
        }
    }

    pub fn ui_scale(&self) -> f32 {
        if self.is_mobile { 1.2 } else { 1.0 }
    }
}

/// Preset last chosen in the view selector
#[derive(Debug, Clone, Copy, Resource, Default, PartialEq, Eq)]
pub struct ActiveViewPreset(pub ViewPreset);

/// Highlight a part, focus the camera on it and show its description
#[derive(Debug, Clone, Copy, Message)]
pub struct SelectPart(pub Entity);

/// Drop the highlight without moving the camera
#[derive(Debug, Clone, Copy, Message)]
pub struct ClearSelection;

/// Default camera, no highlight, default info panel
#[derive(Debug, Clone, Copy, Message)]
pub struct ResetView;

/// Jump to a named camera view
#[derive(Debug, Clone, Copy, Message)]
pub struct ApplyViewPreset(pub ViewPreset);

/// Flip the global label switch
#[derive(Debug, Clone, Copy, Message)]
pub struct ToggleLabels;
