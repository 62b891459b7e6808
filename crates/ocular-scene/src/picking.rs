//! Part picking and the single-part highlight

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;
use ocular_core::{CameraPose, HighlightChange};

use crate::camera::{egui_wants_pointer, MainCamera, OrbitCamera};
use crate::projection::{clip_from_world, pick_at};
use crate::types::{
    ClearSelection, HighlightMaterial, HighlightState, HoveredPart, InfoPanel, PartObject,
    PickVolume, SelectPart, ViewportSize,
};
use crate::ViewerSet;

/// Cursor travel (logical px) beyond which a press becomes a drag
const CLICK_SLOP: f32 = 5.0;

/// Parts with the material slot the highlight swaps
pub type PartMaterials<'w, 's> = Query<
    'w,
    's,
    (
        &'static PartObject,
        &'static Transform,
        &'static mut MeshMaterial3d<StandardMaterial>,
    ),
>;

pub struct PartPickingPlugin;

impl Plugin for PartPickingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HighlightState>()
            .init_resource::<HoveredPart>()
            .init_resource::<InfoPanel>()
            .init_resource::<PointerState>()
            .init_resource::<PointerSample>()
            .add_systems(
                Update,
                (track_pointer, pick_parts).chain().in_set(ViewerSet::Input),
            )
            .add_systems(
                Update,
                (handle_select_part, handle_clear_selection)
                    .chain()
                    .in_set(ViewerSet::Commands),
            );
    }
}

/// Press tracking for click/tap detection
#[derive(Resource, Default)]
pub struct PointerState {
    /// Where the current press started
    press_position: Option<Vec2>,
    /// Whether the press has moved far enough to count as a drag
    is_dragging: bool,
}

impl PointerState {
    fn press(&mut self, position: Vec2) {
        self.press_position = Some(position);
        self.is_dragging = false;
    }

    fn track(&mut self, position: Vec2) {
        if let Some(start) = self.press_position {
            if position.distance(start) > CLICK_SLOP {
                self.is_dragging = true;
            }
        }
    }

    /// End the press; returns the press position when it was a click
    fn release(&mut self) -> Option<Vec2> {
        let start = self.press_position.take();
        let was_drag = std::mem::take(&mut self.is_dragging);
        start.filter(|_| !was_drag)
    }

    fn cancel(&mut self) {
        self.press_position = None;
        self.is_dragging = false;
    }
}

/// Camera and part queries needed to cast a picking ray
#[derive(SystemParam)]
pub struct PickingParams<'w, 's> {
    camera: Query<'w, 's, (&'static Projection, &'static GlobalTransform), With<MainCamera>>,
    parts: Query<'w, 's, (Entity, &'static GlobalTransform, &'static PickVolume), With<PartObject>>,
    viewport: Res<'w, ViewportSize>,
}

impl PickingParams<'_, '_> {
    /// Nearest part under a cursor position
    pub fn pick(&self, cursor: Vec2) -> Option<Entity> {
        let (projection, camera_transform) = self.camera.single().ok()?;
        let clip = clip_from_world(projection, camera_transform)?;
        pick_at(
            clip,
            cursor,
            self.viewport.as_vec2(),
            self.parts
                .iter()
                .map(|(entity, transform, volume)| (entity, transform.translation(), *volume)),
        )
    }
}

/// Pointer positions gathered this frame for picking
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Cursor over the scene, `None` when it is off-canvas or over a panel
    pub hover: Option<Vec2>,
    /// Press position of a click or tap released this frame
    pub click: Option<Vec2>,
}

/// Turn raw mouse and touch input into a [`PointerSample`]
fn track_pointer(
    windows: Query<&Window, With<PrimaryWindow>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    mut pointer: ResMut<PointerState>,
    mut sample: ResMut<PointerSample>,
    mut contexts: EguiContexts,
) {
    *sample = PointerSample::default();

    if egui_wants_pointer(&mut contexts) {
        pointer.cancel();
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let cursor = window.cursor_position();
    sample.hover = cursor;

    // Mouse
    if mouse_button.just_pressed(MouseButton::Left) {
        if let Some(position) = cursor {
            pointer.press(position);
        }
    } else if mouse_button.pressed(MouseButton::Left) {
        if let Some(position) = cursor {
            pointer.track(position);
        }
    }
    if mouse_button.just_released(MouseButton::Left) {
        sample.click = pointer.release();
    }

    // Touch
    for touch in touch_input.iter_just_pressed() {
        pointer.press(touch.position());
    }
    for touch in touch_input.iter() {
        pointer.track(touch.position());
    }
    for _ in touch_input.iter_just_released() {
        if let Some(position) = pointer.release() {
            sample.click = Some(position);
        }
    }
}

/// Hover picking every frame; click and tap picking on release
pub fn pick_parts(
    picking: PickingParams,
    mut sample: ResMut<PointerSample>,
    mut hovered: ResMut<HoveredPart>,
    mut select: MessageWriter<SelectPart>,
) {
    // Hover only drives labels
    hovered.set_if_neq(HoveredPart(sample.hover.and_then(|c| picking.pick(c))));

    let Some(position) = sample.click.take() else {
        return;
    };

    // A miss leaves the selection alone
    match picking.pick(position) {
        Some(entity) => {
            select.write(SelectPart(entity));
        }
        None => tracing::trace!("Click at {:?} hit no part", position),
    }
}

/// Restore the previous part's material, then apply the highlight
pub fn apply_highlight_change(
    change: HighlightChange<Entity>,
    highlight: &Handle<StandardMaterial>,
    parts: &mut PartMaterials,
) {
    if let Some(previous) = change.restore {
        if let Ok((part, _, mut material)) = parts.get_mut(previous) {
            material.0 = part.original_material.clone();
        }
    }
    if let Some(next) = change.apply {
        if let Ok((_, _, mut material)) = parts.get_mut(next) {
            material.0 = highlight.clone();
        }
    }
}

/// Highlight the part, show its description and focus the camera on it
pub fn handle_select_part(
    mut messages: MessageReader<SelectPart>,
    mut highlight: ResMut<HighlightState>,
    mut info: ResMut<InfoPanel>,
    mut orbit: ResMut<OrbitCamera>,
    highlight_material: Res<HighlightMaterial>,
    mut parts: PartMaterials,
) {
    for SelectPart(entity) in messages.read().copied() {
        let (panel, position) = match parts.get(entity) {
            Ok((part, transform, _)) => (InfoPanel::for_part(part), transform.translation),
            Err(_) => {
                tracing::warn!("Ignoring selection of unknown entity {:?}", entity);
                continue;
            }
        };

        let change = highlight.0.select(entity);
        apply_highlight_change(change, &highlight_material.0, &mut parts);

        orbit.focus_on(CameraPose::focusing(position.to_array()));
        tracing::info!("Selected part: {}", panel.title);
        *info = panel;
    }
}

/// Drop the highlight on `ClearSelection` or Escape
pub fn handle_clear_selection(
    mut messages: MessageReader<ClearSelection>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut highlight: ResMut<HighlightState>,
    mut info: ResMut<InfoPanel>,
    highlight_material: Res<HighlightMaterial>,
    mut parts: PartMaterials,
) {
    let requested = messages.read().count() > 0;
    if !requested && !keyboard.just_pressed(KeyCode::Escape) {
        return;
    }

    let change = highlight.0.clear();
    if change.is_noop() {
        return;
    }
    apply_highlight_change(change, &highlight_material.0, &mut parts);
    *info = InfoPanel::default();
    tracing::info!("Selection cleared");
}
