//! Camera controls and orbit navigation

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use bevy_egui::EguiContexts;
use ocular_core::CameraPose;

use crate::projection::aspect_ratio;
use crate::types::ViewportSize;
use crate::ViewerSet;

const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 50.0;
const MAX_ELEVATION: f32 = 1.5;

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Orbit controller state (Y up)
///
/// Input edits the goal values (`target_*`, `target_focus`); the rendered
/// values approach them with exponential damping.
#[derive(Debug, Clone, Resource)]
pub struct OrbitCamera {
    pub distance: f32,
    pub target_distance: f32,
    pub azimuth: f32,
    pub target_azimuth: f32,
    pub elevation: f32,
    pub target_elevation: f32,
    /// Point the camera looks at
    pub target: Vec3,
    pub target_focus: Vec3,
    pub sensitivity: f32,
    pub zoom_speed: f32,
    pub smooth_factor: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        let mut orbit = Self {
            distance: 5.0,
            target_distance: 5.0,
            azimuth: 0.0,
            target_azimuth: 0.0,
            elevation: 0.0,
            target_elevation: 0.0,
            target: Vec3::ZERO,
            target_focus: Vec3::ZERO,
            sensitivity: 0.005,
            zoom_speed: 0.1,
            smooth_factor: 0.05,
        };
        orbit.snap_to(CameraPose::DEFAULT);
        orbit
    }
}

impl OrbitCamera {
    /// Jump to a pose immediately
    pub fn snap_to(&mut self, pose: CameraPose) {
        let target = Vec3::from(pose.target);
        let (distance, azimuth, elevation) = orbit_from_pose(Vec3::from(pose.position), target);
        self.distance = distance;
        self.target_distance = distance;
        self.azimuth = azimuth;
        self.target_azimuth = azimuth;
        self.elevation = elevation;
        self.target_elevation = elevation;
        self.target = target;
        self.target_focus = target;
    }

    /// Glide towards a pose over the next frames
    pub fn focus_on(&mut self, pose: CameraPose) {
        let target = Vec3::from(pose.target);
        let (distance, azimuth, elevation) = orbit_from_pose(Vec3::from(pose.position), target);
        self.target_distance = distance;
        // Shortest way round
        self.target_azimuth = self.azimuth + wrap_angle(azimuth - self.azimuth);
        self.target_elevation = elevation;
        self.target_focus = target;
    }

    /// Current camera position
    pub fn position(&self) -> Vec3 {
        orbit_position(self.target, self.distance, self.azimuth, self.elevation)
    }

    /// Position the camera settles at
    pub fn goal_position(&self) -> Vec3 {
        orbit_position(
            self.target_focus,
            self.target_distance,
            self.target_azimuth,
            self.target_elevation,
        )
    }

    pub fn rotate(&mut self, delta: Vec2) {
        self.target_azimuth -= delta.x * self.sensitivity;
        self.target_elevation = (self.target_elevation + delta.y * self.sensitivity)
            .clamp(-MAX_ELEVATION, MAX_ELEVATION);
    }

    pub fn pan(&mut self, delta: Vec2) {
        let right = Vec3::new(self.azimuth.cos(), 0.0, -self.azimuth.sin());
        let pan_speed = self.distance * 0.002;
        self.target_focus -= right * delta.x * pan_speed;
        self.target_focus += Vec3::Y * delta.y * pan_speed;
    }

    /// Positive `amount` zooms in
    pub fn zoom(&mut self, amount: f32) {
        let zoom_factor = 1.0 - amount * self.zoom_speed;
        self.target_distance = (self.target_distance * zoom_factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Advance the damped values by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        let lerp_factor = 1.0 - (-self.smooth_factor * 60.0 * dt).exp();
        self.distance += (self.target_distance - self.distance) * lerp_factor;
        self.azimuth += (self.target_azimuth - self.azimuth) * lerp_factor;
        self.elevation += (self.target_elevation - self.elevation) * lerp_factor;
        self.target += (self.target_focus - self.target) * lerp_factor;
    }
}

/// Camera position on a sphere around `target`
///
/// Azimuth 0 and elevation 0 put the camera on +Z.
pub fn orbit_position(target: Vec3, distance: f32, azimuth: f32, elevation: f32) -> Vec3 {
    target
        + distance
            * Vec3::new(
                elevation.cos() * azimuth.sin(),
                elevation.sin(),
                elevation.cos() * azimuth.cos(),
            )
}

/// Inverse of [`orbit_position`]: (distance, azimuth, elevation)
pub fn orbit_from_pose(position: Vec3, target: Vec3) -> (f32, f32, f32) {
    let offset = position - target;
    let distance = offset.length().max(MIN_DISTANCE);
    let elevation = (offset.y / distance)
        .clamp(-1.0, 1.0)
        .asin()
        .clamp(-MAX_ELEVATION, MAX_ELEVATION);
    let azimuth = offset.x.atan2(offset.z);
    (distance, azimuth, elevation)
}

fn wrap_angle(angle: f32) -> f32 {
    (angle + std::f32::consts::PI).rem_euclid(std::f32::consts::TAU) - std::f32::consts::PI
}

/// Plugin for camera controls
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitCamera>()
            .init_resource::<ViewportSize>()
            .add_systems(Startup, (spawn_camera, init_viewport_size))
            .add_systems(
                Update,
                (sync_viewport, update_camera)
                    .chain()
                    .in_set(ViewerSet::Camera),
            );
    }
}

/// 75° vertical field of view, near plane at 0.1
pub fn viewer_projection(aspect_ratio: f32) -> Projection {
    Projection::Perspective(PerspectiveProjection {
        fov: 75f32.to_radians(),
        near: 0.1,
        aspect_ratio,
        ..default()
    })
}

fn spawn_camera(mut commands: Commands, orbit: Res<OrbitCamera>, viewport: Res<ViewportSize>) {
    let aspect = aspect_ratio(viewport.width, viewport.height).unwrap_or(1.0);
    commands.spawn((
        Camera3d::default(),
        viewer_projection(aspect),
        Transform::from_translation(orbit.position()).looking_at(orbit.target, Vec3::Y),
        MainCamera,
    ));
}

fn init_viewport_size(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<ViewportSize>,
) {
    if let Ok(window) = windows.single() {
        viewport.width = window.width();
        viewport.height = window.height();
    }
}

/// Keep the viewport size and projection aspect ratio in step with the window
fn sync_viewport(
    mut resized: MessageReader<WindowResized>,
    mut viewport: ResMut<ViewportSize>,
    mut projections: Query<&mut Projection, With<MainCamera>>,
) {
    let Some(last) = resized.read().last() else {
        return;
    };

    let Some(aspect) = aspect_ratio(last.width, last.height) else {
        tracing::debug!("Ignoring degenerate resize {}x{}", last.width, last.height);
        return;
    };

    viewport.width = last.width;
    viewport.height = last.height;

    for mut projection in projections.iter_mut() {
        if let Projection::Perspective(perspective) = &mut *projection {
            perspective.aspect_ratio = aspect;
        }
    }

    tracing::debug!("Viewport resized to {}x{}", last.width, last.height);
}

/// Whether egui is using the pointer (panels, combo boxes)
pub fn egui_wants_pointer(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false)
}

fn update_camera(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut orbit: ResMut<OrbitCamera>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    time: Res<Time>,
    mut contexts: EguiContexts,
) {
    let ui_has_pointer = egui_wants_pointer(&mut contexts);

    if !ui_has_pointer {
        // Orbit with left drag
        if mouse_button.pressed(MouseButton::Left) {
            orbit.rotate(mouse_motion.delta);
        }

        // Pan with right drag
        if mouse_button.pressed(MouseButton::Right) {
            orbit.pan(mouse_motion.delta);
        }

        let scroll = match mouse_scroll.unit {
            MouseScrollUnit::Line => mouse_scroll.delta.y,
            MouseScrollUnit::Pixel => mouse_scroll.delta.y / 100.0,
        };
        if scroll != 0.0 {
            orbit.zoom(scroll);
        }

        // One finger rotates
        if touch_input.iter().count() == 1 {
            for touch in touch_input.iter() {
                let delta = touch.delta();
                if delta != Vec2::ZERO {
                    orbit.rotate(delta);
                }
            }
        }
    }

    // Pinch to zoom
    let touches: Vec<_> = touch_input.iter().collect();
    if let [t1, t2] = touches.as_slice() {
        let curr_dist = t1.position().distance(t2.position());
        let prev_dist = (t1.position() - t1.delta()).distance(t2.position() - t2.delta());
        let zoom_factor = prev_dist / curr_dist.max(1.0);
        orbit.target_distance = (orbit.target_distance * zoom_factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    orbit.step(time.delta_secs());

    if let Ok(mut transform) = camera_query.single_mut() {
        transform.translation = orbit.position();
        transform.look_at(orbit.target, Vec3::Y);
    }
}
