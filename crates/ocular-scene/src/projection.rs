//! Screen/world conversions used by picking and labels
//!
//! Conventions: viewport coordinates are logical pixels with the origin at
//! the top-left corner; NDC x and y are in -1..1 with +y up; NDC depth uses
//! the reverse-Z perspective projection (near plane at 1, infinity at 0).

use bevy::math::bounding::{Aabb3d, RayCast3d};
use bevy::prelude::*;

use crate::types::PickVolume;

/// Cursor position to normalized device coordinates
pub fn cursor_to_ndc(cursor: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        (cursor.x / viewport.x) * 2.0 - 1.0,
        -(cursor.y / viewport.y) * 2.0 + 1.0,
    )
}

/// NDC to viewport pixels
pub fn ndc_to_viewport(ndc: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        (ndc.x * 0.5 + 0.5) * viewport.x,
        (ndc.y * -0.5 + 0.5) * viewport.y,
    )
}

/// Depth threshold for "in front of the camera"
pub fn is_in_front(ndc_depth: f32) -> bool {
    ndc_depth > 0.0 && ndc_depth <= 1.0
}

/// Matrix taking world space to clip space, `None` for non-perspective cameras
pub fn clip_from_world(projection: &Projection, camera_transform: &GlobalTransform) -> Option<Mat4> {
    let Projection::Perspective(perspective) = projection else {
        return None;
    };
    let clip_from_view = Mat4::perspective_infinite_reverse_rh(
        perspective.fov,
        perspective.aspect_ratio,
        perspective.near,
    );
    let view_from_world = Mat4::from(camera_transform.affine().inverse());
    Some(clip_from_view * view_from_world)
}

/// Project a world point to viewport pixels, `None` when behind the camera
pub fn project_to_viewport(clip_from_world: Mat4, world: Vec3, viewport: Vec2) -> Option<Vec2> {
    let ndc = clip_from_world.project_point3(world);
    if !ndc.is_finite() || !is_in_front(ndc.z) {
        return None;
    }
    Some(ndc_to_viewport(ndc.truncate(), viewport))
}

/// Ray from the camera through an NDC point
pub fn ray_from_ndc(clip_from_world: Mat4, ndc: Vec2) -> Option<Ray3d> {
    let world_from_clip = clip_from_world.inverse();
    let near = world_from_clip.project_point3(ndc.extend(1.0));
    let far = world_from_clip.project_point3(ndc.extend(f32::EPSILON));
    if !near.is_finite() || !far.is_finite() {
        return None;
    }
    let direction = Dir3::new(far - near).ok()?;
    Some(Ray3d::new(near, direction))
}

impl PickVolume {
    /// Distance along `ray` to the surface that counts as a hit
    pub fn ray_distance(&self, center: Vec3, ray: Ray3d) -> Option<f32> {
        match *self {
            PickVolume::Box { half_extents } => {
                let aabb = Aabb3d::new(center, half_extents);
                RayCast3d::from_ray(ray, f32::MAX).aabb_intersection_at(&aabb)
            }
            PickVolume::Shell { radius } => {
                // Far root of |o + t*d - c| = r
                let oc = ray.origin - center;
                let b = oc.dot(*ray.direction);
                let c = oc.length_squared() - radius * radius;
                let discriminant = b * b - c;
                if discriminant < 0.0 {
                    return None;
                }
                let t_far = -b + discriminant.sqrt();
                (t_far >= 0.0).then_some(t_far)
            }
        }
    }
}

/// Nearest part hit by `ray`
pub fn nearest_hit<I>(ray: Ray3d, candidates: I) -> Option<(Entity, f32)>
where
    I: IntoIterator<Item = (Entity, Vec3, PickVolume)>,
{
    candidates
        .into_iter()
        .filter_map(|(entity, center, volume)| {
            volume.ray_distance(center, ray).map(|t| (entity, t))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Nearest part under a cursor position
pub fn pick_at<I>(clip_from_world: Mat4, cursor: Vec2, viewport: Vec2, candidates: I) -> Option<Entity>
where
    I: IntoIterator<Item = (Entity, Vec3, PickVolume)>,
{
    let ray = ray_from_ndc(clip_from_world, cursor_to_ndc(cursor, viewport))?;
    nearest_hit(ray, candidates).map(|(entity, _)| entity)
}

/// Width over height, `None` for a degenerate viewport
pub fn aspect_ratio(width: f32, height: f32) -> Option<f32> {
    (width > 0.0 && height > 0.0).then(|| width / height)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn clip_from_world_for(eye: Vec3, target: Vec3) -> Mat4 {
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::perspective_infinite_reverse_rh(75f32.to_radians(), VIEWPORT.x / VIEWPORT.y, 0.1);
        proj * view
    }

    #[test]
    fn test_clip_from_world_perspective_only() {
        let transform = Transform::from_xyz(0.0, 0.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y);
        let projection = Projection::Perspective(PerspectiveProjection {
            fov: 75f32.to_radians(),
            near: 0.1,
            aspect_ratio: VIEWPORT.x / VIEWPORT.y,
            ..default()
        });

        let m = clip_from_world(&projection, &GlobalTransform::from(transform)).unwrap();
        let expected = clip_from_world_for(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        assert!(m.abs_diff_eq(expected, 1e-5));

        let ortho = Projection::Orthographic(OrthographicProjection::default_3d());
        assert!(clip_from_world(&ortho, &GlobalTransform::IDENTITY).is_none());
    }

    #[test]
    fn test_cursor_to_ndc() {
        assert_eq!(cursor_to_ndc(Vec2::ZERO, VIEWPORT), Vec2::new(-1.0, 1.0));
        assert_eq!(cursor_to_ndc(Vec2::new(400.0, 300.0), VIEWPORT), Vec2::ZERO);
        assert_eq!(cursor_to_ndc(VIEWPORT, VIEWPORT), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_ndc_viewport_inverse() {
        let cursor = Vec2::new(123.0, 456.0);
        let back = ndc_to_viewport(cursor_to_ndc(cursor, VIEWPORT), VIEWPORT);
        assert!((back - cursor).length() < 1e-3);
    }

    #[test]
    fn test_project_center_and_behind() {
        let m = clip_from_world_for(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);

        let center = project_to_viewport(m, Vec3::ZERO, VIEWPORT).unwrap();
        assert!((center - Vec2::new(400.0, 300.0)).length() < 1e-3);

        // Above the target lands above the screen centre
        let above = project_to_viewport(m, Vec3::new(0.0, 1.0, 0.0), VIEWPORT).unwrap();
        assert!(above.y < 300.0);

        // Behind the camera
        assert!(project_to_viewport(m, Vec3::new(0.0, 0.0, 10.0), VIEWPORT).is_none());
    }

    #[test]
    fn test_ray_through_center() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let m = clip_from_world_for(eye, Vec3::ZERO);
        let ray = ray_from_ndc(m, Vec2::ZERO).unwrap();

        assert!((ray.origin.x).abs() < 1e-4 && (ray.origin.y).abs() < 1e-4);
        assert!((ray.origin.z - 4.9).abs() < 1e-3);
        assert!((*ray.direction - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn test_box_and_shell_distances() {
        let ray = Ray3d::new(Vec3::new(0.0, 0.0, 5.0), Dir3::NEG_Z);

        let cornea = PickVolume::Box {
            half_extents: Vec3::new(0.6, 0.6, 0.05),
        };
        let t = cornea.ray_distance(Vec3::new(0.0, 0.0, 1.5), ray).unwrap();
        assert!((t - 3.45).abs() < 1e-4);

        // Shell is hit where the ray leaves it
        let sclera = PickVolume::Shell { radius: 2.0 };
        let t = sclera.ray_distance(Vec3::ZERO, ray).unwrap();
        assert!((t - 7.0).abs() < 1e-4);

        // Misses
        let off_axis = Ray3d::new(Vec3::new(3.0, 0.0, 5.0), Dir3::NEG_Z);
        assert!(cornea.ray_distance(Vec3::new(0.0, 0.0, 1.5), off_axis).is_none());
        assert!(sclera.ray_distance(Vec3::ZERO, off_axis).is_none());

        // Shell entirely behind the ray origin
        let away = Ray3d::new(Vec3::new(0.0, 0.0, 5.0), Dir3::Z);
        assert!(sclera.ray_distance(Vec3::ZERO, away).is_none());
    }

    #[test]
    fn test_nearest_hit_prefers_enclosed_part() {
        let ray = Ray3d::new(Vec3::new(0.0, 0.0, 5.0), Dir3::NEG_Z);
        let mut world = World::new();
        let sclera = world.spawn_empty().id();
        let cornea = world.spawn_empty().id();
        let pupil = world.spawn_empty().id();

        let hit = nearest_hit(
            ray,
            [
                (sclera, Vec3::ZERO, PickVolume::Shell { radius: 2.0 }),
                (pupil, Vec3::new(0.0, 0.0, 1.35), PickVolume::Box { half_extents: Vec3::new(0.15, 0.15, 0.05) }),
                (cornea, Vec3::new(0.0, 0.0, 1.5), PickVolume::Box { half_extents: Vec3::new(0.6, 0.6, 0.05) }),
            ],
        );
        assert_eq!(hit.map(|(e, _)| e), Some(cornea));

        let miss = nearest_hit(
            Ray3d::new(Vec3::new(10.0, 0.0, 5.0), Dir3::NEG_Z),
            [(sclera, Vec3::ZERO, PickVolume::Shell { radius: 2.0 })],
        );
        assert!(miss.is_none());
    }

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(aspect_ratio(1600.0, 900.0), Some(1600.0 / 900.0));
        assert_eq!(aspect_ratio(800.0, 0.0), None);
    }
}
