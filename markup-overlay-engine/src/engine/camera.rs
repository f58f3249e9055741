use bevy::prelude::*;

/// Immutable camera state captured once per input callback.
///
/// Every operation that needs the camera receives one of these instead of
/// reaching for ambient viewer state, which keeps the picking and
/// projection math pure and testable.
#[derive(Debug, Clone)]
pub struct CameraSnapshot {
    pub position: Vec3,
    pub view_from_world: Mat4,
    pub clip_from_view: Mat4,
    pub is_perspective: bool,
    /// Logical viewport size in pixels.
    pub viewport: Vec2,
}

/// World-space pointer ray. Direction is unit length.
#[derive(Debug, Clone, Copy)]
pub struct PointerRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl CameraSnapshot {
    /// Capture the host camera. Returns `None` while the viewport has no
    /// size yet (window minimised or not created).
    pub fn from_camera(
        camera: &Camera,
        transform: &GlobalTransform,
        projection: &Projection,
    ) -> Option<Self> {
        let viewport = camera.logical_viewport_size()?;
        Some(Self {
            position: transform.translation(),
            view_from_world: transform.compute_matrix().inverse(),
            clip_from_view: camera.clip_from_view(),
            is_perspective: matches!(projection, Projection::Perspective(_)),
            viewport,
        })
    }

    /// Viewport pixel coordinates (origin top-left, y down) to NDC in
    /// [-1, 1] (y up).
    pub fn viewport_to_ndc(&self, cursor: Vec2) -> Vec2 {
        Vec2::new(
            (cursor.x / self.viewport.x) * 2.0 - 1.0,
            -((cursor.y / self.viewport.y) * 2.0 - 1.0),
        )
    }

    /// Unproject an NDC point (including depth) back into world space.
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        let world_from_ndc = (self.clip_from_view * self.view_from_world).inverse();
        world_from_ndc.project_point3(ndc)
    }

    /// Camera forward axis in world space.
    pub fn forward(&self) -> Vec3 {
        let world_from_view = self.view_from_world.inverse();
        (-world_from_view.z_axis.truncate()).normalize()
    }

    /// Build the picking ray for a pointer position.
    ///
    /// Perspective rays emanate from the camera position through the
    /// unprojected pointer point; orthographic rays are parallel, starting
    /// on the near plane and travelling along the camera forward axis.
    pub fn pointer_ray(&self, cursor: Vec2) -> PointerRay {
        let ndc = self.viewport_to_ndc(cursor);
        if self.is_perspective {
            let point = self.unproject(ndc.extend(0.5));
            PointerRay {
                origin: self.position,
                direction: (point - self.position).normalize(),
            }
        } else {
            // Unproject both depth extremes and keep whichever lies on the
            // near side, so the origin never starts past scene geometry.
            let direction = self.forward();
            let a = self.unproject(ndc.extend(0.0));
            let b = self.unproject(ndc.extend(1.0));
            let origin = if (b - a).dot(direction) > 0.0 { a } else { b };
            PointerRay { origin, direction }
        }
    }

    /// Project a world point to NDC. `None` when the point is behind the
    /// camera plane.
    pub fn world_to_ndc(&self, world: Vec3) -> Option<Vec3> {
        let clip = self.clip_from_view * self.view_from_world * world.extend(1.0);
        (clip.w > f32::EPSILON).then(|| clip.truncate() / clip.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perspective_snapshot(eye: Vec3, target: Vec3) -> CameraSnapshot {
        CameraSnapshot {
            position: eye,
            view_from_world: Mat4::look_at_rh(eye, target, Vec3::Y),
            clip_from_view: Mat4::perspective_rh(60f32.to_radians(), 4.0 / 3.0, 0.1, 1000.0),
            is_perspective: true,
            viewport: Vec2::new(1024.0, 768.0),
        }
    }

    #[test]
    fn viewport_center_maps_to_ndc_origin() {
        let cam = perspective_snapshot(Vec3::ZERO, Vec3::NEG_Z);
        let ndc = cam.viewport_to_ndc(Vec2::new(512.0, 384.0));
        assert!(ndc.length() < 1e-6);
    }

    #[test]
    fn viewport_top_left_flips_vertical_axis() {
        let cam = perspective_snapshot(Vec3::ZERO, Vec3::NEG_Z);
        let ndc = cam.viewport_to_ndc(Vec2::ZERO);
        assert!((ndc - Vec2::new(-1.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn perspective_center_ray_points_at_target() {
        let eye = Vec3::new(10.0, 3.0, 50.0);
        let cam = perspective_snapshot(eye, Vec3::new(10.0, 3.0, 0.0));
        let ray = cam.pointer_ray(Vec2::new(512.0, 384.0));
        assert!((ray.origin - eye).length() < 1e-4);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn orthographic_rays_are_parallel_and_offset() {
        let cam = CameraSnapshot {
            position: Vec3::ZERO,
            view_from_world: Mat4::IDENTITY,
            clip_from_view: Mat4::orthographic_rh(-50.0, 50.0, -37.5, 37.5, 0.1, 1000.0),
            is_perspective: false,
            viewport: Vec2::new(800.0, 600.0),
        };
        let center = cam.pointer_ray(Vec2::new(400.0, 300.0));
        let right = cam.pointer_ray(Vec2::new(800.0, 300.0));
        assert!((center.direction - Vec3::NEG_Z).length() < 1e-4);
        assert!((right.direction - center.direction).length() < 1e-6);
        // Half the ortho width to the right of the center ray.
        assert!((right.origin.x - center.origin.x - 50.0).abs() < 1e-3);
        // Origin sits on the near plane, in front of scene depth.
        assert!(center.origin.z > -1.0);
    }

    #[test]
    fn world_to_ndc_rejects_points_behind_camera() {
        let cam = perspective_snapshot(Vec3::ZERO, Vec3::NEG_Z);
        assert!(cam.world_to_ndc(Vec3::new(0.0, 0.0, 10.0)).is_none());
        let ndc = cam.world_to_ndc(Vec3::new(0.0, 0.0, -10.0)).unwrap();
        assert!(ndc.truncate().length() < 1e-5);
    }
}
