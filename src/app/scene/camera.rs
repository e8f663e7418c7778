use eframe::egui::{Pos2, Rect, Vec2, pos2};
use glam::{Mat4, Vec3, Vec4Swizzles};

const MIN_DISTANCE: f32 = 20.0;
const MAX_DISTANCE: f32 = 120.0;
const INITIAL_DISTANCE: f32 = 90.0;
const FOV_Y_DEGREES: f32 = 60.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 1_000.0;
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.05;
const DAMPING: f32 = 0.05;
const ROTATE_SENSITIVITY: f32 = 0.005;
const ZOOM_SENSITIVITY: f32 = 0.0015;

/// A point projected to the screen.
#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct Projected {
    pub(in crate::app) pos: Pos2,
    /// Distance from the eye along the view direction.
    pub(in crate::app) depth: f32,
    /// Screen pixels per world unit at this depth.
    pub(in crate::app) scale: f32,
}

/// Orbit camera around the origin with damped drag rotation, clamped zoom and
/// optional auto-rotation.
#[derive(Clone, Debug)]
pub(in crate::app) struct OrbitCamera {
    yaw: f32,
    pitch: f32,
    distance: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    auto_rotate: bool,
    auto_rotate_speed: f32,
    fov_y: f32,
}

impl OrbitCamera {
    pub(in crate::app) fn new(auto_rotate: bool) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: INITIAL_DISTANCE,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            auto_rotate,
            auto_rotate_speed: 0.5,
            fov_y: FOV_Y_DEGREES.to_radians(),
        }
    }

    pub(in crate::app) fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    pub(in crate::app) fn set_auto_rotate(&mut self, enabled: bool) {
        self.auto_rotate = enabled;
    }

    pub(in crate::app) fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch) * self.distance
    }

    /// Feeds a pointer drag in screen pixels.
    pub(in crate::app) fn drag(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw_velocity -= delta_x * ROTATE_SENSITIVITY;
        self.pitch_velocity += delta_y * ROTATE_SENSITIVITY;
    }

    /// Positive scroll moves the eye closer.
    pub(in crate::app) fn zoom(&mut self, scroll: f32) {
        let factor = (1.0 - scroll * ZOOM_SENSITIVITY).clamp(0.5, 2.0);
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Advances damping and auto-rotation by one frame of `dt` seconds.
    pub(in crate::app) fn update(&mut self, dt: f32, allow_auto_rotate: bool) {
        if self.auto_rotate && allow_auto_rotate {
            // a full turn every 60 / speed seconds
            self.yaw += std::f32::consts::TAU * self.auto_rotate_speed / 60.0 * dt;
        }

        self.yaw += self.yaw_velocity * DAMPING;
        self.pitch = (self.pitch + self.pitch_velocity * DAMPING).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw_velocity *= 1.0 - DAMPING;
        self.pitch_velocity *= 1.0 - DAMPING;
    }

    /// World displacement under a screen drag of `delta` pixels, taken in the
    /// view plane at a depth where one world unit spans `scale` pixels.
    pub(in crate::app) fn screen_delta_to_world(&self, delta: Vec2, scale: f32) -> Vec3 {
        let forward = (-self.eye()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        (right * delta.x - up * delta.y) / scale.max(1e-6)
    }

    fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect.max(1e-6), NEAR, FAR)
    }

    /// Projects a world point into `rect`. Returns `None` behind the camera.
    pub(in crate::app) fn project(&self, point: Vec3, rect: Rect) -> Option<Projected> {
        let view_point = self.view() * point.extend(1.0);
        let depth = -view_point.z;
        if depth <= NEAR {
            return None;
        }

        let clip = self.projection(rect.width() / rect.height()) * view_point;
        let ndc = clip.xyz() / clip.w;
        let center = rect.center();
        let pos = pos2(
            center.x + ndc.x * rect.width() * 0.5,
            center.y - ndc.y * rect.height() * 0.5,
        );
        let scale = rect.height() * 0.5 / ((self.fov_y * 0.5).tan() * depth);

        Some(Projected { pos, depth, scale })
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    fn viewport() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0))
    }

    #[test]
    fn starts_at_ninety_looking_at_origin() {
        let camera = OrbitCamera::new(true);
        assert!((camera.eye() - Vec3::new(0.0, 0.0, 90.0)).length() < 1e-4);

        let origin = camera.project(Vec3::ZERO, viewport()).expect("in front");
        assert!((origin.pos - pos2(400.0, 300.0)).length() < 1e-3);
        assert!((origin.depth - 90.0).abs() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = OrbitCamera::new(false);
        for _ in 0..100 {
            camera.zoom(400.0);
        }
        assert!((camera.eye().length() - MIN_DISTANCE).abs() < 1e-4);
        for _ in 0..100 {
            camera.zoom(-400.0);
        }
        assert!((camera.eye().length() - MAX_DISTANCE).abs() < 1e-4);
    }

    #[test]
    fn auto_rotation_pauses_on_request() {
        let mut camera = OrbitCamera::new(true);
        camera.update(1.0, false);
        assert_eq!(camera.eye().x, 0.0);
        camera.update(1.0, true);
        assert!(camera.eye().x > 0.0);

        let mut still = OrbitCamera::new(false);
        still.update(1.0, true);
        assert_eq!(still.eye().x, 0.0);
    }

    #[test]
    fn projection_orients_and_scales() {
        let camera = OrbitCamera::new(false);
        let rect = viewport();
        let right_up = camera.project(Vec3::new(10.0, 10.0, 0.0), rect).expect("visible");
        assert!(right_up.pos.x > 400.0 && right_up.pos.y < 300.0);

        let near = camera.project(Vec3::new(0.0, 0.0, 40.0), rect).expect("near");
        let far = camera.project(Vec3::new(0.0, 0.0, -40.0), rect).expect("far");
        assert!(near.scale > far.scale);
        assert!(camera.project(Vec3::new(0.0, 0.0, 95.0), rect).is_none());
    }

    #[test]
    fn screen_drag_maps_onto_the_view_plane() {
        let camera = OrbitCamera::new(false);
        let moved = camera.screen_delta_to_world(vec2(10.0, -10.0), 2.0);
        assert!((moved - Vec3::new(5.0, 5.0, 0.0)).length() < 1e-4);

        let rect = viewport();
        let start = camera.project(Vec3::ZERO, rect).expect("visible");
        let end = camera.project(moved, rect).expect("visible");
        let screen = end.pos - start.pos;
        let expected = vec2(10.0, -10.0) * start.scale / 2.0;
        assert!((screen - expected).length() < 1e-2);
    }

    #[test]
    fn drag_pitch_stays_below_the_pole() {
        let mut camera = OrbitCamera::new(false);
        for _ in 0..200 {
            camera.drag(0.0, 500.0);
            camera.update(1.0 / 60.0, true);
        }
        assert!(camera.eye().y < camera.eye().length());
        assert!(camera.eye().y > 0.0);
    }
}
