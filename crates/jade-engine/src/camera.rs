//! Fixed top-down 2D camera.

use glam::{Mat4, Vec2, Vec3};

/// Visible world width: 40 tiles of 32 units.
pub const VIEW_WIDTH: f32 = 32.0 * 40.0;
/// Visible world height: 21 tiles of 32 units.
pub const VIEW_HEIGHT: f32 = 32.0 * 21.0;
pub const NEAR: f32 = 0.0;
pub const FAR: f32 = 100.0;
/// Distance of the eye above the world plane.
pub const EYE_DISTANCE: f32 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec2,
    projection: Mat4,
}

impl Camera {
    pub fn new(position: Vec2) -> Self {
        let mut camera = Self {
            position,
            projection: Mat4::IDENTITY,
        };
        camera.adjust_projection();
        camera
    }

    /// Recomputes the orthographic box. Depth maps to `0..1`.
    pub fn adjust_projection(&mut self) {
        self.projection = Mat4::orthographic_rh(0.0, VIEW_WIDTH, 0.0, VIEW_HEIGHT, NEAR, FAR);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Look-at from `(x, y, 20)` toward `(x, y, 0)`, up `+Y`. Recomputed on
    /// every call.
    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.position.extend(EYE_DISTANCE);
        let center = self.position.extend(0.0);
        Mat4::look_at_rh(eye, center, Vec3::Y)
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_is_stable_across_calls() {
        let camera = Camera::new(Vec2::ZERO);
        let first = camera.projection_matrix();
        let _ = camera.view_matrix();
        assert_eq!(camera.projection_matrix(), first);
        assert_eq!(
            first,
            Mat4::orthographic_rh(0.0, 1280.0, 0.0, 672.0, 0.0, 100.0)
        );
    }

    #[test]
    fn projection_maps_the_box_corners() {
        let p = Camera::default().projection_matrix();
        let lo = p.project_point3(Vec3::new(0.0, 0.0, 0.0));
        let hi = p.project_point3(Vec3::new(1280.0, 672.0, 0.0));
        assert!((lo - Vec3::new(-1.0, -1.0, 0.0)).length() < 1e-5);
        assert!((hi.truncate() - Vec2::ONE).length() < 1e-5);
    }

    #[test]
    fn view_matches_look_at() {
        let camera = Camera::new(Vec2::new(3.0, -7.5));
        let expected = Mat4::look_at_rh(
            Vec3::new(3.0, -7.5, 20.0),
            Vec3::new(3.0, -7.5, 0.0),
            Vec3::Y,
        );
        assert_eq!(camera.view_matrix(), expected);
    }

    #[test]
    fn moving_in_y_only_changes_the_y_translation() {
        let mut camera = Camera::new(Vec2::new(10.0, 5.0));
        let before = camera.view_matrix();
        camera.set_position(Vec2::new(10.0, 9.0));
        let after = camera.view_matrix();

        assert_eq!(before.x_axis, after.x_axis);
        assert_eq!(before.y_axis, after.y_axis);
        assert_eq!(before.z_axis, after.z_axis);
        assert_eq!(before.w_axis.x, after.w_axis.x);
        assert_eq!(before.w_axis.z, after.w_axis.z);
        assert!((after.w_axis.y - before.w_axis.y - -4.0).abs() < 1e-5);
    }

    #[test]
    fn view_is_recomputed_from_the_current_position() {
        let mut camera = Camera::default();
        let origin = camera.view_matrix();
        camera.set_position(Vec2::new(1.0, 0.0));
        assert_ne!(camera.view_matrix(), origin);
        camera.set_position(Vec2::ZERO);
        assert_eq!(camera.view_matrix(), origin);
    }
}
