//! Camera pose and its keyboard/mouse mutations.

use glam::{Mat4, Vec3};

/// Holds the camera's world transform. The view matrix is always its inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraController {
    pose: Mat4,
    dolly_step: f32,
    pitch_divisor: f32,
}

impl CameraController {
    /// Camera at `(0, 0, start_distance)` looking down -Z toward the sun.
    pub fn new(start_distance: f32, dolly_step: f32, pitch_divisor: f32) -> Self {
        Self {
            pose: Mat4::from_translation(Vec3::new(0.0, 0.0, start_distance)),
            dolly_step,
            pitch_divisor,
        }
    }

    /// Translate along the pose's own Z axis. Negative moves forward.
    pub fn dolly(&mut self, delta: f32) {
        self.pose *= Mat4::from_translation(Vec3::new(0.0, 0.0, delta));
    }

    /// One forward step of the configured size.
    pub fn step_forward(&mut self) {
        self.dolly(-self.dolly_step);
    }

    /// One backward step of the configured size.
    pub fn step_backward(&mut self) {
        self.dolly(self.dolly_step);
    }

    /// Rotate about the world X axis by `delta_pixels / pitch_divisor` radians.
    pub fn pitch(&mut self, delta_pixels: f32) {
        self.pose = Mat4::from_rotation_x(delta_pixels / self.pitch_divisor) * self.pose;
    }

    pub fn pose(&self) -> Mat4 {
        self.pose
    }

    pub fn view(&self) -> Mat4 {
        self.pose.inverse()
    }

    /// Camera position in world space.
    pub fn translation(&self) -> Vec3 {
        self.pose.w_axis.truncate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> CameraController {
        CameraController::new(35.0, 0.1, 240.0)
    }

    #[test]
    fn test_initial_pose() {
        let camera = controller();
        assert_eq!(camera.translation(), Vec3::new(0.0, 0.0, 35.0));
        assert!(
            camera
                .view()
                .transform_point3(Vec3::ZERO)
                .abs_diff_eq(Vec3::new(0.0, 0.0, -35.0), 1e-5)
        );
    }

    #[test]
    fn test_dolly_moves_along_local_z() {
        let mut camera = controller();
        camera.step_forward();
        assert!(
            camera
                .translation()
                .abs_diff_eq(Vec3::new(0.0, 0.0, 34.9), 1e-5)
        );
        camera.step_backward();
        camera.step_backward();
        assert!(
            camera
                .translation()
                .abs_diff_eq(Vec3::new(0.0, 0.0, 35.1), 1e-5)
        );
    }

    #[test]
    fn test_dolly_after_pitch_follows_rotated_axis() {
        let mut camera = controller();
        camera.pitch(120.0);
        let local_z = camera.pose().z_axis.truncate();
        let before = camera.translation();
        camera.dolly(-2.0);
        let moved = camera.translation() - before;
        assert!(moved.abs_diff_eq(local_z * -2.0, 1e-5));
        assert!((moved.length() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_pitch_left_multiplies() {
        let mut camera = controller();
        camera.pitch(240.0);
        let expected =
            Mat4::from_rotation_x(1.0) * Mat4::from_translation(Vec3::new(0.0, 0.0, 35.0));
        assert!(camera.pose().abs_diff_eq(expected, 1e-6));
        // Rotating about world X swings the camera around the origin.
        assert!((camera.translation().length() - 35.0).abs() < 1e-4);
    }

    #[test]
    fn test_view_is_inverse_of_pose() {
        let mut camera = controller();
        camera.pitch(37.0);
        camera.dolly(-4.5);
        camera.pitch(-12.0);
        let product = camera.pose() * camera.view();
        assert!(product.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }
}
