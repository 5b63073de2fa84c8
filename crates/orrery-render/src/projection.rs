//! Projection helpers.

use glam::Mat4;

/// Right-handed perspective with reverse-Z: `near` maps to depth 1.0, `far` to 0.0.
pub fn reverse_z_perspective(fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh(fov_y_radians, aspect, far, near)
}

/// Width over height, with zero heights treated as one pixel.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_near_plane_maps_to_one() {
        let proj = reverse_z_perspective(60f32.to_radians(), 4.0 / 3.0, 0.1, 400.0);
        let clip = proj * Vec4::new(0.0, 0.0, -0.1, 1.0);
        assert!((clip.z / clip.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_far_plane_maps_to_zero() {
        let proj = reverse_z_perspective(60f32.to_radians(), 4.0 / 3.0, 0.1, 400.0);
        let clip = proj * Vec4::new(0.0, 0.0, -400.0, 1.0);
        assert!((clip.z / clip.w).abs() < 1e-4);
    }

    #[test]
    fn test_aspect_ratio() {
        assert!((aspect_ratio(640, 480) - 4.0 / 3.0).abs() < 1e-6);
        assert_eq!(aspect_ratio(100, 0), 100.0);
    }
}
