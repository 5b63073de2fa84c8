//! The solar system script and its per-frame transforms.
//!
//! [`SOLAR_SYSTEM`] lists every body in draw order. A body with a parent is
//! positioned relative to the parent's model matrix from the same frame, so
//! the parent must appear earlier in the list.

use glam::{Mat4, Vec3};

use crate::flags::ShadingFlags;

/// What role a body plays when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Emissive center of the system.
    Sun,
    Planet,
    Moon,
    /// Inside-out backdrop that follows the camera.
    Sky,
}

/// Static orbit and appearance parameters of one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDescriptor {
    pub name: &'static str,
    pub kind: BodyKind,
    /// Orbit radius in the parent's frame.
    pub distance: f32,
    /// Radians per second around the parent's Y axis.
    pub speed: f32,
    pub scale: f32,
    pub tint: [f32; 3],
    /// Diffuse texture name.
    pub texture: &'static str,
    /// Normal map texture name, for bodies that support normal mapping.
    pub normal_map: Option<&'static str>,
    pub base_flags: ShadingFlags,
    /// Whether an orbit ring is drawn for this body.
    pub ring: bool,
    /// Index of the parent body in the same list.
    pub parent: Option<usize>,
}

impl BodyDescriptor {
    const fn planet(
        name: &'static str,
        distance: f32,
        speed: f32,
        scale: f32,
        tint: [f32; 3],
        normal_map: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            kind: BodyKind::Planet,
            distance,
            speed,
            scale,
            tint,
            texture: name,
            normal_map,
            base_flags: ShadingFlags::SHADE,
            ring: true,
            parent: None,
        }
    }

    /// Model matrix: `parent * rotate_y(time * speed) * translate(0, 0, -distance) * scale`.
    pub fn model_matrix(&self, parent: Mat4, time: f32) -> Mat4 {
        parent
            * Mat4::from_rotation_y(time * self.speed)
            * Mat4::from_translation(Vec3::new(0.0, 0.0, -self.distance))
            * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

/// Index of the earth in [`SOLAR_SYSTEM`], parent of the moon.
const EARTH: usize = 3;

/// Bodies in draw order.
pub const SOLAR_SYSTEM: [BodyDescriptor; 12] = [
    BodyDescriptor {
        name: "sun",
        kind: BodyKind::Sun,
        distance: 0.0,
        speed: 0.0,
        scale: 3.5,
        tint: [1.0, 0.0, 0.0],
        texture: "sun",
        normal_map: None,
        base_flags: ShadingFlags::NONE,
        ring: false,
        parent: None,
    },
    BodyDescriptor::planet("mercury", 5.0, 1.0, 1.0, [0.0, 1.0, 0.0], Some("mercury_normal")),
    BodyDescriptor::planet("venus", 7.0, 0.95, 1.5, [0.0, 0.0, 1.0], Some("venus_normal")),
    BodyDescriptor::planet("earth", 11.0, 0.9, 0.75, [0.9, 0.7, 1.0], Some("earth_normal")),
    BodyDescriptor {
        name: "moon",
        kind: BodyKind::Moon,
        distance: 2.0,
        speed: 1.5,
        scale: 0.5,
        tint: [0.4, 0.5, 0.8],
        texture: "moon",
        normal_map: None,
        base_flags: ShadingFlags::SHADE,
        ring: true,
        parent: Some(EARTH),
    },
    BodyDescriptor::planet("mars", 15.0, 0.85, 1.0, [0.5, 0.9, 0.1], Some("mars_normal")),
    BodyDescriptor::planet("jupiter", 19.0, 0.8, 1.5, [0.2, 0.3, 1.0], None),
    BodyDescriptor::planet("saturn", 23.0, 0.7, 2.0, [0.1, 0.6, 0.4], None),
    BodyDescriptor::planet("uranus", 27.0, 0.65, 1.5, [1.0, 0.3, 0.7], None),
    BodyDescriptor::planet("neptune", 31.0, 0.6, 0.75, [0.4, 0.1, 0.9], None),
    BodyDescriptor {
        ring: false,
        ..BodyDescriptor::planet("pluto", 35.0, 0.55, 0.5, [0.8, 0.75, 0.7], Some("pluto_normal"))
    },
    BodyDescriptor {
        name: "sky",
        kind: BodyKind::Sky,
        distance: 0.0,
        speed: 0.0,
        scale: 1.0,
        tint: [1.0, 1.0, 1.0],
        texture: "sky",
        normal_map: None,
        base_flags: ShadingFlags::NONE,
        ring: false,
        parent: None,
    },
];

/// Model matrices for every body at `time`.
///
/// The sky is centered on `camera_position` and scaled by `sky_scale`
/// instead of following an orbit.
pub fn body_transforms(
    scene: &[BodyDescriptor],
    time: f32,
    camera_position: Vec3,
    sky_scale: f32,
) -> Vec<Mat4> {
    let mut transforms: Vec<Mat4> = Vec::with_capacity(scene.len());
    for body in scene {
        let model = match body.kind {
            BodyKind::Sky => {
                Mat4::from_translation(camera_position) * Mat4::from_scale(Vec3::splat(sky_scale))
            }
            _ => {
                let parent = body
                    .parent
                    .and_then(|index| transforms.get(index).copied())
                    .unwrap_or(Mat4::IDENTITY);
                body.model_matrix(parent, time)
            }
        };
        transforms.push(model);
    }
    transforms
}

/// Orbit ring transform: a unit circle scaled to the orbit radius, in the
/// parent's frame when there is one.
pub fn ring_transform(body: &BodyDescriptor, transforms: &[Mat4]) -> Mat4 {
    let parent = body
        .parent
        .and_then(|index| transforms.get(index).copied())
        .unwrap_or(Mat4::IDENTITY);
    parent * Mat4::from_scale(Vec3::splat(body.distance))
}

/// Normal matrix for lighting in view space: `inverse(transpose(view * model))`.
pub fn normal_matrix(view: Mat4, model: Mat4) -> Mat4 {
    (view * model).inverse().transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_scene_order() {
        let names: Vec<_> = SOLAR_SYSTEM.iter().map(|b| b.name).collect();
        assert_eq!(
            names,
            [
                "sun", "mercury", "venus", "earth", "moon", "mars", "jupiter", "saturn",
                "uranus", "neptune", "pluto", "sky"
            ]
        );
    }

    #[test]
    fn test_parents_precede_children() {
        for (index, body) in SOLAR_SYSTEM.iter().enumerate() {
            if let Some(parent) = body.parent {
                assert!(parent < index, "{} drawn before its parent", body.name);
            }
        }
        assert_eq!(SOLAR_SYSTEM[4].parent, Some(EARTH));
        assert_eq!(SOLAR_SYSTEM[EARTH].name, "earth");
    }

    #[test]
    fn test_nine_rings() {
        assert_eq!(SOLAR_SYSTEM.iter().filter(|b| b.ring).count(), 9);
    }

    #[test]
    fn test_normal_map_eligibility() {
        let eligible: Vec<_> = SOLAR_SYSTEM
            .iter()
            .filter(|b| b.normal_map.is_some())
            .map(|b| b.name)
            .collect();
        assert_eq!(eligible, ["mercury", "venus", "earth", "mars", "pluto"]);
        for body in SOLAR_SYSTEM.iter().filter(|b| b.normal_map.is_some()) {
            assert_eq!(body.normal_map, Some(format!("{}_normal", body.name).as_str()));
        }
    }

    #[test]
    fn test_planet_at_time_zero_sits_on_negative_z() {
        let transforms = body_transforms(&SOLAR_SYSTEM, 0.0, Vec3::ZERO, 150.0);
        let mercury = transforms[1].transform_point3(Vec3::ZERO);
        assert!(approx(mercury, Vec3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn test_orbit_keeps_radius() {
        let transforms = body_transforms(&SOLAR_SYSTEM, 2.7, Vec3::ZERO, 150.0);
        let venus = transforms[2].transform_point3(Vec3::ZERO);
        assert!((venus.length() - 7.0).abs() < 1e-4);
        assert!(venus.y.abs() < 1e-5);
    }

    #[test]
    fn test_moon_follows_earth() {
        let time = 1.3;
        let transforms = body_transforms(&SOLAR_SYSTEM, time, Vec3::ZERO, 150.0);
        let earth = transforms[EARTH];
        let expected = SOLAR_SYSTEM[4].model_matrix(earth, time);
        assert!(transforms[4].abs_diff_eq(expected, 1e-5));

        // Moon distance is measured in earth's scaled frame.
        let earth_center = earth.transform_point3(Vec3::ZERO);
        let moon_center = transforms[4].transform_point3(Vec3::ZERO);
        assert!(((moon_center - earth_center).length() - 2.0 * 0.75).abs() < 1e-4);
    }

    #[test]
    fn test_sky_centered_on_camera() {
        let camera = Vec3::new(1.0, 2.0, 35.0);
        let transforms = body_transforms(&SOLAR_SYSTEM, 5.0, camera, 150.0);
        let sky = transforms[11];
        assert!(approx(sky.transform_point3(Vec3::ZERO), camera));
        assert!(approx(sky.transform_vector3(Vec3::X), Vec3::X * 150.0));
    }

    #[test]
    fn test_ring_transforms() {
        let transforms = body_transforms(&SOLAR_SYSTEM, 0.5, Vec3::ZERO, 150.0);
        let mars_ring = ring_transform(&SOLAR_SYSTEM[5], &transforms);
        assert!(approx(mars_ring.transform_point3(Vec3::X), Vec3::X * 15.0));

        let moon_ring = ring_transform(&SOLAR_SYSTEM[4], &transforms);
        let expected = transforms[EARTH] * Mat4::from_scale(Vec3::splat(2.0));
        assert!(moon_ring.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_normal_matrix_matches_definition() {
        let pose = Mat4::from_rotation_x(0.3) * Mat4::from_translation(Vec3::new(0.0, 0.0, 35.0));
        let model = Mat4::from_rotation_y(0.8)
            * Mat4::from_translation(Vec3::new(0.0, 0.0, -11.0))
            * Mat4::from_scale(Vec3::splat(0.75));
        let view = pose.inverse();

        let computed = normal_matrix(view, model);
        let expected = (pose.inverse() * model).inverse().transpose();
        assert!(computed.abs_diff_eq(expected, 1e-5));

        // Normals stay perpendicular to surface tangents after transformation.
        let mv = view * model;
        let tangent = mv.transform_vector3(Vec3::X);
        let normal = computed.transform_vector3(Vec3::Y);
        assert!(tangent.dot(normal).abs() < 1e-4);
    }
}
