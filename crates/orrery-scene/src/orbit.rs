//! Orbit ring geometry.

use orrery_render::PositionVertex;

/// Default number of distinct points on a ring.
pub const ORBIT_SEGMENTS: u32 = 100;

/// Unit circle in the XZ plane as a closed line strip.
///
/// Returns `segments + 1` points; the last repeats the first so a line strip
/// closes the loop.
pub fn orbit_ring(segments: u32) -> Vec<PositionVertex> {
    let step = std::f32::consts::TAU / segments as f32;
    (0..=segments)
        .map(|i| {
            let angle = (i % segments) as f32 * step;
            PositionVertex {
                position: [angle.cos(), 0.0, angle.sin()],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_is_closed() {
        let ring = orbit_ring(ORBIT_SEGMENTS);
        assert_eq!(ring.len(), 101);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_ring_on_unit_circle_in_xz_plane() {
        for point in orbit_ring(ORBIT_SEGMENTS) {
            let [x, y, z] = point.position;
            assert_eq!(y, 0.0);
            assert!(((x * x + z * z).sqrt() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_ring_starts_on_positive_x() {
        let ring = orbit_ring(4);
        assert_eq!(ring[0].position, [1.0, 0.0, 0.0]);
        assert!((ring[1].position[2] - 1.0).abs() < 1e-6);
    }
}
