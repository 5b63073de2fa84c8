//! Procedural star field: points spread uniformly over a sphere with random colors.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use orrery_render::{ColorVertex, PositionVertex};

/// Number of stars in the field.
pub const STAR_COUNT: u32 = 400;

/// Radius of the sphere the stars lie on.
pub const STAR_RADIUS: f32 = 50.0;

/// Star positions and colors as two parallel vertex streams.
#[derive(Debug, Clone, PartialEq)]
pub struct StarField {
    pub positions: Vec<PositionVertex>,
    pub colors: Vec<ColorVertex>,
}

impl StarField {
    /// Generate `count` stars on a sphere of `radius`. Deterministic for a given seed.
    pub fn generate(seed: u64, count: u32, radius: f32) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut positions = Vec::with_capacity(count as usize);
        let mut colors = Vec::with_capacity(count as usize);

        for _ in 0..count {
            // Uniform in azimuth and in cos(polar) gives uniform surface density.
            let theta = rng.random::<f32>() * std::f32::consts::TAU;
            let phi = (1.0 - 2.0 * rng.random::<f32>()).acos();
            let direction =
                glam::Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());

            positions.push(PositionVertex {
                position: (direction * radius).to_array(),
            });
            colors.push(ColorVertex {
                color: [rng.random(), rng.random(), rng.random()],
            });
        }

        Self { positions, colors }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_count() {
        let field = StarField::generate(1, STAR_COUNT, STAR_RADIUS);
        assert_eq!(field.len(), 400);
        assert_eq!(field.colors.len(), 400);
    }

    #[test]
    fn test_stars_lie_on_sphere() {
        let field = StarField::generate(7, STAR_COUNT, STAR_RADIUS);
        for star in &field.positions {
            let length = glam::Vec3::from_array(star.position).length();
            assert!((length - 50.0).abs() < 1e-3, "star at distance {length}");
        }
    }

    #[test]
    fn test_colors_in_unit_range() {
        let field = StarField::generate(7, STAR_COUNT, STAR_RADIUS);
        assert!(
            field
                .colors
                .iter()
                .flat_map(|c| c.color)
                .all(|channel| (0.0..1.0).contains(&channel))
        );
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = StarField::generate(42, 64, 10.0);
        let b = StarField::generate(42, 64, 10.0);
        let c = StarField::generate(43, 64, 10.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_distribution_covers_both_hemispheres() {
        let field = StarField::generate(3, STAR_COUNT, STAR_RADIUS);
        let above = field.positions.iter().filter(|s| s.position[1] > 0.0).count();
        // Expect roughly half; a 400-sample draw stays well inside this band.
        assert!((140..260).contains(&above), "{above} stars above the equator");
    }
}
