//! UV sphere mesh with tangents for normal mapping.

use glam::Vec3;
use orrery_render::SphereVertex;

/// CPU-side sphere mesh shared by every body.
#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Unit sphere with `stacks` latitude bands and `slices` longitude bands.
    ///
    /// The seam column is duplicated so texture coordinates run 0..1 without
    /// wrapping. Triangles wind counter-clockwise seen from outside.
    pub fn uv_sphere(stacks: u32, slices: u32) -> Self {
        let stacks = stacks.max(2);
        let slices = slices.max(3);
        let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);

        for i in 0..=stacks {
            let v = i as f32 / stacks as f32;
            let polar = v * std::f32::consts::PI;
            for j in 0..=slices {
                let u = j as f32 / slices as f32;
                let azimuth = u * std::f32::consts::TAU;

                let normal = Vec3::new(
                    polar.sin() * azimuth.cos(),
                    polar.cos(),
                    polar.sin() * azimuth.sin(),
                );
                // Direction of increasing azimuth, defined at the poles too.
                let tangent = Vec3::new(-azimuth.sin(), 0.0, azimuth.cos());

                vertices.push(SphereVertex {
                    position: normal.to_array(),
                    normal: normal.to_array(),
                    uv: [u, v],
                    tangent: tangent.to_array(),
                });
            }
        }

        let row = slices + 1;
        let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);
        for i in 0..stacks {
            for j in 0..slices {
                let a = i * row + j;
                let b = a + row;
                indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
            }
        }

        Self { vertices, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mesh = SphereMesh::uv_sphere(16, 32);
        assert_eq!(mesh.vertices.len(), 17 * 33);
        assert_eq!(mesh.indices.len(), 16 * 32 * 6);
        let max = *mesh.indices.iter().max().unwrap();
        assert!((max as usize) < mesh.vertices.len());
    }

    #[test]
    fn test_vertices_on_unit_sphere() {
        let mesh = SphereMesh::uv_sphere(8, 12);
        for vertex in &mesh.vertices {
            let p = Vec3::from_array(vertex.position);
            assert!((p.length() - 1.0).abs() < 1e-5);
            assert_eq!(vertex.position, vertex.normal);
        }
    }

    #[test]
    fn test_tangents_perpendicular_to_normals() {
        let mesh = SphereMesh::uv_sphere(8, 12);
        for vertex in &mesh.vertices {
            let n = Vec3::from_array(vertex.normal);
            let t = Vec3::from_array(vertex.tangent);
            assert!((t.length() - 1.0).abs() < 1e-5);
            assert!(n.dot(t).abs() < 1e-5);
        }
    }

    #[test]
    fn test_triangles_face_outward() {
        let mesh = SphereMesh::uv_sphere(12, 24);
        let mut checked = 0;
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from_array(mesh.vertices[i as usize].position));
            let face = (b - a).cross(c - a);
            if face.length() < 1e-6 {
                continue; // collapsed at a pole
            }
            let centroid = (a + b + c) / 3.0;
            assert!(face.dot(centroid) > 0.0);
            checked += 1;
        }
        assert!(checked > 0);
    }

    #[test]
    fn test_uv_range() {
        let mesh = SphereMesh::uv_sphere(4, 8);
        assert!(
            mesh.vertices
                .iter()
                .all(|v| (0.0..=1.0).contains(&v.uv[0]) && (0.0..=1.0).contains(&v.uv[1]))
        );
    }
}
