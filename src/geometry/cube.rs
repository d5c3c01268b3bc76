//! Depth-tested cube
//!
//! Six faces of four vertices each, one solid color per face, wound
//! counter-clockwise when seen from outside.

use super::{Attributes, GeometryPayload};
use crate::core::vertex::VertexPC;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Face colors in face order: +Z, -Z, +Y, -Y, +X, -X.
pub const CUBE_FACE_COLORS: [[f32; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
];

const H: f32 = 0.5;

const CUBE_FACES: [[[f32; 3]; 4]; 6] = [
    // Front face (+Z)
    [[-H, -H, H], [H, -H, H], [H, H, H], [-H, H, H]],
    // Back face (-Z)
    [[H, -H, -H], [-H, -H, -H], [-H, H, -H], [H, H, -H]],
    // Top face (+Y)
    [[-H, H, H], [H, H, H], [H, H, -H], [-H, H, -H]],
    // Bottom face (-Y)
    [[-H, -H, -H], [H, -H, -H], [H, -H, H], [-H, -H, H]],
    // Right face (+X)
    [[H, -H, H], [H, -H, -H], [H, H, -H], [H, H, H]],
    // Left face (-X)
    [[-H, -H, -H], [-H, -H, H], [-H, H, H], [-H, H, -H]],
];

/// 24 interleaved vertices, 36 indices.
pub fn cube() -> GeometryPayload {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (face, (corners, color)) in CUBE_FACES.iter().zip(CUBE_FACE_COLORS).enumerate() {
        let base = (face * 4) as u16;
        vertices.extend(corners.iter().map(|&p| VertexPC::new(p, color)));
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    GeometryPayload {
        attributes: Attributes::Interleaved(vertices),
        indices: Some(indices),
    }
}

/// Uniform block holding the cube's model-view-projection.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct TransformUniform {
    pub mvp: [[f32; 4]; 4],
}

impl TransformUniform {
    pub fn new(mvp: Mat4) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
        }
    }
}

/// Fixed camera looking at the cube from above a front corner, so three
/// faces are visible and the whole cube is inside the clip volume.
pub fn cube_transform(aspect: f32) -> Mat4 {
    let projection = Mat4::perspective_rh(45f32.to_radians(), aspect, 0.1, 100.0);
    let view = Mat4::look_at_rh(Vec3::new(1.6, 1.4, 2.4), Vec3::ZERO, Vec3::Y);
    let model = Mat4::from_rotation_y(20f32.to_radians());
    projection * view * model
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4Swizzles;

    #[test]
    fn test_cube_counts() {
        let payload = cube();
        assert_eq!(payload.vertex_count(), 24);
        assert_eq!(payload.index_count(), Some(36));
        assert_eq!(payload.vertex_bytes(), 24 * 32);
        assert_eq!(payload.index_bytes(), 72);
    }

    #[test]
    fn test_face_colors_are_solid_and_distinct() {
        let Attributes::Interleaved(vertices) = cube().attributes else {
            panic!("cube must be interleaved");
        };
        for (face, quad) in vertices.chunks_exact(4).enumerate() {
            assert!(quad.iter().all(|v| v.color() == CUBE_FACE_COLORS[face]));
        }
        for (i, a) in CUBE_FACE_COLORS.iter().enumerate() {
            for b in &CUBE_FACE_COLORS[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_faces_wind_outward() {
        let payload = cube();
        let positions: Vec<Vec3> = payload.positions().into_iter().map(Vec3::from).collect();
        for [a, b, c] in payload.triangles() {
            let (a, b, c) = (positions[a as usize], positions[b as usize], positions[c as usize]);
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "face points inward");
        }
    }

    #[test]
    fn test_each_face_uses_its_own_vertices() {
        let payload = cube();
        let indices = payload.indices.unwrap();
        for (face, chunk) in indices.chunks_exact(6).enumerate() {
            let base = face as u16 * 4;
            assert!(chunk.iter().all(|&i| (base..base + 4).contains(&i)));
        }
    }

    #[test]
    fn test_transform_keeps_cube_in_clip_volume() {
        let mvp = cube_transform(1.0);
        for p in cube().positions() {
            let clip = mvp * Vec3::from(p).extend(1.0);
            let ndc = clip.xyz() / clip.w;
            assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0, "{ndc:?}");
            assert!((0.0..=1.0).contains(&ndc.z), "{ndc:?}");
        }
    }
}
