//! Geometry payloads
//!
//! CPU-side vertex, color and index data for every renderer variant. The
//! payload is what gets copied into GPU buffers, so its byte sizes are the
//! buffer sizes.

mod cube;
mod variant;

pub use cube::{cube_transform, TransformUniform, CUBE_FACE_COLORS};
pub use variant::{AttributeBinding, ParseVariantError, Variant};

use crate::core::vertex::{VertexP, VertexPC};

/// Per-vertex attribute storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Attributes {
    /// Vertices are generated in the vertex shader.
    Generated { vertex_count: u32 },
    /// Positions and colors in two parallel arrays.
    Separate {
        positions: Vec<VertexP>,
        colors: Vec<VertexP>,
    },
    /// Position and color interleaved per vertex.
    Interleaved(Vec<VertexPC>),
}

/// Everything a variant uploads to the GPU.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryPayload {
    pub attributes: Attributes,
    pub indices: Option<Vec<u16>>,
}

impl GeometryPayload {
    pub fn vertex_count(&self) -> u32 {
        match &self.attributes {
            Attributes::Generated { vertex_count } => *vertex_count,
            Attributes::Separate { positions, .. } => positions.len() as u32,
            Attributes::Interleaved(vertices) => vertices.len() as u32,
        }
    }

    /// Bytes per vertex across all attribute buffers.
    pub fn vertex_stride(&self) -> u64 {
        match &self.attributes {
            Attributes::Generated { .. } => 0,
            Attributes::Separate { .. } => 2 * std::mem::size_of::<VertexP>() as u64,
            Attributes::Interleaved(_) => std::mem::size_of::<VertexPC>() as u64,
        }
    }

    /// Total bytes of vertex attribute data.
    pub fn vertex_bytes(&self) -> u64 {
        match &self.attributes {
            Attributes::Generated { .. } => 0,
            Attributes::Separate { positions, colors } => {
                (bytemuck::cast_slice::<_, u8>(positions).len()
                    + bytemuck::cast_slice::<_, u8>(colors).len()) as u64
            }
            Attributes::Interleaved(vertices) => {
                bytemuck::cast_slice::<_, u8>(vertices).len() as u64
            }
        }
    }

    pub fn index_count(&self) -> Option<u32> {
        self.indices.as_ref().map(|i| i.len() as u32)
    }

    /// Total bytes of index data.
    pub fn index_bytes(&self) -> u64 {
        self.indices
            .as_deref()
            .map_or(0, |i| bytemuck::cast_slice::<_, u8>(i).len() as u64)
    }

    /// Number of elements the draw call consumes: indices when indexed,
    /// vertices otherwise.
    pub fn draw_count(&self) -> u32 {
        self.index_count().unwrap_or_else(|| self.vertex_count())
    }

    /// Vertex positions, without padding.
    pub fn positions(&self) -> Vec<[f32; 3]> {
        match &self.attributes {
            Attributes::Generated { .. } => Vec::new(),
            Attributes::Separate { positions, .. } => positions.iter().map(VertexP::xyz).collect(),
            Attributes::Interleaved(vertices) => vertices.iter().map(VertexPC::position).collect(),
        }
    }

    /// Triangles as vertex index triples, in draw order.
    pub fn triangles(&self) -> Vec<[u16; 3]> {
        match &self.indices {
            Some(indices) => indices
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect(),
            None => (0..self.vertex_count() as u16)
                .collect::<Vec<_>>()
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect(),
        }
    }
}

const TRIANGLE_POSITIONS: [[f32; 3]; 3] = [[-0.8, 0.8, 0.0], [0.0, -0.8, 0.0], [0.8, 0.8, 0.0]];
const TRIANGLE_COLORS: [[f32; 3]; 3] = [[1.0, 0.3, 0.2], [0.8, 1.0, 0.0], [0.8, 0.0, 1.0]];

const QUAD_POSITIONS: [[f32; 3]; 4] = [
    [-0.5, -0.5, 0.0],
    [0.5, -0.5, 0.0],
    [0.5, 0.5, 0.0],
    [-0.5, 0.5, 0.0],
];
const QUAD_COLORS: [[f32; 3]; 4] = [
    [1.0, 0.3, 0.2],
    [0.8, 1.0, 0.0],
    [0.8, 0.0, 1.0],
    [0.0, 0.4, 1.0],
];

/// Two counter-clockwise triangles covering the quad.
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

fn separate(positions: &[[f32; 3]], colors: &[[f32; 3]]) -> Attributes {
    Attributes::Separate {
        positions: positions.iter().copied().map(VertexP::new).collect(),
        colors: colors.iter().copied().map(VertexP::new).collect(),
    }
}

/// The hard-coded triangle drawn by the first snapshot.
pub fn generated_triangle() -> GeometryPayload {
    GeometryPayload {
        attributes: Attributes::Generated { vertex_count: 3 },
        indices: None,
    }
}

/// Unindexed three-vertex triangle.
pub fn triangle() -> GeometryPayload {
    GeometryPayload {
        attributes: separate(&TRIANGLE_POSITIONS, &TRIANGLE_COLORS),
        indices: None,
    }
}

/// Indexed quad with separate position and color arrays.
pub fn quad() -> GeometryPayload {
    GeometryPayload {
        attributes: separate(&QUAD_POSITIONS, &QUAD_COLORS),
        indices: Some(QUAD_INDICES.to_vec()),
    }
}

/// Indexed quad with interleaved vertices.
pub fn interleaved_quad() -> GeometryPayload {
    let vertices = QUAD_POSITIONS
        .iter()
        .zip(QUAD_COLORS.iter())
        .map(|(&p, &c)| VertexPC::new(p, c))
        .collect();
    GeometryPayload {
        attributes: Attributes::Interleaved(vertices),
        indices: Some(QUAD_INDICES.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Twice the signed area of a triangle projected onto the XY plane.
    fn signed_area(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> f32 {
        (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
    }

    #[test]
    fn test_byte_lengths_match_counts() {
        for variant in Variant::ALL {
            let payload = variant.payload();
            assert_eq!(
                payload.vertex_bytes(),
                payload.vertex_count() as u64 * payload.vertex_stride(),
                "{variant}"
            );
            let index_count = payload.index_count().unwrap_or(0) as u64;
            assert_eq!(payload.index_bytes(), index_count * 2, "{variant}");
        }
    }

    #[test]
    fn test_indices_in_range() {
        for variant in Variant::ALL {
            let payload = variant.payload();
            let vertex_count = payload.vertex_count();
            if let Some(indices) = &payload.indices {
                assert!(
                    indices.iter().all(|&i| (i as u32) < vertex_count),
                    "{variant}"
                );
                assert_eq!(indices.len() % 3, 0);
            }
        }
    }

    #[test]
    fn test_triangle_counts() {
        assert_eq!(triangle().draw_count(), 3);
        assert_eq!(triangle().vertex_count(), 3);
        assert_eq!(generated_triangle().draw_count(), 3);
        assert_eq!(generated_triangle().vertex_bytes(), 0);
    }

    #[test]
    fn test_quad_is_two_ccw_triangles() {
        for payload in [quad(), interleaved_quad()] {
            assert_eq!(payload.indices.as_deref(), Some(&[0, 1, 2, 2, 3, 0][..]));
            let positions = payload.positions();
            let triangles = payload.triangles();
            assert_eq!(triangles.len(), 2);

            let mut covered = 0.0;
            for [a, b, c] in triangles {
                let area = signed_area(
                    positions[a as usize],
                    positions[b as usize],
                    positions[c as usize],
                );
                assert!(area > 0.0, "triangle {a},{b},{c} is clockwise");
                covered += area / 2.0;
            }
            // 1 x 1 quad
            assert!((covered - 1.0f32).abs() < 1e-6);
        }
    }

    #[test]
    fn test_triangle_winding() {
        let positions = triangle().positions();
        assert!(signed_area(positions[0], positions[1], positions[2]) > 0.0);
    }

    #[test]
    fn test_interleaved_matches_separate() {
        let (Attributes::Separate { positions, colors }, Attributes::Interleaved(vertices)) =
            (quad().attributes, interleaved_quad().attributes)
        else {
            panic!("unexpected attribute storage");
        };
        for ((p, c), v) in positions.iter().zip(&colors).zip(&vertices) {
            assert_eq!(p.value, v.position);
            assert_eq!(c.value, v.color);
        }
    }
}
