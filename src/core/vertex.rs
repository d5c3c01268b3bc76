//! Vertex types
//!
//! Three-component attributes are stored with four-float alignment, the
//! same layout a `float3` SIMD type has, so a position or color occupies 16
//! bytes and the interleaved vertex is 32.

use bytemuck::{Pod, Zeroable};

/// Size in bytes of one aligned three-component attribute.
pub const ATTRIBUTE_SIZE: wgpu::BufferAddress = std::mem::size_of::<[f32; 4]>() as _;

/// A single aligned three-component attribute (position or color).
/// The fourth lane is padding and is written as zero.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexP {
    pub value: [f32; 4],
}

impl VertexP {
    pub const fn new(value: [f32; 3]) -> Self {
        Self {
            value: [value[0], value[1], value[2], 0.0],
        }
    }

    /// The three meaningful components.
    pub fn xyz(&self) -> [f32; 3] {
        [self.value[0], self.value[1], self.value[2]]
    }

    /// Vertex buffer layout for a buffer of this attribute at `location`.
    pub const fn layout(location: u32) -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: ATTRIBUTE_SIZE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: match location {
                0 => &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                }],
                _ => &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
        }
    }
}

/// Interleaved vertex with position and color.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexPC {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

impl VertexPC {
    /// Byte offset of the color attribute.
    pub const COLOR_OFFSET: wgpu::BufferAddress = ATTRIBUTE_SIZE;

    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            position: [position[0], position[1], position[2], 0.0],
            color: [color[0], color[1], color[2], 0.0],
        }
    }

    pub fn position(&self) -> [f32; 3] {
        [self.position[0], self.position[1], self.position[2]]
    }

    pub fn color(&self) -> [f32; 3] {
        [self.color[0], self.color[1], self.color[2]]
    }

    /// Get the vertex buffer layout for this vertex type.
    pub const fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexPC>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // color
                wgpu::VertexAttribute {
                    offset: Self::COLOR_OFFSET,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_sizes() {
        assert_eq!(std::mem::size_of::<VertexP>(), 16); // float3 padded to 4 floats
        assert_eq!(std::mem::size_of::<VertexPC>(), 32); // two padded float3
    }

    #[test]
    fn test_interleaved_layout_matches_struct() {
        let layout = VertexPC::layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[1].offset, 16);
        assert_eq!(
            std::mem::offset_of!(VertexPC, color) as u64,
            layout.attributes[1].offset
        );
        for attribute in layout.attributes {
            assert_eq!(attribute.format, wgpu::VertexFormat::Float32x3);
        }
    }

    #[test]
    fn test_separate_attribute_layouts() {
        assert_eq!(VertexP::layout(0).attributes[0].shader_location, 0);
        assert_eq!(VertexP::layout(1).attributes[0].shader_location, 1);
        assert_eq!(VertexP::layout(1).array_stride, 16);
    }

    #[test]
    fn test_padding_lane_is_zero() {
        let v = VertexPC::new([1.0, 2.0, 3.0], [0.5, 0.6, 0.7]);
        assert_eq!(v.position[3], 0.0);
        assert_eq!(v.color[3], 0.0);
        assert_eq!(v.color(), [0.5, 0.6, 0.7]);
    }
}
