//! Renderer variants
//!
//! Each variant is one tutorial snapshot: a geometry payload, the shader
//! that consumes it, and how the attributes reach the shader.

use super::GeometryPayload;
use crate::core::vertex::{VertexP, VertexPC};
use crate::shader::ShaderSource;
use std::fmt;
use std::str::FromStr;

/// How vertex attributes are delivered to the vertex stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeBinding {
    /// No buffers; the shader generates its vertices.
    Generated,
    /// One vertex buffer slot per attribute array (positions at 0, colors at 1).
    SeparateBuffers,
    /// A single interleaved vertex buffer at slot 0.
    Interleaved,
    /// Storage buffers behind one argument table at bind group 0.
    ArgumentTable,
}

/// A renderer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    /// Triangle hard-coded in the vertex shader.
    ShaderTriangle,
    /// Unindexed triangle from position and color buffers.
    Triangle,
    /// Indexed quad from position and color buffers.
    Quad,
    /// Indexed quad from one interleaved buffer.
    InterleavedQuad,
    /// Depth-tested indexed cube.
    #[default]
    Cube,
    /// Triangle read through an argument table.
    ArgumentTriangle,
}

impl Variant {
    pub const ALL: [Variant; 6] = [
        Variant::ShaderTriangle,
        Variant::Triangle,
        Variant::Quad,
        Variant::InterleavedQuad,
        Variant::Cube,
        Variant::ArgumentTriangle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Variant::ShaderTriangle => "shader-triangle",
            Variant::Triangle => "triangle",
            Variant::Quad => "quad",
            Variant::InterleavedQuad => "interleaved-quad",
            Variant::Cube => "cube",
            Variant::ArgumentTriangle => "argument-triangle",
        }
    }

    pub fn attribute_binding(&self) -> AttributeBinding {
        match self {
            Variant::ShaderTriangle => AttributeBinding::Generated,
            Variant::Triangle | Variant::Quad => AttributeBinding::SeparateBuffers,
            Variant::InterleavedQuad | Variant::Cube => AttributeBinding::Interleaved,
            Variant::ArgumentTriangle => AttributeBinding::ArgumentTable,
        }
    }

    /// Whether the variant needs a depth attachment and depth-stencil state.
    pub fn depth_tested(&self) -> bool {
        matches!(self, Variant::Cube)
    }

    /// Build the CPU-side payload.
    pub fn payload(&self) -> GeometryPayload {
        match self {
            Variant::ShaderTriangle => super::generated_triangle(),
            Variant::Triangle | Variant::ArgumentTriangle => super::triangle(),
            Variant::Quad => super::quad(),
            Variant::InterleavedQuad => super::interleaved_quad(),
            Variant::Cube => super::cube::cube(),
        }
    }

    /// Vertex buffer layouts the pipeline declares, in slot order.
    pub fn vertex_layouts(&self) -> Vec<wgpu::VertexBufferLayout<'static>> {
        match self.attribute_binding() {
            AttributeBinding::Generated | AttributeBinding::ArgumentTable => Vec::new(),
            AttributeBinding::SeparateBuffers => vec![VertexP::layout(0), VertexP::layout(1)],
            AttributeBinding::Interleaved => vec![VertexPC::layout()],
        }
    }

    /// The built-in shader program for this variant.
    pub fn builtin_shader(&self) -> ShaderSource {
        let (label, source) = match self {
            Variant::ShaderTriangle => ("hardcoded", include_str!("../../shaders/hardcoded.wgsl")),
            Variant::Triangle | Variant::Quad | Variant::InterleavedQuad => {
                ("colored", include_str!("../../shaders/colored.wgsl"))
            }
            Variant::Cube => ("cube", include_str!("../../shaders/cube.wgsl")),
            Variant::ArgumentTriangle => ("argument", include_str!("../../shaders/argument.wgsl")),
        };
        ShaderSource::Builtin { label, source }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a variant name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant `{0}` (expected one of: shader-triangle, triangle, quad, interleaved-quad, cube, argument-triangle)")]
pub struct ParseVariantError(pub String);

impl FromStr for Variant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Variant::ALL
            .into_iter()
            .find(|v| v.name() == normalized)
            .ok_or_else(|| ParseVariantError(s.to_string()))
    }
}
