//! GPU buffer abstractions
//!
//! Typed wrappers for vertex, index, storage and uniform buffers. Every
//! buffer is sized exactly to its payload and initialized at creation, so
//! the GPU-visible contents are in sync before the first frame.

use crate::context::WgpuContext;
use bytemuck::{Pod, Zeroable};
use std::marker::PhantomData;

/// A GPU buffer containing vertex data.
pub struct VertexBuffer {
    pub(crate) buffer: wgpu::Buffer,
}

impl VertexBuffer {
    /// Create a new vertex buffer from a slice of vertices.
    pub fn new<V: Pod + Zeroable>(ctx: &WgpuContext, vertices: &[V], label: Option<&str>) -> Self {
        use wgpu::util::DeviceExt;
        let buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label,
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        Self { buffer }
    }

    /// Size of the buffer in bytes.
    pub fn byte_len(&self) -> u64 {
        self.buffer.size()
    }

    /// Create a buffer slice for the entire buffer.
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}

/// A GPU buffer containing 16-bit index data.
pub struct IndexBuffer {
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) count: u32,
}

impl IndexBuffer {
    /// Index format used by every index buffer.
    pub const FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint16;

    /// Create a new index buffer from u16 indices.
    pub fn new_u16(ctx: &WgpuContext, indices: &[u16], label: Option<&str>) -> Self {
        use wgpu::util::DeviceExt;
        let buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label,
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Self {
            buffer,
            count: indices.len() as u32,
        }
    }

    /// Get the number of indices.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Get the index format.
    pub fn format(&self) -> wgpu::IndexFormat {
        Self::FORMAT
    }

    /// Bytes occupied by the indices themselves.
    pub fn byte_len(&self) -> u64 {
        self.count as u64 * std::mem::size_of::<u16>() as u64
    }

    /// Create a buffer slice for the entire buffer.
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}

/// A read-only storage buffer, addressed by the shader through an
/// [`ArgumentTable`](crate::core::ArgumentTable).
pub struct StorageBuffer {
    pub(crate) buffer: wgpu::Buffer,
}

impl StorageBuffer {
    /// Create a storage buffer holding `items`.
    pub fn new<T: Pod + Zeroable>(ctx: &WgpuContext, items: &[T], label: Option<&str>) -> Self {
        use wgpu::util::DeviceExt;
        let buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label,
                contents: bytemuck::cast_slice(items),
                usage: wgpu::BufferUsages::STORAGE,
            });
        Self { buffer }
    }

    /// Get the raw wgpu buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Size of the buffer in bytes.
    pub fn byte_len(&self) -> u64 {
        self.buffer.size()
    }
}

/// A typed GPU uniform buffer, written once at creation.
pub struct UniformBuffer<T> {
    #[allow(dead_code)]
    pub(crate) buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
    _marker: PhantomData<T>,
}

impl<T: Pod + Zeroable> UniformBuffer<T> {
    /// Layout of a single uniform block at `binding`, visible to the
    /// vertex stage.
    pub fn bind_group_layout(
        ctx: &WgpuContext,
        binding: u32,
        label: Option<&str>,
    ) -> wgpu::BindGroupLayout {
        ctx.device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: label.map(|l| format!("{} layout", l)).as_deref(),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            })
    }

    /// Create a new uniform buffer with initial data, bound through `layout`.
    pub fn new(
        ctx: &WgpuContext,
        layout: &wgpu::BindGroupLayout,
        data: &T,
        binding: u32,
        label: Option<&str>,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label,
                contents: bytemuck::bytes_of(data),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: label.map(|l| format!("{} bind group", l)).as_deref(),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group,
            _marker: PhantomData,
        }
    }

    /// Get the bind group.
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
