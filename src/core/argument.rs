//! Argument tables
//!
//! An argument table binds several storage buffers behind a single bind
//! group slot, so the vertex shader can address all of them by index
//! without a vertex buffer slot per attribute.

use crate::context::WgpuContext;
use crate::core::buffer::StorageBuffer;

/// A bind group holding read-only storage buffers at consecutive bindings.
pub struct ArgumentTable {
    pub(crate) bind_group: wgpu::BindGroup,
}

impl ArgumentTable {
    /// Layout for a table of `count` storage buffers visible to the vertex
    /// stage. Created with the pipeline, before any buffer exists.
    pub fn bind_group_layout(
        ctx: &WgpuContext,
        count: u32,
        label: Option<&str>,
    ) -> wgpu::BindGroupLayout {
        let entries: Vec<_> = (0..count)
            .map(|binding| wgpu::BindGroupLayoutEntry {
                binding,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            })
            .collect();

        ctx.device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: label.map(|l| format!("{} layout", l)).as_deref(),
                entries: &entries,
            })
    }

    /// Bind `buffers` at bindings `0..buffers.len()` of `layout`.
    pub fn new(
        ctx: &WgpuContext,
        layout: &wgpu::BindGroupLayout,
        buffers: &[&StorageBuffer],
        label: Option<&str>,
    ) -> Self {
        let entries: Vec<_> = buffers
            .iter()
            .zip(0u32..)
            .map(|(buffer, binding)| wgpu::BindGroupEntry {
                binding,
                resource: buffer.buffer().as_entire_binding(),
            })
            .collect();

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label,
            layout,
            entries: &entries,
        });

        Self { bind_group }
    }

    /// Get the bind group.
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
