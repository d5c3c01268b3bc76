//! Frame renderer
//!
//! Owns the pipeline and GPU-resident geometry for one [`Variant`] and
//! encodes one command buffer per frame.
//!
//! Setup runs once, in order: depth state, shaders and pipeline, buffers.
//! After that the renderer only reads its resources; drawing never mutates
//! persistent GPU state.

mod frame;

pub use frame::{Drawable, Frame, OffscreenDrawable, OffscreenTarget};

use crate::context::WgpuContext;
use crate::core::{
    ArgumentTable, DepthState, IndexBuffer, PipelineBuilder, StorageBuffer, UniformBuffer,
    VertexBuffer,
};
use crate::error::{RendererError, Result};
use crate::geometry::{cube_transform, AttributeBinding, Attributes, TransformUniform, Variant};
use crate::shader::{ShaderProgram, ShaderSource};
use std::cell::Cell;

/// Lifecycle of a [`FrameRenderer`]. Transitions are linear and happen once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererState {
    Uninitialized,
    ShadersBuilt,
    BuffersBuilt,
    /// Terminal state for drawing.
    Ready,
    TornDown,
}

/// Everything needed to build a [`FrameRenderer`].
#[derive(Debug, Clone)]
pub struct RendererDescriptor {
    /// Geometry, shader interface and depth policy.
    pub variant: Variant,
    /// Shader override. `None` uses the variant's built-in program.
    pub shader: Option<ShaderSource>,
    /// Format of the drawables the renderer will draw into.
    pub color_format: wgpu::TextureFormat,
    /// Aspect ratio used by the cube's fixed projection.
    pub aspect: f32,
}

impl Default for RendererDescriptor {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            shader: None,
            color_format: wgpu::TextureFormat::Bgra8UnormSrgb,
            aspect: 1.0,
        }
    }
}

impl RendererDescriptor {
    /// Create a descriptor for `variant` with default settings.
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            ..Default::default()
        }
    }

    /// Use `source` instead of the built-in shader.
    pub fn shader(mut self, source: ShaderSource) -> Self {
        self.shader = Some(source);
        self
    }

    /// Set the color target format.
    pub fn color_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.color_format = format;
        self
    }

    /// Set the aspect ratio.
    pub fn aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    fn shader_source(&self) -> ShaderSource {
        self.shader
            .clone()
            .unwrap_or_else(|| self.variant.builtin_shader())
    }
}

/// Vertex attribute resources, as the shader reaches them.
enum GpuAttributes {
    Generated,
    Separate {
        positions: VertexBuffer,
        colors: VertexBuffer,
    },
    Interleaved(VertexBuffer),
    Arguments {
        table: ArgumentTable,
        positions: StorageBuffer,
        colors: StorageBuffer,
    },
}

impl GpuAttributes {
    fn byte_len(&self) -> u64 {
        match self {
            GpuAttributes::Generated => 0,
            GpuAttributes::Separate { positions, colors } => {
                positions.byte_len() + colors.byte_len()
            }
            GpuAttributes::Interleaved(vertices) => vertices.byte_len(),
            GpuAttributes::Arguments {
                positions, colors, ..
            } => positions.byte_len() + colors.byte_len(),
        }
    }
}

/// Renders one variant into host-provided drawables.
///
/// Fields are declared in reverse acquisition order so they drop that way:
/// buffers, then pipeline and shader, then the device context.
pub struct FrameRenderer {
    attributes: Option<GpuAttributes>,
    indices: Option<IndexBuffer>,
    transform: Option<UniformBuffer<TransformUniform>>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    program: Option<ShaderProgram>,
    depth_state: Option<DepthState>,
    vertex_count: u32,
    frames: Cell<u64>,
    state: RendererState,
    descriptor: RendererDescriptor,
    ctx: WgpuContext,
}

impl FrameRenderer {
    /// Perform all one-time setup against `ctx`.
    ///
    /// Any failure is returned before a renderer exists; there is no
    /// partially built renderer.
    pub fn new(ctx: &WgpuContext, descriptor: RendererDescriptor) -> Result<Self> {
        let mut renderer = Self {
            attributes: None,
            indices: None,
            transform: None,
            pipeline: None,
            bind_group_layout: None,
            program: None,
            depth_state: None,
            vertex_count: 0,
            frames: Cell::new(0),
            state: RendererState::Uninitialized,
            descriptor,
            ctx: ctx.clone(),
        };

        renderer.build_depth_stencil_states();
        renderer.build_shaders()?;
        renderer.build_buffers()?;
        renderer.state = RendererState::Ready;

        tracing::info!(
            variant = %renderer.descriptor.variant,
            format = ?renderer.descriptor.color_format,
            "renderer ready"
        );
        Ok(renderer)
    }

    /// Depth policy for depth-tested variants: less-than, writes enabled.
    /// wgpu folds it into the pipeline, so it is fixed before shaders.
    fn build_depth_stencil_states(&mut self) {
        if self.descriptor.variant.depth_tested() {
            self.depth_state = Some(DepthState::read_write());
        }
    }

    /// Load and validate the shader, then build the pipeline.
    fn build_shaders(&mut self) -> Result<()> {
        debug_assert_eq!(self.state, RendererState::Uninitialized);
        let variant = self.descriptor.variant;
        let program = ShaderProgram::load(&self.descriptor.shader_source())?;

        let bind_group_layout = match variant.attribute_binding() {
            AttributeBinding::ArgumentTable => Some(ArgumentTable::bind_group_layout(
                &self.ctx,
                2,
                Some("argument table"),
            )),
            _ if variant == Variant::Cube => Some(
                UniformBuffer::<TransformUniform>::bind_group_layout(
                    &self.ctx,
                    0,
                    Some("transform"),
                ),
            ),
            _ => None,
        };

        let mut builder = PipelineBuilder::new(&self.ctx)
            .label(variant.name())
            .program(&program)
            .vertex_layouts(variant.vertex_layouts())
            .color_format(self.descriptor.color_format);
        if let Some(layout) = &bind_group_layout {
            builder = builder.bind_group_layout(layout);
        }
        if let Some(depth) = self.depth_state {
            builder = builder.depth(depth);
        }
        let pipeline = builder.build()?;

        tracing::debug!(variant = %variant, shader = program.label(), "pipeline built");
        self.pipeline = Some(pipeline);
        self.bind_group_layout = bind_group_layout;
        self.program = Some(program);
        self.state = RendererState::ShadersBuilt;
        Ok(())
    }

    /// Upload the variant's geometry into exactly sized GPU buffers.
    fn build_buffers(&mut self) -> Result<()> {
        debug_assert_eq!(self.state, RendererState::ShadersBuilt);
        let variant = self.descriptor.variant;
        let payload = variant.payload();
        let ctx = &self.ctx;

        let attributes = match (variant.attribute_binding(), payload.attributes.clone()) {
            (AttributeBinding::Generated, Attributes::Generated { .. }) => {
                GpuAttributes::Generated
            }
            (AttributeBinding::SeparateBuffers, Attributes::Separate { positions, colors }) => {
                GpuAttributes::Separate {
                    positions: VertexBuffer::new(ctx, &positions, Some("positions")),
                    colors: VertexBuffer::new(ctx, &colors, Some("colors")),
                }
            }
            (AttributeBinding::Interleaved, Attributes::Interleaved(vertices)) => {
                GpuAttributes::Interleaved(VertexBuffer::new(ctx, &vertices, Some("vertices")))
            }
            (AttributeBinding::ArgumentTable, Attributes::Separate { positions, colors }) => {
                let positions = StorageBuffer::new(ctx, &positions, Some("positions"));
                let colors = StorageBuffer::new(ctx, &colors, Some("colors"));
                let layout = self.bind_group_layout.as_ref().ok_or_else(|| {
                    RendererError::pipeline(variant.name(), "argument table layout missing")
                })?;
                let table =
                    ArgumentTable::new(ctx, layout, &[&positions, &colors], Some("argument table"));
                GpuAttributes::Arguments {
                    table,
                    positions,
                    colors,
                }
            }
            (binding, _) => {
                return Err(RendererError::pipeline(
                    variant.name(),
                    format!("{binding:?} binding does not match the geometry storage"),
                ))
            }
        };

        let indices = payload
            .indices
            .as_deref()
            .map(|indices| IndexBuffer::new_u16(ctx, indices, Some("indices")));

        if variant == Variant::Cube {
            let layout = self.bind_group_layout.as_ref().ok_or_else(|| {
                RendererError::pipeline(variant.name(), "transform layout missing")
            })?;
            let uniform = TransformUniform::new(cube_transform(self.descriptor.aspect));
            self.transform = Some(UniformBuffer::new(ctx, layout, &uniform, 0, Some("transform")));
        }

        tracing::debug!(
            variant = %variant,
            vertex_bytes = attributes.byte_len(),
            index_bytes = indices.as_ref().map_or(0, IndexBuffer::byte_len),
            "buffers uploaded"
        );

        self.vertex_count = payload.vertex_count();
        self.attributes = Some(attributes);
        self.indices = indices;
        self.state = RendererState::BuffersBuilt;
        Ok(())
    }

    /// Encode, submit and present one frame.
    ///
    /// Exactly one command buffer is submitted per call. Without a drawable
    /// the buffer is empty and nothing is presented. Transient objects
    /// (views, encoder, pass) are dropped before this returns.
    pub fn draw<D: Drawable>(&self, frame: Frame<'_, D>) {
        let index = self.frames.get();
        self.frames.set(index + 1);
        let _span = tracing::trace_span!("frame", index, variant = %self.descriptor.variant)
            .entered();

        let mut encoder = self.ctx.create_encoder(Some("frame encoder"));

        if let Some(drawable) = &frame.drawable {
            let depth = frame.depth.filter(|_| self.depth_state.is_some());
            let depth_mismatch = depth.filter(|depth| depth.size() != drawable.size());
            let depth_view = depth
                .filter(|_| depth_mismatch.is_none())
                .map(|depth| depth.view());

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: drawable.view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: frame.clear.color_load_op(),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: depth_view.map(|view| {
                    wgpu::RenderPassDepthStencilAttachment {
                        view,
                        depth_ops: Some(wgpu::Operations {
                            load: frame.clear.depth_load_op(),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if drawable.format() != self.descriptor.color_format {
                tracing::warn!(
                    expected = ?self.descriptor.color_format,
                    actual = ?drawable.format(),
                    "drawable format does not match pipeline, skipping draw"
                );
            } else if let Some(depth) = depth_mismatch {
                tracing::warn!(
                    depth = ?depth.size(),
                    drawable = ?drawable.size(),
                    "depth attachment size does not match drawable, skipping draw"
                );
            } else if self.depth_state.is_some() && depth_view.is_none() {
                tracing::warn!("depth-tested variant drawn without depth attachment, skipping draw");
            } else {
                self.encode(&mut pass);
            }
        }

        self.ctx.submit([encoder.finish()]);

        if let Some(drawable) = frame.drawable {
            drawable.present();
        }
    }

    fn encode(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(pipeline) = &self.pipeline else {
            return;
        };
        pass.set_pipeline(pipeline);

        match &self.attributes {
            Some(GpuAttributes::Separate { positions, colors }) => {
                pass.set_vertex_buffer(0, positions.slice());
                pass.set_vertex_buffer(1, colors.slice());
            }
            Some(GpuAttributes::Interleaved(vertices)) => {
                pass.set_vertex_buffer(0, vertices.slice());
            }
            Some(GpuAttributes::Arguments { table, .. }) => {
                pass.set_bind_group(0, table.bind_group(), &[]);
            }
            Some(GpuAttributes::Generated) | None => {}
        }

        if let Some(transform) = &self.transform {
            pass.set_bind_group(0, transform.bind_group(), &[]);
        }

        match &self.indices {
            Some(indices) => {
                pass.set_index_buffer(indices.slice(), indices.format());
                pass.draw_indexed(0..indices.count(), 0, 0..1);
            }
            None => pass.draw(0..self.vertex_count, 0..1),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RendererState {
        self.state
    }

    /// The variant this renderer draws.
    pub fn variant(&self) -> Variant {
        self.descriptor.variant
    }

    /// Color format the pipeline renders to.
    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.descriptor.color_format
    }

    /// Depth policy, for depth-tested variants.
    pub fn depth_state(&self) -> Option<DepthState> {
        self.depth_state
    }

    /// The validated shader program.
    pub fn program(&self) -> Option<&ShaderProgram> {
        self.program.as_ref()
    }

    /// Number of draw calls made.
    pub fn frame_count(&self) -> u64 {
        self.frames.get()
    }

    /// Bytes of vertex attribute data resident on the GPU.
    pub fn vertex_buffer_bytes(&self) -> u64 {
        self.attributes.as_ref().map_or(0, GpuAttributes::byte_len)
    }

    /// Bytes of index data resident on the GPU.
    pub fn index_buffer_bytes(&self) -> u64 {
        self.indices.as_ref().map_or(0, IndexBuffer::byte_len)
    }

    /// Vertices (unindexed) or indices (indexed) consumed per draw.
    pub fn draw_count(&self) -> u32 {
        self.indices
            .as_ref()
            .map_or(self.vertex_count, IndexBuffer::count)
    }

    /// Whether the draw call is indexed.
    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }
}

impl Drop for FrameRenderer {
    fn drop(&mut self) {
        tracing::debug!(
            variant = %self.descriptor.variant,
            from = ?self.state,
            frames = self.frames.get(),
            "renderer torn down"
        );
        self.state = RendererState::TornDown;
    }
}

impl std::fmt::Debug for FrameRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameRenderer")
            .field("variant", &self.descriptor.variant)
            .field("state", &self.state)
            .field("frames", &self.frames.get())
            .finish()
    }
}
