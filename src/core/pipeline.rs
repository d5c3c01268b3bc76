//! Render pipeline builder
//!
//! Builds a render pipeline from a validated [`ShaderProgram`]. The vertex
//! layout and color format are checked against the program and the target
//! before anything is handed to the device.

use crate::context::WgpuContext;
use crate::core::render_states::DepthState;
use crate::core::texture::DepthTexture;
use crate::error::{RendererError, Result};
use crate::shader::ShaderProgram;

/// Builder for creating render pipelines.
pub struct PipelineBuilder<'a> {
    ctx: &'a WgpuContext,
    label: Option<&'a str>,
    program: Option<&'a ShaderProgram>,
    vertex_layouts: Vec<wgpu::VertexBufferLayout<'a>>,
    bind_group_layouts: Vec<&'a wgpu::BindGroupLayout>,
    color_format: wgpu::TextureFormat,
    depth_state: Option<DepthState>,
}

impl<'a> PipelineBuilder<'a> {
    /// Create a new pipeline builder.
    pub fn new(ctx: &'a WgpuContext) -> Self {
        Self {
            ctx,
            label: None,
            program: None,
            vertex_layouts: Vec::new(),
            bind_group_layouts: Vec::new(),
            color_format: wgpu::TextureFormat::Bgra8UnormSrgb,
            depth_state: None,
        }
    }

    /// Set the pipeline label.
    pub fn label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Set the shader program.
    pub fn program(mut self, program: &'a ShaderProgram) -> Self {
        self.program = Some(program);
        self
    }

    /// Add vertex buffer layouts, in slot order.
    pub fn vertex_layouts(
        mut self,
        layouts: impl IntoIterator<Item = wgpu::VertexBufferLayout<'a>>,
    ) -> Self {
        self.vertex_layouts.extend(layouts);
        self
    }

    /// Add a bind group layout.
    pub fn bind_group_layout(mut self, layout: &'a wgpu::BindGroupLayout) -> Self {
        self.bind_group_layouts.push(layout);
        self
    }

    /// Set the color target format.
    pub fn color_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.color_format = format;
        self
    }

    /// Enable depth testing.
    pub fn depth(mut self, state: DepthState) -> Self {
        self.depth_state = Some(state);
        self
    }

    /// Check the description without touching the device.
    pub fn validate(&self) -> Result<&'a ShaderProgram> {
        let label = self.label.unwrap_or("pipeline");
        let program = self
            .program
            .ok_or_else(|| RendererError::pipeline(label, "shader program is required"))?;

        if self.color_format.is_depth_stencil_format() {
            return Err(RendererError::pipeline(
                label,
                format!("{:?} is not a color format", self.color_format),
            ));
        }

        let mut declared: Vec<u32> = self
            .vertex_layouts
            .iter()
            .flat_map(|layout| layout.attributes.iter().map(|a| a.shader_location))
            .collect();
        declared.sort_unstable();
        if declared != program.vertex_inputs() {
            return Err(RendererError::pipeline(
                label,
                format!(
                    "vertex layout declares locations {declared:?} but `{}` reads {:?}",
                    ShaderProgram::VERTEX_ENTRY,
                    program.vertex_inputs()
                ),
            ));
        }

        Ok(program)
    }

    /// Build the render pipeline.
    ///
    /// Device-side validation (bind groups missing from the layout, color
    /// formats the adapter cannot render to) is captured in an error scope
    /// and returned as [`RendererError::PipelineValidation`].
    pub fn build(self) -> Result<wgpu::RenderPipeline> {
        let program = self.validate()?;
        let label = self.label.unwrap_or("pipeline");
        let scope = self.ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader_module = program.create_module(&self.ctx.device);

        let pipeline_layout =
            self.ctx
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: self.label,
                    bind_group_layouts: &self.bind_group_layouts,
                    immediate_size: 0,
                });

        let depth_stencil = self
            .depth_state
            .map(|state| state.to_wgpu(DepthTexture::FORMAT));

        let pipeline = self
            .ctx
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: self.label,
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader_module,
                    entry_point: Some(ShaderProgram::VERTEX_ENTRY),
                    buffers: &self.vertex_layouts,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader_module,
                    entry_point: Some(ShaderProgram::FRAGMENT_ENTRY),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.color_format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview_mask: None,
                cache: None,
            });

        if let Some(error) = pollster::block_on(scope.pop()) {
            return Err(RendererError::pipeline(label, error.to_string()));
        }
        Ok(pipeline)
    }
}
