//! Bones
//!
//! A minimal wgpu rendering window: device creation, shader compilation,
//! vertex/index buffer upload, pipeline construction and per-frame command
//! submission.
//!
//! # Architecture
//!
//! 1. **context** - Core wgpu wrapper (Device, Queue)
//! 2. **core** - GPU primitives (buffers, argument tables, pipelines)
//! 3. **geometry** - CPU-side geometry payloads for each variant
//! 4. **shader** - Shader source loading and validation
//! 5. **renderer** - The frame renderer (setup + per-frame draw)
//! 6. **window** - Window management with winit (feature = "window")

pub mod context;
pub mod core;
pub mod error;
pub mod geometry;
pub mod renderer;
pub mod shader;

#[cfg(feature = "window")]
pub mod window;

pub use context::WgpuContext;

pub use core::{
    ArgumentTable, ClearState, DepthState, DepthTexture, IndexBuffer, PipelineBuilder,
    StorageBuffer, UniformBuffer, VertexBuffer, VertexP, VertexPC,
};

pub use error::{ContextError, RendererError};

pub use geometry::{Attributes, GeometryPayload, Variant};

pub use renderer::{
    Drawable, Frame, FrameRenderer, OffscreenDrawable, OffscreenTarget, RendererDescriptor,
    RendererState,
};

pub use shader::{ShaderProgram, ShaderSource};

#[cfg(feature = "window")]
pub use window::{FrameInput, FrameOutput, SurfaceDrawable, Window, WindowSettings};

// Re-export glam for convenience
pub use glam;
