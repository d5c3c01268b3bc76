//! Core rendering abstractions
//!
//! This module provides mid-level abstractions over wgpu primitives.

pub mod argument;
pub mod buffer;
pub mod pipeline;
pub mod render_states;
pub mod texture;
pub mod vertex;

pub use argument::ArgumentTable;
pub use buffer::{IndexBuffer, StorageBuffer, UniformBuffer, VertexBuffer};
pub use pipeline::PipelineBuilder;
pub use render_states::{ClearState, DepthState};
pub use texture::DepthTexture;
pub use vertex::{VertexP, VertexPC};
