//! Error types
//!
//! Every error here is a setup-time failure. The draw path has no error
//! surface of its own.

use std::path::PathBuf;

/// Failure to acquire the GPU device or its queue.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// No adapter matched the request.
    #[error("no suitable GPU adapter: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    /// The adapter refused to create a device/queue pair.
    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

/// Failure while building a [`FrameRenderer`](crate::FrameRenderer).
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    /// The shader source file could not be read.
    #[error("failed to read shader source {path}: {source}")]
    ShaderLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The shader source did not parse or validate.
    #[error("shader `{label}` failed to compile:\n{message}")]
    ShaderCompile { label: String, message: String },
    /// The pipeline description does not agree with the shader or target.
    #[error("pipeline `{label}` is invalid: {message}")]
    PipelineValidation { label: String, message: String },
    /// Device acquisition failed before setup could begin.
    #[error(transparent)]
    Context(#[from] ContextError),
}

impl RendererError {
    pub(crate) fn pipeline(label: &str, message: impl Into<String>) -> Self {
        Self::PipelineValidation {
            label: label.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T, E = RendererError> = std::result::Result<T, E>;
