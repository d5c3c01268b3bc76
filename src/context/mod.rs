//! WgpuContext - Device and Queue wrapper
//!
//! Owns the GPU device and the single command queue work is submitted on.

use crate::error::ContextError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Core wgpu context containing device and queue.
///
/// Clones share the same device, queue and submission counter.
#[derive(Clone)]
pub struct WgpuContext {
    /// The wgpu device for creating GPU resources.
    pub device: Arc<wgpu::Device>,
    /// The wgpu queue for submitting commands.
    pub queue: Arc<wgpu::Queue>,
    submissions: Arc<AtomicU64>,
}

impl WgpuContext {
    /// Create a new context from existing device and queue.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            submissions: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Request an adapter and device from an existing instance.
    pub async fn from_instance(
        instance: &wgpu::Instance,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self, ContextError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface,
                force_fallback_adapter: false,
            })
            .await?;

        Self::from_adapter(&adapter).await
    }

    /// Request a device and queue from an adapter.
    pub async fn from_adapter(adapter: &wgpu::Adapter) -> Result<Self, ContextError> {
        let info = adapter.get_info();
        tracing::debug!(name = %info.name, backend = ?info.backend, "acquired adapter");

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("bones device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        Ok(Self::new(device, queue))
    }

    /// Create a new context asynchronously with default settings.
    pub async fn new_async(
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self, ContextError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        Self::from_instance(&instance, compatible_surface).await
    }

    /// Create a new context synchronously (blocks).
    pub fn new_blocking(
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self, ContextError> {
        pollster::block_on(Self::new_async(compatible_surface))
    }

    /// The command queue all work is submitted on.
    pub fn submit_queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Submit command buffers to the queue.
    pub fn submit<I: IntoIterator<Item = wgpu::CommandBuffer>>(&self, command_buffers: I) {
        self.submit_queue().submit(command_buffers);
        self.submissions.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of `submit` calls made through this context.
    pub fn submission_count(&self) -> u64 {
        self.submissions.load(Ordering::Relaxed)
    }

    /// Create a command encoder.
    pub fn create_encoder(&self, label: Option<&str>) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label })
    }
}

impl std::fmt::Debug for WgpuContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuContext")
            .field("submissions", &self.submission_count())
            .finish()
    }
}
