//! Per-frame inputs
//!
//! A [`Frame`] is what the host hands to [`FrameRenderer::draw`]: the
//! drawable to render into (if the host has one), an optional depth
//! attachment and the clear state. It lives for exactly one draw call.
//!
//! [`FrameRenderer::draw`]: super::FrameRenderer::draw

use crate::context::WgpuContext;
use crate::core::render_states::ClearState;
use crate::core::texture::DepthTexture;
use std::sync::atomic::{AtomicU64, Ordering};

/// A presentable surface, consumed once per frame.
pub trait Drawable {
    /// The color attachment view.
    fn view(&self) -> &wgpu::TextureView;

    /// Pixel format of the view.
    fn format(&self) -> wgpu::TextureFormat;

    /// Width and height of the view in pixels.
    fn size(&self) -> (u32, u32);

    /// Hand the rendered image to the compositor.
    fn present(self);
}

/// Input for one draw call.
pub struct Frame<'a, D> {
    /// The drawable, or `None` if the host has nothing to render into.
    pub drawable: Option<D>,
    /// Depth attachment for depth-tested variants.
    pub depth: Option<&'a DepthTexture>,
    /// How attachments are cleared at the start of the pass.
    pub clear: ClearState,
}

impl<'a, D: Drawable> Frame<'a, D> {
    /// A frame rendering into `drawable`.
    pub fn new(drawable: D) -> Self {
        Self {
            drawable: Some(drawable),
            depth: None,
            clear: ClearState::default(),
        }
    }

    /// A frame with no drawable; drawing it submits an empty command buffer.
    pub fn empty() -> Self {
        Self {
            drawable: None,
            depth: None,
            clear: ClearState::default(),
        }
    }

    /// Attach a depth texture.
    pub fn with_depth(mut self, depth: &'a DepthTexture) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Set the clear state.
    pub fn with_clear(mut self, clear: ClearState) -> Self {
        self.clear = clear;
        self
    }
}

/// An offscreen color texture that hands out drawables and counts how many
/// were presented. Used for headless rendering.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    format: wgpu::TextureFormat,
    presented: AtomicU64,
}

impl OffscreenTarget {
    /// Create a render target of the given size and format.
    pub fn new(
        ctx: &WgpuContext,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        label: Option<&str>,
    ) -> Self {
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label,
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        Self {
            texture,
            format,
            presented: AtomicU64::new(0),
        }
    }

    /// Acquire a drawable for the next frame.
    pub fn acquire(&self) -> OffscreenDrawable<'_> {
        OffscreenDrawable {
            view: self
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default()),
            target: self,
        }
    }

    /// Number of drawables presented so far.
    pub fn presented_count(&self) -> u64 {
        self.presented.load(Ordering::Relaxed)
    }

    /// Get the texture size.
    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }
}

/// A drawable backed by an [`OffscreenTarget`].
pub struct OffscreenDrawable<'a> {
    view: wgpu::TextureView,
    target: &'a OffscreenTarget,
}

impl Drawable for OffscreenDrawable<'_> {
    fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    fn format(&self) -> wgpu::TextureFormat {
        self.target.format
    }

    fn size(&self) -> (u32, u32) {
        self.target.size()
    }

    fn present(self) {
        self.target.presented.fetch_add(1, Ordering::Relaxed);
    }
}
