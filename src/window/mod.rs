//! Window management module
//!
//! Hosts the render loop: creates a winit window, its surface and the GPU
//! context, then calls a per-frame callback once per redraw with the
//! acquired drawable.

pub mod settings;

pub use settings::WindowSettings;

use crate::context::WgpuContext;
use crate::core::render_states::ClearState;
use crate::core::texture::DepthTexture;
use crate::renderer::{Drawable, Frame};
use anyhow::Context as _;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

/// A window with GPU rendering context.
pub struct Window {
    settings: WindowSettings,
}

impl Window {
    /// Create a new window with the given settings.
    pub fn new(settings: WindowSettings) -> anyhow::Result<Self> {
        Ok(Self { settings })
    }

    /// Run the render loop with a callback.
    ///
    /// The callback receives a `FrameInput` and should return a `FrameOutput`.
    /// Returns once the window closes, or with the first error a callback or
    /// the graphics setup reported.
    pub fn render_loop<F, S>(self, state_init: S, callback: F) -> anyhow::Result<()>
    where
        F: FnMut(&mut S, FrameInput<'_>) -> anyhow::Result<FrameOutput> + 'static,
        S: 'static,
    {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App {
            settings: self.settings,
            state: state_init,
            callback,
            graphics: None,
            error: None,
        };

        event_loop.run_app(&mut app)?;
        match app.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Input data for a frame.
pub struct FrameInput<'a> {
    /// The wgpu context.
    pub ctx: &'a WgpuContext,
    /// The acquired surface texture, if one was available this frame.
    pub drawable: Option<SurfaceDrawable>,
    /// The depth texture, if the window allocates one.
    pub depth_texture: Option<&'a DepthTexture>,
    /// The surface format.
    pub surface_format: wgpu::TextureFormat,
    /// Clear state from the window settings.
    pub clear: ClearState,
}

impl<'a> FrameInput<'a> {
    /// Turn the input into a renderer frame.
    pub fn into_frame(self) -> Frame<'a, SurfaceDrawable> {
        let mut frame = match self.drawable {
            Some(drawable) => Frame::new(drawable),
            None => Frame::empty(),
        }
        .with_clear(self.clear);
        if let Some(depth) = self.depth_texture {
            frame = frame.with_depth(depth);
        }
        frame
    }
}

/// Output data from a frame.
#[derive(Debug, Clone, Default)]
pub struct FrameOutput {
    /// Whether to exit the application.
    pub exit: bool,
}

/// The window's current surface texture.
pub struct SurfaceDrawable {
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
}

impl Drawable for SurfaceDrawable {
    fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    fn size(&self) -> (u32, u32) {
        (self.texture.texture.width(), self.texture.texture.height())
    }

    fn present(self) {
        self.texture.present();
    }
}

struct Graphics {
    window: Arc<winit::window::Window>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    ctx: WgpuContext,
    depth_texture: Option<DepthTexture>,
}

impl Graphics {
    fn new(event_loop: &ActiveEventLoop, settings: &WindowSettings) -> anyhow::Result<Self> {
        let window_attrs = winit::window::WindowAttributes::default()
            .with_title(&settings.title)
            .with_inner_size(winit::dpi::LogicalSize::new(settings.size.0, settings.size.1))
            .with_resizable(settings.resizable);

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("failed to find a GPU adapter for the window")?;

        let ctx = pollster::block_on(WgpuContext::from_adapter(&adapter))?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| *f == wgpu::TextureFormat::Bgra8UnormSrgb)
            .or_else(|| caps.formats.iter().copied().find(|f| f.is_srgb()))
            .or_else(|| caps.formats.first().copied())
            .context("surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if settings.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&ctx.device, &config);
        tracing::info!(?format, width = config.width, height = config.height, "surface configured");

        let depth_texture = settings
            .depth
            .then(|| DepthTexture::new(&ctx, config.width, config.height, Some("depth texture")));

        Ok(Self {
            window,
            surface,
            config,
            ctx,
            depth_texture,
        })
    }

    fn acquire(&self) -> Option<SurfaceDrawable> {
        let texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.ctx.device, &self.config);
                return None;
            }
            Err(e) => {
                tracing::error!("Surface error: {:?}", e);
                return None;
            }
        };

        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Some(SurfaceDrawable {
            texture,
            view,
            format: self.config.format,
        })
    }
}

struct App<S, F> {
    settings: WindowSettings,
    state: S,
    callback: F,
    graphics: Option<Graphics>,
    error: Option<anyhow::Error>,
}

impl<S, F> App<S, F> {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.error.get_or_insert(error);
        event_loop.exit();
    }
}

impl<S, F> ApplicationHandler for App<S, F>
where
    F: FnMut(&mut S, FrameInput<'_>) -> anyhow::Result<FrameOutput> + 'static,
    S: 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }

        match Graphics::new(event_loop, &self.settings) {
            Ok(graphics) => self.graphics = Some(graphics),
            Err(error) => self.fail(event_loop, error),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(graphics) = &mut self.graphics else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    graphics.config.width = size.width;
                    graphics.config.height = size.height;
                    graphics
                        .surface
                        .configure(&graphics.ctx.device, &graphics.config);
                    if let Some(depth) = &mut graphics.depth_texture {
                        depth.resize(&graphics.ctx, size.width, size.height);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                let frame_input = FrameInput {
                    ctx: &graphics.ctx,
                    drawable: graphics.acquire(),
                    depth_texture: graphics.depth_texture.as_ref(),
                    surface_format: graphics.config.format,
                    clear: ClearState::color_and_depth(self.settings.clear_color, 1.0),
                };

                match (self.callback)(&mut self.state, frame_input) {
                    Ok(output) if output.exit => event_loop.exit(),
                    Ok(_) => {}
                    Err(error) => self.fail(event_loop, error),
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(graphics) = &self.graphics {
            graphics.window.request_redraw();
        }
    }
}
