//! Bones demo
//!
//! Opens a window and draws one renderer variant every frame.
//!
//! Run with: cargo run -p bones-app -- [variant] [shader.wgsl | general]

use bones::{
    FrameOutput, FrameRenderer, RendererDescriptor, ShaderSource, Variant, Window, WindowSettings,
};
use std::path::PathBuf;

struct State {
    descriptor: RendererDescriptor,
    renderer: Option<FrameRenderer>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(error) = run() {
        log::error!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let variant = match args.next() {
        Some(name) => name.parse::<Variant>()?,
        None => Variant::default(),
    };

    let settings = WindowSettings::default().title(format!("Bones - {variant}"));
    let mut descriptor = RendererDescriptor::new(variant).aspect(settings.aspect());
    // `general` loads the shared program from its default location
    match args.next().as_deref() {
        Some("general") => descriptor = descriptor.shader(ShaderSource::default_file()),
        Some(path) => descriptor = descriptor.shader(ShaderSource::File(PathBuf::from(path))),
        None => {}
    }

    let state = State {
        descriptor,
        renderer: None,
    };

    let window = Window::new(settings)?;
    window.render_loop(state, |state, frame| {
        // Build on the first frame, once the surface format is known
        if state.renderer.is_none() {
            let descriptor = state
                .descriptor
                .clone()
                .color_format(frame.surface_format);
            state.renderer = Some(FrameRenderer::new(frame.ctx, descriptor)?);
        }

        if let Some(renderer) = &state.renderer {
            renderer.draw(frame.into_frame());
        }

        Ok(FrameOutput::default())
    })
}
