//! Headless renderer tests.
//!
//! These need a GPU adapter; when none is available each test returns early.

use bones::{
    DepthTexture, Frame, FrameRenderer, OffscreenTarget, RendererDescriptor, RendererError,
    RendererState, ShaderSource, Variant, WgpuContext,
};
use std::path::PathBuf;

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8UnormSrgb;

fn context() -> Option<WgpuContext> {
    match WgpuContext::new_blocking(None) {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            eprintln!("skipping: {e}");
            None
        }
    }
}

#[test]
fn draw_once_submits_and_presents_once() {
    let Some(ctx) = context() else { return };
    let target = OffscreenTarget::new(&ctx, 64, 64, FORMAT, Some("target"));
    let renderer =
        FrameRenderer::new(&ctx, RendererDescriptor::new(Variant::Triangle).color_format(FORMAT))
            .unwrap();
    assert_eq!(renderer.state(), RendererState::Ready);
    assert_eq!(renderer.color_format(), FORMAT);

    let before = ctx.submission_count();
    renderer.draw(Frame::new(target.acquire()));

    assert_eq!(ctx.submission_count() - before, 1);
    assert_eq!(target.presented_count(), 1);
    assert_eq!(renderer.frame_count(), 1);
}

#[test]
fn every_variant_draws_repeatedly() {
    let Some(ctx) = context() else { return };
    let target = OffscreenTarget::new(&ctx, 64, 64, FORMAT, Some("target"));
    let depth = DepthTexture::new(&ctx, 64, 64, Some("depth"));

    for variant in Variant::ALL {
        let renderer =
            FrameRenderer::new(&ctx, RendererDescriptor::new(variant).color_format(FORMAT))
                .unwrap_or_else(|e| panic!("{variant}: {e}"));

        let payload = variant.payload();
        let vertex_bytes = renderer.vertex_buffer_bytes();
        let index_bytes = renderer.index_buffer_bytes();
        assert_eq!(renderer.variant(), variant);
        assert_eq!(vertex_bytes, payload.vertex_bytes(), "{variant}");
        assert_eq!(index_bytes, payload.index_bytes(), "{variant}");
        assert_eq!(renderer.draw_count(), payload.draw_count(), "{variant}");
        assert_eq!(renderer.depth_state().is_some(), variant.depth_tested());

        let submitted = ctx.submission_count();
        let presented = target.presented_count();
        for _ in 0..3 {
            renderer.draw(Frame::new(target.acquire()).with_depth(&depth));
        }

        assert_eq!(ctx.submission_count() - submitted, 3, "{variant}");
        assert_eq!(target.presented_count() - presented, 3, "{variant}");
        assert_eq!(renderer.vertex_buffer_bytes(), vertex_bytes);
        assert_eq!(renderer.index_buffer_bytes(), index_bytes);
    }
}

#[test]
fn cube_uses_expected_draw_parameters() {
    let Some(ctx) = context() else { return };
    let renderer = FrameRenderer::new(&ctx, RendererDescriptor::new(Variant::Cube)).unwrap();
    assert!(renderer.is_indexed());
    assert_eq!(renderer.draw_count(), 36);
    assert_eq!(renderer.vertex_buffer_bytes(), 24 * 32);
    assert_eq!(renderer.index_buffer_bytes(), 36 * 2);
    let depth = renderer.depth_state().unwrap();
    assert!(depth.write);
    assert_eq!(depth.compare, wgpu::CompareFunction::Less);
}

#[test]
fn frame_without_drawable_submits_nothing_visible() {
    let Some(ctx) = context() else { return };
    let renderer = FrameRenderer::new(&ctx, RendererDescriptor::new(Variant::Quad)).unwrap();

    let before = ctx.submission_count();
    renderer.draw(Frame::<bones::OffscreenDrawable<'_>>::empty());

    assert_eq!(ctx.submission_count() - before, 1);
    assert_eq!(renderer.frame_count(), 1);
}

#[test]
fn mismatched_drawable_format_is_tolerated() {
    let Some(ctx) = context() else { return };
    let target = OffscreenTarget::new(
        &ctx,
        32,
        32,
        wgpu::TextureFormat::Rgba8Unorm,
        Some("other format"),
    );
    let renderer =
        FrameRenderer::new(&ctx, RendererDescriptor::new(Variant::Triangle).color_format(FORMAT))
            .unwrap();

    renderer.draw(Frame::new(target.acquire()));
    assert_eq!(target.presented_count(), 1);
}

#[test]
fn mismatched_depth_size_is_tolerated() {
    let Some(ctx) = context() else { return };
    let target = OffscreenTarget::new(&ctx, 64, 64, FORMAT, Some("target"));
    let depth = DepthTexture::new(&ctx, 32, 32, Some("small depth"));
    let renderer =
        FrameRenderer::new(&ctx, RendererDescriptor::new(Variant::Cube).color_format(FORMAT))
            .unwrap();

    let before = ctx.submission_count();
    renderer.draw(Frame::new(target.acquire()).with_depth(&depth));

    assert_eq!(ctx.submission_count() - before, 1);
    assert_eq!(target.presented_count(), 1);
    assert_eq!(renderer.frame_count(), 1);
}

#[test]
fn shader_file_is_loaded() {
    let Some(ctx) = context() else { return };
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("shaders/general.wgsl");
    let descriptor = RendererDescriptor::new(Variant::InterleavedQuad)
        .shader(ShaderSource::File(path))
        .color_format(FORMAT);
    let renderer = FrameRenderer::new(&ctx, descriptor).unwrap();
    assert!(renderer
        .program()
        .is_some_and(|p| p.label().ends_with("general.wgsl")));
}

#[test]
fn setup_failures_never_yield_a_renderer() {
    let Some(ctx) = context() else { return };

    let missing = RendererDescriptor::new(Variant::Triangle)
        .shader(ShaderSource::File(PathBuf::from("shaders/missing.wgsl")));
    assert!(matches!(
        FrameRenderer::new(&ctx, missing),
        Err(RendererError::ShaderLoad { .. })
    ));

    // The general program reads vertex buffers; the argument table variant has none.
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("shaders/general.wgsl");
    let mismatched =
        RendererDescriptor::new(Variant::ArgumentTriangle).shader(ShaderSource::File(path));
    assert!(matches!(
        FrameRenderer::new(&ctx, mismatched),
        Err(RendererError::PipelineValidation { .. })
    ));

    let depth_target =
        RendererDescriptor::new(Variant::Quad).color_format(wgpu::TextureFormat::Depth32Float);
    assert!(matches!(
        FrameRenderer::new(&ctx, depth_target),
        Err(RendererError::PipelineValidation { .. })
    ));

    // Reads storage buffers at group 0; the hard-coded triangle binds no groups.
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("shaders/argument.wgsl");
    let unbound =
        RendererDescriptor::new(Variant::ShaderTriangle).shader(ShaderSource::File(path));
    assert!(matches!(
        FrameRenderer::new(&ctx, unbound),
        Err(RendererError::PipelineValidation { .. })
    ));

    let unrenderable = RendererDescriptor::new(Variant::Triangle)
        .color_format(wgpu::TextureFormat::Rgb9e5Ufloat);
    assert!(matches!(
        FrameRenderer::new(&ctx, unrenderable),
        Err(RendererError::PipelineValidation { .. })
    ));
}
