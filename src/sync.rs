// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Layout state synchronization.
//!
//! Keeps the form controls, the derived [`RenderState`] and the style of the
//! preview surface in step. Every operation receives the [`SyncContext`]
//! explicitly; the egui adapter in `ui::canvas` only paints the resulting
//! [`StyleEffects`].

use crate::io::export::{self, CaptureOptions, Download, DownloadSink, PreviewNode, Rasterizer};
use crate::models::media::{BlobStore, MediaFile, MediaSlot};
use crate::models::preset;
use crate::models::render_state::{derive_state, Controls, RenderState, Rgb};
use crate::util::geometry::{fit_scale, ClipInset, FixedInset, Viewport};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Visual properties to apply to the preview surface.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleEffects {
    pub scale: f32,
    /// Surface size in logical points, after scaling.
    pub width: f32,
    pub height: f32,
    /// Canvas size in pixels, before scaling.
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub unsafe_background: Rgb,
    pub safe_background: Rgb,
    pub clip: ClipInset,
    pub label: String,
    pub overlay_src: String,
    pub overlay_visible: bool,
}

/// Everything the preview shows: style, user media and the screen position
/// of the last paint.
#[derive(Debug)]
pub struct PreviewSurface {
    pub style: StyleEffects,
    pub media: MediaSlot,
    pub node: Option<PreviewNode>,
}

/// State shared by all synchronizer operations.
#[derive(Debug)]
pub struct SyncContext {
    pub controls: Controls,
    pub surface: PreviewSurface,
    pub blobs: BlobStore,
    pub viewport: Viewport,
    pub inset: FixedInset,
}

impl SyncContext {
    /// Build a context and apply the first preset.
    pub fn new(controls: Controls, viewport: Viewport, inset: FixedInset) -> Self {
        let style = apply_state(&derive_state(&controls), viewport, inset);
        let mut ctx = Self {
            controls,
            surface: PreviewSurface {
                style,
                media: MediaSlot::default(),
                node: None,
            },
            blobs: BlobStore::default(),
            viewport,
            inset,
        };
        apply_preset(&mut ctx, preset::initial().id);
        ctx
    }

    /// Current render state of the controls.
    pub fn state(&self) -> RenderState {
        derive_state(&self.controls)
    }
}

/// Compute the style of the preview surface for `state`.
pub fn apply_state(state: &RenderState, viewport: Viewport, inset: FixedInset) -> StyleEffects {
    let scale = fit_scale(viewport, inset, state.width, state.height);
    StyleEffects {
        scale,
        width: state.width as f32 * scale,
        height: state.height as f32 * scale,
        canvas_width: state.width,
        canvas_height: state.height,
        unsafe_background: state.unsafe_color,
        safe_background: state.safe_color,
        clip: ClipInset {
            top: state.top,
            right: state.right,
            bottom: state.bottom,
            left: state.left,
        },
        label: format!("{}x{}", state.width, state.height),
        overlay_src: state.ui_src.clone(),
        overlay_visible: state.ui_visible && !state.ui_src.is_empty(),
    }
}

/// Re-derive the state from the controls and restyle the surface.
pub fn refresh(ctx: &mut SyncContext) {
    let state = derive_state(&ctx.controls);
    ctx.surface.style = apply_state(&state, ctx.viewport, ctx.inset);
}

/// Track a new viewport size, restyling only when it changed.
pub fn resize(ctx: &mut SyncContext, viewport: Viewport) {
    if ctx.viewport != viewport {
        ctx.viewport = viewport;
        refresh(ctx);
    }
}

/// Load preset `id` into the controls. Unknown ids are ignored.
pub fn apply_preset(ctx: &mut SyncContext, id: &str) {
    let Some(preset) = preset::find(id) else {
        log::debug!("Ignoring unknown preset {:?}", id);
        return;
    };

    let controls = &mut ctx.controls;
    controls.preset = preset.id.to_string();
    controls.width = preset.width.to_string();
    controls.height = preset.height.to_string();
    controls.top = preset.top.to_string();
    controls.bottom = preset.bottom.to_string();
    controls.left = preset.left.to_string();
    controls.right = preset.right.to_string();
    controls.show_ui = preset.has_overlay();

    log::info!("Applied preset {} ({}x{})", preset.id, preset.width, preset.height);
    refresh(ctx);
}

/// Show `file` inside the canvas, replacing any previous media.
pub fn load_user_media(ctx: &mut SyncContext, file: Option<MediaFile>) {
    let Some(file) = file else {
        return;
    };
    let name = file.name.clone();
    let mime = file.mime.clone();
    let element = ctx.surface.media.replace(file, &mut ctx.blobs);
    log::info!("Loaded {} as {:?} ({}) at {}", name, element.kind(), mime, element.src());
    log::debug!("{} live blob(s)", ctx.blobs.len());
}

/// Flip between light and dark display mode.
pub fn toggle_theme(ctx: &mut SyncContext) {
    ctx.controls.dark_mode = !ctx.controls.dark_mode;
}

/// Rasterize the preview and hand the PNG to `sink`.
pub fn export_image(
    ctx: &SyncContext,
    rasterizer: &mut dyn Rasterizer,
    sink: &mut dyn DownloadSink,
) -> Result<Option<PathBuf>> {
    let node = ctx
        .surface
        .node
        .context("Preview surface has not been painted yet")?;
    let bitmap = rasterizer.capture(&node, &CaptureOptions::default())?;
    let state = ctx.state();
    let download = Download {
        file_name: export::template_file_name(state.width, state.height),
        bytes: export::encode_png(&bitmap)?,
    };

    let file_name = download.file_name.clone();
    let saved = sink.deliver(download)?;
    match &saved {
        Some(path) => log::info!("Exported {} to {}", file_name, path.display()),
        None => log::info!("Export of {} cancelled", file_name),
    }
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::{MediaElement, MediaKind};
    use image::RgbaImage;
    use std::sync::Arc;

    fn context() -> SyncContext {
        let controls = Controls::new(Rgb([0, 255, 0]), Rgb([255, 0, 0]), false);
        SyncContext::new(controls, Viewport::new(1600.0, 1000.0), FixedInset::default())
    }

    fn media(name: &str, mime: &str) -> MediaFile {
        MediaFile {
            name: name.to_string(),
            mime: mime.to_string(),
            path: PathBuf::from(name),
            bytes: Arc::from(vec![0u8; 4]),
        }
    }

    struct SolidRasterizer {
        calls: Vec<(PreviewNode, CaptureOptions)>,
    }

    impl Rasterizer for SolidRasterizer {
        fn capture(&mut self, node: &PreviewNode, options: &CaptureOptions) -> Result<RgbaImage> {
            self.calls.push((*node, *options));
            Ok(RgbaImage::from_pixel(
                node.width as u32,
                node.height as u32,
                image::Rgba([1, 2, 3, 255]),
            ))
        }
    }

    struct FailingRasterizer;

    impl Rasterizer for FailingRasterizer {
        fn capture(&mut self, _: &PreviewNode, _: &CaptureOptions) -> Result<RgbaImage> {
            anyhow::bail!("capture failed")
        }
    }

    #[derive(Default)]
    struct MemorySink {
        downloads: Vec<Download>,
    }

    impl DownloadSink for MemorySink {
        fn deliver(&mut self, download: Download) -> Result<Option<PathBuf>> {
            let path = PathBuf::from(&download.file_name);
            self.downloads.push(download);
            Ok(Some(path))
        }
    }

    #[test]
    fn test_startup_applies_first_preset() {
        let ctx = context();
        assert_eq!(ctx.controls.preset, "ig-reels");
        assert_eq!(ctx.surface.style.label, "1080x1920");
        assert!(ctx.surface.style.overlay_visible);
    }

    #[test]
    fn test_apply_reels_preset() {
        let mut ctx = context();
        apply_preset(&mut ctx, "custom");
        apply_preset(&mut ctx, "ig-reels");

        let state = ctx.state();
        assert_eq!(
            (state.width, state.height, state.top, state.bottom, state.left, state.right),
            (1080, 1920, 220, 420, 0, 0)
        );
        assert!(ctx.controls.show_ui);
    }

    #[test]
    fn test_apply_square_post_disables_overlay() {
        let mut ctx = context();
        apply_preset(&mut ctx, "ig-post-1x1");
        assert!(!ctx.controls.show_ui);
        assert!(!ctx.surface.style.overlay_visible);
        assert_eq!(ctx.surface.style.label, "1080x1080");
    }

    #[test]
    fn test_unknown_preset_is_ignored() {
        let mut ctx = context();
        ctx.controls.top = "333".into();
        let before = ctx.controls.clone();
        let style_before = ctx.surface.style.clone();

        apply_preset(&mut ctx, "snapchat-spotlight");

        assert_eq!(ctx.controls, before);
        assert_eq!(ctx.surface.style, style_before);
    }

    #[test]
    fn test_apply_state_geometry() {
        let ctx = context();
        let style = apply_state(&ctx.state(), Viewport::new(1600.0, 1000.0), FixedInset::default());
        assert_eq!(style.scale, 0.46875);
        assert_eq!(style.width, 1080.0 * 0.46875);
        assert_eq!(style.height, 900.0);
        assert_eq!(style.clip.to_string(), "inset(220px 0px 420px 0px)");
        assert_eq!(style.unsafe_background, Rgb([255, 0, 0]));
        assert_eq!(style.safe_background, Rgb([0, 255, 0]));
    }

    #[test]
    fn test_overlay_needs_toggle_and_source() {
        let mut ctx = context();
        ctx.controls.show_ui = false;
        refresh(&mut ctx);
        assert!(!ctx.surface.style.overlay_visible);
        assert_eq!(ctx.surface.style.overlay_src, "assets/reels-ui.png");

        apply_preset(&mut ctx, "custom");
        ctx.controls.show_ui = true;
        refresh(&mut ctx);
        assert!(!ctx.surface.style.overlay_visible);
    }

    #[test]
    fn test_field_edits_keep_overlay_choice() {
        let mut ctx = context();
        ctx.controls.show_ui = false;
        ctx.controls.bottom = "500".into();
        refresh(&mut ctx);
        assert!(!ctx.controls.show_ui);
        assert_eq!(ctx.surface.style.clip.bottom, 500);
    }

    #[test]
    fn test_refresh_uses_defaults_for_bad_input() {
        let mut ctx = context();
        ctx.controls.width = "wide".into();
        ctx.controls.top = "".into();
        refresh(&mut ctx);
        assert_eq!(ctx.surface.style.canvas_width, 1080);
        assert_eq!(ctx.surface.style.clip.top, 0);
    }

    #[test]
    fn test_resize_restyles() {
        let mut ctx = context();
        resize(&mut ctx, Viewport::new(3000.0, 3000.0));
        assert_eq!(ctx.surface.style.scale, 1.0);
    }

    #[test]
    fn test_video_then_image_leaves_only_image() {
        let mut ctx = context();
        load_user_media(&mut ctx, Some(media("clip.mp4", "video/mp4")));
        let video_src = ctx.surface.media.element().map(MediaElement::src);
        assert_eq!(
            ctx.surface.media.element().map(MediaElement::kind),
            Some(MediaKind::Video)
        );

        load_user_media(&mut ctx, Some(media("photo.png", "image/png")));
        assert_eq!(
            ctx.surface.media.element().map(MediaElement::kind),
            Some(MediaKind::Image)
        );
        assert_eq!(ctx.blobs.len(), 1);
        assert!(video_src.is_some_and(|src| ctx.blobs.get(src).is_none()));
    }

    #[test]
    fn test_missing_file_is_noop() {
        let mut ctx = context();
        load_user_media(&mut ctx, Some(media("photo.png", "image/png")));
        load_user_media(&mut ctx, None);
        assert_eq!(ctx.surface.media.name(), Some("photo.png"));
    }

    #[test]
    fn test_toggle_theme_does_not_touch_state() {
        let mut ctx = context();
        let before = ctx.state();
        toggle_theme(&mut ctx);
        assert!(ctx.controls.dark_mode);
        assert_eq!(ctx.state(), before);
        toggle_theme(&mut ctx);
        assert!(!ctx.controls.dark_mode);
    }

    #[test]
    fn test_export_image() {
        let mut ctx = context();
        apply_preset(&mut ctx, "ig-post-4x5");
        ctx.surface.node = Some(PreviewNode {
            x: 10.0,
            y: 20.0,
            width: 8.0,
            height: 10.0,
        });
        let mut rasterizer = SolidRasterizer { calls: Vec::new() };
        let mut sink = MemorySink::default();

        let saved = export_image(&ctx, &mut rasterizer, &mut sink).unwrap();

        assert_eq!(saved, Some(PathBuf::from("SafeZone_Template_1080x1350.png")));
        let (_, options) = rasterizer.calls[0];
        assert!(options.cross_origin_allowed && options.allow_tainted);
        assert!(options.background_color.is_none());
        let png = image::load_from_memory(&sink.downloads[0].bytes).unwrap();
        assert_eq!((png.width(), png.height()), (8, 10));
    }

    #[test]
    fn test_export_failures_propagate() {
        let mut ctx = context();
        let mut sink = MemorySink::default();
        assert!(export_image(&ctx, &mut FailingRasterizer, &mut sink).is_err());

        ctx.surface.node = Some(PreviewNode {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        });
        assert!(export_image(&ctx, &mut FailingRasterizer, &mut sink).is_err());
        assert!(sink.downloads.is_empty());
    }
}
