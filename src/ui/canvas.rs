// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Preview canvas.
//!
//! Paints the current [`StyleEffects`] with egui: unsafe background, user
//! media, the clipped safe area, the platform overlay and the dimensions
//! label. All decisions about what to show are made in `sync`; this module
//! only draws them and remembers where the surface landed on screen.

use crate::io::export::PreviewNode;
use crate::io::media;
#[cfg(feature = "video-opencv")]
use crate::models::media::Playback;
use crate::models::media::{BlobStore, BlobUrl, MediaElement};
use crate::models::render_state::Rgb;
use crate::sync::{PreviewSurface, StyleEffects};
use std::collections::HashMap;
use std::path::PathBuf;

/// Opacity of the safe-area tint when user media sits underneath it.
const TINT_ALPHA: f32 = 0.35;

/// GPU textures for overlays and user media, keyed by what they show.
pub struct Textures {
    asset_root: PathBuf,
    /// `None` marks an overlay that failed to load, so it is reported once.
    overlays: HashMap<String, Option<egui::TextureHandle>>,
    media: Option<(BlobUrl, Option<egui::TextureHandle>)>,
    #[cfg(feature = "video-opencv")]
    video: Option<(BlobUrl, Option<media::VideoPlayer>)>,
}

impl Textures {
    pub fn new(asset_root: PathBuf) -> Self {
        Self {
            asset_root,
            overlays: HashMap::new(),
            media: None,
            #[cfg(feature = "video-opencv")]
            video: None,
        }
    }

    /// Drop textures and players whose blob has been revoked.
    fn prune(&mut self, blobs: &BlobStore) {
        if self.media.as_ref().is_some_and(|(url, _)| !blobs.contains(*url)) {
            self.media = None;
        }
        self.prune_video(blobs);
    }

    #[cfg(feature = "video-opencv")]
    fn prune_video(&mut self, blobs: &BlobStore) {
        if self.video.as_ref().is_some_and(|(url, _)| !blobs.contains(*url)) {
            self.video = None;
        }
    }

    #[cfg(not(feature = "video-opencv"))]
    fn prune_video(&mut self, _blobs: &BlobStore) {}

    fn overlay(&mut self, ctx: &egui::Context, src: &str) -> Option<&egui::TextureHandle> {
        let asset_root = &self.asset_root;
        self.overlays
            .entry(src.to_string())
            .or_insert_with(|| {
                let path = asset_root.join(src);
                match media::load_image(&path) {
                    Ok(image) => {
                        log::info!("Loaded overlay {}", path.display());
                        Some(ctx.load_texture(src, image, egui::TextureOptions::LINEAR))
                    }
                    Err(e) => {
                        log::warn!("Overlay {} unavailable: {:#}", path.display(), e);
                        None
                    }
                }
            })
            .as_ref()
    }

    fn image(
        &mut self,
        ctx: &egui::Context,
        src: BlobUrl,
        blobs: &BlobStore,
    ) -> Option<&egui::TextureHandle> {
        if self.media.as_ref().map(|(url, _)| *url) != Some(src) {
            let texture = blobs.get(src).and_then(|bytes| match media::decode_image(bytes) {
                Ok(image) => Some(ctx.load_texture(
                    src.to_string(),
                    image,
                    egui::TextureOptions::LINEAR,
                )),
                Err(e) => {
                    log::warn!("Cannot display {}: {:#}", src, e);
                    None
                }
            });
            self.media = Some((src, texture));
        }
        self.media.as_ref().and_then(|(_, texture)| texture.as_ref())
    }

    #[cfg(feature = "video-opencv")]
    fn video_frame(
        &mut self,
        ctx: &egui::Context,
        src: BlobUrl,
        path: &std::path::Path,
        playback: Playback,
        blobs: &BlobStore,
    ) -> Option<&egui::TextureHandle> {
        // The decoder reads from disk, but only while the upload is live
        if !blobs.contains(src) {
            return None;
        }
        if self.video.as_ref().map(|(url, _)| *url) != Some(src) {
            let player = match media::VideoPlayer::open(path, playback) {
                Ok(player) => Some(player),
                Err(e) => {
                    log::warn!("Cannot play {}: {:#}", path.display(), e);
                    None
                }
            };
            self.video = Some((src, player));
            self.media = Some((src, None));
        }

        if let Some((_, Some(player))) = self.video.as_mut() {
            match player.next_frame() {
                Ok(Some(frame)) => match self.media.as_mut() {
                    Some((_, Some(texture))) => texture.set(frame, egui::TextureOptions::LINEAR),
                    Some((_, slot)) => {
                        *slot = Some(ctx.load_texture(
                            src.to_string(),
                            frame,
                            egui::TextureOptions::LINEAR,
                        ))
                    }
                    None => {}
                },
                Ok(None) => {}
                Err(e) => log::warn!("Video decode error: {:#}", e),
            }
            ctx.request_repaint_after(player.frame_interval());
        }
        self.media.as_ref().and_then(|(_, texture)| texture.as_ref())
    }
}

fn color(rgb: Rgb) -> egui::Color32 {
    let [r, g, b] = rgb.0;
    egui::Color32::from_rgb(r, g, b)
}

/// UV rect that crops a `tex_w` x `tex_h` texture to cover `rect` without
/// distortion.
fn cover_uv(tex_w: f32, tex_h: f32, rect: egui::Rect) -> egui::Rect {
    let tex_aspect = tex_w / tex_h;
    let rect_aspect = rect.width() / rect.height();
    if !tex_aspect.is_finite() || !rect_aspect.is_finite() {
        return egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    }
    if tex_aspect > rect_aspect {
        // Texture is wider - crop the sides
        let visible = rect_aspect / tex_aspect;
        let pad = (1.0 - visible) / 2.0;
        egui::Rect::from_min_max(egui::pos2(pad, 0.0), egui::pos2(1.0 - pad, 1.0))
    } else {
        // Texture is taller - crop top and bottom
        let visible = tex_aspect / rect_aspect;
        let pad = (1.0 - visible) / 2.0;
        egui::Rect::from_min_max(egui::pos2(0.0, pad), egui::pos2(1.0, 1.0 - pad))
    }
}

/// Screen rect of the safe area inside `canvas`.
fn safe_rect(style: &StyleEffects, canvas: egui::Rect) -> egui::Rect {
    let (min_x, min_y, max_x, max_y) = style
        .clip
        .visible_fraction(style.canvas_width, style.canvas_height);
    egui::Rect::from_min_max(
        egui::pos2(
            canvas.min.x + min_x * canvas.width(),
            canvas.min.y + min_y * canvas.height(),
        ),
        egui::pos2(
            canvas.min.x + max_x * canvas.width(),
            canvas.min.y + max_y * canvas.height(),
        ),
    )
}

/// Display the preview surface centered in the available space.
pub fn show(
    ui: &mut egui::Ui,
    surface: &mut PreviewSurface,
    blobs: &BlobStore,
    textures: &mut Textures,
) {
    let style = &surface.style;
    let available = ui.available_rect_before_wrap();
    let size = egui::vec2(style.width, style.height);
    let canvas = egui::Rect::from_center_size(available.center(), size);
    ui.allocate_rect(available, egui::Sense::hover());
    textures.prune(blobs);

    let painter = ui.painter_at(available);
    painter.rect_filled(canvas, 0.0, color(style.unsafe_background));

    let full_uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    let ctx = ui.ctx().clone();
    let media_shown = match surface.media.element() {
        Some(MediaElement::Image { src }) => match textures.image(&ctx, *src, blobs) {
            Some(texture) => {
                let [w, h] = texture.size();
                let uv = cover_uv(w as f32, h as f32, canvas);
                painter.image(texture.id(), canvas, uv, egui::Color32::WHITE);
                true
            }
            None => false,
        },
        #[cfg(feature = "video-opencv")]
        Some(MediaElement::Video {
            src,
            path,
            playback,
        }) => {
            match textures.video_frame(&ctx, *src, path, *playback, blobs) {
                Some(texture) => {
                    let [w, h] = texture.size();
                    let uv = cover_uv(w as f32, h as f32, canvas);
                    painter.image(texture.id(), canvas, uv, egui::Color32::WHITE);
                    true
                }
                None => false,
            }
        }
        #[cfg(not(feature = "video-opencv"))]
        Some(MediaElement::Video { .. }) => false,
        None => false,
    };

    let safe = safe_rect(style, canvas);
    if media_shown {
        // Keep the media visible and tint both zones
        painter.rect_filled(canvas, 0.0, color(style.unsafe_background).gamma_multiply(TINT_ALPHA));
        painter.rect_filled(safe, 0.0, color(style.safe_background).gamma_multiply(TINT_ALPHA));
    } else {
        painter.rect_filled(safe, 0.0, color(style.safe_background));
    }

    // Without a decoder, name the video so the user sees it was accepted
    if let (false, Some(MediaElement::Video { path, .. })) =
        (cfg!(feature = "video-opencv"), surface.media.element())
    {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        painter.text(
            safe.center(),
            egui::Align2::CENTER_CENTER,
            format!("▶ {}", name),
            egui::FontId::proportional(16.0),
            ui.visuals().strong_text_color(),
        );
    }

    if style.overlay_visible {
        if let Some(texture) = textures.overlay(&ctx, &style.overlay_src) {
            painter.image(texture.id(), canvas, full_uv, egui::Color32::WHITE);
        }
    }

    painter.text(
        egui::pos2(canvas.center().x, canvas.max.y + 6.0),
        egui::Align2::CENTER_TOP,
        format!("{}  ({:.0}%)", style.label, style.scale * 100.0),
        egui::FontId::monospace(13.0),
        ui.visuals().weak_text_color(),
    );

    surface.node = Some(visible_node(canvas, available));
}

/// The part of the canvas that is actually on screen inside `available`.
fn visible_node(canvas: egui::Rect, available: egui::Rect) -> PreviewNode {
    PreviewNode::from_rect(canvas.intersect(available))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(w: f32, h: f32) -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(w, h))
    }

    #[test]
    fn test_cover_uv_wide_texture() {
        let uv = cover_uv(200.0, 100.0, rect(100.0, 100.0));
        assert!((uv.min.x - 0.25).abs() < 0.0001);
        assert!((uv.max.x - 0.75).abs() < 0.0001);
        assert_eq!(uv.min.y, 0.0);
        assert_eq!(uv.max.y, 1.0);
    }

    #[test]
    fn test_cover_uv_tall_texture() {
        let uv = cover_uv(100.0, 400.0, rect(100.0, 200.0));
        assert!((uv.min.y - 0.25).abs() < 0.0001);
        assert!((uv.max.y - 0.75).abs() < 0.0001);
    }

    #[test]
    fn test_visible_node_clipped_to_panel() {
        let available = egui::Rect::from_min_max(egui::pos2(260.0, 40.0), egui::pos2(1280.0, 800.0));
        let canvas = egui::Rect::from_center_size(available.center(), egui::vec2(1400.0, 700.0));
        let node = visible_node(canvas, available);
        assert_eq!(node.x, 260.0);
        assert_eq!(node.width, 1020.0);
        assert_eq!(node.height, 700.0);

        let inside = egui::Rect::from_center_size(available.center(), egui::vec2(300.0, 500.0));
        assert_eq!(visible_node(inside, available), PreviewNode::from_rect(inside));
    }

    #[test]
    fn test_prune_drops_revoked_media() {
        let mut blobs = BlobStore::default();
        let old = blobs.create(std::sync::Arc::from(vec![0u8]));
        let mut textures = Textures::new(PathBuf::from("."));
        textures.media = Some((old, None));

        textures.prune(&blobs);
        assert!(textures.media.is_some());

        blobs.revoke(old);
        textures.prune(&blobs);
        assert!(textures.media.is_none());
    }

    #[test]
    fn test_safe_rect_follows_margins() {
        let style = StyleEffects {
            scale: 0.5,
            width: 540.0,
            height: 960.0,
            canvas_width: 1080,
            canvas_height: 1920,
            unsafe_background: Rgb([0, 0, 0]),
            safe_background: Rgb([255, 255, 255]),
            clip: crate::util::geometry::ClipInset {
                top: 220,
                right: 0,
                bottom: 420,
                left: 0,
            },
            label: "1080x1920".into(),
            overlay_src: String::new(),
            overlay_visible: false,
        };
        let safe = safe_rect(&style, rect(540.0, 960.0));
        assert!((safe.min.y - 110.0).abs() < 0.001);
        assert!((safe.max.y - 750.0).abs() < 0.001);
        assert_eq!(safe.min.x, 0.0);
        assert_eq!(safe.max.x, 540.0);
    }
}
