// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! PNG export of the preview surface.
//!
//! Capturing pixels is delegated to a [`Rasterizer`]; the production one
//! crops an eframe screenshot. Saving is delegated to a [`DownloadSink`].

use crate::models::render_state::Rgb;
use anyhow::{bail, Context, Result};
use image::RgbaImage;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

/// Screen rectangle of the preview surface, in logical points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewNode {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PreviewNode {
    pub fn from_rect(rect: egui::Rect) -> Self {
        Self {
            x: rect.min.x,
            y: rect.min.y,
            width: rect.width(),
            height: rect.height(),
        }
    }
}

/// Options handed to the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    pub cross_origin_allowed: bool,
    pub allow_tainted: bool,
    /// Flatten transparency onto this color; `None` keeps the alpha channel.
    pub background_color: Option<Rgb>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            cross_origin_allowed: true,
            allow_tainted: true,
            background_color: None,
        }
    }
}

/// Something that can turn the preview surface into pixels.
pub trait Rasterizer {
    fn capture(&mut self, node: &PreviewNode, options: &CaptureOptions) -> Result<RgbaImage>;
}

/// A file ready to be handed to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Destination for exported files.
pub trait DownloadSink {
    /// Deliver the download. Returns where it was written, or `None` if the
    /// user dismissed the save dialog.
    fn deliver(&mut self, download: Download) -> Result<Option<PathBuf>>;
}

/// File name for an exported template.
pub fn template_file_name(width: u32, height: u32) -> String {
    format!("SafeZone_Template_{}x{}.png", width, height)
}

/// Encode a bitmap as PNG bytes.
pub fn encode_png(bitmap: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    bitmap
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .context("Failed to encode PNG")?;
    Ok(bytes)
}

/// Rasterizer backed by a frame captured with `ViewportCommand::Screenshot`.
pub struct ScreenshotRasterizer {
    screenshot: Arc<egui::ColorImage>,
    pixels_per_point: f32,
}

impl ScreenshotRasterizer {
    pub fn new(screenshot: Arc<egui::ColorImage>, pixels_per_point: f32) -> Self {
        Self {
            screenshot,
            pixels_per_point,
        }
    }
}

impl Rasterizer for ScreenshotRasterizer {
    fn capture(&mut self, node: &PreviewNode, options: &CaptureOptions) -> Result<RgbaImage> {
        let [shot_w, shot_h] = self.screenshot.size;
        let ppp = self.pixels_per_point;

        let x0 = ((node.x * ppp).round().max(0.0) as usize).min(shot_w);
        let y0 = ((node.y * ppp).round().max(0.0) as usize).min(shot_h);
        let x1 = (((node.x + node.width) * ppp).round().max(0.0) as usize).min(shot_w);
        let y1 = (((node.y + node.height) * ppp).round().max(0.0) as usize).min(shot_h);
        if x1 <= x0 || y1 <= y0 {
            bail!("Preview surface is outside the captured frame");
        }

        let mut out = RgbaImage::new((x1 - x0) as u32, (y1 - y0) as u32);
        for (x, y, pixel) in out.enumerate_pixels_mut() {
            let src = self.screenshot.pixels[(y0 + y as usize) * shot_w + x0 + x as usize];
            let [r, g, b, a] = src.to_srgba_unmultiplied();
            *pixel = match options.background_color {
                Some(bg) => image::Rgba(flatten([r, g, b, a], bg)),
                None => image::Rgba([r, g, b, a]),
            };
        }
        Ok(out)
    }
}

/// Composite an unmultiplied pixel over an opaque background.
fn flatten([r, g, b, a]: [u8; 4], Rgb(bg): Rgb) -> [u8; 4] {
    let alpha = a as u32;
    let mix = |fg: u8, back: u8| {
        ((fg as u32 * alpha + back as u32 * (255 - alpha) + 127) / 255) as u8
    };
    [mix(r, bg[0]), mix(g, bg[1]), mix(b, bg[2]), 255]
}

/// Saves downloads through a native save dialog.
pub struct FileDialogSink;

impl DownloadSink for FileDialogSink {
    fn deliver(&mut self, download: Download) -> Result<Option<PathBuf>> {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(&download.file_name)
            .save_file()
        else {
            return Ok(None);
        };
        std::fs::write(&path, &download.bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(Some(path))
    }
}
