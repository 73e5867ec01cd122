// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading (images and videos).
//!
//! This module reads user files, declares their media type from the
//! extension, and converts decoded pixels to formats suitable for display
//! in egui.

use crate::models::media::{MediaFile, Playback};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Extensions offered by the file picker.
pub const MEDIA_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "mp4", "m4v", "mov", "webm", "mkv", "avi",
];

/// Declared MIME type for a path, based on its extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("avi") => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}

/// Read a user file into memory.
pub fn open_media(path: &Path) -> Result<MediaFile> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(MediaFile {
        name,
        mime: mime_for_path(path).to_string(),
        path: path.to_path_buf(),
        bytes: Arc::from(bytes),
    })
}

/// Decode encoded image bytes into an egui image.
pub fn decode_image(bytes: &[u8]) -> Result<egui::ColorImage> {
    let img = image::load_from_memory(bytes).context("Failed to decode image")?;
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Load and decode an image file from disk.
pub fn load_image(path: &Path) -> Result<egui::ColorImage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    decode_image(&bytes)
}

/// Frame rate assumed when a file reports none.
const FALLBACK_FPS: f64 = 30.0;

/// Delay between frames for a reported frame rate. Corrupt or extreme rates
/// are clamped to 1..=240 fps.
pub fn frame_interval(fps: f64) -> Duration {
    let fps = if fps.is_finite() && fps > 0.0 {
        fps.clamp(1.0, 240.0)
    } else {
        FALLBACK_FPS
    };
    Duration::from_secs_f64(1.0 / fps)
}

/// What a player does once the stream runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOfStream {
    Rewind,
    Hold,
}

/// Frame pacing for a video element, independent of the decoder.
#[derive(Debug)]
#[cfg_attr(not(feature = "video-opencv"), allow(dead_code))]
pub struct PlaybackClock {
    playback: Playback,
    interval: Duration,
    last_frame: Option<Instant>,
}

#[cfg_attr(not(feature = "video-opencv"), allow(dead_code))]
impl PlaybackClock {
    pub fn new(playback: Playback, fps: f64) -> Self {
        Self {
            playback,
            interval: frame_interval(fps),
            last_frame: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a frame should be decoded at `now`. The first frame is always
    /// due; later ones only while autoplaying.
    pub fn due(&self, now: Instant) -> bool {
        match self.last_frame {
            None => true,
            Some(_) if !self.playback.autoplay => false,
            Some(last) => now.duration_since(last) >= self.interval,
        }
    }

    pub fn frame_shown(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }

    pub fn at_end(&self) -> EndOfStream {
        if self.playback.looping {
            EndOfStream::Rewind
        } else {
            EndOfStream::Hold
        }
    }
}

/// Silent video frame source backed by OpenCV. No audio is ever decoded.
#[cfg(feature = "video-opencv")]
pub struct VideoPlayer {
    capture: opencv::videoio::VideoCapture,
    clock: PlaybackClock,
}

#[cfg(feature = "video-opencv")]
impl VideoPlayer {
    pub fn open(path: &Path, playback: Playback) -> Result<Self> {
        use opencv::prelude::*;
        use opencv::videoio;

        let path_str = path.to_string_lossy();
        let capture = videoio::VideoCapture::from_file(&path_str, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            anyhow::bail!("Failed to open video {}", path.display());
        }
        let fps = capture.get(videoio::CAP_PROP_FPS)?;

        Ok(Self {
            capture,
            clock: PlaybackClock::new(playback, fps),
        })
    }

    /// Time until the next frame is due.
    pub fn frame_interval(&self) -> Duration {
        self.clock.interval()
    }

    /// Return the next frame if one is due. At end of stream the player
    /// rewinds when looping and otherwise keeps the last frame.
    pub fn next_frame(&mut self) -> Result<Option<egui::ColorImage>> {
        use opencv::core::Mat;
        use opencv::prelude::*;
        use opencv::{imgproc, videoio};

        let now = Instant::now();
        if !self.clock.due(now) {
            return Ok(None);
        }

        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            if self.clock.at_end() == EndOfStream::Hold {
                return Ok(None);
            }
            self.capture.set(videoio::CAP_PROP_POS_FRAMES, 0.0)?;
            if !self.capture.read(&mut frame)? || frame.empty() {
                return Ok(None);
            }
        }
        self.clock.frame_shown(now);

        let mut rgba = Mat::default();
        imgproc::cvt_color(&frame, &mut rgba, imgproc::COLOR_BGR2RGBA, 0)?;
        let size = [rgba.cols() as usize, rgba.rows() as usize];
        Ok(Some(egui::ColorImage::from_rgba_unmultiplied(
            size,
            rgba.data_bytes()?,
        )))
    }
}
