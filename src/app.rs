// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module wires the panels to the layout synchronizer: control edits
//! restyle the preview, the toolbar loads media, flips the theme and starts
//! exports, and screenshots delivered by eframe complete those exports.

use crate::config::Config;
use crate::io::export::{FileDialogSink, ScreenshotRasterizer};
use crate::io::media;
use crate::models::render_state::Controls;
use crate::sync::{self, SyncContext};
use crate::ui::{canvas, controls, toolbar};
use crate::util::geometry::Viewport;
use std::sync::Arc;

/// Frames to wait for a screenshot before giving up on an export.
const SCREENSHOT_TIMEOUT_FRAMES: u64 = 30;

/// An export waiting for its screenshot event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingExport {
    requested_at: u64,
}

impl PendingExport {
    fn expired(&self, frame_nr: u64) -> bool {
        frame_nr.saturating_sub(self.requested_at) > SCREENSHOT_TIMEOUT_FRAMES
    }
}

/// Main application state.
pub struct SafeZoneApp {
    sync: SyncContext,
    textures: canvas::Textures,
    /// A screenshot was requested and its event has not arrived yet
    export_pending: Option<PendingExport>,
    /// Theme currently installed in the egui context
    applied_dark_mode: Option<bool>,
}

impl SafeZoneApp {
    /// Create the application and apply the first preset.
    pub fn new(config: &Config) -> Self {
        let controls = Controls::new(config.safe_color(), config.unsafe_color(), config.dark_mode());
        Self {
            sync: SyncContext::new(controls, Viewport::new(1280.0, 800.0), config.inset()),
            textures: canvas::Textures::new(config.asset_root()),
            export_pending: None,
            applied_dark_mode: None,
        }
    }

    fn sync_theme(&mut self, ctx: &egui::Context) {
        let dark = self.sync.controls.dark_mode;
        if self.applied_dark_mode != Some(dark) {
            ctx.set_visuals(if dark {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            self.applied_dark_mode = Some(dark);
        }
    }

    fn pick_media(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images and videos", media::MEDIA_EXTENSIONS)
            .pick_file()
        else {
            sync::load_user_media(&mut self.sync, None);
            return;
        };

        match media::open_media(&path) {
            Ok(file) => sync::load_user_media(&mut self.sync, Some(file)),
            Err(e) => log::error!("Failed to open media: {:#}", e),
        }
    }

    fn request_export(&mut self, ctx: &egui::Context) {
        if self.export_pending.is_some() {
            return;
        }
        self.export_pending = Some(PendingExport {
            requested_at: ctx.frame_nr(),
        });
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot);
        log::info!("Requested screenshot for export");
    }

    /// Finish a pending export once the screenshot arrives.
    fn poll_screenshot(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.export_pending else {
            return;
        };
        let screenshot: Option<Arc<egui::ColorImage>> = ctx.input(|i| {
            i.raw.events.iter().find_map(|event| match event {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let Some(image) = screenshot else {
            if pending.expired(ctx.frame_nr()) {
                log::warn!("No screenshot after {} frames, export abandoned", SCREENSHOT_TIMEOUT_FRAMES);
                self.export_pending = None;
            } else {
                ctx.request_repaint();
            }
            return;
        };

        self.export_pending = None;
        let mut rasterizer = ScreenshotRasterizer::new(image, ctx.pixels_per_point());
        if let Err(e) = sync::export_image(&self.sync, &mut rasterizer, &mut FileDialogSink) {
            log::error!("Export failed: {:#}", e);
        }
    }
}

impl eframe::App for SafeZoneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_screenshot(ctx);
        self.sync_theme(ctx);

        let screen = ctx.screen_rect();
        sync::resize(&mut self.sync, Viewport::new(screen.width(), screen.height()));

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    &mut self.sync.controls,
                    self.sync.surface.media.name(),
                    self.export_pending.is_some(),
                )
            })
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::OverlayToggled => sync::refresh(&mut self.sync),
            toolbar::ToolbarAction::ToggleTheme => {
                sync::toggle_theme(&mut self.sync);
                self.sync_theme(ctx);
            }
            toolbar::ToolbarAction::LoadMedia => self.pick_media(),
            toolbar::ToolbarAction::Download => self.request_export(ctx),
            toolbar::ToolbarAction::None => {}
        }

        // Controls panel (left side)
        let controls_action = egui::SidePanel::left("controls")
            .default_width(260.0)
            .resizable(false)
            .show(ctx, |ui| controls::show(ui, &mut self.sync.controls))
            .inner;

        match controls_action {
            controls::ControlsAction::SelectPreset(id) => sync::apply_preset(&mut self.sync, &id),
            controls::ControlsAction::Edited => sync::refresh(&mut self.sync),
            controls::ControlsAction::None => {}
        }

        // Preview (center)
        egui::CentralPanel::default().show(ctx, |ui| {
            canvas::show(
                ui,
                &mut self.sync.surface,
                &self.sync.blobs,
                &mut self.textures,
            );
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_export_expires() {
        let pending = PendingExport { requested_at: 100 };
        assert!(!pending.expired(100));
        assert!(!pending.expired(100 + SCREENSHOT_TIMEOUT_FRAMES));
        assert!(pending.expired(101 + SCREENSHOT_TIMEOUT_FRAMES));
    }

    #[test]
    fn test_pending_export_tolerates_frame_counter_reset() {
        let pending = PendingExport { requested_at: 100 };
        assert!(!pending.expired(3));
    }
}
