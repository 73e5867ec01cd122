// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! SafeZone - social media safe area previewer
//!
//! A cross-platform desktop application that overlays safe-area margin
//! guides for social media formats on a canvas, previews user media inside
//! it, and exports the result as a PNG template.

mod app;
mod config;
mod io;
mod models;
mod sync;
mod ui;
mod util;

use app::SafeZoneApp;
use anyhow::Result;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = config::load().unwrap_or_else(|e| {
        log::warn!("Using default settings: {:#}", e);
        config::Config::default()
    });

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("SafeZone - Social Media Safe Area Preview"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "SafeZone",
        options,
        Box::new(move |_cc| Ok(Box::new(SafeZoneApp::new(&config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
