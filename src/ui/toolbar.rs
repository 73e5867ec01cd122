// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar.
//!
//! Overlay and theme toggles, media upload and PNG download.

use crate::models::render_state::Controls;

/// Result of toolbar interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    OverlayToggled,
    ToggleTheme,
    LoadMedia,
    Download,
}

/// Display the toolbar.
pub fn show(
    ui: &mut egui::Ui,
    controls: &mut Controls,
    media_name: Option<&str>,
    export_pending: bool,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.checkbox(&mut controls.show_ui, "Show interface").changed() {
            action = ToolbarAction::OverlayToggled;
        }

        let mut dark_mode = controls.dark_mode;
        if ui.checkbox(&mut dark_mode, "Dark mode").changed() {
            action = ToolbarAction::ToggleTheme;
        }

        ui.separator();

        if ui.button("📂 Load media...").clicked() {
            action = ToolbarAction::LoadMedia;
        }
        if let Some(name) = media_name {
            ui.label(egui::RichText::new(name).italics().weak());
        }

        ui.separator();

        let download = ui.add_enabled(!export_pending, egui::Button::new("⬇ Download PNG"));
        if download.clicked() {
            action = ToolbarAction::Download;
        }
        if export_pending {
            ui.spinner();
        }
    });

    action
}
