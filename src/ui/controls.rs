// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Format controls panel.
//!
//! Preset selector, canvas dimensions, the four margins and the two area
//! colors. Edits are written straight into [`Controls`]; the returned action
//! tells the app which synchronizer operation to run.

use crate::models::preset::{self, PRESETS};
use crate::models::render_state::{Controls, Rgb};

/// Result of panel interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlsAction {
    None,
    SelectPreset(String),
    Edited,
}

fn numeric_field(ui: &mut egui::Ui, label: &str, value: &mut String) -> bool {
    ui.label(label);
    let changed = ui
        .add(egui::TextEdit::singleline(value).desired_width(80.0))
        .changed();
    ui.end_row();
    changed
}

fn color_field(ui: &mut egui::Ui, label: &str, value: &mut Rgb) -> bool {
    ui.label(label);
    let changed = ui
        .horizontal(|ui| {
            let changed = ui.color_edit_button_srgb(&mut value.0).changed();
            ui.label(egui::RichText::new(value.to_string()).monospace().weak());
            changed
        })
        .inner;
    ui.end_row();
    changed
}

/// Display the controls panel.
pub fn show(ui: &mut egui::Ui, controls: &mut Controls) -> ControlsAction {
    let mut action = ControlsAction::None;

    ui.heading("Format");
    ui.add_space(4.0);

    let mut selected = controls.preset.clone();
    let selected_label = preset::find(&selected).map_or("Custom", |p| p.label);
    egui::ComboBox::from_id_source("preset")
        .selected_text(selected_label)
        .width(200.0)
        .show_ui(ui, |ui| {
            for preset in &PRESETS {
                ui.selectable_value(&mut selected, preset.id.to_string(), preset.label);
            }
        });
    if selected != controls.preset {
        action = ControlsAction::SelectPreset(selected);
    }

    ui.add_space(8.0);
    ui.separator();

    let mut edited = false;
    egui::Grid::new("dimensions")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            edited |= numeric_field(ui, "Width", &mut controls.width);
            edited |= numeric_field(ui, "Height", &mut controls.height);
        });

    ui.add_space(8.0);
    ui.label(egui::RichText::new("Margins (px)").strong());
    egui::Grid::new("margins")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            edited |= numeric_field(ui, "Top", &mut controls.top);
            edited |= numeric_field(ui, "Bottom", &mut controls.bottom);
            edited |= numeric_field(ui, "Left", &mut controls.left);
            edited |= numeric_field(ui, "Right", &mut controls.right);
        });

    ui.add_space(8.0);
    ui.separator();
    egui::Grid::new("colors")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            edited |= color_field(ui, "Safe area", &mut controls.safe_color);
            edited |= color_field(ui, "Unsafe area", &mut controls.unsafe_color);
        });

    if edited && action == ControlsAction::None {
        action = ControlsAction::Edited;
    }
    action
}
