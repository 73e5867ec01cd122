// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: presets, form controls, derived render state and user media.

pub mod media;
pub mod preset;
pub mod render_state;
