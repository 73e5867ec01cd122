// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Format presets.
//!
//! This module defines the static table of social media formats with their
//! canvas dimensions, safe-area margins and platform interface overlay.

/// A named bundle of canvas dimensions, margins and optional overlay image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub id: &'static str,
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
    /// Path of the platform interface image, empty when the format has none.
    pub ui: &'static str,
}

impl Preset {
    /// Whether the preset ships a platform interface overlay.
    pub fn has_overlay(&self) -> bool {
        !self.ui.is_empty()
    }
}

/// All known presets. The first entry is applied at startup.
pub const PRESETS: [Preset; 6] = [
    Preset {
        id: "ig-reels",
        label: "Instagram Reels",
        width: 1080,
        height: 1920,
        top: 220,
        bottom: 420,
        left: 0,
        right: 0,
        ui: "assets/reels-ui.png",
    },
    Preset {
        id: "tiktok",
        label: "TikTok",
        width: 1080,
        height: 1920,
        top: 108,
        bottom: 320,
        left: 60,
        right: 0,
        ui: "assets/tiktok-ui.png",
    },
    Preset {
        id: "yt-shorts",
        label: "YouTube Shorts",
        width: 1080,
        height: 1920,
        top: 140,
        bottom: 270,
        left: 0,
        right: 0,
        ui: "assets/shorts-ui.png",
    },
    Preset {
        id: "ig-post-1x1",
        label: "Instagram Post 1:1",
        width: 1080,
        height: 1080,
        top: 60,
        bottom: 60,
        left: 60,
        right: 60,
        ui: "",
    },
    Preset {
        id: "ig-post-4x5",
        label: "Instagram Post 4:5",
        width: 1080,
        height: 1350,
        top: 90,
        bottom: 90,
        left: 0,
        right: 0,
        ui: "",
    },
    Preset {
        id: "custom",
        label: "Custom",
        width: 1080,
        height: 1920,
        top: 100,
        bottom: 100,
        left: 50,
        right: 50,
        ui: "",
    },
];

/// Look up a preset by its identifier.
pub fn find(id: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.id == id)
}

/// The preset applied when the application starts.
pub fn initial() -> &'static Preset {
    &PRESETS[0]
}
