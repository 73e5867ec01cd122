// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Form controls and the render state derived from them.
//!
//! `Controls` holds exactly what the user typed or picked. `RenderState` is
//! recomputed from it on every change and never stored on its own.

use super::preset;
use std::fmt;

pub const DEFAULT_WIDTH: u32 = 1080;
pub const DEFAULT_HEIGHT: u32 = 1920;
pub const DEFAULT_MARGIN: u32 = 0;

/// An sRGB color as produced by a color picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

/// Current values of every input control.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    pub preset: String,
    pub width: String,
    pub height: String,
    pub top: String,
    pub bottom: String,
    pub left: String,
    pub right: String,
    pub safe_color: Rgb,
    pub unsafe_color: Rgb,
    pub show_ui: bool,
    pub dark_mode: bool,
}

impl Controls {
    /// Controls with empty numeric fields and the given colors. The caller
    /// is expected to apply a preset before the first paint.
    pub fn new(safe_color: Rgb, unsafe_color: Rgb, dark_mode: bool) -> Self {
        Self {
            preset: preset::initial().id.to_string(),
            width: String::new(),
            height: String::new(),
            top: String::new(),
            bottom: String::new(),
            left: String::new(),
            right: String::new(),
            safe_color,
            unsafe_color,
            show_ui: false,
            dark_mode,
        }
    }
}

/// Snapshot of all inputs needed to paint the preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderState {
    pub width: u32,
    pub height: u32,
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
    pub safe_color: Rgb,
    pub unsafe_color: Rgb,
    pub ui_visible: bool,
    pub ui_src: String,
}

/// Derive the render state from the controls alone.
pub fn derive_state(controls: &Controls) -> RenderState {
    RenderState {
        width: parse_or(&controls.width, DEFAULT_WIDTH),
        height: parse_or(&controls.height, DEFAULT_HEIGHT),
        top: parse_or(&controls.top, DEFAULT_MARGIN),
        bottom: parse_or(&controls.bottom, DEFAULT_MARGIN),
        left: parse_or(&controls.left, DEFAULT_MARGIN),
        right: parse_or(&controls.right, DEFAULT_MARGIN),
        safe_color: controls.safe_color,
        unsafe_color: controls.unsafe_color,
        ui_visible: controls.show_ui,
        ui_src: preset::find(&controls.preset)
            .map(|p| p.ui.to_string())
            .unwrap_or_default(),
    }
}

/// Parse a positive integer from the start of `input`, or return `default`.
///
/// Leading whitespace and a sign are accepted and anything after the digits
/// is ignored, so `"220px"` reads as 220. Zero, negative and digitless input
/// all fall back to `default`.
pub fn parse_or(input: &str, default: u32) -> u32 {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if negative || end == 0 {
        return default;
    }
    match digits[..end].parse::<u32>() {
        Ok(0) | Err(_) => default,
        Ok(value) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> Controls {
        Controls::new(Rgb([0, 255, 0]), Rgb([255, 0, 0]), false)
    }

    #[test]
    fn test_parse_exact_integers() {
        assert_eq!(parse_or("1080", DEFAULT_WIDTH), 1080);
        assert_eq!(parse_or("420", DEFAULT_MARGIN), 420);
        assert_eq!(parse_or("  75", DEFAULT_MARGIN), 75);
        assert_eq!(parse_or("+12", DEFAULT_MARGIN), 12);
    }

    #[test]
    fn test_parse_ignores_trailing_text() {
        assert_eq!(parse_or("220px", DEFAULT_MARGIN), 220);
        assert_eq!(parse_or("12.7", DEFAULT_MARGIN), 12);
    }

    #[test]
    fn test_parse_fallbacks() {
        assert_eq!(parse_or("", DEFAULT_WIDTH), 1080);
        assert_eq!(parse_or("abc", DEFAULT_HEIGHT), 1920);
        assert_eq!(parse_or("0", DEFAULT_WIDTH), 1080);
        assert_eq!(parse_or("-40", DEFAULT_MARGIN), 0);
        assert_eq!(parse_or("-", DEFAULT_MARGIN), 0);
        assert_eq!(parse_or("99999999999999", DEFAULT_HEIGHT), 1920);
    }

    #[test]
    fn test_derive_state_reads_every_field() {
        let mut c = controls();
        c.width = "720".into();
        c.height = "1280".into();
        c.top = "10".into();
        c.bottom = "20".into();
        c.left = "30".into();
        c.right = "40".into();
        c.show_ui = true;

        let state = derive_state(&c);
        assert_eq!(
            (state.width, state.height, state.top, state.bottom, state.left, state.right),
            (720, 1280, 10, 20, 30, 40)
        );
        assert!(state.ui_visible);
        assert_eq!(state.ui_src, "assets/reels-ui.png");
        assert_eq!(state.safe_color, Rgb([0, 255, 0]));
    }

    #[test]
    fn test_derive_state_defaults_for_empty_fields() {
        let state = derive_state(&controls());
        assert_eq!(state.width, DEFAULT_WIDTH);
        assert_eq!(state.height, DEFAULT_HEIGHT);
        assert_eq!(state.top + state.bottom + state.left + state.right, 0);
    }

    #[test]
    fn test_unknown_preset_has_no_overlay() {
        let mut c = controls();
        c.preset = "nope".into();
        assert!(derive_state(&c).ui_src.is_empty());
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(Rgb::from_hex("#2ecc71"), Some(Rgb([0x2e, 0xcc, 0x71])));
        assert_eq!(Rgb::from_hex("E74C3C"), Some(Rgb([0xe7, 0x4c, 0x3c])));
        assert_eq!(Rgb::from_hex("#fff"), None);
        assert_eq!(Rgb::from_hex("#gggggg"), None);
        assert_eq!(Rgb([0x2e, 0xcc, 0x71]).to_string(), "#2ecc71");
    }
}
